//! Post and activity detail views

use serde::Serialize;

use super::grid::StudentCard;
use crate::content::{Activity, ContentStore, Post};
use crate::error::{SiteError, SiteResult};
use crate::helpers::html_escape;
use crate::i18n::I18n;
use crate::router::{HistoryEntry, Location};

/// Popular posts listed in the sidebar
pub const POPULAR_POSTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostDetail {
    pub id: String,
    pub title: String,
    pub category: String,
    pub image: String,
    pub date: String,
    pub author: String,
    pub tags: Vec<String>,
    pub body: String,
    /// Back to the grid this detail was opened over
    pub back: String,
    pub student: Option<StudentCard>,
    pub popular: Vec<SidebarPost>,
    pub categories: Vec<CategoryLink>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SidebarPost {
    pub title: String,
    pub image: String,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub url: String,
}

impl PostDetail {
    /// Detail of `post` as shown at `from`
    pub fn new(
        post: &Post,
        store: &ContentStore,
        from: &Location,
        body: SiteResult<String>,
        i18n: &I18n,
    ) -> Self {
        let popular = store
            .posts
            .items()
            .iter()
            .filter(|p| p.id != post.id)
            .take(POPULAR_POSTS)
            .map(|p| SidebarPost {
                title: p.title.clone(),
                image: p.image.clone(),
                date: p.date.clone(),
                url: HistoryEntry::post_detail(from, &p.id).href(),
            })
            .collect();

        let categories = store
            .categories()
            .into_iter()
            .map(|name| CategoryLink {
                name: name.to_string(),
                url: HistoryEntry::category_filter(from, name).href(),
            })
            .collect();

        let default_author = i18n.get("post.default_author");

        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            category: post.category.clone(),
            image: post.image.clone(),
            date: post.date.clone(),
            author: post.author_or(&default_author).to_string(),
            tags: post.tags.clone(),
            body: post_body(body, i18n),
            back: HistoryEntry::leave_detail(from).href(),
            student: store
                .student_for_post(&post.id)
                .map(|s| StudentCard::new(s, store, from)),
            popular,
            categories,
        }
    }
}

/// Body HTML, or the fallback paragraph for the failure
fn post_body(body: SiteResult<String>, i18n: &I18n) -> String {
    match body {
        Ok(html) => html,
        Err(SiteError::BodyMissing(file)) => {
            tracing::warn!("Post body missing: {}", file);
            fallback(&i18n.get("error.body_unavailable"))
        }
        Err(e) => {
            tracing::warn!("Post body failed: {}", e);
            fallback(&i18n.get("error.body_failed"))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityDetail {
    pub id: String,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub image: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub participants: String,
    pub cost: String,
    pub registration: Option<String>,
    pub body: String,
}

impl ActivityDetail {
    pub fn new(activity: &Activity, body: SiteResult<String>, i18n: &I18n) -> Self {
        let body = body.unwrap_or_else(|e| {
            tracing::warn!("Activity body failed: {}", e);
            fallback(&i18n.get("error.activity_body"))
        });

        Self {
            id: activity.id.clone(),
            title: activity.title.clone(),
            category: activity.category.clone(),
            excerpt: activity.excerpt.clone(),
            image: activity.image.clone(),
            date: activity.date_label(),
            time: activity.meta.time.clone(),
            location: activity.location.clone(),
            participants: activity.meta.participants.clone(),
            cost: activity.meta.cost.clone(),
            registration: activity.registration_link().map(str::to_string),
            body,
        }
    }
}

fn fallback(message: &str) -> String {
    format!("<p class=\"content-fallback\">{}</p>", html_escape(message))
}
