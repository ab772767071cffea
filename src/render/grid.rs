//! Card grids: posts, students and activities

use serde::Serialize;

use crate::content::{sort_newest_first, Activity, ContentStore, Loaded, Post, Student};
use crate::helpers::strip_html;
use crate::router::{activity_url, HistoryEntry, Location};

/// Skeleton cards shown in a post or student grid
pub const GRID_SKELETONS: usize = 6;
/// Skeleton cards shown in the homepage activity strip
pub const ACTIVITY_SKELETONS: usize = 2;

/// What a grid container shows
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum Section<T> {
    Ready { items: Vec<T>, has_more: bool },
    /// Nothing to show yet
    Skeleton { count: usize },
    /// The collection failed to load
    Error { message: String },
}

impl<T> Section<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Section::Ready { items, .. } => items,
            _ => &[],
        }
    }

    pub fn has_more(&self) -> bool {
        matches!(self, Section::Ready { has_more: true, .. })
    }
}

/// Build a section from a collection: failures become the error message,
/// an empty collection becomes skeletons.
fn section<T, C>(
    collection: &Loaded<T>,
    skeletons: usize,
    error: &str,
    build: impl FnOnce(&[T]) -> (Vec<C>, bool),
) -> Section<C> {
    match collection {
        Loaded::Failed(_) => Section::Error {
            message: error.to_string(),
        },
        Loaded::Ready(items) if items.is_empty() => Section::Skeleton { count: skeletons },
        Loaded::Ready(items) => {
            let (items, has_more) = build(items.as_slice());
            Section::Ready { items, has_more }
        }
    }
}

/// Filter by category, sort newest first and cut to `limit`. The flag is
/// true when the limit dropped posts.
pub fn select_posts<'a>(
    posts: &'a [Post],
    category: Option<&str>,
    limit: Option<usize>,
) -> (Vec<&'a Post>, bool) {
    let mut selected: Vec<&Post> = posts
        .iter()
        .filter(|p| category.map_or(true, |c| p.in_category(c)))
        .collect();
    sort_newest_first(&mut selected);

    let truncated = match limit {
        Some(limit) if selected.len() > limit => {
            selected.truncate(limit);
            true
        }
        _ => false,
    };
    (selected, truncated)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostCard {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub image: String,
    /// Stored `YYYY-MM-DD`; templates format it
    pub date: String,
    pub url: String,
}

impl PostCard {
    /// Card for a grid shown at `from`
    pub fn new(post: &Post, from: &Location) -> Self {
        Self {
            id: post.id.clone(),
            title: post.title.clone(),
            excerpt: strip_html(&post.excerpt),
            category: post.category.clone(),
            image: post.image.clone(),
            date: post.date.clone(),
            url: HistoryEntry::post_detail(from, &post.id).href(),
        }
    }
}

pub fn post_section(
    store: &ContentStore,
    from: &Location,
    category: Option<&str>,
    limit: Option<usize>,
    error: &str,
) -> Section<PostCard> {
    section(&store.posts, GRID_SKELETONS, error, |posts| {
        let (selected, has_more) = select_posts(posts, category, limit);
        let cards = selected
            .into_iter()
            .map(|post| PostCard::new(post, from))
            .collect();
        (cards, has_more)
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTab {
    pub label: String,
    pub url: String,
    pub active: bool,
}

/// "All" first, then every category in first-seen order
pub fn category_tabs(
    store: &ContentStore,
    from: &Location,
    active: Option<&str>,
    all_label: &str,
) -> Vec<CategoryTab> {
    let mut tabs = vec![CategoryTab {
        label: all_label.to_string(),
        url: HistoryEntry::all_posts(from).href(),
        active: active.is_none(),
    }];
    tabs.extend(store.categories().into_iter().map(|category| CategoryTab {
        label: category.to_string(),
        url: HistoryEntry::category_filter(from, category).href(),
        active: active == Some(category),
    }));
    tabs
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StudentCard {
    pub display_name: String,
    pub nickname: String,
    pub school: String,
    pub university: String,
    pub faculty: String,
    pub major: String,
    pub image: String,
    /// Only set when the student's article exists
    pub url: Option<String>,
    /// Portfolio modal
    pub summary: String,
    pub portfolio: Vec<String>,
}

impl StudentCard {
    pub fn new(student: &Student, store: &ContentStore, from: &Location) -> Self {
        Self {
            display_name: student.display_name(),
            nickname: student.nickname.clone(),
            school: student.school.clone(),
            university: student.university_display().to_string(),
            faculty: student.faculty.clone(),
            major: student.major.clone(),
            image: student.profile_image.clone(),
            url: store
                .linked_post(student)
                .map(|post| HistoryEntry::post_detail(from, &post.id).href()),
            summary: student.admission_summary(),
            portfolio: student.portfolio_images.clone(),
        }
    }
}

pub fn student_section(
    store: &ContentStore,
    from: &Location,
    limit: Option<usize>,
    error: &str,
) -> Section<StudentCard> {
    section(&store.students, GRID_SKELETONS, error, |students| {
        let shown = limit.unwrap_or(students.len()).min(students.len());
        let cards = students[..shown]
            .iter()
            .map(|s| StudentCard::new(s, store, from))
            .collect();
        (cards, shown < students.len())
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCard {
    pub id: String,
    pub title: String,
    pub category: String,
    pub excerpt: String,
    pub image: String,
    pub day: String,
    pub month: String,
    pub date: String,
    pub location: String,
    pub url: String,
}

impl ActivityCard {
    pub fn new(activity: &Activity) -> Self {
        Self {
            id: activity.id.clone(),
            title: activity.title.clone(),
            category: activity.category.clone(),
            excerpt: activity.excerpt.clone(),
            image: activity.image.clone(),
            day: activity.date.clone(),
            month: activity.month.clone(),
            date: activity.date_label(),
            location: activity.location.clone(),
            url: activity_url(&activity.id),
        }
    }
}

/// Activities are stored newest first already
pub fn activity_section(store: &ContentStore, limit: Option<usize>, error: &str) -> Section<ActivityCard> {
    let skeletons = if limit.is_some() {
        ACTIVITY_SKELETONS
    } else {
        GRID_SKELETONS
    };
    section(&store.activities, skeletons, error, |activities| {
        let shown = limit.unwrap_or(activities.len()).min(activities.len());
        let cards = activities[..shown].iter().map(ActivityCard::new).collect();
        (cards, shown < activities.len())
    })
}
