//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::helpers::parse_post_date;

/// A blog post as stored in `content/posts.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Unique id, used in `?post=` links
    pub id: String,

    pub title: String,

    #[serde(default)]
    pub excerpt: String,

    #[serde(default)]
    pub category: String,

    /// Cover image URL
    #[serde(default)]
    pub image: String,

    /// Publication date, `YYYY-MM-DD`
    #[serde(default)]
    pub date: String,

    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Path of the externally stored body, relative to the site root
    #[serde(default)]
    pub content_file: Option<String>,
}

impl Post {
    /// Parsed publication date, if the stored value is a date
    pub fn published_on(&self) -> Option<NaiveDate> {
        parse_post_date(&self.date)
    }

    /// Author name shown on the detail page
    pub fn author_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.author.as_deref() {
            Some(author) if !author.trim().is_empty() => author,
            _ => fallback,
        }
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category == category
    }
}

/// Sort posts newest first. Posts without a usable date go last, keeping
/// their relative order.
pub fn sort_newest_first(posts: &mut [&Post]) {
    posts.sort_by(|a, b| match (a.published_on(), b.published_on()) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}
