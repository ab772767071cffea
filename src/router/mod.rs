//! Query-parameter router
//!
//! Every page view is derived from the URL alone: the path picks the page
//! and the `post`, `category` and `activity` parameters pick what it shows.

mod history;

pub use history::{HistoryEntry, Navigation, Navigator, DETAIL_ANCHOR, LIST_ANCHOR};

use percent_encoding::percent_decode_str;

use crate::content::ContentStore;
use crate::helpers::with_query;

pub const STORIES_PAGE: &str = "/stories.html";
pub const ACTIVITIES_PAGE: &str = "/activities.html";
pub const PORTFOLIO_PAGE: &str = "/portfolio.html";
pub const COURSES_PAGE: &str = "/courses.html";

/// A parsed page URL: path plus decoded query pairs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl Location {
    /// Parse `path?query#fragment`
    pub fn parse(url: &str) -> Self {
        let url = url.split('#').next().unwrap_or("");
        let (path, query) = url.split_once('?').unwrap_or((url, ""));
        let path = if path.is_empty() { "/" } else { path };

        let query = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_query(key), decode_query(value))
            })
            .collect();

        Self {
            path: path.to_string(),
            query,
        }
    }

    /// Location without a query string
    pub fn bare(path: &str) -> Self {
        Self {
            path: path.to_string(),
            query: Vec::new(),
        }
    }

    /// First value of a query parameter; empty values count as absent
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .filter(|v| !v.is_empty())
    }

    /// Render back to a URL
    pub fn to_url(&self) -> String {
        match self.query.first() {
            None => self.path.clone(),
            Some((key, value)) => {
                let mut url = with_query(&self.path, key, value);
                for (key, value) in &self.query[1..] {
                    url.push('&');
                    url.push_str(key);
                    url.push('=');
                    url.push_str(&crate::helpers::encode_component(value));
                }
                url
            }
        }
    }

    /// The page this location addresses, if it is one of the rendered pages
    pub fn page(&self) -> Option<Page> {
        Page::from_path(&self.path)
    }
}

/// `+` means space in query strings
fn decode_query(raw: &str) -> String {
    percent_decode_str(&raw.replace('+', " "))
        .decode_utf8_lossy()
        .into_owned()
}

/// The rendered pages of the site
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Page {
    Home,
    Stories,
    Portfolio,
    Activities,
    Courses,
}

impl Page {
    /// Map a URL path to a page. Only the site root is the homepage; nested
    /// directories belong to the static server.
    pub fn from_path(path: &str) -> Option<Self> {
        match path {
            "/" | "/index.html" => Some(Page::Home),
            STORIES_PAGE => Some(Page::Stories),
            PORTFOLIO_PAGE => Some(Page::Portfolio),
            ACTIVITIES_PAGE => Some(Page::Activities),
            COURSES_PAGE => Some(Page::Courses),
            _ => None,
        }
    }

    pub fn is_home(self) -> bool {
        self == Page::Home
    }
}

/// What a page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Home,
    /// Post grid, optionally filtered by category
    List { category: Option<String> },
    PostDetail { id: String },
    Portfolio,
    ActivityList,
    ActivityDetail { id: String },
    Courses,
}

impl View {
    /// Derive the view from a location. `post` wins over `category`.
    pub fn from_location(location: &Location) -> Option<Self> {
        let view = match location.page()? {
            Page::Home => View::Home,
            Page::Stories => match location.get("post") {
                Some(id) => View::PostDetail { id: id.to_string() },
                None => View::List {
                    category: location.get("category").map(str::to_string),
                },
            },
            Page::Activities => match location.get("activity") {
                Some(id) => View::ActivityDetail { id: id.to_string() },
                None => View::ActivityList,
            },
            Page::Portfolio => View::Portfolio,
            Page::Courses => View::Courses,
        };
        Some(view)
    }

    /// Replace detail views whose item does not exist with their list view
    pub fn resolve(self, store: &ContentStore) -> Self {
        match self {
            View::PostDetail { ref id } if store.post(id).is_none() => {
                tracing::debug!("Unknown post '{}', showing list", id);
                View::List { category: None }
            }
            View::ActivityDetail { ref id } if store.activity(id).is_none() => {
                tracing::debug!("Unknown activity '{}', showing list", id);
                View::ActivityList
            }
            view => view,
        }
    }

    pub fn is_detail(&self) -> bool {
        matches!(self, View::PostDetail { .. } | View::ActivityDetail { .. })
    }
}

/// Link to an activity's detail view
pub fn activity_url(id: &str) -> String {
    with_query(ACTIVITIES_PAGE, "activity", id)
}
