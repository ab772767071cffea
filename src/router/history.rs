//! Navigation history
//!
//! Mirrors what a browser does with `pushState` and `popstate`: each
//! transition pushes a location, back/forward move the cursor, and the view
//! is always re-derived from the URL under the cursor.

use super::{Location, Page, View, STORIES_PAGE};

/// Section the list transitions scroll to
pub const LIST_ANCHOR: &str = "duangjai-space";

/// Section a post detail scrolls to
pub const DETAIL_ANCHOR: &str = "post-detail-view";

/// One history entry: the URL plus the section it was scrolled to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub location: Location,
    pub anchor: Option<String>,
}

impl HistoryEntry {
    fn new(location: Location, anchor: Option<&str>) -> Self {
        Self {
            location,
            anchor: anchor.map(str::to_string),
        }
    }

    /// Opening a post from `from`. Details only open in place on the stories
    /// page; from anywhere else this is the stories page itself.
    pub fn post_detail(from: &Location, id: &str) -> Self {
        let path = if from.page() == Some(Page::Stories) {
            from.path.clone()
        } else {
            STORIES_PAGE.to_string()
        };
        let location = Location {
            path,
            query: vec![("post".to_string(), id.to_string())],
        };
        Self::new(location, Some(DETAIL_ANCHOR))
    }

    /// The post grid filtered to one category
    pub fn category_filter(from: &Location, category: &str) -> Self {
        let location = Location {
            path: list_path(from),
            query: vec![("category".to_string(), category.to_string())],
        };
        Self::new(location, Some(LIST_ANCHOR))
    }

    /// The unfiltered post grid
    pub fn all_posts(from: &Location) -> Self {
        Self::new(Location::bare(&list_path(from)), None)
    }

    /// Leaving a post detail for the unfiltered grid
    pub fn leave_detail(from: &Location) -> Self {
        Self::new(Location::bare(&from.path), Some(LIST_ANCHOR))
    }

    /// Link target: the URL plus the `#anchor` fragment
    pub fn href(&self) -> String {
        match &self.anchor {
            Some(anchor) => format!("{}#{}", self.location.to_url(), anchor),
            None => self.location.to_url(),
        }
    }
}

/// Category tabs only exist on the stories page
fn list_path(from: &Location) -> String {
    if from.page() == Some(Page::Stories) {
        from.path.clone()
    } else {
        STORIES_PAGE.to_string()
    }
}

/// Outcome of a navigation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// State changed in place; render this view
    Push(View),
    /// Full page load of another page
    Redirect(String),
}

/// Session history for one visitor
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl Navigator {
    /// Start a session at a page URL. Returns `None` for non-page URLs.
    pub fn new(url: &str) -> Option<Self> {
        let location = Location::parse(url);
        location.page()?;
        Some(Self {
            entries: vec![HistoryEntry::new(location, None)],
            index: 0,
        })
    }

    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    /// View derived from the current URL
    pub fn view(&self) -> View {
        View::from_location(&self.current().location).unwrap_or(View::Home)
    }

    /// Number of entries in the session
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Open a post. Off the stories page this is a full load of it.
    pub fn navigate_to_post(&mut self, id: &str) -> Navigation {
        let entry = HistoryEntry::post_detail(&self.current().location, id);
        let in_place = entry.location.path == self.current().location.path;
        let href = entry.href();
        self.push(entry);

        if in_place {
            Navigation::Push(self.view())
        } else {
            Navigation::Redirect(href)
        }
    }

    /// Show only posts of one category
    pub fn filter_by_category(&mut self, category: &str) -> View {
        let entry = HistoryEntry::category_filter(&self.current().location, category);
        self.push(entry);
        self.view()
    }

    /// Show all posts again
    pub fn clear_category_filter(&mut self) -> View {
        let entry = HistoryEntry::all_posts(&self.current().location);
        self.push(entry);
        self.view()
    }

    /// Leave a post detail and return to the unfiltered grid
    pub fn exit_post_detail(&mut self) -> View {
        let entry = HistoryEntry::leave_detail(&self.current().location);
        self.push(entry);
        self.view()
    }

    /// Browser back. Returns the restored view, or `None` at the start.
    pub fn back(&mut self) -> Option<View> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.view())
    }

    /// Browser forward. Returns the restored view, or `None` at the end.
    pub fn forward(&mut self) -> Option<View> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.view())
    }

    fn push(&mut self, entry: HistoryEntry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index = self.entries.len() - 1;
        tracing::debug!("History push: {}", self.current().href());
    }
}
