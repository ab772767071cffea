//! In-memory content store shared by the renderers

use indexmap::IndexSet;
use std::collections::HashSet;
use std::fmt;

use super::{Activity, GalleryImage, Post, Student, Testimonial};

/// Outcome of loading one collection
#[derive(Debug, Clone)]
pub enum Loaded<T> {
    Ready(Vec<T>),
    /// The collection could not be loaded; holds the reason for the logs
    Failed(String),
}

impl<T> Loaded<T> {
    /// Items of the collection; empty when loading failed
    pub fn items(&self) -> &[T] {
        match self {
            Loaded::Ready(items) => items,
            Loaded::Failed(_) => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Loaded::Failed(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Loaded::Ready(_) => None,
            Loaded::Failed(reason) => Some(reason),
        }
    }
}

impl<T> Default for Loaded<T> {
    fn default() -> Self {
        Loaded::Ready(Vec::new())
    }
}

/// All collections of the site, loaded once and read by every request
#[derive(Debug, Clone, Default)]
pub struct ContentStore {
    /// Posts in file order
    pub posts: Loaded<Post>,
    pub students: Loaded<Student>,
    /// Activities sorted newest first
    pub activities: Loaded<Activity>,
    pub testimonials: Loaded<Testimonial>,
    pub gallery: Loaded<GalleryImage>,
}

impl ContentStore {
    pub fn post(&self, id: &str) -> Option<&Post> {
        self.posts.items().iter().find(|p| p.id == id)
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.items().iter().find(|a| a.id == id)
    }

    /// Unique post categories in first-seen order
    pub fn categories(&self) -> IndexSet<&str> {
        self.posts
            .items()
            .iter()
            .map(|p| p.category.as_str())
            .collect()
    }

    /// The student whose portfolio article is the given post
    pub fn student_for_post(&self, post_id: &str) -> Option<&Student> {
        self.students
            .items()
            .iter()
            .find(|s| s.article_id() == Some(post_id))
    }

    /// Article link of a student, only if it resolves to a post
    pub fn linked_post(&self, student: &Student) -> Option<&Post> {
        student.article_id().and_then(|id| self.post(id))
    }

    /// Check id uniqueness and student article links
    pub fn validate(&self) -> Vec<Issue> {
        let mut issues = Vec::new();

        let mut seen = HashSet::new();
        for post in self.posts.items() {
            if !seen.insert(post.id.as_str()) {
                issues.push(Issue::DuplicateId {
                    collection: "posts",
                    id: post.id.clone(),
                });
            }
        }

        let mut seen = HashSet::new();
        for activity in self.activities.items() {
            if !seen.insert(activity.id.as_str()) {
                issues.push(Issue::DuplicateId {
                    collection: "activities",
                    id: activity.id.clone(),
                });
            }
            if activity.starts_on().is_err() {
                issues.push(Issue::UndatedActivity {
                    id: activity.id.clone(),
                });
            }
        }

        for student in self.students.items() {
            if let Some(article_id) = student.article_id() {
                if self.post(article_id).is_none() {
                    issues.push(Issue::DanglingArticle {
                        student: student.display_name(),
                        article_id: article_id.to_string(),
                    });
                }
            }
        }

        issues
    }
}

/// A consistency problem found by [`ContentStore::validate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    DuplicateId {
        collection: &'static str,
        id: String,
    },
    DanglingArticle {
        student: String,
        article_id: String,
    },
    UndatedActivity {
        id: String,
    },
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::DuplicateId { collection, id } => {
                write!(f, "duplicate id '{}' in {}", id, collection)
            }
            Issue::DanglingArticle {
                student,
                article_id,
            } => write!(
                f,
                "student '{}' links to unknown post '{}'",
                student, article_id
            ),
            Issue::UndatedActivity { id } => {
                write!(f, "activity '{}' has an unreadable date", id)
            }
        }
    }
}
