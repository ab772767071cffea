//! Content module - site collections, their models and loading

mod activity;
pub mod loader;
mod markdown;
mod media;
mod post;
mod store;
mod student;

#[cfg(test)]
pub(crate) mod fixtures;

pub use activity::{parse_thai_date, sort_activities, Activity, ActivityMeta, THAI_MONTHS_SHORT};
pub use markdown::MarkdownRenderer;
pub use media::{GalleryImage, Testimonial};
pub use post::{sort_newest_first, Post};
pub use store::{ContentStore, Issue, Loaded};
pub use student::Student;
