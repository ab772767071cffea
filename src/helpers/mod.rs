//! Helper functions shared by the renderers and the server
//!
//! Small, pure functions for escaping, URL building and date formatting.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
