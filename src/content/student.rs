//! Student portfolio model

use serde::{Deserialize, Serialize};

/// A student entry from `content/students.json`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Student {
    pub nickname: String,
    pub name: String,
    pub school: String,
    pub university_name: String,
    /// Older entries carry a single combined university string
    pub university: String,
    pub faculty: String,
    pub major: String,
    pub profile_image: String,
    pub portfolio_images: Vec<String>,
    /// Id of the post written about this student, if any
    pub article_id: Option<String>,
}

impl Student {
    /// `<nickname> - <name>`
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.nickname, self.name)
    }

    /// University line on the profile card
    pub fn university_display(&self) -> &str {
        if self.university_name.is_empty() {
            &self.university
        } else {
            &self.university_name
        }
    }

    /// Long form used by the portfolio modal: major, faculty, university
    pub fn admission_summary(&self) -> String {
        if self.major.is_empty() {
            self.university.clone()
        } else {
            format!("{} {} {}", self.major, self.faculty, self.university_name)
        }
    }

    pub fn article_id(&self) -> Option<&str> {
        self.article_id.as_deref().filter(|id| !id.is_empty())
    }
}
