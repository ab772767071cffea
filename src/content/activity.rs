//! Activity model and Thai calendar dates

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{SiteError, SiteResult};

/// Abbreviated Thai month names, January first
pub const THAI_MONTHS_SHORT: [&str; 12] = [
    "ม.ค.", "ก.พ.", "มี.ค.", "เม.ย.", "พ.ค.", "มิ.ย.", "ก.ค.", "ส.ค.", "ก.ย.", "ต.ค.", "พ.ย.", "ธ.ค.",
];

/// Offset between the Buddhist Era and the Gregorian calendar
pub const BUDDHIST_ERA_OFFSET: i32 = 543;

lazy_static! {
    static ref LEADING_DAY: Regex = Regex::new(r"^\s*(\d{1,2})").unwrap();
}

/// An event listing from `content/activities.json`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub image: String,

    /// Day of month, or a range such as `21-23`
    #[serde(deserialize_with = "string_or_number")]
    pub date: String,
    /// Abbreviated Thai month, see [`THAI_MONTHS_SHORT`]
    pub month: String,
    /// Buddhist Era year
    #[serde(deserialize_with = "string_or_number")]
    pub year: String,

    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub meta: ActivityMeta,
    #[serde(default)]
    pub content_file: Option<String>,
}

/// Schedule details shown in the activity sidebar
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityMeta {
    pub time: String,
    #[serde(deserialize_with = "string_or_number")]
    pub participants: String,
    pub cost: String,
    pub form_link: Option<String>,
    pub register_link: Option<String>,
}

impl Activity {
    /// Gregorian start date of the activity
    pub fn starts_on(&self) -> SiteResult<NaiveDate> {
        parse_thai_date(&self.date, &self.month, &self.year)
    }

    /// `<date> <month> <year>` as written in the listing
    pub fn date_label(&self) -> String {
        format!("{} {} {}", self.date, self.month, self.year)
    }

    /// Registration URL; the form link wins over the register link
    pub fn registration_link(&self) -> Option<&str> {
        non_empty(&self.meta.form_link).or_else(|| non_empty(&self.meta.register_link))
    }
}

fn non_empty(link: &Option<String>) -> Option<&str> {
    link.as_deref().filter(|l| !l.trim().is_empty())
}

/// Parse a Thai calendar date.
///
/// `date` may be a single day or a range (`"21-23"`), in which case the first
/// day is used. `year` is in the Buddhist Era.
pub fn parse_thai_date(date: &str, month: &str, year: &str) -> SiteResult<NaiveDate> {
    let invalid = || SiteError::InvalidDate(format!("{} {} {}", date, month, year));

    let day: u32 = LEADING_DAY
        .captures(date)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .ok_or_else(invalid)?;

    let month_index = THAI_MONTHS_SHORT
        .iter()
        .position(|m| *m == month.trim())
        .ok_or_else(invalid)?;

    let year_be: i32 = year.trim().parse().map_err(|_| invalid())?;
    let year_ce = year_be
        .checked_sub(BUDDHIST_ERA_OFFSET)
        .ok_or_else(invalid)?;

    NaiveDate::from_ymd_opt(year_ce, month_index as u32 + 1, day).ok_or_else(invalid)
}

/// Sort activities newest first; undatable entries go last.
pub fn sort_activities(activities: &mut [Activity]) {
    activities.sort_by_cached_key(|a| std::cmp::Reverse(a.starts_on().ok()));
}

/// Accept either a JSON string or a number and keep it as text.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, date: &str, month: &str, year: &str) -> Activity {
        Activity {
            id: id.to_string(),
            title: id.to_string(),
            category: String::new(),
            excerpt: String::new(),
            image: String::new(),
            date: date.to_string(),
            month: month.to_string(),
            year: year.to_string(),
            location: String::new(),
            meta: ActivityMeta::default(),
            content_file: None,
        }
    }

    #[test]
    fn test_parse_single_day() {
        let date = parse_thai_date("5", "ม.ค.", "2568").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_range_takes_first_day() {
        let date = parse_thai_date("21-23", "ธ.ค.", "2567").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 21).unwrap());
    }

    #[test]
    fn test_parse_rejects_unknown_month() {
        assert!(parse_thai_date("1", "Jan", "2567").is_err());
        assert!(parse_thai_date("x", "ม.ค.", "2567").is_err());
        assert!(parse_thai_date("31", "ก.พ.", "2567").is_err());
    }

    #[test]
    fn test_parse_rejects_out_of_range_years() {
        let min = i32::MIN.to_string();
        assert!(matches!(
            parse_thai_date("1", "ม.ค.", &min),
            Err(SiteError::InvalidDate(_))
        ));
        assert!(parse_thai_date("1", "ม.ค.", &i32::MAX.to_string()).is_err());
    }

    #[test]
    fn test_numeric_fields_deserialize() {
        let json = r#"{
            "id": "camp",
            "title": "Art Camp",
            "date": 14,
            "month": "ก.พ.",
            "year": 2568,
            "meta": { "time": "09:00", "participants": 30, "cost": "ฟรี",
                      "formLink": "", "registerLink": "https://example.com/r" }
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.year, "2568");
        assert_eq!(activity.meta.participants, "30");
        assert_eq!(activity.registration_link(), Some("https://example.com/r"));
        assert_eq!(
            activity.starts_on().unwrap(),
            NaiveDate::from_ymd_opt(2025, 2, 14).unwrap()
        );
    }

    #[test]
    fn test_sort_activities_newest_first() {
        let mut list = vec![
            activity("old", "1", "ม.ค.", "2566"),
            activity("bad", "?", "ม.ค.", "2568"),
            activity("new", "10-12", "มี.ค.", "2568"),
            activity("mid", "30", "ก.ย.", "2567"),
        ];
        sort_activities(&mut list);
        let ids: Vec<_> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["new", "mid", "old", "bad"]);
    }
}
