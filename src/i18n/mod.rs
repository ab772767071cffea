//! Localized UI strings
//!
//! Every string shown by the renderers has a built-in Thai default. A site
//! can override any of them with `languages/<lang>.yml`, using nested maps
//! or dotted keys (`error.load_failed`).

use anyhow::Result;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Built-in strings, keyed by dotted path
const DEFAULTS: &[(&str, &str)] = &[
    ("error.load_failed", "ไม่สามารถโหลดข้อมูลได้"),
    ("error.images_failed", "ไม่สามารถโหลดรูปภาพได้"),
    ("error.body_unavailable", "ไม่สามารถโหลดเนื้อหาได้"),
    ("error.body_failed", "เกิดข้อผิดพลาดในการโหลดเนื้อหา"),
    ("error.activity_body", "เนื้อหาไม่พร้อมใช้งาน"),
    ("loading", "กำลังโหลดเนื้อหา..."),
    ("action.read_more", "อ่านต่อ"),
    ("action.view_all", "ดูทั้งหมด"),
    ("action.view_more", "ดูเพิ่มเติม"),
    ("action.view_details", "ดูรายละเอียด"),
    ("action.back", "กลับ"),
    ("action.register", "สมัครเข้าร่วม"),
    ("action.register_now", "สมัครเลย"),
    ("tabs.all", "All"),
    ("post.default_author", "Admin"),
    ("post.read_time", "5 MIN READ"),
    ("sidebar.popular", "บทความยอดนิยม"),
    ("sidebar.categories", "หมวดหมู่"),
    ("student.school", "โรงเรียน"),
    ("student.university", "มหาวิทยาลัย"),
    ("student.faculty", "คณะ"),
    ("student.major", "สาขา"),
    ("student.badge", "นักเรียนในดวงใจ"),
    ("student.portfolio_of", "ผลงาน"),
    ("activity.date", "วันที่"),
    ("activity.time", "เวลา"),
    ("activity.location", "สถานที่"),
    ("activity.participants", "จำนวนที่รับ"),
    ("activity.cost", "ค่าใช้จ่าย"),
    ("testimonial.accepted_to", "Accepted to"),
    (
        "consent.message",
        "เว็บไซต์นี้ใช้คุกกี้เพื่อพัฒนาประสบการณ์การใช้งานของคุณ",
    ),
    ("consent.accept", "ยอมรับ"),
    ("nav.home", "หน้าแรก"),
    ("nav.stories", "เรื่องราว"),
    ("nav.portfolio", "ผลงานนักเรียน"),
    ("nav.activities", "กิจกรรม"),
    ("nav.courses", "คอร์สเรียน"),
];

/// Internationalization handler
pub struct I18n {
    /// Current language
    language: String,
    /// Language data: lang -> key -> translation
    translations: HashMap<String, HashMap<String, serde_yaml::Value>>,
}

impl I18n {
    /// Create a new i18n handler
    pub fn new(language: &str) -> Self {
        Self {
            language: language.to_string(),
            translations: HashMap::new(),
        }
    }

    /// Load `<lang>.yml` files from a directory
    pub fn load_languages<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        if !dir.exists() {
            return Ok(());
        }

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            let ext = path.extension().and_then(|e| e.to_str());
            if !path.is_file() || !matches!(ext, Some("yml") | Some("yaml")) {
                continue;
            }

            let lang = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("th")
                .to_string();

            let content = fs::read_to_string(&path)?;
            match serde_yaml::from_str::<HashMap<String, serde_yaml::Value>>(&content) {
                Ok(data) => {
                    self.translations.insert(lang, data);
                    tracing::debug!("Loaded language file: {:?}", path);
                }
                Err(e) => {
                    tracing::warn!("Failed to parse language file {:?}: {}", path, e);
                }
            }
        }

        Ok(())
    }

    /// Get the current language
    pub fn language(&self) -> &str {
        &self.language
    }

    /// Get a translation by dotted key
    pub fn get(&self, key: &str) -> String {
        if let Some(lang_data) = self.translations.get(&self.language) {
            if let Some(value) = get_nested_value(lang_data, key) {
                return yaml_value_to_string(value);
            }
        }

        DEFAULTS
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    /// All strings for the current language, overrides applied over the
    /// defaults. Keys are nested maps so templates can write `t.error.load_failed`.
    pub fn table(&self) -> serde_json::Value {
        let mut flat: HashMap<String, String> = DEFAULTS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        if let Some(lang_data) = self.translations.get(&self.language) {
            flatten_translations(lang_data, "", &mut flat);
        }

        let mut root = serde_json::Map::new();
        for (key, value) in flat {
            insert_nested(&mut root, &key, value);
        }
        serde_json::Value::Object(root)
    }
}

impl Default for I18n {
    fn default() -> Self {
        Self::new("th")
    }
}

/// Get a nested value from a YAML map using dot notation
fn get_nested_value<'a>(
    data: &'a HashMap<String, serde_yaml::Value>,
    key: &str,
) -> Option<&'a serde_yaml::Value> {
    if let Some(value) = data.get(key) {
        return Some(value);
    }

    let parts: Vec<&str> = key.split('.').collect();
    let mut current: Option<&serde_yaml::Value> = data.get(parts[0]);

    for part in &parts[1..] {
        match current {
            Some(serde_yaml::Value::Mapping(map)) => {
                current = map.get(serde_yaml::Value::String(part.to_string()));
            }
            _ => return None,
        }
    }

    current
}

/// Convert a YAML value to a string
fn yaml_value_to_string(value: &serde_yaml::Value) -> String {
    match value {
        serde_yaml::Value::String(s) => s.clone(),
        serde_yaml::Value::Number(n) => n.to_string(),
        serde_yaml::Value::Bool(b) => b.to_string(),
        serde_yaml::Value::Null => String::new(),
        _ => format!("{:?}", value),
    }
}

/// Flatten translations into a HashMap with dot-notation keys
fn flatten_translations(
    data: &HashMap<String, serde_yaml::Value>,
    prefix: &str,
    result: &mut HashMap<String, String>,
) {
    for (key, value) in data {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            serde_yaml::Value::Mapping(map) => {
                let nested: HashMap<String, serde_yaml::Value> = map
                    .iter()
                    .filter_map(|(k, v)| k.as_str().map(|k| (k.to_string(), v.clone())))
                    .collect();
                flatten_translations(&nested, &full_key, result);
            }
            serde_yaml::Value::Sequence(_) | serde_yaml::Value::Tagged(_) => {}
            scalar => {
                result.insert(full_key, yaml_value_to_string(scalar));
            }
        }
    }
}

fn insert_nested(root: &mut serde_json::Map<String, serde_json::Value>, key: &str, value: String) {
    match key.split_once('.') {
        None => {
            root.insert(key.to_string(), serde_json::Value::String(value));
        }
        Some((head, rest)) => {
            let child = root
                .entry(head.to_string())
                .or_insert_with(|| serde_json::Value::Object(serde_json::Map::new()));
            if !child.is_object() {
                *child = serde_json::Value::Object(serde_json::Map::new());
            }
            if let serde_json::Value::Object(map) = child {
                insert_nested(map, rest, value);
            }
        }
    }
}
