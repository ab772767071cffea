//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters left alone by `encodeURIComponent`
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a query value the way browsers encode URI components
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Build `<path>?<key>=<value>` with the value encoded
pub fn with_query(path: &str, key: &str, value: &str) -> String {
    format!("{}?{}={}", path, key, encode_component(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("Food Story"), "Food%20Story");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("it's-ok_(1)"), "it's-ok_(1)");
        assert_eq!(
            encode_component("ความรู้"),
            "%E0%B8%84%E0%B8%A7%E0%B8%B2%E0%B8%A1%E0%B8%A3%E0%B8%B9%E0%B9%89"
        );
    }

    #[test]
    fn test_with_query() {
        assert_eq!(
            with_query("/stories.html", "category", "Food Story"),
            "/stories.html?category=Food%20Story"
        );
    }
}
