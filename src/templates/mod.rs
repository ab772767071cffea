//! Built-in site templates using the Tera template engine
//!
//! All page templates are embedded in the binary.

use std::collections::HashMap;
use tera::{Context, Tera};

use crate::error::SiteResult;
use crate::helpers::{category_badge_class, display_post_date};

/// Template renderer with the embedded site templates
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> SiteResult<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("site/layout.html")),
            ("home.html", include_str!("site/home.html")),
            ("stories.html", include_str!("site/stories.html")),
            ("portfolio.html", include_str!("site/portfolio.html")),
            ("activities.html", include_str!("site/activities.html")),
            ("courses.html", include_str!("site/courses.html")),
            // Partials
            (
                "partials/post_card.html",
                include_str!("site/partials/post_card.html"),
            ),
            (
                "partials/post_grid.html",
                include_str!("site/partials/post_grid.html"),
            ),
            (
                "partials/skeleton.html",
                include_str!("site/partials/skeleton.html"),
            ),
            (
                "partials/student_grid.html",
                include_str!("site/partials/student_grid.html"),
            ),
            (
                "partials/activity_grid.html",
                include_str!("site/partials/activity_grid.html"),
            ),
            (
                "partials/post_detail.html",
                include_str!("site/partials/post_detail.html"),
            ),
            (
                "partials/activity_detail.html",
                include_str!("site/partials/activity_detail.html"),
            ),
            (
                "partials/hero_slider.html",
                include_str!("site/partials/hero_slider.html"),
            ),
            (
                "partials/testimonials.html",
                include_str!("site/partials/testimonials.html"),
            ),
            (
                "partials/atmosphere.html",
                include_str!("site/partials/atmosphere.html"),
            ),
            (
                "partials/consent.html",
                include_str!("site/partials/consent.html"),
            ),
        ])?;

        // Register custom filters
        tera.register_filter("thai_date", thai_date_filter);
        tera.register_filter("badge_class", badge_class_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> SiteResult<String> {
        Ok(self.tera.render(template_name, context)?)
    }
}

/// Tera filter: `YYYY-MM-DD` to a Thai long date
fn thai_date_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("thai_date", "value", String, value);
    Ok(tera::Value::String(display_post_date(&s)))
}

/// Tera filter: badge colour class for a category
fn badge_class_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("badge_class", "value", String, value);
    Ok(tera::Value::String(category_badge_class(&s).to_string()))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };
    Ok(tera::Value::String(crate::helpers::truncate(
        &s,
        length,
        Some("…"),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_compile() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_filters() {
        let value = tera::Value::String("2024-01-15".to_string());
        let out = thai_date_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("15 มกราคม 2567".to_string()));

        let value = tera::Value::String("Knowledge".to_string());
        let out = badge_class_filter(&value, &HashMap::new()).unwrap();
        assert_eq!(out, tera::Value::String("badge-orange".to_string()));
    }
}
