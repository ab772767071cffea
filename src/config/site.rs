//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub url: String,

    // Collections
    #[serde(default)]
    pub content: ContentPaths,

    // Page limits
    #[serde(default)]
    pub home: HomeLimits,

    // Rotators
    #[serde(default)]
    pub slider: SliderConfig,
    #[serde(default)]
    pub testimonials: CarouselConfig,
    #[serde(default)]
    pub gallery: GalleryConfig,

    #[serde(default)]
    pub server: ServerConfig,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Duangjai Studio".to_string(),
            description: String::new(),
            language: "th".to_string(),
            url: "http://localhost:8082".to_string(),
            content: ContentPaths::default(),
            home: HomeLimits::default(),
            slider: SliderConfig::default(),
            testimonials: CarouselConfig::default(),
            gallery: GalleryConfig::default(),
            server: ServerConfig::default(),
            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }
}

/// Locations of the JSON collections, relative to the site root
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentPaths {
    pub posts: String,
    pub students: String,
    pub activities: String,
    pub testimonials: String,
    pub gallery: String,
}

impl Default for ContentPaths {
    fn default() -> Self {
        Self {
            posts: "content/posts.json".to_string(),
            students: "content/students.json".to_string(),
            activities: "content/activities.json".to_string(),
            testimonials: "data/testimonials.json".to_string(),
            gallery: "data/atmosphere.json".to_string(),
        }
    }
}

/// How many items the homepage shows per section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeLimits {
    pub posts: usize,
    pub students: usize,
    pub activities: usize,
}

impl Default for HomeLimits {
    fn default() -> Self {
        Self {
            posts: 6,
            students: 12,
            activities: 2,
        }
    }
}

/// Hero slider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SliderConfig {
    /// Number of newest posts shown after the main hero slide
    pub posts: usize,
    pub interval_ms: u64,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            posts: 5,
            interval_ms: 6000,
        }
    }
}

/// Testimonial carousel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CarouselConfig {
    pub interval_ms: u64,
    pub shuffle: bool,
}

impl Default for CarouselConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5000,
            shuffle: true,
        }
    }
}

/// Atmosphere gallery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub home_slots: usize,
    pub page_slots: usize,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub fade_ms: u64,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            home_slots: 8,
            page_slots: 12,
            min_delay_ms: 3000,
            max_delay_ms: 6000,
            fade_ms: 500,
        }
    }
}

/// Server defaults, overridable from the command line
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
    pub ip: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8082,
            ip: "localhost".to_string(),
        }
    }
}
