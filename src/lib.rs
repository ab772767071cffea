//! duangjai-rs: server for the Duangjai studio site
//!
//! Pages are rendered per request from JSON collections on disk with
//! embedded Tera templates. The query string selects the view, and timer
//! driven rotators push slider, testimonial and gallery changes to open
//! pages over a WebSocket.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod helpers;
pub mod i18n;
pub mod render;
pub mod rotation;
pub mod router;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::{Path, PathBuf};

/// The site application: configuration plus the root everything is read from
#[derive(Clone)]
pub struct Studio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Site root; collections, bodies and static files live under it
    pub base_dir: PathBuf,
}

impl Studio {
    /// Create a new instance from a directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Ok(Self { config, base_dir })
    }

    /// Load every collection
    pub fn load_store(&self) -> content::ContentStore {
        content::loader::ContentLoader::new(self).load_store()
    }

    /// Localized strings, with `languages/` overrides applied
    pub fn i18n(&self) -> Result<i18n::I18n> {
        let mut i18n = i18n::I18n::new(&self.config.language);
        i18n.load_languages(self.base_dir.join("languages"))?;
        Ok(i18n)
    }
}
