//! Content loader - reads the JSON collections and body files from the site root

use serde::de::DeserializeOwned;
use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use super::activity::sort_activities;
use super::media::{GalleryFile, TestimonialFile};
use super::{ContentStore, Loaded, MarkdownRenderer};
use crate::error::{SiteError, SiteResult};
use crate::Studio;

/// Loads content from the site root
pub struct ContentLoader<'a> {
    studio: &'a Studio,
    renderer: MarkdownRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(studio: &'a Studio) -> Self {
        Self {
            studio,
            renderer: MarkdownRenderer::new(),
        }
    }

    /// Load every collection. A collection that fails is recorded as
    /// [`Loaded::Failed`] and does not prevent the others from loading.
    pub fn load_store(&self) -> ContentStore {
        let paths = &self.studio.config.content;

        let posts = self.load_collection(&paths.posts);
        let students = self.load_collection(&paths.students);
        let activities = match self.load_collection(&paths.activities) {
            Loaded::Ready(mut items) => {
                sort_activities(&mut items);
                Loaded::Ready(items)
            }
            failed => failed,
        };
        let testimonials = self.load_wrapped(&paths.testimonials, |f: TestimonialFile| {
            f.testimonials
        });
        let gallery = self.load_wrapped(&paths.gallery, |f: GalleryFile| f.images);

        let store = ContentStore {
            posts,
            students,
            activities,
            testimonials,
            gallery,
        };

        tracing::info!(
            "Loaded {} posts, {} students, {} activities, {} testimonials, {} gallery images",
            store.posts.items().len(),
            store.students.items().len(),
            store.activities.items().len(),
            store.testimonials.items().len(),
            store.gallery.items().len()
        );

        for issue in store.validate() {
            tracing::warn!("Content check: {}", issue);
        }

        store
    }

    /// Load a top-level JSON array
    fn load_collection<T: DeserializeOwned>(&self, relative: &str) -> Loaded<T> {
        self.load_wrapped(relative, |items: Vec<T>| items)
    }

    /// Load a JSON document and extract the list from it
    fn load_wrapped<F, T, W>(&self, relative: &str, extract: F) -> Loaded<T>
    where
        W: DeserializeOwned,
        F: FnOnce(W) -> Vec<T>,
    {
        match self.read_json::<W>(relative) {
            Ok(doc) => Loaded::Ready(extract(doc)),
            Err(e) => {
                tracing::warn!("Failed to load {}: {}", relative, e);
                Loaded::Failed(e.to_string())
            }
        }
    }

    fn read_json<W: DeserializeOwned>(&self, relative: &str) -> SiteResult<W> {
        let path = site_path(&self.studio.base_dir, relative)?;
        let content = fs::read_to_string(&path).map_err(|source| SiteError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| SiteError::Parse { path, source })
    }

    /// Read the body of a post or activity.
    ///
    /// HTML bodies are returned as stored; Markdown bodies are rendered.
    pub fn load_body(&self, content_file: &str) -> SiteResult<String> {
        let path = site_path(&self.studio.base_dir, content_file)?;
        let raw = read_body(&path, content_file)?;
        if MarkdownRenderer::handles(content_file) {
            Ok(self.renderer.render(&raw))
        } else {
            Ok(raw)
        }
    }
}

/// Join a site-relative content path onto the root. Paths that would climb
/// out of the root are refused.
pub fn site_path(base_dir: &Path, relative: &str) -> SiteResult<PathBuf> {
    let relative = Path::new(relative.trim_start_matches('/'));
    let escapes = relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
    if escapes {
        return Err(SiteError::InvalidPath(relative.display().to_string()));
    }
    Ok(base_dir.join(relative))
}

fn read_body(path: &Path, content_file: &str) -> SiteResult<String> {
    fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SiteError::BodyMissing(content_file.to_string()),
        _ => SiteError::Io {
            path: path.to_path_buf(),
            source,
        },
    })
}
