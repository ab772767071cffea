//! Print a rendered page

use anyhow::{Context, Result};

use crate::render::PageRenderer;
use crate::rotation::RotationHub;
use crate::router::Location;
use crate::Studio;

/// Render the page at `url` the way the server would, without timers
pub fn run(studio: &Studio, url: &str, consent: bool) -> Result<()> {
    let html = render(studio, url, consent)?;
    println!("{}", html);
    Ok(())
}

pub fn render(studio: &Studio, url: &str, consent: bool) -> Result<String> {
    let store = studio.load_store();
    let snapshot = RotationHub::new(&studio.config, &store).snapshot();
    let renderer = PageRenderer::new(studio)?;
    let location = Location::parse(url);

    let page = renderer
        .render(&store, &snapshot, &location, consent)
        .with_context(|| format!("rendering {}", url))?;
    match page {
        Some(page) => Ok(page.html),
        None => anyhow::bail!("{} is not a page", location.path),
    }
}
