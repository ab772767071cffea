//! Validate the collections

use anyhow::Result;

use crate::content::ContentStore;
use crate::Studio;

/// Report load failures and content issues. With `strict`, any finding is
/// an error.
pub fn run(studio: &Studio, strict: bool) -> Result<()> {
    let store = studio.load_store();
    let findings = findings(&store);

    if findings.is_empty() {
        println!("Content OK");
        return Ok(());
    }

    for finding in &findings {
        println!("  {}", finding);
    }
    println!("{} issue(s) found", findings.len());

    if strict {
        anyhow::bail!("content check failed with {} issue(s)", findings.len());
    }
    Ok(())
}

fn findings(store: &ContentStore) -> Vec<String> {
    let failures = [
        ("posts", store.posts.error()),
        ("students", store.students.error()),
        ("activities", store.activities.error()),
        ("testimonials", store.testimonials.error()),
        ("gallery", store.gallery.error()),
    ];

    failures
        .into_iter()
        .filter_map(|(name, error)| error.map(|e| format!("{} failed to load: {}", name, e)))
        .chain(store.validate().into_iter().map(|issue| issue.to_string()))
        .collect()
}
