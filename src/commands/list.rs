//! List site content

use anyhow::Result;

use crate::content::{sort_newest_first, ContentStore, Loaded};
use crate::Studio;

/// List site content by type
pub fn run(studio: &Studio, content_type: &str) -> Result<()> {
    let store = studio.load_store();
    for line in lines(&store, content_type)? {
        println!("{}", line);
    }
    Ok(())
}

fn lines(store: &ContentStore, content_type: &str) -> Result<Vec<String>> {
    let mut out = Vec::new();

    match content_type {
        "post" | "posts" => {
            let mut posts: Vec<_> = loaded(&store.posts)?.iter().collect();
            sort_newest_first(&mut posts);
            out.push(format!("Posts ({}):", posts.len()));
            for post in posts {
                out.push(format!(
                    "  {} - {} [{}] ({})",
                    post.date, post.title, post.category, post.id
                ));
            }
        }
        "student" | "students" => {
            let students = loaded(&store.students)?;
            out.push(format!("Students ({}):", students.len()));
            for student in students {
                let link = match store.linked_post(student) {
                    Some(post) => format!(" -> {}", post.id),
                    None => String::new(),
                };
                out.push(format!(
                    "  {} [{}]{}",
                    student.display_name(),
                    student.university_display(),
                    link
                ));
            }
        }
        "activity" | "activities" => {
            let activities = loaded(&store.activities)?;
            out.push(format!("Activities ({}):", activities.len()));
            for activity in activities {
                let starts = activity
                    .starts_on()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|_| "?".to_string());
                out.push(format!(
                    "  {} - {} [{}] ({})",
                    starts,
                    activity.title,
                    activity.date_label(),
                    activity.id
                ));
            }
        }
        "testimonial" | "testimonials" => {
            let testimonials = loaded(&store.testimonials)?;
            out.push(format!("Testimonials ({}):", testimonials.len()));
            for t in testimonials {
                out.push(format!("  {} - {} {}", t.name, t.major, t.university));
            }
        }
        "category" | "categories" => {
            let posts = loaded(&store.posts)?;
            let categories = store.categories();
            out.push(format!("Categories ({}):", categories.len()));
            for category in categories {
                let count = posts.iter().filter(|p| p.in_category(category)).count();
                out.push(format!("  {} ({})", category, count));
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, student, activity, testimonial, category",
                content_type
            );
        }
    }

    Ok(out)
}

fn loaded<T>(collection: &Loaded<T>) -> Result<&[T]> {
    match collection {
        Loaded::Ready(items) => Ok(items),
        Loaded::Failed(reason) => anyhow::bail!("{}", reason),
    }
}
