//! Shared test data

use super::{Activity, ActivityMeta, ContentStore, GalleryImage, Loaded, Post, Student, Testimonial};

pub fn post(id: &str, category: &str, date: &str) -> Post {
    Post {
        id: id.to_string(),
        title: format!("Title {}", id),
        excerpt: format!("Excerpt {}", id),
        category: category.to_string(),
        image: format!("/images/{}.jpg", id),
        date: date.to_string(),
        author: None,
        tags: vec!["art".to_string()],
        content_file: Some(format!("content/posts/{}.html", id)),
    }
}

/// Newest first: p7 p5 p2 p3 p1 p4 p6 p8
pub fn posts() -> Vec<Post> {
    vec![
        post("p1", "Knowledge", "2024-01-10"),
        post("p2", "Video", "2024-03-05"),
        post("p3", "Knowledge", "2024-02-20"),
        post("p4", "Cooking", "2023-12-01"),
        post("p5", "Knowledge", "2024-04-01"),
        post("p6", "Video", "2023-11-11"),
        post("p7", "Cooking", "2024-05-15"),
        post("p8", "Knowledge", "2022-07-07"),
    ]
}

pub fn students() -> Vec<Student> {
    vec![
        Student {
            nickname: "Mint".to_string(),
            name: "Mintra K.".to_string(),
            school: "Satri".to_string(),
            university_name: "Chulalongkorn".to_string(),
            faculty: "Architecture".to_string(),
            major: "Industrial Design".to_string(),
            profile_image: "/img/mint.jpg".to_string(),
            portfolio_images: vec!["/img/mint-1.jpg".to_string()],
            article_id: Some("p2".to_string()),
            ..Default::default()
        },
        Student {
            nickname: "Ploy".to_string(),
            name: "Ploypailin S.".to_string(),
            university_name: "Silpakorn".to_string(),
            article_id: Some("missing".to_string()),
            ..Default::default()
        },
        Student {
            nickname: "Ton".to_string(),
            name: "Tonkla P.".to_string(),
            university: "KMITL".to_string(),
            ..Default::default()
        },
    ]
}

pub fn activity(id: &str, date: &str, month: &str, year: &str) -> Activity {
    Activity {
        id: id.to_string(),
        title: format!("Activity {}", id),
        category: "Workshop".to_string(),
        excerpt: format!("About {}", id),
        image: format!("/images/{}.jpg", id),
        date: date.to_string(),
        month: month.to_string(),
        year: year.to_string(),
        location: "Studio".to_string(),
        meta: ActivityMeta {
            time: "09:00 - 16:00".to_string(),
            participants: "20".to_string(),
            cost: "500".to_string(),
            form_link: Some("https://forms.example.com/a".to_string()),
            register_link: Some("https://example.com/register".to_string()),
        },
        content_file: Some(format!("content/activities/{}.html", id)),
    }
}

/// Already newest first, as the loader leaves them
pub fn activities() -> Vec<Activity> {
    vec![
        activity("a3", "21-23", "มี.ค.", "2568"),
        activity("a2", "5", "ม.ค.", "2568"),
        activity("a1", "1", "ต.ค.", "2567"),
    ]
}

pub fn testimonials() -> Vec<Testimonial> {
    ["Aom", "Bee", "Cake"]
        .iter()
        .map(|name| Testimonial {
            name: name.to_string(),
            university: "CU".to_string(),
            major: "Architecture".to_string(),
            quote: format!("{} says thanks", name),
            photo: format!("/img/{}.jpg", name),
        })
        .collect()
}

pub fn gallery(count: usize) -> Vec<GalleryImage> {
    (0..count)
        .map(|i| GalleryImage {
            src: format!("/atmosphere/{}.jpg", i),
            alt: format!("Studio {}", i),
        })
        .collect()
}

pub fn store() -> ContentStore {
    ContentStore {
        posts: Loaded::Ready(posts()),
        students: Loaded::Ready(students()),
        activities: Loaded::Ready(activities()),
        testimonials: Loaded::Ready(testimonials()),
        gallery: Loaded::Ready(gallery(15)),
    }
}
