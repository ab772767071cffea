//! Page rendering
//!
//! A page is rendered from the location alone: the router picks the view,
//! the grid and detail builders turn the store into template data, and the
//! rotation snapshot supplies what the rotating components show right now.

mod detail;
mod grid;

pub use detail::{ActivityDetail, CategoryLink, PostDetail, SidebarPost, POPULAR_POSTS};
pub use grid::{
    activity_section, category_tabs, post_section, select_posts, student_section, ActivityCard,
    CategoryTab, PostCard, Section, StudentCard, ACTIVITY_SKELETONS, GRID_SKELETONS,
};

use anyhow::Result;
use serde::Serialize;
use tera::Context;

use crate::content::loader::ContentLoader;
use crate::content::{sort_newest_first, ContentStore, GalleryImage, Testimonial};
use crate::error::{SiteError, SiteResult};
use crate::helpers::strip_html;
use crate::i18n::I18n;
use crate::rotation::RotationSnapshot;
use crate::router::{
    HistoryEntry, Location, Page, View, ACTIVITIES_PAGE, COURSES_PAGE, DETAIL_ANCHOR,
    LIST_ANCHOR, PORTFOLIO_PAGE, STORIES_PAGE,
};
use crate::templates::TemplateRenderer;
use crate::Studio;

/// How the post area is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// Section header, category tabs and the card grid
    Grid,
    /// Full-width detail view without tabs
    Immersive,
}

impl Layout {
    pub fn for_view(view: &View) -> Self {
        if view.is_detail() {
            Layout::Immersive
        } else {
            Layout::Grid
        }
    }
}

/// A rendered page and the view it shows
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub view: View,
    pub html: String,
}

#[derive(Debug, Serialize)]
struct SiteInfo<'a> {
    title: &'a str,
    description: &'a str,
    language: &'a str,
    url: &'a str,
}

#[derive(Debug, Serialize)]
struct NavItem {
    label: String,
    url: &'static str,
    active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Slide {
    pub index: usize,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub image: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
struct SliderData {
    slides: Vec<Slide>,
    current: usize,
    total: usize,
}

/// Section ids the navigation links scroll to
#[derive(Debug, Serialize)]
struct Anchors {
    list: &'static str,
    detail: &'static str,
}

#[derive(Debug, Serialize)]
struct TestimonialData<'a> {
    items: &'a [Testimonial],
    index: usize,
    transform: &'a str,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct GalleryData<'a> {
    kind: &'static str,
    images: &'a [GalleryImage],
    error: Option<String>,
}

/// Renders site pages with the embedded templates
pub struct PageRenderer {
    studio: Studio,
    i18n: I18n,
    templates: TemplateRenderer,
}

impl PageRenderer {
    pub fn new(studio: &Studio) -> Result<Self> {
        Ok(Self {
            studio: studio.clone(),
            i18n: studio.i18n()?,
            templates: TemplateRenderer::new()?,
        })
    }

    pub fn i18n(&self) -> &I18n {
        &self.i18n
    }

    /// Render the page a location addresses. Returns `None` when the path is
    /// not one of the site pages.
    pub fn render(
        &self,
        store: &ContentStore,
        rotation: &RotationSnapshot,
        location: &Location,
        consent: bool,
    ) -> SiteResult<Option<RenderedPage>> {
        let Some(page) = location.page() else {
            return Ok(None);
        };
        let Some(view) = View::from_location(location) else {
            return Ok(None);
        };
        let view = view.resolve(store);
        tracing::debug!("Rendering {} as {:?}", location.to_url(), view);

        let config = &self.studio.config;
        let load_failed = self.i18n.get("error.load_failed");

        let mut context = Context::new();
        context.insert(
            "site",
            &SiteInfo {
                title: &config.title,
                description: &config.description,
                language: self.i18n.language(),
                url: &config.url,
            },
        );
        context.insert("page", &page);
        context.insert("layout", &Layout::for_view(&view));
        context.insert("t", &self.i18n.table());
        context.insert("consent", &consent);
        context.insert("nav", &self.nav(page));
        context.insert(
            "anchors",
            &Anchors {
                list: LIST_ANCHOR,
                detail: DETAIL_ANCHOR,
            },
        );

        let template = match &view {
            View::Home => {
                let slides = hero_slides(store, location, config.slider.posts);
                let total = slides.len() + 1;
                context.insert(
                    "slider",
                    &SliderData {
                        current: rotation.slider.current().min(total - 1),
                        total,
                        slides,
                    },
                );
                context.insert(
                    "posts",
                    &post_section(store, location, None, Some(config.home.posts), &load_failed),
                );
                context.insert(
                    "students",
                    &student_section(store, location, Some(config.home.students), &load_failed),
                );
                context.insert(
                    "activities",
                    &activity_section(store, Some(config.home.activities), &load_failed),
                );
                self.insert_testimonials(&mut context, store, rotation);
                self.insert_gallery(&mut context, store, "home", &rotation.home_gallery);
                "home.html"
            }
            View::List { category } => {
                let category = category.as_deref();
                context.insert("category", &category);
                context.insert(
                    "tabs",
                    &category_tabs(store, location, category, &self.i18n.get("tabs.all")),
                );
                context.insert(
                    "posts",
                    &post_section(store, location, category, None, &load_failed),
                );
                "stories.html"
            }
            View::PostDetail { id } => {
                let post = store
                    .post(id)
                    .ok_or_else(|| SiteError::BodyMissing(id.clone()))?;
                let body = self.load_body(post.content_file.as_deref(), id);
                let detail = PostDetail::new(post, store, location, body, &self.i18n);
                context.insert("post", &detail);
                "stories.html"
            }
            View::Portfolio => {
                context.insert(
                    "students",
                    &student_section(store, location, None, &load_failed),
                );
                "portfolio.html"
            }
            View::ActivityList => {
                context.insert("activities", &activity_section(store, None, &load_failed));
                "activities.html"
            }
            View::ActivityDetail { id } => {
                let activity = store
                    .activity(id)
                    .ok_or_else(|| SiteError::BodyMissing(id.clone()))?;
                let body = self.load_body(activity.content_file.as_deref(), id);
                context.insert("activity", &ActivityDetail::new(activity, body, &self.i18n));
                "activities.html"
            }
            View::Courses => {
                self.insert_testimonials(&mut context, store, rotation);
                self.insert_gallery(&mut context, store, "page", &rotation.page_gallery);
                "courses.html"
            }
        };

        let html = self.templates.render(template, &context)?;
        Ok(Some(RenderedPage { view, html }))
    }

    fn load_body(&self, content_file: Option<&str>, id: &str) -> SiteResult<String> {
        match content_file {
            Some(file) => ContentLoader::new(&self.studio).load_body(file),
            None => Err(SiteError::BodyMissing(id.to_string())),
        }
    }

    fn insert_testimonials(
        &self,
        context: &mut Context,
        store: &ContentStore,
        rotation: &RotationSnapshot,
    ) {
        let error = store
            .testimonials
            .is_failed()
            .then(|| self.i18n.get("error.load_failed"));
        context.insert(
            "testimonials",
            &TestimonialData {
                items: &rotation.testimonials,
                index: rotation.testimonial_index,
                transform: &rotation.testimonial_transform,
                error,
            },
        );
    }

    fn insert_gallery(
        &self,
        context: &mut Context,
        store: &ContentStore,
        kind: &'static str,
        images: &[GalleryImage],
    ) {
        let error = store
            .gallery
            .is_failed()
            .then(|| self.i18n.get("error.images_failed"));
        context.insert(
            "gallery",
            &GalleryData {
                kind,
                images,
                error,
            },
        );
    }

    fn nav(&self, current: Page) -> Vec<NavItem> {
        [
            (Page::Home, "nav.home", "/"),
            (Page::Stories, "nav.stories", STORIES_PAGE),
            (Page::Portfolio, "nav.portfolio", PORTFOLIO_PAGE),
            (Page::Activities, "nav.activities", ACTIVITIES_PAGE),
            (Page::Courses, "nav.courses", COURSES_PAGE),
        ]
        .into_iter()
        .map(|(page, key, url)| NavItem {
            label: self.i18n.get(key),
            url,
            active: page == current,
        })
        .collect()
    }
}

/// Slides after the main hero: the newest posts
pub fn hero_slides(store: &ContentStore, from: &Location, count: usize) -> Vec<Slide> {
    let mut posts: Vec<_> = store.posts.items().iter().collect();
    sort_newest_first(&mut posts);
    posts
        .into_iter()
        .take(count)
        .enumerate()
        .map(|(i, post)| Slide {
            index: i + 1,
            title: post.title.clone(),
            excerpt: strip_html(&post.excerpt),
            category: post.category.clone(),
            image: post.image.clone(),
            url: HistoryEntry::post_detail(from, &post.id).href(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{fixtures, Loaded};
    use crate::rotation::RotationHub;
    use crate::router::{Navigation, Navigator};
    use std::fs;
    use tempfile::TempDir;

    struct Site {
        _dir: TempDir,
        renderer: PageRenderer,
        store: ContentStore,
        rotation: RotationSnapshot,
    }

    fn site() -> Site {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("content/posts")).unwrap();
        fs::write(
            dir.path().join("content/posts/p2.html"),
            "<p>Mint's story</p>",
        )
        .unwrap();

        let studio = Studio::new(dir.path()).unwrap();
        let store = fixtures::store();
        let rotation = RotationHub::new(&studio.config, &store).snapshot();
        Site {
            renderer: PageRenderer::new(&studio).unwrap(),
            _dir: dir,
            store,
            rotation,
        }
    }

    impl Site {
        fn render(&self, url: &str) -> RenderedPage {
            self.renderer
                .render(&self.store, &self.rotation, &Location::parse(url), false)
                .unwrap()
                .unwrap()
        }
    }

    fn count(html: &str, needle: &str) -> usize {
        html.matches(needle).count()
    }

    #[test]
    fn test_home_page() {
        let site = site();
        let page = site.render("/");
        assert_eq!(page.view, View::Home);
        assert_eq!(count(&page.html, "class=\"post-card\""), 6);
        assert!(page.html.contains("href=\"/stories.html\" class=\"btn-view-more\""));
        assert_eq!(count(&page.html, "class=\"activity-card\""), 2);
        assert_eq!(count(&page.html, "class=\"hero-slide"), 6);
        assert_eq!(count(&page.html, "class=\"atmosphere-item\""), 8);
        assert!(page.html.contains("cookie-consent"));
    }

    #[test]
    fn test_category_filter() {
        let site = site();
        let page = site.render("/stories.html?category=Video");
        assert_eq!(count(&page.html, "class=\"post-card\""), 2);
        assert!(page.html.contains("/stories.html?post=p2#"));
        assert!(page.html.contains("/stories.html?post=p6#"));
        assert!(!page.html.contains("/stories.html?post=p1#"));
        assert!(page.html.contains("class=\"category-tab active\""));
    }

    #[test]
    fn test_post_detail() {
        let site = site();
        let page = site.render("/stories.html?post=p2&category=Knowledge");
        assert_eq!(page.view, View::PostDetail { id: "p2".to_string() });
        assert!(page.html.contains("<p>Mint's story</p>"));
        assert!(page.html.contains("layout-immersive"));
        assert!(page.html.contains("5 MIN READ"));
        assert!(page.html.contains("Mint - Mintra K."));
        assert!(page
            .html
            .contains("<time datetime=\"2024-03-05\">5 มีนาคม 2567</time>"));
        assert!(page.html.contains("class=\"badge badge-purple\""));

        let missing_body = site.render("/stories.html?post=p1");
        assert!(missing_body.html.contains("ไม่สามารถโหลดเนื้อหาได้"));
    }

    #[test]
    fn test_links_match_navigation() {
        let site = site();
        let href = |target: &str| format!("href=\"{}\"", target);

        let home = site.render("/");
        let mut nav = Navigator::new("/").unwrap();
        match nav.navigate_to_post("p7") {
            Navigation::Redirect(target) => assert!(home.html.contains(&href(&target))),
            other => panic!("homepage should load the stories page, got {:?}", other),
        }

        let list = site.render("/stories.html");
        let mut nav = Navigator::new("/stories.html").unwrap();
        nav.filter_by_category("Video");
        assert!(list.html.contains(&href(&nav.current().href())));

        let filtered = site.render(&nav.current().href());
        nav.navigate_to_post("p2");
        assert!(filtered.html.contains(&href(&nav.current().href())));

        let detail = site.render(&nav.current().href());
        assert_eq!(detail.view, nav.view());
        nav.exit_post_detail();
        assert!(detail.html.contains(&href(&nav.current().href())));
        assert!(detail.html.contains("id=\"post-detail-view\""));
    }

    #[test]
    fn test_unknown_post_shows_list() {
        let site = site();
        let page = site.render("/stories.html?post=nope");
        assert_eq!(page.view, View::List { category: None });
        assert_eq!(count(&page.html, "class=\"post-card\""), 8);
    }

    #[test]
    fn test_failed_collection_keeps_page() {
        let mut site = site();
        site.store.students = Loaded::Failed("gone".to_string());
        let page = site.render("/");
        assert!(page.html.contains("ไม่สามารถโหลดข้อมูลได้"));
        assert_eq!(count(&page.html, "class=\"post-card\""), 6);
    }

    #[test]
    fn test_activity_detail_registration() {
        let site = site();
        let page = site.render("/activities.html?activity=a2");
        assert!(page.html.contains("forms.example.com"));
        assert!(page.html.contains("เนื้อหาไม่พร้อมใช้งาน"));
    }

    #[test]
    fn test_consent_hides_banner_and_unknown_path() {
        let site = site();
        let page = site
            .renderer
            .render(&site.store, &site.rotation, &Location::parse("/courses.html"), true)
            .unwrap()
            .unwrap();
        assert!(!page.html.contains("cookie-consent"));
        assert_eq!(count(&page.html, "class=\"atmosphere-item\""), 12);

        let none = site
            .renderer
            .render(&site.store, &site.rotation, &Location::parse("/css/a.css"), false)
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_hero_slides_are_newest_posts() {
        let slides = hero_slides(&fixtures::store(), &Location::bare("/"), 5);
        let ids: Vec<_> = slides
            .iter()
            .map(|s| Location::parse(&s.url).get("post").unwrap_or("").to_string())
            .collect();
        assert_eq!(ids, ["p7", "p5", "p2", "p3", "p1"]);
        assert_eq!(slides[2].url, "/stories.html?post=p2#post-detail-view");
        assert_eq!(slides[0].index, 1);
    }
}
