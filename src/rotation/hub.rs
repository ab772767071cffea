//! Timer-driven rotators shared by every connected page
//!
//! Each rotator sits behind its own mutex and is advanced by its own tokio
//! task. Stopping a rotator aborts its task. State changes are broadcast as
//! [`RotationEvent`]s to the pages listening on the rotation socket.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::AbortHandle;

use super::{next_delay, AtmosphereGallery, HeroSlider, TestimonialCarousel};
use crate::config::{CarouselConfig, GalleryConfig, SiteConfig, SliderConfig};
use crate::content::{ContentStore, GalleryImage, Testimonial};

/// Which atmosphere grid an event belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GalleryKind {
    /// Homepage grid
    Home,
    /// Grid on the other pages
    Page,
}

/// A visible change pushed to connected pages
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RotationEvent {
    Slide {
        index: usize,
    },
    Testimonial {
        index: usize,
        transform: String,
    },
    GalleryFade {
        gallery: GalleryKind,
        slot: usize,
    },
    GallerySwap {
        gallery: GalleryKind,
        slot: usize,
        src: String,
        alt: String,
    },
    /// Content changed on disk; pages should reload
    Reload,
}

/// Current state of every rotator
#[derive(Debug, Clone, Serialize)]
pub struct RotationSnapshot {
    pub slider: HeroSlider,
    pub slider_running: bool,
    pub testimonials: Vec<Testimonial>,
    pub testimonial_index: usize,
    pub testimonial_transform: String,
    pub home_gallery: Vec<GalleryImage>,
    pub page_gallery: Vec<GalleryImage>,
}

pub struct RotationHub {
    slider_config: SliderConfig,
    carousel_config: CarouselConfig,
    gallery_config: GalleryConfig,

    slider: Mutex<HeroSlider>,
    testimonials: Mutex<TestimonialCarousel>,
    home_gallery: Mutex<AtmosphereGallery>,
    page_gallery: Mutex<AtmosphereGallery>,

    slider_timer: Mutex<Option<AbortHandle>>,
    /// Pages whose pointer is over the slider
    hovering: Mutex<usize>,
    tasks: Mutex<Vec<AbortHandle>>,
    events: broadcast::Sender<RotationEvent>,
}

impl RotationHub {
    /// Build all rotators from the store. No timers run until [`start`].
    ///
    /// [`start`]: RotationHub::start
    pub fn new(config: &SiteConfig, store: &ContentStore) -> Self {
        let (events, _) = broadcast::channel(64);
        let mut rng = StdRng::from_entropy();

        let (slider, testimonials, home_gallery, page_gallery) =
            build_rotators(config, store, &mut rng);

        Self {
            slider_config: config.slider.clone(),
            carousel_config: config.testimonials.clone(),
            gallery_config: config.gallery.clone(),
            slider: Mutex::new(slider),
            testimonials: Mutex::new(testimonials),
            home_gallery: Mutex::new(home_gallery),
            page_gallery: Mutex::new(page_gallery),
            slider_timer: Mutex::new(None),
            hovering: Mutex::new(0),
            tasks: Mutex::new(Vec::new()),
            events,
        }
    }

    /// Rebuild rotator state after a content reload; running timers keep
    /// going against the new state.
    pub fn reload(&self, config: &SiteConfig, store: &ContentStore) {
        let mut rng = StdRng::from_entropy();
        let (slider, testimonials, home_gallery, page_gallery) =
            build_rotators(config, store, &mut rng);

        *lock(&self.slider) = slider;
        *lock(&self.testimonials) = testimonials;
        *lock(&self.home_gallery) = home_gallery;
        *lock(&self.page_gallery) = page_gallery;
        tracing::debug!("Rotators rebuilt");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<RotationEvent> {
        self.events.subscribe()
    }

    /// Tell connected pages to reload
    pub fn notify_reload(&self) {
        self.emit(RotationEvent::Reload);
    }

    pub fn snapshot(&self) -> RotationSnapshot {
        let slider = *lock(&self.slider);
        let testimonials = lock(&self.testimonials);
        let home_gallery = lock(&self.home_gallery);
        let page_gallery = lock(&self.page_gallery);

        RotationSnapshot {
            slider,
            slider_running: self.slider_running(),
            testimonials: testimonials.items().to_vec(),
            testimonial_index: testimonials.index(),
            testimonial_transform: testimonials.transform(),
            home_gallery: home_gallery.displayed().into_iter().cloned().collect(),
            page_gallery: page_gallery.displayed().into_iter().cloned().collect(),
        }
    }

    pub fn next_slide(&self) -> usize {
        let index = lock(&self.slider).next();
        self.emit(RotationEvent::Slide { index });
        index
    }

    pub fn prev_slide(&self) -> usize {
        let index = lock(&self.slider).prev();
        self.emit(RotationEvent::Slide { index });
        index
    }

    /// Jump to a slide; out-of-range indices are ignored
    pub fn go_to_slide(&self, index: usize) -> bool {
        let moved = lock(&self.slider).go_to(index);
        if moved {
            self.emit(RotationEvent::Slide { index });
        }
        moved
    }

    pub fn next_testimonial(&self) -> usize {
        let mut carousel = lock(&self.testimonials);
        let index = carousel.next();
        let transform = carousel.transform();
        drop(carousel);
        self.emit(RotationEvent::Testimonial { index, transform });
        index
    }

    pub fn prev_testimonial(&self) -> usize {
        let mut carousel = lock(&self.testimonials);
        let index = carousel.prev();
        let transform = carousel.transform();
        drop(carousel);
        self.emit(RotationEvent::Testimonial { index, transform });
        index
    }

    /// Start every rotator. Must be called inside a tokio runtime.
    pub fn start(self: &Arc<Self>) {
        self.run_slider();

        let hub = Arc::clone(self);
        let period = Duration::from_millis(self.carousel_config.interval_ms.max(1));
        let testimonials = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                hub.next_testimonial();
            }
        });

        let mut tasks = lock(&self.tasks);
        tasks.push(testimonials.abort_handle());
        for kind in [GalleryKind::Home, GalleryKind::Page] {
            let hub = Arc::clone(self);
            let task = tokio::spawn(async move { hub.run_gallery(kind).await });
            tasks.push(task.abort_handle());
        }
        tracing::info!("Rotators started");
    }

    /// A page's pointer entered the slider. The slider stays stopped while
    /// any page is hovering.
    pub fn pause_slider(&self) {
        *lock(&self.hovering) += 1;
        self.stop_slider_timer();
    }

    /// A page's pointer left the slider. The timer restarts once the last
    /// hovering page has left.
    pub fn resume_slider(self: &Arc<Self>) {
        let remaining = {
            let mut hovering = lock(&self.hovering);
            *hovering = hovering.saturating_sub(1);
            *hovering
        };

        if remaining == 0 {
            self.run_slider();
        } else {
            tracing::debug!("Slider held by {} hovering pages", remaining);
        }
    }

    fn stop_slider_timer(&self) {
        if let Some(timer) = lock(&self.slider_timer).take() {
            timer.abort();
            tracing::debug!("Slider paused");
        }
    }

    /// Start the hero slider timer, replacing a running one
    fn run_slider(self: &Arc<Self>) {
        let hub = Arc::clone(self);
        let period = Duration::from_millis(self.slider_config.interval_ms.max(1));
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                hub.next_slide();
            }
        });

        if let Some(previous) = lock(&self.slider_timer).replace(task.abort_handle()) {
            previous.abort();
        }
        tracing::debug!("Slider running");
    }

    pub fn slider_running(&self) -> bool {
        lock(&self.slider_timer)
            .as_ref()
            .map_or(false, |timer| !timer.is_finished())
    }

    /// Abort every timer
    pub fn stop(&self) {
        self.stop_slider_timer();
        for task in lock(&self.tasks).drain(..) {
            task.abort();
        }
    }

    async fn run_gallery(&self, kind: GalleryKind) {
        let mut rng = StdRng::from_entropy();
        let min = Duration::from_millis(self.gallery_config.min_delay_ms);
        let max = Duration::from_millis(self.gallery_config.max_delay_ms);

        loop {
            tokio::time::sleep(next_delay(&mut rng, min, max)).await;
            self.rotate_gallery_once(kind, &mut rng).await;
        }
    }

    /// Swap one slot: fade out, wait for the fade, show the new image.
    /// Returns false when the gallery cannot rotate.
    pub async fn rotate_gallery_once(&self, kind: GalleryKind, rng: &mut StdRng) -> bool {
        let planned = lock(self.gallery(kind)).plan(rng);
        let Some(change) = planned else {
            return false;
        };

        self.emit(RotationEvent::GalleryFade {
            gallery: kind,
            slot: change.slot,
        });
        tokio::time::sleep(Duration::from_millis(self.gallery_config.fade_ms)).await;

        let swapped = {
            let mut gallery = lock(self.gallery(kind));
            if gallery.apply(change) {
                gallery.image(change.image).cloned()
            } else {
                None
            }
        };

        match swapped {
            Some(image) => {
                tracing::debug!("Gallery {:?} slot {} -> {}", kind, change.slot, image.src);
                self.emit(RotationEvent::GallerySwap {
                    gallery: kind,
                    slot: change.slot,
                    src: image.src,
                    alt: image.alt,
                });
                true
            }
            None => false,
        }
    }

    fn gallery(&self, kind: GalleryKind) -> &Mutex<AtmosphereGallery> {
        match kind {
            GalleryKind::Home => &self.home_gallery,
            GalleryKind::Page => &self.page_gallery,
        }
    }

    fn emit(&self, event: RotationEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

fn build_rotators(
    config: &SiteConfig,
    store: &ContentStore,
    rng: &mut StdRng,
) -> (
    HeroSlider,
    TestimonialCarousel,
    AtmosphereGallery,
    AtmosphereGallery,
) {
    let slides = store.posts.items().len().min(config.slider.posts);
    let slider = HeroSlider::new(slides);
    let testimonials = TestimonialCarousel::new(
        store.testimonials.items().to_vec(),
        config.testimonials.shuffle,
        rng,
    );
    let pool = store.gallery.items().to_vec();
    let home_gallery = AtmosphereGallery::new(pool.clone(), config.gallery.home_slots, rng);
    let page_gallery = AtmosphereGallery::new(pool, config.gallery.page_slots, rng);
    (slider, testimonials, home_gallery, page_gallery)
}

/// Lock a rotator; a panic elsewhere leaves plain data that is still usable
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures;
    use std::collections::HashSet;

    fn config() -> SiteConfig {
        let mut config = SiteConfig::default();
        config.testimonials.shuffle = false;
        config.gallery.fade_ms = 0;
        config.slider.interval_ms = 20;
        config
    }

    #[test]
    fn test_snapshot_reflects_store() {
        let hub = RotationHub::new(&config(), &fixtures::store());
        let snapshot = hub.snapshot();
        assert_eq!(snapshot.slider.total(), 6);
        assert_eq!(snapshot.testimonials.len(), 3);
        assert_eq!(snapshot.home_gallery.len(), 8);
        assert_eq!(snapshot.page_gallery.len(), 12);
        assert!(!snapshot.slider_running);
    }

    #[test]
    fn test_manual_navigation_emits_events() {
        let hub = RotationHub::new(&config(), &fixtures::store());
        let mut rx = hub.subscribe();

        assert_eq!(hub.prev_testimonial(), 2);
        assert_eq!(
            rx.try_recv().unwrap(),
            RotationEvent::Testimonial {
                index: 2,
                transform: "translateX(-200%)".to_string()
            }
        );

        assert!(!hub.go_to_slide(42));
        assert!(rx.try_recv().is_err());
        assert_eq!(hub.next_slide(), 1);
        assert_eq!(rx.try_recv().unwrap(), RotationEvent::Slide { index: 1 });
    }

    #[tokio::test]
    async fn test_gallery_rotation_swaps_to_undisplayed_image() {
        let hub = RotationHub::new(&config(), &fixtures::store());
        let mut rx = hub.subscribe();
        let mut rng = StdRng::seed_from_u64(4);

        // Each rotation sends two events; drain them as we go so the
        // channel never lags
        for _ in 0..50 {
            assert!(hub.rotate_gallery_once(GalleryKind::Page, &mut rng).await);
            let shown = hub.snapshot().page_gallery;
            let unique: HashSet<_> = shown.iter().map(|img| img.src.clone()).collect();
            assert_eq!(unique.len(), shown.len());

            let fade = rx.try_recv().unwrap();
            let slot = match fade {
                RotationEvent::GalleryFade {
                    gallery: GalleryKind::Page,
                    slot,
                } => slot,
                other => panic!("expected a fade, got {:?}", other),
            };
            match rx.try_recv().unwrap() {
                RotationEvent::GallerySwap {
                    gallery: GalleryKind::Page,
                    slot: swapped,
                    src,
                    ..
                } => {
                    assert_eq!(swapped, slot);
                    assert_eq!(shown[slot].src, src);
                }
                other => panic!("expected a swap, got {:?}", other),
            }
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_gallery_without_spare_images_does_not_rotate() {
        let mut store = fixtures::store();
        store.gallery = crate::content::Loaded::Ready(fixtures::gallery(8));
        let hub = RotationHub::new(&config(), &store);
        let mut rng = StdRng::seed_from_u64(4);
        assert!(!hub.rotate_gallery_once(GalleryKind::Home, &mut rng).await);
        // Page grid has 12 slots, also too few images
        assert!(!hub.rotate_gallery_once(GalleryKind::Page, &mut rng).await);
    }

    #[tokio::test]
    async fn test_pause_and_resume_slider() {
        let hub = Arc::new(RotationHub::new(&config(), &fixtures::store()));
        let mut rx = hub.subscribe();

        hub.resume_slider();
        assert!(hub.slider_running());
        let event = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(event, RotationEvent::Slide { .. }));

        hub.pause_slider();
        tokio::task::yield_now().await;
        assert!(!hub.slider_running());
        hub.stop();
    }

    #[tokio::test]
    async fn test_slider_waits_for_every_hovering_page() {
        let hub = Arc::new(RotationHub::new(&config(), &fixtures::store()));
        hub.start();
        assert!(hub.slider_running());

        // Two pages hover, one leaves
        hub.pause_slider();
        hub.pause_slider();
        hub.resume_slider();
        tokio::task::yield_now().await;
        assert!(!hub.slider_running());

        hub.resume_slider();
        assert!(hub.slider_running());

        // A stray resume does not drive the count below zero
        hub.resume_slider();
        hub.pause_slider();
        tokio::task::yield_now().await;
        assert!(!hub.slider_running());
        hub.stop();
    }

    #[test]
    fn test_reload_rebuilds_from_new_store() {
        let hub = RotationHub::new(&config(), &fixtures::store());
        let mut store = fixtures::store();
        store.posts = crate::content::Loaded::Ready(fixtures::posts()[..2].to_vec());
        store.testimonials = crate::content::Loaded::Failed("gone".to_string());
        hub.reload(&config(), &store);

        let snapshot = hub.snapshot();
        assert_eq!(snapshot.slider.total(), 3);
        assert!(snapshot.testimonials.is_empty());
    }
}
