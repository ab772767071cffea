//! Rotating components: hero slider, testimonial carousel and atmosphere
//! gallery, plus the hub that drives them on timers.

mod carousel;
mod gallery;
mod hub;
mod slider;

pub use carousel::TestimonialCarousel;
pub use gallery::{next_delay, AtmosphereGallery, SlotChange};
pub use hub::{GalleryKind, RotationEvent, RotationHub, RotationSnapshot};
pub use slider::HeroSlider;
