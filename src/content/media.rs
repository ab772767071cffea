//! Testimonials and gallery images

use serde::{Deserialize, Serialize};

/// A quote from an admitted student
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Testimonial {
    pub name: String,
    pub university: String,
    pub major: String,
    pub quote: String,
    pub photo: String,
}

/// An image in the atmosphere gallery pool
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub alt: String,
}

/// On-disk shape of `data/testimonials.json`
#[derive(Debug, Deserialize)]
pub(crate) struct TestimonialFile {
    pub testimonials: Vec<Testimonial>,
}

/// On-disk shape of `data/atmosphere.json`
#[derive(Debug, Deserialize)]
pub(crate) struct GalleryFile {
    pub images: Vec<GalleryImage>,
}
