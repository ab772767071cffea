//! Configuration module

mod site;

pub use site::SiteConfig;
pub use site::CarouselConfig;
pub use site::ContentPaths;
pub use site::GalleryConfig;
pub use site::HomeLimits;
pub use site::ServerConfig;
pub use site::SliderConfig;
