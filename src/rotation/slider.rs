//! Hero slider state

use serde::Serialize;

/// Index over the hero slides. Slide 0 is the main hero; the newest posts
/// follow it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HeroSlider {
    current: usize,
    total: usize,
}

impl HeroSlider {
    /// `post_slides` is the number of post slides after the main hero
    pub fn new(post_slides: usize) -> Self {
        Self {
            current: 0,
            total: post_slides + 1,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Jump to a slide. Out-of-range indices are ignored.
    pub fn go_to(&mut self, index: usize) -> bool {
        if index >= self.total {
            return false;
        }
        self.current = index;
        true
    }

    pub fn next(&mut self) -> usize {
        self.current = (self.current + 1) % self.total;
        self.current
    }

    pub fn prev(&mut self) -> usize {
        self.current = (self.current + self.total - 1) % self.total;
        self.current
    }
}
