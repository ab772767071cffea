//! Testimonial carousel state

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

use crate::content::Testimonial;

#[derive(Debug, Clone, Serialize)]
pub struct TestimonialCarousel {
    items: Vec<Testimonial>,
    index: usize,
}

impl TestimonialCarousel {
    /// Build a carousel, optionally shuffling the order once
    pub fn new<R: Rng + ?Sized>(mut items: Vec<Testimonial>, shuffle: bool, rng: &mut R) -> Self {
        if shuffle {
            items.shuffle(rng);
        }
        Self { items, index: 0 }
    }

    pub fn items(&self) -> &[Testimonial] {
        &self.items
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move to `index`, wrapping: `-1` is the last card, `len` is the first.
    pub fn go_to(&mut self, index: isize) -> usize {
        let len = self.items.len() as isize;
        if len == 0 {
            return 0;
        }
        let index = if index < 0 {
            len - 1
        } else if index >= len {
            0
        } else {
            index
        };
        self.index = index as usize;
        self.index
    }

    pub fn next(&mut self) -> usize {
        self.go_to(self.index as isize + 1)
    }

    pub fn prev(&mut self) -> usize {
        self.go_to(self.index as isize - 1)
    }

    /// CSS transform placing the active card in view
    pub fn transform(&self) -> String {
        format!("translateX(-{}%)", self.index * 100)
    }
}
