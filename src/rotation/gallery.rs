//! Atmosphere gallery: a grid of slots showing distinct images from a pool,
//! one slot swapped at a time.

use rand::seq::{IteratorRandom, SliceRandom};
use rand::Rng;
use serde::Serialize;
use std::time::Duration;

use crate::content::GalleryImage;

/// A planned swap of one slot to a new pool image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SlotChange {
    pub slot: usize,
    /// Index into the image pool
    pub image: usize,
}

#[derive(Debug, Clone)]
pub struct AtmosphereGallery {
    pool: Vec<GalleryImage>,
    /// Pool index shown in each slot
    slots: Vec<usize>,
    last_changed: Option<usize>,
}

impl AtmosphereGallery {
    /// Fill up to `slot_count` slots with a shuffled selection of distinct
    /// images.
    pub fn new<R: Rng + ?Sized>(pool: Vec<GalleryImage>, slot_count: usize, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..pool.len()).collect();
        order.shuffle(rng);
        order.truncate(slot_count);

        Self {
            pool,
            slots: order,
            last_changed: None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Images currently shown, in slot order
    pub fn displayed(&self) -> Vec<&GalleryImage> {
        self.slots.iter().map(|&i| &self.pool[i]).collect()
    }

    pub fn image(&self, index: usize) -> Option<&GalleryImage> {
        self.pool.get(index)
    }

    /// Rotation needs at least one image that is not on screen
    pub fn can_rotate(&self) -> bool {
        self.pool.len() > self.slots.len() && !self.slots.is_empty()
    }

    /// Pick the next swap: a slot other than the one changed last (when
    /// there is a choice) and an image that is not currently displayed.
    pub fn plan<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<SlotChange> {
        if !self.can_rotate() {
            return None;
        }

        let last = self.last_changed;
        let slot = (0..self.slots.len())
            .filter(|&s| self.slots.len() == 1 || Some(s) != last)
            .choose(rng)?;

        let image = (0..self.pool.len())
            .filter(|i| !self.slots.contains(i))
            .choose(rng)?;

        self.last_changed = Some(slot);
        Some(SlotChange { slot, image })
    }

    /// Show the planned image. Ignored if the slot vanished or the image is
    /// already on screen (the pool was swapped in between).
    pub fn apply(&mut self, change: SlotChange) -> bool {
        if change.slot >= self.slots.len()
            || change.image >= self.pool.len()
            || self.slots.contains(&change.image)
        {
            return false;
        }
        self.slots[change.slot] = change.image;
        true
    }
}

/// Random pause before the next swap, in `[min, max)`
pub fn next_delay<R: Rng + ?Sized>(rng: &mut R, min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    rng.gen_range(min..max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::fixtures;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn distinct(gallery: &AtmosphereGallery) -> bool {
        let shown = gallery.displayed();
        let unique: HashSet<_> = shown.iter().map(|img| &img.src).collect();
        unique.len() == shown.len()
    }

    #[test]
    fn test_initial_slots_are_distinct() {
        let mut rng = StdRng::seed_from_u64(3);
        let gallery = AtmosphereGallery::new(fixtures::gallery(20), 12, &mut rng);
        assert_eq!(gallery.slot_count(), 12);
        assert!(distinct(&gallery));
    }

    #[test]
    fn test_rotation_never_duplicates() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut gallery = AtmosphereGallery::new(fixtures::gallery(9), 8, &mut rng);
        let mut last = None;
        for _ in 0..500 {
            let change = gallery.plan(&mut rng).unwrap();
            assert_ne!(Some(change.slot), last);
            last = Some(change.slot);
            assert!(gallery.apply(change));
            assert!(distinct(&gallery));
        }
    }

    #[test]
    fn test_small_pool_skips_rotation() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut gallery = AtmosphereGallery::new(fixtures::gallery(8), 8, &mut rng);
        assert!(!gallery.can_rotate());
        assert_eq!(gallery.plan(&mut rng), None);

        let mut gallery = AtmosphereGallery::new(fixtures::gallery(4), 8, &mut rng);
        assert_eq!(gallery.slot_count(), 4);
        assert_eq!(gallery.plan(&mut rng), None);
    }

    #[test]
    fn test_single_slot_can_repeat_slot() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut gallery = AtmosphereGallery::new(fixtures::gallery(3), 1, &mut rng);
        for _ in 0..10 {
            let change = gallery.plan(&mut rng).unwrap();
            assert_eq!(change.slot, 0);
            gallery.apply(change);
        }
    }

    #[test]
    fn test_apply_rejects_displayed_image() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut gallery = AtmosphereGallery::new(fixtures::gallery(10), 2, &mut rng);
        let shown = gallery.slots[1];
        assert!(!gallery.apply(SlotChange {
            slot: 0,
            image: shown
        }));
    }

    #[test]
    fn test_next_delay_range() {
        let mut rng = StdRng::seed_from_u64(2);
        let min = Duration::from_millis(3000);
        let max = Duration::from_millis(6000);
        for _ in 0..100 {
            let d = next_delay(&mut rng, min, max);
            assert!(d >= min && d < max);
        }
        assert_eq!(next_delay(&mut rng, max, min), max);
    }
}
