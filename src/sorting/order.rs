//! Mapping of sorted sequences to integer draw orders.
//!
//! Two disjoint bands are handed out:
//! - the background band ends at `background_ceiling` and grows downwards,
//!   one `stride` per background sprite
//! - the main band starts at `main_base` and grows upwards by `stride`
//!
//! As long as `background_ceiling < main_base` every background sprite sorts
//! below every other sprite, whatever the size of either list.

/// Band layout for draw orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderBands {
    pub main_base: i32,
    pub background_ceiling: i32,
    pub stride: i32,
}

impl Default for OrderBands {
    fn default() -> Self {
        Self {
            main_base: 0,
            background_ceiling: -1,
            stride: 1,
        }
    }
}

impl OrderBands {
    /// Draw order of the `index`-th main sprite (back to front).
    #[inline]
    pub fn main(&self, index: usize) -> i32 {
        self.main_base
            .saturating_add(self.stride.saturating_mul(index as i32))
    }

    /// Draw order of the `index`-th of `count` background sprites (back to front).
    #[inline]
    pub fn background(&self, index: usize, count: usize) -> i32 {
        debug_assert!(index < count);
        let steps_below_ceiling = (count - 1 - index) as i32;
        self.background_ceiling
            .saturating_sub(self.stride.saturating_mul(steps_below_ceiling))
    }

    /// Draw orders for a main sequence of `count` sprites.
    pub fn main_orders(&self, count: usize) -> impl Iterator<Item = i32> + '_ {
        (0..count).map(move |i| self.main(i))
    }

    /// Draw orders for a background list of `count` sprites.
    pub fn background_orders(&self, count: usize) -> impl Iterator<Item = i32> + '_ {
        (0..count).map(move |i| self.background(i, count))
    }
}
