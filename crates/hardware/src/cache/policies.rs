//! Cache replacement policy operations.
//!
//! Victim selection and age bookkeeping for the configured
//! [`ReplacementPolicy`]. Policies are a variant tag plus free functions
//! over a [`CacheSet`], not trait objects.
//!
//! The `age` counter on each block is the only state: 0 is the most recent
//! position and the valid blocks of a set always hold a permutation of
//! `0..valid_count`. LRU and MRU update ages on every access; FIFO only on
//! installation, so its ages record insertion order; Random ignores them
//! and draws from a deterministic xorshift stream.

use super::CacheSet;
use crate::config::ReplacementPolicy;

/// Records an access to `way`, re-ranking the set's ages.
///
/// The accessed block moves to age 0 and every valid block that was more
/// recent slides down one position, which keeps the ages a permutation.
/// FIFO and Random have no access-time state to maintain.
pub fn touch(set: &mut CacheSet, way: usize, policy: ReplacementPolicy) {
    match policy {
        ReplacementPolicy::Lru | ReplacementPolicy::Mru => {
            let current = set.blocks[way].age;
            for (i, block) in set.blocks.iter_mut().enumerate() {
                if i != way && block.is_valid() && block.age < current {
                    block.age += 1;
                }
            }
            set.blocks[way].age = 0;
        }
        ReplacementPolicy::Fifo | ReplacementPolicy::Random => {}
    }
}

/// Records an installation into `way`: the new block takes age 0 and every
/// valid block that was younger than the vacated slot ages by one.
///
/// `vacated_age` is the evicted block's age, or `u32::MAX` when the slot
/// was invalid; either way the set's ages remain a permutation.
pub fn age_on_install(set: &mut CacheSet, way: usize, vacated_age: u32) {
    for (i, block) in set.blocks.iter_mut().enumerate() {
        if i != way && block.is_valid() && block.age < vacated_age {
            block.age += 1;
        }
    }
    set.blocks[way].age = 0;
}

/// Chooses a victim among valid blocks. The caller has already ruled out
/// invalid ways, so the set is full.
pub fn select_victim(set: &CacheSet, policy: ReplacementPolicy, rng_state: &mut u32) -> usize {
    match policy {
        // Highest age: least recently used, or oldest installed under FIFO.
        ReplacementPolicy::Lru | ReplacementPolicy::Fifo => set
            .blocks
            .iter()
            .enumerate()
            .max_by_key(|(_, b)| b.age)
            .map(|(i, _)| i)
            .unwrap_or(0),
        // Lowest age: the most recently used block.
        ReplacementPolicy::Mru => set
            .blocks
            .iter()
            .enumerate()
            .min_by_key(|(_, b)| b.age)
            .map(|(i, _)| i)
            .unwrap_or(0),
        ReplacementPolicy::Random => (xorshift32(rng_state) as usize) % set.blocks.len(),
    }
}

/// Deterministic pseudo-random stream shared by every Random-policy cache.
fn xorshift32(state: &mut u32) -> u32 {
    let mut x = *state;
    x ^= x << 13;
    x ^= x >> 17;
    x ^= x << 5;
    *state = x;
    x
}
