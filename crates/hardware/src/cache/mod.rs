//! Cache hierarchy.
//!
//! This module implements the shared machinery of every cache level:
//! 1. **Geometry:** [`CacheArray`] holds the set/way/block arithmetic and
//!    the block metadata arrays common to L1 and L2.
//! 2. **Wrappers:** [`l1::L1Cache`] (per-core, blocking, one outstanding
//!    miss) and [`l2::L2Cache`] (shared, nonblocking, MSHR-based) compose a
//!    `CacheArray` with their level-specific miss handling.
//! 3. **Policies:** victim selection and age bookkeeping, parameterized by
//!    the configured [`ReplacementPolicy`](crate::config::ReplacementPolicy).
//!
//! Blocks are metadata-only (tag, coherence state, dirty bit, age): the
//! functional memory array is the data store, so the hierarchy contributes
//! timing, not values.

/// Per-core blocking L1 cache.
pub mod l1;
/// Shared nonblocking L2 cache.
pub mod l2;
/// Miss status holding registers.
pub mod mshr;
/// Replacement policy operations.
pub mod policies;

use crate::config::ReplacementPolicy;

/// Coherence state of one cache block.
///
/// New fills install as [`MesiState::Exclusive`]; a write hit promotes to
/// [`MesiState::Modified`]. `Shared` exists for configurations that layer a
/// coherence protocol on top; the base hierarchy never produces it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MesiState {
    /// Block holds no valid data.
    #[default]
    Invalid,
    /// Valid, clean, possibly present in other caches.
    Shared,
    /// Valid, clean, present only here.
    Exclusive,
    /// Valid and dirty, present only here.
    Modified,
}

/// Metadata of one cache block.
///
/// `age` is the replacement counter: 0 is most recently used and the valid
/// blocks of a set always hold a permutation of `0..valid_count`.
#[derive(Debug, Clone, Default)]
pub struct CacheBlock {
    pub tag: u32,
    pub state: MesiState,
    pub dirty: bool,
    pub age: u32,
}

impl CacheBlock {
    /// True when the block holds valid data.
    pub fn is_valid(&self) -> bool {
        self.state != MesiState::Invalid
    }
}

/// One associativity set: a fixed-size vector of blocks.
#[derive(Debug, Clone)]
pub struct CacheSet {
    pub blocks: Vec<CacheBlock>,
}

impl CacheSet {
    fn new(ways: usize) -> Self {
        Self {
            blocks: vec![CacheBlock::default(); ways],
        }
    }
}

/// Set-associative cache geometry and block metadata, shared by L1 and L2.
///
/// The level-specific wrappers own the miss handling; everything that only
/// depends on geometry (probing, victim selection, installation, eviction)
/// lives here.
pub struct CacheArray {
    pub num_sets: usize,
    pub ways: usize,
    pub block_bytes: usize,
    pub policy: ReplacementPolicy,
    pub sets: Vec<CacheSet>,
    index_shift: u32,
    index_mask: u32,
    tag_shift: u32,
    /// Deterministic xorshift state for the Random policy.
    rng_state: u32,
}

impl CacheArray {
    /// Creates an empty array.
    ///
    /// `num_sets`, `ways`, and `block_bytes` must be nonzero and
    /// `num_sets`/`block_bytes` powers of two.
    pub fn new(num_sets: usize, ways: usize, block_bytes: usize, policy: ReplacementPolicy) -> Self {
        debug_assert!(num_sets.is_power_of_two());
        debug_assert!(block_bytes.is_power_of_two());
        debug_assert!(ways > 0);

        let index_shift = block_bytes.trailing_zeros();
        let tag_shift = index_shift + num_sets.trailing_zeros();

        Self {
            num_sets,
            ways,
            block_bytes,
            policy,
            sets: (0..num_sets).map(|_| CacheSet::new(ways)).collect(),
            index_shift,
            index_mask: (num_sets - 1) as u32,
            tag_shift,
            rng_state: 0x2545_f491,
        }
    }

    /// Aligns an address down to its block base.
    pub fn block_align(&self, addr: u32) -> u32 {
        addr & !(self.block_bytes as u32 - 1)
    }

    /// Set index of an address.
    pub fn set_index(&self, addr: u32) -> usize {
        ((addr >> self.index_shift) & self.index_mask) as usize
    }

    /// Tag of an address.
    pub fn tag(&self, addr: u32) -> u32 {
        addr >> self.tag_shift
    }

    /// Reconstructs the block base address of a resident block.
    pub fn block_addr(&self, set_idx: usize, tag: u32) -> u32 {
        (tag << self.tag_shift) | ((set_idx as u32) << self.index_shift)
    }

    /// Finds the way holding `addr`, if resident.
    pub fn find_block(&self, addr: u32) -> Option<usize> {
        let set = &self.sets[self.set_index(addr)];
        let tag = self.tag(addr);
        set.blocks
            .iter()
            .position(|b| b.is_valid() && b.tag == tag)
    }

    /// True when `addr` is resident. Does not touch replacement state.
    pub fn contains(&self, addr: u32) -> bool {
        self.find_block(addr).is_some()
    }

    /// Probes for `addr`; on a hit updates replacement state and, for
    /// writes, marks the block dirty and Modified.
    ///
    /// Returns `true` on a hit.
    pub fn probe(&mut self, addr: u32, is_write: bool) -> bool {
        let set_idx = self.set_index(addr);
        let Some(way) = self.find_block(addr) else {
            return false;
        };
        let policy = self.policy;
        let set = &mut self.sets[set_idx];
        policies::touch(set, way, policy);
        if is_write {
            let block = &mut set.blocks[way];
            block.dirty = true;
            block.state = MesiState::Modified;
        }
        true
    }

    /// Selects the victim way for an installation into `addr`'s set:
    /// the first invalid way, else the policy's choice.
    pub fn find_victim(&mut self, addr: u32) -> usize {
        let set_idx = self.set_index(addr);
        if let Some(way) = self.sets[set_idx].blocks.iter().position(|b| !b.is_valid()) {
            return way;
        }
        let Self {
            sets,
            policy,
            rng_state,
            ..
        } = self;
        policies::select_victim(&sets[set_idx], *policy, rng_state)
    }

    /// Invalidates the block at `set_idx`/`way`.
    ///
    /// Returns the block base address when the victim was valid and dirty
    /// (a writeback candidate), `None` otherwise.
    pub fn evict(&mut self, set_idx: usize, way: usize) -> Option<u32> {
        let (writeback, tag) = {
            let block = &self.sets[set_idx].blocks[way];
            (block.is_valid() && block.dirty, block.tag)
        };
        let dirty_addr = writeback.then(|| self.block_addr(set_idx, tag));
        let block = &mut self.sets[set_idx].blocks[way];
        block.state = MesiState::Invalid;
        block.dirty = false;
        dirty_addr
    }

    /// Installs the block containing `addr`, evicting a victim if needed.
    ///
    /// The new block enters Exclusive and most-recently-used. Returns the
    /// base address of a dirty victim, `None` otherwise.
    pub fn install(&mut self, addr: u32) -> Option<u32> {
        let set_idx = self.set_index(addr);
        let tag = self.tag(addr);
        let way = self.find_victim(addr);
        let vacated_age = {
            let victim = &self.sets[set_idx].blocks[way];
            if victim.is_valid() { victim.age } else { u32::MAX }
        };
        let dirty_victim = self.evict(set_idx, way);

        let set = &mut self.sets[set_idx];
        let block = &mut set.blocks[way];
        block.tag = tag;
        block.state = MesiState::Exclusive;
        block.dirty = false;
        policies::age_on_install(set, way, vacated_age);

        dirty_victim
    }
}
