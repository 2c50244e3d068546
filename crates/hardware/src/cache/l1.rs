//! Per-core blocking L1 cache.
//!
//! One instruction and one data instance per core. The cache blocks on a
//! single outstanding miss: while `pending_miss` is set every access
//! returns `false` and the pipeline retries the same access each cycle.
//! A miss is resolved either by a self-timed fill (L2 hit or flat penalty)
//! or by an L2-initiated [`L1Cache::fill`] when the block arrives from
//! DRAM.

use crate::cache::CacheArray;
use crate::cache::l2::{L2AccessStatus, L2Cache};
use crate::config::{CacheConfig, CacheHierarchyConfig};
use crate::stats::CacheStats;

/// Which side of the split L1 this instance serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Instruction,
    Data,
}

impl CacheKind {
    fn label(self) -> &'static str {
        match self {
            CacheKind::Instruction => "L1I",
            CacheKind::Data => "L1D",
        }
    }
}

/// A private L1 cache.
pub struct L1Cache {
    pub array: CacheArray,
    /// When false the cache is perfect: every access completes immediately.
    pub enabled: bool,
    pub core_id: usize,
    pub kind: CacheKind,
    /// An outstanding miss is latched.
    pub pending_miss: bool,
    /// Address of the outstanding miss.
    pub pending_miss_addr: u32,
    /// Self-timed completion cycle; `None` when waiting on an L2 fill.
    pub pending_miss_ready_cycle: Option<u64>,
    pub stats: CacheStats,
    /// Block just installed by a fill; its completing probe was already
    /// counted as a miss and must not also count as a hit.
    refill_block: Option<u32>,
    miss_penalty: u64,
    trace: bool,
}

impl L1Cache {
    /// Creates one L1 cache of the given kind for core `core_id`.
    pub fn new(
        core_id: usize,
        kind: CacheKind,
        geometry: &CacheConfig,
        hierarchy: &CacheHierarchyConfig,
        trace: bool,
    ) -> Self {
        Self {
            array: CacheArray::new(
                geometry.sets,
                geometry.ways,
                hierarchy.block_bytes,
                hierarchy.repl_policy,
            ),
            enabled: geometry.enabled,
            core_id,
            kind,
            pending_miss: false,
            pending_miss_addr: 0,
            pending_miss_ready_cycle: None,
            stats: CacheStats::default(),
            refill_block: None,
            miss_penalty: hierarchy.l1_miss_penalty,
            trace,
        }
    }

    /// Services one access; returns `true` iff it completes this cycle.
    ///
    /// On a miss the cache latches `pending_miss` and consults the L2:
    /// an L2 hit schedules a self-timed fill after the L2 hit latency, an
    /// L2 miss leaves the wakeup to the L2's fill path, and a busy L2 does
    /// not latch anything so the access retries from scratch.
    pub fn access(&mut self, addr: u32, is_write: bool, l2: &mut L2Cache, cycle: u64) -> bool {
        if !self.enabled {
            self.stats.record_hit(is_write);
            return true;
        }

        // Resolve a pending miss whose latency has elapsed, then fall
        // through to the probe.
        if self.pending_miss {
            match self.pending_miss_ready_cycle {
                Some(ready) if cycle >= ready => {
                    let pending = self.pending_miss_addr;
                    self.fill(pending);
                }
                _ => return false,
            }
        }

        if self.array.probe(addr, is_write) {
            // A probe that merely completes the latched miss was already
            // counted when the miss was recorded.
            if self.refill_block.take() != Some(self.array.block_align(addr)) {
                self.stats.record_hit(is_write);
            }
            return true;
        }
        self.refill_block = None;

        if self.trace {
            eprintln!(
                "{}  core {} miss {addr:#010x}",
                self.kind.label(),
                self.core_id
            );
        }

        if !l2.enabled {
            self.stats.record_miss(is_write);
            self.pending_miss = true;
            self.pending_miss_addr = addr;
            self.pending_miss_ready_cycle = Some(cycle + self.miss_penalty);
            return false;
        }

        match l2.access(addr, is_write, self.core_id, cycle) {
            L2AccessStatus::Hit => {
                self.stats.record_miss(is_write);
                self.pending_miss = true;
                self.pending_miss_addr = addr;
                self.pending_miss_ready_cycle = Some(cycle + l2.hit_latency);
            }
            L2AccessStatus::Miss => {
                self.stats.record_miss(is_write);
                self.pending_miss = true;
                self.pending_miss_addr = addr;
                self.pending_miss_ready_cycle = None;
            }
            L2AccessStatus::Busy => {
                // Not latched and not counted: the same access retries in
                // full next cycle.
            }
        }
        false
    }

    /// Installs the block of the outstanding miss and unblocks the cache.
    ///
    /// Ignored unless `addr` matches the pending block. A dirty victim is
    /// dropped without a writeback; the functional memory already holds the
    /// architectural data.
    pub fn fill(&mut self, addr: u32) {
        if !self.pending_miss {
            return;
        }
        let block = self.array.block_align(self.pending_miss_addr);
        if self.array.block_align(addr) != block {
            return;
        }
        let victim = self.array.install(block);
        if self.trace {
            if let Some(victim) = victim {
                eprintln!(
                    "{}  core {} dirty victim {victim:#010x} dropped",
                    self.kind.label(),
                    self.core_id
                );
            }
        }
        self.pending_miss = false;
        self.pending_miss_ready_cycle = None;
        self.refill_block = Some(block);
    }
}
