//! Shared nonblocking L2 cache.
//!
//! One instance is shared by every core. It provides:
//! 1. **Access:** probe, MSHR merge, or MSHR allocation with a request
//!    enqueued toward DRAM; `Busy` when the MSHRs are exhausted.
//! 2. **Queues:** a request FIFO toward DRAM and a return FIFO from DRAM,
//!    each adding a fixed forwarding delay.
//! 3. **Completion:** installing returned blocks and waking the L1 caches
//!    of every requester recorded in the MSHR.
//!
//! The modeled inclusion behavior is NINE: an L2 eviction does not
//! back-invalidate the L1s.

use std::collections::VecDeque;

use crate::cache::CacheArray;
use crate::cache::mshr::Mshr;
use crate::config::{CacheHierarchyConfig, InclusionPolicy};
use crate::core::Core;
use crate::dram::{Dram, DramSource};
use crate::stats::CacheStats;

/// Outcome of an L1-initiated L2 access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum L2AccessStatus {
    /// Block resident; the requester completes after the L2 hit latency.
    Hit,
    /// Miss accepted: an MSHR tracks it and a fill will arrive later.
    Miss,
    /// MSHRs exhausted; the requester must retry next cycle.
    Busy,
}

/// One entry of the request queue toward DRAM.
#[derive(Debug, Clone)]
pub struct ReqQueueItem {
    pub addr: u32,
    pub is_write: bool,
    /// Requesting core for demand misses, `None` for writebacks.
    pub requester: Option<usize>,
    pub source: DramSource,
    /// Cycle at which the item may be handed to DRAM.
    pub ready_cycle: u64,
}

/// One entry of the return queue from DRAM.
#[derive(Debug, Clone)]
pub struct RetQueueItem {
    pub addr: u32,
    /// Cycle at which the fill becomes visible to the L2.
    pub ready_cycle: u64,
}

/// The shared L2 cache.
pub struct L2Cache {
    pub array: CacheArray,
    /// When false, the L1s bypass the L2 and charge a flat miss penalty.
    pub enabled: bool,
    pub inclusion: InclusionPolicy,
    /// Hit latency observed by a missing L1, in cycles.
    pub hit_latency: u64,
    pub mshrs: Vec<Mshr>,
    pub req_queue: VecDeque<ReqQueueItem>,
    pub ret_queue: VecDeque<RetQueueItem>,
    pub stats: CacheStats,
    /// Accesses rejected with [`L2AccessStatus::Busy`].
    pub busy_rejections: u64,
    to_dram_delay: u64,
    from_dram_delay: u64,
    trace: bool,
}

impl L2Cache {
    /// Creates the L2 from the hierarchy configuration.
    pub fn new(cfg: &CacheHierarchyConfig, trace: bool) -> Self {
        Self {
            array: CacheArray::new(cfg.l2.sets, cfg.l2.ways, cfg.block_bytes, cfg.repl_policy),
            enabled: cfg.l2.enabled,
            inclusion: cfg.inclusion,
            hit_latency: cfg.l2_hit_latency,
            mshrs: vec![Mshr::default(); cfg.mshr_count],
            req_queue: VecDeque::new(),
            ret_queue: VecDeque::new(),
            stats: CacheStats::default(),
            busy_rejections: 0,
            to_dram_delay: cfg.l2_to_dram_delay,
            from_dram_delay: cfg.dram_to_l2_delay,
            trace,
        }
    }

    /// Services an access from core `core_id`.
    pub fn access(&mut self, addr: u32, is_write: bool, core_id: usize, cycle: u64) -> L2AccessStatus {
        if self.array.probe(addr, is_write) {
            self.stats.record_hit(is_write);
            return L2AccessStatus::Hit;
        }

        let block = self.array.block_align(addr);

        // Merge with an outstanding miss to the same block.
        if let Some(mshr) = self.mshrs.iter_mut().find(|m| m.valid && m.addr == block) {
            mshr.add_requester(core_id);
            self.stats.record_miss(is_write);
            if self.trace {
                eprintln!("L2  merge {block:#010x} core {core_id}");
            }
            return L2AccessStatus::Miss;
        }

        // New miss: allocate an MSHR and head for DRAM.
        if let Some(mshr) = self.mshrs.iter_mut().find(|m| !m.valid) {
            *mshr = Mshr {
                valid: true,
                addr: block,
                is_write,
                requesters: vec![core_id],
            };
            self.req_queue.push_back(ReqQueueItem {
                addr: block,
                is_write,
                requester: Some(core_id),
                source: DramSource::Memory,
                ready_cycle: cycle + self.to_dram_delay,
            });
            self.stats.record_miss(is_write);
            if self.trace {
                eprintln!("L2  miss  {block:#010x} core {core_id}");
            }
            return L2AccessStatus::Miss;
        }

        self.busy_rejections += 1;
        L2AccessStatus::Busy
    }

    /// Accepts a DRAM completion into the return queue.
    pub fn handle_dram_completion(&mut self, addr: u32, cycle: u64) {
        self.ret_queue.push_back(RetQueueItem {
            addr,
            ready_cycle: cycle + self.from_dram_delay,
        });
    }

    /// Advances the L2 by one cycle: drains ready request-queue items into
    /// DRAM (stopping on back-pressure to preserve order) and completes
    /// ready return-queue items.
    pub fn cycle(&mut self, cycle: u64, cores: &mut [Core], dram: &mut Dram) {
        while let Some(item) = self.req_queue.front() {
            if item.ready_cycle > cycle {
                break;
            }
            if !dram.enqueue(item.is_write, item.addr, item.requester, item.source, cycle) {
                // DRAM queue full; retry the same item next cycle.
                break;
            }
            self.req_queue.pop_front();
        }

        while let Some(item) = self.ret_queue.front() {
            if item.ready_cycle > cycle {
                break;
            }
            let addr = item.addr;
            self.ret_queue.pop_front();
            self.complete_fill(addr, cycle, cores);
        }
    }

    /// Installs a block returned by DRAM, frees its MSHR, and wakes every
    /// requester's L1 caches.
    fn complete_fill(&mut self, addr: u32, cycle: u64, cores: &mut [Core]) {
        let block = self.array.block_align(addr);
        let Some(idx) = self.mshrs.iter().position(|m| m.valid && m.addr == block) else {
            return;
        };
        let requesters = std::mem::take(&mut self.mshrs[idx].requesters);
        self.mshrs[idx].valid = false;

        if let Some(victim) = self.array.install(block) {
            // Dirty victim: write back to DRAM through the request queue.
            self.req_queue.push_back(ReqQueueItem {
                addr: victim,
                is_write: true,
                requester: None,
                source: DramSource::Writeback,
                ready_cycle: cycle + self.to_dram_delay,
            });
        }

        if self.trace {
            eprintln!("L2  fill  {block:#010x} wakes {requesters:?}");
        }
        for cid in requesters {
            if let Some(core) = cores.get_mut(cid) {
                core.icache.fill(block);
                core.dcache.fill(block);
            }
        }
    }
}
