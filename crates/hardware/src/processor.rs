//! Top-level processor: all cores, the shared L2, DRAM, and the clock.
//!
//! One call to [`Processor::cycle`] advances the machine by exactly one
//! global clock, in this order:
//! 1. DRAM executes; a completed demand request is handed to the L2.
//! 2. The L2 drains its request/return queues, completing MSHRs and
//!    filling the requesters' L1 caches.
//! 3. Each core ticks; spawn syscalls are applied between ticks so a core
//!    spawned by a lower-numbered core starts in the same cycle.
//! 4. The global cycle counter increments.
//!
//! Running the memory return path before the cores means a fill initiated
//! in cycle N is visible to the requesting core at cycle N+1 at the
//! earliest.

use crate::cache::l2::L2Cache;
use crate::config::Config;
use crate::core::{Core, SpawnRequest};
use crate::dram::{Dram, DramSource};
use crate::mem::Memory;
use crate::stats::SimStats;

/// The whole machine.
pub struct Processor {
    pub cores: Vec<Core>,
    pub l2: L2Cache,
    pub dram: Dram,
    pub mem: Memory,
    /// Global cycle counter; every component observes the same value
    /// throughout one tick.
    pub cycles: u64,
}

impl Processor {
    /// Builds the machine described by `config`.
    pub fn new(config: &Config) -> Self {
        Self {
            cores: (0..config.system.num_cores)
                .map(|id| Core::new(id, config))
                .collect(),
            l2: L2Cache::new(&config.cache, config.general.trace),
            dram: Dram::new(&config.dram),
            mem: Memory::new(),
            cycles: 0,
        }
    }

    /// Advances the machine by one global clock.
    pub fn cycle(&mut self) {
        if let Some(done) = self.dram.execute(self.cycles) {
            if done.source == DramSource::Memory {
                self.l2.handle_dram_completion(done.addr, self.cycles);
            }
        }

        self.l2.cycle(self.cycles, &mut self.cores, &mut self.dram);

        for i in 0..self.cores.len() {
            let spawn = self.cores[i].cycle(&mut self.l2, &mut self.mem, self.cycles);
            if let Some(req) = spawn {
                self.apply_spawn(req);
            }
        }

        self.cycles += 1;
    }

    /// Number of cores whose running flag is set.
    pub fn active_cores_count(&self) -> usize {
        self.cores.iter().filter(|c| c.running).count()
    }

    /// Runs until every core has halted, at most `max_cycles` clocks.
    ///
    /// Returns the number of cycles executed by this call.
    pub fn run_until_halt(&mut self, max_cycles: u64) -> u64 {
        let start = self.cycles;
        while self.active_cores_count() > 0 && self.cycles - start < max_cycles {
            self.cycle();
        }
        self.cycles - start
    }

    /// Snapshot of every counter for reporting.
    pub fn stats(&self) -> SimStats {
        SimStats::collect(self)
    }

    /// Starts `req.target` if it is a different, currently idle core.
    ///
    /// The child observes `$v1 == 1`, the parent `$v1 == 0`; an invalid or
    /// already-running target makes the spawn a no-op.
    fn apply_spawn(&mut self, req: SpawnRequest) {
        use crate::isa::abi::REG_V1;

        if req.target == req.source || req.target >= self.cores.len() {
            return;
        }
        if self.cores[req.target].running {
            return;
        }
        self.cores[req.target].pipe.pc = req.pc;
        self.cores[req.target].pipe.regs[REG_V1] = 1;
        self.cores[req.target].running = true;
        self.cores[req.source].pipe.regs[REG_V1] = 0;
    }
}
