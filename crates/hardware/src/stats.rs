//! Simulation statistics collection and reporting.
//!
//! This module tracks the counters the simulator exposes. It provides:
//! 1. **Cache counters:** read/write hits and misses per cache instance.
//! 2. **Core counters:** fetched, retired, and squashed instructions.
//! 3. **Snapshot:** [`SimStats`] gathers everything for printing in one
//!    aligned report.

use crate::processor::Processor;

/// Hit/miss counters of one cache instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    pub read_hits: u64,
    pub read_misses: u64,
    pub write_hits: u64,
    pub write_misses: u64,
}

impl CacheStats {
    /// Records a completed access that hit.
    pub fn record_hit(&mut self, is_write: bool) {
        if is_write {
            self.write_hits += 1;
        } else {
            self.read_hits += 1;
        }
    }

    /// Records an access that missed.
    pub fn record_miss(&mut self, is_write: bool) {
        if is_write {
            self.write_misses += 1;
        } else {
            self.read_misses += 1;
        }
    }

    /// Total accesses counted.
    pub fn accesses(&self) -> u64 {
        self.read_hits + self.read_misses + self.write_hits + self.write_misses
    }

    /// Miss ratio over all counted accesses, in percent.
    pub fn miss_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            return 0.0;
        }
        100.0 * (self.read_misses + self.write_misses) as f64 / total as f64
    }
}

/// Instruction counters of one core.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoreStats {
    pub fetched: u64,
    pub retired: u64,
    pub squashed: u64,
}

/// A printable snapshot of every counter in the machine.
#[derive(Debug, Clone, Default)]
pub struct SimStats {
    pub cycles: u64,
    pub cores: Vec<CoreStats>,
    pub icaches: Vec<CacheStats>,
    pub dcaches: Vec<CacheStats>,
    pub l2: CacheStats,
    pub l2_busy_rejections: u64,
    pub dram_reads: u64,
    pub dram_writes: u64,
    pub dram_row_hits: u64,
    pub dram_row_misses: u64,
    pub dram_row_conflicts: u64,
}

impl SimStats {
    /// Captures a snapshot of the machine's counters.
    pub fn collect(proc: &Processor) -> Self {
        Self {
            cycles: proc.cycles,
            cores: proc
                .cores
                .iter()
                .map(|c| CoreStats {
                    fetched: c.pipe.fetched,
                    retired: c.pipe.retired,
                    squashed: c.pipe.squashed,
                })
                .collect(),
            icaches: proc.cores.iter().map(|c| c.icache.stats).collect(),
            dcaches: proc.cores.iter().map(|c| c.dcache.stats).collect(),
            l2: proc.l2.stats,
            l2_busy_rejections: proc.l2.busy_rejections,
            dram_reads: proc.dram.stats.reads,
            dram_writes: proc.dram.stats.writes,
            dram_row_hits: proc.dram.stats.row_hits,
            dram_row_misses: proc.dram.stats.row_misses,
            dram_row_conflicts: proc.dram.stats.row_conflicts,
        }
    }

    /// Prints the full report to stdout.
    pub fn print(&self) {
        println!("----------------------------------------------------------");
        println!("MIPS MULTICORE SIMULATION STATISTICS");
        println!("----------------------------------------------------------");
        println!("sim_cycles               {}", self.cycles);
        for (id, core) in self.cores.iter().enumerate() {
            println!(
                "core {id}: fetched {:<10} retired {:<10} squashed {}",
                core.fetched, core.retired, core.squashed
            );
        }
        println!("----------------------------------------------------------");
        let print_cache = |name: String, s: &CacheStats| {
            println!(
                "  {:<10} rd_hit {:<8} rd_miss {:<8} wr_hit {:<8} wr_miss {:<8} miss_rate {:.2}%",
                name, s.read_hits, s.read_misses, s.write_hits, s.write_misses, s.miss_rate()
            );
        };
        println!("MEMORY HIERARCHY");
        for (id, s) in self.icaches.iter().enumerate() {
            print_cache(format!("L1I[{id}]"), s);
        }
        for (id, s) in self.dcaches.iter().enumerate() {
            print_cache(format!("L1D[{id}]"), s);
        }
        print_cache("L2".to_string(), &self.l2);
        println!("  L2 busy rejections     {}", self.l2_busy_rejections);
        println!(
            "  DRAM reads {} writes {} row_hits {} row_misses {} row_conflicts {}",
            self.dram_reads,
            self.dram_writes,
            self.dram_row_hits,
            self.dram_row_misses,
            self.dram_row_conflicts
        );
        println!("----------------------------------------------------------");
    }
}
