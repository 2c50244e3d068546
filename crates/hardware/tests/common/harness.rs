//! Machine-building test harness.
//!
//! `TestContext` wraps a [`Processor`] with helpers for loading raw
//! instruction words and inspecting architectural state. Pipeline-semantics
//! tests use [`TestContext::new`], which disables the L1 caches so every
//! access completes in its issuing cycle and cycle counts are exact;
//! hierarchy tests pass their own configuration via
//! [`TestContext::with_config`].

use mips_core::config::Config;
use mips_core::mem::MEM_TEXT_START;
use mips_core::sim::loader;
use mips_core::{Memory, Processor};

pub struct TestContext {
    pub proc: Processor,
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TestContext {
    /// A machine with perfect L1 caches: pipeline timing only.
    pub fn new() -> Self {
        Self::with_config(perfect_cache_config())
    }

    /// A machine built from an explicit configuration.
    pub fn with_config(config: Config) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            proc: Processor::new(&config),
        }
    }

    /// Loads instruction words at the start of the text segment.
    pub fn load_program(mut self, words: &[u32]) -> Self {
        loader::load_words(&mut self.proc.mem, MEM_TEXT_START, words);
        self
    }

    /// Writes a data word before the program runs.
    pub fn with_word(mut self, addr: u32, val: u32) -> Self {
        self.proc.mem.write_32(addr, val);
        self
    }

    pub fn mem(&self) -> &Memory {
        &self.proc.mem
    }

    /// Advances the machine `cycles` clocks.
    pub fn run(&mut self, cycles: u64) {
        for _ in 0..cycles {
            self.proc.cycle();
        }
    }

    /// Runs until every core halts; panics if `max_cycles` elapse first.
    ///
    /// Returns the total cycle count at halt.
    pub fn run_until_halt(&mut self, max_cycles: u64) -> u64 {
        self.proc.run_until_halt(max_cycles);
        assert_eq!(
            self.proc.active_cores_count(),
            0,
            "machine did not halt within {max_cycles} cycles"
        );
        self.proc.cycles
    }

    /// Reads a general-purpose register of one core.
    pub fn reg(&self, core: usize, reg: usize) -> u32 {
        self.proc.cores[core].pipe.regs[reg]
    }

    /// Presets a general-purpose register of one core.
    pub fn set_reg(&mut self, core: usize, reg: usize, val: u32) {
        self.proc.cores[core].pipe.regs[reg] = val;
    }
}

/// Default machine with the L1 caches disabled (perfect).
pub fn perfect_cache_config() -> Config {
    let mut config = Config::default();
    config.cache.l1_i.enabled = false;
    config.cache.l1_d.enabled = false;
    config
}
