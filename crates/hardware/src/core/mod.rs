//! CPU core: one pipeline plus its private L1 caches.
//!
//! A core ticks its pipeline when its running flag is set and services the
//! syscalls the writeback stage surfaces:
//! 1. **Halt** (`$v0 == 0x0A`): park the PC on the syscall and stop.
//! 2. **Print** (`$v0 == 0x0B`): emit `$v1` on stdout.
//! 3. **Spawn** (`$v0` in 1..=3): start the target core right after this
//!    instruction. The target's state lives in the processor, so the spawn
//!    is returned as an event and applied between core ticks.
//!
//! Core 0 starts running; all others wait for a spawn.

/// Pipeline state and stages.
pub mod pipeline;

use crate::cache::l1::{CacheKind, L1Cache};
use crate::cache::l2::L2Cache;
use crate::config::Config;
use crate::core::pipeline::{Pipeline, stages};
use crate::mem::Memory;

/// Syscall numbers in `$v0`.
const SYSCALL_HALT: u32 = 0x0a;
const SYSCALL_PRINT: u32 = 0x0b;
const SYSCALL_SPAWN_MAX: u32 = 0x03;

/// A spawn syscall observed at writeback, to be applied by the processor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Core that executed the syscall.
    pub source: usize,
    /// Core to start.
    pub target: usize,
    /// PC the target starts at (the instruction after the syscall).
    pub pc: u32,
}

/// One CPU core.
pub struct Core {
    pub id: usize,
    /// True while this core's pipeline should tick.
    pub running: bool,
    pub pipe: Pipeline,
    pub icache: L1Cache,
    pub dcache: L1Cache,
}

impl Core {
    /// Creates core `id`. Core 0 starts running by default.
    pub fn new(id: usize, config: &Config) -> Self {
        let trace = config.general.trace;
        Self {
            id,
            running: id == 0,
            pipe: Pipeline::new(id, config),
            icache: L1Cache::new(
                id,
                CacheKind::Instruction,
                &config.cache.l1_i,
                &config.cache,
                trace,
            ),
            dcache: L1Cache::new(id, CacheKind::Data, &config.cache.l1_d, &config.cache, trace),
        }
    }

    /// Advances this core by one cycle.
    ///
    /// Runs the five stages in reverse order so stall propagation settles
    /// in a single pass, then applies any scheduled branch recovery.
    /// Returns a spawn request when one retired this cycle.
    pub fn cycle(&mut self, l2: &mut L2Cache, mem: &mut Memory, cycle: u64) -> Option<SpawnRequest> {
        if !self.running {
            return None;
        }

        let spawn = stages::wb_stage(self);
        stages::mem_stage(self, l2, mem, cycle);
        stages::execute_stage(self);
        stages::decode_stage(self);
        stages::fetch_stage(self, l2, mem, cycle);

        self.pipe.apply_recovery();

        spawn
    }

    /// Services a syscall op forwarded from the writeback stage.
    ///
    /// `$v0` selects the operation; an unrecognized number is ignored.
    pub fn handle_syscall(&mut self, op: &pipeline::PipeOp) -> Option<SpawnRequest> {
        let v0 = op.reg_src1_value;
        let v1 = op.reg_src2_value;

        match v0 {
            SYSCALL_HALT => {
                // Park the PC on the syscall itself so the reported PC sits
                // immediately past it once fetch would resume.
                self.pipe.pc = op.pc;
                self.running = false;
                None
            }
            SYSCALL_PRINT => {
                println!("OUT (CPU {}): {:08x}", self.id, v1);
                None
            }
            1..=SYSCALL_SPAWN_MAX => Some(SpawnRequest {
                source: self.id,
                target: v0 as usize,
                pc: op.pc.wrapping_add(4),
            }),
            _ => None,
        }
    }
}
