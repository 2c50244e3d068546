//! Instruction Fetch (IF) stage.
//!
//! Fetches one instruction per cycle from the current PC through the
//! I-cache. A non-empty decode slot (structural stall) or a blocked I-cache
//! leaves the PC unchanged so the same fetch retries next cycle.

use crate::cache::l2::L2Cache;
use crate::core::Core;
use crate::core::pipeline::PipeOp;
use crate::mem::Memory;

/// Executes the fetch stage.
///
/// If the decode slot is free and the I-cache access for the current PC
/// completes this cycle, reads the instruction word from functional memory,
/// places a fresh op in the decode slot, and advances the PC by 4.
pub fn fetch_stage(core: &mut Core, l2: &mut L2Cache, mem: &Memory, cycle: u64) {
    let Core { pipe, icache, .. } = core;

    if pipe.decode_op.is_some() {
        return;
    }

    if !icache.access(pipe.pc, false, l2, cycle) {
        return;
    }

    let instruction = mem.read_32(pipe.pc);
    if pipe.trace {
        eprintln!(
            "IF  core {} pc={:#010x} inst={:#010x}",
            pipe.core_id, pipe.pc, instruction
        );
    }

    pipe.decode_op = Some(PipeOp::new(pipe.pc, instruction));
    pipe.pc = pipe.pc.wrapping_add(4);
    pipe.fetched += 1;
}
