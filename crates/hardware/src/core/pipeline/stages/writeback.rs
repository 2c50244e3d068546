//! Writeback (WB) stage.
//!
//! Commits destination values to the register file and retires the op.
//! Writes to register 0 are dropped. SYSCALL ops are forwarded to the core
//! here; a spawn request cannot be applied inside the core and is returned
//! to the processor instead.

use crate::core::{Core, SpawnRequest};
use crate::isa::opcodes::{OP_SPECIAL, SUBOP_SYSCALL};

/// Executes the writeback stage.
///
/// Returns a spawn request when the retired op was a spawn syscall.
pub fn wb_stage(core: &mut Core) -> Option<SpawnRequest> {
    let Some(op) = core.pipe.wb_op.take() else {
        return None;
    };

    if let Some(reg) = op.reg_dst {
        if reg != 0 {
            core.pipe.regs[reg] = op.reg_dst_value;
            if core.pipe.trace {
                eprintln!(
                    "WB  core {} pc={:#010x} r{} <= {:#010x}",
                    core.id, op.pc, reg, op.reg_dst_value
                );
            }
        }
    }

    core.pipe.retired += 1;

    if op.opcode == OP_SPECIAL && op.subop == SUBOP_SYSCALL {
        return core.handle_syscall(&op);
    }
    None
}
