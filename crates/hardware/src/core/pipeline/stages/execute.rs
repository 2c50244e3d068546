//! Execute (EX) stage.
//!
//! Reads source registers through the bypass network, performs the
//! ALU/shift/compare work, manages the long-latency multiplier/divider via
//! the `multiplier_stall` counter, and resolves branch directions. A taken
//! branch schedules a recovery with flush depth 3 (decode and execute are
//! squashed once the cycle completes).

use crate::core::Core;
use crate::core::pipeline::Pipeline;
use crate::isa::opcodes::*;

/// Taken branches flush fetch, decode, and execute.
const BRANCH_FLUSH_DEPTH: u32 = 3;

/// Reads one source register through the bypass network.
///
/// Priority: the mem slot (stall while its value is not ready), then the
/// wb slot, then the register file. Register 0 always resolves to 0.
fn read_source(reg: usize, pipe: &Pipeline, stall: &mut bool) -> u32 {
    if reg == 0 {
        return 0;
    }
    if let Some(mem_op) = &pipe.mem_op {
        if mem_op.reg_dst == Some(reg) {
            if !mem_op.reg_dst_value_ready {
                *stall = true;
                return 0;
            }
            return mem_op.reg_dst_value;
        }
    }
    if let Some(wb_op) = &pipe.wb_op {
        if wb_op.reg_dst == Some(reg) {
            return wb_op.reg_dst_value;
        }
    }
    pipe.regs[reg]
}

/// Executes the execute stage.
pub fn execute_stage(core: &mut Core) {
    let pipe = &mut core.pipe;

    // A multiply/divide in progress gets one cycle closer to done whether
    // or not an op executes.
    if pipe.multiplier_stall > 0 {
        pipe.multiplier_stall -= 1;
    }

    if pipe.mem_op.is_some() {
        return;
    }
    let Some(mut op) = pipe.execute_op.take() else {
        return;
    };

    // Read register values, checking for bypass; stall if a producer's
    // value is not ready yet.
    let mut stall = false;
    if let Some(reg) = op.reg_src1 {
        op.reg_src1_value = read_source(reg, pipe, &mut stall);
    }
    if let Some(reg) = op.reg_src2 {
        op.reg_src2_value = read_source(reg, pipe, &mut stall);
    }
    if stall {
        pipe.execute_op = Some(op);
        return;
    }

    let src1 = op.reg_src1_value;
    let src2 = op.reg_src2_value;

    match op.opcode {
        OP_SPECIAL => {
            op.reg_dst_value_ready = true;
            match op.subop {
                SUBOP_SLL => op.reg_dst_value = src2 << op.shamt,
                SUBOP_SLLV => op.reg_dst_value = src2 << (src1 & 0x1f),
                SUBOP_SRL => op.reg_dst_value = src2 >> op.shamt,
                SUBOP_SRLV => op.reg_dst_value = src2 >> (src1 & 0x1f),
                SUBOP_SRA => op.reg_dst_value = ((src2 as i32) >> op.shamt) as u32,
                SUBOP_SRAV => op.reg_dst_value = ((src2 as i32) >> (src1 & 0x1f)) as u32,

                SUBOP_JR | SUBOP_JALR => {
                    op.reg_dst_value = op.pc.wrapping_add(4);
                    op.branch_dest = src1;
                    op.branch_taken = true;
                }

                SUBOP_MULT => {
                    // The product is computed right away; the stall counter
                    // models the latency a reader of HI/LO would observe.
                    let val = (src1 as i32 as i64).wrapping_mul(src2 as i32 as i64) as u64;
                    pipe.hi = (val >> 32) as u32;
                    pipe.lo = val as u32;
                    pipe.multiplier_stall = pipe.mult_latency();
                }
                SUBOP_MULTU => {
                    let val = (src1 as u64).wrapping_mul(src2 as u64);
                    pipe.hi = (val >> 32) as u32;
                    pipe.lo = val as u32;
                    pipe.multiplier_stall = pipe.mult_latency();
                }

                SUBOP_DIV => {
                    if src2 != 0 {
                        pipe.lo = (src1 as i32).wrapping_div(src2 as i32) as u32;
                        pipe.hi = (src1 as i32).wrapping_rem(src2 as i32) as u32;
                    } else {
                        // A real machine would raise a divide-by-zero trap.
                        pipe.hi = 0;
                        pipe.lo = 0;
                    }
                    pipe.multiplier_stall = pipe.div_latency();
                }
                SUBOP_DIVU => {
                    if src2 != 0 {
                        pipe.hi = src1 % src2;
                        pipe.lo = src1 / src2;
                    } else {
                        pipe.hi = 0;
                        pipe.lo = 0;
                    }
                    pipe.multiplier_stall = pipe.div_latency();
                }

                SUBOP_MFHI => {
                    // Stall until the value is ready.
                    if pipe.multiplier_stall > 0 {
                        pipe.execute_op = Some(op);
                        return;
                    }
                    op.reg_dst_value = pipe.hi;
                }
                SUBOP_MTHI => {
                    // Stall to respect the WAW dependence on HI.
                    if pipe.multiplier_stall > 0 {
                        pipe.execute_op = Some(op);
                        return;
                    }
                    pipe.hi = src1;
                }
                SUBOP_MFLO => {
                    if pipe.multiplier_stall > 0 {
                        pipe.execute_op = Some(op);
                        return;
                    }
                    op.reg_dst_value = pipe.lo;
                }
                SUBOP_MTLO => {
                    if pipe.multiplier_stall > 0 {
                        pipe.execute_op = Some(op);
                        return;
                    }
                    pipe.lo = src1;
                }

                SUBOP_ADD | SUBOP_ADDU => op.reg_dst_value = src1.wrapping_add(src2),
                SUBOP_SUB | SUBOP_SUBU => op.reg_dst_value = src1.wrapping_sub(src2),
                SUBOP_AND => op.reg_dst_value = src1 & src2,
                SUBOP_OR => op.reg_dst_value = src1 | src2,
                SUBOP_NOR => op.reg_dst_value = !(src1 | src2),
                SUBOP_XOR => op.reg_dst_value = src1 ^ src2,
                SUBOP_SLT => op.reg_dst_value = ((src1 as i32) < (src2 as i32)) as u32,
                SUBOP_SLTU => op.reg_dst_value = (src1 < src2) as u32,

                _ => {}
            }
        }

        OP_BRSPEC => match op.subop {
            BROP_BLTZ | BROP_BLTZAL => {
                if (src1 as i32) < 0 {
                    op.branch_taken = true;
                }
            }
            BROP_BGEZ | BROP_BGEZAL => {
                if (src1 as i32) >= 0 {
                    op.branch_taken = true;
                }
            }
            _ => {}
        },

        OP_BEQ => {
            if src1 == src2 {
                op.branch_taken = true;
            }
        }
        OP_BNE => {
            if src1 != src2 {
                op.branch_taken = true;
            }
        }
        OP_BLEZ => {
            if (src1 as i32) <= 0 {
                op.branch_taken = true;
            }
        }
        OP_BGTZ => {
            if (src1 as i32) > 0 {
                op.branch_taken = true;
            }
        }

        OP_ADDI | OP_ADDIU => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = src1.wrapping_add(op.se_imm16);
        }
        OP_SLTI => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = ((src1 as i32) < (op.se_imm16 as i32)) as u32;
        }
        OP_SLTIU => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = (src1 < op.se_imm16) as u32;
        }
        OP_ANDI => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = src1 & op.imm16;
        }
        OP_ORI => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = src1 | op.imm16;
        }
        OP_XORI => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = src1 ^ op.imm16;
        }
        OP_LUI => {
            op.reg_dst_value_ready = true;
            op.reg_dst_value = op.imm16 << 16;
        }

        OP_LW | OP_LH | OP_LHU | OP_LB | OP_LBU => {
            op.mem_addr = src1.wrapping_add(op.se_imm16);
        }
        OP_SW | OP_SH | OP_SB => {
            op.mem_addr = src1.wrapping_add(op.se_imm16);
            op.mem_value = src2;
        }

        _ => {}
    }

    if pipe.trace {
        eprintln!(
            "EX  core {} pc={:#010x} op={:#04x} taken={}",
            pipe.core_id, op.pc, op.opcode, op.branch_taken
        );
    }

    if op.branch_taken {
        pipe.recover(BRANCH_FLUSH_DEPTH, op.branch_dest);
    }

    pipe.mem_op = Some(op);
}
