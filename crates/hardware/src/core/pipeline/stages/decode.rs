//! Instruction Decode (ID) stage.
//!
//! Slices the 32-bit encoding into operand, destination, memory, and branch
//! information. Register values are not read here; the execute stage reads
//! them together with the bypass network.

use crate::core::Core;
use crate::isa::{self, abi, opcodes::*};

/// Executes the decode stage.
///
/// Moves the op from the decode slot to the execute slot once the fields
/// are filled in. Unconditional direct jumps resolve `branch_taken` here;
/// link instructions pre-set `$ra` so the value can be bypassed
/// immediately. An unknown opcode decodes to an op with no destination and
/// no side effects.
pub fn decode_stage(core: &mut Core) {
    let pipe = &mut core.pipe;

    if pipe.execute_op.is_some() {
        return;
    }
    let Some(mut op) = pipe.decode_op.take() else {
        return;
    };

    let inst = op.instruction;
    let rs = isa::rs(inst);
    let rt = isa::rt(inst);
    let rd = isa::rd(inst);

    op.opcode = isa::opcode(inst);
    op.imm16 = isa::imm16(inst);
    op.se_imm16 = isa::se_imm16(inst);
    op.shamt = isa::shamt(inst);

    match op.opcode {
        OP_SPECIAL => {
            // R-types use the ALU and both source registers.
            op.reg_src1 = Some(rs);
            op.reg_src2 = Some(rt);
            op.reg_dst = Some(rd);
            op.subop = isa::funct(inst);
            if op.subop == SUBOP_SYSCALL {
                // The syscall reads $v0 (number) and $v1 (argument).
                op.reg_src1 = Some(abi::REG_V0);
                op.reg_src2 = Some(abi::REG_V1);
            }
            if op.subop == SUBOP_JR || op.subop == SUBOP_JALR {
                op.is_branch = true;
                op.branch_cond = false;
                op.branch_link = op.subop == SUBOP_JALR;
            }
        }

        OP_BRSPEC => {
            // REGIMM branches; the rt field selects the comparison.
            op.is_branch = true;
            op.branch_cond = true;
            op.reg_src1 = Some(rs);
            op.branch_dest = op.pc.wrapping_add(4).wrapping_add(op.se_imm16 << 2);
            op.subop = rt as u32;
            if op.subop == BROP_BLTZAL || op.subop == BROP_BGEZAL {
                op.branch_link = true;
                op.reg_dst = Some(abi::REG_RA);
                op.reg_dst_value = op.pc.wrapping_add(4);
                op.reg_dst_value_ready = true;
            }
        }

        OP_JAL | OP_J => {
            if op.opcode == OP_JAL {
                op.branch_link = true;
                op.reg_dst = Some(abi::REG_RA);
                op.reg_dst_value = op.pc.wrapping_add(4);
                op.reg_dst_value_ready = true;
            }
            op.is_branch = true;
            op.branch_cond = false;
            op.branch_taken = true;
            op.branch_dest = (op.pc & 0xf000_0000) | isa::jump_target(inst);
        }

        OP_BEQ | OP_BNE | OP_BLEZ | OP_BGTZ => {
            // Ordinary conditional branches, resolved in execute.
            op.is_branch = true;
            op.branch_cond = true;
            op.branch_dest = op.pc.wrapping_add(4).wrapping_add(op.se_imm16 << 2);
            op.reg_src1 = Some(rs);
            op.reg_src2 = Some(rt);
        }

        OP_ADDI | OP_ADDIU | OP_SLTI | OP_SLTIU | OP_ANDI | OP_ORI | OP_XORI | OP_LUI => {
            // I-type ALU ops.
            op.reg_src1 = Some(rs);
            op.reg_dst = Some(rt);
        }

        OP_LW | OP_LH | OP_LHU | OP_LB | OP_LBU | OP_SB | OP_SH | OP_SW => {
            op.is_mem = true;
            op.reg_src1 = Some(rs);
            if matches!(op.opcode, OP_LW | OP_LH | OP_LHU | OP_LB | OP_LBU) {
                op.mem_write = false;
                op.reg_dst = Some(rt);
            } else {
                op.mem_write = true;
                op.reg_src2 = Some(rt);
            }
        }

        _ => {
            // Unknown opcode: no destination, no side effects.
            if pipe.trace {
                eprintln!(
                    "ID  core {} pc={:#010x} unknown opcode {:#04x}",
                    pipe.core_id, op.pc, op.opcode
                );
            }
        }
    }

    pipe.execute_op = Some(op);
}
