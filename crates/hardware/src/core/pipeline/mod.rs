//! In-order five-stage pipeline.
//!
//! Ops flowing through the pipeline are high-level representations of the
//! instructions, not the control signals real hardware would carry: a
//! [`PipeOp`] holds the raw encoding plus operand, destination, memory, and
//! branch information as the stages collect it.
//!
//! Each stage owns an input slot (`Option<PipeOp>`). A stage that runs
//! takes the op out of its slot and places it in the downstream slot; a
//! non-empty downstream slot is a structural stall and the stage leaves its
//! input untouched. Stages execute in reverse order within a cycle so a
//! stage always sees its downstream neighbor's post-move state.

/// The five stage implementations.
pub mod stages;

use crate::config::Config;
use crate::isa::abi;

/// One instruction in flight.
#[derive(Debug, Clone, Default)]
pub struct PipeOp {
    /// PC of this instruction.
    pub pc: u32,
    /// Raw 32-bit encoding.
    pub instruction: u32,
    /// Decoded primary opcode and subop (SPECIAL funct or REGIMM code).
    pub opcode: u32,
    pub subop: u32,

    /// Zero- and sign-extended immediates and shift amount.
    pub imm16: u32,
    pub se_imm16: u32,
    pub shamt: u32,

    /// Source registers (`None` when the instruction has no such source)
    /// and their resolved values.
    pub reg_src1: Option<usize>,
    pub reg_src2: Option<usize>,
    pub reg_src1_value: u32,
    pub reg_src2_value: u32,

    /// Memory access information.
    pub is_mem: bool,
    pub mem_addr: u32,
    pub mem_write: bool,
    pub mem_value: u32,

    /// Destination register, its value, and whether a downstream stage may
    /// bypass the value already.
    pub reg_dst: Option<usize>,
    pub reg_dst_value: u32,
    pub reg_dst_value_ready: bool,

    /// Branch information. `branch_taken` is set as soon as the direction
    /// is known: decode for unconditional jumps, execute for the rest.
    pub is_branch: bool,
    pub branch_cond: bool,
    pub branch_taken: bool,
    pub branch_dest: u32,
    pub branch_link: bool,
}

impl PipeOp {
    /// Creates a fresh op as fetch produces it.
    pub fn new(pc: u32, instruction: u32) -> Self {
        Self {
            pc,
            instruction,
            ..Self::default()
        }
    }
}

/// A scheduled branch recovery: resteer fetch to `dest` and flush the
/// youngest `flush_depth` stages once the current cycle completes.
#[derive(Debug, Clone, Copy)]
pub struct BranchRecovery {
    pub flush_depth: u32,
    pub dest: u32,
}

/// Architectural and pipeline state of one core.
pub struct Pipeline {
    /// Op at the input of each stage (`None` for a bubble).
    pub decode_op: Option<PipeOp>,
    pub execute_op: Option<PipeOp>,
    pub mem_op: Option<PipeOp>,
    pub wb_op: Option<PipeOp>,

    /// Register file. R0 reads as zero; writes to it are ignored at WB.
    pub regs: [u32; abi::NUM_REGS],
    pub hi: u32,
    pub lo: u32,

    /// Program counter of the fetch stage.
    pub pc: u32,

    /// Remaining cycles until HI/LO are readable after MULT/DIV.
    pub multiplier_stall: u32,

    /// Pending branch recovery, applied after all five stages have run.
    pub recovery: Option<BranchRecovery>,

    /// Instruction counters.
    pub fetched: u64,
    pub retired: u64,
    pub squashed: u64,

    mult_latency: u32,
    div_latency: u32,
    pub trace: bool,
    pub core_id: usize,
}

impl Pipeline {
    /// Creates an empty pipeline for core `core_id`.
    pub fn new(core_id: usize, config: &Config) -> Self {
        Self {
            decode_op: None,
            execute_op: None,
            mem_op: None,
            wb_op: None,
            regs: [0; abi::NUM_REGS],
            hi: 0,
            lo: 0,
            pc: config.general.start_pc,
            multiplier_stall: 0,
            recovery: None,
            fetched: 0,
            retired: 0,
            squashed: 0,
            mult_latency: config.pipeline.mult_latency,
            div_latency: config.pipeline.div_latency,
            trace: config.general.trace,
            core_id,
        }
    }

    /// Configured MULT/MULTU result latency.
    pub fn mult_latency(&self) -> u32 {
        self.mult_latency
    }

    /// Configured DIV/DIVU result latency.
    pub fn div_latency(&self) -> u32 {
        self.div_latency
    }

    /// Schedules a branch recovery.
    ///
    /// If a recovery is already scheduled it came from a later stage, i.e.
    /// an older instruction, and that one dominates; the new request is
    /// dropped.
    pub fn recover(&mut self, flush_depth: u32, dest: u32) {
        if self.recovery.is_some() {
            return;
        }
        self.recovery = Some(BranchRecovery { flush_depth, dest });
    }

    /// Applies a pending recovery: resteers the PC and flushes the youngest
    /// stages, counting each squashed op.
    ///
    /// `flush_depth` 2 clears decode only; 3 adds execute; 4 adds mem;
    /// 5 clears all four slots.
    pub fn apply_recovery(&mut self) {
        let Some(recovery) = self.recovery.take() else {
            return;
        };
        if self.trace {
            eprintln!(
                "BR  core {} resteer {:#010x} flush {}",
                self.core_id, recovery.dest, recovery.flush_depth
            );
        }
        self.pc = recovery.dest;
        if recovery.flush_depth >= 2 && self.decode_op.take().is_some() {
            self.squashed += 1;
        }
        if recovery.flush_depth >= 3 && self.execute_op.take().is_some() {
            self.squashed += 1;
        }
        if recovery.flush_depth >= 4 && self.mem_op.take().is_some() {
            self.squashed += 1;
        }
        if recovery.flush_depth >= 5 && self.wb_op.take().is_some() {
            self.squashed += 1;
        }
    }
}
