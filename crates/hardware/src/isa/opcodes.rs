//! MIPS-I opcode encodings.
//!
//! Three namespaces share the 32-bit encoding:
//! 1. **Primary opcodes** in bits 31..26.
//! 2. **SPECIAL subops** in bits 5..0 when the primary opcode is
//!    [`OP_SPECIAL`].
//! 3. **REGIMM branch codes** in the `rt` field when the primary opcode is
//!    [`OP_BRSPEC`].

/// R-type instructions; the function field selects the operation.
pub const OP_SPECIAL: u32 = 0x00;
/// REGIMM branches (BLTZ/BGEZ and their link variants).
pub const OP_BRSPEC: u32 = 0x01;
/// Unconditional direct jump.
pub const OP_J: u32 = 0x02;
/// Jump and link.
pub const OP_JAL: u32 = 0x03;
/// Branch if equal.
pub const OP_BEQ: u32 = 0x04;
/// Branch if not equal.
pub const OP_BNE: u32 = 0x05;
/// Branch if less than or equal to zero.
pub const OP_BLEZ: u32 = 0x06;
/// Branch if greater than zero.
pub const OP_BGTZ: u32 = 0x07;
/// Add immediate (no overflow trap is modeled).
pub const OP_ADDI: u32 = 0x08;
/// Add immediate unsigned.
pub const OP_ADDIU: u32 = 0x09;
/// Set on less than immediate, signed.
pub const OP_SLTI: u32 = 0x0a;
/// Set on less than immediate, unsigned.
pub const OP_SLTIU: u32 = 0x0b;
/// Bitwise AND with zero-extended immediate.
pub const OP_ANDI: u32 = 0x0c;
/// Bitwise OR with zero-extended immediate.
pub const OP_ORI: u32 = 0x0d;
/// Bitwise XOR with zero-extended immediate.
pub const OP_XORI: u32 = 0x0e;
/// Load upper immediate.
pub const OP_LUI: u32 = 0x0f;
/// Load byte, sign-extended.
pub const OP_LB: u32 = 0x20;
/// Load halfword, sign-extended.
pub const OP_LH: u32 = 0x21;
/// Load word.
pub const OP_LW: u32 = 0x23;
/// Load byte, zero-extended.
pub const OP_LBU: u32 = 0x24;
/// Load halfword, zero-extended.
pub const OP_LHU: u32 = 0x25;
/// Store byte.
pub const OP_SB: u32 = 0x28;
/// Store halfword.
pub const OP_SH: u32 = 0x29;
/// Store word.
pub const OP_SW: u32 = 0x2b;

/// SPECIAL function field values.
pub const SUBOP_SLL: u32 = 0x00;
pub const SUBOP_SRL: u32 = 0x02;
pub const SUBOP_SRA: u32 = 0x03;
pub const SUBOP_SLLV: u32 = 0x04;
pub const SUBOP_SRLV: u32 = 0x06;
pub const SUBOP_SRAV: u32 = 0x07;
pub const SUBOP_JR: u32 = 0x08;
pub const SUBOP_JALR: u32 = 0x09;
pub const SUBOP_SYSCALL: u32 = 0x0c;
pub const SUBOP_MFHI: u32 = 0x10;
pub const SUBOP_MTHI: u32 = 0x11;
pub const SUBOP_MFLO: u32 = 0x12;
pub const SUBOP_MTLO: u32 = 0x13;
pub const SUBOP_MULT: u32 = 0x18;
pub const SUBOP_MULTU: u32 = 0x19;
pub const SUBOP_DIV: u32 = 0x1a;
pub const SUBOP_DIVU: u32 = 0x1b;
pub const SUBOP_ADD: u32 = 0x20;
pub const SUBOP_ADDU: u32 = 0x21;
pub const SUBOP_SUB: u32 = 0x22;
pub const SUBOP_SUBU: u32 = 0x23;
pub const SUBOP_AND: u32 = 0x24;
pub const SUBOP_OR: u32 = 0x25;
pub const SUBOP_XOR: u32 = 0x26;
pub const SUBOP_NOR: u32 = 0x27;
pub const SUBOP_SLT: u32 = 0x2a;
pub const SUBOP_SLTU: u32 = 0x2b;

/// REGIMM `rt` field values.
pub const BROP_BLTZ: u32 = 0x00;
pub const BROP_BGEZ: u32 = 0x01;
pub const BROP_BLTZAL: u32 = 0x10;
pub const BROP_BGEZAL: u32 = 0x11;
