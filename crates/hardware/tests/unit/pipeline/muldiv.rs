//! Multiplier and divider latency modeling.
//!
//! MULT/MULTU compute HI/LO immediately but arm a stall counter; reads of
//! HI/LO (and MTHI/MTLO, for the WAW dependence) hold in execute until the
//! counter drains.

use crate::common::asm;
use crate::common::harness::{TestContext, perfect_cache_config};

/// MFHI immediately after MULT stalls for three extra cycles; spacing the
/// pair with four independent instructions hides the latency completely.
///
/// Program B carries four more instructions than program A but loses the
/// three stall cycles, so it halts exactly one cycle later.
#[test]
fn mfhi_stalls_until_product_ready() {
    let program_a = [
        asm::addiu(1, 0, -2),
        asm::addiu(4, 0, 7),
        asm::mult(1, 4),
        asm::mfhi(5),
        asm::mflo(6),
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ];
    let program_b = [
        asm::addiu(1, 0, -2),
        asm::addiu(4, 0, 7),
        asm::mult(1, 4),
        asm::nop(),
        asm::nop(),
        asm::nop(),
        asm::nop(),
        asm::mfhi(5),
        asm::mflo(6),
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ];

    let mut a = TestContext::new().load_program(&program_a);
    let cycles_a = a.run_until_halt(100);
    let mut b = TestContext::new().load_program(&program_b);
    let cycles_b = b.run_until_halt(100);

    // -2 * 7 = -14 = 0xffffffff_fffffff2
    for ctx in [&a, &b] {
        assert_eq!(ctx.reg(0, 5), 0xffff_ffff);
        assert_eq!(ctx.reg(0, 6), 0xffff_fff2);
    }
    assert_eq!(cycles_a, 14);
    assert_eq!(cycles_b, 15);
}

/// MULTU treats both operands as unsigned.
#[test]
fn multu_is_unsigned() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addiu(1, 0, -1), // 0xffffffff
        asm::addiu(4, 0, 2),
        asm::multu(1, 4),
        asm::mfhi(5), // 0x1
        asm::mflo(6), // 0xfffffffe
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ]);

    ctx.run_until_halt(100);

    assert_eq!(ctx.reg(0, 5), 1);
    assert_eq!(ctx.reg(0, 6), 0xffff_fffe);
}

/// DIV leaves the quotient in LO and the remainder in HI.
#[test]
fn div_quotient_and_remainder() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addiu(1, 0, 45),
        asm::addiu(4, 0, 7),
        asm::div(1, 4),
        asm::mflo(5),
        asm::mfhi(6),
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ]);

    ctx.run_until_halt(200);

    assert_eq!(ctx.reg(0, 5), 6);
    assert_eq!(ctx.reg(0, 6), 3);
}

/// Dividing by zero zeroes HI and LO instead of trapping.
#[test]
fn div_by_zero_zeroes_hi_lo() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addiu(1, 0, 45),
        asm::mthi(1),
        asm::mtlo(1),
        asm::div(1, 0),
        asm::mflo(5),
        asm::mfhi(6),
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ]);

    ctx.run_until_halt(200);

    assert_eq!(ctx.reg(0, 5), 0);
    assert_eq!(ctx.reg(0, 6), 0);
}

/// DIVU with a configured two-cycle divider: the latency knob is honored.
#[test]
fn divu_with_configured_latency() {
    let mut config = perfect_cache_config();
    config.pipeline.div_latency = 2;
    let mut ctx = TestContext::with_config(config).load_program(&[
        asm::addiu(1, 0, -1), // 0xffffffff unsigned
        asm::addiu(4, 0, 2),
        asm::divu(1, 4),
        asm::mflo(5), // 0x7fffffff
        asm::mfhi(6), // 1
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ]);

    let cycles = ctx.run_until_halt(100);

    assert_eq!(ctx.reg(0, 5), 0x7fff_ffff);
    assert_eq!(ctx.reg(0, 6), 1);
    // One residual stall cycle: the two-cycle counter drains by the mflo's
    // second execute attempt.
    assert_eq!(cycles, 12);
}

/// MTHI/MTLO write through once no multiply is in flight.
#[test]
fn mthi_mtlo_set_hi_lo() {
    let mut ctx = TestContext::new().load_program(&[
        asm::addiu(1, 0, 5),
        asm::addiu(4, 0, 9),
        asm::mthi(1),
        asm::mtlo(4),
        asm::mfhi(5),
        asm::mflo(6),
        asm::addiu(2, 0, 0x0a),
        asm::syscall(),
    ]);

    ctx.run_until_halt(100);

    assert_eq!(ctx.reg(0, 5), 5);
    assert_eq!(ctx.reg(0, 6), 9);
}
