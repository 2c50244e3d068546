//! MIPS multicore timing simulator library.
//!
//! This crate implements a cycle-accurate, in-order MIPS multicore simulator
//! with the following:
//! 1. **Core:** Five-stage pipeline (fetch, decode, execute, mem, writeback),
//!    register file, HI/LO, and branch recovery, one instance per core.
//! 2. **Memory hierarchy:** Per-core split L1 I/D caches, a shared
//!    nonblocking L2 with MSHRs, and a timing-modeled DRAM.
//! 3. **ISA:** Opcode/subop tables and field extraction for the MIPS-I
//!    integer subset.
//! 4. **Simulation:** Object-file loader, configuration, and statistics
//!    collection.
//!
//! The simulator is single-threaded and deterministic: one call to
//! [`Processor::cycle`] advances the whole machine by exactly one clock.

/// Cache hierarchy (shared geometry, L1, L2, MSHRs, replacement policies).
pub mod cache;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// CPU core (pipeline, stages, syscall handling).
pub mod core;
/// DRAM timing model (banks, buses, request queue).
pub mod dram;
/// Instruction set tables (opcodes, subops, register names, field extraction).
pub mod isa;
/// Functional (untimed) memory array with word accessors.
pub mod mem;
/// Top-level processor: cores, shared L2, DRAM, global clock.
pub mod processor;
/// Program image loader.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Functional memory array shared by all cores.
pub use crate::mem::Memory;
/// Top-level machine; construct with `Processor::new` and drive with `cycle`.
pub use crate::processor::Processor;
