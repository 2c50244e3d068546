//! Configuration system for the MIPS multicore simulator.
//!
//! This module defines all configuration structures and enums used to
//! parameterize the simulator. It provides:
//! 1. **Defaults:** Baseline hardware constants (cores, caches, DRAM timing).
//! 2. **Structures:** Hierarchical config for general, system, cache,
//!    pipeline, and DRAM settings.
//! 3. **Enums:** Replacement policy, L2 inclusion policy, and DRAM page
//!    policy.
//!
//! Configuration is supplied as JSON (`--config` on the CLI) or via
//! `Config::default()`, which reproduces the reference hardware: four cores,
//! 32-byte blocks, 32 KiB 4-way L1-I, 64 KiB 8-way L1-D, 256 KiB 16-way
//! shared L2 with 16 MSHRs, and a single-channel 8-bank DRAM.

use serde::Deserialize;

/// Default configuration constants for the simulator.
///
/// These values define the baseline hardware configuration when not
/// explicitly overridden in a JSON configuration file.
mod defaults {
    /// Number of cores in the machine.
    pub const NUM_CORES: usize = 4;

    /// Initial program counter (start of the text segment).
    pub const START_PC: u32 = 0x0040_0000;

    /// Cache line size in bytes, shared by every level of the hierarchy.
    pub const BLOCK_BYTES: usize = 32;

    /// L1 instruction cache geometry (sets x ways).
    pub const L1_I_SETS: usize = 256;
    pub const L1_I_WAYS: usize = 4;

    /// L1 data cache geometry (sets x ways).
    pub const L1_D_SETS: usize = 256;
    pub const L1_D_WAYS: usize = 8;

    /// Shared L2 geometry (sets x ways) and miss-handling resources.
    pub const L2_SETS: usize = 512;
    pub const L2_WAYS: usize = 16;
    pub const L2_MSHR_COUNT: usize = 16;

    /// L2 hit latency observed by an L1 requester, in cycles.
    pub const L2_HIT_LATENCY: u64 = 15;

    /// Flat L1 miss penalty in cycles, used only when the L2 is disabled.
    pub const L1_MISS_PENALTY: u64 = 50;

    /// Forwarding delay of the L2 request queue toward DRAM, in cycles.
    pub const L2_TO_DRAM_DELAY: u64 = 5;

    /// Forwarding delay of the DRAM return queue toward L2, in cycles.
    pub const DRAM_TO_L2_DELAY: u64 = 5;

    /// DRAM organization: channels x ranks x banks x rows x row bytes.
    pub const DRAM_CHANNELS: usize = 1;
    pub const DRAM_RANKS: usize = 1;
    pub const DRAM_BANKS: usize = 8;
    pub const DRAM_ROWS: usize = 32768;
    pub const DRAM_ROW_BYTES: usize = 2048;

    /// Bounded DRAM request queue depth.
    pub const DRAM_REQ_QUEUE_SIZE: usize = 32;

    /// Command-bus occupancy of a PRE / ACT / RD-WR command, in cycles.
    pub const DRAM_PRE_CMD_CYCLES: u64 = 4;
    pub const DRAM_ACT_CMD_CYCLES: u64 = 4;
    pub const DRAM_RDWR_CMD_CYCLES: u64 = 4;

    /// Data-bus occupancy of one block transfer, in cycles.
    pub const DRAM_DATA_BUS_CYCLES: u64 = 50;

    /// Bank busy time per issued command phase, in cycles.
    pub const DRAM_BANK_BUSY_CYCLES: u64 = 100;

    /// Multiplier result latency (MULT/MULTU), in cycles.
    pub const MULT_LATENCY: u32 = 4;

    /// Divider result latency (DIV/DIVU), in cycles.
    pub const DIV_LATENCY: u32 = 32;
}

/// Cache replacement policy algorithms.
///
/// Selects which block to evict when a new block must be installed in a
/// full cache set. Victim selection always prefers an invalid block first;
/// the policy only breaks ties between valid blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReplacementPolicy {
    /// Least Recently Used: evicts the block with the highest age counter.
    #[default]
    #[serde(alias = "Lru")]
    Lru,
    /// Random: evicts a deterministically pseudo-random valid block.
    #[serde(alias = "Random")]
    Random,
    /// First In First Out: evicts the block installed the longest ago.
    #[serde(alias = "Fifo")]
    Fifo,
    /// Most Recently Used: evicts the block with the lowest age counter.
    #[serde(alias = "Mru")]
    Mru,
}

/// L2 inclusion policy with respect to the L1 caches.
///
/// Only [`InclusionPolicy::Nine`] is modeled by the current hierarchy; the
/// other variants are accepted so configurations can express intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum InclusionPolicy {
    /// Every L1 block is also present in L2.
    Inclusive,
    /// No block is present in both an L1 and the L2.
    Exclusive,
    /// Non-Inclusive Non-Exclusive: no invariant is enforced either way.
    #[default]
    Nine,
}

/// DRAM row-buffer management policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PagePolicy {
    /// Keep the accessed row open in the row buffer after the access.
    #[default]
    Open,
    /// Precharge after every access, leaving the bank closed.
    Closed,
}

/// Root configuration structure containing all simulator settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Machine topology.
    #[serde(default)]
    pub system: SystemConfig,
    /// Cache hierarchy configuration.
    #[serde(default)]
    pub cache: CacheHierarchyConfig,
    /// Pipeline functional-unit latencies.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// DRAM organization and timing.
    #[serde(default)]
    pub dram: DramConfig,
}

impl Config {
    /// Parses a configuration from a JSON document.
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-stage and per-cache diagnostic lines to stderr.
    #[serde(default)]
    pub trace: bool,

    /// Initial program counter for core 0.
    #[serde(default = "GeneralConfig::default_start_pc")]
    pub start_pc: u32,
}

impl GeneralConfig {
    fn default_start_pc() -> u32 {
        defaults::START_PC
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            start_pc: defaults::START_PC,
        }
    }
}

/// Machine topology.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    /// Number of cores. Core 0 starts running; the rest wait for a spawn.
    #[serde(default = "SystemConfig::default_num_cores")]
    pub num_cores: usize,
}

impl SystemConfig {
    fn default_num_cores() -> usize {
        defaults::NUM_CORES
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            num_cores: defaults::NUM_CORES,
        }
    }
}

/// Geometry of one cache level.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// When false this level is perfect: every access completes in its
    /// issuing cycle (L1) or the flat miss penalty is charged instead (L2).
    #[serde(default = "CacheConfig::default_enabled")]
    pub enabled: bool,

    /// Number of sets. Must be a power of two.
    pub sets: usize,

    /// Associativity (number of ways).
    pub ways: usize,
}

impl CacheConfig {
    fn default_enabled() -> bool {
        true
    }
}

/// Cache hierarchy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheHierarchyConfig {
    /// Cache line size in bytes, shared by L1 and L2.
    #[serde(default = "CacheHierarchyConfig::default_block_bytes")]
    pub block_bytes: usize,

    /// L1 instruction cache (per core).
    #[serde(default = "CacheHierarchyConfig::default_l1_i")]
    pub l1_i: CacheConfig,

    /// L1 data cache (per core).
    #[serde(default = "CacheHierarchyConfig::default_l1_d")]
    pub l1_d: CacheConfig,

    /// Shared L2 cache.
    #[serde(default = "CacheHierarchyConfig::default_l2")]
    pub l2: CacheConfig,

    /// Number of L2 miss status holding registers.
    #[serde(default = "CacheHierarchyConfig::default_mshr_count")]
    pub mshr_count: usize,

    /// Replacement policy applied at every level.
    #[serde(default)]
    pub repl_policy: ReplacementPolicy,

    /// L2 inclusion policy (NINE is the modeled behavior).
    #[serde(default)]
    pub inclusion: InclusionPolicy,

    /// L2 hit latency observed by a missing L1, in cycles.
    #[serde(default = "CacheHierarchyConfig::default_l2_hit_latency")]
    pub l2_hit_latency: u64,

    /// Flat L1 miss penalty, charged only when the L2 is disabled.
    #[serde(default = "CacheHierarchyConfig::default_l1_miss_penalty")]
    pub l1_miss_penalty: u64,

    /// Forwarding delay of the L2 request queue toward DRAM.
    #[serde(default = "CacheHierarchyConfig::default_l2_to_dram_delay")]
    pub l2_to_dram_delay: u64,

    /// Forwarding delay of the DRAM return queue toward L2.
    #[serde(default = "CacheHierarchyConfig::default_dram_to_l2_delay")]
    pub dram_to_l2_delay: u64,
}

impl CacheHierarchyConfig {
    fn default_block_bytes() -> usize {
        defaults::BLOCK_BYTES
    }

    fn default_l1_i() -> CacheConfig {
        CacheConfig {
            enabled: true,
            sets: defaults::L1_I_SETS,
            ways: defaults::L1_I_WAYS,
        }
    }

    fn default_l1_d() -> CacheConfig {
        CacheConfig {
            enabled: true,
            sets: defaults::L1_D_SETS,
            ways: defaults::L1_D_WAYS,
        }
    }

    fn default_l2() -> CacheConfig {
        CacheConfig {
            enabled: true,
            sets: defaults::L2_SETS,
            ways: defaults::L2_WAYS,
        }
    }

    fn default_mshr_count() -> usize {
        defaults::L2_MSHR_COUNT
    }

    fn default_l2_hit_latency() -> u64 {
        defaults::L2_HIT_LATENCY
    }

    fn default_l1_miss_penalty() -> u64 {
        defaults::L1_MISS_PENALTY
    }

    fn default_l2_to_dram_delay() -> u64 {
        defaults::L2_TO_DRAM_DELAY
    }

    fn default_dram_to_l2_delay() -> u64 {
        defaults::DRAM_TO_L2_DELAY
    }
}

impl Default for CacheHierarchyConfig {
    fn default() -> Self {
        Self {
            block_bytes: defaults::BLOCK_BYTES,
            l1_i: Self::default_l1_i(),
            l1_d: Self::default_l1_d(),
            l2: Self::default_l2(),
            mshr_count: defaults::L2_MSHR_COUNT,
            repl_policy: ReplacementPolicy::default(),
            inclusion: InclusionPolicy::default(),
            l2_hit_latency: defaults::L2_HIT_LATENCY,
            l1_miss_penalty: defaults::L1_MISS_PENALTY,
            l2_to_dram_delay: defaults::L2_TO_DRAM_DELAY,
            dram_to_l2_delay: defaults::DRAM_TO_L2_DELAY,
        }
    }
}

/// Pipeline functional-unit latencies.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Cycles until HI/LO are ready after MULT/MULTU.
    #[serde(default = "PipelineConfig::default_mult_latency")]
    pub mult_latency: u32,

    /// Cycles until HI/LO are ready after DIV/DIVU.
    #[serde(default = "PipelineConfig::default_div_latency")]
    pub div_latency: u32,
}

impl PipelineConfig {
    fn default_mult_latency() -> u32 {
        defaults::MULT_LATENCY
    }

    fn default_div_latency() -> u32 {
        defaults::DIV_LATENCY
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            mult_latency: defaults::MULT_LATENCY,
            div_latency: defaults::DIV_LATENCY,
        }
    }
}

/// DRAM organization and timing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DramConfig {
    /// Independent channels, each with its own command and data bus.
    #[serde(default = "DramConfig::default_channels")]
    pub channels: usize,

    /// Ranks per channel.
    #[serde(default = "DramConfig::default_ranks")]
    pub ranks: usize,

    /// Banks per rank.
    #[serde(default = "DramConfig::default_banks")]
    pub banks: usize,

    /// Rows per bank.
    #[serde(default = "DramConfig::default_rows")]
    pub rows: usize,

    /// Bytes per row.
    #[serde(default = "DramConfig::default_row_bytes")]
    pub row_bytes: usize,

    /// Bounded request queue depth; a full queue back-pressures the L2.
    #[serde(default = "DramConfig::default_req_queue_size")]
    pub req_queue_size: usize,

    /// Row-buffer management policy.
    #[serde(default)]
    pub page_policy: PagePolicy,

    /// Command-bus occupancy of a PRE command.
    #[serde(default = "DramConfig::default_pre_cmd_cycles")]
    pub pre_cmd_cycles: u64,

    /// Command-bus occupancy of an ACT command.
    #[serde(default = "DramConfig::default_act_cmd_cycles")]
    pub act_cmd_cycles: u64,

    /// Command-bus occupancy of a RD/WR command.
    #[serde(default = "DramConfig::default_rdwr_cmd_cycles")]
    pub rdwr_cmd_cycles: u64,

    /// Data-bus occupancy of one block transfer.
    #[serde(default = "DramConfig::default_data_bus_cycles")]
    pub data_bus_cycles: u64,

    /// Bank busy time per issued command phase.
    #[serde(default = "DramConfig::default_bank_busy_cycles")]
    pub bank_busy_cycles: u64,
}

impl DramConfig {
    fn default_channels() -> usize {
        defaults::DRAM_CHANNELS
    }

    fn default_ranks() -> usize {
        defaults::DRAM_RANKS
    }

    fn default_banks() -> usize {
        defaults::DRAM_BANKS
    }

    fn default_rows() -> usize {
        defaults::DRAM_ROWS
    }

    fn default_row_bytes() -> usize {
        defaults::DRAM_ROW_BYTES
    }

    fn default_req_queue_size() -> usize {
        defaults::DRAM_REQ_QUEUE_SIZE
    }

    fn default_pre_cmd_cycles() -> u64 {
        defaults::DRAM_PRE_CMD_CYCLES
    }

    fn default_act_cmd_cycles() -> u64 {
        defaults::DRAM_ACT_CMD_CYCLES
    }

    fn default_rdwr_cmd_cycles() -> u64 {
        defaults::DRAM_RDWR_CMD_CYCLES
    }

    fn default_data_bus_cycles() -> u64 {
        defaults::DRAM_DATA_BUS_CYCLES
    }

    fn default_bank_busy_cycles() -> u64 {
        defaults::DRAM_BANK_BUSY_CYCLES
    }
}

impl Default for DramConfig {
    fn default() -> Self {
        Self {
            channels: defaults::DRAM_CHANNELS,
            ranks: defaults::DRAM_RANKS,
            banks: defaults::DRAM_BANKS,
            rows: defaults::DRAM_ROWS,
            row_bytes: defaults::DRAM_ROW_BYTES,
            req_queue_size: defaults::DRAM_REQ_QUEUE_SIZE,
            page_policy: PagePolicy::default(),
            pre_cmd_cycles: defaults::DRAM_PRE_CMD_CYCLES,
            act_cmd_cycles: defaults::DRAM_ACT_CMD_CYCLES,
            rdwr_cmd_cycles: defaults::DRAM_RDWR_CMD_CYCLES,
            data_bus_cycles: defaults::DRAM_DATA_BUS_CYCLES,
            bank_busy_cycles: defaults::DRAM_BANK_BUSY_CYCLES,
        }
    }
}
