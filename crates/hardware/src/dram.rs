//! DRAM timing model.
//!
//! Models the memory device behind the L2:
//! 1. **Organization:** channels x ranks x banks, each bank with an open
//!    row and a busy-until cycle; each channel with a command bus and a
//!    data bus tracked by free-at cycles.
//! 2. **Queue:** a bounded FIFO of requests; a full queue back-pressures
//!    the L2.
//! 3. **Scheduling:** per cycle, the oldest undispatched request whose bank
//!    and command bus are free is dispatched, charged per the page policy,
//!    and retired once its data-bus phase completes.
//!
//! Only timing is modeled; data lives in the functional memory array.

use std::collections::VecDeque;

use crate::config::{DramConfig, PagePolicy};

/// Who produced a request: a demand miss (completion notifies the L2) or
/// an L2 dirty-victim writeback (completion is silent).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DramSource {
    Memory,
    Writeback,
}

/// One in-flight DRAM request.
#[derive(Debug, Clone)]
pub struct DramRequest {
    pub is_write: bool,
    /// Block-aligned address.
    pub addr: u32,
    /// Requesting core for demand misses, `None` for writebacks.
    pub requester: Option<usize>,
    pub source: DramSource,
    /// Cycle the request entered the queue.
    pub arrival_cycle: u64,
    /// Cycle the data-bus phase completes; valid once dispatched.
    pub ready_cycle: u64,
    /// Derived channel / global bank index / row.
    pub channel: usize,
    pub bank: usize,
    pub row: u32,
    dispatched: bool,
}

/// State of one bank: the open row (if any) and when it frees up.
#[derive(Debug, Clone, Default)]
struct DramBank {
    open_row: Option<u32>,
    busy_until: u64,
}

/// Per-channel bus occupancy.
#[derive(Debug, Clone, Default)]
struct DramChannel {
    cmd_bus_free_at: u64,
    data_bus_free_at: u64,
}

/// DRAM access counters.
#[derive(Debug, Clone, Copy, Default)]
pub struct DramStats {
    pub reads: u64,
    pub writes: u64,
    /// Dispatches that hit the open row.
    pub row_hits: u64,
    /// Dispatches into a closed bank.
    pub row_misses: u64,
    /// Dispatches that had to close a different open row first.
    pub row_conflicts: u64,
}

/// The DRAM device.
pub struct Dram {
    cfg: DramConfig,
    banks: Vec<DramBank>,
    channels: Vec<DramChannel>,
    pub queue: VecDeque<DramRequest>,
    pub stats: DramStats,
}

impl Dram {
    /// Creates an idle DRAM from its configuration.
    pub fn new(cfg: &DramConfig) -> Self {
        let total_banks = cfg.channels * cfg.ranks * cfg.banks;
        Self {
            banks: vec![DramBank::default(); total_banks],
            channels: vec![DramChannel::default(); cfg.channels],
            queue: VecDeque::new(),
            stats: DramStats::default(),
            cfg: cfg.clone(),
        }
    }

    /// Derives (channel, global bank index, row) from an address.
    ///
    /// Consecutive rows interleave across banks, then ranks, then channels,
    /// so streaming accesses spread over the banks.
    fn map_address(&self, addr: u32) -> (usize, usize, u32) {
        let row_unit = addr as usize / self.cfg.row_bytes;
        let bank_in_rank = row_unit % self.cfg.banks;
        let rank = (row_unit / self.cfg.banks) % self.cfg.ranks;
        let channel = (row_unit / (self.cfg.banks * self.cfg.ranks)) % self.cfg.channels;
        let row =
            (row_unit / (self.cfg.banks * self.cfg.ranks * self.cfg.channels)) % self.cfg.rows;
        let bank = (channel * self.cfg.ranks + rank) * self.cfg.banks + bank_in_rank;
        (channel, bank, row as u32)
    }

    /// True when no request can currently be accepted.
    pub fn is_full(&self) -> bool {
        self.queue.len() >= self.cfg.req_queue_size
    }

    /// Queues a request; returns `false` when the queue is full and the
    /// caller must retry.
    pub fn enqueue(
        &mut self,
        is_write: bool,
        addr: u32,
        requester: Option<usize>,
        source: DramSource,
        cycle: u64,
    ) -> bool {
        if self.is_full() {
            return false;
        }
        let (channel, bank, row) = self.map_address(addr);
        self.queue.push_back(DramRequest {
            is_write,
            addr,
            requester,
            source,
            arrival_cycle: cycle,
            ready_cycle: 0,
            channel,
            bank,
            row,
            dispatched: false,
        });
        if is_write {
            self.stats.writes += 1;
        } else {
            self.stats.reads += 1;
        }
        true
    }

    /// Advances the device one cycle: dispatches at most one request and
    /// retires at most one whose data-bus phase has completed.
    pub fn execute(&mut self, cycle: u64) -> Option<DramRequest> {
        self.dispatch(cycle);

        let done = self
            .queue
            .iter()
            .position(|r| r.dispatched && r.ready_cycle <= cycle)?;
        self.queue.remove(done)
    }

    /// Dispatches the oldest undispatched request whose bank and command
    /// bus are both free, charging command-bus, bank, and data-bus time
    /// according to the page policy.
    fn dispatch(&mut self, cycle: u64) {
        let candidate = self.queue.iter().position(|r| {
            !r.dispatched
                && self.banks[r.bank].busy_until <= cycle
                && self.channels[r.channel].cmd_bus_free_at <= cycle
        });
        let Some(idx) = candidate else {
            return;
        };

        let req = &mut self.queue[idx];
        let bank = &mut self.banks[req.bank];
        let channel = &mut self.channels[req.channel];

        // Phase costs: each issued command occupies the command bus for its
        // own cycles and keeps the bank busy for one bank period.
        let (cmd_cycles, phases) = match self.cfg.page_policy {
            PagePolicy::Open => match bank.open_row {
                Some(open) if open == req.row => {
                    self.stats.row_hits += 1;
                    (self.cfg.rdwr_cmd_cycles, 1)
                }
                Some(_) => {
                    self.stats.row_conflicts += 1;
                    bank.open_row = Some(req.row);
                    (
                        self.cfg.pre_cmd_cycles
                            + self.cfg.act_cmd_cycles
                            + self.cfg.rdwr_cmd_cycles,
                        3,
                    )
                }
                None => {
                    self.stats.row_misses += 1;
                    bank.open_row = Some(req.row);
                    (self.cfg.act_cmd_cycles + self.cfg.rdwr_cmd_cycles, 2)
                }
            },
            PagePolicy::Closed => {
                // ACT + RD/WR + PRE; the bank ends every access closed.
                self.stats.row_misses += 1;
                bank.open_row = None;
                (
                    self.cfg.act_cmd_cycles + self.cfg.rdwr_cmd_cycles + self.cfg.pre_cmd_cycles,
                    3,
                )
            }
        };

        channel.cmd_bus_free_at = cycle + cmd_cycles;
        bank.busy_until = cycle + phases * self.cfg.bank_busy_cycles;

        let data_start = bank.busy_until.max(channel.data_bus_free_at);
        let ready = data_start + self.cfg.data_bus_cycles;
        channel.data_bus_free_at = ready;

        req.ready_cycle = ready;
        req.dispatched = true;
    }
}
