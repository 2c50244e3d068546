//! Miss status holding registers.

/// One outstanding L2 miss.
///
/// At most one valid MSHR exists per distinct block address; later misses
/// to the same block merge by joining `requesters`.
#[derive(Debug, Clone, Default)]
pub struct Mshr {
    /// Entry in use.
    pub valid: bool,
    /// Block-aligned miss address.
    pub addr: u32,
    /// True when the first merged request was a write.
    pub is_write: bool,
    /// Every core waiting on this fill; all are woken when it completes.
    pub requesters: Vec<usize>,
}

impl Mshr {
    /// Adds `core_id` to the requester set if not already present.
    pub fn add_requester(&mut self, core_id: usize) {
        if !self.requesters.contains(&core_id) {
            self.requesters.push(core_id);
        }
    }
}
