//! Blocking L1 behavior: the single pending-miss slot and both fill paths.

use mips_core::cache::l1::{CacheKind, L1Cache};
use mips_core::cache::l2::L2Cache;
use mips_core::config::{CacheConfig, CacheHierarchyConfig};

fn small_hierarchy() -> CacheHierarchyConfig {
    CacheHierarchyConfig {
        l1_i: CacheConfig {
            enabled: true,
            sets: 4,
            ways: 2,
        },
        l1_d: CacheConfig {
            enabled: true,
            sets: 4,
            ways: 2,
        },
        l2: CacheConfig {
            enabled: true,
            sets: 16,
            ways: 2,
        },
        ..CacheHierarchyConfig::default()
    }
}

fn small_l1(hier: &CacheHierarchyConfig) -> L1Cache {
    L1Cache::new(0, CacheKind::Data, &hier.l1_d, hier, false)
}

/// A miss latches the pending slot, blocks further accesses, and resolves
/// through the L2-initiated fill.
#[test]
fn miss_blocks_until_l2_fill() {
    let hier = small_hierarchy();
    let mut l2 = L2Cache::new(&hier, false);
    let mut l1 = small_l1(&hier);
    let addr = 0x1000_0000;

    assert!(!l1.access(addr, false, &mut l2, 0));
    assert!(l1.pending_miss);
    assert_eq!(l1.pending_miss_addr, addr);
    assert_eq!(l1.pending_miss_ready_cycle, None, "waits on the L2 fill");
    assert_eq!(l2.mshrs.iter().filter(|m| m.valid).count(), 1);

    // Retries stay blocked and do not touch the L2 again.
    assert!(!l1.access(addr, false, &mut l2, 1));
    assert_eq!(l2.stats.read_misses, 1);

    // The L2 delivers the block.
    l1.fill(addr);
    assert!(!l1.pending_miss);
    assert!(l1.access(addr, false, &mut l2, 2));
    assert_eq!(l1.stats.read_misses, 1);
    assert_eq!(l1.stats.read_hits, 0, "completing probe is not re-counted");
}

/// An L2 hit schedules a self-timed fill after the L2 hit latency.
#[test]
fn l2_hit_completes_after_hit_latency() {
    let hier = small_hierarchy();
    let mut l2 = L2Cache::new(&hier, false);
    let mut l1 = small_l1(&hier);
    let addr = 0x1000_0040;

    // Warm the L2.
    l2.array.install(addr);

    assert!(!l1.access(addr, false, &mut l2, 0));
    assert_eq!(l1.pending_miss_ready_cycle, Some(hier.l2_hit_latency));

    // Still blocked one cycle early.
    assert!(!l1.access(addr, false, &mut l2, hier.l2_hit_latency - 1));
    // Completes once the latency has elapsed.
    assert!(l1.access(addr, false, &mut l2, hier.l2_hit_latency));
    assert!(!l1.pending_miss);
}

/// A busy L2 (MSHRs exhausted) latches nothing; the access retries from
/// scratch and succeeds once an MSHR frees up.
#[test]
fn busy_l2_does_not_latch() {
    let hier = CacheHierarchyConfig {
        mshr_count: 1,
        ..small_hierarchy()
    };
    let mut l2 = L2Cache::new(&hier, false);
    let mut l1a = small_l1(&hier);
    let mut l1b = L1Cache::new(1, CacheKind::Data, &hier.l1_d, &hier, false);

    assert!(!l1a.access(0x2000_0000, false, &mut l2, 0));
    assert!(!l1b.access(0x3000_0000, false, &mut l2, 0));

    assert!(l1a.pending_miss);
    assert!(!l1b.pending_miss, "busy response must not latch");
    assert_eq!(l2.busy_rejections, 1);
    assert_eq!(l1b.stats.read_misses, 0, "rejected access is not counted");
}

/// A disabled (perfect) L1 completes every access immediately.
#[test]
fn disabled_l1_is_perfect() {
    let hier = small_hierarchy();
    let mut l2 = L2Cache::new(&hier, false);
    let geometry = CacheConfig {
        enabled: false,
        sets: 4,
        ways: 2,
    };
    let mut l1 = L1Cache::new(0, CacheKind::Data, &geometry, &hier, false);

    assert!(l1.access(0x4000, false, &mut l2, 0));
    assert!(l1.access(0x8000, true, &mut l2, 0));
    assert_eq!(l1.stats.read_hits, 1);
    assert_eq!(l1.stats.write_hits, 1);
    assert_eq!(l2.stats.read_misses, 0, "perfect L1 never consults the L2");
}

/// With the L2 disabled, a miss self-times with the flat penalty.
#[test]
fn flat_penalty_when_l2_disabled() {
    let hier = CacheHierarchyConfig {
        l2: CacheConfig {
            enabled: false,
            sets: 16,
            ways: 2,
        },
        ..small_hierarchy()
    };
    let mut l2 = L2Cache::new(&hier, false);
    let mut l1 = small_l1(&hier);
    let addr = 0x1000_0080;

    assert!(!l1.access(addr, false, &mut l2, 0));
    assert_eq!(l1.pending_miss_ready_cycle, Some(hier.l1_miss_penalty));
    assert!(!l1.access(addr, false, &mut l2, hier.l1_miss_penalty - 1));
    assert!(l1.access(addr, false, &mut l2, hier.l1_miss_penalty));
    assert_eq!(l2.stats.read_misses, 0);
}

/// A fill for a block other than the pending one is ignored.
#[test]
fn fill_requires_matching_block() {
    let hier = small_hierarchy();
    let mut l2 = L2Cache::new(&hier, false);
    let mut l1 = small_l1(&hier);

    assert!(!l1.access(0x5000, false, &mut l2, 0));
    l1.fill(0x6000);
    assert!(l1.pending_miss, "mismatched fill must not unblock");
    l1.fill(0x5010); // same block as 0x5000
    assert!(!l1.pending_miss);
}
