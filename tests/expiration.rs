// ==============================================
// TTL BEHAVIOUR THROUGH THE BUILDER (integration)
// ==============================================
//
// Time is driven with `ManualClock`, so deadlines are hit exactly instead of
// by sleeping.

use std::sync::Arc;
use std::time::Duration;

use evictkit::builder::{Cache, CacheBuilder, CachePolicy};
use evictkit::expiry::ManualClock;
use evictkit::traits::ConcurrentCache;

const POLICIES: [CachePolicy; 4] = [
    CachePolicy::Simple,
    CachePolicy::Lru,
    CachePolicy::Lfu,
    CachePolicy::Arc,
];

fn build(policy: CachePolicy, capacity: usize) -> (Cache<String, u64>, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new());
    let cache = CacheBuilder::new(capacity)
        .clock(clock.clone())
        .build(policy)
        .unwrap();
    (cache, clock)
}

#[test]
fn entry_lives_until_the_deadline() {
    for policy in POLICIES {
        let (cache, clock) = build(policy, 8);
        cache.set("k".into(), 1, Duration::from_secs(10));

        clock.advance(Duration::from_millis(9_999));
        assert_eq!(cache.get(&"k".into()).as_deref(), Some(&1), "{policy}");

        clock.advance(Duration::from_millis(1));
        assert_eq!(cache.get(&"k".to_string()), None, "{policy}");
        assert!(cache.is_empty(), "{policy}");
        cache.check_invariants().unwrap();
    }
}

#[test]
fn zero_ttl_never_expires() {
    for policy in POLICIES {
        let (cache, clock) = build(policy, 8);
        cache.set("k".into(), 1, Duration::ZERO);
        clock.advance(Duration::from_secs(365 * 24 * 3600));
        assert!(cache.contains(&"k".into()), "{policy}");
    }
}

#[test]
fn overwrite_resets_the_deadline() {
    for policy in POLICIES {
        let (cache, clock) = build(policy, 8);
        cache.set("k".into(), 1, Duration::from_secs(5));
        clock.advance(Duration::from_secs(4));
        cache.set("k".into(), 2, Duration::from_secs(5));
        clock.advance(Duration::from_secs(4));
        assert_eq!(cache.get(&"k".into()).as_deref(), Some(&2), "{policy}");

        cache.set("k".into(), 3, Duration::ZERO);
        clock.advance(Duration::from_secs(60));
        assert_eq!(cache.get(&"k".into()).as_deref(), Some(&3), "{policy}");
    }
}

#[test]
fn expired_key_can_be_set_again() {
    for policy in POLICIES {
        let (cache, clock) = build(policy, 2);
        cache.set("a".into(), 1, Duration::from_secs(1));
        cache.set("b".into(), 2, Duration::ZERO);
        clock.advance(Duration::from_secs(1));

        assert!(!cache.contains(&"a".into()), "{policy}");
        cache.set("a".into(), 3, Duration::ZERO);
        assert_eq!(cache.get(&"a".into()).as_deref(), Some(&3), "{policy}");
        assert!(cache.len() <= 2, "{policy}");
        cache.check_invariants().unwrap();
    }
}

#[test]
fn contains_reports_expiry_without_removing() {
    for policy in POLICIES {
        let (cache, clock) = build(policy, 4);
        cache.set("k".into(), 1, Duration::from_secs(1));
        clock.advance(Duration::from_secs(2));
        assert!(!cache.contains(&"k".into()), "{policy}");
        assert_eq!(cache.len(), 1, "{policy}");
        assert!(!cache.delete(&"missing".into()), "{policy}");
    }
}
