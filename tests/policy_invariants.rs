// ==============================================
// CROSS-POLICY INVARIANT TESTS (integration)
// ==============================================
//
// Behaviour every engine must share, plus the ordering guarantees that tell
// the bounded engines apart. Driven through the single-threaded `CacheCore`
// contract with a fixed `now`.

use std::time::{Duration, Instant};

use evictkit::policy::arc::ArcCore;
use evictkit::policy::lfu::LfuCore;
use evictkit::policy::lru::LruCore;
use evictkit::policy::simple::SimpleStore;
use evictkit::traits::CacheCore;

type Engine = Box<dyn CacheCore<u32, u32>>;

fn bounded(capacity: usize) -> Vec<(&'static str, Engine)> {
    let mut engines: Vec<(&'static str, Engine)> = Vec::new();
    engines.push(("lru", Box::new(LruCore::new(capacity))));
    engines.push(("lfu", Box::new(LfuCore::new(capacity))));
    engines.push(("arc", Box::new(ArcCore::new(capacity))));
    engines
}

fn all(capacity: usize) -> Vec<(&'static str, Engine)> {
    let mut engines = bounded(capacity);
    engines.push(("simple", Box::new(SimpleStore::new())));
    engines
}

// ==============================================
// Shared contract
// ==============================================

mod contract {
    use super::*;

    #[test]
    fn capacity_is_never_exceeded() {
        let now = Instant::now();
        for (name, mut cache) in bounded(7) {
            for i in 0..500u32 {
                cache.set(i % 53, i, Duration::ZERO, now);
                if i % 3 == 0 {
                    cache.get(&(i % 11), now);
                }
                assert!(cache.len() <= 7, "{name} exceeded capacity");
            }
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn set_then_get_round_trips() {
        let now = Instant::now();
        for (name, mut cache) in all(4) {
            cache.set(1, 10, Duration::ZERO, now);
            assert_eq!(cache.get(&1, now), Some(&10), "{name}");

            cache.set(2, 20, Duration::from_secs(60), now);
            assert_eq!(
                cache.get(&2, now + Duration::from_secs(59)),
                Some(&20),
                "{name}"
            );
        }
    }

    #[test]
    fn missing_and_deleted_keys_are_not_found() {
        let now = Instant::now();
        for (name, mut cache) in all(4) {
            assert_eq!(cache.get(&42, now), None, "{name}");
            assert!(!cache.delete(&42), "{name}");

            cache.set(42, 1, Duration::ZERO, now);
            assert!(cache.delete(&42), "{name}");
            assert_eq!(cache.get(&42, now), None, "{name}");
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn clear_is_idempotent() {
        let now = Instant::now();
        for (name, mut cache) in all(4) {
            for i in 0..4 {
                cache.set(i, i, Duration::ZERO, now);
            }
            cache.clear();
            assert!(cache.is_empty(), "{name}");
            cache.clear();
            assert!(cache.is_empty(), "{name}");
            for i in 0..4 {
                assert_eq!(cache.get(&i, now), None, "{name}");
            }
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn expired_entries_are_never_returned() {
        let now = Instant::now();
        let ttl = Duration::from_millis(100);
        for (name, mut cache) in all(4) {
            cache.set(1, 1, ttl, now);
            cache.set(2, 2, Duration::ZERO, now);
            assert!(cache.contains(&1, now + ttl - Duration::from_millis(1)), "{name}");
            assert_eq!(cache.get(&1, now + ttl), None, "{name}");
            assert_eq!(cache.get(&2, now + ttl * 1000), Some(&2), "{name}");
            cache.check_invariants().unwrap();
        }
    }

    #[test]
    fn reported_capacity() {
        for (name, cache) in bounded(9) {
            assert_eq!(cache.capacity(), Some(9), "{name}");
        }
        assert_eq!(SimpleStore::<u32, u32>::new().capacity(), None);
    }
}

// ==============================================
// LRU ordering
// ==============================================

mod lru_order {
    use super::*;

    #[test]
    fn n_plus_one_inserts_evict_the_first() {
        let now = Instant::now();
        let mut cache = LruCore::new(5);
        for k in 1..=6u32 {
            cache.set(k, k, Duration::ZERO, now);
        }
        assert!(!cache.contains(&1, now));
        for k in 2..=6u32 {
            assert!(cache.contains(&k, now));
        }
    }

    #[test]
    fn get_saves_a_key_from_eviction() {
        let now = Instant::now();
        let mut cache = LruCore::new(5);
        for k in 1..=5u32 {
            cache.set(k, k, Duration::ZERO, now);
        }
        cache.get(&1, now);
        cache.set(6, 6, Duration::ZERO, now);
        assert!(cache.contains(&1, now));
        assert!(!cache.contains(&2, now));
    }
}

// ==============================================
// LFU ordering
// ==============================================

mod lfu_order {
    use super::*;

    #[test]
    fn strictly_colder_keys_go_first() {
        let now = Instant::now();
        let mut cache = LfuCore::new(4);
        for k in 0..4u32 {
            cache.set(k, k, Duration::ZERO, now);
            for _ in 0..k {
                cache.get(&k, now);
            }
        }
        // frequencies: 0→1, 1→2, 2→3, 3→4
        for (round, newcomer) in (100..103u32).enumerate() {
            cache.set(newcomer, newcomer, Duration::ZERO, now);
            // each newcomer starts at 1 and is itself the next victim
            assert!(cache.contains(&newcomer, now));
            if round == 0 {
                assert!(!cache.contains(&0, now));
            }
        }
        for k in 1..4u32 {
            assert!(cache.contains(&k, now), "key {k} should survive");
        }
        cache.check_invariants().unwrap();
    }
}

// ==============================================
// ARC adaptiveness
// ==============================================

mod arc_adaptive {
    use super::*;

    #[test]
    fn two_hits_promote_to_t2_and_survive_t1_churn() {
        let now = Instant::now();
        let mut cache = ArcCore::new(4);
        cache.set(0u32, 0, Duration::ZERO, now);
        cache.get(&0, now);
        cache.get(&0, now);
        assert_eq!(cache.t2_len(), 1);
        for k in 1..50u32 {
            cache.set(k, k, Duration::ZERO, now);
        }
        assert!(cache.contains(&0, now));
        cache.check_invariants().unwrap();
    }

    #[test]
    fn ghost_scenario_evicts_b() {
        let now = Instant::now();
        let mut cache = ArcCore::new(5);
        for k in ["A", "B", "C", "D"] {
            cache.set(k, k, Duration::ZERO, now);
        }
        for k in ["B", "C", "D"] {
            assert_eq!(cache.get(&k, now), Some(&k));
        }
        cache.set("E", "E", Duration::ZERO, now);
        for k in ["B", "C", "D", "E"] {
            assert_eq!(cache.get(&k, now), Some(&k));
        }
        cache.set("A", "A", Duration::ZERO, now);
        cache.get(&"A", now);
        cache.get(&"A", now);
        cache.set("F", "F", Duration::ZERO, now);

        assert!(!cache.contains(&"B", now));
        assert_eq!(cache.b2_len(), 1);
        assert_eq!(cache.t1_len(), 1);
        for k in ["A", "C", "D", "E", "F"] {
            assert!(cache.contains(&k, now), "{k} should be resident");
        }
        cache.check_invariants().unwrap();
    }

    #[test]
    fn ghost_hits_move_p_both_ways() {
        let now = Instant::now();
        let mut cache = ArcCore::new(2);
        cache.set(1u32, (), Duration::ZERO, now);
        cache.get(&1, now);
        cache.set(2, (), Duration::ZERO, now);
        cache.set(3, (), Duration::ZERO, now);
        cache.set(2, (), Duration::ZERO, now);
        let grown = cache.p_value();
        assert!(grown > 0);

        cache.set(1, (), Duration::ZERO, now);
        assert!(cache.p_value() < grown);
        cache.check_invariants().unwrap();
    }
}
