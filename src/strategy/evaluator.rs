use crate::{Error, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

/// The active partition/key assignment algorithm.
///
/// Three structurally different hot-key weighting schemes exist across the
/// demo scenarios and are deliberately kept as distinct modes; merging them
/// would change the skew each scenario demonstrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum StrategyMode {
    /// Cycle the partition index directly: `n % partition_count`.
    RoundRobin = 0,
    /// Force ~10% of messages onto partition 0, round-robin for the rest.
    HotPartition = 1,
    /// Every message carries the literal key "key-0".
    SingleKey = 2,
    /// 80% of messages on "hot-key", the rest spread over three keys.
    SkewedThreeKeys = 3,
    /// Four keys weighted 70/15/10/5.
    SkewedFourKeys = 4,
    /// Three keys weighted 50/30/20, sized for a 3-partition topic.
    HotKeyFixed = 5,
    /// A fresh random id per message; the broker's key hash spreads them.
    EvenKeyUuid = 6,
    /// Ten rotating keys, "key-0" through "key-9".
    EvenKeyRotating = 7,
}

impl StrategyMode {
    /// Maps a free-text label to a mode, case-insensitively.
    ///
    /// The dashboard sends the short labels "single", "bad", and "good";
    /// the full mode names are accepted as well. Anything unrecognized
    /// activates the "good" even-distribution mode instead of failing, so
    /// a typo in a demo never stops the producer.
    pub fn from_label(label: &str) -> StrategyMode {
        match label.to_ascii_lowercase().as_str() {
            "single" | "single_key" | "single-key" => StrategyMode::SingleKey,
            "bad" | "hot_key_fixed" | "hot-key-fixed" => StrategyMode::HotKeyFixed,
            "good" | "even_key_uuid" | "even-key-uuid" => StrategyMode::EvenKeyUuid,
            "round_robin" | "round-robin" => StrategyMode::RoundRobin,
            "hot_partition" | "hot-partition" => StrategyMode::HotPartition,
            "skewed_three_keys" | "skewed-three-keys" => StrategyMode::SkewedThreeKeys,
            "skewed_four_keys" | "skewed-four-keys" => StrategyMode::SkewedFourKeys,
            "even_key_rotating" | "even-key-rotating" => StrategyMode::EvenKeyRotating,
            other => {
                warn!("Unrecognized strategy label '{}', using even_key_uuid", other);
                StrategyMode::EvenKeyUuid
            }
        }
    }

    pub(crate) fn from_u8(raw: u8) -> StrategyMode {
        match raw {
            1 => StrategyMode::HotPartition,
            2 => StrategyMode::SingleKey,
            3 => StrategyMode::SkewedThreeKeys,
            4 => StrategyMode::SkewedFourKeys,
            5 => StrategyMode::HotKeyFixed,
            6 => StrategyMode::EvenKeyUuid,
            7 => StrategyMode::EvenKeyRotating,
            _ => StrategyMode::RoundRobin,
        }
    }
}

impl Default for StrategyMode {
    fn default() -> Self {
        StrategyMode::RoundRobin
    }
}

/// Where one message should go: a concrete partition index, or an opaque
/// key the broker hashes to a partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutingDecision {
    Partition(i32),
    Key(String),
}

/// Entropy for the two intentionally randomized branches (the hot-partition
/// coin flip and the per-message unique key). Injected so tests can
/// substitute a fixed sequence.
pub trait RandomSource {
    /// Uniform draw in `[0, bound)`.
    fn draw(&mut self, bound: u32) -> u32;

    /// A fresh unique identifier string.
    fn unique_id(&mut self) -> String;
}

/// Default source backed by the thread-local PRNG. Not cryptographic,
/// which is all the skew demo needs.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadRngSource;

impl RandomSource for ThreadRngSource {
    fn draw(&mut self, bound: u32) -> u32 {
        rand::thread_rng().gen_range(0..bound)
    }

    fn unique_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Produces the routing decision for one message.
///
/// `message_number` is the message's sequence number and `partition_count`
/// the partition count of the destination topic. For a fixed mode and
/// message number the decision is reproducible, except for the two
/// randomized branches drawing from `rng`.
pub fn evaluate<R: RandomSource>(
    mode: StrategyMode,
    message_number: u64,
    partition_count: i32,
    rng: &mut R,
) -> Result<RoutingDecision> {
    if partition_count < 1 {
        return Err(Error::InvalidPartitionCount(partition_count));
    }
    let partitions = partition_count as u64;

    let decision = match mode {
        StrategyMode::RoundRobin => {
            RoutingDecision::Partition((message_number % partitions) as i32)
        }

        StrategyMode::HotPartition => {
            if rng.draw(10) == 1 {
                // 10% straight to the hot partition
                RoutingDecision::Partition(0)
            } else {
                RoutingDecision::Partition((message_number % partitions) as i32)
            }
        }

        StrategyMode::SingleKey => RoutingDecision::Key("key-0".to_string()),

        StrategyMode::SkewedThreeKeys => {
            if message_number % 100 < 80 {
                RoutingDecision::Key("hot-key".to_string())
            } else {
                RoutingDecision::Key(format!("key-{}", message_number % 3))
            }
        }

        StrategyMode::SkewedFourKeys => RoutingDecision::Key(pick_weighted_key(message_number)),

        StrategyMode::HotKeyFixed => RoutingDecision::Key(pick_hot_key(message_number)),

        StrategyMode::EvenKeyUuid => RoutingDecision::Key(rng.unique_id()),

        StrategyMode::EvenKeyRotating => {
            RoutingDecision::Key(format!("key-{}", message_number % 10))
        }
    };

    Ok(decision)
}

/// Picks a hot key based on the message number, sized for 3 partitions.
fn pick_hot_key(message_number: u64) -> String {
    let m = message_number % 10;
    if m < 5 {
        "key-0".to_string() // 50%
    } else if m < 8 {
        "key-1".to_string() // 30%
    } else {
        "key-2".to_string() // 20%
    }
}

fn pick_weighted_key(message_number: u64) -> String {
    let m = message_number % 100;
    if m < 70 {
        "hot-key-0".to_string()
    } else if m < 85 {
        "hot-key-1".to_string()
    } else if m < 95 {
        "hot-key-2".to_string()
    } else {
        "hot-key-3".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;
    use std::collections::VecDeque;

    struct FixedSource {
        draws: VecDeque<u32>,
        ids: u64,
    }

    impl FixedSource {
        fn new(draws: &[u32]) -> Self {
            Self {
                draws: draws.iter().copied().collect(),
                ids: 0,
            }
        }
    }

    impl RandomSource for FixedSource {
        fn draw(&mut self, bound: u32) -> u32 {
            self.draws.pop_front().unwrap_or(0) % bound
        }

        fn unique_id(&mut self) -> String {
            self.ids += 1;
            format!("id-{}", self.ids)
        }
    }

    struct SeededSource(StdRng);

    impl RandomSource for SeededSource {
        fn draw(&mut self, bound: u32) -> u32 {
            self.0.gen_range(0..bound)
        }

        fn unique_id(&mut self) -> String {
            Uuid::new_v4().to_string()
        }
    }

    fn key_of(decision: RoutingDecision) -> String {
        match decision {
            RoutingDecision::Key(k) => k,
            other => panic!("expected a key, got {:?}", other),
        }
    }

    #[test]
    fn round_robin_matches_modulo() {
        let mut rng = FixedSource::new(&[]);
        for p in 1..=12i32 {
            for n in 0..100u64 {
                let decision = evaluate(StrategyMode::RoundRobin, n, p, &mut rng).unwrap();
                assert_eq!(decision, RoutingDecision::Partition((n % p as u64) as i32));
            }
        }
    }

    #[test]
    fn round_robin_is_reproducible() {
        let mut rng = FixedSource::new(&[]);
        let first = evaluate(StrategyMode::RoundRobin, 7, 3, &mut rng).unwrap();
        let second = evaluate(StrategyMode::RoundRobin, 7, 3, &mut rng).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn rejects_partition_count_below_one() {
        let mut rng = FixedSource::new(&[]);
        for mode in [
            StrategyMode::RoundRobin,
            StrategyMode::HotPartition,
            StrategyMode::SingleKey,
            StrategyMode::EvenKeyRotating,
        ] {
            assert!(matches!(
                evaluate(mode, 0, 0, &mut rng),
                Err(Error::InvalidPartitionCount(0))
            ));
            assert!(matches!(
                evaluate(mode, 5, -3, &mut rng),
                Err(Error::InvalidPartitionCount(-3))
            ));
        }
    }

    #[test]
    fn hot_partition_sentinel_forces_partition_zero() {
        let mut rng = FixedSource::new(&[1]);
        let decision = evaluate(StrategyMode::HotPartition, 8, 3, &mut rng).unwrap();
        assert_eq!(decision, RoutingDecision::Partition(0));
    }

    #[test]
    fn hot_partition_otherwise_round_robins() {
        for draw in [0u32, 2, 3, 9] {
            let mut rng = FixedSource::new(&[draw]);
            let decision = evaluate(StrategyMode::HotPartition, 8, 3, &mut rng).unwrap();
            assert_eq!(decision, RoutingDecision::Partition(2));
        }
    }

    #[test]
    fn hot_partition_skew_converges_near_ten_percent() {
        let mut rng = SeededSource(StdRng::seed_from_u64(42));
        let samples = 100_000u64;
        let mut forced = 0u64;

        // Message numbers are chosen so the round-robin fallback never lands
        // on partition 0; any 0 seen is the coin flip.
        for i in 0..samples {
            let n = 3 * i + 1;
            match evaluate(StrategyMode::HotPartition, n, 3, &mut rng).unwrap() {
                RoutingDecision::Partition(0) => forced += 1,
                RoutingDecision::Partition(1) => {}
                other => panic!("unexpected decision {:?}", other),
            }
        }

        let fraction = forced as f64 / samples as f64;
        assert!(
            (fraction - 0.10).abs() < 0.01,
            "hot partition fraction {} outside tolerance",
            fraction
        );
    }

    #[test]
    fn single_key_ignores_message_number_and_partitions() {
        let mut rng = FixedSource::new(&[]);
        for (n, p) in [(0u64, 1i32), (1, 3), (999, 12), (u64::MAX, 1)] {
            let decision = evaluate(StrategyMode::SingleKey, n, p, &mut rng).unwrap();
            assert_eq!(decision, RoutingDecision::Key("key-0".to_string()));
        }
    }

    #[test]
    fn skewed_three_keys_boundaries() {
        let mut rng = FixedSource::new(&[]);
        assert_eq!(
            key_of(evaluate(StrategyMode::SkewedThreeKeys, 0, 3, &mut rng).unwrap()),
            "hot-key"
        );
        assert_eq!(
            key_of(evaluate(StrategyMode::SkewedThreeKeys, 79, 3, &mut rng).unwrap()),
            "hot-key"
        );
        // 80 % 3 == 2, 99 % 3 == 0
        assert_eq!(
            key_of(evaluate(StrategyMode::SkewedThreeKeys, 80, 3, &mut rng).unwrap()),
            "key-2"
        );
        assert_eq!(
            key_of(evaluate(StrategyMode::SkewedThreeKeys, 99, 3, &mut rng).unwrap()),
            "key-0"
        );
    }

    #[test]
    fn skewed_three_keys_weights_hot_key_at_eighty_percent() {
        let mut rng = FixedSource::new(&[]);
        let mut hot = 0;
        for n in 0..1000u64 {
            if key_of(evaluate(StrategyMode::SkewedThreeKeys, n, 3, &mut rng).unwrap())
                == "hot-key"
            {
                hot += 1;
            }
        }
        assert_eq!(hot, 800);
    }

    #[test]
    fn skewed_four_keys_exact_proportions() {
        let mut rng = FixedSource::new(&[]);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for n in 0..1000u64 {
            let key = key_of(evaluate(StrategyMode::SkewedFourKeys, n, 4, &mut rng).unwrap());
            *counts.entry(key).or_default() += 1;
        }
        assert_eq!(counts["hot-key-0"], 700);
        assert_eq!(counts["hot-key-1"], 150);
        assert_eq!(counts["hot-key-2"], 100);
        assert_eq!(counts["hot-key-3"], 50);
    }

    #[test]
    fn hot_key_fixed_buckets() {
        let mut rng = FixedSource::new(&[]);

        // 0-4 map to "key-0" - 50% of traffic
        for n in 0..5u64 {
            assert_eq!(
                key_of(evaluate(StrategyMode::HotKeyFixed, n, 3, &mut rng).unwrap()),
                "key-0"
            );
        }
        // 5-7 map to "key-1" - 30%
        for n in 5..8u64 {
            assert_eq!(
                key_of(evaluate(StrategyMode::HotKeyFixed, n, 3, &mut rng).unwrap()),
                "key-1"
            );
        }
        // 8-9 map to "key-2" - 20%
        for n in 8..10u64 {
            assert_eq!(
                key_of(evaluate(StrategyMode::HotKeyFixed, n, 3, &mut rng).unwrap()),
                "key-2"
            );
        }
    }

    #[test]
    fn hot_key_fixed_exact_distribution() {
        let mut rng = FixedSource::new(&[]);
        let mut counts: HashMap<String, u32> = HashMap::new();
        for n in 0..10_000u64 {
            let key = key_of(evaluate(StrategyMode::HotKeyFixed, n, 3, &mut rng).unwrap());
            *counts.entry(key).or_default() += 1;
        }
        assert_eq!(counts["key-0"], 5000);
        assert_eq!(counts["key-1"], 3000);
        assert_eq!(counts["key-2"], 2000);
    }

    #[test]
    fn even_key_rotating_cycles_ten_keys() {
        let mut rng = FixedSource::new(&[]);
        for n in 0..30u64 {
            let key = key_of(evaluate(StrategyMode::EvenKeyRotating, n, 3, &mut rng).unwrap());
            assert_eq!(key, format!("key-{}", n % 10));
        }
    }

    #[test]
    fn even_key_uuid_is_fresh_per_message() {
        let mut rng = ThreadRngSource;
        let first = key_of(evaluate(StrategyMode::EvenKeyUuid, 1, 3, &mut rng).unwrap());
        let second = key_of(evaluate(StrategyMode::EvenKeyUuid, 1, 3, &mut rng).unwrap());
        assert!(!first.is_empty());
        assert_ne!(first, second);
    }

    #[test]
    fn labels_map_case_insensitively() {
        assert_eq!(StrategyMode::from_label("single"), StrategyMode::SingleKey);
        assert_eq!(StrategyMode::from_label("BAD"), StrategyMode::HotKeyFixed);
        assert_eq!(StrategyMode::from_label("Good"), StrategyMode::EvenKeyUuid);
        assert_eq!(
            StrategyMode::from_label("Round_Robin"),
            StrategyMode::RoundRobin
        );
        assert_eq!(
            StrategyMode::from_label("hot-partition"),
            StrategyMode::HotPartition
        );
    }

    #[test]
    fn unknown_label_falls_back_to_even_distribution() {
        assert_eq!(
            StrategyMode::from_label("bogus-label"),
            StrategyMode::EvenKeyUuid
        );
        assert_eq!(StrategyMode::from_label(""), StrategyMode::EvenKeyUuid);
    }
}
