use core::cell::Cell;
use std::{
    collections::HashSet,
    rc::Rc,
    sync::{Arc, Mutex},
    thread::scope,
};

use crate::{
    Error, IdGenerator, MonoUlidGenerator, MonotonicClock, OverflowPolicy, RandSource,
    SeededRandom, SystemClock, ThreadRandom, TimeSource, Ulid, UlidGenerator,
};

struct MockTime {
    millis: u64,
}

impl TimeSource for MockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

struct MockStepTime {
    values: Vec<u64>,
    index: Cell<usize>,
}

impl MockStepTime {
    fn shared(values: Vec<u64>) -> Rc<Self> {
        Rc::new(Self {
            values,
            index: Cell::new(0),
        })
    }

    fn advance(&self) {
        self.index.set(self.index.get() + 1);
    }
}

impl TimeSource for MockStepTime {
    fn current_millis(&self) -> u64 {
        self.values[self.index.get()]
    }
}

struct MockRand {
    rand: u128,
}

impl RandSource<u128> for MockRand {
    fn rand(&self) -> u128 {
        self.rand
    }
}

/// Returns 0, 1, 2, ... on successive draws.
#[derive(Default)]
struct CountingRand {
    next: Cell<u128>,
}

impl RandSource<u128> for CountingRand {
    fn rand(&self) -> u128 {
        let value = self.next.get();
        self.next.set(value + 1);
        value
    }
}

struct MaxRand;
impl RandSource<u128> for MaxRand {
    fn rand(&self) -> u128 {
        u128::MAX
    }
}

#[test]
fn stateless_generator_uses_clock_and_rng() {
    let generator = UlidGenerator::new(MockTime { millis: 42 }, MockRand { rand: 7 });
    let id = generator.generate().unwrap();
    assert_eq!(id.timestamp(), 42);
    assert_eq!(id.random(), 7);
}

#[test]
fn stateless_generator_truncates_random_to_80_bits() {
    let generator = UlidGenerator::new(MockTime { millis: 1 }, MaxRand);
    let id = generator.generate().unwrap();
    assert_eq!(id.timestamp(), 1);
    assert_eq!(id.random(), Ulid::max_random());
}

#[test]
fn stateless_generator_draws_fresh_randomness_each_call() {
    let generator = UlidGenerator::new(MockTime { millis: 5 }, CountingRand::default());
    let a = generator.generate().unwrap();
    let b = generator.generate().unwrap();
    assert_eq!((a.random(), b.random()), (0, 1));
}

#[test]
fn timestamp_beyond_48_bits_is_rejected() {
    let too_late = Ulid::max_timestamp() + 1;
    let generator = UlidGenerator::new(MockTime { millis: too_late }, ThreadRandom);
    assert_eq!(
        generator.generate(),
        Err(Error::TimestampOverflow {
            timestamp: too_late,
            max: Ulid::max_timestamp(),
        })
    );

    let generator = MonoUlidGenerator::new(MockTime { millis: too_late }, ThreadRandom);
    assert!(matches!(
        generator.generate(),
        Err(Error::TimestampOverflow { .. })
    ));
}

#[test]
fn mono_increments_random_within_same_tick() {
    let generator = MonoUlidGenerator::new(MockTime { millis: 42 }, MockRand { rand: 100 });

    let id1 = generator.generate().unwrap();
    let id2 = generator.generate().unwrap();
    let id3 = generator.generate().unwrap();

    for id in [id1, id2, id3] {
        assert_eq!(id.timestamp(), 42);
    }
    assert_eq!(id1.random(), 100);
    assert_eq!(id2.random(), 101);
    assert_eq!(id3.random(), 102);
    assert!(id1.encode() < id2.encode() && id2.encode() < id3.encode());
}

#[test]
fn mono_draws_fresh_random_on_new_tick() {
    let clock = MockStepTime::shared(vec![42, 43]);
    let generator = MonoUlidGenerator::new(Rc::clone(&clock), CountingRand::default());

    let first = generator.generate().unwrap();
    let second = generator.generate().unwrap();
    assert_eq!((first.random(), second.random()), (0, 1));

    clock.advance();
    let third = generator.generate().unwrap();
    assert_eq!(third.timestamp(), 43);
    // second draw from the source: fresh randomness, not an increment
    assert_eq!(third.random(), 1);
}

#[test]
fn mono_holds_last_timestamp_when_clock_moves_backwards() {
    let clock = MockStepTime::shared(vec![50, 40]);
    let generator = MonoUlidGenerator::new(Rc::clone(&clock), MockRand { rand: 9 });

    let before = generator.generate().unwrap();
    clock.advance();
    let after = generator.generate().unwrap();

    assert_eq!(after.timestamp(), 50);
    assert_eq!(after.random(), 10);
    assert!(after > before);
}

#[test]
fn mono_fails_on_random_overflow_by_default() {
    let generator = MonoUlidGenerator::new(MockTime { millis: 7 }, MaxRand);

    let id = generator.generate().unwrap();
    assert_eq!(id.random(), Ulid::max_random());
    assert_eq!(
        generator.generate(),
        Err(Error::RandomExhausted { timestamp: 7 })
    );
    // Still exhausted: no partial state change on failure
    assert_eq!(
        generator.generate(),
        Err(Error::RandomExhausted { timestamp: 7 })
    );
}

#[test]
fn mono_advances_timestamp_on_overflow_when_configured() {
    let generator = MonoUlidGenerator::with_policy(
        MockTime { millis: 7 },
        MaxRand,
        OverflowPolicy::AdvanceTimestamp,
    );
    assert_eq!(generator.policy(), OverflowPolicy::AdvanceTimestamp);

    let first = generator.generate().unwrap();
    let second = generator.generate().unwrap();
    assert_eq!(first.timestamp(), 7);
    assert_eq!(second.timestamp(), 8);
    assert!(second > first);
}

#[test]
fn mono_resumes_after_last_issued_ulid() {
    let last = Ulid::from_parts(1_000, 5);
    let generator = MonoUlidGenerator::from_last(
        last,
        MockTime { millis: 1_000 },
        ThreadRandom,
        OverflowPolicy::Fail,
    );
    assert_eq!(generator.generate().unwrap(), Ulid::from_parts(1_000, 6));
}

#[test]
fn mono_10k_sequential_ids_are_strictly_ordered() {
    let generator = MonoUlidGenerator::new(SystemClock, ThreadRandom);
    let encoded: Vec<String> = (0..10_000)
        .map(|_| generator.generate().unwrap().to_string())
        .collect();

    for pair in encoded.windows(2) {
        assert!(pair[0] < pair[1], "{} !< {}", pair[0], pair[1]);
    }
    let unique: HashSet<_> = encoded.iter().collect();
    assert_eq!(unique.len(), 10_000);
}

#[test]
fn encoded_ids_round_trip_to_their_parts() {
    let generator = MonoUlidGenerator::new(SystemClock, SeededRandom::new(11));
    for _ in 0..1_000 {
        let id = generator.generate().unwrap();
        let decoded = Ulid::decode(id.encode()).unwrap();
        assert_eq!(
            (decoded.timestamp(), decoded.random()),
            (id.timestamp(), id.random())
        );
    }
}

#[test]
fn stateless_10k_ids_are_unique() {
    let generator = UlidGenerator::new(SystemClock, ThreadRandom);
    let seen: HashSet<Ulid> = (0..10_000).map(|_| generator.generate().unwrap()).collect();
    assert_eq!(seen.len(), 10_000);
}

#[test]
fn mono_ids_are_unique_across_threads() {
    const THREADS: usize = 8;
    const TOTAL_IDS: usize = 10_000;
    const IDS_PER_THREAD: usize = TOTAL_IDS / THREADS;

    let generator = Arc::new(MonoUlidGenerator::new(MonotonicClock::new(), ThreadRandom));
    let seen = Arc::new(Mutex::new(HashSet::with_capacity(TOTAL_IDS)));

    scope(|s| {
        for _ in 0..THREADS {
            let generator = Arc::clone(&generator);
            let seen = Arc::clone(&seen);
            s.spawn(move || {
                let mut last: Option<Ulid> = None;
                for _ in 0..IDS_PER_THREAD {
                    let id = generator.generate().unwrap();
                    if let Some(prev) = last {
                        assert!(id > prev);
                    }
                    last = Some(id);
                    assert!(seen.lock().unwrap().insert(id));
                }
            });
        }
    });

    assert_eq!(seen.lock().unwrap().len(), TOTAL_IDS);
}

#[test]
fn generators_share_the_id_generator_contract() {
    fn next<G: IdGenerator<Id = Ulid>>(generator: &G) -> Ulid {
        generator.generate().unwrap()
    }

    let clock = MockTime { millis: 3 };
    assert_eq!(next(&UlidGenerator::new(&clock, MockRand { rand: 1 })).timestamp(), 3);
    assert_eq!(next(&MonoUlidGenerator::new(&clock, MockRand { rand: 1 })).random(), 1);
}

#[test]
fn generators_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<UlidGenerator<SystemClock, ThreadRandom>>();
    assert_send_sync::<MonoUlidGenerator<MonotonicClock, ThreadRandom>>();
    assert_send_sync::<MonoUlidGenerator<SystemClock, SeededRandom>>();
}
