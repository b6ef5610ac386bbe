//! Model-based property tests for the session registry.
//!
//! Random operation sequences run against the real [`Registry`] and a plain
//! map model; after every step both must agree on which keys are registered
//! and which are still active.
//!
//! ```text
//! proptest generates: Vec<Operation>
//!                          │
//!           ┌──────────────┼──────────────┐
//!           ▼              ▼              ▼
//!         Model        Registry        Compare
//! ```

use std::collections::HashMap;

use moonframe_core::{Registry, SessionKey, SessionLease};
use proptest::prelude::*;

const KEYS: u8 = 4;

#[derive(Debug, Clone)]
enum Operation {
    Start(u8),
    Stop(u8),
    /// The playback loop for this key ends and drops its lease.
    Finish(u8),
    /// Manual removal, bypassing the lease.
    Remove(u8),
}

fn operation() -> impl Strategy<Value = Operation> {
    prop_oneof![
        (0..KEYS).prop_map(Operation::Start),
        (0..KEYS).prop_map(Operation::Stop),
        (0..KEYS).prop_map(Operation::Finish),
        (0..KEYS).prop_map(Operation::Remove),
    ]
}

fn key(k: u8) -> SessionKey {
    SessionKey::from(u64::from(k))
}

/// Reference model: key -> active flag.
#[derive(Default)]
struct Model {
    sessions: HashMap<u8, bool>,
}

impl Model {
    fn start(&mut self, k: u8) -> bool {
        if self.sessions.contains_key(&k) {
            return false;
        }
        self.sessions.insert(k, true);
        true
    }

    fn stop(&mut self, k: u8) -> bool {
        match self.sessions.get_mut(&k) {
            Some(active) if *active => {
                *active = false;
                true
            },
            _ => false,
        }
    }

    fn remove(&mut self, k: u8) -> bool {
        self.sessions.remove(&k).is_some()
    }
}

/// Real registry plus the leases a running loop would hold.
///
/// A lease left behind by `Remove` is stale; it is replaced on the next
/// successful start for its key, and dropping it must not touch the registry.
#[derive(Default)]
struct Real {
    registry: Registry,
    leases: HashMap<u8, SessionLease>,
}

proptest! {
    #[test]
    fn registry_matches_model(ops in proptest::collection::vec(operation(), 1..64)) {
        let mut model = Model::default();
        let mut real = Real::default();

        for op in &ops {
            match *op {
                Operation::Start(k) => {
                    let expected = model.start(k);
                    let result = real.registry.start(key(k));
                    prop_assert_eq!(result.is_ok(), expected, "start {}", k);
                    if let Ok(lease) = result {
                        real.leases.insert(k, lease);
                    }
                },
                Operation::Stop(k) => {
                    prop_assert_eq!(real.registry.stop(&key(k)), model.stop(k), "stop {}", k);
                },
                Operation::Finish(k) => {
                    // Only a live lease maps to a model entry.
                    if real.leases.remove(&k).is_some() {
                        model.remove(k);
                    }
                },
                Operation::Remove(k) => {
                    prop_assert_eq!(real.registry.remove(&key(k)), model.remove(k), "remove {}", k);
                },
            }

            for k in 0..KEYS {
                let expected_active = model.sessions.get(&k).copied().unwrap_or(false);
                prop_assert_eq!(real.registry.contains(&key(k)), model.sessions.contains_key(&k));
                prop_assert_eq!(real.registry.is_active(&key(k)), expected_active);
            }
            prop_assert_eq!(real.registry.len(), model.sessions.len());
        }
    }
}
