//! Proximity activation bookkeeping shared by enemies and chests.
//!
//! Every record lives in exactly one of two places: the ordered active list
//! that the simulation iterates each tick, or a spatial bucket keyed by the
//! position the record had when it went dormant. Reconciliation only visits
//! the active list and the buckets overlapping the activation radius, so the
//! cost per tick does not grow with the size of the dormant population.

use std::{
    collections::{HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

use overworld_core::{CellCoord, Coordinates};
use thiserror::Error;

/// Anything the ledger can place on the plane.
pub(crate) trait Placed {
    fn position(&self) -> Coordinates;
}

/// Inconsistencies detected between the active list and the dormant index.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// An identifier was inserted twice.
    #[error("entity {entity} is already tracked")]
    Duplicate {
        /// Debug rendering of the identifier.
        entity: String,
    },
    /// An identifier is listed although no record exists for it.
    #[error("entity {entity} is listed but has no record")]
    Orphaned {
        /// Debug rendering of the identifier.
        entity: String,
    },
    /// An identifier appears in both sets or twice in one of them.
    #[error("entity {entity} is listed more than once")]
    Repeated {
        /// Debug rendering of the identifier.
        entity: String,
    },
    /// A record is listed somewhere its status disagrees with.
    #[error("entity {entity} is listed in the wrong set")]
    Misfiled {
        /// Debug rendering of the identifier.
        entity: String,
    },
    /// A record is missing from both sets.
    #[error("entity {entity} is neither active nor inactive")]
    Untracked {
        /// Debug rendering of the identifier.
        entity: String,
    },
}

/// Identifiers that entered or left the active set during reconciliation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ActivationDelta<K> {
    pub(crate) activated: Vec<K>,
    pub(crate) deactivated: Vec<K>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Status {
    Active,
    Inactive(CellCoord),
}

#[derive(Clone, Debug)]
struct Entry<T> {
    value: T,
    status: Status,
}

#[derive(Clone, Debug)]
pub(crate) struct ActivationLedger<K, T> {
    entries: HashMap<K, Entry<T>>,
    active: Vec<K>,
    buckets: HashMap<CellCoord, Vec<K>>,
    bucket_side: f64,
}

impl<K, T> ActivationLedger<K, T>
where
    K: Copy + Eq + Hash + Ord + Debug,
    T: Placed,
{
    pub(crate) fn new(bucket_side: f64) -> Self {
        Self {
            entries: HashMap::new(),
            active: Vec::new(),
            buckets: HashMap::new(),
            bucket_side: if bucket_side > 0.0 { bucket_side } else { 1.0 },
        }
    }

    /// Tracks a new record as inactive.
    pub(crate) fn insert(&mut self, key: K, value: T) -> Result<(), LedgerError> {
        if self.entries.contains_key(&key) {
            return Err(LedgerError::Duplicate {
                entity: format!("{key:?}"),
            });
        }

        let bucket = self.bucket_of(value.position());
        self.buckets.entry(bucket).or_default().push(key);
        let _ = self.entries.insert(
            key,
            Entry {
                value,
                status: Status::Inactive(bucket),
            },
        );
        Ok(())
    }

    pub(crate) fn get(&self, key: &K) -> Option<&T> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    /// Mutable access restricted to active records.
    ///
    /// Dormant records are indexed by position and must not move.
    pub(crate) fn active_mut(&mut self, key: &K) -> Option<&mut T> {
        self.entries
            .get_mut(key)
            .filter(|entry| entry.status == Status::Active)
            .map(|entry| &mut entry.value)
    }

    pub(crate) fn is_active(&self, key: &K) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| entry.status == Status::Active)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn active_len(&self) -> usize {
        self.active.len()
    }

    /// Active records in activation order.
    pub(crate) fn iter_active(&self) -> impl Iterator<Item = (K, &T)> + '_ {
        self.active
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (*key, &entry.value)))
    }

    pub(crate) fn for_each_active_mut(&mut self, mut visit: impl FnMut(K, &mut T)) {
        for key in &self.active {
            if let Some(entry) = self.entries.get_mut(key) {
                visit(*key, &mut entry.value);
            }
        }
    }

    /// Permanently forgets a record, whichever set it is in.
    pub(crate) fn remove(&mut self, key: &K) -> Option<T> {
        let entry = self.entries.remove(key)?;
        match entry.status {
            Status::Active => self.active.retain(|candidate| candidate != key),
            Status::Inactive(bucket) => {
                let now_empty = self.buckets.get_mut(&bucket).is_some_and(|keys| {
                    keys.retain(|candidate| candidate != key);
                    keys.is_empty()
                });
                if now_empty {
                    let _ = self.buckets.remove(&bucket);
                }
            }
        }
        Some(entry.value)
    }

    /// Moves records across the activation boundary around `center`.
    ///
    /// Records farther than `radius` are deactivated first, then dormant
    /// records within `radius` are activated. Each phase decides on a fixed
    /// snapshot before mutating anything.
    pub(crate) fn reconcile(&mut self, center: Coordinates, radius: f64) -> ActivationDelta<K> {
        let deactivated: Vec<K> = self
            .active
            .iter()
            .copied()
            .filter(|key| {
                self.entries
                    .get(key)
                    .is_some_and(|entry| entry.value.position().distance(center) > radius)
            })
            .collect();

        if !deactivated.is_empty() {
            let leaving: HashSet<K> = deactivated.iter().copied().collect();
            self.active.retain(|key| !leaving.contains(key));
            for key in &deactivated {
                let Some(entry) = self.entries.get_mut(key) else {
                    continue;
                };
                let bucket = bucket_for(entry.value.position(), self.bucket_side);
                entry.status = Status::Inactive(bucket);
                self.buckets.entry(bucket).or_default().push(*key);
            }
        }

        let mut activated = Vec::new();
        for bucket in self.buckets_within(center, radius) {
            let Some(keys) = self.buckets.get_mut(&bucket) else {
                continue;
            };
            let entries = &self.entries;
            keys.retain(|key| {
                let within = entries
                    .get(key)
                    .is_some_and(|entry| entry.value.position().distance(center) <= radius);
                if within {
                    activated.push(*key);
                }
                !within
            });
            let now_empty = keys.is_empty();
            if now_empty {
                let _ = self.buckets.remove(&bucket);
            }
        }

        for key in &activated {
            if let Some(entry) = self.entries.get_mut(key) {
                entry.status = Status::Active;
            }
            self.active.push(*key);
        }

        ActivationDelta {
            activated,
            deactivated,
        }
    }

    /// Verifies that every record is in exactly one of the two sets.
    pub(crate) fn check_invariants(&self) -> Result<(), LedgerError> {
        let mut seen: HashSet<K> = HashSet::with_capacity(self.entries.len());

        for key in &self.active {
            let entity = || format!("{key:?}");
            match self.entries.get(key) {
                None => return Err(LedgerError::Orphaned { entity: entity() }),
                Some(entry) if entry.status != Status::Active => {
                    return Err(LedgerError::Misfiled { entity: entity() })
                }
                Some(_) => {}
            }
            if !seen.insert(*key) {
                return Err(LedgerError::Repeated { entity: entity() });
            }
        }

        for (bucket, keys) in &self.buckets {
            for key in keys {
                let entity = || format!("{key:?}");
                match self.entries.get(key) {
                    None => return Err(LedgerError::Orphaned { entity: entity() }),
                    Some(entry) if entry.status != Status::Inactive(*bucket) => {
                        return Err(LedgerError::Misfiled { entity: entity() })
                    }
                    Some(_) => {}
                }
                if !seen.insert(*key) {
                    return Err(LedgerError::Repeated { entity: entity() });
                }
            }
        }

        if let Some(key) = self.entries.keys().find(|key| !seen.contains(key)) {
            return Err(LedgerError::Untracked {
                entity: format!("{key:?}"),
            });
        }

        Ok(())
    }

    fn bucket_of(&self, position: Coordinates) -> CellCoord {
        bucket_for(position, self.bucket_side)
    }

    /// Occupied buckets overlapping the square that bounds the radius.
    fn buckets_within(&self, center: Coordinates, radius: f64) -> Vec<CellCoord> {
        let low = self.bucket_of(Coordinates::new(center.x() - radius, center.y() - radius));
        let high = self.bucket_of(Coordinates::new(center.x() + radius, center.y() + radius));
        let columns = u128::from(high.x().abs_diff(low.x())) + 1;
        let rows = u128::from(high.y().abs_diff(low.y())) + 1;
        let span = columns.saturating_mul(rows);

        if span <= self.buckets.len() as u128 {
            let mut buckets = Vec::new();
            for x in low.x()..=high.x() {
                for y in low.y()..=high.y() {
                    let bucket = CellCoord::new(x, y);
                    if self.buckets.contains_key(&bucket) {
                        buckets.push(bucket);
                    }
                }
            }
            buckets
        } else {
            let mut buckets: Vec<CellCoord> = self
                .buckets
                .keys()
                .copied()
                .filter(|bucket| {
                    (low.x()..=high.x()).contains(&bucket.x())
                        && (low.y()..=high.y()).contains(&bucket.y())
                })
                .collect();
            buckets.sort_by_key(|bucket| (bucket.x(), bucket.y()));
            buckets
        }
    }
}

fn bucket_for(position: Coordinates, side: f64) -> CellCoord {
    CellCoord::new(
        (position.x() / side).floor() as i64,
        (position.y() / side).floor() as i64,
    )
}
