//! # Latest-value slot.
//!
//! Holds the most recent [`Snapshot`] of a bridge. Writers replace the whole
//! snapshot with a read-copy-update loop, so readers on any thread always see
//! a complete `(version, outcome)` pair and versions increase strictly by one
//! per publish.

use std::ops::Deref;
use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::outcome::Outcome;

/// One published outcome and its slot version.
///
/// Versions start at 1 and grow by one per publish, which lets observers skip
/// snapshots they already saw.
#[derive(Debug)]
pub struct Snapshot<T> {
    version: u64,
    outcome: Arc<Outcome<T>>,
}

impl<T> Snapshot<T> {
    /// Returns the slot version of this snapshot.
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the published outcome.
    #[inline]
    pub fn outcome(&self) -> &Outcome<T> {
        &self.outcome
    }
}

impl<T> Deref for Snapshot<T> {
    type Target = Outcome<T>;

    fn deref(&self) -> &Self::Target {
        &self.outcome
    }
}

pub(crate) struct LatestSlot<T> {
    cell: ArcSwapOption<Snapshot<T>>,
}

impl<T> LatestSlot<T> {
    pub(crate) fn new() -> Self {
        Self {
            cell: ArcSwapOption::empty(),
        }
    }

    /// Stores `outcome` and returns its version.
    pub(crate) fn publish(&self, outcome: Outcome<T>) -> u64 {
        let outcome = Arc::new(outcome);
        let prev = self.cell.rcu(|current| {
            Some(Arc::new(Snapshot {
                version: next_version(current),
                outcome: Arc::clone(&outcome),
            }))
        });
        next_version(&prev)
    }

    pub(crate) fn load(&self) -> Option<Arc<Snapshot<T>>> {
        self.cell.load_full()
    }
}

fn next_version<T>(current: &Option<Arc<Snapshot<T>>>) -> u64 {
    current.as_ref().map_or(1, |s| s.version + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versions_increase_by_one() {
        let slot = LatestSlot::new();
        assert!(slot.load().is_none());

        assert_eq!(slot.publish(Outcome::Value(1_u8)), 1);
        assert_eq!(slot.publish(Outcome::Completed), 2);

        let snap = slot.load().unwrap();
        assert_eq!(snap.version(), 2);
        assert!(snap.is_completed());
    }

    #[test]
    fn test_concurrent_publishers_never_share_a_version() {
        let slot = Arc::new(LatestSlot::new());
        let workers: Vec<_> = (0..4)
            .map(|w| {
                let slot = Arc::clone(&slot);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|i| slot.publish(Outcome::Value(w * 1000 + i)))
                        .collect::<Vec<u64>>()
                })
            })
            .collect();

        let mut versions: Vec<u64> = workers
            .into_iter()
            .flat_map(|w| w.join().unwrap())
            .collect();
        versions.sort_unstable();
        versions.dedup();

        assert_eq!(versions.len(), 1000);
        assert_eq!(slot.load().unwrap().version(), 1000);
    }
}
