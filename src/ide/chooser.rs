//! Picking one header when an include resolves to several.

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::resolve::ResolvedLocation;

/// Chooses one candidate out of an ambiguous resolution.
///
/// May block on user input or answer deterministically; `None` means the
/// choice was declined.
pub trait HeaderChooser: Send + Sync {
    fn choose_one(&self, candidates: &[ResolvedLocation]) -> Option<ResolvedLocation>;
}

impl<F> HeaderChooser for F
where
    F: Fn(&[ResolvedLocation]) -> Option<ResolvedLocation> + Send + Sync,
{
    fn choose_one(&self, candidates: &[ResolvedLocation]) -> Option<ResolvedLocation> {
        self(candidates)
    }
}

/// Always takes the first candidate in resolution order.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstCandidate;

impl HeaderChooser for FirstCandidate {
    fn choose_one(&self, candidates: &[ResolvedLocation]) -> Option<ResolvedLocation> {
        candidates.first().cloned()
    }
}

/// Remembers the inner chooser's answer per candidate set, so an identical
/// ambiguity is only asked once. The set is compared ignoring order.
#[derive(Debug, Default)]
pub struct CachingChooser<C> {
    inner: C,
    decisions: Mutex<FxHashMap<Vec<ResolvedLocation>, Option<ResolvedLocation>>>,
}

impl<C: HeaderChooser> CachingChooser<C> {
    pub fn new(inner: C) -> Self {
        Self {
            inner,
            decisions: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn forget(&self) {
        self.decisions.lock().clear();
    }

    pub fn cached_decisions(&self) -> usize {
        self.decisions.lock().len()
    }
}

impl<C: HeaderChooser> HeaderChooser for CachingChooser<C> {
    fn choose_one(&self, candidates: &[ResolvedLocation]) -> Option<ResolvedLocation> {
        let mut key = candidates.to_vec();
        key.sort();
        key.dedup();

        if let Some(decision) = self.decisions.lock().get(&key) {
            return decision.clone();
        }
        // Not holding the lock while the inner chooser (possibly a prompt) runs.
        let decision = self.inner.choose_one(candidates);
        self.decisions
            .lock()
            .entry(key)
            .or_insert(decision)
            .clone()
    }
}

/// Reduce a resolution to one location, consulting `chooser` only when
/// there is more than one candidate.
pub fn pick_single(
    candidates: &[ResolvedLocation],
    chooser: &dyn HeaderChooser,
) -> Option<ResolvedLocation> {
    match candidates {
        [] => None,
        [only] => Some(only.clone()),
        _ => chooser.choose_one(candidates),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn loc(path: &str) -> ResolvedLocation {
        ResolvedLocation::File(path.into())
    }

    #[test]
    fn test_pick_single_skips_chooser_for_unambiguous() {
        let refuse = |_: &[ResolvedLocation]| -> Option<ResolvedLocation> {
            panic!("chooser must not be asked")
        };
        assert_eq!(pick_single(&[], &refuse), None);
        assert_eq!(pick_single(&[loc("/a.h")], &refuse), Some(loc("/a.h")));
        assert_eq!(
            pick_single(&[loc("/a.h"), loc("/b.h")], &FirstCandidate),
            Some(loc("/a.h"))
        );
    }

    #[test]
    fn test_caching_chooser_asks_once_per_set() {
        let asked = AtomicUsize::new(0);
        let last = |candidates: &[ResolvedLocation]| -> Option<ResolvedLocation> {
            asked.fetch_add(1, Ordering::SeqCst);
            candidates.last().cloned()
        };
        let chooser = CachingChooser::new(last);

        let first = chooser.choose_one(&[loc("/a.h"), loc("/b.h")]);
        assert_eq!(first, Some(loc("/b.h")));
        // Same set in a different order: cached answer, no new prompt.
        let second = chooser.choose_one(&[loc("/b.h"), loc("/a.h")]);
        assert_eq!(second, Some(loc("/b.h")));
        assert_eq!(asked.load(Ordering::SeqCst), 1);

        chooser.choose_one(&[loc("/a.h"), loc("/c.h")]);
        assert_eq!(asked.load(Ordering::SeqCst), 2);
        assert_eq!(chooser.cached_decisions(), 2);

        chooser.forget();
        assert_eq!(chooser.cached_decisions(), 0);
    }

    #[test]
    fn test_declined_choice_is_cached() {
        let asked = AtomicUsize::new(0);
        let decline = |_: &[ResolvedLocation]| -> Option<ResolvedLocation> {
            asked.fetch_add(1, Ordering::SeqCst);
            None
        };
        let chooser = CachingChooser::new(decline);
        assert_eq!(chooser.choose_one(&[loc("/a.h"), loc("/b.h")]), None);
        assert_eq!(chooser.choose_one(&[loc("/a.h"), loc("/b.h")]), None);
        assert_eq!(asked.load(Ordering::SeqCst), 1);
    }
}
