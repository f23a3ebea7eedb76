//! Key-sequence matching against a binding table.
//!
//! [`resolve`] is the pure decision at the heart of the engine. Given the token
//! just typed and the sequence accumulated so far it answers one of four ways:
//!
//! | exact binding | longer binding | outcome                               |
//! |---------------|----------------|---------------------------------------|
//! | yes           | no             | fire now, reset                       |
//! | yes           | yes            | defer the exact action, keep sequence |
//! | no            | yes            | keep building                         |
//! | no            | no             | dead end, reset                       |
//!
//! Only the first two consume the key event.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::ops::Bound;

/// Sequence string to action.
///
/// Keys are stored ordered, so every binding extending a candidate sits
/// directly after the candidate itself and the prefix test is a single range
/// probe instead of a scan.
#[derive(Clone)]
pub struct BindingTable<A> {
    bindings: BTreeMap<String, A>,
}

impl<A> Default for BindingTable<A> {
    fn default() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

impl<A> std::fmt::Debug for BindingTable<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.bindings.keys()).finish()
    }
}

impl<A> BindingTable<A> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `sequence`, replacing any previous binding for it.
    pub fn bind(&mut self, sequence: impl Into<String>, action: A) -> &mut Self {
        self.bindings.insert(sequence.into(), action);
        self
    }

    #[must_use]
    pub fn get(&self, sequence: &str) -> Option<&A> {
        self.bindings.get(sequence)
    }

    #[must_use]
    pub fn contains(&self, sequence: &str) -> bool {
        self.bindings.contains_key(sequence)
    }

    /// Whether some binding strictly extends `prefix`.
    #[must_use]
    pub fn has_extension(&self, prefix: &str) -> bool {
        self.bindings
            .range::<str, _>((Bound::Excluded(prefix), Bound::Unbounded))
            .next()
            .is_some_and(|(key, _)| key.starts_with(prefix))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn sequences(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }

    /// Layers `other` on top of this table; its bindings win on conflict.
    pub fn merge(&mut self, other: Self) {
        self.bindings.extend(other.bindings);
    }
}

impl<A, S: Into<String>> FromIterator<(S, A)> for BindingTable<A> {
    fn from_iter<I: IntoIterator<Item = (S, A)>>(iter: I) -> Self {
        Self {
            bindings: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<A> IntoIterator for BindingTable<A> {
    type Item = (String, A);
    type IntoIter = btree_map::IntoIter<String, A>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.into_iter()
    }
}

/// Result of feeding one token to the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution<A> {
    /// Action to fire immediately.
    pub action: Option<A>,
    /// Exact match to defer until the sequence is settled.
    pub pending: Option<A>,
    /// Accumulated sequence after this token.
    pub sequence: String,
    /// Whether the key event should be suppressed.
    pub consumed: bool,
}

/// Resolves `token` typed after `accumulated` against `table`.
#[must_use]
pub fn resolve<A: Clone>(token: &str, accumulated: &str, table: &BindingTable<A>) -> Resolution<A> {
    let candidate = format!("{accumulated}{token}");
    let exact = table.get(&candidate).cloned();
    let longer = table.has_extension(&candidate);

    match (exact, longer) {
        (Some(action), false) => Resolution {
            action: Some(action),
            pending: None,
            sequence: String::new(),
            consumed: true,
        },
        (Some(pending), true) => Resolution {
            action: None,
            pending: Some(pending),
            sequence: candidate,
            consumed: true,
        },
        (None, true) => Resolution {
            action: None,
            pending: None,
            sequence: candidate,
            consumed: false,
        },
        (None, false) => Resolution {
            action: None,
            pending: None,
            sequence: String::new(),
            consumed: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn table(keys: &[&'static str]) -> BindingTable<&'static str> {
        keys.iter().map(|k| (*k, *k)).collect()
    }

    #[test]
    fn exact_without_extension_fires() {
        let t = table(&["gh", "gs"]);
        let first = resolve("g", "", &t);
        assert_eq!(first.action, None);
        assert_eq!(first.sequence, "g");
        assert!(!first.consumed);

        let second = resolve("h", &first.sequence, &t);
        assert_eq!(second.action, Some("gh"));
        assert_eq!(second.pending, None);
        assert_eq!(second.sequence, "");
        assert!(second.consumed);
    }

    #[test]
    fn exact_with_extension_defers() {
        let t = table(&["m", "mw", "ms"]);
        let r = resolve("m", "", &t);
        assert_eq!(r.action, None);
        assert_eq!(r.pending, Some("m"));
        assert_eq!(r.sequence, "m");
        assert!(r.consumed);
    }

    #[test]
    fn dead_end_resets() {
        let t = table(&["m", "mw"]);
        let r = resolve("x", "m", &t);
        assert_eq!(r, Resolution { action: None, pending: None, sequence: String::new(), consumed: false });
    }

    #[test]
    fn empty_table_is_always_a_dead_end() {
        let t: BindingTable<&str> = BindingTable::new();
        for token in ["a", "C-f", "Enter"] {
            let r = resolve(token, "", &t);
            assert!(r.action.is_none() && r.pending.is_none());
            assert!(r.sequence.is_empty());
            assert!(!r.consumed);
        }
    }

    #[test]
    fn multi_token_sequences_concatenate() {
        let t = table(&["C-xC-s"]);
        let r = resolve("C-x", "", &t);
        assert_eq!(r.sequence, "C-x");
        let r = resolve("C-s", &r.sequence, &t);
        assert_eq!(r.action, Some("C-xC-s"));
    }

    #[test]
    fn extension_probe_ignores_unrelated_neighbours() {
        let t = table(&["a", "ab", "b"]);
        assert!(t.has_extension("a"));
        assert!(!t.has_extension("ab"));
        assert!(!t.has_extension("b"));
        assert!(t.has_extension(""));
    }

    #[test]
    fn merge_overrides_conflicts() {
        let mut base: BindingTable<u8> = [("j", 1), ("k", 2)].into_iter().collect();
        base.merge([("k", 3), ("l", 4)].into_iter().collect());
        assert_eq!(base.get("j"), Some(&1));
        assert_eq!(base.get("k"), Some(&3));
        assert_eq!(base.len(), 3);
    }

    fn linear_has_extension(keys: &[String], prefix: &str) -> bool {
        keys.iter().any(|k| k.starts_with(prefix) && k.len() > prefix.len())
    }

    proptest! {
        #[test]
        fn range_probe_matches_linear_scan(
            keys in prop::collection::vec("[a-c]{1,3}", 0..12),
            prefix in "[a-c]{0,3}",
        ) {
            let t: BindingTable<()> = keys.iter().map(|k| (k.clone(), ())).collect();
            prop_assert_eq!(t.has_extension(&prefix), linear_has_extension(&keys, &prefix));
        }

        #[test]
        fn resolution_shape_is_consistent(
            keys in prop::collection::vec("[a-c]{1,3}", 0..12),
            accumulated in "[a-c]{0,2}",
            token in "[a-d]",
        ) {
            let t: BindingTable<String> = keys.iter().map(|k| (k.clone(), k.clone())).collect();
            let r = resolve(&token, &accumulated, &t);
            let candidate = format!("{accumulated}{token}");

            prop_assert!(r.action.is_none() || r.pending.is_none());
            prop_assert_eq!(r.consumed, t.contains(&candidate));
            prop_assert_eq!(r.sequence.is_empty(), !t.has_extension(&candidate));
            if let Some(fired) = r.action.as_ref().or(r.pending.as_ref()) {
                prop_assert_eq!(fired, &candidate);
            }
        }
    }
}
