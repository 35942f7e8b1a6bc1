//! Panel-scoped record storage.
//!
//! Each screen owns one `Catalog` per table (plus a `RuleBook` where
//! child rules belong to a group). Nothing here is shared or concurrent:
//! all mutation happens synchronously on the UI event loop, so a plain
//! ordered `Vec` is the whole story. Mutators return `Result` instead of
//! panicking on a stale index.

use std::hash::Hash;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::CoreError;

/// An ordered, panel-owned collection of records.
#[derive(Debug, Clone)]
pub struct Catalog<T> {
    /// Domain word used in "select a … entry first" messages.
    label: &'static str,
    entries: Vec<T>,
}

impl<T> Catalog<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            entries: Vec::new(),
        }
    }

    pub fn with_entries(label: &'static str, entries: Vec<T>) -> Self {
        Self { label, entries }
    }

    pub fn add(&mut self, entry: T) {
        self.entries.push(entry);
    }

    /// Overwrite the record at `index` in place.
    pub fn update(&mut self, index: usize, entry: T) -> Result<(), CoreError> {
        match self.entries.get_mut(index) {
            Some(slot) => {
                *slot = entry;
                Ok(())
            }
            None => Err(CoreError::nothing_selected(self.label)),
        }
    }

    /// Remove exactly one record; all others keep their relative order.
    pub fn remove(&mut self, index: usize) -> Result<T, CoreError> {
        if index < self.entries.len() {
            debug!("removing {} entry at index {index}", self.label);
            Ok(self.entries.remove(index))
        } else {
            Err(CoreError::nothing_selected(self.label))
        }
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.entries.get(index)
    }

    /// The record behind a table selection, or the no-selection error.
    pub fn selected(&self, index: Option<usize>) -> Result<&T, CoreError> {
        index
            .and_then(|i| self.entries.get(i))
            .ok_or_else(|| CoreError::nothing_selected(self.label))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }
}

impl<'a, T> IntoIterator for &'a Catalog<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Child rules keyed by their owning group (ACL number, QoS policy name).
///
/// Keeps a real association so selecting any group shows its own rules,
/// and deleting a group takes its rules with it.
#[derive(Debug, Clone)]
pub struct RuleBook<K, T>
where
    K: Hash + Eq,
{
    label: &'static str,
    rules: IndexMap<K, Vec<T>>,
}

impl<K, T> RuleBook<K, T>
where
    K: Hash + Eq,
{
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            rules: IndexMap::new(),
        }
    }

    /// Rules belonging to `key`, in insertion order. Unknown keys are an
    /// empty slice, not an error: a freshly added group has no rules yet.
    pub fn rules(&self, key: &K) -> &[T] {
        self.rules.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn add_rule(&mut self, key: K, rule: T) {
        self.rules.entry(key).or_default().push(rule);
    }

    pub fn update_rule(&mut self, key: &K, index: usize, rule: T) -> Result<(), CoreError> {
        match self.rules.get_mut(key).and_then(|v| v.get_mut(index)) {
            Some(slot) => {
                *slot = rule;
                Ok(())
            }
            None => Err(CoreError::nothing_selected(self.label)),
        }
    }

    pub fn remove_rule(&mut self, key: &K, index: usize) -> Result<T, CoreError> {
        match self.rules.get_mut(key) {
            Some(v) if index < v.len() => Ok(v.remove(index)),
            _ => Err(CoreError::nothing_selected(self.label)),
        }
    }

    /// Drop a group and everything filed under it.
    pub fn remove_group(&mut self, key: &K) -> Option<Vec<T>> {
        let removed = self.rules.shift_remove(key);
        if let Some(rules) = &removed {
            debug!("removed {} group with {} rules", self.label, rules.len());
        }
        removed
    }

    /// Move rules when a group is renamed/renumbered through its edit
    /// dialog.
    pub fn rename_group(&mut self, old: &K, new: K) {
        if old == &new {
            return;
        }
        if let Some(rules) = self.rules.shift_remove(old) {
            self.rules.insert(new, rules);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn remove_keeps_relative_order() {
        let mut catalog = Catalog::with_entries("VLAN", vec!["a", "b", "c", "d"]);
        let removed = catalog.remove(1).unwrap();
        assert_eq!(removed, "b");
        assert_eq!(catalog.iter().copied().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn remove_out_of_range_is_no_selection() {
        let mut catalog: Catalog<&str> = Catalog::new("route");
        assert_eq!(
            catalog.remove(0).unwrap_err(),
            CoreError::nothing_selected("route")
        );
    }

    #[test]
    fn update_overwrites_in_place() {
        let mut catalog = Catalog::with_entries("user", vec![1, 2, 3]);
        catalog.update(2, 30).unwrap();
        assert_eq!(catalog.get(2), Some(&30));
        assert_eq!(catalog.len(), 3);
    }

    #[test]
    fn selected_maps_none_to_error() {
        let catalog = Catalog::with_entries("ACL", vec!["only"]);
        assert_eq!(catalog.selected(Some(0)).unwrap(), &"only");
        assert!(catalog.selected(None).is_err());
        assert!(catalog.selected(Some(5)).is_err());
    }

    #[test]
    fn rule_book_keys_rules_by_group() {
        let mut book: RuleBook<u16, &str> = RuleBook::new("rule");
        book.add_rule(3000, "r1");
        book.add_rule(3000, "r2");
        book.add_rule(2000, "other");

        assert_eq!(book.rules(&3000), &["r1", "r2"]);
        assert_eq!(book.rules(&2000), &["other"]);
        assert!(book.rules(&2999).is_empty());
    }

    #[test]
    fn rule_book_survives_selection_changes() {
        // Rules stay attached to their group no matter which group the
        // UI looks at in between.
        let mut book: RuleBook<String, u32> = RuleBook::new("classifier");
        book.add_rule("limit_web".into(), 10);
        let _ = book.rules(&"voice_priority".to_string());
        assert_eq!(book.rules(&"limit_web".to_string()), &[10]);
    }

    #[test]
    fn remove_group_cascades() {
        let mut book: RuleBook<u16, &str> = RuleBook::new("rule");
        book.add_rule(3000, "r1");
        assert_eq!(book.remove_group(&3000), Some(vec!["r1"]));
        assert!(book.rules(&3000).is_empty());
    }

    #[test]
    fn rename_group_moves_rules() {
        let mut book: RuleBook<u16, &str> = RuleBook::new("rule");
        book.add_rule(3000, "r1");
        book.rename_group(&3000, 3001);
        assert!(book.rules(&3000).is_empty());
        assert_eq!(book.rules(&3001), &["r1"]);
    }
}
