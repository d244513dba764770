//! Display-only hiding of category groups.
//!
//! Hidden groups are removed from the visible totals; the aggregation and
//! the underlying records are never touched.

use std::collections::HashSet;

use crate::{Aggregation, GroupKey, GroupTotal};

/// Set of hidden group keys.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HiddenGroups(HashSet<GroupKey>);

impl HiddenGroups {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hides `key` if visible, shows it if hidden. Returns `true` when the
    /// key is hidden after the call.
    pub fn toggle(&mut self, key: &GroupKey) -> bool {
        if self.0.remove(key) {
            false
        } else {
            self.0.insert(key.clone());
            true
        }
    }

    #[must_use]
    pub fn is_hidden(&self, key: &GroupKey) -> bool {
        self.0.contains(key)
    }

    /// Shows every group again.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<GroupKey> for HiddenGroups {
    fn from_iter<T: IntoIterator<Item = GroupKey>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Groups left visible and their total.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSummary<'a> {
    pub groups: Vec<&'a GroupTotal>,
    pub total: f64,
}

impl<'a> VisibleSummary<'a> {
    /// Income left once only the visible groups are counted.
    #[must_use]
    pub fn remaining(&self, normalized_income: f64) -> f64 {
        normalized_income - self.total
    }

    /// Groups worth drawing as chart slices (strictly positive totals).
    pub fn slices(&self) -> impl Iterator<Item = &'a GroupTotal> + '_ {
        self.groups
            .iter()
            .copied()
            .filter(|group| group.normalized > 0.0)
    }
}

/// Drops hidden groups from `aggregation` and sums what is left.
#[must_use]
pub fn apply_visibility<'a>(
    aggregation: &'a Aggregation,
    hidden: &HiddenGroups,
) -> VisibleSummary<'a> {
    let groups: Vec<&GroupTotal> = aggregation
        .groups
        .iter()
        .filter(|group| !hidden.is_hidden(&group.key))
        .collect();
    let total = groups.iter().map(|group| group.normalized).sum();
    VisibleSummary { groups, total }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Currency;

    fn group(category: &str, currency: Currency, normalized: f64) -> GroupTotal {
        GroupTotal {
            key: GroupKey::new(category, currency),
            normalized,
            original: normalized,
            count: 1,
        }
    }

    #[test]
    fn toggle_is_an_involution() {
        let key = GroupKey::new("Affitto", Currency::Mxn);
        let mut hidden = HiddenGroups::new();
        assert!(hidden.toggle(&key));
        assert!(hidden.is_hidden(&key));
        assert!(!hidden.toggle(&key));
        assert_eq!(hidden, HiddenGroups::new());
    }

    #[test]
    fn hidden_groups_leave_totals() {
        let aggregation = Aggregation {
            groups: vec![
                group("Alimentazione", Currency::Eur, 150.0),
                group("Affitto", Currency::Mxn, 50.0),
            ],
            grand_total: 200.0,
        };
        let hidden: HiddenGroups = [GroupKey::new("Affitto", Currency::Mxn)].into_iter().collect();
        let visible = apply_visibility(&aggregation, &hidden);
        assert_eq!(visible.total, 150.0);
        assert_eq!(visible.groups.len(), 1);
        assert_eq!(visible.remaining(100.0), -50.0);
        assert_eq!(aggregation.grand_total, 200.0);
    }

    #[test]
    fn slices_skip_empty_groups() {
        let aggregation = Aggregation {
            groups: vec![
                group("Altro", Currency::Eur, 0.0),
                group("Salute", Currency::Eur, 12.0),
            ],
            grand_total: 12.0,
        };
        let visible = apply_visibility(&aggregation, &HiddenGroups::new());
        let slices: Vec<_> = visible.slices().map(|g| g.key.to_string()).collect();
        assert_eq!(slices, ["Salute_EUR"]);
    }
}
