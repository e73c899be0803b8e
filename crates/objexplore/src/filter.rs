//! Member filtering
//!
//! [`visible`] is a pure function of a member list and a [`FilterState`]:
//! it never touches the classification it filters, so toggling a filter on
//! and off always restores the exact previous ordering.

use crate::classify::{MemberEntry, MemberKind};
use serde::{Deserialize, Serialize};

/// A set of member kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<MemberKind>", into = "Vec<MemberKind>")]
pub struct KindSet(u8);

impl KindSet {
    /// Every kind; no restriction
    pub const ALL: KindSet = KindSet(0b11_1111);

    /// No kinds
    pub const EMPTY: KindSet = KindSet(0);

    /// A set holding a single kind
    pub const fn only(kind: MemberKind) -> Self {
        KindSet(kind.bit())
    }

    /// Returns true if `kind` is in the set
    pub const fn contains(self, kind: MemberKind) -> bool {
        self.0 & kind.bit() != 0
    }

    /// Returns true if every kind is in the set
    pub const fn is_all(self) -> bool {
        self.0 == Self::ALL.0
    }

    /// Returns true if no kind is in the set
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Add a kind
    pub fn insert(&mut self, kind: MemberKind) {
        self.0 |= kind.bit();
    }

    /// Remove a kind
    pub fn remove(&mut self, kind: MemberKind) {
        self.0 &= !kind.bit();
    }

    /// Intersection of two sets
    pub const fn intersection(self, other: KindSet) -> KindSet {
        KindSet(self.0 & other.0)
    }

    /// Kinds in the set, in navigation order
    pub fn iter(self) -> impl Iterator<Item = MemberKind> {
        MemberKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl Default for KindSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromIterator<MemberKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = MemberKind>>(iter: I) -> Self {
        let mut set = KindSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

impl From<Vec<MemberKind>> for KindSet {
    fn from(kinds: Vec<MemberKind>) -> Self {
        kinds.into_iter().collect()
    }
}

impl From<KindSet> for Vec<MemberKind> {
    fn from(set: KindSet) -> Self {
        set.iter().collect()
    }
}

/// Whether private members are shown
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Hide members whose name starts with an underscore, dunders included
    #[default]
    PublicOnly,
    /// Show every member
    All,
}

impl Visibility {
    /// The other visibility
    pub fn toggled(self) -> Self {
        match self {
            Visibility::PublicOnly => Visibility::All,
            Visibility::All => Visibility::PublicOnly,
        }
    }
}

/// Predicates deciding which members are visible
///
/// All three predicates must hold for a member to be visible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    /// Kinds to include
    pub kinds: KindSet,
    /// Public-only or everything
    pub visibility: Visibility,
    /// Case-insensitive substring the name must contain
    pub name_pattern: Option<String>,
}

impl FilterState {
    /// An unrestricted public-only filter
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the kinds to include
    pub fn kinds(mut self, kinds: KindSet) -> Self {
        self.kinds = kinds;
        self
    }

    /// Set the visibility
    pub fn visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    /// Set the name pattern; an empty pattern clears it
    pub fn name_pattern(mut self, pattern: Option<String>) -> Self {
        self.name_pattern = pattern.filter(|p| !p.is_empty());
        self
    }

    /// Flip between public-only and all members
    pub fn toggle_public_only(&mut self) {
        self.visibility = self.visibility.toggled();
    }

    /// Toggle `kind` in the kind restriction
    ///
    /// An unrestricted filter narrows to just `kind`. Otherwise `kind` is
    /// added or removed, and removing the last kind lifts the restriction.
    pub fn filter_by_kind(&mut self, kind: MemberKind) {
        if self.kinds.is_all() {
            self.kinds = KindSet::only(kind);
        } else if self.kinds.contains(kind) {
            self.kinds.remove(kind);
            if self.kinds.is_empty() {
                self.kinds = KindSet::ALL;
            }
        } else {
            self.kinds.insert(kind);
        }
    }

    /// Returns true if `member` passes every predicate
    pub fn matches(&self, member: &MemberEntry) -> bool {
        let pattern = self.name_pattern.as_deref().map(str::to_lowercase);
        self.matches_with(member, pattern.as_deref())
    }

    fn matches_with(&self, member: &MemberEntry, lowered_pattern: Option<&str>) -> bool {
        if !self.kinds.contains(member.kind) {
            return false;
        }
        if self.visibility == Visibility::PublicOnly && !member.is_public {
            return false;
        }
        match lowered_pattern {
            Some(pattern) => member.name.to_lowercase().contains(pattern),
            None => true,
        }
    }
}

/// Indices of the members passing `filter`, in member order
pub fn visible(members: &[MemberEntry], filter: &FilterState) -> Vec<usize> {
    let pattern = filter.name_pattern.as_deref().map(str::to_lowercase);
    members
        .iter()
        .enumerate()
        .filter(|(_, m)| filter.matches_with(m, pattern.as_deref()))
        .map(|(i, _)| i)
        .collect()
}

/// The members passing `filter`, in member order
pub fn visible_members<'m>(members: &'m [MemberEntry], filter: &FilterState) -> Vec<&'m MemberEntry> {
    visible(members, filter)
        .into_iter()
        .map(|i| &members[i])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::object::Value;
    use crate::options::ExplorerOptions;
    use pretty_assertions::assert_eq;

    fn members() -> Vec<MemberEntry> {
        let obj = Value::instance("Sample")
            .attr("a", 1i64)
            .attr("b", 2i64)
            .attr("_c", 3i64)
            .attr("Alpha", Value::class("Alpha"))
            .attr("compute", Value::function("compute", "()"))
            .build();
        classify(&obj, &ExplorerOptions::default()).members
    }

    fn names(members: &[MemberEntry], filter: &FilterState) -> Vec<String> {
        visible_members(members, filter)
            .into_iter()
            .map(|m| m.name.clone())
            .collect()
    }

    #[test]
    fn test_public_only_hides_private() {
        let members = members();
        let filter = FilterState::new().kinds(KindSet::only(MemberKind::Data));
        assert_eq!(names(&members, &filter), vec!["a", "b"]);
    }

    #[test]
    fn test_all_visibility() {
        let members = members();
        let filter = FilterState::new().visibility(Visibility::All);
        assert_eq!(
            names(&members, &filter),
            vec!["_c", "a", "b", "compute", "Alpha"]
        );
    }

    #[test]
    fn test_name_pattern_is_case_insensitive() {
        let members = members();
        let filter = FilterState::new().name_pattern(Some("AL".into()));
        assert_eq!(names(&members, &filter), vec!["Alpha"]);
    }

    #[test]
    fn test_empty_pattern_is_cleared() {
        let filter = FilterState::new().name_pattern(Some(String::new()));
        assert_eq!(filter.name_pattern, None);
    }

    #[test]
    fn test_empty_result_is_valid() {
        let members = members();
        let filter = FilterState::new().name_pattern(Some("zzz".into()));
        assert!(visible(&members, &filter).is_empty());
    }

    #[test]
    fn test_toggle_public_only_restores_order() {
        let members = members();
        let mut filter = FilterState::new();
        let before = names(&members, &filter);
        filter.toggle_public_only();
        assert_ne!(names(&members, &filter), before);
        filter.toggle_public_only();
        assert_eq!(names(&members, &filter), before);
    }

    #[test]
    fn test_filter_by_kind_toggling() {
        let mut filter = FilterState::new();
        filter.filter_by_kind(MemberKind::Method);
        assert_eq!(filter.kinds, KindSet::only(MemberKind::Method));

        filter.filter_by_kind(MemberKind::Class);
        assert!(filter.kinds.contains(MemberKind::Class));
        assert!(filter.kinds.contains(MemberKind::Method));
        assert!(!filter.kinds.contains(MemberKind::Data));

        filter.filter_by_kind(MemberKind::Class);
        filter.filter_by_kind(MemberKind::Method);
        assert!(filter.kinds.is_all());
    }

    #[test]
    fn test_kind_set_serializes_as_list() {
        let set: KindSet = [MemberKind::Method, MemberKind::Data].into_iter().collect();
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["data","method"]"#);
        let back: KindSet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, set);
    }
}
