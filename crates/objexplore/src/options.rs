//! Configuration options for an exploration session.
//!
//! This module provides the `ExplorerOptions` struct which controls
//! classification limits, kind precedence, selection behavior and the
//! default member filter.

use crate::filter::{FilterState, Visibility};
use serde::{Deserialize, Deserializer, Serialize};

/// Smallest accepted member cap
const MIN_MAX_MEMBERS: usize = 1;

/// Smallest accepted representation width, room for one character and `…`
const MIN_REPR_WIDTH: usize = 4;

/// Configuration options for an explorer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerOptions {
    /// Maximum number of members classified per object. Members beyond the
    /// cap are dropped in ascending name order and reported as an overflow.
    #[serde(deserialize_with = "deserialize_max_members")]
    pub max_members: usize,

    /// Whether callables or descriptors win when a member is both.
    pub precedence: Precedence,

    /// Maximum length of a member's cached representation.
    #[serde(deserialize_with = "deserialize_repr_width")]
    pub repr_width: usize,

    /// Whether moving past either end of the member list wraps around.
    pub wrap_selection: bool,

    /// Whether dunder members can be descended into.
    pub descend_into_dunders: bool,

    /// Visibility applied to the root frame and after clearing filters.
    pub default_visibility: Visibility,
}

impl Default for ExplorerOptions {
    fn default() -> Self {
        Self {
            max_members: 5_000,
            precedence: Precedence::default(),
            repr_width: 120,
            wrap_selection: false,
            descend_into_dunders: false,
            default_visibility: Visibility::PublicOnly,
        }
    }
}

impl ExplorerOptions {
    /// Create new explorer options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the per-object member cap.
    pub fn max_members(mut self, max: usize) -> Self {
        self.max_members = max.max(MIN_MAX_MEMBERS);
        self
    }

    /// Set the kind precedence between callables and descriptors.
    pub fn precedence(mut self, precedence: Precedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Set the cached representation width.
    pub fn repr_width(mut self, width: usize) -> Self {
        self.repr_width = width.max(MIN_REPR_WIDTH);
        self
    }

    /// Enable or disable wrap-around selection.
    pub fn wrap_selection(mut self, wrap: bool) -> Self {
        self.wrap_selection = wrap;
        self
    }

    /// Allow or forbid descending into dunder members.
    pub fn descend_into_dunders(mut self, allow: bool) -> Self {
        self.descend_into_dunders = allow;
        self
    }

    /// Set the default visibility.
    pub fn default_visibility(mut self, visibility: Visibility) -> Self {
        self.default_visibility = visibility;
        self
    }

    /// Raise limits set below their minimum through the public fields.
    pub fn normalized(self) -> Self {
        let (max, width) = (self.max_members, self.repr_width);
        self.max_members(max).repr_width(width)
    }

    /// The filter a fresh root frame starts with.
    pub fn default_filter(&self) -> FilterState {
        FilterState::new().visibility(self.default_visibility)
    }
}

fn deserialize_max_members<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Ok(usize::deserialize(d)?.max(MIN_MAX_MEMBERS))
}

fn deserialize_repr_width<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
    Ok(usize::deserialize(d)?.max(MIN_REPR_WIDTH))
}

/// Which classification wins for a member that is both callable and
/// exposed through a descriptor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Precedence {
    /// Callables classify as methods before descriptors as properties.
    #[default]
    CallableFirst,

    /// Descriptors classify as properties before callables as methods.
    DescriptorFirst,
}
