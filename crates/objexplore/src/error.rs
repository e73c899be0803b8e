//! Errors and status notices raised while navigating

use crate::classify::Overflow;
use derive_more::Display;

/// Why a member cannot be descended into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum NotDescendableReason {
    #[display(fmt = "methods are previewed, not explored")]
    Method,
    #[display(fmt = "dunder members are not explorable")]
    Dunder,
    #[display(fmt = "its value is inaccessible")]
    Inaccessible,
    #[display(fmt = "it is a scalar")]
    Scalar,
    #[display(fmt = "it has no members")]
    NoMembers,
}

/// Errors reported by navigation operations
///
/// None of these end a session; the explorer turns them into a [`Status`].
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum ExploreError {
    /// The name is not among the current frame's visible members
    #[display(fmt = "no visible member named `{}`", _0)]
    UnknownMember(String),
    /// The member exists but cannot be explored
    #[display(fmt = "`{}` cannot be explored: {}", name, reason)]
    NotDescendable {
        name: String,
        reason: NotDescendableReason,
    },
    /// Reading the member failed, so there is no value to act on
    #[display(fmt = "`{}` is inaccessible: {}", name, message)]
    InaccessibleMember { name: String, message: String },
}

impl std::error::Error for ExploreError {}

/// A recoverable condition surfaced to the user through the view
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Status {
    #[display(fmt = "{}", _0)]
    Error(ExploreError),
    /// Nothing passes the current filter
    #[display(fmt = "no members match the current filter")]
    EmptyVisibleSet,
    /// The current object's member list was truncated
    #[display(fmt = "showing the first {} of {} members", kept, total)]
    Overflow { total: usize, kept: usize },
    /// The selected member could not be read
    #[display(fmt = "`{}` is inaccessible: {}", name, message)]
    Inaccessible { name: String, message: String },
    /// The search query matches nothing
    #[display(fmt = "no matches for `{}`", _0)]
    NoMatches(String),
    /// There is no selected member to act on
    #[display(fmt = "nothing selected")]
    NothingSelected,
}

impl From<Overflow> for Status {
    fn from(overflow: Overflow) -> Self {
        Status::Overflow {
            total: overflow.total,
            kept: overflow.kept,
        }
    }
}

impl From<ExploreError> for Status {
    fn from(err: ExploreError) -> Self {
        match err {
            ExploreError::InaccessibleMember { name, message } => {
                Status::Inaccessible { name, message }
            }
            err => Status::Error(err),
        }
    }
}
