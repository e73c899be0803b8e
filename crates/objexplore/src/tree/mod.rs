//! Arena-backed tree of explored objects
//!
//! Every object the user descends into becomes an [`ObjectNode`] stored in
//! the [`ObjectTree`] arena and addressed by [`NodeId`]. Revisiting a member
//! reuses the node, so classification happens at most once per object.

mod navigation;
mod node;

pub use navigation::{Descent, Frame, ObjectTree};
pub use node::{NodeId, ObjectNode};
