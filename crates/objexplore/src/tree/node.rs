//! Core node types for the object tree

use crate::classify::{classify, MemberEntry, Overflow};
use crate::object::{Explorable, ObjectRef};
use crate::options::ExplorerOptions;
use std::collections::HashMap;
use std::fmt;

/// Unique identifier for a node within an object tree
///
/// Internally represented as an index into an arena-based storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root node always has ID 0
    pub const ROOT: NodeId = NodeId(0);

    /// Create a new NodeId from a usize
    pub const fn new(id: usize) -> Self {
        NodeId(id)
    }

    /// Get the inner usize value
    pub const fn get(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<usize> for NodeId {
    fn from(id: usize) -> Self {
        NodeId(id)
    }
}

impl From<NodeId> for usize {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// How a node holds its object
///
/// The root is borrowed from the caller; every other node holds the shared
/// handle its parent's member resolved to.
#[derive(Debug, Clone)]
pub(crate) enum Handle<'a> {
    Borrowed(&'a dyn Explorable),
    Shared(ObjectRef),
}

impl Handle<'_> {
    pub(crate) fn get(&self) -> &dyn Explorable {
        match self {
            Handle::Borrowed(obj) => *obj,
            Handle::Shared(obj) => obj.as_ref(),
        }
    }
}

/// One explored object plus its classified members
///
/// The member list is computed once when the node is created and never
/// changes size afterwards; filters only ever act as views over it.
#[derive(Debug)]
pub struct ObjectNode<'a> {
    handle: Handle<'a>,
    label: String,
    parent: Option<NodeId>,
    members: Vec<MemberEntry>,
    overflow: Option<Overflow>,
    /// Cache of member name -> child node, never evicted
    children: HashMap<String, NodeId>,
}

impl<'a> ObjectNode<'a> {
    pub(crate) fn new(
        handle: Handle<'a>,
        label: impl Into<String>,
        parent: Option<NodeId>,
        options: &ExplorerOptions,
    ) -> Self {
        let classification = classify(handle.get(), options);
        Self {
            handle,
            label: label.into(),
            parent,
            members: classification.members,
            overflow: classification.overflow,
            children: HashMap::new(),
        }
    }

    /// The wrapped object
    pub fn object(&self) -> &dyn Explorable {
        self.handle.get()
    }

    /// The name this node was reached through (root label for the root)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Parent node, `None` for the root
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Classified members in navigation order
    pub fn members(&self) -> &[MemberEntry] {
        &self.members
    }

    /// Index of the member with the given name
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| m.name == name)
    }

    /// Member with the given name
    pub fn member(&self, name: &str) -> Option<&MemberEntry> {
        self.member_index(name).map(|i| &self.members[i])
    }

    /// Set when classification hit the member cap
    pub fn overflow(&self) -> Option<Overflow> {
        self.overflow
    }

    /// Cached child reached through `name`, if it was visited before
    pub fn child(&self, name: &str) -> Option<NodeId> {
        self.children.get(name).copied()
    }

    /// Number of cached children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn cache_child(&mut self, name: &str, id: NodeId) {
        self.children.insert(name.to_string(), id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Value;

    #[test]
    fn test_node_id() {
        assert_eq!(NodeId::ROOT, NodeId(0));
        assert_eq!(NodeId::new(5).get(), 5);
        assert_eq!(NodeId::from(10), NodeId(10));
        assert_eq!(usize::from(NodeId(7)), 7);
        assert_eq!(NodeId(3).to_string(), "NodeId(3)");
    }

    #[test]
    fn test_node_classifies_on_creation() {
        let obj = Value::instance("Point").attr("x", 1i64).attr("y", 2i64).build();
        let node = ObjectNode::new(
            Handle::Borrowed(&obj),
            "p",
            None,
            &ExplorerOptions::default(),
        );

        assert_eq!(node.label(), "p");
        assert_eq!(node.parent(), None);
        assert_eq!(node.members().len(), 2);
        assert_eq!(node.member_index("y"), Some(1));
        assert!(node.member("z").is_none());
        assert_eq!(node.object().type_name(), "Point");
        assert_eq!(node.child_count(), 0);
    }

    #[test]
    fn test_shared_handle() {
        let shared = Value::list([Value::Int(1)]).into_ref();
        let node = ObjectNode::new(
            Handle::Shared(shared),
            "[0]",
            Some(NodeId::ROOT),
            &ExplorerOptions::default(),
        );
        assert_eq!(node.parent(), Some(NodeId::ROOT));
        assert_eq!(node.members()[0].name, "[0]");
    }
}
