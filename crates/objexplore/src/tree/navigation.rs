//! Navigation over an arena of object nodes
//!
//! `ObjectTree` owns every node it ever classified, indexed by [`NodeId`],
//! plus the path of frames from the root to the current focus. Nodes refer
//! to each other by id only, so parents and their cached children never
//! form ownership cycles.

use crate::error::{ExploreError, NotDescendableReason};
use crate::filter::FilterState;
use crate::object::{Explorable, ObjectRef};
use crate::options::ExplorerOptions;
use crate::tree::node::{Handle, NodeId, ObjectNode};
use log::debug;
use smallvec::{smallvec, SmallVec};

/// One step on the navigation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The node shown by this frame
    pub node: NodeId,
    /// Selected position within the frame's visible members
    pub selected: usize,
    /// First visible row of the member list
    pub scroll_offset: usize,
    /// Filter applied to this frame's members
    pub filter: FilterState,
}

impl Frame {
    fn new(node: NodeId, filter: FilterState) -> Self {
        Self {
            node,
            selected: 0,
            scroll_offset: 0,
            filter,
        }
    }
}

/// Outcome of a successful descent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Descent {
    /// The node now in focus
    pub node: NodeId,
    /// True when the node was classified by this descent rather than reused
    /// from the cache
    pub newly_loaded: bool,
}

/// The navigation state machine
///
/// The path always holds at least the root frame.
#[derive(Debug)]
pub struct ObjectTree<'a> {
    /// Arena storage for nodes
    nodes: Vec<ObjectNode<'a>>,
    /// Frames from the root to the current focus
    path: SmallVec<[Frame; 8]>,
    options: ExplorerOptions,
}

impl<'a> ObjectTree<'a> {
    /// Create a tree rooted at `root`, classifying it immediately
    pub fn new(root: &'a dyn Explorable, label: impl Into<String>, options: ExplorerOptions) -> Self {
        let options = options.normalized();
        let root_node = ObjectNode::new(Handle::Borrowed(root), label, None, &options);
        let path = smallvec![Frame::new(NodeId::ROOT, options.default_filter())];
        Self {
            nodes: vec![root_node],
            path,
            options,
        }
    }

    /// Options the tree was created with
    pub fn options(&self) -> &ExplorerOptions {
        &self.options
    }

    /// The root node ID (always exists)
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its ID
    pub fn node(&self, id: NodeId) -> Option<&ObjectNode<'a>> {
        self.nodes.get(id.get())
    }

    /// Count every node classified so far
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Frames from the root to the current focus
    pub fn path(&self) -> &[Frame] {
        &self.path
    }

    /// Depth of the current focus (root = 0)
    pub fn depth(&self) -> usize {
        self.path.len() - 1
    }

    /// The frame in focus
    pub fn current(&self) -> &Frame {
        // The root frame is never popped
        &self.path[self.path.len() - 1]
    }

    fn current_mut(&mut self) -> &mut Frame {
        let last = self.path.len() - 1;
        &mut self.path[last]
    }

    /// The node in focus
    pub fn current_node(&self) -> &ObjectNode<'a> {
        &self.nodes[self.current().node.get()]
    }

    /// Replace the filter of the frame in focus
    pub fn set_filter(&mut self, filter: FilterState) {
        self.current_mut().filter = filter;
    }

    /// Descend into the visible member called `name`
    ///
    /// `visible` holds the indices of the current node's visible members, as
    /// computed by [`visible`](crate::filter::visible). The child node is
    /// taken from the cache or classified on first visit; it starts with a
    /// copy of the current frame's filter.
    pub fn descend(&mut self, name: &str, visible: &[usize]) -> Result<Descent, ExploreError> {
        let not_descendable = |reason| ExploreError::NotDescendable {
            name: name.to_string(),
            reason,
        };

        let parent_id = self.current().node;
        let parent = &self.nodes[parent_id.get()];
        let (position, entry) = visible
            .iter()
            .enumerate()
            .filter_map(|(pos, &i)| parent.members().get(i).map(|m| (pos, m)))
            .find(|(_, m)| m.name == name)
            .ok_or_else(|| ExploreError::UnknownMember(name.to_string()))?;

        if let Some(reason) = entry.descend_block(self.options.descend_into_dunders) {
            return Err(not_descendable(reason));
        }

        let (child, newly_loaded) = match parent.child(name) {
            Some(id) => (id, false),
            None => {
                let value = entry
                    .value()
                    .cloned()
                    .ok_or_else(|| not_descendable(NotDescendableReason::Inaccessible))?;
                (self.load_child(parent_id, name, value), true)
            }
        };

        if self.nodes[child.get()].members().is_empty() {
            return Err(not_descendable(NotDescendableReason::NoMembers));
        }

        let filter = self.current().filter.clone();
        self.current_mut().selected = position;
        self.path.push(Frame::new(child, filter));
        debug!("descended into `{}` ({}), depth {}", name, child, self.depth());

        Ok(Descent {
            node: child,
            newly_loaded,
        })
    }

    fn load_child(&mut self, parent: NodeId, name: &str, value: ObjectRef) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        let node = ObjectNode::new(Handle::Shared(value), name, Some(parent), &self.options);
        debug!(
            "classified `{}` as {} under {} ({} members)",
            name,
            id,
            parent,
            node.members().len()
        );
        self.nodes.push(node);
        self.nodes[parent.get()].cache_child(name, id);
        id
    }

    /// Pop the current frame; a no-op at the root
    pub fn ascend(&mut self) -> bool {
        if self.path.len() == 1 {
            return false;
        }
        self.path.pop();
        debug!("ascended to depth {}", self.depth());
        true
    }

    /// Pop frames until the frame at `depth` is in focus
    pub fn ascend_to(&mut self, depth: usize) -> bool {
        if depth >= self.depth() {
            return false;
        }
        self.path.truncate(depth + 1);
        debug!("ascended to depth {}", depth);
        true
    }

    /// Move the selection by `delta` within a visible list of `len` members
    ///
    /// The selection is clamped to the list. With `wrap_selection`, moving
    /// past an end from that end jumps to the other end.
    pub fn move_selection(&mut self, delta: isize, len: usize) -> bool {
        if len == 0 {
            return false;
        }
        let wrap = self.options.wrap_selection;
        let last = len - 1;
        let current = self.current().selected.min(last);
        let target = current as isize + delta;

        let next = if wrap && target > last as isize && current == last {
            0
        } else if wrap && target < 0 && current == 0 {
            last
        } else {
            target.clamp(0, last as isize) as usize
        };
        self.select(next, len)
    }

    /// Select position `index`, clamped to a visible list of `len` members
    pub fn select(&mut self, index: usize, len: usize) -> bool {
        let frame = self.current_mut();
        let next = index.min(len.saturating_sub(1));
        let changed = frame.selected != next;
        frame.selected = next;
        changed
    }

    /// Select the first member
    pub fn move_to_top(&mut self, len: usize) -> bool {
        self.select(0, len)
    }

    /// Select the last member
    pub fn move_to_bottom(&mut self, len: usize) -> bool {
        self.select(len.saturating_sub(1), len)
    }

    /// Adjust the scroll offset so the selection lies within `height` rows
    pub fn scroll_into_view(&mut self, height: usize, len: usize) {
        let height = height.max(1);
        let frame = self.current_mut();
        if frame.selected < frame.scroll_offset {
            frame.scroll_offset = frame.selected;
        } else if frame.selected >= frame.scroll_offset + height {
            frame.scroll_offset = frame.selected + 1 - height;
        }
        frame.scroll_offset = frame.scroll_offset.min(len.saturating_sub(height));
    }

    /// Replace the explored object, discarding every cached node
    pub fn refresh_root(&mut self, root: &'a dyn Explorable, label: impl Into<String>) {
        self.nodes.clear();
        self.nodes.push(ObjectNode::new(
            Handle::Borrowed(root),
            label,
            None,
            &self.options,
        ));
        self.path = smallvec![Frame::new(NodeId::ROOT, self.options.default_filter())];
        debug!("root replaced, cache cleared");
    }

    /// Node labels from the root to the current focus
    pub fn breadcrumb(&self) -> Vec<&str> {
        self.path
            .iter()
            .map(|frame| self.nodes[frame.node.get()].label())
            .collect()
    }

    /// The current focus as an access path, e.g. `config.servers[0].host`
    pub fn dotpath(&self) -> String {
        let mut out = String::new();
        for (i, label) in self.breadcrumb().into_iter().enumerate() {
            if i > 0 && !label.starts_with('[') {
                out.push('.');
            }
            out.push_str(label);
        }
        out
    }
}
