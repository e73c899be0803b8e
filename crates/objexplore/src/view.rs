//! Read-only projection of the explorer state
//!
//! A [`ViewState`] is everything a renderer needs to draw one frame. It is
//! rebuilt from the tree after every event and holds no state of its own.

use crate::classify::{MemberEntry, MemberKind, Overflow};
use crate::error::Status;
use crate::filter::FilterState;
use crate::search::SearchState;
use crate::tree::ObjectTree;

/// One row of the member list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisibleMember {
    pub name: String,
    pub kind: MemberKind,
    pub type_family: String,
    pub is_public: bool,
    pub accessible: bool,
    /// Truncated representation
    pub repr: String,
    /// Byte range of the search match within `name`
    pub highlight: Option<(usize, usize)>,
}

impl VisibleMember {
    fn from_entry(entry: &MemberEntry, highlight: Option<(usize, usize)>) -> Self {
        Self {
            name: entry.name.clone(),
            kind: entry.kind,
            type_family: entry.type_family.clone(),
            is_public: entry.is_public,
            accessible: entry.is_accessible(),
            repr: entry.cached_repr().to_string(),
            highlight,
        }
    }
}

/// Details of the selected member
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub name: String,
    pub kind: MemberKind,
    pub type_family: String,
    pub repr: String,
    pub docstring: Option<String>,
    /// Call signature, for callables
    pub signature: Option<String>,
    /// Item count, for sized containers
    pub length: Option<usize>,
    /// Whether descending is expected to succeed
    pub descendable: bool,
    /// Error raised while reading the member
    pub error: Option<String>,
}

/// Full-screen text of one member: its complete value and documentation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    /// Name of the member shown
    pub title: String,
    pub lines: Vec<String>,
    /// First line shown
    pub scroll: usize,
}

impl Pager {
    /// Build the pager for `entry`; `None` when its value could not be read
    pub fn for_entry(entry: &MemberEntry) -> Option<Self> {
        let value = entry.value()?;
        let mut lines = Vec::new();
        if let Some(signature) = entry.signature() {
            lines.push(signature);
            lines.push(String::new());
        }
        lines.extend(value.full_repr().lines().map(str::to_string));
        if let Some(doc) = entry.docstring() {
            lines.push(String::new());
            lines.extend(doc.lines().map(str::to_string));
        }
        Some(Self {
            title: entry.name.clone(),
            lines,
            scroll: 0,
        })
    }

    /// Scroll by `delta` lines, keeping the last line reachable
    pub fn scroll_by(&mut self, delta: isize) {
        let last = self.lines.len().saturating_sub(1);
        self.scroll = self.scroll.saturating_add_signed(delta).min(last);
    }
}

/// Everything needed to draw the explorer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    /// Labels from the root to the current object
    pub breadcrumb: Vec<String>,
    /// Access path of the current object, e.g. `app.config.servers[0]`
    pub dotpath: String,
    /// Type of the current object
    pub type_name: String,
    /// Visible members in navigation order
    pub members: Vec<VisibleMember>,
    /// Position of the selection within `members`, `None` when empty
    pub selected: Option<usize>,
    /// First row shown in the list viewport
    pub scroll_offset: usize,
    /// Positions within `members` matching the search query
    pub highlighted_matches: Vec<usize>,
    pub preview: Option<Preview>,
    pub filter: FilterState,
    pub search_query: String,
    /// Set when the current object's members were truncated
    pub overflow: Option<Overflow>,
    pub status: Option<Status>,
    /// Open full-screen view of the selected member
    pub pager: Option<Pager>,
}

impl ViewState {
    /// The selected row
    pub fn selected_member(&self) -> Option<&VisibleMember> {
        self.selected.and_then(|i| self.members.get(i))
    }

    /// Depth of the current object (root = 0)
    pub fn depth(&self) -> usize {
        self.breadcrumb.len().saturating_sub(1)
    }
}

/// Project the tree's current frame into a [`ViewState`]
///
/// `visible` are the current node's visible member indices and `notice` is
/// the status left by the last transition. An empty visible list reports
/// [`Status::EmptyVisibleSet`] when there is no other notice.
pub fn compute_view(
    tree: &ObjectTree<'_>,
    visible: &[usize],
    search: &SearchState,
    notice: Option<&Status>,
    pager: Option<&Pager>,
) -> ViewState {
    let frame = tree.current();
    let node = tree.current_node();
    let entries: Vec<&MemberEntry> = visible.iter().map(|&i| &node.members()[i]).collect();

    let members = entries
        .iter()
        .enumerate()
        .map(|(pos, entry)| {
            let highlight = search.match_at(pos).map(|m| (m.start, m.end));
            VisibleMember::from_entry(entry, highlight)
        })
        .collect();

    let selected = (!entries.is_empty()).then(|| frame.selected.min(entries.len() - 1));
    let preview = selected.map(|i| {
        let entry = entries[i];
        let descendable = entry.descend_block(tree.options().descend_into_dunders).is_none()
            && node
                .child(&entry.name)
                .and_then(|id| tree.node(id))
                .map_or(true, |child| !child.members().is_empty());
        Preview {
            name: entry.name.clone(),
            kind: entry.kind,
            type_family: entry.type_family.clone(),
            repr: entry.cached_repr().to_string(),
            docstring: entry.docstring(),
            signature: entry.signature(),
            length: entry.length(),
            descendable,
            error: entry.error().map(str::to_string),
        }
    });

    let status = notice
        .cloned()
        .or_else(|| entries.is_empty().then_some(Status::EmptyVisibleSet));

    ViewState {
        breadcrumb: tree.breadcrumb().into_iter().map(str::to_string).collect(),
        dotpath: tree.dotpath(),
        type_name: node.object().type_name().into_owned(),
        members,
        selected,
        scroll_offset: frame.scroll_offset,
        highlighted_matches: search.match_indices().collect(),
        preview,
        filter: frame.filter.clone(),
        search_query: search.query().to_string(),
        overflow: node.overflow(),
        status,
        pager: pager.cloned(),
    }
}
