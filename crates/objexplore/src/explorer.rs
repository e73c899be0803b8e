//! The explorer state machine
//!
//! [`Explorer`] ties the navigation tree, the per-frame filter and the
//! search state together. Every operation leaves the explorer consistent:
//! the visible list matches the current frame's filter, the selection lies
//! within it and the search matches refer to it.

use crate::classify::{MemberEntry, MemberKind};
use crate::error::{ExploreError, Status};
use crate::filter::{visible, FilterState};
use crate::object::{Explorable, ObjectRef};
use crate::options::ExplorerOptions;
use crate::search::SearchState;
use crate::tree::{NodeId, ObjectTree};
use crate::view::{compute_view, Pager, ViewState};
use log::debug;

/// Rows assumed for paging until a renderer reports its height
const DEFAULT_VIEWPORT_HEIGHT: usize = 20;

/// Interactive exploration state over one root object
#[derive(Debug)]
pub struct Explorer<'a> {
    tree: ObjectTree<'a>,
    /// Visible member indices of the current frame
    visible: Vec<usize>,
    /// Node and filter `visible` was computed for
    visible_key: Option<(NodeId, FilterState)>,
    search: SearchState,
    /// Status left by the last transition
    notice: Option<Status>,
    pager: Option<Pager>,
    viewport_height: usize,
}

impl<'a> Explorer<'a> {
    /// Start exploring `root`, labelled by its type name
    pub fn new(root: &'a dyn Explorable, options: ExplorerOptions) -> Self {
        let label = root.type_name().into_owned();
        Self::with_label(root, label, options)
    }

    /// Start exploring `root` under the given breadcrumb label
    pub fn with_label(
        root: &'a dyn Explorable,
        label: impl Into<String>,
        options: ExplorerOptions,
    ) -> Self {
        let tree = ObjectTree::new(root, label, options);
        let notice = tree.current_node().overflow().map(Status::from);
        let mut explorer = Self {
            tree,
            visible: Vec::new(),
            visible_key: None,
            search: SearchState::new(),
            notice,
            pager: None,
            viewport_height: DEFAULT_VIEWPORT_HEIGHT,
        };
        explorer.sync();
        explorer
    }

    /// The navigation tree
    pub fn tree(&self) -> &ObjectTree<'a> {
        &self.tree
    }

    /// Options the explorer was created with
    pub fn options(&self) -> &ExplorerOptions {
        self.tree.options()
    }

    /// Visible member indices of the current frame
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// The current search
    pub fn search(&self) -> &SearchState {
        &self.search
    }

    /// Status left by the last transition
    pub fn notice(&self) -> Option<&Status> {
        self.notice.as_ref()
    }

    /// Forget the last status
    pub fn clear_notice(&mut self) {
        self.notice = None;
    }

    pub(crate) fn set_notice(&mut self, status: Status) {
        self.notice = Some(status);
    }

    /// Filter of the current frame
    pub fn filter(&self) -> &FilterState {
        &self.tree.current().filter
    }

    /// Position of the selection within the visible list
    pub fn selected(&self) -> Option<usize> {
        (!self.visible.is_empty()).then(|| self.tree.current().selected)
    }

    /// The selected member
    pub fn selected_entry(&self) -> Option<&MemberEntry> {
        let index = *self.visible.get(self.selected()?)?;
        self.tree.current_node().members().get(index)
    }

    /// Value of the selected member
    pub fn selected_value(&self) -> Result<ObjectRef, Status> {
        let entry = self.selected_entry().ok_or(Status::NothingSelected)?;
        entry.value().cloned().ok_or_else(|| {
            Status::from(ExploreError::InaccessibleMember {
                name: entry.name.clone(),
                message: entry.error().unwrap_or_default().to_string(),
            })
        })
    }

    /// Rows the renderer shows in the member list
    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Update the rows shown in the member list
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.scroll();
    }

    /// Project the current state for rendering
    pub fn view(&self) -> ViewState {
        compute_view(
            &self.tree,
            &self.visible,
            &self.search,
            self.notice.as_ref(),
            self.pager.as_ref(),
        )
    }

    /// The open full-screen view, if any
    pub fn pager(&self) -> Option<&Pager> {
        self.pager.as_ref()
    }

    /// Show the selected member's complete value and documentation
    pub fn open_pager(&mut self) {
        match self.selected_value() {
            Ok(_) => self.pager = self.selected_entry().and_then(Pager::for_entry),
            Err(status) => self.notice = Some(status),
        }
    }

    /// Scroll the open pager by `delta` lines
    pub fn scroll_pager(&mut self, delta: isize) {
        if let Some(pager) = &mut self.pager {
            pager.scroll_by(delta);
        }
    }

    pub fn close_pager(&mut self) {
        self.pager = None;
    }

    /// Recompute the visible list if the node or filter changed
    ///
    /// A new visible list invalidates the search, which is reset.
    fn sync(&mut self) {
        let frame = self.tree.current();
        let stale = self
            .visible_key
            .as_ref()
            .map_or(true, |(node, filter)| *node != frame.node || *filter != frame.filter);
        if stale {
            let node = self.tree.current_node();
            self.visible = visible(node.members(), &frame.filter);
            self.visible_key = Some((frame.node, frame.filter.clone()));
            self.search.reset();
            debug!(
                "{} of {} members visible at `{}`",
                self.visible.len(),
                node.members().len(),
                self.tree.dotpath()
            );
        }
        self.tree.select(self.tree.current().selected, self.visible.len());
        self.scroll();
    }

    fn scroll(&mut self) {
        self.tree
            .scroll_into_view(self.viewport_height, self.visible.len());
    }

    /// Move the selection by `delta` rows
    pub fn move_by(&mut self, delta: isize) {
        self.tree.move_selection(delta, self.visible.len());
        self.scroll();
    }

    pub fn move_up(&mut self) {
        self.move_by(-1);
    }

    pub fn move_down(&mut self) {
        self.move_by(1);
    }

    /// Move up one viewport, stopping at the first member
    pub fn page_up(&mut self) {
        let selected = self.tree.current().selected;
        self.select(selected.saturating_sub(self.viewport_height));
    }

    /// Move down one viewport, stopping at the last member
    pub fn page_down(&mut self) {
        let selected = self.tree.current().selected;
        self.select(selected.saturating_add(self.viewport_height));
    }

    pub fn move_to_top(&mut self) {
        self.tree.move_to_top(self.visible.len());
        self.scroll();
    }

    pub fn move_to_bottom(&mut self) {
        self.tree.move_to_bottom(self.visible.len());
        self.scroll();
    }

    /// Select visible position `index`, clamped to the list
    pub fn select(&mut self, index: usize) {
        self.tree.select(index, self.visible.len());
        self.scroll();
    }

    /// Descend into the selected member
    pub fn descend_selected(&mut self) {
        match self.selected_entry().map(|m| m.name.clone()) {
            Some(name) => self.descend(&name),
            None => self.notice = Some(Status::NothingSelected),
        }
    }

    /// Descend into the visible member called `name`
    ///
    /// Failures are reported through the notice; the path is unchanged.
    pub fn descend(&mut self, name: &str) {
        match self.tree.descend(name, &self.visible) {
            Ok(descent) => {
                self.sync();
                if descent.newly_loaded {
                    if let Some(overflow) = self.tree.current_node().overflow() {
                        self.notice = Some(overflow.into());
                    }
                }
            }
            Err(err) => {
                debug!("descend refused: {}", err);
                self.notice = Some(err.into());
            }
        }
    }

    /// Return to the parent object; a no-op at the root
    pub fn ascend(&mut self) -> bool {
        let moved = self.tree.ascend();
        if moved {
            self.sync();
        }
        moved
    }

    /// Return to the object at `depth` on the current path
    pub fn ascend_to(&mut self, depth: usize) -> bool {
        let moved = self.tree.ascend_to(depth);
        if moved {
            self.sync();
        }
        moved
    }

    /// Apply a new filter to the current frame
    ///
    /// The selection stays on the same member while it remains visible.
    pub fn set_filter(&mut self, filter: FilterState) {
        let selected_name = self.selected_entry().map(|m| m.name.clone());
        self.tree.set_filter(filter);
        self.sync();

        let node = self.tree.current_node();
        let position = selected_name.and_then(|name| {
            self.visible
                .iter()
                .position(|&i| node.members()[i].name == name)
        });
        if let Some(position) = position {
            self.select(position);
        }
    }

    /// Flip between public members and all members
    pub fn toggle_public_only(&mut self) {
        let mut filter = self.filter().clone();
        filter.toggle_public_only();
        self.set_filter(filter);
    }

    /// Toggle `kind` in the kind restriction
    pub fn filter_by_kind(&mut self, kind: MemberKind) {
        let mut filter = self.filter().clone();
        filter.filter_by_kind(kind);
        self.set_filter(filter);
    }

    /// Restrict visible names to those containing `pattern`
    pub fn set_name_pattern(&mut self, pattern: Option<String>) {
        let filter = self.filter().clone().name_pattern(pattern);
        self.set_filter(filter);
    }

    /// Restore the default filter
    pub fn clear_filters(&mut self) {
        let filter = self.options().default_filter();
        self.set_filter(filter);
    }

    /// Replace the search query and jump to its best match
    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let names = visible_names(&self.tree, &self.visible);
        self.search.set_query(query, names);
        self.after_search_edit();
    }

    /// Append to the search query
    pub fn push_search_char(&mut self, c: char) {
        let names = visible_names(&self.tree, &self.visible);
        self.search.push_char(c, names);
        self.after_search_edit();
    }

    /// Delete the last character of the search query
    pub fn pop_search_char(&mut self) {
        let names = visible_names(&self.tree, &self.visible);
        self.search.backspace(names);
        self.after_search_edit();
    }

    fn after_search_edit(&mut self) {
        if let Some(index) = self.search.current().map(|m| m.index) {
            self.select(index);
        } else if self.search.is_active() {
            self.notice = Some(Status::NoMatches(self.search.query().to_string()));
        }
    }

    /// Jump to the next search match
    pub fn jump_next_match(&mut self) {
        match self.search.next_match() {
            Some(index) => self.select(index),
            None => self.no_matches(),
        }
    }

    /// Jump to the previous search match
    pub fn jump_previous_match(&mut self) {
        match self.search.previous_match() {
            Some(index) => self.select(index),
            None => self.no_matches(),
        }
    }

    fn no_matches(&mut self) {
        if self.search.is_active() {
            self.notice = Some(Status::NoMatches(self.search.query().to_string()));
        }
    }

    /// Explore a different object, discarding every cached node
    pub fn refresh_root(&mut self, root: &'a dyn Explorable, label: impl Into<String>) {
        self.tree.refresh_root(root, label);
        self.visible_key = None;
        self.pager = None;
        self.notice = self.tree.current_node().overflow().map(Status::from);
        self.sync();
    }
}

fn visible_names<'t>(tree: &'t ObjectTree<'_>, visible: &[usize]) -> Vec<&'t str> {
    let members = tree.current_node().members();
    visible.iter().map(|&i| members[i].name.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NotDescendableReason;
    use crate::filter::Visibility;
    use crate::object::Value;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        Value::module("shop")
            .attr("orders", Value::list((0..3).map(Value::Int)))
            .attr("owner", "ada")
            .attr("total", 12.5)
            .attr("_secret", 1i64)
            .attr("checkout", Value::function("checkout", "(cart)"))
            .attr("Cart", Value::class("Cart").attr("limit", 10i64))
            .broken("flaky", "database is down")
            .build()
    }

    fn names(explorer: &Explorer) -> Vec<String> {
        explorer.view().members.into_iter().map(|m| m.name).collect()
    }

    fn selected_name(explorer: &Explorer) -> Option<String> {
        explorer.selected_entry().map(|m| m.name.clone())
    }

    #[test]
    fn test_initial_view() {
        let obj = sample();
        let explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        assert_eq!(
            names(&explorer),
            vec!["flaky", "orders", "owner", "total", "checkout", "Cart"]
        );
        assert_eq!(explorer.selected(), Some(0));
        assert_eq!(explorer.notice(), None);
    }

    #[test]
    fn test_default_label_is_type_name() {
        let obj = sample();
        let explorer = Explorer::new(&obj, ExplorerOptions::default());
        assert_eq!(explorer.view().dotpath, "module");
    }

    #[test]
    fn test_filter_keeps_selected_member() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.select(2);
        assert_eq!(selected_name(&explorer).as_deref(), Some("owner"));

        explorer.toggle_public_only();
        assert_eq!(explorer.filter().visibility, Visibility::All);
        assert_eq!(selected_name(&explorer).as_deref(), Some("owner"));

        explorer.filter_by_kind(MemberKind::Method);
        assert_eq!(names(&explorer), vec!["checkout"]);
        assert_eq!(explorer.selected(), Some(0));

        explorer.clear_filters();
        assert_eq!(explorer.filter(), &FilterState::new());
    }

    #[test]
    fn test_empty_visible_set_keeps_working() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.set_name_pattern(Some("nothing-matches".into()));

        let view = explorer.view();
        assert!(view.members.is_empty());
        assert_eq!(view.selected, None);
        assert_eq!(view.status, Some(Status::EmptyVisibleSet));

        explorer.move_down();
        explorer.descend_selected();
        assert_eq!(explorer.notice(), Some(&Status::NothingSelected));
        assert_eq!(explorer.tree().depth(), 0);
    }

    #[test]
    fn test_descend_resets_search() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.set_search_query("ord");
        assert_eq!(selected_name(&explorer).as_deref(), Some("orders"));

        explorer.descend_selected();
        assert_eq!(explorer.view().dotpath, "shop.orders");
        assert_eq!(explorer.search().query(), "");

        assert!(explorer.ascend());
        assert_eq!(selected_name(&explorer).as_deref(), Some("orders"));
    }

    #[test]
    fn test_descend_errors_become_notices() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.descend("checkout");
        assert_eq!(
            explorer.notice(),
            Some(&Status::Error(ExploreError::NotDescendable {
                name: "checkout".into(),
                reason: NotDescendableReason::Method,
            }))
        );
        explorer.descend("_secret");
        assert_eq!(
            explorer.notice(),
            Some(&Status::Error(ExploreError::UnknownMember("_secret".into())))
        );
    }

    #[test]
    fn test_selected_value_of_inaccessible_member() {
        let obj = sample();
        let explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        assert_eq!(
            explorer.selected_value().unwrap_err(),
            Status::Inaccessible {
                name: "flaky".into(),
                message: "database is down".into()
            }
        );
    }

    #[test]
    fn test_search_without_matches() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.select(3);
        explorer.set_search_query("xyz");
        assert_eq!(explorer.notice(), Some(&Status::NoMatches("xyz".into())));
        assert_eq!(explorer.selected(), Some(3));
        explorer.jump_next_match();
        assert_eq!(explorer.selected(), Some(3));
    }

    #[test]
    fn test_search_cycles_through_matches() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.push_search_char('o');
        // "orders" and "owner" are prefix matches; "orders" comes first
        assert_eq!(selected_name(&explorer).as_deref(), Some("orders"));
        explorer.jump_next_match();
        assert_eq!(selected_name(&explorer).as_deref(), Some("owner"));
        explorer.jump_next_match();
        assert_eq!(selected_name(&explorer).as_deref(), Some("total"));
        explorer.jump_next_match();
        assert_eq!(selected_name(&explorer).as_deref(), Some("checkout"));
        explorer.jump_next_match();
        assert_eq!(selected_name(&explorer).as_deref(), Some("orders"));
        explorer.jump_previous_match();
        assert_eq!(selected_name(&explorer).as_deref(), Some("checkout"));
    }

    #[test]
    fn test_paging_clamps() {
        let obj = Value::list((0..50).map(Value::Int));
        let mut explorer = Explorer::with_label(&obj, "xs", ExplorerOptions::default());
        explorer.set_viewport_height(10);
        explorer.page_down();
        assert_eq!(explorer.selected(), Some(10));
        assert_eq!(explorer.view().scroll_offset, 1);
        explorer.move_to_bottom();
        assert_eq!(explorer.selected(), Some(49));
        assert_eq!(explorer.view().scroll_offset, 40);
        explorer.page_down();
        assert_eq!(explorer.selected(), Some(49));
        explorer.page_up();
        assert_eq!(explorer.selected(), Some(39));
        explorer.move_to_top();
        explorer.page_up();
        assert_eq!(explorer.selected(), Some(0));
        assert_eq!(explorer.view().scroll_offset, 0);
    }

    #[test]
    fn test_overflow_notice_once_per_new_node() {
        let big = Value::list((0..10).map(Value::Int));
        let obj = Value::module("m").attr("big", big).build();
        let options = ExplorerOptions::default().max_members(4);
        let mut explorer = Explorer::with_label(&obj, "m", options);

        explorer.descend("big");
        assert_eq!(
            explorer.notice(),
            Some(&Status::Overflow { total: 10, kept: 4 })
        );
        explorer.clear_notice();
        explorer.ascend();
        explorer.descend("big");
        assert_eq!(explorer.notice(), None);
        assert_eq!(explorer.view().overflow.map(|o| o.kept), Some(4));
    }

    #[test]
    fn test_zero_member_cap_still_shows_a_member() {
        let obj = sample();
        let mut options = ExplorerOptions::default();
        options.max_members = 0;
        let explorer = Explorer::with_label(&obj, "shop", options);

        assert_eq!(explorer.options().max_members, 1);
        assert_eq!(explorer.tree().current_node().members().len(), 1);
        assert_eq!(explorer.notice(), Some(&Status::Overflow { total: 9, kept: 1 }));
    }

    #[test]
    fn test_pager_shows_every_item() {
        let obj = Value::module("m")
            .attr("big", Value::list((0..400).map(Value::Int)))
            .build();
        let mut explorer = Explorer::with_label(&obj, "m", ExplorerOptions::default());
        assert!(explorer.view().preview.unwrap().repr.ends_with('…'));

        explorer.open_pager();
        let pager = explorer.view().pager.unwrap();
        assert_eq!(pager.title, "big");
        assert!(pager.lines[0].ends_with(", 398, 399]"));

        explorer.scroll_pager(5);
        assert_eq!(explorer.pager().map(|p| p.scroll), Some(0));
        explorer.close_pager();
        assert_eq!(explorer.view().pager, None);
    }

    #[test]
    fn test_pager_of_inaccessible_member() {
        let obj = sample();
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.open_pager();
        assert_eq!(explorer.pager(), None);
        assert!(matches!(explorer.notice(), Some(Status::Inaccessible { .. })));
    }

    #[test]
    fn test_refresh_root() {
        let obj = sample();
        let other = Value::map([("k", Value::Int(1))]);
        let mut explorer = Explorer::with_label(&obj, "shop", ExplorerOptions::default());
        explorer.descend("Cart");
        explorer.refresh_root(&other, "other");
        assert_eq!(explorer.tree().depth(), 0);
        assert_eq!(names(&explorer), vec!["[\"k\"]"]);
    }
}
