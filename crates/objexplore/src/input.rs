//! Input events and their dispatch

use crate::classify::MemberKind;
use crate::explorer::Explorer;
use crate::object::ObjectRef;
use log::trace;

/// An edit to the search query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchEdit {
    Char(char),
    Backspace,
}

/// Abstract user input, independent of any terminal
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    MoveUp,
    MoveDown,
    MoveTop,
    MoveBottom,
    PageUp,
    PageDown,
    /// Explore the selected member
    Descend,
    /// Return to the parent object
    Ascend,
    /// Return to the object at the given depth of the path
    AscendTo(usize),
    TogglePublicOnly,
    FilterByKind(MemberKind),
    /// Restore the default filter
    ClearFilters,
    SetNamePattern(Option<String>),
    EditSearchQuery(SearchEdit),
    JumpNextMatch,
    JumpPreviousMatch,
    /// Show the selected member full screen
    OpenPager,
    /// Scroll the full-screen view by a number of lines
    ScrollPager(isize),
    ClosePager,
    /// Redraw without changing state
    Redraw,
    /// End the session returning the selected member's value
    ReturnSelected,
    Exit,
}

/// What the session loop does after an event
#[derive(Debug, Clone)]
pub enum Control {
    Continue,
    Exit,
    /// End the session with this object
    Return(ObjectRef),
}

impl Control {
    /// Returns true unless the session should end
    pub fn is_continue(&self) -> bool {
        matches!(self, Control::Continue)
    }
}

impl Explorer<'_> {
    /// Apply one input event
    ///
    /// The previous notice is cleared first, so a status lasts exactly one
    /// event. Any event other than a pager event or a redraw closes the
    /// pager. Navigation failures never end the session.
    pub fn dispatch(&mut self, event: InputEvent) -> Control {
        trace!("dispatch {:?}", event);
        if event != InputEvent::Redraw {
            self.clear_notice();
        }
        if !matches!(
            event,
            InputEvent::Redraw | InputEvent::OpenPager | InputEvent::ScrollPager(_)
        ) {
            self.close_pager();
        }

        match event {
            InputEvent::MoveUp => self.move_up(),
            InputEvent::MoveDown => self.move_down(),
            InputEvent::MoveTop => self.move_to_top(),
            InputEvent::MoveBottom => self.move_to_bottom(),
            InputEvent::PageUp => self.page_up(),
            InputEvent::PageDown => self.page_down(),
            InputEvent::Descend => self.descend_selected(),
            InputEvent::Ascend => {
                self.ascend();
            }
            InputEvent::AscendTo(depth) => {
                self.ascend_to(depth);
            }
            InputEvent::TogglePublicOnly => self.toggle_public_only(),
            InputEvent::FilterByKind(kind) => self.filter_by_kind(kind),
            InputEvent::ClearFilters => self.clear_filters(),
            InputEvent::SetNamePattern(pattern) => self.set_name_pattern(pattern),
            InputEvent::EditSearchQuery(SearchEdit::Char(c)) => self.push_search_char(c),
            InputEvent::EditSearchQuery(SearchEdit::Backspace) => self.pop_search_char(),
            InputEvent::JumpNextMatch => self.jump_next_match(),
            InputEvent::JumpPreviousMatch => self.jump_previous_match(),
            InputEvent::OpenPager => self.open_pager(),
            InputEvent::ScrollPager(delta) => self.scroll_pager(delta),
            InputEvent::ClosePager | InputEvent::Redraw => {}
            InputEvent::ReturnSelected => match self.selected_value() {
                Ok(value) => return Control::Return(value),
                Err(status) => self.set_notice(status),
            },
            InputEvent::Exit => return Control::Exit,
        }
        Control::Continue
    }
}
