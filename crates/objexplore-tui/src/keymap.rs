//! Key bindings
//!
//! Translates crossterm key presses into explorer input events. Search
//! typing, the name filter prompt, the path stack and the help overlay are
//! modes of the keymap itself; they are shared with the renderer through
//! [`KeyState`]. The renderer in turn records the facts of each drawn view
//! the keymap needs, such as the path depth and whether the pager is open.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use objexplore::classify::MemberKind;
use objexplore::view::ViewState;
use objexplore::{InputEvent, SearchEdit};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// How key presses are interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KeyMode {
    /// Keys navigate
    #[default]
    Normal,
    /// Printable keys edit the search query
    Search,
    /// Printable keys edit the name filter
    NameFilter,
    /// Keys pick a frame of the path to jump back to
    Stack,
}

/// Keymap state the renderer also reads
#[derive(Debug, Default)]
pub struct KeyState {
    mode: Cell<KeyMode>,
    help: Cell<bool>,
    /// Name filter being typed
    pattern: RefCell<String>,
    /// Depth highlighted in the path stack
    stack_cursor: Cell<usize>,
    // Facts of the last drawn view
    depth: Cell<usize>,
    paging: Cell<bool>,
    page: Cell<usize>,
}

impl KeyState {
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub fn mode(&self) -> KeyMode {
        self.mode.get()
    }

    /// Whether the help overlay is shown
    pub fn help_visible(&self) -> bool {
        self.help.get()
    }

    /// Depth highlighted in the path stack
    pub fn stack_cursor(&self) -> usize {
        self.stack_cursor.get()
    }

    /// Record what the keymap needs from a drawn view
    ///
    /// `page` is the number of lines one page scroll moves.
    pub fn observe(&self, view: &ViewState, page: usize) {
        self.depth.set(view.depth());
        self.paging.set(view.pager.is_some());
        self.page.set(page.max(1));
        if self.mode.get() != KeyMode::NameFilter {
            *self.pattern.borrow_mut() = view.filter.name_pattern.clone().unwrap_or_default();
        }
    }
}

/// One line of the help overlay: keys and what they do
pub const HELP: &[(&str, &str)] = &[
    ("k / ↑", "move up"),
    ("j / ↓", "move down"),
    ("g / G", "first / last member"),
    ("PgUp / PgDn", "move one page"),
    ("l / → / Enter", "explore selected member"),
    ("h / ← / Esc", "back to parent"),
    ("o", "path stack, Enter jumps back"),
    ("f", "full value and docs, q closes"),
    ("[ / ]", "toggle private members"),
    ("1-6", "filter data, property, method, class, module, dunder"),
    ("p", "filter names, Enter keeps, Esc clears"),
    ("c", "clear filters"),
    ("/", "search, Enter or Esc to finish"),
    ("n / N", "next / previous match"),
    ("r", "return selected member"),
    ("q", "quit"),
    ("?", "toggle this help"),
];

/// Maps key presses to input events
#[derive(Debug, Clone)]
pub struct Keymap {
    state: Rc<KeyState>,
}

impl Keymap {
    pub fn new(state: Rc<KeyState>) -> Self {
        Self { state }
    }

    /// Translate a key press
    ///
    /// Returns `None` for keys without a binding. Mode switches yield
    /// [`InputEvent::Redraw`] so the change becomes visible.
    pub fn translate(&self, key: KeyEvent) -> Option<InputEvent> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Some(InputEvent::Exit);
        }
        if self.state.help.get() {
            self.state.help.set(false);
            return Some(InputEvent::Redraw);
        }
        if self.state.paging.get() {
            return self.pager(key.code);
        }

        match self.state.mode.get() {
            KeyMode::Normal => self.normal(key.code),
            KeyMode::Search => self.search(key.code),
            KeyMode::NameFilter => self.name_filter(key.code),
            KeyMode::Stack => self.stack(key.code),
        }
    }

    fn enter(&self, mode: KeyMode) -> InputEvent {
        self.state.mode.set(mode);
        InputEvent::Redraw
    }

    fn normal(&self, code: KeyCode) -> Option<InputEvent> {
        let event = match code {
            KeyCode::Char('k') | KeyCode::Up => InputEvent::MoveUp,
            KeyCode::Char('j') | KeyCode::Down => InputEvent::MoveDown,
            KeyCode::Char('g') | KeyCode::Home => InputEvent::MoveTop,
            KeyCode::Char('G') | KeyCode::End => InputEvent::MoveBottom,
            KeyCode::PageUp => InputEvent::PageUp,
            KeyCode::PageDown => InputEvent::PageDown,
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => InputEvent::Descend,
            KeyCode::Char('h') | KeyCode::Left | KeyCode::Esc | KeyCode::Backspace => {
                InputEvent::Ascend
            }
            KeyCode::Char('[') | KeyCode::Char(']') => InputEvent::TogglePublicOnly,
            KeyCode::Char(c @ '1'..='6') => {
                let index = c as usize - '1' as usize;
                InputEvent::FilterByKind(MemberKind::ALL[index])
            }
            KeyCode::Char('c') => InputEvent::ClearFilters,
            KeyCode::Char('n') => InputEvent::JumpNextMatch,
            KeyCode::Char('N') => InputEvent::JumpPreviousMatch,
            KeyCode::Char('f') => InputEvent::OpenPager,
            KeyCode::Char('r') => InputEvent::ReturnSelected,
            KeyCode::Char('q') => InputEvent::Exit,
            KeyCode::Char('/') => self.enter(KeyMode::Search),
            KeyCode::Char('p') => self.enter(KeyMode::NameFilter),
            KeyCode::Char('o') => {
                self.state.stack_cursor.set(self.state.depth.get());
                self.enter(KeyMode::Stack)
            }
            KeyCode::Char('?') => {
                self.state.help.set(true);
                InputEvent::Redraw
            }
            _ => return None,
        };
        Some(event)
    }

    fn search(&self, code: KeyCode) -> Option<InputEvent> {
        let event = match code {
            KeyCode::Char(c) => InputEvent::EditSearchQuery(SearchEdit::Char(c)),
            KeyCode::Backspace => InputEvent::EditSearchQuery(SearchEdit::Backspace),
            KeyCode::Up => InputEvent::JumpPreviousMatch,
            KeyCode::Down => InputEvent::JumpNextMatch,
            KeyCode::Enter | KeyCode::Esc => self.enter(KeyMode::Normal),
            _ => return None,
        };
        Some(event)
    }

    fn name_filter(&self, code: KeyCode) -> Option<InputEvent> {
        let mut pattern = self.state.pattern.borrow_mut();
        let event = match code {
            KeyCode::Char(c) => {
                pattern.push(c);
                InputEvent::SetNamePattern(Some(pattern.clone()))
            }
            KeyCode::Backspace => {
                pattern.pop();
                InputEvent::SetNamePattern((!pattern.is_empty()).then(|| pattern.clone()))
            }
            KeyCode::Enter => self.enter(KeyMode::Normal),
            KeyCode::Esc => {
                pattern.clear();
                self.state.mode.set(KeyMode::Normal);
                InputEvent::SetNamePattern(None)
            }
            _ => return None,
        };
        Some(event)
    }

    fn stack(&self, code: KeyCode) -> Option<InputEvent> {
        let cursor = self.state.stack_cursor.get();
        let event = match code {
            KeyCode::Char('k') | KeyCode::Up => {
                self.state.stack_cursor.set(cursor.saturating_sub(1));
                InputEvent::Redraw
            }
            KeyCode::Char('j') | KeyCode::Down => {
                let deepest = self.state.depth.get();
                self.state.stack_cursor.set((cursor + 1).min(deepest));
                InputEvent::Redraw
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.state.stack_cursor.set(0);
                InputEvent::Redraw
            }
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Enter => {
                self.state.mode.set(KeyMode::Normal);
                InputEvent::AscendTo(cursor)
            }
            KeyCode::Char('o') | KeyCode::Char('q') | KeyCode::Esc => self.enter(KeyMode::Normal),
            _ => return None,
        };
        Some(event)
    }

    fn pager(&self, code: KeyCode) -> Option<InputEvent> {
        let page = isize::try_from(self.state.page.get()).unwrap_or(isize::MAX);
        let event = match code {
            KeyCode::Char('j') | KeyCode::Down => InputEvent::ScrollPager(1),
            KeyCode::Char('k') | KeyCode::Up => InputEvent::ScrollPager(-1),
            KeyCode::PageDown | KeyCode::Char(' ') => InputEvent::ScrollPager(page),
            KeyCode::PageUp => InputEvent::ScrollPager(-page),
            KeyCode::Char('g') | KeyCode::Home => InputEvent::ScrollPager(isize::MIN),
            KeyCode::Char('G') | KeyCode::End => InputEvent::ScrollPager(isize::MAX),
            KeyCode::Char('f')
            | KeyCode::Char('q')
            | KeyCode::Char('h')
            | KeyCode::Left
            | KeyCode::Esc => InputEvent::ClosePager,
            _ => return None,
        };
        Some(event)
    }
}
