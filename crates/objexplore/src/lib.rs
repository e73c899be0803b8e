//! Object Explorer Library
//!
//! Interactive, read-only navigation of object graphs. An explored value is
//! reached through the [`Explorable`](object::Explorable) capability
//! interface; its members are classified, filtered, searched and projected
//! into a [`ViewState`](view::ViewState) that any front end can draw.
//!
//! # Core Concepts
//!
//! - **Explorable**: capability checks over a value, never executing it
//! - **MemberEntry**: one classified member with a lazily computed preview
//! - **ObjectTree**: arena of visited objects plus the navigation path
//! - **Explorer**: the state machine driven by [`InputEvent`]s
//! - **Session**: the render/dispatch loop over an event source and renderer
//!
//! # Example
//!
//! ```
//! use objexplore::prelude::*;
//!
//! let app = Value::module("app")
//!     .attr("version", "1.2.0")
//!     .attr("workers", Value::list([Value::Int(4), Value::Int(8)]))
//!     .build();
//!
//! let mut explorer = Explorer::with_label(&app, "app", ExplorerOptions::default());
//! explorer.dispatch(InputEvent::MoveDown);
//! explorer.dispatch(InputEvent::Descend);
//!
//! let view = explorer.view();
//! assert_eq!(view.dotpath, "app.workers");
//! assert_eq!(view.members.len(), 2);
//! ```

pub mod classify;
pub mod error;
mod explorer;
pub mod filter;
mod input;
pub mod object;
mod options;
pub mod search;
pub mod session;
pub mod tree;
pub mod view;

pub use error::{ExploreError, NotDescendableReason, Status};
pub use explorer::Explorer;
pub use input::{Control, InputEvent, SearchEdit};
pub use options::*;
pub use session::{explore_with, EventSource, Outcome, Renderer};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::classify::{MemberEntry, MemberKind};
    pub use crate::error::{ExploreError, Status};
    pub use crate::explorer::Explorer;
    pub use crate::filter::{FilterState, KindSet, Visibility};
    pub use crate::input::{Control, InputEvent, SearchEdit};
    pub use crate::object::{Attribute, Explorable, ObjectRef, Value};
    pub use crate::options::{ExplorerOptions, Precedence};
    pub use crate::session::{explore_with, EventSource, Outcome, Renderer, ScriptedEvents};
    pub use crate::view::{Pager, Preview, ViewState, VisibleMember};
}
