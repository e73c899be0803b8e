//! Terminal front end for the object explorer
//!
//! Runs an exploration session on the terminal: crossterm supplies key
//! presses, ratatui draws each [`ViewState`](objexplore::view::ViewState).
//!
//! # Example
//!
//! ```no_run
//! use objexplore::object::Value;
//!
//! let settings = Value::map([("theme", Value::str("dark"))]);
//! let outcome = objexplore_tui::explore(&settings).expect("terminal session failed");
//! if let Some(value) = outcome.selected() {
//!     println!("{}", value.repr());
//! }
//! ```

pub mod config;
pub mod demo;
pub mod keymap;
pub mod render;
pub mod terminal;

use anyhow::{Context, Result};
use keymap::{KeyState, Keymap};
use objexplore::object::{Explorable, Value};
use objexplore::session::run;
use objexplore::{Explorer, ExplorerOptions, Outcome};
use render::TuiRenderer;
use std::fs;
use std::path::Path;
use terminal::{KeyboardEvents, TerminalSession};

/// Explore `object` on the terminal with default options
pub fn explore(object: &dyn Explorable) -> Result<Outcome> {
    let label = object.type_name().into_owned();
    explore_with_options(object, &label, ExplorerOptions::default())
}

/// Explore `object` on the terminal
///
/// The terminal is restored before returning, including on errors.
pub fn explore_with_options(
    object: &dyn Explorable,
    label: &str,
    options: ExplorerOptions,
) -> Result<Outcome> {
    let mut explorer = Explorer::with_label(object, label, options);
    let keys = KeyState::shared();

    let session = TerminalSession::enter()?;
    let renderer = TuiRenderer::new(session.terminal()?, keys.clone());
    let events = KeyboardEvents::new(Keymap::new(keys));
    let outcome = run(&mut explorer, events, renderer);
    drop(session);
    outcome
}

/// Read a JSON document into an explorable value
pub fn load_document(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let json: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    Ok(Value::from(json))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"a": [1, 2], "b": {{"c": null}}}}"#).unwrap();

        let value = load_document(file.path()).unwrap();
        assert_eq!(value.type_name(), "dict");
        assert_eq!(value.member_names(), vec!["[\"a\"]", "[\"b\"]"]);
    }

    #[test]
    fn test_load_invalid_document() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[1, 2").unwrap();
        let err = load_document(file.path()).unwrap_err();
        assert!(err.to_string().ends_with("is not valid JSON"));
    }
}
