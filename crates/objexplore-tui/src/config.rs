//! Explorer options from a JSON file and command-line overrides

use anyhow::{Context, Result};
use log::info;
use objexplore::filter::Visibility;
use objexplore::ExplorerOptions;
use std::fs;
use std::path::Path;

/// Load options from `path`, or the defaults when no file is given
///
/// Missing fields in the file keep their default values.
pub fn load_options(path: Option<&Path>) -> Result<ExplorerOptions> {
    let Some(path) = path else {
        return Ok(ExplorerOptions::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let options = serde_json::from_str(&text)
        .with_context(|| format!("invalid config file {}", path.display()))?;
    info!("loaded options from {}", path.display());
    Ok(options)
}

/// Settings given on the command line, applied over the loaded options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub show_all: bool,
    pub max_members: Option<usize>,
    pub wrap: bool,
    pub dunders: bool,
}

impl Overrides {
    /// Apply the flags that were set; unset flags leave `options` alone
    pub fn apply(&self, mut options: ExplorerOptions) -> ExplorerOptions {
        if self.show_all {
            options = options.default_visibility(Visibility::All);
        }
        if let Some(max) = self.max_members {
            options = options.max_members(max);
        }
        if self.wrap {
            options = options.wrap_selection(true);
        }
        if self.dunders {
            options = options.descend_into_dunders(true);
        }
        options
    }
}
