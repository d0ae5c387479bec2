//! Terminal configuration.

use serde::{Deserialize, Serialize};

/// Default text of `about`.
pub const DEFAULT_ABOUT: &str = "This is a simulated terminal interface.";

/// Default content of the placeholder file seeded into every home directory.
pub const DEFAULT_README: &str = "This is a README file.";

/// Knobs for the terminal engine. Every field has a default, so a partial
/// `[terminal]` table is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Output of the `about` command.
    pub about: String,
    /// Content of `~/Readme.txt` in new sessions.
    pub readme: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            about: DEFAULT_ABOUT.to_string(),
            readme: DEFAULT_README.to_string(),
        }
    }
}
