//! Runtime configuration.
//!
//! Configuration is plain data. It can be built in code or parsed from JSON:
//!
//! ```rust
//! use dvorak_core::Config;
//!
//! let config = Config::from_json(r#"{ "root_id": "app" }"#).unwrap();
//! assert_eq!(config.root_id, "app");
//! assert!(!config.restore_build_context);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Default id of the element `render_root` mounts under.
pub const DEFAULT_ROOT_ID: &str = "root";

/// Settings shared by every build and mount performed through a runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Id of the host element that `render_root` mounts render nodes under.
    pub root_id: String,

    /// Whether leaving a component build restores the enclosing component
    /// as the hook target.
    ///
    /// When `false`, leaving any build clears the hook target, so a
    /// component body that builds a child synchronously and only then calls
    /// `on_mount` registers nothing. When `true`, the target is restored to
    /// whichever component is still on the build stack.
    pub restore_build_context: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root_id: DEFAULT_ROOT_ID.to_string(),
            restore_build_context: false,
        }
    }
}

impl Config {
    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    /// Set the root element id.
    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = root_id.into();
        self
    }

    /// Choose the build-context exit discipline.
    pub fn with_restore_build_context(mut self, restore: bool) -> Self {
        self.restore_build_context = restore;
        self
    }
}
