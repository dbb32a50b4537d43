//! Error types for the render engine.
//!
//! Almost every operation in this crate is in-memory and synchronous, so the
//! error surface is small. The variants fall into two groups:
//!
//! - Invariant violations (`PlaceholderDetached`, `NotBuilt`, `NotLoaded`).
//!   These mean a render node was driven out of order. The operation aborts
//!   and host-tree mutations already performed are not rolled back.
//! - Recoverable setup errors (`MissingRoot`, `Config`).

use thiserror::Error;

use crate::host::NodeId;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while building, mounting or toggling render nodes.
#[derive(Debug, Error)]
pub enum Error {
    /// A node was asked to show its content while its placeholder was not
    /// attached to the host tree.
    #[error("placeholder {node:?} is not attached to the host tree")]
    PlaceholderDetached {
        /// The detached placeholder.
        node: NodeId,
    },

    /// A visibility toggle reached a node that owns no host nodes yet.
    #[error("render node has not been built")]
    NotBuilt,

    /// `init` was called before `load_at`.
    #[error("render node has no mount location")]
    NotLoaded,

    /// The well-known root location is not present in the host tree.
    #[error("no host element with id `{id}`")]
    MissingRoot {
        /// The id that was looked up.
        id: String,
    },

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        let err = Error::MissingRoot { id: "app".into() };
        assert_eq!(err.to_string(), "no host element with id `app`");

        let err = Error::PlaceholderDetached { node: NodeId::from(7) };
        assert!(err.to_string().contains("NodeId(7)"));
    }

    #[test]
    fn json_errors_convert() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = parse.into();
        assert!(matches!(err, Error::Config(_)));
    }
}
