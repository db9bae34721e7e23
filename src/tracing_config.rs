//! Tracing configuration for debugging type resolution.
//!
//! Supports three output formats controlled by `REIFY_LOG_FORMAT`:
//!
//! - `text` (default): standard `tracing-subscriber` flat output
//! - `tree`: hierarchical indented output via `tracing-tree`
//! - `json`: one JSON object per span/event
//!
//! ## Quick start
//!
//! ```bash
//! # Every supertype walk step and unification, as a tree
//! REIFY_LOG=trace REIFY_LOG_FORMAT=tree cargo test -p reify
//!
//! # Only failed navigations and conflicting bindings
//! REIFY_LOG=reify_solver=debug cargo test -p reify
//!
//! # Fine-grained filtering
//! REIFY_LOG="reify_solver::assignability=trace,reify_solver::resolver=debug"
//! ```
//!
//! The subscriber is only initialised when `REIFY_LOG` (or `RUST_LOG`) is
//! set, so there is no cost in normal use.

use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry, fmt};

/// Tracing output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Standard flat text lines.
    #[default]
    Text,
    /// Hierarchical indented tree via `tracing-tree`.
    Tree,
    /// Newline-delimited JSON objects.
    Json,
}

impl LogFormat {
    /// Parse a format name, case-insensitively. Unknown names fall back to
    /// [`LogFormat::Text`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "tree" => Self::Tree,
            "json" => Self::Json,
            _ => Self::Text,
        }
    }

    /// Read `REIFY_LOG_FORMAT`.
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("REIFY_LOG_FORMAT").unwrap_or_default())
    }
}

/// Build an `EnvFilter` from `REIFY_LOG`, falling back to `RUST_LOG`.
///
/// `REIFY_LOG` takes precedence when both are set. Values use `RUST_LOG`
/// syntax (e.g. `debug`, `reify_solver::token=trace`).
fn build_filter() -> EnvFilter {
    if let Ok(val) = std::env::var("REIFY_LOG") {
        EnvFilter::builder().parse_lossy(val)
    } else {
        EnvFilter::from_default_env()
    }
}

/// Initialise the global tracing subscriber.
///
/// Does nothing when neither `REIFY_LOG` nor `RUST_LOG` is set. Returns
/// whether this call installed the subscriber; a second call, or a host that
/// already installed its own, leaves the existing one in place.
///
/// All output goes to stderr (`tracing-tree` writes there by default).
pub fn init_tracing() -> bool {
    let has_reify_log = std::env::var("REIFY_LOG").is_ok();
    let has_rust_log = std::env::var("RUST_LOG").is_ok();
    if !has_reify_log && !has_rust_log {
        return false;
    }

    let filter = build_filter();
    match LogFormat::from_env() {
        LogFormat::Tree => {
            let tree_layer = tracing_tree::HierarchicalLayer::default()
                .with_indent_amount(2)
                .with_indent_lines(true)
                .with_deferred_spans(true)
                .with_span_retrace(true)
                .with_targets(true);

            Registry::default().with(filter).with(tree_layer).try_init().is_ok()
        }
        LogFormat::Json => {
            let json_layer = fmt::layer().json().with_writer(std::io::stderr);

            Registry::default().with(filter).with(json_layer).try_init().is_ok()
        }
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_format_parse() {
        assert_eq!(LogFormat::parse("tree"), LogFormat::Tree);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Json);
        assert_eq!(LogFormat::parse(" Tree "), LogFormat::Tree);
        assert_eq!(LogFormat::parse("text"), LogFormat::Text);
        assert_eq!(LogFormat::parse(""), LogFormat::Text);
        assert_eq!(LogFormat::parse("yaml"), LogFormat::Text);
        assert_eq!(LogFormat::default(), LogFormat::Text);
    }
}
