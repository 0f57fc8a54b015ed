//! # Validator Options
//!
//! Tunables for how engine paths are normalized. Deserializable so a
//! caller can load them from a config file; every field has a default.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Validator configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorOptions {
    /// Path segment to drop as the root marker. Defaults to the
    /// definition name the validator was built with.
    pub root_marker: Option<String>,
    /// Keep `[i]` list-index segments in error paths.
    pub keep_index_segments: bool,
}

impl ValidatorOptions {
    /// Set the root marker.
    pub fn root_marker(mut self, marker: impl Into<String>) -> Self {
        self.root_marker = Some(marker.into());
        self
    }

    /// Keep or drop list-index segments.
    pub fn keep_index_segments(mut self, keep: bool) -> Self {
        self.keep_index_segments = keep;
        self
    }

    /// The path filter these options select for `definition`.
    pub fn path_filter(&self, definition: &str) -> PathFilter {
        PathFilter {
            root_marker: self
                .root_marker
                .clone()
                .unwrap_or_else(|| definition.to_string()),
            keep_index_segments: self.keep_index_segments,
        }
    }
}

/// Rules for turning raw engine path segments into a dot-joined path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathFilter {
    root_marker: String,
    keep_index_segments: bool,
}

impl PathFilter {
    /// Drop `root_marker` and all index segments.
    pub fn new(root_marker: impl Into<String>) -> Self {
        Self {
            root_marker: root_marker.into(),
            keep_index_segments: false,
        }
    }

    /// Keep index segments, attached to the preceding field.
    pub fn keeping_index_segments(mut self) -> Self {
        self.keep_index_segments = true;
        self
    }

    /// The segment dropped as the root marker.
    pub fn root_marker(&self) -> &str {
        &self.root_marker
    }

    /// Join `segments` into a path string.
    ///
    /// Empty segments and the root marker are always dropped. Index
    /// segments (starting with `[`) are dropped unless kept, in which case
    /// they attach without a separator (`items[2].name`). A quoted label
    /// is unescaped; a label that quotes to nothing is dropped.
    pub fn format_path<S: AsRef<str>>(&self, segments: &[S]) -> String {
        let mut path = String::new();
        for segment in segments.iter().map(AsRef::as_ref) {
            if segment.is_empty() || segment == self.root_marker {
                continue;
            }
            if segment.starts_with('[') {
                if self.keep_index_segments {
                    path.push_str(segment);
                }
                continue;
            }
            let label = unquote(segment);
            if label.is_empty() {
                continue;
            }
            if !path.is_empty() {
                path.push('.');
            }
            path.push_str(&label);
        }
        path
    }
}

/// Strip the quotes from a quoted label, resolving JSON string escapes
/// when the label is a well-formed string literal.
fn unquote(segment: &str) -> Cow<'_, str> {
    if segment.len() >= 2 && segment.starts_with('"') && segment.ends_with('"') {
        if let Ok(label) = serde_json::from_str::<String>(segment) {
            return Cow::Owned(label);
        }
    }
    Cow::Borrowed(segment.trim_matches('"'))
}
