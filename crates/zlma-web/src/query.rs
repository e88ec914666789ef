//! Query string decoding.
//!
//! A best-effort `application/x-www-form-urlencoded` decoder: it never fails.
//! Pairs it cannot make sense of (no key, empty value) are dropped, so a
//! malformed query reads as "no parameters" rather than an error.

use std::collections::BTreeMap;

use url::form_urlencoded;

/// Free-text inventory filter.
pub const PATTERN: &str = "pattern";
/// Finder action verb.
pub const ACTION: &str = "action";
/// Top-level `vif` command.
pub const CMD: &str = "cmd";
/// `vif` subcommand.
pub const SUB_CMD: &str = "sub_cmd";

/// Decoded query parameters: name → values in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    params: BTreeMap<String, Vec<String>>,
}

/// Recognized values of the `action` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Refresh every inventory record.
    Update,
}

impl Query {
    /// Decode a raw query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        let mut params: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (key, value) in form_urlencoded::parse(raw.as_bytes()) {
            // The upstream tool chokes on the trailing newline a shell
            // substitution leaves behind.
            let value = if key == SUB_CMD {
                value.trim_end().to_string()
            } else {
                value.into_owned()
            };
            if key.is_empty() || value.is_empty() {
                continue;
            }
            params.entry(key.into_owned()).or_default().push(value);
        }
        Self { params }
    }

    /// First value of `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.params
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Every value of `key`, in arrival order.
    pub fn get_all(&self, key: &str) -> &[String] {
        self.params.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Search pattern, or `""` when none was given.
    pub fn pattern(&self) -> &str {
        self.get(PATTERN).unwrap_or_default()
    }

    /// The recognized action, if any. Unknown verbs read as no action.
    pub fn action(&self) -> Option<Action> {
        match self.get(ACTION)? {
            "update" => Some(Action::Update),
            _ => None,
        }
    }

    /// Requested command, or `""`.
    pub fn cmd(&self) -> &str {
        self.get(CMD).unwrap_or_default()
    }

    /// Requested subcommand with trailing whitespace removed, or `""`.
    pub fn sub_cmd(&self) -> &str {
        self.get(SUB_CMD).unwrap_or_default()
    }

    /// Number of distinct parameter names.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when no parameter survived decoding.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
