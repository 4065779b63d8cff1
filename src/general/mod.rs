pub mod check;
pub mod forwarder;
pub mod instrument;
pub mod layout;
pub mod player;
pub mod resolver;
pub mod stdin_handler;
pub mod transpose;

use std::fmt;

/// Returned when a user supplied name (instrument, layout, ...) is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

impl ParseNameError {
    pub fn new(kind: &'static str, value: &str) -> Self {
        Self { kind, value: value.to_string() }
    }
}

impl fmt::Display for ParseNameError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unknown {}: '{}'", self.kind, self.value)
    }
}

impl std::error::Error for ParseNameError {}

/// Lowercase a name and drop separators so "Windsong Lyre", "windsong_lyre"
/// and "windsong-lyre" all compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .map(|c| c.to_ascii_lowercase())
        .collect()
}
