//! Output formatting for CLI commands

use serde::Serialize;

/// Pretty JSON, falling back to `{}` for values that cannot be serialized
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}
