//! Audio format allow-list
//!
//! Extensions are compared lowercase and always carry the leading dot.

use std::path::Path;

/// Extensions eligible for playback and upload
pub const SUPPORTED_EXTENSIONS: [&str; 6] = [".mp3", ".wav", ".ogg", ".m4a", ".flac", ".aac"];

/// Lowercased extension of `path` including the leading dot
///
/// Returns `None` for files without an extension (`song`, `.mp3`).
pub fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

/// Whether `extension` (lowercase, with dot) is allow-listed
pub fn is_supported(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// Comma separated allow-list, e.g. for error messages
pub fn supported_list() -> String {
    SUPPORTED_EXTENSIONS.join(", ")
}

/// Check that an extension is lowercase and starts with a dot
pub fn is_normalized(extension: &str) -> bool {
    extension.len() > 1
        && extension.starts_with('.')
        && !extension.chars().any(|c| c.is_uppercase())
}
