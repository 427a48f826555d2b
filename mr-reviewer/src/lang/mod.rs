//! Source-file classification for review prompts.
//!
//! Only files whose extension is in [`CODE_EXTENSIONS`] reach the model; docs,
//! lockfiles, images and the like are dropped before prompt assembly.

use std::path::Path;

/// Extensions (lower-case, with the dot) treated as reviewable source code.
pub const CODE_EXTENSIONS: [&str; 13] = [
    ".py", ".js", ".java", ".cpp", ".c", ".h", ".cs", ".go", ".rb", ".php", ".ts", ".kt", ".swift",
];

/// Lower-cased extension of `path` including the leading dot, if any.
///
/// Dotfiles such as `.gitignore` have no extension.
pub fn extension_of(path: &str) -> Option<String> {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_ascii_lowercase()))
}

/// True when the file at `path` should be included in a review prompt.
pub fn is_reviewable_path(path: &str) -> bool {
    extension_of(path).is_some_and(|ext| CODE_EXTENSIONS.contains(&ext.as_str()))
}
