//! Path helpers for logical file names.
//!
//! Lookup in a [`VirtualFileList`](crate::VirtualFileList) is always exact
//! string equality. These helpers are only used by importers to build the
//! path of a side-car file from the path of the document that references it,
//! and to extract a display name for diagnostics.

/// Separator used by every virtual path.
pub const SEPARATOR: char = '/';

/// Return the last segment of a path (the part after the final `/`).
///
/// Returns the whole path when it contains no separator.
pub fn file_name(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[pos + 1..],
        None => path,
    }
}

/// Return everything before the final `/`, or `""` for a bare file name.
pub fn parent(path: &str) -> &str {
    match path.rfind(SEPARATOR) {
        Some(pos) => &path[..pos],
        None => "",
    }
}

/// Return the lowercase extension of a path, without the dot.
pub fn extension(path: &str) -> Option<String> {
    let name = file_name(path);
    let pos = name.rfind('.')?;
    let ext = &name[pos + 1..];
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_ascii_lowercase())
    }
}

/// Resolve a reference found inside `document` to a logical path.
///
/// The reference is interpreted relative to the directory of `document`.
/// Backslashes are treated as separators, `.` segments are dropped and `..`
/// segments climb one directory (never above the root of the list).
pub fn resolve_relative(document: &str, reference: &str) -> String {
    let reference = reference.trim().replace('\\', "/");
    let mut segments: Vec<&str> = if reference.starts_with(SEPARATOR) {
        Vec::new()
    } else {
        parent(document)
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .collect()
    };

    for segment in reference.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    segments.join("/")
}
