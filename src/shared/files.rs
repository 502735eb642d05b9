use std::path::Path;

/// Longest extension kept when staging or naming uploaded files
const MAX_EXTENSION_LEN: usize = 16;

/// Extension of a client-supplied file name, without the leading dot.
///
/// Returns `None` when the name has no extension or the extension contains
/// anything other than ASCII alphanumerics.
pub fn file_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| {
            !ext.is_empty()
                && ext.len() <= MAX_EXTENSION_LEN
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
}
