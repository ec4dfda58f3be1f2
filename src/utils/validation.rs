use std::path::Path;

/// Upload extensions accepted by the service (extension check only; content
/// is not sniffed)
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether an uploaded filename carries an allowed image extension.
pub fn has_allowed_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            let ext = ext.to_lowercase();
            ALLOWED_EXTENSIONS.contains(&ext.as_str())
        })
}

/// Base name of an upload without its extension, used as the default
/// output name.
pub fn file_stem(filename: &str) -> String {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

/// Sanitizes a user-supplied output name so it stays inside the output
/// directory. Returns `None` if nothing safe remains.
///
/// Keeps only the final path component, replaces path separators and
/// reserved characters with `_`, and rejects names reduced to dots.
pub fn sanitize_output_name(name: &str) -> Option<String> {
    let name = name.trim();
    if name.is_empty() {
        return None;
    }

    // Strip any directory components
    let base = Path::new(name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("");

    if name.contains("..") || name.contains('/') || name.contains('\\') {
        tracing::warn!("Path-like output name rejected to base component: {}", name);
    }

    let sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_control()
                || c == '/'
                || c == '\\'
                || c == ':'
                || c == '*'
                || c == '?'
                || c == '"'
                || c == '<'
                || c == '>'
                || c == '|'
                || c == ';'
            {
                '_'
            } else {
                c
            }
        })
        .collect();

    let sanitized = sanitized.trim().to_string();
    if sanitized.is_empty() || sanitized.chars().all(|c| c == '.') {
        return None;
    }

    Some(sanitized)
}
