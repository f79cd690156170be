use regex::Regex;
use std::sync::LazyLock;

static NON_PORTABLE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_.-]").expect("valid regex"));

static RESERVED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|\x00-\x1f\x7f]"#).expect("valid regex"));

/// Longest component stem in bytes. Leaves room under the 255-byte file name
/// limit for a ` (n)` suffix and the extension.
pub const MAX_COMPONENT_BYTES: usize = 200;

/// Reduces an uploaded file name to a portable ASCII name.
///
/// Directory components are dropped, whitespace runs become `_`, anything
/// outside `[A-Za-z0-9_.-]` is removed and leading/trailing `.`/`_` are
/// stripped. Returns `None` when nothing usable is left, which happens for
/// names written entirely in non-Latin scripts.
pub fn secure_filename(file_name: &str) -> Option<String> {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);
    let joined = base.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned = NON_PORTABLE.replace_all(&joined, "");
    let trimmed = cleaned.trim_matches(|c: char| c == '.' || c == '_');

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Makes a factory name usable as a single path component while keeping
/// non-ASCII text intact. Long names are cut to [`MAX_COMPONENT_BYTES`] on a
/// character boundary.
pub fn sanitize_component(name: &str) -> String {
    let replaced = RESERVED.replace_all(name.trim(), "_");
    let shortened = truncate_bytes(&replaced, MAX_COMPONENT_BYTES);
    let trimmed = shortened.trim_end_matches(['.', ' ']).trim_start();

    match trimmed {
        "" | "." | ".." => "factory".to_string(),
        name => name.to_string(),
    }
}

fn truncate_bytes(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
