//! Slash-path tokenization and conflict-rename name variants.

/// Characters a node name may not contain. `/` cannot occur in a name at
/// all since names arrive as path components.
pub const FORBIDDEN_CHARS: &[char] = &['\\', '?', ':', '*', '"', '>', '<', '|'];

/// Split a path into its non-empty components. Leading, trailing and
/// duplicate separators are ignored, so `"/a//b/"` is `["a", "b"]`.
pub fn tokenize(path: &str) -> Vec<&str> {
    path.split('/').filter(|t| !t.is_empty()).collect()
}

/// Absolute path for a token list; the empty list joins to `""`.
pub fn join(tokens: &[&str]) -> String {
    tokens
        .iter()
        .fold(String::new(), |acc, t| format!("{}/{}", acc, t))
}

/// Whether `name` is usable as a node name.
pub fn valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(FORBIDDEN_CHARS)
}

/// Next rename-mode candidate for a contested name: `c.png` becomes
/// `c(1).png`, `c(1).png` becomes `c(2).png`, and so on. The numeric
/// suffix is parsed from the basename, not appended blindly.
pub fn next_variant(name: &str) -> String {
    let (base, ext) = split_extension(name);
    let (stem, n) = match parse_suffix(base) {
        Some((stem, n)) => (stem, n + 1),
        None => (base, 1),
    };
    format!("{}({}){}", stem, n, ext)
}

/// Split into basename and extension (including the dot). A leading dot
/// is part of the basename, so `".profile"` has no extension.
fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => name.split_at(idx),
        _ => (name, ""),
    }
}

/// Parse a trailing `(n)` suffix off a basename.
fn parse_suffix(base: &str) -> Option<(&str, u64)> {
    let inner = base.strip_suffix(')')?;
    let open = inner.rfind('(')?;
    let digits = &inner[open + 1..];
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let n = digits.parse().ok()?;
    Some((&inner[..open], n))
}
