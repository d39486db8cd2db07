//! Key naming transforms between canonical snake_case identifiers and the
//! spec format's CapitalCase display keys.

/// Convert a canonical key to its display form.
///
/// Splits on underscores and title-cases each segment:
/// `build_requires` → `BuildRequires`, `requires` → `Requires`.
pub fn display_key(key: &str) -> String {
    key.split('_').map(capitalize).collect()
}

/// Convert a display key back to its canonical form.
///
/// Inserts an underscore before every interior uppercase letter and
/// lowercases the result: `BuildRequires` → `build_requires`. This is the
/// exact left inverse of [`display_key`] for keys that function produces;
/// arbitrary external casing (digits, acronym runs) is not guaranteed to
/// invert.
pub fn canonical_key(display: &str) -> String {
    let mut out = String::with_capacity(display.len() + 4);
    for (i, c) in display.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Collection key for numbered directive lines: `source` → `sources`,
/// `patch` → `patches`.
///
/// Strips a trailing run of characters from the fixed vowel set `aouiey`
/// and appends `es`. A lossy heuristic for the format's own numbered keys,
/// not general English pluralization.
pub fn pluralize(key: &str) -> String {
    let stem = key.trim_end_matches(['a', 'o', 'u', 'i', 'e', 'y']);
    format!("{stem}es")
}

fn capitalize(segment: &str) -> String {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
