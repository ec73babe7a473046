//! Filesystem-safe character substitution.

/// Replace characters that cannot appear in a path segment.
///
/// Substitutions are applied globally, in a fixed order:
/// `?` → `--`, `/` → `__`, `:` → `~~`, `*` → `%2A`. Nothing else is
/// altered, and replacement tokens are not re-escaped, so a literal `--`
/// in the input is indistinguishable from a substituted `?`. Existing
/// mock trees on disk depend on this exact mapping.
pub fn strip_special_chars(val: &str) -> String {
    if val.is_empty() {
        return String::new();
    }
    val.replace('?', "--")
        .replace('/', "__")
        .replace(':', "~~")
        .replace('*', "%2A")
}
