//! Canonical slug form for brand and model identifiers.
//!
//! Every catalog write and lookup goes through [`normalize`] so that
//! `"Land Rover"`, `"land-rover"`, and `"  LAND   ROVER "` all address the
//! same stored key. Years and categories are exempt: they come from closed,
//! already-clean sets and are matched verbatim.

/// Canonicalize a free-text brand/model identifier into a stable slug.
///
/// Trims, lowercases, collapses whitespace runs into a single hyphen, and
/// strips every character outside `[a-z0-9-]`. Idempotent: feeding the
/// output back in returns it unchanged.
#[must_use]
pub fn normalize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_hyphen = false;

    for c in raw.trim().to_lowercase().chars() {
        if c.is_whitespace() {
            pending_hyphen = !out.is_empty();
            continue;
        }
        if pending_hyphen {
            out.push('-');
            pending_hyphen = false;
        }
        if c.is_ascii_alphanumeric() || c == '-' {
            out.push(c);
        }
    }

    out
}
