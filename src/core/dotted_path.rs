//! Conversions between bracket-style field names (`user[address][city]`) and
//! the dot-separated paths (`user.address.city`) used to look up submitted
//! values.

/// Converts a bracket-style name to a dot path.
///
/// Malformed bracket sequences are not rejected; they produce a best-effort
/// dotted string.
pub fn to_dotted(name: &str) -> String {
    name.replace("][", ".")
        .replace(']', ".")
        .replace('[', ".")
        .trim_matches('.')
        .to_string()
}

/// Converts a dot path back to a bracket-style name: `a.b.c` -> `a[b][c]`.
pub fn to_bracketed(dot_path: &str) -> String {
    let mut parts = segments(dot_path);
    let Some(head) = parts.next() else {
        return String::new();
    };
    let mut out = head.to_string();
    for part in parts {
        out.push('[');
        out.push_str(part);
        out.push(']');
    }
    out
}

/// Joins an ancestor prefix and a local name: `prefix[name]`, or `name` at
/// the root. An unnamed element keeps its prefix as its own full name.
pub fn full_name(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else if name.is_empty() {
        prefix.to_string()
    } else {
        format!("{prefix}[{name}]")
    }
}

pub fn segments(dot_path: &str) -> impl Iterator<Item = &str> {
    dot_path.split('.').filter(|segment| !segment.is_empty())
}
