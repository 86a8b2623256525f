//! Minimal `key = value` reader shared by `theme.conf` and `keybinds.conf`.

/// Yield trimmed `(key, value)` pairs, skipping blank lines, `#` comments and
/// lines where either side is empty. Only the first `=` splits.
pub fn parse_kv(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (lhs, rhs) = line.split_once('=')?;
        let (lhs, rhs) = (lhs.trim(), rhs.trim());
        if lhs.is_empty() || rhs.is_empty() {
            return None;
        }
        Some((lhs, rhs))
    })
}
