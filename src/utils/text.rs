/// Canonical form of a user-entered ticker: surrounding whitespace removed, uppercase.
pub fn normalize_symbol(raw: &str) -> String {
    raw.trim().to_uppercase()
}
