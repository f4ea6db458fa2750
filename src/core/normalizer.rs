/// Splits extracted document text into lines. Lines are not trimmed here.
pub fn normalize(raw_text: &str) -> Vec<&str> {
    raw_text.lines().collect()
}
