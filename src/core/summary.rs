use super::errors::CoreError;

pub const STAGE: &str = "summary";

const SUMMARY_KEYWORDS: [&str; 5] = ["summary", "objective", "profile", "about", "overview"];
const STOP_PREFIXES: [&str; 4] = ["experience", "education", "skills", "work"];
const MAX_SUMMARY_LINES: usize = 4;

/// Joins the lines following the first summary-like header. Collection stops at
/// a blank line or at a line opening another section.
pub fn extract_summary(lines: &[&str]) -> Result<Option<String>, CoreError> {
    let Some(header) = lines.iter().position(|line| {
        let lowered = line.trim().to_lowercase();
        SUMMARY_KEYWORDS.iter().any(|k| lowered.contains(k))
    }) else {
        return Ok(None);
    };

    let body: Vec<&str> = lines[header + 1..]
        .iter()
        .take(MAX_SUMMARY_LINES)
        .map(|line| line.trim())
        .take_while(|line| {
            let lowered = line.to_lowercase();
            !line.is_empty() && !STOP_PREFIXES.iter().any(|p| lowered.starts_with(p))
        })
        .collect();

    if body.is_empty() {
        return Ok(None);
    }
    Ok(Some(body.join(" ")))
}
