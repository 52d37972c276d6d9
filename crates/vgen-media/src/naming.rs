//! Artifact file naming.

use chrono::{DateTime, Local, TimeZone};

/// Characters of the prompt kept in a file name.
const PROMPT_SLUG_CHARS: usize = 30;

/// File name for a video generated from `prompt` at `at`.
///
/// Produces `{YYYYmmdd_HHMMSS}_{slug}.mp4`, where the slug is the first 30
/// characters of the prompt with spaces and path separators replaced by
/// underscores.
pub fn artifact_filename<Tz: TimeZone>(prompt: &str, at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.mp4", at.format("%Y%m%d_%H%M%S"), prompt_slug(prompt))
}

/// File name for a video generated from `prompt` now, in local time.
pub fn artifact_filename_now(prompt: &str) -> String {
    artifact_filename(prompt, &Local::now())
}

fn prompt_slug(prompt: &str) -> String {
    prompt
        .chars()
        .take(PROMPT_SLUG_CHARS)
        .map(|c| match c {
            ' ' | '/' | '\\' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_filename_format() {
        let at = Utc.with_ymd_and_hms(2026, 2, 19, 18, 42, 0).unwrap();
        assert_eq!(
            artifact_filename("A futuristic city", &at),
            "20260219_184200_A_futuristic_city.mp4"
        );
    }

    #[test]
    fn test_slug_truncates_and_sanitizes() {
        let at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let name = artifact_filename("one/two three four five six seven eight", &at);
        assert_eq!(name, "20260101_000000_one_two_three_four_five_six_se.mp4");
    }

    #[test]
    fn test_slug_counts_chars_not_bytes() {
        let slug = prompt_slug(&"ü".repeat(40));
        assert_eq!(slug.chars().count(), 30);
    }
}
