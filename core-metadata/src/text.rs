//! Prose cleanup shared by biography providers

use tracing::debug;

/// Shorter texts are stubs, not biographies
const MIN_BIO_LENGTH: usize = 50;

/// Longer texts are cut and ellipsised
const MAX_BIO_LENGTH: usize = 5000;

/// Clean and validate biography text
///
/// - Strips HTML tags
/// - Trims lines and drops blank ones
/// - Rejects very short biographies
/// - Truncates to a reasonable length
pub fn clean_biography(text: &str) -> Option<String> {
    let stripped = strip_html_tags(text);
    let cleaned = stripped
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    let length = cleaned.chars().count();
    if length < MIN_BIO_LENGTH {
        debug!("Biography too short ({} chars), rejecting", length);
        return None;
    }

    if length > MAX_BIO_LENGTH {
        let truncated = cleaned.chars().take(MAX_BIO_LENGTH).collect::<String>();
        Some(format!("{}...", truncated.trim_end()))
    } else {
        Some(cleaned)
    }
}

/// Removes the "Read more on Last.fm" anchor and the license footer after it
pub fn strip_lastfm_footer(text: &str) -> &str {
    match text.find("<a href=\"https://www.last.fm") {
        Some(index) => text[..index].trim_end(),
        None => text,
    }
}

/// Drops anything between `<` and `>`
pub fn strip_html_tags(text: &str) -> String {
    let mut output = String::with_capacity(text.len());
    let mut in_tag = false;

    for c in text.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => output.push(c),
            _ => {}
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_biography() {
        let text = "  Line one of a rather long biography text.  \n\n\n  Line two continues it here.  ";
        assert_eq!(
            clean_biography(text).as_deref(),
            Some("Line one of a rather long biography text.\nLine two continues it here.")
        );

        assert!(clean_biography("Too short").is_none());

        let long = "a".repeat(6000);
        let cleaned = clean_biography(&long).unwrap();
        assert_eq!(cleaned.chars().count(), MAX_BIO_LENGTH + 3);
        assert!(cleaned.ends_with("..."));
    }

    #[test]
    fn test_strip_lastfm_footer() {
        let text = "Soda Stereo was an Argentine rock band. <a href=\"https://www.last.fm/music/Soda+Stereo\">Read more on Last.fm</a>. User-contributed text is available under the Creative Commons By-SA License.";
        assert_eq!(
            strip_lastfm_footer(text),
            "Soda Stereo was an Argentine rock band."
        );
        assert_eq!(strip_lastfm_footer("plain"), "plain");
    }

    #[test]
    fn test_strip_html_tags() {
        assert_eq!(
            strip_html_tags("<p>Rock <b>band</b> from Chile</p>"),
            "Rock band from Chile"
        );
        assert_eq!(strip_html_tags("3 > 2"), "3 > 2");
    }
}
