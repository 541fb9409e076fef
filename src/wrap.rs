//! Greedy word wrapping against an injected width measurement.

use anyhow::bail;

/// Wraps `text` into lines whose measured width stays within `max_width`.
///
/// Tokens are separated by any run of whitespace; the original spacing is
/// not preserved. A token that is wider than `max_width` on its own is
/// emitted alone on its line, never split or dropped, so joining the result
/// with single spaces always gives back the token sequence.
///
/// `measure` returns the rendered width of a candidate line in pixels.
///
/// # Errors
/// Returns an error if `max_width` is not a positive finite number.
pub fn wrap_text<F>(text: &str, mut measure: F, max_width: f32) -> anyhow::Result<Vec<String>>
where
    F: FnMut(&str) -> f32,
{
    if !max_width.is_finite() || max_width <= 0.0 {
        bail!("max_width must be a positive finite number, got {max_width}");
    }

    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let trial = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if measure(&trial) <= max_width {
            current = trial;
        } else if current.is_empty() {
            // Oversized on its own.
            lines.push(word.to_string());
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Ten pixels per character, spaces included.
    fn mono(s: &str) -> f32 {
        s.chars().count() as f32 * 10.0
    }

    fn tokens(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn test_empty_text_gives_no_lines() {
        assert!(wrap_text("", mono, 100.0).unwrap().is_empty());
        assert!(wrap_text("   \n\t ", mono, 100.0).unwrap().is_empty());
    }

    #[test]
    fn test_oversized_single_word_is_kept_whole() {
        assert_eq!(wrap_text("hello", mono, 1.0).unwrap(), vec!["hello"]);
    }

    #[test]
    fn test_fitting_text_stays_on_one_line() {
        assert_eq!(wrap_text("a b c", mono, 50.0).unwrap(), vec!["a b c"]);
    }

    #[test]
    fn test_greedy_fill() {
        let lines = wrap_text("the quick brown fox jumps", mono, 100.0).unwrap();
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn test_oversized_word_between_short_words() {
        let lines = wrap_text("a enormousword b c", mono, 50.0).unwrap();
        assert_eq!(lines, vec!["a", "enormousword", "b c"]);
    }

    #[test]
    fn test_consecutive_whitespace_separates_tokens() {
        let lines = wrap_text("one   two\nthree\tfour", mono, 1000.0).unwrap();
        assert_eq!(lines, vec!["one two three four"]);
    }

    #[test]
    fn test_zero_width_measure_puts_everything_on_one_line() {
        let lines = wrap_text("many words that would never fit", |_| 0.0, 1.0).unwrap();
        assert_eq!(lines, vec!["many words that would never fit"]);
    }

    #[test]
    fn test_rejects_non_positive_width() {
        assert!(wrap_text("a", mono, 0.0).is_err());
        assert!(wrap_text("a", mono, -5.0).is_err());
        assert!(wrap_text("a", mono, f32::NAN).is_err());
        assert!(wrap_text("a", mono, f32::INFINITY).is_err());
    }

    #[test]
    fn test_lines_rejoin_to_token_sequence_and_fit() {
        let samples = [
            "Lorem ipsum dolor sit amet, consectetur adipiscing elit",
            "a bb ccc dddd eeeee ffffff ggggggg hhhhhhhh",
            "supercalifragilisticexpialidocious is long",
            "x",
            "  leading and trailing   ",
        ];
        for text in samples {
            for max_width in [1.0, 30.0, 75.0, 120.0, 10_000.0] {
                let lines = wrap_text(text, mono, max_width).unwrap();

                let rejoined = lines.join(" ");
                assert_eq!(tokens(&rejoined), tokens(text), "text={text:?} w={max_width}");

                for line in &lines {
                    let single_word = !line.contains(' ');
                    assert!(
                        mono(line) <= max_width || single_word,
                        "line {line:?} exceeds {max_width}"
                    );
                }
            }
        }
    }
}
