use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::config::WpmBasis;
use crate::{AVERAGE_WORD_LENGTH, Minutes, minutes};

/// Shortest duration WPM is divided by, so a near-instant finish can't divide by zero
const MIN_MINUTES: Minutes = 1.0 / 60.0;

/// Words Per Minute
pub struct Wpm;

impl Wpm {
    /// Calculate Words Per Minute, rounded to a whole number
    ///
    /// * `characters` - How many characters were typed during `minutes`
    /// * `minutes` - How many minutes have gone by
    ///
    pub fn calculate(characters: usize, minutes: Minutes) -> f64 {
        let words = characters as f64 / AVERAGE_WORD_LENGTH as f64;
        (words / minutes.max(MIN_MINUTES)).round()
    }
}

/// Typing accuracy
///
/// Accuracy describes the percentage of typed characters that match the snippet, as a value
/// between 0.0 - 100.0.
pub struct Accuracy;

impl Accuracy {
    /// Calculate typing Accuracy
    ///
    /// * `typed` - The typed buffer
    /// * `text` - The snippet the buffer is compared against
    ///
    /// An empty buffer has an accuracy of 0.
    pub fn calculate(typed: &[char], text: &[char]) -> f64 {
        if typed.is_empty() {
            return 0.0;
        }

        let correct = typed
            .iter()
            .zip(text)
            .filter(|(typed, expected)| typed == expected)
            .count();

        (correct as f64 / typed.len() as f64) * 100.0
    }
}

/// The final score of a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TypingResult {
    pub wpm: f64,
    /// Percentage between 0.0 - 100.0
    pub accuracy: f64,
    /// Time between the first accepted key and completion
    pub elapsed: Duration,
}

impl TypingResult {
    /// Score a finished session
    ///
    /// * `typed` - The final typed buffer
    /// * `text` - The snippet
    /// * `elapsed` - Time between the first accepted key and completion
    /// * `remaining_seconds` - What was left on the countdown
    /// * `basis` - Which duration WPM is divided by
    ///
    pub fn calculate(
        typed: &[char],
        text: &[char],
        elapsed: Duration,
        remaining_seconds: u32,
        basis: WpmBasis,
    ) -> Self {
        let wpm = match basis {
            WpmBasis::Elapsed => Wpm::calculate(typed.len(), minutes(elapsed.as_secs_f64())),
            WpmBasis::Remaining => {
                // Nothing left on the clock counts as a full minute
                let remaining = minutes(f64::from(remaining_seconds));
                let remaining = if remaining > 0.0 { remaining } else { 1.0 };
                Wpm::calculate(typed.len(), remaining)
            }
        };

        Self {
            wpm,
            accuracy: Accuracy::calculate(typed, text),
            elapsed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(string: &str) -> Vec<char> {
        string.chars().collect()
    }

    #[test]
    fn test_wpm() {
        // 50 characters = 10 words in one minute
        assert_eq!(Wpm::calculate(50, 1.0), 10.0);
        // 10 words in 30 seconds
        assert_eq!(Wpm::calculate(50, 0.5), 20.0);
        // Rounded
        assert_eq!(Wpm::calculate(7, 1.0), 1.0);
        assert_eq!(Wpm::calculate(0, 1.0), 0.0);
    }

    #[test]
    fn test_wpm_zero_minutes() {
        // Clamped to one second
        assert_eq!(Wpm::calculate(5, 0.0), 60.0);
        assert!(Wpm::calculate(5, 0.0).is_finite());
    }

    #[test]
    fn test_accuracy() {
        assert_eq!(Accuracy::calculate(&chars("ab"), &chars("ab")), 100.0);
        assert_eq!(Accuracy::calculate(&chars("ax"), &chars("abcd")), 50.0);
        assert_eq!(Accuracy::calculate(&chars("xyz"), &chars("abc")), 0.0);
        assert_eq!(Accuracy::calculate(&[], &chars("abc")), 0.0);
    }

    #[test]
    fn test_result_bases() {
        let typed = chars("0123456789");
        let text = typed.clone();

        let elapsed = TypingResult::calculate(
            &typed,
            &text,
            Duration::from_secs(12),
            3,
            WpmBasis::Elapsed,
        );
        // 2 words in 12 seconds
        assert_eq!(elapsed.wpm, 10.0);
        assert_eq!(elapsed.accuracy, 100.0);

        let remaining = TypingResult::calculate(
            &typed,
            &text,
            Duration::from_secs(12),
            3,
            WpmBasis::Remaining,
        );
        // 2 words in the 3 seconds left
        assert_eq!(remaining.wpm, 40.0);

        let expired = TypingResult::calculate(
            &typed,
            &text,
            Duration::from_secs(15),
            0,
            WpmBasis::Remaining,
        );
        assert_eq!(expired.wpm, 2.0);
    }
}
