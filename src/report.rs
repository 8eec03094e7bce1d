//! Downstream reporting over a scored sequence.
//!
//! The scoring layer outputs a raw guess count. Consumers usually want two
//! derived views: a coarse 0-4 [`Score`] bucket for UI thresholds, and
//! [`CrackTimes`] under a handful of standard attacker throughput
//! profiles.

use serde::{Deserialize, Serialize};

use scoring::ScoredSequence;

/// Coarse strength bucket derived from the guess count.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Score {
    /// Under 10^3 guesses: trivially guessable.
    Zero,
    /// Under 10^6 guesses.
    One,
    /// Under 10^8 guesses.
    Two,
    /// Under 10^10 guesses.
    Three,
    /// 10^10 guesses and beyond.
    Four,
}

impl Score {
    /// Bucket a guess count.
    pub fn from_guesses(guesses: f64) -> Self {
        if guesses < 1e3 {
            Score::Zero
        } else if guesses < 1e6 {
            Score::One
        } else if guesses < 1e8 {
            Score::Two
        } else if guesses < 1e10 {
            Score::Three
        } else {
            Score::Four
        }
    }
}

/// Seconds to exhaust the guesses under standard attacker profiles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CrackTimes {
    /// Rate-limited online attack, 100 guesses per hour.
    pub online_throttled_100_per_hour: f64,
    /// Unthrottled online attack, 10 guesses per second.
    pub online_unthrottled_10_per_second: f64,
    /// Offline attack against a slow hash, 10^4 guesses per second.
    pub offline_slow_hashing_1e4_per_second: f64,
    /// Offline attack against a fast hash, 10^10 guesses per second.
    pub offline_fast_hashing_1e10_per_second: f64,
}

impl CrackTimes {
    /// Crack times for a guess count.
    pub fn from_guesses(guesses: f64) -> Self {
        Self {
            online_throttled_100_per_hour: guesses / (100.0 / 3600.0),
            online_unthrottled_10_per_second: guesses / 10.0,
            offline_slow_hashing_1e4_per_second: guesses / 1e4,
            offline_fast_hashing_1e10_per_second: guesses / 1e10,
        }
    }
}

/// Format a duration in seconds for display.
pub fn display_duration(seconds: f64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 3600.0;
    const DAY: f64 = 86_400.0;
    const YEAR: f64 = 31_557_600.0;
    const CENTURY: f64 = YEAR * 100.0;

    if seconds < 1.0 {
        "less than a second".to_string()
    } else if seconds < MINUTE {
        format!("{seconds:.1}s")
    } else if seconds < HOUR {
        format!("{:.1}m", seconds / MINUTE)
    } else if seconds < DAY {
        format!("{:.1}h", seconds / HOUR)
    } else if seconds < YEAR {
        format!("{:.1}d", seconds / DAY)
    } else if seconds < CENTURY {
        format!("{:.1}y", seconds / YEAR)
    } else {
        "centuries".to_string()
    }
}

/// Full strength report for one password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrengthReport {
    /// The scored password.
    pub password: String,
    /// Total attacker work for the selected cover.
    pub guesses: f64,
    /// `log10(guesses)`.
    pub guesses_log10: f64,
    /// Coarse 0-4 strength bucket.
    pub score: Score,
    /// Crack times under standard attacker profiles.
    pub crack_times: CrackTimes,
    /// The selected cover, in order.
    pub sequence: Vec<patterns::Match>,
}

impl From<ScoredSequence> for StrengthReport {
    fn from(value: ScoredSequence) -> Self {
        let score = Score::from_guesses(value.guesses);
        let crack_times = CrackTimes::from_guesses(value.guesses);
        Self {
            password: value.password,
            guesses: value.guesses,
            guesses_log10: value.guesses_log10,
            score,
            crack_times,
            sequence: value.sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_buckets_follow_thresholds() {
        assert_eq!(Score::from_guesses(1.0), Score::Zero);
        assert_eq!(Score::from_guesses(999.0), Score::Zero);
        assert_eq!(Score::from_guesses(1e3), Score::One);
        assert_eq!(Score::from_guesses(1e6), Score::Two);
        assert_eq!(Score::from_guesses(1e8), Score::Three);
        assert_eq!(Score::from_guesses(1e10), Score::Four);
        assert_eq!(Score::from_guesses(f64::MAX), Score::Four);
    }

    #[test]
    fn score_ordering_supports_thresholds() {
        assert!(Score::Four > Score::Three);
        assert!(Score::from_guesses(1e12) >= Score::Three);
    }

    #[test]
    fn crack_times_scale_with_rate() {
        let times = CrackTimes::from_guesses(1e6);
        assert_eq!(times.online_unthrottled_10_per_second, 1e5);
        assert_eq!(times.offline_slow_hashing_1e4_per_second, 100.0);
        assert_eq!(times.offline_fast_hashing_1e10_per_second, 1e-4);
        assert!(times.online_throttled_100_per_hour > times.online_unthrottled_10_per_second);
    }

    #[test]
    fn display_duration_picks_sensible_units() {
        assert_eq!(display_duration(0.5), "less than a second");
        assert_eq!(display_duration(30.0), "30.0s");
        assert_eq!(display_duration(120.0), "2.0m");
        assert_eq!(display_duration(7200.0), "2.0h");
        assert_eq!(display_duration(172_800.0), "2.0d");
        assert_eq!(display_duration(63_115_200.0), "2.0y");
        assert_eq!(display_duration(1e13), "centuries");
    }

    #[test]
    fn report_from_sequence_carries_fields_through() {
        let seq = ScoredSequence {
            password: "zxcvbn".into(),
            guesses: 2.0,
            guesses_log10: 2.0_f64.log10(),
            sequence: Vec::new(),
        };
        let report = StrengthReport::from(seq);
        assert_eq!(report.password, "zxcvbn");
        assert_eq!(report.guesses, 2.0);
        assert_eq!(report.score, Score::Zero);
        assert_eq!(report.crack_times.online_unthrottled_10_per_second, 0.2);
    }
}
