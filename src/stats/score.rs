//! Score string parsing and set-score validation
//!
//! Summary scores come in two shapes:
//! - `"1-0 (3-0)"`: match tally outside, set score inside the parentheses
//! - `"3-0 (11-5, 11-3, 11-7)"`: set score outside, points per set inside
//!
//! Anything unrecognised parses as zero sets rather than failing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::{MatchRecord, MatchResult};

static PAREN_GROUP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\(([^)]+)\)").expect("paren pattern compiles"));
static PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)-([0-9]+)").expect("pair pattern compiles"));
static LEADING_PAIR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+)-([0-9]+)").expect("leading pair pattern compiles"));

/// Sets won and lost as read from a summary score
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScoreSummary {
    pub sets_won: u32,
    pub sets_lost: u32,
    pub balance: i64,
}

impl ScoreSummary {
    pub fn new(sets_won: u32, sets_lost: u32) -> Self {
        ScoreSummary {
            sets_won,
            sets_lost,
            balance: sets_won as i64 - sets_lost as i64,
        }
    }
}

/// Parse a summary score into sets won/lost
pub fn parse_score(score: Option<&str>) -> ScoreSummary {
    let score = match score {
        Some(s) if !s.is_empty() => s,
        _ => return ScoreSummary::default(),
    };

    if let Some(inner) = PAREN_GROUP.captures(score).and_then(|c| c.get(1)) {
        let inner = inner.as_str();
        // A comma means per-set points; the set count is the leading pair
        if !inner.contains(',') {
            if let Some(summary) = capture_pair(&PAIR, inner) {
                return summary;
            }
        }
    }

    capture_pair(&LEADING_PAIR, score).unwrap_or_default()
}

fn capture_pair(pattern: &Regex, text: &str) -> Option<ScoreSummary> {
    let caps = pattern.captures(text)?;
    let won = caps[1].parse::<u32>().ok()?;
    let lost = caps[2].parse::<u32>().ok()?;
    Some(ScoreSummary::new(won, lost))
}

/// Format a set score the way it is stored
pub fn format_score(sets_won: u32, sets_lost: u32) -> String {
    format!("{}-{}", sets_won, sets_lost)
}

/// Leading unsigned integer after optional whitespace ("11 " -> 11, "x" -> None)
fn leading_int(text: &str) -> Option<u32> {
    let trimmed = text.trim_start();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Points for one set, from the logging player's side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetScore {
    pub you: u32,
    pub opponent: u32,
}

impl SetScore {
    /// Parse `"you-opp"`. Needs exactly one dash; a side without digits counts as 0.
    pub fn parse(text: &str) -> Option<Self> {
        let mut parts = text.split('-');
        let (you, opponent) = (parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(SetScore {
            you: leading_int(you).unwrap_or(0),
            opponent: leading_int(opponent).unwrap_or(0),
        })
    }

    /// Parse `"you-opp"` only when both sides start with a number
    pub fn parse_strict(text: &str) -> Option<Self> {
        let mut parts = text.split('-');
        let (you, opponent) = (parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }
        Some(SetScore {
            you: leading_int(you)?,
            opponent: leading_int(opponent)?,
        })
    }

    pub fn won(&self) -> bool {
        self.you > self.opponent
    }

    pub fn lost(&self) -> bool {
        self.opponent > self.you
    }
}

/// Split a stored detailed score ("11-5,8-11,12-10") into sets
pub fn parse_detailed_score(detailed: &str) -> Vec<SetScore> {
    detailed
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(SetScore::parse)
        .collect()
}

/// Whether per-set points agree with the summary set score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreConsistency {
    pub detailed_sets_won: u32,
    pub detailed_sets_lost: u32,
    pub consistent: bool,
}

impl ScoreConsistency {
    /// Tied sets count for neither side
    pub fn check(sets_won: u32, sets_lost: u32, sets: &[SetScore]) -> Self {
        let detailed_sets_won = sets.iter().filter(|s| s.won()).count() as u32;
        let detailed_sets_lost = sets.iter().filter(|s| s.lost()).count() as u32;
        ScoreConsistency {
            detailed_sets_won,
            detailed_sets_lost,
            consistent: detailed_sets_won == sets_won && detailed_sets_lost == sets_lost,
        }
    }

    /// Check a `"won-lost"` sets score against individual `"you-opp"` entries
    pub fn check_strings(sets_score: &str, detailed_sets: &[&str]) -> Self {
        let mut parts = sets_score.split('-');
        let sets_won = parts.next().and_then(leading_int).unwrap_or(0);
        let sets_lost = parts.next().and_then(leading_int).unwrap_or(0);
        let sets: Vec<SetScore> = detailed_sets
            .iter()
            .filter_map(|s| SetScore::parse(s))
            .collect();
        Self::check(sets_won, sets_lost, &sets)
    }

    /// Check a stored record; `None` when it has no detailed score
    pub fn for_record(record: &MatchRecord) -> Option<Self> {
        let detailed = record.detailed_score.as_deref()?;
        let sets = parse_detailed_score(detailed);
        if sets.is_empty() {
            return None;
        }
        let summary = parse_score(record.score.as_deref());
        Some(Self::check(summary.sets_won, summary.sets_lost, &sets))
    }
}

/// Outcome derived from entered set points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetTally {
    pub sets_won: u32,
    pub sets_lost: u32,
    pub valid_sets: u32,
    /// `None` until at least one set has points
    pub result: Option<MatchResult>,
}

impl SetTally {
    /// Tally entered `"you-opp"` sets; entries with a non-numeric side are skipped
    pub fn from_entries(entries: &[&str]) -> Self {
        let sets: Vec<SetScore> = entries
            .iter()
            .filter_map(|e| SetScore::parse_strict(e))
            .collect();
        Self::from_sets(&sets)
    }

    /// A set with no points on either side is ignored
    pub fn from_sets(sets: &[SetScore]) -> Self {
        let mut tally = SetTally {
            sets_won: 0,
            sets_lost: 0,
            valid_sets: 0,
            result: None,
        };

        for set in sets.iter().filter(|s| s.you > 0 || s.opponent > 0) {
            tally.valid_sets += 1;
            if set.won() {
                tally.sets_won += 1;
            } else if set.lost() {
                tally.sets_lost += 1;
            }
        }

        tally.result = match tally.sets_won.cmp(&tally.sets_lost) {
            std::cmp::Ordering::Greater => Some(MatchResult::Win),
            std::cmp::Ordering::Less => Some(MatchResult::Loss),
            std::cmp::Ordering::Equal if tally.valid_sets > 0 => Some(MatchResult::Draw),
            std::cmp::Ordering::Equal => None,
        };
        tally
    }

    /// Summary score string for the tally
    pub fn score(&self) -> String {
        format_score(self.sets_won, self.sets_lost)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score_with_set_points() {
        assert_eq!(
            parse_score(Some("3-0 (11-5, 11-3, 11-7)")),
            ScoreSummary { sets_won: 3, sets_lost: 0, balance: 3 }
        );
    }

    #[test]
    fn test_parse_score_with_set_score_in_parens() {
        // Outer 1-0 is the match tally and is ignored
        assert_eq!(
            parse_score(Some("1-0 (3-0)")),
            ScoreSummary { sets_won: 3, sets_lost: 0, balance: 3 }
        );
        assert_eq!(parse_score(Some("0-1 (1-3)")).balance, -2);
    }

    #[test]
    fn test_parse_score_plain_and_empty() {
        assert_eq!(parse_score(Some("2-1")), ScoreSummary::new(2, 1));
        assert_eq!(parse_score(Some("2-1")).balance, 1);
        assert_eq!(parse_score(None), ScoreSummary::default());
        assert_eq!(parse_score(Some("")), ScoreSummary::default());
    }

    #[test]
    fn test_parse_score_malformed() {
        assert_eq!(parse_score(Some("won easily")), ScoreSummary::default());
        // Leading pair is anchored
        assert_eq!(parse_score(Some(" 2-1")), ScoreSummary::default());
        // Paren content without a pair falls back to the leading pair
        assert_eq!(parse_score(Some("2-0 (retired)")), ScoreSummary::new(2, 0));
        // Overflowing numbers are treated as unparseable
        assert_eq!(parse_score(Some("99999999999-1")), ScoreSummary::default());
        // Non-ASCII digits are not set counts
        assert_eq!(parse_score(Some("٣-٠")), ScoreSummary::default());
    }

    #[test]
    fn test_parse_score_is_pure_and_round_trips() {
        for (won, lost) in [(0, 0), (2, 1), (1, 3), (12, 10)] {
            let formatted = format_score(won, lost);
            let first = parse_score(Some(&formatted));
            assert_eq!(first, parse_score(Some(&formatted)));
            assert_eq!((first.sets_won, first.sets_lost), (won, lost));
        }
    }

    #[test]
    fn test_set_score_parse() {
        assert_eq!(SetScore::parse("11-5"), Some(SetScore { you: 11, opponent: 5 }));
        assert_eq!(SetScore::parse(" 8 - 11"), Some(SetScore { you: 8, opponent: 11 }));
        assert_eq!(SetScore::parse("x-11"), Some(SetScore { you: 0, opponent: 11 }));
        assert_eq!(SetScore::parse("11"), None);
        assert_eq!(SetScore::parse("11-5-3"), None);
    }

    #[test]
    fn test_consistency_matches_in_order() {
        let check = ScoreConsistency::check_strings("2-1", &["11-5", "8-11", "11-7"]);
        assert_eq!(check.detailed_sets_won, 2);
        assert_eq!(check.detailed_sets_lost, 1);
        assert!(check.consistent);
    }

    #[test]
    fn test_consistency_is_order_independent() {
        let check = ScoreConsistency::check_strings("2-1", &["11-5", "11-3", "8-11"]);
        assert_eq!((check.detailed_sets_won, check.detailed_sets_lost), (2, 1));
        assert!(check.consistent);
    }

    #[test]
    fn test_consistency_detects_mismatch() {
        let check = ScoreConsistency::check_strings("2-1", &["8-11", "8-11", "8-11"]);
        assert_eq!((check.detailed_sets_won, check.detailed_sets_lost), (0, 3));
        assert!(!check.consistent);
    }

    #[test]
    fn test_consistency_tied_set_counts_for_neither() {
        let sets = parse_detailed_score("11-5, 10-10,11-9");
        assert_eq!(sets.len(), 3);
        let check = ScoreConsistency::check(2, 0, &sets);
        assert!(check.consistent);
    }

    #[test]
    fn test_consistency_for_record() {
        use crate::stats::test_support::make_match;
        use crate::MatchResult::Win;

        let mut record = make_match(1, "2024-02-01", Win, Some("2-1"));
        assert_eq!(ScoreConsistency::for_record(&record), None);

        record.detailed_score = Some("11-5,8-11,11-7".to_string());
        assert!(ScoreConsistency::for_record(&record).unwrap().consistent);

        record.detailed_score = Some("11-5,11-8".to_string());
        assert!(!ScoreConsistency::for_record(&record).unwrap().consistent);
    }

    #[test]
    fn test_set_tally() {
        let tally = SetTally::from_sets(&parse_detailed_score("11-5,8-11,12-10"));
        assert_eq!((tally.sets_won, tally.sets_lost, tally.valid_sets), (2, 1, 3));
        assert_eq!(tally.result, Some(MatchResult::Win));
        assert_eq!(tally.score(), "2-1");

        let draw = SetTally::from_sets(&parse_detailed_score("6-4,4-6"));
        assert_eq!(draw.result, Some(MatchResult::Draw));

        let empty = SetTally::from_sets(&parse_detailed_score("0-0"));
        assert_eq!(empty.valid_sets, 0);
        assert_eq!(empty.result, None);
    }

    #[test]
    fn test_set_tally_skips_non_numeric_sides() {
        assert_eq!(SetScore::parse_strict("x-11"), None);
        assert_eq!(SetScore::parse_strict("11-"), None);
        assert_eq!(SetScore::parse_strict(" 8 - 11"), Some(SetScore { you: 8, opponent: 11 }));

        let tally = SetTally::from_entries(&["11-5", "x-11"]);
        assert_eq!((tally.sets_won, tally.sets_lost, tally.valid_sets), (1, 0, 1));
        assert_eq!(tally.result, Some(MatchResult::Win));

        // the consistency check still reads a blank side as 0
        assert!(ScoreConsistency::check_strings("1-1", &["11-5", "x-11"]).consistent);
    }
}
