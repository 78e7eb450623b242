//! JSON import and export of match lists
//!
//! Files hold an array of match objects in the `RawMatch` shape. A bad
//! element is logged and skipped; only an unreadable file or a document that
//! is not an array fails the whole import.

use serde_json::Value;
use std::path::Path;

use crate::stats::ScoreConsistency;
use crate::{MatchRecord, RacketError, RawMatch, Result};

/// Outcome of parsing an import document
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub records: Vec<MatchRecord>,
    /// Elements that could not be turned into a match
    pub skipped: usize,
    /// Imported matches whose set points disagree with their score
    pub inconsistent: usize,
}

impl ImportReport {
    /// Follow-up lines for anything that was not imported cleanly
    pub fn notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if self.skipped > 0 {
            notes.push(format!("Skipped {} invalid entries (see log)", self.skipped));
        }
        if self.inconsistent > 0 {
            notes.push(format!(
                "{} matches have set points that disagree with their score",
                self.inconsistent
            ));
        }
        notes
    }
}

/// Read and parse a JSON file
pub fn read_json<P: AsRef<Path>>(path: P) -> Result<ImportReport> {
    let content = std::fs::read_to_string(path.as_ref())?;
    log::info!("Importing matches from {}", path.as_ref().display());
    parse_json(&content)
}

pub fn parse_json(content: &str) -> Result<ImportReport> {
    let document: Value =
        serde_json::from_str(content).map_err(|e| RacketError::Parse(e.to_string()))?;
    let elements = match document {
        Value::Array(elements) => elements,
        _ => {
            return Err(RacketError::Parse(
                "expected a JSON array of matches".to_string(),
            ))
        }
    };

    let mut report = ImportReport::default();
    for (index, element) in elements.into_iter().enumerate() {
        let record = serde_json::from_value::<RawMatch>(element)
            .map_err(|e| RacketError::Parse(e.to_string()))
            .and_then(MatchRecord::try_from);

        match record {
            Ok(record) => {
                if let Some(check) = ScoreConsistency::for_record(&record) {
                    if !check.consistent {
                        log::warn!(
                            "{}: score {:?} disagrees with set points ({}-{})",
                            record.id,
                            record.score.as_deref().unwrap_or(""),
                            check.detailed_sets_won,
                            check.detailed_sets_lost
                        );
                        report.inconsistent += 1;
                    }
                }
                report.records.push(record);
            }
            Err(e) => {
                log::warn!("Skipping element {}: {}", index, e);
                report.skipped += 1;
            }
        }
    }

    log::info!(
        "Parsed {} matches ({} skipped)",
        report.records.len(),
        report.skipped
    );
    Ok(report)
}

/// Serialize matches as a pretty-printed JSON array
pub fn to_json(records: &[MatchRecord]) -> Result<String> {
    let raw: Vec<RawMatch> = records.iter().map(RawMatch::from).collect();
    serde_json::to_string_pretty(&raw).map_err(|e| RacketError::Parse(e.to_string()))
}

pub fn write_json<P: AsRef<Path>>(path: P, records: &[MatchRecord]) -> Result<()> {
    std::fs::write(path.as_ref(), to_json(records)?)?;
    log::info!(
        "Exported {} matches to {}",
        records.len(),
        path.as_ref().display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GameType, MatchId};

    const SAMPLE: &str = r#"[
        {"id": 1, "sport": "table_tennis", "game_type": "singles", "game_date": "2024-03-01",
         "result": "win", "opponent_name": "Ana", "score": "3-1",
         "detailed_score": "11-5,8-11,11-9,11-7"},
        {"id": 2, "sport": "padel", "game_type": "doubles", "game_date": "2024-03-02",
         "result": "loss", "opponent_name": "Caio", "opponent2_name": "Duda",
         "partner_name": "Bia", "score": "1-2"},
        {"id": 3, "sport": "curling", "game_type": "singles", "game_date": "2024-03-03",
         "result": "win", "opponent_name": "Ana"},
        {"id": "four"},
        {"id": 5, "sport": "tennis", "game_type": "singles", "game_date": "2024-03-05",
         "result": "win", "opponent_name": "Edu", "score": "2-0",
         "detailed_score": "6-4,3-6"}
    ]"#;

    #[test]
    fn test_parse_skips_bad_elements() {
        let report = parse_json(SAMPLE).unwrap();
        let ids: Vec<MatchId> = report.records.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![MatchId(1), MatchId(2), MatchId(5)]);
        assert_eq!(report.skipped, 2);
        assert_eq!(report.inconsistent, 1);
        assert_eq!(report.records[1].game_type(), GameType::Doubles);
        assert_eq!(report.records[1].partner(), Some("Bia"));
    }

    #[test]
    fn test_notes_report_skips_when_nothing_imported() {
        let report = parse_json(r#"[{"id": "one"}, {"id": 2, "sport": "curling"}]"#).unwrap();
        assert!(report.records.is_empty());
        assert_eq!(report.notes(), vec!["Skipped 2 invalid entries (see log)"]);

        let clean = parse_json("[]").unwrap();
        assert!(clean.notes().is_empty());

        let mixed = parse_json(SAMPLE).unwrap();
        assert_eq!(mixed.notes().len(), 2);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(matches!(parse_json("{}"), Err(RacketError::Parse(_))));
        assert!(matches!(parse_json("not json"), Err(RacketError::Parse(_))));
    }

    #[test]
    fn test_export_then_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("games.json");

        let records = parse_json(SAMPLE).unwrap().records;
        write_json(&path, &records).unwrap();

        let report = read_json(&path).unwrap();
        assert_eq!(report.records, records);
        assert_eq!(report.skipped, 0);
    }

    #[test]
    fn test_read_missing_file() {
        assert!(matches!(
            read_json("/nonexistent/games.json"),
            Err(RacketError::Io(_))
        ));
    }
}
