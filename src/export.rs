//! Wide-table export: pivot long-format records into one TSV per
//! (grain, measure).
//!
//! ```text
//! ScoreSheet → pivot() → WideTable per (grain, measure)
//!   → {grain}_{model_tag}_{measure}.tsv
//!
//! compound      1850    1860    1870
//! green house   0.41    0.38
//! bus stop      0.12    0.20    0.33
//! ```
//!
//! Rows are sorted by compound, columns by time unit. Missing scores are
//! empty cells. Existing files are never overwritten: they are skipped
//! with a warning.

use std::collections::{BTreeMap, BTreeSet};
use std::io::Write;
use std::path::{Path, PathBuf};

use hashbrown::HashMap;

use crate::model::*;
use crate::{Error, Result};

/// One measure of one grain: rows = compounds, columns = time units.
#[derive(Debug, Clone, PartialEq)]
pub struct WideTable {
    pub grain: Grain,
    pub measure: String,
    pub columns: Vec<String>,
    /// `(compound, one cell per column)`
    pub rows: Vec<(String, Vec<Score>)>,
}

impl WideTable {
    pub fn file_name(&self, model_tag: &str) -> String {
        format!("{}_{}_{}.tsv", self.grain, model_tag, self.measure)
    }

    pub fn cell(&self, compound: &str, column: &str) -> Option<Score> {
        let col = self.columns.iter().position(|c| c == column)?;
        self.rows
            .iter()
            .find(|(name, _)| name == compound)
            .map(|(_, cells)| cells[col])
    }
}

/// Pivot a sheet into one table per (grain, measure), in first-seen order.
///
/// Two records for the same (grain, measure, compound, time unit) are an
/// error: the table would have to silently drop one.
pub fn pivot(sheet: &ScoreSheet) -> Result<Vec<WideTable>> {
    type Cells = BTreeMap<String, BTreeMap<String, Score>>;

    let mut order: Vec<(Grain, &str)> = Vec::new();
    let mut groups: HashMap<(Grain, &str), Cells> = HashMap::new();

    for record in sheet.records() {
        let key = (record.grain, record.measure.as_str());
        let cells = groups.entry(key).or_insert_with(|| {
            order.push(key);
            Cells::new()
        });
        let time = record.time.to_string();
        let row = cells.entry(record.compound.clone()).or_default();
        if row.insert(time.clone(), record.score).is_some() {
            return Err(Error::DuplicateScore {
                compound: record.compound.clone(),
                time,
                measure: record.measure.clone(),
            });
        }
    }

    let tables = order
        .into_iter()
        .filter_map(|key| groups.remove(&key).map(|cells| (key, cells)))
        .map(|((grain, measure), cells)| {
            let columns: Vec<String> = cells
                .values()
                .flat_map(|row| row.keys().cloned())
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let rows = cells
                .into_iter()
                .map(|(compound, row)| {
                    let values = columns
                        .iter()
                        .map(|c| row.get(c).copied().unwrap_or(Score::MISSING))
                        .collect();
                    (compound, values)
                })
                .collect();
            WideTable { grain, measure: measure.to_string(), columns, rows }
        })
        .collect();
    Ok(tables)
}

/// Write one table as TSV.
pub fn write_table(table: &WideTable, writer: &mut dyn Write) -> Result<()> {
    write!(writer, "compound")?;
    for column in &table.columns {
        write!(writer, "\t{column}")?;
    }
    writeln!(writer)?;

    for (compound, cells) in &table.rows {
        write!(writer, "{compound}")?;
        for score in cells {
            write!(writer, "\t{score}")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Files written and skipped by `write_tables`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
}

/// Pivot `sheet` and write every table into `out_dir`.
///
/// A file that already exists is left untouched; the only effect is a
/// warning and an entry in `WriteReport::skipped`.
pub fn write_tables(sheet: &ScoreSheet, out_dir: &Path, model_tag: &str) -> Result<WriteReport> {
    let mut report = WriteReport::default();

    for table in pivot(sheet)? {
        let path = out_dir.join(table.file_name(model_tag));
        if write_new_file(&path, |writer| write_table(&table, writer))? {
            report.written.push(path);
        } else {
            tracing::warn!(path = %path.display(), "not writing output because file exists");
            report.skipped.push(path);
        }
    }

    tracing::info!(
        dir = %out_dir.display(),
        written = report.written.len(),
        skipped = report.skipped.len(),
        "outputs written"
    );
    Ok(report)
}

/// Create `path` with whatever `fill` writes, unless `path` exists.
///
/// Content goes to a temporary file next to `path` and is moved into place
/// only once complete, so a failed write leaves nothing at `path`. Returns
/// `false` if `path` already existed.
pub fn write_new_file<F>(path: &Path, fill: F) -> Result<bool>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    if path.exists() {
        return Ok(false);
    }
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    {
        let mut writer = std::io::BufWriter::new(tmp.as_file_mut());
        fill(&mut writer)?;
        writer.flush()?;
    }
    match tmp.persist_noclobber(path) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == std::io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

/// Dump the long-format records as JSON lines.
pub fn write_records_jsonl(sheet: &ScoreSheet, writer: &mut dyn Write) -> Result<()> {
    for record in sheet.records() {
        serde_json::to_writer(&mut *writer, record)?;
        writeln!(writer)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(compound: &str, time: &str, measure: &str, score: Score) -> ScoreRecord {
        ScoreRecord {
            compound: compound.into(),
            grain: Grain::Fine,
            time: TimeUnit::Slice(time.into()),
            measure: measure.into(),
            score,
        }
    }

    #[test]
    fn test_pivot_fills_gaps_with_missing() {
        let mut sheet = ScoreSheet::new();
        sheet.push(record("gold mine", "1860", "cpd-head", Score::new(0.5)));
        sheet.push(record("bus stop", "1850", "cpd-head", Score::new(0.25)));
        sheet.push(record("bus stop", "1860", "cpd-head", Score::MISSING));

        let tables = pivot(&sheet).unwrap();
        assert_eq!(tables.len(), 1);
        let t = &tables[0];
        assert_eq!(t.columns, vec!["1850", "1860"]);
        assert_eq!(t.rows[0].0, "bus stop");
        assert_eq!(t.cell("gold mine", "1850"), Some(Score::MISSING));
        assert_eq!(t.cell("gold mine", "1860"), Some(Score::new(0.5)));
    }

    #[test]
    fn test_write_table_format() {
        let mut sheet = ScoreSheet::new();
        sheet.push(record("bus stop", "1850", "m", Score::new(1.0)));
        sheet.push(record("bus stop", "1860", "m", Score::MISSING));
        let table = &pivot(&sheet).unwrap()[0];

        let mut out = Vec::new();
        write_table(table, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "compound\t1850\t1860\nbus stop\t1.0\t\n");
    }

    #[test]
    fn test_duplicate_scores_are_rejected() {
        let mut sheet = ScoreSheet::new();
        sheet.push(record("bus stop", "1850", "m", Score::new(1.0)));
        sheet.push(record("bus stop", "1850", "m", Score::new(0.0)));
        assert!(matches!(pivot(&sheet), Err(Error::DuplicateScore { .. })));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fine_w2v_cpd-head.tsv");

        let result = write_new_file(&path, |w| {
            write!(w, "compound\t1850\nbus stop\t0.")?;
            Err(Error::Io(std::io::Error::other("disk full")))
        });
        assert!(matches!(result, Err(Error::Io(_))));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        // Nothing blocks the next attempt
        assert!(write_new_file(&path, |w| Ok(writeln!(w, "complete")?)).unwrap());
        assert!(!write_new_file(&path, |w| Ok(writeln!(w, "other")?)).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "complete\n");
    }

    #[test]
    fn test_jsonl_records() {
        let mut sheet = ScoreSheet::new();
        sheet.push(record("bus stop", "1850", "m", Score::MISSING));
        let mut out = Vec::new();
        write_records_jsonl(&sheet, &mut out).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert_eq!(
            line.trim_end(),
            r#"{"compound":"bus stop","grain":"fine","time":"1850","measure":"m","score":null}"#
        );
    }
}
