// File sinks
//
// Files are created (parents included) and overwritten in place. There is no
// append mode and no atomic rename: an interrupted write leaves a partial file.

use crate::{Error, Result};
use beatdump_engine::{LogRow, MetricRow, Normalized, Tables, TraceRow};
use beatdump_types::TimeRange;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One formatted line per record in a single file per chunk
    #[default]
    Text,
    /// One CSV file per category per chunk
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| Error::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    Ok(())
}

/// Write `lines` to `path`, each terminated by a newline
pub fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    ensure_parent(path)?;
    let write_err = |source| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_err)?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writer.write_all(line.as_bytes()).map_err(write_err)?;
        writer.write_all(b"\n").map_err(write_err)?;
    }
    writer.flush().map_err(write_err)?;
    Ok(())
}

/// Write `rows` to `path` as CSV with a header row
///
/// With no rows the file holds `columns` alone.
pub fn write_csv<S: Serialize>(path: &Path, columns: &[&str], rows: &[S]) -> Result<()> {
    ensure_parent(path)?;
    let csv_err = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    if rows.is_empty() {
        writer.write_record(columns).map_err(csv_err)?;
    }
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(())
}

/// Names and writes the output files of each chunk under one directory
#[derive(Debug, Clone)]
pub struct Sink {
    dir: PathBuf,
    format: OutputFormat,
}

impl Sink {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// `<dir>/metricbeat-logs.<start>-<end>`
    pub fn text_path(&self, range: &TimeRange) -> PathBuf {
        self.dir
            .join(format!("metricbeat-logs.{}", range.file_label()))
    }

    /// `<dir>/metricbeat-<category>.<start>-<end>.csv`
    pub fn csv_path(&self, range: &TimeRange, category: &str) -> PathBuf {
        self.dir
            .join(format!("metricbeat-{}.{}.csv", category, range.file_label()))
    }

    /// Write the text file for one chunk; an empty chunk still gets a file
    pub fn write_text(&self, range: &TimeRange, normalized: &Normalized) -> Result<PathBuf> {
        let path = self.text_path(range);
        write_lines(&path, &normalized.lines)?;
        Ok(path)
    }

    /// Write one CSV file per category, header-only when it has no rows
    ///
    /// Every category is written so a rerun into the same directory never
    /// leaves a stale table from an earlier run.
    pub fn write_tables(&self, range: &TimeRange, tables: &Tables) -> Result<Vec<PathBuf>> {
        let metrics = self.csv_path(range, "metrics");
        write_csv(&metrics, MetricRow::COLUMNS, &tables.metrics)?;
        let logs = self.csv_path(range, "logs");
        write_csv(&logs, LogRow::COLUMNS, &tables.logs)?;
        let traces = self.csv_path(range, "traces");
        write_csv(&traces, TraceRow::COLUMNS, &tables.traces)?;
        Ok(vec![metrics, logs, traces])
    }
}

/// Default sink directory of a run: `<output_dir>/<start>_<end>`
pub fn run_dir(output_dir: &Path, overall: &TimeRange) -> PathBuf {
    output_dir.join(format!(
        "{}_{}",
        beatdump_types::format_timestamp(&overall.start()),
        beatdump_types::format_timestamp(&overall.end())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatdump_engine::tabulate;
    use beatdump_types::RawRecord;
    use serde_json::json;
    use tempfile::TempDir;

    fn range() -> TimeRange {
        TimeRange::parse("2024-12-14T00:00:00.000Z", "2024-12-14T00:15:00.000Z").unwrap()
    }

    #[test]
    fn test_write_lines_creates_parents_and_terminates_lines() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("a/b/c/out.log");

        write_lines(&path, &["one".to_string(), "two".to_string()])?;

        assert_eq!(fs::read_to_string(&path)?, "one\ntwo\n");
        Ok(())
    }

    #[test]
    fn test_write_lines_overwrites() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("out.log");

        write_lines(&path, &["old line that is longer".to_string()])?;
        write_lines(&path, &["new".to_string()])?;

        assert_eq!(fs::read_to_string(&path)?, "new\n");
        Ok(())
    }

    #[test]
    fn test_write_lines_fails_when_parent_is_a_file() -> Result<()> {
        let temp = TempDir::new()?;
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "")?;

        let result = write_lines(&blocker.join("out.log"), &[]);
        assert!(matches!(result, Err(Error::Write { .. })));
        Ok(())
    }

    #[test]
    fn test_text_path_pattern() {
        let sink = Sink::new("/data/logs", OutputFormat::Text);
        assert_eq!(
            sink.text_path(&range()),
            PathBuf::from(
                "/data/logs/metricbeat-logs.2024-12-14T00:00:00.000Z-2024-12-14T00:15:00.000Z"
            )
        );
    }

    #[test]
    fn test_write_csv_header_and_rows() -> Result<()> {
        let temp = TempDir::new()?;
        let path = temp.path().join("logs.csv");
        let rows = vec![LogRow {
            timestamp: Some("2024-12-14T00:00:00.000Z".to_string()),
            message: Some("boom, again".to_string()),
            error_code: None,
            error_cause: None,
        }];

        write_csv(&path, LogRow::COLUMNS, &rows)?;

        let content = fs::read_to_string(&path)?;
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(
            lines,
            vec![
                "Timestamp,Message,Error code,Error cause",
                "2024-12-14T00:00:00.000Z,\"boom, again\",,"
            ]
        );
        Ok(())
    }

    #[test]
    fn test_write_tables_writes_every_category() -> Result<()> {
        let temp = TempDir::new()?;
        let sink = Sink::new(temp.path(), OutputFormat::Csv);
        let records = vec![
            RawRecord::new(json!({"_source": {"data_stream.type": "traces"}})),
            RawRecord::new(json!({"_source": {"data_stream.type": "logs", "message": "x"}})),
        ];

        let files = sink.write_tables(&range(), &tabulate(&records))?;

        assert_eq!(files.len(), 3);
        assert!(files[0].to_string_lossy().contains("metricbeat-metrics."));
        assert!(files[1].ends_with(
            "metricbeat-logs.2024-12-14T00:00:00.000Z-2024-12-14T00:15:00.000Z.csv"
        ));
        assert!(files[2].to_string_lossy().contains("metricbeat-traces."));

        let metrics = fs::read_to_string(&files[0])?;
        assert_eq!(metrics.lines().count(), 1);
        assert!(metrics.starts_with("Timestamp,System CPU Usage,"));
        assert_eq!(fs::read_to_string(&files[1])?.lines().count(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_tables_are_header_only() -> Result<()> {
        let temp = TempDir::new()?;
        let sink = Sink::new(temp.path(), OutputFormat::Csv);

        let files = sink.write_tables(&range(), &tabulate(&[]))?;

        let traces = fs::read_to_string(&files[2])?;
        assert_eq!(traces.lines().collect::<Vec<_>>(), vec![TraceRow::COLUMNS.join(",")]);
        Ok(())
    }

    /// Headers written for empty tables must match the serialized ones
    #[test]
    fn test_columns_match_serialized_headers() -> Result<()> {
        fn header_of<S: Serialize>(row: &S) -> String {
            let mut writer = csv::Writer::from_writer(Vec::new());
            writer.serialize(row).unwrap();
            let bytes = writer.into_inner().unwrap();
            String::from_utf8(bytes).unwrap().lines().next().unwrap().to_string()
        }

        let record = RawRecord::new(json!({"_source": {}}));
        assert_eq!(
            header_of(&MetricRow::from_record(&record)),
            MetricRow::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(&LogRow::from_record(&record)),
            LogRow::COLUMNS.join(",")
        );
        assert_eq!(
            header_of(&TraceRow::from_record(&record)),
            TraceRow::COLUMNS.join(",")
        );
        Ok(())
    }

    #[test]
    fn test_run_dir_layout() {
        let dir = run_dir(Path::new("./logs"), &range());
        assert_eq!(
            dir,
            PathBuf::from("./logs/2024-12-14T00:00:00.000Z_2024-12-14T00:15:00.000Z")
        );
    }
}
