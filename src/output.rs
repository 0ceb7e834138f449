use std::io::Write;
use std::path::Path;

use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::error::Result;
use crate::mode::OutputFormat;
use crate::report::{FileResult, FileStatus, Report};
use crate::statement::Statement;

fn write_header(out: &mut dyn WriteColor, header: &str) -> std::io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true))?;
    write!(out, "{}", header)?;
    out.reset()?;
    writeln!(out)
}

/// Write each statement under a header naming its position in `label`.
pub fn write_statements(
    out: &mut dyn WriteColor,
    label: &str,
    statements: &[Statement],
) -> std::io::Result<()> {
    for (i, stmt) in statements.iter().enumerate() {
        write_header(
            out,
            &format!(
                "-- {} [{}] lines {}-{}, offsets {}-{}",
                label,
                i + 1,
                stmt.start_line,
                stmt.end_line,
                stmt.start_offset,
                stmt.end_offset
            ),
        )?;
        writeln!(out, "{}", stmt.text)?;
    }
    Ok(())
}

fn write_count(out: &mut dyn WriteColor, result: &FileResult) -> std::io::Result<()> {
    writeln!(out, "{}: {}", result.path.display(), result.statements.len())
}

/// Per-file statement count, the JSON form of `--count`.
#[derive(Serialize)]
struct FileCount<'a> {
    path: &'a Path,
    status: FileStatus,
    statements: usize,
}

#[derive(Serialize)]
struct CountReport<'a> {
    results: Vec<FileCount<'a>>,
}

impl<'a> From<&'a Report> for CountReport<'a> {
    fn from(report: &'a Report) -> Self {
        Self {
            results: report
                .results
                .iter()
                .map(|r| FileCount {
                    path: &r.path,
                    status: r.status,
                    statements: r.statements.len(),
                })
                .collect(),
        }
    }
}

/// Write a whole report, as text or JSON.
pub fn write_report(
    out: &mut dyn WriteColor,
    report: &Report,
    format: OutputFormat,
    count_only: bool,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            if count_only {
                serde_json::to_writer_pretty(&mut *out, &CountReport::from(report))?;
            } else {
                serde_json::to_writer_pretty(&mut *out, report)?;
            }
            writeln!(out)?;
        }
        OutputFormat::Text => {
            for result in &report.results {
                if result.status == FileStatus::Error {
                    continue;
                }
                if count_only {
                    write_count(out, result)?;
                } else {
                    let label = result.path.display().to_string();
                    write_statements(out, &label, &result.statements)?;
                }
            }
        }
    }
    Ok(())
}

/// Write the statement a cursor resolved to. Nothing is written for text
/// output when no statement resolved; JSON output writes `null`.
pub fn write_resolved(
    out: &mut dyn WriteColor,
    label: &str,
    resolved: Option<&Statement>,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &resolved)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            if let Some(stmt) = resolved {
                write_statements(out, label, std::slice::from_ref(stmt))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use termcolor::NoColor;

    fn render(f: impl FnOnce(&mut dyn WriteColor)) -> String {
        let mut out = NoColor::new(Vec::new());
        f(&mut out);
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_write_statements_text() {
        let stmts = vec![
            Statement::new("select 1;", 0, 0, 0, 8),
            Statement::new("select\n2", 1, 2, 10, 17),
        ];
        let text = render(|out| write_statements(out, "q.sql", &stmts).unwrap());
        assert_eq!(
            text,
            "-- q.sql [1] lines 0-0, offsets 0-8\nselect 1;\n\
             -- q.sql [2] lines 1-2, offsets 10-17\nselect\n2\n"
        );
    }

    #[test]
    fn test_write_report_counts() {
        let mut report = Report::new();
        report.add(FileResult::from_statements(
            PathBuf::from("a.sql"),
            vec![Statement::new("select 1;", 0, 0, 0, 8)],
        ));
        report.add(FileResult::error(PathBuf::from("b.sql"), "boom".to_string()));

        let text = render(|out| write_report(out, &report, OutputFormat::Text, true).unwrap());
        assert_eq!(text, "a.sql: 1\n");
    }

    #[test]
    fn test_write_report_counts_json() {
        let mut report = Report::new();
        report.add(FileResult::from_statements(
            PathBuf::from("a.sql"),
            vec![
                Statement::new("select 1;", 0, 0, 0, 8).terminated(),
                Statement::new("select 2", 1, 1, 10, 18),
            ],
        ));
        report.add(FileResult::from_statements(PathBuf::from("b.sql"), Vec::new()));

        let text = render(|out| write_report(out, &report, OutputFormat::Json, true).unwrap());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "results": [
                    {"path": "a.sql", "status": "segmented", "statements": 2},
                    {"path": "b.sql", "status": "empty", "statements": 0},
                ]
            })
        );
    }

    #[test]
    fn test_write_resolved_json_none() {
        let text = render(|out| write_resolved(out, "-", None, OutputFormat::Json).unwrap());
        assert_eq!(text, "null\n");
    }

    #[test]
    fn test_write_resolved_json_some() {
        let stmt = Statement::new("select 1;", 0, 0, 0, 8);
        let text =
            render(|out| write_resolved(out, "-", Some(&stmt), OutputFormat::Json).unwrap());
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["text"], "select 1;");
        assert_eq!(value["endOffset"], 8);
    }
}
