use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::mode::Mode;
use crate::report::{FileResult, Report};
use crate::splitter::split_statements;
use crate::statement::Statement;

/// Split a SQL buffer into statements.
/// This is the core API function.
pub fn segment(source: &str) -> Vec<Statement> {
    split_statements(source)
}

/// Segment every SQL file reachable from `files`.
pub fn run(files: &[PathBuf], mode: &Mode) -> Report {
    let matching_paths = get_matching_paths(files, mode);
    let mut report = Report::new();

    for path in &matching_paths {
        report.add(segment_file(path));
    }

    tracing::debug!(files = report.total(), "run complete");
    report
}

/// Segment a single file.
pub fn segment_file(path: &Path) -> FileResult {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "read failed");
            return FileResult::error(path.to_path_buf(), format!("Read error: {}", e));
        }
    };

    let statements = segment(&source);
    tracing::debug!(
        path = %path.display(),
        statements = statements.len(),
        "segmented file"
    );
    FileResult::from_statements(path.to_path_buf(), statements)
}

/// Get all SQL file paths that match the given inputs.
///
/// Files named explicitly are kept whatever their extension; directories
/// are walked for SQL files, skipping hidden and excluded entries.
pub fn get_matching_paths(paths: &[PathBuf], mode: &Mode) -> Vec<PathBuf> {
    let extensions = mode.sql_extensions();
    let mut result = HashSet::new();

    for path in paths {
        if path.is_dir() {
            collect_sql_files(path, extensions, &mode.exclude, &mut result);
        } else {
            result.insert(path.clone());
        }
    }

    let mut sorted: Vec<PathBuf> = result.into_iter().collect();
    sorted.sort();
    sorted
}

/// Check if a file has a SQL extension.
fn is_sql_file(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| extensions.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn is_excluded(name: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|pattern| {
        glob::Pattern::new(pattern)
            .map(|p| p.matches(name))
            .unwrap_or(false)
    })
}

/// Recursively collect SQL files from a directory.
fn collect_sql_files(
    dir: &Path,
    extensions: &[&str],
    exclude: &[String],
    result: &mut HashSet<PathBuf>,
) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) => {
            tracing::debug!(dir = %dir.display(), error = %e, "skipping unreadable directory");
            return;
        }
    };

    for entry in entries.flatten() {
        let path = entry.path();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();

        if name.starts_with('.') || is_excluded(&name, exclude) {
            continue;
        }

        if path.is_dir() {
            collect_sql_files(&path, extensions, exclude, result);
        } else if is_sql_file(&path, extensions) {
            result.insert(path);
        }
    }
}
