use std::path::PathBuf;

use serde::Serialize;

use crate::statement::Statement;

/// Status of segmenting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// At least one statement was found.
    Segmented,
    /// The file holds no statements (empty or whitespace only).
    Empty,
    /// The file could not be read.
    Error,
}

/// Result of segmenting a single file.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    pub statements: Vec<Statement>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn from_statements(path: PathBuf, statements: Vec<Statement>) -> Self {
        let status = if statements.is_empty() {
            FileStatus::Empty
        } else {
            FileStatus::Segmented
        };
        Self {
            path,
            status,
            statements,
            error: None,
        }
    }

    pub fn error(path: PathBuf, error: String) -> Self {
        Self {
            path,
            status: FileStatus::Error,
            statements: Vec::new(),
            error: Some(error),
        }
    }
}

/// Aggregated report of segmentation results.
#[derive(Debug, Default, Serialize)]
pub struct Report {
    pub results: Vec<FileResult>,
}

impl Report {
    pub fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    pub fn add(&mut self, result: FileResult) {
        self.results.push(result);
    }

    pub fn total(&self) -> usize {
        self.results.len()
    }

    fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn segmented(&self) -> usize {
        self.count(FileStatus::Segmented)
    }

    pub fn empty(&self) -> usize {
        self.count(FileStatus::Empty)
    }

    pub fn errors(&self) -> usize {
        self.count(FileStatus::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors() > 0
    }

    pub fn total_statements(&self) -> usize {
        self.results.iter().map(|r| r.statements.len()).sum()
    }

    /// Generate a summary string.
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        parts.push(format!("{} file(s) processed", self.total()));
        parts.push(format!("{} statement(s)", self.total_statements()));
        if self.empty() > 0 {
            parts.push(format!("{} empty", self.empty()));
        }
        if self.errors() > 0 {
            parts.push(format!("{} error(s)", self.errors()));
        }
        parts.join(", ")
    }

    /// Print error details.
    pub fn print_errors(&self) {
        for result in &self.results {
            if let Some(ref error) = result.error {
                eprintln!("error: {}: {}", result.path.display(), error);
            }
        }
    }
}
