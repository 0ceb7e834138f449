pub mod api;
pub mod config;
pub mod cursor;
pub mod error;
pub mod lexer;
pub mod mode;
pub mod output;
pub mod report;
pub mod splitter;
pub mod statement;

// Re-export the main public API
pub use api::{get_matching_paths, run, segment, segment_file};
pub use config::load_config;
pub use cursor::{line_of_offset, resolve_at_cursor, resolve_at_offset, resolve_in};
pub use mode::{Mode, OutputFormat};
pub use splitter::has_multiple_statements;
pub use statement::Statement;
