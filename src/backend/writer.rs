use std::path::PathBuf;

use log::info;

use crate::common::{error_reporter::ErrorReporter, io::write_file, position::Position};

use super::instruction::TargetCode;

/// Saves generated code as TAM object code plus a readable listing.
#[derive(Debug, Clone)]
pub struct TargetCodeWriter {
    binary_path: PathBuf,
    text_path: PathBuf,
}

impl TargetCodeWriter {
    pub fn new(binary_path: impl Into<PathBuf>, text_path: impl Into<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.into(),
            text_path: text_path.into(),
        }
    }

    pub fn write_to_files(&self, code: &TargetCode, reporter: &mut ErrorReporter) {
        info!(
            "Writing {} instructions to {}",
            code.len(),
            self.binary_path.display()
        );

        let results = [
            write_file(&self.binary_path, &code.encode()),
            write_file(&self.text_path, code.listing().as_bytes()),
        ];

        for error in results.into_iter().filter_map(Result::err) {
            reporter.report(Position::internal(), error.to_string());
        }
    }
}
