use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::io;

/// Summary of one ranking run, written as JSON next to the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pipeline_name: String,
    pub input_path: String,
    pub base_year: i64,
    pub target_year: i64,
    pub lines_read: usize,
    pub matched_rows: usize,
    pub ignored_rows: usize,
    pub regions: usize,
    pub ranking: Vec<String>,
}

impl Manifest {
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        io::write_json(self, path)
    }
}
