//! Candidate test manifest (`possible-NIO-list.txt`)
//!
//! One test id per line, `#` between class and method
//! (e.g. `com.example.FooTest#testBar`). Lines are read lazily.

use crate::inspector::{io_error, InspectorError, Result, MANIFEST_FILE};
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// One candidate test of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseId {
    /// Dot-separated id, also the case directory name
    pub directory_name: String,
    /// Test method name (last dot segment)
    pub test_name: String,
}

impl CaseId {
    /// Normalize one manifest line; `None` for blank lines
    pub fn from_manifest_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return None;
        }
        let directory_name = trimmed.replace('#', ".");
        let test_name = directory_name
            .rsplit('.')
            .next()
            .unwrap_or(&directory_name)
            .to_string();
        Some(Self {
            directory_name,
            test_name,
        })
    }

    /// `<run_dir>/<directory_name>`
    pub fn directory_in(&self, run_dir: &Path) -> PathBuf {
        run_dir.join(&self.directory_name)
    }
}

/// Lazy iterator over the cases of a manifest, in file order
#[derive(Debug)]
pub struct Manifest {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
}

impl Iterator for Manifest {
    type Item = Result<CaseId>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    if let Some(case) = CaseId::from_manifest_line(&line) {
                        return Some(Ok(case));
                    }
                }
                Err(e) => return Some(Err(io_error(&self.path, e))),
            }
        }
    }
}

/// Open the manifest of `run_dir`
pub fn read_manifest(run_dir: &Path) -> Result<Manifest> {
    let path = run_dir.join(MANIFEST_FILE);
    if !path.is_file() {
        return Err(InspectorError::MissingManifest(run_dir.to_path_buf()));
    }
    let file = File::open(&path).map_err(|e| io_error(&path, e))?;
    Ok(Manifest {
        lines: BufReader::new(file).lines(),
        path,
    })
}
