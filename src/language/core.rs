use super::difficulty::LengthBounds;
use crate::error::{Result, TypetestError};
use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Lines};
use std::path::{Path, PathBuf};

/// Word list backed by a text file, one word per line.
/// Lines starting with `-` are inflection stems and never yielded.
#[derive(Debug, Clone)]
pub struct WordCorpus {
    path: PathBuf,
}

impl WordCorpus {
    /// Check the path is a regular file that can be read.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&path).map_err(|e| TypetestError::from_io(path.clone(), e))?;
        if !metadata.is_file() {
            let source = io::Error::new(io::ErrorKind::InvalidInput, "not a regular file");
            return Err(TypetestError::Io { path, source });
        }
        File::open(&path).map_err(|e| TypetestError::from_io(path.clone(), e))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stream the words admitted by `bounds`.
    /// Every call re-reads the file from the start. Lines that are not
    /// valid UTF-8 are skipped; any other read error ends the scan.
    pub fn words(&self, bounds: LengthBounds) -> Result<Words> {
        let file = File::open(&self.path)
            .map_err(|e| TypetestError::from_io(self.path.clone(), e))?;

        Ok(Words {
            lines: BufReader::new(file).lines(),
            path: self.path.clone(),
            bounds,
            failed: false,
        })
    }

    /// Collect the full filtered population in corpus order.
    pub fn population(&self, bounds: LengthBounds) -> Result<Vec<String>> {
        let words = self.words(bounds)?.collect::<Result<Vec<String>>>()?;
        tracing::debug!(
            corpus = %self.path.display(),
            min = ?bounds.min,
            max = ?bounds.max,
            population = words.len(),
            "scanned word list"
        );
        Ok(words)
    }
}

/// Iterator returned by [`WordCorpus::words`]. Stops after the first error.
pub struct Words {
    lines: Lines<BufReader<File>>,
    path: PathBuf,
    bounds: LengthBounds,
    failed: bool,
}

impl Iterator for Words {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            match self.lines.next()? {
                Ok(line) => {
                    let word = line.trim();
                    if word.is_empty() || word.starts_with('-') || !self.bounds.admits(word) {
                        continue;
                    }
                    return Some(Ok(word.to_string()));
                }
                Err(e) if e.kind() == io::ErrorKind::InvalidData => continue,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(TypetestError::from_io(self.path.clone(), e)));
                }
            }
        }
    }
}
