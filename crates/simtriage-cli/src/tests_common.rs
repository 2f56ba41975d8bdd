//! Shared in-memory backend for CLI unit tests.

use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use crate::TriageBackend;

pub struct MemoryBackend {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            files: HashMap::new(),
        }
    }

    pub fn with_log(mut self, path: &str, lines: &[&str]) -> Self {
        let mut body = lines.join("\n");
        body.push('\n');
        self.files.insert(path.to_string(), body.into_bytes());
        self
    }

    pub fn with_raw(mut self, path: &str, raw: &[u8]) -> Self {
        self.files.insert(path.to_string(), raw.to_vec());
        self
    }
}

impl TriageBackend for MemoryBackend {
    fn read_log(&self, path: &str) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn default_config_path(&self) -> Option<PathBuf> {
        None
    }
}
