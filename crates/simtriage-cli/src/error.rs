pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_USAGE: i32 = 2;
pub const EXIT_RUN_FAILED: i32 = 3;

#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("{0}")]
    Usage(String),
    #[error("config: {0}")]
    Config(String),
    #[error("read {path}: {message}")]
    Io { path: String, message: String },
    #[error("output: {0}")]
    Output(String),
}

impl TriageError {
    pub fn io(path: impl Into<String>, err: &std::io::Error) -> Self {
        TriageError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            TriageError::Usage(_) => EXIT_USAGE,
            TriageError::Config(_) | TriageError::Io { .. } | TriageError::Output(_) => {
                EXIT_FAILURE
            }
        }
    }
}
