//! Process-level error type.
//!
//! Every fallible operation returns `Result<_, AppError>`; `main` prints the
//! message and exits with the carried code.

/// Configuration or input problem (bad path, missing column, write failure).
pub const EXIT_INPUT: u8 = 2;
/// The dataset has no usable rows.
pub const EXIT_NO_DATA: u8 = 3;
/// Runtime failure (network, terminal I/O).
pub const EXIT_RUNTIME: u8 = 4;

#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn input(message: impl Into<String>) -> Self {
        Self::new(EXIT_INPUT, message)
    }

    pub fn no_data(message: impl Into<String>) -> Self {
        Self::new(EXIT_NO_DATA, message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(EXIT_RUNTIME, message)
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
