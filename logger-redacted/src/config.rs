// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
    /// Pass every formatted event through the secret redactor.
    pub redact: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            redact: true,
        }
    }
}

impl LoggerConfig {
    /// Same config at debug level, for `--verbose` style switches.
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.level = "debug".to_string();
        self
    }
}
