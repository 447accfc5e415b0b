use crate::{config::LoggerConfig, redactor::SecretRedactor};
use std::io;
use thiserror::Error;
use tracing_subscriber::{
    fmt::{self, time::ChronoUtc, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

#[derive(Error, Debug)]
pub enum LoggerError {
    #[error("Invalid log filter: {0}")]
    Filter(#[from] tracing_subscriber::filter::ParseError),

    #[error("Tracing initialization failed: {0}")]
    Init(#[from] tracing_subscriber::util::TryInitError),
}

/// Wraps a [`MakeWriter`] so every formatted event is redacted before it
/// reaches the sink.
pub struct RedactingMakeWriter<M> {
    inner: M,
    redactor: Option<SecretRedactor>,
}

impl<M> RedactingMakeWriter<M> {
    pub fn new(inner: M, redactor: SecretRedactor) -> Self {
        Self {
            inner,
            redactor: Some(redactor),
        }
    }

    /// Writes events through unchanged.
    pub fn passthrough(inner: M) -> Self {
        Self {
            inner,
            redactor: None,
        }
    }
}

impl<'a, M: MakeWriter<'a>> MakeWriter<'a> for RedactingMakeWriter<M> {
    type Writer = RedactingWriter<'a, M::Writer>;

    fn make_writer(&'a self) -> Self::Writer {
        RedactingWriter {
            inner: self.inner.make_writer(),
            redactor: self.redactor.as_ref(),
        }
    }
}

pub struct RedactingWriter<'a, W> {
    inner: W,
    redactor: Option<&'a SecretRedactor>,
}

impl<W: io::Write> io::Write for RedactingWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self.redactor {
            Some(redactor) => {
                let redacted = redactor.redact(&String::from_utf8_lossy(buf));
                self.inner.write_all(redacted.as_bytes())?;
            }
            None => self.inner.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Installs the global subscriber: `RUST_LOG` (or `config.level`) filter,
/// RFC 3339 timestamps, JSON or human output on stderr.
///
/// # Errors
///
/// Fails on an unparseable filter or when a global subscriber is already set.
pub fn init_tracing(config: &LoggerConfig) -> Result<(), LoggerError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.level)?,
    };

    let writer = if config.redact {
        RedactingMakeWriter::new(io::stderr, SecretRedactor::default())
    } else {
        RedactingMakeWriter::passthrough(io::stderr)
    };

    if config.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false)
                    .json()
                    .with_writer(writer),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()?;
    }

    Ok(())
}
