use thiserror::Error;

/// Error categories surfaced to the user
///
/// AWS API errors are passed through untouched as `anyhow::Error`; these variants cover
/// what `act` itself rejects so callers can `downcast_ref` the kind when needed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  /// Malformed user input, such as an invalid IP address
  #[error("{0}")]
  Validation(String),

  /// Missing or inconsistent local configuration
  #[error("{0}")]
  Config(String),
}

impl Error {
  pub fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}
