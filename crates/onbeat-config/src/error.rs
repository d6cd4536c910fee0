use thiserror::Error;

/// A configuration that cannot be repaired by clamping.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("judge window table is empty")]
    EmptyWindowTable,

    #[error("judge window {index} ({window}s) is not wider than the one before it")]
    WindowsNotAscending { index: usize, window: f64 },

    #[error("judge window {index} has a non-positive or non-finite width ({window}s)")]
    InvalidWindow { index: usize, window: f64 },

    #[error("judge window table has no hit label")]
    NoHitWindow,
}
