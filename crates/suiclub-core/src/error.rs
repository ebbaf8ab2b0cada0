//! Shared error type across suiclub crates.

use thiserror::Error;

/// Stable error codes (printed by the binary, asserted by tests).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Message type discriminant is not a known variant.
    UnsupportedType,
    /// Encoded message is empty or its payload is not UTF-8.
    InvalidEncoding,
    /// Config file or environment is invalid.
    Config,
    /// Chain response lacks a field we rely on.
    UnexpectedShape,
    /// JSON-RPC transport or server error.
    Rpc,
    /// Transaction executed but did not succeed.
    TxFailed,
    /// Owner does not hold enough of a coin type.
    InsufficientFunds,
    /// Caller passed an out-of-range argument.
    InvalidArgument,
    /// Internal failure (subprocess, io).
    Internal,
}

impl ErrorCode {
    /// String representation used in logs and the process exit message.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::UnsupportedType => "UNSUPPORTED_TYPE",
            ErrorCode::InvalidEncoding => "INVALID_ENCODING",
            ErrorCode::Config => "CONFIG",
            ErrorCode::UnexpectedShape => "UNEXPECTED_SHAPE",
            ErrorCode::Rpc => "RPC",
            ErrorCode::TxFailed => "TX_FAILED",
            ErrorCode::InsufficientFunds => "INSUFFICIENT_FUNDS",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SuiClubError>;

/// Unified error type used by core and demo.
#[derive(Debug, Error)]
pub enum SuiClubError {
    #[error("unsupported message type: {0}")]
    UnsupportedType(u8),
    #[error("invalid encoding: {0}")]
    InvalidEncoding(String),
    #[error("config: {0}")]
    Config(String),
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
    #[error("rpc: {0}")]
    Rpc(String),
    #[error("transaction failed with error: {0}")]
    TxFailed(String),
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SuiClubError {
    /// Map an error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SuiClubError::UnsupportedType(_) => ErrorCode::UnsupportedType,
            SuiClubError::InvalidEncoding(_) => ErrorCode::InvalidEncoding,
            SuiClubError::Config(_) => ErrorCode::Config,
            SuiClubError::UnexpectedShape(_) => ErrorCode::UnexpectedShape,
            SuiClubError::Rpc(_) => ErrorCode::Rpc,
            SuiClubError::TxFailed(_) => ErrorCode::TxFailed,
            SuiClubError::InsufficientFunds(_) => ErrorCode::InsufficientFunds,
            SuiClubError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            SuiClubError::Internal(_) => ErrorCode::Internal,
        }
    }
}
