use crate::AuthenticationFailed;
use core::fmt;

/// Decryption failure for combined ciphertext‖tag buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The input is shorter than one tag.
    CiphertextTooShort,
    /// The tag did not verify.
    AuthenticationFailed,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CiphertextTooShort => f.write_str("ciphertext shorter than the authentication tag"),
            Self::AuthenticationFailed => f.write_str("authentication tag mismatch"),
        }
    }
}

impl core::error::Error for Error {}

impl From<AuthenticationFailed> for Error {
    fn from(_: AuthenticationFailed) -> Self {
        Self::AuthenticationFailed
    }
}
