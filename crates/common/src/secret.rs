//! Per-user credential generation
//!
//! A [`Secret`] is the only thing standing between a user's credential file
//! and anyone who can guess it, so it is drawn from a CSPRNG and never shows
//! up in `Debug` output or logs.

use std::fmt;

use rand::distr::Alphanumeric;
use rand::Rng;

/// Number of characters in a generated secret
pub const SECRET_LENGTH: usize = 20;

/// A generated credential. Alphanumeric ASCII, [`SECRET_LENGTH`] characters.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Raw bytes, exactly as they are persisted (no trailing newline)
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(<redacted>)")
    }
}

/// Produces fresh [`Secret`]s from the thread-local CSPRNG.
///
/// `rand::rng()` is a ChaCha based generator reseeded from the operating
/// system, so successive values are unpredictable within and across runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecretGenerator;

impl SecretGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self) -> Secret {
        let value: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(SECRET_LENGTH)
            .map(char::from)
            .collect();
        Secret(value)
    }
}
