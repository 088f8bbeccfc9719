//! Keystore password validation.

use keyshares_crypto::keystore::Keystore;
use std::path::Path;

/// Outcome of checking a password against a keystore file. Every failure is
/// absorbed into a variant; this validator never surfaces an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    /// The password unlocks the keystore.
    Valid,
    /// The keystore parsed fine but the password does not match.
    Mismatch,
    /// The password is empty after trimming. Checked before touching the
    /// file, so this is reported even if the keystore path is bogus.
    Empty,
    /// The keystore file is missing or malformed. Deliberately reported to
    /// the user with the same message as a bad password: it keeps the CLI's
    /// error surface small, at the cost of conflating the two causes.
    Unreadable,
}

impl PasswordCheck {
    /// User-facing message for the failure variants.
    pub fn user_message(self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::Empty => Some("Password is empty"),
            Self::Mismatch | Self::Unreadable => Some("Invalid keystore file password."),
        }
    }
}

/// Checks whether `password` unlocks the keystore at `keystore_path`.
/// The password is trimmed only for the emptiness check; verification uses
/// it as given.
pub fn validate_password(password: &str, keystore_path: &Path) -> PasswordCheck {
    if password.trim().is_empty() {
        return PasswordCheck::Empty;
    }
    let keystore = match Keystore::load(keystore_path) {
        Ok(keystore) => keystore,
        Err(err) => {
            tracing::debug!(%err, "failed to load keystore");
            return PasswordCheck::Unreadable;
        }
    };
    match keystore.verify_password(password) {
        Ok(true) => PasswordCheck::Valid,
        Ok(false) => PasswordCheck::Mismatch,
        Err(err) => {
            tracing::debug!(%err, "keystore verification failed");
            PasswordCheck::Unreadable
        }
    }
}
