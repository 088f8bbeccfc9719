//! Operator RSA public key validation. Registries hand out operator keys
//! either as PKCS#1 PEM text or as a base64 encoding of that text, so the
//! validator normalizes before parsing.

use base64::Engine as _;
use keyshares_crypto::rsa;

/// PEM header every operator key must carry after normalization.
pub const PEM_BEGIN: &str = "-----BEGIN RSA PUBLIC KEY-----";

/// PEM footer every operator key must carry after normalization.
pub const PEM_END: &str = "-----END RSA PUBLIC KEY-----";

/// Minimal length of a base64-encoded operator key. Anything shorter cannot
/// plausibly encode a 2048-bit-class RSA key.
pub const MIN_ENCODED_LEN: usize = 98;

/// Reason a candidate operator key was rejected. One variant per failure
/// mode so each can be matched independently.
#[derive(Debug, thiserror::Error)]
pub enum KeyRejection {
    /// No PEM header and too short to be base64-encoded PEM.
    #[error("The length of the operator public key must be at least 98 characters.")]
    TooShort,
    /// No PEM header and not valid base64 either.
    #[error("Failed to decode the operator public key. Ensure it's correctly base64 encoded.")]
    Base64(#[source] base64::DecodeError),
    /// Base64 decoded fine but the text does not begin with the PEM header.
    #[error("Operator public key does not start with '-----BEGIN RSA PUBLIC KEY-----'")]
    NoBeginMarker,
    /// Normalized text does not end with the PEM footer.
    #[error("Operator public key does not end with '-----END RSA PUBLIC KEY-----'")]
    NoEndMarker,
    /// The PEM envelope is in place but the body is not a PKCS#1 RSA
    /// public key.
    #[error("Invalid operator key format, make sure the operator exists in the network.")]
    Malformed(anyhow::Error),
}

/// Structured rejection carrying the original input and the best-effort
/// decoded PEM, so callers can surface both for diagnostics.
#[derive(Debug, thiserror::Error)]
#[error("{reason}")]
pub struct OperatorKeyError {
    /// The input as given, possibly base64.
    pub raw: String,
    /// Best-effort decoded PEM text. Empty if decoding never got that far.
    pub decoded: String,
    /// Why the key was rejected.
    pub reason: KeyRejection,
}

/// Validates a candidate operator public key, accepting raw PEM or
/// base64-encoded PEM. Returns the parsed key on success.
pub fn validate_operator_key(input: &str) -> Result<rsa::PublicKey, OperatorKeyError> {
    let raw = input.trim();
    let fail = |decoded: String, reason: KeyRejection| OperatorKeyError {
        raw: raw.to_owned(),
        decoded,
        reason,
    };

    let pem = if raw.starts_with(PEM_BEGIN) {
        raw.to_owned()
    } else {
        // Reject obviously-truncated inputs before attempting to decode.
        if raw.len() < MIN_ENCODED_LEN {
            return Err(fail(String::new(), KeyRejection::TooShort));
        }
        // Tolerate line-wrapped input: strip whitespace before decoding,
        // the way forgiving base64 decoders do.
        let compact: String = raw.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        let bytes = match base64::engine::general_purpose::STANDARD.decode(&compact) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::debug!(%err, "operator key base64 decoding failed");
                return Err(fail(String::new(), KeyRejection::Base64(err)));
            }
        };
        let text = String::from_utf8_lossy(&bytes).trim().to_owned();
        if !text.starts_with(PEM_BEGIN) {
            return Err(fail(text, KeyRejection::NoBeginMarker));
        }
        text
    };

    if !pem.ends_with(PEM_END) {
        return Err(fail(pem, KeyRejection::NoEndMarker));
    }
    match rsa::PublicKey::from_pem(&pem) {
        Ok(key) => Ok(key),
        Err(err) => Err(fail(pem, KeyRejection::Malformed(err))),
    }
}
