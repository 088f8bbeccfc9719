//! The keyshares JSON artifact. Only `version` and `shares` are part of the
//! stable surface consumed by registration tooling; the remaining fields
//! carry registration metadata.

use crate::validators::Address;
use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Schema version of the bundle.
pub const KEYSHARES_VERSION: &str = "v1.0.0";

/// One operator's sealed share.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareRecord {
    /// Numeric operator id.
    pub operator_id: u64,
    /// The operator's RSA public key, base64-encoded PEM.
    pub operator_key: String,
    /// The key share sealed to the operator key: base64 RSA-OAEP
    /// ciphertext.
    pub share: String,
}

/// The keyshares bundle written to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeysharesBundle {
    /// Bundle schema version.
    pub version: String,
    /// UTC creation timestamp, RFC 3339.
    pub created_at: String,
    /// Account that owns the validator registration.
    pub owner_address: Address,
    /// Registration nonce of the owner account.
    pub owner_nonce: u64,
    /// Hex-encoded BLS public key of the validator, when the keystore
    /// carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// Per-operator share records, in operator input order.
    pub shares: Vec<ShareRecord>,
}

impl KeysharesBundle {
    /// Writes the bundle as `keyshares-<timestamp>.json` under `dir`,
    /// creating the directory if needed. Returns the full path.
    pub fn write(&self, dir: &Path) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create output folder {}", dir.display()))?;
        let path = dir.join(format!("keyshares-{}.json", filename_timestamp()?));
        let raw = serde_json::to_string_pretty(self).context("serializing keyshares bundle")?;
        fs::write(&path, raw).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }
}

fn filename_timestamp() -> anyhow::Result<String> {
    // Microsecond precision, so back-to-back builds into the same folder
    // get distinct file names instead of overwriting each other.
    let format = time::format_description::parse(
        "[year][month][day]_[hour][minute][second]_[subsecond digits:6]",
    )
    .context("timestamp format")?;
    time::OffsetDateTime::now_utc()
        .format(&format)
        .context("formatting timestamp")
}
