//! EIP-2335 encrypted keystores. A keystore holds a validator's BLS secret
//! key encrypted under a password: the password goes through a KDF (scrypt or
//! pbkdf2), the derived key both checks the password (sha256 checksum over
//! the ciphertext) and decrypts the secret (AES-128-CTR).
//!
//! Only version 4 documents are accepted. Password verification follows the
//! EIP-2335 checksum procedure, so a wrong password is distinguishable from
//! a malformed document.

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use sha2::{Digest as _, Sha256};
use std::{fs, path::Path};
use unicode_normalization::UnicodeNormalization as _;
use zeroize::Zeroizing;

#[cfg(test)]
mod tests;

pub mod testonly;

/// The only supported keystore document version.
pub const KEYSTORE_VERSION: u32 = 4;

/// Checksum function required by EIP-2335.
const CHECKSUM_FN: &str = "sha256";

/// Cipher function required by EIP-2335.
const CIPHER_FN: &str = "aes-128-ctr";

type Aes128Ctr = ctr::Ctr128BE<aes::Aes128>;

/// An EIP-2335 keystore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Keystore {
    /// KDF, checksum and cipher modules.
    pub crypto: Crypto,
    /// Hex-encoded BLS public key of the stored secret, no `0x` prefix.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// EIP-2334 derivation path. May be empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Random identifier of the document.
    pub uuid: String,
    /// Document version, must be [`KEYSTORE_VERSION`].
    pub version: u32,
}

/// The `crypto` section of a keystore document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Crypto {
    /// Password-based key derivation.
    pub kdf: KdfModule,
    /// Password checksum over the ciphertext.
    pub checksum: ChecksumModule,
    /// Secret encryption.
    pub cipher: CipherModule,
}

/// KDF module: function + params, with an (empty) message slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KdfModule {
    /// KDF function and its parameters.
    #[serde(flatten)]
    pub kdf: Kdf,
    /// Unused by both supported KDFs, kept for schema fidelity.
    #[serde(default)]
    pub message: String,
}

/// Supported key derivation functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "function", content = "params", rename_all = "lowercase")]
pub enum Kdf {
    /// scrypt with the parameters spelled out in the document.
    Scrypt {
        /// Derived key length in bytes.
        dklen: u32,
        /// CPU/memory cost, must be a power of two.
        n: u32,
        /// Parallelization.
        p: u32,
        /// Block size.
        r: u32,
        /// Hex-encoded salt.
        salt: String,
    },
    /// pbkdf2, hmac-sha256 only.
    Pbkdf2 {
        /// Derived key length in bytes.
        dklen: u32,
        /// Iteration count.
        c: u32,
        /// Pseudo-random function, must be `hmac-sha256`.
        prf: String,
        /// Hex-encoded salt.
        salt: String,
    },
}

/// Checksum module. `params` is an empty object in well-formed documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChecksumModule {
    /// Must be `sha256`.
    pub function: String,
    /// Empty for both supported checksum functions.
    #[serde(default)]
    pub params: serde_json::Map<String, serde_json::Value>,
    /// Hex-encoded checksum.
    pub message: String,
}

/// Cipher module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherModule {
    /// Must be `aes-128-ctr`.
    pub function: String,
    /// Cipher parameters.
    pub params: CipherParams,
    /// Hex-encoded ciphertext.
    pub message: String,
}

/// Parameters of the `aes-128-ctr` cipher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CipherParams {
    /// Hex-encoded 16-byte initialization vector.
    pub iv: String,
}

impl Keystore {
    /// Reads and parses a keystore document from `path`.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read keystore file {}", path.display()))?;
        let this: Self = serde_json::from_str(&raw).context("malformed keystore JSON")?;
        anyhow::ensure!(
            this.version == KEYSTORE_VERSION,
            "unsupported keystore version {}",
            this.version
        );
        Ok(this)
    }

    /// Checks `password` against the checksum module. `Ok(false)` means the
    /// document is well-formed but the password does not match.
    pub fn verify_password(&self, password: &str) -> anyhow::Result<bool> {
        anyhow::ensure!(
            self.crypto.checksum.function == CHECKSUM_FN,
            "unsupported checksum function {:?}",
            self.crypto.checksum.function
        );
        let dk = derive_key(&self.crypto.kdf.kdf, password)?;
        let ciphertext = hex::decode(&self.crypto.cipher.message).context("cipher.message")?;
        let want = hex::decode(&self.crypto.checksum.message).context("checksum.message")?;
        let mut hasher = Sha256::new();
        hasher.update(&dk[16..32]);
        hasher.update(&ciphertext);
        Ok(hasher.finalize().as_slice() == want.as_slice())
    }

    /// Decrypts the stored secret. Fails if the password does not verify.
    pub fn decrypt(&self, password: &str) -> anyhow::Result<Zeroizing<Vec<u8>>> {
        anyhow::ensure!(
            self.verify_password(password)?,
            "keystore password verification failed"
        );
        anyhow::ensure!(
            self.crypto.cipher.function == CIPHER_FN,
            "unsupported cipher function {:?}",
            self.crypto.cipher.function
        );
        let dk = derive_key(&self.crypto.kdf.kdf, password)?;
        let iv = hex::decode(&self.crypto.cipher.params.iv).context("cipher.params.iv")?;
        let mut buf =
            Zeroizing::new(hex::decode(&self.crypto.cipher.message).context("cipher.message")?);
        apply_aes128_ctr(&dk[..16], &iv, &mut buf)?;
        Ok(buf)
    }
}

/// Derives the decryption key from a password. The derived key is at least
/// 32 bytes: the first 16 decrypt, bytes 16..32 feed the checksum.
fn derive_key(kdf: &Kdf, password: &str) -> anyhow::Result<Zeroizing<Vec<u8>>> {
    let password = normalize_password(password);
    match kdf {
        Kdf::Scrypt { dklen, n, p, r, salt } => {
            anyhow::ensure!(*dklen >= 32, "kdf dklen must be at least 32");
            anyhow::ensure!(
                *n > 1 && n.is_power_of_two(),
                "scrypt n must be a power of two greater than 1"
            );
            let salt = hex::decode(salt).context("kdf.params.salt")?;
            let params = scrypt::Params::new(n.trailing_zeros() as u8, *r, *p, *dklen as usize)
                .map_err(|err| anyhow::anyhow!("invalid scrypt params: {err}"))?;
            let mut dk = Zeroizing::new(vec![0u8; *dklen as usize]);
            scrypt::scrypt(password.as_bytes(), &salt, &params, &mut dk)
                .map_err(|err| anyhow::anyhow!("scrypt failed: {err}"))?;
            Ok(dk)
        }
        Kdf::Pbkdf2 { dklen, c, prf, salt } => {
            anyhow::ensure!(*dklen >= 32, "kdf dklen must be at least 32");
            anyhow::ensure!(prf == "hmac-sha256", "unsupported pbkdf2 prf {prf:?}");
            anyhow::ensure!(*c > 0, "pbkdf2 iteration count must be positive");
            let salt = hex::decode(salt).context("kdf.params.salt")?;
            let mut dk = Zeroizing::new(vec![0u8; *dklen as usize]);
            pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, *c, &mut dk);
            Ok(dk)
        }
    }
}

/// AES-128-CTR is its own inverse, so this both encrypts and decrypts.
fn apply_aes128_ctr(key: &[u8], iv: &[u8], buf: &mut [u8]) -> anyhow::Result<()> {
    use aes::cipher::{KeyIvInit as _, StreamCipher as _};
    let mut cipher = Aes128Ctr::new_from_slices(key, iv)
        .map_err(|err| anyhow::anyhow!("bad cipher key/iv length: {err}"))?;
    cipher.apply_keystream(buf);
    Ok(())
}

/// EIP-2335 password normalization: NFKD, then strip C0, C1 and DEL
/// control codepoints.
fn normalize_password(password: &str) -> Zeroizing<String> {
    Zeroizing::new(password.nfkd().filter(|c| !c.is_control()).collect())
}
