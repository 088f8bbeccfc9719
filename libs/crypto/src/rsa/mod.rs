//! Operator RSA keys. This is just an adapter of the `rsa` crate, exposing
//! the keyshares-specific API: operators publish PKCS#1 PEM public keys and
//! receive their key shares encrypted with RSA-OAEP.

use ::rsa::{
    pkcs1::{DecodeRsaPublicKey as _, EncodeRsaPublicKey as _, LineEnding},
    pkcs8::DecodePublicKey as _,
    Oaep, RsaPrivateKey, RsaPublicKey,
};
use anyhow::anyhow;
use base64::Engine as _;
use rand::{CryptoRng, RngCore};

#[cfg(test)]
mod tests;

pub mod testonly;

/// Modulus size (in bits) of the operator keys generated by [`testonly`].
/// Operator registries require 2048-bit keys.
pub const KEY_BITS: usize = 2048;

/// Type safety wrapper around an operator's RSA public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey(RsaPublicKey);

impl PublicKey {
    /// Parses a PEM document with the PKCS#1 label
    /// (`-----BEGIN RSA PUBLIC KEY-----`). The body may be either PKCS#1 or
    /// SPKI DER: operator registries commonly put an SPKI body inside the
    /// PKCS#1 envelope, and forge-based tooling accepts that shape.
    pub fn from_pem(pem: &str) -> anyhow::Result<Self> {
        let pkcs1_err = match RsaPublicKey::from_pkcs1_pem(pem) {
            Ok(key) => return Ok(Self(key)),
            Err(err) => err,
        };
        let der = pem_body(pem)?;
        RsaPublicKey::from_public_key_der(&der).map(Self).map_err(|err| {
            anyhow!("failed to parse RSA public key: not PKCS#1 ({pkcs1_err}), not SPKI ({err})")
        })
    }

    /// Encodes the key as a PKCS#1 PEM document.
    pub fn to_pem(&self) -> String {
        // Serialization of a structurally valid key cannot fail.
        self.0
            .to_pkcs1_pem(LineEnding::LF)
            .expect("PKCS#1 encoding failed")
    }

    /// Encrypts `plaintext` to this key using RSA-OAEP with SHA-256.
    pub fn encrypt(
        &self,
        rng: &mut (impl RngCore + CryptoRng),
        plaintext: &[u8],
    ) -> anyhow::Result<Vec<u8>> {
        self.0
            .encrypt(rng, Oaep::new::<sha2::Sha256>(), plaintext)
            .map_err(|err| anyhow!("RSA-OAEP encryption failed: {err}"))
    }
}

/// Extracts the base64-decoded body of a PEM document, ignoring the marker
/// lines and line breaks.
fn pem_body(pem: &str) -> anyhow::Result<Vec<u8>> {
    let body: String = pem
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("-----") && !line.is_empty())
        .collect();
    base64::engine::general_purpose::STANDARD
        .decode(body)
        .map_err(|err| anyhow!("bad PEM body: {err}"))
}

/// Type safety wrapper around an RSA private key. Operators hold these;
/// this repository only needs them to exercise the encryption path.
/// The inner key zeroizes its material on drop.
pub struct SecretKey(RsaPrivateKey);

impl SecretKey {
    /// Generates a fresh [`KEY_BITS`]-bit key pair.
    pub fn generate(rng: &mut (impl RngCore + CryptoRng)) -> anyhow::Result<Self> {
        RsaPrivateKey::new(rng, KEY_BITS)
            .map(Self)
            .map_err(|err| anyhow!("RSA key generation failed: {err}"))
    }

    /// Gets the corresponding [`PublicKey`] for this [`SecretKey`].
    pub fn public(&self) -> PublicKey {
        PublicKey(self.0.to_public_key())
    }

    /// Decrypts an RSA-OAEP ciphertext produced by [`PublicKey::encrypt`].
    pub fn decrypt(&self, ciphertext: &[u8]) -> anyhow::Result<Vec<u8>> {
        self.0
            .decrypt(Oaep::new::<sha2::Sha256>(), ciphertext)
            .map_err(|err| anyhow!("RSA-OAEP decryption failed: {err}"))
    }
}
