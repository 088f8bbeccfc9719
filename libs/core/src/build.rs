//! Build orchestration: runs every validator over the raw inputs, and only
//! then derives and seals the per-operator shares and writes the bundle.
//! Share derivation itself sits behind [`ShareScheme`]; threshold schemes
//! plug in at that seam.

use crate::{
    bundle::{KeysharesBundle, ShareRecord, KEYSHARES_VERSION},
    operators::OperatorSet,
    validators::{validate_password, Address, PasswordCheck},
};
use anyhow::Context as _;
use base64::Engine as _;
use keyshares_crypto::keystore::Keystore;
use rand::RngCore as _;
use std::path::PathBuf;
use time::format_description::well_known::Rfc3339;
use zeroize::Zeroizing;

/// Splits a secret into per-operator shares.
pub trait ShareScheme {
    /// Splits `secret` into `n` shares, one per operator, in operator
    /// order.
    fn split(&self, secret: &[u8], n: usize) -> anyhow::Result<Vec<Zeroizing<Vec<u8>>>>;
}

/// n-of-n xor masking: every share but the last is a uniformly random pad,
/// the last is the secret xored with all pads. Xoring all shares together
/// reconstructs the secret; any subset short of that learns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct XorSplit;

impl ShareScheme for XorSplit {
    fn split(&self, secret: &[u8], n: usize) -> anyhow::Result<Vec<Zeroizing<Vec<u8>>>> {
        anyhow::ensure!(n > 0, "cannot split into zero shares");
        let mut rng = rand::rngs::OsRng;
        let mut last = Zeroizing::new(secret.to_vec());
        let mut shares = Vec::with_capacity(n);
        for _ in 0..n - 1 {
            let mut pad = Zeroizing::new(vec![0u8; secret.len()]);
            rng.fill_bytes(&mut pad);
            for (acc, byte) in last.iter_mut().zip(pad.iter()) {
                *acc ^= byte;
            }
            shares.push(pad);
        }
        shares.push(last);
        Ok(shares)
    }
}

/// Inputs for one keyshares build.
#[derive(Debug)]
pub struct BuildRequest {
    /// Path to the EIP-2335 keystore file.
    pub keystore: PathBuf,
    /// Keystore password.
    pub password: String,
    /// Operators receiving shares.
    pub operators: OperatorSet,
    /// Account owning the validator registration.
    pub owner_address: Address,
    /// Registration nonce of the owner account.
    pub owner_nonce: u64,
    /// Directory the bundle is written to.
    pub output_dir: PathBuf,
}

/// Runs the full pipeline: validators first (password, then operator keys;
/// arity is already enforced by [`OperatorSet`]), then keystore decryption,
/// share splitting, per-operator sealing and the bundle write. Returns the
/// path of the written bundle.
pub fn build_keyshares(req: &BuildRequest, scheme: &impl ShareScheme) -> anyhow::Result<PathBuf> {
    match validate_password(&req.password, &req.keystore) {
        PasswordCheck::Valid => {}
        check => anyhow::bail!(
            "{}",
            check.user_message().unwrap_or("keystore password rejected")
        ),
    }
    let keys = req.operators.validate_keys()?;

    let keystore = Keystore::load(&req.keystore)?;
    let secret = keystore
        .decrypt(&req.password)
        .context("decrypting keystore")?;
    let shares = scheme.split(&secret, req.operators.len())?;
    anyhow::ensure!(
        shares.len() == req.operators.len(),
        "share scheme returned {} shares for {} operators",
        shares.len(),
        req.operators.len()
    );

    let rng = &mut rand::rngs::OsRng;
    let b64 = base64::engine::general_purpose::STANDARD;
    let mut records = Vec::with_capacity(keys.len());
    for ((id, key), share) in req.operators.ids().iter().zip(&keys).zip(&shares) {
        let sealed = key
            .encrypt(rng, share)
            .with_context(|| format!("sealing share for operator {id}"))?;
        records.push(ShareRecord {
            operator_id: *id,
            operator_key: b64.encode(key.to_pem()),
            share: b64.encode(sealed),
        });
    }

    let bundle = KeysharesBundle {
        version: KEYSHARES_VERSION.into(),
        created_at: time::OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .context("formatting timestamp")?,
        owner_address: req.owner_address,
        owner_nonce: req.owner_nonce,
        public_key: keystore.pubkey.clone(),
        shares: records,
    };
    let path = bundle.write(&req.output_dir)?;
    tracing::info!(
        path = %path.display(),
        operators = req.operators.len(),
        "wrote keyshares bundle"
    );
    Ok(path)
}
