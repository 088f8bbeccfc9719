//! Keystore construction, intended for use in testing. The KDF parameters
//! are deliberately cheap so test suites stay fast; real keystores use much
//! heavier settings.

use super::{
    apply_aes128_ctr, derive_key, ChecksumModule, CipherModule, CipherParams, Crypto, Kdf,
    KdfModule, Keystore, CHECKSUM_FN, CIPHER_FN, KEYSTORE_VERSION,
};
use rand::{Rng, RngCore as _};
use sha2::{Digest as _, Sha256};

/// Builds a keystore holding `secret` encrypted under `password`, with the
/// given KDF.
pub fn encrypt_with<R: Rng + ?Sized>(
    rng: &mut R,
    secret: &[u8],
    password: &str,
    kdf: Kdf,
) -> Keystore {
    let iv: [u8; 16] = rng.gen();
    let dk = derive_key(&kdf, password).unwrap();
    let mut ciphertext = secret.to_vec();
    apply_aes128_ctr(&dk[..16], &iv, &mut ciphertext).unwrap();

    let mut hasher = Sha256::new();
    hasher.update(&dk[16..32]);
    hasher.update(&ciphertext);
    let checksum = hasher.finalize();

    let uuid: [u8; 16] = rng.gen();
    // rand only samples arrays up to 32 elements, so fill the 48-byte
    // public key slot manually.
    let mut pubkey = [0u8; 48];
    rng.fill_bytes(&mut pubkey);
    Keystore {
        crypto: Crypto {
            kdf: KdfModule {
                kdf,
                message: String::new(),
            },
            checksum: ChecksumModule {
                function: CHECKSUM_FN.into(),
                params: serde_json::Map::new(),
                message: hex::encode(checksum),
            },
            cipher: CipherModule {
                function: CIPHER_FN.into(),
                params: CipherParams {
                    iv: hex::encode(iv),
                },
                message: hex::encode(&ciphertext),
            },
        },
        pubkey: Some(hex::encode(pubkey)),
        path: Some("m/12381/3600/0/0/0".into()),
        description: None,
        uuid: format_uuid(&uuid),
        version: KEYSTORE_VERSION,
    }
}

/// Builds a keystore with cheap pbkdf2 parameters.
pub fn encrypt<R: Rng + ?Sized>(rng: &mut R, secret: &[u8], password: &str) -> Keystore {
    let kdf = Kdf::Pbkdf2 {
        dklen: 32,
        c: 32,
        prf: "hmac-sha256".into(),
        salt: hex::encode(rng.gen::<[u8; 32]>()),
    };
    encrypt_with(rng, secret, password, kdf)
}

/// Builds a keystore with cheap scrypt parameters.
pub fn encrypt_scrypt<R: Rng + ?Sized>(rng: &mut R, secret: &[u8], password: &str) -> Keystore {
    let kdf = Kdf::Scrypt {
        dklen: 32,
        n: 4,
        p: 1,
        r: 8,
        salt: hex::encode(rng.gen::<[u8; 32]>()),
    };
    encrypt_with(rng, secret, password, kdf)
}

fn format_uuid(bytes: &[u8; 16]) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        hex::encode(&bytes[..4]),
        hex::encode(&bytes[4..6]),
        hex::encode(&bytes[6..8]),
        hex::encode(&bytes[8..10]),
        hex::encode(&bytes[10..]),
    )
}
