use super::*;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn verify_password_smoke() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    let keystore = testonly::encrypt(&mut rng, &secret, "123123123");
    assert!(keystore.verify_password("123123123").unwrap());
    assert!(!keystore.verify_password("wrong password").unwrap());
}

#[test]
fn decrypt_round_trip() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    let keystore = testonly::encrypt(&mut rng, &secret, "correct horse battery staple");
    let decrypted = keystore.decrypt("correct horse battery staple").unwrap();
    assert_eq!(&decrypted[..], &secret[..]);
    keystore
        .decrypt("wrong password")
        .expect_err("decrypting with a wrong password should fail");
}

#[test]
fn scrypt_round_trip() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    let keystore = testonly::encrypt_scrypt(&mut rng, &secret, "123123123");
    assert!(keystore.verify_password("123123123").unwrap());
    assert!(!keystore.verify_password("123123124").unwrap());
    assert_eq!(&keystore.decrypt("123123123").unwrap()[..], &secret[..]);
}

// The password goes through NFKD normalization, so two canonically equal
// spellings must unlock the same keystore.
#[test]
fn password_normalization() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    // "é" precomposed vs. "e" + combining acute accent.
    let keystore = testonly::encrypt(&mut rng, &secret, "caf\u{e9}");
    assert!(keystore.verify_password("cafe\u{301}").unwrap());
}

#[test]
fn json_round_trip() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    let keystore = testonly::encrypt_scrypt(&mut rng, &secret, "123123123");
    let raw = serde_json::to_string_pretty(&keystore).unwrap();
    let parsed: Keystore = serde_json::from_str(&raw).unwrap();
    assert!(parsed.verify_password("123123123").unwrap());
    assert_eq!(&parsed.decrypt("123123123").unwrap()[..], &secret[..]);
    // Generated documents carry a 48-byte hex pubkey, like real BLS
    // keystores.
    assert_eq!(parsed.pubkey.unwrap().len(), 96);
}

#[test]
fn load_rejects_bad_documents() {
    let mut rng = StdRng::seed_from_u64(29483920);
    let dir = tempfile::TempDir::new().unwrap();

    // Missing file.
    Keystore::load(&dir.path().join("nope.json")).expect_err("missing file should fail");

    // Not JSON.
    let garbage = dir.path().join("garbage.json");
    std::fs::write(&garbage, "definitely not json").unwrap();
    Keystore::load(&garbage).expect_err("non-JSON content should fail");

    // Wrong version.
    let secret: [u8; 32] = rng.gen();
    let mut keystore = testonly::encrypt(&mut rng, &secret, "123123123");
    keystore.version = 3;
    let old = dir.path().join("old.json");
    std::fs::write(&old, serde_json::to_string(&keystore).unwrap()).unwrap();
    Keystore::load(&old).expect_err("version 3 documents should be rejected");
}

#[test]
fn unsupported_modules_fail() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let secret: [u8; 32] = rng.gen();
    let mut keystore = testonly::encrypt(&mut rng, &secret, "123123123");
    keystore.crypto.checksum.function = "sha512".into();
    keystore
        .verify_password("123123123")
        .expect_err("unknown checksum function should fail");

    let mut keystore = testonly::encrypt(&mut rng, &secret, "123123123");
    keystore.crypto.cipher.function = "aes-256-gcm".into();
    keystore
        .decrypt("123123123")
        .expect_err("unknown cipher function should fail");
}
