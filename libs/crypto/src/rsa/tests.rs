use super::*;
use base64::Engine as _;
use rand::{rngs::StdRng, Rng, SeedableRng};

#[test]
fn pem_round_trip() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let pk: PublicKey = rng.gen();
    let pem = pk.to_pem();
    assert!(pem.starts_with("-----BEGIN RSA PUBLIC KEY-----"));
    assert_eq!(PublicKey::from_pem(&pem).unwrap(), pk);
}

// Registry keys often carry an SPKI DER body inside the PKCS#1 envelope;
// those must parse too.
#[test]
fn pem_accepts_spki_body() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let pk: PublicKey = rng.gen();
    let der = ::rsa::pkcs8::EncodePublicKey::to_public_key_der(&pk.0).unwrap();
    let b64 = base64::engine::general_purpose::STANDARD.encode(der.as_bytes());
    let mut pem = String::from("-----BEGIN RSA PUBLIC KEY-----\n");
    for chunk in b64.as_bytes().chunks(64) {
        pem.push_str(std::str::from_utf8(chunk).unwrap());
        pem.push('\n');
    }
    pem.push_str("-----END RSA PUBLIC KEY-----\n");
    assert_eq!(PublicKey::from_pem(&pem).unwrap(), pk);
}

#[test]
fn pem_rejects_garbage() {
    PublicKey::from_pem("-----BEGIN RSA PUBLIC KEY-----\nZ2FyYmFnZQ==\n-----END RSA PUBLIC KEY-----\n")
        .expect_err("parsing a garbage body should fail");
    PublicKey::from_pem("not a pem at all").expect_err("parsing non-PEM text should fail");
}

// Seal a small payload to an operator key and open it with the matching
// secret key.
#[test]
fn oaep_round_trip() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let sk: SecretKey = rng.gen();
    let share: [u8; 32] = rng.gen();
    let sealed = sk.public().encrypt(&mut rng, &share).unwrap();
    assert_ne!(&sealed[..], &share[..]);
    assert_eq!(sk.decrypt(&sealed).unwrap(), share);
}

// Make sure a ciphertext cannot be opened by a different operator.
#[test]
fn oaep_wrong_key_failure() {
    let mut rng = StdRng::seed_from_u64(29483920);

    let sk1: SecretKey = rng.gen();
    let sk2: SecretKey = rng.gen();
    let share: [u8; 32] = rng.gen();
    let sealed = sk1.public().encrypt(&mut rng, &share).unwrap();
    assert!(sk2.decrypt(&sealed).is_err());
}
