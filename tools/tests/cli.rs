//! End-to-end smoke test: runs the built CLI binary against a generated
//! keystore and operator set, and checks the produced keyshares artifact.

use base64::Engine as _;
use keyshares_crypto::{keystore::testonly as keystore_testonly, rsa};
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{path::Path, process::Command};

const PASSWORD: &str = "123123123";
const OWNER: &str = "0x81592c3de184a3e2c0dcb5a261bc107bfa91f494";

fn write_keystore(rng: &mut StdRng, path: &Path) -> [u8; 32] {
    let secret: [u8; 32] = rng.gen();
    let keystore = keystore_testonly::encrypt(rng, &secret, PASSWORD);
    std::fs::write(path, serde_json::to_string(&keystore).unwrap()).unwrap();
    secret
}

fn operator_keys(rng: &mut StdRng, n: usize) -> Vec<String> {
    let b64 = base64::engine::general_purpose::STANDARD;
    (0..n)
        .map(|_| b64.encode(rng.gen::<rsa::PublicKey>().to_pem()))
        .collect()
}

#[test]
fn cli_produces_keyshares_file() {
    let mut rng = StdRng::seed_from_u64(29483920);
    let dir = tempfile::TempDir::new().unwrap();
    let keystore_path = dir.path().join("keystore.json");
    let out_dir = dir.path().join("output");
    write_keystore(&mut rng, &keystore_path);

    let output = Command::new(env!("CARGO_BIN_EXE_keyshares"))
        .arg(format!("--keystore={}", keystore_path.display()))
        .arg(format!("--password={PASSWORD}"))
        .arg("--operator-ids=123,456,789,777")
        .arg(format!(
            "--operator-keys={}",
            operator_keys(&mut rng, 4).join(",")
        ))
        .arg(format!("--owner-address={OWNER}"))
        .arg("--owner-nonce=1")
        .arg(format!("--output-folder={}", out_dir.display()))
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let files: Vec<String> = std::fs::read_dir(&out_dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(files.len(), 1, "expected exactly one output file: {files:?}");
    assert!(
        files[0].starts_with("keyshares") && files[0].ends_with(".json"),
        "unexpected file name {:?}",
        files[0]
    );

    let raw = std::fs::read_to_string(out_dir.join(&files[0])).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.get("version").is_some());
    let shares = json["shares"].as_array().expect("shares must be an array");
    assert_eq!(shares.len(), 4);
}

#[test]
fn cli_fails_on_wrong_password() {
    let mut rng = StdRng::seed_from_u64(397349493);
    let dir = tempfile::TempDir::new().unwrap();
    let keystore_path = dir.path().join("keystore.json");
    let out_dir = dir.path().join("output");
    write_keystore(&mut rng, &keystore_path);

    let output = Command::new(env!("CARGO_BIN_EXE_keyshares"))
        .arg(format!("--keystore={}", keystore_path.display()))
        .arg("--password=not-the-password")
        .arg("--operator-ids=123,456,789,777")
        .arg(format!(
            "--operator-keys={}",
            operator_keys(&mut rng, 4).join(",")
        ))
        .arg(format!("--owner-address={OWNER}"))
        .arg("--owner-nonce=1")
        .arg(format!("--output-folder={}", out_dir.display()))
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(
        String::from_utf8_lossy(&output.stderr).contains("Invalid keystore file password."),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(!out_dir.exists());
}
