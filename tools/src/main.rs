//! Command-line tool producing a keyshares bundle. It validates the inputs
//! (keystore password, operator count, operator RSA keys), derives and seals
//! the per-operator shares and writes the bundle JSON to the output folder.

use anyhow::Context as _;
use clap::Parser;
use keyshares_core::{
    build::{build_keyshares, BuildRequest, XorSplit},
    operators::OperatorSet,
    validators::Address,
};
use std::{io::IsTerminal as _, path::PathBuf};
use tracing_subscriber::{prelude::*, EnvFilter, Registry};


/// Command-line application producing a keyshares bundle.
#[derive(Debug, Parser)]
#[command(name = "keyshares")]
struct Args {
    /// Path to the EIP-2335 keystore file.
    #[arg(long)]
    keystore: PathBuf,
    /// Password unlocking the keystore.
    #[arg(long)]
    password: String,
    /// Comma-separated operator ids, in the same order as the keys.
    #[arg(long, value_delimiter = ',', required = true)]
    operator_ids: Vec<u64>,
    /// Comma-separated operator RSA public keys, PEM or base64-encoded PEM.
    #[arg(long, value_delimiter = ',', required = true)]
    operator_keys: Vec<String>,
    /// Account owning the validator registration, 0x-prefixed hex.
    #[arg(long)]
    owner_address: Address,
    /// Registration nonce of the owner account.
    #[arg(long)]
    owner_nonce: u64,
    /// Directory the bundle is written to.
    #[arg(long, default_value = ".")]
    output_folder: PathBuf,
}

impl Args {
    /// Turns parsed arguments into a build request, enforcing the operator
    /// set invariants.
    fn into_request(self) -> anyhow::Result<BuildRequest> {
        let operators = OperatorSet::new(self.operator_ids, self.operator_keys)
            .context("invalid operator set")?;
        Ok(BuildRequest {
            keystore: self.keystore,
            password: self.password,
            operators,
            owner_address: self.owner_address,
            owner_nonce: self.owner_nonce,
            output_dir: self.output_folder,
        })
    }
}

fn main() -> anyhow::Result<()> {
    let args: Args = Args::parse();

    // Human-readable logs on stdout, INFO and higher unless RUST_LOG says
    // otherwise. Never log the parsed arguments: they carry the password.
    let stdout_log = tracing_subscriber::fmt::layer()
        .with_ansi(std::env::var("NO_COLOR").is_err() && std::io::stdout().is_terminal())
        .with_file(false)
        .with_line_number(false)
        .with_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")));
    Registry::default().with(stdout_log).init();

    let req = args.into_request()?;
    let path = build_keyshares(&req, &XorSplit)?;
    tracing::info!("keyshares bundle written to {}", path.display());
    Ok(())
}
