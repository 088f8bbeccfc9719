//! Cryptographic primitives used by the keyshares generation pipeline:
//! operator RSA keys and EIP-2335 encrypted keystores.

pub mod keystore;
pub mod rsa;
