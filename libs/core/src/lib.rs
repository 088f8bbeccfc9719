//! Validation and assembly of keyshares bundles. The validators gate every
//! input (operator RSA keys, operator count, keystore password) before any
//! key material is touched; the `build` module turns validated inputs into
//! the keyshares JSON artifact.

pub mod build;
pub mod bundle;
pub mod operators;
pub mod validators;
