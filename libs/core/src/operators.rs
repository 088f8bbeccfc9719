//! Ordered operator sets.

use crate::validators::{is_operator_count_valid, validate_operator_key};
use anyhow::Context as _;
use keyshares_crypto::rsa;
use std::collections::BTreeSet;

/// An ordered set of operators: numeric ids paired 1:1 with their RSA
/// public keys, kept in input order. The key strings are stored as supplied
/// (PEM or base64 PEM); [`Self::validate_keys`] normalizes and parses them.
#[derive(Debug, Clone)]
pub struct OperatorSet {
    ids: Vec<u64>,
    keys: Vec<String>,
}

impl OperatorSet {
    /// Constructs a set, enforcing the pairing and arity invariants:
    /// as many keys as ids, n in {4, 7, 10, 13}, ids positive and unique.
    pub fn new(ids: Vec<u64>, keys: Vec<String>) -> anyhow::Result<Self> {
        anyhow::ensure!(
            ids.len() == keys.len(),
            "got {} operator ids for {} operator keys",
            ids.len(),
            keys.len()
        );
        anyhow::ensure!(
            is_operator_count_valid(ids.len()),
            "invalid operator count {}: must be 4, 7, 10 or 13",
            ids.len()
        );
        anyhow::ensure!(ids.iter().all(|id| *id > 0), "operator ids must be positive");
        let mut seen = BTreeSet::new();
        anyhow::ensure!(
            ids.iter().all(|id| seen.insert(*id)),
            "operator ids must be unique"
        );
        Ok(Self { ids, keys })
    }

    /// Number of operators.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Operator ids, in input order.
    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    /// Raw operator key strings, in input order.
    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Number of faulty operators the set tolerates (n = 3f+1).
    pub fn fault_tolerance(&self) -> usize {
        (self.len() - 1) / 3
    }

    /// Number of shares needed to produce a signature (2f+1).
    pub fn threshold(&self) -> usize {
        2 * self.fault_tolerance() + 1
    }

    /// Runs the RSA key validator over every member, in order. On failure
    /// the error names the offending operator.
    pub fn validate_keys(&self) -> anyhow::Result<Vec<rsa::PublicKey>> {
        self.ids
            .iter()
            .zip(&self.keys)
            .map(|(id, key)| validate_operator_key(key).with_context(|| format!("operator {id}")))
            .collect()
    }
}
