//! Random key generation, intended for use in testing.

use super::{PublicKey, SecretKey};
use rand::{distributions::Standard, prelude::Distribution, rngs::StdRng, Rng, SeedableRng};

/// Generates a random SecretKey. This is meant for testing purposes.
/// Key generation needs a cryptographic rng, so the sampled entropy seeds one.
impl Distribution<SecretKey> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> SecretKey {
        let mut rng = StdRng::from_seed(rng.gen());
        SecretKey::generate(&mut rng).unwrap()
    }
}

/// Generates a random PublicKey. This is meant for testing purposes.
impl Distribution<PublicKey> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PublicKey {
        rng.gen::<SecretKey>().public()
    }
}
