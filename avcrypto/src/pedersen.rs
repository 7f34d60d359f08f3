use crate::*;
use elliptic_curve::ff::Field;
use log::warn;
use rand::{CryptoRng, RngCore};

/// A Pedersen commitment `C = r·G + Σ mᵢ·Hᵢ`, openable when `r` is known
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Commitment<C: Curve> {
    pub c: C::Point,
    pub r: Option<C::Scalar>,
}

impl<C: Curve> Commitment<C> {
    /// A published commitment, without its opening
    pub fn new(c: C::Point) -> Self {
        Commitment { c, r: None }
    }

    pub fn is_openable(&self) -> bool {
        self.r.is_some()
    }

    /// Attach the opening randomness to a published commitment
    pub fn with_randomness(self, r: C::Scalar) -> Self {
        Commitment { c: self.c, r: Some(r) }
    }

    pub fn to_hex(&self) -> String {
        point_to_hex::<C>(&self.c)
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        Ok(Commitment::new(hex_to_point::<C>(s)?))
    }
}

/// Per-index generators `Hᵢ = hash_to_point(context ∥ hex(G) ∥ i)`
pub fn commitment_generators<C: Curve>(context: &str, count: usize) -> Result<Vec<C::Point>> {
    let base = point_to_hex::<C>(&generator::<C>());
    (0..count)
        .map(|i| hash_to_point::<C>(&format!("{}{}{}", context, base, i)))
        .collect()
}

/// Commit to `messages` under `context` with the given randomness
pub fn commit<C: Curve>(
    messages: &[C::Scalar],
    context: &str,
    randomness: &C::Scalar,
) -> Result<Commitment<C>> {
    let generators = commitment_generators::<C>(context, messages.len())?;
    let c = generator::<C>() * *randomness + multi_scalar_mul::<C>(messages, &generators)?;

    Ok(Commitment {
        c,
        r: Some(*randomness),
    })
}

/// Commit to `messages` under `context` with fresh randomness drawn from `rng`
pub fn commit_random<C: Curve, R: RngCore + CryptoRng>(
    messages: &[C::Scalar],
    context: &str,
    rng: &mut R,
) -> Result<Commitment<C>> {
    commit::<C>(messages, context, &C::Scalar::random(&mut *rng))
}

/// Check an opened commitment against the committed messages
pub fn is_valid_commitment<C: Curve>(
    commitment: &Commitment<C>,
    messages: &[C::Scalar],
    context: &str,
) -> Result<bool> {
    let r = commitment
        .r
        .ok_or_else(|| Error::InvalidCommitment("commitment must be openable".to_owned()))?;

    let recomputed = commit::<C>(messages, context, &r)?;
    let valid = recomputed.c == commitment.c;
    if !valid {
        warn!("commitment opening does not match for context {:?}", context);
    }

    Ok(valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    type Scalar = <Secp256k1 as Curve>::Scalar;

    fn random_scalars(rng: &mut ChaCha20Rng, count: usize) -> Vec<Scalar> {
        (0..count)
            .map(|_| KeyPair::<Secp256k1>::random(rng).private_key)
            .collect()
    }

    #[test]
    fn test_binding() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let messages = random_scalars(&mut rng, 4);
        let randomness = random_scalars(&mut rng, 1)[0];

        let commitment = commit::<Secp256k1>(&messages, "contest-a", &randomness).unwrap();
        assert!(is_valid_commitment(&commitment, &messages, "contest-a").unwrap());

        // Different message
        let mut tampered = messages.clone();
        tampered[2] = tampered[2] + Scalar::from(1u64);
        assert!(!is_valid_commitment(&commitment, &tampered, "contest-a").unwrap());

        // Different context
        assert!(!is_valid_commitment(&commitment, &messages, "contest-b").unwrap());

        // Different commitment point
        let moved = Commitment::<Secp256k1> {
            c: commitment.c + generator::<Secp256k1>(),
            r: commitment.r,
        };
        assert!(!is_valid_commitment(&moved, &messages, "contest-a").unwrap());

        // Fewer messages
        assert!(!is_valid_commitment(&commitment, &messages[..3], "contest-a").unwrap());
    }

    #[test]
    fn test_unopenable_commitment() {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let messages = random_scalars(&mut rng, 2);
        let commitment = commit::<Secp256k1>(&messages, "ctx", &messages[0]).unwrap();

        let published = Commitment::<Secp256k1>::from_hex(&commitment.to_hex()).unwrap();
        assert!(!published.is_openable());
        assert!(matches!(
            is_valid_commitment(&published, &messages, "ctx"),
            Err(Error::InvalidCommitment(_))
        ));

        let reopened = published.with_randomness(messages[0]);
        assert!(is_valid_commitment(&reopened, &messages, "ctx").unwrap());
    }

    #[test]
    fn test_commit_random() {
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        let messages = random_scalars(&mut rng, 3);

        let commitment = commit_random::<Secp256k1, _>(&messages, "ctx", &mut rng).unwrap();
        assert!(commitment.is_openable());
        assert!(is_valid_commitment(&commitment, &messages, "ctx").unwrap());

        // Fresh randomness hides equal messages
        let other = commit_random::<Secp256k1, _>(&messages, "ctx", &mut rng).unwrap();
        assert_ne!(commitment.c, other.c);

        // The same seed gives the same commitment
        let a = commit_random::<Secp256k1, _>(&messages, "ctx", &mut ChaCha20Rng::seed_from_u64(9));
        let b = commit_random::<Secp256k1, _>(&messages, "ctx", &mut ChaCha20Rng::seed_from_u64(9));
        assert_eq!(a.unwrap(), b.unwrap());
    }

    #[test]
    fn test_generators_are_independent() {
        let generators = commitment_generators::<Secp521r1>("ctx", 3).unwrap();
        assert_ne!(generators[0], generators[1]);
        assert_ne!(generators[1], generators[2]);
        assert_ne!(generators[0], generator::<Secp521r1>());

        // A longer list extends, rather than replaces, a shorter one
        let more = commitment_generators::<Secp521r1>("ctx", 4).unwrap();
        assert_eq!(&more[..3], &generators[..]);
    }
}
