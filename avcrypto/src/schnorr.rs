use crate::*;

/// A Schnorr signature `(e, s)` over a message string
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Signature<C: Curve> {
    pub e: C::Scalar,
    pub s: C::Scalar,
}

impl<C: Curve> Signature<C> {
    /// Sign `message` with `private_key`, using `randomness` as the nonce
    pub fn sign(message: &str, private_key: &C::Scalar, randomness: &KeyPair<C>) -> Result<Self> {
        let e = challenge::<C>(&randomness.public_key, message)?;
        let s = randomness.private_key - e * *private_key;

        Ok(Signature { e, s })
    }

    pub fn is_valid(&self, message: &str, public_key: &C::Point) -> Result<bool> {
        let r = generator::<C>() * self.s + *public_key * self.e;
        Ok(challenge::<C>(&r, message)? == self.e)
    }

    /// Hex of `e` followed by hex of `s`
    pub fn to_hex(&self) -> String {
        format!("{}{}", scalar_to_hex::<C>(&self.e), scalar_to_hex::<C>(&self.s))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let width = scalar_hex_length::<C>();
        if s.len() != 2 * width || !s.is_char_boundary(width) {
            return Err(Error::InvalidEncoding(format!(
                "{:?} is not a valid {} signature encoding",
                s,
                C::NAME
            )));
        }

        let (e, rest) = s.split_at(width);
        Ok(Signature {
            e: hex_to_scalar::<C>(e)?,
            s: hex_to_scalar::<C>(rest)?,
        })
    }
}

fn challenge<C: Curve>(r: &C::Point, message: &str) -> Result<C::Scalar> {
    hash_to_scalar::<C>(&format!("{}{}", point_to_hex::<C>(r), message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn sign_and_verify<C: Curve>() {
        let mut rng = ChaCha20Rng::seed_from_u64(31);
        let signer = KeyPair::<C>::random(&mut rng);
        let other = KeyPair::<C>::random(&mut rng);

        let signature =
            Signature::<C>::sign("hello", &signer.private_key, &KeyPair::random(&mut rng)).unwrap();
        assert!(signature.is_valid("hello", &signer.public_key).unwrap());

        // Tampered message
        assert!(!signature.is_valid("hellp", &signer.public_key).unwrap());
        // Wrong public key
        assert!(!signature.is_valid("hello", &other.public_key).unwrap());
        // Tampered scalars
        let bumped = Signature::<C> {
            e: signature.e,
            s: signature.s + C::Scalar::from(1u64),
        };
        assert!(!bumped.is_valid("hello", &signer.public_key).unwrap());
        let bumped = Signature::<C> {
            e: signature.e + C::Scalar::from(1u64),
            s: signature.s,
        };
        assert!(!bumped.is_valid("hello", &signer.public_key).unwrap());

        let decoded = Signature::<C>::from_hex(&signature.to_hex()).unwrap();
        assert_eq!(decoded, signature);
    }

    #[test]
    fn test_sign_and_verify() {
        sign_and_verify::<Secp256k1>();
        sign_and_verify::<Secp256r1>();
        sign_and_verify::<Secp384r1>();
        sign_and_verify::<Secp521r1>();
    }

    #[test]
    fn test_deterministic_with_fixed_randomness() {
        let randomness = KeyPair::<Secp256k1>::from_seed("fixed_keypair").unwrap();
        let private_key = hash_to_scalar::<Secp256k1>("fixed_scalar1").unwrap();

        let a = Signature::<Secp256k1>::sign("hello", &private_key, &randomness).unwrap();
        let b = Signature::<Secp256k1>::sign("hello", &private_key, &randomness).unwrap();
        assert_eq!(a.to_hex(), b.to_hex());
        assert_eq!(a.to_hex().len(), 128);
    }

    #[test]
    fn test_from_hex_rejects_bad_width() {
        assert!(Signature::<Secp256k1>::from_hex(&"1".repeat(127)).is_err());
        assert!(Signature::<Secp256k1>::from_hex(&"1".repeat(130)).is_err());
    }
}
