//! Hex-in, hex-out entry points for callers that only know the curve name at runtime

use crate::*;
use crate::with_curve;
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use std::str::FromStr;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct EncryptedVote {
    pub cryptograms: Vec<String>,
    pub randomizers: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct CommitmentResult {
    pub commitment: String,
    pub randomizer: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HexKeyPair {
    pub private_key: String,
    pub public_key: String,
}

fn decode_scalars<C: Curve>(hexes: &[String]) -> Result<Vec<C::Scalar>> {
    hexes.iter().map(|hex| hex_to_scalar::<C>(hex)).collect()
}

/// Crypto operations on a curve chosen by name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvCrypto {
    curve: CurveName,
}

impl AvCrypto {
    pub fn new(curve_name: &str) -> Result<Self> {
        Ok(AvCrypto {
            curve: CurveName::from_str(curve_name)?,
        })
    }

    pub fn curve(&self) -> CurveName {
        self.curve
    }

    pub fn generate_key_pair(&self) -> HexKeyPair {
        self.generate_key_pair_with_rng(&mut OsRng)
    }

    pub fn generate_key_pair_with_rng<R: RngCore + CryptoRng>(&self, rng: &mut R) -> HexKeyPair {
        with_curve!(self.curve, |C| {
            let key_pair = KeyPair::<C>::random(rng);
            HexKeyPair {
                private_key: scalar_to_hex::<C>(&key_pair.private_key),
                public_key: point_to_hex::<C>(&key_pair.public_key),
            }
        })
    }

    /// Encrypt vote bytes under a hex encoded election key
    pub fn encrypt_vote(&self, vote: &[u8], encryption_key: &str) -> Result<EncryptedVote> {
        self.encrypt_vote_with_rng(vote, encryption_key, &mut OsRng)
    }

    pub fn encrypt_vote_with_rng<R: RngCore + CryptoRng>(
        &self,
        vote: &[u8],
        encryption_key: &str,
        rng: &mut R,
    ) -> Result<EncryptedVote> {
        with_curve!(self.curve, |C| {
            let key = hex_to_point::<C>(encryption_key)?;
            let (cryptograms, randomizers) = crate::encrypt_vote::<C, R>(vote, &key, rng)?;

            Ok(EncryptedVote {
                cryptograms: cryptograms.iter().map(Cryptogram::to_hex).collect(),
                randomizers: randomizers.iter().map(scalar_to_hex::<C>).collect(),
            })
        })
    }

    /// Homomorphically add two hex encoded cryptograms
    pub fn combine_cryptograms(&self, a: &str, b: &str) -> Result<String> {
        with_curve!(self.curve, |C| {
            let a = Cryptogram::<C>::from_hex(a)?;
            let b = Cryptogram::<C>::from_hex(b)?;
            Ok(a.homomorphically_add(&b).to_hex())
        })
    }

    /// Recover vote bytes from cryptograms and their combined randomizers
    pub fn revert_encryption(
        &self,
        cryptograms: &[String],
        randomizers: &[String],
        encryption_key: &str,
    ) -> Result<Vec<u8>> {
        with_curve!(self.curve, |C| {
            let cryptograms = cryptograms
                .iter()
                .map(|hex| Cryptogram::<C>::from_hex(hex))
                .collect::<Result<Vec<_>>>()?;
            let randomizers = decode_scalars::<C>(randomizers)?;
            let key = hex_to_point::<C>(encryption_key)?;

            crate::revert_encryption::<C>(&cryptograms, &randomizers, &key)
        })
    }

    /// Pedersen commitment to hex encoded randomizers
    pub fn commit(&self, randomizers: &[String], context: &str) -> Result<CommitmentResult> {
        self.commit_with_rng(randomizers, context, &mut OsRng)
    }

    pub fn commit_with_rng<R: RngCore + CryptoRng>(
        &self,
        randomizers: &[String],
        context: &str,
        rng: &mut R,
    ) -> Result<CommitmentResult> {
        with_curve!(self.curve, |C| {
            let messages = decode_scalars::<C>(randomizers)?;
            let randomness = KeyPair::<C>::random(rng).private_key;
            let commitment = crate::commit::<C>(&messages, context, &randomness)?;

            Ok(CommitmentResult {
                commitment: commitment.to_hex(),
                randomizer: scalar_to_hex::<C>(&randomness),
            })
        })
    }

    pub fn is_valid_commitment(
        &self,
        commitment: &str,
        randomizer: &str,
        randomizers: &[String],
        context: &str,
    ) -> Result<bool> {
        with_curve!(self.curve, |C| {
            let randomness = hex_to_scalar::<C>(randomizer)?;
            let commitment = Commitment::<C>::from_hex(commitment)?.with_randomness(randomness);
            let messages = decode_scalars::<C>(randomizers)?;

            crate::is_valid_commitment(&commitment, &messages, context)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    const CURVES: [&str; 4] = ["secp256k1", "secp256r1", "secp384r1", "secp521r1"];

    #[test]
    fn test_unsupported_curve() {
        assert!(matches!(
            AvCrypto::new("curve25519"),
            Err(Error::UnsupportedCurve(_))
        ));
    }

    #[test]
    fn test_encrypt_combine_revert() {
        let mut rng = ChaCha20Rng::seed_from_u64(81);

        for name in CURVES.iter() {
            let crypto = AvCrypto::new(name).unwrap();
            let election = crypto.generate_key_pair_with_rng(&mut rng);

            let vote = b"option1";
            let encrypted = crypto
                .encrypt_vote_with_rng(vote, &election.public_key, &mut rng)
                .unwrap();
            assert_eq!(encrypted.cryptograms.len(), 1);
            assert_eq!(encrypted.randomizers.len(), 1);

            let bytes = crypto
                .revert_encryption(
                    &encrypted.cryptograms,
                    &encrypted.randomizers,
                    &election.public_key,
                )
                .unwrap();
            assert_eq!(&bytes[..vote.len()], vote);

            let other = crypto
                .encrypt_vote_with_rng(b"option2", &election.public_key, &mut rng)
                .unwrap();
            let combined = crypto
                .combine_cryptograms(&encrypted.cryptograms[0], &other.cryptograms[0])
                .unwrap();
            assert_eq!(combined.len(), encrypted.cryptograms[0].len());
            assert_ne!(combined, encrypted.cryptograms[0]);
        }
    }

    #[test]
    fn test_commit() {
        let mut rng = ChaCha20Rng::seed_from_u64(82);

        for name in CURVES.iter() {
            let crypto = AvCrypto::new(name).unwrap();
            let election = crypto.generate_key_pair_with_rng(&mut rng);
            let encrypted = crypto
                .encrypt_vote_with_rng(b"vote", &election.public_key, &mut rng)
                .unwrap();
            let randomizers = &encrypted.randomizers;

            let result = crypto
                .commit_with_rng(randomizers, "ctx", &mut rng)
                .unwrap();
            assert!(crypto
                .is_valid_commitment(&result.commitment, &result.randomizer, randomizers, "ctx")
                .unwrap());
            assert!(!crypto
                .is_valid_commitment(&result.commitment, &result.randomizer, randomizers, "other")
                .unwrap());

            // Malformed hex is an error rather than a failed check
            assert!(crypto
                .is_valid_commitment(&result.commitment, "zz", randomizers, "ctx")
                .is_err());
        }
    }

    #[test]
    fn test_decode_errors() {
        let crypto = AvCrypto::new("secp256k1").unwrap();
        assert!(matches!(
            crypto.combine_cryptograms("00", "00"),
            Err(Error::InvalidEncoding(_))
        ));
        assert!(crypto.encrypt_vote(b"x", "02").is_err());
    }
}
