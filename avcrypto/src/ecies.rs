//! ECIES over the election curve.
//!
//! An ephemeral key pair is combined with the receiver's public key by ECDH. The AES-256-GCM
//! key is HKDF-SHA256 over the ephemeral public key followed by the compressed shared point.
//! This is the channel the board uses to hand commitment openings to a paired verifier.

use crate::*;
use hkdf::Hkdf;
use log::debug;
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

/// An ECIES ciphertext together with the sender's ephemeral public key
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SealedPayload {
    /// Hex encoded ephemeral public key
    pub ephemeral_public_key: String,
    pub ciphertext: SymmetricCiphertext,
}

/// Encrypt a message so that only the holder of the receiver's private key can read it
pub fn encrypt<C: Curve, R: RngCore + CryptoRng>(
    receiver_public: &C::Point,
    msg: &[u8],
    rng: &mut R,
) -> Result<SealedPayload> {
    if is_identity::<C>(receiver_public) {
        return Err(Error::InvalidEncoding(
            "cannot encrypt to the point at infinity".to_owned(),
        ));
    }

    let ephemeral = KeyPair::<C>::random(rng);
    let aes_key = encapsulate(&ephemeral, receiver_public)?;
    let ciphertext = aes_encrypt(&aes_key, msg, rng)?;

    Ok(SealedPayload {
        ephemeral_public_key: point_to_hex::<C>(&ephemeral.public_key),
        ciphertext,
    })
}

pub fn decrypt<C: Curve>(receiver_secret: &C::Scalar, sealed: &SealedPayload) -> Result<Vec<u8>> {
    let ephemeral_public = hex_to_point::<C>(&sealed.ephemeral_public_key)?;
    if is_identity::<C>(&ephemeral_public) {
        return Err(Error::InvalidEncoding(
            "ephemeral public key is the point at infinity".to_owned(),
        ));
    }

    let aes_key = decapsulate::<C>(receiver_secret, &ephemeral_public)?;
    aes_decrypt(&aes_key, &sealed.ciphertext)
}

/// Seal a commitment opening for a verifier
pub fn seal_commitment_opening<C: Curve, R: RngCore + CryptoRng>(
    verifier_public: &C::Point,
    opening: &CommitmentOpening,
    rng: &mut R,
) -> Result<SealedPayload> {
    let plaintext = serde_json::to_vec(opening)?;
    debug!(
        "sealing commitment opening ({} contests) on {}",
        opening.randomizers.len(),
        C::NAME
    );
    encrypt::<C, R>(verifier_public, &plaintext, rng)
}

pub fn open_commitment_opening<C: Curve>(
    verifier_secret: &C::Scalar,
    sealed: &SealedPayload,
) -> Result<CommitmentOpening> {
    let plaintext = decrypt::<C>(verifier_secret, sealed)?;
    Ok(serde_json::from_slice(&plaintext)?)
}

fn hkdf_sha256(master: &[u8]) -> Result<AesKey> {
    let h = Hkdf::<Sha256>::new(None, master);
    let mut out = [0u8; AES_KEY_LENGTH];
    h.expand(&[], &mut out).map_err(|_| Error::Aead)?;
    Ok(out)
}

fn generate_shared<C: Curve>(secret: &C::Scalar, public: &C::Point) -> Vec<u8> {
    C::compress(&(*public * *secret))
}

fn encapsulate<C: Curve>(ephemeral: &KeyPair<C>, peer_public: &C::Point) -> Result<AesKey> {
    let shared_point = generate_shared::<C>(&ephemeral.private_key, peer_public);

    let mut master = C::compress(&ephemeral.public_key);
    master.extend(shared_point);
    hkdf_sha256(&master)
}

fn decapsulate<C: Curve>(secret: &C::Scalar, ephemeral_public: &C::Point) -> Result<AesKey> {
    let shared_point = generate_shared::<C>(secret, ephemeral_public);

    let mut master = C::compress(ephemeral_public);
    master.extend(shared_point);
    hkdf_sha256(&master)
}
