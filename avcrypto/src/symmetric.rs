use crate::*;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use rand::{CryptoRng, RngCore};
use sha2::Sha256;

pub const AES_KEY_LENGTH: usize = 32;
pub const AES_IV_LENGTH: usize = 12;
pub const AES_TAG_LENGTH: usize = 16;

pub type AesKey = [u8; AES_KEY_LENGTH];

/// AES-256-GCM output, with the authentication tag split from the ciphertext
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SymmetricCiphertext {
    #[serde(with = "hex_serde")]
    pub ciphertext: Vec<u8>,

    #[serde(with = "hex_serde")]
    pub tag: Vec<u8>,

    #[serde(with = "hex_serde")]
    pub iv: Vec<u8>,
}

/// Encrypt with AES-256-GCM under a fresh IV drawn from `rng`
pub fn aes_encrypt<R: RngCore + CryptoRng>(
    key: &AesKey,
    plaintext: &[u8],
    rng: &mut R,
) -> Result<SymmetricCiphertext> {
    let mut iv = [0u8; AES_IV_LENGTH];
    rng.fill_bytes(&mut iv);
    aes_encrypt_with_iv(key, plaintext, iv)
}

/// Encrypt with AES-256-GCM under a caller supplied IV. Never reuse an IV with the same key.
pub fn aes_encrypt_with_iv(
    key: &AesKey,
    plaintext: &[u8],
    iv: [u8; AES_IV_LENGTH],
) -> Result<SymmetricCiphertext> {
    let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut ciphertext = aead
        .encrypt(Nonce::from_slice(&iv), plaintext)
        .map_err(|_| Error::Aead)?;

    // aes-gcm appends the tag
    let tag = ciphertext.split_off(ciphertext.len() - AES_TAG_LENGTH);

    Ok(SymmetricCiphertext {
        ciphertext,
        tag,
        iv: iv.to_vec(),
    })
}

pub fn aes_decrypt(key: &AesKey, encrypted: &SymmetricCiphertext) -> Result<Vec<u8>> {
    if encrypted.iv.len() != AES_IV_LENGTH || encrypted.tag.len() != AES_TAG_LENGTH {
        return Err(Error::Aead);
    }

    let mut sealed = Vec::with_capacity(encrypted.ciphertext.len() + AES_TAG_LENGTH);
    sealed.extend_from_slice(&encrypted.ciphertext);
    sealed.extend_from_slice(&encrypted.tag);

    let aead = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    aead.decrypt(Nonce::from_slice(&encrypted.iv), sealed.as_slice())
        .map_err(|_| Error::Aead)
}

/// PBKDF2-HMAC-SHA256 key derivation from a password
pub fn derive_key_from_password(password: &[u8], salt: &[u8], iterations: u32) -> AesKey {
    let mut key = [0u8; AES_KEY_LENGTH];
    pbkdf2::pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut key);
    key
}
