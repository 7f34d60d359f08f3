use crate::*;
use rand::{CryptoRng, RngCore};
use serde::Serialize;

/// A board item together with a Schnorr signature over its canonical JSON
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Signed<T> {
    pub content: T,
    pub signature: String,
}

impl<T: Serialize> Signed<T> {
    /// Sign an item, producing a `Signed<T>`
    pub fn sign<C: Curve, R: RngCore + CryptoRng>(
        content: T,
        private_key: &C::Scalar,
        rng: &mut R,
    ) -> Result<Self> {
        let message = serde_json::to_string(&content)?;
        let signature = Signature::<C>::sign(&message, private_key, &KeyPair::random(rng))?;

        Ok(Signed {
            content,
            signature: signature.to_hex(),
        })
    }

    /// Verify the signature on a signed item
    pub fn verify_signature<C: Curve>(&self, public_key: &C::Point) -> Result<()> {
        let message = serde_json::to_string(&self.content)?;
        let signature = Signature::<C>::from_hex(&self.signature)?;

        if signature.is_valid(&message, public_key)? {
            Ok(())
        } else {
            Err(Error::InvalidSignature)
        }
    }
}

impl<T> std::ops::Deref for Signed<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.content
    }
}
