use crate::*;

/// An additively homomorphic ElGamal ciphertext `(r, c) = (k·G, k·Y + M)`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cryptogram<C: Curve> {
    pub r: C::Point,
    pub c: C::Point,
}

impl<C: Curve> Cryptogram<C> {
    pub fn new(r: C::Point, c: C::Point) -> Self {
        Cryptogram { r, c }
    }

    /// Component-wise sum, encrypting the sum of both plaintexts
    pub fn homomorphically_add(&self, other: &Self) -> Self {
        Cryptogram {
            r: self.r + other.r,
            c: self.c + other.c,
        }
    }

    /// Hex of `r` followed by hex of `c`
    pub fn to_hex(&self) -> String {
        format!("{}{}", point_to_hex::<C>(&self.r), point_to_hex::<C>(&self.c))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let (r, rest) = take_point_hex::<C>(s)?;
        let c = hex_to_point::<C>(rest)?;
        Ok(Cryptogram { r, c })
    }
}

/// Encrypt a point under `encryption_key` using the given randomness
pub fn encrypt<C: Curve>(
    message: &C::Point,
    encryption_key: &C::Point,
    randomness: &KeyPair<C>,
) -> Cryptogram<C> {
    Cryptogram {
        r: randomness.public_key,
        c: *encryption_key * randomness.private_key + *message,
    }
}

pub fn decrypt<C: Curve>(cryptogram: &Cryptogram<C>, decryption_key: &C::Scalar) -> C::Point {
    cryptogram.c - cryptogram.r * *decryption_key
}

/// Sum a non-empty list of cryptograms
pub fn homomorphically_add<C: Curve>(cryptograms: &[Cryptogram<C>]) -> Result<Cryptogram<C>> {
    let (first, rest) = cryptograms
        .split_first()
        .ok_or_else(|| Error::ArityMismatch("at least one cryptogram is required".to_owned()))?;

    Ok(rest
        .iter()
        .fold(*first, |acc, cryptogram| acc.homomorphically_add(cryptogram)))
}
