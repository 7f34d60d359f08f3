use crate::*;
use elliptic_curve::ff::{Field, PrimeField};
use log::trace;
use rand::{CryptoRng, RngCore};
use sha2::Digest;

/// Upper bound on the counter used by [`hash_to_scalar`] and [`hash_to_point`]
pub const MAX_HASH_ITERATIONS: u32 = 10_000;

/// An ephemeral or long-lived key pair on curve `C`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyPair<C: Curve> {
    pub private_key: C::Scalar,
    pub public_key: C::Point,
}

impl<C: Curve> KeyPair<C> {
    pub fn random<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::from_private_key(C::Scalar::random(&mut *rng))
    }

    pub fn from_private_key(private_key: C::Scalar) -> Self {
        KeyPair {
            private_key,
            public_key: generator::<C>() * private_key,
        }
    }

    /// Derive a key pair deterministically, mainly useful for fixtures
    pub fn from_seed(seed: &str) -> Result<Self> {
        Ok(Self::from_private_key(hash_to_scalar::<C>(seed)?))
    }
}

/// Interpret big-endian bytes as a scalar, returning `None` when the value is not below the
/// group order.
pub fn scalar_from_be_bytes<C: Curve>(bytes: &[u8]) -> Option<C::Scalar> {
    let mut repr = <C::Scalar as PrimeField>::Repr::default();
    let width = repr.as_ref().len();
    if bytes.len() > width {
        return None;
    }

    repr.as_mut()[width - bytes.len()..].copy_from_slice(bytes);
    C::Scalar::from_repr(repr).into()
}

/// Recover a point from an x-coordinate shorter than or equal to the field width
pub fn point_from_x<C: Curve>(x: &[u8], odd: bool) -> Option<C::Point> {
    if x.len() > C::BYTE_LENGTH {
        return None;
    }

    let mut padded = vec![0u8; C::BYTE_LENGTH];
    padded[C::BYTE_LENGTH - x.len()..].copy_from_slice(x);
    C::point_from_x(&padded, odd)
}

/// Hash a string to a scalar.
///
/// Hashes `"{input}-{counter}"` for increasing counters until the digest, read as a big-endian
/// integer, is below the group order.
pub fn hash_to_scalar<C: Curve>(input: &str) -> Result<C::Scalar> {
    for counter in 0..MAX_HASH_ITERATIONS {
        let digest = C::Hash::digest(format!("{}-{}", input, counter).as_bytes());
        if let Some(scalar) = scalar_from_be_bytes::<C>(&digest) {
            return Ok(scalar);
        }
    }

    trace!(
        "hash_to_scalar on {} gave up after {} attempts",
        C::NAME,
        MAX_HASH_ITERATIONS
    );
    Err(Error::HashExhausted(input.to_owned()))
}

/// Hash a string to a curve point.
///
/// Hashes `"{input}-{counter}"` for increasing counters until the digest is the x-coordinate
/// of a point; the point with even y is returned.
pub fn hash_to_point<C: Curve>(input: &str) -> Result<C::Point> {
    for counter in 0..MAX_HASH_ITERATIONS {
        let digest = C::Hash::digest(format!("{}-{}", input, counter).as_bytes());
        if let Some(point) = point_from_x::<C>(&digest, false) {
            return Ok(point);
        }
    }

    trace!(
        "hash_to_point on {} gave up after {} attempts",
        C::NAME,
        MAX_HASH_ITERATIONS
    );
    Err(Error::HashExhausted(input.to_owned()))
}

/// Compute `Σ scalars[i]·points[i]`
pub fn multi_scalar_mul<C: Curve>(scalars: &[C::Scalar], points: &[C::Point]) -> Result<C::Point> {
    if scalars.len() != points.len() {
        return Err(Error::arity("scalars and points", scalars.len(), points.len()));
    }

    Ok(scalars
        .iter()
        .zip(points.iter())
        .fold(identity::<C>(), |acc, (s, p)| acc + *p * *s))
}

/// Number of hex characters in an encoded scalar
pub fn scalar_hex_length<C: Curve>() -> usize {
    2 * C::BYTE_LENGTH
}

/// Number of hex characters in an encoded non-identity point
pub fn point_hex_length<C: Curve>() -> usize {
    2 + 2 * C::BYTE_LENGTH
}

fn is_lower_hex(s: &str) -> bool {
    s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

pub fn point_to_hex<C: Curve>(point: &C::Point) -> String {
    hex::encode(C::compress(point))
}

/// Decode a point from `"00"` (identity) or a parity-prefixed, fixed-width x-coordinate
pub fn hex_to_point<C: Curve>(s: &str) -> Result<C::Point> {
    if s == "00" {
        return Ok(identity::<C>());
    }

    if s.len() != point_hex_length::<C>()
        || !(s.starts_with("02") || s.starts_with("03"))
        || !is_lower_hex(s)
    {
        return Err(Error::InvalidEncoding(format!(
            "{:?} is not a valid {} point encoding",
            s,
            C::NAME
        )));
    }

    let bytes = hex::decode(s).map_err(|e| Error::InvalidEncoding(e.to_string()))?;
    C::point_from_x(&bytes[1..], bytes[0] == 0x03).ok_or_else(|| {
        Error::InvalidEncoding(format!("{:?} is not a point on {}", s, C::NAME))
    })
}

pub fn scalar_to_hex<C: Curve>(scalar: &C::Scalar) -> String {
    hex::encode(scalar.to_repr())
}

/// Decode a zero-padded, fixed-width scalar below the group order
pub fn hex_to_scalar<C: Curve>(s: &str) -> Result<C::Scalar> {
    if s.len() != scalar_hex_length::<C>() || !is_lower_hex(s) {
        return Err(Error::InvalidEncoding(format!(
            "{:?} is not a valid {} scalar encoding",
            s,
            C::NAME
        )));
    }

    let bytes = hex::decode(s).map_err(|e| Error::InvalidEncoding(e.to_string()))?;
    scalar_from_be_bytes::<C>(&bytes).ok_or_else(|| {
        Error::InvalidEncoding(format!("scalar {:?} is not below the group order", s))
    })
}

/// Split the leading point off a concatenation of point encodings
pub(crate) fn take_point_hex<C: Curve>(s: &str) -> Result<(C::Point, &str)> {
    let width = if s.starts_with("00") {
        2
    } else {
        point_hex_length::<C>()
    };

    if s.len() < width || !s.is_char_boundary(width) {
        return Err(Error::InvalidEncoding(format!(
            "{:?} is too short to hold a {} point",
            s,
            C::NAME
        )));
    }

    let (head, rest) = s.split_at(width);
    Ok((hex_to_point::<C>(head)?, rest))
}
