//! Named elliptic curves.
//!
//! Every algebraic operation in this crate is generic over a [`Curve`]. The four supported
//! curves are zero-sized marker types; the curve used by an election is only known at runtime,
//! so [`CurveName`] carries that choice and [`with_curve!`](crate::with_curve) turns it back
//! into a concrete type parameter.

use crate::*;
use elliptic_curve::ff::PrimeField;
use elliptic_curve::group::Curve as _;
use elliptic_curve::sec1::{FromEncodedPoint, ToEncodedPoint};
use elliptic_curve::Group;
use sha2::{Digest, Sha256, Sha384, Sha512};
use std::fmt::Debug;
use std::str::FromStr;

/// The curves an election can be configured with
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CurveName {
    Secp256k1,
    Secp256r1,
    Secp384r1,
    Secp521r1,
}

impl CurveName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurveName::Secp256k1 => "secp256k1",
            CurveName::Secp256r1 => "secp256r1",
            CurveName::Secp384r1 => "secp384r1",
            CurveName::Secp521r1 => "secp521r1",
        }
    }
}

impl FromStr for CurveName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "secp256k1" => Ok(CurveName::Secp256k1),
            "secp256r1" => Ok(CurveName::Secp256r1),
            "secp384r1" => Ok(CurveName::Secp384r1),
            "secp521r1" => Ok(CurveName::Secp521r1),
            other => Err(Error::UnsupportedCurve(other.to_owned())),
        }
    }
}

impl std::fmt::Display for CurveName {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Parameters and primitive conversions of a short-Weierstrass curve.
///
/// Points and scalars are the RustCrypto projective point and scalar types, so group
/// arithmetic comes from [`Group`] and [`PrimeField`]. Implementors only supply the SEC1
/// conversions that the generic group traits do not expose.
pub trait Curve: Copy + Clone + Debug + PartialEq + Eq + Send + Sync + 'static {
    type Point: Group<Scalar = Self::Scalar>;
    type Scalar: PrimeField;

    /// Canonical hash used for hash-to-scalar and hash-to-point
    type Hash: Digest;

    const NAME: CurveName;

    /// Bit length of the field prime
    const DEGREE: usize;

    /// Width in bytes of an x-coordinate and of a scalar
    const BYTE_LENGTH: usize;

    /// Recover the point with the given x-coordinate and y parity.
    ///
    /// `x` must be exactly `BYTE_LENGTH` big-endian bytes. Returns `None` when `x` is not the
    /// x-coordinate of a curve point, which callers searching for a valid x rely on.
    fn point_from_x(x: &[u8], odd: bool) -> Option<Self::Point>;

    /// SEC1 compressed encoding: `[0x00]` for the identity, else parity tag and x-coordinate.
    fn compress(point: &Self::Point) -> Vec<u8>;
}

macro_rules! impl_curve {
    ($marker:ident, $krate:ident, $name:expr, $degree:expr, $byte_length:expr, $hash:ty) => {
        #[derive(Copy, Clone, Debug, PartialEq, Eq)]
        pub struct $marker;

        impl Curve for $marker {
            type Point = $krate::ProjectivePoint;
            type Scalar = $krate::Scalar;
            type Hash = $hash;

            const NAME: CurveName = $name;
            const DEGREE: usize = $degree;
            const BYTE_LENGTH: usize = $byte_length;

            fn point_from_x(x: &[u8], odd: bool) -> Option<Self::Point> {
                if x.len() != Self::BYTE_LENGTH {
                    return None;
                }

                let mut sec1 = Vec::with_capacity(1 + x.len());
                sec1.push(if odd { 0x03 } else { 0x02 });
                sec1.extend_from_slice(x);

                let encoded = $krate::EncodedPoint::from_bytes(&sec1).ok()?;
                let affine: Option<$krate::AffinePoint> =
                    $krate::AffinePoint::from_encoded_point(&encoded).into();
                affine.map($krate::ProjectivePoint::from)
            }

            fn compress(point: &Self::Point) -> Vec<u8> {
                point.to_affine().to_encoded_point(true).as_bytes().to_vec()
            }
        }
    };
}

impl_curve!(Secp256k1, k256, CurveName::Secp256k1, 256, 32, Sha256);
impl_curve!(Secp256r1, p256, CurveName::Secp256r1, 256, 32, Sha256);
impl_curve!(Secp384r1, p384, CurveName::Secp384r1, 384, 48, Sha384);
impl_curve!(Secp521r1, p521, CurveName::Secp521r1, 521, 66, Sha512);

/// Run a block with `$C` bound to the marker type of a runtime [`CurveName`].
///
/// ```ignore
/// let hex = with_curve!(name, |C| point_to_hex::<C>(&generator::<C>()));
/// ```
#[macro_export]
macro_rules! with_curve {
    ($name:expr, |$C:ident| $body:expr) => {
        match $name {
            $crate::CurveName::Secp256k1 => {
                type $C = $crate::Secp256k1;
                $body
            }
            $crate::CurveName::Secp256r1 => {
                type $C = $crate::Secp256r1;
                $body
            }
            $crate::CurveName::Secp384r1 => {
                type $C = $crate::Secp384r1;
                $body
            }
            $crate::CurveName::Secp521r1 => {
                type $C = $crate::Secp521r1;
                $body
            }
        }
    };
}

/// The curve's base point `G`
pub fn generator<C: Curve>() -> C::Point {
    C::Point::generator()
}

/// The point at infinity
pub fn identity<C: Curve>() -> C::Point {
    C::Point::identity()
}

pub fn is_identity<C: Curve>(point: &C::Point) -> bool {
    bool::from(point.is_identity())
}
