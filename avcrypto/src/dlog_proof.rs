//! Non-interactive proof of knowledge of a discrete logarithm.
//!
//! Proves knowledge of `x` such that `points[i] = generators[i]·x` for every `i` and
//! `public_key = x·G`. All relations are batched into one Schnorr-style proof using per-index
//! coefficients `zᵢ` derived from the points, so a proof made for one set of points can not be
//! reused for another set sharing the same generators.

use crate::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiscreteLogarithmProof<C: Curve> {
    pub k: C::Point,
    pub r: C::Scalar,
}

impl<C: Curve> DiscreteLogarithmProof<C> {
    /// Prove knowledge of `knowledge`.
    ///
    /// When `points` is `None` they are computed as `generators[i]·knowledge`.
    pub fn prove(
        knowledge: &C::Scalar,
        context: &str,
        generators: &[C::Point],
        points: Option<&[C::Point]>,
        randomness: &KeyPair<C>,
    ) -> Result<Self> {
        let points: Vec<C::Point> = match points {
            Some(points) => points.to_vec(),
            None => generators.iter().map(|g| *g * *knowledge).collect(),
        };
        if generators.len() != points.len() {
            return Err(Error::arity("generators and points", generators.len(), points.len()));
        }

        let w = randomness.private_key;
        let z = binding_coefficients::<C>(&points)?;
        let zw: Vec<C::Scalar> = z.iter().map(|z_i| *z_i * w).collect();
        let k = multi_scalar_mul::<C>(&zw, generators)? + generator::<C>() * w;

        let c = challenge::<C>(context, generators, &points, &k)?;
        let r = w + c * *knowledge;

        Ok(DiscreteLogarithmProof { k, r })
    }

    /// Verify the proof against the claimed points and public key
    pub fn is_valid(
        &self,
        context: &str,
        generators: &[C::Point],
        points: &[C::Point],
        public_key: &C::Point,
    ) -> Result<bool> {
        if generators.len() != points.len() {
            return Err(Error::arity("generators and points", generators.len(), points.len()));
        }

        let z = binding_coefficients::<C>(points)?;
        let c = challenge::<C>(context, generators, points, &self.k)?;

        let zr: Vec<C::Scalar> = z.iter().map(|z_i| *z_i * self.r).collect();
        let zc: Vec<C::Scalar> = z.iter().map(|z_i| *z_i * c).collect();

        let lhs = generator::<C>() * self.r + multi_scalar_mul::<C>(&zr, generators)?;
        let rhs = self.k + *public_key * c + multi_scalar_mul::<C>(&zc, points)?;

        Ok(lhs == rhs)
    }

    /// Hex of `k` followed by hex of `r`
    pub fn to_hex(&self) -> String {
        format!("{}{}", point_to_hex::<C>(&self.k), scalar_to_hex::<C>(&self.r))
    }

    pub fn from_hex(s: &str) -> Result<Self> {
        let (k, rest) = take_point_hex::<C>(s)?;
        let r = hex_to_scalar::<C>(rest)?;
        Ok(DiscreteLogarithmProof { k, r })
    }
}

fn concat_points<C: Curve>(points: &[C::Point]) -> String {
    points.iter().map(point_to_hex::<C>).collect()
}

fn binding_coefficients<C: Curve>(points: &[C::Point]) -> Result<Vec<C::Scalar>> {
    let points_string = concat_points::<C>(points);
    (0..points.len())
        .map(|i| hash_to_scalar::<C>(&format!("{}{}", points_string, i)))
        .collect()
}

fn challenge<C: Curve>(
    context: &str,
    generators: &[C::Point],
    points: &[C::Point],
    k: &C::Point,
) -> Result<C::Scalar> {
    hash_to_scalar::<C>(&format!(
        "{}{}{}{}",
        context,
        concat_points::<C>(generators),
        concat_points::<C>(points),
        point_to_hex::<C>(k)
    ))
}

/// Knowledge of a scalar whose multiple of `G` is `public_key`
pub fn prove_key_knowledge<C: Curve>(
    key_pair: &KeyPair<C>,
    context: &str,
    randomness: &KeyPair<C>,
) -> Result<DiscreteLogarithmProof<C>> {
    DiscreteLogarithmProof::prove(
        &key_pair.private_key,
        context,
        &[generator::<C>()],
        None,
        randomness,
    )
}

pub fn is_valid_key_proof<C: Curve>(
    proof: &DiscreteLogarithmProof<C>,
    context: &str,
    public_key: &C::Point,
) -> Result<bool> {
    proof.is_valid(context, &[generator::<C>()], &[*public_key], public_key)
}
