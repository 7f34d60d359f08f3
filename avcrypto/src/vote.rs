//! Ballot construction and finalization.
//!
//! The voter encrypts every selection pile and commits to the randomizers it used. The board
//! then adds an encryption of zero to each cryptogram and commits to its own randomizers, so
//! neither party alone knows the randomness of the final cast cryptograms.

use crate::*;
use indexmap::IndexMap;
use log::{debug, warn};
use rand::{CryptoRng, RngCore};

/// Hex encoded values keyed by contest reference, then indexed by pile and by cryptogram
pub type PileValues = IndexMap<String, Vec<Vec<String>>>;

/// One encrypted selection pile, with the voter's private randomizers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PileEnvelope {
    pub multiplier: u64,
    pub cryptograms: Vec<String>,
    pub randomizers: Vec<String>,

    /// Proofs of knowledge of each randomizer
    pub proofs: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContestEnvelope {
    pub reference: String,
    pub piles: Vec<PileEnvelope>,
}

impl ContestEnvelope {
    /// The part of the envelope that is submitted to the board
    pub fn public(&self) -> ContestCryptograms {
        ContestCryptograms {
            reference: self.reference.clone(),
            piles: self
                .piles
                .iter()
                .map(|pile| PileCryptograms {
                    multiplier: pile.multiplier,
                    cryptograms: pile.cryptograms.clone(),
                    proofs: pile.proofs.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PileCryptograms {
    pub multiplier: u64,
    pub cryptograms: Vec<String>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub proofs: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContestCryptograms {
    pub reference: String,
    pub piles: Vec<PileCryptograms>,
}

/// The revealed randomness behind a Pedersen commitment over pile randomizers
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommitmentOpening {
    pub commitment_randomness: String,
    pub randomizers: PileValues,
}

impl CommitmentOpening {
    /// Contest references concatenated in order
    pub fn context(&self) -> String {
        self.randomizers.keys().map(|k| k.as_str()).collect()
    }

    /// Randomizers flattened contest by contest, pile by pile
    pub fn flat_randomizers<C: Curve>(&self) -> Result<Vec<C::Scalar>> {
        self.randomizers
            .values()
            .flatten()
            .flatten()
            .map(|hex| hex_to_scalar::<C>(hex))
            .collect()
    }
}

/// Output of ballot construction
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ConstructedBallot {
    pub envelopes: Vec<ContestEnvelope>,

    /// Hex encoded Pedersen commitment over all randomizers
    pub commitment: String,

    /// Kept private by the voter until the ballot is spoiled
    pub opening: CommitmentOpening,
}

impl ConstructedBallot {
    pub fn contest_cryptograms(&self) -> Vec<ContestCryptograms> {
        self.envelopes.iter().map(ContestEnvelope::public).collect()
    }
}

/// The board's contribution to a ballot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BoardRandomness {
    pub empty_cryptograms: PileValues,
    pub commitment: String,
    pub opening: CommitmentOpening,
}

/// Encrypt vote bytes, one cryptogram per encoded point
pub fn encrypt_vote<C: Curve, R: RngCore + CryptoRng>(
    vote: &[u8],
    encryption_key: &C::Point,
    rng: &mut R,
) -> Result<(Vec<Cryptogram<C>>, Vec<C::Scalar>)> {
    let points = bytes_to_points::<C>(vote)?;

    let mut cryptograms = Vec::with_capacity(points.len());
    let mut randomizers = Vec::with_capacity(points.len());
    for point in points {
        let randomness = KeyPair::<C>::random(rng);
        cryptograms.push(encrypt::<C>(&point, encryption_key, &randomness));
        randomizers.push(randomness.private_key);
    }

    Ok((cryptograms, randomizers))
}

/// Encryptions of the identity, as added by the board to voter cryptograms
pub fn generate_empty_cryptograms<C: Curve, R: RngCore + CryptoRng>(
    encryption_key: &C::Point,
    count: usize,
    rng: &mut R,
) -> (Vec<Cryptogram<C>>, Vec<C::Scalar>) {
    (0..count)
        .map(|_| {
            let randomness = KeyPair::<C>::random(&mut *rng);
            let cryptogram = encrypt::<C>(&identity::<C>(), encryption_key, &randomness);
            (cryptogram, randomness.private_key)
        })
        .unzip()
}

/// Commit to a set of randomizers under fresh commitment randomness
pub fn commit_randomizers<C: Curve, R: RngCore + CryptoRng>(
    randomizers: PileValues,
    rng: &mut R,
) -> Result<(String, CommitmentOpening)> {
    let randomness = KeyPair::<C>::random(rng).private_key;
    let opening = CommitmentOpening {
        commitment_randomness: scalar_to_hex::<C>(&randomness),
        randomizers,
    };

    let commitment = commit::<C>(
        &opening.flat_randomizers::<C>()?,
        &opening.context(),
        &randomness,
    )?;

    Ok((commitment.to_hex(), opening))
}

/// Check an opening against a published commitment
pub fn verify_commitment_opening<C: Curve>(
    commitment: &str,
    opening: &CommitmentOpening,
) -> Result<bool> {
    let randomness = hex_to_scalar::<C>(&opening.commitment_randomness)?;
    let commitment = Commitment::<C>::from_hex(commitment)?.with_randomness(randomness);

    is_valid_commitment(
        &commitment,
        &opening.flat_randomizers::<C>()?,
        &opening.context(),
    )
}

pub(crate) fn election_key<C: Curve>(election: &ElectionConfig) -> Result<C::Point> {
    if election.curve != C::NAME {
        return Err(Error::InvalidConfig(format!(
            "election uses {} but {} was requested",
            election.curve,
            C::NAME
        )));
    }

    let key = hex_to_point::<C>(&election.encryption_key)?;
    if is_identity::<C>(&key) {
        return Err(Error::InvalidConfig(
            "encryption key is the point at infinity".to_owned(),
        ));
    }
    Ok(key)
}

/// Validate, encode and encrypt a ballot selection, then commit to the randomizers
pub fn construct_ballot<C: Curve, R: RngCore + CryptoRng>(
    election: &ElectionConfig,
    voter: &VoterEligibility,
    selection: &BallotSelection,
    rng: &mut R,
) -> Result<ConstructedBallot> {
    validate_ballot_selection(election, voter, selection)?;
    let encryption_key = election_key::<C>(election)?;

    let mut envelopes = Vec::with_capacity(selection.contest_selections.len());
    let mut randomizers = PileValues::new();

    for contest_selection in &selection.contest_selections {
        let contest = election.contest(&contest_selection.reference)?;
        let encoding = &contest.marking_type.encoding;
        let capacity = encoding.cryptogram_count * point_encoding_byte_size::<C>();

        let mut piles = Vec::with_capacity(contest_selection.piles.len());
        for pile in &contest_selection.piles {
            let mut bytes = selection_pile_to_byte_array(contest, pile)?;
            if bytes.len() > capacity {
                return Err(Error::EncodingCapacity(format!(
                    "{} bytes do not fit in {} cryptograms",
                    bytes.len(),
                    encoding.cryptogram_count
                )));
            }
            bytes.resize(capacity, 0);

            let (cryptograms, pile_randomizers) =
                encrypt_vote::<C, R>(&bytes, &encryption_key, rng)?;

            let proofs = pile_randomizers
                .iter()
                .map(|randomizer| {
                    prove_key_knowledge(
                        &KeyPair::<C>::from_private_key(*randomizer),
                        &contest.reference,
                        &KeyPair::random(&mut *rng),
                    )
                    .map(|proof| proof.to_hex())
                })
                .collect::<Result<Vec<_>>>()?;

            piles.push(PileEnvelope {
                multiplier: pile.multiplier,
                cryptograms: cryptograms.iter().map(Cryptogram::to_hex).collect(),
                randomizers: pile_randomizers.iter().map(scalar_to_hex::<C>).collect(),
                proofs,
            });
        }

        randomizers.insert(
            contest.reference.clone(),
            piles.iter().map(|pile| pile.randomizers.clone()).collect(),
        );
        envelopes.push(ContestEnvelope {
            reference: contest.reference.clone(),
            piles,
        });
    }

    let (commitment, opening) = commit_randomizers::<C, R>(randomizers, rng)?;
    debug!(
        "constructed ballot {:?} with {} contest envelopes on {}",
        selection.reference,
        envelopes.len(),
        C::NAME
    );

    Ok(ConstructedBallot {
        envelopes,
        commitment,
        opening,
    })
}

/// Check the randomizer proofs attached to submitted cryptograms
pub fn verify_envelope_proofs<C: Curve>(contests: &[ContestCryptograms]) -> Result<()> {
    for contest in contests {
        for pile in &contest.piles {
            if pile.proofs.len() != pile.cryptograms.len() {
                return Err(Error::arity(
                    "randomizer proofs",
                    pile.cryptograms.len(),
                    pile.proofs.len(),
                ));
            }

            for (cryptogram, proof) in pile.cryptograms.iter().zip(&pile.proofs) {
                let cryptogram = Cryptogram::<C>::from_hex(cryptogram)?;
                let proof = DiscreteLogarithmProof::<C>::from_hex(proof)?;

                if !is_valid_key_proof(&proof, &contest.reference, &cryptogram.r)? {
                    warn!("randomizer proof rejected for contest {:?}", contest.reference);
                    return Err(Error::InvalidProof(format!(
                        "randomizer proof rejected in contest {:?}",
                        contest.reference
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Board side: check submitted cryptograms and produce matching empty cryptograms
pub fn generate_board_randomness<C: Curve, R: RngCore + CryptoRng>(
    election: &ElectionConfig,
    contests: &[ContestCryptograms],
    rng: &mut R,
) -> Result<BoardRandomness> {
    let encryption_key = election_key::<C>(election)?;
    verify_envelope_proofs::<C>(contests)?;

    let mut empty_cryptograms = PileValues::new();
    let mut randomizers = PileValues::new();
    for contest in contests {
        let mut contest_cryptograms = Vec::with_capacity(contest.piles.len());
        let mut contest_randomizers = Vec::with_capacity(contest.piles.len());

        for pile in &contest.piles {
            let (cryptograms, pile_randomizers) =
                generate_empty_cryptograms::<C, R>(&encryption_key, pile.cryptograms.len(), rng);
            contest_cryptograms.push(cryptograms.iter().map(Cryptogram::to_hex).collect());
            contest_randomizers.push(pile_randomizers.iter().map(scalar_to_hex::<C>).collect());
        }

        empty_cryptograms.insert(contest.reference.clone(), contest_cryptograms);
        randomizers.insert(contest.reference.clone(), contest_randomizers);
    }

    let (commitment, opening) = commit_randomizers::<C, R>(randomizers, rng)?;

    Ok(BoardRandomness {
        empty_cryptograms,
        commitment,
        opening,
    })
}

/// Homomorphically add the board's empty cryptograms to the voter's cryptograms
pub fn finalize_ballot<C: Curve>(
    contests: &[ContestCryptograms],
    empty_cryptograms: &PileValues,
) -> Result<Vec<ContestCryptograms>> {
    if contests.len() != empty_cryptograms.len() {
        return Err(Error::arity(
            "board contests",
            contests.len(),
            empty_cryptograms.len(),
        ));
    }

    let finalized = contests
        .iter()
        .map(|contest| {
            let board_piles = empty_cryptograms.get(&contest.reference).ok_or_else(|| {
                Error::ArityMismatch(format!(
                    "no board cryptograms for contest {:?}",
                    contest.reference
                ))
            })?;
            if board_piles.len() != contest.piles.len() {
                return Err(Error::arity(
                    "board piles",
                    contest.piles.len(),
                    board_piles.len(),
                ));
            }

            let piles = contest
                .piles
                .iter()
                .zip(board_piles)
                .map(|(pile, board)| {
                    Ok(PileCryptograms {
                        multiplier: pile.multiplier,
                        cryptograms: combine_cryptogram_lists::<C>(&pile.cryptograms, board)?,
                        proofs: vec![],
                    })
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ContestCryptograms {
                reference: contest.reference.clone(),
                piles,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("finalized {} contests on {}", finalized.len(), C::NAME);
    Ok(finalized)
}

fn combine_cryptogram_lists<C: Curve>(voter: &[String], board: &[String]) -> Result<Vec<String>> {
    if voter.len() != board.len() {
        return Err(Error::arity("board cryptograms", voter.len(), board.len()));
    }

    voter
        .iter()
        .zip(board)
        .map(|(a, b)| {
            let a = Cryptogram::<C>::from_hex(a)?;
            let b = Cryptogram::<C>::from_hex(b)?;
            Ok(a.homomorphically_add(&b).to_hex())
        })
        .collect()
}
