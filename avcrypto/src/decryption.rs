//! Decryption of spoiled ballots.
//!
//! A spoiled ballot is opened without the election private key. Once the voter and the board
//! have both revealed their randomizers, the sum of the two randomizers of a cryptogram is the
//! discrete log linking the election key to the shared secret, so it can stand in for the
//! private key.

use crate::*;
use log::{debug, warn};

/// Recover the encoded bytes from cryptograms given their combined randomizers
pub fn revert_encryption<C: Curve>(
    cryptograms: &[Cryptogram<C>],
    randomizers: &[C::Scalar],
    encryption_key: &C::Point,
) -> Result<Vec<u8>> {
    if cryptograms.len() != randomizers.len() {
        return Err(Error::arity(
            "cryptograms and randomizers",
            cryptograms.len(),
            randomizers.len(),
        ));
    }

    let points: Vec<C::Point> = cryptograms
        .iter()
        .zip(randomizers)
        .map(|(cryptogram, randomizer)| {
            decrypt(&Cryptogram::<C>::new(*encryption_key, cryptogram.c), randomizer)
        })
        .collect();

    points_to_bytes::<C>(&points)
}

fn require_valid_opening<C: Curve>(
    party: &str,
    commitment: &str,
    opening: &CommitmentOpening,
) -> Result<()> {
    if verify_commitment_opening::<C>(commitment, opening)? {
        Ok(())
    } else {
        warn!("{} commitment opening rejected", party);
        Err(Error::InvalidCommitment(format!(
            "{} commitment opening does not match the published commitment",
            party
        )))
    }
}

fn pile_randomizers<'a>(
    opening: &'a CommitmentOpening,
    contest: &str,
    pile_count: usize,
) -> Result<&'a [Vec<String>]> {
    let piles = opening.randomizers.get(contest).ok_or_else(|| {
        Error::ArityMismatch(format!("opening has no randomizers for contest {:?}", contest))
    })?;
    if piles.len() != pile_count {
        return Err(Error::arity("opened piles", pile_count, piles.len()));
    }
    Ok(piles)
}

/// Openings revealed by the voter and the board for a spoiled ballot
#[derive(Debug, Clone, Copy)]
pub struct SpoilOpenings<'a> {
    pub voter_commitment: &'a str,
    pub voter_opening: &'a CommitmentOpening,
    pub board_commitment: &'a str,
    pub board_opening: &'a CommitmentOpening,
}

/// Decrypt the finalized cryptograms of a spoiled ballot.
///
/// Both openings are checked against their published commitments before anything is
/// decrypted.
pub fn decrypt_contest_selections<C: Curve>(
    election: &ElectionConfig,
    contests: &[ContestCryptograms],
    openings: SpoilOpenings,
) -> Result<Vec<ContestSelection>> {
    let encryption_key = election_key::<C>(election)?;

    require_valid_opening::<C>("voter", openings.voter_commitment, openings.voter_opening)?;
    require_valid_opening::<C>("board", openings.board_commitment, openings.board_opening)?;

    let selections = contests
        .iter()
        .map(|contest| {
            let config = election.contest(&contest.reference)?;
            let max_size = config.marking_type.encoding.max_size;

            let voter_piles =
                pile_randomizers(openings.voter_opening, &contest.reference, contest.piles.len())?;
            let board_piles =
                pile_randomizers(openings.board_opening, &contest.reference, contest.piles.len())?;

            let piles = contest
                .piles
                .iter()
                .zip(voter_piles.iter().zip(board_piles))
                .map(|(pile, (voter, board))| {
                    let expected = pile.cryptograms.len();
                    if voter.len() != expected || board.len() != expected {
                        return Err(Error::arity(
                            "pile randomizers",
                            expected,
                            voter.len().min(board.len()),
                        ));
                    }

                    let cryptograms = pile
                        .cryptograms
                        .iter()
                        .map(|hex| Cryptogram::<C>::from_hex(hex))
                        .collect::<Result<Vec<_>>>()?;
                    let randomizers = voter
                        .iter()
                        .zip(board)
                        .map(|(v, b)| Ok(hex_to_scalar::<C>(v)? + hex_to_scalar::<C>(b)?))
                        .collect::<Result<Vec<_>>>()?;

                    let mut bytes =
                        revert_encryption::<C>(&cryptograms, &randomizers, &encryption_key)?;
                    bytes.truncate(max_size);

                    byte_array_to_selection_pile(config, &bytes, pile.multiplier)
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(ContestSelection {
                reference: contest.reference.clone(),
                piles,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!("decrypted {} spoiled contests on {}", selections.len(), C::NAME);
    Ok(selections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_revert_encryption() {
        let mut rng = ChaCha20Rng::seed_from_u64(71);
        let election = KeyPair::<Secp384r1>::random(&mut rng);

        let vote = b"option1".to_vec();
        let (cryptograms, randomizers) =
            encrypt_vote::<Secp384r1, _>(&vote, &election.public_key, &mut rng).unwrap();

        let bytes = revert_encryption(&cryptograms, &randomizers, &election.public_key).unwrap();
        assert_eq!(&bytes[..vote.len()], vote.as_slice());
        assert!(bytes[vote.len()..].iter().all(|b| *b == 0));

        // Adding an empty cryptogram is undone by adding its randomizer
        let (empty, empty_randomizers) =
            generate_empty_cryptograms::<Secp384r1, _>(&election.public_key, 1, &mut rng);
        let combined = [cryptograms[0].homomorphically_add(&empty[0])];
        let combined_randomizer = [randomizers[0] + empty_randomizers[0]];
        let bytes =
            revert_encryption(&combined, &combined_randomizer, &election.public_key).unwrap();
        assert_eq!(&bytes[..vote.len()], vote.as_slice());

        // The voter's randomizer alone is not enough
        assert!(
            revert_encryption(&combined, &randomizers, &election.public_key)
                .map(|bytes| bytes[..vote.len()] != vote[..])
                .unwrap_or(true)
        );

        assert!(matches!(
            revert_encryption(&cryptograms, &[], &election.public_key),
            Err(Error::ArityMismatch(_))
        ));
    }
}
