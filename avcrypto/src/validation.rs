use crate::*;
use std::collections::BTreeSet;

/// Check a ballot selection against the voter's ballot, voting round and weight.
///
/// Nothing is encrypted unless this passes.
pub fn validate_ballot_selection(
    election: &ElectionConfig,
    voter: &VoterEligibility,
    selection: &BallotSelection,
) -> Result<()> {
    if selection.reference != voter.ballot_reference {
        return Err(Error::corrupt_selection(format!(
            "ballot selection {:?} does not match ballot config {:?}",
            selection.reference, voter.ballot_reference
        )));
    }

    let ballot = election.ballot(&voter.ballot_reference)?;
    let round = election.voting_round(&voter.voting_round_reference)?;

    let allowed: BTreeSet<&str> = ballot
        .contest_references
        .iter()
        .filter(|reference| round.contest_references.contains(reference))
        .map(|reference| reference.as_str())
        .collect();

    let mut selected = BTreeSet::new();
    for contest_selection in &selection.contest_selections {
        if !selected.insert(contest_selection.reference.as_str()) {
            return Err(Error::corrupt_selection(format!(
                "contest {:?} is selected more than once",
                contest_selection.reference
            )));
        }
    }

    if selected != allowed {
        return Err(Error::corrupt_selection(
            "contest selections do not match the contests available to the voter",
        ));
    }

    for contest_selection in &selection.contest_selections {
        let contest = election.contest(&contest_selection.reference)?;
        validate_contest_selection(contest, contest_selection, voter.weight)?;
    }

    Ok(())
}

pub fn validate_contest_selection(
    contest: &ContestConfig,
    selection: &ContestSelection,
    weight: u64,
) -> Result<()> {
    if selection.reference != contest.reference {
        return Err(Error::corrupt_selection(format!(
            "contest selection {:?} does not match contest config {:?}",
            selection.reference, contest.reference
        )));
    }

    let marking = &contest.marking_type;
    if let Some(max_piles) = marking.max_piles {
        if selection.piles.len() > max_piles {
            return Err(Error::corrupt_selection(format!(
                "contest {:?} allows at most {} piles",
                contest.reference, max_piles
            )));
        }
    }

    let total = selection
        .piles
        .iter()
        .try_fold(0u64, |acc, pile| acc.checked_add(pile.multiplier));
    if total.map_or(true, |total| total > weight) {
        return Err(Error::corrupt_selection(format!(
            "pile multipliers exceed the voter weight of {}",
            weight
        )));
    }

    let options = contest.flatten_options()?;
    for pile in &selection.piles {
        if pile.is_blank() {
            if marking.blank_submission == BlankSubmission::Disabled {
                return Err(Error::corrupt_selection("blank submissions are not allowed"));
            }
            continue;
        }

        let marks = pile.option_selections.len();
        if marks < marking.min_marks || marks > marking.max_marks {
            return Err(Error::corrupt_selection(format!(
                "{} marks is outside the allowed range {}..={}",
                marks, marking.min_marks, marking.max_marks
            )));
        }

        let mut seen = BTreeSet::new();
        for option_selection in &pile.option_selections {
            if !seen.insert(option_selection.reference.as_str()) {
                return Err(Error::corrupt_selection(format!(
                    "duplicate option selection {:?}",
                    option_selection.reference
                )));
            }

            let option = options.get(&option_selection.reference).ok_or_else(|| {
                Error::corrupt_selection(format!(
                    "option config {:?} not found",
                    option_selection.reference
                ))
            })?;

            match (&option.write_in, &option_selection.text) {
                (Some(write_in), Some(text)) => {
                    if text.is_empty() {
                        return Err(Error::corrupt_selection("write-in text is empty"));
                    }
                    // Zero bytes are the padding of the encoded write-in field
                    if text.contains('\0') {
                        return Err(Error::corrupt_selection("write-in text contains a NUL byte"));
                    }
                    if text.len() > write_in.max_size {
                        return Err(Error::corrupt_selection(format!(
                            "write-in text is {} bytes, the limit is {}",
                            text.len(),
                            write_in.max_size
                        )));
                    }
                }
                (Some(_), None) => {
                    return Err(Error::corrupt_selection(format!(
                        "option {:?} requires write-in text",
                        option.reference
                    )));
                }
                (None, Some(_)) => {
                    return Err(Error::corrupt_selection(format!(
                        "option {:?} does not accept write-in text",
                        option.reference
                    )));
                }
                (None, None) => {}
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn election() -> ElectionConfig {
        ElectionConfig::from_json(crate::tests::ELECTION_CONFIG).unwrap()
    }

    fn voter() -> VoterEligibility {
        VoterEligibility {
            ballot_reference: "ballot-1".to_owned(),
            voting_round_reference: "round-1".to_owned(),
            weight: 1,
        }
    }

    fn selection(contests: Vec<ContestSelection>) -> BallotSelection {
        BallotSelection {
            reference: "ballot-1".to_owned(),
            contest_selections: contests,
        }
    }

    fn valid_contests() -> Vec<ContestSelection> {
        vec![
            ContestSelection::single("1", 1, vec![OptionSelection::new("option1")]),
            ContestSelection::single("2", 1, vec![OptionSelection::new("optiona")]),
        ]
    }

    fn assert_corrupt(result: Result<()>) {
        assert!(
            matches!(result, Err(Error::CorruptSelection(_))),
            "expected corrupt selection, got {:?}",
            result
        );
    }

    #[test]
    fn test_valid_selection() {
        validate_ballot_selection(&election(), &voter(), &selection(valid_contests())).unwrap();

        // Order of contests does not matter
        let mut reversed = valid_contests();
        reversed.reverse();
        validate_ballot_selection(&election(), &voter(), &selection(reversed)).unwrap();
    }

    #[test]
    fn test_wrong_ballot_reference() {
        let mut ballot = selection(valid_contests());
        ballot.reference = "ballot-2".to_owned();
        assert_corrupt(validate_ballot_selection(&election(), &voter(), &ballot));
    }

    #[test]
    fn test_contest_set_must_match() {
        let mut contests = valid_contests();
        contests.pop();
        assert_corrupt(validate_ballot_selection(
            &election(),
            &voter(),
            &selection(contests),
        ));

        let mut contests = valid_contests();
        contests.push(contests[0].clone());
        assert_corrupt(validate_ballot_selection(
            &election(),
            &voter(),
            &selection(contests),
        ));
    }

    #[test]
    fn test_weight_and_piles() {
        let election = election();
        let contest = election.contest("1").unwrap();

        let heavy = ContestSelection::single("1", 2, vec![OptionSelection::new("option1")]);
        assert_corrupt(validate_contest_selection(contest, &heavy, 1));
        validate_contest_selection(contest, &heavy, 2).unwrap();

        // Contest "1" allows at most one pile
        let mut split = ContestSelection::single("1", 1, vec![OptionSelection::new("option1")]);
        split.piles.push(split.piles[0].clone());
        assert_corrupt(validate_contest_selection(contest, &split, 2));
    }

    #[test]
    fn test_marks() {
        let election = election();
        let contest = election.contest("1").unwrap();

        // Blank submissions are disabled for contest "1"
        let blank = ContestSelection::single("1", 1, vec![]);
        assert_corrupt(validate_contest_selection(contest, &blank, 1));

        let too_many = ContestSelection::single(
            "1",
            1,
            vec![OptionSelection::new("option1"), OptionSelection::new("option2")],
        );
        assert_corrupt(validate_contest_selection(contest, &too_many, 1));

        let unknown = ContestSelection::single("1", 1, vec![OptionSelection::new("optiona")]);
        assert_corrupt(validate_contest_selection(contest, &unknown, 1));

        let wrong_contest = ContestSelection::single("2", 1, vec![OptionSelection::new("option1")]);
        assert_corrupt(validate_contest_selection(contest, &wrong_contest, 1));
    }

    #[test]
    fn test_blank_and_duplicates() {
        let election = election();
        let contest = election.contest("2").unwrap();

        // Contest "2" allows blank submissions and up to two marks
        let blank = ContestSelection::single("2", 1, vec![]);
        validate_contest_selection(contest, &blank, 1).unwrap();

        let duplicate = ContestSelection::single(
            "2",
            1,
            vec![OptionSelection::new("optiona"), OptionSelection::new("optiona")],
        );
        assert_corrupt(validate_contest_selection(contest, &duplicate, 1));
    }

    #[test]
    fn test_write_ins() {
        let election = election();
        let contest = election.contest("2").unwrap();

        let ok =
            ContestSelection::single("2", 1, vec![OptionSelection::write_in("writein", "Alice")]);
        validate_contest_selection(contest, &ok, 1).unwrap();

        let empty =
            ContestSelection::single("2", 1, vec![OptionSelection::write_in("writein", "")]);
        assert_corrupt(validate_contest_selection(contest, &empty, 1));

        let missing = ContestSelection::single("2", 1, vec![OptionSelection::new("writein")]);
        assert_corrupt(validate_contest_selection(contest, &missing, 1));

        let long = "x".repeat(17);
        let too_long =
            ContestSelection::single("2", 1, vec![OptionSelection::write_in("writein", &long)]);
        assert_corrupt(validate_contest_selection(contest, &too_long, 1));

        let unexpected =
            ContestSelection::single("2", 1, vec![OptionSelection::write_in("optiona", "Alice")]);
        assert_corrupt(validate_contest_selection(contest, &unexpected, 1));

        for text in ["Bob\0", "\0Bob", "B\0b"] {
            let nul =
                ContestSelection::single("2", 1, vec![OptionSelection::write_in("writein", text)]);
            assert_corrupt(validate_contest_selection(contest, &nul, 1));
        }
    }

    #[test]
    fn test_accepted_write_in_survives_encoding() {
        let election = election();
        let contest = election.contest("2").unwrap();

        let selection = ContestSelection::single(
            "2",
            1,
            vec![
                OptionSelection::new("optionb"),
                OptionSelection::write_in("writein", "Zoë  "),
            ],
        );
        validate_contest_selection(contest, &selection, 1).unwrap();

        let pile = &selection.piles[0];
        let bytes = selection_pile_to_byte_array(contest, pile).unwrap();
        assert_eq!(
            &byte_array_to_selection_pile(contest, &bytes, pile.multiplier).unwrap(),
            pile
        );
    }
}
