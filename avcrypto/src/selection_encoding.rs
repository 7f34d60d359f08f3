//! Byte layout of a selection pile.
//!
//! Each selected option is written as its code, a big-endian integer of `codeSize` bytes. An
//! option with a write-in is immediately followed by its text, UTF-8 encoded and zero-padded to
//! the write-in's `maxSize`. The whole pile is zero-padded to the contest's `maxSize`; code `0`
//! is reserved for that padding.

use crate::*;
use indexmap::IndexMap;

const MAX_CODE_SIZE: usize = 8;

fn check_code_size(encoding: &EncodingConfig) -> Result<usize> {
    if encoding.code_size == 0 || encoding.code_size > MAX_CODE_SIZE {
        return Err(Error::InvalidConfig(format!(
            "code size must be between 1 and {} bytes, got {}",
            MAX_CODE_SIZE, encoding.code_size
        )));
    }
    Ok(encoding.code_size)
}

fn check_write_in(option: &OptionConfig) -> Result<Option<usize>> {
    match &option.write_in {
        None => Ok(None),
        Some(write_in) if write_in.encoding == WriteInEncoding::Utf8 => Ok(Some(write_in.max_size)),
        Some(_) => Err(Error::InvalidConfig(format!(
            "unsupported write-in encoding for option {:?}",
            option.reference
        ))),
    }
}

fn encode_code(code: u64, code_size: usize, reference: &str) -> Result<Vec<u8>> {
    let bytes = code.to_be_bytes();
    let (overflow, fitted) = bytes.split_at(bytes.len() - code_size);

    if code == 0 || overflow.iter().any(|b| *b != 0) {
        return Err(Error::InvalidConfig(format!(
            "code {} of option {:?} does not fit in {} bytes",
            code, reference, code_size
        )));
    }
    Ok(fitted.to_vec())
}

/// Encode a selection pile into the contest's fixed-size byte layout
pub fn selection_pile_to_byte_array(
    contest: &ContestConfig,
    pile: &SelectionPile,
) -> Result<Vec<u8>> {
    let encoding = &contest.marking_type.encoding;
    let code_size = check_code_size(encoding)?;
    let options = contest.flatten_options()?;

    let mut bytes = Vec::with_capacity(encoding.max_size);
    for selection in &pile.option_selections {
        let option = options.get(&selection.reference).ok_or_else(|| {
            Error::corrupt_selection(format!(
                "option reference {:?} not found",
                selection.reference
            ))
        })?;

        bytes.extend(encode_code(option.code, code_size, &option.reference)?);

        if let Some(max_size) = check_write_in(option)? {
            let mut text = selection
                .text
                .as_deref()
                .unwrap_or_default()
                .as_bytes()
                .to_vec();
            text.resize(max_size, 0);
            bytes.extend(text);
        }
    }

    if bytes.len() > encoding.max_size {
        return Err(Error::EncodingCapacity(format!(
            "selection for contest {:?} needs {} bytes but max size is {}",
            contest.reference,
            bytes.len(),
            encoding.max_size
        )));
    }
    bytes.resize(encoding.max_size, 0);

    Ok(bytes)
}

/// Decode a selection pile. Decoding stops at the zero padding.
pub fn byte_array_to_selection_pile(
    contest: &ContestConfig,
    bytes: &[u8],
    multiplier: u64,
) -> Result<SelectionPile> {
    let code_size = check_code_size(&contest.marking_type.encoding)?;

    let mut by_code: IndexMap<u64, &OptionConfig> = IndexMap::new();
    for option in contest.flatten_options()?.values() {
        if by_code.insert(option.code, *option).is_some() {
            return Err(Error::InvalidConfig(format!(
                "duplicate option code {} in contest {:?}",
                option.code, contest.reference
            )));
        }
    }

    let mut option_selections = Vec::new();
    let mut rest = bytes;
    while rest.iter().any(|b| *b != 0) {
        if rest.len() < code_size {
            return Err(Error::corrupt_selection("truncated option code"));
        }
        let (code_bytes, tail) = rest.split_at(code_size);
        rest = tail;

        let code = code_bytes.iter().fold(0u64, |acc, b| (acc << 8) | u64::from(*b));
        if code == 0 {
            return Err(Error::corrupt_selection("option code 0 found before end of selection"));
        }
        let option = by_code
            .get(&code)
            .ok_or_else(|| Error::corrupt_selection(format!("option code {} not found", code)))?;

        let text = match check_write_in(option)? {
            None => None,
            Some(max_size) => {
                if rest.len() < max_size {
                    return Err(Error::corrupt_selection("truncated write-in text"));
                }
                let (field, tail) = rest.split_at(max_size);
                rest = tail;

                let end = field.iter().rposition(|b| *b != 0).map_or(0, |i| i + 1);
                let text = std::str::from_utf8(&field[..end])
                    .map_err(|_| Error::corrupt_selection("write-in text is not valid UTF-8"))?;
                Some(text.to_owned())
            }
        };

        option_selections.push(OptionSelection {
            reference: option.reference.clone(),
            text,
        });
    }

    Ok(SelectionPile {
        multiplier,
        option_selections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contest(code_size: usize, max_size: usize) -> ContestConfig {
        let json = format!(
            r#"{{
                "reference": "1",
                "markingType": {{
                    "minMarks": 1,
                    "maxMarks": 3,
                    "blankSubmission": "active_choice",
                    "encoding": {{ "codeSize": {}, "maxSize": {}, "cryptogramCount": 1 }}
                }},
                "options": [
                    {{ "reference": "option1", "code": 1 }},
                    {{ "reference": "option2", "code": 2, "children": [
                        {{ "reference": "option2a", "code": 300 }}
                    ] }},
                    {{ "reference": "writein", "code": 4,
                       "writeIn": {{ "maxSize": 10, "encoding": "utf8" }} }}
                ]
            }}"#,
            code_size, max_size
        );
        serde_json::from_str(&json).unwrap()
    }

    fn pile(options: Vec<OptionSelection>) -> SelectionPile {
        SelectionPile {
            multiplier: 1,
            option_selections: options,
        }
    }

    #[test]
    fn test_byte_layout() {
        let contest = contest(2, 20);
        let bytes = selection_pile_to_byte_array(
            &contest,
            &pile(vec![
                OptionSelection::new("option2a"),
                OptionSelection::write_in("writein", "Bob"),
            ]),
        )
        .unwrap();

        let mut expected = vec![0x01, 0x2c, 0x00, 0x04, b'B', b'o', b'b'];
        expected.resize(20, 0);
        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_roundtrip() {
        let contest = contest(2, 30);
        let piles = vec![
            pile(vec![OptionSelection::new("option1")]),
            pile(vec![
                OptionSelection::new("option2"),
                OptionSelection::new("option2a"),
            ]),
            pile(vec![
                OptionSelection::write_in("writein", "Zoë"),
                OptionSelection::new("option1"),
            ]),
            pile(vec![]),
        ];

        for pile in piles {
            let bytes = selection_pile_to_byte_array(&contest, &pile).unwrap();
            assert_eq!(bytes.len(), 30);
            let decoded = byte_array_to_selection_pile(&contest, &bytes, pile.multiplier).unwrap();
            assert_eq!(decoded, pile);
        }
    }

    #[test]
    fn test_unknown_option() {
        let contest = contest(1, 10);
        let result =
            selection_pile_to_byte_array(&contest, &pile(vec![OptionSelection::new("nope")]));
        assert!(matches!(result, Err(Error::CorruptSelection(_))));
    }

    #[test]
    fn test_code_must_fit() {
        // option2a has code 300
        let contest = contest(1, 10);
        let result =
            selection_pile_to_byte_array(&contest, &pile(vec![OptionSelection::new("option2a")]));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_capacity() {
        let contest = contest(2, 11);
        let result = selection_pile_to_byte_array(
            &contest,
            &pile(vec![
                OptionSelection::new("option1"),
                OptionSelection::write_in("writein", "x"),
            ]),
        );
        assert!(matches!(result, Err(Error::EncodingCapacity(_))));
    }

    #[test]
    fn test_decode_rejects_bad_codes() {
        let contest = contest(2, 8);

        // Zero code followed by data
        let bytes = [0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00];
        assert!(matches!(
            byte_array_to_selection_pile(&contest, &bytes, 1),
            Err(Error::CorruptSelection(_))
        ));

        // Unknown code
        let bytes = [0x00, 0x09, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            byte_array_to_selection_pile(&contest, &bytes, 1),
            Err(Error::CorruptSelection(_))
        ));

        // Write-in field cut short
        let bytes = [0x00, 0x04, b'a', b'b', 0x00, 0x00, 0x00, 0x00];
        assert!(matches!(
            byte_array_to_selection_pile(&contest, &bytes, 1),
            Err(Error::CorruptSelection(_))
        ));
    }

    #[test]
    fn test_unsupported_write_in_encoding() {
        let mut contest = contest(2, 20);
        contest.options[2].write_in = Some(WriteInConfig {
            max_size: 10,
            encoding: WriteInEncoding::Unsupported,
        });

        let result = selection_pile_to_byte_array(
            &contest,
            &pile(vec![OptionSelection::write_in("writein", "Bob")]),
        );
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
