/// A voter's raw selections for one ballot
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BallotSelection {
    pub reference: String,
    pub contest_selections: Vec<ContestSelection>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ContestSelection {
    pub reference: String,
    pub piles: Vec<SelectionPile>,
}

impl ContestSelection {
    /// A contest selection with one full-weight pile
    pub fn single(reference: &str, multiplier: u64, options: Vec<OptionSelection>) -> Self {
        ContestSelection {
            reference: reference.to_owned(),
            piles: vec![SelectionPile {
                multiplier,
                option_selections: options,
            }],
        }
    }
}

/// Option selections sharing one vote weight
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SelectionPile {
    pub multiplier: u64,
    pub option_selections: Vec<OptionSelection>,
}

impl SelectionPile {
    pub fn is_blank(&self) -> bool {
        self.option_selections.is_empty()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OptionSelection {
    pub reference: String,

    /// Write-in text, for options that accept one
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl OptionSelection {
    pub fn new(reference: &str) -> Self {
        OptionSelection {
            reference: reference.to_owned(),
            text: None,
        }
    }

    pub fn write_in(reference: &str, text: &str) -> Self {
        OptionSelection {
            reference: reference.to_owned(),
            text: Some(text.to_owned()),
        }
    }
}
