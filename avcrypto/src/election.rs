use crate::*;
use indexmap::IndexMap;

/// The parts of an election configuration the crypto core consumes
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ElectionConfig {
    pub curve: CurveName,

    /// Hex encoded election public encryption key
    pub encryption_key: String,

    pub contest_configs: IndexMap<String, ContestConfig>,

    pub ballot_configs: IndexMap<String, BallotConfig>,

    pub voting_round_configs: IndexMap<String, VotingRoundConfig>,
}

impl ElectionConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn contest(&self, reference: &str) -> Result<&ContestConfig> {
        self.contest_configs
            .get(reference)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown contest {:?}", reference)))
    }

    pub fn ballot(&self, reference: &str) -> Result<&BallotConfig> {
        self.ballot_configs
            .get(reference)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown ballot {:?}", reference)))
    }

    pub fn voting_round(&self, reference: &str) -> Result<&VotingRoundConfig> {
        self.voting_round_configs
            .get(reference)
            .ok_or_else(|| Error::InvalidConfig(format!("unknown voting round {:?}", reference)))
    }
}

/// What a voter is allowed to vote on, as established by the authorization layer
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VoterEligibility {
    pub ballot_reference: String,
    pub voting_round_reference: String,
    pub weight: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BallotConfig {
    pub reference: String,
    pub contest_references: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct VotingRoundConfig {
    pub reference: String,
    pub contest_references: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ContestConfig {
    pub reference: String,
    pub marking_type: MarkingType,
    pub options: Vec<OptionConfig>,
}

impl ContestConfig {
    /// Flatten the option tree into a reference-keyed map, in depth-first order.
    ///
    /// Option references must be unique across the whole tree.
    pub fn flatten_options(&self) -> Result<IndexMap<String, &OptionConfig>> {
        fn walk<'a>(
            options: &'a [OptionConfig],
            flat: &mut IndexMap<String, &'a OptionConfig>,
        ) -> Result<()> {
            for option in options {
                if flat.insert(option.reference.clone(), option).is_some() {
                    return Err(Error::InvalidConfig(format!(
                        "duplicate option reference {:?}",
                        option.reference
                    )));
                }
                walk(&option.children, flat)?;
            }
            Ok(())
        }

        let mut flat = IndexMap::new();
        walk(&self.options, &mut flat)?;
        Ok(flat)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct MarkingType {
    pub min_marks: usize,
    pub max_marks: usize,
    pub blank_submission: BlankSubmission,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_piles: Option<usize>,

    pub encoding: EncodingConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BlankSubmission {
    Disabled,
    ActiveChoice,
    Implicit,
}

/// Byte layout of an encoded selection pile
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EncodingConfig {
    /// Width in bytes of an option code
    pub code_size: usize,

    /// Size in bytes of an encoded pile
    pub max_size: usize,

    /// Number of cryptograms per pile
    pub cryptogram_count: usize,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OptionConfig {
    pub reference: String,
    pub code: u64,

    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_in: Option<WriteInConfig>,

    #[serde(default)]
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OptionConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct WriteInConfig {
    /// Maximum size in bytes of the encoded text
    pub max_size: usize,
    pub encoding: WriteInEncoding,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteInEncoding {
    #[serde(rename = "utf8")]
    Utf8,

    #[serde(other)]
    Unsupported,
}
