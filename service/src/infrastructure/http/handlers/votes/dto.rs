use hallostories_common::vote::Vote;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManyVotesResponse {
    data: Vec<Vote>,
    meta: VotesMetadataResponse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VotesMetadataResponse {
    total: usize,
}

impl From<Vec<Vote>> for ManyVotesResponse {
    fn from(value: Vec<Vote>) -> Self {
        let meta = VotesMetadataResponse { total: value.len() };
        Self { data: value, meta }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProgressParams {
    pub voter: String,
}
