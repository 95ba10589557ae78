use serde::{Deserialize, Serialize};

/// Declares a transparent string identifier.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

pub(crate) use string_id;

string_id!(
    /// Identifier of a candidate within an owner's partition.
    CandidateId
);
string_id!(
    /// Identifier of the job a candidate is being scored against.
    JobId
);
string_id!(
    /// Data partition key supplied by the caller (`X-Owner-Id`).
    OwnerId
);

/// Composite key for one candidate/job pair inside an owner partition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisKey {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner_id: Option<OwnerId>,
    pub job_id: JobId,
    pub candidate_id: CandidateId,
}

impl AnalysisKey {
    pub fn new(owner_id: Option<OwnerId>, job_id: JobId, candidate_id: CandidateId) -> Self {
        Self {
            owner_id,
            job_id,
            candidate_id,
        }
    }

    /// Flat `owner:job:candidate` form used by the file-backed stores.
    pub fn storage_key(&self) -> String {
        storage_key(self.owner_id.as_ref(), &self.job_id, &self.candidate_id)
    }
}

/// Joins the parts with `:`. `%` and `:` inside a part are percent-encoded so
/// distinct triples never share a key.
pub(crate) fn storage_key(
    owner_id: Option<&OwnerId>,
    job_id: &JobId,
    candidate_id: &CandidateId,
) -> String {
    let owner = owner_id.map(OwnerId::as_str).unwrap_or_default();
    format!(
        "{}:{}:{}",
        escape_key_part(owner),
        escape_key_part(job_id.as_str()),
        escape_key_part(candidate_id.as_str())
    )
}

fn escape_key_part(part: &str) -> String {
    part.replace('%', "%25").replace(':', "%3A")
}
