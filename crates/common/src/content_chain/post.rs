use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::crypto::CredentialHash;

use super::ContentChainError;

/// Number of categories a post can be tagged with
pub const TAG_COUNT: u8 = 7;

/// Weight of a reaction made without a passcode
pub const ANONYMOUS_GRAVITAS: u32 = 2;
/// Weight of a reaction backed by a valid passcode
pub const CREDENTIAL_GRAVITAS: u32 = 6;

/// Post category. `0` is open to anonymous reactions, `1..=6` are
///  restricted to passcode holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(u8);

impl Tag {
    pub const OPEN: Tag = Tag(0);

    pub fn new(value: u8) -> Result<Self, ContentChainError> {
        if value < TAG_COUNT {
            Ok(Self(value))
        } else {
            Err(ContentChainError::InvalidTag(value as i64))
        }
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_open(self) -> bool {
        self.0 == 0
    }
}

impl TryFrom<i64> for Tag {
    type Error = ContentChainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| ContentChainError::InvalidTag(value))
            .and_then(Tag::new)
    }
}

/// A post as submitted, before it has an id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub author: String,
    pub contents: String,
    pub tag: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: u64,
    pub title: String,
    pub author: String,
    pub contents: String,
    pub tag: Tag,
    pub descriptors: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Post {
    pub fn is_open(&self) -> bool {
        self.tag.is_open()
    }

    pub fn has_descriptor(&self, descriptor: &str) -> bool {
        self.descriptors.iter().any(|d| d == descriptor)
    }

    pub fn anonymous_reactions(&self) -> usize {
        self.reactions.iter().filter(|r| !r.credentialed).count()
    }

    pub fn has_reacted(&self, credential: &CredentialHash) -> bool {
        self.reactions
            .iter()
            .any(|r| r.credential.as_ref() == Some(credential))
    }

    /// Total gravitas per descriptor, heaviest first
    pub fn reaction_summary(&self) -> Vec<ReactionSummary> {
        let mut summary: Vec<ReactionSummary> = Vec::new();
        for reaction in &self.reactions {
            match summary
                .iter_mut()
                .find(|s| s.descriptor == reaction.descriptor)
            {
                Some(entry) => {
                    entry.gravitas += reaction.gravitas;
                    entry.count += 1;
                }
                None => summary.push(ReactionSummary {
                    descriptor: reaction.descriptor.clone(),
                    gravitas: reaction.gravitas,
                    count: 1,
                }),
            }
        }
        summary.sort_by(|a, b| {
            b.gravitas
                .cmp(&a.gravitas)
                .then_with(|| a.descriptor.cmp(&b.descriptor))
        });
        summary
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub post_id: u64,
    pub descriptor: String,
    pub gravitas: u32,
    pub credentialed: bool,
    // never published: it is the passcode hash that was current when the
    //  reaction was made
    #[serde(skip)]
    pub credential: Option<CredentialHash>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReactionSummary {
    pub descriptor: String,
    pub gravitas: u32,
    pub count: usize,
}
