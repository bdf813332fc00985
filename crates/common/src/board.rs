//! The board: a passcode chain and a content chain behind one lock.
//!
//! Every mutation takes the same lock, so a post's validate, rotate and
//! append happen as one unit. Two callers racing with the same hash get
//! exactly one acceptance. A reaction on a restricted post is validated
//! under that lock too, so it can never slip in against a hash that a
//! concurrent post has already rotated away.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use time::OffsetDateTime;

use crate::content_chain::{generate_descriptors, ContentChain, ContentChainError, NewPost, Post};
use crate::crypto::CredentialHash;
use crate::passcode_chain::{
    Admission, Marker, PasscodeChain, PasscodeChainError, RejectReason, RotationEnvelope,
};

#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("{0}")]
    Rejected(#[from] RejectReason),
    #[error("{0}")]
    Invalid(#[from] ContentChainError),
    #[error("passcode chain failure: {0}")]
    PasscodeChain(PasscodeChainError),
}

impl From<PasscodeChainError> for BoardError {
    fn from(err: PasscodeChainError) -> Self {
        match err {
            PasscodeChainError::Rejected(reason) => BoardError::Rejected(reason),
            other => BoardError::PasscodeChain(other),
        }
    }
}

impl BoardError {
    pub fn code(&self) -> &'static str {
        match self {
            BoardError::Rejected(reason) => reason.code(),
            BoardError::Invalid(err) => err.code(),
            BoardError::PasscodeChain(_) => "internal",
        }
    }

    /// Whether the caller is at fault, as opposed to the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, BoardError::PasscodeChain(_))
    }
}

#[derive(Debug, Clone)]
pub struct PostReceipt {
    pub post_id: u64,
    pub envelope: RotationEnvelope,
}

#[derive(Debug, Clone)]
pub struct ReactionReceipt {
    pub post_id: u64,
    pub gravitas: u32,
    pub credentialed: bool,
}

/// Read-only copy of the chain
#[derive(Debug, Clone)]
pub struct ChainSnapshot {
    pub posts: Vec<Post>,
    pub days_since: i64,
}

/// Tagged outcome of a board operation, as reported over the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Post accepted, next passcode sealed under the presented hash
    Rotated { post_id: u64, ciphertext: String },
    /// Post accepted via the recovery credential
    RecoveryRotated { post_id: u64, ciphertext: String },
    /// Accepted without a rotation (reactions)
    Accepted,
    Rejected {
        reason: &'static str,
        message: String,
    },
}

impl Verdict {
    pub fn marker(&self) -> Marker {
        match self {
            Verdict::Rotated { .. } | Verdict::Accepted => Marker::Ordinary,
            Verdict::RecoveryRotated { .. } => Marker::Recovery,
            Verdict::Rejected { .. } => Marker::Rejected,
        }
    }

    pub fn ciphertext(&self) -> Option<&str> {
        match self {
            Verdict::Rotated { ciphertext, .. } | Verdict::RecoveryRotated { ciphertext, .. } => {
                Some(ciphertext)
            }
            _ => None,
        }
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Verdict::Rejected { reason, .. } => Some(reason),
            _ => None,
        }
    }

    pub fn rejected(err: &BoardError) -> Self {
        Verdict::Rejected {
            reason: err.code(),
            message: err.to_string(),
        }
    }
}

impl From<&PostReceipt> for Verdict {
    fn from(receipt: &PostReceipt) -> Self {
        let ciphertext = receipt.envelope.ciphertext.clone();
        match receipt.envelope.marker() {
            Marker::Recovery => Verdict::RecoveryRotated {
                post_id: receipt.post_id,
                ciphertext,
            },
            _ => Verdict::Rotated {
                post_id: receipt.post_id,
                ciphertext,
            },
        }
    }
}

#[derive(Debug)]
struct BoardInner {
    passcodes: PasscodeChain,
    content: ContentChain,
}

#[derive(Debug, Clone)]
pub struct Board {
    inner: Arc<Mutex<BoardInner>>,
}

impl Board {
    pub fn new(genesis: Option<CredentialHash>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoardInner {
                passcodes: PasscodeChain::new(genesis),
                content: ContentChain::new(),
            })),
        }
    }

    /// Append a post, spending `hash` and issuing the next passcode.
    ///
    /// Nothing changes unless every check passes.
    pub fn post(&self, post: NewPost, hash: &str) -> Result<PostReceipt, BoardError> {
        let credential = CredentialHash::parse(hash).map_err(RejectReason::from)?;
        let descriptors = generate_descriptors();

        let mut inner = self.inner.lock();
        inner.content.check(&post)?;
        let rotation = inner.passcodes.rotate(&credential)?;
        let post_id = inner
            .content
            .append(post, descriptors, OffsetDateTime::now_utc())?
            .id;

        tracing::info!(
            post_id,
            version = rotation.version,
            credential = credential.short(),
            kind = ?rotation.envelope.kind,
            "post accepted"
        );

        Ok(PostReceipt {
            post_id,
            envelope: rotation.envelope,
        })
    }

    /// React to a post. Open posts take anonymous reactions; restricted
    ///  posts need a hash that is valid right now. Never rotates.
    pub fn react(
        &self,
        post_id: u64,
        descriptor: &str,
        hash: Option<&str>,
    ) -> Result<ReactionReceipt, BoardError> {
        let credential = match hash.filter(|h| !h.is_empty()) {
            Some(h) => Some(CredentialHash::parse(h).map_err(RejectReason::from)?),
            None => None,
        };

        let mut inner = self.inner.lock();
        let open = inner
            .content
            .get(post_id)
            .ok_or(ContentChainError::UnknownPost(post_id))?
            .is_open();

        let admission = credential
            .as_ref()
            .map(|c| inner.passcodes.validate_hash(c));

        let credential = match (open, admission) {
            (_, Some(admission)) if admission.is_accepted() => credential,
            // an unproven hash on an open post just makes the reaction anonymous
            (true, _) => None,
            (false, Some(Admission::Rejected(reason))) => return Err(reason.into()),
            (false, _) => return Err(RejectReason::MissingCredential.into()),
        };

        let reaction = inner.content.add_reaction(
            post_id,
            descriptor,
            credential,
            OffsetDateTime::now_utc(),
        )?;

        tracing::info!(
            post_id,
            descriptor,
            gravitas = reaction.gravitas,
            "reaction accepted"
        );

        Ok(ReactionReceipt {
            post_id,
            gravitas: reaction.gravitas,
            credentialed: reaction.credentialed,
        })
    }

    pub fn chain(&self) -> ChainSnapshot {
        let inner = self.inner.lock();
        ChainSnapshot {
            posts: inner.content.posts().to_vec(),
            days_since: inner.content.days_since_last_post(OffsetDateTime::now_utc()),
        }
    }

    pub fn get(&self, post_id: u64) -> Option<Post> {
        self.inner.lock().content.get(post_id).cloned()
    }

    /// The reaction deck of a post
    pub fn descriptors(&self, post_id: u64) -> Result<Vec<String>, BoardError> {
        self.inner
            .lock()
            .content
            .get(post_id)
            .map(|p| p.descriptors.clone())
            .ok_or_else(|| ContentChainError::UnknownPost(post_id).into())
    }

    /// Check a hash without spending it
    pub fn validate(&self, hash: &str) -> Admission {
        self.inner.lock().passcodes.validate(hash)
    }

    pub fn version(&self) -> u64 {
        self.inner.lock().passcodes.version()
    }

    pub fn is_seeded(&self) -> bool {
        self.inner.lock().passcodes.is_seeded()
    }

    /// Whether the board lock can be taken within `wait`
    pub fn is_responsive(&self, wait: Duration) -> bool {
        self.inner.try_lock_for(wait).is_some()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::crypto::Passcode;

    fn new_post(title: &str, tag: i64) -> NewPost {
        NewPost {
            title: title.to_string(),
            author: "tester".to_string(),
            contents: "some contents".to_string(),
            tag,
        }
    }

    fn seeded() -> (Board, CredentialHash) {
        let hash = CredentialHash::from_passcode("abc123");
        (Board::new(Some(hash.clone())), hash)
    }

    #[test]
    fn test_post_then_repost_with_same_hash() {
        let (board, hash) = seeded();

        let receipt = board.post(new_post("first", 1), hash.as_str()).unwrap();
        assert_eq!(receipt.post_id, 1);
        assert_eq!(receipt.envelope.marker(), Marker::Ordinary);

        let err = board.post(new_post("second", 1), hash.as_str()).unwrap_err();
        assert!(matches!(err, BoardError::Rejected(RejectReason::Stale)));
        assert_eq!(board.chain().posts.len(), 1);
    }

    #[test]
    fn test_rejected_post_does_not_rotate() {
        let (board, hash) = seeded();

        let err = board.post(new_post("bad tag", 9), hash.as_str()).unwrap_err();
        assert!(matches!(err, BoardError::Invalid(ContentChainError::InvalidTag(9))));
        assert_eq!(board.version(), 0);

        // the hash is still good
        assert!(board.post(new_post("good tag", 6), hash.as_str()).is_ok());
    }

    #[test]
    fn test_malformed_hash_rejected() {
        let (board, _) = seeded();
        let err = board.post(new_post("x", 0), "abc123").unwrap_err();
        assert_eq!(err.code(), "malformed_credential");
        assert!(err.is_client_error());
        assert_eq!(board.version(), 0);
    }

    #[test]
    fn test_reactions_follow_tag() {
        let (board, hash) = seeded();
        let receipt = board.post(new_post("open", 0), hash.as_str()).unwrap();
        let next = receipt.envelope.open(&hash).unwrap();
        board.post(new_post("restricted", 3), next.hash().as_str()).unwrap();

        let open_deck = board.descriptors(1).unwrap();
        let restricted_deck = board.descriptors(2).unwrap();

        let anon = board.react(1, &open_deck[0], None).unwrap();
        assert!(!anon.credentialed);

        let err = board.react(2, &restricted_deck[0], None).unwrap_err();
        assert!(matches!(
            err,
            BoardError::Rejected(RejectReason::MissingCredential)
        ));
    }

    #[test]
    fn test_restricted_reaction_with_current_hash_does_not_rotate() {
        let (board, hash) = seeded();
        let receipt = board.post(new_post("restricted", 2), hash.as_str()).unwrap();
        let next = receipt.envelope.open(&hash).unwrap().hash();
        let deck = board.descriptors(receipt.post_id).unwrap();

        let reaction = board
            .react(receipt.post_id, &deck[0], Some(next.as_str()))
            .unwrap();
        assert!(reaction.credentialed);
        assert_eq!(reaction.gravitas, crate::content_chain::CREDENTIAL_GRAVITAS);
        assert_eq!(board.version(), 1);
        assert_eq!(board.validate(next.as_str()), Admission::Ordinary);

        // once per credential
        let err = board
            .react(receipt.post_id, &deck[1], Some(next.as_str()))
            .unwrap_err();
        assert_eq!(err.code(), "already_reacted");
    }

    #[test]
    fn test_stale_hash_cannot_react_to_restricted_post() {
        let (board, hash) = seeded();
        let receipt = board.post(new_post("restricted", 4), hash.as_str()).unwrap();
        let deck = board.descriptors(receipt.post_id).unwrap();

        let err = board
            .react(receipt.post_id, &deck[0], Some(hash.as_str()))
            .unwrap_err();
        assert!(matches!(err, BoardError::Rejected(RejectReason::Stale)));
    }

    #[test]
    fn test_unproven_hash_on_open_post_is_anonymous() {
        let (board, hash) = seeded();
        board.post(new_post("open", 0), hash.as_str()).unwrap();
        let deck = board.descriptors(1).unwrap();

        let reaction = board.react(1, &deck[0], Some(hash.as_str())).unwrap();
        assert!(!reaction.credentialed);
        assert_eq!(reaction.gravitas, crate::content_chain::ANONYMOUS_GRAVITAS);
    }

    #[test]
    fn test_react_to_unknown_post() {
        let (board, hash) = seeded();
        let err = board.react(42, "calm", Some(hash.as_str())).unwrap_err();
        assert_eq!(err.code(), "unknown_post");
        assert!(board.descriptors(42).is_err());
    }

    #[test]
    fn test_unseeded_board_takes_recovery_post() {
        let board = Board::new(None);
        assert!(!board.is_seeded());

        let ordinary = Passcode::from("abc123").hash();
        let err = board.post(new_post("nope", 0), ordinary.as_str()).unwrap_err();
        assert_eq!(err.code(), "unseeded");

        let recovery = CredentialHash::recovery();
        let receipt = board.post(new_post("genesis", 0), recovery.as_str()).unwrap();
        assert_eq!(Verdict::from(&receipt).marker(), Marker::Recovery);
        assert!(board.is_seeded());

        let next = receipt.envelope.open(&recovery).unwrap();
        assert_eq!(board.validate(next.hash().as_str()), Admission::Ordinary);
    }

    #[test]
    fn test_verdict_markers() {
        let (board, hash) = seeded();
        let receipt = board.post(new_post("first", 1), hash.as_str()).unwrap();
        let verdict = Verdict::from(&receipt);
        assert_eq!(verdict.marker(), Marker::Ordinary);
        assert_eq!(verdict.ciphertext(), Some(receipt.envelope.ciphertext.as_str()));
        assert_eq!(verdict.reason(), None);

        let err = board.post(new_post("again", 1), hash.as_str()).unwrap_err();
        let verdict = Verdict::rejected(&err);
        assert_eq!(verdict.marker(), Marker::Rejected);
        assert_eq!(verdict.reason(), Some("stale_credential"));
        assert_eq!(verdict.ciphertext(), None);

        assert_eq!(Verdict::Accepted.marker(), Marker::Ordinary);
    }

    #[test]
    fn test_is_responsive() {
        let (board, _) = seeded();
        assert!(board.is_responsive(Duration::from_millis(10)));

        let held = board.inner.lock();
        assert!(!board.is_responsive(Duration::from_millis(10)));
        drop(held);
    }
}
