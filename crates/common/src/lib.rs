/**
 * The board itself: both chains behind a single
 *  lock so that a post is validated, the passcode
 *  rotated and the post appended in one step.
 */
pub mod board;
/**
 * The content chain: an append-only list of tagged
 *  posts and the reactions made against them.
 */
pub mod content_chain;
/**
 * Cryptographic types and operations.
 *  - Passcodes and their credential hashes
 *  - Sealing and opening rotation envelopes
 */
pub mod crypto;
/**
 * The passcode chain: one rotating credential,
 *  spent by compare-and-swap.
 */
pub mod passcode_chain;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub mod prelude {
    pub use crate::board::{
        Board, BoardError, ChainSnapshot, PostReceipt, ReactionReceipt, Verdict,
    };
    pub use crate::content_chain::{NewPost, Post, Reaction, ReactionSummary, Tag};
    pub use crate::crypto::{CredentialHash, Passcode};
    pub use crate::passcode_chain::{Admission, Marker, RejectReason, RotationEnvelope, RotationKind};
    pub use crate::version::build_info;
}
