//! Shared test utilities for board integration tests
#![allow(dead_code)]

use common::board::{Board, PostReceipt};
use common::content_chain::NewPost;
use common::crypto::CredentialHash;

pub const GENESIS_PASSCODE: &str = "abc123";

/// A board seeded with the genesis passcode, and that passcode's hash
pub fn setup_board() -> (Board, CredentialHash) {
    let hash = CredentialHash::from_passcode(GENESIS_PASSCODE);
    (Board::new(Some(hash.clone())), hash)
}

pub fn new_post(title: &str, tag: i64) -> NewPost {
    NewPost {
        title: title.to_string(),
        author: "anon".to_string(),
        contents: format!("contents of {}", title),
        tag,
    }
}

/// Post with `hash` and return the receipt together with the hash of the
///  passcode it issued
pub fn post_and_advance(
    board: &Board,
    title: &str,
    tag: i64,
    hash: &CredentialHash,
) -> (PostReceipt, CredentialHash) {
    let receipt = board.post(new_post(title, tag), hash.as_str()).unwrap();
    let next = receipt.envelope.open(hash).unwrap().hash();
    (receipt, next)
}
