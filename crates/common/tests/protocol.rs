//! Integration tests for the passcode rotation protocol

mod common;

use std::collections::HashSet;

use ::common::board::{BoardError, Verdict};
use ::common::crypto::{envelope, CredentialHash, Passcode, PASSCODE_LEN};
use ::common::passcode_chain::{Admission, Marker, RejectReason};

#[test]
fn test_genesis_post_issues_next_passcode() {
    let (board, genesis) = common::setup_board();
    assert_eq!(
        genesis.as_str(),
        "6ca13d52ca70c883e0f0bb101e425a89e8624de51db2d2392593af6a84118090"
    );

    let receipt = board
        .post(common::new_post("hello", 0), genesis.as_str())
        .unwrap();
    assert_eq!(receipt.post_id, 1);

    let verdict = Verdict::from(&receipt);
    assert_eq!(verdict.marker(), Marker::Ordinary);
    let ciphertext = verdict.ciphertext().unwrap();
    assert_eq!(ciphertext.len(), 32);

    let next = receipt.envelope.open(&genesis).unwrap();
    assert_eq!(next.as_str().len(), PASSCODE_LEN);
    assert!(next.as_str().chars().all(|c| c.is_ascii_alphanumeric()));

    assert_eq!(board.validate(next.hash().as_str()), Admission::Ordinary);
    assert_eq!(
        board.validate(genesis.as_str()),
        Admission::Rejected(RejectReason::Stale)
    );
}

#[test]
fn test_passcode_cannot_be_spent_twice() {
    let (board, genesis) = common::setup_board();
    board
        .post(common::new_post("first", 0), genesis.as_str())
        .unwrap();

    let err = board
        .post(common::new_post("second", 0), genesis.as_str())
        .unwrap_err();
    assert!(matches!(err, BoardError::Rejected(RejectReason::Stale)));
    assert_eq!(Verdict::rejected(&err).marker(), Marker::Rejected);
    assert_eq!(board.chain().posts.len(), 1);
    assert_eq!(board.version(), 1);
}

#[test]
fn test_chain_of_rotations() {
    let (board, mut hash) = common::setup_board();
    let mut seen = HashSet::new();
    seen.insert(hash.as_str().to_string());

    for i in 0..20 {
        let (receipt, next) = common::post_and_advance(&board, &format!("post {}", i), 0, &hash);
        assert_eq!(receipt.post_id, i + 1);
        assert!(seen.insert(next.as_str().to_string()), "passcode reused");
        hash = next;
    }
    assert_eq!(board.version(), 20);
    assert_eq!(board.validate(hash.as_str()), Admission::Ordinary);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_posts_with_same_hash() {
    let (board, genesis) = common::setup_board();

    let mut handles = Vec::new();
    for i in 0..16 {
        let board = board.clone();
        let hash = genesis.as_str().to_string();
        handles.push(tokio::task::spawn_blocking(move || {
            board.post(common::new_post(&format!("racer {}", i), 0), &hash)
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(BoardError::Rejected(RejectReason::Stale)) => {}
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(accepted, 1);
    assert_eq!(board.chain().posts.len(), 1);
    assert_eq!(board.version(), 1);
}

#[test]
fn test_recovery_credential_rotates_under_recovery_key() {
    let (board, genesis) = common::setup_board();
    let recovery = CredentialHash::recovery();

    let receipt = board
        .post(common::new_post("recovered", 0), recovery.as_str())
        .unwrap();
    assert_eq!(Verdict::from(&receipt).marker(), Marker::Recovery);

    // the holder of the recovery passphrase reads the new passcode
    let next = envelope::open_string(&recovery, &receipt.envelope.ciphertext).unwrap();
    let next = Passcode::from(next);
    assert_eq!(board.validate(next.hash().as_str()), Admission::Ordinary);

    // and the previous holder has been locked out
    assert_eq!(
        board.validate(genesis.as_str()),
        Admission::Rejected(RejectReason::Stale)
    );
}

#[test]
fn test_legacy_open_yields_garbage_for_wrong_key() {
    let (board, genesis) = common::setup_board();
    let receipt = board
        .post(common::new_post("hello", 0), genesis.as_str())
        .unwrap();

    let wrong = CredentialHash::from_passcode("not it");
    assert!(receipt.envelope.open(&wrong).is_err());
    assert_ne!(
        receipt.envelope.open_lossy(&wrong),
        receipt.envelope.open_lossy(&genesis)
    );
}

#[test]
fn test_rejections_report_reason_codes() {
    let (board, _) = common::setup_board();

    let err = board
        .post(common::new_post("x", 0), "not a hash")
        .unwrap_err();
    assert_eq!(err.code(), "malformed_credential");

    let upper = CredentialHash::from_passcode("abc123").as_str().to_uppercase();
    let err = board.post(common::new_post("x", 0), &upper).unwrap_err();
    assert_eq!(err.code(), "malformed_credential");

    let other = CredentialHash::from_passcode("abc124");
    let err = board
        .post(common::new_post("x", 0), other.as_str())
        .unwrap_err();
    assert_eq!(err.code(), "unknown_credential");

    assert_eq!(board.version(), 0);
    assert!(board.chain().posts.is_empty());
}
