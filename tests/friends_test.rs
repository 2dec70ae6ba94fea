//! Friend graph tests against the in-memory store.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use ecotrack::Error;
use ecotrack::stores::{MemoryStore, UserStore};
use ecotrack::types::UserProfile;

async fn store_with_users(ids: &[&str]) -> MemoryStore {
    let store = MemoryStore::new();
    for id in ids {
        store.create_user(&UserProfile::new(*id)).await.unwrap();
    }
    store
}

#[tokio::test]
async fn send_then_accept_establishes_symmetric_friendship() {
    let store = store_with_users(&["alice", "bob"]).await;

    store.send_friend_request("alice", "bob").await.unwrap();

    let bob = store.friend_sets("bob").await.unwrap();
    assert_eq!(bob.requests_received, vec!["alice".to_string()]);
    let alice = store.friend_sets("alice").await.unwrap();
    assert_eq!(alice.requests_sent, vec!["bob".to_string()]);

    store.accept_friend_request("bob", "alice").await.unwrap();

    let alice = store.friend_sets("alice").await.unwrap();
    let bob = store.friend_sets("bob").await.unwrap();
    assert_eq!(alice.friends, vec!["bob".to_string()]);
    assert_eq!(bob.friends, vec!["alice".to_string()]);
    assert!(alice.requests_sent.is_empty());
    assert!(alice.requests_received.is_empty());
    assert!(bob.requests_sent.is_empty());
    assert!(bob.requests_received.is_empty());
}

#[tokio::test]
async fn accept_without_pending_request_fails() {
    let store = store_with_users(&["alice", "bob"]).await;

    let err = store
        .accept_friend_request("bob", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NoPendingRequest));
}

#[tokio::test]
async fn reject_does_not_block_future_requests() {
    let store = store_with_users(&["alice", "bob"]).await;

    store.send_friend_request("alice", "bob").await.unwrap();
    store.reject_friend_request("bob", "alice").await.unwrap();

    let bob = store.friend_sets("bob").await.unwrap();
    assert!(bob.requests_received.is_empty());
    assert!(bob.friends.is_empty());

    // Rejection is not permanent
    store.send_friend_request("alice", "bob").await.unwrap();
    let bob = store.friend_sets("bob").await.unwrap();
    assert_eq!(bob.requests_received, vec!["alice".to_string()]);
}

#[tokio::test]
async fn reject_without_pending_request_is_a_noop() {
    let store = store_with_users(&["alice", "bob"]).await;

    // Deliberate policy: silently succeeds
    store.reject_friend_request("bob", "alice").await.unwrap();
}

#[tokio::test]
async fn duplicate_request_is_rejected() {
    let store = store_with_users(&["alice", "bob"]).await;

    store.send_friend_request("alice", "bob").await.unwrap();
    let err = store.send_friend_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, Error::DuplicateFriendRequest));
}

#[tokio::test]
async fn request_between_friends_is_rejected() {
    let store = store_with_users(&["alice", "bob"]).await;

    store.send_friend_request("alice", "bob").await.unwrap();
    store.accept_friend_request("bob", "alice").await.unwrap();

    let err = store.send_friend_request("alice", "bob").await.unwrap_err();
    assert!(matches!(err, Error::AlreadyFriends));
}

#[tokio::test]
async fn self_request_is_rejected() {
    let store = store_with_users(&["alice"]).await;

    let err = store
        .send_friend_request("alice", "alice")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[tokio::test]
async fn requests_require_both_users_to_exist() {
    let store = store_with_users(&["alice"]).await;

    let err = store.send_friend_request("alice", "ghost").await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(id) if id == "ghost"));

    let err = store.friend_sets("ghost").await.unwrap_err();
    assert!(matches!(err, Error::UserNotFound(_)));
}
