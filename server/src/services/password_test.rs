use super::*;

#[test]
fn hash_then_verify_matches() {
    let hash = hash_password("TestPass123").unwrap();
    assert!(hash.starts_with("$2"));
    assert!(verify_password("TestPass123", &hash));
}

#[test]
fn wrong_password_does_not_match() {
    let hash = hash_password("TestPass123").unwrap();
    assert!(!verify_password("testpass123", &hash));
}

#[test]
fn hashes_are_salted() {
    let a = hash_password("same-password").unwrap();
    let b = hash_password("same-password").unwrap();
    assert_ne!(a, b);
}

#[test]
fn empty_password_is_rejected() {
    assert!(matches!(hash_password(""), Err(PasswordError::Empty)));
}

#[test]
fn verify_with_empty_inputs_is_false() {
    assert!(!verify_password("", "$2b$10$abc"));
    assert!(!verify_password("secret", ""));
}

#[test]
fn verify_with_garbage_hash_is_false() {
    assert!(!verify_password("secret", "not-a-bcrypt-hash"));
}

#[tokio::test]
async fn blocking_wrappers_round_trip() {
    let hash = hash_password_blocking("secret123".to_owned()).await.unwrap();
    assert!(verify_password_blocking("secret123".to_owned(), hash.clone()).await);
    assert!(!verify_password_blocking("nope".to_owned(), hash).await);
}
