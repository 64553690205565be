use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{User, UserRole};
use crate::service::auth::{authorize, Access, TokenSigner};

fn test_user(role: UserRole) -> User {
    let now = Utc::now();
    User {
        id: Uuid::new_v4(),
        name: "Test User".to_string(),
        email: "test@example.com".to_string(),
        password_hash: String::new(),
        role,
        image: String::new(),
        created_at: now,
        updated_at: now,
    }
}

#[test]
fn issued_token_round_trips() {
    let signer = TokenSigner::new("test-secret");
    let user_id = Uuid::new_v4();
    let token = signer.issue(user_id).unwrap();
    assert_eq!(signer.verify(&token).unwrap(), user_id);
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let signer = TokenSigner::new("test-secret");
    let other = TokenSigner::new("other-secret");
    let token = other.issue(Uuid::new_v4()).unwrap();
    let err = signer.verify(&token).unwrap_err();
    assert!(matches!(err, AppError::Unauthorized(_)));
}

#[test]
fn garbage_token_is_rejected() {
    let signer = TokenSigner::new("test-secret");
    assert!(matches!(
        signer.verify("not-a-token").unwrap_err(),
        AppError::Unauthorized(_)
    ));
}

#[test]
fn tampered_token_is_rejected() {
    let signer = TokenSigner::new("test-secret");
    let mut token = signer.issue(Uuid::new_v4()).unwrap();
    token.push('x');
    assert!(matches!(
        signer.verify(&token).unwrap_err(),
        AppError::Unauthorized(_)
    ));
}

#[test]
fn owner_role_check_rejects_plain_users() {
    let owner = test_user(UserRole::Owner);
    let renter = test_user(UserRole::User);
    assert!(authorize(&owner, Access::OwnerRole).is_ok());
    assert!(matches!(
        authorize(&renter, Access::OwnerRole).unwrap_err(),
        AppError::Forbidden(_)
    ));
}

#[test]
fn ownership_check_matches_only_the_snapshotted_owner() {
    let owner = test_user(UserRole::Owner);
    let renter = test_user(UserRole::User);
    let third = test_user(UserRole::Owner);

    assert!(authorize(&owner, Access::OwnerOf(Some(owner.id))).is_ok());
    // Neither the renter nor an unrelated owner may act on the resource.
    assert!(matches!(
        authorize(&renter, Access::OwnerOf(Some(owner.id))).unwrap_err(),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        authorize(&third, Access::OwnerOf(Some(owner.id))).unwrap_err(),
        AppError::Forbidden(_)
    ));
}

#[test]
fn empty_owner_slot_never_matches() {
    let owner = test_user(UserRole::Owner);
    assert!(matches!(
        authorize(&owner, Access::OwnerOf(None)).unwrap_err(),
        AppError::Forbidden(_)
    ));
}

#[test]
fn password_hash_round_trips() {
    // Low cost keeps the test fast; production uses bcrypt::DEFAULT_COST.
    let hash = bcrypt::hash("correct horse battery", 4).unwrap();
    assert!(bcrypt::verify("correct horse battery", &hash).unwrap());
    assert!(!bcrypt::verify("wrong password", &hash).unwrap());
}
