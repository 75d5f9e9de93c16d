//! Account lifecycle against a real database.

mod common;

use common::TestContext;
use service_catalog::errors::AppError;
use service_catalog::services::AccountService;

#[tokio::test]
async fn test_signup_issues_token_for_new_user() {
    let ctx = TestContext::new().await;

    let signed_up = ctx
        .accounts
        .signup("jd@gmail.com".into(), "johndoe123".into())
        .await
        .unwrap();

    assert_eq!(signed_up.user.email, "jd@gmail.com");
    assert_eq!(ctx.tokens.verify(&signed_up.access_token).unwrap(), signed_up.user.id);
}

#[tokio::test]
async fn test_password_is_stored_hashed() {
    let ctx = TestContext::new().await;
    ctx.user("jd@gmail.com").await;

    let user = ctx.accounts.get_by_email("jd@gmail.com").await.unwrap();
    assert_ne!(user.password_hash, "johndoe123");
    assert!(user.password_hash.starts_with("$argon2id$"));
}

#[tokio::test]
async fn test_duplicate_email_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.user("jd@gmail.com").await;

    let err = ctx
        .accounts
        .signup("jd@gmail.com".into(), "otherpass1".into())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EmailExists));
}

#[tokio::test]
async fn test_concurrent_signups_create_one_user() {
    let ctx = TestContext::new().await;

    let (a, b) = tokio::join!(
        ctx.accounts.create_user("race@gmail.com".into(), "johndoe123".into()),
        ctx.accounts.create_user("race@gmail.com".into(), "johndoe123".into()),
    );

    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
    let failure = a.err().or(b.err()).unwrap();
    assert!(matches!(failure, AppError::EmailExists));
}

#[tokio::test]
async fn test_login_with_correct_password() {
    let ctx = TestContext::new().await;
    let id = ctx.user("jd@gmail.com").await;

    let token = ctx
        .accounts
        .login("jd@gmail.com".into(), "johndoe123".into())
        .await
        .unwrap();
    assert_eq!(ctx.tokens.verify(&token).unwrap(), id);
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = TestContext::new().await;
    ctx.user("jd@gmail.com").await;

    let wrong_password = ctx
        .accounts
        .login("jd@gmail.com".into(), "wrongpass".into())
        .await
        .unwrap_err();
    let unknown_email = ctx
        .accounts
        .login("nobody@gmail.com".into(), "johndoe123".into())
        .await
        .unwrap_err();

    assert!(matches!(wrong_password, AppError::InvalidCredentials));
    assert!(matches!(unknown_email, AppError::InvalidCredentials));
}

#[tokio::test]
async fn test_get_by_id_returns_profile() {
    let ctx = TestContext::new().await;
    let id = ctx.user("jd@gmail.com").await;

    let profile = ctx.accounts.get_by_id(id).await.unwrap();
    assert_eq!(profile.email, "jd@gmail.com");

    let missing = ctx.accounts.get_by_id(uuid::Uuid::new_v4()).await;
    assert!(matches!(missing, Err(AppError::NotFound)));
}

#[tokio::test]
async fn test_update_email() {
    let ctx = TestContext::new().await;
    let id = ctx.user("jd@gmail.com").await;

    ctx.accounts
        .update_email("john@gmail.com".into(), id)
        .await
        .unwrap();

    assert_eq!(ctx.accounts.get_by_id(id).await.unwrap().email, "john@gmail.com");
    assert!(ctx
        .accounts
        .login("john@gmail.com".into(), "johndoe123".into())
        .await
        .is_ok());
}

#[tokio::test]
async fn test_update_email_to_taken_address() {
    let ctx = TestContext::new().await;
    let id = ctx.user("jd@gmail.com").await;
    ctx.user("taken@gmail.com").await;

    let taken = ctx.accounts.update_email("taken@gmail.com".into(), id).await;
    assert!(matches!(taken, Err(AppError::EmailExists)));

    // The caller's own address counts as taken too
    let own = ctx.accounts.update_email("jd@gmail.com".into(), id).await;
    assert!(matches!(own, Err(AppError::EmailExists)));
}

#[tokio::test]
async fn test_update_email_for_unknown_user() {
    let ctx = TestContext::new().await;

    let result = ctx
        .accounts
        .update_email("new@gmail.com".into(), uuid::Uuid::new_v4())
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}
