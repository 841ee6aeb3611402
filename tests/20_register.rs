mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

use common::{TestServer, PASSWORD};

#[tokio::test]
async fn register_creates_inactive_account_and_sends_link() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.register("jane@example.com", PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["email"], "jane@example.com");
    assert_eq!(body["data"]["is_active"], false);
    assert!(body["data"].get("password_hash").is_none());
    assert!(body["data"].get("token").is_none());

    let account = server.account("jane@example.com").await.expect("account stored");
    assert!(!account.is_active);
    assert_ne!(account.password_hash, PASSWORD);
    assert!(account.token >= 1);

    let sent = server.mailer.sent().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, vec!["jane@example.com".to_string()]);
    assert_eq!(sent[0].subject, "Verify your email");

    let link = server.verification_link("jane@example.com").await?;
    assert_eq!(link, server.url(&format!("/users/verify/{}", account.token)));
    Ok(())
}

#[tokio::test]
async fn register_rejects_mismatched_passwords() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = common::client()
        .post(server.url("/users/register"))
        .json(&json!({
            "email": "jane@example.com",
            "password1": PASSWORD,
            "password2": "something-else-entirely"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["password2"].is_string());

    assert!(server.store.accounts().await.is_empty());
    assert!(server.mailer.sent().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn register_rejects_weak_password_and_bad_email() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.register("not-an-email", "1234").await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert!(body["field_errors"]["email"].is_string());
    assert!(body["field_errors"]["password1"].is_string());
    assert!(server.store.accounts().await.is_empty());
    Ok(())
}

#[tokio::test]
async fn register_rejects_duplicate_email() -> Result<()> {
    let server = TestServer::spawn().await?;

    let res = server.register("jane@example.com", PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::CREATED);

    // Domain part is case-insensitive
    let res = server.register("jane@EXAMPLE.com", PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let body: Value = res.json().await?;
    assert!(body["field_errors"]["email"].is_string());
    assert_eq!(server.store.accounts().await.len(), 1);
    assert_eq!(server.mailer.sent().await.len(), 1);
    Ok(())
}

#[tokio::test]
async fn register_mail_failure_keeps_account() -> Result<()> {
    let server = TestServer::spawn().await?;
    server.mailer.set_failing(true);

    let res = server.register("jane@example.com", PASSWORD).await?;
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let account = server.account("jane@example.com").await.expect("account stored");
    assert!(!account.is_active);
    Ok(())
}

#[tokio::test]
async fn registered_accounts_get_distinct_tokens() -> Result<()> {
    let server = TestServer::spawn().await?;

    for i in 0..5 {
        let res = server.register(&format!("user{}@example.com", i), PASSWORD).await?;
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let mut tokens: Vec<i32> = server.store.accounts().await.iter().map(|a| a.token).collect();
    tokens.sort_unstable();
    tokens.dedup();
    assert_eq!(tokens.len(), 5);
    Ok(())
}
