mod common;

use anyhow::Result;
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn registered_user_is_owner_but_not_superuser() -> Result<()> {
    let server = common::ensure_server().await?;
    let user = common::register(server, "owner").await?;

    let body: Value = Client::new()
        .get(server.url("/api/v1/users/self"))
        .bearer_auth(&user.token)
        .send()
        .await?
        .json()
        .await?;

    assert_eq!(body["data"]["email"], user.email.as_str());
    assert_eq!(body["data"]["is_owner"], true);
    assert_eq!(body["data"]["is_superuser"], false);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_email_are_both_401() -> Result<()> {
    let server = common::ensure_server().await?;
    let user = common::register(server, "login").await?;
    let client = Client::new();

    let wrong: Value = {
        let res = client
            .post(server.url("/api/v1/users/login"))
            .json(&json!({ "email": user.email, "password": "wrong" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        res.json().await?
    };
    let unknown: Value = {
        let res = client
            .post(server.url("/api/v1/users/login"))
            .json(&json!({ "email": common::unique_email("ghost"), "password": "hunter2" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        res.json().await?
    };

    assert_eq!(wrong["message"], unknown["message"]);
    Ok(())
}

#[tokio::test]
async fn self_delete_removes_account() -> Result<()> {
    let server = common::ensure_server().await?;
    let user = common::register(server, "leaver").await?;
    let client = Client::new();

    let res = client
        .delete(server.url("/api/v1/users/self"))
        .bearer_auth(&user.token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client
        .post(server.url("/api/v1/users/login"))
        .json(&json!({ "email": user.email, "password": "hunter2" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn malformed_body_is_400() -> Result<()> {
    let server = common::ensure_server().await?;
    let res = Client::new()
        .post(server.url("/api/v1/users/register"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await?;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn health_reports_ok() -> Result<()> {
    let server = common::ensure_server().await?;
    let body: Value = Client::new().get(server.url("/health")).send().await?.json().await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    Ok(())
}
