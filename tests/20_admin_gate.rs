mod common;

use anyhow::Result;
use inventory_api::auth::Role;
use reqwest::StatusCode;
use serde_json::Value;

async fn list_users_with(token: Option<&str>) -> Result<(StatusCode, Value)> {
    let server = common::ensure_server().await?;
    let mut req = reqwest::Client::new().get(server.url("/api/v1/admin/users"));
    if let Some(token) = token {
        req = req.bearer_auth(token);
    }
    let res = req.send().await?;
    let status = res.status();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn missing_token_is_401() -> Result<()> {
    let (status, body) = list_users_with(None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], true);
    assert_eq!(body["code"], "UNAUTHORIZED");
    Ok(())
}

#[tokio::test]
async fn garbage_token_is_401() -> Result<()> {
    let (status, _) = list_users_with(Some("not.a.jwt")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn plain_user_is_403() -> Result<()> {
    let server = common::ensure_server().await?;
    let user = common::register(server, "plain").await?;

    let (status, body) = list_users_with(Some(&user.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn superuser_without_base_role_is_403() -> Result<()> {
    let server = common::ensure_server().await?;
    let admin = common::admin_token(server).await?;
    let user = common::register(server, "roleless").await?;

    // Promote, then present a token that lacks the `user` role.
    let res = reqwest::Client::new()
        .put(server.url(&format!("/api/v1/admin/users/{}/superuser", user.id)))
        .bearer_auth(&admin)
        .json(&serde_json::json!({ "is_superuser": true }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let token = common::mint_token(&user.id, &user.group_id, vec![Role::Attachments])?;
    let (status, _) = list_users_with(Some(&token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let token = common::mint_token(&user.id, &user.group_id, vec![Role::User])?;
    let (status, _) = list_users_with(Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn superuser_is_allowed() -> Result<()> {
    let server = common::ensure_server().await?;
    let token = common::admin_token(server).await?;

    let (status, body) = list_users_with(Some(&token)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    let count = body["data"]["count"].as_u64().unwrap_or_default();
    assert_eq!(count as usize, body["data"]["results"].as_array().map_or(0, Vec::len));
    Ok(())
}

#[tokio::test]
async fn demotion_applies_to_the_next_request() -> Result<()> {
    let server = common::ensure_server().await?;
    let admin = common::admin_token(server).await?;
    let user = common::register(server, "demoted").await?;
    let client = reqwest::Client::new();
    let flag_url = server.url(&format!("/api/v1/admin/users/{}/superuser", user.id));

    client
        .put(&flag_url)
        .bearer_auth(&admin)
        .json(&serde_json::json!({ "is_superuser": true }))
        .send()
        .await?
        .error_for_status()?;
    let (status, _) = list_users_with(Some(&user.token)).await?;
    assert_eq!(status, StatusCode::OK);

    client
        .put(&flag_url)
        .bearer_auth(&admin)
        .json(&serde_json::json!({ "is_superuser": false }))
        .send()
        .await?
        .error_for_status()?;

    // Same token as before; only the stored flag changed.
    let (status, _) = list_users_with(Some(&user.token)).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    Ok(())
}
