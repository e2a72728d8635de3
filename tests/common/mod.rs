#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use inventory_api::auth::{generate_jwt, Claims, Role, SecretString};
use inventory_api::config::{AppConfig, SecurityConfig};
use inventory_api::server;

pub const JWT_SECRET: &str = "integration-test-secret";
pub const ADMIN_EMAIL: &str = "root@x.test";
pub const ADMIN_PASSWORD: &str = "s3cret!";

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
}

impl TestServer {
    /// Runs the full startup path on a background thread with its own runtime.
    /// The thread ends with the test process, so no server is left behind.
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let port_value = port.to_string();
        let vars: HashMap<&str, &str> = HashMap::from([
            ("APP_ENV", "development"),
            ("PORT", port_value.as_str()),
            ("STORE_BACKEND", "memory"),
            ("JWT_SECRET", JWT_SECRET),
            ("SECURITY_ALLOW_REGISTRATION", "true"),
            ("PASSWORD_HASH_MEMORY_KIB", "1024"),
            ("PASSWORD_HASH_ITERATIONS", "1"),
            ("PASSWORD_HASH_PARALLELISM", "1"),
            ("ADMIN_CREATE", "true"),
            ("ADMIN_NAME", "Root"),
            ("ADMIN_EMAIL", ADMIN_EMAIL),
            ("ADMIN_PASSWORD", ADMIN_PASSWORD),
        ]);
        let config = AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))?;

        std::thread::Builder::new()
            .name("inventory-api-test-server".to_string())
            .spawn(move || {
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .expect("failed to build server runtime");
                if let Err(e) = runtime.block_on(server::run(config, "127.0.0.1")) {
                    eprintln!("test server exited: {e:#}");
                }
            })
            .context("failed to start server thread")?;

        Ok(Self { port, base_url })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to start test server"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// Email that no other test in the run will use
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@x.test", prefix, Uuid::new_v4().simple())
}

pub async fn login(server: &TestServer, email: &str, password: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(server.url("/api/v1/users/login"))
        .json(&json!({ "email": email, "password": password }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::OK, "login failed with {}", res.status());

    let body: Value = res.json().await?;
    body["data"]["token"]
        .as_str()
        .map(str::to_owned)
        .context("login response has no token")
}

pub async fn admin_token(server: &TestServer) -> Result<String> {
    login(server, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

pub struct Registered {
    pub id: String,
    pub group_id: String,
    pub email: String,
    pub token: String,
}

/// Self-register a fresh, non-superuser account and log it in
pub async fn register(server: &TestServer, prefix: &str) -> Result<Registered> {
    let email = unique_email(prefix);
    let res = reqwest::Client::new()
        .post(server.url("/api/v1/users/register"))
        .json(&json!({ "name": prefix, "email": email, "password": "hunter2" }))
        .send()
        .await?;
    anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed with {}", res.status());

    let body: Value = res.json().await?;
    let id = body["data"]["id"].as_str().context("no id")?.to_string();
    let group_id = body["data"]["group_id"].as_str().context("no group_id")?.to_string();
    let token = login(server, &email, "hunter2").await?;

    Ok(Registered { id, group_id, email, token })
}

/// Token signed with the server's secret but carrying arbitrary roles
pub fn mint_token(user_id: &str, group_id: &str, roles: Vec<Role>) -> Result<String> {
    let security = SecurityConfig {
        jwt_secret: SecretString::new(JWT_SECRET),
        jwt_expiry_hours: 1,
        allow_registration: true,
        demo: false,
    };
    let claims = Claims::new(Uuid::parse_str(user_id)?, Uuid::parse_str(group_id)?, roles, 1)?;
    Ok(generate_jwt(&claims, &security)?)
}
