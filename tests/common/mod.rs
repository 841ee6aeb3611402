#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{redirect, Client, StatusCode};
use serde_json::{json, Value};

use users_api::config::{AppConfig, MailBackend};
use users_api::database::{Account, MemoryAccountStore};
use users_api::mail::MemoryMailer;
use users_api::{app, AppState};

pub const PASSWORD: &str = "correct-horse-battery";

/// In-process server with handles on its store and outbox
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub store: MemoryAccountStore,
    pub mailer: MemoryMailer,
}

impl TestServer {
    /// Every test gets its own server so account state never leaks between tests
    pub async fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.server.port = port;
        config.server.public_url = base_url.clone();
        config.mail.backend = MailBackend::Memory;

        let store = MemoryAccountStore::new();
        let mailer = MemoryMailer::new();
        let state = AppState::new(
            Arc::new(store.clone()),
            Arc::new(mailer.clone()),
            Arc::new(config),
        );

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app(state)).await;
        });

        let server = Self { port, base_url, store, mailer };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = Client::new();
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn account(&self, email: &str) -> Option<Account> {
        self.store.accounts().await.into_iter().find(|a| a.email == email)
    }

    /// POST /users/register with matching passwords
    pub async fn register(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(client()
            .post(self.url("/users/register"))
            .json(&json!({ "email": email, "password1": password, "password2": password }))
            .send()
            .await?)
    }

    /// Verification link from the most recent mail sent to `email`
    pub async fn verification_link(&self, email: &str) -> Result<String> {
        let mail = self.mailer.last_to(email).await.context("no mail sent")?;
        mail.body
            .lines()
            .find(|line| line.starts_with("http"))
            .map(str::to_string)
            .context("mail has no link")
    }

    /// Register, follow the emailed link and log in; returns the bearer token
    pub async fn verified_account(&self, email: &str) -> Result<String> {
        let res = self.register(email, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());

        let link = self.verification_link(email).await?;
        let res = client().get(link).send().await?;
        anyhow::ensure!(res.status() == StatusCode::SEE_OTHER, "verify failed: {}", res.status());

        let res = self.login(email, PASSWORD).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no token")
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<reqwest::Response> {
        Ok(client()
            .post(self.url("/users/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?)
    }
}

/// Client that reports redirects instead of following them
pub fn client() -> Client {
    Client::builder()
        .redirect(redirect::Policy::none())
        .build()
        .expect("failed to build http client")
}

pub fn location(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
