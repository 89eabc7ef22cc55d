#![allow(dead_code)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use serde_json::{json, Value};

use blogs_api::config::AppConfig;
use blogs_api::database::MemoryBlogStore;
use blogs_api::middleware::AdminCredentials;
use blogs_api::{app, AppState};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "qwerty";

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Serve the real router over a fresh in-memory store on an unused port
    pub async fn spawn() -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::development();
        config.api.enable_request_logging = false;
        config.api.enable_testing_routes = true;
        config.security.admin_username = ADMIN_USERNAME.to_string();
        config.security.admin_password = ADMIN_PASSWORD.to_string();

        let router = app(AppState::new(Arc::new(MemoryBlogStore::new())), &config);
        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
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

    /// POST /blogs with admin credentials, asserting 201
    pub async fn create_blog(&self, name: &str, description: &str, website_url: &str) -> Result<Value> {
        let res = self
            .client
            .post(self.url("/blogs"))
            .header(reqwest::header::AUTHORIZATION, admin_auth())
            .json(&blog_input(name, description, website_url))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create failed with {}", res.status());
        Ok(res.json().await?)
    }

    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).send().await?;
        let status = res.status();
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }
}

pub fn admin_auth() -> String {
    AdminCredentials::new(ADMIN_USERNAME, ADMIN_PASSWORD).header_value()
}

pub fn blog_input(name: &str, description: &str, website_url: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "websiteUrl": website_url,
    })
}
