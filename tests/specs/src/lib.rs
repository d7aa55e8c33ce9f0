// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Test harness for end-to-end binary smoke tests.
//!
//! Spawns the real `a2ahub` binary as a subprocess (one per service) and
//! exercises it over HTTP.

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::Duration;

pub use a2ahub::client::ensure_crypto;

/// Resolve the path to the compiled `a2ahub` binary.
pub fn hub_binary() -> PathBuf {
    let manifest = Path::new(env!("CARGO_MANIFEST_DIR"));
    // tests/specs → tests → workspace root
    let workspace = manifest.parent().and_then(|p| p.parent()).unwrap_or(manifest);
    workspace.join("target").join("debug").join("a2ahub")
}

/// Find a free TCP port by binding to :0 then releasing.
pub fn free_port() -> anyhow::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}

/// A running service process that is killed on drop.
pub struct HubProcess {
    child: Child,
    port: u16,
}

impl HubProcess {
    /// Spawn `a2ahub broker`, optionally with a bearer token.
    pub fn broker(auth_token: Option<&str>) -> anyhow::Result<Self> {
        let mut extra = Vec::new();
        if let Some(token) = auth_token {
            extra.extend(["--auth-token".to_owned(), token.to_owned()]);
        }
        Self::spawn("broker", &extra)
    }

    /// Spawn `a2ahub registry` with the given shared credential.
    pub fn registry(token: &str) -> anyhow::Result<Self> {
        Self::spawn("registry", &["--token".to_owned(), token.to_owned()])
    }

    /// Spawn an arbitrary subcommand with extra args on a free port.
    pub fn spawn(service: &str, extra: &[String]) -> anyhow::Result<Self> {
        ensure_crypto();
        let binary = hub_binary();
        anyhow::ensure!(binary.exists(), "a2ahub binary not found at {}", binary.display());

        let port = free_port()?;
        let mut args: Vec<String> =
            vec!["--log-format".into(), "text".into(), "--log-level".into(), "warn".into()];
        args.push(service.to_owned());
        args.extend(["--host".into(), "127.0.0.1".into(), "--port".into(), port.to_string()]);
        args.extend(extra.iter().cloned());

        let child = Command::new(&binary)
            .args(&args)
            .env_remove("MCP_REGISTRY_TOKEN")
            .env_remove("A2A_BROKER_TOKEN")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        Ok(Self { child, port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Base URL for HTTP requests.
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Poll `/health` until responsive.
    pub async fn wait_healthy(&self, timeout: Duration) -> anyhow::Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        let client = reqwest::Client::new();
        let url = format!("{}/health", self.base_url());
        loop {
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("a2ahub did not become healthy within {timeout:?}");
            }
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }

    /// Wait for the process to exit within `timeout`.
    pub async fn wait_exit(
        &mut self,
        timeout: Duration,
    ) -> anyhow::Result<std::process::ExitStatus> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if tokio::time::Instant::now() > deadline {
                anyhow::bail!("a2ahub did not exit within {timeout:?}");
            }
            if let Some(status) = self.child.try_wait()? {
                return Ok(status);
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    }
}

impl Drop for HubProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}
