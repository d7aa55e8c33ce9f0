// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;

/// Agent message broker and context registry.
#[derive(Debug, Parser)]
#[command(name = "a2ahub", version)]
pub struct Cli {
    #[command(flatten)]
    pub log: LogConfig,

    #[command(subcommand)]
    pub service: Service,
}

/// Which service this process runs.
#[derive(Debug, Clone, clap::Subcommand)]
pub enum Service {
    /// Per-agent mailbox queues with send/poll semantics.
    Broker(BrokerConfig),
    /// Content store that hands out pointers instead of raw data.
    Registry(RegistryConfig),
}

/// Logging flags shared by both services.
#[derive(Debug, Clone, clap::Args)]
pub struct LogConfig {
    /// Log format (json or text).
    #[arg(long, global = true, env = "A2A_LOG_FORMAT", default_value = "text")]
    pub log_format: String,

    /// Log level (trace, debug, info, warn, error) or an EnvFilter directive.
    #[arg(long, global = true, env = "A2A_LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

/// Configuration for the message broker.
#[derive(Debug, Clone, clap::Args)]
pub struct BrokerConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "A2A_BROKER_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 7003, env = "A2A_BROKER_PORT")]
    pub port: u16,

    /// Bearer token for broker routes. If unset, the broker is open.
    #[arg(long, env = "A2A_BROKER_TOKEN")]
    pub auth_token: Option<String>,
}

impl BrokerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration for the context registry.
#[derive(Debug, Clone, clap::Args)]
pub struct RegistryConfig {
    /// Host to bind on.
    #[arg(long, default_value = "127.0.0.1", env = "A2A_REGISTRY_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(long, default_value_t = 7000, env = "A2A_REGISTRY_PORT")]
    pub port: u16,

    /// Shared credential every registry request must present as a Bearer token.
    #[arg(long, env = "MCP_REGISTRY_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Scheme of issued pointers (`<scheme>://<kind>/<id>`).
    #[arg(long, default_value = "ctx", env = "A2A_POINTER_SCHEME")]
    pub pointer_scheme: String,

    /// Kind segment of issued pointers.
    #[arg(long, default_value = "note", env = "A2A_POINTER_KIND")]
    pub pointer_kind: String,
}

impl RegistryConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.token.trim().is_empty() {
            anyhow::bail!("--token must not be empty");
        }
        for (flag, value) in
            [("--pointer-scheme", &self.pointer_scheme), ("--pointer-kind", &self.pointer_kind)]
        {
            if value.is_empty() || value.contains(['/', ':']) {
                anyhow::bail!("{flag} must be non-empty and contain no '/' or ':'");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
