// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use clap::Parser;
use tracing::error;

use a2ahub::config::{Cli, LogConfig, Service};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Service::Registry(ref config) = cli.service {
        if let Err(e) = config.validate() {
            eprintln!("error: {e}");
            std::process::exit(2);
        }
    }

    init_tracing(&cli.log);

    let result = match cli.service {
        Service::Broker(config) => a2ahub::run_broker(config).await,
        Service::Registry(config) => a2ahub::run_registry(config).await,
    };
    if let Err(e) = result {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

fn init_tracing(config: &LogConfig) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    match config.log_format.as_str() {
        "json" => {
            fmt::fmt().with_env_filter(filter).json().init();
        }
        _ => {
            fmt::fmt().with_env_filter(filter).init();
        }
    }
}
