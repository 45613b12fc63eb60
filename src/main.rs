#![cfg_attr(not(test), deny(clippy::panic))]

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tollgate::auth::TokenGate;
use tollgate::config::{self, Config};
use tollgate::report::{self, Cause, CliError};
use tollgate::{client, logging, server, token_file, verify};

/// Tollgate -- infra token gate and token checking CLI
#[derive(Parser, Debug)]
#[command(name = "tollgate")]
#[command(about = "Guards infra endpoints behind expiring bearer tokens")]
#[command(version)]
struct Cli {
    /// Configuration file, merged below TOLLGATE_CONFIG_JSON and stdin.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Validate configuration and exit.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the gated HTTP endpoints.
    Serve {
        /// Listen port, overriding `port` from configuration.
        #[arg(long, short)]
        port: Option<u16>,
    },
    /// Check a token against the locally configured tokens.
    Verify {
        #[arg(env = "TOLLGATE_TOKEN")]
        token: String,
        /// Token file, replacing `security.tokens_file`.
        #[arg(long, value_name = "FILE")]
        tokens: Option<PathBuf>,
        /// Write the verdict as JSON to this file.
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
    /// Check a token against a running tollgate instance.
    Check {
        #[arg(env = "TOLLGATE_TOKEN")]
        token: String,
        /// Base URL of the instance, overriding `client.server_url`.
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let reported = match run().await {
        Ok(()) => None,
        Err(err) => report::report(&err),
    };
    report::exit_code(reported.as_deref())
}

async fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                let _ = err.print();
            }
            return Err(err.into());
        }
    };

    let cfg = config::load_from(cli.config.as_deref());

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg).map_err(CliError::unknown)?;
        println!("{json}");
        return Ok(());
    }

    logging::init_with_config(&cfg.logging, fallback_log_level(&cli));

    if cli.validate_config {
        config::validate_config(&cfg).map_err(CliError::unknown)?;
        println!("Configuration validation passed");
        println!();
        println!("Configuration summary:");
        println!("  Port: {}", cfg.port);
        println!("  Inline tokens: {}", cfg.security.tokens.len());
        println!(
            "  Tokens file: {}",
            cfg.security.tokens_file.as_deref().unwrap_or("none")
        );
        println!("  CORS origins: {}", cfg.security.cors_origins);
        return Ok(());
    }

    let Some(command) = cli.command else {
        return Err(CliError::InvalidArgument(Cause::from(
            "no command given; run `tollgate --help` for usage",
        )));
    };

    match command {
        Command::Serve { port } => serve(&cfg, port).await,
        Command::Verify {
            token,
            tokens,
            output,
        } => {
            let store = token_file::load_store(&cfg.security, tokens.as_deref())?;
            let gate = TokenGate::new(Arc::new(store));
            let verdict = verify::verify_token(&gate, &token, output.as_deref()).await?;
            print_json(&verdict)
        }
        Command::Check { token, server } => {
            let server_url = server
                .or_else(|| cfg.client.server_url.clone())
                .unwrap_or_else(|| format!("http://127.0.0.1:{}", cfg.port));
            let status = client::check_remote(
                &server_url,
                &token,
                Duration::from_secs(cfg.client.timeout_secs),
            )
            .await?;
            print_json(&status)
        }
    }
}

/// Log level used when neither config nor `RUST_LOG` sets one. One-shot
/// commands stay quiet so their diagnostic line is the only stderr output.
fn fallback_log_level(cli: &Cli) -> &'static str {
    if cli.validate_config {
        return "warn";
    }
    match cli.command {
        Some(Command::Serve { .. }) => "info",
        Some(Command::Verify { .. } | Command::Check { .. }) | None => "error",
    }
}

async fn serve(cfg: &Config, port: Option<u16>) -> Result<(), CliError> {
    config::validate_config(cfg).map_err(CliError::unknown)?;

    let store = token_file::load_store(&cfg.security, None)?;
    if store.is_empty() {
        tracing::warn!("No infra tokens configured; every gated request will be denied");
    }
    let gate = Arc::new(TokenGate::new(Arc::new(store)));
    let router = server::build_router(gate, &cfg.security.cors_origins);

    server::serve(router, port.unwrap_or(cfg.port))
        .await
        .map_err(CliError::unknown)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value).map_err(CliError::unknown)?;
    println!("{json}");
    Ok(())
}
