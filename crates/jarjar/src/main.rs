use anyhow::Context;
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use std::path::PathBuf;
use tokio::runtime::Runtime;

use jarjar::cli::{Cli, Commands, Target};
use jarjar::config::Config;
use jarjar::logging::setup_logging;
use jarjar::runner::run_command;
use jarjar::{Delivery, Jarjar, MessageRequest};

fn main() -> anyhow::Result<()> {
    let Cli {
        verbose,
        config,
        profile,
        command,
    } = Cli::parse();
    setup_logging(verbose);

    let rt = Runtime::new()?;
    rt.block_on(async {
        match command {
            Commands::Send {
                target,
                attach,
                method,
            } => {
                let jj = load_jarjar(config, profile.as_deref())?;
                let attach = attach
                    .map(|raw| serde_json::from_str::<Value>(&raw))
                    .transpose()
                    .context("Parsing --attach as JSON")?;
                let request = MessageRequest::from_values(
                    target.message.map(Value::String),
                    attach,
                    target.channel,
                    target.webhook,
                )?;

                let delivery = jj.send(method, request).await?;
                report_delivery(&delivery);
            }
            Commands::Run { target, command } => {
                let jj = load_jarjar(config, profile.as_deref())?;
                let (program, args) = command
                    .split_first()
                    .context("No command given to run")?;

                let report = run_command(program, args).await?;
                let Target {
                    message,
                    channel,
                    webhook,
                } = target;
                let message = message
                    .or_else(|| jj.default_message().map(str::to_owned))
                    .unwrap_or_else(|| report.summary());
                let request = MessageRequest {
                    message: Some(message),
                    attach: Some(report.attachment()),
                    channel,
                    webhook,
                };

                let delivery = jj.attach(request).await?;
                report_delivery(&delivery);

                // Mirror the wrapped command's exit code
                if !report.succeeded() {
                    std::process::exit(report.exit_code.unwrap_or(1));
                }
            }
            Commands::Version { json } => {
                if json {
                    let info = serde_json::json!({
                        "version": env!("CARGO_PKG_VERSION"),
                        "commit": option_env!("GIT_SHA").unwrap_or("unknown"),
                        "build_date": option_env!("BUILD_DATE").unwrap_or("unknown"),
                    });
                    println!("{}", serde_json::to_string_pretty(&info)?);
                } else {
                    println!(
                        "jarjar {} (commit: {}, built: {})",
                        env!("CARGO_PKG_VERSION"),
                        option_env!("GIT_SHA").unwrap_or("unknown"),
                        option_env!("BUILD_DATE").unwrap_or("unknown"),
                    );
                }
            }
        }
        Ok(())
    })
}

fn load_jarjar(path: Option<PathBuf>, profile: Option<&str>) -> anyhow::Result<Jarjar> {
    let config = Config::load(path)?;
    let defaults = config.defaults(profile)?;
    Ok(Jarjar::new(defaults))
}

fn report_delivery(delivery: &Delivery) {
    let channel = delivery
        .payload
        .channel
        .as_deref()
        .unwrap_or("the webhook's default channel");
    println!(
        "{} delivered to {} (HTTP {})",
        "✔".green(),
        channel.bold(),
        delivery.status.as_u16()
    );
}
