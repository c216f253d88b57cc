use anyhow::{bail, Result};
use clap::Parser;
use colored::Colorize;

use spr_status::app::App;
use spr_status::cli::{Cli, Commands};
use spr_status::core::{fetch_snapshot, StatusApi, StatusClient, StderrAlertSink};
use spr_status::utils::{
    logs_route, nice_key, truncate_string, AppConfig, ContainerState, LOAD_KEYS, UPTIME_KEYS,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load().unwrap_or_default();
    let env_url = std::env::var("SPR_API_URL").ok();
    let api_url = config.resolve_api_url(cli.url.as_deref(), env_url.as_deref());

    match cli.command {
        None => {
            // No command - run interactive TUI
            let mut app = App::new(&api_url)?;
            app.run().await?;
        }
        Some(Commands::Status) => {
            handle_status(&api_url).await?;
        }
        Some(Commands::Mounts { container }) => {
            handle_mounts(&api_url, &container).await?;
        }
        Some(Commands::Logs { container }) => {
            handle_logs(&api_url, &container).await?;
        }
    }

    Ok(())
}

async fn handle_status(api_url: &str) -> Result<()> {
    let client = StatusClient::new(api_url)?;
    let snapshot = fetch_snapshot(&client, &StderrAlertSink).await;

    println!("SPR Status ({})\n", api_url);

    if let Some(hostname) = snapshot.hostname {
        println!("{:<12} {}", "Hostname", hostname);
    }
    if let Some(version) = snapshot.version {
        println!("{:<12} {}", "Version", version);
    }

    if let Some(uptime) = snapshot.uptime {
        println!();
        for key in UPTIME_KEYS.iter().chain(LOAD_KEYS.iter()) {
            println!("{:<12} {}", nice_key(key), uptime.get(key));
        }
    }

    if let Some(containers) = snapshot.containers {
        println!("\n{:<25} {:<40} {:<10} {}", "Container", "Image", "State", "Status");
        println!("{}", "-".repeat(95));

        for container in containers {
            let state = match container.lifecycle() {
                ContainerState::Running => container.state.green(),
                ContainerState::Exited => container.state.yellow(),
                ContainerState::Unknown => container.state.dimmed(),
            };
            println!(
                "{:<25} {:<40} {:<10} {}",
                container.display_name(),
                truncate_string(&container.image, 38),
                state,
                container.status
            );
        }
    }

    Ok(())
}

async fn handle_mounts(api_url: &str, name: &str) -> Result<()> {
    let client = StatusClient::new(api_url)?;
    let containers = client.containers().await?;

    let container = match containers.iter().find(|c| c.display_name() == name) {
        Some(container) => container,
        None => bail!("container {} not found", name),
    };

    println!("{} Volume Mounts\n", container.display_name());

    if container.mounts.is_empty() {
        println!("(no mounts)");
        return Ok(());
    }

    println!("{:<40} {:<40} {}", "Source", "Destination", "Mode");
    println!("{}", "-".repeat(88));
    for mount in &container.mounts {
        println!("{:<40} {:<40} {}", mount.source, mount.destination, mount.mode);
    }

    Ok(())
}

async fn handle_logs(api_url: &str, name: &str) -> Result<()> {
    let client = StatusClient::new(api_url)?;
    let containers = client.containers().await?;

    let container = match containers.iter().find(|c| c.display_name() == name) {
        Some(container) => container,
        None => bail!("container {} not found", name),
    };

    println!("{}", logs_route(&container.display_name()));

    Ok(())
}
