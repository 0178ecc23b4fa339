mod client;

use anyhow::Result;
use clap::{Parser, Subcommand};
use client::DaemonClient;
use shared::ipc::{Command, Response, SettingsUpdate};

#[derive(Parser)]
#[command(name = "wavectl")]
#[command(about = "CLI tool for the wavectl gesture control daemon")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the frame-processing loop
    Start,
    /// Stop the frame-processing loop
    Stop,
    /// Show daemon status
    Status,
    /// Select which hand is tracked: left, right, or both
    SetHand { hand: String },
    /// Change a debounce interval: toggle, pinch, or seek
    SetCooldown { name: String, seconds: f64 },
    /// Rebind an action (e.g. "Play/Pause") to a gesture (e.g. "Open palm")
    MapGesture { action: String, gesture: String },
}

fn build_command(cli: Commands) -> Result<Command> {
    let command = match cli {
        Commands::Start => Command::Start,
        Commands::Stop => Command::Stop,
        Commands::Status => Command::Status,
        Commands::SetHand { hand } => {
            let preference = match hand.to_lowercase().as_str() {
                "left" => "Left",
                "right" => "Right",
                "both" => "Both / No Preference",
                other => anyhow::bail!("Unknown hand {:?}, expected left, right, or both", other),
            };
            Command::UpdateConfig(SettingsUpdate {
                hand_preference: Some(preference.to_string()),
                ..Default::default()
            })
        }
        Commands::SetCooldown { name, seconds } => {
            if !matches!(name.as_str(), "toggle" | "pinch" | "seek") {
                anyhow::bail!("Unknown cooldown {:?}, expected toggle, pinch, or seek", name);
            }
            if !seconds.is_finite() || seconds < 0.0 {
                anyhow::bail!("Cooldown must be a non-negative number of seconds");
            }
            let mut update = SettingsUpdate::default();
            update.cooldowns.insert(name, seconds);
            Command::UpdateConfig(update)
        }
        Commands::MapGesture { action, gesture } => {
            let mut update = SettingsUpdate::default();
            update.gestures.insert(action, gesture);
            Command::UpdateConfig(update)
        }
    };
    Ok(command)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = DaemonClient::new();
    let command = build_command(cli.command)?;

    match client.send_command(command).await {
        Ok(Response::Ok) => {
            println!("Success");
        }
        Ok(Response::Status(info)) => {
            println!("Status:");
            println!("  Running: {}", info.is_running);
            println!("  Active: {}", info.is_active);
            println!("  System on: {}", info.system_on);
            println!("  Muted: {}", info.muted);
            println!("  Hand: {}", info.hand_preference);
            println!(
                "  Last action: {}",
                info.last_action.as_deref().unwrap_or("-")
            );
        }
        Ok(Response::Error(msg)) => {
            eprintln!("Error: {}", msg);
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Failed to connect to wavectld: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(build_command(Commands::Start).unwrap(), Command::Start);
        assert_eq!(build_command(Commands::Stop).unwrap(), Command::Stop);
        assert_eq!(build_command(Commands::Status).unwrap(), Command::Status);
    }

    #[test]
    fn test_set_hand_normalizes_labels() {
        let cmd = build_command(Commands::SetHand {
            hand: "BOTH".to_string(),
        })
        .unwrap();
        match cmd {
            Command::UpdateConfig(update) => {
                assert_eq!(
                    update.hand_preference.as_deref(),
                    Some("Both / No Preference")
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_set_hand_rejects_unknown() {
        assert!(build_command(Commands::SetHand {
            hand: "tentacle".to_string(),
        })
        .is_err());
    }

    #[test]
    fn test_set_cooldown_validation() {
        assert!(build_command(Commands::SetCooldown {
            name: "seek".to_string(),
            seconds: 0.1,
        })
        .is_ok());
        assert!(build_command(Commands::SetCooldown {
            name: "seek".to_string(),
            seconds: -1.0,
        })
        .is_err());
        assert!(build_command(Commands::SetCooldown {
            name: "measurement".to_string(),
            seconds: 0.1,
        })
        .is_err());
    }

    #[test]
    fn test_map_gesture_passes_through() {
        let cmd = build_command(Commands::MapGesture {
            action: "Play/Pause".to_string(),
            gesture: "Open palm".to_string(),
        })
        .unwrap();
        match cmd {
            Command::UpdateConfig(update) => {
                assert_eq!(
                    update.gestures.get("Play/Pause").map(String::as_str),
                    Some("Open palm")
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
