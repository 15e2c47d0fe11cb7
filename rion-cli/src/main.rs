use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use rion_client::{EventSink, RemoteMedia, WebRtcEngine, WebRtcRemoteTrack};
use rion_core::{ClientConfig, Error, PeerAnnouncement, SessionState};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rion", version, about = "Join a rion room from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RoomArgs {
    /// Base address of the room server.
    #[arg(long, env = "RION_URL")]
    url: String,

    #[arg(long, env = "RION_ROOM")]
    room: String,

    /// Local identity. A random one is generated when omitted.
    #[arg(long, env = "RION_ID")]
    id: Option<String>,

    #[arg(long, env = "RION_TOKEN", hide_env_values = true, conflicts_with = "prompt_token")]
    token: Option<String>,

    /// Ask for the token instead of reading it from the command line.
    #[arg(long)]
    prompt_token: bool,

    /// Log negotiation timings and session descriptions.
    #[arg(long, env = "RION_DEBUG")]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Subscribe to a room and print membership and media as it arrives.
    Subscribe {
        #[command(flatten)]
        room: RoomArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Subscribe { room } => {
            init_tracing(room.debug);
            let config = client_config(room)?;
            subscribe(config).await?;
        }
    }

    Ok(())
}

fn init_tracing(debug: bool) {
    let default = if debug { "rion_client=debug,info" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

fn client_config(args: RoomArgs) -> Result<ClientConfig> {
    let id = args
        .id
        .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string());

    let token = if args.prompt_token {
        let token = dialoguer::Password::new()
            .with_prompt("Room token")
            .allow_empty_password(true)
            .interact()
            .context("Failed to read token")?;
        Some(token).filter(|t| !t.is_empty())
    } else {
        args.token
    };

    let mut config = ClientConfig::new(args.url, args.room, id).with_debug(args.debug);
    config.token = token;
    Ok(config)
}

async fn subscribe(config: ClientConfig) -> Result<()> {
    println!(
        "{} {} as {}",
        "Joining".green().bold(),
        config.room.cyan(),
        config.id.cyan()
    );

    let session = rion_client::connect(config, Arc::new(ConsoleSink))
        .await
        .context("Failed to create session")?;
    session.subscribe().await.context("Failed to subscribe")?;

    let mut state = session.watch_state();
    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = *state.borrow_and_update();
                println!("{} {}", "state".dimmed(), current);
                if current == SessionState::Connected {
                    if let Some(id) = session.full_id() {
                        println!("{} {}", "Connected as".green().bold(), id);
                    }
                }
                if current.is_closed() {
                    anyhow::bail!("Session closed by the room");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "Leaving room...".yellow());
                break;
            }
        }
    }

    session.close().await;
    println!("{}", "Bye".green().bold());
    Ok(())
}

/// Prints session events to stdout.
struct ConsoleSink;

impl EventSink<WebRtcEngine> for ConsoleSink {
    fn on_remote_stream_received(&self, media: RemoteMedia<WebRtcRemoteTrack>) {
        println!(
            "{} {} from {} ({})",
            "media".cyan(),
            media.track.kind(),
            media.peer.peer_id.bold(),
            media.peer.app_kind
        );
    }

    fn on_peer_joined(&self, peer: &PeerAnnouncement) {
        println!("{} {}", "+".green().bold(), peer);
    }

    fn on_peer_left(&self, peer: &PeerAnnouncement) {
        println!("{} {}", "-".red().bold(), peer);
    }

    fn on_error(&self, error: &Error) {
        eprintln!("{} {}", "error".red().bold(), error);
    }
}
