//! Subcommand handlers.

use std::sync::Arc;

use anyhow::{Context, Result};
use navi_core::{Card, MediaQueue};
use navi_player::{PlayRequest, Session};
use navi_subsonic::SubsonicClient;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::{Cli, Command};

pub async fn run(cli: Cli, client: SubsonicClient) -> Result<()> {
    match cli.command {
        Command::Ping => {
            client.ping().await.context("Server did not answer the ping")?;
            println!("ok");
        }
        Command::Play { ids, shuffle } => {
            let mut queue = MediaQueue::new();
            if let Some(limit) = cli.history_limit {
                queue = queue.with_history_limit(limit);
            }
            let session = Session::with_queue(Arc::new(client), queue).with_head_size(cli.head_size);
            play(&session, ids, shuffle).await?;
        }
        Command::Song { id } => {
            let song = client
                .get_song(&id)
                .await
                .with_context(|| format!("Failed to look up song {id}"))?;
            print_json(&song)?;
        }
        Command::Star { id, kind } => {
            client
                .star(kind.into(), &id)
                .await
                .with_context(|| format!("Failed to star {id}"))?;
            info!("Starred {id}");
        }
        Command::Unstar { id, kind } => {
            client
                .unstar(kind.into(), &id)
                .await
                .with_context(|| format!("Failed to unstar {id}"))?;
            info!("Unstarred {id}");
        }
    }
    Ok(())
}

/// Start playback, then wait for the queue to fill and show the result.
async fn play(session: &Session<SubsonicClient>, ids: Vec<String>, shuffle: bool) -> Result<()> {
    let total = ids.len();
    let request = PlayRequest {
        shuffle,
        speech: Some(format!("Playing {total} songs")),
        card: Some(Card::new("Navi", format!("Playing {total} songs"))),
    };

    let response = session
        .play(ids, request)
        .await
        .context("Could not start playback")?;
    print_json(&response)?;

    if let Some(report) = session.jobs().wait().await {
        match report.error {
            Some(e) => warn!("Queue only partly loaded ({}/{}): {e}", report.added, report.requested),
            None => info!("Queue loaded, {} tracks added in the background", report.added),
        }
    }

    print_json(&session.snapshot())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
