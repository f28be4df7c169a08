//! Subcommand implementations.

use agora_common::{AgoraError, Event, Presence};
use agora_config::AgoraConfig;
use agora_presence::{
    ActivityHandle, Credential, HttpPresenceApi, InputKind, Interest, PresenceApi,
    PresenceContext, ServerEndpoint, Session,
};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{info, warn};

use crate::cli::{Command, Login};

pub async fn run(command: Command, config: AgoraConfig) -> agora_common::Result<()> {
    match command {
        Command::Watch {
            login,
            users,
            status_msg,
        } => watch(&config, login, users, status_msg).await,
        Command::Get { login, user } => get(&config, login, &user).await,
        Command::Set {
            login,
            presence,
            status_msg,
        } => set(&config, login, presence, status_msg.as_deref()).await,
        Command::Onboard { server } => onboard(config, &server),
        Command::Config => {
            println!("{}", agora_config::config_to_json(&config));
            Ok(())
        }
    }
}

fn session(config: &AgoraConfig, login: Login) -> agora_common::Result<Session> {
    let url = login.server.as_deref().unwrap_or(&config.server.url);
    if url.trim().is_empty() {
        return Err(AgoraError::Other(
            "no server configured; run `agora onboard --server <URL>` or pass --server".into(),
        ));
    }
    let endpoint = ServerEndpoint::parse(url)?;
    Ok(Session::new(
        Credential::new(login.user_id, login.token),
        endpoint,
    ))
}

async fn watch(
    config: &AgoraConfig,
    login: Login,
    users: Vec<String>,
    status_msg: Option<String>,
) -> agora_common::Result<()> {
    if login.server.is_none() && !config.presence_ready() {
        return Err(AgoraError::Other(
            "presence is not set up; finish onboarding or pass --server".into(),
        ));
    }
    let session = session(config, login)?;
    let status_msg = status_msg.or_else(|| config.presence.status_message().map(str::to_string));

    let mut ctx = PresenceContext::with_http()?;
    let mut events = ctx.subscribe();
    ctx.init(session, status_msg).await;

    let interests: Vec<Interest> = users.iter().map(|user| ctx.track(user)).collect();
    let stdin = BufReader::new(tokio::io::stdin());
    follow(
        &mut events,
        &users,
        ctx.activity(),
        stdin,
        tokio::signal::ctrl_c(),
    )
    .await;

    drop(interests);
    ctx.dispose().await;
    Ok(())
}

/// Print changes for `users` and feed input lines to `activity` until
/// `shutdown` resolves or the event stream closes.
async fn follow<R, S>(
    events: &mut broadcast::Receiver<Event>,
    users: &[String],
    activity: Option<ActivityHandle>,
    input: R,
    shutdown: S,
) where
    R: AsyncBufRead + Unpin,
    S: Future,
{
    let mut input = input.lines();
    let mut input_open = true;
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Interrupted, logging out");
                break;
            }
            line = input.next_line(), if input_open => match line {
                Ok(Some(_)) => {
                    if let Some(activity) = &activity {
                        activity.record_input(InputKind::Key);
                    }
                }
                Ok(None) | Err(_) => input_open = false,
            },
            event = events.recv() => match event {
                Ok(Event::PresenceChanged { user_id, presence }) if users.contains(&user_id) => {
                    println!("{user_id}\t{presence}");
                }
                Ok(Event::SelfPresenceChanged(presence)) => info!(%presence, "Own presence"),
                Ok(Event::FeedConnected) => info!("Live feed connected"),
                Ok(Event::FeedDisconnected) => warn!("Live feed disconnected"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event stream lagged"),
                Err(RecvError::Closed) => break,
            },
        }
    }
}

async fn get(config: &AgoraConfig, login: Login, user: &str) -> agora_common::Result<()> {
    let session = session(config, login)?;
    let presence = HttpPresenceApi::new()?
        .fetch_presence(&session, user)
        .await?;
    println!("{user}\t{presence}");
    Ok(())
}

async fn set(
    config: &AgoraConfig,
    login: Login,
    presence: Presence,
    status_msg: Option<&str>,
) -> agora_common::Result<()> {
    let session = session(config, login)?;
    let status_msg = status_msg.or_else(|| config.presence.status_message());
    HttpPresenceApi::new()?
        .set_presence(&session, presence, status_msg)
        .await?;
    info!(%presence, "Presence set");
    Ok(())
}

fn onboard(mut config: AgoraConfig, server: &str) -> agora_common::Result<()> {
    let endpoint = ServerEndpoint::parse(server)?;
    config.server.url = endpoint.base().to_string();
    config.onboarding.completed = true;
    agora_config::validation::validate(&config)?;
    agora_config::save_config(&config)?;
    println!("Onboarded to {endpoint}");
    Ok(())
}
