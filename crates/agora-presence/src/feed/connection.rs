//! Background WebSocket connection loop with auto-reconnect.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};

use agora_common::Event;

use super::handler::apply_text;
use super::session::ReconnectState;
use super::types::{FeedCommand, FeedStatus, CONNECT_TIMEOUT};
use crate::credential::Session;
use crate::store::PresenceStore;

type FeedStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How a single open connection ended.
enum ReadOutcome {
    /// Server closed, transport error or end of stream.
    Lost,
    /// The manager asked us to stop.
    Stopped,
}

// ---------------------------------------------------------------------------
// Connection Loop
// ---------------------------------------------------------------------------

/// Connect, read until the connection drops, back off, repeat; exit once
/// the manager sends `Close` or drops its sender.
pub(crate) async fn connection_loop(
    session: Session,
    store: PresenceStore,
    status: FeedStatus,
    mut reconnect: ReconnectState,
    mut command_rx: mpsc::Receiver<FeedCommand>,
) {
    let url = session.endpoint.feed_url(&session.credential.access_token);
    let log_url = session.endpoint.feed_url_without_query();

    loop {
        if reconnect.is_closing() {
            break;
        }
        info!(url = %log_url, "Connecting to presence feed");

        let attempt = tokio::time::timeout(
            CONNECT_TIMEOUT,
            tokio_tungstenite::connect_async(url.as_str()),
        );
        let outcome = tokio::select! {
            result = attempt => result,
            _ = command_rx.recv() => break,
        };

        match outcome {
            Ok(Ok((ws_stream, _))) => {
                reconnect.on_open();
                status.set_connected(true);
                store.events().publish(Event::FeedConnected);
                info!(url = %log_url, "Presence feed connected");

                let ended = read_until_closed(ws_stream, &store, &mut command_rx).await;

                status.set_connected(false);
                store.events().publish(Event::FeedDisconnected);
                if matches!(ended, ReadOutcome::Stopped) {
                    break;
                }
            }
            Ok(Err(e)) => {
                warn!(error = %e, "Failed to connect to presence feed");
            }
            Err(_elapsed) => {
                warn!("Presence feed connection timed out after {:?}", CONNECT_TIMEOUT);
            }
        }

        let Some(delay) = reconnect.on_close() else {
            break;
        };
        info!(delay_secs = delay.as_secs(), "Reconnecting to presence feed");
        tokio::select! {
            _ = tokio::time::sleep(delay) => {}
            _ = command_rx.recv() => break,
        }
    }

    status.set_connected(false);
    debug!("Presence feed loop exited");
}

async fn read_until_closed(
    ws_stream: FeedStream,
    store: &PresenceStore,
    command_rx: &mut mpsc::Receiver<FeedCommand>,
) -> ReadOutcome {
    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = ws_read.next() => match msg {
                Some(Ok(WsMessage::Text(text))) => {
                    apply_text(&text, store);
                }
                Some(Ok(WsMessage::Close(_))) | None => {
                    info!("Presence feed closed by server");
                    return ReadOutcome::Lost;
                }
                Some(Err(e)) => {
                    warn!(error = %e, "Presence feed error");
                    return ReadOutcome::Lost;
                }
                // Pings are answered by tungstenite; binary frames are not part
                // of the feed.
                Some(Ok(_)) => {}
            },
            _ = command_rx.recv() => {
                let _ = ws_write.send(WsMessage::Close(None)).await;
                return ReadOutcome::Stopped;
            }
        }
    }
}
