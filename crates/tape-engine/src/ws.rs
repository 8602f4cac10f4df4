//! WebSocket transport for the broadcast feed.
//!
//! Accepts client connections, registers each with the [`BroadcastHub`], and
//! pumps hub frames into the socket. The feed is one-way and unauthenticated:
//! inbound text from clients is ignored, pings are answered, and any close or
//! send failure tears the subscriber down. Reconnection is the client's
//! responsibility.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::Utf8Bytes;
use tracing::{debug, info, warn};

use crate::hub::BroadcastHub;
use crate::table::PriceTable;

/// Accept connections forever, spawning one task per client.
pub async fn serve(
    listener: TcpListener,
    table: Arc<RwLock<PriceTable>>,
    hub: Arc<BroadcastHub>,
) -> Result<()> {
    info!("market data WebSocket listening on {}", listener.local_addr()?);

    loop {
        let (stream, peer) = listener.accept().await?;
        let table = table.clone();
        let hub = hub.clone();
        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer, table, hub).await {
                debug!("[{peer}] connection ended: {e:#}");
            }
        });
    }
}

/// Serve one client: handshake, snapshot, then pump broadcast frames until
/// the connection goes away.
async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    table: Arc<RwLock<PriceTable>>,
    hub: Arc<BroadcastHub>,
) -> Result<()> {
    let ws_stream = tokio_tungstenite::accept_async(stream).await?;
    info!("[{peer}] client connected");

    // Late joiners get the full current table as their first frame.
    let snapshot: Utf8Bytes = {
        let table = table.read().await;
        serde_json::to_string(&*table)?.into()
    };
    let (id, mut frames) = hub.subscribe(snapshot).await;

    let (mut ws_write, mut ws_read) = ws_stream.split();

    loop {
        tokio::select! {
            frame = frames.recv() => match frame {
                Some(payload) => {
                    if let Err(e) = ws_write.send(Message::Text(payload)).await {
                        warn!("[{peer}] send failed: {e}");
                        break;
                    }
                }
                // Hub dropped our queue.
                None => break,
            },

            msg = ws_read.next() => match msg {
                Some(Ok(Message::Ping(data))) => {
                    let _ = ws_write.send(Message::Pong(data)).await;
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("[{peer}] client disconnected");
                    break;
                }
                Some(Err(e)) => {
                    warn!("[{peer}] read error: {e}");
                    break;
                }
                Some(Ok(_)) => {} // inbound text/binary — the feed is one-way
            },
        }
    }

    hub.unsubscribe(id).await;
    Ok(())
}
