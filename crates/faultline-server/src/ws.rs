use std::sync::Arc;

use async_trait::async_trait;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::Response;
use faultline_core::{ConnectionContext, Raised};
use faultline_dispatch::{HandlerTable, Session, run_connection};
use futures_util::{Sink, SinkExt, Stream, StreamExt};

use crate::errors::{MessageTooBigError, UnsupportedDataError};

/// Text that ends an echo session normally
const CLOSE_COMMAND: &str = "close";

#[derive(Clone)]
pub struct WsState {
    pub table: Arc<HandlerTable>,
    pub max_message_bytes: usize,
}

/// Upgrade to a WebSocket running the echo session
pub async fn ws_handler(
    State(state): State<WsState>,
    connection: ConnectionContext,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| async move {
        let session = EchoSession {
            max_message_bytes: state.max_message_bytes,
        };
        run_connection(socket, connection, &state.table, session).await;
    })
}

/// Echoes text frames back to the peer
struct EchoSession {
    max_message_bytes: usize,
}

#[async_trait]
impl Session for EchoSession {
    async fn run(&mut self, socket: &mut WebSocket, connection: &ConnectionContext) -> Result<(), Raised> {
        echo(socket, connection, self.max_message_bytes).await
    }
}

/// Echo loop over any message stream and sink
///
/// A peer that goes away, on read or on write, ends the session normally.
async fn echo<P>(peer: &mut P, connection: &ConnectionContext, max_message_bytes: usize) -> Result<(), Raised>
where
    P: Stream<Item = Result<Message, axum::Error>> + Sink<Message, Error = axum::Error> + Unpin + Send,
{
    while let Some(message) = peer.next().await {
        let message = match message {
            Ok(message) => message,
            Err(e) => {
                tracing::debug!(connection_id = %connection.id, "connection dropped: {e}");
                return Ok(());
            }
        };

        match message {
            Message::Text(text) => {
                if text.as_str().len() > max_message_bytes {
                    return Err(MessageTooBigError.into());
                }
                if text.as_str() == CLOSE_COMMAND {
                    return Ok(());
                }
                if let Err(e) = peer.send(Message::Text(text)).await {
                    tracing::debug!(connection_id = %connection.id, "connection dropped during echo: {e}");
                    return Ok(());
                }
            }
            Message::Binary(_) => return Err(UnsupportedDataError.into()),
            Message::Close(_) => return Ok(()),
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::pin::Pin;
    use std::task::{Context, Poll};

    use super::*;

    /// Peer that replays queued messages and records or refuses what it is sent
    struct Peer {
        incoming: VecDeque<Message>,
        sent: Vec<Message>,
        writable: bool,
    }

    impl Peer {
        fn new(incoming: impl IntoIterator<Item = Message>) -> Self {
            Self {
                incoming: incoming.into_iter().collect(),
                sent: Vec::new(),
                writable: true,
            }
        }

        fn unwritable(mut self) -> Self {
            self.writable = false;
            self
        }
    }

    impl Stream for Peer {
        type Item = Result<Message, axum::Error>;

        fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
            Poll::Ready(self.incoming.pop_front().map(Ok))
        }
    }

    impl Sink<Message> for Peer {
        type Error = axum::Error;

        fn poll_ready(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            if self.writable {
                Poll::Ready(Ok(()))
            } else {
                Poll::Ready(Err(axum::Error::new(std::io::Error::from(std::io::ErrorKind::BrokenPipe))))
            }
        }

        fn start_send(mut self: Pin<&mut Self>, item: Message) -> Result<(), Self::Error> {
            self.sent.push(item);
            Ok(())
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }

        fn poll_close(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
            Poll::Ready(Ok(()))
        }
    }

    fn connection() -> ConnectionContext {
        let (parts, ()) = http::Request::builder().uri("/ws").body(()).unwrap().into_parts();
        ConnectionContext::from_parts(&parts)
    }

    #[tokio::test]
    async fn text_is_echoed_until_close_command() {
        let mut peer = Peer::new([Message::Text("hello".into()), Message::Text("close".into())]);

        echo(&mut peer, &connection(), 64).await.unwrap();

        assert_eq!(peer.sent, [Message::Text("hello".into())]);
    }

    #[tokio::test]
    async fn failed_echo_ends_the_session_normally() {
        let mut peer = Peer::new([Message::Text("hello".into()), Message::Binary(vec![1].into())]).unwritable();

        let outcome = echo(&mut peer, &connection(), 64).await;

        assert!(outcome.is_ok());
        assert!(peer.sent.is_empty());
        // The binary frame behind the failed write is never read
        assert_eq!(peer.incoming.len(), 1);
    }

    #[tokio::test]
    async fn binary_frame_raises_unsupported_data() {
        let mut peer = Peer::new([Message::Binary(vec![1, 2, 3].into())]);

        let raised = echo(&mut peer, &connection(), 64).await.unwrap_err();

        assert!(raised.downcast_ref::<UnsupportedDataError>().is_some());
    }

    #[tokio::test]
    async fn oversized_text_raises_message_too_big() {
        let mut peer = Peer::new([Message::Text("much too long".into())]);

        let raised = echo(&mut peer, &connection(), 8).await.unwrap_err();

        assert!(raised.downcast_ref::<MessageTooBigError>().is_some());
        assert!(peer.sent.is_empty());
    }
}
