use async_trait::async_trait;
use axum::extract::ws::{CloseFrame, Message, WebSocket, close_code};
use faultline_core::{CloseSignal, ConnectionContext, Family, Raised};

use crate::{DispatchError, HandlerTable, metrics};

/// Application logic for one WebSocket connection
#[async_trait]
pub trait Session: Send {
    /// Drive the connection until it ends or raises an error
    ///
    /// Returning `Ok(())` closes the connection normally. Returning a raised
    /// connection-family error closes it with that error's code and reason.
    async fn run(&mut self, socket: &mut WebSocket, connection: &ConnectionContext) -> Result<(), Raised>;
}

/// Run a session and close the socket with the outcome it produced
pub async fn run_connection<S: Session>(
    mut socket: WebSocket,
    connection: ConnectionContext,
    table: &HandlerTable,
    mut session: S,
) {
    tracing::debug!(connection_id = %connection.id, "connection opened");

    let frame = match session.run(&mut socket, &connection).await {
        Ok(()) => CloseFrame {
            code: close_code::NORMAL,
            reason: "".into(),
        },
        Err(raised) => close_frame(table, connection.clone(), raised).await,
    };

    tracing::debug!(connection_id = %connection.id, code = frame.code, "closing connection");

    if let Err(e) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!(connection_id = %connection.id, "failed to send close frame: {e}");
    }
}

/// Close frame for an error raised on a connection
///
/// The bound connection handler decides code and reason. Errors with no
/// usable handler close with 1011.
pub async fn close_frame(table: &HandlerTable, connection: ConnectionContext, raised: Raised) -> CloseFrame {
    let type_name = raised.name();
    let connection_id = connection.id;

    match table.dispatch_connection(connection, raised).await {
        Ok(signal) => {
            metrics::record_handled(type_name, Family::Connection);
            to_close_frame(signal)
        }
        Err(DispatchError::Unhandled { .. }) => {
            tracing::error!(%connection_id, error_type = type_name, "no handler registered for raised error");
            metrics::record_unhandled(type_name);
            internal_error_frame()
        }
        Err(DispatchError::Contract(violation)) => {
            tracing::error!(%connection_id, error_type = type_name, "error handler contract violated: {violation}");
            metrics::record_unhandled(type_name);
            internal_error_frame()
        }
    }
}

fn to_close_frame(signal: CloseSignal) -> CloseFrame {
    CloseFrame {
        code: signal.code,
        reason: signal.reason.unwrap_or_default().into(),
    }
}

fn internal_error_frame() -> CloseFrame {
    CloseFrame {
        code: close_code::ERROR,
        reason: "".into(),
    }
}
