mod auth;
pub mod errors;
mod health;
mod users;
mod ws;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use faultline_config::Config;
use faultline_dispatch::{HandlerTable, register_errors};
use tower_http::trace::TraceLayer;

use auth::TokenCheck;

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid (including routes
    /// whose paths collide) or an error type fails to register
    pub fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let mut table = HandlerTable::new();
        register_errors(&mut table, errors::registered())?;
        let table = Arc::new(table);

        // Token-protected routes
        let mut protected = Router::new()
            .route("/", get(users::missing_user))
            .route("/{user}", get(users::get_user));

        if config.ws.enabled {
            let state = ws::WsState {
                table: Arc::clone(&table),
                max_message_bytes: config.ws.max_message_bytes,
            };
            protected = protected.route(&config.ws.path, get(ws::ws_handler).with_state(state));
        }

        let check = Arc::new(TokenCheck::from_config(&config.auth)?);
        protected = protected.route_layer(axum::middleware::from_fn(move |req, next| {
            let check = Arc::clone(&check);
            async move { auth::authorize(check, req, next).await }
        }));

        let mut app = Router::new().merge(protected);

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, get(health::health_handler));
        }

        // Raised errors become handler responses
        let dispatch_table = Arc::clone(&table);
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let table = Arc::clone(&dispatch_table);
            async move { faultline_dispatch::dispatch_errors(table, req, next).await }
        }));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        tracing::debug!(error_types = table.registered().len(), "error handlers registered");

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
