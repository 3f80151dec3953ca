#![allow(clippy::must_use_candidate)]

mod cors;
mod health;
mod index;

use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};

use almabody_config::Config;
use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

pub use health::Readiness;

/// Listen address when neither the configuration nor the CLI sets one
pub const DEFAULT_LISTEN_ADDRESS: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 8000);

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
    readiness: Readiness,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the talk subsystem fails to initialize
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let listen_address = config.server.listen_address.unwrap_or(DEFAULT_LISTEN_ADDRESS);

        let readiness = Readiness::new(config.talk.missing_settings());
        let talk_state = talk::build_server(config)?;

        let mut app = Router::new();
        let mut endpoints = Vec::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(
                &config.server.health.path,
                get(health::health_handler).with_state(readiness.clone()),
            );
            endpoints.push(config.server.health.path.clone());
        }

        // Talk routes
        app = app.merge(talk::endpoint_router().with_state(talk_state));
        endpoints.push("/say".to_string());

        // Banner
        let banner = Arc::new(index::Banner::new(endpoints));
        app = app.route("/", get(index::index_handler).with_state(banner));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
            readiness,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Settings still missing for talks to succeed
    #[must_use]
    pub const fn readiness(&self) -> &Readiness {
        &self.readiness
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
