use log::{error, info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::client::{ClientRegistry, handle_client};
use crate::config::{SharedRuntimeConfig, StartupConfig};
use crate::error::handlers::handle_error;
use crate::error::{ServerError, SessionError};
use crate::protocol::responses::{SERVICE_UNAVAILABLE, format_response};
use crate::server::AppState;

pub struct Server {
    registry: Arc<Mutex<ClientRegistry>>,
    state: Arc<AppState>,
    runtime: SharedRuntimeConfig,
    listener: TcpListener,
}

impl Server {
    /// Binds the listener and prepares shared state.
    pub async fn bind(
        startup: StartupConfig,
        runtime: SharedRuntimeConfig,
    ) -> Result<Self, ServerError> {
        Self::with_state(AppState::from_config(startup), runtime).await
    }

    pub async fn with_state(
        state: AppState,
        runtime: SharedRuntimeConfig,
    ) -> Result<Self, ServerError> {
        let socket = state.limits.control_socket();
        let listener = TcpListener::bind(&socket).await.map_err(|e| {
            error!("Failed to bind to {}: {}", socket, e);
            e
        })?;
        info!("Server bound to {}", listener.local_addr()?);
        info!(
            "Credential store: {}",
            state.credentials.backend().path().display()
        );

        Ok(Self {
            registry: Arc::new(Mutex::new(ClientRegistry::new())),
            state: Arc::new(state),
            runtime,
            listener,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    pub fn registry(&self) -> Arc<Mutex<ClientRegistry>> {
        Arc::clone(&self.registry)
    }

    /// Accepts connections until the task is dropped.
    pub async fn start(&self) {
        let max_clients = self.runtime.read().await.max_clients;
        info!(
            "Starting Unified Intelligence Platform server (max {} clients)",
            max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let registry = Arc::clone(&self.registry);
                    let state = Arc::clone(&self.state);
                    let runtime = Arc::clone(&self.runtime);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) = handle_new_client(stream, addr, registry, state, runtime).await
                        {
                            warn!("Failed to handle client {}: {}", addr, e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Admits a client if there is room, runs its session, then deregisters it.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    registry: Arc<Mutex<ClientRegistry>>,
    state: Arc<AppState>,
    runtime: SharedRuntimeConfig,
) -> Result<(), ServerError> {
    let max_clients = runtime.read().await.max_clients;

    {
        let mut clients = registry.lock().await;
        if clients.len() >= max_clients {
            let err = ServerError::from(SessionError::TooManyConnections(clients.len()));
            handle_error(&err);
            drop(clients);
            stream
                .write_all(
                    format_response(SERVICE_UNAVAILABLE, "Too many connections. Try again later.")
                        .as_bytes(),
                )
                .await?;
            return Ok(());
        }

        clients.insert(client_addr);
        info!(
            "Client connected: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            max_clients
        );
    }

    let result = handle_client(stream, client_addr, Arc::clone(&registry), state).await;

    registry.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);
    result
}
