//! The responder endpoint: binds a listener, serves `SayHello` and shuts
//! down gracefully on request.

mod config;
mod error;
mod lifecycle;
mod service;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;
use tracing::{debug, error, info, warn};

pub use config::{DEFAULT_GRACE_PERIOD, ResponderConfig};
pub use error::ServerError;
pub use lifecycle::{CallGuard, Lifecycle};
pub use service::{GreeterService, GreetingHandler, IntentResponder, TERMINATED_MESSAGE};

use crate::greeter_proto::greeter_server::GreeterServer;
pub use crate::state_machine::lifecycle::Phase;

type ServeTask = JoinHandle<Result<(), tonic::transport::Error>>;

/// A responder that has not been started yet.
pub struct Responder<H = IntentResponder> {
    config: ResponderConfig,
    handler: H,
}

impl Responder {
    pub fn new(config: ResponderConfig) -> Self {
        Self::with_handler(config, IntentResponder)
    }
}

impl<H: GreetingHandler> Responder<H> {
    pub fn with_handler(config: ResponderConfig, handler: H) -> Self {
        Self { config, handler }
    }

    /// Bind the listener and start serving in the background.
    pub async fn start(self) -> Result<ResponderHandle, ServerError> {
        let addr = self.config.addr;
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { addr, source })?;

        let lifecycle = Arc::new(Lifecycle::new());
        let service = GreeterService::new(self.handler, Arc::clone(&lifecycle));

        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let signal = async move {
            let _ = shutdown_rx.wait_for(|stop| *stop).await;
        };

        lifecycle.bind();
        info!(address = %local_addr, "Responder listening");

        let task = tokio::spawn(
            Server::builder()
                .add_service(GreeterServer::new(service))
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal),
        );

        Ok(ResponderHandle {
            inner: Arc::new(HandleInner {
                local_addr,
                grace_period: self.config.grace_period,
                lifecycle,
                shutdown_tx,
                task: Mutex::new(Some(task)),
            }),
        })
    }

    /// Serve until `shutdown` resolves, then stop.
    ///
    /// Failures while stopping are logged and swallowed so the process can
    /// still exit.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        let handle = self.start().await?;

        shutdown.await;
        info!("Shutdown signal received");

        if let Err(e) = handle.stop().await {
            error!(error = %e, "Responder did not shut down cleanly");
        }
        Ok(())
    }
}

/// Control handle for a running responder. Cheap to clone.
#[derive(Clone)]
pub struct ResponderHandle {
    inner: Arc<HandleInner>,
}

struct HandleInner {
    local_addr: SocketAddr,
    grace_period: Duration,
    lifecycle: Arc<Lifecycle>,
    shutdown_tx: watch::Sender<bool>,
    task: Mutex<Option<ServeTask>>,
}

impl std::fmt::Debug for ResponderHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponderHandle")
            .field("local_addr", &self.inner.local_addr)
            .field("phase", &self.phase())
            .finish()
    }
}

impl ResponderHandle {
    /// The address the listener is actually bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    pub fn phase(&self) -> Phase {
        self.inner.lifecycle.phase()
    }

    pub fn in_flight(&self) -> usize {
        self.inner.lifecycle.in_flight()
    }

    /// Stop accepting calls, let in-flight calls finish within the grace
    /// period, then tear the server down.
    ///
    /// Safe to call more than once and from several tasks; later callers wait
    /// until the first one has finished stopping. The shutdown itself runs on
    /// its own task, so dropping this future does not leave the responder
    /// half stopped.
    pub async fn stop(&self) -> Result<(), ServerError> {
        let task = self.inner.task.lock().await.take();
        let Some(task) = task else {
            debug!("Stop already in progress, waiting for responder to stop");
            self.inner.lifecycle.wait_for(Phase::Stopped).await;
            return Ok(());
        };

        self.inner.lifecycle.request_stop();
        self.inner.shutdown_tx.send_replace(true);

        let shutdown = tokio::spawn(drain(
            task,
            Arc::clone(&self.inner.lifecycle),
            self.inner.grace_period,
            self.inner.local_addr,
        ));
        shutdown.await?
    }
}

/// Wait for the serve task to wind down within `grace_period`, abort it
/// otherwise, and always finish in [`Phase::Stopped`].
async fn drain(
    mut task: ServeTask,
    lifecycle: Arc<Lifecycle>,
    grace_period: Duration,
    local_addr: SocketAddr,
) -> Result<(), ServerError> {
    info!(
        grace_period = ?grace_period,
        in_flight = lifecycle.in_flight(),
        "Responder shutting down"
    );

    let result = match tokio::time::timeout(grace_period, &mut task).await {
        Ok(joined) => joined
            .map_err(ServerError::from)
            .and_then(|served| served.map_err(ServerError::from)),
        Err(_) => {
            warn!(
                in_flight = lifecycle.in_flight(),
                "Grace period elapsed, terminating responder"
            );
            task.abort();
            Ok(())
        }
    };

    // Calls still running observe this and are cut off.
    lifecycle.terminate();
    info!(address = %local_addr, "Responder stopped");
    result
}
