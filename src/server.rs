//! HTTP server and graceful shutdown.
//!
//! The server reads each request body in full, wraps it in a
//! [`Request`] and hands it to the [`App`]. On shutdown it stops accepting
//! connections, lets in-flight connections finish, then returns.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::app::App;
use crate::error::Error;
use crate::request::Request;
use crate::settings::Settings;
use crate::status;

/// The HTTP server.
pub struct Server {
    addr: SocketAddr,
}

impl Server {
    /// Configures the server to listen on `addr` when served.
    pub fn bind(addr: SocketAddr) -> Self {
        Self { addr }
    }

    /// Listen address from `[server]` settings.
    pub fn from_settings(settings: &Settings) -> Result<Self, Error> {
        Ok(Self::bind(settings.socket_addr()?))
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves `app` until SIGTERM or Ctrl-C, then drains in-flight requests.
    pub async fn serve(self, app: App) -> Result<(), Error> {
        self.serve_with_shutdown(app, shutdown_signal()).await
    }

    /// Serves `app` until `signal` resolves, then drains in-flight requests.
    pub async fn serve_with_shutdown<S>(self, app: App, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let listener = TcpListener::bind(self.addr).await?;
        Self::serve_listener(listener, app, signal).await
    }

    /// Serves `app` on a listener bound by the caller (e.g. to port 0) until
    /// `signal` resolves.
    pub async fn serve_listener<S>(listener: TcpListener, app: App, signal: S) -> Result<(), Error>
    where
        S: Future<Output = ()>,
    {
        let addr = listener.local_addr()?;
        let app = Arc::new(app);

        info!(addr = %addr, prefix = %app.prefix(), "restish listening");

        let mut tasks = tokio::task::JoinSet::new();
        tokio::pin!(signal);

        loop {
            tokio::select! {
                // Shutdown first so no queued connection is accepted after it.
                biased;

                () = &mut signal => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, remote_addr) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let app = Arc::clone(&app);
                    let io = TokioIo::new(stream);

                    tasks.spawn(async move {
                        let svc = service_fn(move |req| {
                            let app = Arc::clone(&app);
                            async move { dispatch(&app, req, remote_addr).await }
                        });

                        if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                            .serve_connection(io, svc)
                            .await
                        {
                            error!(peer = %remote_addr, "connection error: {e}");
                        }
                    });
                }

                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        while tasks.join_next().await.is_some() {}

        info!("restish stopped");
        Ok(())
    }
}

/// Produces one response for one request. Never fails: a body that cannot be
/// read becomes `400 Bad Request`.
async fn dispatch(
    app: &App,
    req: hyper::Request<Incoming>,
    remote_addr: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible> {
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            debug!(peer = %remote_addr, "failed to read request body: {e}");
            return Ok(status::bad_request().into_inner());
        }
    };

    let request = Request::from_http(http::Request::from_parts(parts, body));
    Ok(app.handle(request).await.into_inner())
}

/// Resolves on the first SIGTERM or SIGINT (Ctrl-C only on non-Unix).
///
/// A signal handler that cannot be installed is logged and never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c  => {}
        () = sigterm => {}
    }
}
