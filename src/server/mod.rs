// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP listener the Functions host (or Event Grid directly) delivers events to.

pub mod invocation;
pub mod router;

pub use router::Router;

use crate::constants::server::MAX_BODY_BYTES;
use anyhow::Context;
use bytes::Bytes;
use http::{Request, Response, StatusCode};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Incoming};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tower::BoxError;
use tracing::{info, warn};

pub struct Server {
    listen_addr: SocketAddr,
    router: Arc<Router>,
}

impl Server {
    pub fn new(listen_addr: SocketAddr, router: Router) -> Self {
        Self {
            listen_addr,
            router: Arc::new(router),
        }
    }

    /// Bind the listen address and serve until the task is dropped
    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = TcpListener::bind(self.listen_addr)
            .await
            .with_context(|| format!("Unable to listen on {}", self.listen_addr))?;

        info!("Listening on {}", listener.local_addr()?);

        loop {
            let (stream, client_addr) = listener.accept().await?;
            self.serve_connection(stream, client_addr);
        }
    }

    fn serve_connection(&self, stream: TcpStream, client_addr: SocketAddr) {
        let router = self.router.clone();

        tokio::spawn(async move {
            let service = service_fn(move |request: Request<Incoming>| {
                let router = router.clone();
                async move { Ok::<_, Infallible>(dispatch(&router, request).await) }
            });

            if let Err(err) = http1::Builder::new()
                .keep_alive(true)
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                warn!("Error serving HTTP connection from {}: {:?}", client_addr, err);
            }
        });
    }
}

/// Buffer the request body (bounded) and hand the request to the router
async fn dispatch<B>(router: &Router, request: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let (parts, body) = request.into_parts();

    match read_body(body).await {
        Ok(body) => router.route(Request::from_parts(parts, body)).await,
        Err(status) => {
            let mut response = Response::new(Full::new(Bytes::from(
                status.canonical_reason().unwrap_or_default(),
            )));
            *response.status_mut() = status;
            response
        }
    }
}

async fn read_body<B>(body: B) -> std::result::Result<Bytes, StatusCode>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            warn!("Request body exceeds {} bytes", MAX_BODY_BYTES);
            Err(StatusCode::PAYLOAD_TOO_LARGE)
        }
        Err(e) => {
            warn!("Failed to read request body: {}", e);
            Err(StatusCode::BAD_REQUEST)
        }
    }
}
