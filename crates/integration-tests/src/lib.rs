//! Test harness for the realtime invalidation channel.
//!
//! Mounts the server's WebSocket router on an ephemeral listener so tests
//! can drive real clients over TCP. No database is involved; the channel is
//! independent of storage by design.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpStream;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use constructivo_server::realtime::{self, CacheRegistry};

/// A realtime router bound to an ephemeral local port.
pub struct TestServer {
    addr: SocketAddr,
    registry: Arc<CacheRegistry>,
}

impl TestServer {
    /// Bind the realtime router on `127.0.0.1:0` and serve it in the
    /// background for the rest of the test.
    pub async fn spawn() -> Self {
        let registry = Arc::new(CacheRegistry::new());
        let app = realtime::router(Arc::clone(&registry));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral listener");
        let addr = listener.local_addr().expect("listener address");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("serve test app");
        });

        Self { addr, registry }
    }

    /// WebSocket URL of the upgrade endpoint.
    #[must_use]
    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    /// Shared handle to the registry driving this server.
    #[must_use]
    pub fn registry(&self) -> &Arc<CacheRegistry> {
        &self.registry
    }

    /// Open a raw WebSocket connection to the server.
    pub async fn connect(&self) -> WebSocketStream<MaybeTlsStream<TcpStream>> {
        let (socket, _response) = connect_async(&self.ws_url())
            .await
            .expect("websocket connect");
        socket
    }
}

/// Poll `condition` until it holds or two seconds elapse.
///
/// The socket handler processes handshakes asynchronously, so tests must
/// wait for the registry to observe a state change rather than assuming it
/// happened by the time the frame was written.
pub async fn wait_until(mut condition: impl FnMut() -> bool) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while !condition() {
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not met within 2s"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
