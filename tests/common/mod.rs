//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use tokio::net::{TcpListener, TcpStream};

use mock_proxy::config::ProxyConfig;
use mock_proxy::http::HttpServer;
use mock_proxy::lifecycle::Shutdown;

/// Start the proxy on an ephemeral port and wait until it accepts
/// connections. The returned Shutdown must stay alive for the duration
/// of the test; dropping it stops the server.
pub async fn spawn_proxy(config: ProxyConfig) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config);
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, rx).await;
    });

    for _ in 0..50 {
        if TcpStream::connect(addr).await.is_ok() {
            return (addr, shutdown);
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("proxy did not start listening on {}", addr);
}

/// Write a mock file at `rel` (without the `.mock` extension) under the
/// data root, creating intermediate directories.
#[allow(dead_code)]
pub fn write_mock(data_root: &Path, rel: &str, body: &str) {
    let path = data_root.join(format!("{}.mock", rel));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}
