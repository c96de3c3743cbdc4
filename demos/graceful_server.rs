//! # Example: graceful_server
//!
//! TCP echo server served through the [`Coordinator`], with every connection
//! handled as a tracked task of a [`Supervisor`].
//!
//! Demonstrates how to:
//! - Implement [`Listener`] for a server with its own accept loop.
//! - Register a middleware around every connection task.
//! - Sequence shutdown: serve → wait for tracked tasks → cleanup.
//!
//! ## Flow
//! ```text
//! main
//!   ├─► Coordinator::listen_and_serve(server)
//!   │     ├─► serve(): accept loop ─► sup.run_context(conn_ctx, echo)
//!   │     └─► SIGINT/SIGTERM ─► shutdown(): stop accepting, cancel conn_ctx
//!   ├─► sup.wait()      (in-flight connections drain)
//!   └─► sup.cleanup()
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example graceful_server
//! # in another terminal: nc 127.0.0.1 7878, then Ctrl-C the server
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use graceful::{Coordinator, Listener, ServeError, Supervisor, TaskBody};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

struct EchoServer {
    addr: &'static str,
    sup: Arc<Supervisor>,
    stop: CancellationToken,
}

#[async_trait]
impl Listener for EchoServer {
    type Error = std::io::Error;

    async fn serve(&self) -> Result<(), Self::Error> {
        let listener = TcpListener::bind(self.addr).await?;
        println!("[server] listening on {}", self.addr);

        loop {
            tokio::select! {
                _ = self.stop.cancelled() => return Ok(()),
                accepted = listener.accept() => {
                    let (mut socket, peer) = accepted?;
                    self.sup.run_context(self.stop.child_token(), move |ctx| async move {
                        let mut buf = [0u8; 1024];
                        loop {
                            let n = tokio::select! {
                                _ = ctx.cancelled() => break,
                                read = socket.read(&mut buf) => match read {
                                    Ok(0) | Err(_) => break,
                                    Ok(n) => n,
                                },
                            };
                            if socket.write_all(&buf[..n]).await.is_err() {
                                break;
                            }
                        }
                        println!("[conn] {peer} closed");
                    });
                }
            }
        }
    }

    async fn shutdown(&self, deadline: Option<Duration>) -> Result<(), Self::Error> {
        println!("[server] shutting down (deadline={deadline:?})");
        self.stop.cancel();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let sup = Arc::new(
        Supervisor::builder()
            .with_debug_logger(|line: &str| println!("[debug] {line}"))
            .with_middleware(|next: TaskBody| {
                TaskBody::new(move |ctx| async move {
                    println!("[conn] start");
                    next.call(ctx).await;
                    println!("[conn] done");
                })
            })
            .build(),
    );
    sup.add_cleanup(|| {
        println!("[cleanup] flushed");
        Ok(())
    });

    let server = Arc::new(EchoServer {
        addr: "127.0.0.1:7878",
        sup: Arc::clone(&sup),
        stop: CancellationToken::new(),
    });

    match Coordinator::default().listen_and_serve(server).await {
        Ok(()) | Err(ServeError::Closed) => {}
        Err(e) => eprintln!("[server] {e}"),
    }

    sup.wait().await;
    sup.cleanup()?;
    println!("[server] bye");
    Ok(())
}
