//! Line-oriented TCP server.
//!
//! One task per connection. A session reads newline-delimited JSON
//! statements and answers each with one JSON response line. Statement
//! execution touches the filesystem, so it runs on the blocking pool.

use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

use crate::api::{self, ErrorBody, Response};
use crate::config::Config;
use crate::observability::logger;
use crate::table::Catalog;

/// Bind per the config and serve until the process exits.
pub async fn run(config: &Config) -> std::io::Result<()> {
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let catalog = Arc::new(Catalog::from_config(config));
    logger::info("server_started", &[("addr", &config.bind_addr())]);
    serve(listener, catalog).await
}

/// Accept-loop over an already-bound listener.
pub async fn serve(listener: TcpListener, catalog: Arc<Catalog>) -> std::io::Result<()> {
    loop {
        let (stream, peer) = listener.accept().await?;
        let catalog = Arc::clone(&catalog);
        tokio::spawn(async move {
            let peer = peer.to_string();
            logger::info("client_connected", &[("peer", &peer)]);
            match handle_session(stream, catalog).await {
                Ok(()) => logger::info("client_disconnected", &[("peer", &peer)]),
                Err(err) => logger::warn(
                    "session_failed",
                    &[("peer", &peer), ("error", &err.to_string())],
                ),
            }
        });
    }
}

async fn handle_session(stream: TcpStream, catalog: Arc<Catalog>) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            continue;
        }

        let worker_catalog = Arc::clone(&catalog);
        let response = match tokio::task::spawn_blocking(move || {
            api::execute_line(&worker_catalog, &line)
        })
        .await
        {
            Ok(response) => response,
            Err(join_err) => Response {
                ok: false,
                table: None,
                schema: None,
                result: None,
                error: Some(ErrorBody {
                    code: "SLAB_INTERNAL".to_string(),
                    message: join_err.to_string(),
                }),
            },
        };

        write_half.write_all(response.to_json().as_bytes()).await?;
        write_half.write_all(b"\n").await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::DEFAULT_SLOT_SIZE;
    use tempfile::TempDir;
    use tokio::io::AsyncReadExt;

    async fn start_test_server(tmp: &TempDir) -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let catalog = Arc::new(Catalog::new(tmp.path(), DEFAULT_SLOT_SIZE));
        tokio::spawn(async move {
            let _ = serve(listener, catalog).await;
        });
        addr
    }

    async fn send_line(stream: &mut TcpStream, line: &str) -> serde_json::Value {
        stream.write_all(line.as_bytes()).await.unwrap();
        stream.write_all(b"\n").await.unwrap();

        let mut response = Vec::new();
        let mut byte = [0u8; 1];
        loop {
            let n = stream.read(&mut byte).await.unwrap();
            if n == 0 || byte[0] == b'\n' {
                break;
            }
            response.push(byte[0]);
        }
        serde_json::from_slice(&response).unwrap()
    }

    #[tokio::test]
    async fn test_session_round_trip() {
        let tmp = TempDir::new().unwrap();
        let addr = start_test_server(&tmp).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let created = send_line(
            &mut stream,
            r#"{"stmt":"create_table","table":"t","schema":{"properties":{"id":{"type":"string"},"age":{"type":"integer"}}}}"#,
        )
        .await;
        assert_eq!(created["ok"], true);

        let inserted = send_line(
            &mut stream,
            r#"{"stmt":"insert","table":"t","row":{"id":"u1","age":5}}"#,
        )
        .await;
        assert_eq!(inserted["ok"], true);

        let selected = send_line(
            &mut stream,
            r#"{"stmt":"select","table":"t","where":{"column":"age","operator":"=","value":5}}"#,
        )
        .await;
        assert_eq!(selected["ok"], true);
        assert_eq!(selected["result"][0]["id"], "u1");
    }

    #[tokio::test]
    async fn test_bad_line_gets_error_response() {
        let tmp = TempDir::new().unwrap();
        let addr = start_test_server(&tmp).await;
        let mut stream = TcpStream::connect(addr).await.unwrap();

        let response = send_line(&mut stream, "this is not a statement").await;
        assert_eq!(response["ok"], false);
        assert_eq!(response["error"]["code"], "SLAB_MALFORMED_STATEMENT");
    }

    #[tokio::test]
    async fn test_two_sessions_share_one_catalog() {
        let tmp = TempDir::new().unwrap();
        let addr = start_test_server(&tmp).await;

        let mut first = TcpStream::connect(addr).await.unwrap();
        let created = send_line(
            &mut first,
            r#"{"stmt":"create_table","table":"t","schema":{"properties":{"id":{"type":"string"}}}}"#,
        )
        .await;
        assert_eq!(created["ok"], true);

        let mut second = TcpStream::connect(addr).await.unwrap();
        let inserted = send_line(
            &mut second,
            r#"{"stmt":"insert","table":"t","row":{"id":"u1"}}"#,
        )
        .await;
        assert_eq!(inserted["ok"], true);

        let selected = send_line(&mut first, r#"{"stmt":"select","table":"t"}"#).await;
        assert_eq!(selected["result"].as_array().unwrap().len(), 1);
    }
}
