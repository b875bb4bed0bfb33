//! Minimal loopback HTTP servers for end-to-end tests.
//!
//! [`spawn_collector`] stands in for the collection endpoint: it parses each
//! incoming request, replies `204 No Content`, and forwards what it saw onto
//! a channel. [`spawn_status_server`] stands in for an origin server that
//! always answers with a fixed status.
//!
//! Both run on plain std threads so they work regardless of which runtime
//! flavour the test uses.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::debug;

/// One request as seen by the collector.
#[derive(Debug, Clone)]
pub struct CollectedRequest {
    pub method: String,
    pub path: String,
    pub content_type: Option<String>,
    pub body: String,
}

/// Spawn the collector and return its URL plus the channel of received
/// requests. The listener thread runs until the test process exits.
pub fn spawn_collector() -> Result<(String, mpsc::UnboundedReceiver<CollectedRequest>)> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            match read_request(&mut stream) {
                Ok(request) => {
                    let _ = write!(stream, "HTTP/1.1 204 No Content\r\nconnection: close\r\n\r\n");
                    let _ = stream.flush();
                    let _ = tx.send(request);
                }
                Err(err) => debug!(error = %err, "collector failed to parse request"),
            }
        }
    });

    Ok((format!("http://{addr}/log"), rx))
}

/// Spawn an origin server answering every request with `status` and an
/// empty body.
pub fn spawn_status_server(status: u16) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;

    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            if read_request(&mut stream).is_err() {
                continue;
            }
            let _ = write!(
                stream,
                "HTTP/1.1 {status} Scripted\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
            );
            let _ = stream.flush();
        }
    });

    Ok(format!("http://{addr}/"))
}

fn read_request(stream: &mut TcpStream) -> Result<CollectedRequest> {
    let mut reader = BufReader::new(stream.try_clone()?);

    let mut request_line = String::new();
    reader.read_line(&mut request_line)?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next().unwrap_or_default().to_string();
    let path = parts.next().unwrap_or_default().to_string();

    let mut content_type = None;
    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line)?;
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            let value = value.trim();
            match name.to_ascii_lowercase().as_str() {
                "content-type" => content_type = Some(value.to_string()),
                "content-length" => content_length = value.parse().unwrap_or(0),
                _ => {}
            }
        }
    }

    let mut body = vec![0u8; content_length];
    reader.read_exact(&mut body)?;

    Ok(CollectedRequest {
        method,
        path,
        content_type,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}
