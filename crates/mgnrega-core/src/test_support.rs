//! Helpers shared by the unit tests: a one-shot loopback HTTP server and a
//! scripted record source.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::api::{ApiError, RecordSource};
use crate::models::Record;

/// Serve exactly one HTTP response on a loopback port.
///
/// Returns the base URL and a handle resolving to the request line the
/// client sent.
pub async fn serve_once(status: &str, body: &str) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read request");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        socket.write_all(response.as_bytes()).await.expect("write response");
        socket.shutdown().await.ok();

        String::from_utf8_lossy(&request)
            .lines()
            .next()
            .unwrap_or_default()
            .to_string()
    });

    (format!("http://{}", addr), handle)
}

/// Accept connections but never answer.
pub async fn serve_silently() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

/// URL of a loopback port nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);
    format!("http://{}", addr)
}

/// How a scripted year behaves when fetched.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(Vec<Record>),
    RespondAfter(Duration, Vec<Record>),
    Fail,
    FailAfter(Duration),
}

/// Record source driven by a per-year script. Unscripted years fail.
/// Clones share the script, so a test can change it between calls.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    scripts: Arc<Mutex<HashMap<String, Script>>>,
    calls: Arc<Mutex<Vec<String>>>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, year: &str, script: Script) -> &Self {
        self.scripts.lock().unwrap().insert(year.to_string(), script);
        self
    }

    pub fn fail_all(&self) {
        self.scripts.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    /// Highest number of fetches that were running at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }
}

impl RecordSource for ScriptedSource {
    async fn fetch_year(&self, year: &str) -> Result<Vec<Record>, ApiError> {
        self.calls.lock().unwrap().push(year.to_string());
        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);

        let script = self.scripts.lock().unwrap().get(year).cloned();
        let result = match script {
            Some(Script::Respond(records)) => Ok(records),
            Some(Script::RespondAfter(delay, records)) => {
                tokio::time::sleep(delay).await;
                Ok(records)
            }
            Some(Script::FailAfter(delay)) => {
                tokio::time::sleep(delay).await;
                Err(ApiError::ServerError(format!("{} timed out", year)))
            }
            Some(Script::Fail) | None => Err(ApiError::ServerError(format!("{} unavailable", year))),
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Record for `district` with the given month and expenditure.
pub fn record(district: &str, month: &str, total_exp: f64) -> Record {
    Record {
        district_name: Some(district.to_string()),
        month: Some(month.to_string()),
        total_exp,
        ..Default::default()
    }
}
