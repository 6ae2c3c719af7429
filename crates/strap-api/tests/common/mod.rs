//! Shared helpers for strap-api integration tests

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use strap_api::{create_router, AppState};
use strap_core::{HistoryDecoder, HistoryRecord, TempDirStaging};
use strap_proto::history::history_frame;
use strap_proto::WhoopHistoryDecoder;
use tokio::net::TcpListener;

/// A test server that shuts down when dropped
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
    handle: Option<tokio::task::JoinHandle<()>>,
}

impl TestServer {
    /// Serve `router` on an ephemeral local port
    pub async fn start(router: axum::Router) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("No local address");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();

        let handle = tokio::spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
                .ok();
        });

        // Give server a moment to start
        tokio::time::sleep(Duration::from_millis(10)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to build client");

        Self {
            addr,
            client,
            shutdown_tx: Some(shutdown_tx),
            handle: Some(handle),
        }
    }

    /// Serve the real decoder, staging into `dir`
    pub async fn with_staging_dir(dir: &Path) -> Self {
        Self::with_decoder(dir, Arc::new(WhoopHistoryDecoder::new())).await
    }

    /// Serve `decoder`, staging into `dir`
    pub async fn with_decoder(dir: &Path, decoder: Arc<dyn HistoryDecoder>) -> Self {
        let state = AppState::new(Arc::new(TempDirStaging::new(dir)), decoder);
        Self::start(create_router(state)).await
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST `bytes` as the `file` field of a multipart form
    pub async fn upload(&self, bytes: Vec<u8>) -> reqwest::Response {
        upload_with(&self.client, &self.url("/parser/parse-history"), bytes).await
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

/// POST `bytes` as the `file` field to `url`
pub async fn upload_with(client: &Client, url: &str, bytes: Vec<u8>) -> reqwest::Response {
    let part = Part::bytes(bytes)
        .file_name("historical_data_stream.bin")
        .mime_str("application/octet-stream")
        .expect("valid mime");
    let form = Form::new().part("file", part);

    client
        .post(url)
        .multipart(form)
        .send()
        .await
        .expect("Request failed")
}

/// Encode records as a captured history stream
pub fn history_stream(records: &[HistoryRecord]) -> Vec<u8> {
    records
        .iter()
        .enumerate()
        .flat_map(|(i, record)| history_frame(i as u32, record).expect("valid record"))
        .collect()
}

/// The three-sample fixture: heart rates 60, 62, 61
pub fn three_records() -> Vec<HistoryRecord> {
    vec![
        HistoryRecord::new(1_700_000_000, 0, 60, vec![1000, 995]),
        HistoryRecord::new(1_700_000_001, 16_384, 62, vec![968]),
        HistoryRecord::new(1_700_000_002, 0, 61, vec![984, 0, 1002, 990]),
    ]
}

/// Number of entries left in a staging directory
pub fn staged_count(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("staging dir").count()
}
