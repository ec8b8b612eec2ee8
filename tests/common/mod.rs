//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, TxHash, U256};
use serde_json::json;
use std::future::Future;
use std::io::Write;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;

use voote_deployer::blockchain::{BlockchainError, BlockchainResult, ChainBackend, DeploymentReceipt};

// Well-known test private key (Anvil's first account)
pub const TEST_PRIVATE_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

/// What the mock does when asked to broadcast.
#[derive(Clone)]
pub enum SubmitBehavior {
    Accept(TxHash),
    Reject(String),
}

/// What the mock does when asked to confirm.
#[derive(Clone)]
pub enum ConfirmBehavior {
    /// Confirm right away at this address.
    Immediate(Address),
    /// Confirm at this address once the notify fires.
    AfterSignal(Address, Arc<Notify>),
    Revert,
    Timeout(u64),
}

/// In-memory `ChainBackend` that records what it was asked to do.
pub struct MockBackend {
    pub deployer: Address,
    pub balance: U256,
    pub submit: SubmitBehavior,
    pub confirm: ConfirmBehavior,
    pub submitted: Mutex<Vec<Bytes>>,
    pub confirm_calls: Mutex<Vec<TxHash>>,
}

impl MockBackend {
    pub fn new(submit: SubmitBehavior, confirm: ConfirmBehavior) -> Self {
        Self {
            deployer: Address::repeat_byte(0x11),
            balance: U256::from(10u64).pow(U256::from(18u64)),
            submit,
            confirm,
            submitted: Mutex::new(Vec::new()),
            confirm_calls: Mutex::new(Vec::new()),
        }
    }

    /// Accept and confirm immediately at `address`.
    pub fn confirming_at(address: Address) -> Self {
        Self::new(
            SubmitBehavior::Accept(TxHash::repeat_byte(0xaa)),
            ConfirmBehavior::Immediate(address),
        )
    }

    pub fn rejecting(reason: &str) -> Self {
        Self::new(
            SubmitBehavior::Reject(reason.to_string()),
            ConfirmBehavior::Revert,
        )
    }
}

impl ChainBackend for MockBackend {
    fn deployer_address(&self) -> Address {
        self.deployer
    }

    async fn balance(&self) -> BlockchainResult<U256> {
        Ok(self.balance)
    }

    async fn submit(&self, init_code: Bytes) -> BlockchainResult<TxHash> {
        self.submitted.lock().unwrap().push(init_code);
        match &self.submit {
            SubmitBehavior::Accept(hash) => Ok(*hash),
            SubmitBehavior::Reject(reason) => Err(BlockchainError::Submission(reason.clone())),
        }
    }

    async fn confirm(&self, tx_hash: TxHash) -> BlockchainResult<DeploymentReceipt> {
        self.confirm_calls.lock().unwrap().push(tx_hash);
        let receipt = |address: Address| DeploymentReceipt {
            contract_address: address,
            tx_hash,
            block_number: 42,
            gas_used: 123_456,
        };

        match &self.confirm {
            ConfirmBehavior::Immediate(address) => Ok(receipt(*address)),
            ConfirmBehavior::AfterSignal(address, signal) => {
                signal.notified().await;
                Ok(receipt(*address))
            }
            ConfirmBehavior::Revert => Err(BlockchainError::Reverted(tx_hash)),
            ConfirmBehavior::Timeout(secs) => Err(BlockchainError::ConfirmationTimeout {
                tx_hash,
                secs: *secs,
            }),
        }
    }
}

/// `Write` sink that can be inspected from another task.
#[derive(Clone, Default)]
pub struct SharedBuf(pub Arc<Mutex<Vec<u8>>>);

impl SharedBuf {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Hardhat-style artifacts directory in a temp location, removed on drop.
pub struct TempArtifacts {
    pub root: PathBuf,
}

impl TempArtifacts {
    pub fn new() -> Self {
        let root = std::env::temp_dir().join(format!("voote-deployer-it-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&root).unwrap();
        Self { root }
    }

    /// Write `contracts/<name>.sol/<name>.json` with the given bytecode.
    pub fn contract(&self, name: &str, bytecode: &str) -> &Self {
        let source = format!("contracts/{}.sol", name);
        let dir = self.root.join(&source);
        std::fs::create_dir_all(&dir).unwrap();
        let artifact = json!({
            "_format": "hh-sol-artifact-1",
            "contractName": name,
            "sourceName": source,
            "abi": [],
            "bytecode": bytecode,
            "deployedBytecode": bytecode,
            "linkReferences": {},
            "deployedLinkReferences": {},
        });
        std::fs::write(dir.join(format!("{}.json", name)), artifact.to_string()).unwrap();
        self
    }

    /// Write build info for `name` compiled with `long_version`.
    pub fn build_info(&self, name: &str, long_version: &str) -> &Self {
        let short = long_version.split('+').next().unwrap_or(long_version);
        let build_dir = self.root.join("build-info");
        std::fs::create_dir_all(&build_dir).unwrap();
        std::fs::write(
            build_dir.join("deadbeef.json"),
            json!({
                "solcVersion": short,
                "solcLongVersion": long_version,
                "input": { "language": "Solidity", "sources": {}, "settings": {} },
            })
            .to_string(),
        )
        .unwrap();

        let dbg = self
            .root
            .join(format!("contracts/{}.sol/{}.dbg.json", name, name));
        std::fs::write(
            dbg,
            json!({ "_format": "hh-sol-dbg-1", "buildInfo": "../../build-info/deadbeef.json" })
                .to_string(),
        )
        .unwrap();
        self
    }
}

impl Drop for TempArtifacts {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Read one HTTP/1.1 request (headers and body) from `socket`.
async fn read_request(socket: &mut TcpStream) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = match socket.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        buf.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&buf);
        if let Some(header_end) = text.find("\r\n\r\n") {
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            if buf.len() >= header_end + 4 + content_length {
                break;
            }
        }
    }

    String::from_utf8_lossy(&buf).into_owned()
}

/// Body of a raw HTTP request.
pub fn request_body(request: &str) -> &str {
    request
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or("")
}

/// Start a programmable mock HTTP server. The handler sees the raw request
/// and returns `(status, json body)`.
pub async fn start_programmable_backend<F, Fut>(f: F) -> SocketAddr
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let f = Arc::new(f);

    tokio::spawn(async move {
        loop {
            match listener.accept().await {
                Ok((mut socket, _)) => {
                    let f = f.clone();
                    tokio::spawn(async move {
                        let request = read_request(&mut socket).await;
                        let (status, body) = f(request).await;
                        let status_text = match status {
                            200 => "200 OK",
                            400 => "400 Bad Request",
                            500 => "500 Internal Server Error",
                            _ => "200 OK",
                        };

                        let response = format!(
                            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                            status_text,
                            body.len(),
                            body
                        );
                        let _ = socket.write_all(response.as_bytes()).await;
                        let _ = socket.shutdown().await;
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    });
                }
                Err(_) => break,
            }
        }
    });

    addr
}
