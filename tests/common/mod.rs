//! Shared utilities for integration testing.

#![allow(dead_code)]

use alloy::primitives::TxHash;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode, Uri};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use nft_minter::pinning::{ContentPinner, PinRequest, PinResult};
use nft_minter::pipeline::{
    Event, MintError, MintResult, PendingTransaction, TransactionReceipt, TransactionRequest,
    TransactionSubmitter,
};

/// A request received by the mock pinning service.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn body_json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

type Responder = dyn Fn(&RecordedRequest) -> (u16, String) + Send + Sync;

struct MockState {
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    respond: Box<Responder>,
}

/// Handle to a running mock pinning service.
pub struct MockPinata {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockPinata {
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

/// Start a programmable mock of the pinning API on an ephemeral port.
pub async fn start_mock_pinata<F>(respond: F) -> MockPinata
where
    F: Fn(&RecordedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(MockState {
        requests: requests.clone(),
        respond: Box::new(respond),
    });
    let app = Router::new().fallback(handle).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockPinata {
        url: format!("http://{}", addr),
        requests,
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, String) {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    let request = RecordedRequest {
        path: uri.path().to_string(),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body: body.to_vec(),
    };

    let (status, body) = (state.respond)(&request);
    state.requests.lock().unwrap().push(request);
    (
        StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        body,
    )
}

/// Start a listener that accepts connections and never answers.
pub async fn start_hanging_backend() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

/// Shared, ordered log of collaborator calls.
pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Pinner answering from a script, in order.
pub struct RecordingPinner {
    results: Mutex<VecDeque<MintResult<PinResult>>>,
    pub requests: Mutex<Vec<PinRequest>>,
    log: CallLog,
}

impl RecordingPinner {
    pub fn new(log: CallLog, results: Vec<MintResult<PinResult>>) -> Self {
        Self {
            results: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
            log,
        }
    }

    /// Answers every pin with the given content ids, in order.
    pub fn answering(log: CallLog, content_ids: &[&str]) -> Self {
        Self::new(
            log,
            content_ids
                .iter()
                .map(|id| {
                    Ok(PinResult {
                        content_id: id.to_string(),
                    })
                })
                .collect(),
        )
    }

    pub fn recorded(&self) -> Vec<PinRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentPinner for RecordingPinner {
    async fn pin(&self, request: PinRequest) -> MintResult<PinResult> {
        self.log.lock().unwrap().push(format!("pin:{}", request.kind()));
        self.requests.lock().unwrap().push(request);
        self.results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(MintError::PinningFailure("unscripted pin".to_string())))
    }
}

/// Submitter answering from a script and recording every request.
pub struct RecordingSubmitter {
    hash: TxHash,
    send_result: Mutex<Option<MintError>>,
    confirm_result: Mutex<Option<MintResult<Vec<Event>>>>,
    pub requests: Mutex<Vec<TransactionRequest>>,
    log: CallLog,
}

impl RecordingSubmitter {
    /// Accepts the transaction and confirms it with `events`.
    pub fn confirming(log: CallLog, hash: TxHash, events: Vec<Event>) -> Self {
        Self {
            hash,
            send_result: Mutex::new(None),
            confirm_result: Mutex::new(Some(Ok(events))),
            requests: Mutex::new(Vec::new()),
            log,
        }
    }

    /// Refuses the transaction at broadcast.
    pub fn rejecting(log: CallLog, reason: &str) -> Self {
        Self {
            hash: TxHash::ZERO,
            send_result: Mutex::new(Some(MintError::SubmissionRejected(reason.to_string()))),
            confirm_result: Mutex::new(None),
            requests: Mutex::new(Vec::new()),
            log,
        }
    }

    /// Accepts the transaction but fails confirmation with `error`.
    pub fn failing_confirmation(log: CallLog, hash: TxHash, error: MintError) -> Self {
        Self {
            hash,
            send_result: Mutex::new(None),
            confirm_result: Mutex::new(Some(Err(error))),
            requests: Mutex::new(Vec::new()),
            log,
        }
    }

    pub fn recorded(&self) -> Vec<TransactionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TransactionSubmitter for RecordingSubmitter {
    async fn send(&self, request: &TransactionRequest) -> MintResult<PendingTransaction> {
        self.log.lock().unwrap().push("send".to_string());
        self.requests.lock().unwrap().push(request.clone());
        if let Some(err) = self.send_result.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(PendingTransaction {
            hash: self.hash,
            description: request.description.clone(),
        })
    }

    async fn confirm(&self, pending: &PendingTransaction) -> MintResult<TransactionReceipt> {
        self.log.lock().unwrap().push("confirm".to_string());
        let scripted = self
            .confirm_result
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Err(MintError::SubmissionRejected("unscripted confirm".to_string())));
        scripted.map(|event_log| TransactionReceipt {
            transaction_hash: pending.hash,
            block_number: Some(1),
            event_log,
        })
    }
}

/// Receipt events of a factory deployment: the collection address is the
/// third event.
pub fn collection_events(address: &str) -> Vec<Event> {
    vec![
        Event::new(0, "OwnershipTransferred"),
        Event::new(1, "OwnershipTransferred"),
        Event::new(2, "CollectionCreated").with_arg("collectionAddress", address),
    ]
}

/// Answer of the mock JSON-RPC node to one call.
pub enum RpcReply {
    Result(Value),
    Error(String),
    /// Hold the request open well past any client timeout.
    Hang,
}

type RpcResponder = dyn Fn(&str, &Value) -> RpcReply + Send + Sync;

struct RpcState {
    calls: Arc<Mutex<Vec<(String, Value)>>>,
    reply: Box<RpcResponder>,
}

/// Handle to a running mock JSON-RPC node.
pub struct MockRpc {
    pub url: String,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockRpc {
    pub fn methods(&self) -> Vec<String> {
        self.calls.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    /// Params of the most recent call to `method`.
    pub fn params_of(&self, method: &str) -> Option<Value> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
    }
}

/// Start a programmable JSON-RPC node on an ephemeral port.
pub async fn start_mock_rpc<F>(reply: F) -> MockRpc
where
    F: Fn(&str, &Value) -> RpcReply + Send + Sync + 'static,
{
    let calls = Arc::new(Mutex::new(Vec::new()));
    let state = Arc::new(RpcState {
        calls: calls.clone(),
        reply: Box::new(reply),
    });
    let app = Router::new().fallback(rpc_handle).with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    MockRpc {
        url: format!("http://{}", addr),
        calls,
    }
}

async fn rpc_handle(State(state): State<Arc<RpcState>>, Json(body): Json<Value>) -> Json<Value> {
    match body {
        Value::Array(batch) => {
            let mut answers = Vec::with_capacity(batch.len());
            for call in batch {
                answers.push(rpc_answer(&state, call).await);
            }
            Json(Value::Array(answers))
        }
        call => Json(rpc_answer(&state, call).await),
    }
}

async fn rpc_answer(state: &RpcState, call: Value) -> Value {
    let id = call["id"].clone();
    let method = call["method"].as_str().unwrap_or_default().to_string();
    let params = call["params"].clone();
    state
        .calls
        .lock()
        .unwrap()
        .push((method.clone(), params.clone()));

    match (state.reply)(&method, &params) {
        RpcReply::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        RpcReply::Error(message) => json!({
            "jsonrpc": "2.0",
            "id": id,
            "error": { "code": -32000, "message": message },
        }),
        RpcReply::Hang => {
            tokio::time::sleep(Duration::from_secs(60)).await;
            json!({ "jsonrpc": "2.0", "id": id, "result": null })
        }
    }
}

/// Answers of a healthy local dev chain (chain id 31337, 1 gwei gas, head 5).
pub fn dev_chain_reply(method: &str) -> RpcReply {
    match method {
        "eth_chainId" => RpcReply::Result(json!("0x7a69")),
        "eth_gasPrice" => RpcReply::Result(json!("0x3b9aca00")),
        "eth_getTransactionCount" => RpcReply::Result(json!("0x0")),
        "eth_estimateGas" => RpcReply::Result(json!("0x5208")),
        "eth_feeHistory" => RpcReply::Result(json!({
            "oldestBlock": "0x4",
            "baseFeePerGas": ["0x3b9aca00", "0x3b9aca00"],
            "gasUsedRatio": [0.5],
            "reward": [["0x3b9aca00"]],
        })),
        "eth_blockNumber" => RpcReply::Result(json!("0x5")),
        "eth_getTransactionReceipt" => RpcReply::Result(Value::Null),
        other => RpcReply::Error(format!("method {} not mocked", other)),
    }
}

/// An RPC receipt for `hash` mined in `block`, without logs.
pub fn rpc_receipt(hash: TxHash, block: u64, success: bool) -> Value {
    json!({
        "type": "0x2",
        "status": if success { "0x1" } else { "0x0" },
        "cumulativeGasUsed": "0x5208",
        "logs": [],
        "logsBloom": format!("0x{}", "0".repeat(512)),
        "transactionHash": hash.to_string(),
        "transactionIndex": "0x0",
        "blockHash": format!("0x{}", "22".repeat(32)),
        "blockNumber": format!("{:#x}", block),
        "gasUsed": "0x5208",
        "effectiveGasPrice": "0x3b9aca00",
        "from": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266",
        "to": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
        "contractAddress": null,
    })
}
