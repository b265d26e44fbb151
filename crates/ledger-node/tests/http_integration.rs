use ledger_core::{Ledger, MiningConfig, Puzzle, SharedLedger, SystemClock};
use ledger_node::{router, AppState};
use serde_json::Value;
use std::sync::Arc;

/// Serves a two-zero-puzzle node on an ephemeral port and returns its base URL.
async fn spawn_node(config: MiningConfig) -> anyhow::Result<(String, SharedLedger)> {
    let ledger = Ledger::with_config(Puzzle::new(2)?, Arc::new(SystemClock));
    let shared = SharedLedger::new(ledger, config);
    let app = router(AppState {
        ledger: shared.clone(),
    });
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });
    Ok((format!("http://{addr}"), shared))
}

async fn get_json(url: &str) -> anyhow::Result<(u16, Value)> {
    let res = reqwest::get(url).await?;
    let status = res.status().as_u16();
    Ok((status, res.json().await?))
}

#[tokio::test]
async fn health_endpoints() -> anyhow::Result<()> {
    let (base, _) = spawn_node(MiningConfig::default()).await?;
    for path in ["/health", "/healthz"] {
        let (status, body) = get_json(&format!("{base}{path}")).await?;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
    }
    Ok(())
}

#[tokio::test]
async fn fresh_node_serves_genesis() -> anyhow::Result<()> {
    let (base, shared) = spawn_node(MiningConfig::default()).await?;

    let (status, body) = get_json(&format!("{base}/get_chain")).await?;
    assert_eq!(status, 200);
    assert_eq!(body["length"], 1);
    assert_eq!(body["chain"][0]["sequence_number"], 1);
    assert_eq!(body["chain"][0]["solution"], 1);
    assert_eq!(body["chain"][0]["previous_digest"], "0");

    let (_, body) = get_json(&format!("{base}/chain/head")).await?;
    assert_eq!(body["height"], 1);
    assert_eq!(
        body["digest"],
        ledger_core::digest_of(&shared.latest_block())
    );

    let (_, body) = get_json(&format!("{base}/valid")).await?;
    assert_eq!(body["message"], "The Blockchain is valid.");
    Ok(())
}

#[tokio::test]
async fn mine_block_then_read_chain() -> anyhow::Result<()> {
    let (base, _) = spawn_node(MiningConfig::default()).await?;
    let (_, chain) = get_json(&format!("{base}/get_chain")).await?;
    let genesis: ledger_core::Block = serde_json::from_value(chain["chain"][0].clone())?;

    let (status, mined) = get_json(&format!("{base}/mine_block")).await?;
    assert_eq!(status, 200);
    assert_eq!(mined["message"], "A block is MINED");
    assert_eq!(mined["sequence_number"], 2);
    assert_eq!(mined["solution"], 308);
    assert_eq!(mined["previous_digest"], ledger_core::digest_of(&genesis));
    assert!(mined["created_at"].is_string());

    let (status, _) = get_json(&format!("{base}/mine_block")).await?;
    assert_eq!(status, 200);

    let (_, body) = get_json(&format!("{base}/get_chain")).await?;
    assert_eq!(body["length"], 3);
    assert_eq!(body["chain"].as_array().map(Vec::len), Some(3));

    let (_, body) = get_json(&format!("{base}/valid")).await?;
    assert_eq!(body["message"], "The Blockchain is valid.");
    Ok(())
}

#[tokio::test]
async fn cancelled_node_refuses_to_mine() -> anyhow::Result<()> {
    let (base, shared) = spawn_node(MiningConfig::default()).await?;
    shared.cancel_mining();

    let (status, body) = get_json(&format!("{base}/mine_block")).await?;
    assert_eq!(status, 503);
    assert!(body["error"].as_str().is_some_and(|e| e.contains("cancelled")));
    assert_eq!(shared.read_chain().length, 1);
    Ok(())
}

#[tokio::test]
async fn capped_search_is_unavailable() -> anyhow::Result<()> {
    let (base, shared) = spawn_node(MiningConfig {
        parallel: false,
        max_attempts: Some(10),
    })
    .await?;
    let (status, body) = get_json(&format!("{base}/mine_block")).await?;
    assert_eq!(status, 503);
    assert!(body["error"]
        .as_str()
        .is_some_and(|e| e.contains("no solution")));
    assert_eq!(shared.len(), 1);
    Ok(())
}
