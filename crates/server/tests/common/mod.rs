use anyhow::Context as _;
use std::process::{Child, Command};
use std::time::Duration;

pub use productboard_mcp_test_support::KillOnDrop;

pub fn pick_unused_port() -> anyhow::Result<u16> {
    productboard_mcp_test_support::pick_unused_port()
}

pub async fn wait_http_ok(url: &str, timeout_dur: Duration) -> anyhow::Result<()> {
    productboard_mcp_test_support::wait_http_ok(url, timeout_dur).await
}

const INHERITED_ENV: &[&str] = &[
    "PRODUCTBOARD_API_TOKEN",
    "PRODUCTBOARD_BASE_URL",
    "PRODUCTBOARD_API_VERSION",
    "PRODUCTBOARD_TIMEOUT_SECS",
    "PRODUCTBOARD_MCP_BIND",
    "PRODUCTBOARD_MCP_TRANSPORT",
    "PRODUCTBOARD_MCP_CONFIG",
    "PRODUCTBOARD_MCP_LOG",
];

pub fn spawn_server(port: u16, base_url: &str) -> anyhow::Result<Child> {
    let bin = env!("CARGO_BIN_EXE_productboard-mcp");
    let mut cmd = Command::new(bin);
    for var in INHERITED_ENV {
        cmd.env_remove(var);
    }
    cmd.arg("--bind")
        .arg(format!("127.0.0.1:{port}"))
        .arg("--base-url")
        .arg(base_url)
        .arg("--api-token")
        .arg("test-token")
        .arg("--log-level")
        .arg("info")
        .spawn()
        .context("spawn productboard-mcp")
}

/// Spawn the server and wait until `/health` answers. Returns the guard and the base URL.
pub async fn start_server(upstream_base_url: &str) -> anyhow::Result<(KillOnDrop, String)> {
    let port = pick_unused_port()?;
    let child = KillOnDrop(spawn_server(port, upstream_base_url)?);
    let base = format!("http://127.0.0.1:{port}");
    wait_http_ok(&format!("{base}/health"), Duration::from_secs(20)).await?;
    Ok((child, base))
}
