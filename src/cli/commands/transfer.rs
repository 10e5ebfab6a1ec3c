use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use crate::config::config;
use crate::constants::NETWORK_NAME;
use crate::ledger::LedgerClient;
use crate::telemetry::generate_correlation_id;
use crate::workflow::{StatusEvent, TransferRequest, TransferWorkflow};

pub const PRIVATE_KEY_ENV: &str = "FOCUS_RECOVER_PRIVATE_KEY";

/// Summary of one run, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct TransferReport {
    pub correlation_id: String,
    pub network: &'static str,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub events: Vec<StatusEvent>,
}

impl TransferReport {
    pub fn succeeded(&self) -> bool {
        !self.events.iter().any(StatusEvent::is_failure)
    }
}

pub struct TransferCommand {
    pub account: String,
    pub token_id: String,
    pub recipient: String,
    pub include_eth: bool,
    pub json: bool,
}

impl TransferCommand {
    /// Returns `false` when the run ended with a failure event.
    pub async fn execute(&self) -> Result<bool> {
        eprintln!("⚠️  This tool has not been developed by the Focus Tree team. Use it at your own risk.");
        eprintln!("🔑 Your private key is only used to sign the transfers and is never stored.");

        let private_key = match std::env::var(PRIVATE_KEY_ENV) {
            Ok(key) if !key.trim().is_empty() => key,
            _ => {
                eprint!("Private Key: ");
                std::io::stderr().flush()?;
                read_private_key(BufReader::new(tokio::io::stdin())).await?
            }
        };

        let request = match TransferRequest::from_input(
            &self.account,
            &private_key,
            &self.token_id,
            &self.recipient,
            self.include_eth,
        ) {
            Ok(request) => request,
            Err(err) => {
                println!("Error: {err}");
                return Ok(false);
            }
        };

        let ledger = connect_ledger()?;
        let mut stdout = std::io::stdout();
        self.run_with_ledger(ledger.as_ref(), request, &mut stdout).await
    }

    /// Runs the workflow against `ledger`, writing either one status line per
    /// event as it happens or a single JSON report at the end.
    pub async fn run_with_ledger<L, W>(
        &self,
        ledger: &L,
        request: TransferRequest,
        out: &mut W,
    ) -> Result<bool>
    where
        L: LedgerClient + ?Sized,
        W: Write + Send,
    {
        let correlation_id = generate_correlation_id();
        let workflow = TransferWorkflow::new(ledger).with_correlation_id(correlation_id.clone());
        let started_at = Utc::now();

        if self.json {
            let events = workflow.run(request).await;
            let report = TransferReport {
                correlation_id,
                network: NETWORK_NAME,
                started_at,
                finished_at: Utc::now(),
                events,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
            return Ok(report.succeeded());
        }

        let mut write_result = Ok(());
        let events = workflow
            .run_with(request, |event| {
                if write_result.is_ok() {
                    write_result = writeln!(out, "{event}").and_then(|_| out.flush());
                }
            })
            .await;
        write_result.context("Failed to write status line")?;

        Ok(!events.iter().any(StatusEvent::is_failure))
    }
}

/// Reads one line holding the private key.
pub async fn read_private_key<R>(mut reader: R) -> Result<String>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .await
        .context("Failed to read the private key from stdin")?;

    let key = line.trim();
    if key.is_empty() {
        bail!("No private key provided; set {PRIVATE_KEY_ENV} or type it when asked");
    }
    Ok(key.to_string())
}

#[cfg(feature = "starknet")]
fn connect_ledger() -> Result<Box<dyn LedgerClient>> {
    use crate::ledger::{StarknetLedger, ThrottledLedger};

    let config = config()?;
    let backend = StarknetLedger::new(&config.ledger.rpc_url)?;
    tracing::info!(rpc_url = %config.ledger.rpc_url, "ledger backend ready");
    Ok(Box::new(ThrottledLedger::new(
        backend,
        config.ledger.throttle_settings(),
    )))
}

#[cfg(not(feature = "starknet"))]
fn connect_ledger() -> Result<Box<dyn LedgerClient>> {
    let config = config()?;
    bail!(
        "No ledger backend for {} in this build; rebuild with --features starknet",
        config.ledger.rpc_url
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::mocks::ScriptedLedger;
    use crate::ledger::{Felt, SecretKey, U256};

    fn command(json: bool) -> TransferCommand {
        TransferCommand {
            account: "0x5e4d".to_string(),
            token_id: "1337".to_string(),
            recipient: "0x7ec1".to_string(),
            include_eth: false,
            json,
        }
    }

    fn request() -> TransferRequest {
        TransferRequest::new(
            Felt::from(0x5e4du64),
            SecretKey::new(Felt::from(0x5ec7u64)),
            U256::from(1337u64),
            Felt::from(0x7ec1u64),
            false,
        )
    }

    fn ready_ledger() -> ScriptedLedger {
        let ledger = ScriptedLedger::new();
        ledger
            .deploy(Felt::from(0x5e4du64))
            .deploy(Felt::from(0x7ec1u64))
            .set_owner(Ok(Felt::from(0x5e4du64)))
            .set_balances(vec![U256::from(2u64) * U256::exp10(15)])
            .push_write_result(Ok(Felt::from(0xabcu64)));
        ledger
    }

    #[tokio::test]
    async fn streams_status_lines() {
        let ledger = ready_ledger();
        let mut out = Vec::new();

        let ok = command(false)
            .run_with_ledger(&ledger, request(), &mut out)
            .await
            .unwrap();

        assert!(ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "NFT transfer transaction hash: 0xabc\n"
        );
    }

    #[tokio::test]
    async fn failure_is_reported_and_returns_false() {
        let ledger = ScriptedLedger::new();
        let mut out = Vec::new();

        let ok = command(false)
            .run_with_ledger(&ledger, request(), &mut out)
            .await
            .unwrap();

        assert!(!ok);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Error: Account does not exist.\n"
        );
    }

    #[tokio::test]
    async fn json_report_carries_events_and_timestamps() {
        let ledger = ready_ledger();
        let mut out = Vec::new();

        let ok = command(true)
            .run_with_ledger(&ledger, request(), &mut out)
            .await
            .unwrap();
        assert!(ok);

        let report: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(report["network"], "SN_MAIN");
        assert!(report["correlation_id"].as_str().is_some());
        assert!(report["started_at"].as_str().is_some());
        assert!(report["finished_at"].as_str().is_some());
        assert_eq!(report["events"].as_array().unwrap().len(), 1);
        assert_eq!(report["events"][0]["status"], "success");
    }

    #[tokio::test]
    async fn private_key_is_read_from_the_first_line() {
        let key = read_private_key(&b"  0x5ec7  \nignored\n"[..]).await.unwrap();
        assert_eq!(key, "0x5ec7");
    }

    #[tokio::test]
    async fn empty_private_key_is_rejected() {
        let err = read_private_key(&b"\n"[..]).await.unwrap_err();
        assert!(err.to_string().contains(PRIVATE_KEY_ENV));
    }
}
