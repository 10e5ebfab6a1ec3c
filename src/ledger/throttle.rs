use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{AccountKey, ContractCall, ContractInterface, Felt, LedgerClient, LedgerError, U256};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleSettings {
    pub requests_per_second: u32,
    pub burst_capacity: u32,
    pub request_timeout: Duration,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        // Public mainnet endpoints throttle aggressively; stay well below.
        Self {
            requests_per_second: 5,
            burst_capacity: 10,
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Rate-limited, time-bounded wrapper around any [`LedgerClient`].
///
/// Calls are never retried here: a write that timed out may still land on
/// chain, so the caller decides what to do next.
pub struct ThrottledLedger<L> {
    inner: L,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
    request_timeout: Duration,
}

impl<L: fmt::Debug> fmt::Debug for ThrottledLedger<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThrottledLedger")
            .field("inner", &self.inner)
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}

impl<L: LedgerClient> ThrottledLedger<L> {
    pub fn new(inner: L, settings: ThrottleSettings) -> Self {
        let per_second = NonZeroU32::new(settings.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let burst = NonZeroU32::new(settings.burst_capacity).unwrap_or(NonZeroU32::MIN);
        let quota = Quota::per_second(per_second).allow_burst(burst);

        Self {
            inner,
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
            request_timeout: settings.request_timeout,
        }
    }

    async fn guarded<T, F>(&self, operation: &str, request: F) -> Result<T, LedgerError>
    where
        F: Future<Output = Result<T, LedgerError>>,
    {
        self.rate_limiter.until_ready().await;
        debug!(operation, "ledger request admitted by rate limiter");

        match tokio::time::timeout(self.request_timeout, request).await {
            Ok(result) => result,
            Err(_) => {
                let duration_ms = self.request_timeout.as_millis() as u64;
                warn!(operation, duration_ms, "ledger request timed out");
                Err(LedgerError::Timeout {
                    operation: operation.to_string(),
                    duration_ms,
                })
            }
        }
    }
}

#[async_trait]
impl<L: LedgerClient> LedgerClient for ThrottledLedger<L> {
    async fn get_deployed_code(&self, address: Felt) -> Result<Vec<u8>, LedgerError> {
        self.guarded("get_deployed_code", self.inner.get_deployed_code(address))
            .await
    }

    async fn get_contract_interface(
        &self,
        address: Felt,
    ) -> Result<ContractInterface, LedgerError> {
        self.guarded(
            "get_contract_interface",
            self.inner.get_contract_interface(address),
        )
        .await
    }

    async fn call_read(&self, call: &ContractCall) -> Result<Vec<Felt>, LedgerError> {
        self.guarded("call_read", self.inner.call_read(call)).await
    }

    async fn estimate_fee(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<U256, LedgerError> {
        self.guarded("estimate_fee", self.inner.estimate_fee(account, call))
            .await
    }

    async fn submit_write(
        &self,
        account: &AccountKey,
        call: &ContractCall,
    ) -> Result<Felt, LedgerError> {
        self.guarded("submit_write", self.inner.submit_write(account, call))
            .await
    }
}
