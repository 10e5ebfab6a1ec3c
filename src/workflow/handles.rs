use crate::ledger::{
    AccountKey, ContractCall, ContractInterface, Felt, LedgerClient, LedgerError, U256,
};

/// Signing capability for one run: the ledger plus the sender's key.
pub struct AccountHandle<'a, L: ?Sized> {
    ledger: &'a L,
    key: AccountKey,
}

impl<'a, L: LedgerClient + ?Sized> AccountHandle<'a, L> {
    pub fn new(ledger: &'a L, key: AccountKey) -> Self {
        Self { ledger, key }
    }

    pub async fn estimate_fee(&self, call: &ContractCall) -> Result<U256, LedgerError> {
        self.ledger.estimate_fee(&self.key, call).await
    }

    pub async fn execute(&self, call: &ContractCall) -> Result<Felt, LedgerError> {
        self.ledger.submit_write(&self.key, call).await
    }
}

/// A contract bound to its interface descriptor.
///
/// Reads go straight to the ledger. Writes and fee estimates go through the
/// connected account, so a handle without one can only read.
pub struct AssetContractHandle<'a, L: ?Sized> {
    ledger: &'a L,
    address: Felt,
    interface: ContractInterface,
    account: Option<&'a AccountHandle<'a, L>>,
}

impl<'a, L: LedgerClient + ?Sized> AssetContractHandle<'a, L> {
    pub fn new(ledger: &'a L, address: Felt, interface: ContractInterface) -> Self {
        Self {
            ledger,
            address,
            interface,
            account: None,
        }
    }

    /// Uses `account` as the calling identity for writes.
    pub fn connect(mut self, account: &'a AccountHandle<'a, L>) -> Self {
        self.account = Some(account);
        self
    }

    /// Builds a call, refusing entrypoints the contract does not expose.
    pub fn call(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<ContractCall, LedgerError> {
        if self.interface.entrypoint(entrypoint).is_none() {
            return Err(LedgerError::UnknownEntrypoint {
                contract: self.address,
                entrypoint: entrypoint.to_string(),
            });
        }
        Ok(ContractCall::new(self.address, entrypoint, calldata))
    }

    pub async fn read(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<Vec<Felt>, LedgerError> {
        let call = self.call(entrypoint, calldata)?;
        self.ledger.call_read(&call).await
    }

    pub async fn estimate_fee(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<U256, LedgerError> {
        let call = self.call(entrypoint, calldata)?;
        self.connected(entrypoint)?.estimate_fee(&call).await
    }

    pub async fn invoke(&self, entrypoint: &str, calldata: Vec<Felt>) -> Result<Felt, LedgerError> {
        let call = self.call(entrypoint, calldata)?;
        self.connected(entrypoint)?.execute(&call).await
    }

    fn connected(&self, entrypoint: &str) -> Result<&'a AccountHandle<'a, L>, LedgerError> {
        self.account.ok_or_else(|| LedgerError::NotConnected {
            entrypoint: entrypoint.to_string(),
        })
    }
}
