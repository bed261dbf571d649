//! Seams to the external collaborators the gift workflows depend on.

use thiserror::Error;

use crate::types::Account;

/// Problems getting hold of an account to act with.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum AccountError {
    /// No accounts at all. Distinct from having accounts but picking none.
    #[error("Wallet not connected. No accounts are available.")]
    NotConnected,
    #[error("No account with address or name `{0}`.")]
    UnknownAccount(String),
    #[error("Account provider failed: {0}")]
    Provider(String),
}

/// Something that can list the accounts a user may act with.
pub trait AccountProvider {
    /// All available accounts. An empty list is reported as [`AccountError::NotConnected`].
    fn accounts(&self) -> Result<Vec<Account>, AccountError>;

    /// Pick the account matching `wanted` by address or name, or the first one when
    /// nothing in particular is wanted.
    fn select(&self, wanted: Option<&str>) -> Result<Account, AccountError> {
        let accounts = self.accounts()?;
        match wanted {
            Some(wanted) => accounts
                .into_iter()
                .find(|a| a.address == wanted || a.name == wanted)
                .ok_or_else(|| AccountError::UnknownAccount(wanted.to_owned())),
            None => accounts.into_iter().next().ok_or(AccountError::NotConnected),
        }
    }
}

impl AccountProvider for Vec<Account> {
    fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        if self.is_empty() {
            return Err(AccountError::NotConnected);
        }
        Ok(self.clone())
    }
}
