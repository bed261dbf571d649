//! Wallet's local account book.
//!
//! Signing is done elsewhere (a browser extension, a hardware wallet, ...). The wallet
//! only remembers which accounts exist, so gifts can be sent from and claimed into them.

use gift_core::{
    traits::{AccountError, AccountProvider},
    Account,
};
use parity_scale_codec::{Decode, Encode};
use sled::{Db, Tree};

use crate::db::ACCOUNTS;

/// Accounts kept in the wallet database, in the order they were added.
pub struct AccountBook {
    db: Db,
    accounts: Tree,
}

impl AccountBook {
    pub fn open(db: &Db) -> anyhow::Result<Self> {
        Ok(AccountBook {
            db: db.clone(),
            accounts: db.open_tree(ACCOUNTS)?,
        })
    }

    /// Add an account, or update the name and source of one with the same address.
    pub fn insert_account(&self, account: &Account) -> anyhow::Result<()> {
        let key = match self.position(&account.address)? {
            Some(key) => key,
            None => self.db.generate_id()?.to_be_bytes().to_vec(),
        };
        self.accounts.insert(key, account.encode())?;
        self.accounts.flush()?;
        log::info!("Stored account {} ({})", account.name, account.address);
        Ok(())
    }

    /// Forget an account. Returns whether it was there.
    pub fn remove_account(&self, address: &str) -> anyhow::Result<bool> {
        let Some(key) = self.position(address)? else {
            return Ok(false);
        };
        self.accounts.remove(key)?;
        self.accounts.flush()?;
        Ok(true)
    }

    fn position(&self, address: &str) -> anyhow::Result<Option<Vec<u8>>> {
        for pair in self.accounts.iter() {
            let (key, ivec) = pair?;
            if Account::decode(&mut &ivec[..])?.address == address {
                return Ok(Some(key.to_vec()));
            }
        }
        Ok(None)
    }

    fn all(&self) -> anyhow::Result<Vec<Account>> {
        self.accounts
            .iter()
            .values()
            .map(|ivec| Ok(Account::decode(&mut &ivec?[..])?))
            .collect()
    }
}

impl AccountProvider for AccountBook {
    fn accounts(&self) -> Result<Vec<Account>, AccountError> {
        let accounts = self
            .all()
            .map_err(|e| AccountError::Provider(e.to_string()))?;
        if accounts.is_empty() {
            return Err(AccountError::NotConnected);
        }
        Ok(accounts)
    }
}
