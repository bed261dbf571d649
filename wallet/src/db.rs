//! This module is responsible for the wallet's local database of gifts and accounts.
//!
//! It is backed by a sled database
//!
//! ## Schema
//!
//! There are 4 tables in the database
//! Gifts      sequence:u64 => gift:GiftRecord
//! GiftIndex  gift_id:String => sequence:u64
//! Accounts   sequence:u64 => account:Account
//! Meta       b"genesis" => genesis_hash:String
//!
//! Sequences come from sled's id generator and are stored big-endian, so iterating the
//! gifts and accounts trees walks them in the order they were added.

use std::path::PathBuf;

use anyhow::anyhow;
use gift_core::{GiftId, GiftRecord, GiftStore};
use parity_scale_codec::{Decode, Encode};
use sled::{Db, IVec, Tree};

/// The identifier for the gifts tree in the db.
const GIFTS: &str = "gifts";

/// The identifier for the tree mapping gift ids to their sequence in the gifts tree.
const GIFT_INDEX: &str = "gift_index";

/// The identifier for the accounts tree in the db.
pub(crate) const ACCOUNTS: &str = "accounts";

/// The identifier for the meta tree in the db.
const META: &str = "meta";

/// Key in the meta tree under which the chain's genesis hash is kept.
const GENESIS_KEY: &[u8] = b"genesis";

/// Open (or create) the database at the given location.
pub(crate) fn open_db(db_path: PathBuf) -> anyhow::Result<Db> {
    let db = sled::open(&db_path)?;
    if db.was_recovered() {
        log::debug!("Found existing database at {db_path:?}.");
    } else {
        log::info!("Initialized fresh database at {db_path:?}.");
    }
    Ok(db)
}

/// Make sure the database belongs to the chain with the given genesis hash.
///
/// The first chain the database is used with is remembered. Using it with any other
/// chain afterwards is refused, since its gifts would refer to transfers that chain
/// never saw.
pub(crate) fn check_genesis(db: &Db, expected_genesis_hash: &str) -> anyhow::Result<()> {
    let meta = db.open_tree(META)?;

    let Some(ivec) = meta.get(GENESIS_KEY)? else {
        log::info!("Binding database to chain with genesis {expected_genesis_hash}");
        meta.insert(GENESIS_KEY, expected_genesis_hash.encode())?;
        return Ok(());
    };

    let wallet_genesis_hash = String::decode(&mut &ivec[..])?;
    if wallet_genesis_hash != expected_genesis_hash {
        log::error!("Wallet's genesis does not match expected. Aborting.");
        return Err(anyhow!("Node reports a different genesis block than wallet. Wallet: {wallet_genesis_hash}. Expected: {expected_genesis_hash}. Aborting all operations"));
    }
    Ok(())
}

/// A [`GiftStore`] that keeps gifts in the wallet database, in creation order.
#[derive(Clone)]
pub struct SledStore {
    db: Db,
    gifts: Tree,
    index: Tree,
}

impl SledStore {
    pub fn open(db: &Db) -> anyhow::Result<Self> {
        Ok(SledStore {
            db: db.clone(),
            gifts: db.open_tree(GIFTS)?,
            index: db.open_tree(GIFT_INDEX)?,
        })
    }

    /// The key of a gift in the gifts tree.
    fn sequence(&self, id: &GiftId) -> anyhow::Result<Option<IVec>> {
        Ok(self.index.get(id.as_str())?)
    }
}

impl GiftStore for SledStore {
    type Error = anyhow::Error;

    fn get(&self, id: &GiftId) -> anyhow::Result<Option<GiftRecord>> {
        let Some(key) = self.sequence(id)? else {
            return Ok(None);
        };
        let Some(ivec) = self.gifts.get(key)? else {
            return Ok(None);
        };
        Ok(Some(GiftRecord::decode(&mut &ivec[..])?))
    }

    fn insert(&mut self, record: GiftRecord) -> anyhow::Result<()> {
        let key = self.db.generate_id()?.to_be_bytes();
        self.gifts.insert(key, record.encode())?;
        // Written last: a gift is only reachable by id once its record is stored.
        self.index.insert(record.id.as_str(), key.to_vec())?;
        self.db.flush()?;
        Ok(())
    }

    fn replace(&mut self, current: &GiftRecord, new: GiftRecord) -> anyhow::Result<bool> {
        let Some(key) = self.sequence(&current.id)? else {
            return Ok(false);
        };
        let swapped = self
            .gifts
            .compare_and_swap(key, Some(current.encode()), Some(new.encode()))?;
        if swapped.is_err() {
            return Ok(false);
        }
        self.gifts.flush()?;
        Ok(true)
    }

    fn records(&self) -> anyhow::Result<Vec<GiftRecord>> {
        self.gifts
            .iter()
            .values()
            .map(|ivec| Ok(GiftRecord::decode(&mut &ivec?[..])?))
            .collect()
    }
}
