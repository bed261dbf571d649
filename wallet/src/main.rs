//! A CLI wallet for sending gifts through claim links, and an HTTP API for pages that do the same.

use std::path::PathBuf;

use anyhow::{anyhow, bail};
use clap::Parser;
use gift_core::{
    traits::AccountProvider, types::short_address, Account, GiftId, GiftLedger, GiftService,
};
use tracing_subscriber::EnvFilter;

mod accounts;
mod chain;
mod claim;
mod cli;
mod db;
mod rpc;
mod send;
mod server;

use accounts::AccountBook;
use chain::Chain;
use cli::{Cli, Command, SignedTransfer};
use db::SledStore;

/// The default RPC endpoint for the wallet to connect to
const DEFAULT_ENDPOINT: &str = "ws://localhost:9944";

/// The default origin claim links are built on
const DEFAULT_ORIGIN: &str = "http://localhost:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse command line args
    let cli = Cli::parse();

    // Setup the data paths.
    let data_path = match cli.data_path {
        Some(path) => path,
        None => default_data_path()?,
    };
    let db_path = data_path.join("gift_database");

    // Open the local database
    let db = db::open_db(db_path)?;
    let accounts = AccountBook::open(&db)?;
    let mut service = GiftService::new(GiftLedger::new(SledStore::open(&db)?), cli.origin);

    // Dispatch to proper subcommand
    let result = match cli.command {
        Command::AddAccount {
            name,
            address,
            source,
        } => accounts.insert_account(&Account {
            address,
            name,
            source,
        }),
        Command::ShowAccounts => {
            match accounts.accounts() {
                Ok(all) => all.iter().for_each(|account| {
                    println!(
                        "{:<16} {} [{}]",
                        account.name,
                        short_address(&account.address),
                        account.source
                    )
                }),
                Err(e) => println!("{e}"),
            }
            Ok(())
        }
        Command::RemoveAccount { address } => {
            if accounts.remove_account(&address)? {
                println!("Forgot account {address}");
            } else {
                println!("No account with address {address}");
            }
            Ok(())
        }
        Command::SendGift(args) => {
            let chain = Chain::connect(&cli.endpoint, cli.dev).await?;
            if let Some(genesis) = chain.genesis_hash().await? {
                db::check_genesis(&db, &genesis)?;
            }
            send::send_gift(&mut service, &accounts, &chain, args)
                .await
                .map(|_| ())
        }
        Command::ShowGift { gift_id } => claim::show_gift(&service, &gift_id),
        Command::ListGifts => claim::list_gifts(&service),
        Command::LoadGift { link } => claim::load_gift(&service, &link).map(|_| ()),
        Command::ClaimGift(args) => claim::claim_gift(&mut service, &accounts, args).map(|_| ()),
        Command::Serve { listen } => server::serve(service, listen).await,
    };

    db.flush_async().await?;
    result
}

/// Parse a gift amount. It must be a positive decimal number.
pub(crate) fn amount_from_string(s: &str) -> anyhow::Result<String> {
    let s = s.trim();
    match s.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(s.to_owned()),
        _ => bail!("Please enter a valid amount."),
    }
}

/// Parse a recipient address. Only emptiness is checked.
pub(crate) fn recipient_from_string(s: &str) -> anyhow::Result<String> {
    let s = s.trim();
    if s.is_empty() {
        bail!("Please enter a recipient address.");
    }
    Ok(s.to_owned())
}

/// Parse a hex encoded signed extrinsic
pub(crate) fn extrinsic_from_string(s: &str) -> anyhow::Result<SignedTransfer> {
    let bytes = hex::decode(strip_0x_prefix(s.trim()))?;
    if bytes.is_empty() {
        bail!("The signed transfer is empty");
    }
    Ok(SignedTransfer(bytes))
}

/// Parse a gift id
pub(crate) fn gift_id_from_string(s: &str) -> anyhow::Result<GiftId> {
    let s = s.trim();
    if s.is_empty() {
        bail!("A gift id cannot be empty");
    }
    Ok(GiftId::from(s))
}

/// Takes a string and checks for a 0x prefix. Returns a string without a 0x prefix.
fn strip_0x_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Generate the platform-specific default data path for the wallet
fn default_data_path() -> anyhow::Result<PathBuf> {
    // This uses the directories crate.
    // https://docs.rs/directories/latest/directories/struct.ProjectDirs.html
    let qualifier = "";
    let organization = "";
    let application = env!("CARGO_PKG_NAME");

    directories::ProjectDirs::from(qualifier, organization, application)
        .map(|dirs| dirs.data_dir().into())
        .ok_or(anyhow!("No home directory to keep wallet data in. Pass --data-path."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_must_be_positive_numbers() {
        assert_eq!(amount_from_string(" 2.5 ").unwrap(), "2.5");
        assert!(amount_from_string("0").is_err());
        assert!(amount_from_string("-1").is_err());
        assert!(amount_from_string("lots").is_err());
        assert!(amount_from_string("").is_err());
    }

    #[test]
    fn recipient_cannot_be_blank() {
        assert_eq!(recipient_from_string(" ADDR1 ").unwrap(), "ADDR1");
        assert!(recipient_from_string("   ").is_err());
    }

    #[test]
    fn extrinsic_accepts_optional_prefix() {
        assert_eq!(
            extrinsic_from_string("0xdead").unwrap(),
            SignedTransfer(vec![0xde, 0xad])
        );
        assert_eq!(
            extrinsic_from_string("beef").unwrap(),
            SignedTransfer(vec![0xbe, 0xef])
        );
        assert!(extrinsic_from_string("0x").is_err());
        assert!(extrinsic_from_string("zz").is_err());
    }

    #[test]
    fn strip_prefix_handles_short_input() {
        assert_eq!(strip_0x_prefix("0"), "0");
        assert_eq!(strip_0x_prefix("0x12"), "12");
    }

    #[test]
    fn cli_parses_send_gift() {
        let cli = Cli::try_parse_from([
            "gift-wallet",
            "--dev",
            "send-gift",
            "--recipient",
            "ADDR1",
            "--amount",
            "2.5",
        ])
        .unwrap();

        assert!(cli.dev);
        assert_eq!(cli.origin, DEFAULT_ORIGIN);
        let Command::SendGift(args) = cli.command else {
            panic!("expected send-gift");
        };
        assert_eq!(args.recipient, "ADDR1");
        assert_eq!(args.amount, "2.5");
        assert!(args.extrinsic.is_none());
    }

    #[test]
    fn cli_rejects_bad_amount() {
        assert!(Cli::try_parse_from([
            "gift-wallet",
            "send-gift",
            "--recipient",
            "ADDR1",
            "--amount",
            "0",
        ])
        .is_err());
    }
}
