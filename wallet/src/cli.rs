//! Gift Wallet's Command Line Interface.
//!
//! Built with clap's derive macros.

use std::{net::SocketAddr, path::PathBuf};

use clap::{Args, Parser, Subcommand};
use gift_core::GiftId;

use crate::{
    amount_from_string, extrinsic_from_string, gift_id_from_string, recipient_from_string,
    DEFAULT_ENDPOINT, DEFAULT_ORIGIN,
};

/// The wallet's main CLI struct
#[derive(Debug, Parser)]
#[command(about, version)]
pub struct Cli {
    #[arg(long, short, default_value_t = DEFAULT_ENDPOINT.to_string())]
    /// RPC endpoint of the node that gift transfers are submitted to
    pub endpoint: String,

    #[arg(long, short)]
    /// Path where the wallet data is stored: gifts and known accounts.
    ///
    /// Default value is platform specific
    pub data_path: Option<PathBuf>,

    #[arg(long, short, default_value_t = DEFAULT_ORIGIN.to_string())]
    /// Origin of the web app that serves claim pages. Claim links are built on it.
    pub origin: String,

    #[arg(long)]
    /// Use a local stand-in chain that finalizes every transfer immediately.
    pub dev: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// The tasks supported by the wallet
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Remember an account so gifts can be sent from or claimed into it.
    AddAccount {
        /// A name to recognize the account by
        name: String,
        /// The account's address
        address: String,
        /// Where the account's keys live, e.g. the extension that signs for it
        #[arg(long, short, default_value = "cli")]
        source: String,
    },

    /// Show all the accounts the wallet knows about.
    ShowAccounts,

    /// Forget an account. Its keys are not touched.
    RemoveAccount {
        /// The address of the account to forget
        address: String,
    },

    /// Transfer an amount on chain and create a gift with a shareable claim link.
    SendGift(SendGiftArgs),

    /// Show a single gift.
    ShowGift {
        /// The gift's id
        #[arg(value_parser = gift_id_from_string)]
        gift_id: GiftId,
    },

    /// List every gift in the wallet.
    ListGifts,

    /// Open a claim link and show what is behind it, without claiming.
    LoadGift {
        /// A full claim link, or a path like /claim?giftId=...
        link: String,
    },

    /// Claim the gift behind a claim link.
    ClaimGift(ClaimGiftArgs),

    /// Serve the gift API over HTTP for browser based pages.
    Serve {
        /// Address to listen on
        #[arg(long, short, default_value = "127.0.0.1:3000")]
        listen: SocketAddr,
    },
}

#[derive(Debug, Args)]
pub struct SendGiftArgs {
    /// Name or address of the account to send from. Defaults to the first account.
    #[arg(long, short)]
    pub from: Option<String>,

    /// Address of the intended recipient. Informational only, anyone holding the link can claim.
    #[arg(long, short, value_parser = recipient_from_string)]
    pub recipient: String,

    /// Amount to gift, as a decimal string
    #[arg(long, short, value_parser = amount_from_string)]
    pub amount: String,

    /// Hex encoded, already signed balance transfer. Required unless using the dev chain.
    #[arg(long, short = 'x', value_parser = extrinsic_from_string)]
    pub extrinsic: Option<SignedTransfer>,
}

#[derive(Debug, Args)]
pub struct ClaimGiftArgs {
    /// A full claim link, or a path like /claim?giftId=...
    pub link: String,

    /// Name or address of the account to claim into. Defaults to the first account.
    #[arg(long, short)]
    pub from: Option<String>,
}

/// An encoded extrinsic that was signed outside the wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransfer(pub Vec<u8>);
