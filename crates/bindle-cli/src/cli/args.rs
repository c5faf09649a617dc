use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::commands::{keys, label, sign, verify};

#[derive(Parser, Debug)]
#[command(
    name = "bindle",
    version,
    about = "Sign and verify Bindle invoices with role-scoped Ed25519 keys"
)]
pub struct Cli {
    /// Keyring file (default: <config dir>/bindle/keyring.toml)
    #[arg(long, global = true, env = "BINDLE_KEYRING")]
    pub keyring: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage signing keys in the local keyring
    Keys(KeysArgs),
    /// Sign an invoice and append the signature
    Sign(sign::SignArgs),
    /// Verify every signature on an invoice against the keyring
    Verify(verify::VerifyArgs),
    /// Compute a parcel label for a file
    Label(label::LabelArgs),
    Version,
}

#[derive(Parser, Debug)]
pub struct KeysArgs {
    #[command(subcommand)]
    pub cmd: keys::KeysCmd,
}
