//! Command implementations.

pub mod keys;
pub mod label;
pub mod sign;
pub mod verify;

use std::path::PathBuf;

use bindle_signing::{KeyringStore, SignatureError};

use super::args::{Cli, Command};
use crate::exit_codes;

pub fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    let code = match cli.cmd {
        Command::Keys(args) => keys::cmd_keys(args.cmd, &keyring_store(cli.keyring)?),
        Command::Sign(args) => sign::cmd_sign(args, &keyring_store(cli.keyring)?),
        Command::Verify(args) => verify::cmd_verify(args, &keyring_store(cli.keyring)?),
        Command::Label(args) => label::cmd_label(args),
        Command::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
            exit_codes::SUCCESS
        }
    };
    Ok(code)
}

fn keyring_store(explicit: Option<PathBuf>) -> anyhow::Result<KeyringStore> {
    match explicit {
        Some(path) => Ok(KeyringStore::new(path)),
        None => Ok(KeyringStore::from_env()?),
    }
}

/// Map an error to an exit code, looking through anyhow context.
pub(crate) fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<SignatureError>() {
        Some(e) if e.is_trust_failure() => exit_codes::UNTRUSTED,
        Some(
            SignatureError::KeyringNotFound { .. }
            | SignatureError::Io { .. }
            | SignatureError::Serialize { .. },
        ) => exit_codes::STORAGE,
        Some(_) | None => exit_codes::ERROR,
    }
}

/// Print an error and return its exit code.
pub(crate) fn report(err: anyhow::Error, quiet: bool) -> i32 {
    if !quiet {
        eprintln!("error: {err:#}");
    }
    exit_code_for(&err)
}
