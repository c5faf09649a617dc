//! `bindle verify` - Verify the signatures on an invoice.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use bindle_signing::{verify_signatures, KeyringStore, SignatureRole, VerifyResult};

use super::sign::load_invoice;
use crate::exit_codes;

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Invoice file (TOML)
    pub invoice: PathBuf,

    /// Require at least one valid signature in this role (repeatable)
    #[arg(long = "require-role")]
    pub require_roles: Vec<SignatureRole>,

    /// Quiet mode - only exit code, no output
    #[arg(long, short)]
    pub quiet: bool,
}

pub fn cmd_verify(args: VerifyArgs, store: &KeyringStore) -> i32 {
    match run_verify(&args, store) {
        Ok(result) => {
            let missing = missing_roles(&result, &args.require_roles);
            if !missing.is_empty() {
                if !args.quiet {
                    eprintln!(
                        "error: no valid signature for required role(s): {}",
                        missing
                            .iter()
                            .map(SignatureRole::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    );
                }
                return exit_codes::UNTRUSTED;
            }
            exit_codes::SUCCESS
        }
        Err(e) => super::report(e, args.quiet),
    }
}

fn run_verify(args: &VerifyArgs, store: &KeyringStore) -> Result<VerifyResult> {
    let invoice = load_invoice(&args.invoice)?;
    let keyring = store
        .load()
        .with_context(|| format!("failed to load keyring: {}", store.path().display()))?;

    let result = verify_signatures(&invoice, keyring.keys())
        .with_context(|| format!("verification failed for {}", invoice.name()))?;

    if !args.quiet {
        if result.is_unsigned() {
            println!("Invoice {} has no signatures", invoice.name());
        } else {
            println!("Verification successful for {}!", invoice.name());
            println!();
            for sig in &result.verified {
                println!("  {} ({}) at {}", sig.by, sig.role, sig.at);
                println!("    key: {} [{}]", sig.key, sig.trusted_label);
            }
        }
    }

    Ok(result)
}

fn missing_roles(result: &VerifyResult, required: &[SignatureRole]) -> Vec<SignatureRole> {
    required
        .iter()
        .copied()
        .filter(|role| !result.has_role(*role))
        .collect()
}
