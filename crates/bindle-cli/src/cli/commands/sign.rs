//! `bindle sign` - Sign an invoice.

use anyhow::{Context, Result};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

use bindle_signing::{
    generate_signature, read_private_key, Invoice, KeyringStore, SignatureRole,
};

#[derive(Args, Debug)]
pub struct SignArgs {
    /// Invoice file (TOML)
    pub invoice: PathBuf,

    /// Private key file (base64)
    #[arg(long)]
    pub secret_file: PathBuf,

    /// Role to sign as
    #[arg(long, default_value = "creator")]
    pub role: SignatureRole,

    /// Signing author (default: the keyring label of the key)
    #[arg(long)]
    pub author: Option<String>,

    /// Output file (required unless --in-place)
    #[arg(long, short)]
    pub out: Option<PathBuf>,

    /// Modify input file in place
    #[arg(long, conflicts_with = "out")]
    pub in_place: bool,
}

pub fn cmd_sign(args: SignArgs, store: &KeyringStore) -> i32 {
    match run_sign(args, store) {
        Ok(()) => crate::exit_codes::SUCCESS,
        Err(e) => super::report(e, false),
    }
}

fn run_sign(args: SignArgs, store: &KeyringStore) -> Result<()> {
    let output_path = if args.in_place {
        args.invoice.clone()
    } else if let Some(out) = args.out.clone() {
        out
    } else {
        anyhow::bail!("must specify --out <PATH> or --in-place");
    };

    let mut invoice = load_invoice(&args.invoice)?;

    let secret = read_private_key(&args.secret_file).with_context(|| {
        format!("failed to read private key: {}", args.secret_file.display())
    })?;

    let keyring = store
        .load()
        .with_context(|| format!("failed to load keyring: {}", store.path().display()))?;
    // The same key may be listed once per role.
    let entries: Vec<_> = keyring.keys().iter().filter(|k| k.matches(&secret)).collect();
    let key = entries
        .iter()
        .copied()
        .find(|k| k.includes_role(args.role))
        .or_else(|| entries.first().copied())
        .with_context(|| {
            format!(
                "no keyring entry for the key in {} (create one with `bindle keys create`)",
                args.secret_file.display()
            )
        })?;

    let author = args.author.as_deref().unwrap_or(&key.label);
    generate_signature(&mut invoice, author, args.role, key, &secret)
        .with_context(|| format!("failed to sign {}", invoice.name()))?;

    let content = invoice.to_toml()?;
    fs::write(&output_path, content)
        .with_context(|| format!("failed to write output: {}", output_path.display()))?;

    let sig = invoice
        .signatures()
        .last()
        .context("signature missing after signing")?;

    println!("Signed invoice {}:", invoice.name());
    println!("  Input:  {}", args.invoice.display());
    println!("  Output: {}", output_path.display());
    println!();
    println!("Signature:");
    println!("  by:   {}", sig.by);
    println!("  role: {}", sig.role);
    println!("  key:  {}", sig.key);
    println!("  at:   {}", sig.at);

    Ok(())
}

pub(crate) fn load_invoice(path: &Path) -> Result<Invoice> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read invoice: {}", path.display()))?;
    Invoice::from_toml(&content)
        .with_context(|| format!("failed to parse invoice: {}", path.display()))
}
