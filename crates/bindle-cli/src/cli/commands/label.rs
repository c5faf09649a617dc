//! `bindle label` - Compute a parcel label, optionally adding it to an invoice.

use anyhow::{Context, Result};
use clap::Args;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use bindle_signing::{Label, Parcel};

use super::sign::load_invoice;

#[derive(Args, Debug)]
pub struct LabelArgs {
    /// Parcel file
    pub file: PathBuf,

    /// Media type of the parcel
    #[arg(long, default_value = "application/octet-stream")]
    pub media_type: String,

    /// Parcel name (default: the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Append the parcel to this invoice (TOML) instead of printing the label
    #[arg(long)]
    pub invoice: Option<PathBuf>,
}

pub fn cmd_label(args: LabelArgs) -> i32 {
    match run_label(args) {
        Ok(()) => crate::exit_codes::SUCCESS,
        Err(e) => super::report(e, false),
    }
}

fn run_label(args: LabelArgs) -> Result<()> {
    let name = match args.name {
        Some(name) => name,
        None => file_name(&args.file)?,
    };

    let file = File::open(&args.file)
        .with_context(|| format!("failed to open parcel: {}", args.file.display()))?;
    let label = Label::from_reader(name, args.media_type, file)
        .with_context(|| format!("failed to hash parcel: {}", args.file.display()))?;

    let Some(invoice_path) = args.invoice else {
        print!("{}", toml::to_string(&label)?);
        return Ok(());
    };

    let mut invoice = load_invoice(&invoice_path)?;
    if !invoice.signatures().is_empty() {
        tracing::warn!(
            invoice = %invoice.name(),
            signatures = invoice.signatures().len(),
            "adding a parcel invalidates existing signatures"
        );
    }
    let sha256 = label.sha256.clone();
    invoice.parcel.push(Parcel {
        label,
        conditions: None,
    });

    fs::write(&invoice_path, invoice.to_toml()?)
        .with_context(|| format!("failed to write invoice: {}", invoice_path.display()))?;
    println!("Added parcel {} to {}", sha256, invoice_path.display());
    Ok(())
}

fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(String::from)
        .with_context(|| format!("cannot derive parcel name from {}", path.display()))
}
