//! `bindle keys` - Generate and list signing keys.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use bindle_signing::{write_private_key, KeyringStore, SignatureKey, SignatureRole};

use crate::exit_codes;

#[derive(Subcommand, Debug)]
pub enum KeysCmd {
    /// Generate a key pair and add the public half to the keyring
    Create(CreateArgs),

    /// List keys in the keyring
    List(ListArgs),
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Identity the key speaks for, e.g. "Jane Doe <jane@example.com>"
    #[arg(long)]
    pub label: String,

    /// Roles the key may sign for (repeatable)
    #[arg(long = "role", default_value = "creator")]
    pub roles: Vec<SignatureRole>,

    /// Where to write the private key (base64, mode 0600)
    #[arg(long, default_value = "secret.key")]
    pub secret_file: PathBuf,

    /// Overwrite an existing private key file
    #[arg(long, short)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only keys authorized for this role
    #[arg(long)]
    pub role: Option<SignatureRole>,
}

pub fn cmd_keys(cmd: KeysCmd, store: &KeyringStore) -> i32 {
    let result = match cmd {
        KeysCmd::Create(args) => run_create(args, store),
        KeysCmd::List(args) => run_list(args, store),
    };
    match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => super::report(e, false),
    }
}

fn run_create(args: CreateArgs, store: &KeyringStore) -> Result<()> {
    if !args.force && args.secret_file.exists() {
        anyhow::bail!(
            "private key already exists: {} (use --force to overwrite)",
            args.secret_file.display()
        );
    }

    let (first, rest) = args
        .roles
        .split_first()
        .context("at least one --role is required")?;

    let (mut key, secret) = SignatureKey::generate(&args.label, *first);
    for role in rest {
        key.add_role(*role);
    }

    write_private_key(&args.secret_file, &secret).with_context(|| {
        format!(
            "failed to write private key: {}",
            args.secret_file.display()
        )
    })?;

    let public = key.key.clone();
    let roles = join_roles(&key.roles);
    if let Err(e) = store.add_key(key) {
        // No keyring entry means nothing can use the secret.
        let _ = std::fs::remove_file(&args.secret_file);
        return Err(anyhow::Error::new(e)
            .context(format!("failed to update keyring: {}", store.path().display())));
    }

    println!("Generated ed25519 signing key:");
    println!("  Label:       {}", args.label);
    println!("  Roles:       {}", roles);
    println!("  Public key:  {}", public);
    println!(
        "  Private key: {} (base64, mode 0600)",
        args.secret_file.display()
    );
    println!("  Keyring:     {}", store.path().display());

    Ok(())
}

fn run_list(args: ListArgs, store: &KeyringStore) -> Result<()> {
    let keyring = store
        .load()
        .with_context(|| format!("failed to load keyring: {}", store.path().display()))?;

    let keys: Vec<&SignatureKey> = match args.role {
        Some(role) => keyring.keys_for_role(role).collect(),
        None => keyring.keys().iter().collect(),
    };

    if keys.is_empty() {
        println!("No keys in {}", store.path().display());
        return Ok(());
    }

    for key in keys {
        let label_status = match key.verify_label() {
            Ok(()) => "ok",
            Err(_) => "INVALID",
        };
        println!("{}", key.label);
        println!("  roles:           {}", join_roles(&key.roles));
        println!("  key:             {}", key.key);
        println!("  label signature: {}", label_status);
    }

    Ok(())
}

fn join_roles(roles: &[SignatureRole]) -> String {
    roles
        .iter()
        .map(SignatureRole::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::exit_code_for;
    use bindle_signing::read_private_key;
    use tempfile::TempDir;

    #[test]
    fn test_create_writes_secret_and_keyring() {
        let temp = TempDir::new().unwrap();
        let store = KeyringStore::new(temp.path().join("keyring.toml"));
        let secret_file = temp.path().join("alice.key");

        run_create(
            CreateArgs {
                label: "Alice".to_string(),
                roles: vec![SignatureRole::Creator, SignatureRole::Approver],
                secret_file: secret_file.clone(),
                force: false,
            },
            &store,
        )
        .unwrap();

        let keyring = store.load().unwrap();
        let secret = read_private_key(&secret_file).unwrap();
        assert_eq!(keyring.len(), 1);
        assert!(keyring.keys()[0].matches(&secret));
        assert_eq!(
            keyring.keys()[0].roles,
            vec![SignatureRole::Creator, SignatureRole::Approver]
        );
    }

    #[test]
    fn test_create_removes_secret_when_keyring_fails() {
        let temp = TempDir::new().unwrap();
        let keyring_path = temp.path().join("keyring.toml");
        std::fs::create_dir(&keyring_path).unwrap();
        let store = KeyringStore::new(&keyring_path);
        let secret_file = temp.path().join("alice.key");

        let err = run_create(
            CreateArgs {
                label: "Alice".to_string(),
                roles: vec![SignatureRole::Creator],
                secret_file: secret_file.clone(),
                force: false,
            },
            &store,
        )
        .unwrap_err();

        assert_eq!(exit_code_for(&err), exit_codes::STORAGE);
        assert!(!secret_file.exists());
    }

    #[test]
    fn test_create_refuses_overwrite() {
        let temp = TempDir::new().unwrap();
        let store = KeyringStore::new(temp.path().join("keyring.toml"));
        let secret_file = temp.path().join("alice.key");
        std::fs::write(&secret_file, "existing").unwrap();

        let result = run_create(
            CreateArgs {
                label: "Alice".to_string(),
                roles: vec![SignatureRole::Creator],
                secret_file,
                force: false,
            },
            &store,
        );
        assert!(result.is_err());
        assert!(!store.path().exists());
    }
}
