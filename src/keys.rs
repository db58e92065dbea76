//! Key-file loading.
//!
//! One private key per line; blank lines are skipped and surrounding
//! whitespace is trimmed. No header, comments or escaping.

use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use crate::types::{Account, BridgeError};

/// Split key-file contents into accounts, preserving input order.
/// Duplicates are kept.
pub fn parse_keys(contents: &str) -> Vec<Account> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(Account::new)
        .collect()
}

/// Read and parse the key file, then check that every key is usable.
///
/// Any malformed key aborts here, before a single account is processed.
pub fn load_accounts(path: impl AsRef<Path>) -> Result<Vec<Account>> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read key file: {}", path.display()))?;

    let accounts = parse_keys(&contents);
    if accounts.is_empty() {
        return Err(BridgeError::EmptyKeyFile(path.display().to_string()).into());
    }

    validate_keys(&contents)?;
    info!(path = %path.display(), accounts = accounts.len(), "Accounts loaded");

    Ok(accounts)
}

/// Parse every non-blank line into a signer, reporting the 1-based line of the
/// first bad key.
fn validate_keys(contents: &str) -> Result<(), BridgeError> {
    for (idx, line) in contents.lines().enumerate() {
        let key = line.trim();
        if key.is_empty() {
            continue;
        }
        Account::new(key)
            .signer()
            .map_err(|e| BridgeError::InputFormat {
                line: idx + 1,
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
