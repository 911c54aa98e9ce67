//! Connection-token ledger.
//!
//! Members spend tokens to view contact details; admins grant them after an
//! out-of-band purchase. The ledger is the in-memory source of truth with a
//! single JSON state file behind it. Gateway callbacks are not handled here;
//! a grant is always an explicit admin action.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    #[error("no token account for `{0}`")]
    UnknownAccount(String),
    #[error("insufficient balance: need {needed}, have {available}")]
    InsufficientBalance { needed: u32, available: u32 },
}

/// Why a balance changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    SignupGrant,
    AdminGrant,
    Spend,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub kind: TransactionKind,
    pub amount: u32,
    pub note: String,
    pub at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenAccount {
    pub balance: u32,
    #[serde(default)]
    pub history: Vec<TokenTransaction>,
}

/// All token accounts, keyed by user email.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenLedger {
    accounts: HashMap<String, TokenAccount>,

    #[serde(skip)]
    state_path: Option<PathBuf>,
}

impl TokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the ledger from `<state>/ledger.json`, or start empty.
    pub fn load(state_dir: &Path) -> Result<Self> {
        let path = state_dir.join("ledger.json");
        let mut ledger = if path.exists() {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?
        } else {
            Self::new()
        };
        ledger.state_path = Some(path);
        Ok(ledger)
    }

    pub fn save(&self) -> Result<()> {
        let Some(ref path) = self.state_path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        fs::write(path, contents).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }

    pub fn balance(&self, user: &str) -> Result<u32, LedgerError> {
        self.accounts
            .get(&normalize(user))
            .map(|account| account.balance)
            .ok_or_else(|| LedgerError::UnknownAccount(user.to_string()))
    }

    pub fn history(&self, user: &str) -> Option<&[TokenTransaction]> {
        self.accounts
            .get(&normalize(user))
            .map(|account| account.history.as_slice())
    }

    /// Create the account if missing, applying the signup grant once.
    pub fn ensure_account(&mut self, user: &str, signup_grant: u32) -> u32 {
        let key = normalize(user);
        let account = self.accounts.entry(key.clone()).or_insert_with(|| {
            info!("Opened token account for {} (+{})", key, signup_grant);
            TokenAccount {
                balance: signup_grant,
                history: vec![TokenTransaction {
                    kind: TransactionKind::SignupGrant,
                    amount: signup_grant,
                    note: "signup grant".to_string(),
                    at: Utc::now(),
                }],
            }
        });
        account.balance
    }

    /// Admin grant after an out-of-band purchase.
    pub fn grant(&mut self, user: &str, amount: u32, note: &str) -> Result<u32, LedgerError> {
        let account = self
            .accounts
            .get_mut(&normalize(user))
            .ok_or_else(|| LedgerError::UnknownAccount(user.to_string()))?;
        account.balance += amount;
        account.history.push(TokenTransaction {
            kind: TransactionKind::AdminGrant,
            amount,
            note: note.to_string(),
            at: Utc::now(),
        });
        Ok(account.balance)
    }

    /// Spend tokens, failing without mutation when the balance is short.
    pub fn spend(&mut self, user: &str, amount: u32, note: &str) -> Result<u32, LedgerError> {
        let account = self
            .accounts
            .get_mut(&normalize(user))
            .ok_or_else(|| LedgerError::UnknownAccount(user.to_string()))?;
        if account.balance < amount {
            return Err(LedgerError::InsufficientBalance {
                needed: amount,
                available: account.balance,
            });
        }
        account.balance -= amount;
        account.history.push(TokenTransaction {
            kind: TransactionKind::Spend,
            amount,
            note: note.to_string(),
            at: Utc::now(),
        });
        Ok(account.balance)
    }

    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }
}

fn normalize(user: &str) -> String {
    user.trim().to_lowercase()
}
