use serde::Serialize;

use crate::store::StoreSnapshot;
use crate::{ClientError, ClientResult};

pub const CREDENTIAL_PREFIX: &str = "sk-";

/// Credential and monthly budget; both are required before expenses can be logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetProfile {
    pub credential: String,
    pub monthly_budget: u64,
}

impl BudgetProfile {
    pub fn parse(credential: &str, budget: &str, command: &str) -> ClientResult<Self> {
        Ok(Self {
            credential: validate_credential(credential, command)?,
            monthly_budget: parse_budget(budget, command)?,
        })
    }

    /// Returns the stored profile, or `setup_required` when either field is missing.
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> ClientResult<Self> {
        if snapshot.credential.is_empty() || snapshot.monthly_budget == 0 {
            return Err(ClientError::setup_required());
        }
        Ok(Self {
            credential: snapshot.credential.clone(),
            monthly_budget: snapshot.monthly_budget,
        })
    }

    pub fn masked_credential(&self) -> String {
        mask_credential(&self.credential)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileSummary {
    pub api_key: String,
    pub monthly_budget: u64,
    pub configured: bool,
}

impl ProfileSummary {
    pub fn from_snapshot(snapshot: &StoreSnapshot) -> Self {
        Self {
            api_key: mask_credential(&snapshot.credential),
            monthly_budget: snapshot.monthly_budget,
            configured: !snapshot.credential.is_empty() && snapshot.monthly_budget > 0,
        }
    }
}

pub fn validate_credential(raw: &str, command: &str) -> ClientResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !trimmed.starts_with(CREDENTIAL_PREFIX) {
        return Err(ClientError::invalid_credential(command));
    }
    Ok(trimmed.to_string())
}

pub fn parse_budget(raw: &str, command: &str) -> ClientResult<u64> {
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(ClientError::invalid_budget(command)),
    }
}

fn mask_credential(credential: &str) -> String {
    if credential.is_empty() {
        return String::new();
    }
    let tail = credential
        .chars()
        .rev()
        .take(4)
        .collect::<Vec<char>>()
        .into_iter()
        .rev()
        .collect::<String>();
    if credential.chars().count() <= 8 {
        return format!("{CREDENTIAL_PREFIX}****");
    }
    format!("{CREDENTIAL_PREFIX}****{tail}")
}
