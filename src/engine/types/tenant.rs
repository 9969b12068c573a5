use std::fmt;

use crate::engine::errors::TenantError;

/// Identifies the tenant a query runs for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TenantId {
    pub account_id: u32,
    pub project_id: u32,
}

impl TenantId {
    pub fn new(account_id: u32, project_id: u32) -> Self {
        Self {
            account_id,
            project_id,
        }
    }

    /// Builds a tenant from optional `AccountID` / `ProjectID` header values.
    /// Missing or blank values default to `0`.
    pub fn from_header_values(
        account_id: Option<&str>,
        project_id: Option<&str>,
    ) -> Result<Self, TenantError> {
        Ok(Self {
            account_id: parse_id("AccountID", account_id)?,
            project_id: parse_id("ProjectID", project_id)?,
        })
    }
}

fn parse_id(name: &'static str, value: Option<&str>) -> Result<u32, TenantError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0),
        Some(raw) => raw.parse::<u32>().map_err(|_| TenantError::InvalidId {
            name,
            value: raw.to_string(),
        }),
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.account_id, self.project_id)
    }
}
