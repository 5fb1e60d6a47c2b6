//! Claim statuses.
//!
//! Claims move SUBMITTED → IN_REVIEW → RESOLVED in the normal case, but staff
//! may move a claim back (e.g. re-open a resolved claim), so any transition
//! between known statuses is accepted.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Lifecycle stage of a claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClaimStatus {
    Submitted,
    InReview,
    Resolved,
}

impl ClaimStatus {
    pub const ALL: [ClaimStatus; 3] = [
        ClaimStatus::Submitted,
        ClaimStatus::InReview,
        ClaimStatus::Resolved,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ClaimStatus::Submitted => "SUBMITTED",
            ClaimStatus::InReview => "IN_REVIEW",
            ClaimStatus::Resolved => "RESOLVED",
        }
    }

    /// Open claims still need attention.
    pub fn is_open(self) -> bool {
        self != ClaimStatus::Resolved
    }
}

impl fmt::Display for ClaimStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClaimStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ClaimStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid claim status '{s}'. Must be one of: SUBMITTED, IN_REVIEW, RESOLVED"
                ))
            })
    }
}
