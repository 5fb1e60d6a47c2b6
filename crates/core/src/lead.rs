//! Lead pipeline statuses and the kanban read model.
//!
//! Leads move freely between the seven pipeline columns; the only rule the
//! server enforces is that a status belongs to [`LeadStatus::ALL`]. Reaching
//! [`LeadStatus::Won`] is what allows a lead to be converted into a client.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Pipeline stage of a lead.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LeadStatus {
    #[default]
    New,
    Contacted,
    Qualified,
    Proposal,
    Negotiation,
    Won,
    Lost,
}

impl LeadStatus {
    /// All statuses in pipeline order.
    pub const ALL: [LeadStatus; 7] = [
        LeadStatus::New,
        LeadStatus::Contacted,
        LeadStatus::Qualified,
        LeadStatus::Proposal,
        LeadStatus::Negotiation,
        LeadStatus::Won,
        LeadStatus::Lost,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LeadStatus::New => "NEW",
            LeadStatus::Contacted => "CONTACTED",
            LeadStatus::Qualified => "QUALIFIED",
            LeadStatus::Proposal => "PROPOSAL",
            LeadStatus::Negotiation => "NEGOTIATION",
            LeadStatus::Won => "WON",
            LeadStatus::Lost => "LOST",
        }
    }

    /// Column heading shown on the board.
    pub fn title(self) -> &'static str {
        match self {
            LeadStatus::New => "New",
            LeadStatus::Contacted => "Contacted",
            LeadStatus::Qualified => "Qualified",
            LeadStatus::Proposal => "Proposal",
            LeadStatus::Negotiation => "Negotiation",
            LeadStatus::Won => "Won",
            LeadStatus::Lost => "Lost",
        }
    }

    /// A lead is still being worked while it is neither won nor lost.
    pub fn is_open(self) -> bool {
        !matches!(self, LeadStatus::Won | LeadStatus::Lost)
    }
}

impl fmt::Display for LeadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LeadStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LeadStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid lead status '{s}'. Must be one of: {}",
                    LeadStatus::ALL.map(LeadStatus::as_str).join(", ")
                ))
            })
    }
}

/// Check that a lead may be converted into a client.
pub fn validate_convertible(status: LeadStatus) -> Result<(), CoreError> {
    if status == LeadStatus::Won {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Only WON leads can be converted (lead is {status})"
        )))
    }
}

// ---------------------------------------------------------------------------
// Kanban board
// ---------------------------------------------------------------------------

/// Board columns in pipeline order.
pub const KANBAN_COLUMNS: [(LeadStatus, &str); 7] = [
    (LeadStatus::New, "New"),
    (LeadStatus::Contacted, "Contacted"),
    (LeadStatus::Qualified, "Qualified"),
    (LeadStatus::Proposal, "Proposal"),
    (LeadStatus::Negotiation, "Negotiation"),
    (LeadStatus::Won, "Won"),
    (LeadStatus::Lost, "Lost"),
];

/// One column of the lead board.
#[derive(Debug, Clone, Serialize)]
pub struct KanbanColumn<T> {
    pub status: LeadStatus,
    pub title: &'static str,
    pub items: Vec<T>,
}

/// Bucket `items` into the seven pipeline columns, preserving input order
/// within each column. Every column is present even when empty.
pub fn group_into_columns<T>(
    items: Vec<T>,
    status_of: impl Fn(&T) -> LeadStatus,
) -> Vec<KanbanColumn<T>> {
    let mut columns: Vec<KanbanColumn<T>> = KANBAN_COLUMNS
        .into_iter()
        .map(|(status, title)| KanbanColumn {
            status,
            title,
            items: Vec::new(),
        })
        .collect();

    for item in items {
        let status = status_of(&item);
        // KANBAN_COLUMNS covers every status.
        if let Some(column) = columns.iter_mut().find(|c| c.status == status) {
            column.items.push(item);
        }
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn statuses_parse_from_wire_names() {
        for status in LeadStatus::ALL {
            assert_eq!(status.as_str().parse::<LeadStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_validation_error() {
        assert_matches!("DONE".parse::<LeadStatus>(), Err(CoreError::Validation(_)));
        assert_matches!("won".parse::<LeadStatus>(), Err(CoreError::Validation(_)));
    }

    #[test]
    fn only_won_is_convertible() {
        assert!(validate_convertible(LeadStatus::Won).is_ok());
        assert!(validate_convertible(LeadStatus::Negotiation).is_err());
        assert!(validate_convertible(LeadStatus::Lost).is_err());
    }

    #[test]
    fn open_statuses() {
        assert!(LeadStatus::New.is_open());
        assert!(LeadStatus::Negotiation.is_open());
        assert!(!LeadStatus::Won.is_open());
        assert!(!LeadStatus::Lost.is_open());
    }

    #[test]
    fn column_titles_match_status_titles() {
        for (status, title) in KANBAN_COLUMNS {
            assert_eq!(status.title(), title);
        }
        assert_eq!(KANBAN_COLUMNS.map(|(s, _)| s), LeadStatus::ALL);
    }

    #[test]
    fn board_has_every_column_in_order() {
        let columns = group_into_columns(Vec::<LeadStatus>::new(), |s| *s);
        let titles: Vec<_> = columns.iter().map(|c| c.title).collect();
        assert_eq!(
            titles,
            ["New", "Contacted", "Qualified", "Proposal", "Negotiation", "Won", "Lost"]
        );
        assert!(columns.iter().all(|c| c.items.is_empty()));
    }

    #[test]
    fn board_groups_and_keeps_order() {
        let leads = vec![
            ("a", LeadStatus::Won),
            ("b", LeadStatus::New),
            ("c", LeadStatus::Won),
        ];
        let columns = group_into_columns(leads, |(_, s)| *s);

        let won = columns.iter().find(|c| c.status == LeadStatus::Won).unwrap();
        assert_eq!(won.items.iter().map(|(n, _)| *n).collect::<Vec<_>>(), ["a", "c"]);

        let new = &columns[0];
        assert_eq!(new.items.len(), 1);
        assert_eq!(columns[2].items.len(), 0);
    }
}
