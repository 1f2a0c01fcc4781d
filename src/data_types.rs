// src/data_types.rs
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

use crate::error::Result;

#[derive(Debug, Clone)]
pub enum DataSource {
    Local(PathBuf),
    Cloud(String, String), // (url, sheet_name)
}

/// Eligibility flag as kept in the sheet's `status` column. Only the exact
/// cell value "active" marks a record as drawable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Active,
    Inactive,
}

impl Status {
    pub fn parse(cell: &str) -> Status {
        if cell == "active" {
            Status::Active
        } else {
            Status::Inactive
        }
    }
}

/// One inventory row. The sheet owns the data; these are transient copies
/// held for a single draw.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrystalRecord {
    pub id: String,
    pub name: String,
    pub style: String,
    pub main_crystal: String,
    pub status: Status,
    /// Kept when the sheet carries it; nothing in the draw flow reads it.
    pub last_worn: Option<NaiveDate>,
}

impl CrystalRecord {
    /// Builds a record from one row, keyed by header position. Header names
    /// are matched case-insensitively; missing cells become empty strings.
    /// Rows whose cells are all blank yield `None`.
    pub fn from_cells(headers: &[String], cells: &[String]) -> Option<CrystalRecord> {
        if cells.iter().all(|cell| cell.trim().is_empty()) {
            return None;
        }

        let field = |name: &str| -> String {
            headers
                .iter()
                .position(|header| header.trim().eq_ignore_ascii_case(name))
                .and_then(|index| cells.get(index))
                .map(|cell| cell.trim().to_string())
                .unwrap_or_default()
        };

        let last_worn = NaiveDate::parse_from_str(&field("last_worn"), "%Y-%m-%d").ok();

        Some(CrystalRecord {
            id: field("id"),
            name: field("name"),
            style: field("style"),
            main_crystal: field("main_crystal"),
            status: Status::parse(&field("status")),
            last_worn,
        })
    }

    pub fn is_active(&self) -> bool {
        self.status == Status::Active
    }
}

/// Planet/sign/color tuple shown for the current weekday. The table is
/// compiled in, so every field borrows 'static data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyFocus {
    pub planet: &'static str,
    pub natal_sign: &'static str,
    pub lucky_colors: &'static [&'static str],
}

/// Presentation label for a pick's position; carries no selection weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Primary,
    Secondary,
}

impl Role {
    pub fn for_index(index: usize) -> Role {
        if index == 0 {
            Role::Primary
        } else {
            Role::Secondary
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Primary => "👑 主角",
            Role::Secondary => "⚔️ 護法",
        }
    }
}

/// Everything one trigger produces; lives only until the next draw.
#[derive(Debug, Clone)]
pub struct DrawOutcome {
    pub focus: DailyFocus,
    pub picks: Vec<CrystalRecord>,
    pub quotation: &'static str,
    pub pool_size: usize,
}

/// Contract for anything that can hand back the inventory: the Google Sheets
/// adapter, the local CSV adapter, or a stub in tests.
#[async_trait]
pub trait RecordSource: fmt::Debug + Send + Sync {
    async fn fetch_records(&self) -> Result<Vec<CrystalRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        ["id", "name", "style", "main_crystal", "status", "last_worn"]
            .iter()
            .map(|h| h.to_string())
            .collect()
    }

    fn cells(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn builds_record_from_full_row() {
        let record = CrystalRecord::from_cells(
            &headers(),
            &cells(&["7", "月光秘語", "手鍊", "月光石", "active", "2024-11-02"]),
        )
        .unwrap();

        assert_eq!(record.id, "7");
        assert_eq!(record.name, "月光秘語");
        assert_eq!(record.style, "手鍊");
        assert_eq!(record.main_crystal, "月光石");
        assert!(record.is_active());
        assert_eq!(record.last_worn, NaiveDate::from_ymd_opt(2024, 11, 2));
    }

    #[test]
    fn ragged_rows_fill_missing_cells_with_empty_strings() {
        let record = CrystalRecord::from_cells(&headers(), &cells(&["3", "紫霧"])).unwrap();
        assert_eq!(record.id, "3");
        assert_eq!(record.name, "紫霧");
        assert_eq!(record.style, "");
        assert_eq!(record.status, Status::Inactive);
        assert_eq!(record.last_worn, None);
    }

    #[test]
    fn blank_rows_yield_none() {
        assert!(CrystalRecord::from_cells(&headers(), &cells(&["", "  ", ""])).is_none());
        assert!(CrystalRecord::from_cells(&headers(), &[]).is_none());
    }

    #[test]
    fn only_the_exact_active_value_counts() {
        assert_eq!(Status::parse("active"), Status::Active);
        assert_eq!(Status::parse("Active"), Status::Inactive);
        assert_eq!(Status::parse("inactive"), Status::Inactive);
        assert_eq!(Status::parse(""), Status::Inactive);
    }

    #[test]
    fn unparseable_dates_are_dropped() {
        let record = CrystalRecord::from_cells(
            &headers(),
            &cells(&["1", "白光", "項鍊", "白水晶", "active", "last week"]),
        )
        .unwrap();
        assert_eq!(record.last_worn, None);
    }

    #[test]
    fn role_labels_follow_position() {
        assert_eq!(Role::for_index(0), Role::Primary);
        assert_eq!(Role::for_index(1), Role::Secondary);
        assert_eq!(Role::for_index(5), Role::Secondary);
    }
}
