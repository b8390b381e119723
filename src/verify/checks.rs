// src/verify/checks.rs

use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Grouping label for rows whose embedded property record is missing.
pub const NO_PROPERTY: &str = "(no property)";

/// Data-quality summary of one imported table.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct TableReport {
    pub table: String,
    pub total: usize,
    pub missing_property: usize,
    pub missing_date: usize,
    pub missing_description: usize,
    pub status_counts: BTreeMap<String, usize>,
    pub by_property: BTreeMap<String, usize>,
}

impl TableReport {
    /// True when every row passed every blank-field check.
    pub fn is_clean(&self) -> bool {
        self.missing_property == 0 && self.missing_date == 0 && self.missing_description == 0
    }
}

/// Run the blank-field checks, status distribution, and per-property grouping
/// over the raw rows of `table`.
pub fn analyze_rows(table: &str, rows: &[Value]) -> TableReport {
    let mut report = TableReport {
        table: table.to_string(),
        total: rows.len(),
        missing_property: 0,
        missing_date: 0,
        missing_description: 0,
        status_counts: BTreeMap::new(),
        by_property: BTreeMap::new(),
    };

    for row in rows {
        if is_blank(row.get("property_id")) {
            report.missing_property += 1;
        }
        if is_blank(row.get("date")) {
            report.missing_date += 1;
        }
        if is_blank(row.get("description")) {
            report.missing_description += 1;
        }
        *report
            .status_counts
            .entry(status_of(row).to_string())
            .or_insert(0) += 1;
        *report
            .by_property
            .entry(property_name(row).unwrap_or(NO_PROPERTY).to_string())
            .or_insert(0) += 1;
    }
    report
}

/// Missing, null, or a string that is empty after trimming.
fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
    }
}

/// Name of the embedded property record, if the row carries one.
pub fn property_name(row: &Value) -> Option<&str> {
    row.get("properties")?.get("name")?.as_str()
}

/// Unique property names across `rows`, for the affected-properties summary.
pub fn property_names(rows: &[Value]) -> BTreeSet<String> {
    rows.iter()
        .filter_map(|row| property_name(row).map(str::to_string))
        .collect()
}

pub fn status_of(row: &Value) -> &str {
    row.get("status")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("unknown")
}

pub fn date_of(row: &Value) -> &str {
    row.get("date")
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("no date")
}

/// Description truncated to `max` characters, with `...` when cut. Counts
/// characters, not bytes, so accented text never splits mid-codepoint.
pub fn short_description(row: &Value, max: usize) -> String {
    let desc = row
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default();
    if desc.chars().count() <= max {
        desc.to_string()
    } else {
        let truncated: String = desc.chars().take(max).collect();
        format!("{truncated}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_rows() -> Vec<Value> {
        vec![
            json!({
                "property_id": "p1",
                "date": "2023-05-01",
                "description": "Fuite d'eau au 3e étage",
                "status": "resolved",
                "properties": {"name": "Pratifori", "city": "Sion"},
            }),
            json!({
                "property_id": "p1",
                "date": null,
                "description": "   ",
                "status": "open",
                "properties": {"name": "Pratifori", "city": "Sion"},
            }),
            json!({
                "property_id": null,
                "date": "2023-06-12",
                "description": "Dégât de toiture",
                "properties": null,
            }),
        ]
    }

    #[test]
    fn counts_blank_fields_and_groups_by_property() {
        let rows = sample_rows();
        let report = analyze_rows("incidents", &rows);

        assert_eq!(report.table, "incidents");
        assert_eq!(report.total, 3);
        assert_eq!(report.missing_property, 1);
        assert_eq!(report.missing_date, 1);
        assert_eq!(report.missing_description, 1);
        assert!(!report.is_clean());

        assert_eq!(report.status_counts.get("resolved"), Some(&1));
        assert_eq!(report.status_counts.get("open"), Some(&1));
        assert_eq!(report.status_counts.get("unknown"), Some(&1));

        assert_eq!(report.by_property.get("Pratifori"), Some(&2));
        assert_eq!(report.by_property.get(NO_PROPERTY), Some(&1));
    }

    #[test]
    fn clean_rows_produce_a_clean_report() {
        let rows = vec![json!({
            "property_id": "p2",
            "date": "2024-01-09",
            "description": "Litige sur charges",
            "status": "open",
            "properties": {"name": "Av. de la Gare 12"},
        })];
        assert!(analyze_rows("disputes", &rows).is_clean());
    }

    #[test]
    fn unique_property_names_skip_rows_without_one() {
        let names = property_names(&sample_rows());
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Pratifori"]);
    }

    #[test]
    fn row_detail_helpers_have_placeholders() {
        let row = json!({});
        assert_eq!(status_of(&row), "unknown");
        assert_eq!(date_of(&row), "no date");
        assert_eq!(short_description(&row, 60), "");
    }

    #[test]
    fn description_truncation_is_char_safe() {
        let row = json!({"description": "Dégâts d'eau répétés à l'étage"});
        assert_eq!(short_description(&row, 60), "Dégâts d'eau répétés à l'étage");
        assert_eq!(short_description(&row, 6), "Dégâts...");
    }
}
