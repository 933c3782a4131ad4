//! Flat CSV export of uniformly shaped records.
//!
//! The default output is comma-joined and unquoted: a value containing a
//! comma or newline shifts or splits its row. [`CsvQuoting::Rfc4180`]
//! quotes such values instead and is opt-in through the `[export]` config.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const DELIMITER: &str = ",";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CsvQuoting {
    #[default]
    None,
    Rfc4180,
}

/// Converts typed rows into records, keeping struct field order as the
/// column order.
pub fn records<T: Serialize>(rows: &[T]) -> Result<Vec<Value>> {
    rows.iter()
        .map(|row| serde_json::to_value(row).context("Failed to convert row for export"))
        .collect()
}

/// Unquoted CSV: header line from the first record's keys, then one line
/// per record in that column order. No trailing newline. Empty input gives
/// an empty string.
pub fn to_csv(records: &[Value]) -> String {
    to_csv_with(records, CsvQuoting::None)
}

/// Records must share the first record's shape; a record missing a column
/// gets an empty cell and extra keys are dropped.
pub fn to_csv_with(records: &[Value], quoting: CsvQuoting) -> String {
    let Some(first) = records.first().and_then(Value::as_object) else {
        return String::new();
    };
    let columns: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        columns
            .iter()
            .map(|c| quote(c, quoting))
            .collect::<Vec<_>>()
            .join(DELIMITER),
    );

    let empty = Map::new();
    for record in records {
        let fields = record.as_object().unwrap_or(&empty);
        let line = columns
            .iter()
            .map(|c| quote(&cell(fields.get(c.as_str())), quoting))
            .collect::<Vec<_>>()
            .join(DELIMITER);
        lines.push(line);
    }

    lines.join("\n")
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => number(n),
        Some(other) => other.to_string(),
    }
}

/// Whole floats print without a fractional part (`12.0` → `12`).
fn number(n: &serde_json::Number) -> String {
    if n.is_f64() {
        if let Some(f) = n.as_f64() {
            if f.fract() == 0.0 && f.abs() < 1e15 {
                return format!("{}", f as i64);
            }
            return f.to_string();
        }
    }
    n.to_string()
}

fn quote(value: &str, quoting: CsvQuoting) -> String {
    match quoting {
        CsvQuoting::None => value.to_string(),
        CsvQuoting::Rfc4180 => {
            if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
                format!("\"{}\"", value.replace('"', "\"\""))
            } else {
                value.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::model::report::{ProjectStatusRow, UtilizationRow};

    #[test]
    fn empty_input_is_empty_string() {
        assert_eq!(to_csv(&[]), "");
    }

    #[test]
    fn header_then_rows_without_trailing_newline() {
        let rows = vec![json!({"a": 1, "b": 2}), json!({"a": 3, "b": 4})];
        assert_eq!(to_csv(&rows), "a,b\n1,2\n3,4");
    }

    #[test]
    fn column_order_follows_first_record() {
        let rows = vec![json!({"b": 1, "a": 2}), json!({"a": 4, "b": 3})];
        assert_eq!(to_csv(&rows), "b,a\n1,2\n3,4");
    }

    #[test]
    fn single_record_has_header() {
        assert_eq!(to_csv(&[json!({"name": "x"})]), "name\nx");
    }

    #[test]
    fn scalars_render_plainly() {
        let rows = vec![json!({"s": "hi", "f": 12.0, "g": 2.5, "n": null, "t": true})];
        assert_eq!(to_csv(&rows), "s,f,g,n,t\nhi,12,2.5,,true");
    }

    #[test]
    fn unquoted_mode_passes_delimiters_through() {
        let rows = vec![json!({"name": "Doe, John", "n": 1})];
        assert_eq!(to_csv(&rows), "name,n\nDoe, John,1");
    }

    #[test]
    fn rfc4180_mode_quotes_delimiters_and_quotes() {
        let rows = vec![json!({"name": "Doe, John", "note": "say \"hi\"", "n": 1})];
        assert_eq!(
            to_csv_with(&rows, CsvQuoting::Rfc4180),
            "name,note,n\n\"Doe, John\",\"say \"\"hi\"\"\",1"
        );
    }

    #[test]
    fn missing_column_renders_empty_cell() {
        let rows = vec![json!({"a": 1, "b": 2}), json!({"a": 3})];
        assert_eq!(to_csv(&rows), "a,b\n1,2\n3,");
    }

    #[test]
    fn typed_utilization_rows_export_in_field_order() {
        let rows = vec![UtilizationRow {
            email: "john.doe@example.com".into(),
            name: Some("John Doe".into()),
            total_tasks: 4,
            total_estimated_hours: Some(32.0),
            total_actual_hours: Some(20.5),
            avg_progress: None,
        }];
        let csv = to_csv(&records(&rows).unwrap());
        assert_eq!(
            csv,
            "email,name,total_tasks,total_estimated_hours,total_actual_hours,avg_progress\n\
             john.doe@example.com,John Doe,4,32,20.5,"
        );
    }

    #[test]
    fn typed_project_rows_export() {
        let rows = vec![ProjectStatusRow {
            id: 3,
            name: Some("Spark".into()),
            status: Some("active".into()),
            total_work_items: Some(10),
            completed_items: Some(4),
            total_estimated_hours: None,
            total_actual_hours: None,
            in_progress_items: None,
        }];
        let csv = to_csv(&records(&rows).unwrap());
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("id,name,status,total_work_items,completed_items,total_estimated_hours,total_actual_hours")
        );
        assert_eq!(lines.next(), Some("3,Spark,active,10,4,,"));
        assert_eq!(lines.next(), None);
    }

    fn header(csv: &str) -> &str {
        csv.lines().next().unwrap_or("")
    }

    #[test]
    fn decoded_utilization_keeps_backend_column_order() {
        let body = r#"[{"email": "ann@example.com", "name": "Ann", "total_tasks": 3,
            "total_estimated_hours": 24.0, "total_actual_hours": 12.5, "avg_progress": 40.0}]"#;
        let raw: Vec<Value> = serde_json::from_str(body).unwrap();
        let typed: Vec<UtilizationRow> = serde_json::from_str(body).unwrap();

        let exported = to_csv(&records(&typed).unwrap());
        assert_eq!(header(&exported), header(&to_csv(&raw)));
        assert_eq!(exported, to_csv(&raw));
    }

    #[test]
    fn decoded_project_status_keeps_backend_column_order() {
        let body = r#"[{"id": 1, "name": "Apollo", "status": "active", "total_work_items": 5,
            "completed_items": 2, "total_estimated_hours": 40.0, "total_actual_hours": null}]"#;
        let raw: Vec<Value> = serde_json::from_str(body).unwrap();
        let typed: Vec<ProjectStatusRow> = serde_json::from_str(body).unwrap();

        let exported = to_csv(&records(&typed).unwrap());
        assert_eq!(header(&exported), header(&to_csv(&raw)));
        assert_eq!(exported, "id,name,status,total_work_items,completed_items,total_estimated_hours,total_actual_hours\n1,Apollo,active,5,2,40,");
    }
}
