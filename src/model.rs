//! Data model for the treemap dashboard: CSV rows, category grouping and
//! the reducer driving fetch/redraw cycles.

use serde::Deserialize;
use std::rc::Rc;
use yew::Reducible;

/// One record of the tabular source data, with `value` already parsed.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
    pub category: String,
    pub subcategory: String,
    pub value: f64,
}

/// CSV shape as it arrives. `value` is untyped text and is converted
/// explicitly; extra columns in the file are ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    category: String,
    subcategory: String,
    value: String,
}

/// Outcome of parsing one CSV file. Rows whose `value` is not a finite
/// non-negative number are dropped and counted in `skipped`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParsedRows {
    pub rows: Vec<Row>,
    pub skipped: usize,
}

/// Parse CSV text into rows. A structurally malformed file (missing
/// required columns, ragged records) rejects the whole dataset.
pub fn parse_csv(text: &str) -> Result<ParsedRows, String> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut out = ParsedRows::default();
    for record in reader.deserialize::<RawRow>() {
        let raw = record.map_err(|e| format!("malformed CSV: {e}"))?;
        match raw.value.parse::<f64>() {
            Ok(v) if v.is_finite() && v >= 0.0 => out.rows.push(Row {
                category: raw.category,
                subcategory: raw.subcategory,
                value: v,
            }),
            _ => out.skipped += 1,
        }
    }
    Ok(out)
}

/// Rows grouped under their top-level category. `palette_index` is the
/// ordinal slot used to colour every leaf of the group.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryGroup {
    pub name: String,
    pub total: f64,
    pub palette_index: usize,
    pub leaves: Vec<Row>,
}

/// Group rows by category, aggregate totals and sort both levels in
/// descending value order (stable, so ties keep input order). Palette
/// indices follow the sorted group order.
pub fn build_groups(rows: Vec<Row>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for row in rows {
        match groups.iter_mut().find(|g| g.name == row.category) {
            Some(g) => {
                g.total += row.value;
                g.leaves.push(row);
            }
            None => groups.push(CategoryGroup {
                name: row.category.clone(),
                total: row.value,
                palette_index: 0,
                leaves: vec![row],
            }),
        }
    }
    for g in &mut groups {
        g.leaves
            .sort_by(|a, b| b.value.partial_cmp(&a.value).unwrap_or(std::cmp::Ordering::Equal));
    }
    groups.sort_by(|a, b| b.total.partial_cmp(&a.total).unwrap_or(std::cmp::Ordering::Equal));
    for (i, g) in groups.iter_mut().enumerate() {
        g.palette_index = i;
    }
    groups
}

// ---------------- Reducer & Actions -----------------

#[derive(Clone, Debug)]
pub enum DashboardAction {
    FetchStarted { seq: u64, category: String },
    FetchSucceeded { seq: u64, parsed: ParsedRows },
    FetchFailed { seq: u64, message: String },
}

/// Dashboard view state. `latest_seq` tracks the most recently issued
/// fetch; completions carrying an older seq are discarded so the surface
/// always ends up showing the last dataset the user asked for.
#[derive(Clone, Debug, PartialEq)]
pub struct DashboardState {
    pub active_category: String,
    pub groups: Vec<CategoryGroup>,
    pub skipped_rows: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub latest_seq: u64,
    /// Bumped whenever a new dataset is applied; the canvas redraw keys
    /// off this.
    pub version: u64,
}

impl DashboardState {
    pub fn new(default_category: &str) -> Self {
        Self {
            active_category: default_category.to_string(),
            groups: Vec::new(),
            skipped_rows: 0,
            loading: false,
            error: None,
            latest_seq: 0,
            version: 0,
        }
    }
}

impl Reducible for DashboardState {
    type Action = DashboardAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        use DashboardAction::*;
        let mut new = (*self).clone();
        match action {
            FetchStarted { seq, category } => {
                new.latest_seq = seq;
                new.active_category = category;
                new.loading = true;
                new.error = None;
            }
            FetchSucceeded { seq, parsed } => {
                if seq != new.latest_seq {
                    return self; // stale completion, a newer fetch is in flight
                }
                new.groups = build_groups(parsed.rows);
                new.skipped_rows = parsed.skipped;
                new.loading = false;
                new.error = None;
                new.version = new.version.wrapping_add(1);
            }
            FetchFailed { seq, message } => {
                if seq != new.latest_seq {
                    return self;
                }
                new.loading = false;
                // previous groups stay on screen
                new.error = Some(message);
            }
        }
        Rc::new(new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "category,subcategory,value\n\
                          Income,Salary,2500\n\
                          Income,Interest,120.5\n\
                          Expenses,Rent,900\n";

    fn row(category: &str, subcategory: &str, value: f64) -> Row {
        Row {
            category: category.to_string(),
            subcategory: subcategory.to_string(),
            value,
        }
    }

    #[test]
    fn parses_well_formed_rows() {
        let parsed = parse_csv(SAMPLE).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(
            parsed.rows,
            vec![
                row("Income", "Salary", 2500.0),
                row("Income", "Interest", 120.5),
                row("Expenses", "Rent", 900.0),
            ]
        );
    }

    #[test]
    fn drops_rows_with_invalid_values() {
        let text = "category,subcategory,value\n\
                    Income,Salary,2500\n\
                    Income,Typo,oops\n\
                    Income,Negative,-3\n\
                    Income,Blank,\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.skipped, 3);
    }

    #[test]
    fn rejects_file_missing_required_column() {
        let text = "category,subcategory\nIncome,Salary\n";
        assert!(parse_csv(text).is_err());
    }

    #[test]
    fn ignores_extra_columns() {
        let text = "category,subcategory,value,notes\nIncome,Salary,10,hello\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.rows, vec![row("Income", "Salary", 10.0)]);
    }

    #[test]
    fn groups_aggregate_and_sort_descending() {
        let groups = build_groups(vec![
            row("Expenses", "Rent", 900.0),
            row("Income", "Salary", 2500.0),
            row("Income", "Interest", 120.5),
        ]);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name, "Income");
        assert_eq!(groups[0].total, 2620.5);
        assert_eq!(groups[0].palette_index, 0);
        assert_eq!(groups[1].name, "Expenses");
        assert_eq!(groups[1].palette_index, 1);
        // leaves sorted descending within the group
        assert_eq!(groups[0].leaves[0].subcategory, "Salary");
        assert_eq!(groups[0].leaves[1].subcategory, "Interest");
    }

    #[test]
    fn stale_fetch_completion_is_discarded() {
        let state = Rc::new(DashboardState::new("income"));
        let state = state.reduce(DashboardAction::FetchStarted {
            seq: 1,
            category: "income".to_string(),
        });
        let state = state.reduce(DashboardAction::FetchStarted {
            seq: 2,
            category: "expenses".to_string(),
        });
        // completion of the first fetch arrives after the second was issued
        let state = state.reduce(DashboardAction::FetchSucceeded {
            seq: 1,
            parsed: ParsedRows {
                rows: vec![row("Income", "Salary", 1.0)],
                skipped: 0,
            },
        });
        assert!(state.groups.is_empty());
        assert!(state.loading);
        let state = state.reduce(DashboardAction::FetchSucceeded {
            seq: 2,
            parsed: ParsedRows {
                rows: vec![row("Expenses", "Rent", 2.0)],
                skipped: 0,
            },
        });
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups[0].name, "Expenses");
        assert!(!state.loading);
        assert_eq!(state.version, 1);
    }

    #[test]
    fn fetch_failure_keeps_previous_groups() {
        let state = Rc::new(DashboardState::new("income"));
        let state = state.reduce(DashboardAction::FetchStarted {
            seq: 1,
            category: "income".to_string(),
        });
        let state = state.reduce(DashboardAction::FetchSucceeded {
            seq: 1,
            parsed: ParsedRows {
                rows: vec![row("Income", "Salary", 1.0)],
                skipped: 0,
            },
        });
        let state = state.reduce(DashboardAction::FetchStarted {
            seq: 2,
            category: "expenses".to_string(),
        });
        let state = state.reduce(DashboardAction::FetchFailed {
            seq: 2,
            message: "HTTP 404".to_string(),
        });
        assert_eq!(state.groups.len(), 1);
        assert_eq!(state.groups[0].name, "Income");
        assert_eq!(state.error.as_deref(), Some("HTTP 404"));
        assert!(!state.loading);
        // a later success clears the error
        let state = state.reduce(DashboardAction::FetchStarted {
            seq: 3,
            category: "expenses".to_string(),
        });
        let state = state.reduce(DashboardAction::FetchSucceeded {
            seq: 3,
            parsed: ParsedRows {
                rows: vec![row("Expenses", "Rent", 2.0)],
                skipped: 0,
            },
        });
        assert!(state.error.is_none());
    }
}
