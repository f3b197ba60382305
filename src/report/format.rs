use crate::app::pipeline::LoadOutput;
use crate::domain::{CountryCode, DailyCounts};
use crate::query::MapView;

/// How many row errors / unmatched entries a summary prints before eliding.
const SUMMARY_DETAIL_LIMIT: usize = 5;

/// One country's values at the cursor date, ready for display.
#[derive(Debug, Clone)]
pub struct SnapshotRow {
    pub code: CountryCode,
    pub name: String,
    pub counts: Option<DailyCounts>,
    pub aux_value: Option<f64>,
    pub magnitude: f64,
}

/// Build display rows for the cursor date, largest case counts first.
///
/// Countries with no data at the cursor date sort last; ties break on code
/// so output is deterministic.
pub fn snapshot_rows(view: &MapView, top_n: usize) -> Vec<SnapshotRow> {
    let mut rows: Vec<SnapshotRow> = view
        .registry()
        .codes()
        .map(|code| SnapshotRow {
            code: code.clone(),
            name: view.name_of(code).unwrap_or(code.as_str()).to_string(),
            counts: view.record_at_cursor(code),
            aux_value: view.aux_color_value(code),
            magnitude: view.bubble_magnitude(code),
        })
        .collect();

    rows.sort_by(|a, b| {
        let ca = a.counts.map_or(0, |c| c.cases);
        let cb = b.counts.map_or(0, |c| c.cases);
        cb.cmp(&ca).then_with(|| a.code.cmp(&b.code))
    });
    rows.truncate(top_n);
    rows
}

/// Format the one-date snapshot table.
pub fn format_snapshot(view: &MapView, top_n: usize) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== epimap — snapshot @ {} ===\n", view.cursor()));
    out.push_str(&format!(
        "Dates: {} | Countries: {}\n\n",
        view.series().dates().len(),
        view.registry().len(),
    ));

    out.push_str(&format!(
        "{:<5} {:<32} {:>9} {:>8} {:>7} {:>7}\n",
        "code", "country", "cases", "deaths", "aux", "bubble"
    ));
    for row in snapshot_rows(view, top_n) {
        let (cases, deaths) = match row.counts {
            Some(c) => (c.cases.to_string(), c.deaths.to_string()),
            None => ("-".to_string(), "-".to_string()),
        };
        let aux = row
            .aux_value
            .map(|v| format!("{v:.1}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<5} {:<32} {:>9} {:>8} {:>7} {:>7.2}\n",
            row.code,
            truncate_name(&row.name, 32),
            cases,
            deaths,
            aux,
            row.magnitude
        ));
    }

    out
}

/// Format ingestion/join diagnostics from a load.
pub fn format_load_summary(out: &LoadOutput) -> String {
    let mut s = String::new();

    s.push_str(&format!(
        "Feed: {} rows, {} dropped | World: {} countries | Aux: {} rows, {} dropped, {} unmatched\n",
        out.covid_rows_read,
        out.covid_row_errors.len(),
        out.world_countries,
        out.aux_rows_read,
        out.aux_row_errors.len(),
        out.view.aux().unmatched.len(),
    ));

    for err in out.covid_row_errors.iter().take(SUMMARY_DETAIL_LIMIT) {
        s.push_str(&format!("  dropped feed {err}\n"));
    }
    if out.covid_row_errors.len() > SUMMARY_DETAIL_LIMIT {
        s.push_str(&format!(
            "  ... and {} more\n",
            out.covid_row_errors.len() - SUMMARY_DETAIL_LIMIT
        ));
    }

    for err in out.aux_row_errors.iter().take(SUMMARY_DETAIL_LIMIT) {
        s.push_str(&format!("  dropped aux {err}\n"));
    }

    for rec in out.view.aux().unmatched.iter().take(SUMMARY_DETAIL_LIMIT) {
        s.push_str(&format!("  unmatched aux entry '{}'\n", rec.key));
    }
    if out.view.aux().unmatched.len() > SUMMARY_DETAIL_LIMIT {
        s.push_str(&format!(
            "  ... and {} more\n",
            out.view.aux().unmatched.len() - SUMMARY_DETAIL_LIMIT
        ));
    }

    s
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let cut: String = name.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, CountryCode, DailyCounts};
    use crate::query::MapView;
    use crate::store::{AuxJoin, CountryRegistry, SeriesBuilder};
    use chrono::NaiveDate;

    fn sample_view() -> MapView {
        let records = vec![
            CaseRecord {
                date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                code: CountryCode::from("ITA"),
                name: "Italy".to_string(),
                counts: DailyCounts { cases: 100, deaths: 5 },
            },
            CaseRecord {
                date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                code: CountryCode::from("FRA"),
                name: "France".to_string(),
                counts: DailyCounts { cases: 40, deaths: 1 },
            },
        ];
        let mut registry = CountryRegistry::new();
        let mut builder = SeriesBuilder::new();
        builder.ingest(&records, &mut registry);

        let mut aux = AuxJoin::default();
        aux.values.insert(CountryCode::from("ITA"), 12.5);

        MapView::new(registry, builder.finalize(false), aux).unwrap()
    }

    #[test]
    fn rows_sort_by_cases_descending() {
        let rows = snapshot_rows(&sample_view(), 10);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].code, CountryCode::from("ITA"));
        assert_eq!(rows[1].code, CountryCode::from("FRA"));
        assert!(rows[0].magnitude > rows[1].magnitude);
    }

    #[test]
    fn top_n_truncates() {
        let rows = snapshot_rows(&sample_view(), 1);
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn snapshot_text_contains_header_and_values() {
        let text = format_snapshot(&sample_view(), 10);
        assert!(text.contains("snapshot @ 2020-03-01"));
        assert!(text.contains("Italy"));
        assert!(text.contains("100"));
        assert!(text.contains("12.5"));
        // France has no aux value: rendered as the no-data dash.
        let fra_line = text.lines().find(|l| l.contains("France")).unwrap();
        assert!(fra_line.contains(" - "));
    }
}
