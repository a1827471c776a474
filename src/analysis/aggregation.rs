//! Per-date roll-up of per-source demand rows

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::readings::SourcedValue;
use crate::models::region::EnergySource;

/// Date-ordered daily totals
pub type DailyTotals = BTreeMap<NaiveDate, f64>;

/// Aggregate rows into daily totals
pub struct Aggregator;

impl Aggregator {
    /// Sum `value` per date over rows whose energy source is in `selection`.
    ///
    /// An empty selection means every source. Dates without a selected row do
    /// not appear in the result.
    pub fn aggregate_by_date<I>(rows: I, selection: &[EnergySource]) -> DailyTotals
    where
        I: IntoIterator<Item = SourcedValue>,
    {
        let mut totals = DailyTotals::new();
        for row in rows {
            if !Self::is_selected(row.energy_source, selection) {
                continue;
            }
            *totals.entry(row.date).or_insert(0.0) += row.value;
        }
        totals
    }

    pub fn is_selected(source: EnergySource, selection: &[EnergySource]) -> bool {
        selection.is_empty() || selection.contains(&source)
    }
}
