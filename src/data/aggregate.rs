use std::collections::BTreeMap;

use super::columns::{CAPACITY_MW, START_YEAR, STATUS};
use super::filter::FilteredDataset;

pub const MW_PER_GW: f64 = 1000.0;

/// Total capacity of one status group.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusCapacity {
    pub status: String,
    pub total_capacity_gw: f64,
}

/// Capacity that came online in one start year, plus the running total.
#[derive(Debug, Clone, PartialEq)]
pub struct YearCapacity {
    pub year: f64,
    pub new_capacity_gw: f64,
    pub cumulative_capacity_gw: f64,
}

/// Sum `installed capacity MW` per `Status`, in GW.
///
/// Rows without a status are left out.  A row with a status but no capacity
/// still creates its group and adds nothing to it.  Output is ordered by
/// status name; callers sort by value for display.
pub fn capacity_by_status(rows: &FilteredDataset<'_>) -> Vec<StatusCapacity> {
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for rec in rows.rows() {
        let Some(status) = rec.text(STATUS) else {
            continue;
        };
        *totals.entry(status).or_default() += rec.number(CAPACITY_MW).unwrap_or(0.0);
    }

    totals
        .into_iter()
        .map(|(status, mw)| StatusCapacity {
            status: status.to_string(),
            total_capacity_gw: mw / MW_PER_GW,
        })
        .collect()
}

/// New and cumulative capacity per `Start year`, in GW, oldest year first.
///
/// Only rows with both a start year and a capacity count.  The running sum
/// covers the years present in `rows`; gaps between years are not filled.
pub fn capacity_by_year(rows: &FilteredDataset<'_>) -> Vec<YearCapacity> {
    let mut pairs: Vec<(f64, f64)> = rows
        .rows()
        .filter_map(|rec| Some((rec.number(START_YEAR)?, rec.number(CAPACITY_MW)?)))
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut per_year: Vec<(f64, f64)> = Vec::new();
    for (year, mw) in pairs {
        match per_year.last_mut() {
            Some((last, total)) if *last == year => *total += mw,
            _ => per_year.push((year, mw)),
        }
    }

    let mut cumulative = 0.0;
    per_year
        .into_iter()
        .map(|(year, mw)| {
            let new_capacity_gw = mw / MW_PER_GW;
            cumulative += new_capacity_gw;
            YearCapacity {
                year,
                new_capacity_gw,
                cumulative_capacity_gw: cumulative,
            }
        })
        .collect()
}
