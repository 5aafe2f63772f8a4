use std::cmp::Ordering;

use crate::operators::aggregate::{RegionAggregate, RegionTable};

/// One finalized entry of the ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRegion {
    pub region: String,
    pub aggregate: RegionAggregate,
}

impl RankedRegion {
    pub fn change_ratio(&self) -> f64 {
        self.aggregate.change_ratio.unwrap_or(f64::NAN)
    }
}

/// Compute every region's change ratio and order the regions by it, smallest
/// first. Division by zero is left as the resulting inf/NaN.
pub fn finalize(mut table: RegionTable) -> Vec<RankedRegion> {
    for (region, aggregate) in table.iter_mut() {
        let ratio = aggregate.target_population.to_f64() / aggregate.base_population.to_f64();
        log::trace!("{}: change ratio {}", region, ratio);
        aggregate.change_ratio = Some(ratio);
    }

    let mut ranking: Vec<RankedRegion> = table
        .into_entries()
        .into_iter()
        .map(|(region, aggregate)| RankedRegion { region, aggregate })
        .collect();

    // Stable: equal ratios keep first-seen order.
    ranking.sort_by(|a, b| compare_ratios(a.change_ratio(), b.change_ratio()));
    ranking
}

/// Ascending numeric order with NaN after every number. All NaNs compare equal.
fn compare_ratios(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}
