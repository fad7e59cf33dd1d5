//! Dense rows from sparse engine results.

use fixedbitset::FixedBitSet;

use crate::engine::{TimeDistance, UNREACHABLE};
use crate::proto::{MatrixRow, RoutingElement, RoutingStatus, StreetNetworkRoutingMatrix};

/// Input indices whose projection failed, per side.
#[derive(Debug, Clone)]
pub struct FailedIndices {
    pub sources: FixedBitSet,
    pub targets: FixedBitSet,
}

impl FailedIndices {
    pub fn new(nb_sources: usize, nb_targets: usize) -> Self {
        Self {
            sources: FixedBitSet::with_capacity(nb_sources),
            targets: FixedBitSet::with_capacity(nb_targets),
        }
    }

    pub fn nb_sources(&self) -> usize {
        self.sources.len()
    }

    pub fn nb_targets(&self) -> usize {
        self.targets.len()
    }
}

fn element(duration: i32, status: RoutingStatus) -> RoutingElement {
    let mut element = RoutingElement {
        duration,
        ..Default::default()
    };
    element.set_routing_status(status);
    element
}

fn failed() -> RoutingElement {
    element(-1, RoutingStatus::Unreached)
}

fn from_result(result: &TimeDistance, max_duration: u32) -> RoutingElement {
    let duration = i32::try_from(result.time).unwrap_or(i32::MAX);
    if result.time >= UNREACHABLE || result.time > max_duration {
        element(duration, RoutingStatus::Unreached)
    } else {
        element(duration, RoutingStatus::Reached)
    }
}

/// Re-interleave `results` (row-major over the projected sources and
/// targets) into rows following the input order.
///
/// A one-to-many or many-to-one request yields a single row as long as the
/// larger side. Many-to-many yields one row per source.
pub fn assemble(failed_indices: &FailedIndices, results: &[TimeDistance], max_duration: u32) -> StreetNetworkRoutingMatrix {
    let nb_sources = failed_indices.nb_sources();
    let nb_targets = failed_indices.nb_targets();
    let mut results = results.iter();
    let mut missing = 0usize;

    let mut grid: Vec<Vec<RoutingElement>> = Vec::with_capacity(nb_sources);
    for source in 0..nb_sources {
        let mut row = Vec::with_capacity(nb_targets);
        for target in 0..nb_targets {
            if failed_indices.sources.contains(source) || failed_indices.targets.contains(target) {
                row.push(failed());
                continue;
            }
            match results.next() {
                Some(result) => row.push(from_result(result, max_duration)),
                None => {
                    missing += 1;
                    row.push(failed());
                }
            }
        }
        grid.push(row);
    }

    if missing > 0 {
        tracing::warn!(missing, "Engine returned fewer matrix results than projected pairs");
    }

    let rows = if nb_sources > 1 && nb_targets == 1 {
        vec![MatrixRow {
            routing_response: grid.into_iter().flatten().collect(),
        }]
    } else {
        grid.into_iter()
            .map(|routing_response| MatrixRow { routing_response })
            .collect()
    };

    let unreached = rows
        .iter()
        .flat_map(|row| row.routing_response.iter())
        .filter(|e| e.routing_status() == RoutingStatus::Unreached)
        .count();
    tracing::debug!(unreached, "Matrix assembled");

    StreetNetworkRoutingMatrix { rows }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn td(time: u32) -> TimeDistance {
        TimeDistance { time, distance: time }
    }

    fn statuses(row: &MatrixRow) -> Vec<(i32, RoutingStatus)> {
        row.routing_response
            .iter()
            .map(|e| (e.duration, e.routing_status()))
            .collect()
    }

    #[test]
    fn one_to_many_with_unprojected_targets() {
        let mut failed_indices = FailedIndices::new(1, 5);
        failed_indices.targets.insert(1);
        failed_indices.targets.insert(3);
        let results = [td(100), td(UNREACHABLE), td(700)];

        let matrix = assemble(&failed_indices, &results, 600);
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(
            statuses(&matrix.rows[0]),
            vec![
                (100, RoutingStatus::Reached),
                (-1, RoutingStatus::Unreached),
                (UNREACHABLE as i32, RoutingStatus::Unreached),
                (-1, RoutingStatus::Unreached),
                (700, RoutingStatus::Unreached),
            ]
        );
    }

    #[test]
    fn many_to_one_uses_source_mask() {
        let mut failed_indices = FailedIndices::new(3, 1);
        failed_indices.sources.insert(0);
        let results = [td(10), td(600)];

        let matrix = assemble(&failed_indices, &results, 600);
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(
            statuses(&matrix.rows[0]),
            vec![
                (-1, RoutingStatus::Unreached),
                (10, RoutingStatus::Reached),
                (600, RoutingStatus::Reached),
            ]
        );
    }

    #[test]
    fn many_to_many_emits_one_row_per_source() {
        let mut failed_indices = FailedIndices::new(2, 3);
        failed_indices.targets.insert(2);
        let results = [td(1), td(2), td(3), td(4)];

        let matrix = assemble(&failed_indices, &results, 100);
        assert_eq!(matrix.rows.len(), 2);
        assert!(matrix.rows.iter().all(|r| r.routing_response.len() == 3));
        assert_eq!(matrix.rows[1].routing_response[1].duration, 4);
        assert_eq!(matrix.rows[1].routing_response[2].duration, -1);
    }

    #[test]
    fn row_stays_dense_when_results_run_short() {
        let failed_indices = FailedIndices::new(1, 4);
        let matrix = assemble(&failed_indices, &[td(5)], 100);
        assert_eq!(matrix.rows[0].routing_response.len(), 4);
        assert_eq!(matrix.rows[0].routing_response[3].duration, -1);
    }
}
