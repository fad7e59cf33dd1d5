//! Per-maneuver details of a street-network section.

use std::ops::Range;

use crate::engine::{Coordinate, CycleLane, Maneuver};
use crate::proto::{CyclePathType, PathItem};

pub(crate) const KM_TO_M: f64 = 1000.0;

/// Fold a turn angle in degrees into `(-180, 180]`.
pub fn normalize_direction(turn_degree: u32) -> i32 {
    let direction = (turn_degree % 360) as i32;
    if direction > 180 {
        direction - 360
    } else {
        direction
    }
}

fn cycle_path_type(lane: CycleLane) -> CyclePathType {
    match lane {
        CycleLane::None => CyclePathType::NoCycleLane,
        CycleLane::Shared => CyclePathType::SharedCycleWay,
        CycleLane::Dedicated => CyclePathType::DedicatedCycleWay,
        CycleLane::Separated => CyclePathType::SeparatedCycleWay,
    }
}

/// Path items for `maneuvers[range]`.
///
/// With instructions enabled, each item's text gets a "Keep going for N m."
/// suffix, except for the last maneuver of the whole path.
pub fn build_path_items(
    maneuvers: &[Maneuver],
    range: Range<usize>,
    shape: &[Coordinate],
    enable_instructions: bool,
) -> Vec<PathItem> {
    let last = maneuvers.len().saturating_sub(1);
    let mut items = Vec::with_capacity(range.len());

    for (idx, maneuver) in maneuvers.iter().enumerate().take(range.end).skip(range.start) {
        let length = maneuver.length_km * KM_TO_M;
        let mut item = PathItem {
            name: maneuver.street_name.clone().unwrap_or_default(),
            length,
            duration: i32::try_from(maneuver.time).unwrap_or(i32::MAX),
            direction: normalize_direction(maneuver.turn_degree),
            ..Default::default()
        };
        if let Some(lane) = maneuver.cycle_lane {
            item.set_cycle_path_type(cycle_path_type(lane));
        }

        if enable_instructions {
            let text = maneuver.instruction.as_deref().unwrap_or_default();
            if !text.is_empty() {
                item.instruction = if idx == last {
                    text.to_string()
                } else {
                    format!("{} Keep going for {} m.", text, length as i64)
                };
                item.instruction_start_coordinate =
                    shape.get(maneuver.begin_shape_index).map(|&c| c.into());
            }
        }

        items.push(item);
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;

    fn maneuver(length_km: f64, time: u32, instruction: &str, begin_shape_index: usize) -> Maneuver {
        Maneuver {
            length_km,
            time,
            begin_shape_index,
            instruction: Some(instruction.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn direction_is_folded() {
        assert_eq!(normalize_direction(0), 0);
        assert_eq!(normalize_direction(90), 90);
        assert_eq!(normalize_direction(180), 180);
        assert_eq!(normalize_direction(181), -179);
        assert_eq!(normalize_direction(270), -90);
        assert_eq!(normalize_direction(360), 0);
        assert_eq!(normalize_direction(725), 5);
    }

    #[test]
    fn instructions_skip_the_trailing_clause_on_the_last_maneuver() {
        let shape = vec![Coordinate::new(1.0, 1.0), Coordinate::new(1.0, 1.1), Coordinate::new(1.0, 1.2)];
        let maneuvers = vec![
            maneuver(0.1205, 60, "Turn left onto rue A.", 0),
            maneuver(0.3, 120, "Turn right.", 1),
            maneuver(0.0, 0, "You have arrived.", 2),
        ];

        let items = build_path_items(&maneuvers, 0..3, &shape, true);
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].instruction, "Turn left onto rue A. Keep going for 120 m.");
        assert_eq!(items[1].instruction, "Turn right. Keep going for 300 m.");
        assert_eq!(items[2].instruction, "You have arrived.");
        assert_eq!(items[1].instruction_start_coordinate.unwrap().lat, 1.1);

        // the end of a section is not the end of the path
        let items = build_path_items(&maneuvers, 0..2, &shape, true);
        assert!(items[1].instruction.ends_with("m."));
    }

    #[test]
    fn disabled_instructions_leave_text_empty() {
        let shape = vec![Coordinate::new(1.0, 1.0)];
        let maneuvers = vec![maneuver(0.5, 30, "Go.", 0)];
        let items = build_path_items(&maneuvers, 0..1, &shape, false);
        assert_eq!(items[0].instruction, "");
        assert!(items[0].instruction_start_coordinate.is_none());
        assert_eq!(items[0].length, 500.0);
        assert_eq!(items[0].duration, 30);
    }

    #[test]
    fn empty_range_yields_nothing() {
        let maneuvers = vec![maneuver(0.5, 30, "Go.", 0)];
        assert!(build_path_items(&maneuvers, 1..1, &[], true).is_empty());
    }

    #[test]
    fn cycle_path_type_only_when_the_edge_says_so() {
        let mut unknown = maneuver(0.1, 10, "Go.", 0);
        unknown.cycle_lane = None;
        let mut plain = maneuver(0.1, 10, "Go.", 0);
        plain.cycle_lane = Some(CycleLane::None);
        let mut separated = maneuver(0.1, 10, "Go.", 0);
        separated.cycle_lane = Some(CycleLane::Separated);

        let items = build_path_items(&[unknown, plain, separated], 0..3, &[], false);
        assert_eq!(items[0].cycle_path_type, None);
        assert_eq!(items[1].cycle_path_type, Some(CyclePathType::NoCycleLane as i32));
        assert_eq!(items[2].cycle_path_type(), CyclePathType::SeparatedCycleWay);
    }
}
