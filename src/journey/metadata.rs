//! Journey-level timestamps and per-mode totals.

use crate::proto::{Distances, Durations, Journey, SectionType, StreetNetworkMode, TransferType};

fn shift(timestamp: u64, seconds: i64) -> u64 {
    timestamp.saturating_add_signed(seconds)
}

/// Re-anchor an assembled journey so that it arrives at `arrival`.
///
/// Sections are walked from the last to the first; each keeps its duration
/// and ends where the following one begins.
pub fn recompute_from_arrival(journey: &mut Journey, arrival: u64) {
    journey.arrival_date_time = arrival;
    journey.departure_date_time = shift(arrival, -i64::from(journey.duration));

    let mut clock = arrival;
    for section in journey.sections.iter_mut().rev() {
        section.end_date_time = clock;
        section.begin_date_time = shift(clock, -i64::from(section.duration));
        clock = section.begin_date_time;
    }
}

/// Fill the per-mode duration and distance totals.
///
/// The total duration is the time between the first departure and the last
/// arrival, which is not necessarily the sum of the section durations.
pub fn compute_metadata(journey: &mut Journey) {
    let mut durations = Durations::default();
    let mut distances = Distances::default();

    for section in &journey.sections {
        match section.section_type() {
            SectionType::StreetNetwork | SectionType::CrowFly => {
                let Some(street_network) = &section.street_network else {
                    continue;
                };
                let (duration, distance) = match street_network.mode() {
                    StreetNetworkMode::Walking => (&mut durations.walking, &mut distances.walking),
                    StreetNetworkMode::Car | StreetNetworkMode::CarNoPark => {
                        (&mut durations.car, &mut distances.car)
                    }
                    StreetNetworkMode::Bike | StreetNetworkMode::Bss => {
                        (&mut durations.bike, &mut distances.bike)
                    }
                    StreetNetworkMode::Ridesharing => {
                        (&mut durations.ridesharing, &mut distances.ridesharing)
                    }
                    StreetNetworkMode::Taxi => (&mut durations.taxi, &mut distances.taxi),
                };
                *duration += section.duration;
                *distance += section.length;
            }
            SectionType::Transfer if section.transfer_type() == TransferType::Walking => {
                durations.walking += section.duration;
            }
            _ => {}
        }
    }

    if let (Some(first), Some(last)) = (journey.sections.first(), journey.sections.last()) {
        let total = last.end_date_time as i64 - first.begin_date_time as i64;
        durations.total = i32::try_from(total).unwrap_or(i32::MAX);
    }

    journey.durations = Some(durations);
    journey.distances = Some(distances);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{Section, StreetNetwork};

    fn section(kind: SectionType, mode: StreetNetworkMode, begin: u64, duration: i32, length: i32) -> Section {
        let mut street_network = StreetNetwork::default();
        street_network.set_mode(mode);
        let mut section = Section {
            begin_date_time: begin,
            end_date_time: begin + duration as u64,
            duration,
            length,
            street_network: Some(street_network),
            ..Default::default()
        };
        section.set_section_type(kind);
        section
    }

    #[test]
    fn totals_are_bucketed_by_mode() {
        let mut transfer = section(SectionType::Transfer, StreetNetworkMode::Walking, 1_240, 15, 0);
        transfer.set_transfer_type(TransferType::Walking);
        let mut journey = Journey {
            sections: vec![
                section(SectionType::StreetNetwork, StreetNetworkMode::Walking, 1_000, 100, 120),
                section(SectionType::StreetNetwork, StreetNetworkMode::Bss, 1_100, 40, 300),
                section(SectionType::CrowFly, StreetNetworkMode::CarNoPark, 1_140, 100, 1_500),
                transfer,
                section(SectionType::StreetNetwork, StreetNetworkMode::Taxi, 1_500, 195, 2_000),
                section(SectionType::BssRent, StreetNetworkMode::Walking, 1_695, 0, 0),
            ],
            ..Default::default()
        };

        compute_metadata(&mut journey);

        let durations = journey.durations.unwrap();
        assert_eq!(durations.walking, 115);
        assert_eq!(durations.bike, 40);
        assert_eq!(durations.car, 100);
        assert_eq!(durations.taxi, 195);
        // spans the gap between the transfer and the taxi section
        assert_eq!(durations.total, 695);

        let distances = journey.distances.unwrap();
        assert_eq!(distances.walking, 120);
        assert_eq!(distances.bike, 300);
        assert_eq!(distances.car, 1_500);
        assert_eq!(distances.taxi, 2_000);
    }

    #[test]
    fn reversal_keeps_durations_and_chains_sections() {
        let mut journey = Journey {
            duration: 30,
            sections: vec![
                section(SectionType::StreetNetwork, StreetNetworkMode::Walking, 100, 10, 0),
                section(SectionType::BssRent, StreetNetworkMode::Walking, 110, 5, 0),
                section(SectionType::StreetNetwork, StreetNetworkMode::Bike, 115, 15, 0),
            ],
            ..Default::default()
        };

        recompute_from_arrival(&mut journey, 1_000);

        assert_eq!(journey.arrival_date_time, 1_000);
        assert_eq!(journey.departure_date_time, 970);
        let spans: Vec<(u64, u64, i32)> = journey
            .sections
            .iter()
            .map(|s| (s.begin_date_time, s.end_date_time, s.duration))
            .collect();
        assert_eq!(spans, vec![(970, 980, 10), (980, 985, 5), (985, 1_000, 15)]);
    }

    #[test]
    fn empty_journey_has_zero_totals() {
        let mut journey = Journey::default();
        compute_metadata(&mut journey);
        assert_eq!(journey.durations.unwrap().total, 0);
    }
}
