//! Turns an engine path into a chained list of journey sections.

use std::ops::Range;

use crate::costing::Costing;
use crate::engine::{BssManeuver, Coordinate, EnginePath, Maneuver, Mode, TravelMode};
use crate::journey::elevation::ElevationProvider;
use crate::journey::endpoint::Endpoint;
use crate::journey::metadata::{compute_metadata, recompute_from_arrival};
use crate::journey::path_items::{build_path_items, KM_TO_M};
use crate::proto::{GeographicalCoord, Journey, PathItem, Section, SectionType, StreetNetwork, StreetNetworkMode};
use crate::worker::error::{HandlerError, HandlerResult};

const RENT_INSTRUCTION: &str = "Rent a bike from bike share station.";
const RETURN_INSTRUCTION: &str = "Return the bike to the bike share station.";

/// Request parameters the assembly depends on.
#[derive(Debug, Clone, Copy)]
pub struct JourneyRequest {
    /// Departure time, or arrival time when `clockwise` is false.
    pub datetime: u64,
    pub clockwise: bool,
    pub enable_instructions: bool,
}

/// Shape of the trip, read from the bike-share markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trip {
    SingleMode,
    BikeShare { rent: usize, put_back: usize },
}

fn classify(maneuvers: &[Maneuver]) -> HandlerResult<Trip> {
    let find = |kind| maneuvers.iter().position(|m| m.bss_maneuver == kind);
    match (find(BssManeuver::Rent), find(BssManeuver::Return)) {
        (None, None) => Ok(Trip::SingleMode),
        (Some(rent), Some(put_back)) if rent < put_back => Ok(Trip::BikeShare { rent, put_back }),
        (Some(_), _) => Err(HandlerError::InconsistentBikeShare {
            found: "rent",
            missing: "return",
        }),
        (None, Some(_)) => Err(HandlerError::InconsistentBikeShare {
            found: "return",
            missing: "rent",
        }),
    }
}

fn street_network_mode(travel_mode: TravelMode) -> StreetNetworkMode {
    match travel_mode {
        TravelMode::Pedestrian => StreetNetworkMode::Walking,
        TravelMode::Bicycle => StreetNetworkMode::Bike,
        TravelMode::Drive => StreetNetworkMode::Car,
    }
}

fn shape_point(shape: &[Coordinate], index: usize) -> HandlerResult<Coordinate> {
    shape.get(index).copied().ok_or(HandlerError::ShapeIndex {
        index,
        len: shape.len(),
    })
}

fn to_i32(value: i64) -> i32 {
    i32::try_from(value.max(0)).unwrap_or(i32::MAX)
}

/// How the endpoints of a street section are described.
#[derive(Debug, Clone, Copy)]
enum Endpoints {
    Addresses,
    ByTravelMode,
}

#[derive(Debug, Clone, Copy)]
enum Station {
    Rent,
    PutBack,
}

struct SectionChain<'a> {
    path: &'a EnginePath,
    costing: &'a Costing,
    request: &'a JourneyRequest,
    elevation: Option<&'a dyn ElevationProvider>,
    sections: Vec<Section>,
    clock: u64,
}

impl<'a> SectionChain<'a> {
    /// Append `section`, starting where the previous one ended.
    fn push(&mut self, mut section: Section) {
        section.id = format!("section_{}", self.sections.len());
        section.begin_date_time = self.clock;
        section.end_date_time = self.clock.saturating_add_signed(i64::from(section.duration));
        self.clock = section.end_date_time;
        self.sections.push(section);
    }

    fn street_section(&self, range: Range<usize>, endpoints: Endpoints) -> HandlerResult<Section> {
        let maneuvers = &self.path.maneuvers;
        let shape = &self.path.shape;
        let begin = &maneuvers[range.start];

        let mut duration: i64 = maneuvers[range.clone()].iter().map(|m| i64::from(m.time)).sum();
        // the engine already counted the station penalty in this maneuver
        duration -= match begin.bss_maneuver {
            BssManeuver::Rent => i64::from(self.costing.bike_share.rent_duration),
            BssManeuver::Return => i64::from(self.costing.bike_share.return_duration),
            BssManeuver::None => 0,
        };
        let length: f64 = maneuvers[range.clone()].iter().map(|m| m.length_km * KM_TO_M).sum();

        let begin_idx = begin.begin_shape_index;
        let (end_idx, destination, end_maneuver) = if range.end >= maneuvers.len() {
            let last = shape_point(shape, shape.len().saturating_sub(1))?;
            (shape.len(), last, &maneuvers[maneuvers.len() - 1])
        } else {
            let end = &maneuvers[range.end];
            (end.begin_shape_index + 1, shape_point(shape, end.begin_shape_index)?, end)
        };
        let coordinates = shape.get(begin_idx..end_idx).ok_or(HandlerError::ShapeIndex {
            index: end_idx,
            len: shape.len(),
        })?;
        let origin = shape_point(shape, begin_idx)?;

        let (origin, destination) = match endpoints {
            Endpoints::Addresses => (
                Endpoint::address(origin, begin),
                Endpoint::address(destination, end_maneuver),
            ),
            Endpoints::ByTravelMode => (
                Endpoint::for_travel_mode(begin.travel_mode, origin, begin),
                Endpoint::for_travel_mode(begin.travel_mode, destination, end_maneuver),
            ),
        };

        let mode = street_network_mode(begin.travel_mode);
        let duration = to_i32(duration);
        let length = to_i32(length.round() as i64);
        let mut street_network = StreetNetwork {
            duration,
            length,
            path_items: build_path_items(maneuvers, range, shape, self.request.enable_instructions),
            coordinates: coordinates.iter().map(|&c| GeographicalCoord::from(c)).collect(),
            elevations: self.elevations(mode, coordinates),
            ..Default::default()
        };
        street_network.set_mode(mode);

        let mut section = Section {
            origin: Some(origin.into_pt_object()),
            destination: Some(destination.into_pt_object()),
            duration,
            length,
            street_network: Some(street_network),
            ..Default::default()
        };
        section.set_section_type(SectionType::StreetNetwork);
        Ok(section)
    }

    fn elevations(&self, mode: StreetNetworkMode, coordinates: &[Coordinate]) -> Vec<crate::proto::ElevationInfo> {
        let Some(provider) = self.elevation else {
            return Vec::new();
        };
        if !matches!(
            mode,
            StreetNetworkMode::Walking | StreetNetworkMode::Bike | StreetNetworkMode::Bss
        ) {
            return Vec::new();
        }
        match provider.elevations(coordinates) {
            Ok(elevations) => elevations,
            Err(e) => {
                tracing::warn!(error = %e, points = coordinates.len(), "Elevation lookup failed");
                Vec::new()
            }
        }
    }

    fn station_section(&self, index: usize, station: Station) -> HandlerResult<Section> {
        let maneuver = &self.path.maneuvers[index];
        let point = shape_point(&self.path.shape, maneuver.begin_shape_index)?;

        let (duration, instruction, section_type, origin, destination) = match station {
            Station::Rent => (
                self.costing.bike_share.rent_duration,
                RENT_INSTRUCTION,
                SectionType::BssRent,
                Endpoint::address(point, maneuver),
                Endpoint::poi(point, maneuver),
            ),
            Station::PutBack => (
                self.costing.bike_share.return_duration,
                RETURN_INSTRUCTION,
                SectionType::BssPutBack,
                Endpoint::poi(point, maneuver),
                Endpoint::address(point, maneuver),
            ),
        };
        let duration = to_i32(i64::from(duration));

        let mut street_network = StreetNetwork {
            duration,
            length: 0,
            path_items: vec![PathItem {
                duration,
                instruction: instruction.to_string(),
                ..Default::default()
            }],
            coordinates: vec![point.into()],
            ..Default::default()
        };
        street_network.set_mode(street_network_mode(maneuver.travel_mode));

        let mut section = Section {
            origin: Some(origin.into_pt_object()),
            destination: Some(destination.into_pt_object()),
            duration,
            length: 0,
            street_network: Some(street_network),
            ..Default::default()
        };
        section.set_section_type(section_type);
        Ok(section)
    }

    fn single_mode(&mut self) -> HandlerResult<()> {
        let section = self.street_section(0..self.path.maneuvers.len(), Endpoints::Addresses)?;
        self.push(section);
        Ok(())
    }

    /// Up to five sections: walk, rent, ride, put back, walk.
    fn bike_share(&mut self, rent: usize, put_back: usize) -> HandlerResult<()> {
        let nb_maneuvers = self.path.maneuvers.len();

        if rent > 0 {
            let section = self.street_section(0..rent, Endpoints::ByTravelMode)?;
            self.push(section);
        }
        let section = self.station_section(rent, Station::Rent)?;
        self.push(section);

        let section = self.street_section(rent..put_back, Endpoints::ByTravelMode)?;
        self.push(section);

        let section = self.station_section(put_back, Station::PutBack)?;
        self.push(section);

        if put_back + 1 < nb_maneuvers {
            let section = self.street_section(put_back..nb_maneuvers, Endpoints::ByTravelMode)?;
            self.push(section);
        }
        Ok(())
    }
}

/// Assemble the journey for a non-empty engine path.
pub fn build_journey(
    request: &JourneyRequest,
    path: &EnginePath,
    costing: &Costing,
    elevation: Option<&dyn ElevationProvider>,
) -> HandlerResult<Journey> {
    let trip = match costing.mode {
        Mode::Bss => classify(&path.maneuvers)?,
        _ => Trip::SingleMode,
    };

    let mut chain = SectionChain {
        path,
        costing,
        request,
        elevation,
        sections: Vec::new(),
        clock: request.datetime,
    };
    match trip {
        Trip::SingleMode => chain.single_mode()?,
        Trip::BikeShare { rent, put_back } => chain.bike_share(rent, put_back)?,
    }

    let duration = to_i32(i64::from(path.elapsed_secs));
    let mut journey = Journey {
        duration,
        nb_transfers: 0,
        requested_date_time: request.datetime,
        departure_date_time: request.datetime,
        arrival_date_time: request.datetime.saturating_add(u64::from(path.elapsed_secs)),
        nb_sections: chain.sections.len() as u32,
        sections: chain.sections,
        ..Default::default()
    };

    if !request.clockwise {
        recompute_from_arrival(&mut journey, request.datetime);
    }
    compute_metadata(&mut journey);

    tracing::debug!(
        mode = %costing.mode,
        nb_sections = journey.nb_sections,
        duration = journey.duration,
        "Journey assembled"
    );
    Ok(journey)
}
