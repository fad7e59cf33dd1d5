//! Section endpoints.

use crate::engine::{BssStation, Coordinate, Maneuver, TravelMode};
use crate::proto::{Address, Code, EmbeddedType, Poi, PoiType, PtObject};

const BICYCLE_RENTAL_TYPE_URI: &str = "poi_type:amenity:bicycle_rental";
const BICYCLE_RENTAL_TYPE_NAME: &str = "Bicycle Rental Station";

/// Where a section starts or ends.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    Address(AddressEndpoint),
    Poi(PoiEndpoint),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddressEndpoint {
    pub coordinate: Coordinate,
    pub street_name: String,
}

/// A bike-share station.
#[derive(Debug, Clone, PartialEq)]
pub struct PoiEndpoint {
    pub coordinate: Coordinate,
    pub street_name: String,
    pub station: BssStation,
}

fn street_name(maneuver: &Maneuver) -> String {
    maneuver.street_name.clone().unwrap_or_default()
}

impl Endpoint {
    pub fn address(coordinate: Coordinate, maneuver: &Maneuver) -> Self {
        Endpoint::Address(AddressEndpoint {
            coordinate,
            street_name: street_name(maneuver),
        })
    }

    pub fn poi(coordinate: Coordinate, maneuver: &Maneuver) -> Self {
        Endpoint::Poi(PoiEndpoint {
            coordinate,
            street_name: street_name(maneuver),
            station: maneuver.bss_station.clone().unwrap_or_default(),
        })
    }

    /// Endpoints of a bike-share street section: riding sections run
    /// between stations, walking ones between addresses.
    pub fn for_travel_mode(travel_mode: TravelMode, coordinate: Coordinate, maneuver: &Maneuver) -> Self {
        match travel_mode {
            TravelMode::Bicycle => Self::poi(coordinate, maneuver),
            TravelMode::Pedestrian | TravelMode::Drive => Self::address(coordinate, maneuver),
        }
    }

    pub fn into_pt_object(self) -> PtObject {
        match self {
            Endpoint::Address(address) => address.into_pt_object(),
            Endpoint::Poi(poi) => poi.into_pt_object(),
        }
    }
}

/// `lon;lat` with five decimals.
fn coordinate_uri(c: Coordinate) -> String {
    format!("{:.5};{:.5}", c.lon, c.lat)
}

impl AddressEndpoint {
    fn to_address(&self) -> Address {
        Address {
            uri: coordinate_uri(self.coordinate),
            name: self.street_name.clone(),
            label: self.street_name.clone(),
            coord: Some(self.coordinate.into()),
        }
    }

    fn into_pt_object(self) -> PtObject {
        let address = self.to_address();
        let mut object = PtObject {
            name: self.street_name,
            uri: address.uri.clone(),
            address: Some(address),
            ..Default::default()
        };
        object.set_embedded_type(EmbeddedType::Address);
        object
    }
}

impl PoiEndpoint {
    fn into_pt_object(self) -> PtObject {
        let station = self.station;
        let uri = format!("poi:osm:node:{}", station.osm_node_id);
        let property = |key: &str, value: String| Code {
            key: key.to_string(),
            value,
        };

        let poi = Poi {
            uri: uri.clone(),
            name: station.name.clone(),
            label: station.name.clone(),
            coord: Some(self.coordinate.into()),
            poi_type: Some(PoiType {
                uri: BICYCLE_RENTAL_TYPE_URI.to_string(),
                name: BICYCLE_RENTAL_TYPE_NAME.to_string(),
            }),
            properties: vec![
                property("amenity", "bicycle_rental".to_string()),
                property("capacity", station.capacity.to_string()),
                property("description", self.street_name.clone()),
                property("name", station.name.clone()),
                property("network", station.network),
                property("operator", station.operator),
                property("ref", station.reference),
            ],
            address: Some(
                AddressEndpoint {
                    coordinate: self.coordinate,
                    street_name: self.street_name.clone(),
                }
                .to_address(),
            ),
        };

        let mut object = PtObject {
            name: self.street_name,
            uri,
            poi: Some(poi),
            ..Default::default()
        };
        object.set_embedded_type(EmbeddedType::Poi);
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_uri_has_five_decimals() {
        let maneuver = Maneuver {
            street_name: Some("rue de la Paix".into()),
            ..Default::default()
        };
        let object = Endpoint::address(Coordinate::new(50.123456, 1.4576345), &maneuver).into_pt_object();
        assert_eq!(object.embedded_type(), EmbeddedType::Address);
        assert_eq!(object.uri, "50.12346;1.45763");
        assert_eq!(object.name, "rue de la Paix");
        assert_eq!(object.address.unwrap().coord.unwrap().lon, 50.123456);
    }

    #[test]
    fn missing_street_name_is_empty() {
        let object =
            Endpoint::for_travel_mode(TravelMode::Pedestrian, Coordinate::new(1.0, 2.0), &Maneuver::default())
                .into_pt_object();
        assert_eq!(object.embedded_type(), EmbeddedType::Address);
        assert_eq!(object.name, "");
    }

    #[test]
    fn station_maneuver_becomes_poi() {
        let maneuver = Maneuver {
            travel_mode: TravelMode::Bicycle,
            street_name: Some("quai".into()),
            bss_station: Some(BssStation {
                osm_node_id: 42,
                name: "Gare".into(),
                capacity: 20,
                network: "Velib".into(),
                operator: "JCDecaux".into(),
                reference: "R12".into(),
            }),
            ..Default::default()
        };
        let object = Endpoint::for_travel_mode(maneuver.travel_mode, Coordinate::new(1.0, 2.0), &maneuver)
            .into_pt_object();
        assert_eq!(object.embedded_type(), EmbeddedType::Poi);
        assert_eq!(object.uri, "poi:osm:node:42");
        assert_eq!(object.name, "quai");

        let poi = object.poi.unwrap();
        assert_eq!(poi.name, "Gare");
        assert_eq!(poi.poi_type.unwrap().name, "Bicycle Rental Station");
        let properties: Vec<(String, String)> =
            poi.properties.into_iter().map(|c| (c.key, c.value)).collect();
        assert!(properties.contains(&("capacity".into(), "20".into())));
        assert!(properties.contains(&("ref".into(), "R12".into())));
        assert!(properties.contains(&("description".into(), "quai".into())));
    }
}
