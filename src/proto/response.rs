use prost::{Enumeration, Message};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum ResponseType {
    Unknown = 0,
    ItineraryFound = 1,
    NoSolution = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum ErrorId {
    Unknown = 0,
    InvalidProtobufRequest = 1,
    InternalError = 2,
    NoOrigin = 3,
    NoDestination = 4,
    NoOriginNorDestination = 5,
    BadFormat = 6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum RoutingStatus {
    Unknown = 0,
    Reached = 1,
    Unreached = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum SectionType {
    Unknown = 0,
    StreetNetwork = 1,
    BssRent = 2,
    BssPutBack = 3,
    Transfer = 4,
    CrowFly = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum TransferType {
    Walking = 0,
    StayIn = 1,
    Guaranteed = 2,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum StreetNetworkMode {
    Walking = 0,
    Bike = 1,
    Car = 2,
    Bss = 3,
    Ridesharing = 4,
    CarNoPark = 5,
    Taxi = 6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum CyclePathType {
    NoCycleLane = 0,
    SharedCycleWay = 1,
    DedicatedCycleWay = 2,
    SeparatedCycleWay = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum EmbeddedType {
    Unknown = 0,
    Address = 1,
    Poi = 2,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Response {
    #[prost(enumeration = "ResponseType", tag = "1")]
    pub response_type: i32,
    #[prost(message, optional, tag = "2")]
    pub error: Option<Error>,
    #[prost(message, repeated, tag = "3")]
    pub journeys: Vec<Journey>,
    #[prost(message, optional, tag = "4")]
    pub sn_routing_matrix: Option<StreetNetworkRoutingMatrix>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Error {
    #[prost(enumeration = "ErrorId", tag = "1")]
    pub id: i32,
    #[prost(string, tag = "2")]
    pub message: String,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct StreetNetworkRoutingMatrix {
    #[prost(message, repeated, tag = "1")]
    pub rows: Vec<MatrixRow>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct MatrixRow {
    #[prost(message, repeated, tag = "1")]
    pub routing_response: Vec<RoutingElement>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct RoutingElement {
    /// Seconds, `-1` when the pair could not be projected.
    #[prost(int32, tag = "1")]
    pub duration: i32,
    #[prost(enumeration = "RoutingStatus", tag = "2")]
    pub routing_status: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Journey {
    #[prost(int32, tag = "1")]
    pub duration: i32,
    #[prost(int32, tag = "2")]
    pub nb_transfers: i32,
    #[prost(uint64, tag = "3")]
    pub requested_date_time: u64,
    #[prost(uint64, tag = "4")]
    pub departure_date_time: u64,
    #[prost(uint64, tag = "5")]
    pub arrival_date_time: u64,
    #[prost(message, repeated, tag = "6")]
    pub sections: Vec<Section>,
    #[prost(uint32, tag = "7")]
    pub nb_sections: u32,
    #[prost(message, optional, tag = "8")]
    pub durations: Option<Durations>,
    #[prost(message, optional, tag = "9")]
    pub distances: Option<Distances>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Durations {
    #[prost(int32, tag = "1")]
    pub total: i32,
    #[prost(int32, tag = "2")]
    pub walking: i32,
    #[prost(int32, tag = "3")]
    pub bike: i32,
    #[prost(int32, tag = "4")]
    pub car: i32,
    #[prost(int32, tag = "5")]
    pub ridesharing: i32,
    #[prost(int32, tag = "6")]
    pub taxi: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Distances {
    #[prost(int32, tag = "1")]
    pub walking: i32,
    #[prost(int32, tag = "2")]
    pub bike: i32,
    #[prost(int32, tag = "3")]
    pub car: i32,
    #[prost(int32, tag = "4")]
    pub ridesharing: i32,
    #[prost(int32, tag = "5")]
    pub taxi: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Section {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "SectionType", tag = "2")]
    pub section_type: i32,
    #[prost(message, optional, tag = "3")]
    pub origin: Option<PtObject>,
    #[prost(message, optional, tag = "4")]
    pub destination: Option<PtObject>,
    #[prost(uint64, tag = "5")]
    pub begin_date_time: u64,
    #[prost(uint64, tag = "6")]
    pub end_date_time: u64,
    #[prost(int32, tag = "7")]
    pub duration: i32,
    /// Meters.
    #[prost(int32, tag = "8")]
    pub length: i32,
    #[prost(message, optional, tag = "9")]
    pub street_network: Option<StreetNetwork>,
    #[prost(enumeration = "TransferType", tag = "10")]
    pub transfer_type: i32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct StreetNetwork {
    #[prost(int32, tag = "1")]
    pub duration: i32,
    #[prost(int32, tag = "2")]
    pub length: i32,
    #[prost(enumeration = "StreetNetworkMode", tag = "3")]
    pub mode: i32,
    #[prost(message, repeated, tag = "4")]
    pub path_items: Vec<PathItem>,
    #[prost(message, repeated, tag = "5")]
    pub coordinates: Vec<GeographicalCoord>,
    #[prost(message, repeated, tag = "6")]
    pub elevations: Vec<ElevationInfo>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PathItem {
    #[prost(string, tag = "1")]
    pub name: String,
    /// Meters.
    #[prost(double, tag = "2")]
    pub length: f64,
    #[prost(int32, tag = "3")]
    pub duration: i32,
    /// Degrees in `(-180, 180]`.
    #[prost(int32, tag = "4")]
    pub direction: i32,
    #[prost(string, tag = "5")]
    pub instruction: String,
    #[prost(message, optional, tag = "6")]
    pub instruction_start_coordinate: Option<GeographicalCoord>,
    #[prost(enumeration = "CyclePathType", optional, tag = "7")]
    pub cycle_path_type: Option<i32>,
}

#[derive(Clone, Copy, PartialEq, Message, Serialize)]
pub struct GeographicalCoord {
    #[prost(double, tag = "1")]
    pub lon: f64,
    #[prost(double, tag = "2")]
    pub lat: f64,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct ElevationInfo {
    #[prost(double, tag = "1")]
    pub distance_from_start: f64,
    #[prost(double, tag = "2")]
    pub elevation: f64,
    #[prost(uint32, tag = "3")]
    pub geojson_index: u32,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PtObject {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub uri: String,
    #[prost(enumeration = "EmbeddedType", tag = "3")]
    pub embedded_type: i32,
    #[prost(message, optional, tag = "4")]
    pub address: Option<Address>,
    #[prost(message, optional, tag = "5")]
    pub poi: Option<Poi>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Address {
    #[prost(string, tag = "1")]
    pub uri: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub label: String,
    #[prost(message, optional, tag = "4")]
    pub coord: Option<GeographicalCoord>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Poi {
    #[prost(string, tag = "1")]
    pub uri: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub label: String,
    #[prost(message, optional, tag = "4")]
    pub coord: Option<GeographicalCoord>,
    #[prost(message, optional, tag = "5")]
    pub poi_type: Option<PoiType>,
    #[prost(message, repeated, tag = "6")]
    pub properties: Vec<Code>,
    #[prost(message, optional, tag = "7")]
    pub address: Option<Address>,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct PoiType {
    #[prost(string, tag = "1")]
    pub uri: String,
    #[prost(string, tag = "2")]
    pub name: String,
}

#[derive(Clone, PartialEq, Message, Serialize)]
pub struct Code {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(string, tag = "2")]
    pub value: String,
}
