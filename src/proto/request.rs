use prost::{Enumeration, Message};

/// Operation requested by the client.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Enumeration)]
#[repr(i32)]
pub enum Api {
    Unknown = 0,
    StreetNetworkRoutingMatrix = 1,
    DirectPath = 2,
}

#[derive(Clone, PartialEq, Message)]
pub struct Request {
    #[prost(enumeration = "Api", tag = "1")]
    pub requested_api: i32,
    #[prost(message, optional, tag = "2")]
    pub sn_routing_matrix: Option<StreetNetworkRoutingMatrixRequest>,
    #[prost(message, optional, tag = "3")]
    pub direct_path: Option<DirectPathRequest>,
}

/// A place given as `coord:<lon>:<lat>` or `<lon>;<lat>`.
#[derive(Clone, PartialEq, Message)]
pub struct LocationContext {
    #[prost(string, tag = "1")]
    pub place: String,
    #[prost(uint32, tag = "2")]
    pub access_duration: u32,
}

/// Per-request routing preferences.
#[derive(Clone, PartialEq, Message)]
pub struct StreetNetworkParams {
    #[prost(string, tag = "1")]
    pub origin_mode: String,
    /// Speeds in meters per second; zero means "use the default".
    #[prost(double, tag = "2")]
    pub walking_speed: f64,
    #[prost(double, tag = "3")]
    pub bike_speed: f64,
    #[prost(double, tag = "4")]
    pub car_speed: f64,
    #[prost(double, optional, tag = "5")]
    pub bss_speed: Option<f64>,
    #[prost(double, tag = "6")]
    pub taxi_speed: f64,
    #[prost(uint32, optional, tag = "7")]
    pub bss_rent_duration: Option<u32>,
    #[prost(uint32, optional, tag = "8")]
    pub bss_rent_penalty: Option<u32>,
    #[prost(uint32, optional, tag = "9")]
    pub bss_return_duration: Option<u32>,
    #[prost(uint32, optional, tag = "10")]
    pub bss_return_penalty: Option<u32>,
    #[prost(bool, tag = "11")]
    pub enable_instructions: bool,
    #[prost(float, optional, tag = "12")]
    pub bike_use_roads: Option<f32>,
    #[prost(float, optional, tag = "13")]
    pub bike_use_hills: Option<f32>,
    #[prost(float, optional, tag = "14")]
    pub bike_use_ferry: Option<f32>,
    #[prost(float, optional, tag = "15")]
    pub bike_avoid_bad_surfaces: Option<f32>,
}

#[derive(Clone, PartialEq, Message)]
pub struct StreetNetworkRoutingMatrixRequest {
    #[prost(message, repeated, tag = "1")]
    pub origins: Vec<LocationContext>,
    #[prost(message, repeated, tag = "2")]
    pub destinations: Vec<LocationContext>,
    #[prost(string, tag = "3")]
    pub mode: String,
    /// Seconds; pairs slower than this are reported as unreached.
    #[prost(int32, tag = "4")]
    pub max_duration: i32,
    #[prost(message, optional, tag = "5")]
    pub streetnetwork_params: Option<StreetNetworkParams>,
    #[prost(double, optional, tag = "6")]
    pub max_walking_duration_coeff: Option<f64>,
    #[prost(double, optional, tag = "7")]
    pub max_bike_duration_coeff: Option<f64>,
    #[prost(double, optional, tag = "8")]
    pub max_bss_duration_coeff: Option<f64>,
    #[prost(double, optional, tag = "9")]
    pub max_car_duration_coeff: Option<f64>,
}

#[derive(Clone, PartialEq, Message)]
pub struct DirectPathRequest {
    #[prost(message, optional, tag = "1")]
    pub origin: Option<LocationContext>,
    #[prost(message, optional, tag = "2")]
    pub destination: Option<LocationContext>,
    /// POSIX timestamp; departure when `clockwise`, arrival otherwise.
    #[prost(uint64, tag = "3")]
    pub datetime: u64,
    #[prost(bool, tag = "4")]
    pub clockwise: bool,
    #[prost(message, optional, tag = "5")]
    pub streetnetwork_params: Option<StreetNetworkParams>,
}
