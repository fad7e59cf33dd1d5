use clap::{Args, Parser, Subcommand};

use street_router::client::RouterClient;
use street_router::proto::{
    Api, DirectPathRequest, LocationContext, Request, StreetNetworkParams, StreetNetworkRoutingMatrixRequest,
};

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Send routing requests to a street-router service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "127.0.0.1:6000")]
    address: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Durations from every origin to every destination
    Matrix {
        /// Origin as "lon;lat" or "coord:lon:lat" (repeatable)
        #[arg(long = "origin", required = true)]
        origins: Vec<String>,

        /// Destination as "lon;lat" or "coord:lon:lat" (repeatable)
        #[arg(long = "destination", required = true)]
        destinations: Vec<String>,

        /// Maximum duration in seconds
        #[arg(long, default_value_t = 3600)]
        max_duration: i32,

        #[command(flatten)]
        street: StreetArgs,
    },
    /// Itinerary between two points
    DirectPath {
        #[arg(long)]
        origin: String,

        #[arg(long)]
        destination: String,

        /// Unix timestamp; departure time unless --arrival is set
        #[arg(long, default_value_t = 0)]
        datetime: u64,

        /// Treat the datetime as the arrival time
        #[arg(long)]
        arrival: bool,

        /// Include turn-by-turn instructions
        #[arg(long)]
        instructions: bool,

        #[command(flatten)]
        street: StreetArgs,
    },
}

#[derive(Args)]
struct StreetArgs {
    /// walking, bike, bss, car or taxi
    #[arg(long, default_value = "walking")]
    mode: String,

    /// Speed in m/s for the chosen mode
    #[arg(long)]
    speed: Option<f64>,
}

impl StreetArgs {
    fn params(&self, enable_instructions: bool) -> StreetNetworkParams {
        let mut params = StreetNetworkParams {
            origin_mode: self.mode.clone(),
            enable_instructions,
            ..Default::default()
        };
        if let Some(speed) = self.speed {
            match self.mode.as_str() {
                "bike" => params.bike_speed = speed,
                "bss" => params.bss_speed = Some(speed),
                "car" => params.car_speed = speed,
                "taxi" => params.taxi_speed = speed,
                _ => params.walking_speed = speed,
            }
        }
        params
    }
}

fn place(place: String) -> LocationContext {
    LocationContext {
        place,
        access_duration: 0,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let request = match cli.command {
        Commands::Matrix {
            origins,
            destinations,
            max_duration,
            street,
        } => {
            let mut request = Request {
                sn_routing_matrix: Some(StreetNetworkRoutingMatrixRequest {
                    origins: origins.into_iter().map(place).collect(),
                    destinations: destinations.into_iter().map(place).collect(),
                    mode: street.mode.clone(),
                    max_duration,
                    streetnetwork_params: Some(street.params(false)),
                    ..Default::default()
                }),
                ..Default::default()
            };
            request.set_requested_api(Api::StreetNetworkRoutingMatrix);
            request
        }
        Commands::DirectPath {
            origin,
            destination,
            datetime,
            arrival,
            instructions,
            street,
        } => {
            let mut request = Request {
                direct_path: Some(DirectPathRequest {
                    origin: Some(place(origin)),
                    destination: Some(place(destination)),
                    datetime,
                    clockwise: !arrival,
                    streetnetwork_params: Some(street.params(instructions)),
                }),
                ..Default::default()
            };
            request.set_requested_api(Api::DirectPath);
            request
        }
    };

    let mut client = RouterClient::connect(&cli.address).await?;
    let response = client.send(&request).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
