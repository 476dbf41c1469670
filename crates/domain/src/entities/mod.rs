//! Domain entities - Geocoding outcomes and provider snapshots

mod address;
mod geocode_response;
mod server_status;

pub use address::Address;
pub use geocode_response::{EMPTY_QUERY, GeocodeResponse, NO_RESULTS_FOUND};
pub use server_status::ServerStatus;
