pub mod duffel_service;
pub mod sanity_service;

pub use duffel_service::DuffelClient;
pub use sanity_service::SanityClient;
