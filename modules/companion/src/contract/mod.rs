pub mod client;
pub mod error;
pub mod flows;
pub mod model;

pub use client::CompanionApi;
pub use error::CompanionError;
