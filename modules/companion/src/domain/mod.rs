pub mod error;
pub mod events;
pub mod flows;
pub mod journal;
pub mod media;
pub mod ports;
pub mod repo;
pub mod service;
pub mod usage;
pub mod voice;
