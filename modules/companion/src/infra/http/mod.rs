pub mod traced_client;

pub use traced_client::TracedClient;
