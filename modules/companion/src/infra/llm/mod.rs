pub mod http_generative_client;

pub use http_generative_client::HttpGenerativeClient;
