pub mod http_voice_client;

pub use http_voice_client::HttpVoiceCloner;
