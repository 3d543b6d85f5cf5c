pub mod clock;
pub mod events;
pub mod http;
pub mod llm;
pub mod storage;
pub mod voice;
