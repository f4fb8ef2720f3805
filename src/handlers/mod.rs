pub mod client;
pub mod export;
pub mod pipeline;
pub mod search;
