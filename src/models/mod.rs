pub mod error;
pub mod record;
pub mod tweet;
