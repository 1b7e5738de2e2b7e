pub mod config;
pub mod events;
pub mod export;
pub mod status;
pub mod sync;
