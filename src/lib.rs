pub mod browser;
pub mod config;
pub mod error;
pub mod facility;
pub mod output;
pub mod pipeline;
pub mod providers;
pub mod scoring;
pub mod server;
pub mod verify;
