pub mod client;
pub mod forker;
pub mod poller;
pub mod types;
