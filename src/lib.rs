// Library surface shared by the binary and the integration tests
pub mod cli;
pub mod config;
pub mod ledger;
pub mod logging;
pub mod manager;
pub mod math;
pub mod params;
pub mod rewards;
pub mod settlement;
pub mod types;
