pub mod color;
pub mod config;
pub mod data;
pub mod report;
pub mod state;
pub mod stats;
