pub mod app_state;
pub mod config;
pub mod entities;
pub mod geometry;
pub mod http;
pub mod net;
pub mod protocol;
pub mod room;
pub mod rooms;
pub mod server;
pub mod systems;
pub mod tuning;
pub mod world;

pub use server::{run, run_with_config};
