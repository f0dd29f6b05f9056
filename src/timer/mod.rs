pub mod commands;
pub mod controller;
pub mod state;

pub use commands::FloorCommand;
pub use controller::FloorController;
pub use state::{FloorState, DEFAULT_TABLE_COUNT};
