mod error;
mod config;
mod types;
mod clock;
mod combat;
mod input;
mod state_machine;
mod ai;
mod events;
mod logging;
mod sim;

pub use error::*;
pub use config::*;
pub use types::*;
pub use clock::*;
pub use combat::*;
pub use input::*;
pub use state_machine::*;
pub use ai::*;
pub use events::*;
pub use logging::*;
pub use sim::*;
