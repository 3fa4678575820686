//! Actor Model: run a typewriter stream on its own thread.
//!
//! - **Ticker Actor**: produces frame ticks at a fixed rate
//! - **Driver**: owns the stream, selects over control, pushes, ticks and
//!   settle deadlines, and publishes [`RevealEvent`]s
//!
//! Hosts that already own an event loop can skip this module and drive a
//! [`TypewriterStream`](crate::TypewriterStream) directly.

mod driver;
mod messages;
mod scheduler;
mod ticker;

pub use driver::{Driver, DriverConfig};
pub use messages::{Control, RevealEvent};
pub use scheduler::ThreadScheduler;
pub use ticker::{Tick, TickerActor};
