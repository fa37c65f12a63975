//! Configuration for fbrowse.
//!
//! [load] reads `fbrowse.toml` into [Config]; [general], [display] and [input]
//! define its tables. Command line values are layered on top with [Overrides].

pub mod display;
pub mod general;
pub mod input;
pub mod load;

pub use display::{Display, MatchMethod};
pub use general::{General, InternalGeneral};
pub use input::{Keys, Open};
pub use load::{Config, Overrides};
