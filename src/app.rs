//! The interaction layer of fbrowse.
//!
//! [Session] is the state machine a host drives: it receives [Event]s, answers
//! with [Directive]s and exposes the rows, icons and message to render.

pub mod session;
pub mod state;

pub use session::{Collaborators, Session};
pub use state::{DirectoryState, Directive, Event, InteractionState};
