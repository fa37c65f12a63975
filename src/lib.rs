//! Internal library crate for fbrowse.
//!
//! The shipped application is the `fbrowse` binary (`src/main.rs`).
//!
//! [app::Session] is the browsing state machine; [core] holds the listing, path,
//! icon and opener logic it is built from; [ui] is the terminal host that
//! drives a session. Other hosts can drive a session through the same
//! `handle_event` and query methods.

pub mod app;
pub mod config;
pub mod core;
pub mod ui;
pub mod utils;
