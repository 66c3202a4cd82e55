//! `mc-server`: the Minicontratos action server and CLI.
//!
//! Each former server action is one JSON endpoint answering with the
//! `{success, data?, error?}` envelope (see [`api::ActionResult`]).

pub mod api;
pub mod cli;
pub mod cors;
pub mod state;

pub use state::AppState;
