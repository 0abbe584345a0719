//! Sheet state and logic.

mod io;
mod ops;
mod state;

pub use state::Sheet;
