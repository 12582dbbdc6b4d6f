//! Submit-gated search front end over a metadata provider.

pub mod gate;
pub mod render;
pub mod session;

pub use gate::{GateState, SearchGate};
pub use session::SearchSession;
