//! Contract-level pricing
//!
//! - `engine`: flat Greeks at full tenor and daily Greek/PnL term structures
//! - `risk_grid`: value and Greeks over a spot ladder for every day to expiry

pub mod engine;
pub mod risk_grid;

pub use engine::*;
pub use risk_grid::*;
