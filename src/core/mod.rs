//! Core data types for vanilla option pricing
//!
//! Defines fundamental types:
//! - OptionContract: booked terms of a European call/put
//! - Greeks / GreekSnapshot: sensitivities, flat or per day to expiry
//! - Day counting on YYYYMMDD dates
//! - PricingError: every failure the engine can report

pub mod day_count;
pub mod error;
pub mod greeks;
pub mod option;

pub use day_count::{day_count, parse_date, year_fraction, DAYS_PER_YEAR};
pub use error::*;
pub use greeks::*;
pub use option::*;
