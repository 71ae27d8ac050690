//! Panchayat welfare administration: resident registry, scheme eligibility, and
//! application review.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod welfare;
