pub mod precision;

pub use precision::{implied_probability, percentage, round1, round2};
