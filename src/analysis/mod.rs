// Analysis module
pub mod aggregate;

pub use aggregate::{aggregate, apply_capacity, SeatCapacity};
