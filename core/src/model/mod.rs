pub mod reading;
pub mod stats;
pub mod theme;
