pub mod api;
pub mod dataset;
pub mod error;
pub mod neighbors;
