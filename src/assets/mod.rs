pub mod color;
pub mod points;
pub mod store;
