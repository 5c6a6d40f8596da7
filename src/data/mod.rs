pub mod datetime;
pub mod loader;
pub mod mapping;
pub mod normalize;
