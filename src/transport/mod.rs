/// Local filesystem discovery and path conventions.
pub mod fs;
