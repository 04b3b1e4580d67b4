/// The hero, ability, weapon and upgrade pipeline
pub mod assets;
/// Access to the exported data files
pub mod data;
/// Error definitions
pub mod error;
/// Identifier and value types shared across the pipeline
pub mod game_types;
/// Generic wrapper for values that may or may not match a known variant.
pub mod recognized;
