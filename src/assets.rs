//! The asset pipeline: raw records in, typed heroes and items out.

/// Turns decoded records into entities and resolves their references
pub mod builder;
/// Item class name classification
pub mod classify;
mod de;
/// Panorama image paths and base URL rewriting
pub mod images;
/// Field names used by the exported records
pub mod keys;
/// Reads and filters the raw record files
pub mod loader;
/// The canonical entity set and the request-scoped query API
pub mod provider;
/// Per-record decoding
pub mod raw;
/// Localization token merging and display-name resolution
pub mod translations;
/// Entity and table types
pub mod types;

#[cfg(test)]
pub(crate) mod fixtures;

pub use builder::{BuildOptions, BuildOutput, build_entities};
pub use images::WithBaseUrl;
pub use provider::{AssetProvider, Assets, Query, RequestContext};
pub use types::{Ability, Entity, Hero, Item, ItemSlotType, ItemType, Upgrade, Weapon};
