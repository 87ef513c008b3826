//! Bonsai Library
//!
//! Procedural ASCII bonsai generation plus durable, cached storage of the
//! generated trees keyed by configuration identifiers.

pub mod cache;
pub mod canvas;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod generator;
pub mod grower;
pub mod store;
pub mod tree;
pub mod types;

// Re-export main types for convenience
pub use cache::{MemoryCache, TreeCache};
pub use canvas::Canvas;
pub use catalog::{Catalog, SeasonPalette, StyleProfile, TrunkGlyphs};
pub use config::EngineConfig;
pub use error::{BonsaiError, Result};
pub use generator::{Fallback, GenerateOptions, ResolvedOptions, TreeGenerator};
pub use grower::TreeGrower;
pub use store::TreeStore;
pub use tree::{render, BonsaiTree};
pub use types::{AgeStage, Hemisphere, Season, Style};
