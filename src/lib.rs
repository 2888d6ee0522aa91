//! showcase: build a student project showcase from CSV rosters
//!
//! Rosters are parsed, enriched with screenshots, palettes and avatars,
//! filtered, and written out as `projects`, `authors` and `briefings`
//! collections for the page-rendering layer.

pub mod capture;
pub mod cli;
pub mod collections;
pub mod config;
pub mod domain;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod palette;
pub mod render;
pub mod utils;
