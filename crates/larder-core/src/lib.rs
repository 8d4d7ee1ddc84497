//! # larder-core
//!
//! Core types, ID generation, and error types for Larder.
//!
//! This crate provides the foundational types shared across all Larder crates:
//! - Entity structs for the local kitchen store (allergens, ingredients, menu items)
//! - Read-only external catalog objects and the sync mapping join record
//! - Draft types produced by catalog transformation and consumed by import
//! - Status enums and the ingredient shelf-life heuristic
//! - ID prefix constants and generation
//! - The [`store::LocalStore`] seam and an in-memory implementation

pub mod drafts;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod ids;
pub mod results;
pub mod store;
