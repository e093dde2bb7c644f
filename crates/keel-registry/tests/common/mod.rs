//! Common test utilities for keel-registry
//!
//! This module provides shared test infrastructure including:
//! - Catalog and platform builders for creating test fixtures
//! - An in-memory registry client with call recording
//! - Assertion helpers for merged catalogs

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod assertions;
pub mod builders;
pub mod mocks;

pub use assertions::*;
pub use builders::*;
pub use mocks::*;
