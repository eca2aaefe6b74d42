//! Common test infrastructure for kubev-install-core tests
//!
//! In a test file:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! - `constants`: versions, platform identifiers, test data
//! - `builders`: release fixtures (zip archive + checksum manifest)
//! - `mock_server`: wiremock setup for the releases API and asset downloads
//! - `helpers`: installer configuration pointed at a mock server

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod constants;
pub mod helpers;
pub mod mock_server;

pub use builders::*;
pub use constants::*;
pub use helpers::*;
pub use mock_server::*;
