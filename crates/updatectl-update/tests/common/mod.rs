//! Shared test infrastructure for updatectl-update tests
//!
//! - `constants`: versions, platform identifiers, repository paths
//! - `mock_server`: wiremock endpoints for the release repository
//! - `helpers`: recording reporter, scripted prompter, fake executables

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod constants;
pub mod helpers;
pub mod mock_server;

pub use constants::*;
pub use helpers::*;
pub use mock_server::*;
