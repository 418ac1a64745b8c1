//! Test Helper Utilities
//!
//! Shared oracle doubles, factories and log capture for sentiscore-engine tests

#![allow(dead_code)]

pub mod log_capture;
pub mod oracles;

pub use log_capture::LogCapture;
pub use oracles::{
    stub_factory, stub_oracles, CountingFactory, FlakyFactory, KeywordLexical, PanickingFactory,
    StubToxicity,
};
