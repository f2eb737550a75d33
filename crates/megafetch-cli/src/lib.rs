#![doc = include_str!("../README.md")]
#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used only by the binary entry point
use dotenvy as _;
use tracing as _;
use tracing_subscriber as _;

pub mod bootstrap;
pub mod parser;

pub use bootstrap::{build_pipeline, run};
pub use parser::Cli;
