//! # Option Model
//!
//! Option descriptors, the parsed option table and the command-line front
//! end that fills it.

pub mod cli;
pub mod descriptor;
pub mod table;

pub use cli::{Invocation, DUMP_CONFIG};
pub use descriptor::{descriptor, OptionCategory, OptionDescriptor, OptionKind, OPTIONS};
pub use table::{OptionTable, OptionValue};
