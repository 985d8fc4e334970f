//! Disassembly listing output.
//!
//! # Key Types
//! - [`Printer`] - Renders a [`crate::ClassFile`] to text
//! - [`DisassemblyConfig`] - Selects the optional sections of the listing

pub mod config;
pub mod printer;

pub use config::DisassemblyConfig;
pub use printer::Printer;
