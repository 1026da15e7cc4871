//! Application ports (traits) for external dependencies.
//!
//! In hexagonal architecture, ports define interfaces that the application
//! needs from the outside world. Adapters in `strata-adapters` implement these.
//!
//! ## Port Types
//!
//! - **Driven (Output) Ports**: Called by application, implemented by infrastructure
//!   - `Filesystem`: read, write, directory creation
//!
//! - **Driving (Input) Ports**: the `GenerationService` methods, called by the CLI

pub mod output;

pub use output::Filesystem;

#[cfg(test)]
pub use output::MockFilesystem;
