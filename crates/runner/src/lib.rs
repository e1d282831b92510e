#![forbid(unsafe_code)]
#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

//! Load a WebAssembly module and call its integer exports.
//!
//! The module is instantiated with [`tinywasm`] against an empty import
//! environment. Exports are resolved by name and must take and return a single
//! integer; whether that is an `i32` or an `i64` is read from the module itself.
//!
//! ```no_run
//! use metal_runner::{run, RunConfig};
//!
//! let outcome = run(&RunConfig::in_dir("."))?;
//! outcome.write_to(std::io::stdout().lock())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod exports;
mod instance;
mod module;
mod run;
mod value;

pub use error::*;
pub use exports::{ExportEntry, ExportSignatures};
pub use instance::{Instance, IntFunc};
pub use module::WasmModule;
pub use run::*;
pub use value::IntWidth;
