use std::io::Write;
use std::path::{Path, PathBuf};

use log::debug;

use crate::{Instance, Result, WasmModule};

/// The export names called by default, in order
pub const DEFAULT_EXPORTS: [&str; 2] = ["fact", "sumn"];

/// The argument passed to every export by default
pub const DEFAULT_ARGUMENT: i64 = 10;

/// The file name of the module expected next to the program
pub const DEFAULT_MODULE_FILE: &str = "code.wasm";

/// What to load and what to call
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Path of the module file
    pub module_path: PathBuf,
    /// Argument passed to every export
    pub argument: i64,
    /// Exports to call, in order
    pub exports: Vec<String>,
}

impl RunConfig {
    /// Call `fact` and `sumn` with `10` on the module at `module_path`
    pub fn new(module_path: impl Into<PathBuf>) -> Self {
        Self {
            module_path: module_path.into(),
            argument: DEFAULT_ARGUMENT,
            exports: DEFAULT_EXPORTS.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// Look for [`DEFAULT_MODULE_FILE`] inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(DEFAULT_MODULE_FILE))
    }

    /// Use a different argument
    pub fn with_argument(mut self, argument: i64) -> Self {
        self.argument = argument;
        self
    }
}

/// Results of a run, in call order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Outcome {
    /// `(export name, result)` pairs
    pub results: Vec<(String, i64)>,
}

impl Outcome {
    /// The result of the named export, if it was called
    pub fn get(&self, name: &str) -> Option<i64> {
        self.results.iter().find(|(n, _)| n == name).map(|(_, value)| *value)
    }

    /// Write one result per line
    pub fn write_to(&self, mut out: impl Write) -> std::io::Result<()> {
        for (_, value) in &self.results {
            writeln!(out, "{value}")?;
        }
        out.flush()
    }
}

/// Read, instantiate and call every configured export.
///
/// All exports are resolved before the first call, so a lookup failure never
/// leaves a partial outcome behind.
pub fn run(config: &RunConfig) -> Result<Outcome> {
    let module = WasmModule::read(&config.module_path)?;
    run_module(&module, config)
}

/// Like [`run`], for a module that is already in memory
pub fn run_module(module: &WasmModule, config: &RunConfig) -> Result<Outcome> {
    let mut instance = Instance::new(module)?;
    let funcs = config.exports.iter().map(|name| instance.func(name)).collect::<Result<Vec<_>>>()?;
    debug!("resolved {} exports", funcs.len());

    let mut outcome = Outcome::default();
    for func in &funcs {
        let value = instance.call(func, config.argument)?;
        outcome.results.push((func.name().to_string(), value));
    }

    Ok(outcome)
}
