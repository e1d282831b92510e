use std::io::Write;
use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;
use metal_runner::{DEFAULT_MODULE_FILE, RunConfig, run};

/// Directory holding `code.wasm` in the source tree, fixed when the binary is built
const BUILD_MODULE_DIR: &str = env!("CARGO_MANIFEST_DIR");

fn main() -> Result<()> {
    pretty_env_logger::init();
    run_in(&module_dir(), std::io::stdout().lock())
}

/// The executable's own directory if it holds a module, otherwise the build-time directory
fn module_dir() -> PathBuf {
    let beside_exe = std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf));

    match beside_exe {
        Some(dir) if dir.join(DEFAULT_MODULE_FILE).is_file() => dir,
        _ => PathBuf::from(BUILD_MODULE_DIR),
    }
}

/// Run the module in `dir` and write its results to `out`.
///
/// Nothing is written unless every export was called successfully.
fn run_in(dir: &Path, out: impl Write) -> Result<()> {
    let config = RunConfig::in_dir(dir);
    debug!("config: {config:?}");

    let outcome = run(&config)?;
    outcome.write_to(out)?;
    Ok(())
}
