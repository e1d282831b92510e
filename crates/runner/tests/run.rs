use eyre::Result;
use metal_runner::{
    CallError, Error, Instance, InstantiationError, IntWidth, LookupError, RunConfig, WasmModule, run, run_module,
};

const CODE_WASM: &[u8] = include_bytes!("../../cli/code.wasm");
const CODE_WAT: &str = include_str!("../../cli/code.wat");

fn config() -> RunConfig {
    let _ = pretty_env_logger::try_init();
    RunConfig::new("unused.wasm")
}

fn messages(err: &dyn std::error::Error) -> Vec<String> {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(err) = source {
        messages.push(err.to_string());
        source = err.source();
    }
    messages
}

fn write_module(dir: &tempfile::TempDir, bytes: &[u8]) -> Result<RunConfig> {
    let path = dir.path().join("code.wasm");
    std::fs::write(&path, bytes)?;
    Ok(RunConfig::new(path))
}

#[test]
fn canonical_module() -> Result<()> {
    let outcome = run_module(&WasmModule::from_bytes(CODE_WASM), &config())?;
    assert_eq!(outcome.results, [("fact".to_string(), 3628800), ("sumn".to_string(), 55)]);
    Ok(())
}

#[test]
fn canonical_module_at_zero() -> Result<()> {
    let outcome = run_module(&WasmModule::from_bytes(CODE_WASM), &config().with_argument(0))?;
    assert_eq!(outcome.get("fact"), Some(1));
    assert_eq!(outcome.get("sumn"), Some(0));
    Ok(())
}

#[test]
fn canonical_module_widths() -> Result<()> {
    let instance = Instance::new(&WasmModule::from_bytes(CODE_WASM))?;
    assert_eq!(instance.exports().names().collect::<Vec<_>>(), ["fact", "sumn"]);
    assert_eq!(instance.func("fact")?.width(), IntWidth::I64);
    assert_eq!(instance.func("sumn")?.width(), IntWidth::I32);
    Ok(())
}

#[test]
fn text_and_binary_agree() -> Result<()> {
    let text = WasmModule::from_bytes(wat::parse_str(CODE_WAT)?);
    let binary = WasmModule::from_bytes(CODE_WASM);

    for arg in [0, 1, 2, 5, 10, 12] {
        let config = config().with_argument(arg);
        assert_eq!(run_module(&text, &config)?, run_module(&binary, &config)?, "argument {arg}");
    }
    Ok(())
}

#[test]
fn reads_from_disk() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let outcome = run(&write_module(&dir, CODE_WASM)?)?;

    let mut out = Vec::new();
    outcome.write_to(&mut out)?;
    assert_eq!(String::from_utf8(out)?, "3628800\n55\n");
    Ok(())
}

#[test]
fn missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let config = RunConfig::in_dir(dir.path());

    let err = run(&config).unwrap_err();
    assert!(matches!(&err, Error::FileRead { path, .. } if *path == config.module_path), "{err}");
    Ok(())
}

#[test]
fn invalid_module() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let err = run(&write_module(&dir, b"\0asm\x01\0\0\0garbage")?).unwrap_err();
    assert!(matches!(err, Error::Instantiation(InstantiationError::Engine(_))), "{err}");

    let err = run(&write_module(&dir, b"")?).unwrap_err();
    assert!(matches!(err, Error::Instantiation(_)), "{err}");
    Ok(())
}

#[test]
fn imports_are_not_satisfied() -> Result<()> {
    let wasm = wat::parse_str(
        r#"(module
            (import "env" "log" (func (param i32)))
            (func (export "fact") (param i32) (result i32) local.get 0)
            (func (export "sumn") (param i32) (result i32) local.get 0))"#,
    )?;

    let err = run_module(&WasmModule::from_bytes(wasm), &config()).unwrap_err();
    assert!(matches!(err, Error::Instantiation(InstantiationError::Engine(_))), "{err}");
    Ok(())
}

#[test]
fn missing_export_produces_no_results() -> Result<()> {
    let wasm = wat::parse_str(r#"(module (func (export "fact") (param i64) (result i64) i64.const 1))"#)?;

    let err = run_module(&WasmModule::from_bytes(wasm), &config()).unwrap_err();
    match err {
        Error::ExportLookup(LookupError::Missing { name }) => assert_eq!(name, "sumn"),
        err => panic!("expected a missing export, got {err}"),
    }
    Ok(())
}

#[test]
fn export_with_wrong_signature() -> Result<()> {
    let wasm = wat::parse_str(
        r#"(module
            (func (export "fact") (param f64) (result f64) local.get 0)
            (global (export "sumn") i32 (i32.const 0)))"#,
    )?;
    let instance = Instance::new(&WasmModule::from_bytes(wasm))?;

    assert!(matches!(instance.func("fact"), Err(Error::ExportLookup(LookupError::UnsupportedSignature { .. }))));
    assert!(matches!(instance.func("sumn"), Err(Error::ExportLookup(LookupError::NotAFunction { .. }))));
    Ok(())
}

#[test]
fn argument_out_of_range() -> Result<()> {
    let mut instance = Instance::new(&WasmModule::from_bytes(CODE_WASM))?;
    let sumn = instance.func("sumn")?;

    let err = instance.call(&sumn, 1 << 40).unwrap_err();
    assert!(matches!(err, Error::Call { source: CallError::ArgumentOutOfRange(_), .. }), "{err}");

    let fact = instance.func("fact")?;
    assert_eq!(instance.call(&fact, 20)?, 2432902008176640000);
    Ok(())
}

#[test]
fn trap_is_a_call_error() -> Result<()> {
    let wasm = wat::parse_str(r#"(module (func (export "fact") (param i32) (result i32) unreachable))"#)?;
    let mut instance = Instance::new(&WasmModule::from_bytes(wasm))?;
    let fact = instance.func("fact")?;

    match instance.call(&fact, 10).unwrap_err() {
        Error::Call { name, source: CallError::Engine(_) } => assert_eq!(name, "fact"),
        err => panic!("expected a trap, got {err}"),
    }
    Ok(())
}

#[test]
fn error_chain_does_not_repeat_messages() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let missing = run(&RunConfig::in_dir(dir.path())).unwrap_err();
    let invalid = run(&write_module(&dir, b"junk")?).unwrap_err();

    let wasm = wat::parse_str(r#"(module (func (export "fact") (param i32) (result i32) unreachable))"#)?;
    let mut instance = Instance::new(&WasmModule::from_bytes(wasm))?;
    let fact = instance.func("fact")?;
    let trap = instance.call(&fact, 10).unwrap_err();

    for err in [missing, invalid, trap] {
        let messages = messages(&err);
        assert!(messages.len() >= 2, "{messages:?}");
        for pair in messages.windows(2) {
            assert!(!pair[0].contains(&pair[1]), "{messages:?}");
        }
    }

    assert_eq!(messages(&Error::from(LookupError::Missing { name: "sumn".into() })), ["export not found: `sumn`"]);
    Ok(())
}
