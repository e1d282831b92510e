use log::{debug, info};
use tinywasm::{FuncHandle, Module, ModuleInstance, Store};

use crate::{CallError, Error, ExportSignatures, InstantiationError, IntWidth, LookupError, Result, WasmModule};

/// A module instantiated against an empty import environment
pub struct Instance {
    store: Store,
    instance: ModuleInstance,
    exports: ExportSignatures,
}

/// An exported function taking and returning one integer
#[derive(Debug)]
pub struct IntFunc {
    name: String,
    width: IntWidth,
    handle: FuncHandle,
}

impl IntFunc {
    /// The export name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared width of the parameter and result
    pub fn width(&self) -> IntWidth {
        self.width
    }
}

impl Instance {
    /// Validate and instantiate a module.
    ///
    /// No imports are provided, so a module that declares any fails here.
    pub fn new(module: &WasmModule) -> Result<Self> {
        Self::instantiate(module.bytes()).map_err(Error::Instantiation)
    }

    fn instantiate(wasm: &[u8]) -> Result<Self, InstantiationError> {
        let parsed = Module::parse_bytes(wasm)?;
        let mut store = Store::default();
        let instance = parsed.instantiate(&mut store, None)?;
        let exports = ExportSignatures::parse(wasm)?;

        info!("instantiated module with exports: {:?}", exports.names().collect::<Vec<_>>());
        Ok(Self { store, instance, exports })
    }

    /// The exports of the instantiated module
    pub fn exports(&self) -> &ExportSignatures {
        &self.exports
    }

    /// Resolve an exported integer function by name
    pub fn func(&self, name: &str) -> Result<IntFunc> {
        let width = self.exports.int_signature(name)?;
        let handle = self
            .instance
            .exported_func_untyped(&self.store, name)
            .map_err(|source| LookupError::Engine { name: name.to_string(), source })?;

        debug!("resolved export `{name}` as ({width}) -> {width}");
        Ok(IntFunc { name: name.to_string(), width, handle })
    }

    /// Call a resolved function with one argument
    pub fn call(&mut self, func: &IntFunc, arg: i64) -> Result<i64> {
        self.try_call(func, arg).map_err(|source| Error::Call { name: func.name.clone(), source })
    }

    fn try_call(&mut self, func: &IntFunc, arg: i64) -> Result<i64, CallError> {
        let param = func.width.to_wasm(arg).ok_or(CallError::ArgumentOutOfRange(arg))?;
        let results = func.handle.call(&mut self.store, &[param]).map_err(CallError::Engine)?;

        let value = match results.as_slice() {
            [value] => func.width.from_wasm(value),
            _ => None,
        };

        let value = value.ok_or_else(|| CallError::UnexpectedResult(format!("{results:?}")))?;
        info!("{}({arg}) = {value}", func.name);
        Ok(value)
    }
}

impl core::fmt::Debug for Instance {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Instance").field("exports", &self.exports).finish_non_exhaustive()
    }
}
