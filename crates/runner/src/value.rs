use tinywasm::types::WasmValue;
use wasmparser::ValType;

/// The width of an integer parameter or result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntWidth {
    /// `i32`
    I32,
    /// `i64`
    I64,
}

impl IntWidth {
    /// The integer width of a value type, if it is one
    pub fn from_val_type(ty: ValType) -> Option<Self> {
        match ty {
            ValType::I32 => Some(Self::I32),
            ValType::I64 => Some(Self::I64),
            _ => None,
        }
    }

    /// Narrow a host integer to this width.
    ///
    /// Returns `None` if the value does not fit.
    pub fn to_wasm(self, value: i64) -> Option<WasmValue> {
        match self {
            Self::I32 => i32::try_from(value).ok().map(WasmValue::I32),
            Self::I64 => Some(WasmValue::I64(value)),
        }
    }

    /// Widen a returned value of this width back to a host integer
    pub fn from_wasm(self, value: &WasmValue) -> Option<i64> {
        match (self, value) {
            (Self::I32, WasmValue::I32(v)) => Some(i64::from(*v)),
            (Self::I64, WasmValue::I64(v)) => Some(*v),
            _ => None,
        }
    }
}

impl core::fmt::Display for IntWidth {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::I32 => write!(f, "i32"),
            Self::I64 => write!(f, "i64"),
        }
    }
}
