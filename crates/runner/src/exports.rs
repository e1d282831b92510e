use std::collections::BTreeMap;

use log::debug;
use wasmparser::{ExternalKind, FuncType, Parser, Payload, TypeRef, ValType};

use crate::{IntWidth, LookupError};

/// What an export name refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportEntry {
    /// A function with its declared signature
    Func {
        /// Parameter types
        params: Vec<ValType>,
        /// Result types
        results: Vec<ValType>,
    },

    /// A table, memory, global or tag
    Other(ExternalKind),
}

/// Export names of a module mapped to what they refer to.
///
/// Built by walking the type, import, function and export sections, so the
/// function index space includes imported functions.
#[derive(Debug, Clone, Default)]
pub struct ExportSignatures {
    entries: BTreeMap<String, ExportEntry>,
}

#[derive(Debug, Default)]
struct SectionWalker {
    func_types: Vec<FuncType>,
    func_type_indices: Vec<u32>,
    exports: Vec<(String, ExternalKind, u32)>,
}

impl SectionWalker {
    fn process_payload(&mut self, payload: Payload<'_>) -> wasmparser::Result<()> {
        match payload {
            Payload::TypeSection(reader) => {
                debug!("Found type section");
                self.func_types = reader.into_iter_err_on_gc_types().collect::<wasmparser::Result<Vec<_>>>()?;
            }
            Payload::ImportSection(reader) => {
                debug!("Found import section");
                for import in reader.into_imports() {
                    if let TypeRef::Func(ty) | TypeRef::FuncExact(ty) = import?.ty {
                        self.func_type_indices.push(ty);
                    }
                }
            }
            Payload::FunctionSection(reader) => {
                debug!("Found function section");
                for ty in reader {
                    self.func_type_indices.push(ty?);
                }
            }
            Payload::ExportSection(reader) => {
                debug!("Found export section");
                for export in reader {
                    let export = export?;
                    self.exports.push((export.name.to_string(), export.kind, export.index));
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn finish(self) -> ExportSignatures {
        let mut entries = BTreeMap::new();
        for (name, kind, index) in self.exports {
            let entry = match kind {
                ExternalKind::Func | ExternalKind::FuncExact => {
                    let ty = self
                        .func_type_indices
                        .get(index as usize)
                        .and_then(|ty| self.func_types.get(*ty as usize));

                    match ty {
                        Some(ty) => ExportEntry::Func { params: ty.params().to_vec(), results: ty.results().to_vec() },
                        // unreachable for validated modules; treat as an unusable export
                        None => ExportEntry::Other(kind),
                    }
                }
                kind => ExportEntry::Other(kind),
            };
            entries.insert(name, entry);
        }

        ExportSignatures { entries }
    }
}

impl ExportSignatures {
    /// Walk the sections of a binary module
    pub fn parse(wasm: &[u8]) -> wasmparser::Result<Self> {
        let mut walker = SectionWalker::default();
        for payload in Parser::new(0).parse_all(wasm) {
            walker.process_payload(payload?)?;
        }

        Ok(walker.finish())
    }

    /// Look up an export by name
    pub fn get(&self, name: &str) -> Option<&ExportEntry> {
        self.entries.get(name)
    }

    /// All export names, in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Resolve an export to the width of its single integer parameter and result.
    ///
    /// Parameter and result must share a width.
    pub fn int_signature(&self, name: &str) -> Result<IntWidth, LookupError> {
        let Some(entry) = self.entries.get(name) else {
            return Err(LookupError::Missing { name: name.to_string() });
        };

        let (params, results) = match entry {
            ExportEntry::Func { params, results } => (params, results),
            ExportEntry::Other(_) => return Err(LookupError::NotAFunction { name: name.to_string() }),
        };

        let width = match (params.as_slice(), results.as_slice()) {
            ([param], [result]) => {
                IntWidth::from_val_type(*param).filter(|width| IntWidth::from_val_type(*result) == Some(*width))
            }
            _ => None,
        };

        width.ok_or_else(|| LookupError::UnsupportedSignature {
            name: name.to_string(),
            params: params.clone(),
            results: results.clone(),
        })
    }
}
