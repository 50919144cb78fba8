//! TypeScript client generation.
//!
//! Produces two modules: the data module (enums and records with JSON codecs
//! and deep copies) and the service module (an abstract HTTP client with one
//! method per service).

mod data;
mod service;

use tracing::info;

use crate::{
    error::IgorError,
    types::DeclarationSet,
    verifier::verify_declarations,
};

pub use data::{generate_data, item_description};
pub use service::generate_service;

/// Names used in and between the generated modules.
#[derive(Debug, Clone, PartialEq)]
pub struct TsOptions {
    pub data_file:     String,
    pub service_file:  String,
    pub service_class: String,
    /// Alias under which the service module imports the data module.
    pub data_alias:    String,
}

impl Default for TsOptions {
    fn default() -> Self {
        TsOptions {
            data_file:     "protocol.data.ts".to_string(),
            service_file:  "protocol.service.ts".to_string(),
            service_class: "ProtocolService".to_string(),
            data_alias:    "Protocol".to_string(),
        }
    }
}

impl TsOptions {
    /// Module specifier of the data module, relative to the service module.
    pub fn data_import(&self) -> String {
        let stem = self.data_file.strip_suffix(".ts").unwrap_or(&self.data_file);
        format!("./{}", stem)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TsOutput {
    pub data:    String,
    pub service: String,
}

/// Verify `declarations` and render both modules in memory.
pub fn generate_typescript(declarations: &DeclarationSet, options: &TsOptions) -> Result<TsOutput, IgorError> {
    verify_declarations(declarations)?;
    let data = generate_data(declarations)?;
    info!(file = %options.data_file, bytes = data.len(), "generated data module");
    let service = generate_service(declarations, options)?;
    info!(file = %options.service_file, bytes = service.len(), "generated service module");
    Ok(TsOutput { data, service })
}
