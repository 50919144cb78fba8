use std::collections::{HashMap, HashSet};

use crate::{
    error::IgorError,
    types::DeclarationSet,
    utils::var_name,
};

/// Client methods on the generated service class that services may not shadow.
pub const RESERVED_METHODS: [&str; 5] = ["get", "put", "post", "delete", "constructor"];

/// Returns `Ok(())` if the declaration set can be handed to a generator.
///
/// Checks what no single declaration can see on its own: duplicate names
/// (across units and synthesized inline types), services that map to the same
/// client method, and services with more than one status-200 response.
pub fn verify_declarations(declarations: &DeclarationSet) -> Result<(), IgorError> {
    // 1) Declaration names are unique across every unit
    let mut defined: HashSet<&str> = HashSet::new();
    for declaration in declarations.iter() {
        if !defined.insert(declaration.name()) {
            return Err(IgorError::DuplicateDeclaration(declaration.name().to_string()));
        }
    }

    // 2) Client method names are unique and do not shadow the HTTP verbs
    let mut methods: HashMap<String, &str> = HashMap::new();
    for service in declarations.services() {
        let method = var_name(&service.name);
        if RESERVED_METHODS.contains(&method.as_str()) {
            return Err(IgorError::ReservedServiceMethod {
                service: service.name.clone(),
                method,
            });
        }
        if let Some(first) = methods.get(&method) {
            return Err(IgorError::DuplicateServiceMethod {
                first:  first.to_string(),
                second: service.name.clone(),
                method,
            });
        }
        methods.insert(method, &service.name);
    }

    // 3) At most one success response per service; a missing one is reported by the generator
    for service in declarations.services() {
        let ok_count = service.responses.iter().filter(|r| r.status == 200).count();
        if ok_count > 1 {
            return Err(IgorError::MultipleOkResponses(service.name.clone()));
        }
    }

    Ok(())
}
