use std::{fs, path::Path};

use tracing::info;

use crate::{
    collector::Collector,
    error::IgorError,
    gen_ts::{generate_typescript, TsOptions, TsOutput},
    ir::to_ir_json,
    parser::parse_schema,
    tokenizer::tokenize_schema,
    types::DeclarationSet,
};

/// Compile a single schema text into its declaration set.
/// Returns `Err(IgorError)` if tokenization or parsing fails.
pub fn compile_schema(text: &str) -> Result<DeclarationSet, IgorError> {
    let mut compiler = Compiler::new();
    compiler.add_source(text)?;
    Ok(compiler.into_declarations())
}

/// Accumulates declarations from any number of schema units.
///
/// A unit is tokenized and parsed completely before anything it declares is
/// collected, so a unit that fails leaves the accumulated set untouched.
#[derive(Debug, Default)]
pub struct Compiler {
    collector: Collector,
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler { collector: Collector::new() }
    }

    /// Add one unit of schema text. Returns the number of declarations it produced.
    pub fn add_source(&mut self, text: &str) -> Result<usize, IgorError> {
        let tokens = tokenize_schema(text)?;
        let file = parse_schema(&tokens)?;
        let count = self.collector.collect(&file);
        info!(definitions = file.definitions.len(), declarations = count, "collected schema unit");
        Ok(count)
    }

    /// Read and add a schema file.
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, IgorError> {
        let text = fs::read_to_string(path.as_ref())?;
        let count = self.add_source(&text)?;
        info!(path = %path.as_ref().display(), "parsed schema file");
        Ok(count)
    }

    pub fn declarations(&self) -> &DeclarationSet {
        self.collector.declarations()
    }

    pub fn into_declarations(self) -> DeclarationSet {
        self.collector.into_declarations()
    }

    /// Serialize everything collected so far as IR JSON.
    pub fn ir_json(&self, compact: bool) -> Result<String, IgorError> {
        to_ir_json(self.declarations(), compact)
    }

    /// Verify everything collected so far and render the TypeScript modules.
    pub fn generate_typescript(&self, options: &TsOptions) -> Result<TsOutput, IgorError> {
        generate_typescript(self.declarations(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_units_accumulate() {
        let mut compiler = Compiler::new();
        assert_eq!(compiler.add_source("enum Kind { a; }").unwrap(), 1);
        assert_eq!(compiler.add_source("record Item { Kind kind; }").unwrap(), 1);
        let names: Vec<&str> = compiler.declarations().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["Kind", "Item"]);
        compiler.generate_typescript(&TsOptions::default()).unwrap();
    }

    #[test]
    fn test_failing_unit_merges_nothing() {
        let mut compiler = Compiler::new();
        compiler.add_source("record A { int x; }").unwrap();
        let err = compiler
            .add_source("record B { int y; }\nrecord C { int z }")
            .unwrap_err();
        assert!(err.is_syntax());
        let names: Vec<&str> = compiler.declarations().iter().map(|d| d.name()).collect();
        assert_eq!(names, vec!["A"]);
    }

    #[test]
    fn test_unresolved_reference_fails_generation_only() {
        let set = compile_schema("record Order { Customer customer; }").unwrap();
        assert_eq!(set.len(), 1);
        let err = generate_typescript(&set, &TsOptions::default()).unwrap_err();
        assert!(err.is_generation());
        assert_eq!(err.to_string(), "Unresolved reference \"Customer\"");
    }

    #[test]
    fn test_missing_file() {
        let mut compiler = Compiler::new();
        let err = compiler.add_file("does/not/exist.igor").unwrap_err();
        assert!(matches!(err, IgorError::Io(_)));
        assert!(compiler.declarations().is_empty());
    }
}
