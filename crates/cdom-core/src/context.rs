//! Per translation unit context
//!
//! Read-only inputs to resolution that do not come from the tree itself: the language
//! override, resolution options and the preprocessor's macro table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::ast::{Ast, FileLocation, Language, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolutionOptions {
    /// Calls to undeclared functions in C declare them implicitly instead of failing.
    pub implicit_function_declarations: bool,
}

impl Default for ResolutionOptions {
    fn default() -> Self {
        Self {
            implicit_function_declarations: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroDefinition {
    pub name: String,
    /// Parameter names of a function-like macro.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<String>>,
    #[serde(default)]
    pub expansion: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<FileLocation>,
}

impl MacroDefinition {
    pub fn object_like(name: &str, expansion: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: None,
            expansion: expansion.to_string(),
            location: None,
        }
    }

    pub fn is_function_like(&self) -> bool {
        self.parameters.is_some()
    }
}

/// Macros defined while preprocessing the unit, by name. A later definition replaces an
/// earlier one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MacroTable {
    definitions: HashMap<String, MacroDefinition>,
}

impl MacroTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, definition: MacroDefinition) {
        self.definitions.insert(definition.name.clone(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&MacroDefinition> {
        self.definitions.get(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MacroDefinition> {
        self.definitions.values()
    }
}

#[derive(Debug, Clone, Default)]
pub struct TranslationUnitContext {
    /// Overrides the language recorded in the tree.
    pub language: Option<Language>,
    pub options: ResolutionOptions,
    pub macros: MacroTable,
}

impl TranslationUnitContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.language = Some(language);
        self
    }

    pub fn with_options(mut self, options: ResolutionOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_macros(mut self, macros: MacroTable) -> Self {
        self.macros = macros;
        self
    }

    /// Macro whose expansion produced the text of `node`, if any.
    pub fn macro_origin(&self, ast: &Ast, node: NodeId) -> Option<&MacroDefinition> {
        let image = ast.location(node).image.as_ref()?;
        self.macros.get(&image.macro_name)
    }
}
