//! The synthesis task handed to the engine.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchProblem {
    /// Natural-language task. Only ever shown to the generator.
    pub description: String,
    /// Hidden harness appended to each candidate. Never shown to the generator.
    pub validation_script: String,
    /// Initial root state, e.g. a function signature.
    #[serde(default)]
    pub starting_code: Option<String>,
}

impl SearchProblem {
    pub fn new(description: impl Into<String>, validation_script: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            validation_script: validation_script.into(),
            starting_code: None,
        }
    }

    pub fn with_starting_code(mut self, code: impl Into<String>) -> Self {
        self.starting_code = Some(code.into());
        self
    }

    pub fn root_state(&self) -> &str {
        self.starting_code.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_state_defaults_to_empty() {
        let p = SearchProblem::new("factorial", "assert factorial(0) == 1");
        assert_eq!(p.root_state(), "");
        let p = p.with_starting_code("def factorial(n):");
        assert_eq!(p.root_state(), "def factorial(n):");
    }
}
