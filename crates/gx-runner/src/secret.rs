//! Execution variables as child-process environment, with masking of
//! secret values in captured output.

use std::collections::HashMap;

use gx_core::Variable;

/// Replacement written over every secret value found in captured output.
pub const SECRET_MASK: &str = "********";

#[derive(Debug, Clone, Default)]
pub struct EnvManager {
    variables: Vec<Variable>,
}

impl EnvManager {
    pub fn new(variables: Vec<Variable>) -> Self {
        Self { variables }
    }

    /// Fill secret variables from the host environment. Secrets are mounted
    /// into the executor's own environment under the variable's name.
    pub fn resolve_secrets(&mut self) {
        self.resolve_secrets_with(|name| std::env::var(name).ok());
    }

    pub fn resolve_secrets_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        for var in self.variables.iter_mut().filter(|v| v.is_secret()) {
            if let Some(value) = lookup(&var.name) {
                var.value = value;
            }
        }
    }

    /// All variables as an environment map. Later variables win.
    pub fn env(&self) -> HashMap<String, String> {
        self.variables
            .iter()
            .map(|v| (v.name.clone(), v.value.clone()))
            .collect()
    }

    pub fn secret_values(&self) -> Vec<&str> {
        self.variables
            .iter()
            .filter(|v| v.is_secret() && !v.value.is_empty())
            .map(|v| v.value.as_str())
            .collect()
    }

    /// Replace every secret value in `output` with [`SECRET_MASK`].
    pub fn obfuscate(&self, output: &str) -> String {
        let mut secrets = self.secret_values();
        // Longest first so a secret containing another is masked whole.
        secrets.sort_by_key(|s| std::cmp::Reverse(s.len()));
        secrets.dedup();
        secrets
            .into_iter()
            .fold(output.to_string(), |acc, secret| acc.replace(secret, SECRET_MASK))
    }
}
