//! Function Mapper
//!
//! Declarative registry for re-spelling scalar functions per dialect. A rule either renames
//! the function and keeps the `NAME(args)` shape, or rewrites the call from its already
//! rendered arguments.

use std::collections::HashMap;
use std::sync::Arc;

use crate::ast::ScalarFunction;
use crate::error::{VsError, VsResult};

/// Rewrite closure over the rendered arguments of a call.
pub type TransformFn = Arc<dyn Fn(&[String]) -> VsResult<String> + Send + Sync>;

/// A translation rule for one function.
#[derive(Clone)]
pub enum Translation {
    /// Simple rename: `SUBSTR` → `SUBSTRING`.
    Rename(&'static str),
    /// Custom rewrite with access to the arguments.
    Transform(TransformFn),
}

/// Registry of scalar function translations for one dialect.
#[derive(Clone, Default)]
pub struct FunctionMapper {
    rules: HashMap<ScalarFunction, Translation>,
}

impl std::fmt::Debug for FunctionMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionMapper")
            .field("rules_count", &self.rules.len())
            .finish()
    }
}

impl FunctionMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a simple rename rule.
    pub fn rename(mut self, from: ScalarFunction, to: &'static str) -> Self {
        self.rules.insert(from, Translation::Rename(to));
        self
    }

    /// Add a custom transform rule.
    pub fn transform<F>(mut self, from: ScalarFunction, f: F) -> Self
    where
        F: Fn(&[String]) -> VsResult<String> + Send + Sync + 'static,
    {
        self.rules.insert(from, Translation::Transform(Arc::new(f)));
        self
    }

    /// Apply the same transform to several functions.
    pub fn transform_all<F>(mut self, from: &[ScalarFunction], f: F) -> Self
    where
        F: Fn(ScalarFunction, &[String]) -> VsResult<String> + Send + Sync + Clone + 'static,
    {
        for function in from {
            let function = *function;
            let f = f.clone();
            self.rules
                .insert(function, Translation::Transform(Arc::new(move |args| f(function, args))));
        }
        self
    }

    /// The renamed spelling of `function`, if a rename rule exists.
    pub fn alias(&self, function: ScalarFunction) -> Option<&'static str> {
        match self.rules.get(&function) {
            Some(Translation::Rename(name)) => Some(name),
            _ => None,
        }
    }

    /// All rename rules, e.g. for listing a dialect's alias table.
    pub fn aliases(&self) -> Vec<(ScalarFunction, &'static str)> {
        let mut aliases: Vec<_> = self
            .rules
            .iter()
            .filter_map(|(function, rule)| match rule {
                Translation::Rename(name) => Some((*function, *name)),
                Translation::Transform(_) => None,
            })
            .collect();
        aliases.sort();
        aliases
    }

    /// Rewrite a call. Returns `None` if no transform rule exists (use default rendering).
    pub fn translate(&self, function: ScalarFunction, args: &[String]) -> Option<VsResult<String>> {
        match self.rules.get(&function) {
            Some(Translation::Transform(f)) => Some(f(args)),
            _ => None,
        }
    }

    pub fn has_rule(&self, function: ScalarFunction) -> bool {
        self.rules.contains_key(&function)
    }
}

/// Check the argument count of a call inside a transform.
pub fn expect_args(function: ScalarFunction, args: &[String], range: std::ops::RangeInclusive<usize>) -> VsResult<()> {
    if range.contains(&args.len()) {
        Ok(())
    } else {
        let expected = if range.start() == range.end() {
            range.start().to_string()
        } else {
            format!("{} to {}", range.start(), range.end())
        };
        Err(VsError::arity(function, &expected, args.len()))
    }
}
