//! # Reference Module
//!
//! Indirect values such as `"$driving"`, bound to the value another state
//! variable holds.

use crate::{GoapError, Result, State, Value};

/// Sigil marking a string value as a reference to another state variable.
pub const DEFAULT_SIGIL: char = '$';

/// Rewrites indirect references into concrete values.
///
/// A reference is a string value made of the sigil followed by the name of a
/// state variable, e.g. `"$base_color"`. When the context state holds that
/// variable the reference is replaced by its value. References to variables
/// absent from the context are returned unchanged.
///
/// # Examples
///
/// ```
/// use action_graph::{ReferenceResolver, State, Value};
///
/// let resolver = ReferenceResolver::new('@');
/// let context = State::single("base_color", "red");
///
/// let resolved = resolver.resolve(&Value::from("@base_color"), &context).unwrap();
/// assert_eq!(resolved, Value::from("red"));
///
/// let untouched = resolver.resolve(&Value::from("@missing"), &context).unwrap();
/// assert_eq!(untouched, Value::from("@missing"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceResolver {
    sigil: char,
}

impl ReferenceResolver {
    /// A resolver treating strings that start with `sigil` as references.
    pub fn new(sigil: char) -> Self {
        Self { sigil }
    }

    /// The character marking a reference.
    pub fn sigil(&self) -> char {
        self.sigil
    }

    /// Name of the variable `value` refers to, if it is a reference.
    pub fn referenced_name<'v>(&self, value: &'v Value) -> Option<&'v str> {
        value.as_str()?.strip_prefix(self.sigil)
    }

    /// Resolves `value` against `context`.
    ///
    /// # Errors
    ///
    /// `GoapError::ReferenceResolution` when the reference names no variable
    /// (a bare sigil) or points at a wildcard, which has no concrete value.
    pub fn resolve(&self, value: &Value, context: &State) -> Result<Value> {
        let Some(name) = self.referenced_name(value) else {
            return Ok(value.clone());
        };
        if name.is_empty() {
            return Err(GoapError::ReferenceResolution(format!(
                "{} names no state variable",
                value
            )));
        }
        match context.get(name) {
            None => Ok(value.clone()),
            Some(Value::Any) => Err(GoapError::ReferenceResolution(format!(
                "{} refers to `{}`, which has no concrete value",
                value, name
            ))),
            Some(resolved) => Ok(resolved.clone()),
        }
    }
}

impl Default for ReferenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_SIGIL)
    }
}
