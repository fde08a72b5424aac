use thiserror::Error;

/// Errors raised by misuse of a rule registry.
///
/// Malformed Markdown never produces an error; these only surface when a
/// caller names a rule that is not registered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum RulerError {
    /// No rule with this name exists in the chain.
    #[error("unknown rule name: {name}")]
    UnknownRule {
        /// The name that failed to resolve.
        name: String,
    },
}

impl RulerError {
    /// Create an error for an unregistered rule name.
    pub fn unknown_rule(name: impl Into<String>) -> Self {
        Self::UnknownRule { name: name.into() }
    }

    /// The rule name this error refers to.
    pub fn name(&self) -> &str {
        match self {
            Self::UnknownRule { name } => name,
        }
    }
}
