//! Ordered registry of named, toggleable rules.
//!
//! Each parser stage (core, block, inline, post-process) owns a `Ruler`. Rules
//! run in registration order; a rule may also join named "alt" chains, which
//! other rules query to decide what may interrupt them (a fence can end a
//! paragraph because `fence` is in the `paragraph` chain).
//!
//! Compiled chains are cached and rebuilt lazily after any mutation.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::RulerError;

#[derive(Clone)]
struct Rule<T> {
    name: String,
    enabled: bool,
    rule: T,
    alt: Vec<String>,
}

/// A registry of rules of type `T`, usually an `Arc<dyn Fn ...>`.
pub struct Ruler<T> {
    rules: Vec<Rule<T>>,
    cache: OnceLock<HashMap<String, Vec<T>>>,
}

impl<T: Clone> Default for Ruler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Ruler<T> {
    fn clone(&self) -> Self {
        Self {
            rules: self.rules.clone(),
            cache: OnceLock::new(),
        }
    }
}

impl<T> std::fmt::Debug for Ruler<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|r| (&r.name, r.enabled, &r.alt)))
            .finish()
    }
}

impl<T: Clone> Ruler<T> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            cache: OnceLock::new(),
        }
    }

    fn find(&self, name: &str) -> Option<usize> {
        self.rules.iter().position(|r| r.name == name)
    }

    fn entry(name: &str, rule: T, alt: &[&str]) -> Rule<T> {
        Rule {
            name: name.to_string(),
            enabled: true,
            rule,
            alt: alt.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn invalidate(&mut self) {
        self.cache = OnceLock::new();
    }

    /// Append a rule to the end of the default chain and to each alt chain.
    pub fn push(&mut self, name: &str, rule: T, alt: &[&str]) {
        self.rules.push(Self::entry(name, rule, alt));
        self.invalidate();
    }

    /// Replace the rule registered as `name`, keeping its position.
    pub fn at(&mut self, name: &str, rule: T, alt: &[&str]) -> Result<(), RulerError> {
        let idx = self.find(name).ok_or_else(|| RulerError::unknown_rule(name))?;
        self.rules[idx].rule = rule;
        self.rules[idx].alt = alt.iter().map(|s| s.to_string()).collect();
        self.invalidate();
        Ok(())
    }

    /// Insert a rule right before `anchor`.
    pub fn before(
        &mut self,
        anchor: &str,
        name: &str,
        rule: T,
        alt: &[&str],
    ) -> Result<(), RulerError> {
        let idx = self.find(anchor).ok_or_else(|| RulerError::unknown_rule(anchor))?;
        self.rules.insert(idx, Self::entry(name, rule, alt));
        self.invalidate();
        Ok(())
    }

    /// Insert a rule right after `anchor`.
    pub fn after(
        &mut self,
        anchor: &str,
        name: &str,
        rule: T,
        alt: &[&str],
    ) -> Result<(), RulerError> {
        let idx = self.find(anchor).ok_or_else(|| RulerError::unknown_rule(anchor))?;
        self.rules.insert(idx + 1, Self::entry(name, rule, alt));
        self.invalidate();
        Ok(())
    }

    fn set_enabled(
        &mut self,
        names: &[&str],
        enabled: bool,
        ignore_invalid: bool,
    ) -> Result<Vec<String>, RulerError> {
        let mut changed = Vec::with_capacity(names.len());
        for name in names {
            match self.find(name) {
                Some(idx) => {
                    self.rules[idx].enabled = enabled;
                    changed.push(name.to_string());
                }
                None if ignore_invalid => {}
                None => return Err(RulerError::unknown_rule(*name)),
            }
        }
        self.invalidate();
        Ok(changed)
    }

    /// Enable the named rules. Returns the names that were found.
    ///
    /// Unknown names are an error unless `ignore_invalid` is set.
    pub fn enable(
        &mut self,
        names: &[&str],
        ignore_invalid: bool,
    ) -> Result<Vec<String>, RulerError> {
        self.set_enabled(names, true, ignore_invalid)
    }

    /// Disable the named rules. Returns the names that were found.
    pub fn disable(
        &mut self,
        names: &[&str],
        ignore_invalid: bool,
    ) -> Result<Vec<String>, RulerError> {
        self.set_enabled(names, false, ignore_invalid)
    }

    /// Enable exactly the named rules and disable all others.
    pub fn enable_only(
        &mut self,
        names: &[&str],
        ignore_invalid: bool,
    ) -> Result<Vec<String>, RulerError> {
        for rule in &mut self.rules {
            rule.enabled = false;
        }
        self.enable(names, ignore_invalid)
    }

    /// Enabled rules of a chain, in order. The chain `""` holds every enabled rule.
    pub fn get_rules(&self, chain: &str) -> &[T] {
        self.cache
            .get_or_init(|| self.compile())
            .get(chain)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Names of all registered rules, enabled or not, in order.
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names of the enabled rules, in order.
    pub fn enabled_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.name.as_str())
            .collect()
    }

    fn compile(&self) -> HashMap<String, Vec<T>> {
        let mut chains: Vec<&str> = vec![""];
        for rule in &self.rules {
            for alt in &rule.alt {
                if !chains.contains(&alt.as_str()) {
                    chains.push(alt);
                }
            }
        }

        chains
            .into_iter()
            .map(|chain| {
                let compiled = self
                    .rules
                    .iter()
                    .filter(|r| r.enabled && (chain.is_empty() || r.alt.iter().any(|a| a == chain)))
                    .map(|r| r.rule.clone())
                    .collect();
                (chain.to_string(), compiled)
            })
            .collect()
    }
}
