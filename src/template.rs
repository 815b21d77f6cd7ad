//! Fixed-shape command templates.
//!
//! A template is a sequence of slots, each a literal token or a wildcard. A token list matches
//! only if it has exactly as many tokens as the template has slots, every literal is equal
//! (case-sensitive) and every wildcard has a token. A template can additionally carry a regex
//! guard that must be found in one of its wildcard tokens; the guard's capture groups are handed
//! back with the match.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Lit(&'static str),
    Any,
}

#[derive(Debug, Clone)]
struct Guard {
    wildcard: usize,
    regex: Regex,
}

#[derive(Debug, Clone)]
pub struct Template {
    slots: &'static [Slot],
    guard: Option<Guard>,
}

/// Tokens bound by a successful match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match<'t> {
    wildcards: Vec<&'t str>,
    groups: Vec<Option<String>>,
}

impl<'t> Match<'t> {
    /// The `i`-th wildcard token, counting wildcards only.
    pub fn wildcard(&self, i: usize) -> &'t str {
        self.wildcards[i]
    }

    /// Capture group `i` of the guard regex (group 0 is the whole guard match).
    pub fn group(&self, i: usize) -> Option<&str> {
        self.groups.get(i).and_then(|g| g.as_deref())
    }
}

impl Template {
    pub const fn new(slots: &'static [Slot]) -> Self {
        Template { slots, guard: None }
    }

    /// Require `pattern` to be found in the `wildcard`-th wildcard token.
    pub fn with_guard(mut self, wildcard: usize, pattern: &str) -> Result<Self, regex::Error> {
        self.guard = Some(Guard { wildcard, regex: Regex::new(pattern)? });
        Ok(self)
    }

    pub fn matches<'t>(&self, tokens: &'t [String]) -> Option<Match<'t>> {
        if tokens.len() != self.slots.len() {
            return None;
        }
        let mut wildcards = Vec::new();
        for (slot, token) in self.slots.iter().zip(tokens) {
            match slot {
                Slot::Lit(lit) if *lit == token.as_str() => {}
                Slot::Lit(_) => return None,
                Slot::Any => wildcards.push(token.as_str()),
            }
        }
        let groups = match &self.guard {
            None => Vec::new(),
            Some(guard) => {
                let subject = wildcards.get(guard.wildcard)?;
                let caps = guard.regex.captures(subject)?;
                caps.iter().map(|m| m.map(|m| m.as_str().to_string())).collect()
            }
        };
        Some(Match { wildcards, groups })
    }
}

/// Try `candidates` in order and return the key of the first template that matches.
pub fn first_match<'t, K: Copy>(candidates: &[(K, Template)], tokens: &'t [String]) -> Option<(K, Match<'t>)> {
    candidates
        .iter()
        .find_map(|(key, template)| template.matches(tokens).map(|m| (*key, m)))
}
