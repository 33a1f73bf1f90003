//! Short, collision-free names for table references and result columns.
//!
//! Every aliasable entity nominates candidates derived from its own name
//! (`employee` offers `e`, `em`, `emp`, ...) and falls back to an alphabetic
//! sequence (`a`, `b`, ..., `aa`, ...) once the name is exhausted. The first
//! candidate nobody in scope holds yet wins, so earlier entities keep the
//! shorter names and the outcome only depends on registration order.

use std::collections::HashSet;

use indexmap::{IndexMap, IndexSet};
use smol_str::SmolStr;

use crate::{col::ResultColumn, table::TableRef};

/// Words never handed out, they would parse as keywords where an alias is
/// expected.
const RESERVED: &[&str] = &[
    "all", "and", "any", "as", "asc", "at", "between", "by", "case", "cast", "cross", "desc",
    "delete", "distinct", "do", "else", "end", "exists", "false", "for", "from", "full",
    "group", "having", "if", "in", "inner", "insert", "into", "is", "join", "left", "like",
    "limit", "no", "not", "null", "of", "offset", "on", "or", "order", "outer", "right",
    "select", "set", "table", "then", "to", "true", "union", "update", "using", "values",
    "when", "where", "with",
];

pub(crate) fn is_reserved(candidate: &str) -> bool {
    RESERVED.contains(&candidate)
}

/// A contiguous run of letters used for bijective base-N numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet {
    start: char,
    size: u32,
}

impl Alphabet {
    pub const LOWERCASE: Alphabet = Alphabet {
        start: 'a',
        size: 26,
    };

    /// `None` when the alphabet is empty or runs past valid chars.
    pub fn new(start: char, size: u32) -> Option<Self> {
        if size == 0 {
            return None;
        }
        let first = start as u32;
        let last = first.checked_add(size - 1)?;
        if last > char::MAX as u32 {
            return None;
        }
        if !(first..=last).all(|code| char::from_u32(code).is_some()) {
            return None;
        }
        Some(Self { start, size })
    }

    pub fn start(&self) -> char {
        self.start
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// 0 -> `a`, N-1 -> last letter, N -> `aa`, ...
    pub fn encode(&self, index: usize) -> SmolStr {
        let size = u128::from(self.size);
        let mut remaining = index as u128 + 1;
        let mut letters = Vec::new();
        while remaining > 0 {
            remaining -= 1;
            let digit = (remaining % size) as u32;
            // range validated in `new`
            letters.push(char::from_u32(self.start as u32 + digit).unwrap_or(self.start));
            remaining /= size;
        }
        letters.into_iter().rev().collect()
    }

    /// Inverse of [`Alphabet::encode`].
    pub fn decode(&self, text: &str) -> Option<usize> {
        if text.is_empty() {
            return None;
        }
        let mut value: usize = 0;
        for letter in text.chars() {
            let digit = (letter as u32).checked_sub(self.start as u32)?;
            if digit >= self.size {
                return None;
            }
            value = value
                .checked_mul(self.size as usize)?
                .checked_add(digit as usize + 1)?;
        }
        Some(value - 1)
    }
}

/// `index`-th name of the alphabet starting at `start` with `size` letters.
pub fn alphabetic(index: usize, start: char, size: u32) -> Option<SmolStr> {
    Alphabet::new(start, size).map(|alphabet| alphabet.encode(index))
}

pub fn alphabetic_index(text: &str, start: char, size: u32) -> Option<usize> {
    Alphabet::new(start, size)?.decode(text)
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::LOWERCASE
    }
}

/// Tunables of the alias assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AliasPolicy {
    /// Longest name prefix tried before switching to the alphabet.
    pub max_prefix: usize,
    pub alphabet: Alphabet,
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self {
            max_prefix: 8,
            alphabet: Alphabet::LOWERCASE,
        }
    }
}

/// The lazily produced, infinite candidate sequence of one entity.
#[derive(Debug, Clone)]
pub struct AliasCandidates {
    stem: Vec<char>,
    prefix: usize,
    fallback: usize,
    policy: AliasPolicy,
}

impl AliasCandidates {
    pub fn new(name: Option<&str>, policy: AliasPolicy) -> Self {
        let stem = name.map(stem).unwrap_or_default();
        Self {
            stem,
            prefix: 0,
            fallback: 0,
            policy,
        }
    }

    pub fn next_candidate(&mut self) -> SmolStr {
        if self.prefix < self.stem.len().min(self.policy.max_prefix) {
            self.prefix += 1;
            return self.stem[..self.prefix].iter().copied().collect();
        }
        let candidate = self.policy.alphabet.encode(self.fallback);
        self.fallback += 1;
        candidate
    }
}

impl Iterator for AliasCandidates {
    type Item = SmolStr;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_candidate())
    }
}

/// Lowercase identifier characters of `name`, starting at its first letter.
fn stem(name: &str) -> Vec<char> {
    name.chars()
        .skip_while(|c| !c.is_ascii_alphabetic())
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Hands out aliases for one statement scope.
#[derive(Debug)]
pub struct AliasRegistry {
    policy: AliasPolicy,
    taken: HashSet<SmolStr>,
}

impl AliasRegistry {
    pub fn new(policy: AliasPolicy) -> Self {
        Self {
            policy,
            taken: HashSet::new(),
        }
    }

    /// Marks names as unavailable, e.g. aliases of an enclosing statement.
    pub fn reserve<I>(&mut self, names: I)
    where
        I: IntoIterator<Item = SmolStr>,
    {
        self.taken.extend(names);
    }

    /// Takes the first free candidate for an entity named `hint`.
    pub fn assign(&mut self, hint: Option<&str>) -> SmolStr {
        let mut candidates = AliasCandidates::new(hint, self.policy);
        loop {
            let candidate = candidates.next_candidate();
            if is_reserved(&candidate) || self.taken.contains(&candidate) {
                continue;
            }
            self.taken.insert(candidate.clone());
            return candidate;
        }
    }
}

/// Alias assignments of one statement scope.
#[derive(Debug, Default, Clone)]
pub(crate) struct Aliases {
    pub(crate) tables: IndexMap<TableRef, SmolStr>,
    pub(crate) results: IndexMap<ResultColumn, SmolStr>,
}

impl Aliases {
    /// Tables first, then result columns, each in first-appearance order.
    pub(crate) fn assign(
        registry: &mut AliasRegistry,
        tables: &IndexSet<TableRef>,
        results: &IndexSet<ResultColumn>,
    ) -> Self {
        let mut aliases = Self::default();
        for table_ref in tables {
            let alias = registry.assign(Some(table_ref.name()));
            tracing::trace!(table = table_ref.name(), %alias, "assigned table alias");
            aliases.tables.insert(table_ref.clone(), alias);
        }
        for result in results {
            let alias = registry.assign(result.alias_hint());
            tracing::trace!(index = result.index(), %alias, "assigned result alias");
            aliases.results.insert(result.clone(), alias);
        }
        aliases
    }
}
