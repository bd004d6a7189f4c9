//! Gate names and the fresh-name allocator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A gate identifier.
///
/// Wraps a `String` rather than interning to keep the container a plain
/// `BTreeMap<Name, Gate>` — circuits in this domain are small (tens to a
/// few hundred gates), so the allocation cost of cloning names around is
/// not worth an interner's complexity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Name(pub String);

impl Name {
    /// The reserved identifier for the independent variable.
    pub const INDEPENDENT_VARIABLE: &'static str = "t";

    /// Whether this name is the independent variable `t`.
    #[inline]
    pub fn is_t(&self) -> bool {
        self.0 == Self::INDEPENDENT_VARIABLE
    }

    /// Whether this name has the generated-name shape `_<k>`.
    #[inline]
    pub fn is_generated(&self) -> bool {
        self.0.starts_with('_')
    }

    /// If this name has the shape `_<k>`, parse and return `k`.
    fn generated_index(&self) -> Option<u64> {
        self.0.strip_prefix('_')?.parse().ok()
    }

    /// The independent variable as a `Name`.
    pub fn t() -> Self {
        Name(Self::INDEPENDENT_VARIABLE.to_string())
    }

    /// Borrow the underlying string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Name {
    fn from(s: &str) -> Self {
        Name(s.to_string())
    }
}

impl From<String> for Name {
    fn from(s: String) -> Self {
        Name(s)
    }
}

impl std::borrow::Borrow<str> for Name {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Monotone per-circuit counter minting `_<k>` fresh names.
///
/// A process-wide static counter would make fresh names depend on
/// allocation order across unrelated circuits; each
/// [`crate::circuit::Circuit`] owns one of these instead, and loading a
/// circuit whose gates already use `_<k>` names must [`FreshNames::observe`]
/// every such name so newly-minted names never collide with them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FreshNames {
    next: u64,
}

impl FreshNames {
    /// Create a counter starting at `_1`.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Mint the next fresh name.
    pub fn next_name(&mut self) -> Name {
        let name = Name(format!("_{}", self.next));
        self.next += 1;
        name
    }

    /// Bump the counter past `name` if `name` has the generated shape `_<k>`.
    ///
    /// Called on every insertion with an explicit (non-generated-request)
    /// name, and when loading a serialized circuit, so the counter never
    /// mints a name already in use.
    pub fn observe(&mut self, name: &Name) {
        if let Some(k) = name.generated_index() {
            if k >= self.next {
                self.next = k + 1;
            }
        }
    }
}
