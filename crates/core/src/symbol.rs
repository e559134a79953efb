//! Symbolic identifiers
//!
//! A [`Symbol`] is a unique identity with an optional descriptive label. Two
//! symbols with the same label are still distinct unless they come from the
//! process-wide registry.
//!
//! # Registry
//!
//! The registry maps a label to one shared identity:
//!
//! - [`Symbol::for_label`] returns the registered symbol, registering it on
//!   first request
//! - [`Symbol::resolve`] returns the registered symbol if one exists and
//!   otherwise mints a fresh, unregistered symbol with the label
//!
//! Decoding a stored symbol goes through [`Symbol::resolve`], so registered
//! symbols come back with their identity and every other symbol comes back
//! as a new identity carrying the same label.
//!
//! The well-known labels (`Symbol.iterator` and friends) are registered
//! the first time the registry is touched.

use once_cell::sync::Lazy;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Labels registered before any caller touches the registry
pub const WELL_KNOWN: &[&str] = &[
    "Symbol.asyncIterator",
    "Symbol.hasInstance",
    "Symbol.isConcatSpreadable",
    "Symbol.iterator",
    "Symbol.match",
    "Symbol.matchAll",
    "Symbol.replace",
    "Symbol.search",
    "Symbol.species",
    "Symbol.split",
    "Symbol.toPrimitive",
    "Symbol.toStringTag",
    "Symbol.unscopables",
];

static REGISTRY: Lazy<RwLock<FxHashMap<String, Symbol>>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for label in WELL_KNOWN {
        map.insert(label.to_string(), Symbol::mint(Some(*label)));
    }
    RwLock::new(map)
});

/// Symbolic identifier
///
/// Cloning a symbol keeps its identity. Equality and hashing use the
/// identity only; the label is descriptive.
#[derive(Clone)]
pub struct Symbol {
    id: Uuid,
    label: Option<Arc<str>>,
}

impl Symbol {
    /// Mint a fresh, unregistered symbol
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_core::Symbol;
    ///
    /// let a = Symbol::new("token");
    /// let b = Symbol::new("token");
    /// assert_ne!(a, b);
    /// ```
    pub fn new(label: impl AsRef<str>) -> Self {
        Self::mint(Some(label.as_ref()))
    }

    /// Mint a fresh symbol without a label
    pub fn anonymous() -> Self {
        Self::mint(None)
    }

    /// Get the registered symbol for `label`, registering it if needed
    ///
    /// # Examples
    ///
    /// ```
    /// use tabula_core::Symbol;
    ///
    /// assert_eq!(Symbol::for_label("app.key"), Symbol::for_label("app.key"));
    /// ```
    pub fn for_label(label: impl AsRef<str>) -> Self {
        let label = label.as_ref();
        if let Some(sym) = REGISTRY.read().get(label) {
            return sym.clone();
        }
        REGISTRY
            .write()
            .entry(label.to_string())
            .or_insert_with(|| Self::mint(Some(label)))
            .clone()
    }

    /// Look `label` up in the registry, minting a fresh symbol on a miss
    ///
    /// A miss does not register anything.
    pub fn resolve(label: impl AsRef<str>) -> Self {
        let label = label.as_ref();
        match REGISTRY.read().get(label) {
            Some(sym) => sym.clone(),
            None => Self::mint(Some(label)),
        }
    }

    /// Get the registered symbol for `label` without minting
    pub fn registered(label: impl AsRef<str>) -> Option<Self> {
        REGISTRY.read().get(label.as_ref()).cloned()
    }

    /// Check if this symbol is the registered identity for its label
    pub fn is_registered(&self) -> bool {
        let label = self.description();
        REGISTRY
            .read()
            .get(label)
            .map_or(false, |sym| sym.id == self.id)
    }

    /// The descriptive label, empty for anonymous symbols
    pub fn description(&self) -> &str {
        self.label.as_deref().unwrap_or("")
    }

    fn mint(label: Option<&str>) -> Self {
        Self {
            id: Uuid::new_v4(),
            label: label.map(Arc::from),
        }
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Symbol {}

impl std::hash::Hash for Symbol {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.description())
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})#{}", self.description(), self.id)
    }
}
