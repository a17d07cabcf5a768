//! Availability resolution for named logical inputs.
//!
//! Absence of a configured input is a soft condition: the resolver emits one
//! diagnostic and the dependent builder is skipped, leaving the record's
//! defaults in place for that entity.

use log::warn;
use serde::{Deserialize, Serialize};

/// A named logical input. A disabled tag means "do not attempt to fetch",
/// the typed equivalent of suppressing the input in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTag {
    pub label: String,
    pub enabled: bool,
}

impl InputTag {
    pub fn new(label: &str) -> Self {
        InputTag {
            label: label.to_string(),
            enabled: true,
        }
    }

    pub fn disabled(label: &str) -> Self {
        InputTag {
            label: label.to_string(),
            enabled: false,
        }
    }
}

/// Outcome of looking up one logical input for the current event.
#[derive(Debug)]
pub enum Resolved<'a, T: ?Sized> {
    Available(&'a T),
    Disabled,
    Missing,
}

// Manual impls: the reference inside is copyable no matter what T is, but
// the derives would demand T itself be Clone/Copy.
impl<'a, T: ?Sized> Clone for Resolved<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T: ?Sized> Copy for Resolved<'a, T> {}

impl<'a, T: ?Sized> Resolved<'a, T> {
    pub fn get(self) -> Option<&'a T> {
        match self {
            Resolved::Available(collection) => Some(collection),
            _ => None,
        }
    }
}

/// Look up a logical input in the event's collection store.
///
/// A configured-but-absent input records a diagnostic and resolves to
/// `Missing`; it never aborts record construction.
pub fn resolve<'a, T: ?Sized>(
    tag: &InputTag,
    collection: Option<&'a T>,
    what: &str,
) -> Resolved<'a, T> {
    if !tag.enabled {
        return Resolved::Disabled;
    }
    match collection {
        Some(collection) => Resolved::Available(collection),
        None => {
            warn!("{} collection '{}' does not exist", what, tag.label);
            Resolved::Missing
        }
    }
}

/// Resolve a single-object summary delivered as a one-entry collection.
/// An empty collection counts as missing.
pub fn resolve_first<'a, T>(
    tag: &InputTag,
    collection: Option<&'a [T]>,
    what: &str,
) -> Resolved<'a, T> {
    match resolve(tag, collection, what) {
        Resolved::Available(entries) => match entries.first() {
            Some(first) => Resolved::Available(first),
            None => {
                warn!("{} collection '{}' is empty", what, tag.label);
                Resolved::Missing
            }
        },
        Resolved::Disabled => Resolved::Disabled,
        Resolved::Missing => Resolved::Missing,
    }
}
