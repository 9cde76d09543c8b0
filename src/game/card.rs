use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// The token two cards share to form a pair, plus the glyph shown when revealed.
///
/// Only `name` takes part in equality: two identities with the same name are
/// the same pair even if their faces differ.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub face: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, face: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            face: face.into(),
        }
    }
}

impl PartialEq for Identity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Identity {}

impl Hash for Identity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[derive(Clone, Debug)]
pub struct Card {
    identity: Identity,
    revealed: bool,
}

impl Card {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            revealed: false,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn reveal(&mut self) {
        self.revealed = true;
    }

    pub fn hide(&mut self) {
        self.revealed = false;
    }

    pub fn matches(&self, other: &Card) -> bool {
        self.identity == other.identity
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.matches(other)
    }
}

impl Eq for Card {}
