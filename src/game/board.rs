use std::collections::HashSet;

use rand::Rng;
use rand::seq::SliceRandom;

use super::card::{Card, Identity};
use super::error::{GameError, Result};

pub const DEFAULT_COLUMNS: usize = 4;

/// The dealt cards, two per identity, in their current grid order.
#[derive(Clone, Debug)]
pub struct Board {
    cards: Vec<Card>,
    columns: usize,
}

impl Board {
    /// Creates two face-down cards per identity, pairs adjacent, unshuffled.
    pub fn build(identities: &[Identity], columns: usize) -> Result<Self> {
        if identities.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "the deck needs at least one identity".to_string(),
            ));
        }
        if columns == 0 {
            return Err(GameError::InvalidConfiguration(
                "the board needs at least one column".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(identities.len());
        for identity in identities {
            if !seen.insert(identity) {
                return Err(GameError::InvalidConfiguration(format!(
                    "identity \"{}\" appears more than once in the deck",
                    identity.name
                )));
            }
        }

        let mut cards = Vec::with_capacity(identities.len() * 2);
        for identity in identities {
            cards.push(Card::new(identity.clone()));
            cards.push(Card::new(identity.clone()));
        }

        // Grid coordinates are i32 in the shell.
        if cards.len() > i32::MAX as usize {
            return Err(GameError::InvalidConfiguration(format!(
                "a deck of {} cards is too large to lay out",
                cards.len()
            )));
        }
        if columns > cards.len() {
            return Err(GameError::InvalidConfiguration(format!(
                "{columns} columns is wider than the {} cards on the board",
                cards.len()
            )));
        }

        Ok(Self { cards, columns })
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn hide_all(&mut self) {
        for card in &mut self.cards {
            card.hide();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn pair_count(&self) -> u32 {
        (self.cards.len() / 2) as u32
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.cards.len().div_ceil(self.columns)
    }
}
