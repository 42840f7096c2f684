use crate::{
    card::{Card, Suit},
    rules,
};
use alloc::vec::Vec;
use core::fmt;
use serde::{Deserialize, Serialize};

fn write_cards(f: &mut fmt::Formatter<'_>, cards: &[Card], split: usize) -> fmt::Result {
    f.write_str("[")?;
    for (index, card) in cards.iter().enumerate() {
        if index == split {
            f.write_str("|")?;
        } else if index > 0 {
            f.write_str(" ")?;
        }
        f.write_fmt(format_args!("{:?}", card))?;
    }
    f.write_str("]")
}

/// A tableau pile. The last `face_up_count` cards are face up.
#[derive(Clone, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tableau {
    pub cards: Vec<Card>,
    pub face_up_count: usize,
}

impl Tableau {
    pub fn new(cards: Vec<Card>, face_up_count: usize) -> Self {
        Self {
            cards,
            face_up_count,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.cards.last()
    }

    /// Index of the first face-up card; equal to `len()` when none are face up.
    pub fn first_face_up_index(&self) -> usize {
        self.cards.len().saturating_sub(self.face_up_count)
    }

    pub fn is_face_up(&self, index: usize) -> bool {
        index < self.cards.len() && index >= self.first_face_up_index()
    }

    pub fn has_face_down_top(&self) -> bool {
        !self.cards.is_empty() && self.face_up_count == 0
    }

    pub fn is_fully_face_up(&self) -> bool {
        self.face_up_count >= self.cards.len()
    }

    /// Face-up cards from `index` to the end, if they form a movable run.
    pub fn run_from(&self, index: usize) -> Option<&[Card]> {
        if !self.is_face_up(index) {
            return None;
        }
        let run = &self.cards[index..];
        if rules::is_run(run) {
            Some(run)
        } else {
            None
        }
    }

    pub fn flip_top_card(&mut self) {
        if self.has_face_down_top() {
            self.face_up_count += 1;
        }
    }

    /// Splits off the cards from `index`. The card left on top stays face up.
    pub fn take_from(&mut self, index: usize) -> Vec<Card> {
        let taken = self.cards.split_off(index);
        self.face_up_count = if self.cards.is_empty() {
            0
        } else {
            self.face_up_count.saturating_sub(taken.len()).max(1)
        };
        taken
    }

    pub fn put_run(&mut self, run: &[Card]) {
        self.cards.extend_from_slice(run);
        self.face_up_count += run.len();
    }
}

impl fmt::Debug for Tableau {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_cards(f, &self.cards, self.first_face_up_index())
    }
}

/// Drawn cards. `visible_count` is how many of the top cards are fanned out.
#[derive(Clone, Default, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Waste {
    pub cards: Vec<Card>,
    pub visible_count: usize,
}

impl Waste {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn pop(&mut self) -> Option<Card> {
        let card = self.cards.pop()?;
        self.visible_count = self.visible_count.saturating_sub(1);
        if self.visible_count == 0 && !self.cards.is_empty() {
            self.visible_count = 1;
        }
        Some(card)
    }
}

impl fmt::Debug for Waste {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let split = self.cards.len().saturating_sub(self.visible_count);
        write_cards(f, &self.cards, split)
    }
}

#[derive(Clone, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Foundation {
    pub suit: Suit,
    pub cards: Vec<Card>,
}

impl Foundation {
    pub const COMPLETE: usize = 13;

    pub fn new(suit: Suit) -> Self {
        Self {
            suit,
            cards: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top_card(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn can_accept(&self, card: &Card) -> bool {
        rules::can_stack_on_foundation(card, &self.cards, self.suit)
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == Self::COMPLETE
    }
}

impl fmt::Debug for Foundation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_fmt(format_args!("{:?}: ", self.suit))?;
        write_cards(f, &self.cards, usize::MAX)
    }
}
