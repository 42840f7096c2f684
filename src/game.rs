use crate::{
    card::{self, Card, SUITS},
    rules,
    stack::{Foundation, Tableau, Waste},
};
use alloc::{string::String, vec::Vec};
use anyhow::{anyhow, ensure, Error};
use core::{convert::TryFrom, mem};
use hashbrown::HashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

pub const TABLEAU_COUNT: usize = 7;
pub const FOUNDATION_COUNT: usize = 4;
pub const DECK_SIZE: usize = 52;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DrawMode {
    One,
    Three,
}

impl DrawMode {
    pub fn count(&self) -> usize {
        match self {
            DrawMode::One => 1,
            DrawMode::Three => 3,
        }
    }
}

impl Default for DrawMode {
    fn default() -> Self {
        DrawMode::One
    }
}

impl TryFrom<u8> for DrawMode {
    type Error = Error;

    fn try_from(count: u8) -> Result<Self, Self::Error> {
        match count {
            1 => Ok(DrawMode::One),
            3 => Ok(DrawMode::Three),
            _ => Err(anyhow!("draw mode must be 1 or 3, got {}", count)),
        }
    }
}

impl From<DrawMode> for u8 {
    fn from(mode: DrawMode) -> Self {
        mode.count() as u8
    }
}

/// Where a moved card or run comes from.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Source {
    Waste,
    Foundation { index: usize },
    Tableau { pile: usize, index: usize },
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Destination {
    Foundation { index: usize },
    Tableau { pile: usize },
}

/// One immutable game snapshot. Transitions return a new value, or `None`
/// when the move is illegal and the snapshot should be kept as is.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    pub stock: Vec<Card>,
    pub waste: Waste,
    pub foundations: Vec<Foundation>,
    pub tableaux: Vec<Tableau>,
    pub moves: u32,
    pub draw_mode: DrawMode,
    pub won: bool,
}

impl Game {
    /// A table with every pile empty.
    pub fn empty(draw_mode: DrawMode) -> Self {
        Self {
            stock: Vec::new(),
            waste: Waste::default(),
            foundations: SUITS.iter().map(|suit| Foundation::new(*suit)).collect(),
            tableaux: (0..TABLEAU_COUNT).map(|_| Tableau::default()).collect(),
            moves: 0,
            draw_mode,
            won: false,
        }
    }

    pub fn deal<R: Rng + ?Sized>(rng: &mut R, draw_mode: DrawMode) -> Self {
        let mut game = Self::empty(draw_mode);
        game.deal_cards(card::shuffled_deck(rng));
        info!(?draw_mode, "dealt new game");
        game
    }

    /// Deals `cards` in the given order, without shuffling.
    pub fn from_deck(cards: Vec<Card>, draw_mode: DrawMode) -> Result<Self, Error> {
        ensure!(
            cards.len() == DECK_SIZE,
            "a deal needs {} cards, got {}",
            DECK_SIZE,
            cards.len()
        );
        let mut game = Self::empty(draw_mode);
        game.deal_cards(cards);
        game.check_integrity()?;
        Ok(game)
    }

    fn deal_cards(&mut self, cards: Vec<Card>) {
        let mut cards = cards.into_iter();
        for round in 0..TABLEAU_COUNT {
            for pile in round..TABLEAU_COUNT {
                if let Some(card) = cards.next() {
                    self.tableaux[pile].cards.push(card);
                }
            }
        }
        for tableau in &mut self.tableaux {
            tableau.face_up_count = if tableau.is_empty() { 0 } else { 1 };
        }
        self.stock = cards.collect();
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn cards_in_foundations(&self) -> usize {
        self.foundations.iter().map(Foundation::len).sum()
    }

    fn check_tableau_index(&self, pile: usize) -> Result<(), Error> {
        ensure!(
            pile < self.tableaux.len(),
            "tableau pile {} does not exist, there are {}",
            pile,
            self.tableaux.len()
        );
        Ok(())
    }

    fn check_foundation_index(&self, index: usize) -> Result<(), Error> {
        ensure!(
            index < self.foundations.len(),
            "foundation {} does not exist, there are {}",
            index,
            self.foundations.len()
        );
        Ok(())
    }

    fn check_source(&self, source: Source) -> Result<(), Error> {
        match source {
            Source::Waste => Ok(()),
            Source::Foundation { index } => self.check_foundation_index(index),
            Source::Tableau { pile, .. } => self.check_tableau_index(pile),
        }
    }

    fn check_destination(&self, destination: Destination) -> Result<(), Error> {
        match destination {
            Destination::Foundation { index } => self.check_foundation_index(index),
            Destination::Tableau { pile } => self.check_tableau_index(pile),
        }
    }

    /// The cards a move from `source` would carry, if the source may be picked up.
    pub fn movable_cards(&self, source: Source) -> Option<&[Card]> {
        match source {
            Source::Waste => {
                let len = self.waste.len();
                len.checked_sub(1).map(|top| &self.waste.cards[top..])
            }
            Source::Foundation { index } => {
                let foundation = self.foundations.get(index)?;
                let len = foundation.len();
                len.checked_sub(1).map(|top| &foundation.cards[top..])
            }
            Source::Tableau { pile, index } => self.tableaux.get(pile)?.run_from(index),
        }
    }

    fn take(&mut self, source: Source) -> Vec<Card> {
        match source {
            Source::Waste => self.waste.pop().into_iter().collect(),
            Source::Foundation { index } => self.foundations[index].cards.pop().into_iter().collect(),
            Source::Tableau { pile, index } => self.tableaux[pile].take_from(index),
        }
    }

    fn update_won(&mut self) {
        if !self.won && self.foundations.iter().all(Foundation::is_complete) {
            self.won = true;
            info!(moves = self.moves, "game won");
        }
    }

    /// Draws from the stock, or turns the waste back over when the stock is empty.
    pub fn draw(&self) -> Option<Game> {
        if self.won {
            return None;
        }
        let mut next = self.clone();
        if !next.stock.is_empty() {
            let amount_to_deal = self.draw_mode.count().min(next.stock.len());
            let dealt = next.stock.split_off(next.stock.len() - amount_to_deal);
            next.waste.cards.extend(dealt);
            next.waste.visible_count = amount_to_deal;
            next.moves = next.moves.saturating_add(1);
            debug!(drawn = amount_to_deal, stock = next.stock.len(), "drew from stock");
        } else if !next.waste.is_empty() {
            mem::swap(&mut next.waste.cards, &mut next.stock);
            next.stock.reverse();
            next.waste.visible_count = 0;
            info!(stock = next.stock.len(), "recycled waste into stock");
        } else {
            return None;
        }
        Some(next)
    }

    pub fn move_cards(
        &self,
        source: Source,
        destination: Destination,
    ) -> Result<Option<Game>, Error> {
        self.check_source(source)?;
        self.check_destination(destination)?;
        let next = match destination {
            Destination::Foundation { index } => self.to_foundation(source, index),
            Destination::Tableau { pile } => self.to_tableau(source, pile),
        };
        if next.is_none() {
            debug!(?source, ?destination, "rejected move");
        }
        Ok(next)
    }

    fn to_foundation(&self, source: Source, index: usize) -> Option<Game> {
        if self.won {
            return None;
        }
        if let Source::Foundation { .. } = source {
            return None;
        }
        let card = match self.movable_cards(source)? {
            [card] => *card,
            _ => return None,
        };
        let foundation = self.foundations.get(index)?;
        if !foundation.can_accept(&card) {
            return None;
        }
        let mut next = self.clone();
        next.take(source);
        next.foundations[index].cards.push(card);
        next.moves = next.moves.saturating_add(1);
        debug!(?card, ?source, foundation = index, "moved to foundation");
        next.update_won();
        Some(next)
    }

    fn to_tableau(&self, source: Source, pile: usize) -> Option<Game> {
        if self.won {
            return None;
        }
        if let Source::Tableau { pile: from, .. } = source {
            if from == pile {
                return None;
            }
        }
        let run = self.movable_cards(source)?;
        let target = self.tableaux.get(pile)?;
        if target.has_face_down_top() {
            return None;
        }
        let first = run.first()?;
        if !rules::can_stack_on_tableau(first, target.top_card()) {
            return None;
        }
        let mut next = self.clone();
        let run = next.take(source);
        next.tableaux[pile].put_run(&run);
        next.moves = next.moves.saturating_add(1);
        debug!(?run, ?source, pile, "moved to tableau");
        Some(next)
    }

    /// Turns over the face-down top card of `pile`.
    pub fn flip(&self, pile: usize) -> Result<Option<Game>, Error> {
        self.check_tableau_index(pile)?;
        if !self.tableaux[pile].has_face_down_top() {
            return Ok(None);
        }
        let mut next = self.clone();
        next.tableaux[pile].flip_top_card();
        debug!(pile, "flipped tableau card");
        Ok(Some(next))
    }

    /// Sends the card at `source` to the first foundation, in suit order, that takes it.
    pub fn auto_move_to_foundation(&self, source: Source) -> Result<Option<Game>, Error> {
        self.check_source(source)?;
        Ok(self.first_foundation_move(source))
    }

    fn first_foundation_move(&self, source: Source) -> Option<Game> {
        (0..self.foundations.len()).find_map(|index| self.to_foundation(source, index))
    }

    /// Only face-up tableau cards remain, so the rest of the game plays itself.
    pub fn can_auto_complete(&self) -> bool {
        !self.won
            && self.stock.is_empty()
            && self.waste.is_empty()
            && self.tableaux.iter().all(Tableau::is_fully_face_up)
            && self.tableaux.iter().any(|tableau| !tableau.is_empty())
    }

    /// Moves a single tableau top card to its foundation.
    pub fn auto_complete_step(&self) -> Option<Game> {
        if !self.can_auto_complete() {
            return None;
        }
        self.tableaux
            .iter()
            .enumerate()
            .filter_map(|(pile, tableau)| {
                tableau
                    .len()
                    .checked_sub(1)
                    .map(|index| Source::Tableau { pile, index })
            })
            .find_map(|source| self.first_foundation_move(source))
    }

    /// Verifies the snapshot holds each of the 52 cards exactly once and every
    /// pile is well formed.
    pub fn check_integrity(&self) -> Result<(), Error> {
        ensure!(
            self.tableaux.len() == TABLEAU_COUNT,
            "expected {} tableau piles, found {}",
            TABLEAU_COUNT,
            self.tableaux.len()
        );
        ensure!(
            self.foundations.len() == FOUNDATION_COUNT,
            "expected {} foundations, found {}",
            FOUNDATION_COUNT,
            self.foundations.len()
        );
        let mut seen = HashSet::with_capacity(DECK_SIZE);
        let all_cards = self
            .stock
            .iter()
            .chain(self.waste.cards.iter())
            .chain(self.foundations.iter().flat_map(|f| f.cards.iter()))
            .chain(self.tableaux.iter().flat_map(|t| t.cards.iter()));
        for card in all_cards {
            ensure!(seen.insert(*card), "{:?} appears more than once", card);
        }
        ensure!(
            seen.len() == DECK_SIZE,
            "expected {} cards, found {}",
            DECK_SIZE,
            seen.len()
        );
        for (index, (foundation, suit)) in self.foundations.iter().zip(SUITS.iter()).enumerate() {
            ensure!(
                foundation.suit == *suit,
                "foundation {} should hold {:?}",
                index,
                suit
            );
            for (position, card) in foundation.cards.iter().enumerate() {
                ensure!(
                    rules::can_stack_on_foundation(card, &foundation.cards[..position], *suit),
                    "foundation {} is out of order at {:?}",
                    index,
                    card
                );
            }
        }
        for (pile, tableau) in self.tableaux.iter().enumerate() {
            ensure!(
                tableau.face_up_count <= tableau.len(),
                "tableau {} has {} face-up cards but only {} cards",
                pile,
                tableau.face_up_count,
                tableau.len()
            );
        }
        ensure!(
            self.waste.visible_count <= self.waste.len(),
            "waste shows {} cards but holds {}",
            self.waste.visible_count,
            self.waste.len()
        );
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, Error> {
        serde_json::to_string(self).map_err(|err| anyhow!("cannot serialize game: {}", err))
    }

    pub fn from_json(json: &str) -> Result<Self, Error> {
        let mut game: Game =
            serde_json::from_str(json).map_err(|err| anyhow!("invalid game snapshot: {}", err))?;
        game.check_integrity()?;
        game.won = game.foundations.iter().all(Foundation::is_complete);
        Ok(game)
    }
}
