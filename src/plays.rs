use crate::game::{Destination, Game, Source};
use alloc::vec::Vec;
use anyhow::Error;
use serde::{Deserialize, Serialize};

/// A single step a player can take.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "play", rename_all = "snake_case")]
pub enum Play {
    Draw,
    Flip {
        pile: usize,
    },
    MoveCards {
        source: Source,
        destination: Destination,
    },
}

impl Play {
    pub fn is_draw(&self) -> bool {
        matches!(self, Play::Draw)
    }

    pub fn is_to_foundation(&self) -> bool {
        matches!(
            self,
            Play::MoveCards {
                destination: Destination::Foundation { .. },
                ..
            }
        )
    }
}

impl Game {
    /// Every card a player could pick up: the waste top, foundation tops and
    /// each face-up tableau card.
    pub fn sources(&self) -> Vec<Source> {
        let mut sources = Vec::new();
        if !self.waste.is_empty() {
            sources.push(Source::Waste);
        }
        for (index, foundation) in self.foundations.iter().enumerate() {
            if !foundation.is_empty() {
                sources.push(Source::Foundation { index });
            }
        }
        for (pile, tableau) in self.tableaux.iter().enumerate() {
            for index in tableau.first_face_up_index()..tableau.len() {
                sources.push(Source::Tableau { pile, index });
            }
        }
        sources
    }

    fn destinations(&self) -> impl Iterator<Item = Destination> {
        let foundations = (0..self.foundations.len()).map(|index| Destination::Foundation { index });
        let tableaux = (0..self.tableaux.len()).map(|pile| Destination::Tableau { pile });
        foundations.chain(tableaux)
    }

    pub fn apply(&self, play: Play) -> Result<Option<Game>, Error> {
        match play {
            Play::Draw => Ok(self.draw()),
            Play::Flip { pile } => self.flip(pile),
            Play::MoveCards {
                source,
                destination,
            } => self.move_cards(source, destination),
        }
    }

    /// All plays the current snapshot accepts, draws first.
    pub fn legal_plays(&self) -> Vec<Play> {
        if self.won {
            return Vec::new();
        }
        let mut plays = Vec::new();
        if !self.stock.is_empty() || !self.waste.is_empty() {
            plays.push(Play::Draw);
        }
        for (pile, tableau) in self.tableaux.iter().enumerate() {
            if tableau.has_face_down_top() {
                plays.push(Play::Flip { pile });
            }
        }
        for source in self.sources() {
            for destination in self.destinations() {
                let play = Play::MoveCards {
                    source,
                    destination,
                };
                if let Ok(Some(_)) = self.apply(play) {
                    plays.push(play);
                }
            }
        }
        plays
    }
}
