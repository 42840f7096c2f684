//! The long-lived object a view layer talks to.
//!
//! A `Session` holds the current `Game` snapshot and swaps it whenever a
//! command is accepted. Rejected commands leave the snapshot in place.
//! Auto-complete runs off a timer owned by the view: after each command the
//! view asks [`Session::auto_complete_delay`] whether to schedule a tick, and
//! [`Session::on_auto_complete_timer`] re-checks the live snapshot when the
//! timer fires, so ticks scheduled before a new deal do nothing.

use crate::{
    game::{Destination, DrawMode, Game, Source},
    plays::Play,
    settings::Settings,
};
use anyhow::Error;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum Command {
    NewGame,
    SetDrawMode {
        draw_mode: DrawMode,
    },
    Draw,
    Move {
        source: Source,
        destination: Destination,
    },
    Flip {
        pile: usize,
    },
    AutoMove {
        source: Source,
    },
}

impl From<Play> for Command {
    fn from(play: Play) -> Self {
        match play {
            Play::Draw => Command::Draw,
            Play::Flip { pile } => Command::Flip { pile },
            Play::MoveCards {
                source,
                destination,
            } => Command::Move {
                source,
                destination,
            },
        }
    }
}

pub struct Session {
    game: Game,
    settings: Settings,
    rng: Pcg32,
}

impl Session {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let game = Game::deal(&mut rng, settings.draw_mode);
        Self {
            game,
            settings,
            rng,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Runs one command. `Ok(true)` means the snapshot changed.
    pub fn dispatch(&mut self, command: Command) -> Result<bool, Error> {
        match command {
            Command::NewGame => {
                self.new_game();
                Ok(true)
            }
            Command::SetDrawMode { draw_mode } => Ok(self.set_draw_mode(draw_mode)),
            Command::Draw => Ok(self.draw()),
            Command::Move {
                source,
                destination,
            } => self.attempt_move(source, destination),
            Command::Flip { pile } => self.flip(pile),
            Command::AutoMove { source } => self.auto_move_to_foundation(source),
        }
    }

    pub fn new_game(&mut self) {
        self.game = Game::deal(&mut self.rng, self.settings.draw_mode);
    }

    /// Takes effect with the next deal; the current game keeps its mode.
    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) -> bool {
        if self.settings.draw_mode == draw_mode {
            return false;
        }
        info!(?draw_mode, "draw mode changed");
        self.settings.draw_mode = draw_mode;
        true
    }

    pub fn draw(&mut self) -> bool {
        let next = self.game.draw();
        self.replace(next)
    }

    pub fn attempt_move(&mut self, source: Source, destination: Destination) -> Result<bool, Error> {
        let next = self.game.move_cards(source, destination)?;
        Ok(self.replace(next))
    }

    pub fn flip(&mut self, pile: usize) -> Result<bool, Error> {
        let next = self.game.flip(pile)?;
        Ok(self.replace(next))
    }

    pub fn auto_move_to_foundation(&mut self, source: Source) -> Result<bool, Error> {
        let next = self.game.auto_move_to_foundation(source)?;
        Ok(self.replace(next))
    }

    /// How long the view should wait before the next auto-complete tick, if
    /// one is due.
    pub fn auto_complete_delay(&self) -> Option<u64> {
        if self.game.can_auto_complete() {
            Some(self.settings.auto_complete_delay_ms)
        } else {
            None
        }
    }

    /// Timer callback: moves at most one card, judged against the live snapshot.
    pub fn on_auto_complete_timer(&mut self) -> bool {
        let next = self.game.auto_complete_step();
        if next.is_none() {
            debug!("auto-complete tick with nothing to do");
        }
        self.replace(next)
    }

    fn replace(&mut self, next: Option<Game>) -> bool {
        match next {
            Some(game) => {
                self.game = game;
                true
            }
            None => false,
        }
    }
}
