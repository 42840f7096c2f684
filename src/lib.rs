//! Klondike solitaire rules and game state.
//!
//! [`Game`] is an immutable snapshot: every transition hands back a new value,
//! or `None` when the rules reject it. [`Session`] holds the current snapshot
//! for a view layer and turns commands into transitions.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod card;
pub mod game;
pub mod plays;
pub mod rules;
pub mod session;
pub mod settings;
pub mod stack;

pub use crate::{
    card::{make_deck, shuffle, Card, Color, Rank, Suit, SUITS},
    game::{Destination, DrawMode, Game, Source, DECK_SIZE, FOUNDATION_COUNT, TABLEAU_COUNT},
    plays::Play,
    session::{Command, Session},
    settings::Settings,
    stack::{Foundation, Tableau, Waste},
};
