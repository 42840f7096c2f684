//! Legality predicates. Every move in the game consults these and nothing else.

use crate::card::{Card, Rank, Suit};

/// A card may go onto an empty tableau pile only if it is a King; otherwise it
/// must be one rank below the target and of the opposite color.
pub fn can_stack_on_tableau(card: &Card, target: Option<&Card>) -> bool {
    if let Some(top_card) = target {
        if !top_card.is_same_color(card) {
            card.is_one_below(top_card)
        } else {
            false
        }
    } else {
        card.rank == Rank::King
    }
}

pub fn can_stack_on_foundation(card: &Card, foundation: &[Card], suit: Suit) -> bool {
    if card.suit != suit {
        return false;
    }
    match foundation.last() {
        Some(top_card) => top_card.is_one_below(card),
        None => card.rank == Rank::Ace,
    }
}

/// True when each card can be stacked on the one before it.
pub fn is_run(cards: &[Card]) -> bool {
    cards
        .windows(2)
        .all(|pair| can_stack_on_tableau(&pair[1], Some(&pair[0])))
}
