use alloc::{string::String, vec::Vec};
use anyhow::{anyhow, Error};
use core::{fmt, str::FromStr};
use enum_iterator::IntoEnumIterator;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    Black,
    Red,
}

#[derive(
    Clone, Copy, Eq, Hash, IntoEnumIterator, Ord, PartialEq, PartialOrd, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Suit {
    Spade,
    Heart,
    Diamond,
    Club,
}

/// Foundation order: foundation `i` only ever holds `SUITS[i]`.
pub const SUITS: [Suit; 4] = [Suit::Spade, Suit::Heart, Suit::Diamond, Suit::Club];

impl Suit {
    pub fn color(&self) -> Color {
        match self {
            Suit::Diamond | Suit::Heart => Color::Red,
            Suit::Club | Suit::Spade => Color::Black,
        }
    }

    pub fn symbol(&self) -> char {
        match self {
            Suit::Spade => '♠',
            Suit::Heart => '♥',
            Suit::Diamond => '♦',
            Suit::Club => '♣',
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            '♠' | 'S' | 's' => Some(Suit::Spade),
            '♥' | 'H' | 'h' => Some(Suit::Heart),
            '♦' | 'D' | 'd' => Some(Suit::Diamond),
            '♣' | 'C' | 'c' => Some(Suit::Club),
            _ => None,
        }
    }
}

impl fmt::Debug for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.symbol())
    }
}

#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    IntoEnumIterator,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
    Deserialize,
)]
pub enum Rank {
    #[serde(rename = "A")]
    Ace = 1,
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
}

impl Rank {
    /// Zero-based position within a suit, Ace = 0 through King = 12.
    pub fn index(&self) -> u8 {
        *self as u8 - 1
    }
}

impl From<Rank> for &'static str {
    fn from(rank: Rank) -> Self {
        match rank {
            Rank::Ace => "A",
            Rank::Two => "2",
            Rank::Three => "3",
            Rank::Four => "4",
            Rank::Five => "5",
            Rank::Six => "6",
            Rank::Seven => "7",
            Rank::Eight => "8",
            Rank::Nine => "9",
            Rank::Ten => "10",
            Rank::Jack => "J",
            Rank::Queen => "Q",
            Rank::King => "K",
        }
    }
}

impl FromStr for Rank {
    type Err = Error;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        Rank::into_enum_iter()
            .find(|rank| <&'static str>::from(*rank).eq_ignore_ascii_case(label))
            .ok_or_else(|| anyhow!("unknown card value {:?}", label))
    }
}

#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Card {
    pub suit: Suit,
    pub rank: Rank,
}

impl Card {
    pub const fn new(suit: Suit, rank: Rank) -> Self {
        Self { suit, rank }
    }

    pub fn color(&self) -> Color {
        self.suit.color()
    }

    pub fn is_same_color(&self, other: &Card) -> bool {
        self.suit.color() == other.suit.color()
    }

    pub fn is_one_below(&self, other: &Card) -> bool {
        let delta = other.rank.index() as i32 - self.rank.index() as i32;
        delta == 1
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let rank: &str = self.rank.into();
        f.write_fmt(format_args!("{}{:?}", rank, self.suit))
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for Card {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let suit_char = s
            .chars()
            .last()
            .ok_or_else(|| anyhow!("empty card text"))?;
        let suit =
            Suit::from_char(suit_char).ok_or_else(|| anyhow!("unknown suit in card {:?}", s))?;
        let label: String = s.chars().take(s.chars().count() - 1).collect();
        let rank = label.parse::<Rank>()?;
        Ok(Card { suit, rank })
    }
}

/// The 52 distinct cards, suit-major and rank-ascending.
pub fn make_deck() -> Vec<Card> {
    Suit::into_enum_iter()
        .flat_map(|suit| Rank::into_enum_iter().map(move |rank| Card { suit, rank }))
        .collect()
}

/// Fisher–Yates: walks from the last index down to 1, swapping each slot with a
/// uniformly chosen slot in `[0, i]`.
pub fn shuffle<R: Rng + ?Sized>(deck: &[Card], rng: &mut R) -> Vec<Card> {
    let mut cards = deck.to_vec();
    for i in (1..cards.len()).rev() {
        let j = rng.gen_range(0..=i);
        cards.swap(i, j);
    }
    cards
}

/// A freshly shuffled 52-card deck.
pub fn shuffled_deck<R: Rng + ?Sized>(rng: &mut R) -> Vec<Card> {
    shuffle(&make_deck(), rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hashbrown::HashSet;
    use rand::SeedableRng;

    #[test]
    fn deck_has_every_card_once() {
        let deck = make_deck();
        assert_eq!(deck.len(), 52);
        let unique: HashSet<Card> = deck.iter().copied().collect();
        assert_eq!(unique.len(), 52);
        for suit in Suit::into_enum_iter() {
            assert_eq!(deck.iter().filter(|card| card.suit == suit).count(), 13);
        }
        for rank in Rank::into_enum_iter() {
            assert_eq!(deck.iter().filter(|card| card.rank == rank).count(), 4);
        }
    }

    #[test]
    fn deck_order_is_suit_major() {
        let deck = make_deck();
        assert_eq!(deck[0], Card::new(Suit::Spade, Rank::Ace));
        assert_eq!(deck[12], Card::new(Suit::Spade, Rank::King));
        assert_eq!(deck[13], Card::new(Suit::Heart, Rank::Ace));
        assert_eq!(deck[51], Card::new(Suit::Club, Rank::King));
    }

    #[test]
    fn rank_index_is_zero_based() {
        assert_eq!(Rank::Ace.index(), 0);
        assert_eq!(Rank::Ten.index(), 9);
        assert_eq!(Rank::King.index(), 12);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let deck = make_deck();
        let mut rng = rand_pcg::Pcg32::seed_from_u64(7);
        let mut shuffled = shuffle(&deck, &mut rng);
        assert_ne!(shuffled, deck);
        shuffled.sort();
        let mut sorted = deck.clone();
        sorted.sort();
        assert_eq!(shuffled, sorted);
    }

    #[test]
    fn shuffle_is_repeatable_for_a_seed() {
        let first = shuffled_deck(&mut rand_pcg::Pcg32::seed_from_u64(99));
        let second = shuffled_deck(&mut rand_pcg::Pcg32::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn shuffle_handles_tiny_decks() {
        let mut rng = rand_pcg::Pcg32::seed_from_u64(1);
        assert!(shuffle(&[], &mut rng).is_empty());
        let one = [Card::new(Suit::Club, Rank::Four)];
        assert_eq!(shuffle(&one, &mut rng), one.to_vec());
    }

    #[test]
    fn parses_card_text() {
        assert_eq!(
            "Q♥".parse::<Card>().unwrap(),
            Card::new(Suit::Heart, Rank::Queen)
        );
        assert_eq!(
            "10s".parse::<Card>().unwrap(),
            Card::new(Suit::Spade, Rank::Ten)
        );
        assert_eq!("AD".parse::<Card>().unwrap().to_string(), "A♦");
        assert!("1X".parse::<Card>().is_err());
        assert!("".parse::<Card>().is_err());
    }
}
