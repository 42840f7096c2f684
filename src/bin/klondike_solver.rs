use anyhow::{anyhow, Error};
use argh::FromArgs;
use klondike_engine::{Command, DrawMode, Game, Play, Session, Settings, Source};
use rayon::prelude::*;
use std::{fs, ops::Range};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// Plays greedy Klondike games and reports how many are won.
struct Args {
    /// seed of the first deal
    #[argh(option, default = "1")]
    seed: u64,

    /// number of consecutive seeds to play
    #[argh(option, default = "1")]
    games: u64,

    /// turn three cards from the stock at a time
    #[argh(switch)]
    draw_three: bool,

    /// path to a JSON settings file
    #[argh(option)]
    settings: Option<String>,

    /// give up on a game after this many plays
    #[argh(option, default = "2000")]
    max_plays: usize,

    /// log every play
    #[argh(switch, short = 'v')]
    verbose: bool,
}

#[derive(Debug, Clone, Copy)]
struct Outcome {
    seed: u64,
    won: bool,
    moves: u32,
    foundation_cards: usize,
}

/// Lower is better. `None` means the greedy player never makes this play.
fn rank_play(game: &Game, play: &Play) -> Option<u8> {
    match play {
        Play::MoveCards {
            source: Source::Foundation { .. },
            ..
        } => None,
        _ if play.is_to_foundation() => Some(0),
        Play::Flip { .. } => Some(1),
        Play::MoveCards {
            source: Source::Tableau { pile, index },
            ..
        } => {
            let tableau = &game.tableaux[*pile];
            if *index > 0 && *index == tableau.first_face_up_index() {
                Some(2)
            } else {
                None
            }
        }
        Play::MoveCards { .. } => Some(3),
        Play::Draw => Some(4),
    }
}

fn choose_play(game: &Game) -> Option<Play> {
    game.legal_plays()
        .into_iter()
        .filter_map(|play| rank_play(game, &play).map(|rank| (rank, play)))
        .min_by_key(|(rank, _)| *rank)
        .map(|(_, play)| play)
}

fn play_out(settings: &Settings, seed: u64, max_plays: usize) -> Result<Outcome, Error> {
    let mut session = Session::new(settings.clone(), seed);
    let mut draws_without_progress = 0;
    for _ in 0..max_plays {
        if session.auto_complete_delay().is_some() {
            session.on_auto_complete_timer();
            continue;
        }
        let game = session.game();
        let cards_in_circulation = game.stock.len() + game.waste.len();
        let play = match choose_play(game) {
            Some(play) => play,
            None => break,
        };
        if play.is_draw() {
            draws_without_progress += 1;
            if draws_without_progress > cards_in_circulation + 1 {
                break;
            }
        } else {
            draws_without_progress = 0;
        }
        debug!(seed, ?play, "playing");
        session.dispatch(Command::from(play))?;
        if session.game().won {
            break;
        }
    }
    let game = session.game();
    Ok(Outcome {
        seed,
        won: game.won,
        moves: game.moves,
        foundation_cards: game.cards_in_foundations(),
    })
}

fn load_settings(args: &Args) -> Result<Settings, Error> {
    let mut settings = match &args.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .map_err(|err| anyhow!("cannot read settings from {}: {}", path, err))?;
            Settings::from_json(&json)?
        }
        None => Settings::default(),
    };
    if args.draw_three {
        settings.draw_mode = DrawMode::Three;
    }
    Ok(settings)
}

/// Seeds `seed..seed + games`, clamped at `u64::MAX`.
fn seed_range(seed: u64, games: u64) -> Range<u64> {
    seed..seed.saturating_add(games)
}

fn main() -> Result<(), Error> {
    let args: Args = argh::from_env();
    let default_level = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let settings = load_settings(&args)?;
    info!(?settings, seed = args.seed, games = args.games, "starting");

    let outcomes = seed_range(args.seed, args.games)
        .into_par_iter()
        .map(|seed| play_out(&settings, seed, args.max_plays))
        .collect::<Result<Vec<_>, Error>>()?;

    for outcome in &outcomes {
        println!(
            "seed {:>6}: {} in {} moves, {} cards home",
            outcome.seed,
            if outcome.won { "won " } else { "lost" },
            outcome.moves,
            outcome.foundation_cards
        );
    }
    let wins = outcomes.iter().filter(|outcome| outcome.won).count();
    println!("won {} of {} games", wins, outcomes.len());
    Ok(())
}
