use std::time::Duration;

use memory_game_core::{
    BoardLayout, Command, Event, GridSize, LevelCatalog, LevelDefinition, LevelId, Point,
    RoundOutcome, SymbolPool, Timestamp,
};
use memory_game_engine::{self as engine, query, MatchEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn start(level: &LevelDefinition, seed: u64) -> MatchEngine {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    MatchEngine::start_round(
        level,
        &SymbolPool::standard(),
        &BoardLayout::default(),
        Timestamp::ZERO,
        &mut rng,
    )
    .expect("valid level")
}

fn level_one() -> LevelDefinition {
    LevelCatalog::standard()
        .definition_for(LevelId::new(1))
        .expect("level 1")
}

fn slot_center(engine: &MatchEngine, index: usize) -> Point {
    query::board(engine).cards()[index].area().center()
}

fn flip(engine: &mut MatchEngine, index: usize, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    let point = slot_center(engine, index);
    engine::apply(
        engine,
        Command::FlipAt {
            point,
            now: Timestamp::from_millis(millis),
        },
        &mut events,
    );
    events
}

fn tick(engine: &mut MatchEngine, millis: u64) -> Vec<Event> {
    let mut events = Vec::new();
    engine::apply(
        engine,
        Command::Tick {
            now: Timestamp::from_millis(millis),
        },
        &mut events,
    );
    events
}

fn twin_of(engine: &MatchEngine, index: usize) -> usize {
    let cards = query::board(engine).cards();
    cards
        .iter()
        .enumerate()
        .position(|(other, card)| other != index && card.symbol() == cards[index].symbol())
        .expect("every symbol has a twin")
}

fn stranger_of(engine: &MatchEngine, index: usize) -> usize {
    let cards = query::board(engine).cards();
    cards
        .iter()
        .position(|card| card.symbol() != cards[index].symbol())
        .expect("board holds at least two symbols")
}

#[test]
fn level_one_deals_two_distinct_pairs() {
    let engine = start(&level_one(), 9);
    let board = query::board(&engine);
    let mut symbols: Vec<_> = board.cards().iter().map(|card| card.symbol()).collect();
    symbols.sort();
    symbols.dedup();

    assert_eq!(board.cards().len(), 4);
    assert_eq!(symbols.len(), 2);
}

#[test]
fn level_one_first_pair_resolves_by_identity() {
    for seed in 0..16 {
        let mut engine = start(&level_one(), seed);
        let same = {
            let cards = query::board(&engine).cards();
            cards[0].symbol() == cards[1].symbol()
        };

        let first = flip(&mut engine, 0, 0);
        let second = flip(&mut engine, 1, 100);
        assert_eq!(first.len(), 1);
        assert_eq!(query::moves_remaining(&engine), 5);

        let cards = query::board(&engine).cards();
        if same {
            assert!(matches!(second[1], Event::PairMatched { .. }));
            assert!(cards[0].is_matched() && cards[1].is_matched());
            continue;
        }

        assert!(matches!(second[1], Event::PairMismatched { .. }));
        assert!(cards[0].is_flipped() && cards[1].is_flipped());

        let hidden = tick(&mut engine, 700);
        assert!(matches!(hidden.as_slice(), [Event::CardsHidden { .. }]));
        let cards = query::board(&engine).cards();
        assert!(!cards[0].is_flipped() && !cards[1].is_flipped());
        assert_eq!(query::moves_remaining(&engine), 5);
        assert_eq!(query::round_outcome(&engine), RoundOutcome::InProgress);
    }
}

#[test]
fn clearing_the_board_wins_even_on_the_last_move() {
    let level = LevelDefinition::new(LevelId::new(1), GridSize::new(2, 2), 30, 2);
    let mut engine = start(&level, 3);
    let mut log = Vec::new();

    let first_twin = twin_of(&engine, 0);
    log.extend(flip(&mut engine, 0, 0));
    log.extend(flip(&mut engine, first_twin, 100));

    let remaining: Vec<usize> = (0..4).filter(|i| *i != 0 && *i != first_twin).collect();
    log.extend(flip(&mut engine, remaining[0], 200));
    log.extend(flip(&mut engine, remaining[1], 300));

    assert_eq!(query::moves_remaining(&engine), 0);
    assert_eq!(query::round_outcome(&engine), RoundOutcome::Won);
    assert_eq!(
        log.last(),
        Some(&Event::RoundWon {
            level: LevelId::new(1)
        })
    );
    assert!(!log
        .iter()
        .any(|event| matches!(event, Event::RoundLost { .. })));
    assert!(tick(&mut engine, 400).is_empty());
}

#[test]
fn last_move_mismatch_loses_by_the_next_tick() {
    let level = LevelDefinition::new(LevelId::new(2), GridSize::new(4, 4), 75, 1);
    let mut engine = start(&level, 5);
    let stranger = stranger_of(&engine, 0);

    let _ = flip(&mut engine, 0, 0);
    let _ = flip(&mut engine, stranger, 100);
    let _ = tick(&mut engine, 116);

    assert_eq!(query::moves_remaining(&engine), 0);
    assert_eq!(query::round_outcome(&engine), RoundOutcome::Lost);

    let later = tick(&mut engine, 800);
    assert!(!later
        .iter()
        .any(|event| matches!(event, Event::RoundLost { .. } | Event::RoundWon { .. })));
}

#[test]
fn flips_after_the_round_ended_are_dropped() {
    let level = LevelDefinition::new(LevelId::new(1), GridSize::new(2, 2), 1, 6);
    let mut engine = start(&level, 8);

    let ended = tick(&mut engine, 1_000);
    assert_eq!(
        ended,
        vec![Event::RoundLost {
            level: LevelId::new(1)
        }]
    );

    assert!(flip(&mut engine, 0, 1_100).is_empty());
    let mut events = Vec::new();
    engine::apply(
        &mut engine,
        Command::Pause {
            now: Timestamp::from_millis(1_200),
        },
        &mut events,
    );
    assert!(events.is_empty());
}

#[test]
fn matched_cards_ignore_further_clicks() {
    let mut engine = start(&level_one(), 21);
    let twin = twin_of(&engine, 0);

    let _ = flip(&mut engine, 0, 0);
    let _ = flip(&mut engine, twin, 50);
    let moves = query::moves_remaining(&engine);

    assert!(flip(&mut engine, 0, 100).is_empty());
    assert_eq!(query::moves_remaining(&engine), moves);
    assert_eq!(query::pending_pick(&engine), None);
}

#[test]
fn clicks_between_cards_change_nothing() {
    let mut engine = start(&level_one(), 2);
    let mut events = Vec::new();

    engine::apply(
        &mut engine,
        Command::FlipAt {
            point: Point::new(109.0, 109.0),
            now: Timestamp::from_millis(10),
        },
        &mut events,
    );

    assert!(events.is_empty());
    assert_eq!(query::moves_remaining(&engine), 6);
}

#[test]
fn pausing_stops_the_clock_from_ending_the_round() {
    let mut engine = start(&level_one(), 4);
    let mut events = Vec::new();

    engine::apply(
        &mut engine,
        Command::Pause {
            now: Timestamp::from_secs(10),
        },
        &mut events,
    );
    let _ = tick(&mut engine, 120_000);

    assert_eq!(query::round_outcome(&engine), RoundOutcome::InProgress);
    assert_eq!(
        query::time_remaining(&engine, Timestamp::from_secs(120)),
        Duration::from_secs(20)
    );
}
