use memory_game_core::{
    BoardLayout, Command, Event, LevelCatalog, LevelId, Point, SymbolKey, SymbolPool, Timestamp,
};
use memory_game_engine::{self as engine, query, MatchEngine};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

#[test]
fn deterministic_replay_reproduces_events_and_board() {
    let first = replay(7);
    let second = replay(7);

    assert_eq!(first, second, "replay diverged between runs");
    assert!(!first.events.is_empty());
}

#[test]
fn different_seeds_deal_different_boards() {
    let deals: Vec<Vec<SymbolKey>> = (0..4).map(|seed| replay(seed).symbols).collect();

    assert!(deals.windows(2).any(|pair| pair[0] != pair[1]));
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    symbols: Vec<SymbolKey>,
    events: Vec<Event>,
    moves_remaining: u32,
}

fn replay(seed: u64) -> ReplayOutcome {
    let level = LevelCatalog::standard()
        .definition_for(LevelId::new(3))
        .expect("level 3");
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut engine = MatchEngine::start_round(
        &level,
        &SymbolPool::standard(),
        &BoardLayout::default(),
        Timestamp::ZERO,
        &mut rng,
    )
    .expect("valid level");

    let symbols = query::board(&engine)
        .cards()
        .iter()
        .map(|card| card.symbol().clone())
        .collect();

    let mut events = Vec::new();
    for command in scripted_commands(&engine) {
        engine::apply(&mut engine, command, &mut events);
    }

    ReplayOutcome {
        symbols,
        events,
        moves_remaining: query::moves_remaining(&engine),
    }
}

fn scripted_commands(engine: &MatchEngine) -> Vec<Command> {
    let centers: Vec<Point> = query::board(engine)
        .cards()
        .iter()
        .map(|card| card.area().center())
        .collect();

    let mut commands = Vec::new();
    let mut millis = 0;
    for pair in centers.chunks(2).take(10) {
        for point in pair {
            millis += 250;
            commands.push(Command::FlipAt {
                point: *point,
                now: Timestamp::from_millis(millis),
            });
        }
        millis += 700;
        commands.push(Command::Tick {
            now: Timestamp::from_millis(millis),
        });
    }
    commands.push(Command::Pause {
        now: Timestamp::from_millis(millis + 10),
    });
    commands.push(Command::Resume {
        now: Timestamp::from_millis(millis + 5_000),
    });
    commands
}
