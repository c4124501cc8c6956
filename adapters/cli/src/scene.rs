//! Projects session state onto the presentation scene.

use memory_game_core::{Phase, Timestamp};
use memory_game_engine::{query as round, Card};
use memory_game_rendering::{
    display_seconds, menu_buttons, result_buttons, round_buttons, ButtonPresentation, CardFace,
    CardPresentation, HudPresentation, Scene,
};
use memory_game_session::{query, GameSession};

const WIN_BANNER: &str = "You Win!";
const LOSE_BANNER: &str = "You Lose!";

/// Rewrites `scene` so it mirrors the session at `now`.
pub(crate) fn populate(
    scene: &mut Scene,
    session: &GameSession,
    level_buttons: &[ButtonPresentation],
    now: Timestamp,
) {
    let phase = query::phase(session);
    scene.phase = phase;
    scene.cards.clear();
    scene.hud = None;
    scene.paused = false;
    scene.banner = None;

    match phase {
        Phase::Menu => scene.buttons = menu_buttons(),
        Phase::LevelSelect => scene.buttons = level_buttons.to_vec(),
        Phase::Playing => {
            let Some(engine) = query::engine(session) else {
                scene.buttons = round_buttons(false);
                return;
            };
            let paused = round::is_paused(engine);
            scene.paused = paused;
            scene.buttons = round_buttons(paused);
            scene
                .cards
                .extend(round::board(engine).cards().iter().map(present_card));
            scene.hud = Some(HudPresentation {
                level: round::level(engine).level(),
                seconds_remaining: display_seconds(round::time_remaining(engine, now)),
                moves_remaining: round::moves_remaining(engine),
            });
        }
        Phase::Won | Phase::Lost => {
            let banner = if phase == Phase::Won {
                WIN_BANNER
            } else {
                LOSE_BANNER
            };
            scene.banner = Some(banner.to_owned());
            scene.buttons = result_buttons(phase);
        }
    }
}

fn present_card(card: &Card) -> CardPresentation {
    let face = if card.is_matched() {
        CardFace::Matched
    } else if card.is_flipped() {
        CardFace::Revealed
    } else {
        CardFace::Hidden
    };
    CardPresentation {
        slot: card.slot(),
        symbol: card.symbol().clone(),
        area: card.area(),
        face,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_game_core::{Command, LevelCatalog, LevelId, SymbolPool};
    use memory_game_rendering::{fit_board, level_buttons, UiAction};
    use memory_game_session::apply;

    fn session_in_round() -> GameSession {
        let mut session =
            GameSession::new(LevelCatalog::standard(), SymbolPool::standard(), 7).with_layout(fit_board);
        let mut events = Vec::new();
        for command in [
            Command::ConfirmPlay,
            Command::SelectLevel {
                level: LevelId::new(1),
                now: Timestamp::ZERO,
            },
        ] {
            apply(&mut session, command, &mut events).expect("round starts");
        }
        session
    }

    #[test]
    fn menu_shows_play_and_quit() {
        let session = GameSession::new(LevelCatalog::standard(), SymbolPool::standard(), 7);
        let mut scene = Scene::new(Phase::Playing);

        populate(&mut scene, &session, &[], Timestamp::ZERO);

        assert_eq!(scene.phase, Phase::Menu);
        let actions: Vec<_> = scene.buttons.iter().map(|button| button.action).collect();
        assert_eq!(actions, vec![UiAction::Play, UiAction::Quit]);
        assert!(scene.cards.is_empty());
        assert!(scene.hud.is_none());
    }

    #[test]
    fn level_picker_reuses_prepared_buttons() {
        let mut session = GameSession::new(LevelCatalog::standard(), SymbolPool::standard(), 7);
        let mut events = Vec::new();
        apply(&mut session, Command::ConfirmPlay, &mut events).expect("menu accepts play");
        let buttons = level_buttons(6).expect("six levels fit");
        let mut scene = Scene::new(Phase::Menu);

        populate(&mut scene, &session, &buttons, Timestamp::ZERO);

        assert_eq!(scene.phase, Phase::LevelSelect);
        assert_eq!(scene.buttons, buttons);
    }

    #[test]
    fn round_scene_lists_cards_and_hud() {
        let session = session_in_round();
        let mut scene = Scene::new(Phase::Menu);

        populate(&mut scene, &session, &[], Timestamp::from_millis(2_500));

        assert_eq!(scene.phase, Phase::Playing);
        assert_eq!(scene.cards.len(), 4);
        assert!(scene.cards.iter().all(|card| card.face == CardFace::Hidden));
        assert_eq!(
            scene.hud,
            Some(HudPresentation {
                level: LevelId::new(1),
                seconds_remaining: 28,
                moves_remaining: 6,
            })
        );
        assert!(!scene.paused);
    }

    #[test]
    fn flipped_cards_show_their_face() {
        let mut session = session_in_round();
        let mut scene = Scene::new(Phase::Menu);
        populate(&mut scene, &session, &[], Timestamp::ZERO);
        let first = scene.cards[0].area.center();
        let mut events = Vec::new();

        apply(
            &mut session,
            Command::FlipAt {
                point: first,
                now: Timestamp::from_millis(10),
            },
            &mut events,
        )
        .expect("flip is forwarded");
        populate(&mut scene, &session, &[], Timestamp::from_millis(10));

        assert_eq!(scene.cards[0].face, CardFace::Revealed);
        assert!(scene.cards[1..]
            .iter()
            .all(|card| card.face == CardFace::Hidden));
    }

    #[test]
    fn paused_round_offers_resume() {
        let mut session = session_in_round();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Pause {
                now: Timestamp::from_secs(1),
            },
            &mut events,
        )
        .expect("pause is forwarded");
        let mut scene = Scene::new(Phase::Menu);

        populate(&mut scene, &session, &[], Timestamp::from_secs(5));

        assert!(scene.paused);
        assert!(scene
            .buttons
            .iter()
            .any(|button| button.action == UiAction::Resume));
        assert_eq!(scene.hud.map(|hud| hud.seconds_remaining), Some(29));
    }

    #[test]
    fn lost_round_shows_banner_and_retry() {
        let mut session = session_in_round();
        let mut events = Vec::new();
        apply(
            &mut session,
            Command::Tick {
                now: Timestamp::from_secs(31),
            },
            &mut events,
        )
        .expect("tick is forwarded");
        let mut scene = Scene::new(Phase::Playing);

        populate(&mut scene, &session, &[], Timestamp::from_secs(31));

        assert_eq!(scene.phase, Phase::Lost);
        assert_eq!(scene.banner.as_deref(), Some(LOSE_BANNER));
        assert!(scene.cards.is_empty());
        assert_eq!(scene.buttons[0].action, UiAction::TryAgain);
    }
}
