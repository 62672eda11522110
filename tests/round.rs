// Round scenarios driven through the public API and the headless clock.

use glam::Vec2;
use proptest::prelude::*;

use rose_catcher::Settings;
use rose_catcher::consts::*;
use rose_catcher::platform::{HeadlessRunner, NullPainter};
use rose_catcher::sim::{
    Difficulty, DifficultyProfile, FallingItem, FrameInput, GameEvent, GameSession, HARD,
    ItemKind, RoundState, Schedule, Viewport, countdown_tick, frame,
};

fn session(seed: u64) -> GameSession {
    GameSession::new(
        Settings::default(),
        Viewport::new(800.0, 600.0).unwrap(),
        seed,
    )
    .unwrap()
}

fn silent_hard(seed: u64) -> GameSession {
    let mut session = session(seed);
    session
        .set_profile(DifficultyProfile {
            spawn_chance: 0.0,
            ..HARD
        })
        .unwrap();
    session
}

/// Rose that lands on the player's center after one update
fn rose_on_player(session: &GameSession) -> FallingItem {
    let mut item = FallingItem::new(ItemKind::Rose, 0.0, ITEM_SIZE, 2.0);
    item.pos = session.player.center() - Vec2::splat(ITEM_SIZE / 2.0) - Vec2::new(0.0, 2.0);
    item
}

#[test]
fn hard_round_without_spawns_is_lost_after_thirty_ticks() {
    let mut runner = HeadlessRunner::new(silent_hard(1));
    runner.start();
    assert_eq!(runner.session.countdown.remaining(), 30);

    let outcome = runner.run_round(31_000.0, &mut NullPainter);

    assert_eq!(outcome, RoundState::LostRound);
    assert_eq!(runner.session.score.value(), 0);
    assert_eq!(runner.session.countdown.remaining(), 0);
    assert!(runner.session.items.is_empty());
    assert!(!runner.frame_task().is_active());
    assert!(!runner.countdown_task().is_active());

    let events = runner.session.drain_events();
    assert_eq!(events.last(), Some(&GameEvent::RoundLost { score: 0 }));
    let ticks = events
        .iter()
        .filter(|e| matches!(e, GameEvent::CountdownChanged { .. }))
        .count();
    // One announcement at start plus thirty ticks
    assert_eq!(ticks, 31);
}

#[test]
fn round_won_regardless_of_remaining_time() {
    let mut session = silent_hard(2);
    let token = session.start_round();

    for caught in 1..=WIN_SCORE {
        session.items.push(rose_on_player(&session));
        let schedule = frame(&mut session, token, &FrameInput::default(), &mut NullPainter);
        assert_eq!(session.score.value(), caught);
        if caught < WIN_SCORE {
            assert_eq!(schedule, Schedule::Continue);
            assert_eq!(session.phase, RoundState::Running);
        } else {
            assert_eq!(schedule, Schedule::Stop);
        }
    }

    assert_eq!(session.phase, RoundState::WonRound);
    assert_eq!(session.countdown.remaining(), 30);
    assert_eq!(countdown_tick(&mut session, token), Schedule::Stop);
    let wins = session
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::RoundWon { .. }))
        .count();
    assert_eq!(wins, 1);
}

#[test]
fn broken_hearts_do_not_end_the_round() {
    let mut session = silent_hard(3);
    let token = session.start_round();

    for _ in 0..5 {
        let mut heart = rose_on_player(&session);
        heart.kind = ItemKind::BrokenHeart;
        session.items.push(heart);
        assert_eq!(
            frame(&mut session, token, &FrameInput::default(), &mut NullPainter),
            Schedule::Continue
        );
    }
    assert_eq!(session.score.value(), 0);
    assert_eq!(session.phase, RoundState::Running);
    assert!(
        !session
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::RoundLost { .. }))
    );
}

#[test]
fn collision_particles_expire_on_their_34th_update() {
    let mut session = silent_hard(4);
    let token = session.start_round();
    session.items.push(rose_on_player(&session));

    // Burst is created and updated once in the catching frame
    frame(&mut session, token, &FrameInput::default(), &mut NullPainter);
    assert_eq!(session.particles.len(), PARTICLE_BURST);

    for _ in 0..32 {
        frame(&mut session, token, &FrameInput::default(), &mut NullPainter);
    }
    assert_eq!(session.particles.len(), PARTICLE_BURST);
    assert!(session.particles.iter().all(|p| p.life == 1));

    frame(&mut session, token, &FrameInput::default(), &mut NullPainter);
    assert!(session.particles.is_empty());
}

#[test]
fn restart_mid_round_keeps_a_single_loop() {
    let mut runner = HeadlessRunner::new(silent_hard(5));
    let first = runner.start();
    runner.advance(2_500.0, &mut NullPainter);
    assert_eq!(runner.session.countdown.remaining(), 28);

    let second = runner.start();
    assert!(!runner.session.is_active(first));
    assert_eq!(runner.session.countdown.remaining(), 30);

    // A late callback from the first round is ignored
    assert_eq!(countdown_tick(&mut runner.session, first), Schedule::Stop);
    assert_eq!(runner.session.countdown.remaining(), 30);

    runner.advance(3_000.0, &mut NullPainter);
    assert!(runner.session.is_active(second));
    assert_eq!(runner.session.countdown.remaining(), 27);
    assert_eq!(runner.session.frame_count, 180);
}

#[test]
fn autopilot_round_always_terminates() {
    let settings = Settings {
        difficulty: Difficulty::Easy,
        ..Settings::default()
    };
    let session = GameSession::new(settings, Viewport::new(800.0, 600.0).unwrap(), 77).unwrap();
    let mut runner = HeadlessRunner::new(session);
    runner.input.autopilot = true;
    runner.start();

    let outcome = runner.run_round(61_000.0, &mut NullPainter);

    assert!(outcome.is_terminal());
    assert!(runner.session.score.value() <= WIN_SCORE);
    if outcome == RoundState::WonRound {
        assert_eq!(runner.session.score.value(), WIN_SCORE);
    } else {
        assert_eq!(runner.session.countdown.remaining(), 0);
    }
}

#[test]
fn same_seed_same_round() {
    let play = || {
        let mut runner = HeadlessRunner::new(session(99));
        runner.input.autopilot = true;
        runner.start();
        runner.advance(10_000.0, &mut NullPainter);
        (
            runner.session.score,
            runner.session.items.clone(),
            runner.session.player.pos,
        )
    };
    assert_eq!(play(), play());
}

proptest! {
    #[test]
    fn player_stays_inside_viewport(pointer in prop::collection::vec(-2000.0f32..3000.0, 1..120)) {
        let mut session = session(6);
        let token = session.start_round();
        for x in pointer {
            let input = FrameInput { pointer_x: Some(x), autopilot: false };
            frame(&mut session, token, &input, &mut NullPainter);
            let max_x = session.viewport.width - session.player.size.x;
            prop_assert!(session.player.pos.x >= 0.0);
            prop_assert!(session.player.pos.x <= max_x);
        }
    }
}
