//! Per-frame game loop and countdown tick
//!
//! Both entry points take the `RoundToken` their scheduler was started with
//! and do nothing once that round has been cancelled or has finished. The
//! returned `Schedule` tells the scheduler whether to keep going.

use super::collision::check_contact;
use super::entity::{Entity, ItemKind, Painter, emit_burst};
use super::state::{GameEvent, GameSession, RoundState, RoundToken};

/// Input gathered since the previous frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Latest pointer/touch x in viewport pixels
    pub pointer_x: Option<f32>,
    /// Demo mode: steer automatically when there is no pointer input
    pub autopilot: bool,
}

/// Whether the scheduler should run the callback again
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    Continue,
    Stop,
}

/// Run one frame: clear, player, spawn, items (with collisions), particles
pub fn frame(
    session: &mut GameSession,
    token: RoundToken,
    input: &FrameInput,
    painter: &mut dyn Painter,
) -> Schedule {
    if !session.is_active(token) {
        return Schedule::Stop;
    }

    painter.clear();
    session.frame_count += 1;
    let viewport = session.viewport;

    // Player
    if let Some(x) = input.pointer_x {
        session.pointer_moved(x);
    } else if input.autopilot {
        match autopilot_target(session) {
            Some(target) => session.player.steer_toward(target),
            None => session.player.dx = 0.0,
        }
    }
    session.player.update(&viewport);
    session.player.draw(painter);

    // Spawn
    if let Some(item) =
        session
            .spawner
            .maybe_spawn(&mut session.rng, &session.profile, &viewport)
    {
        session.items.push(item);
    }

    // Items: each one moves, draws and resolves exactly once
    let burst = session.settings.particle_burst;
    let mut i = 0;
    while i < session.items.len() {
        let item = &mut session.items[i];
        item.update(&viewport);
        item.draw(painter);

        let contact = check_contact(item, &session.player, &viewport);
        if !contact.removes_item() {
            i += 1;
            continue;
        }

        let item = session.items.remove(i);
        if let Some(color) = contact.burst_color() {
            session.score.apply(contact.score_delta());
            emit_burst(&mut session.rng, &mut session.particles, item.pos, color, burst);
            session.push_event(GameEvent::ScoreChanged {
                score: session.score.value(),
            });

            if item.kind == ItemKind::Rose && session.score.has_won() {
                session.finish(RoundState::WonRound);
                return Schedule::Stop;
            }
        }
    }

    // Particles
    for particle in session.particles.iter_mut() {
        particle.update(&viewport);
        particle.draw(painter);
    }
    session.particles.retain(|p| !p.is_dead());

    Schedule::Continue
}

/// One second elapsed on the round countdown
pub fn countdown_tick(session: &mut GameSession, token: RoundToken) -> Schedule {
    if !session.is_active(token) {
        return Schedule::Stop;
    }

    let expired = session.countdown.tick();
    session.push_event(GameEvent::CountdownChanged {
        remaining: session.countdown.remaining(),
    });

    if expired {
        session.finish(RoundState::LostRound);
        return Schedule::Stop;
    }
    Schedule::Continue
}

/// Animate leftover particles (confetti) after a round has ended
pub fn celebration_frame(session: &mut GameSession, painter: &mut dyn Painter) -> Schedule {
    if session.phase == RoundState::Running {
        return Schedule::Stop;
    }

    painter.clear();
    let viewport = session.viewport;
    for particle in session.particles.iter_mut() {
        particle.update(&viewport);
        particle.draw(painter);
    }
    session.particles.retain(|p| !p.is_dead());

    if session.particles.is_empty() {
        Schedule::Stop
    } else {
        Schedule::Continue
    }
}

/// Pick an x to steer toward: dodge an incoming broken heart, otherwise
/// chase the lowest rose still above the player
fn autopilot_target(session: &GameSession) -> Option<f32> {
    let player = &session.player;
    let center = player.center();
    let reach = player.radius() + session.spawner.item_size;

    let threat = session
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::BrokenHeart)
        .filter(|item| {
            let above = player.pos.y - item.pos.y;
            (0.0..150.0).contains(&above) && (item.center().x - center.x).abs() < reach
        })
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));

    if let Some(threat) = threat {
        let away = if threat.center().x > center.x { -1.0 } else { 1.0 };
        return Some(center.x + away * reach * 2.0);
    }

    session
        .items
        .iter()
        .filter(|item| item.kind == ItemKind::Rose && item.pos.y < player.pos.y + player.size.y)
        .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        .map(|rose| rose.center().x)
}
