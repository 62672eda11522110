//! Simulated-clock driver for native runs and tests
//!
//! Frames fire at a fixed display rate and the countdown every 1000 ms on
//! the same virtual timeline, in timestamp order.

use glam::Vec2;

use crate::consts::COUNTDOWN_INTERVAL_MS;
use crate::sim::{
    FrameInput, GameSession, Painter, RoundState, RoundToken, Rgba, Schedule, countdown_tick,
    frame,
};

/// Accumulated frame intervals drift; anything this close counts as due
const CLOCK_EPSILON_MS: f64 = 1e-6;

/// Painter that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPainter;

impl Painter for NullPainter {
    fn clear(&mut self) {}
    fn fill_circle(&mut self, _center: Vec2, _radius: f32, _color: Rgba) {}
    fn fill_ellipse(&mut self, _center: Vec2, _radii: Vec2, _rotation: f32, _color: Rgba) {}
}

/// A scheduled, repeating task on the virtual clock
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    next_due_ms: Option<f64>,
    interval_ms: f64,
}

impl Task {
    fn idle(interval_ms: f64) -> Self {
        Self {
            next_due_ms: None,
            interval_ms,
        }
    }

    fn schedule(&mut self, now_ms: f64) {
        self.next_due_ms = Some(now_ms + self.interval_ms);
    }

    /// Stop the task; cancelling an idle task is a no-op
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// Due time if it falls at or before `limit_ms` (within float drift)
    fn due_by(&self, limit_ms: f64) -> Option<f64> {
        self.next_due_ms.filter(|due| *due <= limit_ms + CLOCK_EPSILON_MS)
    }
}

/// Owns a session and its two round tasks
pub struct HeadlessRunner {
    pub session: GameSession,
    /// Input applied to every frame
    pub input: FrameInput,
    now_ms: f64,
    frame_task: Task,
    countdown_task: Task,
    token: Option<RoundToken>,
}

impl HeadlessRunner {
    pub fn new(session: GameSession) -> Self {
        let frame_ms = 1000.0 / session.settings().frame_rate as f64;
        Self {
            session,
            input: FrameInput::default(),
            now_ms: 0.0,
            frame_task: Task::idle(frame_ms),
            countdown_task: Task::idle(COUNTDOWN_INTERVAL_MS as f64),
            token: None,
        }
    }

    #[inline]
    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    pub fn frame_task(&self) -> &Task {
        &self.frame_task
    }

    pub fn countdown_task(&self) -> &Task {
        &self.countdown_task
    }

    /// Token of the round the tasks were last started for
    pub fn token(&self) -> Option<RoundToken> {
        self.token
    }

    /// Start a round, cancelling whatever the previous one left running
    pub fn start(&mut self) -> RoundToken {
        self.cancel_tasks();
        let token = if self.session.phase == RoundState::NotStarted {
            self.session.start_round()
        } else {
            self.session.restart()
        };
        self.frame_task.schedule(self.now_ms);
        self.countdown_task.schedule(self.now_ms);
        self.token = Some(token);
        token
    }

    /// Stop both tasks and the round; safe to call repeatedly
    pub fn cancel(&mut self) {
        self.cancel_tasks();
        self.session.cancel_round();
    }

    fn cancel_tasks(&mut self) {
        self.frame_task.cancel();
        self.countdown_task.cancel();
    }

    /// Advance the virtual clock by `ms`, firing due callbacks in time order
    pub fn advance(&mut self, ms: f64, painter: &mut dyn Painter) {
        let target = self.now_ms + ms;

        while let Some(token) = self.token {
            let next_frame = self.frame_task.due_by(target);
            let next_countdown = self.countdown_task.due_by(target);

            let run_frame = match (next_frame, next_countdown) {
                (Some(f), Some(c)) => f <= c,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };

            let schedule = if run_frame {
                self.now_ms = next_frame.unwrap_or(target);
                self.frame_task.schedule(self.now_ms);
                frame(&mut self.session, token, &self.input, painter)
            } else {
                self.now_ms = next_countdown.unwrap_or(target);
                self.countdown_task.schedule(self.now_ms);
                countdown_tick(&mut self.session, token)
            };

            // Either task stopping means the round is over
            if schedule == Schedule::Stop {
                self.cancel_tasks();
            }
        }

        self.now_ms = target;
    }

    /// Run until the round ends or `limit_ms` of virtual time passes
    pub fn run_round(&mut self, limit_ms: f64, painter: &mut dyn Painter) -> RoundState {
        let step = self.frame_task.interval_ms;
        let deadline = self.now_ms + limit_ms;
        while self.frame_task.is_active() && self.now_ms < deadline {
            self.advance(step.min(deadline - self.now_ms), painter);
        }
        self.session.phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::{DifficultyProfile, HARD, Viewport};

    fn runner() -> HeadlessRunner {
        let mut session = GameSession::new(
            Settings::default(),
            Viewport::new(800.0, 600.0).unwrap(),
            1,
        )
        .unwrap();
        session
            .set_profile(DifficultyProfile {
                spawn_chance: 0.0,
                ..HARD
            })
            .unwrap();
        HeadlessRunner::new(session)
    }

    #[test]
    fn test_task_cancel_is_idempotent() {
        let mut task = Task::idle(10.0);
        task.cancel();
        assert!(!task.is_active());
        task.schedule(0.0);
        assert!(task.is_active());
        task.cancel();
        task.cancel();
        assert!(!task.is_active());
    }

    #[test]
    fn test_frames_and_countdown_interleave() {
        let mut runner = runner();
        runner.start();
        runner.advance(1000.0, &mut NullPainter);
        assert_eq!(runner.session.frame_count, 60);
        assert_eq!(runner.session.countdown.remaining(), 29);
    }

    #[test]
    fn test_restart_leaves_one_live_round() {
        let mut runner = runner();
        let first = runner.start();
        runner.advance(500.0, &mut NullPainter);
        let second = runner.start();
        assert_ne!(first, second);
        assert!(!runner.session.is_active(first));
        assert_eq!(runner.session.frame_count, 0);

        runner.advance(1000.0, &mut NullPainter);
        assert_eq!(runner.session.frame_count, 60);
        assert_eq!(runner.session.countdown.remaining(), 29);
    }

    #[test]
    fn test_cancel_stops_everything() {
        let mut runner = runner();
        runner.start();
        runner.cancel();
        runner.cancel();
        assert!(!runner.frame_task().is_active());
        assert!(!runner.countdown_task().is_active());
        runner.advance(5000.0, &mut NullPainter);
        assert_eq!(runner.session.frame_count, 0);
        assert_eq!(runner.session.phase, RoundState::NotStarted);
    }
}
