/// Frame timing and scene state machine
///
/// The loop owns the scene state, turns wall-clock timestamps into a clamped
/// time step and applies deferred transitions at the start of a frame, so a
/// state change never lands in the middle of a physics step.
use std::fmt;

use crate::core::config::PhysicsConfig;

/// State of a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneState {
    Running,
    Paused,
    Won,
    Lost,
}

impl SceneState {
    /// Won and lost scenes never run again
    pub fn is_terminal(&self) -> bool {
        matches!(self, SceneState::Won | SceneState::Lost)
    }
}

impl fmt::Display for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SceneState::Running => "running",
            SceneState::Paused => "paused",
            SceneState::Won => "won",
            SceneState::Lost => "lost",
        };
        f.write_str(name)
    }
}

/// Result of a finished scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Won,
    Lost,
}

impl From<Outcome> for SceneState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Won => SceneState::Won,
            Outcome::Lost => SceneState::Lost,
        }
    }
}

/// Transition waiting for the start of the next frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRequest {
    Pause,
    Finish(Outcome),
}

/// A state change applied by the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SceneState,
    pub to: SceneState,
}

/// What the caller should do with the current frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStart {
    /// State change applied before this frame
    pub transition: Option<Transition>,
    /// Seconds to simulate; `None` when the scene is not running
    pub dt: Option<f32>,
}

/// Scene state machine with clamped frame timing
#[derive(Debug)]
pub struct GameLoop {
    state: SceneState,

    /// Deferred transition, consumed by the next `begin_frame`
    pending: Option<TransitionRequest>,

    /// Timestamp of the last simulated frame; `None` restarts timing
    last_update_time: Option<f64>,

    /// Time step of the last simulated frame
    dt: f32,

    /// Largest time step ever handed out
    max_dt: f32,

    /// Frames seen, simulated or not
    frame_count: u64,

    /// Frames that ran the simulation
    update_count: u64,

    frames_since_cleanup: u32,
    cleanup_interval: u32,
}

impl GameLoop {
    /// Create a running loop
    pub fn new(max_dt: f32, cleanup_interval: u32) -> Self {
        Self {
            state: SceneState::Running,
            pending: None,
            last_update_time: None,
            dt: 0.0,
            max_dt,
            frame_count: 0,
            update_count: 0,
            frames_since_cleanup: 0,
            cleanup_interval: cleanup_interval.max(1),
        }
    }

    pub fn from_config(config: &PhysicsConfig) -> Self {
        Self::new(config.max_dt, config.cleanup_interval)
    }

    /// Begin a new frame at `current_time` seconds
    ///
    /// Applies the pending transition first, then computes the time step if
    /// the scene is still running.
    pub fn begin_frame(&mut self, current_time: f64) -> FrameStart {
        self.frame_count += 1;
        let transition = self.apply_pending();

        if self.state != SceneState::Running {
            return FrameStart {
                transition,
                dt: None,
            };
        }

        let dt = match self.last_update_time {
            Some(last) => ((current_time - last) as f32).clamp(0.0, self.max_dt),
            None => 0.0,
        };
        self.last_update_time = Some(current_time);
        self.dt = dt;
        self.update_count += 1;

        FrameStart {
            transition,
            dt: Some(dt),
        }
    }

    /// Finish a simulated frame; returns `true` when housekeeping is due
    pub fn end_frame(&mut self) -> bool {
        self.frames_since_cleanup += 1;
        if self.frames_since_cleanup >= self.cleanup_interval {
            self.frames_since_cleanup = 0;
            return true;
        }
        false
    }

    /// Ask for a pause at the start of the next frame
    pub fn request_pause(&mut self) {
        self.request(TransitionRequest::Pause);
    }

    /// Record the scene result; the state changes at the start of the next frame
    pub fn record_outcome(&mut self, outcome: Outcome) {
        self.request(TransitionRequest::Finish(outcome));
    }

    /// Queue a transition; a recorded outcome is never downgraded to a pause
    pub fn request(&mut self, request: TransitionRequest) {
        if self.state.is_terminal() {
            return;
        }
        match (self.pending, request) {
            (Some(TransitionRequest::Finish(_)), TransitionRequest::Pause) => {}
            _ => self.pending = Some(request),
        }
    }

    /// Leave the paused state; the first frame afterwards has `dt == 0`
    pub fn resume(&mut self) -> Option<Transition> {
        if self.state != SceneState::Paused {
            return None;
        }
        self.last_update_time = None;
        self.dt = 0.0;
        Some(self.set_state(SceneState::Running))
    }

    /// Toggle between paused and running; the pause itself is deferred
    pub fn toggle_pause(&mut self) -> Option<Transition> {
        if self.state == SceneState::Paused {
            self.resume()
        } else {
            self.request_pause();
            None
        }
    }

    fn apply_pending(&mut self) -> Option<Transition> {
        let request = self.pending.take()?;
        match (self.state, request) {
            (SceneState::Won | SceneState::Lost, _) => None,
            (_, TransitionRequest::Finish(outcome)) => Some(self.set_state(outcome.into())),
            (SceneState::Running, TransitionRequest::Pause) => Some(self.set_state(SceneState::Paused)),
            (SceneState::Paused, TransitionRequest::Pause) => None,
        }
    }

    fn set_state(&mut self, to: SceneState) -> Transition {
        let from = self.state;
        self.state = to;
        log::info!("Scene {} -> {}", from, to);
        Transition { from, to }
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn pending(&self) -> Option<TransitionRequest> {
        self.pending
    }

    pub fn is_running(&self) -> bool {
        self.state == SceneState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == SceneState::Paused
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_terminal()
    }

    /// Time step of the last simulated frame (in seconds)
    pub fn dt(&self) -> f32 {
        self.dt
    }

    pub fn max_dt(&self) -> f32 {
        self.max_dt
    }

    /// Get total number of frames seen
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get total number of simulated frames
    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}

impl Default for GameLoop {
    fn default() -> Self {
        Self::from_config(&PhysicsConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const MAX_DT: f32 = 1.0 / 30.0;

    fn game_loop() -> GameLoop {
        GameLoop::new(MAX_DT, 60)
    }

    #[test]
    fn test_game_loop_creation() {
        let game_loop = game_loop();
        assert_eq!(game_loop.state(), SceneState::Running);
        assert_eq!(game_loop.frame_count(), 0);
        assert_eq!(game_loop.update_count(), 0);
        assert!(game_loop.pending().is_none());
    }

    #[test]
    fn test_first_frame_has_zero_dt() {
        let mut game_loop = game_loop();
        let frame = game_loop.begin_frame(12.5);
        assert_eq!(frame.dt, Some(0.0));
        assert!(frame.transition.is_none());
    }

    #[test]
    fn test_dt_is_time_since_last_frame() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(1.0);
        let frame = game_loop.begin_frame(1.0 + 1.0 / 60.0);
        assert_relative_eq!(frame.dt.unwrap(), 1.0 / 60.0, epsilon = 1e-6);
    }

    #[test]
    fn test_dt_clamped_after_long_stall() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(1.0);
        let frame = game_loop.begin_frame(6.0);
        assert_eq!(frame.dt, Some(MAX_DT));
        assert_eq!(game_loop.dt(), MAX_DT);
    }

    #[test]
    fn test_clock_going_backwards_yields_zero() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(5.0);
        assert_eq!(game_loop.begin_frame(4.0).dt, Some(0.0));
    }

    #[test]
    fn test_pause_is_deferred_to_next_frame() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(0.0);

        // Requested mid-frame: the current frame keeps running
        game_loop.request_pause();
        assert!(game_loop.is_running());

        let frame = game_loop.begin_frame(0.016);
        assert_eq!(frame.dt, None);
        assert_eq!(
            frame.transition,
            Some(Transition {
                from: SceneState::Running,
                to: SceneState::Paused
            })
        );
        assert!(game_loop.is_paused());
        assert!(game_loop.pending().is_none());
    }

    #[test]
    fn test_outcome_takes_priority_over_pause() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(0.0);
        game_loop.record_outcome(Outcome::Lost);
        game_loop.request_pause();

        let frame = game_loop.begin_frame(0.016);
        assert_eq!(frame.transition.map(|t| t.to), Some(SceneState::Lost));
        assert!(game_loop.is_game_over());
    }

    #[test]
    fn test_outcome_replaces_pending_pause() {
        let mut game_loop = game_loop();
        game_loop.request_pause();
        game_loop.record_outcome(Outcome::Won);
        game_loop.begin_frame(0.0);
        assert_eq!(game_loop.state(), SceneState::Won);
    }

    #[test]
    fn test_terminal_state_is_final() {
        let mut game_loop = game_loop();
        game_loop.record_outcome(Outcome::Won);
        game_loop.begin_frame(0.0);

        game_loop.record_outcome(Outcome::Lost);
        game_loop.request_pause();
        assert!(game_loop.pending().is_none());
        assert!(game_loop.resume().is_none());

        let frame = game_loop.begin_frame(1.0);
        assert_eq!(frame.dt, None);
        assert_eq!(game_loop.state(), SceneState::Won);
    }

    #[test]
    fn test_outcome_can_end_a_paused_scene() {
        let mut game_loop = game_loop();
        game_loop.request_pause();
        game_loop.begin_frame(0.0);
        game_loop.record_outcome(Outcome::Lost);

        let frame = game_loop.begin_frame(0.1);
        assert_eq!(
            frame.transition,
            Some(Transition {
                from: SceneState::Paused,
                to: SceneState::Lost
            })
        );
    }

    #[test]
    fn test_resume_restarts_with_zero_dt() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(0.0);
        game_loop.request_pause();
        game_loop.begin_frame(0.016);
        assert_eq!(game_loop.begin_frame(10.0).dt, None);

        let transition = game_loop.resume();
        assert_eq!(transition.map(|t| t.to), Some(SceneState::Running));
        assert_eq!(game_loop.begin_frame(30.0).dt, Some(0.0));
        assert_relative_eq!(game_loop.begin_frame(30.01).dt.unwrap(), 0.01, epsilon = 1e-4);
    }

    #[test]
    fn test_toggle_pause() {
        let mut game_loop = game_loop();
        assert!(game_loop.toggle_pause().is_none());
        game_loop.begin_frame(0.0);
        assert!(game_loop.is_paused());

        assert!(game_loop.toggle_pause().is_some());
        assert!(game_loop.is_running());
    }

    #[test]
    fn test_frame_counting() {
        let mut game_loop = game_loop();
        game_loop.begin_frame(0.0);
        game_loop.request_pause();
        game_loop.begin_frame(0.1);
        game_loop.begin_frame(0.2);

        assert_eq!(game_loop.frame_count(), 3);
        assert_eq!(game_loop.update_count(), 1);
    }

    #[test]
    fn test_cleanup_every_interval() {
        let mut game_loop = GameLoop::new(MAX_DT, 3);
        let due: Vec<bool> = (0..7).map(|_| game_loop.end_frame()).collect();
        assert_eq!(due, vec![false, false, true, false, false, true, false]);
    }
}
