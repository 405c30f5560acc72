use std::time::Duration;

use crate::catalog::Catalog;
use crate::input_buffer::InputBuffer;
use crate::round::{pick, IndexSource, RoundStats, Verdict};
use crate::TICK_RATE_MS;

/// Length of a timed round
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerSetting {
    #[strum(to_string = "15 seconds")]
    Short,
    #[strum(to_string = "30 seconds")]
    Long,
}

impl TimerSetting {
    pub fn duration(self) -> Duration {
        match self {
            TimerSetting::Short => Duration::from_secs(15),
            TimerSetting::Long => Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimedPhase {
    Running,
    Over,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Menu,
    Timed(TimedPhase),
    Freeform,
}

/// Round requested from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeChoice {
    Timed(TimerSetting),
    Freeform,
}

/// Key input after translation by the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Symbol(char),
    Delete,
    Confirm,
    Cancel,
    SelectMode(ModeChoice),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyAction),
    /// Advance the clock by one tick interval
    Tick,
}

/// Everything the trainer knows about the current session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    pub timer: Option<TimerSetting>,
    pub challenge: Option<String>,
    pub buffer: InputBuffer,
    pub time_remaining: Option<Duration>,
    pub last_result: Option<Verdict>,
    pub stats: RoundStats,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh menu state with zeroed counters
    pub fn new() -> Self {
        Self {
            mode: Mode::Menu,
            timer: None,
            challenge: None,
            buffer: InputBuffer::new(),
            time_remaining: None,
            last_result: None,
            stats: RoundStats::default(),
        }
    }

    pub fn is_started(&self) -> bool {
        !matches!(self.mode, Mode::Menu)
    }

    pub fn is_over(&self) -> bool {
        matches!(self.mode, Mode::Timed(TimedPhase::Over))
    }

    /// True while the buffer accepts orbs and answers can be submitted
    pub fn accepts_input(&self) -> bool {
        matches!(
            self.mode,
            Mode::Timed(TimedPhase::Running) | Mode::Freeform
        )
    }

    pub fn wants_ticks(&self) -> bool {
        matches!(self.mode, Mode::Timed(TimedPhase::Running))
    }
}

/// Outcome of a single transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    /// Keep delivering ticks; false cancels the clock
    pub wants_ticks: bool,
    pub quit: bool,
}

impl Transition {
    fn to(state: SessionState) -> Self {
        let wants_ticks = state.wants_ticks();
        Self {
            state,
            wants_ticks,
            quit: false,
        }
    }

    fn quit(state: SessionState) -> Self {
        Self {
            state,
            wants_ticks: false,
            quit: true,
        }
    }
}

/// Owns the catalog and entropy; state is passed through `apply` by value
#[derive(Debug)]
pub struct Trainer<R: IndexSource> {
    catalog: Catalog,
    source: R,
    tick: Duration,
}

impl<R: IndexSource> Trainer<R> {
    pub fn new(catalog: Catalog, source: R) -> Self {
        Self {
            catalog,
            source,
            tick: Duration::from_millis(TICK_RATE_MS),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick
    }

    /// The single state-transition function. Total over every (mode, event) pair:
    /// anything not meaningful in the current mode returns the state untouched.
    pub fn apply(&mut self, state: SessionState, event: SessionEvent) -> Transition {
        match event {
            SessionEvent::Tick => Transition::to(self.on_tick(state)),
            SessionEvent::Key(action) => match (state.mode, action) {
                (Mode::Menu, KeyAction::Quit) => {
                    tracing::info!("quit from menu");
                    Transition::quit(state)
                }
                (Mode::Menu, KeyAction::SelectMode(choice)) => {
                    Transition::to(self.start_round(choice))
                }
                (Mode::Timed(TimedPhase::Over), KeyAction::Confirm)
                | (Mode::Timed(_), KeyAction::Cancel)
                | (Mode::Freeform, KeyAction::Cancel) => Transition::to(Self::back_to_menu(state)),
                (Mode::Timed(TimedPhase::Running) | Mode::Freeform, action) => {
                    Transition::to(self.on_round_key(state, action))
                }
                _ => Transition::to(state),
            },
        }
    }

    fn start_round(&mut self, choice: ModeChoice) -> SessionState {
        let mut state = SessionState::new();
        match choice {
            ModeChoice::Timed(setting) => {
                state.mode = Mode::Timed(TimedPhase::Running);
                state.timer = Some(setting);
                state.time_remaining = Some(setting.duration());
            }
            ModeChoice::Freeform => state.mode = Mode::Freeform,
        }
        tracing::info!(mode = ?choice, "round started");
        self.next_challenge(state)
    }

    fn back_to_menu(state: SessionState) -> SessionState {
        tracing::info!(
            score = state.stats.score,
            attempts = state.stats.total_attempts,
            "returned to menu"
        );
        SessionState::new()
    }

    /// Picks a uniformly random challenge; repeats are allowed
    pub fn next_challenge(&mut self, mut state: SessionState) -> SessionState {
        let names = self.catalog.names();
        let idx = self.source.next_index(names.len());
        state.challenge = pick(names, idx).map(str::to_string);
        state.buffer.clear();
        state.last_result = None;
        state
    }

    fn on_round_key(&mut self, mut state: SessionState, action: KeyAction) -> SessionState {
        match action {
            KeyAction::Symbol(c) => {
                state.buffer.push_char(c);
                state
            }
            KeyAction::Delete => {
                state.buffer.delete_last();
                state
            }
            KeyAction::Confirm => self.submit(state),
            _ => state,
        }
    }

    /// Evaluates the buffer against the current challenge.
    /// A correct answer advances; a wrong one clears the buffer and keeps the challenge.
    pub fn submit(&mut self, mut state: SessionState) -> SessionState {
        if !state.accepts_input() {
            return state;
        }
        let Some(challenge) = state.challenge.clone() else {
            return state;
        };

        let expected = match self.catalog.combo_for(&challenge) {
            Ok(combo) => *combo,
            Err(err) => {
                tracing::error!(%err, "challenge missing from catalog");
                unreachable!("challenges are only drawn from the catalog: {err}");
            }
        };

        let verdict = Verdict::evaluate(&challenge, &expected, &state.buffer);
        state.stats.record(verdict.outcome);
        tracing::debug!(
            challenge = %challenge,
            entered = %verdict.entered,
            correct = verdict.is_correct(),
            "answer submitted"
        );

        if verdict.is_correct() {
            state = self.next_challenge(state);
        } else {
            state.buffer.clear();
        }
        state.last_result = Some(verdict);
        state
    }

    fn on_tick(&self, mut state: SessionState) -> SessionState {
        if !state.wants_ticks() {
            return state;
        }
        let remaining = state
            .time_remaining
            .unwrap_or_default()
            .saturating_sub(self.tick);
        state.time_remaining = Some(remaining);

        if remaining.is_zero() {
            state.mode = Mode::Timed(TimedPhase::Over);
            tracing::info!(
                score = state.stats.score,
                attempts = state.stats.total_attempts,
                accuracy = state.stats.accuracy(),
                "timed round over"
            );
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::{Outcome, ScriptedSource};
    use assert_matches::assert_matches;

    fn catalog() -> Catalog {
        Catalog::from_entries(
            "test",
            [("Sun Strike", "eee"), ("Tornado", "wwq"), ("Deafening Blast", "qwe")],
        )
        .unwrap()
    }

    fn trainer(indices: Vec<usize>) -> Trainer<ScriptedSource> {
        Trainer::new(catalog(), ScriptedSource::new(indices))
    }

    fn key(action: KeyAction) -> SessionEvent {
        SessionEvent::Key(action)
    }

    fn type_keys<R: IndexSource>(
        trainer: &mut Trainer<R>,
        mut state: SessionState,
        keys: &str,
    ) -> SessionState {
        for c in keys.chars() {
            state = trainer.apply(state, key(KeyAction::Symbol(c))).state;
        }
        state
    }

    #[test]
    fn test_new_state_is_menu() {
        let state = SessionState::new();
        assert_eq!(state.mode, Mode::Menu);
        assert_eq!(state.stats, RoundStats::default());
        assert!(state.challenge.is_none());
        assert!(!state.is_started());
        assert!(!state.is_over());
    }

    #[test]
    fn test_timer_setting_durations() {
        assert_eq!(TimerSetting::Short.duration(), Duration::from_secs(15));
        assert_eq!(TimerSetting::Long.duration(), Duration::from_secs(30));
        assert_eq!(TimerSetting::Short.to_string(), "15 seconds");
        assert_eq!(TimerSetting::Long.to_string(), "30 seconds");
    }

    #[test]
    fn test_select_timed_starts_clock() {
        let mut trainer = trainer(vec![0]);
        let t = trainer.apply(
            SessionState::new(),
            key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Long))),
        );

        assert_eq!(t.state.mode, Mode::Timed(TimedPhase::Running));
        assert_eq!(t.state.timer, Some(TimerSetting::Long));
        assert_eq!(t.state.time_remaining, Some(Duration::from_secs(30)));
        assert_eq!(t.state.challenge.as_deref(), Some("Sun Strike"));
        assert!(t.wants_ticks);
        assert!(!t.quit);
    }

    #[test]
    fn test_select_freeform_has_no_clock() {
        let mut trainer = trainer(vec![1]);
        let t = trainer.apply(
            SessionState::new(),
            key(KeyAction::SelectMode(ModeChoice::Freeform)),
        );

        assert_eq!(t.state.mode, Mode::Freeform);
        assert_eq!(t.state.time_remaining, None);
        assert_eq!(t.state.challenge.as_deref(), Some("Tornado"));
        assert!(!t.wants_ticks);
    }

    #[test]
    fn test_quit_only_from_menu() {
        let mut trainer = trainer(vec![0]);
        let t = trainer.apply(SessionState::new(), key(KeyAction::Quit));
        assert!(t.quit);

        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let t = trainer.apply(state.clone(), key(KeyAction::Quit));
        assert!(!t.quit);
        assert_eq!(t.state, state);
    }

    #[test]
    fn test_correct_answer_advances() {
        let mut trainer = trainer(vec![1, 2]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let state = type_keys(&mut trainer, state, "wwq");
        let state = trainer.apply(state, key(KeyAction::Confirm)).state;

        assert_eq!(state.stats.score, 1);
        assert_eq!(state.stats.correct_answers, 1);
        assert_eq!(state.stats.total_attempts, 1);
        assert_eq!(state.challenge.as_deref(), Some("Deafening Blast"));
        assert!(state.buffer.is_empty());
        assert_matches!(
            state.last_result,
            Some(Verdict { outcome: Outcome::Correct, ref challenge, .. }) if challenge == "Tornado"
        );
    }

    #[test]
    fn test_wrong_answer_retains_challenge() {
        let mut trainer = trainer(vec![2]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        // 'x' is ignored, so the buffer holds "qw"
        let state = type_keys(&mut trainer, state, "qwx");
        assert_eq!(state.buffer.to_string(), "qw");
        let state = trainer.apply(state, key(KeyAction::Confirm)).state;

        assert_eq!(state.stats.score, 0);
        assert_eq!(state.stats.total_attempts, 1);
        assert_eq!(state.challenge.as_deref(), Some("Deafening Blast"));
        assert!(state.buffer.is_empty());
        let verdict = state.last_result.unwrap();
        assert_eq!(verdict.outcome, Outcome::Incorrect);
        assert_eq!(verdict.entered, "qw");
    }

    #[test]
    fn test_empty_submit_counts_as_attempt() {
        let mut trainer = trainer(vec![0]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let state = trainer.apply(state, key(KeyAction::Confirm)).state;
        assert_eq!(state.stats.total_attempts, 1);
        assert_eq!(state.stats.correct_answers, 0);
    }

    #[test]
    fn test_tick_counts_down_and_ends_round() {
        let mut trainer = trainer(vec![0]);
        let mut t = trainer.apply(
            SessionState::new(),
            key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Short))),
        );

        for _ in 0..149 {
            t = trainer.apply(t.state, SessionEvent::Tick);
            assert!(t.wants_ticks);
        }
        assert_eq!(t.state.time_remaining, Some(Duration::from_millis(100)));

        t = trainer.apply(t.state, SessionEvent::Tick);
        assert_eq!(t.state.mode, Mode::Timed(TimedPhase::Over));
        assert_eq!(t.state.time_remaining, Some(Duration::ZERO));
        assert!(!t.wants_ticks);
        assert!(t.state.is_over());

        // stale tick
        let after = trainer.apply(t.state.clone(), SessionEvent::Tick);
        assert_eq!(after.state, t.state);
        assert!(!after.wants_ticks);
    }

    #[test]
    fn test_game_over_freezes_input() {
        let mut trainer = trainer(vec![0]);
        let mut state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Short))),
            )
            .state;
        state = type_keys(&mut trainer, state, "ee");
        state.time_remaining = Some(Duration::from_millis(50));
        state = trainer.apply(state, SessionEvent::Tick).state;
        assert!(state.is_over());

        let frozen = state.clone();
        state = type_keys(&mut trainer, state, "e");
        state = trainer.apply(state, key(KeyAction::Delete)).state;
        assert_eq!(state, frozen);
    }

    #[test]
    fn test_confirm_after_game_over_returns_to_menu() {
        let mut trainer = trainer(vec![0]);
        let mut state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Short))),
            )
            .state;
        state.time_remaining = Some(Duration::from_millis(100));
        state = trainer.apply(state, SessionEvent::Tick).state;
        assert!(state.is_over());

        let t = trainer.apply(state, key(KeyAction::Confirm));
        assert_eq!(t.state, SessionState::new());
        assert!(!t.wants_ticks);
    }

    #[test]
    fn test_cancel_discards_round() {
        let mut trainer = trainer(vec![1]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let state = type_keys(&mut trainer, state, "wwq");
        let state = trainer.apply(state, key(KeyAction::Confirm)).state;
        assert_eq!(state.stats.score, 1);

        let t = trainer.apply(state, key(KeyAction::Cancel));
        assert_eq!(t.state, SessionState::new());
    }

    #[test]
    fn test_round_start_resets_counters() {
        let mut trainer = trainer(vec![1]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let state = type_keys(&mut trainer, state, "wwq");
        let state = trainer.apply(state, key(KeyAction::Confirm)).state;
        let state = trainer.apply(state, key(KeyAction::Cancel)).state;
        let state = trainer
            .apply(
                state,
                key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Short))),
            )
            .state;

        assert_eq!(state.stats, RoundStats::default());
        assert!(state.last_result.is_none());
    }

    #[test]
    fn test_menu_ignores_round_keys() {
        let mut trainer = trainer(vec![0]);
        for action in [
            KeyAction::Symbol('q'),
            KeyAction::Delete,
            KeyAction::Confirm,
            KeyAction::Cancel,
        ] {
            let t = trainer.apply(SessionState::new(), key(action));
            assert_eq!(t.state, SessionState::new());
            assert!(!t.quit);
        }
    }

    #[test]
    fn test_select_mode_ignored_during_round() {
        let mut trainer = trainer(vec![0]);
        let state = trainer
            .apply(
                SessionState::new(),
                key(KeyAction::SelectMode(ModeChoice::Freeform)),
            )
            .state;
        let t = trainer.apply(
            state.clone(),
            key(KeyAction::SelectMode(ModeChoice::Timed(TimerSetting::Long))),
        );
        assert_eq!(t.state, state);
    }
}
