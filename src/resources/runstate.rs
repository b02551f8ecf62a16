//! Run-wide state shared by the flow controller, the puzzle dispatch and the
//! interaction router.
//!
//! All mutation goes through named methods (`collect_key`,
//! `mark_puzzle_solved`, `begin_transition`...) so the invariants live here:
//! the door condition, the transition guard and the countdown rules.
use crate::resources::puzzle::PuzzleKind;
use bevy_ecs::prelude::*;
use serde::Serialize;

/// Per-round countdown parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRules {
    pub base_seconds: u32,
    pub per_round_penalty: u32,
    pub minimum_seconds: u32,
}

impl Default for TimerRules {
    fn default() -> Self {
        Self {
            base_seconds: 90,
            per_round_penalty: 5,
            minimum_seconds: 60,
        }
    }
}

impl TimerRules {
    /// Seconds granted for `round`, never below the minimum.
    pub fn seconds_for_round(&self, round: u32) -> u32 {
        self.base_seconds
            .saturating_sub(round.saturating_mul(self.per_round_penalty))
            .max(self.minimum_seconds)
    }
}

/// Read-only view of the run for HUD rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSnapshot {
    pub room: u32,
    pub total_rooms: u32,
    pub round: u32,
    pub keys_collected: u32,
    pub keys_required: u32,
    pub time_remaining: u32,
    pub game_started: bool,
    pub game_over: bool,
    pub victory: bool,
    pub puzzle_solved: bool,
    pub puzzle_kind: PuzzleKind,
    pub paused: bool,
    pub transition_pending: bool,
    pub play_time: f32,
}

#[derive(Resource, Debug, Clone)]
pub struct RunState {
    current_room: u32,
    current_round: u32,
    keys_collected: u32,
    keys_required: u32,
    time_remaining: u32,
    second_accumulator: f32,
    game_started: bool,
    game_over: bool,
    victory: bool,
    puzzle_solved: bool,
    puzzle_kind: PuzzleKind,
    paused: bool,
    transition_pending: bool,
    play_time: f32,
    rooms_completed: u32,
    rules: TimerRules,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new(TimerRules::default())
    }
}

impl RunState {
    pub fn new(rules: TimerRules) -> Self {
        Self {
            current_room: 1,
            current_round: 1,
            keys_collected: 0,
            keys_required: 1,
            time_remaining: rules.seconds_for_round(1),
            second_accumulator: 0.0,
            game_started: false,
            game_over: false,
            victory: false,
            puzzle_solved: false,
            puzzle_kind: PuzzleKind::None,
            paused: false,
            transition_pending: false,
            play_time: 0.0,
            rooms_completed: 0,
            rules,
        }
    }

    /// Starts a fresh run in `room`. Rooms before it count as completed.
    pub fn start(&mut self, room: u32) {
        let rules = self.rules;
        *self = Self::new(rules);
        self.current_room = room.max(1);
        self.rooms_completed = self.current_room - 1;
        self.game_started = true;
    }

    /// Back to room 1 with everything reset.
    pub fn restart(&mut self) {
        self.start(1);
    }

    /// Resets the per-room counters for the current round.
    pub fn reset_round(&mut self) {
        self.keys_collected = 0;
        self.keys_required = 1;
        self.time_remaining = self.rules.seconds_for_round(self.current_round);
        self.second_accumulator = 0.0;
        self.game_over = false;
        self.puzzle_solved = false;
    }

    /// Advances to the next room and resets its per-room state.
    pub fn next_room(&mut self) {
        self.current_room += 1;
        self.current_round = 1;
        self.rooms_completed += 1;
        self.reset_round();
    }

    pub fn collect_key(&mut self) -> u32 {
        self.keys_collected += 1;
        self.keys_collected
    }

    pub fn mark_puzzle_solved(&mut self) {
        self.puzzle_solved = true;
    }

    pub fn set_puzzle_kind(&mut self, kind: PuzzleKind) {
        self.puzzle_kind = kind;
    }

    /// Keys still missing for the door.
    pub fn keys_missing(&self) -> u32 {
        self.keys_required.saturating_sub(self.keys_collected)
    }

    /// The door may open only once every key is held and the puzzle is solved.
    pub fn door_unlockable(&self) -> bool {
        self.keys_collected >= self.keys_required && self.puzzle_solved
    }

    /// A completed room stops its countdown.
    pub fn room_completed(&self) -> bool {
        self.door_unlockable()
    }

    /// Started and not yet ended by timeout, capture or victory.
    pub fn is_active(&self) -> bool {
        self.game_started && !self.game_over && !self.victory
    }

    /// Whether targeting and interaction run this frame.
    pub fn is_interactive(&self) -> bool {
        self.is_active() && !self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Advances the countdown by `delta` seconds.
    ///
    /// Whole seconds are removed as they accumulate. Returns true on the
    /// tick that reaches zero.
    pub fn tick_countdown(&mut self, delta: f32) -> bool {
        if !self.is_interactive() {
            return false;
        }
        self.play_time += delta;
        if self.room_completed() {
            return false;
        }
        self.second_accumulator += delta;
        while self.second_accumulator >= 1.0 && self.time_remaining > 0 {
            self.second_accumulator -= 1.0;
            self.time_remaining -= 1;
        }
        self.time_remaining == 0
    }

    /// Claims the room transition. False when one is already in flight.
    pub fn begin_transition(&mut self) -> bool {
        if self.transition_pending || !self.is_active() {
            return false;
        }
        self.transition_pending = true;
        true
    }

    pub fn end_transition(&mut self) {
        self.transition_pending = false;
    }

    pub fn set_game_over(&mut self) {
        self.game_over = true;
        self.transition_pending = false;
    }

    pub fn set_victory(&mut self) {
        self.victory = true;
        self.rooms_completed = self.current_room;
        self.transition_pending = false;
    }

    pub fn current_room(&self) -> u32 {
        self.current_room
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn keys_collected(&self) -> u32 {
        self.keys_collected
    }

    pub fn keys_required(&self) -> u32 {
        self.keys_required
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn game_started(&self) -> bool {
        self.game_started
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn victory(&self) -> bool {
        self.victory
    }

    pub fn puzzle_solved(&self) -> bool {
        self.puzzle_solved
    }

    pub fn puzzle_kind(&self) -> PuzzleKind {
        self.puzzle_kind
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn transition_pending(&self) -> bool {
        self.transition_pending
    }

    pub fn play_time(&self) -> f32 {
        self.play_time
    }

    pub fn rooms_completed(&self) -> u32 {
        self.rooms_completed
    }

    pub fn snapshot(&self, total_rooms: u32) -> RunSnapshot {
        RunSnapshot {
            room: self.current_room,
            total_rooms,
            round: self.current_round,
            keys_collected: self.keys_collected,
            keys_required: self.keys_required,
            time_remaining: self.time_remaining,
            game_started: self.game_started,
            game_over: self.game_over,
            victory: self.victory,
            puzzle_solved: self.puzzle_solved,
            puzzle_kind: self.puzzle_kind,
            paused: self.paused,
            transition_pending: self.transition_pending,
            play_time: self.play_time,
        }
    }
}
