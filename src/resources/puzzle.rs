//! Active puzzle session.
//!
//! [`PuzzleSession`] is the state machine of the single live puzzle:
//!
//! ```text
//! Uninitialized -> Generating -> AwaitingInput <-> Retrying -> Completed
//!        ^                                                        |
//!        +---------------------- teardown ------------------------+
//! ```
//!
//! It owns the target, the player's input buffer, the attempt counter and the
//! optional bonus-crystal sub-session. It never touches entities: the systems
//! in [`crate::systems::puzzle`] spawn the scene objects and translate
//! [`SubmitOutcome`]s into feedback.
//!
//! Every generation bumps the session id. Entities and scheduled tasks carry
//! the id they were created for, so anything left over from an earlier
//! session is recognised and ignored.

use crate::components::interactable::{OrbColor, tile_name};
use arrayvec::ArrayVec;
use bevy_ecs::prelude::*;
use log::{debug, info};
use rustc_hash::FxHashSet;
use serde::Serialize;

/// Tokens in a color or pattern target.
pub const SEQUENCE_LENGTH: usize = 5;
/// Digits in a keypad code.
pub const CODE_LENGTH: usize = 4;
/// Crystals spawned for the hidden-object puzzle.
pub const HIDDEN_ITEM_COUNT: usize = 5;
pub const DEFAULT_ATTEMPTS: u8 = 3;
/// Number of pattern tiles.
pub const TILE_COUNT: usize = 4;
const INPUT_CAPACITY: usize = 8;

pub type InputBuffer = ArrayVec<PuzzleToken, INPUT_CAPACITY>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum PuzzleKind {
    Color,
    Number,
    Pattern,
    Hidden,
    #[default]
    None,
}

impl PuzzleKind {
    /// Kinds in room order.
    pub const ROTATION: [PuzzleKind; 4] = [
        PuzzleKind::Color,
        PuzzleKind::Number,
        PuzzleKind::Pattern,
        PuzzleKind::Hidden,
    ];

    /// Round-robin assignment by 1-based room index.
    pub fn for_room(room: u32) -> Self {
        let slot = room.saturating_sub(1) as usize % Self::ROTATION.len();
        Self::ROTATION[slot]
    }

    /// Title of the HUD interaction log for this kind.
    pub fn log_title(self) -> &'static str {
        match self {
            PuzzleKind::Color => "Recent colors",
            PuzzleKind::Number => "Recent numbers",
            PuzzleKind::Pattern => "Recent tiles",
            PuzzleKind::Hidden => "Items found",
            PuzzleKind::None => "",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PuzzlePhase {
    #[default]
    Uninitialized,
    /// Target built; the pattern puzzle stays here until its first replay ends.
    Generating,
    AwaitingInput,
    /// Pattern mismatch; input resumes once the replay ends.
    Retrying,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PuzzleToken {
    Color(OrbColor),
    Digit(u8),
    Tile(usize),
    Item(usize),
}

impl PuzzleToken {
    pub fn label(&self) -> String {
        match self {
            PuzzleToken::Color(color) => color.name().to_string(),
            PuzzleToken::Digit(digit) => digit.to_string(),
            PuzzleToken::Tile(index) => tile_name(*index),
            PuzzleToken::Item(index) => index.to_string(),
        }
    }

    fn fits(&self, kind: PuzzleKind) -> bool {
        matches!(
            (self, kind),
            (PuzzleToken::Color(_), PuzzleKind::Color)
                | (PuzzleToken::Digit(_), PuzzleKind::Number)
                | (PuzzleToken::Tile(_), PuzzleKind::Pattern)
                | (PuzzleToken::Item(_), PuzzleKind::Hidden)
        )
    }
}

/// The four linear relations of the keypad puzzle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MathRelations {
    pub a: u8,
    pub b: u8,
    pub c: u8,
    pub d: u8,
}

impl MathRelations {
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self {
            a: rng.u8(1..=9),
            b: rng.u8(1..=9),
            c: rng.u8(1..=9),
            d: rng.u8(1..=9),
        }
    }

    pub fn digits(&self) -> [u8; CODE_LENGTH] {
        [self.a, self.b, self.c, self.d]
    }

    /// The four-digit answer `abcd`.
    pub fn code(&self) -> u32 {
        digits_to_code(&self.digits())
    }

    pub fn equations(&self) -> [String; 4] {
        let (a, b, c, d) = (
            self.a as i32,
            self.b as i32,
            self.c as i32,
            self.d as i32,
        );
        [
            format!("a + b = {}", a + b),
            format!("2a = {}", 2 * a),
            format!("b + c = {}", b + c),
            format!("c - d = {}", c - d),
        ]
    }
}

fn digits_to_code(digits: &[u8]) -> u32 {
    digits
        .iter()
        .fold(0u32, |acc, digit| acc * 10 + u32::from(*digit))
}

/// How a full keypad entry is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeCheck {
    /// Positional match against the target digits.
    Literal,
    /// The entry, read as a number, must equal `abcd`.
    Math(MathRelations),
}

/// Bonus crystals gating completion of one room's color puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BonusSession {
    pub total: u32,
    pub collected: u32,
    found: FxHashSet<usize>,
}

impl BonusSession {
    fn new(total: u32) -> Self {
        Self {
            total,
            collected: 0,
            found: FxHashSet::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.collected >= self.total
    }
}

/// Result of one submission.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Not accepted: completed, replaying, wrong kind, or an item already taken.
    Ignored,
    /// Stored; the buffer is not full yet.
    Progress { entered: usize, required: usize },
    /// Full-length mismatch. The buffer has been cleared.
    Wrong {
        rejected: InputBuffer,
        attempts_left: u8,
        /// Attempts ran out and were restored to the maximum.
        exhausted: bool,
    },
    ItemFound { found: usize, total: usize },
    /// Base sequence solved; completion now waits on the bonus crystals.
    BonusStarted { total: u32 },
    BonusProgress { collected: u32, total: u32 },
    Completed,
}

#[derive(Resource, Debug, Clone)]
pub struct PuzzleSession {
    id: u64,
    kind: PuzzleKind,
    phase: PuzzlePhase,
    target: Vec<PuzzleToken>,
    player: InputBuffer,
    attempts_remaining: u8,
    max_attempts: u8,
    code: CodeCheck,
    total_items: usize,
    found_items: FxHashSet<usize>,
    bonus_total: Option<u32>,
    bonus: Option<BonusSession>,
    presenting: bool,
}

impl Default for PuzzleSession {
    fn default() -> Self {
        Self::new(DEFAULT_ATTEMPTS)
    }
}

impl PuzzleSession {
    pub fn new(max_attempts: u8) -> Self {
        let max_attempts = max_attempts.max(1);
        Self {
            id: 0,
            kind: PuzzleKind::None,
            phase: PuzzlePhase::Uninitialized,
            target: Vec::new(),
            player: InputBuffer::new(),
            attempts_remaining: max_attempts,
            max_attempts,
            code: CodeCheck::Literal,
            total_items: 0,
            found_items: FxHashSet::default(),
            bonus_total: None,
            bonus: None,
            presenting: false,
        }
    }

    /// Builds a fresh session of `kind`, replacing whatever was live.
    ///
    /// `bonus_total` gates completion of a color puzzle behind that many bonus
    /// crystals. Returns the new session id.
    pub fn generate(
        &mut self,
        kind: PuzzleKind,
        bonus_total: Option<u32>,
        rng: &mut fastrand::Rng,
    ) -> u64 {
        let (target, code) = match kind {
            PuzzleKind::Color => (
                (0..SEQUENCE_LENGTH)
                    .map(|_| PuzzleToken::Color(OrbColor::ALL[rng.usize(..OrbColor::ALL.len())]))
                    .collect(),
                CodeCheck::Literal,
            ),
            PuzzleKind::Number => {
                let math = MathRelations::random(rng);
                (
                    math.digits().iter().map(|d| PuzzleToken::Digit(*d)).collect(),
                    CodeCheck::Math(math),
                )
            }
            PuzzleKind::Pattern => (
                (0..SEQUENCE_LENGTH)
                    .map(|_| PuzzleToken::Tile(rng.usize(..TILE_COUNT)))
                    .collect(),
                CodeCheck::Literal,
            ),
            PuzzleKind::Hidden | PuzzleKind::None => (Vec::new(), CodeCheck::Literal),
        };
        self.install(kind, target, code, bonus_total)
    }

    /// Builds a keypad session checked positionally against `code`.
    pub fn generate_literal_code(&mut self, code: [u8; CODE_LENGTH]) -> u64 {
        let target = code.iter().map(|d| PuzzleToken::Digit(*d % 10)).collect();
        self.install(PuzzleKind::Number, target, CodeCheck::Literal, None)
    }

    fn install(
        &mut self,
        kind: PuzzleKind,
        target: Vec<PuzzleToken>,
        code: CodeCheck,
        bonus_total: Option<u32>,
    ) -> u64 {
        self.teardown();
        self.id += 1;
        self.kind = kind;
        self.target = target;
        self.code = code;
        self.total_items = if kind == PuzzleKind::Hidden {
            HIDDEN_ITEM_COUNT
        } else {
            0
        };
        self.bonus_total = if kind == PuzzleKind::Color {
            bonus_total.filter(|total| *total > 0)
        } else {
            None
        };
        self.phase = match kind {
            PuzzleKind::None => PuzzlePhase::Uninitialized,
            PuzzleKind::Pattern => PuzzlePhase::Generating,
            _ => PuzzlePhase::AwaitingInput,
        };
        info!(
            "puzzle session {} generated: {:?} target [{}]",
            self.id,
            kind,
            self.target_labels().join(", ")
        );
        self.id
    }

    /// Drops all state of the live session. The id counter is kept.
    pub fn teardown(&mut self) {
        self.kind = PuzzleKind::None;
        self.phase = PuzzlePhase::Uninitialized;
        self.target.clear();
        self.player.clear();
        self.attempts_remaining = self.max_attempts;
        self.code = CodeCheck::Literal;
        self.total_items = 0;
        self.found_items.clear();
        self.bonus_total = None;
        self.bonus = None;
        self.presenting = false;
    }

    /// Whether a submitted token would be considered now.
    pub fn accepts_input(&self) -> bool {
        self.phase == PuzzlePhase::AwaitingInput && !self.presenting && self.bonus.is_none()
    }

    /// Submits one token from an interaction.
    pub fn submit(&mut self, token: PuzzleToken) -> SubmitOutcome {
        if !token.fits(self.kind) || !self.accepts_input() {
            debug!(
                "session {} ignored {:?} in phase {:?}",
                self.id, token, self.phase
            );
            return SubmitOutcome::Ignored;
        }
        match token {
            PuzzleToken::Item(index) => self.collect_item(index),
            _ => self.submit_sequence(token),
        }
    }

    fn submit_sequence(&mut self, token: PuzzleToken) -> SubmitOutcome {
        let required = self.target.len();
        // A full buffer is judged right away, then either cleared or closed
        // to further input.
        self.player.push(token);
        if self.player.len() < required {
            return SubmitOutcome::Progress {
                entered: self.player.len(),
                required,
            };
        }
        if self.is_match() {
            return match self.bonus_total {
                Some(total) => {
                    info!("session {} base sequence solved, bonus of {total} crystals", self.id);
                    self.bonus = Some(BonusSession::new(total));
                    SubmitOutcome::BonusStarted { total }
                }
                None => self.complete(),
            };
        }
        let rejected = std::mem::take(&mut self.player);
        self.attempts_remaining = self.attempts_remaining.saturating_sub(1);
        let attempts_left = self.attempts_remaining;
        let exhausted = attempts_left == 0;
        if exhausted {
            self.attempts_remaining = self.max_attempts;
        }
        if self.kind == PuzzleKind::Pattern {
            self.phase = PuzzlePhase::Retrying;
        }
        debug!(
            "session {} rejected [{}], {} attempts left",
            self.id,
            rejected
                .iter()
                .map(PuzzleToken::label)
                .collect::<Vec<_>>()
                .join(", "),
            attempts_left
        );
        SubmitOutcome::Wrong {
            rejected,
            attempts_left,
            exhausted,
        }
    }

    fn is_match(&self) -> bool {
        match self.code {
            CodeCheck::Math(math) if self.kind == PuzzleKind::Number => {
                let digits: Vec<u8> = self
                    .player
                    .iter()
                    .filter_map(|token| match token {
                        PuzzleToken::Digit(d) => Some(*d),
                        _ => None,
                    })
                    .collect();
                digits.len() == CODE_LENGTH && digits_to_code(&digits) == math.code()
            }
            _ => self.player.as_slice() == self.target.as_slice(),
        }
    }

    fn collect_item(&mut self, index: usize) -> SubmitOutcome {
        if index >= self.total_items || !self.found_items.insert(index) {
            return SubmitOutcome::Ignored;
        }
        // Never exceeds total_items: each index is accepted once.
        let _ = self.player.try_push(PuzzleToken::Item(index));
        let found = self.found_items.len();
        if found >= self.total_items {
            return self.complete();
        }
        SubmitOutcome::ItemFound {
            found,
            total: self.total_items,
        }
    }

    /// Collects a bonus crystal. Each index counts once.
    pub fn collect_bonus(&mut self, index: usize) -> SubmitOutcome {
        if self.phase != PuzzlePhase::AwaitingInput {
            return SubmitOutcome::Ignored;
        }
        let Some(bonus) = self.bonus.as_mut() else {
            return SubmitOutcome::Ignored;
        };
        if index >= bonus.total as usize || !bonus.found.insert(index) {
            return SubmitOutcome::Ignored;
        }
        bonus.collected += 1;
        let (collected, total) = (bonus.collected, bonus.total);
        if bonus.is_complete() {
            return self.complete();
        }
        SubmitOutcome::BonusProgress { collected, total }
    }

    fn complete(&mut self) -> SubmitOutcome {
        self.phase = PuzzlePhase::Completed;
        self.presenting = false;
        info!("puzzle session {} completed", self.id);
        SubmitOutcome::Completed
    }

    /// Claims the pattern replay for session `id`.
    ///
    /// False when the id is stale, the session is not a pattern puzzle, a
    /// replay is already running, or input is already open.
    pub fn begin_presentation(&mut self, id: u64) -> bool {
        if id != self.id
            || self.kind != PuzzleKind::Pattern
            || self.presenting
            || !matches!(self.phase, PuzzlePhase::Generating | PuzzlePhase::Retrying)
        {
            return false;
        }
        self.presenting = true;
        true
    }

    /// Ends the pattern replay and opens input.
    pub fn finish_presentation(&mut self, id: u64) -> bool {
        if id != self.id || !self.presenting {
            return false;
        }
        self.presenting = false;
        if matches!(self.phase, PuzzlePhase::Generating | PuzzlePhase::Retrying) {
            self.phase = PuzzlePhase::AwaitingInput;
        }
        true
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn kind(&self) -> PuzzleKind {
        self.kind
    }

    pub fn phase(&self) -> PuzzlePhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == PuzzlePhase::Completed
    }

    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    pub fn target(&self) -> &[PuzzleToken] {
        &self.target
    }

    pub fn player_sequence(&self) -> &[PuzzleToken] {
        &self.player
    }

    pub fn attempts_remaining(&self) -> u8 {
        self.attempts_remaining
    }

    pub fn max_attempts(&self) -> u8 {
        self.max_attempts
    }

    pub fn math(&self) -> Option<MathRelations> {
        match self.code {
            CodeCheck::Math(math) => Some(math),
            CodeCheck::Literal => None,
        }
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    pub fn found_items(&self) -> usize {
        self.found_items.len()
    }

    pub fn is_item_found(&self, index: usize) -> bool {
        self.found_items.contains(&index)
    }

    pub fn bonus(&self) -> Option<&BonusSession> {
        self.bonus.as_ref()
    }

    pub fn target_labels(&self) -> Vec<String> {
        self.target.iter().map(PuzzleToken::label).collect()
    }

    pub fn player_labels(&self) -> Vec<String> {
        self.player.iter().map(PuzzleToken::label).collect()
    }

    /// Text printed on the in-room answer board.
    pub fn answer_text(&self) -> String {
        match self.kind {
            PuzzleKind::Color => {
                let names = self.target_labels();
                let line = names.join(" → ");
                if line.chars().count() > 35 {
                    let half = names.len().div_ceil(2);
                    format!(
                        "COLOR ORDER:\n{}\n{}",
                        names[..half].join(" → "),
                        names[half..].join(" → ")
                    )
                } else {
                    format!("COLOR ORDER:\n{line}")
                }
            }
            PuzzleKind::Number => match self.code {
                CodeCheck::Math(math) => format!(
                    "{}\n\nSolve for a, b, c, d\nThen enter: abcd",
                    math.equations().join("\n")
                ),
                CodeCheck::Literal => format!("CODE:\n{}", self.target_labels().join("")),
            },
            PuzzleKind::Pattern => format!("PATTERN:\n{}", self.target_labels().join(" → ")),
            PuzzleKind::Hidden => "CRYSTALS: ALL VISIBLE IN ROOM".to_string(),
            PuzzleKind::None => String::new(),
        }
    }

    /// Instructions shown on the HUD when the puzzle appears.
    pub fn intro_message(&self) -> Option<(String, u32)> {
        let message = match self.kind {
            PuzzleKind::Color => (
                format!(
                    "🎨 COLOR PUZZLE: Touch the orbs in order: {}",
                    self.target_labels().join(" → ")
                ),
                8000,
            ),
            PuzzleKind::Number => (
                "🧮 MATH PUZZLE: Solve the equations to find a, b, c, d. Then enter the 4-digit code (abcd)"
                    .to_string(),
                12000,
            ),
            PuzzleKind::Pattern => (
                "🧩 PATTERN PUZZLE: Watch the tiles light up, then touch them in the correct order!"
                    .to_string(),
                8000,
            ),
            PuzzleKind::Hidden => (
                format!(
                    "🔍 FIND CRYSTALS: Collect all {} golden crystals visible in the room!",
                    self.total_items
                ),
                10000,
            ),
            PuzzleKind::None => return None,
        };
        Some(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_session(kind: PuzzleKind, seed: u64) -> PuzzleSession {
        let mut session = PuzzleSession::default();
        let mut rng = fastrand::Rng::with_seed(seed);
        session.generate(kind, None, &mut rng);
        session
    }

    fn wrong_color(token: PuzzleToken) -> PuzzleToken {
        match token {
            PuzzleToken::Color(OrbColor::Red) => PuzzleToken::Color(OrbColor::Blue),
            _ => PuzzleToken::Color(OrbColor::Red),
        }
    }

    #[test]
    fn rotation_wraps_by_room() {
        assert_eq!(PuzzleKind::for_room(1), PuzzleKind::Color);
        assert_eq!(PuzzleKind::for_room(2), PuzzleKind::Number);
        assert_eq!(PuzzleKind::for_room(3), PuzzleKind::Pattern);
        assert_eq!(PuzzleKind::for_room(4), PuzzleKind::Hidden);
        assert_eq!(PuzzleKind::for_room(5), PuzzleKind::Color);
        assert_eq!(PuzzleKind::for_room(0), PuzzleKind::Color);
    }

    #[test]
    fn color_target_has_five_tokens() {
        let session = make_session(PuzzleKind::Color, 1);
        assert_eq!(session.target().len(), SEQUENCE_LENGTH);
        assert_eq!(session.phase(), PuzzlePhase::AwaitingInput);
        assert_eq!(session.id(), 1);
    }

    #[test]
    fn color_exact_sequence_completes_once() {
        let mut session = make_session(PuzzleKind::Color, 2);
        let target = session.target().to_vec();
        for (i, token) in target.iter().enumerate() {
            let outcome = session.submit(*token);
            if i + 1 < target.len() {
                assert_eq!(
                    outcome,
                    SubmitOutcome::Progress {
                        entered: i + 1,
                        required: SEQUENCE_LENGTH
                    }
                );
            } else {
                assert_eq!(outcome, SubmitOutcome::Completed);
            }
        }
        assert!(session.is_completed());
        assert_eq!(session.submit(target[0]), SubmitOutcome::Ignored);
    }

    #[test]
    fn color_wrong_full_entry_costs_one_attempt_and_clears() {
        let mut session = make_session(PuzzleKind::Color, 3);
        let target = session.target().to_vec();
        for token in &target[..SEQUENCE_LENGTH - 1] {
            session.submit(*token);
        }
        let outcome = session.submit(wrong_color(target[SEQUENCE_LENGTH - 1]));
        match outcome {
            SubmitOutcome::Wrong {
                attempts_left,
                exhausted,
                rejected,
            } => {
                assert_eq!(attempts_left, 2);
                assert!(!exhausted);
                assert_eq!(rejected.len(), SEQUENCE_LENGTH);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(session.player_sequence().is_empty());
        assert_eq!(session.attempts_remaining(), 2);
    }

    #[test]
    fn player_sequence_never_exceeds_target() {
        let mut session = make_session(PuzzleKind::Color, 4);
        let target = session.target().to_vec();
        for i in 0..23 {
            let token = if i % 3 == 0 {
                wrong_color(target[0])
            } else {
                target[i % SEQUENCE_LENGTH]
            };
            session.submit(token);
            assert!(session.player_sequence().len() <= session.target().len());
            assert!(session.attempts_remaining() <= DEFAULT_ATTEMPTS);
        }
    }

    #[test]
    fn number_math_code_completes() {
        let mut session = make_session(PuzzleKind::Number, 5);
        let math = session.math().unwrap();
        for digit in math.digits() {
            session.submit(PuzzleToken::Digit(digit));
        }
        assert!(session.is_completed());
    }

    #[test]
    fn three_wrong_codes_restore_attempts() {
        let mut session = make_session(PuzzleKind::Number, 6);
        let math = session.math().unwrap();
        let wrong = [0u8, 0, 0, 0];
        assert_ne!(digits_to_code(&wrong), math.code());
        let mut last = SubmitOutcome::Ignored;
        for _ in 0..3 {
            for digit in wrong {
                last = session.submit(PuzzleToken::Digit(digit));
            }
        }
        assert_eq!(
            last,
            SubmitOutcome::Wrong {
                rejected: wrong.iter().map(|d| PuzzleToken::Digit(*d)).collect(),
                attempts_left: 0,
                exhausted: true,
            }
        );
        assert_eq!(session.attempts_remaining(), DEFAULT_ATTEMPTS);
        assert!(!session.is_completed());
        assert!(session.accepts_input());
    }

    #[test]
    fn literal_code_matches_positionally() {
        let mut session = PuzzleSession::default();
        session.generate_literal_code([4, 0, 7, 1]);
        for digit in [4, 0, 7, 1] {
            session.submit(PuzzleToken::Digit(digit));
        }
        assert!(session.is_completed());
        assert!(session.math().is_none());
    }

    #[test]
    fn equations_describe_digits() {
        let math = MathRelations {
            a: 3,
            b: 4,
            c: 2,
            d: 7,
        };
        assert_eq!(math.code(), 3427);
        let eqs = math.equations();
        assert_eq!(eqs[0], "a + b = 7");
        assert_eq!(eqs[1], "2a = 6");
        assert_eq!(eqs[2], "b + c = 6");
        assert_eq!(eqs[3], "c - d = -5");
    }

    #[test]
    fn pattern_waits_for_presentation() {
        let mut session = make_session(PuzzleKind::Pattern, 7);
        let target = session.target().to_vec();
        assert_eq!(session.phase(), PuzzlePhase::Generating);
        assert_eq!(session.submit(target[0]), SubmitOutcome::Ignored);

        let id = session.id();
        assert!(session.begin_presentation(id));
        assert!(!session.begin_presentation(id));
        assert_eq!(session.submit(target[0]), SubmitOutcome::Ignored);
        assert!(session.finish_presentation(id));
        assert_eq!(session.phase(), PuzzlePhase::AwaitingInput);

        for token in &target {
            session.submit(*token);
        }
        assert!(session.is_completed());
    }

    #[test]
    fn pattern_mismatch_enters_retry() {
        let mut session = make_session(PuzzleKind::Pattern, 8);
        let id = session.id();
        session.begin_presentation(id);
        session.finish_presentation(id);
        let target = session.target().to_vec();
        for token in &target[..SEQUENCE_LENGTH - 1] {
            session.submit(*token);
        }
        let PuzzleToken::Tile(last) = target[SEQUENCE_LENGTH - 1] else {
            panic!("pattern target holds tiles");
        };
        let outcome = session.submit(PuzzleToken::Tile((last + 1) % TILE_COUNT));
        assert!(matches!(outcome, SubmitOutcome::Wrong { .. }));
        assert_eq!(session.phase(), PuzzlePhase::Retrying);
        assert!(!session.accepts_input());
        assert!(session.begin_presentation(id));
        assert!(session.finish_presentation(id));
        assert!(session.accepts_input());
    }

    #[test]
    fn stale_presentation_is_rejected() {
        let mut session = make_session(PuzzleKind::Pattern, 9);
        let old = session.id();
        let mut rng = fastrand::Rng::with_seed(10);
        session.generate(PuzzleKind::Pattern, None, &mut rng);
        assert!(!session.begin_presentation(old));
        assert!(session.begin_presentation(old + 1));
    }

    #[test]
    fn hidden_items_complete_in_any_order() {
        let mut session = make_session(PuzzleKind::Hidden, 11);
        for (n, index) in [3usize, 0, 4, 1].iter().enumerate() {
            assert_eq!(
                session.submit(PuzzleToken::Item(*index)),
                SubmitOutcome::ItemFound {
                    found: n + 1,
                    total: HIDDEN_ITEM_COUNT
                }
            );
        }
        assert_eq!(session.submit(PuzzleToken::Item(3)), SubmitOutcome::Ignored);
        assert_eq!(session.submit(PuzzleToken::Item(2)), SubmitOutcome::Completed);
        assert!(session.player_sequence().len() <= session.total_items());
    }

    #[test]
    fn bonus_room_defers_completion() {
        let mut session = PuzzleSession::default();
        let mut rng = fastrand::Rng::with_seed(12);
        session.generate(PuzzleKind::Color, Some(3), &mut rng);
        let target = session.target().to_vec();
        let mut last = SubmitOutcome::Ignored;
        for token in &target {
            last = session.submit(*token);
        }
        assert_eq!(last, SubmitOutcome::BonusStarted { total: 3 });
        assert!(!session.is_completed());
        assert_eq!(session.submit(target[0]), SubmitOutcome::Ignored);

        assert_eq!(
            session.collect_bonus(0),
            SubmitOutcome::BonusProgress {
                collected: 1,
                total: 3
            }
        );
        assert_eq!(session.collect_bonus(0), SubmitOutcome::Ignored);
        session.collect_bonus(2);
        assert_eq!(session.collect_bonus(1), SubmitOutcome::Completed);
        assert!(session.is_completed());
        assert_eq!(session.bonus().unwrap().collected, 3);
    }

    #[test]
    fn bonus_without_session_is_ignored() {
        let mut session = make_session(PuzzleKind::Color, 13);
        assert_eq!(session.collect_bonus(0), SubmitOutcome::Ignored);
    }

    #[test]
    fn wrong_kind_token_is_ignored() {
        let mut session = make_session(PuzzleKind::Number, 14);
        assert_eq!(
            session.submit(PuzzleToken::Color(OrbColor::Red)),
            SubmitOutcome::Ignored
        );
        assert!(session.player_sequence().is_empty());
    }

    #[test]
    fn regeneration_replaces_session() {
        let mut session = make_session(PuzzleKind::Color, 15);
        let target = session.target().to_vec();
        session.submit(target[0]);
        let mut rng = fastrand::Rng::with_seed(16);
        let id = session.generate(PuzzleKind::Color, None, &mut rng);
        assert_eq!(id, 2);
        assert!(session.player_sequence().is_empty());
        assert_eq!(session.attempts_remaining(), DEFAULT_ATTEMPTS);
    }

    #[test]
    fn teardown_returns_to_uninitialized() {
        let mut session = make_session(PuzzleKind::Hidden, 17);
        session.teardown();
        assert_eq!(session.phase(), PuzzlePhase::Uninitialized);
        assert_eq!(session.kind(), PuzzleKind::None);
        assert_eq!(session.id(), 1);
    }

    #[test]
    fn long_color_answer_wraps() {
        let mut session = PuzzleSession::default();
        session.kind = PuzzleKind::Color;
        session.target = vec![PuzzleToken::Color(OrbColor::Yellow); SEQUENCE_LENGTH];
        let text = session.answer_text();
        assert_eq!(text.lines().count(), 3);
        assert!(text.starts_with("COLOR ORDER:"));
    }
}
