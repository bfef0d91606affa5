use crate::model::game::outcome::OutcomeResolver;
use crate::model::game::scratch::ScratchCard;
use crate::model::lottery::{Lottery, LotteryType};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use time::OffsetDateTime;
use uuid::Uuid;

pub mod outcome;
pub mod scratch;

/// How long a revealed scratch card stays on screen before the session
/// advances to its result.
pub const RESULT_DISPLAY_DELAY: time::Duration = time::Duration::seconds(1);

/// One customer's single pass through a lottery's interaction flow.
///
/// Phases move `info` → `playing` → `result` and never back; `result` is
/// terminal, the only exit discards the whole session. Nothing here is
/// persisted.
#[derive(Debug, Clone)]
pub struct PlaySession {
    pub id: String,
    pub user_id: String,
    pub lottery: Lottery,
    pub phase: SessionPhase,
    pub scratch: Option<ScratchCard>,
    pub quiz: Option<QuizProgress>,
    pub outcome: Option<bool>,
    revealed_at: Option<OffsetDateTime>,
}

#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SessionPhase {
    Info,
    Playing,
    Result,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct QuizProgress {
    pub current_index: usize,
    pub correct_count: u32,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum SessionError {
    #[error("The session has already been entered.")]
    AlreadyEntered,
    #[error("The session is not in its play phase.")]
    NotPlaying,
    #[error("The session is not a scratch session.")]
    NotScratchSession,
    #[error("The session is not a quiz session.")]
    NotQuizSession,
    #[error("The lottery carries no quiz questions.")]
    NoQuizData,
    #[error("The selected option does not exist.")]
    InvalidOption,
}

impl PlaySession {
    pub fn new(user_id: String, lottery: Lottery) -> Self {
        PlaySession {
            id: Uuid::new_v4().to_string(),
            user_id,
            lottery,
            phase: SessionPhase::Info,
            scratch: None,
            quiz: None,
            outcome: None,
            revealed_at: None,
        }
    }

    /// The customer's enter action: `info` → `playing`. Standard draws have
    /// no play phase, their entry lands directly in `result`.
    pub fn enter(&mut self) -> Result<(), SessionError> {
        if self.phase != SessionPhase::Info {
            return Err(SessionError::AlreadyEntered);
        }

        match self.lottery.lottery_type {
            LotteryType::Standard => {
                self.phase = SessionPhase::Result;
            }
            LotteryType::Scratch => {
                self.scratch = Some(ScratchCard::new());
                self.phase = SessionPhase::Playing;
            }
            LotteryType::Quiz => {
                let has_questions = self
                    .lottery
                    .quiz_data
                    .as_ref()
                    .map(|questions| !questions.is_empty())
                    .unwrap_or(false);
                if !has_questions {
                    return Err(SessionError::NoQuizData);
                }
                self.quiz = Some(QuizProgress::default());
                self.phase = SessionPhase::Playing;
            }
        }
        Ok(())
    }

    pub fn scratch_press(&mut self) -> Result<(), SessionError> {
        self.scratch_card()?.press();
        Ok(())
    }

    pub fn scratch_release(&mut self) -> Result<(), SessionError> {
        self.scratch_card()?.release();
        Ok(())
    }

    /// One scratch movement. When the movement triggers the reveal, the
    /// outcome is drawn and returned; every other movement returns None. A
    /// session that has already revealed stays inert.
    pub fn scratch_move(
        &mut self,
        x: f32,
        y: f32,
        resolver: &mut dyn OutcomeResolver,
        now: OffsetDateTime,
    ) -> Result<Option<bool>, SessionError> {
        let card = self.scratch_card()?;
        if !card.move_to(x, y) {
            return Ok(None);
        }

        let won = resolver.resolve();
        self.outcome = Some(won);
        self.revealed_at = Some(now);
        Ok(Some(won))
    }

    /// Answering any option ends the quiz immediately, right or wrong; the
    /// correctness tally is still recorded. Whether a quiz should require
    /// correct answers is an open product question (see DESIGN.md).
    pub fn answer(&mut self, option_index: usize) -> Result<bool, SessionError> {
        if self.phase != SessionPhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        let progress = self.quiz.ok_or(SessionError::NotQuizSession)?;

        let question = self
            .lottery
            .quiz_data
            .as_ref()
            .and_then(|questions| questions.get(progress.current_index))
            .ok_or(SessionError::NoQuizData)?;
        if option_index >= question.options.len() {
            return Err(SessionError::InvalidOption);
        }

        let correct = option_index == question.correct_index;
        if let Some(progress) = self.quiz.as_mut() {
            progress.current_index += 1;
            if correct {
                progress.correct_count += 1;
            }
        }
        self.phase = SessionPhase::Result;
        Ok(correct)
    }

    /// Moves a revealed scratch session into `result` once the display delay
    /// has elapsed. Returns whether the phase changed.
    pub fn advance_after_reveal(&mut self, now: OffsetDateTime) -> bool {
        if self.phase != SessionPhase::Playing {
            return false;
        }
        match self.revealed_at {
            Some(revealed_at) if now - revealed_at >= RESULT_DISPLAY_DELAY => {
                self.phase = SessionPhase::Result;
                true
            }
            _ => false,
        }
    }

    pub fn cleared_fraction(&self) -> Option<f32> {
        self.scratch.as_ref().map(|card| card.cleared_fraction())
    }

    fn scratch_card(&mut self) -> Result<&mut ScratchCard, SessionError> {
        if self.phase != SessionPhase::Playing {
            return Err(SessionError::NotPlaying);
        }
        self.scratch.as_mut().ok_or(SessionError::NotScratchSession)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::lottery::{LotteryStatus, Product, QuizQuestion};

    struct FixedOutcome(bool);

    impl OutcomeResolver for FixedOutcome {
        fn resolve(&mut self) -> bool {
            self.0
        }
    }

    fn lottery(lottery_type: LotteryType) -> Lottery {
        Lottery {
            id: "l1".into(),
            shop_id: "s2".into(),
            lottery_type,
            status: LotteryStatus::Live,
            prize_product: Product {
                id: "p5".into(),
                name: "Truffle Oil Set".into(),
                description: "Imported from Alba".into(),
                image: "truffle.jpg".into(),
                price: 80.0,
                inventory: 10,
            },
            star_cost: 20,
            participants: 45,
            max_participants: Some(100),
            end_time: "2026-08-07T12:00:00Z".into(),
            quiz_data: None,
            winner_id: None,
            entrant_ids: vec![],
        }
    }

    fn quiz_lottery() -> Lottery {
        let mut lottery = lottery(LotteryType::Quiz);
        lottery.quiz_data = Some(vec![
            QuizQuestion {
                id: "q1".into(),
                question: "What year was Maison established?".into(),
                options: vec!["1990".into(), "2005".into(), "1889".into(), "2020".into()],
                correct_index: 1,
            },
            QuizQuestion {
                id: "q2".into(),
                question: "What is our signature fabric?".into(),
                options: vec!["Cotton".into(), "Silk".into(), "Leather".into()],
                correct_index: 1,
            },
        ]);
        lottery
    }

    fn reveal_by_scratching(session: &mut PlaySession, resolver: &mut dyn OutcomeResolver) -> u32 {
        let now = OffsetDateTime::UNIX_EPOCH;
        let mut reveal_count = 0;
        session.scratch_press().unwrap();
        // Sweep disjoint bands until well over 40% of the surface is cleared.
        for y in [20.0, 60.0, 100.0, 140.0] {
            let mut x = 0.0_f32;
            while x <= 300.0 {
                if session.scratch_move(x, y, resolver, now).unwrap().is_some() {
                    reveal_count += 1;
                }
                x += 5.0;
            }
        }
        session.scratch_release().unwrap();
        reveal_count
    }

    #[test]
    fn standard_entry_is_immediate() {
        let mut session = PlaySession::new("u1".into(), lottery(LotteryType::Standard));
        assert_eq!(session.phase, SessionPhase::Info);

        session.enter().unwrap();
        assert_eq!(session.phase, SessionPhase::Result);
        assert_eq!(session.enter(), Err(SessionError::AlreadyEntered));
    }

    #[test]
    fn scratch_session_reveals_once_then_advances_after_delay() {
        let mut session = PlaySession::new("u1".into(), lottery(LotteryType::Scratch));
        session.enter().unwrap();
        assert_eq!(session.phase, SessionPhase::Playing);

        let mut resolver = FixedOutcome(true);
        let reveal_count = reveal_by_scratching(&mut session, &mut resolver);
        assert_eq!(reveal_count, 1);
        assert_eq!(session.outcome, Some(true));
        assert!(session.cleared_fraction().unwrap() > 0.4);

        // Still showing the revealed card inside the display delay.
        let revealed_at = OffsetDateTime::UNIX_EPOCH;
        assert!(!session.advance_after_reveal(revealed_at + time::Duration::milliseconds(999)));
        assert_eq!(session.phase, SessionPhase::Playing);

        assert!(session.advance_after_reveal(revealed_at + time::Duration::seconds(1)));
        assert_eq!(session.phase, SessionPhase::Result);

        assert!(!session.advance_after_reveal(revealed_at + time::Duration::seconds(2)));
    }

    #[test]
    fn scratch_session_without_reveal_never_advances() {
        let mut session = PlaySession::new("u1".into(), lottery(LotteryType::Scratch));
        session.enter().unwrap();

        let mut resolver = FixedOutcome(false);
        let now = OffsetDateTime::UNIX_EPOCH;
        session.scratch_press().unwrap();
        session.scratch_move(150.0, 75.0, &mut resolver, now).unwrap();

        assert!(!session.advance_after_reveal(now + time::Duration::minutes(5)));
        assert_eq!(session.phase, SessionPhase::Playing);
        assert_eq!(session.outcome, None);
    }

    #[test]
    fn scratching_requires_the_play_phase() {
        let mut session = PlaySession::new("u1".into(), lottery(LotteryType::Scratch));
        assert_eq!(session.scratch_press(), Err(SessionError::NotPlaying));

        let mut quiz_session = PlaySession::new("u1".into(), quiz_lottery());
        quiz_session.enter().unwrap();
        assert_eq!(
            quiz_session.scratch_press(),
            Err(SessionError::NotScratchSession)
        );
    }

    #[test]
    fn any_quiz_answer_ends_the_session() {
        // Two questions, deliberately wrong answer on the first one: the
        // session still moves straight to its result.
        let mut session = PlaySession::new("u1".into(), quiz_lottery());
        session.enter().unwrap();
        assert_eq!(session.phase, SessionPhase::Playing);

        let correct = session.answer(0).unwrap();
        assert!(!correct);
        assert_eq!(session.phase, SessionPhase::Result);

        let progress = session.quiz.unwrap();
        assert_eq!(progress.current_index, 1);
        assert_eq!(progress.correct_count, 0);

        assert_eq!(session.answer(1), Err(SessionError::NotPlaying));
    }

    #[test]
    fn correct_quiz_answer_is_tallied() {
        let mut session = PlaySession::new("u1".into(), quiz_lottery());
        session.enter().unwrap();

        let correct = session.answer(1).unwrap();
        assert!(correct);
        assert_eq!(session.quiz.unwrap().correct_count, 1);
        assert_eq!(session.phase, SessionPhase::Result);
    }

    #[test]
    fn invalid_quiz_option_is_rejected() {
        let mut session = PlaySession::new("u1".into(), quiz_lottery());
        session.enter().unwrap();

        assert_eq!(session.answer(17), Err(SessionError::InvalidOption));
        assert_eq!(session.phase, SessionPhase::Playing);
    }

    #[test]
    fn quiz_without_questions_cannot_be_entered() {
        let mut session = PlaySession::new("u1".into(), lottery(LotteryType::Quiz));
        assert_eq!(session.enter(), Err(SessionError::NoQuizData));
        assert_eq!(session.phase, SessionPhase::Info);
    }
}
