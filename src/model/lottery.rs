use azure_data_cosmos::CosmosEntity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A time-bounded prize draw tied to a shop. The status only ever moves
/// forward (UPCOMING → LIVE → DRAWING → COMPLETED) and the participant count
/// never exceeds `max_participants` when a cap is set.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lottery {
    pub id: String,
    pub shop_id: String,
    #[serde(rename = "type")]
    pub lottery_type: LotteryType,
    pub status: LotteryStatus,
    pub prize_product: Product,
    pub star_cost: u32,
    pub participants: u32,
    pub max_participants: Option<u32>,
    pub end_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quiz_data: Option<Vec<QuizQuestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner_id: Option<String>,
    #[serde(default)]
    pub entrant_ids: Vec<String>,
}

#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq)]
pub enum LotteryType {
    #[serde(rename = "STANDARD")]
    Standard,
    #[serde(rename = "QUIZ")]
    Quiz,
    #[serde(rename = "SCRATCH")]
    Scratch,
}

#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum LotteryStatus {
    #[serde(rename = "UPCOMING")]
    Upcoming,
    #[serde(rename = "LIVE")]
    Live,
    #[serde(rename = "DRAWING")]
    Drawing,
    #[serde(rename = "COMPLETED")]
    Completed,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub inventory: u32,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct LotteryStatusUpdateInfo {
    pub status: LotteryStatus,
}

#[derive(Error, Debug, Copy, Clone, Eq, PartialEq)]
pub enum EntryError {
    #[error("The lottery is not open for entry.")]
    NotOpen,
    #[error("The lottery has reached its maximum number of participants.")]
    Full,
    #[error("The user has already entered this lottery.")]
    AlreadyEntered,
}

impl Lottery {
    /// Records one entry for `user_id`. Rejects entries into non-LIVE or full
    /// lotteries and duplicate entries by the same user.
    pub fn record_entry(&mut self, user_id: &str) -> Result<(), EntryError> {
        if self.status != LotteryStatus::Live {
            return Err(EntryError::NotOpen);
        }

        if self.entrant_ids.iter().any(|id| id == user_id) {
            return Err(EntryError::AlreadyEntered);
        }

        if let Some(max_participants) = self.max_participants {
            if self.participants >= max_participants {
                return Err(EntryError::Full);
            }
        }

        self.entrant_ids.push(user_id.to_string());
        self.participants += 1;
        Ok(())
    }
}

impl LotteryStatus {
    /// Status transitions are monotonic. Forward skips are allowed, any
    /// regression or self-transition is not.
    pub fn can_transition_to(self, next: LotteryStatus) -> bool {
        next > self
    }
}

impl QuizQuestion {
    pub fn is_valid(&self) -> bool {
        self.options.len() >= 2 && self.correct_index < self.options.len()
    }
}

impl CosmosEntity for Lottery {
    type Entity = String;

    fn partition_key(&self) -> Self::Entity {
        self.id.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_lottery(max_participants: Option<u32>) -> Lottery {
        Lottery {
            id: "l1".into(),
            shop_id: "s1".into(),
            lottery_type: LotteryType::Standard,
            status: LotteryStatus::Live,
            prize_product: Product {
                id: "p1".into(),
                name: "Truffle Oil Set".into(),
                description: "Imported from Alba".into(),
                image: "truffle.jpg".into(),
                price: 80.0,
                inventory: 10,
            },
            star_cost: 20,
            participants: 0,
            max_participants,
            end_time: "2026-08-07T12:00:00Z".into(),
            quiz_data: None,
            winner_id: None,
            entrant_ids: vec![],
        }
    }

    #[test]
    fn participant_count_never_exceeds_cap() {
        let mut lottery = live_lottery(Some(3));

        for i in 0..10 {
            let _ = lottery.record_entry(&format!("u{}", i));
            assert!(lottery.participants <= 3);
        }

        assert_eq!(lottery.participants, 3);
        assert_eq!(lottery.entrant_ids.len(), 3);
        assert_eq!(lottery.record_entry("u99"), Err(EntryError::Full));
    }

    #[test]
    fn duplicate_entries_are_rejected() {
        let mut lottery = live_lottery(None);

        assert!(lottery.record_entry("u1").is_ok());
        assert_eq!(lottery.record_entry("u1"), Err(EntryError::AlreadyEntered));
        assert_eq!(lottery.participants, 1);
    }

    #[test]
    fn entry_requires_live_status() {
        let mut lottery = live_lottery(None);
        lottery.status = LotteryStatus::Upcoming;
        assert_eq!(lottery.record_entry("u1"), Err(EntryError::NotOpen));

        lottery.status = LotteryStatus::Completed;
        assert_eq!(lottery.record_entry("u1"), Err(EntryError::NotOpen));
    }

    #[test]
    fn status_transitions_are_monotonic() {
        use LotteryStatus::*;

        assert!(Upcoming.can_transition_to(Live));
        assert!(Live.can_transition_to(Drawing));
        assert!(Drawing.can_transition_to(Completed));
        assert!(Upcoming.can_transition_to(Completed));

        assert!(!Live.can_transition_to(Upcoming));
        assert!(!Completed.can_transition_to(Drawing));
        assert!(!Live.can_transition_to(Live));
    }

    #[test]
    fn lottery_round_trips_through_json_unchanged() {
        let mut lottery = live_lottery(Some(100));
        lottery.lottery_type = LotteryType::Quiz;
        lottery.quiz_data = Some(vec![QuizQuestion {
            id: "q1".into(),
            question: "What is our signature fabric?".into(),
            options: vec!["Cotton".into(), "Silk".into(), "Leather".into()],
            correct_index: 1,
        }]);
        lottery.entrant_ids = vec!["u1".into(), "u2".into()];
        lottery.participants = 2;

        let serialized = serde_json::to_string(&lottery).expect("Failed to serialize lottery.");
        let deserialized =
            serde_json::from_str::<Lottery>(&serialized).expect("Failed to deserialize lottery.");
        assert_eq!(lottery, deserialized);
    }

    #[test]
    fn status_serializes_in_screaming_case() {
        let serialized = serde_json::to_string(&LotteryStatus::Upcoming).unwrap();
        assert_eq!(serialized, "\"UPCOMING\"");
        let serialized = serde_json::to_string(&LotteryType::Scratch).unwrap();
        assert_eq!(serialized, "\"SCRATCH\"");
    }

    #[test]
    fn quiz_question_validity() {
        let mut question = QuizQuestion {
            id: "q1".into(),
            question: "Sample?".into(),
            options: vec!["Yes".into(), "No".into()],
            correct_index: 1,
        };
        assert!(question.is_valid());

        question.correct_index = 2;
        assert!(!question.is_valid());

        question.correct_index = 0;
        question.options.truncate(1);
        assert!(!question.is_valid());
    }
}
