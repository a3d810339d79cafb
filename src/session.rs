//! Player sessions and question sequences.
//!
//! A session is a named piece of per-player transient state that rides on
//! the player record (so it survives save/load). Question sequences use a
//! well-known session slot: while one is active, the resolver routes raw
//! input here instead of the command tables, so the player answers
//! questions instead of issuing commands.

use log::debug;

use crate::types::{Player, Question, QuestionSequence, QuestionType, Session, SessionPayload};
use crate::world::Engine;

/// Session slot holding the player's in-flight question sequence.
pub const CURRENT_QUESTION_SEQUENCE: &str = "current_question_sequence";

/// Validate an answer against a question's data type, returning the
/// normalized value to record.
fn validate_answer(question: &Question, input: &str) -> Option<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    match question.data_type {
        QuestionType::String => Some(trimmed.to_string()),
        QuestionType::Number => trimmed.parse::<f64>().ok().map(|_| trimmed.to_string()),
        QuestionType::Boolean => match trimmed.to_lowercase().as_str() {
            "yes" | "true" => Some("true".to_string()),
            "no" | "false" => Some("false".to_string()),
            _ => None,
        },
    }
}

impl Engine {
    /// Store a session on the player, replacing any session with the same
    /// name.
    pub fn add_session(&mut self, player: &mut Player, name: &str, payload: SessionPayload) {
        player
            .sessions
            .retain(|s| !s.name.eq_ignore_ascii_case(name));
        player.sessions.push(Session {
            name: name.to_string(),
            payload,
        });
    }

    pub fn get_session<'a>(&self, player: &'a Player, name: &str) -> Option<&'a Session> {
        player
            .sessions
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn remove_session(&mut self, player: &mut Player, name: &str) {
        player
            .sessions
            .retain(|s| !s.name.eq_ignore_ascii_case(name));
    }

    /// Begin a question sequence for the player and return the first
    /// question. Any sequence already in flight is replaced.
    pub fn start_question_sequence(
        &mut self,
        player: &mut Player,
        sequence: QuestionSequence,
    ) -> String {
        let first = sequence
            .questions
            .first()
            .map(|q| q.question.clone())
            .unwrap_or_else(|| "There are no questions to answer.".to_string());
        if sequence.questions.is_empty() {
            return first;
        }
        debug!("{} started question sequence {}", player.name, sequence.name);
        self.add_session(
            player,
            CURRENT_QUESTION_SEQUENCE,
            SessionPayload::Questions(sequence),
        );
        first
    }

    pub fn has_active_question_sequence(&self, player: &Player) -> bool {
        self.get_session(player, CURRENT_QUESTION_SEQUENCE)
            .is_some()
    }

    /// Feed one line of raw input to the active question sequence.
    ///
    /// An invalid answer re-asks the current question. A valid answer is
    /// recorded and the next question returned. Answering the last
    /// question tears the session down and fires the sequence's completion
    /// action, whose output (if any) replaces the default completion text.
    pub fn process_question_sequence(&mut self, player: &mut Player, input: &str) -> String {
        let mut sequence = match self.get_session(player, CURRENT_QUESTION_SEQUENCE) {
            Some(Session {
                payload: SessionPayload::Questions(sequence),
                ..
            }) => sequence.clone(),
            _ => return "There are no questions to answer.".to_string(),
        };

        let Some(idx) = sequence.questions.iter().position(|q| q.answer.is_none()) else {
            self.remove_session(player, CURRENT_QUESTION_SEQUENCE);
            return "There are no questions to answer.".to_string();
        };

        let Some(answer) = validate_answer(&sequence.questions[idx], input) else {
            return sequence.questions[idx].question.clone();
        };
        sequence.questions[idx].answer = Some(answer);

        if let Some(next) = sequence.questions.iter().find(|q| q.answer.is_none()) {
            let question = next.question.clone();
            self.add_session(
                player,
                CURRENT_QUESTION_SEQUENCE,
                SessionPayload::Questions(sequence),
            );
            return question;
        }

        self.remove_session(player, CURRENT_QUESTION_SEQUENCE);
        let action = self.actions.session_action(&sequence.name);
        let result = action.and_then(|action| action(self, player, &sequence));
        result.unwrap_or_else(|| "Question sequence complete.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(data_type: QuestionType) -> Question {
        Question {
            id: "q1".to_string(),
            question: "Well?".to_string(),
            data_type,
            answer: None,
        }
    }

    #[test]
    fn boolean_answers_normalize() {
        let q = question(QuestionType::Boolean);
        assert_eq!(validate_answer(&q, "Yes"), Some("true".to_string()));
        assert_eq!(validate_answer(&q, "false"), Some("false".to_string()));
        assert_eq!(validate_answer(&q, "maybe"), None);
    }

    #[test]
    fn number_answers_must_parse() {
        let q = question(QuestionType::Number);
        assert_eq!(validate_answer(&q, "42"), Some("42".to_string()));
        assert_eq!(validate_answer(&q, "forty-two"), None);
    }

    #[test]
    fn blank_answers_rejected() {
        let q = question(QuestionType::String);
        assert_eq!(validate_answer(&q, "   "), None);
        assert_eq!(validate_answer(&q, "Frank"), Some("Frank".to_string()));
    }
}
