use crate::model::{AnswerOutcome, CardChange, McAnswer, McQuestion, RoundId};

use super::{progress, ROUND_LENGTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McPhase {
    RoundStarted,
    QuestionShown,
    /// Options are locked; the proceed control is visible.
    AnswerSubmitted,
    /// The server had no question to give.
    NoQuestions,
}

#[derive(Debug, Clone)]
pub struct McSession {
    round_id: RoundId,
    shown: usize,
    current: Option<McQuestion>,
    phase: McPhase,
    pub feedback: String,
    pub counter: String,
    /// Highlighted option for keyboard selection.
    pub cursor: usize,
}

impl McSession {
    pub fn new(round_id: RoundId) -> Self {
        Self {
            round_id,
            shown: 0,
            current: None,
            phase: McPhase::RoundStarted,
            feedback: String::new(),
            counter: String::new(),
            cursor: 0,
        }
    }

    pub fn round_id(&self) -> &RoundId {
        &self.round_id
    }

    pub fn phase(&self) -> McPhase {
        self.phase
    }

    pub fn current(&self) -> Option<&McQuestion> {
        self.current.as_ref()
    }

    /// Checked before fetching, so a round never requests a fourth question.
    pub fn is_complete(&self) -> bool {
        self.shown >= ROUND_LENGTH
    }

    pub fn show_question(&mut self, question: McQuestion) {
        self.feedback = format!(
            "Choose the right answer! ({}/{ROUND_LENGTH} words)",
            self.shown + 1
        );
        self.shown += 1;
        self.counter = progress(self.shown);
        self.current = Some(question);
        self.cursor = 0;
        self.phase = McPhase::QuestionShown;
    }

    pub fn mark_no_questions(&mut self) {
        self.feedback = "No more questions.".into();
        self.phase = McPhase::NoQuestions;
    }

    pub fn mark_complete(&mut self) {
        self.feedback = format!("Multiple choice quiz complete! ({ROUND_LENGTH} words)");
    }

    pub fn options_enabled(&self) -> bool {
        self.phase == McPhase::QuestionShown
    }

    pub fn can_proceed(&self) -> bool {
        self.phase == McPhase::AnswerSubmitted
    }

    /// Locks the options and builds the answer request. Returns `None` once
    /// the question has been answered, or for an out-of-range option.
    pub fn choose(&mut self, index: usize) -> Option<McAnswer> {
        if !self.options_enabled() {
            return None;
        }
        let question = self.current.as_ref()?;
        let option = question.options.get(index)?.clone();
        self.cursor = index;
        self.phase = McPhase::AnswerSubmitted;
        Some(McAnswer {
            quiz_round_id: self.round_id.clone(),
            vocab_entry_id: question.id,
            selected_option: option,
        })
    }

    /// Unlocks the options again after the answer request failed.
    pub fn reopen(&mut self) {
        if self.phase == McPhase::AnswerSubmitted {
            self.phase = McPhase::QuestionShown;
        }
    }

    pub fn record_outcome(&mut self, outcome: &AnswerOutcome) {
        self.feedback = outcome_message(outcome);
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let n = self.current.as_ref().map_or(0, |q| q.options.len());
        if n == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).clamp(0, n as isize - 1) as usize;
    }
}

pub fn outcome_message(outcome: &AnswerOutcome) -> String {
    let mut msg = String::from(if outcome.correct { "Correct!" } else { "Wrong." });
    msg.push_str(&format!(" | Accuracy now: {:.1}%", outcome.accuracy_percent));
    match outcome.card_change {
        Some(CardChange::Created) => msg.push_str(" | Bronze card unlocked!"),
        Some(CardChange::Removed) => msg.push_str(" | Bronze card lost (accuracy below 90%)."),
        Some(CardChange::Unchanged) | None => {}
    }
    msg
}
