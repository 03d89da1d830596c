use crate::model::{NextItem, RoundId, SortAnswer, SortOutcome, SortingKind};

use super::{progress, ROUND_LENGTH};

/// One drop target. `label` is what the box currently shows.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBox {
    pub category: String,
    pub label: String,
    /// `Some(correct)` once the current item was dropped here.
    pub mark: Option<bool>,
}

impl CategoryBox {
    fn new(category: &str) -> Self {
        Self {
            category: category.to_string(),
            label: category.to_string(),
            mark: None,
        }
    }

    fn reset(&mut self) {
        self.label = self.category.clone();
        self.mark = None;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortingPhase {
    RoundStarted,
    ItemShown,
    /// Waiting for the answer or showing its result; the item can't be dropped again.
    ItemAnswered,
}

/// Shared state machine of the verb and noun sorting quizzes.
#[derive(Debug, Clone)]
pub struct SortingSession {
    kind: SortingKind,
    round_id: RoundId,
    count: usize,
    current: Option<String>,
    boxes: Vec<CategoryBox>,
    phase: SortingPhase,
    answered: bool,
    pub feedback: String,
    pub counter: String,
    /// Highlighted box for keyboard drops.
    pub cursor: usize,
}

impl SortingSession {
    pub fn new(kind: SortingKind, round_id: RoundId, categories: &[String]) -> Self {
        Self {
            kind,
            round_id,
            count: 0,
            current: None,
            boxes: categories.iter().map(|c| CategoryBox::new(c)).collect(),
            phase: SortingPhase::RoundStarted,
            answered: false,
            feedback: String::new(),
            counter: String::new(),
            cursor: 0,
        }
    }

    pub fn round_id(&self) -> &RoundId {
        &self.round_id
    }

    pub fn phase(&self) -> SortingPhase {
        self.phase
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }

    pub fn boxes(&self) -> &[CategoryBox] {
        &self.boxes
    }

    pub fn is_complete(&self) -> bool {
        self.count >= ROUND_LENGTH
    }

    pub fn can_drop(&self) -> bool {
        self.phase == SortingPhase::ItemShown
    }

    /// Proceed is offered only after the drop's result came back.
    pub fn can_proceed(&self) -> bool {
        self.phase == SortingPhase::ItemAnswered && self.answered
    }

    pub fn show_item(&mut self, item: String) {
        self.count += 1;
        self.current = Some(item);
        self.counter = progress(self.count);
        self.feedback = match self.kind {
            SortingKind::Verbs => format!(
                "Drag to category! ({}/{ROUND_LENGTH} verbs)",
                self.count
            ),
            SortingKind::Nouns => "Drag to declension!".into(),
        };
        self.boxes.iter_mut().for_each(CategoryBox::reset);
        self.phase = SortingPhase::ItemShown;
        self.answered = false;
    }

    /// Builds the answer for dropping the current item on box `index`.
    pub fn drop_on(&mut self, index: usize) -> Option<SortAnswer> {
        if !self.can_drop() {
            return None;
        }
        let item = self.current.clone()?;
        let category = self.boxes.get(index)?.category.clone();
        self.cursor = index;
        self.phase = SortingPhase::ItemAnswered;
        Some(SortAnswer {
            quizroundid: self.round_id.clone(),
            item: self.kind.wrap_item(item),
            category,
        })
    }

    pub fn reopen(&mut self) {
        if self.phase == SortingPhase::ItemAnswered && !self.answered {
            self.phase = SortingPhase::ItemShown;
        }
    }

    /// Marks box `index` and writes the feedback. Verbs echo the category and
    /// show the score as a percentage; nouns show the raw message and score.
    pub fn record_outcome(&mut self, index: usize, outcome: &SortOutcome) {
        let kind = self.kind;
        if let Some(b) = self.boxes.get_mut(index) {
            b.mark = Some(outcome.correct);
            b.label = match kind {
                SortingKind::Verbs => format!("{} ({})", b.category, outcome.message),
                SortingKind::Nouns => outcome.message.clone(),
            };
        }
        self.feedback = match kind {
            SortingKind::Verbs => format!("{} {:.1}%", outcome.message, outcome.score),
            SortingKind::Nouns => format!("Accuracy: {:.1}", outcome.score),
        };
        self.answered = true;
    }

    /// Client-side end of round after `ROUND_LENGTH` items. Returns the alert text.
    pub fn complete(&mut self) -> String {
        self.counter.clear();
        match self.kind {
            SortingKind::Verbs => {
                self.feedback = format!("Sorting quiz complete! ({ROUND_LENGTH} verbs)");
                "Sorting quiz complete!".into()
            }
            SortingKind::Nouns => {
                self.feedback = format!("Noun quiz complete! ({ROUND_LENGTH} nouns)");
                "Noun Sorting Quiz complete!".into()
            }
        }
    }

    /// Server-side end of round. Returns the alert text.
    pub fn exhausted(&mut self, message: String) -> String {
        match self.kind {
            SortingKind::Verbs => {
                self.feedback = message;
                "Sorting quiz complete! All verbs covered.".into()
            }
            SortingKind::Nouns => message,
        }
    }

    /// Applies a `next` response. Returns the alert text when the round ended.
    pub fn apply_next(&mut self, next: NextItem) -> Option<String> {
        match next {
            NextItem::Item(item) => {
                self.show_item(item);
                None
            }
            NextItem::Exhausted(message) => Some(self.exhausted(message)),
        }
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let n = self.boxes.len();
        if n == 0 {
            return;
        }
        self.cursor = (self.cursor as isize + delta).clamp(0, n as isize - 1) as usize;
    }
}
