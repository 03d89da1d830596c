//! Shared fixtures for the controller tests: an in-memory `VocabApi` that
//! records every call and answers from a scripted state.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use latin_vocab::api::VocabApi;
use latin_vocab::app::App;
use latin_vocab::config::AppConfig;
use latin_vocab::error::{ApiError, ApiResult};
use latin_vocab::model::{
    AnswerOutcome, Card, CreatedVocab, McAnswer, McQuestion, NextItem, RoundId, SortAnswer,
    SortOutcome, SortingKind, VocabDraft, VocabEntry, VocabQuery,
};

pub const MC_ROUND: i64 = 7;
pub const VERB_ROUND: i64 = 11;
pub const NOUN_ROUND: i64 = 12;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    ListVocab(Option<String>),
    CreateVocab(VocabDraft),
    UpdateVocab(i64, VocabDraft),
    DeleteVocab(i64),
    StartQuiz,
    NextQuestion(RoundId),
    Answer(McAnswer),
    FinishQuiz(RoundId),
    ListCards,
    StartSorting(SortingKind),
    NextSorting(SortingKind, RoundId),
    AnswerSorting(SortingKind, SortAnswer),
}

#[derive(Default)]
pub struct State {
    pub calls: Vec<Call>,
    pub vocab: Vec<VocabEntry>,
    /// Returned (once) by the next create.
    pub create_error: Option<ApiError>,
    pub fail_updates: bool,
    pub fail_deletes: bool,
    pub fail_reads: bool,
    /// One entry per `next_question`; an empty script means "no question".
    pub questions: VecDeque<Option<McQuestion>>,
    /// `None` makes answers fail with a transport error.
    pub outcome: Option<AnswerOutcome>,
    pub items: VecDeque<NextItem>,
    pub sort_outcome: Option<SortOutcome>,
    pub cards: Vec<Card>,
}

impl State {
    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }
}

#[derive(Clone, Default)]
pub struct FakeApi {
    pub state: Rc<RefCell<State>>,
}

fn offline() -> ApiError {
    ApiError::Transport("connection refused".into())
}

impl FakeApi {
    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }
}

impl VocabApi for FakeApi {
    fn list_vocab(&self, query: &VocabQuery) -> ApiResult<Vec<VocabEntry>> {
        self.record(Call::ListVocab(query.search.clone()));
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(offline());
        }
        let term = query.search.as_deref().unwrap_or("").to_lowercase();
        Ok(state
            .vocab
            .iter()
            .filter(|e| {
                e.latin_word.to_lowercase().contains(&term)
                    || e.german_translation.to_lowercase().contains(&term)
            })
            .cloned()
            .collect())
    }

    fn create_vocab(&self, draft: &VocabDraft) -> ApiResult<CreatedVocab> {
        self.record(Call::CreateVocab(draft.clone()));
        let mut state = self.state.borrow_mut();
        if let Some(err) = state.create_error.take() {
            return Err(err);
        }
        let id = state.vocab.iter().map(|e| e.id).max().unwrap_or(0) + 1;
        let word_type = if draft.latin_word.ends_with("re") {
            "verb"
        } else {
            "unbekannt"
        };
        state.vocab.push(VocabEntry {
            id,
            latin_word: draft.latin_word.clone(),
            german_translation: draft.german_translation.clone(),
            word_type: word_type.into(),
            accuracy_percent: 0.0,
            has_bronze_card: false,
        });
        Ok(CreatedVocab {
            id,
            word_type: Some(word_type.into()),
        })
    }

    fn update_vocab(&self, id: i64, draft: &VocabDraft) -> ApiResult<()> {
        self.record(Call::UpdateVocab(id, draft.clone()));
        let mut state = self.state.borrow_mut();
        if state.fail_updates {
            return Err(ApiError::Status {
                status: 500,
                message: None,
            });
        }
        if let Some(e) = state.vocab.iter_mut().find(|e| e.id == id) {
            e.latin_word = draft.latin_word.clone();
            e.german_translation = draft.german_translation.clone();
        }
        Ok(())
    }

    fn delete_vocab(&self, id: i64) -> ApiResult<()> {
        self.record(Call::DeleteVocab(id));
        let mut state = self.state.borrow_mut();
        if state.fail_deletes {
            return Err(ApiError::Status {
                status: 404,
                message: Some("Vocab not found".into()),
            });
        }
        state.vocab.retain(|e| e.id != id);
        Ok(())
    }

    fn start_quiz(&self) -> ApiResult<RoundId> {
        self.record(Call::StartQuiz);
        Ok(RoundId::Number(MC_ROUND))
    }

    fn next_question(&self, round: &RoundId) -> ApiResult<Option<McQuestion>> {
        self.record(Call::NextQuestion(round.clone()));
        Ok(self.state.borrow_mut().questions.pop_front().flatten())
    }

    fn answer_question(&self, answer: &McAnswer) -> ApiResult<AnswerOutcome> {
        self.record(Call::Answer(answer.clone()));
        self.state.borrow().outcome.clone().ok_or_else(offline)
    }

    fn finish_quiz(&self, round: &RoundId) -> ApiResult<()> {
        self.record(Call::FinishQuiz(round.clone()));
        Ok(())
    }

    fn list_cards(&self) -> ApiResult<Vec<Card>> {
        self.record(Call::ListCards);
        let state = self.state.borrow();
        if state.fail_reads {
            return Err(offline());
        }
        Ok(state.cards.clone())
    }

    fn start_sorting(&self, kind: SortingKind) -> ApiResult<RoundId> {
        self.record(Call::StartSorting(kind));
        Ok(RoundId::Number(match kind {
            SortingKind::Verbs => VERB_ROUND,
            SortingKind::Nouns => NOUN_ROUND,
        }))
    }

    fn next_sorting(&self, kind: SortingKind, round: &RoundId) -> ApiResult<NextItem> {
        self.record(Call::NextSorting(kind, round.clone()));
        Ok(self
            .state
            .borrow_mut()
            .items
            .pop_front()
            .unwrap_or_else(|| NextItem::Exhausted("Quiz complete!".into())))
    }

    fn answer_sorting(&self, kind: SortingKind, answer: &SortAnswer) -> ApiResult<SortOutcome> {
        self.record(Call::AnswerSorting(kind, answer.clone()));
        self.state.borrow().sort_outcome.clone().ok_or_else(offline)
    }
}

pub fn entry(id: i64, latin: &str, german: &str, word_type: &str, accuracy: f64) -> VocabEntry {
    VocabEntry {
        id,
        latin_word: latin.into(),
        german_translation: german.into(),
        word_type: word_type.into(),
        accuracy_percent: accuracy,
        has_bronze_card: accuracy >= 90.0,
    }
}

pub fn question(id: i64, latin: &str) -> McQuestion {
    McQuestion {
        id,
        latin_word: latin.into(),
        options: vec!["lieben".into(), "Rose".into(), "Tempel".into(), "gut".into()],
    }
}

pub fn sample_vocab() -> Vec<VocabEntry> {
    vec![
        entry(1, "rosa", "Rose", "nomen", 50.0),
        entry(2, "amare", "lieben", "verb", 95.0),
        entry(3, "templum", "Tempel", "nomen", 12.5),
        entry(4, "bonus", "gut", "adjektiv", 0.0),
    ]
}

/// Builds an `App` over a fake API seeded with `state`.
pub fn app_with(state: State) -> (App, Rc<RefCell<State>>) {
    let api = FakeApi {
        state: Rc::new(RefCell::new(state)),
    };
    let handle = Rc::clone(&api.state);
    let app = App::new(Box::new(api), &AppConfig::default());
    (app, handle)
}

pub fn alert_text(app: &App) -> Option<&str> {
    match app.modal.as_ref() {
        Some(latin_vocab::app::Modal::Alert(text)) => Some(text),
        _ => None,
    }
}

pub fn latin_column(app: &App) -> Vec<String> {
    app.vocab
        .rows()
        .into_iter()
        .map(|e| e.latin_word.clone())
        .collect()
}
