//! The controller: owns every view-model, talks to the API and decides which
//! section is visible. Each user operation is one request/response pair
//! followed by a view refresh.

use std::collections::HashMap;

use chrono::{DateTime, Local};
use ratatui::layout::Rect;
use tracing::{info, warn};
use tui_textarea::{CursorMove, TextArea};

use crate::api::VocabApi;
use crate::cards::CardsView;
use crate::config::{AppConfig, QuizConfig};
use crate::error::ApiError;
use crate::keys::{parse_keymap, KeyAction};
use crate::model::{SortingKind, VocabDraft, VocabQuery};
use crate::quiz::{McSession, SortingSession};
use crate::router::{Router, Section};
use crate::theme::{theme_of, Theme};
use crate::vocab::{SortColumn, VocabTable};

/// Single-line text input.
pub fn line_input(value: &str) -> TextArea<'static> {
    let mut ta = TextArea::from([value.to_string()]);
    ta.move_cursor(CursorMove::End);
    ta
}

fn input_value(ta: &TextArea<'_>) -> String {
    ta.lines().join(" ")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Latin,
    German,
}

/// The "add vocabulary" form.
pub struct VocabForm {
    pub latin: TextArea<'static>,
    pub german: TextArea<'static>,
    pub field: FormField,
}

impl Default for VocabForm {
    fn default() -> Self {
        Self {
            latin: line_input(""),
            german: line_input(""),
            field: FormField::Latin,
        }
    }
}

impl VocabForm {
    pub fn latin_text(&self) -> String {
        input_value(&self.latin)
    }

    pub fn german_text(&self) -> String {
        input_value(&self.german)
    }

    pub fn set(&mut self, latin: &str, german: &str) {
        self.latin = line_input(latin);
        self.german = line_input(german);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn toggle_field(&mut self) {
        self.field = match self.field {
            FormField::Latin => FormField::German,
            FormField::German => FormField::Latin,
        };
    }

    pub fn active_mut(&mut self) -> &mut TextArea<'static> {
        match self.field {
            FormField::Latin => &mut self.latin,
            FormField::German => &mut self.german,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptPurpose {
    EditLatin { id: i64, german: String },
    EditGerman { id: i64, latin: String },
    Search,
}

pub struct Prompt {
    pub title: String,
    pub input: TextArea<'static>,
    pub purpose: PromptPurpose,
}

impl Prompt {
    pub fn new(title: &str, initial: &str, purpose: PromptPurpose) -> Self {
        Self {
            title: title.to_string(),
            input: line_input(initial),
            purpose,
        }
    }

    pub fn value(&self) -> String {
        input_value(&self.input)
    }

    pub fn set_value(&mut self, value: &str) {
        self.input = line_input(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteVocab(i64),
}

/// Blocking dialogs. While one is open it receives all input.
pub enum Modal {
    Alert(String),
    Confirm {
        message: String,
        action: ConfirmAction,
    },
    Prompt(Prompt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Form,
}

#[derive(Debug, Clone)]
pub struct StatusLine {
    pub at: DateTime<Local>,
    pub text: String,
    pub is_error: bool,
}

impl StatusLine {
    fn info(text: String) -> Self {
        Self {
            at: Local::now(),
            text,
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            at: Local::now(),
            text,
            is_error: true,
        }
    }
}

/// Screen areas recorded by the last draw, for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct HitAreas {
    pub token: Option<Rect>,
    pub boxes: Vec<Rect>,
    pub options: Vec<Rect>,
}

pub struct App {
    api: Box<dyn VocabApi>,
    quiz_config: QuizConfig,
    pub router: Router,
    pub vocab: VocabTable,
    pub form: VocabForm,
    pub focus: Focus,
    pub mc: Option<McSession>,
    pub verbs: Option<SortingSession>,
    pub nouns: Option<SortingSession>,
    pub cards: CardsView,
    pub modal: Option<Modal>,
    pub status: Option<StatusLine>,
    pub theme: Theme,
    pub keymap: HashMap<char, KeyAction>,
    pub hits: HitAreas,
    /// A sorting token is being dragged with the mouse.
    pub dragging: bool,
}

impl App {
    pub fn new(api: Box<dyn VocabApi>, config: &AppConfig) -> Self {
        Self {
            api,
            quiz_config: config.quiz.clone(),
            router: Router::default(),
            vocab: VocabTable::new(&config.vocab.word_types),
            form: VocabForm::default(),
            focus: Focus::Table,
            mc: None,
            verbs: None,
            nouns: None,
            cards: CardsView::default(),
            modal: None,
            status: None,
            theme: theme_of(config.theme),
            keymap: parse_keymap(&config.keys),
            hits: HitAreas::default(),
            dragging: false,
        }
    }

    // ---------------- navigation ----------------

    /// Makes `section` the only visible one. Rounds belonging to the other
    /// sections are dropped without telling the server.
    pub fn show(&mut self, section: Section) {
        self.router.show(section);
        if section != Section::Quiz {
            self.mc = None;
        }
        if section != Section::Sorting {
            self.verbs = None;
        }
        if section != Section::Nouns {
            self.nouns = None;
        }
        if section != Section::Vocab {
            self.focus = Focus::Table;
        }
        self.dragging = false;
    }

    /// Entry points of the five navigation buttons.
    pub fn navigate(&mut self, section: Section) {
        match section {
            Section::Vocab => self.load_vocab(),
            Section::Quiz => self.start_quiz_flow(),
            Section::Sorting => self.start_sorting(SortingKind::Verbs),
            Section::Nouns => self.start_sorting(SortingKind::Nouns),
            Section::Cards => self.load_cards(),
        }
    }

    pub fn proceed(&mut self) {
        match self.router.current() {
            Section::Quiz if self.mc.as_ref().is_some_and(McSession::can_proceed) => {
                self.next_question()
            }
            Section::Sorting if self.verbs.as_ref().is_some_and(SortingSession::can_proceed) => {
                self.next_item(SortingKind::Verbs)
            }
            Section::Nouns if self.nouns.as_ref().is_some_and(SortingSession::can_proceed) => {
                self.next_item(SortingKind::Nouns)
            }
            _ => {}
        }
    }

    // ---------------- vocabulary ----------------

    /// Re-fetches the whole list and shows the vocabulary section.
    pub fn load_vocab(&mut self) {
        let query = VocabQuery {
            search: self.vocab.search.clone(),
        };
        match self.api.list_vocab(&query) {
            Ok(entries) => {
                info!(count = entries.len(), "vocabulary loaded");
                self.vocab.replace(entries);
            }
            Err(e) => self.report("Could not load vocabulary", &e),
        }
        self.show(Section::Vocab);
    }

    pub fn sort_by(&mut self, column: SortColumn) {
        self.vocab.sort.select(column);
        self.load_vocab();
    }

    pub fn cycle_filter(&mut self) {
        self.vocab.cycle_filter();
    }

    pub fn begin_search(&mut self) {
        let current = self.vocab.search.clone().unwrap_or_default();
        self.modal = Some(Modal::Prompt(Prompt::new(
            "Search Latin or German:",
            &current,
            PromptPurpose::Search,
        )));
    }

    pub fn begin_edit(&mut self, id: i64) {
        let Some(entry) = self.vocab.entry(id) else {
            return;
        };
        let prompt = Prompt::new(
            "Edit Latin word:",
            &entry.latin_word,
            PromptPurpose::EditLatin {
                id,
                german: entry.german_translation.clone(),
            },
        );
        self.modal = Some(Modal::Prompt(prompt));
    }

    pub fn request_delete(&mut self, id: i64) {
        if self.vocab.entry(id).is_none() {
            return;
        }
        self.modal = Some(Modal::Confirm {
            message: "Really delete this vocab entry?".into(),
            action: ConfirmAction::DeleteVocab(id),
        });
    }

    pub fn submit_form(&mut self) {
        let Some(draft) = VocabDraft::from_form(&self.form.latin_text(), &self.form.german_text())
        else {
            self.alert("Latin required");
            return;
        };
        match self.api.create_vocab(&draft) {
            Ok(created) => {
                info!(id = created.id, latin = %draft.latin_word, "vocab entry created");
                self.form.reset();
                self.notify(format!(
                    "Added \"{}\" ({})",
                    draft.latin_word,
                    created.word_type.as_deref().unwrap_or("unknown type")
                ));
                self.load_vocab();
            }
            Err(e @ ApiError::Status { .. }) => {
                warn!(error = %e, "create rejected");
                self.alert(e.server_message().unwrap_or("Saving failed!"));
            }
            Err(e) => {
                warn!(error = %e, "create failed");
                self.alert(format!("Network error: {e}"));
            }
        }
    }

    fn update_entry(&mut self, id: i64, draft: VocabDraft) {
        match self.api.update_vocab(id, &draft) {
            Ok(()) => {
                self.notify(format!("Updated \"{}\"", draft.latin_word));
                self.load_vocab();
            }
            Err(e) => {
                warn!(id, error = %e, "update failed");
                self.alert("Error updating vocab entry.");
            }
        }
    }

    fn delete_entry(&mut self, id: i64) {
        match self.api.delete_vocab(id) {
            Ok(()) => {
                self.notify("Entry deleted".into());
                self.load_vocab();
            }
            Err(e) => {
                warn!(id, error = %e, "delete failed");
                self.alert("Error deleting vocab entry.");
            }
        }
    }

    // ---------------- dialogs ----------------

    pub fn alert(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!(%message, "alert");
        self.modal = Some(Modal::Alert(message));
    }

    pub fn dismiss_alert(&mut self) {
        if matches!(self.modal, Some(Modal::Alert(_))) {
            self.modal = None;
        }
    }

    pub fn prompt_mut(&mut self) -> Option<&mut Prompt> {
        match self.modal.as_mut() {
            Some(Modal::Prompt(p)) => Some(p),
            _ => None,
        }
    }

    /// Accepts the open prompt. Editing is two prompts in a row; only the
    /// second one sends anything.
    pub fn submit_prompt(&mut self) {
        if !matches!(self.modal, Some(Modal::Prompt(_))) {
            return;
        }
        let Some(Modal::Prompt(prompt)) = self.modal.take() else {
            return;
        };
        let value = prompt.value();
        match prompt.purpose {
            PromptPurpose::EditLatin { id, german } => {
                self.modal = Some(Modal::Prompt(Prompt::new(
                    "Edit German translation:",
                    &german,
                    PromptPurpose::EditGerman { id, latin: value },
                )));
            }
            PromptPurpose::EditGerman { id, latin } => {
                let draft = VocabDraft {
                    latin_word: latin,
                    german_translation: value,
                };
                self.update_entry(id, draft);
            }
            PromptPurpose::Search => {
                let term = value.trim();
                self.vocab.search = (!term.is_empty()).then(|| term.to_string());
                self.load_vocab();
            }
        }
    }

    /// Cancelling either edit prompt abandons the whole edit.
    pub fn cancel_prompt(&mut self) {
        if matches!(self.modal, Some(Modal::Prompt(_))) {
            self.modal = None;
        }
    }

    pub fn answer_confirm(&mut self, yes: bool) {
        if !matches!(self.modal, Some(Modal::Confirm { .. })) {
            return;
        }
        let Some(Modal::Confirm { action, .. }) = self.modal.take() else {
            return;
        };
        if !yes {
            return;
        }
        match action {
            ConfirmAction::DeleteVocab(id) => self.delete_entry(id),
        }
    }

    // ---------------- multiple choice ----------------

    pub fn start_quiz_flow(&mut self) {
        match self.api.start_quiz() {
            Ok(round) => {
                self.mc = Some(McSession::new(round));
                self.show(Section::Quiz);
                self.next_question();
            }
            Err(e) => self.report("Could not start the quiz", &e),
        }
    }

    pub fn next_question(&mut self) {
        let Some(session) = self.mc.as_mut() else {
            return;
        };
        let round = session.round_id().clone();
        if session.is_complete() {
            session.mark_complete();
            info!(%round, "multiple choice round complete");
            self.alert("Multiple choice quiz complete!");
            if let Err(e) = self.api.finish_quiz(&round) {
                self.report("Could not finish the round", &e);
            }
            self.load_vocab();
            return;
        }
        let result = self.api.next_question(&round);
        match result {
            Ok(next) => {
                if let Some(session) = self.mc.as_mut() {
                    match next {
                        Some(question) => session.show_question(question),
                        None => session.mark_no_questions(),
                    }
                }
            }
            Err(e) => self.report("Could not load the next question", &e),
        }
    }

    pub fn choose_option(&mut self, index: usize) {
        let Some(answer) = self.mc.as_mut().and_then(|s| s.choose(index)) else {
            return;
        };
        match self.api.answer_question(&answer) {
            Ok(outcome) => {
                info!(correct = outcome.correct, "answer recorded");
                if let Some(session) = self.mc.as_mut() {
                    session.record_outcome(&outcome);
                }
            }
            Err(e) => {
                if let Some(session) = self.mc.as_mut() {
                    session.reopen();
                }
                self.report("Could not submit the answer", &e);
            }
        }
    }

    // ---------------- sorting ----------------

    fn sorting_slot(&mut self, kind: SortingKind) -> &mut Option<SortingSession> {
        match kind {
            SortingKind::Verbs => &mut self.verbs,
            SortingKind::Nouns => &mut self.nouns,
        }
    }

    pub fn sorting(&self, kind: SortingKind) -> Option<&SortingSession> {
        match kind {
            SortingKind::Verbs => self.verbs.as_ref(),
            SortingKind::Nouns => self.nouns.as_ref(),
        }
    }

    pub fn start_sorting(&mut self, kind: SortingKind) {
        self.show(section_of(kind));
        match self.api.start_sorting(kind) {
            Ok(round) => {
                let categories = match kind {
                    SortingKind::Verbs => &self.quiz_config.verb_categories,
                    SortingKind::Nouns => &self.quiz_config.noun_categories,
                };
                let session = SortingSession::new(kind, round, categories);
                *self.sorting_slot(kind) = Some(session);
                self.next_item(kind);
            }
            Err(e) => self.report("Could not start the sorting quiz", &e),
        }
    }

    pub fn next_item(&mut self, kind: SortingKind) {
        let Some(session) = self.sorting_slot(kind).as_mut() else {
            return;
        };
        if session.is_complete() {
            let alert = session.complete();
            self.end_sorting(kind, alert);
            return;
        }
        let round = session.round_id().clone();
        match self.api.next_sorting(kind, &round) {
            Ok(next) => {
                let ended = self
                    .sorting_slot(kind)
                    .as_mut()
                    .and_then(|s| s.apply_next(next));
                if let Some(alert) = ended {
                    self.end_sorting(kind, alert);
                }
            }
            Err(e) => self.report("Could not load the next item", &e),
        }
    }

    fn end_sorting(&mut self, kind: SortingKind, alert: String) {
        info!(kind = kind.path(), "sorting round over");
        self.alert(alert);
        self.load_vocab();
    }

    /// Drops the current item on category box `index`.
    pub fn drop_item(&mut self, kind: SortingKind, index: usize) {
        let Some(answer) = self
            .sorting_slot(kind)
            .as_mut()
            .and_then(|s| s.drop_on(index))
        else {
            return;
        };
        match self.api.answer_sorting(kind, &answer) {
            Ok(outcome) => {
                info!(
                    kind = kind.path(),
                    item = answer.item.text(),
                    category = %answer.category,
                    correct = outcome.correct,
                    "item sorted"
                );
                if let Some(session) = self.sorting_slot(kind).as_mut() {
                    session.record_outcome(index, &outcome);
                }
            }
            Err(e) => {
                if let Some(session) = self.sorting_slot(kind).as_mut() {
                    session.reopen();
                }
                self.report("Could not submit the answer", &e);
            }
        }
    }

    // ---------------- cards ----------------

    pub fn load_cards(&mut self) {
        match self.api.list_cards() {
            Ok(cards) => {
                info!(count = cards.len(), "cards loaded");
                self.cards.replace(cards);
                self.show(Section::Cards);
            }
            Err(e) => self.report("Could not load cards", &e),
        }
    }

    // ---------------- status ----------------

    fn notify(&mut self, text: String) {
        self.status = Some(StatusLine::info(text));
    }

    fn report(&mut self, context: &str, err: &ApiError) {
        warn!(error = %err, "{context}");
        self.status = Some(StatusLine::error(format!("{context}: {err}")));
    }
}

pub fn section_of(kind: SortingKind) -> Section {
    match kind {
        SortingKind::Verbs => Section::Sorting,
        SortingKind::Nouns => Section::Nouns,
    }
}

pub fn kind_of(section: Section) -> Option<SortingKind> {
    match section {
        Section::Sorting => Some(SortingKind::Verbs),
        Section::Nouns => Some(SortingKind::Nouns),
        _ => None,
    }
}
