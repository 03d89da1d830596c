//! Keyboard and mouse dispatch. One stable table of bindings replaces
//! per-render handler wiring.

use std::collections::HashMap;

use crossterm::event::{
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::{Position, Rect};

use crate::app::{kind_of, App, Focus, Modal};
use crate::router::Section;
use crate::vocab::SortColumn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    ShowVocab,
    ShowQuiz,
    ShowSorting,
    ShowNouns,
    ShowCards,
    Refresh,
    SortLatin,
    SortGerman,
    SortType,
    SortAccuracy,
    CycleFilter,
    AddEntry,
    EditEntry,
    DeleteEntry,
    Search,
    Proceed,
}

pub fn action_from_str(s: &str) -> Option<KeyAction> {
    use KeyAction::*;
    Some(match s {
        "show_vocab" => ShowVocab,
        "show_quiz" => ShowQuiz,
        "show_sorting" => ShowSorting,
        "show_nouns" => ShowNouns,
        "show_cards" => ShowCards,
        "refresh" => Refresh,
        "sort_latin" => SortLatin,
        "sort_german" => SortGerman,
        "sort_type" => SortType,
        "sort_accuracy" => SortAccuracy,
        "cycle_filter" => CycleFilter,
        "add_entry" => AddEntry,
        "edit_entry" => EditEntry,
        "delete_entry" => DeleteEntry,
        "search" => Search,
        "proceed" => Proceed,
        _ => return None,
    })
}

pub fn default_keymap() -> HashMap<char, KeyAction> {
    use KeyAction::*;
    let mut m = HashMap::new();
    m.insert('v', ShowVocab);
    m.insert('m', ShowQuiz);
    m.insert('s', ShowSorting);
    m.insert('n', ShowNouns);
    m.insert('c', ShowCards);
    m.insert('r', Refresh);
    m.insert('L', SortLatin);
    m.insert('G', SortGerman);
    m.insert('T', SortType);
    m.insert('A', SortAccuracy);
    m.insert('f', CycleFilter);
    m.insert('a', AddEntry);
    m.insert('e', EditEntry);
    m.insert('d', DeleteEntry);
    m.insert('/', Search);
    m.insert(' ', Proceed);
    m
}

/// Only single-character keys with a known action are kept. An empty result
/// falls back to the defaults.
pub fn parse_keymap(map: &HashMap<String, String>) -> HashMap<char, KeyAction> {
    let mut out = HashMap::new();
    for (k, v) in map {
        let mut chars = k.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if let Some(act) = action_from_str(v) {
                out.insert(ch, act);
            }
        }
    }
    if out.is_empty() {
        out = default_keymap();
    }
    out
}

pub fn apply_action(app: &mut App, action: KeyAction) {
    let in_vocab = app.router.is_visible(Section::Vocab);
    match action {
        KeyAction::ShowVocab | KeyAction::Refresh => app.navigate(Section::Vocab),
        KeyAction::ShowQuiz => app.navigate(Section::Quiz),
        KeyAction::ShowSorting => app.navigate(Section::Sorting),
        KeyAction::ShowNouns => app.navigate(Section::Nouns),
        KeyAction::ShowCards => app.navigate(Section::Cards),
        KeyAction::SortLatin if in_vocab => app.sort_by(SortColumn::LatinWord),
        KeyAction::SortGerman if in_vocab => app.sort_by(SortColumn::GermanTranslation),
        KeyAction::SortType if in_vocab => app.sort_by(SortColumn::WordType),
        KeyAction::SortAccuracy if in_vocab => app.sort_by(SortColumn::AccuracyPercent),
        KeyAction::CycleFilter if in_vocab => app.cycle_filter(),
        KeyAction::AddEntry if in_vocab => app.focus = Focus::Form,
        KeyAction::EditEntry if in_vocab => {
            if let Some(id) = app.vocab.selected_entry().map(|e| e.id) {
                app.begin_edit(id);
            }
        }
        KeyAction::DeleteEntry if in_vocab => {
            if let Some(id) = app.vocab.selected_entry().map(|e| e.id) {
                app.request_delete(id);
            }
        }
        KeyAction::Search if in_vocab => app.begin_search(),
        KeyAction::Proceed => app.proceed(),
        _ => {}
    }
}

/// Returns `true` when the user asked to quit.
pub fn handle_key(app: &mut App, key: KeyEvent) -> bool {
    if key.kind != KeyEventKind::Press {
        return false;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return true;
    }
    if app.modal.is_some() {
        handle_modal_key(app, key);
        return false;
    }
    if app.focus == Focus::Form && app.router.is_visible(Section::Vocab) {
        handle_form_key(app, key);
        return false;
    }

    // Configured keys win over the built-in navigation keys.
    if let KeyCode::Char(ch) = key.code {
        if let Some(action) = app.keymap.get(&ch).copied() {
            apply_action(app, action);
            return false;
        }
    }

    let section = app.router.current();
    match key.code {
        KeyCode::Char('q') => return true,
        KeyCode::Char(ch @ '1'..='9') if section != Section::Vocab => {
            let index = ch as usize - '1' as usize;
            pick(app, section, index);
        }
        KeyCode::Up | KeyCode::Char('k') => move_cursor(app, section, -1),
        KeyCode::Down | KeyCode::Char('j') => move_cursor(app, section, 1),
        KeyCode::Left | KeyCode::Char('h') => move_cursor(app, section, -1),
        KeyCode::Right | KeyCode::Char('l') => move_cursor(app, section, 1),
        KeyCode::Enter => activate(app, section),
        _ => {}
    }
    false
}

fn handle_modal_key(app: &mut App, key: KeyEvent) {
    match app.modal {
        Some(Modal::Alert(_)) => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.dismiss_alert();
            }
        }
        Some(Modal::Confirm { .. }) => match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => app.answer_confirm(true),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => app.answer_confirm(false),
            _ => {}
        },
        Some(Modal::Prompt(_)) => match key.code {
            KeyCode::Enter => app.submit_prompt(),
            KeyCode::Esc => app.cancel_prompt(),
            _ => {
                if let Some(prompt) = app.prompt_mut() {
                    prompt.input.input(key);
                }
            }
        },
        None => {}
    }
}

fn handle_form_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.focus = Focus::Table,
        KeyCode::Tab | KeyCode::BackTab => app.form.toggle_field(),
        KeyCode::Enter => app.submit_form(),
        _ => {
            app.form.active_mut().input(key);
        }
    }
}

fn pick(app: &mut App, section: Section, index: usize) {
    if section == Section::Quiz {
        app.choose_option(index);
    } else if let Some(kind) = kind_of(section) {
        app.drop_item(kind, index);
    }
}

fn move_cursor(app: &mut App, section: Section, delta: isize) {
    match section {
        Section::Vocab => app.vocab.move_selection(delta),
        Section::Quiz => {
            if let Some(s) = app.mc.as_mut() {
                s.move_cursor(delta);
            }
        }
        Section::Sorting => {
            if let Some(s) = app.verbs.as_mut() {
                s.move_cursor(delta);
            }
        }
        Section::Nouns => {
            if let Some(s) = app.nouns.as_mut() {
                s.move_cursor(delta);
            }
        }
        Section::Cards => app.cards.scroll_by(delta),
    }
}

/// Enter: answer with the highlighted option/box, or proceed once answered.
fn activate(app: &mut App, section: Section) {
    match section {
        Section::Quiz => {
            let pending = app
                .mc
                .as_ref()
                .filter(|s| s.options_enabled())
                .map(|s| s.cursor);
            match pending {
                Some(cursor) => app.choose_option(cursor),
                None => app.proceed(),
            }
        }
        Section::Sorting | Section::Nouns => {
            let Some(kind) = kind_of(section) else {
                return;
            };
            let pending = app
                .sorting(kind)
                .filter(|s| s.can_drop())
                .map(|s| s.cursor);
            match pending {
                Some(cursor) => app.drop_item(kind, cursor),
                None => app.proceed(),
            }
        }
        Section::Vocab => {
            if let Some(id) = app.vocab.selected_entry().map(|e| e.id) {
                app.begin_edit(id);
            }
        }
        Section::Cards => {}
    }
}

fn hit(rect: &Rect, x: u16, y: u16) -> bool {
    rect.contains(Position::new(x, y))
}

/// Click on an option answers it; dragging the sorting token onto a box
/// and releasing drops it there.
pub fn handle_mouse(app: &mut App, ev: MouseEvent) {
    if app.modal.is_some() {
        return;
    }
    let section = app.router.current();
    let (x, y) = (ev.column, ev.row);
    match ev.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if section == Section::Quiz {
                if let Some(index) = app.hits.options.iter().position(|r| hit(r, x, y)) {
                    app.choose_option(index);
                }
            } else if kind_of(section).is_some() {
                app.dragging = app.hits.token.is_some_and(|r| hit(&r, x, y));
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if !app.dragging {
                return;
            }
            app.dragging = false;
            let target = app.hits.boxes.iter().position(|r| hit(r, x, y));
            if let (Some(kind), Some(index)) = (kind_of(section), target) {
                app.drop_item(kind, index);
            }
        }
        MouseEventKind::ScrollDown => move_cursor(app, section, 1),
        MouseEventKind::ScrollUp => move_cursor(app, section, -1),
        _ => {}
    }
}
