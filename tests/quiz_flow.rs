//! Quiz rounds, navigation and the cards gallery through the controller.

mod common;

use crossterm::event::{
    KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use pretty_assertions::assert_eq;
use ratatui::{backend::TestBackend, layout::Rect, Terminal};

use latin_vocab::app::App;
use latin_vocab::config::AppConfig;
use latin_vocab::keys::{handle_key, handle_mouse};
use latin_vocab::model::{
    AnswerOutcome, Card, CardChange, McAnswer, NextItem, RoundId, SortAnswer, SortItem,
    SortOutcome, SortingKind,
};
use latin_vocab::quiz::McPhase;
use latin_vocab::router::Section;
use latin_vocab::ui::ui;

use common::{
    alert_text, app_with, question, sample_vocab, Call, State, MC_ROUND, NOUN_ROUND, VERB_ROUND,
};

fn correct(accuracy: f64) -> AnswerOutcome {
    AnswerOutcome {
        correct: true,
        accuracy_percent: accuracy,
        card_change: None,
    }
}

fn sorted(correct: bool, message: &str, score: f64) -> SortOutcome {
    SortOutcome {
        correct,
        message: message.into(),
        score,
    }
}

fn quiz_state(questions: usize) -> State {
    State {
        vocab: sample_vocab(),
        questions: (1..=questions as i64)
            .map(|id| Some(question(id, "amare")))
            .collect(),
        outcome: Some(correct(50.0)),
        ..State::default()
    }
}

fn verb_state(items: &[&str]) -> State {
    State {
        items: items.iter().map(|v| NextItem::Item(v.to_string())).collect(),
        sort_outcome: Some(sorted(true, "Richtig!", 50.0)),
        ..State::default()
    }
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
    MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    }
}

fn draw(app: &mut App) {
    let mut terminal = Terminal::new(TestBackend::new(100, 32)).expect("test terminal");
    terminal.draw(|f| ui(f, app)).expect("draw");
}

#[test]
fn multiple_choice_round_stops_after_three() {
    let (mut app, api) = app_with(quiz_state(5));
    app.navigate(Section::Quiz);
    assert_eq!(app.router.current(), Section::Quiz);

    for n in 1..=3 {
        let session = app.mc.as_ref().expect("running round");
        assert_eq!(session.counter, format!("{n}/3"));
        assert_eq!(
            session.feedback,
            format!("Choose the right answer! ({n}/3 words)")
        );
        app.choose_option(0);
        app.proceed();
    }

    let calls = api.borrow().calls.clone();
    let round = RoundId::Number(MC_ROUND);
    assert_eq!(
        calls.iter().filter(|c| matches!(c, Call::NextQuestion(_))).count(),
        3
    );
    assert_eq!(
        calls[calls.len() - 2..],
        [Call::FinishQuiz(round), Call::ListVocab(None)]
    );
    assert_eq!(alert_text(&app), Some("Multiple choice quiz complete!"));
    assert_eq!(app.router.current(), Section::Vocab);
    assert!(app.mc.is_none());
}

#[test]
fn mixed_answers_still_end_after_three() {
    let (mut app, api) = app_with(quiz_state(5));
    app.navigate(Section::Quiz);

    let outcomes = [
        (false, 40.0, None, "Wrong. | Accuracy now: 40.0%"),
        (
            false,
            85.0,
            Some(CardChange::Removed),
            "Wrong. | Accuracy now: 85.0% | Bronze card lost (accuracy below 90%).",
        ),
        (
            true,
            90.0,
            Some(CardChange::Created),
            "Correct! | Accuracy now: 90.0% | Bronze card unlocked!",
        ),
    ];
    for (n, (is_correct, accuracy, card_change, expected)) in outcomes.into_iter().enumerate() {
        api.borrow_mut().outcome = Some(AnswerOutcome {
            correct: is_correct,
            accuracy_percent: accuracy,
            card_change,
        });
        let session = app.mc.as_ref().expect("running round");
        assert_eq!(session.counter, format!("{}/3", n + 1));
        app.choose_option(2);
        assert_eq!(
            app.mc.as_ref().map(|s| s.feedback.as_str()),
            Some(expected)
        );
        app.proceed();
    }

    let api = api.borrow();
    assert_eq!(api.count(|c| matches!(c, Call::NextQuestion(_))), 3);
    assert_eq!(api.count(|c| matches!(c, Call::Answer(_))), 3);
    assert_eq!(
        api.count(|c| *c == Call::FinishQuiz(RoundId::Number(MC_ROUND))),
        1
    );
    assert_eq!(alert_text(&app), Some("Multiple choice quiz complete!"));
    assert_eq!(app.router.current(), Section::Vocab);
    assert!(app.mc.is_none());
}

#[test]
fn answer_locks_options_until_next() {
    let (mut app, api) = app_with(quiz_state(3));
    app.start_quiz_flow();

    app.proceed();
    assert_eq!(api.borrow().count(|c| matches!(c, Call::NextQuestion(_))), 1);

    app.choose_option(1);
    app.choose_option(2);
    let answers: Vec<Call> = api
        .borrow()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::Answer(_)))
        .cloned()
        .collect();
    assert_eq!(
        answers,
        vec![Call::Answer(McAnswer {
            quiz_round_id: RoundId::Number(MC_ROUND),
            vocab_entry_id: 1,
            selected_option: "Rose".into(),
        })]
    );

    let session = app.mc.as_ref().expect("running round");
    assert!(!session.options_enabled());
    assert!(session.can_proceed());
    assert_eq!(session.feedback, "Correct! | Accuracy now: 50.0%");
}

#[test]
fn card_changes_are_announced() {
    let (mut app, api) = app_with(quiz_state(2));
    api.borrow_mut().outcome = Some(AnswerOutcome {
        correct: true,
        accuracy_percent: 91.24,
        card_change: Some(CardChange::Created),
    });
    app.start_quiz_flow();
    app.choose_option(0);
    assert_eq!(
        app.mc.as_ref().map(|s| s.feedback.as_str()),
        Some("Correct! | Accuracy now: 91.2% | Bronze card unlocked!")
    );
}

#[test]
fn empty_quiz_shows_no_questions() {
    let (mut app, api) = app_with(quiz_state(0));
    app.start_quiz_flow();

    let session = app.mc.as_ref().expect("running round");
    assert_eq!(session.phase(), McPhase::NoQuestions);
    assert_eq!(session.feedback, "No more questions.");

    app.proceed();
    app.choose_option(0);
    let api = api.borrow();
    assert_eq!(api.count(|c| matches!(c, Call::NextQuestion(_))), 1);
    assert_eq!(api.count(|c| matches!(c, Call::Answer(_))), 0);
}

#[test]
fn failed_answer_reopens_options() {
    let (mut app, api) = app_with(quiz_state(3));
    api.borrow_mut().outcome = None;
    app.start_quiz_flow();
    app.choose_option(0);

    assert!(app.mc.as_ref().is_some_and(|s| s.options_enabled()));
    assert!(app.status.as_ref().is_some_and(|s| s.is_error));

    api.borrow_mut().outcome = Some(correct(100.0));
    app.choose_option(3);
    assert!(app.mc.as_ref().is_some_and(|s| s.can_proceed()));
}

#[test]
fn leaving_a_round_drops_it_silently() {
    let (mut app, api) = app_with(quiz_state(3));
    app.start_quiz_flow();
    app.navigate(Section::Cards);

    assert!(app.mc.is_none());
    assert_eq!(app.router.current(), Section::Cards);
    assert_eq!(api.borrow().calls.last(), Some(&Call::ListCards));
    assert_eq!(api.borrow().count(|c| matches!(c, Call::FinishQuiz(_))), 0);

    api.borrow_mut().items.push_back(NextItem::Item("amare".into()));
    app.start_sorting(SortingKind::Verbs);
    assert!(app.verbs.is_some());
    app.navigate(Section::Vocab);
    assert!(app.verbs.is_none());
    assert_eq!(api.borrow().count(|c| matches!(c, Call::AnswerSorting(..))), 0);
}

#[test]
fn verb_round_stops_after_three() {
    let (mut app, api) = app_with(verb_state(&["amare", "monere", "audire", "capere"]));
    app.navigate(Section::Sorting);
    assert_eq!(app.router.current(), Section::Sorting);

    for n in 1..=3 {
        let session = app.verbs.as_ref().expect("running round");
        assert_eq!(session.counter, format!("{n}/3"));
        app.drop_item(SortingKind::Verbs, 0);
        app.proceed();
    }

    let api = api.borrow();
    assert_eq!(api.count(|c| matches!(c, Call::NextSorting(..))), 3);
    assert_eq!(api.count(|c| matches!(c, Call::AnswerSorting(..))), 3);
    assert_eq!(api.calls.last(), Some(&Call::ListVocab(None)));
    assert_eq!(alert_text(&app), Some("Sorting quiz complete!"));
    assert_eq!(app.router.current(), Section::Vocab);
    assert!(app.verbs.is_none());
}

#[test]
fn drop_sends_category_and_marks_box() {
    let (mut app, api) = app_with(verb_state(&["amare"]));
    app.start_sorting(SortingKind::Verbs);
    app.drop_item(SortingKind::Verbs, 1);
    app.drop_item(SortingKind::Verbs, 0);

    let categories = AppConfig::default().quiz.verb_categories;
    let answers: Vec<Call> = api
        .borrow()
        .calls
        .iter()
        .filter(|c| matches!(c, Call::AnswerSorting(..)))
        .cloned()
        .collect();
    assert_eq!(
        answers,
        vec![Call::AnswerSorting(
            SortingKind::Verbs,
            SortAnswer {
                quizroundid: RoundId::Number(VERB_ROUND),
                item: SortItem::Verb("amare".into()),
                category: categories[1].clone(),
            }
        )]
    );

    let session = app.verbs.as_ref().expect("running round");
    assert_eq!(session.boxes()[1].label, format!("{} (Richtig!)", categories[1]));
    assert_eq!(session.boxes()[1].mark, Some(true));
    assert_eq!(session.feedback, "Richtig! 50.0%");
    assert!(session.can_proceed());
}

#[test]
fn noun_round_ends_on_server_message() {
    let (mut app, api) = app_with(State {
        items: [
            NextItem::Item("rosa".into()),
            NextItem::Exhausted("Quiz complete! All nouns covered.".into()),
        ]
        .into_iter()
        .collect(),
        sort_outcome: Some(sorted(false, "Falsch!", 0.0)),
        ..State::default()
    });
    app.navigate(Section::Nouns);
    app.drop_item(SortingKind::Nouns, 2);

    let session = app.nouns.as_ref().expect("running round");
    assert_eq!(session.boxes()[2].label, "Falsch!");
    assert_eq!(session.feedback, "Accuracy: 0.0");

    app.proceed();
    assert_eq!(alert_text(&app), Some("Quiz complete! All nouns covered."));
    assert_eq!(app.router.current(), Section::Vocab);
    assert!(app.nouns.is_none());
    assert_eq!(
        api.borrow().count(|c| *c == Call::NextSorting(SortingKind::Nouns, RoundId::Number(NOUN_ROUND))),
        2
    );
}

#[test]
fn number_keys_drop_on_boxes() {
    let (mut app, api) = app_with(verb_state(&["amare"]));
    app.start_sorting(SortingKind::Verbs);
    handle_key(&mut app, KeyEvent::new(KeyCode::Char('3'), KeyModifiers::NONE));

    let calls = api.borrow().calls.clone();
    assert!(matches!(
        calls.last(),
        Some(Call::AnswerSorting(SortingKind::Verbs, answer)) if answer.category == "i-Konjugation"
    ));
}

#[test]
fn dragging_the_word_onto_a_box_drops_it() {
    let (mut app, api) = app_with(verb_state(&["amare"]));
    app.start_sorting(SortingKind::Verbs);
    app.hits.token = Some(Rect::new(0, 0, 10, 3));
    app.hits.boxes = vec![Rect::new(0, 5, 10, 4), Rect::new(12, 5, 10, 4)];

    // released outside every box
    handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
    handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 50, 20));
    assert_eq!(api.borrow().count(|c| matches!(c, Call::AnswerSorting(..))), 0);

    // press outside the word
    handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 40, 1));
    handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 13, 6));
    assert_eq!(api.borrow().count(|c| matches!(c, Call::AnswerSorting(..))), 0);

    handle_mouse(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 1, 1));
    assert!(app.dragging);
    handle_mouse(&mut app, mouse(MouseEventKind::Up(MouseButton::Left), 13, 6));
    assert!(!app.dragging);
    assert_eq!(
        app.verbs.as_ref().and_then(|s| s.boxes()[1].mark),
        Some(true)
    );
}

#[test]
fn draw_records_hit_areas() {
    let (mut app, _api) = app_with(quiz_state(3));
    app.start_quiz_flow();
    draw(&mut app);
    assert_eq!(app.hits.options.len(), 4);
    assert!(app.hits.boxes.is_empty());

    let (mut app, _api) = app_with(verb_state(&["amare"]));
    app.start_sorting(SortingKind::Verbs);
    draw(&mut app);
    assert!(app.hits.token.is_some());
    assert_eq!(app.hits.boxes.len(), 5);
    assert!(app.hits.options.is_empty());
}

#[test]
fn every_section_draws() {
    let (mut app, _api) = app_with(State {
        vocab: sample_vocab(),
        cards: vec![Card {
            title: "amare".into(),
            german_translation: "lieben".into(),
            rarity: Some("bronze".into()),
            ..Card::default()
        }],
        ..quiz_state(3)
    });
    app.load_vocab();
    draw(&mut app);
    app.begin_edit(1);
    draw(&mut app);
    app.cancel_prompt();
    app.navigate(Section::Cards);
    assert_eq!(app.cards.cards().len(), 1);
    draw(&mut app);
    app.navigate(Section::Nouns);
    draw(&mut app);
}
