//! Drawing. Everything here reads the view-models on `App`; the only state
//! written back is the hit areas used for mouse input.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Wrap,
    },
    Frame,
};
use tui_textarea::TextArea;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{kind_of, App, Focus, FormField, HitAreas, Modal};
use crate::cards::{caption, details};
use crate::quiz::McPhase;
use crate::router::Section;
use crate::theme::Theme;
use crate::vocab::{SortColumn, VocabRow};

pub fn ui(f: &mut Frame, app: &mut App) {
    app.hits = HitAreas::default();
    // header + body + status + footer
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, v[0], app);
    match app.router.current() {
        Section::Vocab => draw_vocab(f, v[1], app),
        Section::Quiz => draw_quiz(f, v[1], app),
        Section::Sorting | Section::Nouns => draw_sorting(f, v[1], app),
        Section::Cards => draw_cards(f, v[1], app),
    }
    draw_status(f, v[2], app);
    draw_footer(f, v[3], app);
    if app.modal.is_some() {
        draw_modal(f, app);
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vert[1]);
    horiz[1]
}

/// Columns taken by the draggable word plus its border and padding.
pub fn token_width(item: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(item))
        .unwrap_or(u16::MAX)
        .saturating_add(4)
}

/// Cuts `s` to at most `max` terminal columns, marking the cut with `…`.
pub fn fit_width(s: &str, max: usize) -> String {
    if UnicodeWidthStr::width(s) <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

fn panel(title: String, th: &Theme) -> Block<'static> {
    Block::default()
        .title(Span::styled(title, Style::default().fg(th.accent)))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(th.muted))
}

fn round_counter(app: &App) -> Option<&str> {
    match app.router.current() {
        Section::Quiz => app.mc.as_ref().map(|s| s.counter.as_str()),
        section => kind_of(section)
            .and_then(|kind| app.sorting(kind))
            .map(|s| s.counter.as_str()),
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let bg = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(th.bar_bg));
    f.render_widget(bg, area);

    let current = app.router.current();
    let mut segs = vec![Span::styled(
        " Latin Vocab ",
        Style::default().fg(th.accent).add_modifier(Modifier::BOLD),
    )];
    for section in Section::ALL {
        let style = if section == current {
            Style::default()
                .fg(th.fg)
                .bg(th.selection_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(th.muted)
        };
        segs.push(Span::styled("|", Style::default().fg(th.muted)));
        segs.push(Span::styled(format!(" {} ", section.title()), style));
    }
    if let Some(counter) = round_counter(app).filter(|c| !c.is_empty()) {
        segs.push(Span::styled("  round ", Style::default().fg(th.muted)));
        segs.push(Span::styled(
            counter.to_string(),
            Style::default().fg(th.warn).add_modifier(Modifier::BOLD),
        ));
    }
    let para = Paragraph::new(Line::from(segs)).style(Style::default().bg(th.bar_bg).fg(th.fg));
    f.render_widget(para, area);
}

fn style_input(ta: &mut TextArea<'static>, title: &str, active: bool, th: &Theme) {
    let color = if active { th.accent } else { th.muted };
    ta.set_block(
        Block::default()
            .title(Span::styled(title.to_string(), Style::default().fg(color)))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color)),
    );
    ta.set_style(Style::default().fg(th.fg));
    ta.set_cursor_line_style(Style::default());
    ta.set_cursor_style(if active {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    });
}

fn draw_vocab(f: &mut Frame, area: Rect, app: &mut App) {
    let th = app.theme;
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(area);

    // type filter + search term
    let mut segs = vec![Span::styled(" type: ", Style::default().fg(th.muted))];
    for filter in app.vocab.filters() {
        let style = if *filter == app.vocab.filter {
            Style::default().fg(th.accent).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(th.muted)
        };
        segs.push(Span::styled(format!("[{}] ", filter.label()), style));
    }
    if let Some(term) = app.vocab.search.as_deref() {
        segs.push(Span::styled("  search: ", Style::default().fg(th.muted)));
        segs.push(Span::styled(term.to_string(), Style::default().fg(th.fg)));
    }
    f.render_widget(Paragraph::new(Line::from(segs)), v[0]);

    let header = Row::new(
        SortColumn::ALL
            .iter()
            .map(|c| Cell::from(format!("{}{}", c.header(), app.vocab.sort.indicator(*c))))
            .chain(std::iter::once(Cell::from("Card"))),
    )
    .style(Style::default().fg(th.accent).add_modifier(Modifier::BOLD));

    let visible = app.vocab.rows();
    let count = visible.len();
    let rows: Vec<Row> = visible
        .into_iter()
        .map(|e| {
            let acc_color = if e.has_bronze_card {
                th.bronze
            } else if e.accuracy_percent >= 90.0 {
                th.good
            } else {
                th.fg
            };
            let [latin, german, word_type, accuracy, card] = VocabRow::from_entry(e).cells;
            Row::new(vec![
                Cell::from(latin).style(Style::default().fg(th.fg).add_modifier(Modifier::BOLD)),
                Cell::from(german).style(Style::default().fg(th.fg)),
                Cell::from(word_type).style(Style::default().fg(th.muted)),
                Cell::from(accuracy).style(Style::default().fg(acc_color)),
                Cell::from(card),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(28),
        Constraint::Percentage(34),
        Constraint::Percentage(14),
        Constraint::Percentage(14),
        Constraint::Percentage(10),
    ];
    let block = panel(format!(" Vocabulary ({count}) "), &th);
    if count == 0 {
        let hint = Paragraph::new(Span::styled(
            "No vocabulary to show. Press [a] to add an entry.",
            Style::default().fg(th.muted),
        ))
        .block(block);
        f.render_widget(hint, v[1]);
    } else {
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(th.selection_bg)
                    .fg(th.fg)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut state = TableState::default().with_selected(app.vocab.selected_index());
        f.render_stateful_widget(table, v[1], &mut state);
    }

    // add form
    let h = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(v[2]);
    let editing = app.focus == Focus::Form;
    let field = app.form.field;
    style_input(
        &mut app.form.latin,
        " Latin ",
        editing && field == FormField::Latin,
        &th,
    );
    style_input(
        &mut app.form.german,
        " German ",
        editing && field == FormField::German,
        &th,
    );
    f.render_widget(&app.form.latin, h[0]);
    f.render_widget(&app.form.german, h[1]);
}

fn draw_quiz(f: &mut Frame, area: Rect, app: &mut App) {
    let th = app.theme;
    let block = panel(format!(" {} ", Section::Quiz.title()), &th);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(session) = app.mc.as_ref() else {
        let hint = Paragraph::new(Span::styled(
            "No round running. Press [m] to start one.",
            Style::default().fg(th.muted),
        ));
        f.render_widget(hint, inner);
        return;
    };

    let options: &[String] = session
        .current()
        .map(|q| q.options.as_slice())
        .unwrap_or_default();
    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(options.len() as u16),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    let word = session.current().map_or("", |q| q.latin_word.as_str());
    f.render_widget(
        Paragraph::new(Span::styled(
            word.to_string(),
            Style::default().fg(th.fg).add_modifier(Modifier::BOLD),
        )),
        v[0],
    );

    let enabled = session.options_enabled();
    let mut option_rects = Vec::with_capacity(options.len());
    for (i, option) in options.iter().enumerate() {
        let y = v[1].y + i as u16;
        if y >= v[1].bottom() {
            break;
        }
        let rect = Rect {
            x: v[1].x,
            y,
            width: v[1].width,
            height: 1,
        };
        let selected = i == session.cursor;
        let style = match (enabled, selected) {
            (true, true) => Style::default()
                .fg(th.fg)
                .bg(th.selection_bg)
                .add_modifier(Modifier::BOLD),
            (true, false) => Style::default().fg(th.fg),
            (false, true) => Style::default().fg(th.accent),
            (false, false) => Style::default().fg(th.muted),
        };
        let marker = if selected { "▸ " } else { "  " };
        let line = Line::from(vec![
            Span::styled(marker, Style::default().fg(th.accent)),
            Span::styled(format!("[{}] {}", i + 1, option), style),
        ]);
        f.render_widget(Paragraph::new(line), rect);
        option_rects.push(rect);
    }

    let feedback_color = match session.phase() {
        McPhase::NoQuestions => th.warn,
        McPhase::AnswerSubmitted if session.feedback.starts_with("Correct!") => th.good,
        McPhase::AnswerSubmitted if session.feedback.starts_with("Wrong.") => th.bad,
        _ => th.fg,
    };
    let mut lines = vec![Line::from(Span::styled(
        session.feedback.clone(),
        Style::default().fg(feedback_color),
    ))];
    if session.can_proceed() {
        lines.push(Line::from(Span::styled(
            "[Space] next question",
            Style::default().fg(th.accent),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), v[3]);

    app.hits.options = option_rects;
}

fn draw_sorting(f: &mut Frame, area: Rect, app: &mut App) {
    let th = app.theme;
    let section = app.router.current();
    let Some(kind) = kind_of(section) else {
        return;
    };
    let block = panel(format!(" {} ", section.title()), &th);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let Some(session) = app.sorting(kind) else {
        let hint = Paragraph::new(Span::styled(
            "No round running.",
            Style::default().fg(th.muted),
        ));
        f.render_widget(hint, inner);
        return;
    };

    let v = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .split(inner);

    // the draggable word
    let token = session.current().map(|item| {
        let width = token_width(item).min(v[0].width);
        let rect = Rect { width, ..v[0] };
        let border = if app.dragging {
            th.warn
        } else if session.can_drop() {
            th.accent
        } else {
            th.muted
        };
        let para = Paragraph::new(Span::styled(
            item.to_string(),
            Style::default().fg(th.fg).add_modifier(Modifier::BOLD),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(para, rect);
        rect
    });

    let boxes = session.boxes();
    let n = boxes.len().max(1) as u32;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(boxes.iter().map(|_| Constraint::Ratio(1, n)).collect::<Vec<_>>())
        .split(v[2]);
    let mut box_rects = Vec::with_capacity(boxes.len());
    for (i, (category, rect)) in boxes.iter().zip(cols.iter()).enumerate() {
        let border = match category.mark {
            Some(true) => th.good,
            Some(false) => th.bad,
            None if i == session.cursor && session.can_drop() => th.accent,
            None => th.muted,
        };
        let para = Paragraph::new(Span::styled(
            format!("[{}] {}", i + 1, category.label),
            Style::default().fg(th.fg),
        ))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border)),
        );
        f.render_widget(para, *rect);
        box_rects.push(*rect);
    }

    let mut lines = vec![Line::from(Span::styled(
        session.feedback.clone(),
        Style::default().fg(th.fg),
    ))];
    if session.can_proceed() {
        lines.push(Line::from(Span::styled(
            "[Space] next",
            Style::default().fg(th.accent),
        )));
    }
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), v[4]);

    app.hits.token = token;
    app.hits.boxes = box_rects;
}

fn draw_cards(f: &mut Frame, area: Rect, app: &mut App) {
    let th = app.theme;
    let cards = app.cards.cards();
    let block = panel(format!(" Cards ({}) ", cards.len()), &th);
    if cards.is_empty() {
        let hint = Paragraph::new(Span::styled(
            "No cards unlocked yet. Reach 90% accuracy on a word to earn a bronze card.",
            Style::default().fg(th.muted),
        ))
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(hint, area);
        return;
    }

    let items: Vec<ListItem> = cards
        .iter()
        .map(|card| {
            let mut lines = vec![Line::from(vec![
                Span::styled("🟤 ", Style::default().fg(th.bronze)),
                Span::styled(
                    caption(card),
                    Style::default().fg(th.fg).add_modifier(Modifier::BOLD),
                ),
            ])];
            if let Some(extra) = details(card) {
                lines.push(Line::from(Span::styled(
                    format!("   {extra}"),
                    Style::default().fg(th.muted),
                )));
            }
            if !card.image_url.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("   {}", card.image_url),
                    Style::default().fg(th.muted),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(th.selection_bg).fg(th.fg))
        .highlight_symbol("▸ ");
    let mut state = ListState::default().with_selected(Some(app.cards.scroll));
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let line = match &app.status {
        Some(status) => {
            let color = if status.is_error { th.bad } else { th.good };
            let stamp = format!(" {} ", status.at.format("%H:%M:%S"));
            let room = (area.width as usize).saturating_sub(stamp.len());
            Line::from(vec![
                Span::styled(stamp, Style::default().fg(th.muted)),
                Span::styled(fit_width(&status.text, room), Style::default().fg(color)),
            ])
        }
        None => Line::from(Span::styled(" ready", Style::default().fg(th.muted))),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn footer_tips(app: &App) -> &'static str {
    match app.router.current() {
        Section::Vocab if app.focus == Focus::Form => {
            " [Tab]switch field  [Enter]save  [Esc]back to list "
        }
        Section::Vocab => {
            " [q]quit  [m/s/n/c]quiz/verbs/nouns/cards  [j/k]move  [L/G/T/A]sort  [f]type  [/]search  [a]add  [e]edit  [d]delete  [r]reload "
        }
        Section::Quiz => " [q]quit  [1-9]/click answer  [j/k]+[Enter]choose  [Space]next  [v]vocabulary ",
        Section::Sorting | Section::Nouns => {
            " [q]quit  drag the word onto a box  [1-9]/[h/l]+[Enter]drop  [Space]next  [v]vocabulary "
        }
        Section::Cards => " [q]quit  [j/k]scroll  [v]vocabulary ",
    }
}

fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let th = app.theme;
    let bg = Block::default()
        .borders(Borders::NONE)
        .style(Style::default().bg(th.bar_bg));
    f.render_widget(bg, area);
    let tips = fit_width(footer_tips(app), area.width as usize);
    let help = Paragraph::new(Line::from(Span::styled(tips, Style::default().fg(th.muted))))
        .style(Style::default().bg(th.bar_bg));
    f.render_widget(help, area);
}

fn draw_modal(f: &mut Frame, app: &mut App) {
    let th = app.theme;
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);
    match app.modal.as_mut() {
        Some(Modal::Alert(message)) => {
            let text = vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(th.fg))),
                Line::from(""),
                Line::from(Span::styled("[Enter] OK", Style::default().fg(th.muted))),
            ];
            let para = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(panel(" Notice ".into(), &th));
            f.render_widget(para, area);
        }
        Some(Modal::Confirm { message, .. }) => {
            let text = vec![
                Line::from(Span::styled(message.clone(), Style::default().fg(th.warn))),
                Line::from(""),
                Line::from(Span::styled(
                    "[y] yes  [n] no",
                    Style::default().fg(th.muted),
                )),
            ];
            let para = Paragraph::new(text)
                .wrap(Wrap { trim: false })
                .block(panel(" Confirm ".into(), &th));
            f.render_widget(para, area);
        }
        Some(Modal::Prompt(prompt)) => {
            let block = panel(format!(" {} ", prompt.title), &th);
            let inner = block.inner(area);
            f.render_widget(block, area);
            let v = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Length(1),
                    Constraint::Min(0),
                ])
                .split(inner);
            style_input(&mut prompt.input, "", true, &th);
            f.render_widget(&prompt.input, v[0]);
            f.render_widget(
                Paragraph::new(Span::styled(
                    "[Enter] OK  [Esc] cancel",
                    Style::default().fg(th.muted),
                )),
                v[1],
            );
        }
        None => {}
    }
}
