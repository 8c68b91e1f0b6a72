//! # TUI Rendering Logic
//!
//! This module draws the whole screen from a page snapshot: the research form
//! on top, the upload form below it, then the results area and a key hint bar.

use crate::app::{App, Focus};
use ratatui::{
    prelude::*,
    widgets::{
        block::{Position, Title},
        Block, Borders, Paragraph, Wrap,
    },
};
use researchdesk::page::{Page, SelectList};

const LABEL_WIDTH: u16 = 24;

/// The main rendering function.
pub fn ui(frame: &mut Frame, app: &App, page: &Page) {
    let research_height = if page.deep_research.visible { 9 } else { 6 };
    let main_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(research_height), // Research form
            Constraint::Length(5),               // Upload form
            Constraint::Min(0),                  // Results
            Constraint::Length(1),               // Key hints
        ])
        .split(frame.size());

    render_research_form(frame, app, page, main_layout[0]);
    render_upload_form(frame, app, page, main_layout[1]);
    render_results(frame, app, page, main_layout[2]);
    render_hints(frame, main_layout[3]);
}

fn field_line<'a>(app: &App, focus: Focus, label: &'a str, value: String) -> Line<'a> {
    let style = if app.focus == focus {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    Line::from(vec![
        Span::styled(format!("{label:<width$}", width = LABEL_WIDTH as usize), style),
        Span::raw(value),
    ])
}

fn select_text(list: &SelectList) -> String {
    let selected = list
        .selected_index()
        .and_then(|i| list.options().get(i).map(|option| (i, option)));
    match selected {
        Some((index, option)) => {
            format!("< {} >  ({}/{})", option.label, index + 1, list.len())
        }
        None => match list.options().first() {
            Some(placeholder) => format!("[{}]", placeholder.label),
            None => "(none)".to_string(),
        },
    }
}

/// Places the terminal cursor at the end of the focused text input.
fn place_cursor(frame: &mut Frame, inner: Rect, row: u16, text: &str) {
    let typed = u16::try_from(text.chars().count()).unwrap_or(u16::MAX);
    let x = inner.x.saturating_add(LABEL_WIDTH).saturating_add(typed);
    frame.set_cursor(x.min(inner.right().saturating_sub(1)), inner.y + row);
}

fn render_research_form(frame: &mut Frame, app: &App, page: &Page, area: Rect) {
    let block = Block::default().title("RESEARCH").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let checkbox = if page.deep_research.checked { "[x]" } else { "[ ]" };
    let mut lines = vec![
        field_line(app, Focus::Task, "Task", page.task.clone()),
        field_line(app, Focus::Model, "Model", select_text(&page.models)),
        field_line(
            app,
            Focus::KnowledgeBase,
            "Knowledge base",
            select_text(&page.knowledge_bases),
        ),
        field_line(app, Focus::DeepResearch, "Deep research", checkbox.to_string()),
    ];
    if page.deep_research.visible {
        let panel = &page.deep_research;
        lines.push(field_line(
            app,
            Focus::MaxIterations,
            "  Max iterations",
            panel.max_iterations.clone(),
        ));
        lines.push(field_line(
            app,
            Focus::MaxSearchResults,
            "  Max search results",
            panel.max_search_results_per_query.clone(),
        ));
        lines.push(field_line(
            app,
            Focus::MaxContentResults,
            "  Max content results",
            panel.max_content_results_per_query.clone(),
        ));
    }
    frame.render_widget(Paragraph::new(lines), inner);

    let cursor = match app.focus {
        Focus::Task => Some((0, page.task.as_str())),
        Focus::MaxIterations => Some((4, page.deep_research.max_iterations.as_str())),
        Focus::MaxSearchResults => Some((
            5,
            page.deep_research.max_search_results_per_query.as_str(),
        )),
        Focus::MaxContentResults => Some((
            6,
            page.deep_research.max_content_results_per_query.as_str(),
        )),
        _ => None,
    };
    if let Some((row, text)) = cursor {
        place_cursor(frame, inner, row, text);
    }
}

fn render_upload_form(frame: &mut Frame, app: &App, page: &Page, area: Rect) {
    let block = Block::default().title("UPLOAD").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = vec![
        field_line(app, Focus::UploadPath, "File", app.upload_path.clone()),
        field_line(
            app,
            Focus::UploadKnowledgeBase,
            "Knowledge base",
            page.upload.knowledge_base.clone(),
        ),
        Line::from(Span::styled(
            page.upload.status.clone(),
            Style::default().fg(Color::Cyan),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);

    match app.focus {
        Focus::UploadPath => place_cursor(frame, inner, 0, &app.upload_path),
        Focus::UploadKnowledgeBase => {
            place_cursor(frame, inner, 1, &page.upload.knowledge_base)
        }
        _ => {}
    }
}

/// The report is shown as plain text, exactly as received. Sources and cost
/// of the last report go in the bottom border.
fn render_results(frame: &mut Frame, app: &App, page: &Page, area: Rect) {
    let title = match &page.last_research_id {
        Some(id) => format!("RESULTS ({id})"),
        None => "RESULTS".to_string(),
    };
    let mut block = Block::default().title(title).borders(Borders::ALL);
    if let Some(info) = &page.last_research_information {
        let mut footer = format!("{} sources", info.source_urls.len());
        if let Some(cost) = info.research_costs {
            footer.push_str(&format!(", cost ${cost:.4}"));
        }
        block = block.title(Title::from(footer).position(Position::Bottom));
    }
    let results = Paragraph::new(Text::raw(page.results.as_str()))
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.results_scroll, 0));
    frame.render_widget(results, area);
}

fn render_hints(frame: &mut Frame, area: Rect) {
    let hints = Paragraph::new(
        "Tab/Shift-Tab: move  Up/Down: choose  Space: toggle  Enter: submit  PgUp/PgDn: scroll results  Ctrl-R: reload knowledge bases  Esc: quit",
    )
    .style(Style::default().fg(Color::White).bg(Color::DarkGray));
    frame.render_widget(hints, area);
}
