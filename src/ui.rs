use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Padding, Paragraph, Wrap};

use crate::app::App;
use crate::explorer::{Entry, ExplorerState, LinkTarget, NO_SCHEMA_TEXT, Page};
use crate::markdown::markdown_text;
use crate::theme::Theme;

const TEXT_PADDING: u16 = 1;
const STATUS_HEIGHT: u16 = 3;
const TITLE_BAR_HEIGHT: u16 = 3;
const LOADING_TEXT: &str = "Loading schema";
const STATUS_HELP_TEXT: &str =
    "Up/Down select | Enter open | Backspace back | Home root | / search | r refetch | q quit";

fn layout(screen: Rect) -> [Rect; 3] {
    Layout::vertical([
        Constraint::Length(TITLE_BAR_HEIGHT),
        Constraint::Min(0),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(screen)
}

fn body_text_area(screen: Rect) -> Rect {
    let [_title, body, _status] = layout(screen);
    body.inner(Margin::new(TEXT_PADDING, TEXT_PADDING))
}

/// Rendered page lines plus the index of the line holding the selected link.
struct PageLines {
    lines: Vec<Line<'static>>,
    selected_line: Option<usize>,
}

fn page_lines(page: &Page, selected: usize, theme: &Theme) -> PageLines {
    let mut lines = Vec::new();
    let text_style = Style::default().fg(theme.text_fg);
    let muted = Style::default().fg(theme.muted_fg);

    if let Some(signature) = page.signature.as_deref() {
        lines.push(Line::from(Span::styled(
            signature.to_string(),
            Style::default().fg(theme.type_fg),
        )));
        lines.push(Line::default());
    }
    if let Some(description) = page.description.as_deref() {
        lines.extend(markdown_text(description, text_style).lines);
        lines.push(Line::default());
    }
    for notice in &page.notices {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            muted.add_modifier(Modifier::ITALIC),
        )));
    }
    if !page.notices.is_empty() {
        lines.push(Line::default());
    }

    let mut link_idx = 0usize;
    let mut selected_line = None;
    for (section_idx, section) in page.sections.iter().enumerate() {
        if section_idx > 0 {
            lines.push(Line::default());
        }
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default()
                .fg(theme.active_fg)
                .add_modifier(Modifier::BOLD),
        )));
        for entry in &section.entries {
            let is_selected = entry.target.is_some() && link_idx == selected;
            if is_selected {
                selected_line = Some(lines.len());
            }
            lines.push(entry_line(entry, is_selected, theme));
            if let Some(summary) = entry.summary.as_deref() {
                lines.push(Line::from(Span::styled(format!("    {summary}"), muted)));
            }
            if entry.target.is_some() {
                link_idx += 1;
            }
        }
    }
    if page.sections.is_empty() && page.description.is_none() && page.signature.is_none() {
        lines.push(Line::from(Span::styled("Nothing to show.", muted)));
    }

    PageLines {
        lines,
        selected_line,
    }
}

fn entry_line(entry: &Entry, selected: bool, theme: &Theme) -> Line<'static> {
    let label_fg = match entry.target {
        Some(LinkTarget::Type(_)) => theme.type_fg,
        Some(LinkTarget::Field(_)) => theme.field_fg,
        Some(LinkTarget::InputValue(_)) => theme.arg_fg,
        None => theme.text_fg,
    };
    let mut label_style = Style::default().fg(label_fg);
    if selected {
        label_style = label_style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
    }
    if entry.deprecated {
        label_style = label_style.add_modifier(Modifier::CROSSED_OUT);
    }
    Line::from(vec![
        Span::styled(
            if selected { "> " } else { "  " },
            Style::default().fg(theme.muted_fg),
        ),
        Span::styled(entry.label.clone(), label_style),
        Span::styled(entry.detail.clone(), Style::default().fg(theme.muted_fg)),
    ])
}

fn wrapped_offsets(lines: &[Line<'_>], width: u16) -> Vec<u16> {
    let mut offsets = Vec::with_capacity(lines.len() + 1);
    let mut total = 0u16;
    offsets.push(total);
    for line in lines {
        let height = Paragraph::new(line.clone())
            .wrap(Wrap { trim: false })
            .line_count(width);
        total = total.saturating_add(u16::try_from(height).unwrap_or(u16::MAX));
        offsets.push(total);
    }
    offsets
}

pub fn max_scroll(screen: Rect, app: &App) -> u16 {
    let area = body_text_area(screen);
    let Some(page) = app.current_page() else {
        return 0;
    };
    if area.width < 1 || area.height < 1 {
        return 0;
    }
    let rendered = page_lines(&page, app.selected(), &Theme::default());
    let offsets = wrapped_offsets(&rendered.lines, area.width);
    let total = offsets.last().copied().unwrap_or(0);
    total.saturating_sub(area.height)
}

/// The scroll offset to draw with: the app's own offset, moved just enough to keep the
/// selected link on screen while the selection drives scrolling, and clamped to the content.
pub fn visible_scroll(screen: Rect, app: &App) -> u16 {
    let max = max_scroll(screen, app);
    let mut scroll = app.scroll().min(max);
    if !app.follows_selection() {
        return scroll;
    }
    let area = body_text_area(screen);
    let Some(page) = app.current_page() else {
        return scroll;
    };
    let rendered = page_lines(&page, app.selected(), &Theme::default());
    let Some(selected_line) = rendered.selected_line else {
        return scroll;
    };
    let offsets = wrapped_offsets(&rendered.lines, area.width);
    let top = offsets[selected_line];
    let bottom = offsets[selected_line + 1];
    if top < scroll {
        scroll = top;
    } else if bottom > scroll.saturating_add(area.height) {
        scroll = bottom.saturating_sub(area.height);
    }
    scroll.min(max)
}

pub fn render(frame: &mut Frame, app: &App, theme: &Theme) {
    let [title_area, body, status] = layout(frame.area());

    render_title_bar(frame, title_area, app, theme);

    frame.render_widget(
        Block::default().style(Style::default().bg(theme.panel_bg)),
        body,
    );
    match app.explorer_state() {
        ExplorerState::Loading => {
            render_center_overlay(frame, body, &loading_text(app.ticks), theme.muted_fg, theme)
        }
        ExplorerState::Error(message) => render_error_panel(frame, body, message, theme),
        ExplorerState::Empty => render_error_panel(frame, body, NO_SCHEMA_TEXT, theme),
        ExplorerState::Invalid(message) => render_error_panel(
            frame,
            body,
            &format!("Schema is invalid: {message}"),
            theme,
        ),
        ExplorerState::Ready(_) => render_page(frame, body, app, theme),
    }

    let help = Paragraph::new(status_line_text(app))
        .style(Style::default().bg(theme.status_bg).fg(theme.muted_fg))
        .block(
            Block::default()
                .style(Style::default().bg(theme.status_bg))
                .padding(Padding::uniform(TEXT_PADDING)),
        );
    frame.render_widget(help, status);
}

fn render_title_bar(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let nav = app.nav_stack();
    let mut spans = Vec::new();
    if let Some(parent) = nav.parent() {
        spans.push(Span::styled(
            format!("< {}", parent.name),
            Style::default().fg(theme.muted_fg),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(
        nav.current().name.clone(),
        Style::default()
            .fg(theme.active_fg)
            .add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(Line::from(spans))
            .style(Style::default().bg(theme.title_bg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.title_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn render_page(frame: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    let Some(page) = app.current_page() else {
        return;
    };
    let rendered = page_lines(&page, app.selected(), theme);
    frame.render_widget(
        Paragraph::new(rendered.lines)
            .style(Style::default().bg(theme.panel_bg).fg(theme.text_fg))
            .wrap(Wrap { trim: false })
            .scroll((app.scroll(), 0))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.panel_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn render_error_panel(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    frame.render_widget(
        Paragraph::new(message.to_string())
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(theme.panel_bg).fg(theme.error_fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.panel_bg))
                    .padding(Padding::uniform(TEXT_PADDING)),
            ),
        area,
    );
}

fn render_center_overlay(frame: &mut Frame, area: Rect, text: &str, fg: Color, theme: &Theme) {
    let width = 32u16.min(area.width.saturating_sub(2)).max(20).min(area.width);
    let height = 3u16.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);
    frame.render_widget(Clear, overlay);
    frame.render_widget(
        Paragraph::new(text.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg))
            .block(
                Block::default()
                    .style(Style::default().bg(theme.overlay_bg))
                    .padding(Padding::uniform(1)),
            ),
        overlay,
    );
}

fn loading_text(ticks: u64) -> String {
    format!("{LOADING_TEXT} {}", loading_dots(ticks))
}

fn loading_dots(ticks: u64) -> &'static str {
    const FRAMES: [&str; 6] = ["[   ]", "[.  ]", "[.. ]", "[...]", "[ ..]", "[  .]"];
    FRAMES[((ticks / 2) as usize) % FRAMES.len()]
}

fn status_line_text(app: &App) -> String {
    if let Some(query) = app.search_query() {
        return format!("Search: {query}_ | Esc clear | Enter open");
    }
    if app.source_label().is_empty() {
        STATUS_HELP_TEXT.to_string()
    } else {
        format!("{STATUS_HELP_TEXT} | {}", app.source_label())
    }
}

#[cfg(test)]
#[path = "../tests/unit/ui_tests.rs"]
mod tests;
