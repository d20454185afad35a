//! Bridges `tui-markdown` output, which is built on `ratatui-core` types, into the `ratatui`
//! text the rest of the UI renders.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui_core::style::{Color as CoreColor, Style as CoreStyle};

/// Renders a GraphQL description as styled text, layering markdown styling over `base`.
pub fn markdown_text(source: &str, base: Style) -> Text<'static> {
    let rendered = tui_markdown::from_str(source);
    let lines: Vec<Line<'static>> = rendered
        .lines
        .into_iter()
        .map(|line| {
            let line_style = base.patch(convert_style(line.style));
            let spans: Vec<Span<'static>> = line
                .spans
                .into_iter()
                .map(|span| {
                    Span::styled(
                        span.content.into_owned(),
                        line_style.patch(convert_style(span.style)),
                    )
                })
                .collect();
            Line::from(spans)
        })
        .collect();
    Text::from(lines)
}

fn convert_style(style: CoreStyle) -> Style {
    let mut converted = Style::default();
    if let Some(fg) = style.fg {
        converted = converted.fg(convert_color(fg));
    }
    if let Some(bg) = style.bg {
        converted = converted.bg(convert_color(bg));
    }
    converted
        .add_modifier(Modifier::from_bits_truncate(style.add_modifier.bits()))
        .remove_modifier(Modifier::from_bits_truncate(style.sub_modifier.bits()))
}

fn convert_color(color: CoreColor) -> Color {
    match color {
        CoreColor::Reset => Color::Reset,
        CoreColor::Black => Color::Black,
        CoreColor::Red => Color::Red,
        CoreColor::Green => Color::Green,
        CoreColor::Yellow => Color::Yellow,
        CoreColor::Blue => Color::Blue,
        CoreColor::Magenta => Color::Magenta,
        CoreColor::Cyan => Color::Cyan,
        CoreColor::Gray => Color::Gray,
        CoreColor::DarkGray => Color::DarkGray,
        CoreColor::LightRed => Color::LightRed,
        CoreColor::LightGreen => Color::LightGreen,
        CoreColor::LightYellow => Color::LightYellow,
        CoreColor::LightBlue => Color::LightBlue,
        CoreColor::LightMagenta => Color::LightMagenta,
        CoreColor::LightCyan => Color::LightCyan,
        CoreColor::White => Color::White,
        CoreColor::Rgb(r, g, b) => Color::Rgb(r, g, b),
        CoreColor::Indexed(idx) => Color::Indexed(idx),
    }
}
