use bracket_core::{BracketModel, BracketView};
use log::error;
use tui::backend::Backend;
use tui::layout::{Alignment, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::bracket::{BracketPane, EMPTY_SLOT};
use crate::state::loader::{ERROR_CHAR, LoadingState};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Bracket", "Details"];

static HELP: &[(&str, &str)] = &[
    ("q / Ctrl-C", "quit"),
    ("h j k l / arrows", "move selection"),
    ("Enter", "advance selected entry"),
    ("Backspace", "clear selected slot"),
    ("m", "cycle routing mode"),
    ("s", "toggle grid / elimination layout"),
    ("PgUp / PgDn", "scroll"),
    ("r", "reload snapshot"),
    ("1 / 2", "bracket / details tab"),
    ("\"", "toggle log pane"),
    ("f", "full screen"),
    ("?", "help"),
    ("Esc", "back"),
];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App, loading: LoadingState)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    let result = terminal.draw(|f| {
        layout.update(f.area(), app.settings.full_screen, app.state.show_logs);

        if !app.settings.full_screen {
            draw_tabs(f, layout.tab_bar, app);
            draw_status(f, layout.status, app);
        }

        match app.state.active_tab {
            MenuItem::Bracket => draw_bracket(f, layout.main, app),
            MenuItem::Details => draw_details(f, layout.main, app),
            MenuItem::Help => draw_help(f, layout.main),
        }

        if let Some(logs) = layout.logs {
            draw_logs(f, logs);
        }

        draw_loading_spinner(f, f.area(), app, loading);
    });

    if let Err(e) = result {
        error!("draw failed: {e}");
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Bracket => 0,
        MenuItem::Details => 1,
        MenuItem::Help => 0,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_bracket(f: &mut Frame, area: Rect, app: &mut App) {
    let bracket = &app.state.bracket;
    let title = if bracket.name.is_empty() {
        " Bracket ".to_string()
    } else {
        format!(" {} ", bracket.name)
    };
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    if !bracket.loaded {
        let msg = match app.state.last_error.as_deref() {
            Some(err) => format!("Bracket load failed:\n{err}"),
            None => "Loading bracket...".to_string(),
        };
        draw_placeholder(f, inner, &msg);
        return;
    }

    app.state.bracket.viewport = (inner.width, inner.height);
    f.render_widget(BracketPane::new(&app.state.bracket), inner);
}

fn draw_details(f: &mut Frame, area: Rect, app: &App) {
    let bracket = &app.state.bracket;
    let block = default_border(Color::White).title(" Details ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let config = &bracket.config;
    let shape = bracket
        .model
        .row_counts()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ");
    let filled = bracket.model.iter().filter(|(_, value)| value.is_some()).count();
    let (width, height) = BracketView::new(*config, ()).preferred_size(&bracket.model);
    let source = bracket
        .source
        .as_ref()
        .map_or_else(|| "built-in demo".to_string(), |p| p.display().to_string());

    let label = Style::default().fg(Color::DarkGray);
    let row = |name: &'static str, value: String| {
        Line::from(vec![Span::styled(format!("{name:<14}"), label), Span::raw(value)])
    };

    let lines = vec![
        row("source", source),
        row("strategy", bracket.strategy.to_string()),
        row("routing", config.routing_mode().to_string()),
        row("cell", format!("{} x {}", config.cell_width(), config.cell_height())),
        row("line", config.line_thickness().to_string()),
        row("gaps", format!("{} / {}", config.horizontal_gap(), config.vertical_gap())),
        row("origin pad", format!("{} / {}", config.origin_pad_x(), config.origin_pad_y())),
        row("columns", shape),
        row("filled slots", format!("{filled} / {}", bracket.model.cell_count())),
        row("drawing size", format!("{width} x {height}")),
        row(
            "selected",
            format!(
                "{} {}",
                bracket.selected,
                bracket.selected_value().map_or(EMPTY_SLOT, String::as_str)
            ),
        ),
    ];

    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:>18}  "), Style::default().fg(Color::Yellow)),
                Span::raw(*action),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(lines), inner);
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let bracket = &app.state.bracket;
    let dim = Style::default().fg(Color::DarkGray);
    let mut spans = vec![
        Span::styled(" mode ", dim),
        Span::raw(bracket.config.routing_mode().to_string()),
        Span::styled("  layout ", dim),
        Span::raw(bracket.strategy.to_string()),
        Span::styled("  at ", dim),
        Span::raw(bracket.selected.to_string()),
    ];
    if let Some(err) = app.state.last_error.as_deref() {
        spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red)));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let logs = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray));
    f.render_widget(logs, area);
}

fn draw_placeholder(f: &mut Frame, area: Rect, msg: &str) {
    f.render_widget(
        Paragraph::new(msg)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        area,
    );
}

fn draw_loading_spinner(f: &mut Frame, area: Rect, app: &App, loading: LoadingState) {
    if !loading.is_loading && loading.spinner_char != ERROR_CHAR {
        return;
    }
    let style = match loading.spinner_char {
        ERROR_CHAR => Style::default().fg(Color::Red),
        _ => Style::default().fg(Color::White),
    };
    let spinner = Paragraph::new(loading.spinner_char.to_string())
        .alignment(Alignment::Right)
        .style(style);
    let area = if app.settings.full_screen {
        Rect::new(area.width.saturating_sub(3), area.height.saturating_sub(2), 1, 1)
    } else {
        Rect::new(area.width.saturating_sub(11), 1, 1, 1)
    };
    f.render_widget(spinner, area);
}
