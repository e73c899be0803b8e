//! Drawing explorer views with ratatui

use crate::keymap::{KeyMode, KeyState, HELP};
use anyhow::{Context, Result};
use objexplore::classify::MemberKind;
use objexplore::filter::{FilterState, Visibility};
use objexplore::view::{Pager, Preview, ViewState, VisibleMember};
use objexplore::Renderer;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style, Stylize};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::{Frame, Terminal};
use std::rc::Rc;

const NAME_COLUMN_MAX: usize = 32;
const MATCH_STYLE: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
const STATUS_COLOR: Color = Color::Yellow;
const HINT_COLOR: Color = Color::DarkGray;

/// Rows of the member list for a terminal `height` rows tall
///
/// Header and footer take one row each, the list border two more.
pub fn list_height(height: u16) -> usize {
    usize::from(height.saturating_sub(4)).max(1)
}

/// Renders views onto a ratatui terminal
pub struct TuiRenderer<B: Backend> {
    terminal: Terminal<B>,
    keys: Rc<KeyState>,
}

impl<B: Backend> TuiRenderer<B> {
    pub fn new(terminal: Terminal<B>, keys: Rc<KeyState>) -> Self {
        Self { terminal, keys }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }
}

impl<B: Backend> Renderer for TuiRenderer<B> {
    fn render(&mut self, view: &ViewState) -> Result<()> {
        let page = self.viewport_height();
        self.keys.observe(view, page);
        let keys = &self.keys;
        self.terminal
            .draw(|frame| draw(frame, view, keys))
            .context("failed to draw to the terminal")?;
        Ok(())
    }

    fn viewport_height(&self) -> usize {
        self.terminal
            .size()
            .map(|size| list_height(size.height))
            .unwrap_or(1)
    }
}

/// Draw one frame
pub fn draw(frame: &mut Frame<'_>, view: &ViewState, keys: &KeyState) {
    if let Some(pager) = &view.pager {
        draw_pager(frame, pager);
        return;
    }

    let [header, body, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(3),
        Constraint::Length(1),
    ])
    .areas(frame.area());
    let [list_area, preview_area] =
        Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)]).areas(body);

    frame.render_widget(Paragraph::new(header_line(view)), header);
    draw_members(frame, view, list_area);
    draw_preview(frame, view.preview.as_ref(), preview_area);
    frame.render_widget(Paragraph::new(footer_line(view, keys)), footer);

    if keys.mode() == KeyMode::Stack {
        draw_stack(frame, view, keys.stack_cursor());
    }
    if keys.help_visible() {
        draw_help(frame);
    }
}

fn header_line(view: &ViewState) -> Line<'static> {
    Line::from(vec![
        Span::styled(view.dotpath.clone(), Style::new().add_modifier(Modifier::BOLD)),
        Span::raw("  "),
        Span::styled(view.type_name.clone(), Style::new().fg(Color::Cyan)),
        Span::raw("  "),
        Span::styled(filter_summary(&view.filter), Style::new().fg(HINT_COLOR)),
    ])
}

fn filter_summary(filter: &FilterState) -> String {
    let mut parts = vec![match filter.visibility {
        Visibility::PublicOnly => "public".to_string(),
        Visibility::All => "all".to_string(),
    }];
    if !filter.kinds.is_all() {
        let kinds: Vec<String> = filter.kinds.iter().map(|k| k.to_string()).collect();
        parts.push(kinds.join("+"));
    }
    if let Some(pattern) = &filter.name_pattern {
        parts.push(format!("~{pattern}"));
    }
    format!("[{}]", parts.join(" "))
}

fn kind_style(kind: MemberKind) -> Style {
    match kind {
        MemberKind::Data => Style::new(),
        MemberKind::Property => Style::new().fg(Color::Cyan),
        MemberKind::Method => Style::new().fg(Color::Green),
        MemberKind::Class => Style::new().fg(Color::Yellow),
        MemberKind::Module => Style::new().fg(Color::Magenta),
        MemberKind::Dunder => Style::new().fg(Color::DarkGray),
    }
}

fn member_line(member: &VisibleMember, name_width: usize) -> Line<'static> {
    let style = if member.accessible {
        kind_style(member.kind)
    } else {
        Style::new().fg(Color::Red)
    };

    let name = member.name.as_str();
    let mut spans = match member.highlight {
        Some((start, end)) => vec![
            Span::styled(name[..start].to_string(), style),
            Span::styled(name[start..end].to_string(), MATCH_STYLE),
            Span::styled(name[end..].to_string(), style),
        ],
        None => vec![Span::styled(name.to_string(), style)],
    };

    let padding = name_width.saturating_sub(name.chars().count()) + 2;
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(
        member.type_family.clone(),
        Style::new().fg(HINT_COLOR),
    ));
    spans.push(Span::raw("  "));
    spans.push(Span::raw(member.repr.clone()));
    Line::from(spans)
}

fn draw_members(frame: &mut Frame<'_>, view: &ViewState, area: Rect) {
    let name_width = view
        .members
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .min(NAME_COLUMN_MAX);

    let mut title = format!(" {} members ", view.members.len());
    if let Some(overflow) = view.overflow {
        title = format!(" {} of {} members ", overflow.kept, overflow.total);
    }

    let items: Vec<ListItem> = view
        .members
        .iter()
        .map(|m| ListItem::new(member_line(m, name_width)))
        .collect();
    let list = List::new(items)
        .block(Block::bordered().title(title))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

    let mut state = ListState::default()
        .with_selected(view.selected)
        .with_offset(view.scroll_offset);
    frame.render_stateful_widget(list, area, &mut state);
}

fn preview_text(preview: &Preview) -> Text<'static> {
    let mut lines = vec![Line::from(vec![
        Span::styled(preview.name.clone(), kind_style(preview.kind).bold()),
        Span::raw(format!("  {} · {}", preview.kind, preview.type_family)),
    ])];
    if let Some(signature) = &preview.signature {
        lines.push(Line::styled(signature.clone(), Style::new().fg(Color::Green)));
    }
    if let Some(length) = preview.length {
        lines.push(Line::raw(format!("len {length}")));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(preview.repr.clone()));
    if let Some(error) = &preview.error {
        lines.push(Line::raw(""));
        lines.push(Line::styled(error.clone(), Style::new().fg(Color::Red)));
    }
    if let Some(doc) = &preview.docstring {
        lines.push(Line::raw(""));
        lines.extend(doc.lines().map(|l| Line::styled(l.to_string(), Style::new().italic())));
    }
    if preview.descendable {
        lines.push(Line::raw(""));
        lines.push(Line::styled("→ explore", Style::new().fg(HINT_COLOR)));
    }
    Text::from(lines)
}

fn draw_preview(frame: &mut Frame<'_>, preview: Option<&Preview>, area: Rect) {
    let text = preview.map(preview_text).unwrap_or_default();
    let paragraph = Paragraph::new(text)
        .block(Block::bordered().title(" preview "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn footer_line(view: &ViewState, keys: &KeyState) -> Line<'static> {
    match keys.mode() {
        KeyMode::Search => {
            return Line::from(vec![
                Span::styled("/", MATCH_STYLE),
                Span::raw(view.search_query.clone()),
                Span::styled(
                    format!("  {} matches", view.highlighted_matches.len()),
                    Style::new().fg(HINT_COLOR),
                ),
            ]);
        }
        KeyMode::NameFilter => {
            return Line::from(vec![
                Span::styled("name: ", MATCH_STYLE),
                Span::raw(view.filter.name_pattern.clone().unwrap_or_default()),
                Span::styled(
                    format!("  {} shown", view.members.len()),
                    Style::new().fg(HINT_COLOR),
                ),
            ]);
        }
        KeyMode::Stack => {
            return Line::styled("Enter jump back  Esc cancel", Style::new().fg(HINT_COLOR));
        }
        KeyMode::Normal => {}
    }
    match &view.status {
        Some(status) => Line::styled(status.to_string(), Style::new().fg(STATUS_COLOR)),
        None => Line::styled("? help  q quit", Style::new().fg(HINT_COLOR)),
    }
}

/// Centered area `height` rows tall and `percent` of the width
fn overlay_area(frame: &Frame<'_>, height: usize, percent: u16) -> Rect {
    let height = u16::try_from(height).unwrap_or(u16::MAX);
    let [area] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(frame.area());
    let [area] = Layout::horizontal([Constraint::Percentage(percent)])
        .flex(Flex::Center)
        .areas(area);
    area
}

fn draw_stack(frame: &mut Frame<'_>, view: &ViewState, cursor: usize) {
    let items: Vec<ListItem> = view
        .breadcrumb
        .iter()
        .enumerate()
        .map(|(depth, label)| ListItem::new(format!("{}{label}", "  ".repeat(depth))))
        .collect();
    let area = overlay_area(frame, items.len() + 2, 60);
    let list = List::new(items)
        .block(Block::bordered().title(" path "))
        .highlight_style(Style::new().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(cursor.min(view.depth())));

    frame.render_widget(Clear, area);
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_pager(frame: &mut Frame<'_>, pager: &Pager) {
    let [body, footer] =
        Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(frame.area());
    let lines: Vec<Line> = pager
        .lines
        .iter()
        .skip(pager.scroll)
        .map(|l| Line::raw(l.clone()))
        .collect();
    let title = format!(" {} ", pager.title);
    let position = format!(
        "line {} of {}  j/k scroll  q close",
        pager.scroll + 1,
        pager.lines.len()
    );

    frame.render_widget(
        Paragraph::new(lines)
            .block(Block::bordered().title(title))
            .wrap(Wrap { trim: false }),
        body,
    );
    frame.render_widget(
        Paragraph::new(Line::styled(position, Style::new().fg(HINT_COLOR))),
        footer,
    );
}

fn draw_help(frame: &mut Frame<'_>) {
    let key_width = HELP.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    let lines: Vec<Line> = HELP
        .iter()
        .map(|(keys, action)| {
            Line::from(vec![
                Span::styled(format!("{keys:<key_width$}"), Style::new().fg(Color::Cyan)),
                Span::raw("  "),
                Span::raw(*action),
            ])
        })
        .collect();

    let area = overlay_area(frame, lines.len() + 2, 80);

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title(" keys ")),
        area,
    );
}
