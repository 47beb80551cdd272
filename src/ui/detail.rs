//! Detail screen: the post text beside its tile grid, plus the label dialog.

use crate::app::{App, DetailScreen};
use crate::tiles::{resolve_asset, TileDialog, LABEL_CATALOG};
use crate::util::sanitize_text;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

/// Placeholder shown for a label with no known asset.
const MISSING_GLYPH: &str = "[?]";

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(detail) = app.detail.as_ref() else {
        let paragraph = Paragraph::new("No post selected")
            .block(Block::default().borders(Borders::ALL).title("Post"));
        f.render_widget(paragraph, area);
        return;
    };

    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_post(f, app, detail, halves[0]);
    render_tiles(f, app, detail, halves[1]);

    if let Some(dialog) = detail.selection.dialog() {
        render_dialog(f, app, dialog);
    }
}

fn render_post(f: &mut Frame, app: &App, detail: &DetailScreen, area: Rect) {
    let post = &detail.post;
    let mut lines = vec![
        Line::from(Span::styled(
            sanitize_text(&post.title).into_owned(),
            app.style("detail_title"),
        )),
        Line::from(""),
    ];
    // Bodies use literal newlines between sentences
    lines.extend(
        sanitize_text(&post.body)
            .lines()
            .map(|l| Line::from(Span::styled(l.to_string(), app.style("detail_body")))),
    );

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(app.style("panel_border"))
                .title(format!("Post {} by User {}", post.id, post.author_id)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

/// Draw the tiles as a two-column grid in ascending index order.
fn render_tiles(f: &mut Frame, app: &App, detail: &DetailScreen, area: Rect) {
    let outer = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border"))
        .title("Tiles");
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let tiles: Vec<(usize, &str)> = detail.tiles.iter().collect();
    let row_count = tiles.len().div_ceil(2).max(1);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Ratio(1, row_count as u32); row_count])
        .split(inner);

    let focused = detail
        .selection
        .active_index()
        .unwrap_or(detail.tile_cursor);

    for (row_area, pair) in rows.iter().zip(tiles.chunks(2)) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row_area);

        for (cell, &(index, label)) in cols.iter().zip(pair) {
            render_tile(f, app, *cell, index, label, index == focused);
        }
    }
}

fn render_tile(f: &mut Frame, app: &App, area: Rect, index: usize, label: &str, focused: bool) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let border_style = if focused {
        app.style("tile_border_focused")
    } else {
        app.style("tile_border")
    };

    let glyph = match resolve_asset(label) {
        Some(asset) => Span::styled(
            asset.glyph,
            Style::default()
                .fg(asset.color)
                .add_modifier(Modifier::BOLD),
        ),
        None => Span::styled(MISSING_GLYPH, app.style("tile_missing")),
    };

    // Center the two content lines vertically
    let inner_height = area.height.saturating_sub(2) as usize;
    let mut lines = vec![Line::from(""); inner_height.saturating_sub(2) / 2];
    lines.push(Line::from(glyph));
    lines.push(Line::from(label.to_string()));

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", index + 1)),
        );
    f.render_widget(paragraph, area);
}

/// Centered "Select an Image" popup listing the label catalog.
fn render_dialog(f: &mut Frame, app: &App, dialog: &TileDialog) {
    let area = f.area();

    // Catalog entries + tile line + blank + hint, plus borders
    let height = (LABEL_CATALOG.len() as u16 + 5).min(area.height.saturating_sub(2));
    let width = 40u16.min(area.width.saturating_sub(4));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let overlay = Rect::new(x, y, width, height);

    if overlay.width < 20 || overlay.height < 5 {
        return;
    }

    f.render_widget(Clear, overlay);

    let mut items = vec![
        ListItem::new(Span::styled(
            format!("Tile {}", dialog.index + 1),
            app.style("muted"),
        )),
        ListItem::new(""),
    ];
    items.extend(LABEL_CATALOG.iter().enumerate().map(|(i, label)| {
        if i == dialog.draft {
            ListItem::new(Span::styled(
                format!("> {}", label),
                app.style("dialog_option_selected"),
            ))
        } else {
            ListItem::new(Span::styled(
                format!("  {}", label),
                app.style("dialog_option"),
            ))
        }
    }));
    items.push(ListItem::new(Span::styled(
        "(Enter) Choose  (Esc) Cancel",
        app.style("muted"),
    )));

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(app.style("dialog_border"))
            .title(" Select an Image "),
    );
    f.render_widget(list, overlay);
}
