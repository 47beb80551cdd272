use crate::app::App;
use crate::posts::group_by_author;
use crate::util::{sanitize_text, truncate_to_width};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Render the post list, one section per author.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let posts = app.store.snapshot();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(app.style("panel_border_focused"))
        .title(format!("Posts ({})", posts.len()));

    if posts.is_empty() {
        let placeholder = if app.is_fetching() {
            "Loading posts..."
        } else {
            "No posts"
        };
        let list = List::new([ListItem::new(Span::styled(placeholder, app.style("muted")))])
            .block(block);
        f.render_widget(list, area);
        return;
    }

    // Room for the title after borders and the two-space indent
    let title_width = area.width.saturating_sub(4) as usize;

    let grouped = group_by_author(&posts);
    let mut items = Vec::with_capacity(posts.len() + grouped.len());
    let mut selected_item = None;
    let mut row = 0;

    for (author_id, author_posts) in &grouped {
        items.push(ListItem::new(Line::from(Span::styled(
            format!("User {}", author_id),
            app.style("section_header"),
        ))));

        for post in author_posts {
            let style = if row == app.selected_row {
                selected_item = Some(items.len());
                app.style("post_selected")
            } else {
                app.style("post_normal")
            };
            let title = sanitize_text(&post.title);
            let title = truncate_to_width(&title, title_width).into_owned();
            items.push(ListItem::new(Line::from(Span::styled(
                format!("  {}", title),
                style,
            ))));
            row += 1;
        }
    }

    let mut state = ListState::default().with_selected(selected_item);
    let list = List::new(items).block(block);
    f.render_stateful_widget(list, area, &mut state);
}
