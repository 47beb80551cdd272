use crate::app::{App, View};
use ratatui::{layout::Rect, widgets::Paragraph, Frame};
use std::borrow::Cow;

/// Spinner frames, advanced by the loop tick while a fetch is in flight.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if app.is_fetching() {
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        Cow::Owned(format!("{} Fetching posts...", frame))
    } else if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.is_dialog_open() {
        Cow::Borrowed("[h/l]choose label [Enter]apply [Esc]cancel")
    } else {
        match app.view {
            View::List => Cow::Borrowed("[j/k]move [Enter]open [r]efresh [T]heme [?]help [q]uit"),
            View::Detail => Cow::Borrowed("[j/k]tile [Enter/1-4]edit tile [b]ack [?]help [q]uit"),
        }
    };

    let paragraph = Paragraph::new(text).style(app.style("status_bar"));
    f.render_widget(paragraph, area);
}
