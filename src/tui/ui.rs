//! Screen layout: header on top, sidebar on the left, Q&A panel above the
//! input on the right. Overlays (form, confirm, alert) are drawn last.
//!
//! ```text
//! ┌──────────────────── header ────────────────────┐
//! ├─ sidebar ─┬─────────── qa panel ───────────────┤
//! │           │                                    │
//! │           ├─────────── input ──────────────────┤
//! └───────────┴────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::dialog::{render_alert, render_confirm};
use crate::tui::components::{Header, QaPanel, Sidebar};
use crate::tui::{Focus, TuiState};

const SIDEBAR_WIDTH: u16 = 34;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let theme = tui.theme;

    let [header_area, body_area] = Layout::vertical([Length(1), Min(0)]).areas(frame.area());
    let [sidebar_area, center_area] =
        Layout::horizontal([Length(SIDEBAR_WIDTH.min(body_area.width / 2)), Min(0)])
            .areas(body_area);
    let [panel_area, input_area] = Layout::vertical([Min(0), Length(3)]).areas(center_area);

    Header {
        health: app.health.as_deref(),
        user: app.current_user.as_ref().map(|u| u.label()),
        status_message: &app.status_message,
        theme: &theme,
    }
    .render(frame, header_area);

    Sidebar {
        state: &mut tui.sidebar,
        turns: &app.turns,
        documents: &app.documents,
        active_tab: app.active_tab,
        focused: tui.focus == Focus::Sidebar,
        theme: &theme,
    }
    .render(frame, sidebar_area);

    QaPanel {
        turn: app.active(),
        is_loading: app.is_loading,
        spinner_frame,
        focused: false,
        theme: &theme,
        scroll: &mut tui.qa_scroll,
    }
    .render(frame, panel_area);

    let overlay_open = tui.form.is_some() || app.confirm.is_some() || app.alert.is_some();
    tui.input_box.loading = app.is_loading;
    tui.input_box.focused = tui.focus == Focus::Input && !overlay_open;
    tui.input_box.render(frame, input_area);

    let area = frame.area();
    if let Some(form) = &tui.form {
        form.render(frame, area, &theme);
    }
    if let Some(confirm) = &app.confirm {
        render_confirm(frame, area, confirm, &theme);
    }
    if let Some(alert) = &app.alert {
        render_alert(frame, area, alert, &theme);
    }
}
