//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Routing
//!
//! Each key goes to the first layer that claims it:
//!
//! 1. Ctrl+C quits from anywhere
//! 2. an open alert swallows any key and closes
//! 3. an open confirmation takes y/Enter or n/Esc
//! 4. an open form dialog takes everything else
//! 5. global shortcuts (Ctrl+U, Ctrl+K, scrolling)
//! 6. the focused pane (input or sidebar); Tab and Esc move focus
//!
//! ## Redraw Strategy
//!
//! - **Loading**: draws every ~80ms so the spinner animates.
//! - **Idle**: sleeps up to 500ms, only redraws on events or backend results.

mod component;
mod components;
mod event;
mod theme;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use tui_scrollview::ScrollViewState;

use crate::api::{ApiClient, QaBackend};
use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::effect::perform;
use crate::core::state::{App, ModalKind};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    FormEvent, FormState, InputBox, InputEvent, SidebarEvent, SidebarState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::theme::Theme;

/// Which pane receives keys when no overlay is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Input,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub(crate) struct TuiState {
    pub focus: Focus,
    pub theme: Theme,
    pub input_box: InputBox,
    pub sidebar: SidebarState,
    pub qa_scroll: ScrollViewState,
    /// Open form; mirrors `App::modal`.
    pub form: Option<FormState>,
    /// Turn last shown in the panel, to reset scrolling on change.
    last_active_turn: Option<usize>,
}

impl TuiState {
    pub fn new() -> Self {
        Self {
            focus: Focus::Input, // User expects to type immediately
            theme: Theme::default(),
            input_box: InputBox::new(),
            sidebar: SidebarState::new(),
            qa_scroll: ScrollViewState::default(),
            form: None,
            last_active_turn: None,
        }
    }

    /// Bring presentation state in line with the app after an update.
    fn sync(&mut self, app: &App) {
        match &app.modal {
            None => self.form = None,
            Some(kind) => {
                if self.form.as_ref().map(|f| &f.kind) != Some(kind) {
                    let user = app.current_user.as_ref();
                    self.form = Some(FormState::for_modal(kind.clone(), user));
                }
            }
        }

        if app.active_turn != self.last_active_turn {
            self.last_active_turn = app.active_turn;
            self.qa_scroll.scroll_to_top();
            self.sidebar.select_turn(app.active_turn);
        }
        self.sidebar.clamp(app.turns.len(), app.documents.len());
    }
}

impl Default for TuiState {
    fn default() -> Self {
        Self::new()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)?;
        info!("Terminal modes enabled (mouse, bracketed paste)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture, DisableBracketedPaste);
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    info!("Using API base URL {}", config.base_url);
    let backend: Arc<dyn QaBackend> = Arc::new(ApiClient::new(config.base_url, config.timeout));
    let mut app = App::new(backend, config.user_id);
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    dispatch(&mut app, Action::Startup, &tx);

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        tui.sync(&app);

        let animating = app.is_loading;
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        // Short poll while animating (~12fps), long when idle
        let timeout = if animating {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };
        let first_event = poll_event_timeout(timeout);
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if handle_event(&mut app, &mut tui, event, &tx) {
                should_quit = true;
                break;
            }
            // Form contents depend on the modal the last key may have opened
            tui.sync(&app);
        }
        if should_quit {
            break;
        }

        // Handle results from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            dispatch(&mut app, action, &tx);
        }
    }

    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns `true` when the app should exit.
fn handle_event(
    app: &mut App,
    tui: &mut TuiState,
    event: TuiEvent,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match event {
        TuiEvent::Resize => return false,
        TuiEvent::ForceQuit => return dispatch(app, Action::Quit, tx),
        _ => {}
    }

    if app.alert.is_some() {
        return dispatch(app, Action::DismissAlert, tx);
    }

    if app.confirm.is_some() {
        let action = match event {
            TuiEvent::InputChar('y' | 'Y') | TuiEvent::Submit => Action::ConfirmAccepted,
            TuiEvent::InputChar('n' | 'N') | TuiEvent::Escape => Action::ConfirmDismissed,
            _ => return false,
        };
        return dispatch(app, action, tx);
    }

    if let Some(form) = tui.form.as_mut() {
        let Some(form_event) = form.handle_event(&event) else {
            return false;
        };
        let action = match form_event {
            FormEvent::Cancel => Action::CloseModal,
            FormEvent::Submit => match &form.kind {
                ModalKind::Upload => Action::CreateDocument(form.document_draft()),
                ModalKind::Account => Action::EnsureUser(form.user_draft()),
                ModalKind::AddChunk { document_id, .. } => Action::AddChunk {
                    document_id: document_id.clone(),
                    text: form.chunk_text(),
                },
            },
        };
        return dispatch(app, action, tx);
    }

    match event {
        TuiEvent::OpenUpload => return dispatch(app, Action::OpenModal(ModalKind::Upload), tx),
        TuiEvent::OpenAccount => return dispatch(app, Action::OpenModal(ModalKind::Account), tx),
        TuiEvent::ScrollUp => {
            tui.qa_scroll.scroll_up();
            return false;
        }
        TuiEvent::ScrollDown => {
            tui.qa_scroll.scroll_down();
            return false;
        }
        TuiEvent::ScrollPageUp => {
            tui.qa_scroll.scroll_page_up();
            return false;
        }
        TuiEvent::ScrollPageDown => {
            tui.qa_scroll.scroll_page_down();
            return false;
        }
        _ => {}
    }

    match tui.focus {
        Focus::Input => match event {
            TuiEvent::Tab | TuiEvent::Escape => {
                tui.focus = Focus::Sidebar;
                false
            }
            _ => match tui.input_box.handle_event(&event) {
                Some(InputEvent::Submit(question)) => {
                    dispatch(app, Action::SubmitQuestion(question), tx)
                }
                _ => false,
            },
        },
        Focus::Sidebar => {
            if matches!(event, TuiEvent::Escape | TuiEvent::BackTab) {
                tui.focus = Focus::Input;
                return false;
            }
            let sidebar_event = tui.sidebar.handle_event(
                &event,
                app.active_tab,
                app.turns.len(),
                &app.documents,
            );
            let action = match sidebar_event {
                Some(SidebarEvent::SelectTurn(idx)) => Action::SelectTurn(idx),
                Some(SidebarEvent::ViewDocument(id)) => Action::ViewDocument(id),
                Some(SidebarEvent::DeleteDocument(id)) => Action::RequestDelete(id),
                Some(SidebarEvent::AddChunk(id)) => {
                    let title = app.document(&id).map(|d| d.title.clone()).unwrap_or_default();
                    Action::OpenModal(ModalKind::AddChunk {
                        document_id: id,
                        title,
                    })
                }
                Some(SidebarEvent::Refresh) => Action::RefreshDocuments,
                Some(SidebarEvent::SwitchTab) => Action::SwitchTab(app.active_tab.toggle()),
                // Typing in the sidebar jumps back to the input
                Some(SidebarEvent::Unhandled) => {
                    tui.focus = Focus::Input;
                    tui.input_box.handle_event(&event);
                    return false;
                }
                None => return false,
            };
            dispatch(app, action, tx)
        }
    }
}

/// Apply an action and start whatever I/O it asks for.
/// Returns `true` when the action ends the session.
fn dispatch(app: &mut App, action: Action, tx: &mpsc::Sender<Action>) -> bool {
    let effect = update(app, action);
    if effect == Effect::Quit {
        return true;
    }
    for effect in effect.split() {
        spawn_effect(app.backend.clone(), effect, tx.clone());
    }
    false
}

fn spawn_effect(backend: Arc<dyn QaBackend>, effect: Effect, tx: mpsc::Sender<Action>) {
    debug!("Spawning effect: {:?}", effect);
    tokio::spawn(async move {
        if let Some(action) = perform(backend.as_ref(), effect).await
            && tx.send(action).is_err()
        {
            warn!("Failed to deliver effect result: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::SidebarTab;
    use crate::test_support::{document, test_app};

    fn press(
        app: &mut App,
        tui: &mut TuiState,
        tx: &mpsc::Sender<Action>,
        event: TuiEvent,
    ) -> bool {
        let quit = handle_event(app, tui, event, tx);
        tui.sync(app);
        quit
    }

    fn type_text(app: &mut App, tui: &mut TuiState, tx: &mpsc::Sender<Action>, text: &str) {
        for c in text.chars() {
            press(app, tui, tx, TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_ctrl_c_quits() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();
        assert!(press(&mut app, &mut tui, &tx, TuiEvent::ForceQuit));
    }

    #[test]
    fn test_alert_swallows_next_key() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();
        app.alert = Some("Email is required".to_string());

        press(&mut app, &mut tui, &tx, TuiEvent::InputChar('x'));
        assert!(app.alert.is_none());
        assert!(tui.input_box.buffer.is_empty());
    }

    #[test]
    fn test_upload_shortcut_opens_and_escape_closes_form() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();

        press(&mut app, &mut tui, &tx, TuiEvent::OpenUpload);
        assert_eq!(app.modal, Some(ModalKind::Upload));
        assert!(tui.form.is_some());

        type_text(&mut app, &mut tui, &tx, "abc");
        assert_eq!(tui.form.as_ref().unwrap().fields[0].value, "abc");

        press(&mut app, &mut tui, &tx, TuiEvent::Escape);
        assert_eq!(app.modal, None);
        assert!(tui.form.is_none());
    }

    #[test]
    fn test_confirm_routing() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();
        app.documents.push(document("1", "HR Policy"));
        app.active_tab = SidebarTab::Documents;
        tui.focus = Focus::Sidebar;
        tui.sync(&app);

        press(&mut app, &mut tui, &tx, TuiEvent::InputChar('d'));
        assert!(app.confirm.is_some());

        // Unrelated keys leave the question open
        press(&mut app, &mut tui, &tx, TuiEvent::InputChar('x'));
        assert!(app.confirm.is_some());

        press(&mut app, &mut tui, &tx, TuiEvent::InputChar('n'));
        assert!(app.confirm.is_none());
        assert_eq!(app.documents.len(), 1);
    }

    #[test]
    fn test_focus_switching_and_typing_from_sidebar() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, _rx) = mpsc::channel();

        press(&mut app, &mut tui, &tx, TuiEvent::Tab);
        assert_eq!(tui.focus, Focus::Sidebar);

        press(&mut app, &mut tui, &tx, TuiEvent::Tab);
        assert_eq!(app.active_tab, SidebarTab::Documents);

        press(&mut app, &mut tui, &tx, TuiEvent::InputChar('h'));
        assert_eq!(tui.focus, Focus::Input);
        assert_eq!(tui.input_box.buffer, "h");
    }

    #[tokio::test]
    async fn test_submit_question_round_trip() {
        let mut app = test_app();
        let mut tui = TuiState::new();
        let (tx, rx) = mpsc::channel();

        type_text(&mut app, &mut tui, &tx, "What is PTO?");
        press(&mut app, &mut tui, &tx, TuiEvent::Submit);
        assert!(app.is_loading);
        assert_eq!(app.active_turn, Some(0));

        // The scripted backend has no answer configured, so the request fails
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        dispatch(&mut app, action, &tx);
        assert!(!app.is_loading);
        assert!(app.turns[0].answer.starts_with("Error: "));
    }
}
