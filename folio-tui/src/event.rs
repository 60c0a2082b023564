//! Event handling for the TUI.

use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Rect;

use crate::app::{App, Section};
use crate::form::FormControl;
use crate::modal::{ModalAction, ModalKey};

/// Poll for events with timeout
pub fn poll_event(timeout: Duration) -> std::io::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Result of handling an input event
#[derive(Debug, PartialEq, Eq)]
pub enum HandleResult {
    Continue,
    Quit,
}

/// Handle a key event
pub fn handle_key(app: &mut App, key: KeyEvent) -> HandleResult {
    // Global quit shortcuts (Ctrl+C, Ctrl+Q)
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => return HandleResult::Quit,
            KeyCode::Char('t') => {
                app.toggle_theme();
                return HandleResult::Continue;
            }
            _ => {}
        }
    }

    // An open dialog holds the keyboard grab; page keys are inert while
    // scroll is locked.
    if app.modal.any_open() {
        handle_modal_keys(app, key);
        return HandleResult::Continue;
    }

    match app.section {
        Section::Contact => handle_contact_keys(app, key),
        _ => handle_page_keys(app, key),
    }
}

fn handle_modal_keys(app: &mut App, key: KeyEvent) {
    let modal_key = match key.code {
        KeyCode::Esc => ModalKey::Escape,
        KeyCode::Tab => ModalKey::Tab,
        KeyCode::BackTab => ModalKey::BackTab,
        KeyCode::Enter => {
            match app.modal.focus().map(|focus| focus.as_str().to_string()) {
                Some(id) if id == "ask-ai" => app.ask_ai(),
                Some(id) if id == "close" => close_active(app),
                _ => {}
            }
            return;
        }
        _ => return,
    };

    // Snapshot page targets before handing the borrow to the controller.
    let focusable = page_focus_snapshot(app);
    let action = app
        .modal
        .handle_key(modal_key, |id| focusable.contains(&id.0));
    if let ModalAction::Closed { restore_focus, .. } = action {
        app.restore_page_focus(restore_focus);
    }
}

fn close_active(app: &mut App) {
    let Some(active) = app.modal.active().map(str::to_string) else {
        return;
    };
    let focusable = page_focus_snapshot(app);
    let restore = app.modal.close(&active, |id| focusable.contains(&id.0));
    app.restore_page_focus(restore);
}

fn page_focus_snapshot(app: &App) -> Vec<String> {
    use crate::projects::catalog;
    app.board
        .visible(catalog())
        .iter()
        .map(|project| format!("card-{}", project.id))
        .collect()
}

fn handle_page_keys(app: &mut App, key: KeyEvent) -> HandleResult {
    use crate::projects::catalog;

    match key.code {
        KeyCode::Char('q') => return HandleResult::Quit,
        KeyCode::Char('t') => app.toggle_theme(),

        // Section navigation
        KeyCode::Char('1') => app.section = Section::Home,
        KeyCode::Char('2') => app.section = Section::About,
        KeyCode::Char('3') => app.section = Section::Projects,
        KeyCode::Char('4') => app.section = Section::Contact,
        KeyCode::Right | KeyCode::Tab => app.section = app.section.next(),
        KeyCode::Left | KeyCode::BackTab => app.section = app.section.prev(),

        // Project browsing
        KeyCode::Char('j') | KeyCode::Down if app.section == Section::Projects => {
            app.board.select_next(catalog());
        }
        KeyCode::Char('k') | KeyCode::Up if app.section == Section::Projects => {
            app.board.select_prev(catalog());
        }
        KeyCode::Char('f') if app.section == Section::Projects => app.board.cycle_filter(),
        KeyCode::Char('m') if app.section == Section::Projects => app.board.toggle_show_all(),
        KeyCode::Enter if app.section == Section::Projects => app.open_selected_project(),

        _ => {}
    }
    HandleResult::Continue
}

fn handle_contact_keys(app: &mut App, key: KeyEvent) -> HandleResult {
    match key.code {
        KeyCode::Esc => app.section = Section::Projects,
        KeyCode::Tab => app.form.focus_next(),
        KeyCode::BackTab => app.form.focus_prev(),
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Enter => match app.form.focused {
            FormControl::Submit => app.submit_form(),
            FormControl::Draft => app.draft_message(),
            FormControl::Field(crate::form::FormField::Message) => app.form.insert('\n'),
            FormControl::Field(_) => app.form.focus_next(),
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.insert(c);
        }
        _ => {}
    }
    HandleResult::Continue
}

/// A left click while a dialog is open: outside the content rect it lands
/// on the backdrop and closes the active dialog; inside it does nothing.
pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if !matches!(mouse.kind, MouseEventKind::Down(MouseButton::Left)) {
        return;
    }
    let Some(active) = app.modal.active().map(str::to_string) else {
        return;
    };
    if let Some(area) = app.modal_area {
        if contains(area, mouse.column, mouse.row) {
            return;
        }
    }
    let focusable = page_focus_snapshot(app);
    let action = app
        .modal
        .handle_backdrop_click(&active, |id| focusable.contains(&id.0));
    if let ModalAction::Closed { restore_focus, .. } = action {
        app.restore_page_focus(restore_focus);
    }
}

fn contains(area: Rect, x: u16, y: u16) -> bool {
    x >= area.x && x < area.x + area.width && y >= area.y && y < area.y + area.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use folio_client::{GenerationClient, HttpContactSubmitter};
    use folio_core::{AssistConfig, Connectivity, KvStore, SubmissionQueue};

    use crate::app::Services;
    use crate::focus::FocusId;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (tempfile::TempDir, App) {
        test_app_with_assist(AssistConfig::default())
    }

    fn test_app_with_assist(assist: AssistConfig) -> (tempfile::TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(KvStore::open(dir.path().join("store.json")).unwrap());
        let submitter = HttpContactSubmitter::new("http://localhost:9/contact").unwrap();
        let assist = GenerationClient::over_http("http://localhost:9/generate", &assist).unwrap();
        let (connectivity, _watcher) = Connectivity::new(true);
        let services = Services {
            queue: Arc::new(SubmissionQueue::new(Arc::clone(&store), submitter)),
            assist: Arc::new(assist),
            connectivity: Arc::new(connectivity),
        };
        (dir, App::with_services(store, services))
    }

    #[test]
    fn sections_cycle_with_tab() {
        let (_dir, mut app) = test_app();
        assert_eq!(app.section, Section::Home);

        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.section, Section::About);
        handle_key(&mut app, key(KeyCode::BackTab));
        assert_eq!(app.section, Section::Home);
    }

    #[test]
    fn enter_on_a_project_opens_its_dialog() {
        let (_dir, mut app) = test_app();
        app.section = Section::Projects;

        handle_key(&mut app, key(KeyCode::Enter));
        assert!(app.modal.any_open());
        assert_eq!(app.modal.handler_count(), 2);
    }

    #[test]
    fn page_keys_are_inert_while_a_dialog_is_open() {
        let (_dir, mut app) = test_app();
        app.section = Section::Projects;
        handle_key(&mut app, key(KeyCode::Enter));

        handle_key(&mut app, key(KeyCode::Right));
        assert_eq!(app.section, Section::Projects);

        // Even 'q' does not quit while the dialog holds the grab.
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('q'))),
            HandleResult::Continue
        );
    }

    #[test]
    fn escape_closes_dialog_and_restores_card_selection() {
        let (_dir, mut app) = test_app();
        app.section = Section::Projects;
        handle_key(&mut app, key(KeyCode::Char('j')));
        let selected = app.board.selected;
        handle_key(&mut app, key(KeyCode::Enter));

        handle_key(&mut app, key(KeyCode::Esc));
        assert!(!app.modal.any_open());
        assert_eq!(app.modal.handler_count(), 0);
        assert!(!app.modal.scroll_locked());
        assert_eq!(app.board.selected, selected);
    }

    #[test]
    fn tab_inside_dialog_traps_focus() {
        let (_dir, mut app) = test_app();
        app.section = Section::Projects;
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.modal.focus(), Some(&FocusId::new("ask-ai")));

        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.modal.focus(), Some(&FocusId::new("close")));
        handle_key(&mut app, key(KeyCode::Tab));
        assert_eq!(app.modal.focus(), Some(&FocusId::new("ask-ai")));
        // Section unchanged: Tab never left the dialog.
        assert_eq!(app.section, Section::Projects);
    }

    #[tokio::test]
    async fn enter_on_busy_ask_ai_does_not_start_a_second_generation() {
        use std::time::Duration;

        use crate::app::AppEvent;

        let (_dir, mut app) = test_app_with_assist(AssistConfig {
            max_retries: 1,
            base_delay_ms: 1,
        });
        app.section = Section::Projects;
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.modal.focus(), Some(&FocusId::new("ask-ai")));

        // First Enter disables the button; focus stays on it, so a repeat
        // Enter must be a no-op rather than a concurrent request.
        handle_key(&mut app, key(KeyCode::Enter));
        let active = app.modal.active().unwrap().to_string();
        assert!(app
            .modal
            .dialog(&active)
            .unwrap()
            .controls
            .iter()
            .any(|control| control.id.as_str() == "ask-ai" && control.disabled));
        handle_key(&mut app, key(KeyCode::Enter));

        let mut finished = 0;
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(10)).await;
            while let Some(event) = app.try_recv_event() {
                if matches!(event, AppEvent::GenerationFinished { .. }) {
                    finished += 1;
                }
            }
        }
        assert_eq!(finished, 1);
    }

    #[test]
    fn contact_section_routes_characters_to_fields() {
        let (_dir, mut app) = test_app();
        app.section = Section::Contact;

        for c in "Ana".chars() {
            handle_key(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(app.form.name, "Ana");

        handle_key(&mut app, key(KeyCode::Tab));
        handle_key(&mut app, key(KeyCode::Char('a')));
        assert_eq!(app.form.email, "a");

        // 'q' is text here, not quit.
        assert_eq!(
            handle_key(&mut app, key(KeyCode::Char('q'))),
            HandleResult::Continue
        );
        assert_eq!(app.form.email, "aq");
    }

    #[test]
    fn backdrop_click_closes_but_content_click_does_not() {
        let (_dir, mut app) = test_app();
        app.section = Section::Projects;
        handle_key(&mut app, key(KeyCode::Enter));
        app.modal_area = Some(Rect::new(10, 5, 40, 10));

        let click = |x, y| MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: y,
            modifiers: KeyModifiers::NONE,
        };

        handle_mouse(&mut app, click(15, 7));
        assert!(app.modal.any_open(), "content click must not close");

        handle_mouse(&mut app, click(2, 2));
        assert!(!app.modal.any_open(), "backdrop click closes");
    }
}
