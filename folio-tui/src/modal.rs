//! Per-dialog open/close state, keyboard grab, and focus restoration.
//!
//! Each dialog owns its handler lifetime explicitly: opening installs an
//! outside-click route and a key route as a small owned-resource struct,
//! closing releases them synchronously before the call returns. A rapid
//! open→close→open sequence therefore never double-registers, and at most
//! one Escape/Tab route exists per open dialog.
//!
//! Dialogs are independent; when several are open the most recently opened
//! one holds the keyboard grab. A per-open epoch lets late generation
//! results be discarded instead of landing in a closed or reused dialog.

use std::collections::BTreeMap;

use tracing::debug;

use crate::focus::{Control, FocusId, FocusScope};

/// Content of one registered dialog.
#[derive(Debug, Clone)]
pub struct Dialog {
    pub id: String,
    pub title: String,
    pub body: String,
    pub controls: Vec<Control>,
    /// Transient AI explanation panel, cleared on close.
    pub generated: Option<String>,
}

impl Dialog {
    pub fn new(id: impl Into<String>, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: body.into(),
            controls: Vec::new(),
            generated: None,
        }
    }

    pub fn with_controls(mut self, controls: Vec<Control>) -> Self {
        self.controls = controls;
        self
    }
}

/// Routes installed for exactly one open/close cycle.
#[derive(Debug)]
struct DialogHandlers {
    outside_click: HandlerRef,
    keys: HandlerRef,
}

#[derive(Debug)]
struct HandlerRef;

impl DialogHandlers {
    fn install() -> Self {
        Self {
            outside_click: HandlerRef,
            keys: HandlerRef,
        }
    }

    const fn count(&self) -> usize {
        let DialogHandlers {
            outside_click: HandlerRef,
            keys: HandlerRef,
        } = self;
        2
    }
}

/// Mutable per-dialog state; created on first registration, never destroyed.
#[derive(Debug)]
struct DialogState {
    is_open: bool,
    prior_focus: Option<FocusId>,
    handlers: Option<DialogHandlers>,
    /// Bumped on every open; identifies one open instance.
    epoch: u64,
}

impl DialogState {
    fn new() -> Self {
        Self {
            is_open: false,
            prior_focus: None,
            handlers: None,
            epoch: 0,
        }
    }
}

struct DialogEntry {
    dialog: Dialog,
    state: DialogState,
}

/// Keys the controller cares about while a dialog holds the grab.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Escape,
    Tab,
    BackTab,
}

/// What a key or click did, for the caller to act on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalAction {
    None,
    FocusMoved(FocusId),
    Closed {
        id: String,
        restore_focus: Option<FocusId>,
    },
}

/// Identifies one open instance of a dialog for late-result checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    pub dialog_id: String,
    epoch: u64,
}

pub struct ModalController {
    entries: BTreeMap<String, DialogEntry>,
    /// Currently open dialogs, most recent last (that one has the grab).
    open_order: Vec<String>,
    /// Focus inside the active dialog.
    focus: Option<FocusId>,
    scroll_locked: bool,
}

impl ModalController {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            open_order: Vec::new(),
            focus: None,
            scroll_locked: false,
        }
    }

    pub fn register(&mut self, dialog: Dialog) {
        let id = dialog.id.clone();
        self.entries.entry(id).or_insert(DialogEntry {
            dialog,
            state: DialogState::new(),
        });
    }

    /// Open a dialog, recording `prior_focus` for restoration on close.
    ///
    /// Unknown ids and already-open dialogs are silent no-ops, so a double
    /// trigger can never install a second set of handlers.
    pub fn open(&mut self, id: &str, prior_focus: Option<FocusId>) {
        let Some(entry) = self.entries.get_mut(id) else {
            debug!(dialog = id, "open ignored, no such dialog");
            return;
        };
        if entry.state.is_open {
            return;
        }

        entry.state.is_open = true;
        entry.state.prior_focus = prior_focus;
        entry.state.epoch += 1;
        entry.state.handlers = Some(DialogHandlers::install());
        self.open_order.push(id.to_string());
        self.scroll_locked = true;
        self.focus = Some(initial_focus(&entry.dialog));
    }

    /// Close a dialog: hide it, clear its generated panel, release its
    /// handlers, and compute the focus to restore. `still_focusable` lets
    /// the caller veto restoration when the prior element is gone.
    pub fn close(
        &mut self,
        id: &str,
        still_focusable: impl Fn(&FocusId) -> bool,
    ) -> Option<FocusId> {
        let entry = self.entries.get_mut(id)?;
        if !entry.state.is_open {
            return None;
        }

        entry.state.is_open = false;
        entry.dialog.generated = None;
        // Release both routes before returning; their lifetime is exactly
        // one open/close cycle.
        entry.state.handlers = None;
        let restore = entry.state.prior_focus.take().filter(|f| still_focusable(f));

        self.open_order.retain(|open| open != id);
        self.scroll_locked = !self.open_order.is_empty();
        self.focus = self
            .active()
            .and_then(|active| self.entries.get(active))
            .map(|entry| initial_focus(&entry.dialog));

        restore
    }

    /// Dialog currently holding the keyboard grab.
    pub fn active(&self) -> Option<&str> {
        self.open_order.last().map(String::as_str)
    }

    pub fn any_open(&self) -> bool {
        !self.open_order.is_empty()
    }

    pub fn is_open(&self, id: &str) -> bool {
        self.entries
            .get(id)
            .map(|entry| entry.state.is_open)
            .unwrap_or(false)
    }

    pub fn scroll_locked(&self) -> bool {
        self.scroll_locked
    }

    pub fn focus(&self) -> Option<&FocusId> {
        self.focus.as_ref()
    }

    /// Total installed routes across open dialogs; the baseline is zero.
    pub fn handler_count(&self) -> usize {
        self.entries
            .values()
            .filter_map(|entry| entry.state.handlers.as_ref())
            .map(DialogHandlers::count)
            .sum()
    }

    pub fn dialog(&self, id: &str) -> Option<&Dialog> {
        self.entries.get(id).map(|entry| &entry.dialog)
    }

    pub fn dialog_mut(&mut self, id: &str) -> Option<&mut Dialog> {
        self.entries.get_mut(id).map(|entry| &mut entry.dialog)
    }

    /// Route a key to the active dialog.
    ///
    /// Tab order is recomputed from the dialog's controls on every call:
    /// visibility and disabled state may have changed since the last press.
    pub fn handle_key(
        &mut self,
        key: ModalKey,
        still_focusable: impl Fn(&FocusId) -> bool,
    ) -> ModalAction {
        let Some(active) = self.active().map(str::to_string) else {
            return ModalAction::None;
        };

        match key {
            ModalKey::Escape => {
                let restore_focus = self.close(&active, still_focusable);
                ModalAction::Closed {
                    id: active,
                    restore_focus,
                }
            }
            ModalKey::Tab | ModalKey::BackTab => {
                let entry = match self.entries.get(&active) {
                    Some(entry) => entry,
                    None => return ModalAction::None,
                };
                let scope = FocusScope::compute(&entry.dialog.controls);
                let next = if scope.is_empty() {
                    // Nothing focusable: keep focus on the content region.
                    content_region(&active)
                } else if key == ModalKey::Tab {
                    scope.next_after(self.focus.as_ref()).cloned().unwrap_or_else(|| content_region(&active))
                } else {
                    scope.prev_before(self.focus.as_ref()).cloned().unwrap_or_else(|| content_region(&active))
                };
                self.focus = Some(next.clone());
                ModalAction::FocusMoved(next)
            }
        }
    }

    /// A click on a dialog's backdrop closes it; clicks on content (or its
    /// descendants) do not.
    pub fn handle_backdrop_click(
        &mut self,
        id: &str,
        still_focusable: impl Fn(&FocusId) -> bool,
    ) -> ModalAction {
        if !self.is_open(id) {
            return ModalAction::None;
        }
        let restore_focus = self.close(id, still_focusable);
        ModalAction::Closed {
            id: id.to_string(),
            restore_focus,
        }
    }

    /// Stamp an in-flight generation with the dialog's current instance.
    pub fn begin_generation(&mut self, id: &str) -> Option<GenerationTicket> {
        let entry = self.entries.get(id)?;
        if !entry.state.is_open {
            return None;
        }
        Some(GenerationTicket {
            dialog_id: id.to_string(),
            epoch: entry.state.epoch,
        })
    }

    /// Apply a finished generation only if its dialog instance is still the
    /// one that requested it. Stale results (closed or reopened dialog) are
    /// dropped and `false` is returned.
    pub fn apply_generation(&mut self, ticket: &GenerationTicket, text: String) -> bool {
        let Some(entry) = self.entries.get_mut(&ticket.dialog_id) else {
            return false;
        };
        if !entry.state.is_open || entry.state.epoch != ticket.epoch {
            debug!(dialog = %ticket.dialog_id, "dropping stale generation result");
            return false;
        }
        entry.dialog.generated = Some(text);
        true
    }

    /// Flip a control's disabled flag (busy buttons leave the tab order).
    pub fn set_control_disabled(&mut self, id: &str, control: &FocusId, disabled: bool) {
        if let Some(entry) = self.entries.get_mut(id) {
            if let Some(control) = entry
                .dialog
                .controls
                .iter_mut()
                .find(|c| &c.id == control)
            {
                control.disabled = disabled;
            }
        }
    }
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

/// Focus target for a dialog with no focusable controls.
fn content_region(id: &str) -> FocusId {
    FocusId::new(format!("{id}.content"))
}

fn initial_focus(dialog: &Dialog) -> FocusId {
    FocusScope::compute(&dialog.controls)
        .first()
        .cloned()
        .unwrap_or_else(|| content_region(&dialog.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller_with(id: &str) -> ModalController {
        let mut controller = ModalController::new();
        controller.register(
            Dialog::new(id, "Project X", "a demo project").with_controls(vec![
                Control::new("ask-ai"),
                Control::new("repo-link"),
                Control::new("close"),
            ]),
        );
        controller
    }

    fn fid(s: &str) -> FocusId {
        FocusId::new(s)
    }

    #[test]
    fn open_close_returns_handler_count_to_baseline() {
        let mut controller = controller_with("project-x");
        assert_eq!(controller.handler_count(), 0);

        controller.open("project-x", Some(fid("card-1")));
        assert_eq!(controller.handler_count(), 2);

        controller.close("project-x", |_| true);
        assert_eq!(controller.handler_count(), 0);
    }

    #[test]
    fn double_open_never_double_registers() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);
        controller.open("project-x", None);
        assert_eq!(controller.handler_count(), 2);

        controller.close("project-x", |_| true);
        controller.open("project-x", None);
        assert_eq!(controller.handler_count(), 2);
    }

    #[test]
    fn unknown_dialog_open_is_a_silent_no_op() {
        let mut controller = controller_with("project-x");
        controller.open("no-such-dialog", Some(fid("card-1")));
        assert!(!controller.any_open());
        assert_eq!(controller.handler_count(), 0);
    }

    #[test]
    fn open_moves_focus_to_first_focusable_and_locks_scroll() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);

        assert!(controller.scroll_locked());
        assert_eq!(controller.focus(), Some(&fid("ask-ai")));
    }

    #[test]
    fn dialog_without_focusable_controls_focuses_content_region() {
        let mut controller = ModalController::new();
        controller.register(Dialog::new("empty", "Empty", "nothing here"));
        controller.open("empty", None);

        assert_eq!(controller.focus(), Some(&fid("empty.content")));
        let action = controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(action, ModalAction::FocusMoved(fid("empty.content")));
    }

    #[test]
    fn tab_cycles_and_wraps_within_the_dialog() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);

        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("repo-link")));
        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("close")));
        // Tab from the last control wraps to the first.
        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("ask-ai")));
        // Shift+Tab from the first wraps to the last.
        controller.handle_key(ModalKey::BackTab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("close")));
    }

    #[test]
    fn tab_order_reflects_state_changes_between_presses() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);

        // The ask-ai button goes busy: next Tab evaluation must skip it.
        controller.set_control_disabled("project-x", &fid("ask-ai"), true);
        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("repo-link")));

        // The wrap from the last control skips it too.
        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("close")));
        controller.handle_key(ModalKey::Tab, |_| true);
        assert_eq!(controller.focus(), Some(&fid("repo-link")));
    }

    #[test]
    fn escape_closes_resumes_scroll_and_clears_generated_panel() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", Some(fid("card-1")));

        let ticket = controller.begin_generation("project-x").unwrap();
        assert!(controller.apply_generation(&ticket, "an explanation".into()));
        assert!(controller.dialog("project-x").unwrap().generated.is_some());

        let action = controller.handle_key(ModalKey::Escape, |_| true);
        assert_eq!(
            action,
            ModalAction::Closed {
                id: "project-x".into(),
                restore_focus: Some(fid("card-1")),
            }
        );
        assert!(!controller.scroll_locked());
        assert_eq!(controller.handler_count(), 0);
        // Reopening starts clean.
        assert!(controller.dialog("project-x").unwrap().generated.is_none());
    }

    #[test]
    fn close_skips_restoration_when_prior_focus_is_gone() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", Some(fid("card-1")));

        let restore = controller.close("project-x", |_| false);
        assert_eq!(restore, None);
    }

    #[test]
    fn backdrop_click_closes_only_that_dialog() {
        let mut controller = controller_with("project-x");
        controller.register(Dialog::new("project-y", "Project Y", "another"));
        controller.open("project-x", None);
        controller.open("project-y", None);

        let action = controller.handle_backdrop_click("project-x", |_| true);
        assert!(matches!(action, ModalAction::Closed { ref id, .. } if id == "project-x"));
        assert!(controller.is_open("project-y"));
        assert_eq!(controller.handler_count(), 2);
    }

    #[test]
    fn generation_result_after_close_is_dropped() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);
        let ticket = controller.begin_generation("project-x").unwrap();

        controller.close("project-x", |_| true);
        assert!(!controller.apply_generation(&ticket, "late".into()));
    }

    #[test]
    fn generation_result_from_a_previous_instance_is_dropped() {
        let mut controller = controller_with("project-x");
        controller.open("project-x", None);
        let stale = controller.begin_generation("project-x").unwrap();

        controller.close("project-x", |_| true);
        controller.open("project-x", None);

        assert!(!controller.apply_generation(&stale, "late".into()));
        assert!(controller.dialog("project-x").unwrap().generated.is_none());

        let fresh = controller.begin_generation("project-x").unwrap();
        assert!(controller.apply_generation(&fresh, "current".into()));
    }

    #[test]
    fn grab_falls_back_to_remaining_dialog_on_close() {
        let mut controller = controller_with("project-x");
        controller.register(
            Dialog::new("project-y", "Project Y", "another")
                .with_controls(vec![Control::new("close-y")]),
        );
        controller.open("project-x", None);
        controller.open("project-y", None);
        assert_eq!(controller.active(), Some("project-y"));

        controller.close("project-y", |_| true);
        assert_eq!(controller.active(), Some("project-x"));
        assert!(controller.scroll_locked());
        assert_eq!(controller.focus(), Some(&fid("ask-ai")));
    }
}
