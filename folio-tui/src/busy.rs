//! Shared busy-state for async-triggering controls.
//!
//! Every async action does the same dance: disable the triggering button,
//! swap its label for a spinner, undo on completion. Each triggering
//! control owns one of these.

use std::time::Instant;

const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Disabled-plus-spinner state for one control.
#[derive(Debug, Clone)]
pub struct Busy {
    started: Option<Instant>,
}

impl Busy {
    pub fn new() -> Self {
        Self { started: None }
    }

    pub fn start(&mut self) {
        self.started = Some(Instant::now());
    }

    pub fn stop(&mut self) {
        self.started = None;
    }

    pub fn is_busy(&self) -> bool {
        self.started.is_some()
    }

    /// Label to render: the spinner frame while busy, the idle label otherwise.
    pub fn label<'a>(&self, idle: &'a str) -> std::borrow::Cow<'a, str> {
        match self.started {
            None => idle.into(),
            Some(started) => {
                let tick = started.elapsed().as_millis() / 80;
                let frame = FRAMES[(tick as usize) % FRAMES.len()];
                format!("{frame} working…").into()
            }
        }
    }
}

impl Default for Busy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn busy_swaps_label_and_disables() {
        let mut busy = Busy::new();
        assert!(!busy.is_busy());
        assert_eq!(busy.label("Send"), "Send");

        busy.start();
        assert!(busy.is_busy());
        assert!(busy.label("Send").contains("working"));

        busy.stop();
        assert_eq!(busy.label("Send"), "Send");
    }
}
