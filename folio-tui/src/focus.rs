//! Tab-order computation for dialog focus trapping.
//!
//! A dialog describes its interactive controls; [`FocusScope`] computes the
//! keyboard-reachable subset in tab order and answers first/last/wrap-around
//! queries. It is recomputed on every Tab evaluation rather than cached,
//! since a control's visibility or disabled state can change while the
//! dialog is open (a button goes busy, a panel appears).

/// Identifies a focusable element, dialog control or page-level target.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FocusId(pub String);

impl FocusId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FocusId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One interactive control inside a dialog's content region.
#[derive(Debug, Clone)]
pub struct Control {
    pub id: FocusId,
    pub disabled: bool,
    pub visible: bool,
    /// Opted out of tab order (the `tabindex="-1"` analogue).
    pub tab_skip: bool,
}

impl Control {
    pub fn new(id: impl Into<FocusId>) -> Self {
        Self {
            id: id.into(),
            disabled: false,
            visible: true,
            tab_skip: false,
        }
    }

    fn focusable(&self) -> bool {
        self.visible && !self.disabled && !self.tab_skip
    }
}

/// Ordered keyboard-reachable controls, valid for one evaluation.
#[derive(Debug, Clone)]
pub struct FocusScope {
    order: Vec<FocusId>,
}

impl FocusScope {
    /// Filter `controls` down to the focusable subset, preserving order.
    pub fn compute(controls: &[Control]) -> Self {
        Self {
            order: controls
                .iter()
                .filter(|control| control.focusable())
                .map(|control| control.id.clone())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, id: &FocusId) -> bool {
        self.order.contains(id)
    }

    pub fn first(&self) -> Option<&FocusId> {
        self.order.first()
    }

    pub fn last(&self) -> Option<&FocusId> {
        self.order.last()
    }

    /// Next target after `current`, wrapping from last back to first.
    /// A `current` outside the scope restarts at the first target.
    pub fn next_after(&self, current: Option<&FocusId>) -> Option<&FocusId> {
        let position = current.and_then(|id| self.order.iter().position(|o| o == id));
        match position {
            Some(index) => self.order.get((index + 1) % self.order.len()),
            None => self.first(),
        }
    }

    /// Previous target before `current`, wrapping from first back to last.
    pub fn prev_before(&self, current: Option<&FocusId>) -> Option<&FocusId> {
        let position = current.and_then(|id| self.order.iter().position(|o| o == id));
        match position {
            Some(0) | None => self.last(),
            Some(index) => self.order.get(index - 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> Vec<Control> {
        vec![
            Control::new("ask-ai"),
            Control::new("repo-link"),
            Control::new("close"),
        ]
    }

    fn id(s: &str) -> FocusId {
        FocusId::new(s)
    }

    #[test]
    fn skips_disabled_hidden_and_opted_out_controls() {
        let mut controls = controls();
        controls[0].disabled = true;
        controls[1].visible = false;
        controls.push(Control {
            tab_skip: true,
            ..Control::new("decoration")
        });

        let scope = FocusScope::compute(&controls);
        assert_eq!(scope.first(), Some(&id("close")));
        assert_eq!(scope.last(), Some(&id("close")));
    }

    #[test]
    fn tab_from_last_wraps_to_first() {
        let scope = FocusScope::compute(&controls());
        assert_eq!(scope.next_after(Some(&id("close"))), Some(&id("ask-ai")));
        assert_eq!(scope.next_after(Some(&id("ask-ai"))), Some(&id("repo-link")));
    }

    #[test]
    fn shift_tab_from_first_wraps_to_last() {
        let scope = FocusScope::compute(&controls());
        assert_eq!(scope.prev_before(Some(&id("ask-ai"))), Some(&id("close")));
        assert_eq!(scope.prev_before(Some(&id("close"))), Some(&id("repo-link")));
    }

    #[test]
    fn unknown_current_restarts_at_the_ends() {
        let scope = FocusScope::compute(&controls());
        assert_eq!(scope.next_after(Some(&id("gone"))), Some(&id("ask-ai")));
        assert_eq!(scope.prev_before(None), Some(&id("close")));
    }

    #[test]
    fn empty_scope_yields_none() {
        let scope = FocusScope::compute(&[]);
        assert!(scope.is_empty());
        assert_eq!(scope.first(), None);
        assert_eq!(scope.next_after(Some(&id("anything"))), None);
    }

    #[test]
    fn cycling_never_leaves_the_set() {
        let scope = FocusScope::compute(&controls());
        let mut current = scope.first().cloned();
        for _ in 0..10 {
            current = scope.next_after(current.as_ref()).cloned();
            assert!(scope.contains(current.as_ref().unwrap()));
        }
    }
}
