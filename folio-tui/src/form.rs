//! Contact form state: fields, validation, and transient statuses.

use std::time::{Duration, Instant};

use folio_core::PendingSubmission;

use crate::busy::Busy;

/// How long a status line stays on screen.
const STATUS_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
    Info,
}

/// A short-lived inline status under the form.
#[derive(Debug, Clone)]
pub struct Status {
    pub text: String,
    pub kind: StatusKind,
    expires_at: Instant,
}

impl Status {
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            expires_at: Instant::now() + STATUS_TTL,
        }
    }

    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Editable text fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Email,
    Message,
    /// Keywords for the AI drafting assistant.
    Keywords,
}

/// Everything reachable with Tab inside the contact section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormControl {
    Field(FormField),
    Draft,
    Submit,
}

const TAB_ORDER: &[FormControl] = &[
    FormControl::Field(FormField::Name),
    FormControl::Field(FormField::Email),
    FormControl::Field(FormField::Message),
    FormControl::Field(FormField::Keywords),
    FormControl::Draft,
    FormControl::Submit,
];

#[derive(Debug)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub keywords: String,
    pub focused: FormControl,
    pub submit_busy: Busy,
    pub draft_busy: Busy,
    status: Option<Status>,
}

impl ContactForm {
    pub fn new() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            message: String::new(),
            keywords: String::new(),
            focused: FormControl::Field(FormField::Name),
            submit_busy: Busy::new(),
            draft_busy: Busy::new(),
            status: None,
        }
    }

    pub fn focus_next(&mut self) {
        let index = TAB_ORDER
            .iter()
            .position(|control| *control == self.focused)
            .unwrap_or(0);
        self.focused = TAB_ORDER[(index + 1) % TAB_ORDER.len()];
    }

    pub fn focus_prev(&mut self) {
        let index = TAB_ORDER
            .iter()
            .position(|control| *control == self.focused)
            .unwrap_or(0);
        self.focused = TAB_ORDER[(index + TAB_ORDER.len() - 1) % TAB_ORDER.len()];
    }

    fn focused_text(&mut self) -> Option<&mut String> {
        match self.focused {
            FormControl::Field(FormField::Name) => Some(&mut self.name),
            FormControl::Field(FormField::Email) => Some(&mut self.email),
            FormControl::Field(FormField::Message) => Some(&mut self.message),
            FormControl::Field(FormField::Keywords) => Some(&mut self.keywords),
            _ => None,
        }
    }

    pub fn insert(&mut self, c: char) {
        if let Some(text) = self.focused_text() {
            text.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(text) = self.focused_text() {
            text.pop();
        }
    }

    /// Validate and build the submission payload.
    ///
    /// Input errors are reported inline and never retried or queued.
    pub fn validate(&self) -> Result<PendingSubmission, String> {
        let name = self.name.trim();
        let email = self.email.trim();
        let message = self.message.trim();

        if name.is_empty() || email.is_empty() || message.is_empty() {
            return Err("Please fill in all fields.".to_string());
        }
        if !valid_email(email) {
            return Err("Please enter a valid email address.".to_string());
        }

        Ok(PendingSubmission {
            name: name.to_string(),
            email: email.to_string(),
            message: message.to_string(),
        })
    }

    /// Reset the message fields after a confirmed send; keywords stay.
    pub fn reset(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }

    pub fn set_status(&mut self, text: impl Into<String>, kind: StatusKind) {
        self.status = Some(Status::new(text, kind));
    }

    /// The current status, dropping it once expired.
    pub fn status_at(&mut self, now: Instant) -> Option<&Status> {
        if self
            .status
            .as_ref()
            .is_some_and(|status| status.is_expired(now))
        {
            self.status = None;
        }
        self.status.as_ref()
    }

    pub fn status(&mut self) -> Option<&Status> {
        self.status_at(Instant::now())
    }
}

impl Default for ContactForm {
    fn default() -> Self {
        Self::new()
    }
}

/// Accepts something@something.something with no whitespace anywhere;
/// anything stricter rejects real addresses.
fn valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled() -> ContactForm {
        let mut form = ContactForm::new();
        form.name = "Ana".into();
        form.email = "ana@x.com".into();
        form.message = "hi".into();
        form
    }

    #[test]
    fn validates_complete_input() {
        let payload = filled().validate().unwrap();
        assert_eq!(
            payload,
            PendingSubmission {
                name: "Ana".into(),
                email: "ana@x.com".into(),
                message: "hi".into(),
            }
        );
    }

    #[test]
    fn rejects_missing_fields() {
        let mut form = filled();
        form.message.clear();
        assert_eq!(
            form.validate().unwrap_err(),
            "Please fill in all fields."
        );
    }

    #[test]
    fn rejects_malformed_email() {
        for bad in ["ana", "ana@", "@x.com", "ana@x", "ana @x.com", "a@b@c.com", "ana@.com"] {
            let mut form = filled();
            form.email = bad.into();
            assert_eq!(
                form.validate().unwrap_err(),
                "Please enter a valid email address.",
                "expected rejection for {bad:?}"
            );
        }
        assert!(valid_email("first.last@sub.domain.org"));
    }

    #[test]
    fn tab_order_cycles_through_all_controls() {
        let mut form = ContactForm::new();
        for _ in 0..TAB_ORDER.len() {
            form.focus_next();
        }
        assert_eq!(form.focused, FormControl::Field(FormField::Name));

        form.focus_prev();
        assert_eq!(form.focused, FormControl::Submit);
    }

    #[test]
    fn insert_targets_the_focused_field_only() {
        let mut form = ContactForm::new();
        form.insert('A');
        form.focused = FormControl::Submit;
        form.insert('B');

        assert_eq!(form.name, "A");
        assert_eq!(form.email, "");
    }

    #[test]
    fn status_expires_after_ttl() {
        let mut form = ContactForm::new();
        form.set_status("Message sent!", StatusKind::Success);

        let now = Instant::now();
        assert!(form.status_at(now).is_some());
        assert!(form.status_at(now + STATUS_TTL + Duration::from_secs(1)).is_none());
        // Dropped for good once expired.
        assert!(form.status_at(now).is_none());
    }
}
