//! Terminal portfolio client: section navigation, project dialogs with
//! focus trapping, an AI drafting assistant, and an offline-tolerant
//! contact form.

pub mod app;
pub mod busy;
pub mod event;
pub mod focus;
pub mod form;
pub mod modal;
pub mod projects;
pub mod theme;
pub mod ui;

pub use app::{App, AppEvent, Section, Services};
pub use event::HandleResult;
pub use modal::ModalController;
pub use theme::Theme;
