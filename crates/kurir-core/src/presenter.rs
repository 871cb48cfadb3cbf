//! Render-command sink driven by the session controller.

use crate::session::Sender;

/// Kinds of transient notification a presenter can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

/// Abstract rendering surface for the chat session.
///
/// The controller never inspects what an implementation does with these
/// commands; a presenter may target a webview bridge, a terminal, or a test
/// recorder. Message text arrives already formatted (see [`crate::format`]).
pub trait Presenter: Send + Sync {
    /// Appends a message to the visible transcript.
    fn append_message(&self, markup: &str, sender: Sender);

    /// Shows or hides the typing indicator.
    fn set_typing(&self, typing: bool);

    /// Shows a transient notification.
    fn show_toast(&self, title: &str, message: &str, kind: ToastKind);

    /// Invites the user to rate the conversation.
    fn show_rating_prompt(&self);

    /// Opens the full rating form (stars plus free-form comment).
    fn show_rating_form(&self);

    /// Closes the full rating form.
    fn close_rating_form(&self);
}
