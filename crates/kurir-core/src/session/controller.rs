//! Session controller: sequences each send → respond → render cycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::error::{KurirError, Result};
use crate::format::format_message;
use crate::presenter::{Presenter, ToastKind};
use crate::session::message::{ChatMessage, Sender};
use crate::session::model::Session;
use crate::session::rating::Rating;
use crate::transport::Transport;

/// Weight of one reply character in the synthetic typing delay.
const TYPING_DELAY_MS_PER_CHAR: u64 = 30;
/// Lower bound of the synthetic typing delay.
const TYPING_DELAY_MIN_MS: u64 = 1000;
/// Upper bound of the synthetic typing delay.
const TYPING_DELAY_MAX_MS: u64 = 3000;
/// Pause between a qualifying reply and the rating prompt.
const RATING_PROMPT_DELAY: Duration = Duration::from_millis(1000);

/// Reply keywords that invite the user to rate the service.
const RATING_KEYWORDS: [&str; 2] = ["rating", "bintang"];

/// Bot text when the backend reported a failure without any detail.
const GENERIC_ERROR_TEXT: &str = "Terjadi kesalahan. Silakan coba lagi.";

/// Warning shown when a rating is submitted before picking a star value.
const RATING_UNSET_WARNING: &str = "Silakan pilih rating terlebih dahulu";
/// Warning shown when a star value is outside 1..=5.
const RATING_RANGE_WARNING: &str = "Rating harus berupa angka 1-5";

/// Bot text when the request never reached the backend.
const CONNECTION_TROUBLE_TEXT: &str = "🔌 **Koneksi Bermasalah**\n\n\
Sepertinya ada masalah koneksi. Silakan:\n\
1. 🔄 Periksa koneksi internet\n\
2. 🔁 Refresh halaman\n\
3. 📞 Hubungi 1500-888 jika masalah berlanjut\n\n\
Maaf atas ketidaknyamanan ini. 🙏";

/// Computes how long a reply is held back to simulate typing.
///
/// Longer replies take proportionally longer, clamped to a fixed window so
/// short answers still feel deliberate and long ones do not stall the
/// conversation.
pub fn typing_delay(reply: &str) -> Duration {
    let weighted = reply.chars().count() as u64 * TYPING_DELAY_MS_PER_CHAR;
    Duration::from_millis(weighted.clamp(TYPING_DELAY_MIN_MS, TYPING_DELAY_MAX_MS))
}

fn wants_rating(reply: &str) -> bool {
    let lower = reply.to_lowercase();
    RATING_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
}

/// Outcome of a send or rating operation.
///
/// Validation skips are not errors; callers that care (a frontend updating
/// its input field, a test) can inspect the outcome, everyone else can
/// ignore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// The cycle ran and the backend's answer was rendered.
    Completed,
    /// The cycle ran but ended on a recovered failure path.
    Recovered,
    /// Input was rejected before any network activity.
    Skipped,
}

#[derive(Default)]
struct ControllerState {
    session: Session,
    /// Guards against overlapping in-flight sends; a send attempted while
    /// this is set is dropped, not queued.
    pending: bool,
    transcript: Vec<ChatMessage>,
    selected_rating: Option<u8>,
}

/// Drives the message-exchange cycle for a single conversation.
///
/// `SessionController` owns the session identity, the visible transcript,
/// and the pending flag. It renders through an injected [`Presenter`] and
/// reaches the backend through an injected [`Transport`]; it never touches
/// either surface directly.
pub struct SessionController {
    transport: Arc<dyn Transport>,
    presenter: Arc<dyn Presenter>,
    state: Arc<RwLock<ControllerState>>,
}

impl SessionController {
    /// Creates a controller for a fresh, id-less session.
    pub fn new(transport: Arc<dyn Transport>, presenter: Arc<dyn Presenter>) -> Self {
        Self {
            transport,
            presenter,
            state: Arc::new(RwLock::new(ControllerState::default())),
        }
    }

    /// Returns the server-issued session id, if one has been adopted yet.
    pub async fn session_id(&self) -> Option<String> {
        self.state.read().await.session.id.clone()
    }

    /// Returns a snapshot of the visible transcript.
    pub async fn transcript(&self) -> Vec<ChatMessage> {
        self.state.read().await.transcript.clone()
    }

    /// Whether a send is currently in flight.
    pub async fn is_pending(&self) -> bool {
        self.state.read().await.pending
    }

    /// The star value picked in the rating form, if any.
    pub async fn selected_rating(&self) -> Option<u8> {
        self.state.read().await.selected_rating
    }

    /// Sends a user message and renders the backend's reply.
    ///
    /// Empty input (after trimming) and sends attempted while a reply is
    /// outstanding are dropped. Every other path (success, server-reported
    /// failure, connectivity failure) ends with the pending flag cleared
    /// and the session ready for the next input.
    pub async fn send_message(&self, text: &str) -> ExchangeOutcome {
        let text = text.trim();
        if text.is_empty() {
            return ExchangeOutcome::Skipped;
        }

        {
            let mut state = self.state.write().await;
            if state.pending {
                log::debug!("send dropped: a reply is still outstanding");
                return ExchangeOutcome::Skipped;
            }
            state.pending = true;
            state.transcript.push(ChatMessage::now(Sender::User, text));
        }
        self.presenter.append_message(&format_message(text), Sender::User);
        self.presenter.set_typing(true);

        let session_id = self.session_id().await;
        match self.transport.send_message(text, session_id.as_deref()).await {
            Ok(reply) if reply.is_success() => {
                self.state.write().await.session.adopt(reply.session_id.clone());

                // Presentation only: the reply is already here, it just is
                // not shown until the typing window has passed.
                tokio::time::sleep(typing_delay(&reply.response)).await;

                {
                    let mut state = self.state.write().await;
                    state.pending = false;
                    state
                        .transcript
                        .push(ChatMessage::now(Sender::Bot, reply.response.clone()));
                }
                self.presenter.set_typing(false);
                self.presenter
                    .append_message(&format_message(&reply.response), Sender::Bot);

                if wants_rating(&reply.response) {
                    let presenter = Arc::clone(&self.presenter);
                    tokio::spawn(async move {
                        tokio::time::sleep(RATING_PROMPT_DELAY).await;
                        presenter.show_rating_prompt();
                    });
                }

                ExchangeOutcome::Completed
            }
            Ok(reply) => {
                log::warn!("backend rejected message: {:?}", reply.error);
                let detail = reply
                    .error
                    .unwrap_or_else(|| GENERIC_ERROR_TEXT.to_string());
                let bot_text = reply.fallback_response.unwrap_or_else(|| detail.clone());
                self.recover(&bot_text, "Error", &detail).await;
                ExchangeOutcome::Recovered
            }
            Err(err) => {
                log::warn!("message exchange failed: {err}");
                self.recover(
                    CONNECTION_TROUBLE_TEXT,
                    "Koneksi Error",
                    "Periksa koneksi internet Anda",
                )
                .await;
                ExchangeOutcome::Recovered
            }
        }
    }

    /// Submits a star rating without a comment.
    pub async fn submit_quick_rating(&self, value: u8) -> ExchangeOutcome {
        if !Rating::in_range(value) {
            self.presenter
                .show_toast("Peringatan", RATING_RANGE_WARNING, ToastKind::Warning);
            return ExchangeOutcome::Skipped;
        }
        let rating = Rating {
            value,
            comment: String::new(),
            session_id: self.session_id().await,
        };
        self.deliver_rating(rating, false).await
    }

    /// Records the star value picked in the rating form.
    ///
    /// Out-of-range values are ignored; the form UI cannot produce them.
    pub async fn select_rating(&self, value: u8) -> ExchangeOutcome {
        if !Rating::in_range(value) {
            return ExchangeOutcome::Skipped;
        }
        self.state.write().await.selected_rating = Some(value);
        ExchangeOutcome::Completed
    }

    /// Submits the rating form: the previously selected stars plus a comment.
    ///
    /// A submission without a prior [`select_rating`](Self::select_rating)
    /// only warns; nothing is sent.
    pub async fn submit_rating(&self, comment: &str) -> ExchangeOutcome {
        let selected = self.state.read().await.selected_rating;
        let Some(value) = selected else {
            self.presenter
                .show_toast("Peringatan", RATING_UNSET_WARNING, ToastKind::Warning);
            return ExchangeOutcome::Skipped;
        };
        let rating = Rating {
            value,
            comment: comment.to_string(),
            session_id: self.session_id().await,
        };
        self.deliver_rating(rating, true).await
    }

    /// Opens the rating form with a clean selection.
    pub async fn open_rating_form(&self) {
        self.state.write().await.selected_rating = None;
        self.presenter.show_rating_form();
    }

    /// Closes the rating form and forgets the selection.
    pub async fn close_rating_form(&self) {
        self.state.write().await.selected_rating = None;
        self.presenter.close_rating_form();
    }

    /// Replays a stored conversation into the transcript and adopts its id.
    ///
    /// # Errors
    ///
    /// Returns an error if the history could not be fetched or the backend
    /// rejected the lookup (unknown session id).
    pub async fn restore(&self, session_id: &str) -> Result<usize> {
        let reply = self.transport.fetch_history(session_id).await?;
        if !reply.is_success() {
            return Err(KurirError::internal(
                reply
                    .error
                    .unwrap_or_else(|| "riwayat tidak tersedia".to_string()),
            ));
        }

        {
            let mut state = self.state.write().await;
            state.session.id = Some(session_id.to_string());
            for entry in &reply.history {
                let sender = if entry.is_user { Sender::User } else { Sender::Bot };
                state.transcript.push(ChatMessage {
                    sender,
                    text: entry.content.clone(),
                    timestamp: entry.timestamp.clone(),
                });
            }
        }
        for entry in &reply.history {
            let sender = if entry.is_user { Sender::User } else { Sender::Bot };
            self.presenter
                .append_message(&format_message(&entry.content), sender);
        }

        log::info!(
            "restored {} messages for session {session_id}",
            reply.history.len()
        );
        Ok(reply.history.len())
    }

    async fn deliver_rating(&self, rating: Rating, close_form: bool) -> ExchangeOutcome {
        let stars = rating.value;
        match self.transport.submit_rating(&rating).await {
            Ok(reply) if reply.is_success() => {
                if close_form {
                    self.state.write().await.selected_rating = None;
                    self.presenter.close_rating_form();
                }
                self.state
                    .write()
                    .await
                    .transcript
                    .push(ChatMessage::now(Sender::Bot, reply.response.clone()));
                self.presenter
                    .append_message(&format_message(&reply.response), Sender::Bot);
                self.presenter.show_toast(
                    "Terima Kasih!",
                    &format!("Rating {stars} bintang telah dikirim"),
                    ToastKind::Success,
                );
                ExchangeOutcome::Completed
            }
            Ok(_) => {
                self.presenter
                    .show_toast("Error", "Gagal mengirim rating", ToastKind::Error);
                ExchangeOutcome::Recovered
            }
            Err(err) => {
                log::warn!("rating submission failed: {err}");
                self.presenter
                    .show_toast("Error", "Koneksi bermasalah", ToastKind::Error);
                ExchangeOutcome::Recovered
            }
        }
    }

    /// Common tail of both failure paths: typing off, pending cleared, a
    /// bot message with guidance, and an error toast. The paths differ only
    /// in the text they carry.
    async fn recover(&self, bot_text: &str, toast_title: &str, toast_message: &str) {
        {
            let mut state = self.state.write().await;
            state.pending = false;
            state.transcript.push(ChatMessage::now(Sender::Bot, bot_text));
        }
        self.presenter.set_typing(false);
        self.presenter
            .append_message(&format_message(bot_text), Sender::Bot);
        self.presenter
            .show_toast(toast_title, toast_message, ToastKind::Error);
    }
}
