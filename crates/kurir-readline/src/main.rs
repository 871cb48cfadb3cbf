use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use kurir_core::presenter::{Presenter, ToastKind};
use kurir_core::session::{ExchangeOutcome, Sender, SessionController};
use kurir_interaction::HttpTransport;

/// Terminal client for the FastDelivery Express support chat.
#[derive(Parser)]
#[command(name = "kurir")]
#[command(about = "Kurir - terminal client for the courier support chat", long_about = None)]
struct Cli {
    /// Backend base URL (overrides config file and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Anti-forgery token sent with every request
    #[arg(long)]
    csrf_token: Option<String>,

    /// Restore a stored session by id before the first prompt
    #[arg(long)]
    session: Option<String>,
}

/// Presenter that renders the conversation onto the terminal.
///
/// Message markup arrives pre-formatted; only line breaks are mapped back
/// to real newlines, the inline spans are printed as-is.
struct TerminalPresenter;

impl Presenter for TerminalPresenter {
    fn append_message(&self, markup: &str, sender: Sender) {
        let text = markup.replace("<br>", "\n");
        match sender {
            Sender::User => {
                for line in text.lines() {
                    println!("{}", format!("> {line}").green());
                }
            }
            Sender::Bot => {
                for line in text.lines() {
                    println!("{}", line.bright_blue());
                }
                println!();
            }
        }
    }

    fn set_typing(&self, typing: bool) {
        if typing {
            println!("{}", "bot sedang mengetik...".bright_black());
        }
    }

    fn show_toast(&self, title: &str, message: &str, kind: ToastKind) {
        let line = format!("[{title}] {message}");
        match kind {
            ToastKind::Success => println!("{}", line.bright_green()),
            ToastKind::Warning => println!("{}", line.yellow()),
            ToastKind::Error => println!("{}", line.red()),
        }
    }

    fn show_rating_prompt(&self) {
        println!("{}", "⭐ Berikan rating pelayanan Anda:".bright_yellow());
        println!(
            "{}",
            "   /rating 5 (Sangat Puas) ... /rating 1 (Buruk)".bright_yellow()
        );
        println!(
            "{}",
            "   Tambahkan komentar: /rating 4 kurir ramah".bright_black()
        );
    }

    fn show_rating_form(&self) {
        println!(
            "{}",
            "Form rating terbuka: /rating <1-5> <komentar>".bright_yellow()
        );
    }

    fn close_rating_form(&self) {}
}

/// A single parsed REPL line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Rating { value: u8, comment: String },
    History(String),
    Chat(String),
    Empty,
    Unknown(String),
}

fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }
    if trimmed == "quit" || trimmed == "exit" {
        return Command::Quit;
    }
    if let Some(rest) = strip_command(trimmed, "/rating") {
        let mut parts = rest.splitn(2, char::is_whitespace);
        let value = parts.next().unwrap_or("").parse::<u8>().unwrap_or(0);
        let comment = parts.next().unwrap_or("").trim().to_string();
        return Command::Rating { value, comment };
    }
    if let Some(rest) = strip_command(trimmed, "/history") {
        return Command::History(rest.to_string());
    }
    if trimmed.starts_with('/') {
        return Command::Unknown(trimmed.to_string());
    }
    Command::Chat(trimmed.to_string())
}

/// Matches `name` exactly or `name ` followed by arguments.
fn strip_command<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?;
    if rest.is_empty() {
        Some("")
    } else if rest.starts_with(char::is_whitespace) {
        Some(rest.trim())
    } else {
        None
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    // ===== Backend wiring =====
    let mut transport = match cli.base_url {
        Some(base_url) => HttpTransport::new(base_url),
        None => HttpTransport::try_from_env()?,
    };
    if let Some(token) = cli.csrf_token {
        transport = transport.with_csrf_token(token);
    }

    let presenter = Arc::new(TerminalPresenter);
    let controller = Arc::new(SessionController::new(
        Arc::new(transport),
        presenter.clone(),
    ));

    println!(
        "{}",
        "=== Kurir - FastDelivery Express Support ===".bright_magenta().bold()
    );
    println!(
        "{}",
        "Ketik pesan Anda, '/rating <1-5> [komentar]' untuk menilai, 'quit' untuk keluar."
            .bright_black()
    );
    println!();

    if let Some(session_id) = &cli.session {
        match controller.restore(session_id).await {
            Ok(count) => println!(
                "{}",
                format!("{count} pesan dipulihkan dari sesi {session_id}").bright_black()
            ),
            Err(err) => {
                log::warn!("history restore failed: {err}");
                presenter.show_toast("Error", "Gagal mengambil riwayat chat", ToastKind::Error);
            }
        }
    }

    // ===== Main REPL Loop =====
    let mut rl = DefaultEditor::new()?;
    loop {
        let readline = rl.readline(">> ");

        match readline {
            Ok(line) => {
                let _ = rl.add_history_entry(&line);

                match parse_line(&line) {
                    Command::Empty => continue,
                    Command::Quit => {
                        println!("{}", "Sampai jumpa!".bright_green());
                        break;
                    }
                    Command::Chat(text) => {
                        // Sends run in the background so the prompt stays
                        // responsive; a second send while one is in flight
                        // is dropped by the controller.
                        let controller = Arc::clone(&controller);
                        tokio::spawn(async move {
                            controller.send_message(&text).await;
                        });
                    }
                    Command::Rating { value, comment } => {
                        let controller = Arc::clone(&controller);
                        let presenter = Arc::clone(&presenter);
                        tokio::spawn(async move {
                            if comment.is_empty() {
                                controller.submit_quick_rating(value).await;
                            } else if controller.select_rating(value).await
                                == ExchangeOutcome::Completed
                            {
                                controller.submit_rating(&comment).await;
                            } else {
                                presenter.show_toast(
                                    "Peringatan",
                                    "Rating harus berupa angka 1-5",
                                    ToastKind::Warning,
                                );
                            }
                        });
                    }
                    Command::History(session_id) => {
                        if session_id.is_empty() {
                            println!("{}", "Gunakan: /history <session-id>".yellow());
                            continue;
                        }
                        match controller.restore(&session_id).await {
                            Ok(count) => {
                                println!("{}", format!("{count} pesan dipulihkan").bright_black())
                            }
                            Err(err) => {
                                log::warn!("history restore failed: {err}");
                                presenter.show_toast(
                                    "Error",
                                    "Gagal mengambil riwayat chat",
                                    ToastKind::Error,
                                );
                            }
                        }
                    }
                    Command::Unknown(command) => {
                        println!("{}", format!("Perintah tidak dikenal: {command}").bright_black());
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C. Ketik 'quit' untuk keluar.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Sampai jumpa!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_chat_line() {
        assert_eq!(
            parse_line("status paket saya"),
            Command::Chat("status paket saya".to_string())
        );
    }

    #[test]
    fn test_parse_quit_and_empty() {
        assert_eq!(parse_line("quit"), Command::Quit);
        assert_eq!(parse_line("exit"), Command::Quit);
        assert_eq!(parse_line("   "), Command::Empty);
    }

    #[test]
    fn test_parse_quick_rating() {
        assert_eq!(
            parse_line("/rating 5"),
            Command::Rating {
                value: 5,
                comment: String::new()
            }
        );
    }

    #[test]
    fn test_parse_rating_with_comment() {
        assert_eq!(
            parse_line("/rating 4 kurir ramah sekali"),
            Command::Rating {
                value: 4,
                comment: "kurir ramah sekali".to_string()
            }
        );
    }

    #[test]
    fn test_parse_rating_garbage_value_maps_to_zero() {
        // The controller rejects 0 with its own range warning.
        assert_eq!(
            parse_line("/rating lima"),
            Command::Rating {
                value: 0,
                comment: String::new()
            }
        );
    }

    #[test]
    fn test_parse_history() {
        assert_eq!(
            parse_line("/history abc-123"),
            Command::History("abc-123".to_string())
        );
        assert_eq!(parse_line("/history"), Command::History(String::new()));
    }

    #[test]
    fn test_parse_unknown_command() {
        assert!(matches!(parse_line("/ratings"), Command::Unknown(_)));
    }
}
