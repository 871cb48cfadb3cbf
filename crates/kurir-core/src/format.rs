//! Display formatting for chat message text.
//!
//! Pure text-to-markup transforms applied exactly once, to raw server or
//! user text, before a message reaches a presenter. Besides the generic
//! inline markup there are two domain passes: tracking numbers get a
//! dedicated span and call-center phone patterns are bolded.

use once_cell::sync::Lazy;
use regex::Regex;

static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.*?)\*").expect("valid regex"));
static CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`(.*?)`").expect("valid regex"));
static TRACKING_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z]{2,3}[0-9]{8,12})").expect("valid regex"));
static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(1500-\d{3}|\d{4}-\d{3})").expect("valid regex"));

/// Renders raw message text into display markup.
///
/// Transform order matters: `**bold**` must be rewritten before `*italic*`
/// so a double asterisk is never half-consumed by the italic pass.
pub fn format_message(content: &str) -> String {
    let mut out = content.replace('\n', "<br>");
    out = BOLD.replace_all(&out, "<strong>$1</strong>").into_owned();
    out = ITALIC.replace_all(&out, "<em>$1</em>").into_owned();
    out = CODE.replace_all(&out, "<code>$1</code>").into_owned();
    out = TRACKING_NUMBER
        .replace_all(&out, r#"<span class="tracking-number">$1</span>"#)
        .into_owned();
    out = PHONE_NUMBER
        .replace_all(&out, r#"<span style="font-weight: bold; color: #667eea;">$1</span>"#)
        .into_owned();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newlines_become_breaks() {
        assert_eq!(format_message("a\nb"), "a<br>b");
    }

    #[test]
    fn test_bold_and_italic() {
        assert_eq!(
            format_message("**Koneksi Bermasalah** dan *penting*"),
            "<strong>Koneksi Bermasalah</strong> dan <em>penting</em>"
        );
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(format_message("ketik `status`"), "ketik <code>status</code>");
    }

    #[test]
    fn test_tracking_number_span() {
        assert_eq!(
            format_message("Resi JNE12345678 diterima"),
            r#"Resi <span class="tracking-number">JNE12345678</span> diterima"#
        );
    }

    #[test]
    fn test_phone_number_bolded() {
        let out = format_message("Hubungi 1500-888 segera");
        assert_eq!(
            out,
            r#"Hubungi <span style="font-weight: bold; color: #667eea;">1500-888</span> segera"#
        );
    }

    #[test]
    fn test_mixed_patterns_are_disjoint() {
        let out = format_message("**hi** `code` AB12345678");
        assert!(out.contains("<strong>hi</strong>"));
        assert!(out.contains("<code>code</code>"));
        assert!(out.contains(r#"<span class="tracking-number">AB12345678</span>"#));
    }

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(format_message("status paket saya"), "status paket saya");
    }
}
