use regex::Regex;
use std::sync::LazyLock;

// CSI sequences (ESC[ ... cmd); covers the common styling/movement codes.
static ANSI_CSI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x1B\[[0-9;?]*[ -/]*[@-~]").expect("valid ANSI regex"));

const MAX_LABEL_CHARS: usize = 200;

/// Strip ANSI escapes and control characters from untrusted text and collapse
/// all whitespace runs to single spaces.
pub fn clean_text(s: &str) -> String {
    let no_ansi = ANSI_CSI.replace_all(s, "");
    let mut cleaned = String::with_capacity(no_ansi.len());
    for ch in no_ansi.chars() {
        if matches!(ch, '\n' | '\r' | '\t') {
            cleaned.push(' ');
        } else if !ch.is_control() {
            cleaned.push(ch);
        }
    }
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `clean_text`, truncated to 200 chars so labels don't blow up the menu width.
pub fn sanitize_for_terminal(s: &str) -> String {
    clean_text(s).chars().take(MAX_LABEL_CHARS).collect()
}
