//! Line-oriented terminal interaction.
//!
//! One [`Terminal`] owns the input stream so that transcripts, confirmation
//! answers and feedback are all read from the same buffer.

use std::io::{BufRead, Write};
use std::sync::Mutex;

use async_trait::async_trait;
use voxtask_action::{Action, ConfirmationGate, Decision};

/// Terminal reading answers from `R` and writing prompts to `W`.
pub struct Terminal<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
}

impl<R: BufRead + Send, W: Write + Send> Terminal<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input),
            output: Mutex::new(output),
        }
    }

    /// Print a line.
    pub fn say(&self, line: &str) {
        if let Ok(mut out) = self.output.lock() {
            let _ = writeln!(out, "{line}");
        }
    }

    /// Print `prompt` and read one trimmed line. `None` on end of input.
    pub fn ask(&self, prompt: &str) -> Option<String> {
        if let Ok(mut out) = self.output.lock() {
            let _ = write!(out, "{prompt}");
            let _ = out.flush();
        }
        let mut input = self.input.lock().ok()?;
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }

    /// Consume the terminal and return the output sink.
    #[cfg(test)]
    pub fn into_output(self) -> W {
        match self.output.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl<R: BufRead + Send, W: Write + Send> ConfirmationGate for Terminal<R, W> {
    async fn confirm(&self, batch: &[Action]) -> Decision {
        self.say("Proposed actions:");
        for action in batch {
            self.say(&format!("  - {}", action.describe()));
        }
        match self.ask("Do you want to confirm these actions? (y/n): ") {
            Some(answer) if answer.eq_ignore_ascii_case("y") => Decision::Confirm,
            _ => Decision::Decline,
        }
    }

    async fn feedback(&self) -> Option<String> {
        self.ask("What went wrong? (press Enter to skip): ")
            .filter(|f| !f.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use voxtask_core::TaskId;

    fn terminal(input: &str) -> Terminal<Cursor<Vec<u8>>, Vec<u8>> {
        Terminal::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[tokio::test]
    async fn test_y_confirms() {
        let term = terminal("Y\n");
        let batch = vec![Action::close(TaskId::from("42"), Some("Buy milk"))];
        assert_eq!(term.confirm(&batch).await, Decision::Confirm);

        let shown = String::from_utf8(term.into_output()).unwrap();
        assert!(shown.contains("close #42 'Buy milk'"));
        assert!(shown.contains("(y/n)"));
    }

    #[tokio::test]
    async fn test_anything_else_declines() {
        for answer in ["n\n", "yes\n", "\n", ""] {
            let term = terminal(answer);
            assert_eq!(term.confirm(&[]).await, Decision::Decline, "answer {answer:?}");
        }
    }

    #[tokio::test]
    async fn test_feedback_after_decline() {
        let term = terminal("n\nwrong task\n");
        assert_eq!(term.confirm(&[]).await, Decision::Decline);
        assert_eq!(term.feedback().await.as_deref(), Some("wrong task"));
    }

    #[tokio::test]
    async fn test_empty_feedback_is_none() {
        let term = terminal("\n");
        assert_eq!(term.feedback().await, None);
    }

    #[test]
    fn test_ask_eof() {
        let term = terminal("first\n");
        assert_eq!(term.ask("> ").as_deref(), Some("first"));
        assert_eq!(term.ask("> "), None);
    }
}
