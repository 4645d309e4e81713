//! Colored terminal output utilities.

use console::{Style, Term};

/// Message severity, each with its own color.
#[derive(Clone, Copy)]
enum Tone {
    Plain,
    Success,
    Warning,
    Error,
    Highlight,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Self::Plain => Style::new(),
            Self::Success => Style::new().green(),
            Self::Warning => Style::new().yellow(),
            Self::Error => Style::new().red(),
            Self::Highlight => Style::new().cyan().bold(),
        }
    }
}

/// Terminal output for the CLI.
///
/// Status messages go to stderr so converted documents on stdout stay
/// machine-readable.
pub(crate) struct Output {
    messages: Term,
    documents: Term,
}

impl Output {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            messages: Term::stderr(),
            documents: Term::stdout(),
        }
    }

    pub(crate) fn info(&self, msg: &str) {
        self.say(Tone::Plain, msg);
    }

    pub(crate) fn success(&self, msg: &str) {
        self.say(Tone::Success, msg);
    }

    pub(crate) fn warning(&self, msg: &str) {
        self.say(Tone::Warning, msg);
    }

    pub(crate) fn error(&self, msg: &str) {
        self.say(Tone::Error, msg);
    }

    pub(crate) fn highlight(&self, msg: &str) {
        self.say(Tone::Highlight, msg);
    }

    /// Write a converted document to stdout.
    pub(crate) fn data(&self, text: &str) -> std::io::Result<()> {
        self.documents.write_line(text)
    }

    // Write errors on stderr are ignored.
    fn say(&self, tone: Tone, msg: &str) {
        let _ = self.messages.write_line(&render(tone, msg));
    }
}

fn render(tone: Tone, msg: &str) -> String {
    tone.style().apply_to(msg).to_string()
}
