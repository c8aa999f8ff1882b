//! Terminal styling for command output
//!
//! Every styled value goes through [`Styled`], which asks `owo-colors`
//! whether the target stream supports color (`NO_COLOR`, `CLICOLOR`,
//! `CLICOLOR_FORCE` and TTY detection are honored there).
//!
//! | Method        | Look   | Stream | Used for                          |
//! |---------------|--------|--------|-----------------------------------|
//! | `.accent()`   | Cyan   | stdout | branches, request numbers, paths  |
//! | `.success()`  | Green  | stdout | completed steps                   |
//! | `.error()`    | Red    | stderr | failures                          |
//! | `.warn()`     | Yellow | stderr | missing releases                  |
//! | `.muted()`    | Dim    | stdout | hints and metadata                |
//! | `.emphasis()` | Bold   | stdout | phase headers                     |

use std::fmt::{self, Display};

pub use owo_colors::Stream;
use owo_colors::{OwoColorize, Style};

const ACCENT: Style = Style::new().cyan();
const SUCCESS: Style = Style::new().green();
const ERROR: Style = Style::new().red();
const WARN: Style = Style::new().yellow();
const MUTED: Style = Style::new().dimmed();
const EMPHASIS: Style = Style::new().bold();

/// A value rendered with a style when its stream supports color
#[derive(Clone, Debug)]
pub struct Styled<T> {
    value: T,
    style: Style,
    stream: Stream,
}

impl<T> Styled<T> {
    const fn new(value: T, style: Style, stream: Stream) -> Self {
        Self {
            value,
            style,
            stream,
        }
    }

    /// Detect color support on stderr instead
    #[must_use]
    pub const fn for_stderr(mut self) -> Self {
        self.stream = Stream::Stderr;
        self
    }

    /// Detect color support on stdout instead
    #[must_use]
    pub const fn for_stdout(mut self) -> Self {
        self.stream = Stream::Stdout;
        self
    }
}

impl<T: Display> Display for Styled<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.value
                .if_supports_color(self.stream, |v| v.style(self.style))
        )
    }
}

/// Semantic styling for anything printable
pub trait Stylize: Display {
    /// Primary information
    fn accent(&self) -> Styled<&Self> {
        Styled::new(self, ACCENT, Stream::Stdout)
    }

    /// Completed steps
    fn success(&self) -> Styled<&Self> {
        Styled::new(self, SUCCESS, Stream::Stdout)
    }

    /// Failures; targets stderr
    fn error(&self) -> Styled<&Self> {
        Styled::new(self, ERROR, Stream::Stderr)
    }

    /// Conditions worth a second look; targets stderr
    fn warn(&self) -> Styled<&Self> {
        Styled::new(self, WARN, Stream::Stderr)
    }

    /// Secondary details
    fn muted(&self) -> Styled<&Self> {
        Styled::new(self, MUTED, Stream::Stdout)
    }

    /// Headers
    fn emphasis(&self) -> Styled<&Self> {
        Styled::new(self, EMPHASIS, Stream::Stdout)
    }
}

impl<T: Display + ?Sized> Stylize for T {}

/// Green check mark
pub const fn check() -> Styled<&'static str> {
    Styled::new("✓", SUCCESS, Stream::Stdout)
}

/// Red cross; targets stderr
pub const fn cross() -> Styled<&'static str> {
    Styled::new("✗", ERROR, Stream::Stderr)
}

/// Render `url` as an OSC 8 hyperlink when the terminal supports it
pub fn hyperlink_url(stream: Stream, url: &str) -> String {
    let stream = match stream {
        Stream::Stdout => supports_hyperlinks::Stream::Stdout,
        Stream::Stderr => supports_hyperlinks::Stream::Stderr,
    };

    if supports_hyperlinks::on(stream) {
        terminal_link::Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}
