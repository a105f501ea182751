use std::io::{self, Write};
use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::Metadata;
use tracing_subscriber::fmt::MakeWriter;

use crate::terminal::print;

/// The bar log output has to step around while it is spinning.
static ACTIVE: OnceLock<ProgressBar> = OnceLock::new();

/// Clears itself when dropped, so an early return never leaves it on screen.
pub struct Spinner {
    bar: ProgressBar,
}

impl Drop for Spinner {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}

/// Starts the spinner on stderr. Stays hidden when stderr is not a terminal.
pub fn start(msg: String) -> Spinner {
    let bar = if console::Term::stderr().is_term() {
        ProgressBar::new_spinner()
    } else {
        ProgressBar::hidden()
    };

    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg} {elapsed:.dim}") {
        bar.set_style(style.tick_strings(&[
            "▁▁▁▁▁", "▁▂▂▂▁", "▁▄▂▄▁", "▂▄▆▄▂", "▄▆█▆▄", "▂▄▆▄▂", "▁▄▂▄▁", "▁▂▂▂▁",
        ]));
    }
    bar.set_message(msg);
    bar.enable_steady_tick(Duration::from_millis(100));

    let _ = ACTIVE.set(bar.clone());
    Spinner { bar }
}

#[derive(Debug, Clone, Copy)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn write_all(self, buf: &[u8]) -> io::Result<()> {
        match self {
            Stream::Stdout => io::stdout().lock().write_all(buf),
            Stream::Stderr => io::stderr().lock().write_all(buf),
        }
    }

    fn flush(self) -> io::Result<()> {
        match self {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}

/// Report lines go to stdout, diagnostics to stderr.
pub struct TerminalWriter;

impl<'a> MakeWriter<'a> for TerminalWriter {
    type Writer = SpinnerWriter;

    fn make_writer(&'a self) -> Self::Writer {
        SpinnerWriter { stream: Stream::Stderr }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        let stream = if meta.target() == print::TARGET {
            Stream::Stdout
        } else {
            Stream::Stderr
        };
        SpinnerWriter { stream }
    }
}

/// Suspends a running spinner around each write so lines never interleave with it.
pub struct SpinnerWriter {
    stream: Stream,
}

impl io::Write for SpinnerWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let stream = self.stream;
        match ACTIVE.get().filter(|bar| !bar.is_finished()) {
            Some(bar) => bar.suspend(|| stream.write_all(buf))?,
            None => stream.write_all(buf)?,
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}
