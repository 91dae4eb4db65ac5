//! Output sink shared by both backends.
//!
//! Wraps a caller-supplied [`Write`] and adds two pieces of state: a sticky
//! error and a line-start cursor. After the first failed write every later
//! write returns the stored error without touching the underlying writer.
//! The cursor is updated from the last byte of each successful write and is
//! what the Markdown backend uses to avoid doubled or missing line breaks.

use std::fmt;
use std::io::{self, Write};

use crate::error::RenderError;

pub struct Sink<W> {
    out: W,
    err: Option<RenderError>,
    line_start: bool,
}

impl<W: Write> Sink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            err: None,
            line_start: true,
        }
    }

    /// Return the stored error, if a write has already failed.
    pub fn check(&self) -> Result<(), RenderError> {
        match &self.err {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Whether the next byte written starts a fresh line.
    pub fn is_line_start(&self) -> bool {
        self.line_start
    }

    pub fn write_str(&mut self, s: &str) -> Result<(), RenderError> {
        self.check()?;
        if s.is_empty() {
            return Ok(());
        }
        match self.out.write_all(s.as_bytes()) {
            Ok(()) => {
                self.line_start = s.ends_with('\n');
                Ok(())
            }
            Err(err) => Err(self.fail(err.into())),
        }
    }

    pub fn write_args(&mut self, args: fmt::Arguments<'_>) -> Result<(), RenderError> {
        match args.as_str() {
            Some(s) => self.write_str(s),
            None => self.write_str(&args.to_string()),
        }
    }

    /// Write `s` with HTML special characters escaped.
    pub fn write_escaped(&mut self, s: &str) -> Result<(), RenderError> {
        self.write_str(&escape_html(s))
    }

    /// Terminate the current line unless already at the start of one.
    pub fn ensure_newline(&mut self) -> Result<(), RenderError> {
        if self.line_start {
            return Ok(());
        }
        self.write_str("\n")
    }

    /// Separate inline content from what came before with one space.
    pub fn space(&mut self) -> Result<(), RenderError> {
        if self.line_start {
            return Ok(());
        }
        self.write_str(" ")
    }

    /// Leave exactly one blank line before a block-level element.
    pub fn new_block(&mut self) -> Result<(), RenderError> {
        self.ensure_newline()?;
        self.write_str("\n")
    }

    /// Record `err` as the sticky error and return the one now stored.
    ///
    /// The first failure wins; later ones are dropped.
    pub fn fail(&mut self, err: RenderError) -> RenderError {
        match &self.err {
            Some(stored) => stored.clone(),
            None => {
                tracing::warn!(error = %err, "Output sink failed, aborting render");
                self.err = Some(err.clone());
                err
            }
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Lets a nested renderer write through this sink, so the cursor and the
/// sticky error also see bytes written by the nested call.
impl<W: Write> Write for Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(err) = &self.err {
            return Err(io::Error::new(err.io_kind(), err.to_string()));
        }
        match self.out.write(buf) {
            Ok(n) => {
                if n > 0 {
                    self.line_start = buf[n - 1] == b'\n';
                }
                Ok(n)
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => Err(err),
            Err(err) => {
                let kind = err.kind();
                let message = err.to_string();
                self.fail(err.into());
                Err(io::Error::new(kind, message))
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.check()
            .map_err(|err| io::Error::new(err.io_kind(), err.to_string()))?;
        self.out.flush()
    }
}

/// Escape HTML special characters, including both quote styles so the result
/// is safe inside attribute values.
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&#34;"),
            '\'' => result.push_str("&#39;"),
            '\0' => result.push('\u{FFFD}'),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Writer that accepts `budget` bytes and then fails every call.
    pub(crate) struct FailingWriter {
        pub written: Vec<u8>,
        pub budget: usize,
        pub calls_after_failure: usize,
    }

    impl FailingWriter {
        pub fn new(budget: usize) -> Self {
            Self {
                written: Vec::new(),
                budget,
                calls_after_failure: 0,
            }
        }
    }

    impl Write for FailingWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.written.len() + buf.len() > self.budget {
                self.calls_after_failure += 1;
                return Err(io::Error::new(io::ErrorKind::BrokenPipe, "sink closed"));
            }
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn escape_html_specials() {
        assert_eq!(escape_html("<b>"), "&lt;b&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""q""#), "&#34;q&#34;");
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn cursor_follows_last_byte() {
        let mut sink = Sink::new(Vec::new());
        assert!(sink.is_line_start());
        sink.write_str("abc").unwrap();
        assert!(!sink.is_line_start());
        sink.write_str("def\n").unwrap();
        assert!(sink.is_line_start());
    }

    #[test]
    fn empty_write_keeps_cursor() {
        let mut sink = Sink::new(Vec::new());
        sink.write_str("").unwrap();
        assert!(sink.is_line_start());
    }

    #[test]
    fn new_block_leaves_one_blank_line() {
        let mut sink = Sink::new(Vec::new());
        sink.write_str("text").unwrap();
        sink.new_block().unwrap();
        assert_eq!(sink.into_inner(), b"text\n\n");

        let mut sink = Sink::new(Vec::new());
        sink.write_str("text\n").unwrap();
        sink.new_block().unwrap();
        assert_eq!(sink.into_inner(), b"text\n\n");
    }

    #[test]
    fn space_only_mid_line() {
        let mut sink = Sink::new(Vec::new());
        sink.space().unwrap();
        sink.write_str("a").unwrap();
        sink.space().unwrap();
        assert_eq!(sink.into_inner(), b"a ");
    }

    #[test]
    fn error_is_sticky() {
        let mut sink = Sink::new(FailingWriter::new(3));
        sink.write_str("abc").unwrap();
        let first = sink.write_str("def").unwrap_err();
        assert_eq!(first.io_kind(), io::ErrorKind::BrokenPipe);

        let second = sink.write_str("g").unwrap_err();
        assert_eq!(second.io_kind(), io::ErrorKind::BrokenPipe);
        assert!(sink.check().is_err());

        let inner = sink.into_inner();
        assert_eq!(inner.written, b"abc");
        assert_eq!(inner.calls_after_failure, 1);
    }

    #[test]
    fn io_write_updates_cursor_and_error() {
        let mut sink = Sink::new(FailingWriter::new(4));
        sink.write_all(b"ab\n").unwrap();
        assert!(sink.is_line_start());
        assert!(sink.write_all(b"cd").is_err());
        assert!(sink.check().is_err());
        assert!(sink.write_str("x").is_err());
    }
}
