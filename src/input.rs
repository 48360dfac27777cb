// input.rs

use crate::error::ShellError;
use bytes::BytesMut;
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor};
use std::io::{self, BufRead};

#[derive(Debug)]
pub enum ReadOutcome {
    /// One line of raw bytes, with its trailing newline when one was read.
    Line(Vec<u8>),
    Eof,
    Failed(io::Error),
}

pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome;

    /// Whether `read_line` displays the prompt on its own.
    fn prompts_itself(&self) -> bool {
        false
    }
}

/// Reads newline-terminated lines of at most `limit` bytes, `fgets`-style:
/// the tail of an overlong line comes back on the next read.
pub struct BoundedReader<R> {
    inner: R,
    limit: usize,
    buf: BytesMut,
}

impl<R: BufRead> BoundedReader<R> {
    pub fn new(inner: R, limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            inner,
            limit,
            buf: BytesMut::with_capacity(limit),
        }
    }

    fn read_bounded(&mut self) -> io::Result<Option<Vec<u8>>> {
        self.buf.clear();
        while self.buf.len() < self.limit {
            let available = match self.inner.fill_buf() {
                Ok(available) => available,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if available.is_empty() {
                break;
            }
            let room = self.limit - self.buf.len();
            let window = &available[..available.len().min(room)];
            let (take, done) = match window.iter().position(|&b| b == b'\n') {
                Some(newline) => (newline + 1, true),
                None => (window.len(), false),
            };
            self.buf.extend_from_slice(&window[..take]);
            self.inner.consume(take);
            if done {
                break;
            }
        }
        if self.buf.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.buf.to_vec()))
    }
}

impl<R: BufRead> LineSource for BoundedReader<R> {
    fn read_line(&mut self, _prompt: &str) -> ReadOutcome {
        match self.read_bounded() {
            Ok(Some(line)) => ReadOutcome::Line(line),
            Ok(None) => ReadOutcome::Eof,
            Err(e) => ReadOutcome::Failed(e),
        }
    }
}

/// Interactive terminal input through rustyline.
pub struct EditorSource {
    editor: DefaultEditor,
    limit: usize,
}

impl EditorSource {
    pub fn new(limit: usize) -> Result<Self, ShellError> {
        let config = Config::builder().auto_add_history(false).build();
        let editor = DefaultEditor::with_config(config).map_err(ShellError::Editor)?;
        Ok(Self {
            editor,
            limit: limit.max(1),
        })
    }
}

impl LineSource for EditorSource {
    fn read_line(&mut self, prompt: &str) -> ReadOutcome {
        match self.editor.readline(prompt) {
            Ok(mut line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                truncate_to_boundary(&mut line, self.limit - 1);
                line.push('\n');
                ReadOutcome::Line(line.into_bytes())
            }
            // Ctrl-C abandons the current line.
            Err(ReadlineError::Interrupted) => ReadOutcome::Line(b"\n".to_vec()),
            Err(ReadlineError::Eof) => ReadOutcome::Eof,
            Err(ReadlineError::Io(e)) => ReadOutcome::Failed(e),
            Err(err) => ReadOutcome::Failed(io::Error::new(io::ErrorKind::Other, err.to_string())),
        }
    }

    fn prompts_itself(&self) -> bool {
        true
    }
}

fn truncate_to_boundary(line: &mut String, max: usize) {
    if line.len() <= max {
        return;
    }
    let mut end = max;
    while !line.is_char_boundary(end) {
        end -= 1;
    }
    line.truncate(end);
}
