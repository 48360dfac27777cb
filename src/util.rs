// util.rs

use std::io::Write;

pub fn write_ignore_broken_pipe<W: Write, B: AsRef<[u8]>>(mut w: W, bytes: B) -> std::io::Result<()> {
    match w.write_all(bytes.as_ref()) {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

pub fn flush_ignore_broken_pipe<W: Write>(w: &mut W) -> std::io::Result<()> {
    match w.flush() {
        Err(ref e) if e.kind() == std::io::ErrorKind::BrokenPipe => Ok(()),
        other => other,
    }
}

/// Writes a diagnostic line and flushes so it lands before any child output.
pub fn notify<W: Write, B: AsRef<[u8]>>(w: &mut W, line: B) -> std::io::Result<()> {
    write_ignore_broken_pipe(&mut *w, line)?;
    write_ignore_broken_pipe(&mut *w, b"\n")?;
    flush_ignore_broken_pipe(w)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A sink whose reader has gone away.
    pub(crate) struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }
    }

    #[test]
    fn notify_appends_newline() {
        let mut out = Vec::new();
        notify(&mut out, "Event not found.").unwrap();
        assert_eq!(out, b"Event not found.\n");
    }

    #[test]
    fn notify_passes_raw_bytes() {
        let mut out = Vec::new();
        notify(&mut out, b"\xff: execution failed").unwrap();
        assert_eq!(out, b"\xff: execution failed\n");
    }

    #[test]
    fn broken_pipe_is_not_an_error() {
        assert!(notify(&mut ClosedPipe, "gone").is_ok());
        assert!(write_ignore_broken_pipe(ClosedPipe, "gone").is_ok());
    }
}
