// builtins.rs

use crate::history::HistoryLedger;
use crate::util::{flush_ignore_broken_pipe, write_ignore_broken_pipe};
use std::io::Write;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    History,
}

impl Builtin {
    pub fn lookup(program: &[u8]) -> Option<Self> {
        match program {
            b"exit" => Some(Builtin::Exit),
            b"history" => Some(Builtin::History),
            _ => None,
        }
    }
}

/// Live history, oldest first, one `"  <id>  <text>"` line per record.
pub fn format_history(ledger: &HistoryLedger) -> Vec<u8> {
    let mut listing = Vec::new();
    for record in ledger.enumerate() {
        listing.extend_from_slice(format!("  {}  ", record.id).as_bytes());
        listing.extend_from_slice(&record.command);
        if !record.command.ends_with(b"\n") {
            listing.push(b'\n');
        }
    }
    listing
}

pub fn print_history<W: Write>(ledger: &HistoryLedger, out: &mut W) -> std::io::Result<()> {
    if ledger.is_empty() {
        return Ok(());
    }
    write_ignore_broken_pipe(&mut *out, format_history(ledger))?;
    flush_ignore_broken_pipe(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::tests::ClosedPipe;
    use pretty_assertions::assert_eq;

    #[test]
    fn only_exact_names_are_builtins() {
        assert_eq!(Builtin::lookup(b"exit"), Some(Builtin::Exit));
        assert_eq!(Builtin::lookup(b"history"), Some(Builtin::History));
        assert_eq!(Builtin::lookup(b"Exit"), None);
        assert_eq!(Builtin::lookup(b"exit&"), None);
        assert_eq!(Builtin::lookup(b"ls"), None);
    }

    #[test]
    fn history_lists_oldest_first() {
        let mut ledger = HistoryLedger::new(2);
        ledger.append("ls\n");
        ledger.append("echo hi\n");
        ledger.append("history\n");
        assert_eq!(format_history(&ledger), b"  2  echo hi\n  3  history\n");
    }

    #[test]
    fn record_without_newline_still_ends_its_line() {
        let mut ledger = HistoryLedger::new(4);
        ledger.append("abc");
        ledger.append("def\n");
        assert_eq!(format_history(&ledger), b"  1  abc\n  2  def\n");
    }

    #[test]
    fn listing_keeps_non_utf8_bytes() {
        let mut ledger = HistoryLedger::new(4);
        ledger.append(b"ls \xff\n".to_vec());
        assert_eq!(format_history(&ledger), b"  1  ls \xff\n");
    }

    #[test]
    fn empty_history_prints_nothing() {
        let mut out = Vec::new();
        print_history(&HistoryLedger::default(), &mut out).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn closed_output_does_not_fail_history() {
        let mut ledger = HistoryLedger::new(2);
        ledger.append("history\n");
        assert!(print_history(&ledger, &mut ClosedPipe).is_ok());
    }
}
