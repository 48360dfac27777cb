// parser.rs

pub const BACKGROUND_MARKER: u8 = b'&';

/// C-locale `isspace`: the only bytes that separate tokens.
pub fn is_separator(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\x0b' | b'\x0c' | b'\r')
}

/// Argument vector of one input line plus its execution mode.
///
/// Tokens are raw bytes; nothing about the line is assumed to be UTF-8.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Vec<u8>>,
    background: bool,
}

impl TokenList {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
    pub fn background(&self) -> bool {
        self.background
    }
    pub fn program(&self) -> Option<&[u8]> {
        self.tokens.first().map(Vec::as_slice)
    }
    pub fn argv(&self) -> &[Vec<u8>] {
        &self.tokens
    }
}

/// Splits on separator bytes only and strips a trailing background marker.
pub fn tokenize(line: &[u8]) -> TokenList {
    let mut tokens: Vec<Vec<u8>> = line
        .split(|&b| is_separator(b))
        .filter(|token| !token.is_empty())
        .map(<[u8]>::to_vec)
        .collect();

    let mut background = false;
    if let Some(last) = tokens.last_mut() {
        if last.as_slice() == [BACKGROUND_MARKER] {
            tokens.pop();
            background = true;
        } else if last.ends_with(&[BACKGROUND_MARKER]) {
            last.pop();
            background = true;
        }
    }
    TokenList { tokens, background }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn words(list: &TokenList) -> Vec<String> {
        list.argv()
            .iter()
            .map(|t| String::from_utf8_lossy(t).into_owned())
            .collect()
    }

    #[test]
    fn blank_lines_have_no_tokens() {
        for line in ["", "   ", "\t \n", "\n", "\r\x0b\x0c"] {
            let list = tokenize(line.as_bytes());
            assert!(list.is_empty(), "{line:?}");
            assert!(!list.background());
        }
    }

    #[test]
    fn separate_marker_is_removed() {
        let list = tokenize(b"ls -la &");
        assert_eq!(words(&list), vec!["ls", "-la"]);
        assert!(list.background());
    }

    #[test]
    fn attached_marker_is_stripped() {
        let list = tokenize(b"ls -la&\n");
        assert_eq!(words(&list), vec!["ls", "-la"]);
        assert!(list.background());
    }

    #[test]
    fn foreground_command_is_untouched() {
        let list = tokenize(b"ls -la\n");
        assert_eq!(words(&list), vec!["ls", "-la"]);
        assert!(!list.background());
        assert_eq!(list.program(), Some(&b"ls"[..]));
    }

    #[test]
    fn ascii_whitespace_separates_and_quotes_are_literal() {
        let list = tokenize(b"  echo\t'a b'  \"c\"\\ d ");
        assert_eq!(words(&list), vec!["echo", "'a", "b'", "\"c\"\\", "d"]);
    }

    #[test]
    fn unicode_spaces_stay_inside_a_token() {
        let list = tokenize("echo a\u{00A0}b\u{2003}c".as_bytes());
        assert_eq!(words(&list), vec!["echo", "a\u{00A0}b\u{2003}c"]);
    }

    #[test]
    fn invalid_utf8_is_kept_verbatim() {
        let list = tokenize(b"ls caf\xe9 \xff&");
        assert_eq!(
            list.argv(),
            &[b"ls".to_vec(), b"caf\xe9".to_vec(), b"\xff".to_vec()]
        );
        assert!(list.background());
    }

    #[test]
    fn lone_marker_leaves_nothing_to_run() {
        let list = tokenize(b"  &  \n");
        assert!(list.is_empty());
        assert!(list.background());
        assert_eq!(list.program(), None);
    }

    #[test]
    fn only_last_token_is_inspected() {
        let list = tokenize(b"a& b");
        assert_eq!(words(&list), vec!["a&", "b"]);
        assert!(!list.background());

        let list = tokenize(b"sleep 5&&");
        assert_eq!(words(&list), vec!["sleep", "5&"]);
        assert!(list.background());
    }
}
