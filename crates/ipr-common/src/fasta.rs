//! Header-line scanning over FASTA text

use std::io::BufRead;

/// A header line with its position in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    /// 1-based line number
    pub line_number: usize,

    /// Line text including the leading `>`, without the line break
    pub text: String,
}

impl HeaderLine {
    /// Leading identifier: text after `>` up to the first tab or space
    pub fn sequence_id(&self) -> Option<&str> {
        self.text
            .trim_start_matches('>')
            .split(char::is_whitespace)
            .next()
            .filter(|id| !id.is_empty())
    }
}

/// Iterate over the header lines of a FASTA stream.
///
/// Sequence lines and blank lines are skipped. Read errors are yielded and
/// end the iteration.
pub fn header_lines<R: BufRead>(reader: R) -> impl Iterator<Item = std::io::Result<HeaderLine>> {
    let mut failed = false;
    reader
        .lines()
        .enumerate()
        .map_while(move |(index, line)| {
            if failed {
                return None;
            }
            match line {
                Ok(text) => Some(Ok((index + 1, text))),
                Err(e) => {
                    failed = true;
                    Some(Err(e))
                },
            }
        })
        .filter_map(|result| match result {
            Ok((line_number, text)) if text.starts_with('>') => {
                let text = text.trim_end_matches('\r').to_string();
                Some(Ok(HeaderLine { line_number, text }))
            },
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_header_lines() {
        let fasta = ">P1\tIPR1(1...5)\tFirst\nMKV\nLLA\n\n>P2\tSecond\r\nMA\n";
        let headers: Vec<_> = header_lines(Cursor::new(fasta))
            .collect::<std::io::Result<_>>()
            .unwrap();

        assert_eq!(headers.len(), 2);
        assert_eq!(headers[0].line_number, 1);
        assert_eq!(headers[0].text, ">P1\tIPR1(1...5)\tFirst");
        assert_eq!(headers[1].line_number, 5);
        assert_eq!(headers[1].text, ">P2\tSecond");
    }

    #[test]
    fn test_sequence_id() {
        let line = |text: &str| HeaderLine {
            line_number: 1,
            text: text.to_string(),
        };
        assert_eq!(line(">P1\tIPR1(1...5)\tFirst").sequence_id(), Some("P1"));
        assert_eq!(line(">sp|P2|X free text").sequence_id(), Some("sp|P2|X"));
        assert_eq!(line(">").sequence_id(), None);
        assert_eq!(line("> P3").sequence_id(), None);
    }

    #[test]
    fn test_header_lines_empty_input() {
        assert_eq!(header_lines(Cursor::new("")).count(), 0);
        assert_eq!(header_lines(Cursor::new("MKV\nLLA\n")).count(), 0);
    }
}
