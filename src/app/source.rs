// AmfDigest - app/source.rs
//
// Input acquisition: resolve the optional CLI path to a buffered reader over
// a file or stdin, and split it into raw lines.
//
// Encoding: bytes are decoded as lossy UTF-8 so binary payload dumps or
// mis-encoded lines stay opaque text instead of aborting the run.

use crate::util::constants::INPUT_BUFFER_SIZE;
use crate::util::error::InputError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

/// Where trace lines come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    Stdin,
    File(PathBuf),
}

impl InputSource {
    /// A path argument selects a file; no argument selects stdin.
    pub fn from_arg(path: Option<PathBuf>) -> Self {
        match path {
            Some(p) => InputSource::File(p),
            None => InputSource::Stdin,
        }
    }

    /// Open the source for reading. Opening a file fails fast with the path
    /// in the error.
    pub fn open(&self) -> Result<Box<dyn BufRead>, InputError> {
        match self {
            InputSource::Stdin => Ok(Box::new(BufReader::with_capacity(
                INPUT_BUFFER_SIZE,
                io::stdin(),
            ))),
            InputSource::File(path) => {
                let file = File::open(path).map_err(|e| InputError::Open {
                    path: path.clone(),
                    source: e,
                })?;
                tracing::debug!(file = %path.display(), "Input file opened");
                Ok(Box::new(BufReader::with_capacity(INPUT_BUFFER_SIZE, file)))
            }
        }
    }
}

impl std::fmt::Display for InputSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputSource::Stdin => f.write_str("<stdin>"),
            InputSource::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Iterator over the raw lines of a reader, numbered from 1.
///
/// Lines end at `\n`, `\r\n`, or a lone `\r`; the terminator is removed and
/// nothing else is touched. A `\r` at the end of the available bytes returns
/// its line at once, and a `\n` that follows later is swallowed, so a live
/// stream never waits on the byte after a carriage return.
pub struct RawLines<R: BufRead> {
    reader: R,
    buf: Vec<u8>,
    line_number: u64,
    skip_lf: bool,
}

impl<R: BufRead> RawLines<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_number: 0,
            skip_lf: false,
        }
    }

    fn take_line(&mut self) -> (u64, String) {
        self.line_number += 1;
        let line = String::from_utf8_lossy(&self.buf).into_owned();
        (self.line_number, line)
    }
}

impl<R: BufRead> Iterator for RawLines<R> {
    type Item = Result<(u64, String), InputError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.buf.clear();
        loop {
            let available = match self.reader.fill_buf() {
                Ok(bytes) => bytes,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Some(Err(InputError::Read {
                        line_number: self.line_number + 1,
                        source: e,
                    }));
                }
            };
            if available.is_empty() {
                break;
            }

            let start = usize::from(std::mem::take(&mut self.skip_lf) && available[0] == b'\n');
            match available[start..]
                .iter()
                .position(|&b| b == b'\n' || b == b'\r')
            {
                Some(offset) => {
                    let end = start + offset;
                    self.buf.extend_from_slice(&available[start..end]);
                    self.skip_lf = available[end] == b'\r';
                    self.reader.consume(end + 1);
                    return Some(Ok(self.take_line()));
                }
                None => {
                    let len = available.len();
                    self.buf.extend_from_slice(&available[start..]);
                    self.reader.consume(len);
                }
            }
        }

        // End of input: an unterminated final line still counts.
        if self.buf.is_empty() {
            None
        } else {
            Some(Ok(self.take_line()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn collect(input: &[u8]) -> Vec<(u64, String)> {
        RawLines::new(Cursor::new(input.to_vec()))
            .map(|r| r.unwrap())
            .collect()
    }

    #[test]
    fn test_lines_numbered_and_stripped() {
        let lines = collect(b"first\nsecond\r\nthird");
        assert_eq!(
            lines,
            vec![
                (1, "first".to_string()),
                (2, "second".to_string()),
                (3, "third".to_string()),
            ]
        );
    }

    #[test]
    fn test_lone_carriage_return_ends_a_line() {
        let lines = collect(b"Registration Request\rUE connected\r");
        assert_eq!(
            lines,
            vec![
                (1, "Registration Request".to_string()),
                (2, "UE connected".to_string()),
            ]
        );
    }

    #[test]
    fn test_mixed_terminators() {
        let lines: Vec<String> = collect(b"a\r\rb\r\nc\nd")
            .into_iter()
            .map(|(_, l)| l)
            .collect();
        assert_eq!(lines, vec!["a", "", "b", "c", "d"]);
    }

    #[test]
    fn test_crlf_split_across_reads() {
        // A one-byte buffer forces every terminator onto a read boundary.
        let reader = BufReader::with_capacity(1, Cursor::new(b"x\r\ny\r\n\nz".to_vec()));
        let lines: Vec<String> = RawLines::new(reader).map(|r| r.unwrap().1).collect();
        assert_eq!(lines, vec!["x", "y", "", "z"]);
    }

    #[test]
    fn test_blank_lines_kept() {
        let lines = collect(b"a\n\n  \nb\n");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[1].1, "");
        assert_eq!(lines[2].1, "  ");
    }

    #[test]
    fn test_trailing_whitespace_preserved() {
        assert_eq!(collect(b"x \t\n")[0].1, "x \t");
    }

    #[test]
    fn test_invalid_utf8_decoded_lossily() {
        let lines = collect(b"IMSI \xff\xfe 00101\nok\n");
        assert_eq!(lines.len(), 2);
        assert!(lines[0].1.contains('\u{FFFD}'));
        assert_eq!(lines[1].1, "ok");
    }

    #[test]
    fn test_empty_input() {
        assert!(collect(b"").is_empty());
    }

    #[test]
    fn test_missing_file_reports_path() {
        let src = InputSource::File(PathBuf::from("/definitely/not/here/amf.log"));
        match src.open() {
            Err(InputError::Open { path, .. }) => assert!(path.ends_with("amf.log")),
            Err(other) => panic!("expected Open error, got {other:?}"),
            Ok(_) => panic!("expected Open error, got a reader"),
        }
    }

    #[test]
    fn test_from_arg() {
        assert_eq!(InputSource::from_arg(None), InputSource::Stdin);
        assert_eq!(
            InputSource::from_arg(Some(PathBuf::from("t.log"))).to_string(),
            "t.log"
        );
    }
}
