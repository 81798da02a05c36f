//! Text wire format: base-10 integers separated by any whitespace, read as
//! `x1 y1 x2 y2 ...`. A trailing unpaired token is dropped.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("chunk is not valid UTF-8 (valid up to byte {valid_up_to})")]
    InvalidUtf8 { valid_up_to: usize },
    #[error("token {index} ({token:?}) is not a base-10 integer")]
    MalformedInput { token: String, index: usize },
}

/// Decodes one chunk into coordinate pairs.
///
/// The whole chunk fails if any paired token is not an integer; pairs
/// decoded before the bad token are discarded with it.
pub fn parse(bytes: &[u8]) -> Result<Vec<(i32, i32)>, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|e| ParseError::InvalidUtf8 {
        valid_up_to: e.valid_up_to(),
    })?;

    let tokens: Vec<&str> = text.split_whitespace().collect();
    let paired = tokens.len() / 2 * 2;

    tokens[..paired]
        .chunks_exact(2)
        .enumerate()
        .map(|(pair, xy)| -> Result<(i32, i32), ParseError> {
            let x = parse_token(xy[0], pair * 2)?;
            let y = parse_token(xy[1], pair * 2 + 1)?;
            Ok((x, y))
        })
        .collect()
}

fn parse_token(token: &str, index: usize) -> Result<i32, ParseError> {
    token.parse::<i32>().map_err(|_| ParseError::MalformedInput {
        token: token.to_string(),
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_even_token_count() {
        let pairs = parse(b"10 20 30 40").unwrap();
        assert_eq!(pairs, vec![(10, 20), (30, 40)]);
    }

    #[test]
    fn test_odd_token_count_drops_last() {
        let pairs = parse(b"10 20 30").unwrap();
        assert_eq!(pairs, vec![(10, 20)]);
    }

    #[test]
    fn test_unpaired_trailing_token_is_not_validated() {
        let pairs = parse(b"1 2 junk").unwrap();
        assert_eq!(pairs, vec![(1, 2)]);
    }

    #[test]
    fn test_single_token_yields_nothing() {
        assert!(parse(b"42").unwrap().is_empty());
    }

    #[test]
    fn test_empty_input() {
        assert!(parse(b"").unwrap().is_empty());
        assert!(parse(b"  \n\t ").unwrap().is_empty());
    }

    #[test]
    fn test_mixed_whitespace_runs() {
        let pairs = parse(b"  1\t2\n\n3   4\r\n").unwrap();
        assert_eq!(pairs, vec![(1, 2), (3, 4)]);
    }

    #[test]
    fn test_signed_values_accepted() {
        let pairs = parse(b"-5 +7 150 -200").unwrap();
        assert_eq!(pairs, vec![(-5, 7), (150, -200)]);
    }

    #[test]
    fn test_non_numeric_token_fails_whole_chunk() {
        let err = parse(b"10 abc").unwrap_err();
        assert_eq!(
            err,
            ParseError::MalformedInput {
                token: "abc".to_string(),
                index: 1,
            }
        );
    }

    #[test]
    fn test_late_malformed_token_discards_earlier_pairs() {
        let result = parse(b"1 2 3 4 5 x");
        match result {
            Err(ParseError::MalformedInput { token, index }) => {
                assert_eq!(token, "x");
                assert_eq!(index, 5);
            }
            other => panic!("Expected MalformedInput, got {:?}", other),
        }
    }

    #[test]
    fn test_overflow_is_malformed() {
        assert!(parse(b"99999999999 1").is_err());
    }

    #[test]
    fn test_fractional_is_malformed() {
        assert!(parse(b"1.5 2").is_err());
    }

    #[test]
    fn test_invalid_utf8() {
        let err = parse(&[b'1', b' ', 0xff, 0xfe]).unwrap_err();
        assert_eq!(err, ParseError::InvalidUtf8 { valid_up_to: 2 });
    }

    #[test]
    fn test_pairs_keep_arrival_order() {
        let input: String = (0..50).map(|i| format!("{} {} ", i, 100 - i)).collect();
        let pairs = parse(input.as_bytes()).unwrap();
        assert_eq!(pairs.len(), 50);
        for (i, (x, y)) in pairs.iter().enumerate() {
            assert_eq!(*x, i as i32);
            assert_eq!(*y, 100 - i as i32);
        }
    }
}
