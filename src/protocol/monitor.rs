//! Decoder for the quoted/escaped argument format of MONITOR lines.

use tracing::warn;

use crate::protocol::Command;

/// Decode one post-prefix monitor line into a command.
///
/// Tokens are double-quoted; anything between them is separator noise.
/// Escapes inside quotes follow the redis-cli convention: `\"`, `\\`,
/// `\r`, `\a`, `\b`, `\n`, `\t` and `\xHH` with exactly two hex digits.
/// A line that yields no tokens produces a command with an empty name,
/// which the caller must discard.
pub fn parse(line: &str) -> Command {
    let bytes = line.as_bytes();
    let mut parts: Vec<Vec<u8>> = Vec::new();
    let mut part: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut in_quotes = false;
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        i += 1;

        if !in_quotes {
            if c == b'"' {
                in_quotes = true;
                part.clear();
            }
            continue;
        }

        match c {
            b'"' => {
                in_quotes = false;
                parts.push(std::mem::take(&mut part));
            }
            b'\\' => {
                let Some(&escape) = bytes.get(i) else {
                    warn!("truncated escape at end of line: {}", line);
                    break;
                };
                i += 1;
                match escape {
                    b'x' => match bytes.get(i..i + 2) {
                        Some(digits) => {
                            i += 2;
                            match hex::decode(digits) {
                                Ok(decoded) => part.push(decoded[0]),
                                Err(_) => warn!(
                                    "bad hex number {} in monitor line",
                                    String::from_utf8_lossy(digits)
                                ),
                            }
                        }
                        None => {
                            warn!("truncated hex escape at end of line: {}", line);
                            break;
                        }
                    },
                    b'"' | b'\\' => part.push(escape),
                    b'r' => part.push(13),
                    b'a' => part.push(7),
                    b'b' => part.push(8),
                    b'n' => part.push(10),
                    b't' => part.push(9),
                    other => warn!("unexpected escaped char {:?}", other as char),
                }
            }
            _ => part.push(c),
        }
    }
    // A token still open here was never terminated; it is dropped.

    let mut tokens = parts.into_iter();
    let name = tokens
        .next()
        .map(|t| String::from_utf8_lossy(&t).into_owned())
        .unwrap_or_default();

    Command {
        name,
        args: tokens.collect(),
        raw: line.to_string(),
    }
}
