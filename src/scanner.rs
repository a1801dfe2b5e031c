// (C) 2020 Brandon Lewis
//
// Block scanner: given a token vector and a starting index, find the end of
// the current block. Kept as a pure function over its three arguments, with
// no access to interpreter state, per the re-entrancy guidance the block
// opener/closer count tracks `if`/`times`/`while`/`for`/`def` against `end`.

use crate::error::{ForgeError, Result};

const OPENERS: [&str; 5] = ["if", "times", "while", "for", "def"];

/// Collect the token body of a block starting at `start` (the index right
/// after the opening keyword has already been consumed by the caller).
///
/// Returns `(body, next_index)` where `next_index` is the index right after
/// the consumed terminator. A depth-0 `end` is always consumed, even when
/// `stop_tokens` is given — only a *non*-`end` stop token (e.g. `else`) is
/// left unconsumed, with `next_index` pointing AT that token so the caller
/// can inspect it. This mirrors the reference scanner, which checks for
/// `end` before it checks the stop set.
pub fn collect_block(
    tokens: &[String],
    start: usize,
    stop_tokens: Option<&[&str]>,
) -> Result<(Vec<String>, usize)> {
    let mut depth: i64 = 0;
    let mut i = start;
    let mut body = Vec::new();

    while i < tokens.len() {
        let tok = tokens[i].as_str();

        if tok == "end" {
            if depth == 0 {
                log::debug!("block scanner: terminated at `end` (index {})", i);
                return Ok((body, i + 1));
            }
            depth -= 1;
            body.push(tokens[i].clone());
            i += 1;
            continue;
        }

        if let Some(stops) = stop_tokens {
            if depth == 0 && stops.contains(&tok) {
                log::debug!("block scanner: stopped at `{}` (depth 0, unconsumed)", tok);
                return Ok((body, i));
            }
        }

        if OPENERS.contains(&tok) {
            depth += 1;
            body.push(tokens[i].clone());
            i += 1;
            continue;
        }

        body.push(tokens[i].clone());
        i += 1;
    }

    Err(ForgeError::invalid("unterminated block: expected `end`"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split_whitespace().map(|t| t.to_string()).collect()
    }

    #[test]
    fn simple_block_without_nesting() {
        let tokens = toks("dup mul end 4 sq");
        let (body, next) = collect_block(&tokens, 0, None).unwrap();
        assert_eq!(body, vec!["dup", "mul"]);
        assert_eq!(next, 3);
    }

    #[test]
    fn nested_block_counts_openers() {
        let tokens = toks("if dup end end rest");
        let (body, next) = collect_block(&tokens, 0, None).unwrap();
        assert_eq!(body, vec!["if", "dup", "end"]);
        assert_eq!(next, 4);
    }

    #[test]
    fn stop_tokens_halt_at_depth_zero_without_consuming() {
        let tokens = toks("dup else mul end");
        let (body, next) = collect_block(&tokens, 0, Some(&["else", "end"])).unwrap();
        assert_eq!(body, vec!["dup"]);
        assert_eq!(tokens[next], "else");
    }

    #[test]
    fn stop_tokens_ignore_nested_occurrences() {
        let tokens = toks("if dup end else mul end");
        let (body, next) = collect_block(&tokens, 0, Some(&["else", "end"])).unwrap();
        assert_eq!(body, vec!["if", "dup", "end"]);
        assert_eq!(tokens[next], "else");
    }

    #[test]
    fn depth_zero_end_is_consumed_even_when_it_is_also_a_stop_token() {
        // An `if` block with no `else` still terminates on `end`, not with
        // an unconsumed stop; only `else` should ever be left unconsumed.
        let tokens = toks("dup end rest");
        let (body, next) = collect_block(&tokens, 0, Some(&["else", "end"])).unwrap();
        assert_eq!(body, vec!["dup"]);
        assert_eq!(tokens[next], "rest");
    }

    #[test]
    fn unterminated_block_is_a_fatal_scan_error() {
        let tokens = toks("dup mul");
        assert!(collect_block(&tokens, 0, None).is_err());
    }
}
