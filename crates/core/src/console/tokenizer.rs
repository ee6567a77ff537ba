//! Console line tokenizer
//!
//! - whitespace separates tokens
//! - `"double quotes"` group a token, `\"` and `\\` escape inside quotes
//! - `;` outside quotes separates statements
//! - `//` outside quotes comments out the rest of the line

/// Tokenizer errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenizeError {
    /// A quote was opened and never closed
    #[error("Unterminated quote starting at column {0}")]
    UnterminatedQuote(usize),
}

/// Split input into statements, each a list of tokens
///
/// Empty statements are dropped, so `"a;;b"` yields two statements.
pub fn tokenize(input: &str) -> Result<Vec<Vec<String>>, TokenizeError> {
    let mut statements = Vec::new();
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;

    let mut chars = input.char_indices().peekable();
    while let Some((pos, c)) = chars.next() {
        match c {
            '"' => {
                in_token = true;
                let mut closed = false;
                while let Some((_, c)) = chars.next() {
                    match c {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' if matches!(chars.peek(), Some((_, '"' | '\\'))) => {
                            if let Some((_, escaped)) = chars.next() {
                                current.push(escaped);
                            }
                        }
                        _ => current.push(c),
                    }
                }
                if !closed {
                    return Err(TokenizeError::UnterminatedQuote(pos));
                }
            }
            '/' if matches!(chars.peek(), Some((_, '/'))) => {
                for (_, c) in chars.by_ref() {
                    if c == '\n' {
                        break;
                    }
                }
                flush_token(&mut tokens, &mut current, &mut in_token);
                if !tokens.is_empty() {
                    statements.push(std::mem::take(&mut tokens));
                }
            }
            ';' | '\n' => {
                flush_token(&mut tokens, &mut current, &mut in_token);
                if !tokens.is_empty() {
                    statements.push(std::mem::take(&mut tokens));
                }
            }
            c if c.is_whitespace() => flush_token(&mut tokens, &mut current, &mut in_token),
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    flush_token(&mut tokens, &mut current, &mut in_token);
    if !tokens.is_empty() {
        statements.push(tokens);
    }
    Ok(statements)
}

fn flush_token(tokens: &mut Vec<String>, current: &mut String, in_token: &mut bool) {
    if *in_token {
        tokens.push(std::mem::take(current));
        *in_token = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(input: &str) -> Vec<Vec<String>> {
        tokenize(input).unwrap()
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(toks("  fps_max   144 "), vec![vec!["fps_max", "144"]]);
        assert!(toks("   ").is_empty());
    }

    #[test]
    fn test_quotes_group_tokens() {
        assert_eq!(
            toks(r#"name "John Doe" """#),
            vec![vec!["name", "John Doe", ""]]
        );
        assert_eq!(toks(r#"say "a \"b\" c""#), vec![vec!["say", r#"a "b" c"#]]);
        assert_eq!(toks(r#"say "a;b // c""#), vec![vec!["say", "a;b // c"]]);
    }

    #[test]
    fn test_statements_and_comments() {
        assert_eq!(
            toks("sv_cheats 1; noclip;; // rest is ignored; quit"),
            vec![vec!["sv_cheats", "1"], vec!["noclip"]]
        );
        assert_eq!(toks("a 1\nb 2"), vec![vec!["a", "1"], vec!["b", "2"]]);
        assert_eq!(
            toks("a 1 // first\n// whole line\nb 2"),
            vec![vec!["a", "1"], vec!["b", "2"]]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(
            tokenize(r#"say "oops"#),
            Err(TokenizeError::UnterminatedQuote(4))
        );
    }
}
