//! Shell-style command splitting.

use crate::run::{Result, RunError};

/// Split a command line into arguments the way a POSIX shell would for
/// plain words: single quotes are literal, double quotes allow `\"`, `\\`,
/// `\$` and `` \` `` escapes, a bare backslash escapes the next character and
/// a backslash-newline pair joins lines.
///
/// ```rust
/// use quadlet_gen::run::tokenize;
///
/// let args = tokenize(r#"docker run -e "MSG=hello world" alpine echo 'a b'"#)?;
/// assert_eq!(args, ["docker", "run", "-e", "MSG=hello world", "alpine", "echo", "a b"]);
/// # Ok::<(), quadlet_gen::run::RunError>(())
/// ```
pub fn tokenize(input: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '\'' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(RunError::Tokenize("unterminated single quote".into())),
                    }
                }
            }
            '"' => {
                in_token = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some('\n') => {}
                            Some(c @ ('"' | '\\' | '$' | '`')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => {
                                return Err(RunError::Tokenize(
                                    "unterminated double quote".into(),
                                ));
                            }
                        },
                        Some(c) => current.push(c),
                        None => return Err(RunError::Tokenize("unterminated double quote".into())),
                    }
                }
            }
            '\\' => match chars.next() {
                Some('\n') => {}
                Some('\r') if chars.peek() == Some(&'\n') => {
                    chars.next();
                }
                Some(c) => {
                    in_token = true;
                    current.push(c);
                }
                None => return Err(RunError::Tokenize("trailing backslash".into())),
            },
            c if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }

    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(
            tokenize("  docker run   nginx ").unwrap(),
            vec!["docker", "run", "nginx"]
        );
    }

    #[test]
    fn test_quotes_and_escapes() {
        assert_eq!(
            tokenize(r#"a "b c" 'd "e"' f\ g "h\"i" "j\k""#).unwrap(),
            vec!["a", "b c", "d \"e\"", "f g", "h\"i", "j\\k"]
        );
    }

    #[test]
    fn test_empty_quoted_argument() {
        assert_eq!(tokenize(r#"-e "" x"#).unwrap(), vec!["-e", "", "x"]);
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            tokenize("docker run \\\n  -p 80:80 \\\n  nginx").unwrap(),
            vec!["docker", "run", "-p", "80:80", "nginx"]
        );
    }

    #[test]
    fn test_unterminated_quote() {
        assert!(matches!(tokenize("echo 'oops"), Err(RunError::Tokenize(_))));
        assert!(matches!(tokenize("echo \"oops"), Err(RunError::Tokenize(_))));
    }
}
