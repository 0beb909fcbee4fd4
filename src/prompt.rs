//! Interactive input
//!
//! Everything that needs to ask the user for a string (a post title when the
//! source has no heading, the base URL when a store is first created) goes
//! through the [`Prompt`] trait so callers can swap the terminal for a stub.

use std::io::{self, BufRead, Write};

/// Something that can answer a question with a line of text
pub trait Prompt {
    /// Ask `message` and return the (untrimmed) answer
    fn ask(&mut self, message: &str) -> io::Result<String>;
}

impl<F> Prompt for F
where
    F: FnMut(&str) -> io::Result<String>,
{
    fn ask(&mut self, message: &str) -> io::Result<String> {
        self(message)
    }
}

/// Reads answers from standard input
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl Prompt for StdinPrompt {
    fn ask(&mut self, message: &str) -> io::Result<String> {
        let mut stdout = io::stdout();
        write!(stdout, "{}: ", message)?;
        stdout.flush()?;

        let mut line = String::new();
        if io::stdin().lock().read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "standard input closed before an answer was given",
            ));
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }
}

/// Ask until a non-empty (trimmed) answer is given
pub fn ask_non_empty(prompt: &mut dyn Prompt, message: &str) -> io::Result<String> {
    loop {
        let answer = prompt.ask(message)?;
        let answer = answer.trim();
        if !answer.is_empty() {
            return Ok(answer.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closure_prompt() {
        let mut prompt = |_: &str| Ok::<_, io::Error>("  answer \n".to_string());
        assert_eq!(ask_non_empty(&mut prompt, "q").unwrap(), "answer");
    }

    #[test]
    fn test_ask_non_empty_repeats_on_blank() {
        let mut answers = vec!["".to_string(), "   ".to_string(), "third".to_string()];
        answers.reverse();
        let mut asked = 0;
        let mut prompt = |_: &str| {
            asked += 1;
            Ok::<_, io::Error>(answers.pop().unwrap_or_default())
        };
        assert_eq!(ask_non_empty(&mut prompt, "q").unwrap(), "third");
        assert_eq!(asked, 3);
    }

    #[test]
    fn test_prompt_error_propagates() {
        let mut prompt =
            |_: &str| Err::<String, _>(io::Error::new(io::ErrorKind::UnexpectedEof, "closed"));
        let err = ask_non_empty(&mut prompt, "q").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
