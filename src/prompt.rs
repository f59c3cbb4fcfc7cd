//! Line-based prompting
//!
//! Every interactive prompt site reads through a [`Prompter`], whose
//! [`PromptSource`] is either the console or a pre-seeded answer queue.
//! In non-interactive mode a prompt that would block on the console fails
//! immediately instead.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

use log::debug;

use crate::error::{GroupsError, GroupsResult};

/// Where answers come from
pub trait PromptSource {
    /// Next line of input, or None when no more input is available
    fn read_line(&mut self, prompt: &str) -> GroupsResult<Option<String>>;

    /// Whether reading waits on a person at a terminal
    fn is_interactive(&self) -> bool;
}

/// Reads answers from stdin
#[derive(Debug, Default)]
pub struct ConsolePrompt;

impl PromptSource for ConsolePrompt {
    fn read_line(&mut self, prompt: &str) -> GroupsResult<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush()?;

        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            return Ok(None);
        }

        Ok(Some(input.trim().to_string()))
    }

    fn is_interactive(&self) -> bool {
        true
    }
}

/// Answers from a fixed queue, for tests and automation
///
/// Once the queue is exhausted every read returns None, which callers treat
/// as Back/abort.
#[derive(Debug, Default, Clone)]
pub struct ScriptedPrompt {
    answers: VecDeque<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
        }
    }
}

impl PromptSource for ScriptedPrompt {
    fn read_line(&mut self, _prompt: &str) -> GroupsResult<Option<String>> {
        Ok(self.answers.pop_front().map(|a| a.trim().to_string()))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/// Prompting front end shared by the wizard, validator and manager
pub struct Prompter {
    source: Box<dyn PromptSource>,
    non_interactive: bool,
}

impl Prompter {
    pub fn new(source: Box<dyn PromptSource>, non_interactive: bool) -> Self {
        Self {
            source,
            non_interactive,
        }
    }

    /// Console prompter for normal use
    pub fn console(non_interactive: bool) -> Self {
        Self::new(Box::new(ConsolePrompt), non_interactive)
    }

    /// Prompter answering from a queue
    pub fn scripted<I, S>(answers: I, non_interactive: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Box::new(ScriptedPrompt::new(answers)), non_interactive)
    }

    pub fn is_non_interactive(&self) -> bool {
        self.non_interactive
    }

    /// Ask for one line; None means input is exhausted
    pub fn ask(&mut self, prompt: &str) -> GroupsResult<Option<String>> {
        if self.non_interactive && self.source.is_interactive() {
            return Err(GroupsError::NonInteractive {
                prompt: prompt.trim().to_string(),
            });
        }

        let answer = self.source.read_line(prompt)?;
        debug!(target: "prompt", "{} -> {:?}", prompt.trim(), answer);
        Ok(answer)
    }

    /// Ask a yes/no question; anything but yes (including no input) is no
    pub fn confirm(&mut self, prompt: &str) -> GroupsResult<bool> {
        let answer = self.ask(prompt)?;
        Ok(matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("y") | Some("yes")
        ))
    }

    /// Show a line of output
    pub fn say(&self, message: impl AsRef<str>) {
        println!("{}", message.as_ref());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_answers_in_order_then_exhausted() {
        let mut prompter = Prompter::scripted(["first", " second "], false);

        assert_eq!(prompter.ask("a: ").unwrap().as_deref(), Some("first"));
        assert_eq!(prompter.ask("b: ").unwrap().as_deref(), Some("second"));
        assert_eq!(prompter.ask("c: ").unwrap(), None);
    }

    #[test]
    fn test_confirm() {
        let mut prompter = Prompter::scripted(["YES", "n", "y"], false);
        assert!(prompter.confirm("?").unwrap());
        assert!(!prompter.confirm("?").unwrap());
        assert!(prompter.confirm("?").unwrap());
        assert!(!prompter.confirm("?").unwrap());
    }

    #[test]
    fn test_non_interactive_console_fails_fast() {
        let mut prompter = Prompter::new(Box::new(ConsolePrompt), true);
        let err = prompter.ask("Display name: ").unwrap_err();
        assert!(matches!(
            err,
            GroupsError::NonInteractive { ref prompt } if prompt == "Display name:"
        ));
    }

    #[test]
    fn test_non_interactive_scripted_still_answers() {
        let mut prompter = Prompter::scripted(["ok"], true);
        assert_eq!(prompter.ask("x: ").unwrap().as_deref(), Some("ok"));
    }

    #[test]
    fn test_scripted_source_is_not_interactive() {
        let mut source = ScriptedPrompt::new(["1"]);
        assert!(!source.is_interactive());
        assert_eq!(source.read_line("Pick: ").unwrap().as_deref(), Some("1"));
        assert_eq!(source.read_line("Again: ").unwrap(), None);
    }
}
