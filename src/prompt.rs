use crate::error::Result;
use crate::variables::{placeholder, Assignment};
use std::io::{self, BufRead, Write};

/// Collects values for a set of variable names.
///
/// Returns `None` when the user cancels; nothing should change then.
pub trait VariablePrompt {
    fn collect(&mut self, names: &[String]) -> Result<Option<Assignment>>;
}

/// Yes/no questions before destructive actions
pub trait Confirm {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Asks for each value on a line of input.
///
/// Prompts go to `writer` so stdout stays free for the filled-in text.
pub struct LinePrompt<R, W> {
    reader: R,
    writer: W,
}

impl LinePrompt<io::StdinLock<'static>, io::Stderr> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> LinePrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Read one line without its line ending; `None` on end of input
    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }
}

impl<R: BufRead, W: Write> Confirm for LinePrompt<R, W> {
    /// Anything but `y`/`yes` is a no
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.writer, "{} [y/N] ", question)?;
        self.writer.flush()?;
        let answer = self.read_line()?.unwrap_or_default();
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}

impl<R: BufRead, W: Write> VariablePrompt for LinePrompt<R, W> {
    fn collect(&mut self, names: &[String]) -> Result<Option<Assignment>> {
        let mut assignment = Assignment::new();
        for name in names {
            write!(self.writer, "{}: ", placeholder(name))?;
            self.writer.flush()?;
            match self.read_line()? {
                Some(value) => {
                    assignment.insert(name.clone(), value);
                }
                None => {
                    writeln!(self.writer)?;
                    return Ok(None);
                }
            }
        }
        Ok(Some(assignment))
    }
}
