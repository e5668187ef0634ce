//! Yes/no confirmation prompts
//!
//! Only `y` and `yes` (any case) count as agreement. Anything else, including
//! an empty line or end of input, is a no.

use crate::error::{InstallError, Result};
use std::fs::File;
use std::io::{self, Read, Write};
use std::os::fd::AsFd;

/// Asks the user a yes/no question.
pub trait Prompter {
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Line-based prompter over any reader/writer pair (stdin/stdout in `main`).
///
/// The answer is read one byte at a time and never past its newline, so
/// input queued behind it stays on the descriptor for the child commands.
pub struct LinePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: Read, W: Write> LinePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl LinePrompter<File, io::Stdout> {
    /// Prompter bound to the process's stdin and stdout.
    ///
    /// Reads through an unbuffered duplicate of fd 0 rather than
    /// `io::stdin()`, whose shared buffer would hold on to piped input.
    pub fn stdio() -> Result<Self> {
        let fd = io::stdin()
            .as_fd()
            .try_clone_to_owned()
            .map_err(InstallError::Prompt)?;
        Ok(Self::new(File::from(fd), io::stdout()))
    }
}

impl<R: Read, W: Write> Prompter for LinePrompter<R, W> {
    fn confirm(&mut self, question: &str) -> Result<bool> {
        write!(self.output, "{} [y/N] ", question).map_err(InstallError::Prompt)?;
        self.output.flush().map_err(InstallError::Prompt)?;

        match read_line_unbuffered(&mut self.input).map_err(InstallError::Prompt)? {
            Some(answer) => Ok(is_affirmative(&answer)),
            None => {
                // EOF: nobody is there to agree
                writeln!(self.output).map_err(InstallError::Prompt)?;
                Ok(false)
            }
        }
    }
}

/// Read the next line, consuming its `\n` and nothing after it.
/// `None` at end of input.
fn read_line_unbuffered<R: Read>(input: &mut R) -> io::Result<Option<String>> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];
    let mut terminated = false;
    loop {
        match input.read(&mut byte) {
            Ok(0) => break,
            Ok(_) if byte[0] == b'\n' => {
                terminated = true;
                break;
            }
            Ok(_) => line.push(byte[0]),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    if line.is_empty() && !terminated {
        return Ok(None);
    }
    Ok(Some(String::from_utf8_lossy(&line).into_owned()))
}

/// Whether an answer means yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
