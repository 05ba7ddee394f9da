use crate::error::{Result, VidplateError};
use arboard::Clipboard;
use log::{debug, warn};
use std::env;
use std::ffi::OsString;
use std::io::Write;
use std::process::{Child, Command, Stdio};

/// Hidden subcommand run by the process that keeps copied text available
pub const HOLD_SUBCOMMAND: &str = "hold-clipboard";

/// Somewhere copied text can go
pub trait ClipboardSink {
    fn set_text(&mut self, text: &str) -> Result<()>;
}

fn clipboard_error(e: arboard::Error) -> VidplateError {
    VidplateError::Clipboard(e.to_string())
}

/// The system clipboard, owned by this process.
///
/// On Linux the text is served only while the owner is alive, so on its own
/// this is enough only for the lifetime of the current process.
#[derive(Default)]
pub struct SystemClipboard {
    clipboard: Option<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        if self.clipboard.is_none() {
            self.clipboard = Some(Clipboard::new().map_err(clipboard_error)?);
        }

        match self.clipboard.as_mut() {
            Some(clipboard) => {
                clipboard.set_text(text).map_err(clipboard_error)?;
                debug!("Copied {} bytes to clipboard", text.len());
                Ok(())
            }
            None => Err(VidplateError::Clipboard(
                "clipboard unavailable".to_string(),
            )),
        }
    }
}

/// Put `text` on the clipboard and keep serving it until another program
/// replaces it. Returns at once where the system keeps its own copy.
pub fn hold_text(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new().map_err(clipboard_error)?;

    #[cfg(target_os = "linux")]
    {
        use arboard::SetExtLinux;
        clipboard.set().wait().text(text).map_err(clipboard_error)?;
        debug!("Clipboard ownership taken over, holder exiting");
    }

    #[cfg(not(target_os = "linux"))]
    clipboard.set_text(text).map_err(clipboard_error)?;

    Ok(())
}

/// Copies locally, then hands the text to a detached holder process so it
/// outlives vidplate.
pub struct DetachedClipboard {
    local: Option<SystemClipboard>,
    program: Option<OsString>,
    args: Vec<OsString>,
    holders: Vec<Child>,
}

impl DetachedClipboard {
    /// Holder is `vidplate hold-clipboard`, run from the current executable
    pub fn new() -> Self {
        Self {
            local: Some(SystemClipboard::new()),
            program: None,
            args: vec![HOLD_SUBCOMMAND.into()],
            holders: Vec::new(),
        }
    }

    /// Use another holder command, which receives the text on stdin
    pub fn with_holder<I, S>(program: impl Into<OsString>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            local: None,
            program: Some(program.into()),
            args: args.into_iter().map(Into::into).collect(),
            holders: Vec::new(),
        }
    }

    fn spawn_holder(&mut self, text: &str) -> Result<()> {
        // Reap holders that already lost ownership
        self.holders
            .retain_mut(|holder| matches!(holder.try_wait(), Ok(None)));

        let program = match &self.program {
            Some(program) => program.clone(),
            None => env::current_exe()?.into_os_string(),
        };
        let mut holder = Command::new(program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        // Dropping stdin closes it, which ends the holder's read
        if let Some(mut stdin) = holder.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }
        debug!("Clipboard handed to holder process {}", holder.id());
        self.holders.push(holder);
        Ok(())
    }

    #[cfg(test)]
    fn wait_for_holders(&mut self) {
        for holder in &mut self.holders {
            holder.wait().unwrap();
        }
    }
}

impl Default for DetachedClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardSink for DetachedClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        // Fail early when there is no clipboard to talk to
        if let Some(local) = self.local.as_mut() {
            local.set_text(text)?;
        }
        if let Err(e) = self.spawn_holder(text) {
            warn!("Could not start clipboard holder: {}", e);
            return Err(VidplateError::Clipboard(format!(
                "copied, but the text will be gone once vidplate exits: {}",
                e
            )));
        }
        Ok(())
    }
}

/// The clipboard the CLI and dashboard copy through
pub fn lasting_clipboard() -> Box<dyn ClipboardSink> {
    if cfg!(target_os = "linux") {
        Box::new(DetachedClipboard::new())
    } else {
        Box::new(SystemClipboard::new())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn holder_receives_the_text_on_stdin() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("held.txt");
        let mut clipboard =
            DetachedClipboard::with_holder("sh", ["-c".to_string(), format!("cat > '{}'", out.display())]);

        clipboard.set_text("Celeste #4\n\nsecond line").unwrap();
        clipboard.wait_for_holders();

        assert_eq!(fs::read_to_string(&out).unwrap(), "Celeste #4\n\nsecond line");
    }

    #[test]
    fn missing_holder_is_a_clipboard_error() {
        let mut clipboard =
            DetachedClipboard::with_holder("/nonexistent/vidplate-holder", Vec::<String>::new());
        assert!(matches!(
            clipboard.set_text("x"),
            Err(VidplateError::Clipboard(_))
        ));
    }
}
