//! Copy-to-clipboard with a command-line fallback.
//!
//! The system clipboard is tried first. If it fails, the text is piped once
//! into the platform copy tool. The outcome is reported as a notification and
//! never as an error.

use crate::notifications::{NotificationManager, NotificationType, COPY_FEEDBACK_DURATION};
use std::borrow::Cow;
use std::io::Write;
use std::process::{Command, Stdio};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("clipboard provider command failed")]
    CommandFailed,
    #[error("failed to write to clipboard provider's stdin")]
    StdinWriteFailed,
    #[error("clipboard error: {0}")]
    Platform(String),
}

pub type Result<T> = std::result::Result<T, ClipboardError>;

pub trait ClipboardProvider {
    fn name(&self) -> Cow<'_, str>;
    fn set_contents(&mut self, content: &str) -> Result<()>;
}

/// The OS clipboard through `arboard`. Opened on first use.
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClipboardProvider for SystemClipboard {
    fn name(&self) -> Cow<'_, str> {
        "system".into()
    }

    fn set_contents(&mut self, content: &str) -> Result<()> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Platform(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        let Some(clipboard) = self.inner.as_mut() else {
            return Err(ClipboardError::Platform("clipboard unavailable".to_string()));
        };
        clipboard
            .set_text(content.to_string())
            .map_err(|e| ClipboardError::Platform(e.to_string()))
    }
}

/// A copy tool that reads the text from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandClipboard {
    command: &'static str,
    args: &'static [&'static str],
}

#[cfg(target_os = "macos")]
const PBCOPY: CommandClipboard = CommandClipboard::new("pbcopy", &[]);
#[cfg(not(any(windows, target_os = "macos")))]
const WL_COPY: CommandClipboard = CommandClipboard::new("wl-copy", &["--type", "text/plain"]);
#[cfg(not(any(windows, target_os = "macos")))]
const XCLIP: CommandClipboard = CommandClipboard::new("xclip", &["-i", "-selection", "clipboard"]);
#[cfg(not(any(windows, target_os = "macos")))]
const XSEL: CommandClipboard = CommandClipboard::new("xsel", &["-i", "-b"]);
#[cfg(not(target_os = "macos"))]
const CLIP_EXE: CommandClipboard = CommandClipboard::new("clip.exe", &[]);

#[cfg(not(windows))]
fn binary_exists(name: &str) -> bool {
    which::which(name).is_ok()
}

#[cfg(not(any(windows, target_os = "macos")))]
fn env_var_is_set(name: &str) -> bool {
    std::env::var_os(name).is_some()
}

impl CommandClipboard {
    pub const fn new(command: &'static str, args: &'static [&'static str]) -> Self {
        Self { command, args }
    }

    /// Picks the copy tool available in this session, if any.
    #[cfg(target_os = "macos")]
    pub fn detect() -> Option<Self> {
        binary_exists(PBCOPY.command).then_some(PBCOPY)
    }

    #[cfg(windows)]
    pub fn detect() -> Option<Self> {
        Some(CLIP_EXE)
    }

    #[cfg(not(any(windows, target_os = "macos")))]
    pub fn detect() -> Option<Self> {
        if env_var_is_set("WAYLAND_DISPLAY") && binary_exists(WL_COPY.command) {
            Some(WL_COPY)
        } else if env_var_is_set("DISPLAY") && binary_exists(XCLIP.command) {
            Some(XCLIP)
        } else if env_var_is_set("DISPLAY") && binary_exists(XSEL.command) {
            Some(XSEL)
        } else if binary_exists(CLIP_EXE.command) {
            // WSL
            Some(CLIP_EXE)
        } else {
            None
        }
    }

    pub fn command(&self) -> &'static str {
        self.command
    }
}

impl ClipboardProvider for CommandClipboard {
    fn name(&self) -> Cow<'_, str> {
        self.command.into()
    }

    fn set_contents(&mut self, content: &str) -> Result<()> {
        let mut child = Command::new(self.command)
            .args(self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        {
            let mut stdin = child.stdin.take().ok_or(ClipboardError::StdinWriteFailed)?;
            stdin
                .write_all(content.as_bytes())
                .map_err(|_| ClipboardError::StdinWriteFailed)?;
        }

        if !child.wait()?.success() {
            return Err(ClipboardError::CommandFailed);
        }
        Ok(())
    }
}

/// What a copy button copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyTarget {
    /// The paste contents.
    Code,
    /// The paste id.
    Id,
}

impl CopyTarget {
    pub fn success_message(&self) -> &'static str {
        match self {
            CopyTarget::Code => "Code copied!",
            CopyTarget::Id => "ID copied!",
        }
    }
}

pub const COPY_FAILED_MESSAGE: &str = "Copy failed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied,
    CopiedWithFallback,
    Failed,
}

/// Copies text with one fallback attempt and reports the result.
pub struct Copier {
    primary: Box<dyn ClipboardProvider>,
    fallback: Option<Box<dyn ClipboardProvider>>,
}

impl Copier {
    pub fn new(
        primary: Box<dyn ClipboardProvider>,
        fallback: Option<Box<dyn ClipboardProvider>>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// System clipboard with the detected copy tool behind it.
    pub fn system() -> Self {
        let fallback = CommandClipboard::detect();
        match &fallback {
            Some(tool) => log::debug!("Clipboard fallback: {}", tool.command()),
            None => log::debug!("No clipboard fallback tool found"),
        }
        Self::new(
            Box::new(SystemClipboard::new()),
            fallback.map(|tool| Box::new(tool) as Box<dyn ClipboardProvider>),
        )
    }

    /// Copies `text` and shows the result for two seconds.
    ///
    /// `text` must be read from the document when the copy is requested.
    pub fn copy(
        &mut self,
        text: &str,
        target: CopyTarget,
        notifications: &mut NotificationManager,
    ) -> CopyOutcome {
        let outcome = match self.primary.set_contents(text) {
            Ok(()) => CopyOutcome::Copied,
            Err(e) => {
                log::warn!("Copy via {} failed: {}", self.primary.name(), e);
                self.copy_with_fallback(text)
            }
        };

        match outcome {
            CopyOutcome::Copied | CopyOutcome::CopiedWithFallback => notifications.notify_for(
                target.success_message(),
                NotificationType::Success,
                COPY_FEEDBACK_DURATION,
            ),
            CopyOutcome::Failed => notifications.notify_for(
                COPY_FAILED_MESSAGE,
                NotificationType::Error,
                COPY_FEEDBACK_DURATION,
            ),
        }
        outcome
    }

    fn copy_with_fallback(&mut self, text: &str) -> CopyOutcome {
        let Some(fallback) = self.fallback.as_mut() else {
            log::error!("Copy failed and no fallback is available");
            return CopyOutcome::Failed;
        };
        match fallback.set_contents(text) {
            Ok(()) => CopyOutcome::CopiedWithFallback,
            Err(e) => {
                log::error!("Fallback copy via {} failed: {}", fallback.name(), e);
                CopyOutcome::Failed
            }
        }
    }
}
