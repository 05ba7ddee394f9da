//! vidplate - reusable video upload templates.
//!
//! Templates hold a title, description and tags. Any of them may contain
//! `{{name}}` placeholders, which are filled in just before the text is
//! copied to the clipboard.

pub mod cli;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod prompt;
pub mod session;
pub mod storage;
pub mod ui;
pub mod variables;

// Re-export
pub use clipboard::{ClipboardSink, DetachedClipboard, SystemClipboard};
pub use config::{get_config_dir, Config};
pub use error::{Result, VidplateError};
pub use models::{CopyTarget, Template, TemplateDraft, TemplateFields, TemplateId, TemplateSummary};
pub use prompt::{Confirm, LinePrompt, VariablePrompt};
pub use session::{CopyOutcome, EditorSession, VariableOutcome};
pub use storage::TemplateStore;
pub use ui::display_dashboard;
pub use variables::{apply, apply_all, extract, extract_all, Assignment};
