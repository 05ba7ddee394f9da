//! Editor state shared by the dashboard and the subcommands.
//!
//! An [`EditorSession`] holds the template currently being edited and which
//! stored template (if any) it came from. Failed operations leave the session
//! exactly as it was.

use crate::clipboard::ClipboardSink;
use crate::error::{Result, VidplateError};
use crate::models::{CopyTarget, TemplateDraft, TemplateFields, TemplateId};
use crate::prompt::VariablePrompt;
use crate::storage::TemplateStore;
use crate::variables::{missing_names, Assignment};
use log::{debug, info};

/// Result of the fill-in-variables workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableOutcome {
    /// The text has no placeholders
    NoVariables,
    /// The user backed out; text is unchanged
    Cancelled,
    /// This many distinct variables were substituted
    Applied(usize),
}

/// Result of a copy action
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CopyOutcome {
    Copied(CopyTarget),
    /// The selected text was empty, nothing was copied
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    pub selected: Option<TemplateId>,
    pub name: String,
    pub fields: TemplateFields,
}

impl EditorSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the editor contents with a stored template
    pub fn load(&mut self, store: &TemplateStore, id: TemplateId) -> Result<()> {
        let template = store.get(id)?.ok_or(VidplateError::TemplateNotFound(id))?;
        self.fields = template.fields();
        self.name = template.name;
        self.selected = Some(id);
        debug!("Loaded template {} into editor", id);
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// The editor contents as they would be stored
    pub fn draft(&self) -> TemplateDraft {
        TemplateDraft::new(self.name.trim(), self.fields.trimmed())
    }

    /// Store the editor contents as a new template and clear the editor
    pub fn save_as_new(&mut self, store: &TemplateStore) -> Result<TemplateId> {
        let draft = self.draft();
        draft.validate()?;
        let id = store.create(&draft)?;
        self.clear();
        Ok(id)
    }

    /// Overwrite the selected template and clear the editor
    pub fn update_selected(&mut self, store: &TemplateStore) -> Result<TemplateId> {
        let id = self.require_selection("update")?;
        let draft = self.draft();
        draft.validate()?;
        store.update(id, &draft)?;
        self.clear();
        Ok(id)
    }

    /// Delete the selected template and clear the editor.
    ///
    /// Asking for confirmation is up to the caller.
    pub fn delete_selected(&mut self, store: &TemplateStore) -> Result<TemplateId> {
        let id = self.require_selection("delete")?;
        store.delete(id)?;
        self.clear();
        Ok(id)
    }

    fn require_selection(&self, action: &str) -> Result<TemplateId> {
        self.selected.ok_or_else(|| {
            VidplateError::Validation(format!("Select a template to {} first", action))
        })
    }

    /// Variable names in the current text, sorted
    pub fn variables(&self) -> Vec<String> {
        self.fields.variables().into_iter().collect()
    }

    pub fn apply_assignment(&mut self, assignment: &Assignment) {
        self.fields = self.fields.apply(assignment);
    }

    /// Find the variables, ask for the values not in `preset`, and
    /// substitute all of them.
    ///
    /// Values the user leaves blank substitute as empty text.
    pub fn fill_variables(
        &mut self,
        prompt: &mut dyn VariablePrompt,
        preset: &Assignment,
    ) -> Result<VariableOutcome> {
        let names = self.variables();
        if names.is_empty() {
            return Ok(VariableOutcome::NoVariables);
        }

        let missing: Vec<String> = missing_names(&names, preset)
            .into_iter()
            .cloned()
            .collect();
        let collected = if missing.is_empty() {
            Assignment::new()
        } else {
            match prompt.collect(&missing)? {
                Some(values) => values,
                None => {
                    info!("Variable input cancelled");
                    return Ok(VariableOutcome::Cancelled);
                }
            }
        };

        let assignment: Assignment = names
            .iter()
            .map(|name| {
                let value = preset
                    .get(name)
                    .or_else(|| collected.get(name))
                    .cloned()
                    .unwrap_or_default();
                (name.clone(), value)
            })
            .collect();

        self.apply_assignment(&assignment);
        debug!("Applied {} variables", assignment.len());
        Ok(VariableOutcome::Applied(assignment.len()))
    }

    /// Text a copy action would place on the clipboard
    pub fn copy_text(&self, target: CopyTarget) -> String {
        self.fields.trimmed().text_for(target)
    }

    pub fn copy_to(
        &self,
        target: CopyTarget,
        clipboard: &mut dyn ClipboardSink,
    ) -> Result<CopyOutcome> {
        let text = self.copy_text(target);
        if text.is_empty() {
            return Ok(CopyOutcome::Empty);
        }
        clipboard.set_text(&text)?;
        Ok(CopyOutcome::Copied(target))
    }
}
