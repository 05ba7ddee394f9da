use crate::error::{Result, VidplateError};
use crate::variables::{apply, extract_all, Assignment};
use clap::ValueEnum;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

pub type TemplateId = i64;

/// A stored template row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Template {
    pub id: TemplateId,
    pub name: String,
    pub title: String,
    pub description: String,
    pub tags: String,
}

impl Template {
    pub fn fields(&self) -> TemplateFields {
        TemplateFields::new(&self.title, &self.description, &self.tags)
    }
}

/// The three text blocks that make up an upload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateFields {
    pub title: String,
    pub description: String,
    pub tags: String,
}

impl TemplateFields {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        tags: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            tags: tags.into(),
        }
    }

    /// Fields in title, description, tags order
    pub fn as_array(&self) -> [&str; 3] {
        [&self.title, &self.description, &self.tags]
    }

    /// Variable names used anywhere in the three fields
    pub fn variables(&self) -> BTreeSet<String> {
        extract_all(self.as_array())
    }

    /// Substitute the assignment into every field
    pub fn apply(&self, assignment: &Assignment) -> TemplateFields {
        TemplateFields {
            title: apply(&self.title, assignment),
            description: apply(&self.description, assignment),
            tags: apply(&self.tags, assignment),
        }
    }

    pub fn trimmed(&self) -> TemplateFields {
        TemplateFields::new(
            self.title.trim(),
            self.description.trim(),
            self.tags.trim(),
        )
    }

    /// The text a copy action puts on the clipboard
    pub fn text_for(&self, target: CopyTarget) -> String {
        match target {
            CopyTarget::Title => self.title.clone(),
            CopyTarget::Description => self.description.clone(),
            CopyTarget::Tags => self.tags.clone(),
            CopyTarget::All => format!("{}\n\n{}\n\n{}", self.title, self.description, self.tags),
        }
    }
}

/// Everything needed to create or overwrite a template
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateDraft {
    pub name: String,
    pub fields: TemplateFields,
}

impl TemplateDraft {
    pub fn new(name: impl Into<String>, fields: TemplateFields) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// Name and title are required; description and tags may be empty
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() || self.fields.title.trim().is_empty() {
            return Err(VidplateError::Validation(
                "Template name and title are required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A row of the template list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateSummary {
    pub id: TemplateId,
    pub name: String,
}

/// Which part of the template a copy action takes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CopyTarget {
    Title,
    Description,
    Tags,
    /// Title, description and tags separated by blank lines
    All,
}

impl CopyTarget {
    pub const ALL: [CopyTarget; 4] = [
        CopyTarget::Title,
        CopyTarget::Description,
        CopyTarget::Tags,
        CopyTarget::All,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            CopyTarget::Title => "title",
            CopyTarget::Description => "description",
            CopyTarget::Tags => "tags",
            CopyTarget::All => "everything",
        }
    }
}

impl fmt::Display for CopyTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
