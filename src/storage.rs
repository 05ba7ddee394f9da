use crate::error::{Result, VidplateError};
use crate::models::{Template, TemplateDraft, TemplateFields, TemplateId, TemplateSummary};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS templates (
        id INTEGER PRIMARY KEY,
        template_name TEXT NOT NULL,
        title_template TEXT,
        description_template TEXT,
        tags_template TEXT
    );
";

/// SQLite-backed template storage
pub struct TemplateStore {
    conn: Connection,
}

impl TemplateStore {
    /// Open the database at `path`, creating the file and schema if needed
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        debug!("Opened template database at {}", path.display());
        Self::init(conn)
    }

    /// A throwaway store, used by tests and dry runs
    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a new template and return its id
    pub fn create(&self, draft: &TemplateDraft) -> Result<TemplateId> {
        self.conn.execute(
            "INSERT INTO templates (template_name, title_template, description_template, tags_template)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                draft.name,
                draft.fields.title,
                draft.fields.description,
                draft.fields.tags
            ],
        )?;
        let id = self.conn.last_insert_rowid();
        info!("Created template {} ({})", id, draft.name);
        Ok(id)
    }

    /// Overwrite all fields of an existing template
    pub fn update(&self, id: TemplateId, draft: &TemplateDraft) -> Result<()> {
        let changed = self.conn.execute(
            "UPDATE templates
             SET template_name = ?1, title_template = ?2, description_template = ?3, tags_template = ?4
             WHERE id = ?5",
            params![
                draft.name,
                draft.fields.title,
                draft.fields.description,
                draft.fields.tags,
                id
            ],
        )?;
        if changed == 0 {
            return Err(VidplateError::TemplateNotFound(id));
        }
        info!("Updated template {} ({})", id, draft.name);
        Ok(())
    }

    pub fn delete(&self, id: TemplateId) -> Result<()> {
        let changed = self
            .conn
            .execute("DELETE FROM templates WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(VidplateError::TemplateNotFound(id));
        }
        info!("Deleted template {}", id);
        Ok(())
    }

    /// All templates by name, most recently created first
    pub fn list(&self) -> Result<Vec<TemplateSummary>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, template_name FROM templates ORDER BY id DESC")?;
        let rows = stmt.query_map([], |row| {
            Ok(TemplateSummary {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;
        let summaries = rows.collect::<rusqlite::Result<Vec<_>>>()?;
        debug!("Listed {} templates", summaries.len());
        Ok(summaries)
    }

    /// The text fields of a template, or `None` if the id is unknown
    pub fn get_by_id(&self, id: TemplateId) -> Result<Option<TemplateFields>> {
        let fields = self
            .conn
            .query_row(
                "SELECT title_template, description_template, tags_template
                 FROM templates WHERE id = ?1",
                params![id],
                |row| read_fields(row, 0),
            )
            .optional()?;
        Ok(fields)
    }

    /// The full template row including its name
    pub fn get(&self, id: TemplateId) -> Result<Option<Template>> {
        let template = self
            .conn
            .query_row(
                "SELECT id, template_name, title_template, description_template, tags_template
                 FROM templates WHERE id = ?1",
                params![id],
                |row| {
                    let fields = read_fields(row, 2)?;
                    Ok(Template {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        title: fields.title,
                        description: fields.description,
                        tags: fields.tags,
                    })
                },
            )
            .optional()?;
        Ok(template)
    }
}

// The text columns are nullable; NULL reads back as an empty field.
fn read_fields(row: &Row<'_>, first: usize) -> rusqlite::Result<TemplateFields> {
    let title: Option<String> = row.get(first)?;
    let description: Option<String> = row.get(first + 1)?;
    let tags: Option<String> = row.get(first + 2)?;
    Ok(TemplateFields::new(
        title.unwrap_or_default(),
        description.unwrap_or_default(),
        tags.unwrap_or_default(),
    ))
}
