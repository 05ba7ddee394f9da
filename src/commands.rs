use crate::cli::{Commands, Vidplate};
use crate::clipboard::{hold_text, lasting_clipboard, ClipboardSink};
use crate::config::Config;
use crate::error::{Result, VidplateError};
use crate::models::{CopyTarget, TemplateFields, TemplateId};
use crate::prompt::{Confirm, LinePrompt, VariablePrompt};
use crate::session::{CopyOutcome, EditorSession, VariableOutcome};
use crate::storage::TemplateStore;
use crate::ui::display_dashboard;
use crate::variables::{parse_assignment, placeholder, Assignment};
use log::info;
use std::io::{self, Read};

pub fn handle_command(args: Vidplate, config: &Config) -> Result<()> {
    // The clipboard holder never touches the database
    if let Some(Commands::HoldClipboard) = args.commands {
        let mut text = String::new();
        io::stdin().read_to_string(&mut text)?;
        return hold_text(&text);
    }

    let db_path = config.database_path(args.db.as_deref());
    info!("Using template database {}", db_path.display());
    let store = TemplateStore::open(&db_path)?;

    match args.commands {
        Some(command) => handle_subcommand(
            command,
            &store,
            &mut LinePrompt::stdio(),
            lasting_clipboard().as_mut(),
        ),
        None => display_dashboard(&store), // Default: open the dashboard
    }
}

fn handle_subcommand<P>(
    command: Commands,
    store: &TemplateStore,
    prompt: &mut P,
    clipboard: &mut dyn ClipboardSink,
) -> Result<()>
where
    P: VariablePrompt + Confirm,
{
    match command {
        Commands::Add {
            name,
            title,
            description,
            tags,
        } => {
            let mut session = EditorSession {
                selected: None,
                name,
                fields: TemplateFields::new(title, description, tags),
            };
            session
                .save_as_new(store)
                .map(|id| println!("Template added with id {}", id))
        }
        Commands::Update {
            id,
            name,
            title,
            description,
            tags,
        } => {
            let mut session = EditorSession {
                selected: Some(id),
                name,
                fields: TemplateFields::new(title, description, tags),
            };
            session
                .update_selected(store)
                .map(|id| println!("Template {} updated successfully", id))
        }
        Commands::Delete { id, yes } => handle_delete(store, id, yes, prompt),
        Commands::List { json } => handle_list(store, json),
        Commands::Show { id, json } => {
            let template = store.get(id)?.ok_or(VidplateError::TemplateNotFound(id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&template)?);
            } else {
                println!("Name: {}", template.name);
                print_fields(&template.fields());
            }
            Ok(())
        }
        Commands::Vars { id } => {
            let session = load_session(store, id)?;
            let names = session.variables();
            if names.is_empty() {
                println!("Template {} has no {{{{variables}}}}", id);
            }
            for name in names {
                println!("{}", placeholder(&name));
            }
            Ok(())
        }
        Commands::Fill {
            id,
            set,
            copy,
            save,
        } => {
            let filled = handle_fill(store, id, &set, prompt, save)?;
            match (filled, copy) {
                (Some(session), Some(target)) => copy_to_clipboard(&session, target, clipboard),
                _ => Ok(()),
            }
        }
        Commands::Copy { id, mode } => {
            let session = load_session(store, id)?;
            copy_to_clipboard(&session, mode, clipboard)
        }
        Commands::HoldClipboard => Err(VidplateError::Other(
            "hold-clipboard reads the text to hold from stdin".to_string(),
        )),
    }
}

fn load_session(store: &TemplateStore, id: TemplateId) -> Result<EditorSession> {
    let mut session = EditorSession::new();
    session.load(store, id)?;
    Ok(session)
}

fn handle_list(store: &TemplateStore, json: bool) -> Result<()> {
    let templates = store.list()?;
    if json {
        println!("{}", serde_json::to_string_pretty(&templates)?);
        return Ok(());
    }
    if templates.is_empty() {
        println!("No templates yet. Add one with 'vidplate add' or open the dashboard.");
        return Ok(());
    }
    for template in templates {
        println!("{:>4}  {}", template.id, template.name);
    }
    Ok(())
}

fn handle_delete(
    store: &TemplateStore,
    id: TemplateId,
    yes: bool,
    confirm: &mut dyn Confirm,
) -> Result<()> {
    let mut session = load_session(store, id)?;
    if !yes {
        let question = format!("Really delete template {} '{}'?", id, session.name);
        if !confirm.confirm(&question)? {
            println!("Operation canceled.");
            return Ok(());
        }
    }
    session
        .delete_selected(store)
        .map(|id| println!("Template {} deleted successfully", id))
}

/// Fill in and print a template; `None` when the user cancelled
fn handle_fill(
    store: &TemplateStore,
    id: TemplateId,
    set: &[String],
    prompt: &mut dyn VariablePrompt,
    save: bool,
) -> Result<Option<EditorSession>> {
    let preset = set
        .iter()
        .map(|pair| parse_assignment(pair))
        .collect::<Result<Assignment>>()?;

    let mut session = load_session(store, id)?;
    match session.fill_variables(prompt, &preset)? {
        VariableOutcome::NoVariables => {
            eprintln!("Template {} has no {{{{variables}}}} to fill in", id);
        }
        VariableOutcome::Cancelled => {
            eprintln!("Variable input cancelled, nothing changed.");
            return Ok(None);
        }
        VariableOutcome::Applied(count) => {
            info!("Filled in {} variables for template {}", count, id);
        }
    }

    print_fields(&session.fields.trimmed());

    if save {
        // Saving clears the session, so keep the filled text for copying
        let filled = session.clone();
        session.update_selected(store)?;
        eprintln!("Template {} saved with the filled-in text", id);
        return Ok(Some(filled));
    }

    Ok(Some(session))
}

fn copy_to_clipboard(
    session: &EditorSession,
    target: CopyTarget,
    clipboard: &mut dyn ClipboardSink,
) -> Result<()> {
    match session.copy_to(target, clipboard)? {
        CopyOutcome::Copied(target) => eprintln!("Copied {} to the clipboard", target),
        CopyOutcome::Empty => eprintln!("Nothing to copy: {} is empty", target),
    }
    Ok(())
}

fn print_fields(fields: &TemplateFields) {
    println!("Title:\n{}\n", fields.title);
    println!("Description:\n{}\n", fields.description);
    println!("Tags:\n{}", fields.tags);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TemplateDraft;
    use std::io::Cursor;

    type ScriptedInput = LinePrompt<Cursor<&'static str>, Vec<u8>>;

    fn input(lines: &'static str) -> ScriptedInput {
        LinePrompt::new(Cursor::new(lines), Vec::new())
    }

    #[derive(Default)]
    struct RecordingClipboard {
        copied: Vec<String>,
    }

    impl ClipboardSink for RecordingClipboard {
        fn set_text(&mut self, text: &str) -> Result<()> {
            self.copied.push(text.to_string());
            Ok(())
        }
    }

    fn store_with_template() -> (TemplateStore, TemplateId) {
        let store = TemplateStore::open_in_memory().unwrap();
        let draft = TemplateDraft::new(
            "weekly",
            TemplateFields::new("{{game}} part {{part}}", "Playing {{game}}", "{{game}}, weekly"),
        );
        let id = store.create(&draft).unwrap();
        (store, id)
    }

    fn run(
        command: Commands,
        store: &TemplateStore,
        prompt: &mut ScriptedInput,
        clipboard: &mut RecordingClipboard,
    ) -> Result<()> {
        handle_subcommand(command, store, prompt, clipboard)
    }

    #[test]
    fn declined_delete_keeps_the_template() {
        let (store, id) = store_with_template();
        let delete = Commands::Delete { id, yes: false };

        run(delete, &store, &mut input("n\n"), &mut RecordingClipboard::default()).unwrap();
        assert!(store.get(id).unwrap().is_some());

        let delete = Commands::Delete { id, yes: false };
        run(delete, &store, &mut input("y\n"), &mut RecordingClipboard::default()).unwrap();
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn delete_with_yes_does_not_ask() {
        let (store, id) = store_with_template();
        let mut prompt = input("");
        run(
            Commands::Delete { id, yes: true },
            &store,
            &mut prompt,
            &mut RecordingClipboard::default(),
        )
        .unwrap();
        assert!(store.get(id).unwrap().is_none());
    }

    #[test]
    fn fill_asks_only_for_unset_names_then_copies_and_saves() {
        let (store, id) = store_with_template();
        let mut clipboard = RecordingClipboard::default();
        let fill = Commands::Fill {
            id,
            set: vec!["game=Celeste".to_string()],
            copy: Some(CopyTarget::Title),
            save: true,
        };

        run(fill, &store, &mut input("4\n"), &mut clipboard).unwrap();

        assert_eq!(clipboard.copied, vec!["Celeste part 4"]);
        let saved = store.get(id).unwrap().unwrap();
        assert_eq!(saved.name, "weekly");
        assert_eq!(
            saved.fields(),
            TemplateFields::new("Celeste part 4", "Playing Celeste", "Celeste, weekly")
        );
    }

    #[test]
    fn cancelled_fill_neither_copies_nor_saves() {
        let (store, id) = store_with_template();
        let before = store.get(id).unwrap();
        let mut clipboard = RecordingClipboard::default();
        let fill = Commands::Fill {
            id,
            set: Vec::new(),
            copy: Some(CopyTarget::All),
            save: true,
        };

        run(fill, &store, &mut input(""), &mut clipboard).unwrap();

        assert!(clipboard.copied.is_empty());
        assert_eq!(store.get(id).unwrap(), before);
    }

    #[test]
    fn malformed_set_value_is_rejected_before_prompting() {
        let (store, id) = store_with_template();
        let fill = Commands::Fill {
            id,
            set: vec!["game".to_string()],
            copy: None,
            save: false,
        };
        assert!(matches!(
            run(fill, &store, &mut input(""), &mut RecordingClipboard::default()),
            Err(VidplateError::InvalidAssignment(_))
        ));
    }

    #[test]
    fn copy_uses_the_stored_text() {
        let (store, id) = store_with_template();
        let mut clipboard = RecordingClipboard::default();
        run(
            Commands::Copy {
                id,
                mode: CopyTarget::Tags,
            },
            &store,
            &mut input(""),
            &mut clipboard,
        )
        .unwrap();
        assert_eq!(clipboard.copied, vec!["{{game}}, weekly"]);
    }

    #[test]
    fn unknown_id_is_reported() {
        let store = TemplateStore::open_in_memory().unwrap();
        assert!(matches!(
            run(
                Commands::Show { id: 42, json: true },
                &store,
                &mut input(""),
                &mut RecordingClipboard::default()
            ),
            Err(VidplateError::TemplateNotFound(42))
        ));
    }
}
