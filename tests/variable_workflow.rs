use std::io::Cursor;
use vidplate::{
    extract_all, Assignment, CopyTarget, EditorSession, LinePrompt, TemplateFields,
    TemplateStore, VariableOutcome,
};

fn stored_template(store: &TemplateStore) -> i64 {
    let mut editor = EditorSession {
        selected: None,
        name: "weekly stream".to_string(),
        fields: TemplateFields::new(
            "{{game}} - Week {{week}}",
            "This week we play {{game}}.\n{{extra notes}}",
            "{{game}}, weekly, {{}}",
        ),
    };
    editor.save_as_new(store).unwrap()
}

#[test]
fn fill_from_prompt_then_save_back() {
    let store = TemplateStore::open_in_memory().unwrap();
    let id = stored_template(&store);

    let mut editor = EditorSession::new();
    editor.load(&store, id).unwrap();
    assert_eq!(editor.variables(), vec!["", "extra notes", "game", "week"]);

    // Prompts come in sorted name order; "week" is preset
    let mut preset = Assignment::new();
    preset.insert("week".to_string(), "12".to_string());
    let mut output = Vec::new();
    let mut prompt = LinePrompt::new(Cursor::new("live\n\nHollow Knight\n"), &mut output);

    let outcome = editor.fill_variables(&mut prompt, &preset).unwrap();
    assert_eq!(outcome, VariableOutcome::Applied(4));
    assert!(extract_all(editor.fields.as_array()).is_empty());
    assert_eq!(
        editor.copy_text(CopyTarget::All),
        "Hollow Knight - Week 12\n\nThis week we play Hollow Knight.\n\nHollow Knight, weekly, live"
    );

    editor.update_selected(&store).unwrap();
    let saved = store.get_by_id(id).unwrap().unwrap();
    assert_eq!(saved.title, "Hollow Knight - Week 12");
    assert_eq!(saved.description, "This week we play Hollow Knight.");
    assert_eq!(store.get(id).unwrap().unwrap().name, "weekly stream");
}

#[test]
fn cancelled_prompt_keeps_stored_and_edited_text() {
    let store = TemplateStore::open_in_memory().unwrap();
    let id = stored_template(&store);

    let mut editor = EditorSession::new();
    editor.load(&store, id).unwrap();
    let before = editor.clone();

    let mut prompt = LinePrompt::new(Cursor::new(""), Vec::new());
    let outcome = editor.fill_variables(&mut prompt, &Assignment::new()).unwrap();

    assert_eq!(outcome, VariableOutcome::Cancelled);
    assert_eq!(editor, before);
    assert_eq!(store.get_by_id(id).unwrap().unwrap(), before.fields);
}

#[test]
fn second_pass_changes_nothing() {
    let store = TemplateStore::open_in_memory().unwrap();
    let id = stored_template(&store);

    let mut editor = EditorSession::new();
    editor.load(&store, id).unwrap();
    let mut prompt = LinePrompt::new(Cursor::new("a\nb\nc\nd\n"), Vec::new());
    editor.fill_variables(&mut prompt, &Assignment::new()).unwrap();
    let filled = editor.fields.clone();

    let mut nothing_to_read = LinePrompt::new(Cursor::new(""), Vec::new());
    assert_eq!(
        editor
            .fill_variables(&mut nothing_to_read, &Assignment::new())
            .unwrap(),
        VariableOutcome::NoVariables
    );
    assert_eq!(editor.fields, filled);
}
