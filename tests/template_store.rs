use tempfile::tempdir;
use vidplate::{TemplateDraft, TemplateFields, TemplateStore, VidplateError};

fn draft(name: &str, title: &str, description: &str, tags: &str) -> TemplateDraft {
    TemplateDraft::new(name, TemplateFields::new(title, description, tags))
}

#[test]
fn templates_survive_reopening_the_database() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("vidplate.db");

    let id = {
        let store = TemplateStore::open(&path).unwrap();
        store
            .create(&draft("lets-play", "{{game}} #{{n}}", "Playing {{game}}", "{{game}}, gaming"))
            .unwrap()
    };

    let store = TemplateStore::open(&path).unwrap();
    assert_eq!(
        store.get_by_id(id).unwrap(),
        Some(TemplateFields::new("{{game}} #{{n}}", "Playing {{game}}", "{{game}}, gaming"))
    );
    let names: Vec<String> = store.list().unwrap().into_iter().map(|t| t.name).collect();
    assert_eq!(names, vec!["lets-play"]);
}

#[test]
fn schema_creation_is_idempotent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("vidplate.db");

    for round in 0..3 {
        let store = TemplateStore::open(&path).unwrap();
        assert_eq!(store.list().unwrap().len(), round);
        store
            .create(&draft(&format!("t{}", round), "title", "", ""))
            .unwrap();
    }
}

#[test]
fn deleting_twice_reports_not_found() {
    let dir = tempdir().unwrap();
    let store = TemplateStore::open(dir.path().join("vidplate.db")).unwrap();

    let first = store.create(&draft("a", "t", "", "")).unwrap();
    let second = store.create(&draft("b", "t", "", "")).unwrap();
    store.delete(first).unwrap();

    assert!(matches!(store.delete(first), Err(VidplateError::TemplateNotFound(_))));
    let ids: Vec<i64> = store.list().unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![second]);
}
