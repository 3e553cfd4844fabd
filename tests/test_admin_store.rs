//! Admin editing against the JSON-backed question store.

use medintake::admin::{AdminPanel, ADMIN_PASSWORD};
use medintake::error::Error;
use medintake::storage::{load_or_seed, JsonQuestionStore, QuestionRepository};

#[test]
fn test_first_open_seeds_default_file() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonQuestionStore::in_dir(dir.path());
    assert!(!store.path().exists());

    let panel = AdminPanel::open(store).unwrap();
    assert_eq!(panel.questions().len(), 20);

    // Seeding wrote the file
    let reopened = JsonQuestionStore::in_dir(dir.path());
    assert_eq!(reopened.load().unwrap().unwrap().len(), 20);
}

#[test]
fn test_edits_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut panel = AdminPanel::open(JsonQuestionStore::in_dir(dir.path())).unwrap();
        assert!(panel.login(ADMIN_PASSWORD));
        panel.add_question("Do you wear glasses?").unwrap();
        panel.delete_question(1).unwrap();
        panel.edit_question(2, "Are you on any medication?").unwrap();
        assert!(panel.move_question_up(3).unwrap());
    }

    let set = load_or_seed(&JsonQuestionStore::in_dir(dir.path())).unwrap();
    assert_eq!(set.len(), 20);
    assert!(set.get(1).is_none());
    assert_eq!(set.get(2).unwrap().text, "Are you on any medication?");
    // Orders are dense after the delete and the move
    for (i, q) in set.questions().iter().enumerate() {
        assert_eq!(q.order, i as u32 + 1);
    }
    assert_eq!(set.questions().last().unwrap().text, "Do you wear glasses?");
}

#[test]
fn test_wrong_password_cannot_mutate() {
    let dir = tempfile::tempdir().unwrap();
    let mut panel = AdminPanel::open(JsonQuestionStore::in_dir(dir.path())).unwrap();

    assert!(!panel.login("letmein"));
    assert!(matches!(panel.add_question("X?"), Err(Error::AccessDenied)));
    assert!(matches!(panel.move_question_down(1), Err(Error::AccessDenied)));

    // The stored file is untouched beyond the initial seed
    let set = load_or_seed(&JsonQuestionStore::in_dir(dir.path())).unwrap();
    assert_eq!(set.len(), 20);
}

#[test]
fn test_corrupt_store_surfaces_json_error() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonQuestionStore::in_dir(dir.path());
    std::fs::write(store.path(), b"{not json").unwrap();

    assert!(matches!(store.load(), Err(Error::Json(_))));
}

#[test]
fn test_load_tolerates_sparse_orders() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonQuestionStore::in_dir(dir.path());
    std::fs::write(
        store.path(),
        br#"[
            {"id": 9, "text": "Second?", "order": 40},
            {"id": 4, "text": "First?", "order": 7}
        ]"#,
    )
    .unwrap();

    let set = store.load().unwrap().unwrap();
    assert_eq!(set.texts(), vec!["First?".to_string(), "Second?".to_string()]);
    assert_eq!(set.questions()[0].order, 1);
    assert_eq!(set.questions()[1].order, 2);
}
