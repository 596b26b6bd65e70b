//! Property tests for persistence and id assignment

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use formkit::{
    EntityId, Form, FormManager, FormStore, FormUseCases, InMemoryKeyValueStore, Question,
    QuestionType,
};

fn question_type() -> impl Strategy<Value = QuestionType> {
    prop::sample::select(QuestionType::ALL.to_vec())
}

fn question() -> impl Strategy<Value = (QuestionType, String, Vec<String>, bool)> {
    (question_type(), ".*", prop::collection::vec(".*", 0..4), any::<bool>())
}

fn form() -> impl Strategy<Value = Form> {
    (
        ".*",
        ".*",
        prop::collection::vec(question(), 0..5),
        0i64..4_000_000_000,
        0i64..1_000_000,
        any::<bool>(),
        prop::option::of(".*"),
    )
        .prop_map(|(title, description, questions, created, age, favorite, password)| {
            let created_at = Utc.timestamp_opt(created, 0).unwrap();
            let mut form = Form::create(EntityId::new(), title, description, created_at);
            for (i, (kind, text, options, required)) in questions.into_iter().enumerate() {
                let id = EntityId::from_string(format!("q{i}"));
                form.add_question(Question::new(id, kind, text, options, required)).unwrap();
            }
            form.touch(created_at + chrono::Duration::seconds(age));
            if favorite {
                form.toggle_favorite();
            }
            form.set_password(password);
            form
        })
}

proptest! {
    #[test]
    fn save_then_load_is_lossless(forms in prop::collection::vec(form(), 0..6)) {
        let store = FormStore::new(Arc::new(InMemoryKeyValueStore::new()));
        store.save(&forms).unwrap();
        prop_assert_eq!(store.load(), forms);
    }

    #[test]
    fn created_form_ids_are_unique(count in 1usize..40) {
        let mut manager = FormManager::with_defaults(Arc::new(InMemoryKeyValueStore::new()));
        for i in 0..count {
            manager.create_form(&format!("form {i}"), "");
        }
        let ids: HashSet<_> = manager.forms().iter().map(|f| f.id().clone()).collect();
        prop_assert_eq!(ids.len(), count);
    }

    #[test]
    fn toggling_favorite_twice_is_identity(start in any::<bool>()) {
        let mut manager = FormManager::with_defaults(Arc::new(InMemoryKeyValueStore::new()));
        let form = manager.create_form("f", "");
        if start {
            manager.toggle_favorite(form.id());
        }
        manager.toggle_favorite(form.id());
        manager.toggle_favorite(form.id());
        prop_assert_eq!(manager.find(form.id()).map(|f| f.is_favorite()), Some(start));
    }
}
