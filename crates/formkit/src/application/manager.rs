//! Form manager
//!
//! The only mutation surface over the form collection. Each mutating
//! operation changes memory first, then writes the whole collection through
//! the [`FormStore`]. A failed write is recorded in `last_error` and the
//! in-memory change is kept.

use std::sync::Arc;

use crate::application::dto::NewQuestion;
use crate::application::store::FormStore;
use crate::domain::aggregates::{Form, Question};
use crate::domain::events::FormEvent;
use crate::domain::value_objects::EntityId;
use crate::infrastructure::{SystemClock, UuidGenerator};
use crate::ports::inbound::FormUseCases;
use crate::ports::outbound::{Clock, IdGenerator, KeyValueStore};

/// Handle returned by [`FormManager::subscribe`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&FormEvent) + Send>;

/// Generator ids tried before falling back to a random uuid
const ID_ATTEMPTS: usize = 8;

pub struct FormManager {
    store: FormStore,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    forms: Vec<Form>,
    current_form: Option<Form>,
    is_loading: bool,
    last_error: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    pending: Vec<FormEvent>,
}

impl FormManager {
    /// Build a manager and load the stored collection
    pub fn new(store: FormStore, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        let forms = store.load();
        tracing::debug!("Form manager started with {} form(s)", forms.len());
        Self {
            store,
            clock,
            ids,
            forms,
            current_form: None,
            is_loading: false,
            last_error: None,
            listeners: Vec::new(),
            next_subscription: 0,
            pending: Vec::new(),
        }
    }

    /// Manager over `kv` with the system clock and uuid ids
    pub fn with_defaults(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::new(FormStore::new(kv), Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    // =========================================================================
    // Observable state
    // =========================================================================

    pub fn forms(&self) -> &[Form] { &self.forms }
    pub fn current_form(&self) -> Option<&Form> { self.current_form.as_ref() }
    pub fn is_loading(&self) -> bool { self.is_loading }
    pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }
    pub fn store(&self) -> &FormStore { &self.store }

    pub fn find(&self, id: &EntityId) -> Option<&Form> {
        self.forms.iter().find(|f| f.id() == id)
    }

    /// Favorite forms, in collection order
    pub fn favorites(&self) -> Vec<&Form> {
        self.forms.iter().filter(|f| f.is_favorite()).collect()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    /// Register a callback run after every operation with the events it raised
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&FormEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sub, _)| *sub != id);
        self.listeners.len() != before
    }

    // =========================================================================
    // Selection and working copy
    // =========================================================================

    /// Make a stored form the current working copy. Unknown ids clear the selection.
    pub fn select_form(&mut self, id: &EntityId) -> Option<&Form> {
        self.current_form = self.find(id).cloned();
        self.pending.push(FormEvent::SelectionChanged {
            form_id: self.current_form.as_ref().map(|f| f.id().clone()),
        });
        self.flush_events();
        self.current_form.as_ref()
    }

    pub fn clear_selection(&mut self) {
        if self.current_form.take().is_some() {
            self.pending.push(FormEvent::SelectionChanged { form_id: None });
            self.flush_events();
        }
    }

    /// Edit the working copy in place. Changes are not stored until `update_form`.
    pub fn edit_current<R>(&mut self, edit: impl FnOnce(&mut Form) -> R) -> Option<R> {
        self.current_form.as_mut().map(edit)
    }

    /// Append a new question to the working copy and return it.
    ///
    /// Options are dropped for question types that do not use them. The
    /// question is stored with the form on the next `update_form`.
    pub fn add_question(&mut self, command: NewQuestion) -> Option<Question> {
        let form = self.current_form.as_ref()?;
        let id = self.unique_id(|id| form.question(id).is_some());

        let options = if command.question_type.has_options() {
            command.options
        } else {
            Vec::new()
        };
        let question = Question::new(id, command.question_type, command.text, options, command.is_required);

        let form = self.current_form.as_mut()?;
        if let Err(e) = form.add_question(question.clone()) {
            tracing::warn!("Could not add question: {}", e);
            return None;
        }
        self.pending.push(FormEvent::QuestionAdded {
            form_id: form.id().clone(),
            question_id: question.id().clone(),
        });
        self.flush_events();
        Some(question)
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn begin(&mut self) {
        self.is_loading = true;
        self.last_error = None;
    }

    fn finish(&mut self) {
        self.is_loading = false;
        self.flush_events();
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save(&self.forms) {
            tracing::error!("Failed to save forms: {}", e);
            let message = e.to_string();
            self.last_error = Some(message.clone());
            self.pending.push(FormEvent::PersistFailed { message });
        }
    }

    fn flush_events(&mut self) {
        let events = std::mem::take(&mut self.pending);
        for event in &events {
            for (_, listener) in self.listeners.iter_mut() {
                listener(event);
            }
        }
    }

    fn position(&self, id: &EntityId) -> Option<usize> {
        self.forms.iter().position(|f| f.id() == id)
    }

    /// Next generator id not rejected by `taken`
    fn unique_id(&self, taken: impl Fn(&EntityId) -> bool) -> EntityId {
        for _ in 0..ID_ATTEMPTS {
            let id = self.ids.next_id();
            if !taken(&id) {
                return id;
            }
            tracing::debug!("Id {} is already in use, asking for another", id);
        }

        tracing::warn!("Id generator repeated {} times, using a random id", ID_ATTEMPTS);
        loop {
            let id = EntityId::new();
            if !taken(&id) {
                return id;
            }
        }
    }

    fn current_is(&self, id: &EntityId) -> bool {
        self.current_form.as_ref().is_some_and(|f| f.id() == id)
    }
}

impl FormUseCases for FormManager {
    fn fetch_forms(&mut self) -> &[Form] {
        self.begin();
        self.forms = self.store.load();

        let stale = self
            .current_form
            .as_ref()
            .map(|f| f.id().clone())
            .filter(|id| self.position(id).is_none());
        if let Some(id) = stale {
            tracing::debug!("Selected form {} no longer stored, clearing selection", id);
            self.current_form = None;
            self.pending.push(FormEvent::SelectionChanged { form_id: None });
        }

        self.pending.push(FormEvent::Loaded { count: self.forms.len() });
        self.finish();
        &self.forms
    }

    fn create_form(&mut self, title: &str, description: &str) -> Form {
        self.begin();
        let form = Form::create(self.unique_id(|id| self.position(id).is_some()), title, description, self.clock.now());
        self.forms.push(form.clone());
        self.current_form = Some(form.clone());

        self.pending.push(FormEvent::Created {
            form_id: form.id().clone(),
            created_at: form.created_at(),
        });
        self.pending.push(FormEvent::SelectionChanged {
            form_id: Some(form.id().clone()),
        });
        self.persist();
        self.finish();

        tracing::info!("Created form {}", form.id());
        form
    }

    fn update_form(&mut self) -> bool {
        self.begin();
        let Some(id) = self.current_form.as_ref().map(|f| f.id().clone()) else {
            tracing::debug!("update_form called with no form selected");
            self.finish();
            return false;
        };

        let Some(index) = self.position(&id) else {
            tracing::debug!("Selected form {} is not stored, nothing to update", id);
            self.finish();
            return false;
        };

        let now = self.clock.now();
        let Some(current) = self.current_form.as_mut() else {
            self.finish();
            return false;
        };
        if let Err(e) = current.validate() {
            tracing::warn!("Refusing to store form {}: {}", id, e);
            self.last_error = Some(e.to_string());
            self.finish();
            return false;
        }
        current.touch(now);
        self.forms[index] = current.clone();

        self.pending.push(FormEvent::Updated {
            form_id: id,
            updated_at: self.forms[index].updated_at(),
        });
        self.persist();
        self.finish();
        true
    }

    fn delete_form(&mut self, id: &EntityId) {
        self.begin();
        let before = self.forms.len();
        self.forms.retain(|f| f.id() != id);
        let existed = self.forms.len() != before;

        if self.current_is(id) {
            self.current_form = None;
            self.pending.push(FormEvent::SelectionChanged { form_id: None });
        }

        self.pending.push(FormEvent::Deleted { form_id: id.clone(), existed });
        self.persist();
        self.finish();

        if existed {
            tracing::info!("Deleted form {}", id);
        }
    }

    fn toggle_favorite(&mut self, id: &EntityId) -> Option<bool> {
        self.begin();
        let Some(index) = self.position(id) else {
            tracing::debug!("toggle_favorite: unknown form {}", id);
            self.finish();
            return None;
        };

        let is_favorite = self.forms[index].toggle_favorite();
        if let Some(current) = self.current_form.as_mut().filter(|f| f.id() == id) {
            if current.is_favorite() != is_favorite {
                current.toggle_favorite();
            }
        }

        self.pending.push(FormEvent::FavoriteToggled { form_id: id.clone(), is_favorite });
        self.persist();
        self.finish();
        Some(is_favorite)
    }

    fn set_password(&mut self, id: &EntityId, password: Option<String>) -> bool {
        self.begin();
        let Some(index) = self.position(id) else {
            tracing::debug!("set_password: unknown form {}", id);
            self.finish();
            return false;
        };

        self.forms[index].set_password(password.clone());
        if let Some(current) = self.current_form.as_mut().filter(|f| f.id() == id) {
            current.set_password(password);
        }

        self.pending.push(FormEvent::PasswordChanged {
            form_id: id.clone(),
            protected: self.forms[index].is_protected(),
        });
        self.persist();
        self.finish();
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::QuestionType;
    use crate::infrastructure::persistence::InMemoryKeyValueStore;
    use crate::infrastructure::{FixedClock, SequentialIdGenerator};
    use chrono::{Duration, TimeZone, Utc};
    use parking_lot::Mutex;

    struct Fixture {
        kv: Arc<InMemoryKeyValueStore>,
        clock: Arc<FixedClock>,
        manager: FormManager,
    }

    fn fixture() -> Fixture {
        fixture_with_ids(Arc::new(SequentialIdGenerator::new("id")))
    }

    fn fixture_with_ids(ids: Arc<dyn IdGenerator>) -> Fixture {
        let kv = Arc::new(InMemoryKeyValueStore::new());
        let clock = Arc::new(FixedClock::new(Utc.timestamp_opt(1_733_900_000, 0).unwrap()));
        let manager = FormManager::new(FormStore::new(kv.clone()), clock.clone(), ids);
        Fixture { kv, clock, manager }
    }

    /// Hands out `script` in order, then sequential ids
    struct ScriptedIds {
        script: Mutex<Vec<&'static str>>,
        rest: SequentialIdGenerator,
    }

    impl ScriptedIds {
        fn new(script: &[&'static str]) -> Self {
            let mut script = script.to_vec();
            script.reverse();
            Self { script: Mutex::new(script), rest: SequentialIdGenerator::new("next") }
        }
    }

    impl IdGenerator for ScriptedIds {
        fn next_id(&self) -> EntityId {
            match self.script.lock().pop() {
                Some(id) => id.into(),
                None => self.rest.next_id(),
            }
        }
    }

    struct ConstantIds;

    impl IdGenerator for ConstantIds {
        fn next_id(&self) -> EntityId {
            "same".into()
        }
    }

    #[test]
    fn test_create_form_selects_and_persists() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "desc");

        assert_eq!(fx.manager.forms().len(), 1);
        assert_eq!(fx.manager.current_form().map(|f| f.title.as_str()), Some("Survey"));
        assert_eq!(form.created_at(), form.updated_at());
        assert!(form.questions().is_empty());
        assert!(!fx.manager.is_loading());

        let reloaded = FormStore::new(fx.kv.clone()).load();
        assert_eq!(reloaded, vec![form]);
    }

    #[test]
    fn test_create_form_accepts_empty_strings() {
        let mut fx = fixture();
        let form = fx.manager.create_form("", "");
        assert_eq!(form.title, "");
        assert_eq!(form.description, "");
    }

    #[test]
    fn test_update_form_without_selection_is_noop() {
        let mut fx = fixture();
        assert!(!fx.manager.update_form());
        assert!(fx.kv.get(crate::application::DEFAULT_SLOT).unwrap().is_none());
    }

    #[test]
    fn test_update_form_bumps_updated_at() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");
        fx.clock.advance(Duration::seconds(90));

        fx.manager.edit_current(|f| f.title = "Renamed".into());
        assert_eq!(fx.manager.forms()[0].title, "Survey");

        assert!(fx.manager.update_form());
        let stored = &fx.manager.forms()[0];
        assert_eq!(stored.title, "Renamed");
        assert_eq!(stored.created_at(), form.created_at());
        assert_eq!(stored.updated_at(), form.created_at() + Duration::seconds(90));
        assert_eq!(fx.manager.current_form(), Some(stored));
    }

    #[test]
    fn test_update_form_for_deleted_selection_is_noop() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");
        // Drop the form behind the manager's back, then reload.
        FormStore::new(fx.kv.clone()).save(&[]).unwrap();
        fx.manager.fetch_forms();

        assert!(fx.manager.current_form().is_none());
        assert!(!fx.manager.update_form());
        assert!(fx.manager.find(form.id()).is_none());
    }

    #[test]
    fn test_delete_is_idempotent_and_clears_selection() {
        let mut fx = fixture();
        let keep = fx.manager.create_form("Keep", "");
        let gone = fx.manager.create_form("Gone", "");
        assert_eq!(fx.manager.current_form().map(|f| f.id()), Some(gone.id()));

        fx.manager.delete_form(gone.id());
        assert!(fx.manager.current_form().is_none());
        assert_eq!(fx.manager.forms(), [keep.clone()]);

        fx.manager.delete_form(gone.id());
        assert_eq!(fx.manager.forms(), [keep]);
        assert!(fx.manager.last_error().is_none());
    }

    #[test]
    fn test_delete_other_form_keeps_selection() {
        let mut fx = fixture();
        let other = fx.manager.create_form("Other", "");
        let selected = fx.manager.create_form("Selected", "");
        fx.manager.delete_form(other.id());
        assert_eq!(fx.manager.current_form().map(|f| f.id()), Some(selected.id()));
    }

    #[test]
    fn test_toggle_favorite_twice_restores_value() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");

        assert_eq!(fx.manager.toggle_favorite(form.id()), Some(true));
        assert_eq!(fx.manager.favorites().len(), 1);
        assert_eq!(fx.manager.toggle_favorite(form.id()), Some(false));
        assert!(fx.manager.favorites().is_empty());
        assert_eq!(fx.manager.toggle_favorite(&"missing".into()), None);
    }

    #[test]
    fn test_favorite_and_password_do_not_bump_updated_at() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");
        fx.clock.advance(Duration::seconds(60));

        fx.manager.toggle_favorite(form.id());
        fx.manager.set_password(form.id(), Some("secret".into()));
        assert_eq!(fx.manager.forms()[0].updated_at(), form.updated_at());
    }

    #[test]
    fn test_favorite_survives_later_update_of_working_copy() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");
        fx.manager.toggle_favorite(form.id());
        fx.manager.set_password(form.id(), Some("pw".into()));

        fx.manager.edit_current(|f| f.description = "edited".into());
        fx.manager.update_form();

        let stored = &fx.manager.forms()[0];
        assert!(stored.is_favorite());
        assert_eq!(stored.password(), Some("pw"));
        assert_eq!(stored.description, "edited");
    }

    #[test]
    fn test_password_gate() {
        let mut fx = fixture();
        let form = fx.manager.create_form("Survey", "");

        assert!(fx.manager.set_password(form.id(), Some("secret".into())));
        let stored = fx.manager.find(form.id()).cloned().unwrap();
        assert!(fx.manager.check_password(&stored, "secret"));
        assert!(!fx.manager.check_password(&stored, "wrong"));

        fx.manager.set_password(form.id(), None);
        let stored = fx.manager.find(form.id()).cloned().unwrap();
        assert!(fx.manager.check_password(&stored, ""));
        assert!(!fx.manager.set_password(&"missing".into(), Some("x".into())));
    }

    #[test]
    fn test_add_question_appends_to_working_copy() {
        let mut fx = fixture();
        fx.manager.create_form("Survey", "");

        let q1 = fx
            .manager
            .add_question(NewQuestion::new(QuestionType::MultipleChoice, "Pick").with_options(["A", "B"]))
            .unwrap();
        let q2 = fx
            .manager
            .add_question(NewQuestion::new(QuestionType::ShortAnswer, "Name").with_options(["ignored"]))
            .unwrap();

        assert_ne!(q1.id(), q2.id());
        assert_eq!(q1.options(), ["A".to_string(), "B".to_string()]);
        assert_eq!(q2.options, None);

        let current = fx.manager.current_form().unwrap();
        assert_eq!(current.questions(), [q1, q2]);
        assert!(fx.manager.forms()[0].questions().is_empty());
    }

    #[test]
    fn test_add_question_without_selection() {
        let mut fx = fixture();
        assert!(fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "x")).is_none());
    }

    #[test]
    fn test_select_form() {
        let mut fx = fixture();
        let first = fx.manager.create_form("First", "");
        fx.manager.create_form("Second", "");

        assert_eq!(fx.manager.select_form(first.id()).map(|f| f.title.clone()), Some("First".into()));
        assert!(fx.manager.select_form(&"missing".into()).is_none());
        assert!(fx.manager.current_form().is_none());

        fx.manager.select_form(first.id());
        fx.manager.clear_selection();
        assert!(fx.manager.current_form().is_none());
        assert!(!fx.manager.update_form());
    }

    #[test]
    fn test_persist_failure_keeps_mutation_and_sets_error() {
        let mut fx = fixture();
        fx.kv.set_read_only(true);

        let form = fx.manager.create_form("Survey", "");
        assert_eq!(fx.manager.forms(), [form.clone()]);
        assert!(fx.manager.last_error().is_some());
        assert!(FormStore::new(fx.kv.clone()).load().is_empty());

        fx.kv.set_read_only(false);
        fx.manager.toggle_favorite(form.id());
        assert!(fx.manager.last_error().is_none());
        assert_eq!(FormStore::new(fx.kv.clone()).load().len(), 1);
    }

    #[test]
    fn test_clear_error() {
        let mut fx = fixture();
        fx.kv.set_read_only(true);
        fx.manager.create_form("Survey", "");
        fx.manager.clear_error();
        assert!(fx.manager.last_error().is_none());
    }

    #[test]
    fn test_subscribers_receive_events_in_order() {
        let mut fx = fixture();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let sub = fx.manager.subscribe(move |event| sink.lock().push(event.clone()));

        let form = fx.manager.create_form("Survey", "");
        fx.kv.set_read_only(true);
        fx.manager.delete_form(form.id());

        {
            let events = seen.lock();
            assert!(matches!(events[0], FormEvent::Created { .. }));
            assert!(matches!(events[1], FormEvent::SelectionChanged { form_id: Some(_) }));
            assert!(matches!(events[2], FormEvent::SelectionChanged { form_id: None }));
            assert!(matches!(events[3], FormEvent::Deleted { existed: true, .. }));
            assert!(matches!(events[4], FormEvent::PersistFailed { .. }));
            assert_eq!(events.len(), 5);
        }

        assert!(fx.manager.unsubscribe(sub));
        fx.manager.fetch_forms();
        assert_eq!(seen.lock().len(), 5);
    }

    #[test]
    fn test_repeated_ids_are_regenerated() {
        let mut fx = fixture_with_ids(Arc::new(ScriptedIds::new(&["a", "a", "b", "q", "q", "r"])));
        let first = fx.manager.create_form("First", "");
        let second = fx.manager.create_form("Second", "");
        assert_eq!(first.id().as_str(), "a");
        assert_eq!(second.id().as_str(), "b");

        let q1 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "one")).unwrap();
        let q2 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "two")).unwrap();
        assert_eq!(q1.id().as_str(), "q");
        assert_eq!(q2.id().as_str(), "r");
    }

    #[test]
    fn test_stuck_id_generator_falls_back_to_random_ids() {
        let mut fx = fixture_with_ids(Arc::new(ConstantIds));
        let first = fx.manager.create_form("First", "");
        let second = fx.manager.create_form("Second", "");
        assert_eq!(first.id().as_str(), "same");
        assert_ne!(second.id(), first.id());

        let q1 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "one")).unwrap();
        let q2 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "two")).unwrap();
        assert_ne!(q1.id(), q2.id());
    }

    #[test]
    fn test_update_form_rejects_duplicate_question_ids() {
        let mut fx = fixture();
        fx.manager.create_form("Survey", "");
        let q1 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "one")).unwrap();
        let q2 = fx.manager.add_question(NewQuestion::new(QuestionType::Paragraph, "two")).unwrap();
        assert!(fx.manager.update_form());

        fx.manager.edit_current(|f| *f.question_mut(q2.id()).unwrap() = q1.clone());
        assert!(!fx.manager.update_form());
        assert!(fx.manager.last_error().is_some());

        let stored = FormStore::new(fx.kv.clone()).load();
        let ids: Vec<_> = stored[0].questions().iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids, [q1.id().clone(), q2.id().clone()]);
    }

    #[test]
    fn test_update_form_without_selection_clears_error() {
        let mut fx = fixture();
        fx.kv.set_read_only(true);
        fx.manager.create_form("Survey", "");
        assert!(fx.manager.last_error().is_some());

        fx.kv.set_read_only(false);
        fx.manager.clear_selection();
        assert!(!fx.manager.update_form());
        assert!(fx.manager.last_error().is_none());
        assert!(!fx.manager.is_loading());
    }
}
