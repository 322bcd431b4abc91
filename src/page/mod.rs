//! Resource list page
//!
//! `ResourcePage<T>` is the state every club screen is built from: the
//! fetched collection, a create draft, an edit draft with its target id, a
//! pending delete target, one status message and a client-side pager.
//!
//! Network calls go through a [`ResourceApi`] passed in by the caller, so a
//! page holds no client of its own and can be driven by an in-memory double
//! in tests. Every mutation of the collection happens after the server
//! answered, using the returned entity as the source of truth.

mod pagination;
mod reconcile;
mod status;

pub use pagination::Pager;
pub use reconcile::{append_created, options_from, remove_by_id, replace_updated, resolve_labels};
pub use status::{MessageKind, StatusMessage};

use crate::api::{format_api_error, Filters, ResourceApi};
use crate::model::{Draft, Entity};
use crate::resource::{definition, ResourceDef};
use serde_json::Value;

/// Initial fetch state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready,
}

/// Which of the two drafts a field change applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Edit,
}

/// Result of a submit or delete confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Server accepted the draft; carries the entity id
    Saved(i64),
    Removed(i64),
    /// Local validation failed, nothing was sent
    Invalid(String),
    /// The server or the network rejected the call
    Failed(String),
    /// Update or delete without a target
    NoTarget,
}

impl SubmitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Saved(_) | Self::Removed(_))
    }
}

pub struct ResourcePage<T: Entity> {
    def: &'static ResourceDef,
    items: Vec<T>,
    load_state: LoadState,
    create_draft: Draft,
    edit_draft: Draft,
    editing: Option<i64>,
    pending_delete: Option<i64>,
    message: Option<StatusMessage>,
    pager: Pager,
}

impl<T: Entity> Default for ResourcePage<T> {
    fn default() -> Self {
        Self::new(definition(T::KIND))
    }
}

impl<T: Entity> ResourcePage<T> {
    pub fn new(def: &'static ResourceDef) -> Self {
        Self {
            def,
            items: Vec::new(),
            load_state: LoadState::Idle,
            create_draft: Draft::new(),
            edit_draft: Draft::new(),
            editing: None,
            pending_delete: None,
            message: None,
            pager: Pager::new(def.items_per_page),
        }
    }

    /// Override the page size declared by the resource definition
    pub fn with_items_per_page(mut self, per_page: usize) -> Self {
        self.pager = Pager::new(per_page);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn def(&self) -> &'static ResourceDef {
        self.def
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|e| e.id() == id)
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn draft(&self, target: FormTarget) -> &Draft {
        match target {
            FormTarget::Create => &self.create_draft,
            FormTarget::Edit => &self.edit_draft,
        }
    }

    pub fn editing(&self) -> Option<i64> {
        self.editing
    }

    pub fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    pub fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.message = Some(message);
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn pager(&self) -> &Pager {
        &self.pager
    }

    pub fn visible_items(&self) -> &[T] {
        &self.items[self.pager.range(self.items.len())]
    }

    pub fn next_page(&mut self) -> bool {
        self.pager.next(self.items.len())
    }

    pub fn prev_page(&mut self) -> bool {
        self.pager.prev()
    }

    fn entity_title(&self) -> String {
        let mut chars = self.def.entity_name.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Fetch the collection, discarding any previous page state
    ///
    /// Always ends in `Ready`; on failure the collection is empty and the
    /// failure is shown as the page message.
    pub async fn mount<A>(&mut self, api: &A) -> bool
    where
        A: ResourceApi<T> + ?Sized,
    {
        self.items.clear();
        self.create_draft.clear();
        self.cancel_edit();
        self.pending_delete = None;
        self.message = None;
        self.pager.reset();
        self.load_state = LoadState::Loading;

        let loaded = match api.list_all(&Filters::new()).await {
            Ok(items) => {
                tracing::debug!("Loaded {} {}", items.len(), self.def.display_name);
                self.items = items;
                true
            },
            Err(e) => {
                tracing::error!("Failed to load {}: {}", self.def.display_name, e);
                self.message = Some(StatusMessage::failure(format!(
                    "Failed to load {}. {}",
                    self.def.display_name.to_lowercase(),
                    format_api_error(&e)
                )));
                false
            },
        };

        self.load_state = LoadState::Ready;
        loaded
    }

    // =========================================================================
    // Drafts
    // =========================================================================

    /// Write one field into a draft; rejected input leaves the draft unchanged
    pub fn set_field(&mut self, target: FormTarget, key: &str, value: Value) -> bool {
        let Some(field) = self.def.field(key) else {
            tracing::debug!("{}: no field named '{}'", self.def.display_name, key);
            return false;
        };
        match field.normalize(value) {
            Ok(normalized) => {
                match target {
                    FormTarget::Create => self.create_draft.set(key, normalized),
                    FormTarget::Edit => self.edit_draft.set(key, normalized),
                }
                true
            },
            Err(reason) => {
                tracing::debug!("Rejected input for {}: {}", key, reason);
                false
            },
        }
    }

    /// Replace the create draft, e.g. with a prefilled time slot
    pub fn prefill_create(&mut self, draft: Draft) {
        self.create_draft = draft;
    }

    pub fn clear_create_draft(&mut self) {
        self.create_draft.clear();
    }

    /// Required flags first, then the entity's own rules
    pub fn validate(&self, draft: &Draft) -> Result<(), String> {
        self.def.check_required(draft)?;
        T::validate_draft(draft)
    }

    pub async fn submit_create<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: ResourceApi<T> + ?Sized,
    {
        if let Err(reason) = self.validate(&self.create_draft) {
            self.message = Some(StatusMessage::failure(reason.clone()));
            return SubmitOutcome::Invalid(reason);
        }

        let payload = self.def.finalize(&self.create_draft);
        match api.create(&payload).await {
            Ok(created) => {
                let id = created.id();
                self.message = Some(StatusMessage::success(format!(
                    "{} \"{}\" created.",
                    self.entity_title(),
                    created.label()
                )));
                tracing::info!("Created {} {}", self.def.entity_name, id);
                append_created(&mut self.items, created);
                self.create_draft.clear();
                self.cancel_edit();
                self.pager.clamp(self.items.len());
                SubmitOutcome::Saved(id)
            },
            Err(e) => {
                tracing::error!("Failed to create {}: {}", self.def.entity_name, e);
                let text = format!(
                    "Failed to create {}. {}",
                    self.def.entity_name,
                    format_api_error(&e)
                );
                self.message = Some(StatusMessage::failure(text.clone()));
                SubmitOutcome::Failed(text)
            },
        }
    }

    // =========================================================================
    // Editing
    // =========================================================================

    /// Start editing an entity from the collection
    pub fn begin_edit(&mut self, id: i64) -> bool {
        match self.get(id) {
            Some(entity) => {
                self.edit_draft = entity.to_draft();
                self.editing = Some(id);
                true
            },
            None => false,
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
        self.edit_draft.clear();
    }

    pub async fn submit_update<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: ResourceApi<T> + ?Sized,
    {
        let Some(id) = self.editing else {
            return SubmitOutcome::NoTarget;
        };

        if let Err(reason) = self.validate(&self.edit_draft) {
            self.message = Some(StatusMessage::failure(reason.clone()));
            return SubmitOutcome::Invalid(reason);
        }

        let payload = self.def.finalize(&self.edit_draft);
        match api.update(id, &payload).await {
            Ok(updated) => {
                self.message = Some(StatusMessage::success(format!(
                    "{} \"{}\" updated.",
                    self.entity_title(),
                    updated.label()
                )));
                self.reconcile_updated(updated);
                self.cancel_edit();
                SubmitOutcome::Saved(id)
            },
            Err(e) => {
                tracing::error!("Failed to update {} {}: {}", self.def.entity_name, id, e);
                let text = format!(
                    "Failed to update {}. {}",
                    self.def.entity_name,
                    format_api_error(&e)
                );
                self.message = Some(StatusMessage::failure(text.clone()));
                SubmitOutcome::Failed(text)
            },
        }
    }

    /// Merge an entity the server returned outside the edit form
    pub fn reconcile_updated(&mut self, updated: T) -> bool {
        let id = updated.id();
        let replaced = replace_updated(&mut self.items, updated);
        if !replaced {
            tracing::debug!("{} {} is no longer listed", self.def.entity_name, id);
        }
        replaced
    }

    // =========================================================================
    // Deleting
    // =========================================================================

    /// First step of a delete: remember the target, no network call
    pub fn request_delete(&mut self, id: i64) -> bool {
        if self.get(id).is_some() {
            self.pending_delete = Some(id);
            true
        } else {
            false
        }
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// "Are you sure you want to delete this team?"
    pub fn delete_prompt(&self) -> String {
        format!(
            "Are you sure you want to delete this {}?",
            self.def.entity_name
        )
    }

    /// Second step: remove the pending target on the server
    ///
    /// The target is cleared whatever the outcome.
    pub async fn confirm_delete<A>(&mut self, api: &A) -> SubmitOutcome
    where
        A: ResourceApi<T> + ?Sized,
    {
        let Some(id) = self.pending_delete.take() else {
            return SubmitOutcome::NoTarget;
        };

        let failure = match api.remove(id).await {
            Ok(result) if result.success => None,
            Ok(_) => {
                tracing::warn!("Server refused to delete {} {}", self.def.entity_name, id);
                Some(format!("Failed to delete {}.", self.def.entity_name))
            },
            Err(e) => {
                tracing::error!("Failed to delete {} {}: {}", self.def.entity_name, id, e);
                Some(format!(
                    "Failed to delete {}. {}",
                    self.def.entity_name,
                    format_api_error(&e)
                ))
            },
        };

        if let Some(text) = failure {
            self.message = Some(StatusMessage::failure(text.clone()));
            return SubmitOutcome::Failed(text);
        }

        remove_by_id(&mut self.items, id);
        if self.editing == Some(id) {
            self.cancel_edit();
        }
        self.pager.clamp(self.items.len());
        self.message = Some(StatusMessage::success(format!(
            "{} deleted.",
            self.entity_title()
        )));
        SubmitOutcome::Removed(id)
    }
}

/// Type-erased view of a page for renderers and key handlers
pub trait PageView {
    fn def(&self) -> &'static ResourceDef;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn load_state(&self) -> LoadState;
    fn pager(&self) -> &Pager;
    fn message(&self) -> Option<&StatusMessage>;
    /// Visible slice as JSON rows
    fn visible_rows(&self) -> Vec<Value>;
    fn visible_ids(&self) -> Vec<i64>;
    fn row_by_id(&self, id: i64) -> Option<Value>;
    fn draft(&self, target: FormTarget) -> &Draft;
    fn editing(&self) -> Option<i64>;
    fn pending_delete(&self) -> Option<i64>;
    fn delete_prompt(&self) -> String;

    fn set_field(&mut self, target: FormTarget, key: &str, value: Value) -> bool;
    fn begin_edit(&mut self, id: i64) -> bool;
    fn cancel_edit(&mut self);
    fn request_delete(&mut self, id: i64) -> bool;
    fn cancel_delete(&mut self);
    fn clear_create_draft(&mut self);
    fn next_page(&mut self) -> bool;
    fn prev_page(&mut self) -> bool;
    fn set_message(&mut self, message: StatusMessage);
}

impl<T: Entity> PageView for ResourcePage<T> {
    fn def(&self) -> &'static ResourceDef {
        self.def
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn load_state(&self) -> LoadState {
        self.load_state
    }

    fn pager(&self) -> &Pager {
        &self.pager
    }

    fn message(&self) -> Option<&StatusMessage> {
        self.message.as_ref()
    }

    fn visible_rows(&self) -> Vec<Value> {
        self.visible_items()
            .iter()
            .filter_map(|e| serde_json::to_value(e).ok())
            .collect()
    }

    fn visible_ids(&self) -> Vec<i64> {
        self.visible_items().iter().map(Entity::id).collect()
    }

    fn row_by_id(&self, id: i64) -> Option<Value> {
        self.get(id).and_then(|e| serde_json::to_value(e).ok())
    }

    fn draft(&self, target: FormTarget) -> &Draft {
        ResourcePage::draft(self, target)
    }

    fn editing(&self) -> Option<i64> {
        self.editing
    }

    fn pending_delete(&self) -> Option<i64> {
        self.pending_delete
    }

    fn delete_prompt(&self) -> String {
        ResourcePage::delete_prompt(self)
    }

    fn set_field(&mut self, target: FormTarget, key: &str, value: Value) -> bool {
        ResourcePage::set_field(self, target, key, value)
    }

    fn begin_edit(&mut self, id: i64) -> bool {
        ResourcePage::begin_edit(self, id)
    }

    fn cancel_edit(&mut self) {
        ResourcePage::cancel_edit(self)
    }

    fn request_delete(&mut self, id: i64) -> bool {
        ResourcePage::request_delete(self, id)
    }

    fn cancel_delete(&mut self) {
        ResourcePage::cancel_delete(self)
    }

    fn clear_create_draft(&mut self) {
        ResourcePage::clear_create_draft(self)
    }

    fn next_page(&mut self) -> bool {
        ResourcePage::next_page(self)
    }

    fn prev_page(&mut self) -> bool {
        ResourcePage::prev_page(self)
    }

    fn set_message(&mut self, message: StatusMessage) {
        ResourcePage::set_message(self, message)
    }
}
