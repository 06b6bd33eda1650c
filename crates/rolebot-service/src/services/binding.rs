//! Binding manager
//!
//! Owns the binding index and drives every write to the binding store.
//!
//! Readers clone an `Arc` snapshot under a short shared lock. Writers are
//! serialized by a separate writer lock: each mutation copies the current
//! snapshot, applies the change, saves the full table, and only publishes the
//! new snapshot once the save succeeded. A failed save therefore leaves the
//! index untouched. The whole commit runs as one blocking task, so a caller
//! that gives up waiting cannot split the save from the publish.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use rolebot_core::{Binding, BindingStore, DomainError, Snowflake};
use tracing::{debug, info, instrument};

use super::error::{ServiceError, ServiceResult};
use super::index::BindingIndex;

/// Binding manager handle. Cheap to clone; clones share state.
#[derive(Clone)]
pub struct BindingManager {
    inner: Arc<Inner>,
}

struct Inner {
    store: Arc<dyn BindingStore>,
    snapshot: RwLock<Arc<BindingIndex>>,
    writer: Mutex<()>,
    strict: bool,
}

impl Inner {
    fn commit<T, F>(&self, mutate: F) -> ServiceResult<T>
    where
        F: FnOnce(&mut BindingIndex) -> ServiceResult<T>,
    {
        let _writer = self.writer.lock();

        let mut candidate = self.snapshot.read().as_ref().clone();
        let output = mutate(&mut candidate)?;

        self.store
            .save(candidate.all())
            .map_err(ServiceError::StoreWrite)?;

        *self.snapshot.write() = Arc::new(candidate);
        Ok(output)
    }
}

impl BindingManager {
    /// Load the binding table and build the index.
    ///
    /// A missing or malformed table is fatal: the caller should not start.
    pub fn load(store: Arc<dyn BindingStore>) -> ServiceResult<Self> {
        Self::load_strict(store, false)
    }

    /// Load, optionally rejecting a second binding for the same message and
    /// emoji instead of shadowing it.
    pub fn load_strict(store: Arc<dyn BindingStore>, strict: bool) -> ServiceResult<Self> {
        let bindings = store.load().map_err(ServiceError::StoreLoad)?;
        info!(count = bindings.len(), strict, "Reaction role bindings loaded");

        Ok(Self {
            inner: Arc::new(Inner {
                store,
                snapshot: RwLock::new(Arc::new(BindingIndex::from_bindings(bindings))),
                writer: Mutex::new(()),
                strict,
            }),
        })
    }

    /// Whether duplicate (message, emoji) pairs are rejected
    pub fn is_strict(&self) -> bool {
        self.inner.strict
    }

    /// Current consistent view of the index
    pub fn snapshot(&self) -> Arc<BindingIndex> {
        Arc::clone(&self.inner.snapshot.read())
    }

    /// Binding triggered by `emoji` on `message_id`; first inserted wins
    pub fn find_binding(&self, message_id: Snowflake, emoji: &str) -> Option<Binding> {
        self.inner.snapshot.read().find(message_id, emoji).cloned()
    }

    /// All bindings granting `role_id` in `guild_id`, in insertion order
    pub fn bindings_for_role(&self, guild_id: Snowflake, role_id: Snowflake) -> Vec<Binding> {
        self.inner.snapshot.read().for_role(guild_id, role_id)
    }

    /// Record a new binding and persist the full table.
    ///
    /// The message and its initial reaction must already exist on the
    /// platform; this only records the association.
    #[instrument(skip(self))]
    pub async fn create_binding(
        &self,
        guild_id: Snowflake,
        message_id: Snowflake,
        emoji: &str,
        role_id: Snowflake,
        role_name: &str,
    ) -> ServiceResult<Binding> {
        let binding = Binding::new(guild_id, message_id, emoji, role_id, role_name);

        let inner = Arc::clone(&self.inner);
        let created = binding.clone();
        run_blocking(move || {
            let strict = inner.strict;
            inner.commit(move |index| {
                if strict && index.find(created.message_id, &created.emoji).is_some() {
                    return Err(DomainError::DuplicateBinding {
                        message_id: created.message_id,
                        emoji: created.emoji,
                    }
                    .into());
                }
                index.append(created);
                Ok(())
            })
        })
        .await?;

        info!(
            guild_id = %binding.guild_id,
            message_id = %binding.message_id,
            role_id = %binding.role_id,
            "Reaction role binding created"
        );
        Ok(binding)
    }

    /// Remove every binding of `role_id` in `guild_id` and persist.
    ///
    /// No match is reported as `NoBindingsForRole` and the table is not
    /// rewritten.
    #[instrument(skip(self))]
    pub async fn remove_bindings_for_role(
        &self,
        guild_id: Snowflake,
        role_id: Snowflake,
    ) -> ServiceResult<Vec<Binding>> {
        let inner = Arc::clone(&self.inner);
        let removed = run_blocking(move || {
            inner.commit(move |index| {
                let removed = index.remove_where(|b| b.grants(guild_id, role_id));
                if removed.is_empty() {
                    return Err(DomainError::NoBindingsForRole(role_id).into());
                }
                Ok(removed)
            })
        })
        .await?;

        info!(
            guild_id = %guild_id,
            role_id = %role_id,
            removed = removed.len(),
            "Reaction role bindings removed"
        );
        Ok(removed)
    }
}

async fn run_blocking<T, F>(f: F) -> ServiceResult<T>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        debug!(error = %e, "Binding commit task failed");
        ServiceError::internal(format!("binding commit task failed: {e}"))
    })?
}

impl std::fmt::Debug for BindingManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BindingManager")
            .field("bindings", &self.inner.snapshot.read().len())
            .field("strict", &self.inner.strict)
            .finish()
    }
}
