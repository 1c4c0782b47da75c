use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};
use std::time::Duration;

use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};
use uuid::Uuid;

use propconnect_client::{ApiClient, PrincipalKind, PropertyId};
use propconnect_config::UiConfig;

use crate::error::{StoreError, StoreResult};
use crate::optimistic::{OptimisticUpdate, Slot};
use crate::state::{
    AuthState, DashboardCounters, Modal, NotificationPreferences, Severity, StoreState, Toast,
};
use crate::storage::{rehydrate, MemoryStorage, PersistedState, StateStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreSettings {
    pub toast_duration: Duration,
    /// Zero disables the cap.
    pub max_toasts: usize,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self::from(&UiConfig::default())
    }
}

impl From<&UiConfig> for StoreSettings {
    fn from(config: &UiConfig) -> Self {
        Self {
            toast_duration: Duration::from_millis(config.toast_duration_ms),
            max_toasts: config.max_toasts,
        }
    }
}

/// Shared application store. Cloning is cheap and every clone sees the same
/// state. Mutations are synchronous and are never held across an await.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

struct StoreInner {
    state: watch::Sender<StoreState>,
    client: ApiClient,
    storage: Arc<dyn StateStorage>,
    settings: StoreSettings,
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("base_url", &self.inner.client.base_url())
            .field("storage", &self.inner.storage)
            .field("settings", &self.inner.settings)
            .finish()
    }
}

impl Store {
    /// Build a store seeded from whatever `storage` holds.
    pub fn new(client: ApiClient, storage: Arc<dyn StateStorage>, settings: StoreSettings) -> Self {
        let initial = rehydrate(storage.as_ref());
        debug!(
            user_type = ?initial.auth.user_type(),
            favorites = initial.favorites.len(),
            "store rehydrated"
        );
        let (state, _) = watch::channel(initial);
        Self {
            inner: Arc::new(StoreInner {
                state,
                client,
                storage,
                settings,
            }),
        }
    }

    pub fn in_memory(client: ApiClient) -> Self {
        Self::new(client, Arc::new(MemoryStorage::new()), StoreSettings::default())
    }

    pub fn client(&self) -> &ApiClient {
        &self.inner.client
    }

    pub fn settings(&self) -> StoreSettings {
        self.inner.settings
    }

    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.inner.state.subscribe()
    }

    pub fn state(&self) -> StoreState {
        self.inner.state.borrow().clone()
    }

    pub fn select<R>(&self, selector: impl FnOnce(&StoreState) -> R) -> R {
        selector(&self.inner.state.borrow())
    }

    pub fn auth(&self) -> AuthState {
        self.select(|state| state.auth.clone())
    }

    pub fn favorites(&self) -> Vec<PropertyId> {
        self.select(|state| state.favorites.clone())
    }

    pub fn is_favorite(&self, property_id: &str) -> bool {
        self.select(|state| state.favorites.iter().any(|id| id == property_id))
    }

    pub fn preferences(&self) -> Option<NotificationPreferences> {
        self.select(|state| state.preferences.clone())
    }

    pub fn dashboard(&self) -> DashboardCounters {
        self.select(|state| state.dashboard)
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.select(|state| state.ui.toasts.clone())
    }

    pub fn modal(&self) -> Option<Modal> {
        self.select(|state| state.ui.modal.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.select(|state| state.auth.token().map(str::to_string))
    }

    pub(crate) fn update(&self, mutate: impl FnOnce(&mut StoreState)) {
        self.inner.state.send_modify(mutate);
    }

    /// Write the durable subset. Failures are logged, never surfaced.
    pub(crate) fn persist(&self) {
        let persisted = self.select(PersistedState::capture);
        let result = persisted
            .to_json()
            .and_then(|blob| self.inner.storage.save(&blob));
        if let Err(error) = result {
            warn!(error = %error, "failed to persist session state");
        }
    }

    /// Token of the signed-in principal, if it is of `kind`.
    pub(crate) fn session_for(&self, kind: PrincipalKind) -> StoreResult<String> {
        self.select(|state| match state.auth.principal.session() {
            Some((current, token)) if current == kind => Ok(token),
            _ => Err(StoreError::NotAuthenticated),
        })
    }

    pub(crate) fn holds_token(&self, token: &str) -> bool {
        self.select(|state| state.auth.token() == Some(token))
    }

    /// Optimistically update a store slice on behalf of the session holding
    /// `token`. If the session changed while the request was in flight the
    /// outcome is dropped, since the slice already belongs to someone else.
    pub(crate) async fn reconcile<T, F>(
        &self,
        slot: StoreSlot<T>,
        token: &str,
        mutate: impl FnOnce(&mut T),
        request: F,
    ) -> StoreResult<T>
    where
        T: Clone,
        F: Future<Output = Result<T, propconnect_client::ApiError>>,
    {
        let update = OptimisticUpdate::capture(slot);
        update.apply(mutate);
        let outcome = request.await;
        let still_current = self.holds_token(token);

        match outcome {
            Ok(value) => {
                if still_current {
                    update.commit(value.clone());
                } else {
                    debug!("session changed during update, discarding server value");
                    update.keep();
                }
                Ok(value)
            }
            Err(error) => {
                if still_current {
                    update.rollback();
                } else {
                    update.keep();
                }
                Err(error.into())
            }
        }
    }

    pub fn favorites_slot(&self) -> StoreSlot<Vec<PropertyId>> {
        StoreSlot::new(self, slices::favorites, slices::favorites_mut, true)
    }

    pub fn preferences_slot(&self) -> StoreSlot<Option<NotificationPreferences>> {
        StoreSlot::new(self, slices::preferences, slices::preferences_mut, true)
    }

    pub fn dashboard_slot(&self) -> StoreSlot<DashboardCounters> {
        StoreSlot::new(self, slices::dashboard, slices::dashboard_mut, false)
    }

    /// Push a toast and schedule its removal after `duration`. A zero
    /// duration keeps the toast until dismissed.
    pub fn show_toast(&self, message: impl Into<String>, severity: Severity, duration: Duration) -> Uuid {
        let toast = Toast {
            id: Uuid::new_v4(),
            message: message.into(),
            severity,
            duration,
            created_at: Utc::now(),
        };
        let id = toast.id;
        let cap = self.inner.settings.max_toasts;

        self.update(|state| {
            let toasts = &mut state.ui.toasts;
            if cap > 0 {
                while toasts.len() >= cap {
                    toasts.remove(0);
                }
            }
            toasts.push(toast);
        });
        self.schedule_dismissal(id, duration);
        id
    }

    /// Toast with the configured default duration.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) -> Uuid {
        self.show_toast(message, severity, self.inner.settings.toast_duration)
    }

    pub fn dismiss_toast(&self, id: Uuid) -> bool {
        self.inner.state.send_if_modified(|state| {
            let before = state.ui.toasts.len();
            state.ui.toasts.retain(|toast| toast.id != id);
            state.ui.toasts.len() != before
        })
    }

    pub fn open_modal(&self, name: impl Into<String>, data: Option<serde_json::Value>) {
        let modal = Modal {
            name: name.into(),
            data,
        };
        self.update(|state| state.ui.modal = Some(modal));
    }

    pub fn close_modal(&self) {
        self.inner.state.send_if_modified(|state| state.ui.modal.take().is_some());
    }

    fn schedule_dismissal(&self, id: Uuid, duration: Duration) {
        if duration.is_zero() {
            return;
        }
        let Ok(runtime) = Handle::try_current() else {
            debug!(%id, "no async runtime, toast will stay until dismissed");
            return;
        };
        let store = self.downgrade();
        runtime.spawn(async move {
            tokio::time::sleep(duration).await;
            if let Some(store) = store.upgrade() {
                store.dismiss_toast(id);
            }
        });
    }

    pub(crate) fn downgrade(&self) -> WeakStore {
        WeakStore(Arc::downgrade(&self.inner))
    }
}

/// Handle for background tasks that must not keep the store alive.
#[derive(Clone)]
pub(crate) struct WeakStore(Weak<StoreInner>);

impl WeakStore {
    pub(crate) fn upgrade(&self) -> Option<Store> {
        self.0.upgrade().map(|inner| Store { inner })
    }
}

mod slices {
    use super::*;

    pub(super) fn favorites(state: &StoreState) -> &Vec<PropertyId> {
        &state.favorites
    }

    pub(super) fn favorites_mut(state: &mut StoreState) -> &mut Vec<PropertyId> {
        &mut state.favorites
    }

    pub(super) fn preferences(state: &StoreState) -> &Option<NotificationPreferences> {
        &state.preferences
    }

    pub(super) fn preferences_mut(state: &mut StoreState) -> &mut Option<NotificationPreferences> {
        &mut state.preferences
    }

    pub(super) fn dashboard(state: &StoreState) -> &DashboardCounters {
        &state.dashboard
    }

    pub(super) fn dashboard_mut(state: &mut StoreState) -> &mut DashboardCounters {
        &mut state.dashboard
    }
}

type Read<T> = fn(&StoreState) -> &T;
type Write<T> = fn(&mut StoreState) -> &mut T;

/// A slice of the store usable with [`OptimisticUpdate`].
pub struct StoreSlot<T> {
    store: Store,
    read: Read<T>,
    write: Write<T>,
    persist: bool,
}

impl<T> StoreSlot<T> {
    fn new(store: &Store, read: Read<T>, write: Write<T>, persist: bool) -> Self {
        Self {
            store: store.clone(),
            read,
            write,
            persist,
        }
    }
}

impl<T: Clone> Slot for StoreSlot<T> {
    type Value = T;

    fn snapshot(&self) -> T {
        self.store.select(|state| (self.read)(state).clone())
    }

    fn replace(&self, value: T) {
        self.modify(|slot| *slot = value);
    }

    fn modify(&self, mutate: impl FnOnce(&mut T)) {
        let write = self.write;
        self.store.update(|state| mutate(write(state)));
        if self.persist {
            self.store.persist();
        }
    }
}
