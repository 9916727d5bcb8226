//! User data store
//!
//! Holds the signed-in user's profile for the lifetime of the process,
//! mirrors it to a `ProfileStorage` and fans change events out to
//! subscribers.
//!
//! One store is created at startup and shared by `Arc`. Every mutation
//! persists synchronously before the in-memory copy changes, so a read
//! that follows a successful write always sees it. Subscribers are called
//! after internal locks are released, in subscription order, and may call
//! back into the store.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use chrono::Utc;
use uuid::Uuid;

use crate::domain::entities::{PlanTier, ProfilePatch, UserProfile};
use crate::domain::ports::ProfileStorage;
use crate::error::StoreError;

/// Storage key the profile is persisted under
pub const STORAGE_KEY: &str = "skyport_user_data";

/// Event kinds a subscriber can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Updated,
    Loaded,
    Cleared,
}

/// Change notification broadcast by the store
#[derive(Debug, Clone, PartialEq)]
pub enum StoreEvent {
    /// The profile was edited; carries the full new profile
    Updated(UserProfile),
    /// A profile was read from storage or handed over by a new session
    Loaded(UserProfile),
    /// The profile was reset to defaults (sign-out)
    Cleared,
}

impl StoreEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            StoreEvent::Updated(_) => EventKind::Updated,
            StoreEvent::Loaded(_) => EventKind::Loaded,
            StoreEvent::Cleared => EventKind::Cleared,
        }
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        match self {
            StoreEvent::Updated(profile) | StoreEvent::Loaded(profile) => Some(profile),
            StoreEvent::Cleared => None,
        }
    }
}

/// Notifications from the authentication provider
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Established {
        user_id: Uuid,
        email: String,
        name: Option<String>,
    },
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    entries: Vec<(SubscriptionId, Option<EventKind>, Handler)>,
}

impl Subscribers {
    fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _, _)| *entry_id != id);
        self.entries.len() != before
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a registered subscriber. Dropping it unsubscribes.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: SubscriptionId,
    subscribers: Weak<Mutex<Subscribers>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Unsubscribe now rather than at end of scope
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(subscribers) = self.subscribers.upgrade() {
            lock(&subscribers).remove(self.id);
        }
    }
}

pub struct UserDataStore<S>
where
    S: ProfileStorage,
{
    storage: Arc<S>,
    /// `None` until first access
    profile: Mutex<Option<UserProfile>>,
    subscribers: Arc<Mutex<Subscribers>>,
}

impl<S> UserDataStore<S>
where
    S: ProfileStorage,
{
    pub fn new(storage: Arc<S>) -> Self {
        Self {
            storage,
            profile: Mutex::new(None),
            subscribers: Arc::new(Mutex::new(Subscribers::default())),
        }
    }

    // ========== Reads ==========

    /// Copy of the current profile, loading it on first access
    pub fn get(&self) -> UserProfile {
        self.with_profile(|profile| profile.clone())
    }

    pub fn plan(&self) -> PlanTier {
        self.with_profile(|profile| profile.plan)
    }

    pub fn is_loaded(&self) -> bool {
        lock(&self.profile).is_some()
    }

    // ========== Mutations ==========

    /// Shallow-merge `patch` into the profile, persist, then broadcast
    /// `Updated`. On a persistence failure nothing changes and nothing is
    /// broadcast.
    pub fn update(&self, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let updated = self.with_profile(|current| {
            let mut next = current.clone();
            next.apply(patch);
            self.persist(&next)?;
            *current = next.clone();
            Ok::<_, StoreError>(next)
        })?;

        tracing::debug!(email = %updated.email, "Profile updated");
        self.emit(&StoreEvent::Updated(updated.clone()));
        Ok(updated)
    }

    pub fn update_avatar(&self, avatar: impl Into<String>) -> Result<UserProfile, StoreError> {
        self.update(ProfilePatch::avatar(avatar))
    }

    /// Record the tier reported by billing
    pub fn set_plan(&self, plan: PlanTier) -> Result<UserProfile, StoreError> {
        self.update(ProfilePatch::plan(plan))
    }

    /// Reset to the default profile, persist, then broadcast `Cleared`
    pub fn clear(&self) -> Result<(), StoreError> {
        self.with_profile(|current| {
            let defaults = UserProfile::default();
            self.persist(&defaults)?;
            *current = defaults;
            Ok::<_, StoreError>(())
        })?;

        tracing::info!("Profile cleared");
        self.emit(&StoreEvent::Cleared);
        Ok(())
    }

    /// Apply a session change from the authentication provider.
    ///
    /// A new session merges the identity into the profile and broadcasts
    /// `Loaded`. A session for a different email starts from defaults.
    /// An ended session clears the profile.
    pub fn handle_session(&self, event: SessionEvent) -> Result<UserProfile, StoreError> {
        let (user_id, email, name) = match event {
            SessionEvent::Established {
                user_id,
                email,
                name,
            } => (user_id, email, name),
            SessionEvent::Ended => {
                self.clear()?;
                return Ok(UserProfile::default());
            }
        };

        let profile = self.with_profile(|current| {
            let same_user = current.email.is_empty() || current.email.eq_ignore_ascii_case(&email);
            let mut next = if same_user {
                current.clone()
            } else {
                UserProfile::default()
            };
            next.email = email;
            if let Some(name) = name {
                next.name = name;
            }
            if next.joined_at.is_none() {
                next.joined_at = Some(Utc::now());
            }
            self.persist(&next)?;
            *current = next.clone();
            Ok::<_, StoreError>(next)
        })?;

        tracing::info!(%user_id, "Session established");
        self.emit(&StoreEvent::Loaded(profile.clone()));
        Ok(profile)
    }

    // ========== Subscriptions ==========

    /// Receive events of one kind until the returned handle is dropped
    pub fn subscribe<F>(&self, kind: EventKind, handler: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.add_subscriber(Some(kind), Arc::new(handler))
    }

    /// Receive every event until the returned handle is dropped
    pub fn subscribe_all<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.add_subscriber(None, Arc::new(handler))
    }

    /// Remove a subscriber by id. Returns false if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.subscribers).remove(id)
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).entries.len()
    }

    fn add_subscriber(&self, kind: Option<EventKind>, handler: Handler) -> Subscription {
        let mut subscribers = lock(&self.subscribers);
        let id = SubscriptionId(subscribers.next_id);
        subscribers.next_id += 1;
        subscribers.entries.push((id, kind, handler));

        Subscription {
            id,
            subscribers: Arc::downgrade(&self.subscribers),
        }
    }

    fn emit(&self, event: &StoreEvent) {
        let kind = event.kind();
        let handlers: Vec<Handler> = lock(&self.subscribers)
            .entries
            .iter()
            .filter(|(_, filter, _)| filter.map_or(true, |k| k == kind))
            .map(|(_, _, handler)| handler.clone())
            .collect();

        for handler in handlers {
            handler(event);
        }
    }

    // ========== Storage ==========

    /// Run `f` against the live profile, loading it first if needed. A
    /// `Loaded` event from that first load goes out once the lock is
    /// released.
    fn with_profile<T>(&self, f: impl FnOnce(&mut UserProfile) -> T) -> T {
        let (result, loaded) = {
            let mut slot = lock(&self.profile);
            let loaded = if slot.is_none() {
                let stored = self.load_from_storage();
                *slot = Some(stored.clone().unwrap_or_default());
                stored
            } else {
                None
            };
            let profile = slot.get_or_insert_with(UserProfile::default);
            (f(profile), loaded)
        };

        if let Some(profile) = loaded {
            self.emit(&StoreEvent::Loaded(profile));
        }
        result
    }

    /// Stored profile, if one is present and readable. Unreadable data is
    /// logged and treated as absent.
    fn load_from_storage(&self) -> Option<UserProfile> {
        let raw = match self.storage.read(STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                tracing::debug!("No stored profile, using defaults");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored profile, using defaults");
                return None;
            }
        };

        match serde_json::from_str::<UserProfile>(&raw) {
            Ok(profile) => {
                tracing::debug!("Loaded stored profile");
                Some(profile)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Stored profile is malformed, using defaults");
                None
            }
        }
    }

    fn persist(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        self.storage.write(STORAGE_KEY, &json)?;
        Ok(())
    }
}
