//! User data hooks
//!
//! Per-view adapters over the shared `UserDataStore`. A hook keeps its own
//! copy of the profile in sync with store events and tracks whether one of
//! its own mutations is in flight.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::app::user_data_store::{EventKind, Subscription, UserDataStore};
use crate::domain::entities::{ProfilePatch, UserProfile};
use crate::domain::ports::ProfileStorage;
use crate::error::StoreError;

#[derive(Debug, Default)]
struct HookState {
    profile: UserProfile,
    loading: bool,
    last_error: Option<String>,
}

fn lock(state: &Mutex<HookState>) -> MutexGuard<'_, HookState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Sets the loading flag for as long as it lives
struct LoadingGuard<'a> {
    state: &'a Mutex<HookState>,
}

impl<'a> LoadingGuard<'a> {
    fn start(state: &'a Mutex<HookState>) -> Self {
        lock(state).loading = true;
        Self { state }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        lock(self.state).loading = false;
    }
}

/// A mounted view's handle on the user's profile.
///
/// Subscriptions are released when the hook is dropped.
pub struct UserDataHook<S>
where
    S: ProfileStorage,
{
    store: Arc<UserDataStore<S>>,
    state: Arc<Mutex<HookState>>,
    _subscriptions: Vec<Subscription>,
}

impl<S> UserDataHook<S>
where
    S: ProfileStorage,
{
    pub fn mount(store: Arc<UserDataStore<S>>) -> Self {
        let state = Arc::new(Mutex::new(HookState::default()));

        let subscriptions: Vec<Subscription> =
            [EventKind::Updated, EventKind::Loaded, EventKind::Cleared]
                .into_iter()
                .map(|kind| {
                    let state = state.clone();
                    store.subscribe(kind, move |event| {
                        lock(&state).profile = event.profile().cloned().unwrap_or_default();
                    })
                })
                .collect();

        // Seeded after subscribing so a Loaded from this first read is not missed
        let profile = store.get();
        lock(&state).profile = profile;

        Self {
            store,
            state,
            _subscriptions: subscriptions,
        }
    }

    /// Release subscriptions now
    pub fn unmount(self) {}

    pub fn user_data(&self) -> UserProfile {
        lock(&self.state).profile.clone()
    }

    pub fn is_loading(&self) -> bool {
        lock(&self.state).loading
    }

    /// Message of the most recent failed mutation, cleared on success
    pub fn last_error(&self) -> Option<String> {
        lock(&self.state).last_error.clone()
    }

    /// Edit personal fields. The plan tier is owned by billing and is
    /// ignored here.
    pub fn update_profile(&self, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let patch = ProfilePatch { plan: None, ..patch };
        self.update_user_data(patch)
    }

    pub fn update_avatar(&self, avatar: impl Into<String>) -> Result<UserProfile, StoreError> {
        self.update_user_data(ProfilePatch::avatar(avatar))
    }

    /// Apply any patch through the store
    pub fn update_user_data(&self, patch: ProfilePatch) -> Result<UserProfile, StoreError> {
        let _loading = LoadingGuard::start(&self.state);

        let result = self.store.update(patch);
        match &result {
            Ok(_) => lock(&self.state).last_error = None,
            Err(e) => {
                tracing::warn!(error = %e, "Profile update failed");
                lock(&self.state).last_error = Some(e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProfileStorage;
    use crate::app::user_data_store::STORAGE_KEY;
    use crate::domain::entities::PlanTier;
    use crate::test_utils::test_profile;

    fn seeded_store() -> (
        Arc<UserDataStore<InMemoryProfileStorage>>,
        Arc<InMemoryProfileStorage>,
    ) {
        let json = serde_json::to_string(&test_profile()).unwrap();
        let storage = Arc::new(InMemoryProfileStorage::new().with_value(STORAGE_KEY, json));
        (Arc::new(UserDataStore::new(storage.clone())), storage)
    }

    #[test]
    fn mount_seeds_from_store() {
        let (store, _) = seeded_store();
        let hook = UserDataHook::mount(store.clone());

        assert_eq!(hook.user_data(), test_profile());
        assert!(!hook.is_loading());
        assert_eq!(hook.last_error(), None);
        assert_eq!(store.subscriber_count(), 3);
    }

    #[test]
    fn drop_and_unmount_release_subscriptions() {
        let (store, _) = seeded_store();

        let hook = UserDataHook::mount(store.clone());
        drop(hook);
        assert_eq!(store.subscriber_count(), 0);

        let hook = UserDataHook::mount(store.clone());
        hook.unmount();
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn every_mounted_hook_sees_updates() {
        let (store, _) = seeded_store();
        let editor = UserDataHook::mount(store.clone());
        let header = UserDataHook::mount(store.clone());

        editor.update_profile(ProfilePatch::bio("new bio")).unwrap();

        assert_eq!(editor.user_data().bio, "new bio");
        assert_eq!(header.user_data().bio, "new bio");
        assert_eq!(header.user_data().name, test_profile().name);
    }

    #[test]
    fn hook_follows_direct_store_changes() {
        let (store, _) = seeded_store();
        let hook = UserDataHook::mount(store.clone());

        store.set_plan(PlanTier::Enterprise).unwrap();
        assert_eq!(hook.user_data().plan, PlanTier::Enterprise);

        store.clear().unwrap();
        assert_eq!(hook.user_data(), UserProfile::default());
    }

    #[test]
    fn loading_flag_is_set_during_update() {
        let (store, _) = seeded_store();
        let hook = Arc::new(UserDataHook::mount(store.clone()));
        let observed = Arc::new(Mutex::new(None));

        let weak_hook = Arc::downgrade(&hook);
        let observed_in_handler = observed.clone();
        let _probe = store.subscribe(EventKind::Updated, move |_| {
            if let Some(hook) = weak_hook.upgrade() {
                *observed_in_handler.lock().unwrap() = Some(hook.is_loading());
            }
        });

        hook.update_avatar("avatars/new.png").unwrap();

        assert_eq!(*observed.lock().unwrap(), Some(true));
        assert!(!hook.is_loading());
        assert_eq!(hook.user_data().avatar.as_deref(), Some("avatars/new.png"));
    }

    #[test]
    fn failed_update_resets_loading_and_returns_error() {
        let (store, storage) = seeded_store();
        let hook = UserDataHook::mount(store);
        storage.set_fail_writes(true);

        let result = hook.update_user_data(ProfilePatch::bio("lost"));

        assert!(matches!(result, Err(StoreError::Persist(_))));
        assert!(!hook.is_loading());
        assert!(hook.last_error().unwrap().contains("Failed to persist profile"));
        assert_eq!(hook.user_data(), test_profile());

        storage.set_fail_writes(false);
        hook.update_user_data(ProfilePatch::bio("kept")).unwrap();
        assert_eq!(hook.last_error(), None);
    }

    #[test]
    fn update_profile_ignores_plan() {
        let (store, _) = seeded_store();
        let hook = UserDataHook::mount(store);

        let profile = hook
            .update_profile(ProfilePatch {
                company: Some("Initech".to_string()),
                plan: Some(PlanTier::Enterprise),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(profile.company, "Initech");
        assert_eq!(profile.plan, test_profile().plan);
    }

    #[test]
    fn update_user_data_can_change_plan() {
        let (store, _) = seeded_store();
        let hook = UserDataHook::mount(store);

        let profile = hook
            .update_user_data(ProfilePatch::plan(PlanTier::Enterprise))
            .unwrap();
        assert_eq!(profile.plan, PlanTier::Enterprise);
    }
}
