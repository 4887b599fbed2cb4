use crate::content::LessonDefinition;
use crate::error::{LabError, LabResult};
use crate::profile::UserProfile;
use crate::progress::{ProgressDelta, ProgressRules};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::{debug, info};

const EVENT_CAPACITY: usize = 64;

/// Where profiles live between sessions.
pub trait ProfileStore: Send + Sync {
    fn load(&self, user_id: &str) -> LabResult<UserProfile>;
    fn save(&self, user_id: &str, profile: &UserProfile) -> LabResult<()>;
}

impl<S: ProfileStore + ?Sized> ProfileStore for Arc<S> {
    fn load(&self, user_id: &str) -> LabResult<UserProfile> {
        (**self).load(user_id)
    }

    fn save(&self, user_id: &str, profile: &UserProfile) -> LabResult<()> {
        (**self).save(user_id, profile)
    }
}

#[derive(Debug, Clone)]
struct StoredProfile {
    profile: UserProfile,
    updated_at: DateTime<Utc>,
}

/// In-process store backed by a concurrent map.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: DashMap<String, StoredProfile>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When the profile was last saved.
    pub fn updated_at(&self, user_id: &str) -> Option<DateTime<Utc>> {
        self.profiles.get(user_id).map(|p| p.updated_at)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl ProfileStore for MemoryProfileStore {
    fn load(&self, user_id: &str) -> LabResult<UserProfile> {
        self.profiles
            .get(user_id)
            .map(|p| p.profile.clone())
            .ok_or_else(|| LabError::UnknownProfile {
                user_id: user_id.to_string(),
            })
    }

    fn save(&self, user_id: &str, profile: &UserProfile) -> LabResult<()> {
        self.profiles.insert(
            user_id.to_string(),
            StoredProfile {
                profile: profile.clone(),
                updated_at: Utc::now(),
            },
        );
        Ok(())
    }
}

/// Events delivered to profile subscribers.
#[derive(Debug, Clone)]
pub enum ProfileEvent {
    Registered(UserProfile),
    LessonCompleted {
        profile: UserProfile,
        delta: ProgressDelta,
    },
}

/// The only place profiles are mutated. Transitions for one user run one
/// after another; subscribers get a [`ProfileEvent`] for each applied change.
pub struct ProgressLedger<S> {
    store: S,
    rules: ProgressRules,
    locks: DashMap<String, Arc<Mutex<()>>>,
    hub: DashMap<String, broadcast::Sender<ProfileEvent>>,
}

impl<S: ProfileStore> ProgressLedger<S> {
    pub fn new(store: S) -> Self {
        Self::with_rules(store, ProgressRules::default())
    }

    pub fn with_rules(store: S, rules: ProgressRules) -> Self {
        Self {
            store,
            rules,
            locks: DashMap::new(),
            hub: DashMap::new(),
        }
    }

    pub fn rules(&self) -> &ProgressRules {
        &self.rules
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a newly signed-up profile.
    pub fn register(&self, profile: UserProfile) -> LabResult<UserProfile> {
        let user_id = profile.id.clone();
        self.serialized(&user_id, move || {
            if self.store.load(&profile.id).is_ok() {
                return Err(LabError::DuplicateProfile {
                    user_id: profile.id,
                });
            }
            self.store.save(&profile.id, &profile)?;
            debug!(user = %profile.id, "profile registered");
            self.notify(&profile.id, ProfileEvent::Registered(profile.clone()));
            Ok(profile)
        })
    }

    pub fn profile(&self, user_id: &str) -> LabResult<UserProfile> {
        self.store.load(user_id)
    }

    /// Applies a lesson completion to the stored profile and returns the
    /// result. Repeated completions leave the profile untouched and publish
    /// nothing.
    pub fn complete_lesson(&self, user_id: &str, lesson: &LessonDefinition) -> LabResult<UserProfile> {
        self.serialized(user_id, || self.apply_completion(user_id, lesson))
    }

    fn apply_completion(&self, user_id: &str, lesson: &LessonDefinition) -> LabResult<UserProfile> {
        let before = self.store.load(user_id)?;
        let after = self.rules.advance(&before, lesson);
        if after == before {
            debug!(user = %user_id, lesson = %lesson.id, "lesson already completed");
            return Ok(after);
        }

        self.store.save(user_id, &after)?;
        let delta = ProgressDelta::between(&before, &after);
        info!(
            user = %user_id,
            lesson = %lesson.id,
            xp = after.xp,
            gained = delta.xp_gained,
            "lesson completed"
        );
        self.notify(
            user_id,
            ProfileEvent::LessonCompleted {
                profile: after.clone(),
                delta,
            },
        );
        Ok(after)
    }

    /// Subscribe to events for a user. Creates the channel if needed.
    pub fn subscribe(&self, user_id: &str) -> broadcast::Receiver<ProfileEvent> {
        self.hub
            .entry(user_id.to_string())
            .or_insert_with(|| broadcast::channel(EVENT_CAPACITY).0)
            .subscribe()
    }

    /// No-op if nobody is subscribed. A channel whose receivers have all
    /// been dropped is removed from the hub.
    fn notify(&self, user_id: &str, event: ProfileEvent) {
        let delivered = match self.hub.get(user_id) {
            Some(tx) => tx.send(event).is_ok(),
            None => return,
        };
        if !delivered {
            self.hub.remove_if(user_id, |_, tx| tx.receiver_count() == 0);
            debug!(user = %user_id, "dropped idle event channel");
        }
    }

    /// Runs `f` under the user's lock. The lock entry is removed again once
    /// no other transition for that user holds or waits on it.
    fn serialized<T>(&self, user_id: &str, f: impl FnOnce() -> T) -> T {
        let lock = self.user_lock(user_id);
        let out = {
            let _guard = lock.lock().unwrap_or_else(|e| e.into_inner());
            f()
        };
        drop(lock);
        self.locks.remove_if(user_id, |_, l| Arc::strong_count(l) == 1);
        out
    }

    fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
