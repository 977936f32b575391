use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use ulid::Ulid;

use crate::config::ScheduleConfig;
use crate::engine::{ScheduleError, SelectionController, SelectionObserver};
use crate::limits::*;

/// Explicit session handles for embeddings with no component lifecycle.
/// Each session owns one controller; disposing the session disposes it.
pub struct SessionManager {
    sessions: DashMap<Ulid, Arc<SelectionController>>,
    defaults: ScheduleConfig,
}

impl SessionManager {
    pub fn new(defaults: ScheduleConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            defaults,
        }
    }

    /// Open a session with the manager's default config.
    pub fn open(&self, observer: Arc<dyn SelectionObserver>) -> Result<Ulid, ScheduleError> {
        self.open_with(self.defaults.clone(), observer)
    }

    pub fn open_with(
        &self,
        config: ScheduleConfig,
        observer: Arc<dyn SelectionObserver>,
    ) -> Result<Ulid, ScheduleError> {
        if self.sessions.len() >= MAX_SESSIONS {
            return Err(ScheduleError::LimitExceeded("too many sessions"));
        }
        let controller = SelectionController::new(config, observer)?;
        let id = Ulid::new();
        self.sessions.insert(id, Arc::new(controller));
        metrics::gauge!(crate::observability::SESSIONS_ACTIVE).set(self.sessions.len() as f64);
        info!("session {id} opened");
        Ok(id)
    }

    pub fn get(&self, id: &Ulid) -> Result<Arc<SelectionController>, ScheduleError> {
        self.sessions
            .get(id)
            .map(|e| e.value().clone())
            .ok_or(ScheduleError::SessionNotFound(*id))
    }

    /// Dispose and forget a session. Outstanding `Arc`s see a disposed controller.
    pub fn close(&self, id: &Ulid) -> Result<(), ScheduleError> {
        let (_, controller) = self
            .sessions
            .remove(id)
            .ok_or(ScheduleError::SessionNotFound(*id))?;
        controller.dispose();
        metrics::gauge!(crate::observability::SESSIONS_ACTIVE).set(self.sessions.len() as f64);
        info!("session {id} closed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ChannelObserver;
    use crate::model::*;

    fn observer() -> Arc<dyn SelectionObserver> {
        let (obs, _rx) = ChannelObserver::new();
        Arc::new(obs)
    }

    #[tokio::test]
    async fn sessions_are_isolated() {
        let sm = SessionManager::new(ScheduleConfig::default());
        let a = sm.open(observer()).unwrap();
        let b = sm.open(observer()).unwrap();
        assert_ne!(a, b);

        let ca = sm.get(&a).unwrap();
        ca.pointer_down(Day::MONDAY);
        ca.pointer_enter(Day::WEDNESDAY);
        ca.pointer_up();

        assert_eq!(ca.snapshot().len(), 3);
        assert!(sm.get(&b).unwrap().snapshot().is_empty());
    }

    #[tokio::test]
    async fn same_controller_returned() {
        let sm = SessionManager::new(ScheduleConfig::default());
        let id = sm.open(observer()).unwrap();
        assert!(Arc::ptr_eq(&sm.get(&id).unwrap(), &sm.get(&id).unwrap()));
    }

    #[tokio::test]
    async fn close_disposes_controller() {
        let sm = SessionManager::new(ScheduleConfig::default());
        let id = sm.open(observer()).unwrap();
        let held = sm.get(&id).unwrap();

        sm.close(&id).unwrap();
        assert!(held.is_disposed());
        assert!(sm.is_empty());
        assert!(matches!(sm.get(&id), Err(ScheduleError::SessionNotFound(_))));
        assert!(sm.close(&id).is_err());
    }

    #[tokio::test]
    async fn open_with_bad_config_fails() {
        let sm = SessionManager::new(ScheduleConfig::default());
        let config = ScheduleConfig {
            min_nights: 6,
            max_nights: 2,
            ..ScheduleConfig::default()
        };
        assert!(matches!(
            sm.open_with(config, observer()),
            Err(ScheduleError::InvalidConfig(_))
        ));
        assert_eq!(sm.len(), 0);
    }

    #[test]
    fn open_outside_runtime_fails() {
        let sm = SessionManager::new(ScheduleConfig::default());
        assert!(matches!(sm.open(observer()), Err(ScheduleError::NoRuntime)));
    }
}
