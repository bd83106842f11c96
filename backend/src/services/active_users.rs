//! In-memory tracking of signed-in users
//!
//! Process-local only: each server instance keeps its own set and it is lost
//! on restart. Running several instances behind a load balancer gives each
//! one a partial view.

use std::{collections::HashSet, sync::Arc};

use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct ActiveUsers {
    inner: Arc<RwLock<HashSet<Uuid>>>,
}

impl ActiveUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a login. Returns false if the user was already active.
    pub async fn mark_active(&self, user_id: Uuid) -> bool {
        self.inner.write().await.insert(user_id)
    }

    /// Record a logout or account removal
    pub async fn mark_inactive(&self, user_id: Uuid) -> bool {
        self.inner.write().await.remove(&user_id)
    }

    pub async fn snapshot(&self) -> Vec<Uuid> {
        let mut ids: Vec<Uuid> = self.inner.read().await.iter().copied().collect();
        ids.sort();
        ids
    }

    pub async fn count(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_login_logout_cycle() {
        let active = ActiveUsers::new();
        let user = Uuid::new_v4();

        assert!(active.mark_active(user).await);
        assert!(!active.mark_active(user).await);
        assert_eq!(active.snapshot().await, vec![user]);
        assert_eq!(active.count().await, 1);

        assert!(active.mark_inactive(user).await);
        assert!(active.snapshot().await.is_empty());
        assert_eq!(active.count().await, 0);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let active = ActiveUsers::new();
        let handle = active.clone();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        active.mark_active(a).await;
        handle.mark_active(b).await;

        let mut expected = vec![a, b];
        expected.sort();
        assert_eq!(active.snapshot().await, expected);
    }
}
