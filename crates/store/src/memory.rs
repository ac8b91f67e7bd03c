//! In-memory [`ProjectStore`] used when no database is configured and in
//! tests. Same compare-and-swap semantics as the Postgres store.

use std::collections::HashMap;

use tokio::sync::RwLock;
use uuid::Uuid;

use docforge_core::project::Project;

use crate::{ProjectStore, StoreError};

/// Process-local project storage behind an async read/write lock.
#[derive(Default)]
pub struct MemoryStore {
    projects: RwLock<HashMap<Uuid, Project>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl ProjectStore for MemoryStore {
    async fn create(&self, project: &Project) -> Result<(), StoreError> {
        self.projects
            .write()
            .await
            .insert(project.id, project.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.projects.read().await.get(&id).cloned())
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Project>, StoreError> {
        let mut projects: Vec<Project> = self
            .projects
            .read()
            .await
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect();
        // Newest first, matching the SQL ordering.
        projects.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(projects)
    }

    async fn update(&self, project: &Project, expected_version: i64) -> Result<bool, StoreError> {
        let mut projects = self.projects.write().await;
        match projects.get_mut(&project.id) {
            Some(stored) if stored.version == expected_version => {
                *stored = project.clone();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.projects.write().await.remove(&id).is_some())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use docforge_core::project::{DocumentKind, NewProject};

    use super::*;

    fn project_for(user_id: &str, title: &str) -> Project {
        Project::new(
            user_id,
            NewProject {
                title: title.to_string(),
                kind: DocumentKind::FlowDocument,
                topic: "Testing".to_string(),
                description: None,
            },
            vec!["Only".to_string()],
        )
    }

    // -- CRUD --

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = MemoryStore::new();
        let project = project_for("u1", "A");
        store.create(&project).await.unwrap();

        let found = store.find_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(found.title, "A");

        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn list_is_scoped_to_user_and_newest_first() {
        let store = MemoryStore::new();
        let mut first = project_for("u1", "older");
        let mut second = project_for("u1", "newer");
        first.created_at = chrono::Utc::now() - chrono::Duration::minutes(5);
        second.created_at = chrono::Utc::now();
        store.create(&first).await.unwrap();
        store.create(&second).await.unwrap();
        store.create(&project_for("u2", "other")).await.unwrap();

        let listed = store.list_by_user("u1").await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, ["newer", "older"]);
    }

    // -- Compare-and-swap --

    #[tokio::test]
    async fn update_applies_only_on_matching_version() {
        let store = MemoryStore::new();
        let mut project = project_for("u1", "A");
        store.create(&project).await.unwrap();

        project.title = "B".to_string();
        project.version = 2;
        assert!(store.update(&project, 1).await.unwrap());

        // Stale expected version loses.
        project.title = "C".to_string();
        project.version = 3;
        assert!(!store.update(&project, 1).await.unwrap());

        let stored = store.find_by_id(project.id).await.unwrap().unwrap();
        assert_eq!(stored.title, "B");
        assert_eq!(stored.version, 2);
    }

    #[tokio::test]
    async fn update_of_missing_project_reports_lost_race() {
        let store = MemoryStore::new();
        let project = project_for("u1", "A");
        assert!(!store.update(&project, 1).await.unwrap());
    }

    #[tokio::test]
    async fn delete_reports_whether_row_existed() {
        let store = MemoryStore::new();
        let project = project_for("u1", "A");
        store.create(&project).await.unwrap();

        assert!(store.delete(project.id).await.unwrap());
        assert!(!store.delete(project.id).await.unwrap());
    }
}
