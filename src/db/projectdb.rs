// db/projectdb.rs
use uuid::Uuid;

use super::backend::{StoreError, PROJECTS_KEY};
use super::db::StoreClient;
use crate::models::projectmodel::Project;

/// Typed access to the persisted `projects` collection (proposals are
/// embedded in their project).
pub trait ProjectExt {
    fn get_projects(&self) -> Result<Vec<Project>, StoreError>;

    fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError>;

    fn save_project(&self, project: Project) -> Result<Project, StoreError>;

    /// Wholesale replacement of the record with the same id. Returns `false`
    /// when no such record exists.
    fn update_project(&self, project: Project) -> Result<bool, StoreError>;

    fn remove_project(&self, project_id: Uuid) -> Result<(), StoreError>;

    fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError>;
}

impl ProjectExt for StoreClient {
    fn get_projects(&self) -> Result<Vec<Project>, StoreError> {
        Ok(self.load(PROJECTS_KEY)?.unwrap_or_default())
    }

    fn get_project(&self, project_id: Uuid) -> Result<Option<Project>, StoreError> {
        let projects = self.get_projects()?;
        Ok(projects.into_iter().find(|p| p.id == project_id))
    }

    fn save_project(&self, project: Project) -> Result<Project, StoreError> {
        let mut projects = self.get_projects()?;
        projects.push(project.clone());
        self.save(PROJECTS_KEY, &projects)?;
        Ok(project)
    }

    fn update_project(&self, project: Project) -> Result<bool, StoreError> {
        let mut projects = self.get_projects()?;
        match projects.iter().position(|p| p.id == project.id) {
            Some(index) => {
                projects[index] = project;
                self.save(PROJECTS_KEY, &projects)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn remove_project(&self, project_id: Uuid) -> Result<(), StoreError> {
        let mut projects = self.get_projects()?;
        projects.retain(|p| p.id != project_id);
        self.save(PROJECTS_KEY, &projects)
    }

    fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        self.save(PROJECTS_KEY, &projects)
    }
}
