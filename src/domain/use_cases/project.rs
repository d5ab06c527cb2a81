use crate::{
    entities::{ids::parse_id_list, project::ProjectDetails},
    errors::AppError,
    repositories::project::ProjectRepository,
};

pub struct ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub project_repo: R,
}

impl<R> ProjectHandler<R>
where
    R: ProjectRepository,
{
    pub fn new(project_repo: R) -> Self {
        ProjectHandler { project_repo }
    }

    pub async fn list_projects(&self, ids: Option<&str>) -> Result<Vec<ProjectDetails>, AppError> {
        let filter = match ids.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => Some(parse_id_list(raw)?),
            None => None,
        };

        self.project_repo.list_projects(filter).await
    }
}
