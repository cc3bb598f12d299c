// service/marketplace.rs
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::db::{CategoryExt, ProjectExt, StoreClient, UserExt};
use crate::dtos::{validate_whatsapp_number, CreateProjectDto};
use crate::error::{AppError, ErrorMessage};
use crate::models::projectmodel::*;
use crate::models::usermodel::*;
use crate::service::session::SessionManager;

/// Marketplace lifecycle operations. Every mutation validates the caller and
/// the input before touching the store, so a rejected operation never leaves
/// a partial write.
#[derive(Debug, Clone)]
pub struct MarketplaceService {
    db_client: StoreClient,
}

impl MarketplaceService {
    pub fn new(db_client: StoreClient) -> Self {
        MarketplaceService { db_client }
    }

    /// Re-fetch the session user from the store before any mutation; the
    /// in-memory session copy may be stale (renamed or deleted elsewhere).
    fn require_user(&self, session: &SessionManager) -> Result<UserAccount, AppError> {
        let current = session
            .current_user()
            .ok_or_else(|| AppError::auth(ErrorMessage::UserNotAuthenticated.to_string()))?;

        self.db_client
            .get_user(Some(current.id()), None)?
            .ok_or_else(|| AppError::auth(ErrorMessage::UserNoLongerExist.to_string()))
    }

    fn require_role(
        &self,
        session: &SessionManager,
        role: UserRole,
    ) -> Result<UserAccount, AppError> {
        let user = self.require_user(session)?;
        if user.role() != role {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }
        Ok(user)
    }

    pub fn create_project(
        &self,
        session: &SessionManager,
        body: CreateProjectDto,
    ) -> Result<Project, AppError> {
        let client = self.require_role(session, UserRole::Client)?;

        body.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let project = Project {
            id: Uuid::new_v4(),
            client_id: client.id(),
            client_name: client.username().to_owned(),
            title: body.title,
            description: body.description,
            category: body.category,
            budget: body.budget,
            deadline: body.deadline,
            status: ProjectStatus::Open,
            created_at: Utc::now(),
            attachment_url: body.attachment_url,
            proposals: vec![],
            hired_freelancer_id: None,
        };

        let project = self.db_client.save_project(project)?;

        tracing::info!(project_id = %project.id, client = %project.client_name, "project created");

        Ok(project)
    }

    pub fn submit_proposal(
        &self,
        session: &SessionManager,
        project_id: Uuid,
        message: &str,
    ) -> Result<Proposal, AppError> {
        let freelancer = self.require_role(session, UserRole::Freelancer)?;

        if message.trim().is_empty() {
            return Err(AppError::validation("Proposal message cannot be empty"));
        }

        let mut project = self
            .db_client
            .get_project(project_id)?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if matches!(project.status, ProjectStatus::Completed | ProjectStatus::Cancelled) {
            return Err(AppError::validation("Project is no longer open for proposals"));
        }

        if project.proposal_by_freelancer(freelancer.id()).is_some() {
            return Err(AppError::conflict(
                "You have already submitted a proposal for this project",
            ));
        }

        let proposal = Proposal {
            id: Uuid::new_v4(),
            project_id,
            freelancer_id: freelancer.id(),
            freelancer_name: freelancer.username().to_owned(),
            message: message.to_string(),
            created_at: Utc::now(),
            status: ProposalStatus::Pending,
        };

        project.proposals.push(proposal.clone());
        self.db_client.update_project(project)?;

        tracing::info!(
            project_id = %project_id,
            freelancer = %proposal.freelancer_name,
            "proposal submitted"
        );

        Ok(proposal)
    }

    /// Accept one proposal and move the project into progress. Re-hiring
    /// over an existing acceptance reverts the previous one to pending, so
    /// at most one proposal is ever accepted.
    pub fn hire_freelancer(
        &self,
        session: &SessionManager,
        project_id: Uuid,
        freelancer_id: Uuid,
        proposal_id: Uuid,
    ) -> Result<Project, AppError> {
        let client = self.require_role(session, UserRole::Client)?;

        let mut project = self
            .db_client
            .get_project(project_id)?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if project.client_id != client.id() {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }

        if matches!(project.status, ProjectStatus::Completed | ProjectStatus::Cancelled) {
            return Err(AppError::validation("Project is not open for hiring"));
        }

        let position = project
            .proposals
            .iter()
            .position(|p| p.id == proposal_id)
            .ok_or_else(|| AppError::not_found("Proposal not found"))?;

        if project.proposals[position].freelancer_id != freelancer_id {
            return Err(AppError::validation("Proposal does not belong to this freelancer"));
        }

        for proposal in project.proposals.iter_mut() {
            if proposal.status == ProposalStatus::Accepted {
                proposal.status = ProposalStatus::Pending;
            }
        }
        project.proposals[position].status = ProposalStatus::Accepted;
        project.hired_freelancer_id = Some(freelancer_id);
        project.status = ProjectStatus::InProgress;

        self.db_client.update_project(project.clone())?;

        tracing::info!(project_id = %project.id, freelancer_id = %freelancer_id, "freelancer hired");

        Ok(project)
    }

    /// Undo a hire: every proposal back to pending, project back to open.
    pub fn remove_hired_freelancer(
        &self,
        session: &SessionManager,
        project_id: Uuid,
    ) -> Result<Project, AppError> {
        let client = self.require_role(session, UserRole::Client)?;

        let mut project = self
            .db_client
            .get_project(project_id)?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if project.client_id != client.id() {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }

        if project.hired_freelancer_id.is_none() {
            return Err(AppError::validation("No freelancer is hired on this project"));
        }

        for proposal in project.proposals.iter_mut() {
            proposal.status = ProposalStatus::Pending;
        }
        project.hired_freelancer_id = None;
        project.status = ProjectStatus::Open;

        self.db_client.update_project(project.clone())?;

        tracing::info!(project_id = %project.id, "hired freelancer removed");

        Ok(project)
    }

    /// Completion is terminal and allowed from any non-completed status,
    /// including projects that never hired anyone.
    pub fn complete_project(
        &self,
        session: &SessionManager,
        project_id: Uuid,
    ) -> Result<Project, AppError> {
        let caller = self.require_user(session)?;

        let mut project = self
            .db_client
            .get_project(project_id)?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if caller.role() != UserRole::Admin && project.client_id != caller.id() {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }

        if project.status == ProjectStatus::Completed {
            return Err(AppError::validation("Project is already completed"));
        }

        project.status = ProjectStatus::Completed;
        self.db_client.update_project(project.clone())?;

        tracing::info!(project_id = %project.id, "project completed");

        Ok(project)
    }

    pub fn delete_project(
        &self,
        session: &SessionManager,
        project_id: Uuid,
    ) -> Result<(), AppError> {
        let caller = self.require_user(session)?;

        let project = self
            .db_client
            .get_project(project_id)?
            .ok_or_else(|| AppError::not_found("Project not found"))?;

        if caller.role() != UserRole::Admin && project.client_id != caller.id() {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }

        self.db_client.remove_project(project_id)?;

        tracing::info!(project_id = %project_id, "project deleted");

        Ok(())
    }

    pub fn add_rating(
        &self,
        session: &SessionManager,
        freelancer_id: Uuid,
        project_id: Uuid,
        rating: i32,
        comment: &str,
    ) -> Result<Rating, AppError> {
        let client = self.require_role(session, UserRole::Client)?;

        if !(1..=5).contains(&rating) {
            return Err(AppError::validation("Rating must be between 1 and 5"));
        }

        let mut account = self
            .db_client
            .get_user(Some(freelancer_id), None)?
            .ok_or_else(|| AppError::not_found("Freelancer not found"))?;

        let freelancer = account
            .as_freelancer_mut()
            .ok_or_else(|| AppError::not_found("Freelancer not found"))?;

        let already_rated = freelancer
            .ratings
            .iter()
            .any(|r| r.client_id == client.id() && r.project_id == project_id);
        if already_rated {
            return Err(AppError::conflict(
                "You have already rated this freelancer for this project",
            ));
        }

        let rating = Rating {
            id: Uuid::new_v4(),
            client_id: client.id(),
            client_name: client.username().to_owned(),
            project_id,
            rating,
            comment: comment.to_string(),
            created_at: Utc::now(),
        };

        freelancer.ratings.push(rating.clone());
        freelancer.recompute_average_rating();

        self.db_client.update_user(account)?;

        tracing::info!(freelancer_id = %freelancer_id, rating = rating.rating, "rating added");

        Ok(rating)
    }

    /// Admin-dashboard removal.
    pub fn delete_user(&self, session: &SessionManager, user_id: Uuid) -> Result<(), AppError> {
        self.require_role(session, UserRole::Admin)?;
        self.remove_user_record(user_id)
    }

    /// Self-service removal; admins may remove anyone.
    pub fn remove_user(&self, session: &SessionManager, user_id: Uuid) -> Result<(), AppError> {
        let caller = self.require_user(session)?;
        if caller.role() != UserRole::Admin && caller.id() != user_id {
            return Err(AppError::permission(ErrorMessage::PermissionDenied.to_string()));
        }
        self.remove_user_record(user_id)
    }

    fn remove_user_record(&self, user_id: Uuid) -> Result<(), AppError> {
        let user = self
            .db_client
            .get_user(Some(user_id), None)?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.db_client.remove_user(user_id)?;

        // Cascade: client-owned projects go with the account. Proposals and
        // ratings referencing the user elsewhere are left in place.
        let mut projects = self.db_client.get_projects()?;
        let before = projects.len();
        projects.retain(|p| p.client_id != user_id);
        if projects.len() != before {
            self.db_client.save_projects(&projects)?;
        }

        tracing::info!(user_id = %user_id, username = %user.username(), "user removed");

        Ok(())
    }

    /// Wholesale replacement of the caller's own freelancer record; there is
    /// no partial-field merge.
    pub fn update_freelancer_profile(
        &self,
        session: &SessionManager,
        profile: FreelancerProfile,
    ) -> Result<FreelancerProfile, AppError> {
        let caller = self.require_user(session)?;
        if caller.id() != profile.id || caller.role() != UserRole::Freelancer {
            return Err(AppError::permission(
                "You do not have permission to update this profile",
            ));
        }

        if let Some(number) = profile.whatsapp_number.as_deref() {
            validate_whatsapp_number(number).map_err(|e| AppError::Validation(e.to_string()))?;
        }

        let updated = self
            .db_client
            .update_user(UserAccount::Freelancer(profile.clone()))?;
        if !updated {
            return Err(AppError::not_found("Freelancer not found"));
        }

        tracing::info!(user_id = %profile.id, "freelancer profile updated");

        Ok(profile)
    }

    pub fn update_client_profile(
        &self,
        session: &SessionManager,
        profile: ClientProfile,
    ) -> Result<ClientProfile, AppError> {
        let caller = self.require_user(session)?;
        if caller.id() != profile.id || caller.role() != UserRole::Client {
            return Err(AppError::permission(
                "You do not have permission to update this profile",
            ));
        }

        let updated = self
            .db_client
            .update_user(UserAccount::Client(profile.clone()))?;
        if !updated {
            return Err(AppError::not_found("Client not found"));
        }

        tracing::info!(user_id = %profile.id, "client profile updated");

        Ok(profile)
    }

    pub fn update_admin_profile(
        &self,
        session: &SessionManager,
        profile: AdminProfile,
    ) -> Result<AdminProfile, AppError> {
        let caller = self.require_user(session)?;
        if caller.id() != profile.id || caller.role() != UserRole::Admin {
            return Err(AppError::permission(
                "You do not have permission to update this profile",
            ));
        }

        let updated = self
            .db_client
            .update_user(UserAccount::Admin(profile.clone()))?;
        if !updated {
            return Err(AppError::not_found("Admin not found"));
        }

        tracing::info!(user_id = %profile.id, "admin profile updated");

        Ok(profile)
    }

    // Queries are linear scans over the full collection, like every read in
    // this store.

    pub fn projects(&self) -> Result<Vec<Project>, AppError> {
        Ok(self.db_client.get_projects()?)
    }

    pub fn project_by_id(&self, project_id: Uuid) -> Result<Option<Project>, AppError> {
        Ok(self.db_client.get_project(project_id)?)
    }

    pub fn projects_by_user(&self, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        let projects = self.db_client.get_projects()?;
        Ok(projects.into_iter().filter(|p| p.client_id == user_id).collect())
    }

    pub fn users(&self) -> Result<Vec<UserAccount>, AppError> {
        Ok(self.db_client.get_users()?)
    }

    pub fn freelancers(&self) -> Result<Vec<FreelancerProfile>, AppError> {
        let users = self.db_client.get_users()?;
        Ok(users
            .iter()
            .filter_map(|u| u.as_freelancer().cloned())
            .collect())
    }

    pub fn freelancer_by_id(&self, freelancer_id: Uuid) -> Result<Option<FreelancerProfile>, AppError> {
        let user = self.db_client.get_user(Some(freelancer_id), None)?;
        Ok(user.and_then(|u| u.as_freelancer().cloned()))
    }

    pub fn categories(&self) -> Result<Vec<Category>, AppError> {
        Ok(self.db_client.get_categories()?)
    }
}
