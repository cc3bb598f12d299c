use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use conectajob::{
    App, AppError, Config, CreateProjectDto, LoginUserDto, MemoryBackend, ProjectStatus,
    ProposalStatus, RegisterUserDto, UserAccount, UserRole,
};

const PASSWORD: &str = "pass1234";

fn test_config() -> Config {
    Config {
        data_dir: PathBuf::from("unused-in-memory"),
        admin_email: "admin@conectajob.com".to_string(),
        admin_password: "admin123".to_string(),
    }
}

fn test_app() -> App {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    App::new(test_config(), Arc::new(MemoryBackend::new())).expect("app should initialize")
}

fn register(app: &mut App, username: &str, email: &str, role: UserRole) -> UserAccount {
    app.session
        .register(RegisterUserDto {
            username: username.to_string(),
            email: email.to_string(),
            password: PASSWORD.to_string(),
            role,
        })
        .expect("registration should succeed")
}

fn login(app: &mut App, email: &str) {
    app.session
        .login(LoginUserDto {
            email: email.to_string(),
            password: PASSWORD.to_string(),
        })
        .expect("login should succeed");
}

fn login_admin(app: &mut App) {
    app.session
        .login(LoginUserDto {
            email: "admin@conectajob.com".to_string(),
            password: "admin123".to_string(),
        })
        .expect("admin login should succeed");
}

fn project_dto(title: &str) -> CreateProjectDto {
    CreateProjectDto {
        title: title.to_string(),
        description: "A fresh logo for a small bakery brand".to_string(),
        category: "Design".to_string(),
        budget: 500.0,
        deadline: Utc::now() + Duration::days(30),
        attachment_url: None,
    }
}

#[test]
fn client_creates_a_project_that_lists_under_their_id() {
    let mut app = test_app();
    let ana = register(&mut app, "ana", "ana@x.com", UserRole::Client);

    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    assert_eq!(project.status, ProjectStatus::Open);
    assert_eq!(project.client_name, "ana");
    assert!(project.proposals.is_empty());
    assert!(project.hired_freelancer_id.is_none());

    let mine = app.marketplace.projects_by_user(ana.id()).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, project.id);
}

#[test]
fn create_project_requires_a_client_session() {
    let mut app = test_app();

    // Nobody logged in.
    let result = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"));
    assert!(matches!(result, Err(AppError::Auth(_))));

    // Freelancers cannot post projects.
    register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    let result = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"));
    assert!(matches!(result, Err(AppError::Permission(_))));
}

#[test]
fn create_project_validates_its_input() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);

    let mut bad_budget = project_dto("Logo design");
    bad_budget.budget = -10.0;
    assert!(matches!(
        app.marketplace.create_project(&app.session, bad_budget),
        Err(AppError::Validation(_))
    ));

    let mut past_deadline = project_dto("Logo design");
    past_deadline.deadline = Utc::now() - Duration::days(1);
    assert!(matches!(
        app.marketplace.create_project(&app.session, past_deadline),
        Err(AppError::Validation(_))
    ));

    assert!(app.marketplace.projects().unwrap().is_empty());
}

#[test]
fn second_proposal_from_the_same_freelancer_conflicts() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    app.marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    let second = app
        .marketplace
        .submit_proposal(&app.session, project.id, "Pick me instead");
    assert!(matches!(second, Err(AppError::Conflict(_))));

    // The original proposal is untouched.
    let stored = app.marketplace.project_by_id(project.id).unwrap().unwrap();
    assert_eq!(stored.proposals.len(), 1);
    assert_eq!(stored.proposals[0].message, "I can do this");
    assert_eq!(stored.proposals[0].status, ProposalStatus::Pending);
}

#[test]
fn submit_proposal_on_a_missing_project_is_not_found() {
    let mut app = test_app();
    register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);

    let result = app
        .marketplace
        .submit_proposal(&app.session, Uuid::new_v4(), "I can do this");
    assert!(matches!(result, Err(AppError::NotFound(_))));
}

#[test]
fn hiring_accepts_the_proposal_and_moves_the_project_in_progress() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    let proposal = app
        .marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    login(&mut app, "ana@x.com");
    let hired = app
        .marketplace
        .hire_freelancer(&app.session, project.id, bob.id(), proposal.id)
        .unwrap();

    assert_eq!(hired.status, ProjectStatus::InProgress);
    assert_eq!(hired.hired_freelancer_id, Some(bob.id()));
    assert_eq!(hired.proposals[0].status, ProposalStatus::Accepted);
}

#[test]
fn only_the_owning_client_may_hire() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    let proposal = app
        .marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    register(&mut app, "carla", "carla@x.com", UserRole::Client);
    let result = app
        .marketplace
        .hire_freelancer(&app.session, project.id, bob.id(), proposal.id);
    assert!(matches!(result, Err(AppError::Permission(_))));
}

#[test]
fn at_most_one_proposal_is_accepted_across_rehires() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    let bob_proposal = app
        .marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    let carla = register(&mut app, "carla", "carla@x.com", UserRole::Freelancer);
    let carla_proposal = app
        .marketplace
        .submit_proposal(&app.session, project.id, "So can I")
        .unwrap();

    login(&mut app, "ana@x.com");
    app.marketplace
        .hire_freelancer(&app.session, project.id, bob.id(), bob_proposal.id)
        .unwrap();
    let rehired = app
        .marketplace
        .hire_freelancer(&app.session, project.id, carla.id(), carla_proposal.id)
        .unwrap();

    let accepted: Vec<_> = rehired
        .proposals
        .iter()
        .filter(|p| p.status == ProposalStatus::Accepted)
        .collect();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].freelancer_id, carla.id());
    assert_eq!(rehired.hired_freelancer_id, Some(carla.id()));
}

#[test]
fn unhiring_restores_the_open_project_round_trip() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    let proposal = app
        .marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    login(&mut app, "ana@x.com");
    app.marketplace
        .hire_freelancer(&app.session, project.id, bob.id(), proposal.id)
        .unwrap();
    let restored = app
        .marketplace
        .remove_hired_freelancer(&app.session, project.id)
        .unwrap();

    assert_eq!(restored.status, ProjectStatus::Open);
    assert!(restored.hired_freelancer_id.is_none());
    assert!(restored
        .proposals
        .iter()
        .all(|p| p.status == ProposalStatus::Pending));
}

#[test]
fn unhiring_without_a_hire_is_a_validation_error() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let result = app
        .marketplace
        .remove_hired_freelancer(&app.session, project.id);
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[test]
fn completing_an_unhired_project_is_permitted_and_terminal() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let completed = app
        .marketplace
        .complete_project(&app.session, project.id)
        .unwrap();
    assert_eq!(completed.status, ProjectStatus::Completed);

    // Terminal: completing again fails, and no proposals are taken anymore.
    assert!(matches!(
        app.marketplace.complete_project(&app.session, project.id),
        Err(AppError::Validation(_))
    ));

    register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    assert!(matches!(
        app.marketplace
            .submit_proposal(&app.session, project.id, "Too late?"),
        Err(AppError::Validation(_))
    ));
}

#[test]
fn admin_may_complete_and_delete_foreign_projects() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let first = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();
    let second = app
        .marketplace
        .create_project(&app.session, project_dto("Brand kit"))
        .unwrap();

    login_admin(&mut app);
    app.marketplace
        .complete_project(&app.session, first.id)
        .unwrap();
    app.marketplace
        .delete_project(&app.session, second.id)
        .unwrap();

    assert!(app.marketplace.project_by_id(second.id).unwrap().is_none());
}

#[test]
fn non_owner_cannot_delete_a_project() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    register(&mut app, "carla", "carla@x.com", UserRole::Client);
    let result = app.marketplace.delete_project(&app.session, project.id);
    assert!(matches!(result, Err(AppError::Permission(_))));
    assert!(app.marketplace.project_by_id(project.id).unwrap().is_some());
}

#[test]
fn average_rating_is_the_exact_mean_after_each_insertion() {
    let mut app = test_app();
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    register(&mut app, "ana", "ana@x.com", UserRole::Client);

    for (value, expected) in [(5, 5.0), (4, 4.5), (3, 4.0)] {
        app.marketplace
            .add_rating(&app.session, bob.id(), Uuid::new_v4(), value, "good work")
            .unwrap();
        let freelancer = app
            .marketplace
            .freelancer_by_id(bob.id())
            .unwrap()
            .unwrap();
        assert_eq!(freelancer.average_rating, expected);
    }
}

#[test]
fn rating_the_same_project_twice_conflicts() {
    let mut app = test_app();
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    register(&mut app, "ana", "ana@x.com", UserRole::Client);

    let project_id = Uuid::new_v4();
    app.marketplace
        .add_rating(&app.session, bob.id(), project_id, 5, "great")
        .unwrap();
    let second = app
        .marketplace
        .add_rating(&app.session, bob.id(), project_id, 1, "changed my mind");
    assert!(matches!(second, Err(AppError::Conflict(_))));

    let freelancer = app
        .marketplace
        .freelancer_by_id(bob.id())
        .unwrap()
        .unwrap();
    assert_eq!(freelancer.ratings.len(), 1);
    assert_eq!(freelancer.average_rating, 5.0);
}

#[test]
fn rating_outside_the_scale_is_rejected() {
    let mut app = test_app();
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    register(&mut app, "ana", "ana@x.com", UserRole::Client);

    for value in [0, 6] {
        let result =
            app.marketplace
                .add_rating(&app.session, bob.id(), Uuid::new_v4(), value, "out of scale");
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}

#[test]
fn deleting_a_client_cascades_to_their_projects_only() {
    let mut app = test_app();
    let ana = register(&mut app, "ana", "ana@x.com", UserRole::Client);
    app.marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();
    app.marketplace
        .create_project(&app.session, project_dto("Brand kit"))
        .unwrap();

    let carla = register(&mut app, "carla", "carla@x.com", UserRole::Client);
    app.marketplace
        .create_project(&app.session, project_dto("Landing page"))
        .unwrap();

    login_admin(&mut app);
    app.marketplace.delete_user(&app.session, ana.id()).unwrap();

    let remaining = app.marketplace.projects().unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].client_id, carla.id());
    assert!(app.marketplace.users().unwrap().iter().all(|u| u.id() != ana.id()));
}

#[test]
fn deleting_a_freelancer_removes_no_projects() {
    let mut app = test_app();
    register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let project = app
        .marketplace
        .create_project(&app.session, project_dto("Logo design"))
        .unwrap();

    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);
    app.marketplace
        .submit_proposal(&app.session, project.id, "I can do this")
        .unwrap();

    login_admin(&mut app);
    app.marketplace.delete_user(&app.session, bob.id()).unwrap();

    assert_eq!(app.marketplace.projects().unwrap().len(), 1);
}

#[test]
fn delete_user_requires_admin_but_remove_user_allows_self() {
    let mut app = test_app();
    let ana = register(&mut app, "ana", "ana@x.com", UserRole::Client);
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);

    // Bob (freelancer) may not use the admin operation, nor remove Ana.
    assert!(matches!(
        app.marketplace.delete_user(&app.session, ana.id()),
        Err(AppError::Permission(_))
    ));
    assert!(matches!(
        app.marketplace.remove_user(&app.session, ana.id()),
        Err(AppError::Permission(_))
    ));

    // But he may remove himself.
    app.marketplace.remove_user(&app.session, bob.id()).unwrap();
    assert!(app.marketplace.users().unwrap().iter().all(|u| u.id() != bob.id()));
}

#[test]
fn freelancer_updates_their_own_profile_wholesale() {
    let mut app = test_app();
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);

    let mut profile = bob.as_freelancer().unwrap().clone();
    profile.description = "Brand designer with ten years of practice".to_string();
    profile.skills = vec!["logo".to_string(), "branding".to_string()];
    profile.whatsapp_number = Some("+1234567890".to_string());

    app.marketplace
        .update_freelancer_profile(&app.session, profile)
        .unwrap();

    let stored = app
        .marketplace
        .freelancer_by_id(bob.id())
        .unwrap()
        .unwrap();
    assert_eq!(stored.skills.len(), 2);
    assert_eq!(stored.whatsapp_number.as_deref(), Some("+1234567890"));
}

#[test]
fn profile_updates_reject_bad_whatsapp_numbers_and_foreign_callers() {
    let mut app = test_app();
    let bob = register(&mut app, "bob", "bob@x.com", UserRole::Freelancer);

    let mut bad_number = bob.as_freelancer().unwrap().clone();
    bad_number.whatsapp_number = Some("call me maybe".to_string());
    assert!(matches!(
        app.marketplace
            .update_freelancer_profile(&app.session, bad_number),
        Err(AppError::Validation(_))
    ));

    // Carla cannot replace Bob's record.
    register(&mut app, "carla", "carla@x.com", UserRole::Freelancer);
    let foreign = bob.as_freelancer().unwrap().clone();
    assert!(matches!(
        app.marketplace
            .update_freelancer_profile(&app.session, foreign),
        Err(AppError::Permission(_))
    ));
}

#[test]
fn marketplace_state_survives_app_reconstruction() {
    let backend = Arc::new(MemoryBackend::new());

    let project_id = {
        let mut app = App::new(test_config(), backend.clone()).unwrap();
        register(&mut app, "ana", "ana@x.com", UserRole::Client);
        app.marketplace
            .create_project(&app.session, project_dto("Logo design"))
            .unwrap()
            .id
    };

    let app = App::new(test_config(), backend).unwrap();
    let stored = app.marketplace.project_by_id(project_id).unwrap().unwrap();
    assert_eq!(stored.title, "Logo design");
    assert_eq!(stored.status, ProjectStatus::Open);
}
