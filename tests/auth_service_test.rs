//! Auth service tests against mocked stores.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use mockall::{mock, predicate::eq};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;

use medibook::config::Config;
use medibook::domain::{
    DoctorProfile, NewDoctorProfile, NewUser, Password, PatientDetails, RegisterRequest, User,
    UserRole,
};
use medibook::errors::{AppError, AppResult};
use medibook::infra::{AppointmentRepository, DoctorRepository, UnitOfWork, UserRepository};
use medibook::services::{AuthService, Authenticator};

mock! {
    pub Users {}

    #[async_trait]
    impl UserRepository for Users {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;
        async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;
        async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<User>>;
        async fn create(&self, user: NewUser) -> AppResult<User>;
        async fn list(&self) -> AppResult<Vec<User>>;
        async fn delete(&self, id: Uuid) -> AppResult<()>;
        async fn count_by_role(&self, role: UserRole) -> AppResult<u64>;
    }
}

mock! {
    pub Doctors {}

    #[async_trait]
    impl DoctorRepository for Doctors {
        async fn find_by_id(&self, id: Uuid) -> AppResult<Option<DoctorProfile>>;
        async fn find_by_user_id(&self, user_id: Uuid) -> AppResult<Option<DoctorProfile>>;
        async fn find_by_ids(&self, ids: Vec<Uuid>) -> AppResult<Vec<DoctorProfile>>;
        async fn list(&self) -> AppResult<Vec<DoctorProfile>>;
        async fn create_with_user(
            &self,
            user: NewUser,
            profile: NewDoctorProfile,
        ) -> AppResult<(User, DoctorProfile)>;
    }
}

/// Unit of Work over mocked identity and doctor stores.
struct TestUnitOfWork {
    users: Arc<MockUsers>,
    doctors: Arc<MockDoctors>,
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.users.clone()
    }

    fn doctors(&self) -> Arc<dyn DoctorRepository> {
        self.doctors.clone()
    }

    fn appointments(&self) -> Arc<dyn AppointmentRepository> {
        unreachable!("auth never touches appointments")
    }
}

fn authenticator(users: MockUsers, doctors: MockDoctors) -> Authenticator<TestUnitOfWork> {
    Authenticator::new(
        Arc::new(TestUnitOfWork {
            users: Arc::new(users),
            doctors: Arc::new(doctors),
        }),
        Config::new(
            "postgres://localhost/medibook_test",
            "test-secret-key-for-testing-only-32chars",
        ),
    )
}

fn stored_user(new_user: NewUser) -> User {
    User {
        id: Uuid::new_v4(),
        name: new_user.name,
        email: new_user.email,
        password_hash: new_user.password_hash,
        role: new_user.role,
        details: new_user.details,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn doctor_request() -> RegisterRequest {
    RegisterRequest {
        name: "Dr. Rao".to_string(),
        email: "Rao@Clinic.example".to_string(),
        password: "password123".to_string(),
        role: Some("doctor".to_string()),
        phone: Some("555-0100".to_string()),
        specialization: Some("Neurology".to_string()),
        experience: Some(8),
        fees_per_consultation: Some(120.0),
        department: Some("Neuro".to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_doctor_registration_goes_through_one_atomic_insert() {
    let mut users = MockUsers::new();
    users
        .expect_find_by_email()
        .with(eq("rao@clinic.example"))
        .returning(|_| Ok(None));
    users.expect_create().never();

    let mut doctors = MockDoctors::new();
    doctors
        .expect_create_with_user()
        .withf(|user, profile| {
            user.role == UserRole::Doctor
                && user.details.phone.as_deref() == Some("555-0100")
                && user.password_hash.starts_with("$argon2")
                && profile.specialization == "Neurology"
        })
        .times(1)
        .returning(|user, profile| {
            let user = stored_user(user);
            let profile = DoctorProfile {
                id: Uuid::new_v4(),
                user_id: user.id,
                specialization: profile.specialization,
                experience: profile.experience,
                fees_per_consultation: profile.fees_per_consultation,
                department: profile.department,
                bio: profile.bio,
                created_at: Utc::now(),
            };
            Ok((user, profile))
        });

    let service = authenticator(users, doctors);
    let registration = doctor_request().into_registration().unwrap();
    let response = service.register(registration).await.unwrap();

    assert_eq!(response.role, UserRole::Doctor);
    assert_eq!(response.email, "rao@clinic.example");

    let claims = assert_ok!(service.verify_token(&response.token));
    assert_eq!(claims.sub, response.id);
}

#[tokio::test]
async fn test_registration_with_taken_email_writes_nothing() {
    let mut users = MockUsers::new();
    users.expect_find_by_email().returning(|email| {
        Ok(Some(stored_user(NewUser {
            name: "Existing".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$existing".to_string(),
            role: UserRole::Patient,
            details: PatientDetails::default(),
        })))
    });
    users.expect_create().never();
    let mut doctors = MockDoctors::new();
    doctors.expect_create_with_user().never();

    let service = authenticator(users, doctors);
    let registration = doctor_request().into_registration().unwrap();
    let result = service.register(registration).await;

    assert!(matches!(result, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn test_login_checks_password() {
    let hash = Password::new("correct horse").unwrap().into_string();
    let user = stored_user(NewUser {
        name: "Lee".to_string(),
        email: "lee@example.com".to_string(),
        password_hash: hash,
        role: UserRole::Patient,
        details: PatientDetails::default(),
    });
    let user_id = user.id;

    let mut users = MockUsers::new();
    users
        .expect_find_by_email()
        .with(eq("lee@example.com"))
        .returning(move |_| Ok(Some(user.clone())));
    users
        .expect_find_by_email()
        .with(eq("nobody@example.com"))
        .returning(|_| Ok(None));

    let service = authenticator(users, MockDoctors::new());

    let wrong = service
        .login("lee@example.com".to_string(), "battery staple".to_string())
        .await;
    assert!(matches!(wrong, Err(AppError::InvalidCredentials)));

    let unknown = service
        .login("nobody@example.com".to_string(), "correct horse".to_string())
        .await;
    assert!(matches!(unknown, Err(AppError::InvalidCredentials)));

    // Email matching ignores case and surrounding whitespace
    let response = assert_ok!(
        service
            .login(" LEE@example.com ".to_string(), "correct horse".to_string())
            .await
    );
    assert_eq!(response.id, user_id);
    assert_ok!(service.verify_token(&response.token));
}

#[tokio::test]
async fn test_authenticate_rejects_deleted_user() {
    let mut users = MockUsers::new();
    users.expect_find_by_id().returning(|_| Ok(None));
    users.expect_create().returning(|user| Ok(stored_user(user)));
    users.expect_find_by_email().returning(|_| Ok(None));

    let service = authenticator(users, MockDoctors::new());
    let registration = RegisterRequest {
        name: "Temp".to_string(),
        email: "temp@example.com".to_string(),
        password: "password123".to_string(),
        ..Default::default()
    }
    .into_registration()
    .unwrap();
    let response = service.register(registration).await.unwrap();

    let result = service.authenticate(&response.token).await;
    assert!(matches!(result, Err(AppError::Unauthorized)));
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let service = authenticator(MockUsers::new(), MockDoctors::new());

    assert_err!(service.verify_token("eyJhbGciOiJIUzI1NiJ9.e30.invalid"));
    assert_err!(service.verify_token(""));
}
