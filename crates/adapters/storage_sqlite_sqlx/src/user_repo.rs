//! `SQLite` implementation of [`UserRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crewdesk_app::ports::UserRepository;
use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::UserId;
use crewdesk_domain::profile::Profile;
use crewdesk_domain::role::Role;
use crewdesk_domain::user::User;

use crate::error::{StorageError, map_write_err};
use crate::{company_repo, developer_repo, technician_repo};

/// Wrapper for converting database rows into domain types without polluting
/// domain structs with database concerns.
struct Wrapper(User);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<User> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let email: String = row.try_get("email")?;
        let phone_number: String = row.try_get("phone_number")?;
        let first_name: String = row.try_get("first_name")?;
        let last_name: String = row.try_get("last_name")?;
        let role_str: String = row.try_get("role")?;
        let password_hash: String = row.try_get("password_hash")?;
        let is_staff: bool = row.try_get("is_staff")?;
        let is_superuser: bool = row.try_get("is_superuser")?;
        let is_active: bool = row.try_get("is_active")?;
        let created_at_str: String = row.try_get("created_at")?;

        let id = UserId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let role = Role::from_str(&role_str).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?
            .to_utc();

        Ok(Self(User {
            id,
            email,
            phone_number,
            first_name,
            last_name,
            role,
            password_hash,
            is_staff,
            is_superuser,
            is_active,
            created_at,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO users (id, email, phone_number, first_name, last_name, role, password_hash,
                       is_staff, is_superuser, is_active, created_at)
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
";

const SELECT_BY_ID: &str = "SELECT * FROM users WHERE id = ?";
const SELECT_BY_EMAIL: &str = "SELECT * FROM users WHERE email = ?";
const SELECT_BY_PHONE: &str = "SELECT * FROM users WHERE phone_number = ?";
const SELECT_ALL: &str = "SELECT * FROM users ORDER BY created_at";

const UPDATE: &str = r"
    UPDATE users
    SET phone_number = ?, first_name = ?, last_name = ?, password_hash = ?,
        is_staff = ?, is_superuser = ?, is_active = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM users WHERE id = ?";

/// `SQLite`-backed user repository.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn bind_insert(
        user: &User,
    ) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
        sqlx::query(INSERT)
            .bind(user.id.to_string())
            .bind(&user.email)
            .bind(&user.phone_number)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(user.role.to_string())
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(user.is_active)
            .bind(user.created_at.to_rfc3339())
    }
}

impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: User) -> Result<User, CrewdeskError> {
        Self::bind_insert(&user)
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;
        Ok(user)
    }

    async fn insert_with_profile(
        &self,
        user: User,
        profile: Option<Profile>,
    ) -> Result<User, CrewdeskError> {
        let mut tx = self.pool.begin().await.map_err(StorageError::from)?;

        Self::bind_insert(&user)
            .execute(&mut *tx)
            .await
            .map_err(map_write_err)?;

        match profile {
            Some(Profile::Technician(p)) => {
                technician_repo::bind_insert(&p)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_err)?;
            }
            Some(Profile::Maintenance(p)) => {
                company_repo::bind_insert(&p)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_err)?;
            }
            Some(Profile::Developer(p)) => {
                developer_repo::bind_insert(&p)
                    .execute(&mut *tx)
                    .await
                    .map_err(map_write_err)?;
            }
            None => {}
        }

        tx.commit().await.map_err(StorageError::from)?;
        Ok(user)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_EMAIL)
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_phone(&self, phone: &str) -> Result<Option<User>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_PHONE)
            .bind(phone)
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<User>, CrewdeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, user: User) -> Result<User, CrewdeskError> {
        sqlx::query(UPDATE)
            .bind(&user.phone_number)
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.password_hash)
            .bind(user.is_staff)
            .bind(user.is_superuser)
            .bind(user.is_active)
            .bind(user.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        Ok(user)
    }

    async fn delete(&self, id: UserId) -> Result<(), CrewdeskError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Config;
    use crate::technician_repo::SqliteTechnicianRepository;
    use crewdesk_app::ports::TechnicianRepository;
    use crewdesk_domain::profile::TechnicianProfile;

    async fn setup() -> SqlitePool {
        let db = Config {
            database_url: "sqlite::memory:".to_string(),
        }
        .build()
        .await
        .unwrap();
        db.pool().clone()
    }

    fn test_user(email: &str, phone: &str) -> User {
        User::builder()
            .email(email)
            .phone_number(phone)
            .first_name("Store")
            .last_name("Case")
            .role(Role::Technician)
            .password_hash("$argon2id$stub")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn should_insert_and_retrieve_user() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool);
        let user = test_user("store@example.com", "+254700000500");
        let id = user.id;

        repo.insert(user).await.unwrap();

        let fetched = repo.get_by_id(id).await.unwrap().unwrap();
        assert_eq!(fetched.email, "store@example.com");
        assert_eq!(fetched.role, Role::Technician);
        assert!(fetched.is_active);

        let by_email = repo.get_by_email("store@example.com").await.unwrap();
        assert!(by_email.is_some());

        let by_phone = repo.get_by_phone("+254700000500").await.unwrap();
        assert!(by_phone.is_some());
    }

    #[tokio::test]
    async fn should_surface_conflict_on_duplicate_email() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool);
        repo.insert(test_user("dup@example.com", "+254700000501"))
            .await
            .unwrap();

        let result = repo
            .insert(test_user("dup@example.com", "+254700000502"))
            .await;
        let Err(CrewdeskError::Conflict(conflict)) = result else {
            panic!("expected conflict");
        };
        assert_eq!(conflict.field, "email");
    }

    #[tokio::test]
    async fn should_surface_conflict_on_duplicate_phone() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool);
        repo.insert(test_user("p1@example.com", "+254700000503"))
            .await
            .unwrap();

        let result = repo
            .insert(test_user("p2@example.com", "+254700000503"))
            .await;
        let Err(CrewdeskError::Conflict(conflict)) = result else {
            panic!("expected conflict");
        };
        assert_eq!(conflict.field, "phone_number");
    }

    #[tokio::test]
    async fn should_insert_user_and_profile_atomically() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let technicians = SqliteTechnicianRepository::new(pool);

        let user = test_user("atomic@example.com", "+254700000504");
        let profile = TechnicianProfile::new(user.id).with_specialization("HVAC");
        repo.insert_with_profile(user.clone(), Some(Profile::Technician(profile.clone())))
            .await
            .unwrap();

        let stored = technicians.get_by_user(user.id).await.unwrap().unwrap();
        assert_eq!(stored.id, profile.id);
        assert_eq!(stored.specialization, "HVAC");
    }

    #[tokio::test]
    async fn should_leave_no_partial_state_when_user_insert_conflicts() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let technicians = SqliteTechnicianRepository::new(pool);

        repo.insert(test_user("partial@example.com", "+254700000505"))
            .await
            .unwrap();

        let duplicate = test_user("partial@example.com", "+254700000506");
        let profile = TechnicianProfile::new(duplicate.id);
        let result = repo
            .insert_with_profile(duplicate, Some(Profile::Technician(profile.clone())))
            .await;
        assert!(matches!(result, Err(CrewdeskError::Conflict(_))));

        let orphan = technicians.get_by_id(profile.id).await.unwrap();
        assert!(orphan.is_none(), "profile row must not survive rollback");
    }

    #[tokio::test]
    async fn should_cascade_profile_deletion_with_user() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool.clone());
        let technicians = SqliteTechnicianRepository::new(pool);

        let user = test_user("cascade@example.com", "+254700000507");
        let profile = TechnicianProfile::new(user.id);
        repo.insert_with_profile(user.clone(), Some(Profile::Technician(profile.clone())))
            .await
            .unwrap();

        repo.delete(user.id).await.unwrap();

        assert!(repo.get_by_id(user.id).await.unwrap().is_none());
        assert!(technicians.get_by_id(profile.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn should_update_mutable_fields() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool);
        let mut user = test_user("mut@example.com", "+254700000508");
        repo.insert(user.clone()).await.unwrap();

        user.first_name = "Renamed".to_string();
        user.is_active = false;
        repo.update(user.clone()).await.unwrap();

        let fetched = repo.get_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(fetched.first_name, "Renamed");
        assert!(!fetched.is_active);
        // Email column is never part of the update statement.
        assert_eq!(fetched.email, "mut@example.com");
    }

    #[tokio::test]
    async fn should_list_all_users() {
        let pool = setup().await;
        let repo = SqliteUserRepository::new(pool);
        repo.insert(test_user("l1@example.com", "+254700000509"))
            .await
            .unwrap();
        repo.insert(test_user("l2@example.com", "+254700000510"))
            .await
            .unwrap();

        let all = repo.get_all().await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
