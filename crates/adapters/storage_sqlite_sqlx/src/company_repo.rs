//! `SQLite` implementation of [`CompanyRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crewdesk_app::ports::CompanyRepository;
use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::{CompanyId, UserId};
use crewdesk_domain::profile::MaintenanceCompanyProfile;

use crate::error::{StorageError, map_write_err};

struct Wrapper(MaintenanceCompanyProfile);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<MaintenanceCompanyProfile> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let company_name: String = row.try_get("company_name")?;
        let registration_number: String = row.try_get("registration_number")?;
        let admin_user_id: Option<String> = row.try_get("admin_user_id")?;

        let id = CompanyId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let admin_user_id = admin_user_id
            .map(|value| UserId::from_str(&value))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(MaintenanceCompanyProfile {
            id,
            user_id,
            company_name,
            registration_number,
            admin_user_id,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO maintenance_company_profiles (id, user_id, company_name, registration_number, admin_user_id)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT (user_id) DO NOTHING
";

const SELECT_BY_ID: &str = "SELECT * FROM maintenance_company_profiles WHERE id = ?";
const SELECT_BY_USER: &str = "SELECT * FROM maintenance_company_profiles WHERE user_id = ?";
const SELECT_BY_ADMIN: &str = "SELECT * FROM maintenance_company_profiles WHERE admin_user_id = ?";
const SELECT_ALL: &str = "SELECT * FROM maintenance_company_profiles";

const UPDATE: &str = r"
    UPDATE maintenance_company_profiles
    SET company_name = ?, registration_number = ?, admin_user_id = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM maintenance_company_profiles WHERE id = ?";

pub(crate) fn bind_insert(
    profile: &MaintenanceCompanyProfile,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(INSERT)
        .bind(profile.id.to_string())
        .bind(profile.user_id.to_string())
        .bind(&profile.company_name)
        .bind(&profile.registration_number)
        .bind(profile.admin_user_id.map(|id| id.to_string()))
}

/// `SQLite`-backed maintenance company repository.
pub struct SqliteCompanyRepository {
    pool: SqlitePool,
}

impl SqliteCompanyRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl CompanyRepository for SqliteCompanyRepository {
    async fn insert_or_fetch(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        bind_insert(&profile)
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(profile.user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Wrapper::maybe(row)
            .ok_or_else(|| StorageError::Database(sqlx::Error::RowNotFound).into())
    }

    async fn get_by_id(
        &self,
        id: CompanyId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ID)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_by_admin(
        &self,
        admin_user_id: UserId,
    ) -> Result<Option<MaintenanceCompanyProfile>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_ADMIN)
            .bind(admin_user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn get_all(&self) -> Result<Vec<MaintenanceCompanyProfile>, CrewdeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(
        &self,
        profile: MaintenanceCompanyProfile,
    ) -> Result<MaintenanceCompanyProfile, CrewdeskError> {
        sqlx::query(UPDATE)
            .bind(&profile.company_name)
            .bind(&profile.registration_number)
            .bind(profile.admin_user_id.map(|id| id.to_string()))
            .bind(profile.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        Ok(profile)
    }

    async fn delete(&self, id: CompanyId) -> Result<(), CrewdeskError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
