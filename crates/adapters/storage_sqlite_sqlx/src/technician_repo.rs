//! `SQLite` implementation of [`TechnicianRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crewdesk_app::ports::TechnicianRepository;
use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::{CompanyId, TechnicianId, UserId};
use crewdesk_domain::profile::TechnicianProfile;

use crate::error::{StorageError, map_write_err};

struct Wrapper(TechnicianProfile);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<TechnicianProfile> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let specialization: String = row.try_get("specialization")?;
        let company_id: Option<String> = row.try_get("company_id")?;

        let id = TechnicianId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let company_id = company_id
            .map(|value| CompanyId::from_str(&value))
            .transpose()
            .map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(TechnicianProfile {
            id,
            user_id,
            specialization,
            company_id,
        }))
    }
}

/// Insert ignores an existing row for the same user; callers follow up with
/// a select so concurrent creations converge on one profile.
const INSERT: &str = r"
    INSERT INTO technician_profiles (id, user_id, specialization, company_id)
    VALUES (?, ?, ?, ?)
    ON CONFLICT (user_id) DO NOTHING
";

const SELECT_BY_ID: &str = "SELECT * FROM technician_profiles WHERE id = ?";
const SELECT_BY_USER: &str = "SELECT * FROM technician_profiles WHERE user_id = ?";
const SELECT_BY_COMPANY: &str = "SELECT * FROM technician_profiles WHERE company_id = ?";
const SELECT_ALL: &str = "SELECT * FROM technician_profiles";

const UPDATE: &str = r"
    UPDATE technician_profiles
    SET specialization = ?, company_id = ?
    WHERE id = ?
";

const DELETE_BY_ID: &str = "DELETE FROM technician_profiles WHERE id = ?";

pub(crate) fn bind_insert(
    profile: &TechnicianProfile,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(INSERT)
        .bind(profile.id.to_string())
        .bind(profile.user_id.to_string())
        .bind(&profile.specialization)
        .bind(profile.company_id.map(|id| id.to_string()))
}

/// `SQLite`-backed technician repository.
pub struct SqliteTechnicianRepository {
    pool: SqlitePool,
}

impl SqliteTechnicianRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl TechnicianRepository for SqliteTechnicianRepository {
    async fn insert_or_fetch(
        &self,
        profile: TechnicianProfile,
    ) -> Result<TechnicianProfile, CrewdeskError> {
        bind_insert(&profile)
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        // The select is authoritative: under a race the conflict clause
        // dropped our insert and another request's row won.
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(profile.user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Wrapper::maybe(row).ok_or_else(|| {
            StorageError::Database(sqlx::Error::RowNotFound).into()
        })
    }

    async fn get_by_id(
        &self,
        id: TechnicianId,
    ) -> Result<Option<TechnicianProfile>, CrewdeskError> {
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
    ) -> Result<Option<TechnicianProfile>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn list_by_company(
        &self,
        company_id: CompanyId,
    ) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_BY_COMPANY)
            .bind(company_id.to_string())
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn get_all(&self) -> Result<Vec<TechnicianProfile>, CrewdeskError> {
        let rows: Vec<Wrapper> = sqlx::query_as(SELECT_ALL)
            .fetch_all(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(rows.into_iter().map(|w| w.0).collect())
    }

    async fn update(&self, profile: TechnicianProfile) -> Result<TechnicianProfile, CrewdeskError> {
        sqlx::query(UPDATE)
            .bind(&profile.specialization)
            .bind(profile.company_id.map(|id| id.to_string()))
            .bind(profile.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        Ok(profile)
    }

    async fn delete(&self, id: TechnicianId) -> Result<(), CrewdeskError> {
        sqlx::query(DELETE_BY_ID)
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }
}
