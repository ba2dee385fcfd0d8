//! `SQLite` implementation of [`DeveloperRepository`].

use std::str::FromStr;

use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use crewdesk_app::ports::DeveloperRepository;
use crewdesk_domain::error::CrewdeskError;
use crewdesk_domain::id::{DeveloperId, UserId};
use crewdesk_domain::profile::DeveloperProfile;

use crate::error::{StorageError, map_write_err};

struct Wrapper(DeveloperProfile);

impl Wrapper {
    fn maybe(value: Option<Self>) -> Option<DeveloperProfile> {
        value.map(|w| w.0)
    }
}

impl<'r> FromRow<'r, SqliteRow> for Wrapper {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let id: String = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let developer_name: Option<String> = row.try_get("developer_name")?;
        let address: Option<String> = row.try_get("address")?;
        let company_name: Option<String> = row.try_get("company_name")?;

        let id = DeveloperId::from_str(&id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;
        let user_id =
            UserId::from_str(&user_id).map_err(|err| sqlx::Error::Decode(Box::new(err)))?;

        Ok(Self(DeveloperProfile {
            id,
            user_id,
            developer_name,
            address,
            company_name,
        }))
    }
}

const INSERT: &str = r"
    INSERT INTO developer_profiles (id, user_id, developer_name, address, company_name)
    VALUES (?, ?, ?, ?, ?)
    ON CONFLICT (user_id) DO NOTHING
";

const SELECT_BY_USER: &str = "SELECT * FROM developer_profiles WHERE user_id = ?";

const UPDATE: &str = r"
    UPDATE developer_profiles
    SET developer_name = ?, address = ?, company_name = ?
    WHERE id = ?
";

pub(crate) fn bind_insert(
    profile: &DeveloperProfile,
) -> sqlx::query::Query<'_, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'_>> {
    sqlx::query(INSERT)
        .bind(profile.id.to_string())
        .bind(profile.user_id.to_string())
        .bind(profile.developer_name.as_deref())
        .bind(profile.address.as_deref())
        .bind(profile.company_name.as_deref())
}

/// `SQLite`-backed developer repository.
pub struct SqliteDeveloperRepository {
    pool: SqlitePool,
}

impl SqliteDeveloperRepository {
    /// Create a new repository using the given connection pool.
    #[must_use]
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

impl DeveloperRepository for SqliteDeveloperRepository {
    async fn insert_or_fetch(
        &self,
        profile: DeveloperProfile,
    ) -> Result<DeveloperProfile, CrewdeskError> {
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

    async fn get_by_user(
        &self,
        user_id: UserId,
    ) -> Result<Option<DeveloperProfile>, CrewdeskError> {
        let row: Option<Wrapper> = sqlx::query_as(SELECT_BY_USER)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(StorageError::from)?;

        Ok(Wrapper::maybe(row))
    }

    async fn update(&self, profile: DeveloperProfile) -> Result<DeveloperProfile, CrewdeskError> {
        sqlx::query(UPDATE)
            .bind(profile.developer_name.as_deref())
            .bind(profile.address.as_deref())
            .bind(profile.company_name.as_deref())
            .bind(profile.id.to_string())
            .execute(&self.pool)
            .await
            .map_err(map_write_err)?;

        Ok(profile)
    }
}
