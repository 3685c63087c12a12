//! User directory store
//!
//! User identity, onboarding steps, role payloads, credential checks, and the
//! denormalized connection cache.

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::{QueryBuilder, Row, Sqlite};
use tracing::info;

use bizlink_auth::password::{hash_password, verify_password};

use crate::error::{Result, StoreError};
use crate::models::{
    BusinessRole, NewUser, RoleProfile, Step1Details, UpdateProfile, User,
};

const USER_COLUMNS: &str = "id, email, password_hash, first_name, last_name, phone, \
    company_name, website, linkedin_profile, city, state, country, pin_code, company_type, \
    year_of_registration, industry, brief_introduction, business_description, gst_or_cin, \
    profile_picture, role, role_profile, step1_completed, step2_completed, step3_completed, \
    step4_completed, is_verified, is_active, profile_completed, last_login, created_at, \
    updated_at";

/// Store for user records
pub struct UserStore<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserStore<'a> {
    /// Create a new user store
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user with role `pending`
    ///
    /// Returns Conflict if the email is already registered.
    pub async fn create_user(&self, input: &NewUser) -> Result<User> {
        let id = uuid::Uuid::new_v4().to_string();
        let password_hash = hash_password(&input.password)?;
        let now = Utc::now();
        let email = input.email.trim().to_lowercase();

        sqlx::query(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, phone,
                               role, role_profile, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 'pending', '{"role":"pending"}', ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&email)
        .bind(&password_hash)
        .bind(input.first_name.trim())
        .bind(input.last_name.trim())
        .bind(&input.phone)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .execute(self.pool)
        .await
        .map_err(|e| {
            if e.to_string().contains("UNIQUE constraint") {
                StoreError::conflict(format!("user with email '{}' already exists", email))
            } else {
                StoreError::from(e)
            }
        })?;

        info!(user_id = %id, "Created user");

        self.get_by_id(&id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Get a user by ID
    pub async fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS))
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS))
            .bind(email.trim().to_lowercase())
            .fetch_optional(self.pool)
            .await?;

        row.as_ref().map(row_to_user).transpose()
    }

    /// Verify email and password, returning the user if valid
    ///
    /// Updates `last_login` on success.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<Option<User>> {
        let user = match self.get_by_email(email).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        if verify_password(password, &user.password_hash)? {
            self.update_last_login(&user.id).await?;
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    /// Update a user's last login time
    pub async fn update_last_login(&self, user_id: &str) -> Result<()> {
        sqlx::query("UPDATE users SET last_login = ? WHERE id = ?")
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// Update a user's password
    pub async fn update_password(&self, user_id: &str, new_password: &str) -> Result<bool> {
        let password_hash = hash_password(new_password)?;

        let result = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
            .bind(&password_hash)
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Onboarding step 1: company details
    pub async fn save_step1(&self, user_id: &str, details: &Step1Details) -> Result<User> {
        let result = sqlx::query(
            r#"
            UPDATE users SET
                company_name = ?, pin_code = ?, gst_or_cin = ?, website = ?,
                linkedin_profile = ?, city = ?, state = ?, country = ?, company_type = ?,
                year_of_registration = ?, industry = ?, brief_introduction = ?,
                step1_completed = 1, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&details.company_name)
        .bind(&details.pin_code)
        .bind(&details.gst_or_cin)
        .bind(details.website.as_deref().unwrap_or(""))
        .bind(details.linkedin_profile.as_deref().unwrap_or(""))
        .bind(details.city.as_deref().unwrap_or(""))
        .bind(details.state.as_deref().unwrap_or(""))
        .bind(details.country.as_deref().unwrap_or(""))
        .bind(details.company_type.as_deref().unwrap_or(""))
        .bind(details.year_of_registration)
        .bind(details.industry.as_deref().unwrap_or(""))
        .bind(details.brief_introduction.as_deref().unwrap_or(""))
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user"));
        }

        self.refresh_profile_completed(user_id).await?;
        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Onboarding step 2: business description
    pub async fn save_step2(&self, user_id: &str, business_description: &str) -> Result<User> {
        let result = sqlx::query(
            "UPDATE users SET business_description = ?, step2_completed = 1, updated_at = ? WHERE id = ?",
        )
        .bind(business_description)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user"));
        }

        self.refresh_profile_completed(user_id).await?;
        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Onboarding step 3: role selection
    ///
    /// The role is fixed once: re-selecting the same role is a no-op success,
    /// switching to a different role is a Conflict.
    pub async fn set_role(&self, user_id: &str, role: BusinessRole) -> Result<User> {
        if role == BusinessRole::Pending {
            return Err(StoreError::invalid("role", "a business role must be selected"));
        }

        let current = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))?;

        if current.role != BusinessRole::Pending && current.role != role {
            return Err(StoreError::conflict(format!(
                "role is already set to '{}'",
                current.role
            )));
        }

        let profile = if current.role == role {
            current.profile.clone()
        } else {
            RoleProfile::empty_for(role)
        };
        let profile_json = serde_json::to_string(&profile)
            .map_err(|e| StoreError::Database(format!("failed to encode role profile: {}", e)))?;

        sqlx::query(
            "UPDATE users SET role = ?, role_profile = ?, step3_completed = 1, updated_at = ? WHERE id = ?",
        )
        .bind(role.as_str())
        .bind(&profile_json)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        info!(user_id, role = %role, "Business role selected");

        self.refresh_profile_completed(user_id).await?;
        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Onboarding step 4: role-specific details
    ///
    /// The payload's tag must match the user's current role.
    pub async fn save_role_details(&self, user_id: &str, profile: &RoleProfile) -> Result<User> {
        let current = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))?;

        if current.role == BusinessRole::Pending {
            return Err(StoreError::invalid("role", "select a business role first"));
        }
        if profile.role() != current.role {
            return Err(StoreError::invalid(
                "profile",
                format!(
                    "payload is for role '{}' but user is '{}'",
                    profile.role(),
                    current.role
                ),
            ));
        }

        let profile_json = serde_json::to_string(profile)
            .map_err(|e| StoreError::Database(format!("failed to encode role profile: {}", e)))?;

        sqlx::query(
            "UPDATE users SET role_profile = ?, step4_completed = 1, updated_at = ? WHERE id = ?",
        )
        .bind(&profile_json)
        .bind(Utc::now().to_rfc3339())
        .bind(user_id)
        .execute(self.pool)
        .await?;

        self.refresh_profile_completed(user_id).await?;
        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Apply a partial profile update (PUT my-profile)
    pub async fn update_profile(&self, user_id: &str, patch: &UpdateProfile) -> Result<User> {
        let current = self
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))?;

        if let Some(ref profile) = patch.profile {
            if profile.role() != current.role {
                return Err(StoreError::invalid(
                    "profile",
                    format!(
                        "payload is for role '{}' but user is '{}'",
                        profile.role(),
                        current.role
                    ),
                ));
            }
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE users SET updated_at = ");
        qb.push_bind(Utc::now().to_rfc3339());

        macro_rules! set_if_present {
            ($field:ident, $column:literal) => {
                if let Some(ref value) = patch.$field {
                    qb.push(concat!(", ", $column, " = "));
                    qb.push_bind(value.clone());
                }
            };
        }

        set_if_present!(first_name, "first_name");
        set_if_present!(last_name, "last_name");
        set_if_present!(phone, "phone");
        set_if_present!(company_name, "company_name");
        set_if_present!(website, "website");
        set_if_present!(linkedin_profile, "linkedin_profile");
        set_if_present!(city, "city");
        set_if_present!(state, "state");
        set_if_present!(country, "country");
        set_if_present!(pin_code, "pin_code");
        set_if_present!(company_type, "company_type");
        set_if_present!(industry, "industry");
        set_if_present!(brief_introduction, "brief_introduction");
        set_if_present!(business_description, "business_description");
        set_if_present!(profile_picture, "profile_picture");

        if let Some(year) = patch.year_of_registration {
            qb.push(", year_of_registration = ");
            qb.push_bind(year);
        }
        if let Some(ref profile) = patch.profile {
            let profile_json = serde_json::to_string(profile).map_err(|e| {
                StoreError::Database(format!("failed to encode role profile: {}", e))
            })?;
            qb.push(", role_profile = ");
            qb.push_bind(profile_json);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(user_id);
        qb.build().execute(self.pool).await?;

        self.get_by_id(user_id)
            .await?
            .ok_or_else(|| StoreError::not_found("user"))
    }

    /// Activate or deactivate an account
    pub async fn set_active(&self, user_id: &str, active: bool) -> Result<bool> {
        let result = sqlx::query("UPDATE users SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now().to_rfc3339())
            .bind(user_id)
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Query active, profile-completed candidates for the suggestion engine
    ///
    /// `exclude` always contains at least the requester's own id.
    pub async fn find_candidates(
        &self,
        roles: &[BusinessRole],
        industry: Option<&str>,
        exclude: &[String],
        limit: i64,
    ) -> Result<Vec<User>> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} FROM users WHERE is_active = 1 AND profile_completed = 1 AND role IN (",
            USER_COLUMNS
        ));
        {
            let mut separated = qb.separated(", ");
            for role in roles {
                separated.push_bind(role.as_str());
            }
        }
        qb.push(")");

        if !exclude.is_empty() {
            qb.push(" AND id NOT IN (");
            {
                let mut separated = qb.separated(", ");
                for id in exclude {
                    separated.push_bind(id.clone());
                }
            }
            qb.push(")");
        }

        if let Some(industry) = industry {
            qb.push(" AND industry = ");
            qb.push_bind(industry.to_string());
        }

        qb.push(" ORDER BY created_at LIMIT ");
        qb.push_bind(limit);

        let rows = qb.build().fetch_all(self.pool).await?;
        rows.iter().map(row_to_user).collect()
    }

    /// Fetch several users by id, preserving no particular order
    pub async fn get_many(&self, ids: &[String]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {} FROM users WHERE id IN (", USER_COLUMNS));
        {
            let mut separated = qb.separated(", ");
            for id in ids {
                separated.push_bind(id.clone());
            }
        }
        qb.push(")");

        let rows = qb.build().fetch_all(self.pool).await?;
        rows.iter().map(row_to_user).collect()
    }

    /// Total user count
    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }

    // =========================================================================
    // Connection cache (derived from accepted ledger edges)
    // =========================================================================

    /// Record an accepted connection in both directions
    pub async fn add_connection(&self, user_a: &str, user_b: &str) -> Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT OR IGNORE INTO connections (user_id, peer_id, connected_at) VALUES (?, ?, ?), (?, ?, ?)",
        )
        .bind(user_a)
        .bind(user_b)
        .bind(&now)
        .bind(user_b)
        .bind(user_a)
        .bind(&now)
        .execute(self.pool)
        .await?;

        Ok(())
    }

    /// IDs of a user's connections
    pub async fn connection_ids(&self, user_id: &str) -> Result<Vec<String>> {
        let rows = sqlx::query("SELECT peer_id FROM connections WHERE user_id = ?")
            .bind(user_id)
            .fetch_all(self.pool)
            .await?;

        Ok(rows.iter().map(|row| row.get("peer_id")).collect())
    }

    /// Number of connections a user has
    pub async fn connection_count(&self, user_id: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM connections WHERE user_id = ?")
            .bind(user_id)
            .fetch_one(self.pool)
            .await?;
        Ok(count as u64)
    }

    /// Recompute `profile_completed` from the four step flags
    async fn refresh_profile_completed(&self, user_id: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET profile_completed =
                (step1_completed AND step2_completed AND step3_completed AND step4_completed)
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .execute(self.pool)
        .await?;
        Ok(())
    }
}

/// Convert a database row to a User
pub(crate) fn row_to_user(row: &SqliteRow) -> Result<User> {
    let role_str: String = row.get("role");
    let profile_json: String = row.get("role_profile");

    let profile: RoleProfile = serde_json::from_str(&profile_json)
        .map_err(|e| StoreError::Database(format!("corrupt role profile: {}", e)))?;

    Ok(User {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        phone: row.get("phone"),
        company_name: none_if_empty(row.get("company_name")),
        website: none_if_empty(row.get("website")),
        linkedin_profile: none_if_empty(row.get("linkedin_profile")),
        city: none_if_empty(row.get("city")),
        state: none_if_empty(row.get("state")),
        country: none_if_empty(row.get("country")),
        pin_code: none_if_empty(row.get("pin_code")),
        company_type: none_if_empty(row.get("company_type")),
        year_of_registration: row.get("year_of_registration"),
        industry: none_if_empty(row.get("industry")),
        brief_introduction: none_if_empty(row.get("brief_introduction")),
        business_description: none_if_empty(row.get("business_description")),
        gst_or_cin: none_if_empty(row.get("gst_or_cin")),
        profile_picture: none_if_empty(row.get("profile_picture")),
        role: BusinessRole::parse(&role_str).unwrap_or(BusinessRole::Pending),
        profile,
        step1_completed: row.get("step1_completed"),
        step2_completed: row.get("step2_completed"),
        step3_completed: row.get("step3_completed"),
        step4_completed: row.get("step4_completed"),
        is_verified: row.get("is_verified"),
        is_active: row.get("is_active"),
        profile_completed: row.get("profile_completed"),
        last_login: parse_datetime_opt(row.get("last_login")),
        created_at: parse_datetime(row.get("created_at")),
        updated_at: parse_datetime(row.get("updated_at")),
    })
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

pub(crate) fn parse_datetime(s: String) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

pub(crate) fn parse_datetime_opt(s: Option<String>) -> Option<DateTime<Utc>> {
    s.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::{InvestorProfile, SellerProfile};

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password: "password123".to_string(),
            first_name: "Asha".to_string(),
            last_name: "Rao".to_string(),
            phone: "+91-9876543210".to_string(),
        }
    }

    async fn onboard(db: &Database, email: &str, role: BusinessRole) -> User {
        let user = db.users().create_user(&new_user(email)).await.unwrap();
        db.users()
            .save_step1(
                &user.id,
                &Step1Details {
                    company_name: "Rao Textiles".to_string(),
                    pin_code: "411001".to_string(),
                    gst_or_cin: "GST123".to_string(),
                    city: Some("Pune".to_string()),
                    state: Some("Maharashtra".to_string()),
                    country: Some("India".to_string()),
                    industry: Some("textiles".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        db.users()
            .save_step2(&user.id, "We make textiles.")
            .await
            .unwrap();
        db.users().set_role(&user.id, role).await.unwrap();
        db.users()
            .save_role_details(&user.id, &RoleProfile::empty_for(role))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let db = Database::in_memory().await.unwrap();

        let user = db.users().create_user(&new_user("asha@example.com")).await.unwrap();
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.role, BusinessRole::Pending);
        assert!(!user.profile_completed);
        assert!(user.is_active);

        let fetched = db.users().get_by_email("Asha@Example.com").await.unwrap();
        assert!(fetched.is_some());
        assert_eq!(fetched.unwrap().id, user.id);

        assert_eq!(db.users().count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_email() {
        let db = Database::in_memory().await.unwrap();

        db.users().create_user(&new_user("asha@example.com")).await.unwrap();
        let result = db.users().create_user(&new_user("asha@example.com")).await;

        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_verify_credentials() {
        let db = Database::in_memory().await.unwrap();
        db.users().create_user(&new_user("asha@example.com")).await.unwrap();

        let ok = db
            .users()
            .verify_credentials("asha@example.com", "password123")
            .await
            .unwrap();
        assert!(ok.is_some());

        // last_login was stamped
        let refreshed = db
            .users()
            .get_by_email("asha@example.com")
            .await
            .unwrap()
            .unwrap();
        assert!(refreshed.last_login.is_some());

        let bad = db
            .users()
            .verify_credentials("asha@example.com", "wrong")
            .await
            .unwrap();
        assert!(bad.is_none());

        let missing = db
            .users()
            .verify_credentials("none@example.com", "password123")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_onboarding_completes_profile() {
        let db = Database::in_memory().await.unwrap();
        let user = onboard(&db, "asha@example.com", BusinessRole::Seller).await;

        assert!(user.step1_completed);
        assert!(user.step2_completed);
        assert!(user.step3_completed);
        assert!(user.step4_completed);
        assert!(user.profile_completed);
        assert_eq!(user.role, BusinessRole::Seller);
        assert_eq!(user.industry.as_deref(), Some("textiles"));
    }

    #[tokio::test]
    async fn test_profile_not_completed_until_all_steps() {
        let db = Database::in_memory().await.unwrap();
        let user = db.users().create_user(&new_user("asha@example.com")).await.unwrap();

        db.users().set_role(&user.id, BusinessRole::Seller).await.unwrap();
        let partial = db.users().get_by_id(&user.id).await.unwrap().unwrap();
        assert!(partial.step3_completed);
        assert!(!partial.profile_completed);
    }

    #[tokio::test]
    async fn test_role_fixed_once() {
        let db = Database::in_memory().await.unwrap();
        let user = db.users().create_user(&new_user("asha@example.com")).await.unwrap();

        db.users().set_role(&user.id, BusinessRole::Seller).await.unwrap();

        // Same role again is fine
        db.users().set_role(&user.id, BusinessRole::Seller).await.unwrap();

        // Switching is a conflict
        let result = db.users().set_role(&user.id, BusinessRole::Investor).await;
        assert!(matches!(result, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_role_details_must_match_role() {
        let db = Database::in_memory().await.unwrap();
        let user = db.users().create_user(&new_user("asha@example.com")).await.unwrap();
        db.users().set_role(&user.id, BusinessRole::Seller).await.unwrap();

        let wrong = RoleProfile::Investor(InvestorProfile::default());
        let result = db.users().save_role_details(&user.id, &wrong).await;
        assert!(matches!(result, Err(StoreError::Invalid { .. })));

        let right = RoleProfile::Seller(SellerProfile {
            investment_required: Some(500_000),
            ..Default::default()
        });
        let updated = db.users().save_role_details(&user.id, &right).await.unwrap();
        assert_eq!(updated.profile.investment_required(), Some(500_000));
    }

    #[tokio::test]
    async fn test_update_profile_patch() {
        let db = Database::in_memory().await.unwrap();
        let user = onboard(&db, "asha@example.com", BusinessRole::Seller).await;

        let patch = UpdateProfile {
            city: Some("Mumbai".to_string()),
            website: Some("https://rao.example".to_string()),
            ..Default::default()
        };
        let updated = db.users().update_profile(&user.id, &patch).await.unwrap();

        assert_eq!(updated.city.as_deref(), Some("Mumbai"));
        assert_eq!(updated.website.as_deref(), Some("https://rao.example"));
        // Untouched fields survive
        assert_eq!(updated.industry.as_deref(), Some("textiles"));
    }

    #[tokio::test]
    async fn test_find_candidates_filters() {
        let db = Database::in_memory().await.unwrap();
        let seller = onboard(&db, "seller@example.com", BusinessRole::Seller).await;
        let investor = onboard(&db, "investor@example.com", BusinessRole::Investor).await;
        let consultant = onboard(&db, "consultant@example.com", BusinessRole::Consultant).await;

        // Incomplete profile is never a candidate
        db.users().create_user(&new_user("fresh@example.com")).await.unwrap();

        let candidates = db
            .users()
            .find_candidates(
                &[BusinessRole::Investor, BusinessRole::Consultant],
                None,
                &[seller.id.clone()],
                10,
            )
            .await
            .unwrap();

        let ids: Vec<&str> = candidates.iter().map(|u| u.id.as_str()).collect();
        assert!(ids.contains(&investor.id.as_str()));
        assert!(ids.contains(&consultant.id.as_str()));
        assert_eq!(candidates.len(), 2);

        // Deactivated users drop out
        db.users().set_active(&investor.id, false).await.unwrap();
        let candidates = db
            .users()
            .find_candidates(&[BusinessRole::Investor], None, &[], 10)
            .await
            .unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_find_candidates_industry_filter() {
        let db = Database::in_memory().await.unwrap();
        let investor = onboard(&db, "investor@example.com", BusinessRole::Investor).await;

        let matched = db
            .users()
            .find_candidates(&[BusinessRole::Investor], Some("textiles"), &[], 10)
            .await
            .unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].id, investor.id);

        let unmatched = db
            .users()
            .find_candidates(&[BusinessRole::Investor], Some("software"), &[], 10)
            .await
            .unwrap();
        assert!(unmatched.is_empty());
    }

    #[tokio::test]
    async fn test_connection_cache() {
        let db = Database::in_memory().await.unwrap();

        db.users().add_connection("a", "b").await.unwrap();
        // Idempotent
        db.users().add_connection("a", "b").await.unwrap();

        assert_eq!(db.users().connection_ids("a").await.unwrap(), vec!["b"]);
        assert_eq!(db.users().connection_ids("b").await.unwrap(), vec!["a"]);
        assert_eq!(db.users().connection_count("a").await.unwrap(), 1);
    }
}
