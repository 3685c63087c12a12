//! Profile and onboarding routes
//!
//! The profile is built over four steps: company details, business
//! description, role selection, and role-specific details. The profile is
//! complete once all four are done.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use bizlink_store::{BusinessRole, RoleProfile, Step1Details, UpdateProfile, User};

use crate::error::{ApiError, Result};
use crate::extract::ActiveUser;
use crate::state::AppState;

/// Profile routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(my_profile).put(update_profile))
        .route("/step1", post(save_step1).get(get_step1))
        .route("/step2", post(save_step2).get(get_step2))
        .route("/role", post(select_role))
        .route("/details", post(save_details))
}

/// Full profile response
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub user_id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub role: BusinessRole,
    pub company_name: Option<String>,
    pub website: Option<String>,
    pub linkedin_profile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pin_code: Option<String>,
    pub company_type: Option<String>,
    pub year_of_registration: Option<i64>,
    pub industry: Option<String>,
    pub brief_introduction: Option<String>,
    pub business_description: Option<String>,
    pub gst_or_cin: Option<String>,
    pub profile_picture: String,
    /// Role-specific payload, tagged by role
    pub profile: RoleProfile,
    pub profile_completed: bool,
    pub is_verified: bool,
}

impl From<&User> for ProfileResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            phone: user.phone.clone(),
            role: user.role,
            company_name: user.company_name.clone(),
            website: user.website.clone(),
            linkedin_profile: user.linkedin_profile.clone(),
            city: user.city.clone(),
            state: user.state.clone(),
            country: user.country.clone(),
            pin_code: user.pin_code.clone(),
            company_type: user.company_type.clone(),
            year_of_registration: user.year_of_registration,
            industry: user.industry.clone(),
            brief_introduction: user.brief_introduction.clone(),
            business_description: user.business_description.clone(),
            gst_or_cin: user.gst_or_cin.clone(),
            profile_picture: user.avatar(),
            profile: user.profile.clone(),
            profile_completed: user.profile_completed,
            is_verified: user.is_verified,
        }
    }
}

/// Get own profile
///
/// GET /api/v1/profile/me
async fn my_profile(user: ActiveUser) -> Json<ProfileResponse> {
    Json(ProfileResponse::from(&user.0))
}

/// Update own profile
///
/// PUT /api/v1/profile/me
async fn update_profile(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(patch): Json<UpdateProfile>,
) -> Result<Json<ProfileResponse>> {
    let updated = state.db.users().update_profile(&user.id, &patch).await?;
    Ok(Json(ProfileResponse::from(&updated)))
}

/// Step completion response
#[derive(Debug, Serialize)]
pub struct StepResponse {
    pub user_id: String,
    pub step: u8,
    pub next_step: &'static str,
    pub profile_completed: bool,
}

/// Save onboarding step 1 (company details)
///
/// POST /api/v1/profile/step1
async fn save_step1(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(details): Json<Step1Details>,
) -> Result<Json<StepResponse>> {
    if details.company_name.is_empty() || details.pin_code.is_empty() || details.gst_or_cin.is_empty()
    {
        return Err(ApiError::bad_request(
            "company_name, pin_code and gst_or_cin are required",
        ));
    }

    let updated = state.db.users().save_step1(&user.id, &details).await?;

    Ok(Json(StepResponse {
        user_id: updated.id,
        step: 1,
        next_step: "Complete business description",
        profile_completed: updated.profile_completed,
    }))
}

/// Step 1 fields response
#[derive(Debug, Serialize)]
pub struct Step1Response {
    pub company_name: Option<String>,
    pub pin_code: Option<String>,
    pub gst_or_cin: Option<String>,
    pub website: Option<String>,
    pub linkedin_profile: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub company_type: Option<String>,
    pub year_of_registration: Option<i64>,
    pub industry: Option<String>,
    pub brief_introduction: Option<String>,
    pub step1_completed: bool,
}

/// Get onboarding step 1 fields
///
/// GET /api/v1/profile/step1
async fn get_step1(user: ActiveUser) -> Json<Step1Response> {
    Json(Step1Response {
        company_name: user.company_name.clone(),
        pin_code: user.pin_code.clone(),
        gst_or_cin: user.gst_or_cin.clone(),
        website: user.website.clone(),
        linkedin_profile: user.linkedin_profile.clone(),
        city: user.city.clone(),
        state: user.state.clone(),
        country: user.country.clone(),
        company_type: user.company_type.clone(),
        year_of_registration: user.year_of_registration,
        industry: user.industry.clone(),
        brief_introduction: user.brief_introduction.clone(),
        step1_completed: user.step1_completed,
    })
}

/// Step 2 request
#[derive(Debug, Deserialize)]
pub struct Step2Request {
    #[serde(default)]
    pub business_description: String,
}

/// Save onboarding step 2 (business description)
///
/// POST /api/v1/profile/step2
async fn save_step2(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<Step2Request>,
) -> Result<Json<StepResponse>> {
    if req.business_description.is_empty() {
        return Err(ApiError::bad_request("business_description is required"));
    }

    let updated = state
        .db
        .users()
        .save_step2(&user.id, &req.business_description)
        .await?;

    Ok(Json(StepResponse {
        user_id: updated.id,
        step: 2,
        next_step: "Select business type",
        profile_completed: updated.profile_completed,
    }))
}

/// Step 2 fields response
#[derive(Debug, Serialize)]
pub struct Step2Response {
    pub business_description: Option<String>,
    pub step2_completed: bool,
}

/// Get onboarding step 2 fields
///
/// GET /api/v1/profile/step2
async fn get_step2(user: ActiveUser) -> Json<Step2Response> {
    Json(Step2Response {
        business_description: user.business_description.clone(),
        step2_completed: user.step2_completed,
    })
}

/// Role selection request
#[derive(Debug, Deserialize)]
pub struct SelectRoleRequest {
    #[serde(default)]
    pub business_type: String,
}

/// Role selection response
#[derive(Debug, Serialize)]
pub struct SelectRoleResponse {
    pub user_id: String,
    pub role: BusinessRole,
    pub step: u8,
    pub next_step: &'static str,
}

/// Select the business role (onboarding step 3)
///
/// POST /api/v1/profile/role
///
/// The role is fixed once: selecting a different role later is a conflict.
async fn select_role(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(req): Json<SelectRoleRequest>,
) -> Result<Json<SelectRoleResponse>> {
    if req.business_type.is_empty() {
        return Err(ApiError::bad_request("business_type is required"));
    }

    let role = BusinessRole::parse(&req.business_type)
        .filter(|r| *r != BusinessRole::Pending)
        .ok_or_else(|| {
            ApiError::validation(
                "business_type",
                "must be one of: seller, startup, investor, consultant, franchise, impexp",
            )
        })?;

    let updated = state.db.users().set_role(&user.id, role).await?;

    Ok(Json(SelectRoleResponse {
        user_id: updated.id,
        role: updated.role,
        step: 3,
        next_step: "Complete business details",
    }))
}

/// Save role-specific details (onboarding step 4)
///
/// POST /api/v1/profile/details
///
/// The payload's `role` tag must match the selected role.
async fn save_details(
    user: ActiveUser,
    State(state): State<AppState>,
    Json(profile): Json<RoleProfile>,
) -> Result<Json<StepResponse>> {
    let updated = state.db.users().save_role_details(&user.id, &profile).await?;

    Ok(Json(StepResponse {
        user_id: updated.id,
        step: 4,
        next_step: "Profile complete",
        profile_completed: updated.profile_completed,
    }))
}
