//! User model
//!
//! A user is identity plus a core company profile plus one role-specific
//! payload selected by [`BusinessRole`]. Role payloads are a tagged enum, so
//! investor fields simply do not exist on a seller - there is no wide record
//! of mostly-empty columns.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fallback avatar when a user has not uploaded a profile picture
pub const DEFAULT_AVATAR: &str = "/images/default-avatar.png";

/// Business role of a user (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessRole {
    /// Registered but has not picked a role yet
    Pending,
    /// Invests in startups and businesses for sale
    Investor,
    /// Sells an established business
    Seller,
    /// Early-stage company seeking investment
    Startup,
    /// Business consultant / advisor
    Consultant,
    /// Franchise owner looking to expand
    Franchise,
    /// Importer / exporter
    Impexp,
}

impl BusinessRole {
    /// Parse a role from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "investor" | "buyer" => Some(Self::Investor),
            "seller" => Some(Self::Seller),
            "startup" => Some(Self::Startup),
            "consultant" | "advisor" => Some(Self::Consultant),
            "franchise" | "franchisor" => Some(Self::Franchise),
            "impexp" => Some(Self::Impexp),
            _ => None,
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Investor => "investor",
            Self::Seller => "seller",
            Self::Startup => "startup",
            Self::Consultant => "consultant",
            Self::Franchise => "franchise",
            Self::Impexp => "impexp",
        }
    }

    /// Roles a user may select during onboarding (everything except pending)
    pub const SELECTABLE: [BusinessRole; 6] = [
        Self::Investor,
        Self::Seller,
        Self::Startup,
        Self::Consultant,
        Self::Franchise,
        Self::Impexp,
    ];
}

impl std::fmt::Display for BusinessRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A traded good (import/export profiles)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TradeGood {
    /// Good name
    pub name: String,
    /// HSN classification code
    #[serde(default)]
    pub hsn_code: String,
}

/// Investor-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestorProfile {
    #[serde(default)]
    pub acquisition_criteria: Option<String>,
    /// Fund size available for investment
    #[serde(default)]
    pub investment_fund_size: Option<i64>,
    /// "Full Buyout" or "Partial"
    #[serde(default)]
    pub investment_type: Option<String>,
    #[serde(default)]
    pub location_preferences: Vec<String>,
    #[serde(default)]
    pub previous_investments: Option<i64>,
}

/// Seller-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerProfile {
    #[serde(default)]
    pub products_and_services: Option<String>,
    #[serde(default)]
    pub last_fy_revenue: Option<i64>,
    #[serde(default)]
    pub full_time_employees: Option<i64>,
    /// Amount of investment required
    #[serde(default)]
    pub investment_required: Option<i64>,
    /// "Full - 100%", "Partial Sale" or "Seeking Loan"
    #[serde(default)]
    pub sale_type: Option<String>,
    #[serde(default)]
    pub sale_percentage: Option<i64>,
    #[serde(default)]
    pub reason_for_sale: Option<String>,
}

/// Startup-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StartupProfile {
    #[serde(default)]
    pub business_idea: Option<String>,
    #[serde(default)]
    pub problem_solved: Option<String>,
    #[serde(default)]
    pub business_model: Option<String>,
    /// Amount of investment required
    #[serde(default)]
    pub investment_required: Option<i64>,
    #[serde(default)]
    pub offer_to_investor: Option<String>,
}

/// Consultant-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsultantProfile {
    #[serde(default)]
    pub services_provided: Option<String>,
    #[serde(default)]
    pub businesses_assisted: Option<i64>,
}

/// Franchise-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FranchiseProfile {
    #[serde(default)]
    pub franchise_description: Option<String>,
    /// Bucketed count, e.g. "4-10"
    #[serde(default)]
    pub franchisee_count: Option<String>,
    #[serde(default)]
    pub cities_offered: Vec<String>,
    #[serde(default)]
    pub prior_experience_required: Option<bool>,
    #[serde(default)]
    pub additional_requirements: Option<String>,
}

/// Import/export-specific profile fields
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpexpProfile {
    #[serde(default)]
    pub detailed_description: Option<String>,
    #[serde(default)]
    pub goods_exported: Vec<TradeGood>,
    #[serde(default)]
    pub goods_imported: Vec<TradeGood>,
    #[serde(default)]
    pub iec_number: Option<String>,
}

/// Role-specific payload, tagged by role
///
/// Serialized as JSON into a single column; the tag keeps the payload and the
/// `role` column in lockstep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum RoleProfile {
    Pending,
    Investor(InvestorProfile),
    Seller(SellerProfile),
    Startup(StartupProfile),
    Consultant(ConsultantProfile),
    Franchise(FranchiseProfile),
    Impexp(ImpexpProfile),
}

impl Default for RoleProfile {
    fn default() -> Self {
        Self::Pending
    }
}

impl RoleProfile {
    /// The role this payload belongs to
    pub fn role(&self) -> BusinessRole {
        match self {
            Self::Pending => BusinessRole::Pending,
            Self::Investor(_) => BusinessRole::Investor,
            Self::Seller(_) => BusinessRole::Seller,
            Self::Startup(_) => BusinessRole::Startup,
            Self::Consultant(_) => BusinessRole::Consultant,
            Self::Franchise(_) => BusinessRole::Franchise,
            Self::Impexp(_) => BusinessRole::Impexp,
        }
    }

    /// Empty payload for a role (used when the role is first selected)
    pub fn empty_for(role: BusinessRole) -> Self {
        match role {
            BusinessRole::Pending => Self::Pending,
            BusinessRole::Investor => Self::Investor(InvestorProfile::default()),
            BusinessRole::Seller => Self::Seller(SellerProfile::default()),
            BusinessRole::Startup => Self::Startup(StartupProfile::default()),
            BusinessRole::Consultant => Self::Consultant(ConsultantProfile::default()),
            BusinessRole::Franchise => Self::Franchise(FranchiseProfile::default()),
            BusinessRole::Impexp => Self::Impexp(ImpexpProfile::default()),
        }
    }

    /// Investment amount the user is seeking (sellers and startups)
    pub fn investment_required(&self) -> Option<i64> {
        match self {
            Self::Seller(p) => p.investment_required,
            Self::Startup(p) => p.investment_required,
            _ => None,
        }
    }

    /// Fund size available for investment (investors)
    pub fn investment_fund_size(&self) -> Option<i64> {
        match self {
            Self::Investor(p) => p.investment_fund_size,
            _ => None,
        }
    }

    /// Services offered (consultants)
    pub fn services_provided(&self) -> Option<&str> {
        match self {
            Self::Consultant(p) => p.services_provided.as_deref(),
            _ => None,
        }
    }

    /// First traded good, exports before imports (import/export)
    pub fn goods_type(&self) -> Option<&TradeGood> {
        match self {
            Self::Impexp(p) => p.goods_exported.first().or_else(|| p.goods_imported.first()),
            _ => None,
        }
    }

    /// Role-specific fields shown on a suggestion card
    ///
    /// Explicit per-role projection; unknown roles get no extra fields.
    pub fn display_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let mut fields = serde_json::Map::new();
        match self {
            Self::Investor(p) => {
                fields.insert("investment_fund_size".into(), json_opt(p.investment_fund_size));
                fields.insert(
                    "investment_type".into(),
                    json_opt(p.investment_type.clone()),
                );
            }
            Self::Seller(p) => {
                fields.insert("investment_required".into(), json_opt(p.investment_required));
                fields.insert("sale_type".into(), json_opt(p.sale_type.clone()));
            }
            Self::Startup(p) => {
                fields.insert("investment_required".into(), json_opt(p.investment_required));
            }
            Self::Consultant(p) => {
                fields.insert("services".into(), json_opt(p.services_provided.clone()));
                fields.insert(
                    "businesses_assisted".into(),
                    json_opt(p.businesses_assisted),
                );
            }
            Self::Franchise(p) => {
                fields.insert("franchisee_count".into(), json_opt(p.franchisee_count.clone()));
            }
            Self::Impexp(_) => {
                let goods = self.goods_type().map(|g| g.name.clone());
                fields.insert("goods_type".into(), json_opt(goods));
            }
            Self::Pending => {}
        }
        fields
    }
}

fn json_opt<T: Into<serde_json::Value>>(v: Option<T>) -> serde_json::Value {
    v.map(Into::into).unwrap_or(serde_json::Value::Null)
}

/// A stored user
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// User ID (UUID)
    pub id: String,
    /// Email address (unique)
    pub email: String,
    /// Argon2 password hash
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,

    // Core company profile (filled during onboarding step 1/2)
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
    pub profile_picture: Option<String>,

    /// Business role, `pending` until selected in step 3
    pub role: BusinessRole,
    /// Role-specific payload, tag always matches `role`
    pub profile: RoleProfile,

    pub step1_completed: bool,
    pub step2_completed: bool,
    pub step3_completed: bool,
    pub step4_completed: bool,

    pub is_verified: bool,
    pub is_active: bool,
    pub profile_completed: bool,

    pub last_login: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Display name: company name, falling back to "first last"
    pub fn display_name(&self) -> String {
        match self.company_name.as_deref() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("{} {}", self.first_name, self.last_name),
        }
    }

    /// Concatenated location string from the populated parts
    pub fn location(&self) -> String {
        [&self.city, &self.state, &self.country]
            .into_iter()
            .filter_map(|part| part.as_deref())
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Profile picture reference with the placeholder fallback
    pub fn avatar(&self) -> String {
        match self.profile_picture.as_deref() {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => DEFAULT_AVATAR.to_string(),
        }
    }

    /// Short summary used in request listings and visitor lists
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.id.clone(),
            name: self.display_name(),
            role: self.role,
            location: self.location(),
            profile_picture: self.avatar(),
        }
    }
}

/// Compact user representation for embedding in other responses
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub user_id: String,
    pub name: String,
    pub role: BusinessRole,
    pub location: String,
    pub profile_picture: String,
}

/// Input for creating a user at registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

/// Company details captured in onboarding step 1
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Step1Details {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub pin_code: String,
    #[serde(default)]
    pub gst_or_cin: String,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub year_of_registration: Option<i64>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub brief_introduction: Option<String>,
}

/// Partial update applied by the profile PUT endpoint
///
/// Only populated fields are written.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin_profile: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub pin_code: Option<String>,
    #[serde(default)]
    pub company_type: Option<String>,
    #[serde(default)]
    pub year_of_registration: Option<i64>,
    #[serde(default)]
    pub industry: Option<String>,
    #[serde(default)]
    pub brief_introduction: Option<String>,
    #[serde(default)]
    pub business_description: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    /// Role payload replacement; the tag must match the user's current role
    #[serde(default)]
    pub profile: Option<RoleProfile>,
}
