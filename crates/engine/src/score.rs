//! Match scoring
//!
//! Pure, deterministic scoring over a requester/candidate pair. Both the
//! numeric score and the reason text read from the same [`MatchFactors`]
//! evaluation, which keeps their predicates in sync.

use bizlink_store::{BusinessRole, User};

/// Scores are clamped to this ceiling
pub const MAX_SCORE: u8 = 100;

/// Every candidate starts here
const BASE_SCORE: u32 = 30;

/// Location proximity between two profiles, highest applicable tier only
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationMatch {
    SameCity,
    SameState,
    SameCountry,
    None,
}

impl LocationMatch {
    fn evaluate(requester: &User, candidate: &User) -> Self {
        if populated_eq(&requester.city, &candidate.city) {
            Self::SameCity
        } else if populated_eq(&requester.state, &candidate.state) {
            Self::SameState
        } else if populated_eq(&requester.country, &candidate.country) {
            Self::SameCountry
        } else {
            Self::None
        }
    }

    fn bonus(&self) -> u32 {
        match self {
            Self::SameCity => 20,
            Self::SameState => 15,
            Self::SameCountry => 10,
            Self::None => 0,
        }
    }
}

/// Both present and equal; empty fields never match each other
fn populated_eq(a: &Option<String>, b: &Option<String>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => !a.is_empty() && a == b,
        _ => false,
    }
}

/// The comparisons shared by scoring and reason generation
#[derive(Debug, Clone)]
pub struct MatchFactors {
    requester_role: BusinessRole,
    candidate_role: BusinessRole,
    same_industry: bool,
    location: LocationMatch,
    /// Requester is an investor and the candidate is seeking investment
    investment_fit: bool,
    has_introduction: bool,
    has_website: bool,
}

impl MatchFactors {
    /// Evaluate all match predicates for a pair once
    pub fn evaluate(requester: &User, candidate: &User) -> Self {
        Self {
            requester_role: requester.role,
            candidate_role: candidate.role,
            same_industry: populated_eq(&requester.industry, &candidate.industry),
            location: LocationMatch::evaluate(requester, candidate),
            investment_fit: requester.role == BusinessRole::Investor
                && candidate.profile.investment_required().is_some(),
            has_introduction: candidate
                .brief_introduction
                .as_deref()
                .is_some_and(|s| !s.is_empty()),
            has_website: candidate.website.as_deref().is_some_and(|s| !s.is_empty()),
        }
    }

    /// Bonus for the directed role pair
    ///
    /// High-priority bidirectional pairs score 30, the investor pipeline 25,
    /// one-directional hub edges 20.
    fn role_pair_bonus(&self) -> u32 {
        use BusinessRole::*;

        match (self.requester_role, self.candidate_role) {
            (Franchise, Consultant) | (Consultant, Franchise) => 30,
            (Impexp, Consultant) | (Consultant, Impexp) => 30,
            (Seller | Startup, Investor) | (Investor, Seller | Startup) => 25,
            (Seller | Startup, Consultant) => 20,
            (Consultant, Investor) => 20,
            (Franchise, Investor) => 20,
            (Impexp, Investor) => 20,
            _ => 0,
        }
    }

    /// Numeric match score, clamped to [0, 100]
    pub fn score(&self) -> u8 {
        let mut score = BASE_SCORE;

        if self.same_industry {
            score += 25;
        }
        score += self.location.bonus();
        score += self.role_pair_bonus();
        if self.investment_fit {
            score += 15;
        }
        if self.has_introduction {
            score += 5;
        }
        if self.has_website {
            score += 5;
        }

        score.min(MAX_SCORE as u32) as u8
    }

    /// Human-readable reasons derived from the same predicates as the score
    pub fn reason(&self) -> String {
        use BusinessRole::*;

        let mut reasons: Vec<&str> = Vec::new();

        if self.same_industry {
            reasons.push("Same industry");
        }
        if self.location == LocationMatch::SameCity {
            reasons.push("Same location");
        }

        match (self.requester_role, self.candidate_role) {
            (Seller | Startup, Investor) => reasons.push("Investment opportunity"),
            (Investor, Seller | Startup) => reasons.push("Potential investment target"),
            _ => {}
        }

        if self.candidate_role == Consultant {
            reasons.push("Business expertise & guidance");
        }

        match (self.requester_role, self.candidate_role) {
            (Consultant, Seller | Startup) => reasons.push("Business development opportunity"),
            (Consultant, Franchise) => reasons.push("Franchise expansion consulting"),
            (Consultant, Impexp) => reasons.push("Import/export consulting"),
            (Franchise, Consultant) => reasons.push("Franchise development consulting"),
            (Franchise, Investor) => reasons.push("Franchise investment opportunity"),
            (Impexp, Consultant) => reasons.push("Trade consulting & advisory"),
            (Impexp, Investor) => reasons.push("International trade opportunity"),
            _ => {}
        }

        if reasons.is_empty() {
            "Potential business opportunity".to_string()
        } else {
            reasons.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizlink_store::{RoleProfile, StartupProfile};
    use chrono::Utc;

    fn user(role: BusinessRole, industry: &str, city: &str, state: &str, country: &str) -> User {
        User {
            id: format!("{}-id", role),
            email: format!("{}@example.com", role),
            password_hash: String::new(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            phone: "000".to_string(),
            company_name: None,
            website: None,
            linkedin_profile: None,
            city: non_empty(city),
            state: non_empty(state),
            country: non_empty(country),
            pin_code: None,
            company_type: None,
            year_of_registration: None,
            industry: non_empty(industry),
            brief_introduction: None,
            business_description: None,
            gst_or_cin: None,
            profile_picture: None,
            role,
            profile: RoleProfile::empty_for(role),
            step1_completed: true,
            step2_completed: true,
            step3_completed: true,
            step4_completed: true,
            is_verified: true,
            is_active: true,
            profile_completed: true,
            last_login: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn non_empty(s: &str) -> Option<String> {
        if s.is_empty() { None } else { Some(s.to_string()) }
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let seller = user(BusinessRole::Seller, "textiles", "Pune", "MH", "India");
        let investor = user(BusinessRole::Investor, "textiles", "Pune", "MH", "India");

        let a = MatchFactors::evaluate(&seller, &investor).score();
        let b = MatchFactors::evaluate(&seller, &investor).score();
        assert_eq!(a, b);
    }

    #[test]
    fn test_full_match_clamps_to_ceiling() {
        // base 30 + industry 25 + city 20 + pair 25 = 100
        let seller = user(BusinessRole::Seller, "textiles", "Pune", "MH", "India");
        let mut investor = user(BusinessRole::Investor, "textiles", "Pune", "MH", "India");
        assert_eq!(MatchFactors::evaluate(&seller, &investor).score(), 100);

        // Extra profile-completeness bonuses cannot push past 100
        investor.website = Some("https://fund.example".to_string());
        investor.brief_introduction = Some("We invest".to_string());
        assert_eq!(MatchFactors::evaluate(&seller, &investor).score(), 100);
    }

    #[test]
    fn test_unrelated_candidate_scores_lower() {
        let seller = user(BusinessRole::Seller, "textiles", "Pune", "MH", "India");
        let investor = user(BusinessRole::Investor, "textiles", "Pune", "MH", "India");
        let consultant = user(BusinessRole::Consultant, "software", "Delhi", "DL", "India");

        let investor_score = MatchFactors::evaluate(&seller, &investor).score();
        let consultant_score = MatchFactors::evaluate(&seller, &consultant).score();
        assert!(investor_score > consultant_score);

        // Different industry and city, same country: 30 + 10 + 20
        assert_eq!(consultant_score, 60);
    }

    #[test]
    fn test_location_tiers_are_exclusive() {
        let requester = user(BusinessRole::Seller, "", "Pune", "MH", "India");

        let same_city = user(BusinessRole::Consultant, "", "Pune", "MH", "India");
        let same_state = user(BusinessRole::Consultant, "", "Mumbai", "MH", "India");
        let same_country = user(BusinessRole::Consultant, "", "Delhi", "DL", "India");
        let elsewhere = user(BusinessRole::Consultant, "", "Berlin", "BE", "Germany");

        // seller -> consultant pair bonus is 20 in all four cases
        assert_eq!(MatchFactors::evaluate(&requester, &same_city).score(), 70);
        assert_eq!(MatchFactors::evaluate(&requester, &same_state).score(), 65);
        assert_eq!(MatchFactors::evaluate(&requester, &same_country).score(), 60);
        assert_eq!(MatchFactors::evaluate(&requester, &elsewhere).score(), 50);
    }

    #[test]
    fn test_empty_fields_never_match() {
        let a = user(BusinessRole::Seller, "", "", "", "");
        let b = user(BusinessRole::Consultant, "", "", "", "");

        let factors = MatchFactors::evaluate(&a, &b);
        assert!(!factors.same_industry);
        assert_eq!(factors.location, LocationMatch::None);
        // base + pair only
        assert_eq!(factors.score(), 50);
    }

    #[test]
    fn test_investment_fit_bonus() {
        let investor = user(BusinessRole::Investor, "", "", "", "");
        let mut startup = user(BusinessRole::Startup, "", "", "", "");

        // No declared requirement: base 30 + pair 25
        assert_eq!(MatchFactors::evaluate(&investor, &startup).score(), 55);

        startup.profile = RoleProfile::Startup(StartupProfile {
            investment_required: Some(1_000_000),
            ..Default::default()
        });
        assert_eq!(MatchFactors::evaluate(&investor, &startup).score(), 70);

        // The bonus is investor-only: a consultant looking at the same
        // startup gets nothing for it.
        let consultant = user(BusinessRole::Consultant, "", "", "", "");
        let factors = MatchFactors::evaluate(&consultant, &startup);
        assert!(!factors.investment_fit);
    }

    #[test]
    fn test_profile_completeness_bonuses() {
        let seller = user(BusinessRole::Seller, "", "", "", "");
        let mut investor = user(BusinessRole::Investor, "", "", "", "");

        let plain = MatchFactors::evaluate(&seller, &investor).score();

        investor.brief_introduction = Some("We invest in textiles".to_string());
        let with_intro = MatchFactors::evaluate(&seller, &investor).score();
        assert_eq!(with_intro, plain + 5);

        investor.website = Some("https://fund.example".to_string());
        let with_both = MatchFactors::evaluate(&seller, &investor).score();
        assert_eq!(with_both, plain + 10);
    }

    #[test]
    fn test_high_priority_pairs() {
        let franchise = user(BusinessRole::Franchise, "", "", "", "");
        let consultant = user(BusinessRole::Consultant, "", "", "", "");
        let impexp = user(BusinessRole::Impexp, "", "", "", "");

        // Bidirectional 30-point pairs
        assert_eq!(MatchFactors::evaluate(&franchise, &consultant).score(), 60);
        assert_eq!(MatchFactors::evaluate(&consultant, &franchise).score(), 60);
        assert_eq!(MatchFactors::evaluate(&impexp, &consultant).score(), 60);
        assert_eq!(MatchFactors::evaluate(&consultant, &impexp).score(), 60);
    }

    #[test]
    fn test_reasons_track_score_predicates() {
        let seller = user(BusinessRole::Seller, "textiles", "Pune", "MH", "India");
        let investor = user(BusinessRole::Investor, "textiles", "Pune", "MH", "India");

        let factors = MatchFactors::evaluate(&seller, &investor);
        let reason = factors.reason();
        assert!(reason.contains("Same industry"));
        assert!(reason.contains("Same location"));
        assert!(reason.contains("Investment opportunity"));

        // Reverse direction words it from the investor's side
        let factors = MatchFactors::evaluate(&investor, &seller);
        assert!(factors.reason().contains("Potential investment target"));
    }

    #[test]
    fn test_reason_fallback() {
        let seller = user(BusinessRole::Seller, "textiles", "Pune", "MH", "India");
        let other_seller = user(BusinessRole::Seller, "software", "Delhi", "DL", "India");

        let factors = MatchFactors::evaluate(&seller, &other_seller);
        assert_eq!(factors.reason(), "Potential business opportunity");
    }

    #[test]
    fn test_consultant_reasons() {
        let consultant = user(BusinessRole::Consultant, "", "", "", "");
        let franchise = user(BusinessRole::Franchise, "", "", "", "");
        let impexp = user(BusinessRole::Impexp, "", "", "", "");

        assert!(
            MatchFactors::evaluate(&consultant, &franchise)
                .reason()
                .contains("Franchise expansion consulting")
        );
        assert!(
            MatchFactors::evaluate(&impexp, &consultant)
                .reason()
                .contains("Trade consulting & advisory")
        );
        assert!(
            MatchFactors::evaluate(&franchise, &consultant)
                .reason()
                .contains("Franchise development consulting")
        );
    }
}
