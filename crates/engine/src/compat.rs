//! Role-compatibility table
//!
//! A static directed graph over the closed role set: the roles a requester is
//! shown by default. The graph is intentionally asymmetric - sellers are
//! pointed at investors, while consultants act as a hub reaching most roles.

use bizlink_store::BusinessRole;

/// Default target roles for a requester's role
pub fn target_roles(role: BusinessRole) -> &'static [BusinessRole] {
    use BusinessRole::*;

    match role {
        // Sellers and startups look for capital
        Seller => &[Investor],
        Startup => &[Investor],
        // Investors look for deal flow
        Investor => &[Startup, Seller],
        // Consultants are the hub, reaching everyone who buys advice
        Consultant => &[Startup, Seller, Franchise, Impexp],
        // Franchises and import/export firms want advisors and capital
        Franchise => &[Consultant, Investor],
        Impexp => &[Consultant, Investor],
        // No role selected yet - nothing to suggest
        Pending => &[],
    }
}
