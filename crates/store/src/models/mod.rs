//! Domain models
//!
//! Plain data types shared by the stores and the HTTP layer.

mod notification;
mod request;
mod user;
mod view;

pub use notification::{CreateOutcome, NewNotification, Notification};
pub use request::{ConnectionRequest, RequestAction, RequestStatus};
pub use user::{
    BusinessRole, ConsultantProfile, FranchiseProfile, ImpexpProfile, InvestorProfile, NewUser,
    RoleProfile, SellerProfile, StartupProfile, Step1Details, TradeGood, UpdateProfile, User,
    UserSummary, DEFAULT_AVATAR,
};
pub use view::{ViewLog, ViewSource};
