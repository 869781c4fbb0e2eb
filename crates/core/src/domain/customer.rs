use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CustomerId(pub u32);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Membership tier. Ordering matters: a higher tier is never eligible for a
/// smaller membership discount than a lower one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MembershipTier {
    Bronze,
    Silver,
    Gold,
    Platinum,
}

impl MembershipTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            MembershipTier::Bronze => "Bronze",
            MembershipTier::Silver => "Silver",
            MembershipTier::Gold => "Gold",
            MembershipTier::Platinum => "Platinum",
        }
    }

    /// Gold and Platinum customers get premium-brand weighting and higher
    /// unverified-review trust.
    pub fn is_premium(&self) -> bool {
        matches!(self, MembershipTier::Gold | MembershipTier::Platinum)
    }
}

impl fmt::Display for MembershipTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable for the duration of order generation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub membership_tier: MembershipTier,
    pub loyalty_points: u32,
    pub signup_date: NaiveDate,
}
