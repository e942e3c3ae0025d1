//! Member domain model.
//!
//! Members are owned and mutated by the member-management layer; the
//! automation engine only ever reads them. Check-in and health-metric
//! histories are embedded directly on the record.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Membership lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberStatus {
    Active,
    Expired,
    Paused,
}

/// Membership plan tier. `Monthly` is the shortest tier and doubles as the
/// trial-detection tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MembershipType {
    Monthly,
    Quarterly,
    Yearly,
}

impl MembershipType {
    /// Whether this is the shortest plan tier.
    pub fn is_shortest_tier(&self) -> bool {
        matches!(self, MembershipType::Monthly)
    }
}

/// Kind of a single check-in event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckInKind {
    Gym,
    Class,
}

/// One check-in event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckIn {
    pub date: NaiveDate,
    pub kind: CheckInKind,
}

/// One body-composition sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthMetric {
    pub recorded_on: NaiveDate,
    pub weight_kg: f64,
    pub muscle_kg: f64,
}

/// A gym member with embedded activity histories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    pub status: MemberStatus,
    pub membership_type: MembershipType,
    pub expiry_date: NaiveDate,
    pub registered_on: NaiveDate,
    /// Absent when the member declined to provide it.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub check_ins: Vec<CheckIn>,
    #[serde(default)]
    pub health_metrics: Vec<HealthMetric>,
}

impl Member {
    /// Total number of recorded check-ins, regardless of kind.
    pub fn total_check_ins(&self) -> usize {
        self.check_ins.len()
    }
}
