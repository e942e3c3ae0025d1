//! Demo data set.
//!
//! A small fixed roster covering the interesting member shapes: expiring,
//! expired, at-risk, VIP regular, fresh signup, and a birthday. Seeding is
//! idempotent: the ids are stable, so re-seeding replaces the same rows.

use chrono::{Datelike, Duration, NaiveDate};

use crate::member::{CheckIn, CheckInKind, HealthMetric, Member, MemberStatus, MembershipType};

/// Build the demo roster as of `today`.
pub fn demo_members(today: NaiveDate) -> Vec<Member> {
    let base = |id: &str, name: &str| Member {
        id: id.to_string(),
        name: name.to_string(),
        phone: "010-0000-0000".to_string(),
        email: format!("{id}@example.com"),
        status: MemberStatus::Active,
        membership_type: MembershipType::Quarterly,
        expiry_date: today + Duration::days(90),
        registered_on: today - Duration::days(180),
        date_of_birth: None,
        check_ins: vec![],
        health_metrics: vec![],
    };

    let mut expiring = base("demo-001", "Kim Haneul");
    expiring.expiry_date = today + Duration::days(7);
    expiring.check_ins = (0..12)
        .map(|i| CheckIn {
            date: today - Duration::days(i * 2),
            kind: CheckInKind::Gym,
        })
        .collect();

    let mut lapsed = base("demo-002", "Lee Dohyun");
    lapsed.status = MemberStatus::Expired;
    lapsed.expiry_date = today - Duration::days(2);
    lapsed.check_ins = vec![CheckIn {
        date: today - Duration::days(15),
        kind: CheckInKind::Gym,
    }];

    let mut at_risk = base("demo-003", "Park Chaewon");
    at_risk.check_ins = vec![CheckIn {
        date: today - Duration::days(20),
        kind: CheckInKind::Gym,
    }];

    let mut vip = base("demo-004", "Jung Minseok");
    vip.expiry_date = today + Duration::days(200);
    vip.membership_type = MembershipType::Yearly;
    vip.registered_on = today - Duration::days(500);
    vip.check_ins = (0..110)
        .map(|i| CheckIn {
            date: today - Duration::days(i * 2),
            kind: CheckInKind::Gym,
        })
        .collect();
    vip.health_metrics = vec![
        HealthMetric {
            recorded_on: today - Duration::days(5),
            weight_kg: 78.2,
            muscle_kg: 36.5,
        },
        HealthMetric {
            recorded_on: today - Duration::days(35),
            weight_kg: 79.0,
            muscle_kg: 35.1,
        },
    ];

    let mut fresh = base("demo-005", "Song Iseo");
    fresh.membership_type = MembershipType::Monthly;
    fresh.registered_on = today - Duration::days(3);
    fresh.expiry_date = today + Duration::days(27);

    let mut birthday = base("demo-006", "Choi Jiwon");
    birthday.date_of_birth = NaiveDate::from_ymd_opt(1995, today.month(), today.day());
    birthday.check_ins = vec![CheckIn {
        date: today - Duration::days(1),
        kind: CheckInKind::Class,
    }];

    vec![expiring, lapsed, at_risk, vip, fresh, birthday]
}
