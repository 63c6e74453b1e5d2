mod common;

use common::*;
use insuretrack_core::model::{ClaimStatus, ClaimUpdate, NotificationType, Role};
use insuretrack_engine::commands::claims::{submit_claim, update_claim_status};
use insuretrack_engine::commands::dashboard::{dashboard, dashboard_on, Dashboard};
use insuretrack_engine::commands::policies::add_policy;
use insuretrack_store::repo::NotificationRepo;

#[test]
fn test_user_dashboard_counts_and_generates_reminders() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let erin = account(&f.conn, "erin", Role::User);
    let soon = add_policy(&dana, &policy_input("POL-50001", days_from_today(7)), &mut f.conn, &f.services)
        .unwrap();
    add_policy(&dana, &policy_input("POL-50002", days_from_today(200)), &mut f.conn, &f.services).unwrap();
    add_policy(&erin, &policy_input("POL-50003", days_from_today(7)), &mut f.conn, &f.services).unwrap();
    submit_claim(&dana, &claim_input("CLM-50001", soon.id), &[], &mut f.conn, &f.services).unwrap();

    let Dashboard::User(view) = dashboard(&dana, &mut f.conn, &f.services).unwrap() else {
        panic!("expected the user dashboard");
    };

    assert_eq!(view.stats.total_policies, 2);
    assert_eq!(view.stats.active_policies, 2);
    assert_eq!(view.stats.expiring_policies, 1);
    assert_eq!(view.stats.total_claims, 1);
    assert_eq!(view.recent_claims.len(), 1);
    assert!(view.policies.iter().all(|p| p.user_id == dana.user_id));
    // claim submission plus the expiry reminder
    assert_eq!(view.notifications.len(), 2);

    // Reminders are generated for every owner, not just the viewer.
    let erin_notices = NotificationRepo::for_user(&f.conn, erin.user_id).unwrap();
    assert_eq!(erin_notices.len(), 1);
    assert_eq!(erin_notices[0].notification_type, NotificationType::Expiry);
}

#[test]
fn test_agent_dashboard_covers_everyone() {
    let mut f = fixture();
    let dana = account(&f.conn, "dana", Role::User);
    let agent = account(&f.conn, "agent", Role::Agent);
    let p = add_policy(&dana, &policy_input("POL-50001", days_from_today(90)), &mut f.conn, &f.services)
        .unwrap();
    add_policy(&agent, &policy_input("POL-50002", days_from_today(90)), &mut f.conn, &f.services).unwrap();
    let c1 = submit_claim(&dana, &claim_input("CLM-50001", p.id), &[], &mut f.conn, &f.services).unwrap();
    submit_claim(&dana, &claim_input("CLM-50002", p.id), &[], &mut f.conn, &f.services).unwrap();
    update_claim_status(
        &agent,
        c1.id,
        &ClaimUpdate {
            status: ClaimStatus::Processing,
            remarks: None,
        },
        &mut f.conn,
        &f.services,
    )
    .unwrap();

    let Dashboard::Agent(view) = dashboard(&agent, &mut f.conn, &f.services).unwrap() else {
        panic!("expected the agent dashboard");
    };

    assert_eq!(view.stats.total_policies, 2);
    assert_eq!(view.stats.active_policies, 2);
    assert_eq!(view.stats.total_claims, 2);
    assert_eq!(view.stats.pending_claims, 1);
    assert_eq!(view.policies.len(), 2);
    assert_eq!(view.recent_claims.len(), 2);
}

#[test]
fn test_admin_dashboard_platform_stats() {
    let mut f = fixture();
    let admin = account(&f.conn, "root", Role::Admin);
    let dana = account(&f.conn, "dana", Role::User);
    for n in 1..=6 {
        add_policy(
            &dana,
            &policy_input(&format!("POL-5000{}", n), days_from_today(90)),
            &mut f.conn,
            &f.services,
        )
        .unwrap();
    }

    let Dashboard::Admin(view) = dashboard_on(&admin, today(), &mut f.conn, &f.services).unwrap() else {
        panic!("expected the admin dashboard");
    };

    assert_eq!(view.stats.total_users, 2);
    assert_eq!(view.stats.total_policies, 6);
    assert_eq!(view.stats.total_claims, 0);
    assert_eq!(view.recent_users.len(), 2);
    assert_eq!(view.recent_policies.len(), 5);
    assert!(view.recent_claims.is_empty());
}
