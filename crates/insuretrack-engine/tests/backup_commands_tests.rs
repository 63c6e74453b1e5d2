mod common;

use common::*;
use insuretrack_core::errors::ExErrorKind;
use insuretrack_core::model::Role;
use insuretrack_engine::commands::backup::{create_backup, list_backups, restore_backup};
use insuretrack_engine::commands::policies::{add_policy, delete_policy};
use insuretrack_store::repo::PolicyRepo;

#[test]
fn test_backup_commands_are_admin_only() {
    let mut f = fixture();
    for role in [Role::User, Role::Agent] {
        let actor = account(&f.conn, &format!("{}-1", role), role);

        let err = create_backup(&actor, &mut f.conn, &f.services).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Forbidden);
        let err = restore_backup(&actor, None, &mut f.conn, &f.services).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Forbidden);
        let err = list_backups(&actor, &f.services).unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::Forbidden);
    }
    assert!(!f.services.backups.backup_dir().exists());
}

#[test]
fn test_admin_backup_and_restore_undoes_delete() {
    let mut f = fixture();
    let admin = account(&f.conn, "root", Role::Admin);
    let dana = account(&f.conn, "dana", Role::User);
    let policy = add_policy(&dana, &policy_input("POL-60001", date(2030, 1, 1)), &mut f.conn, &f.services)
        .unwrap();

    let outcome = create_backup(&admin, &mut f.conn, &f.services).unwrap();
    assert_eq!(outcome.counts.users, 2);
    assert_eq!(outcome.counts.policies, 1);

    delete_policy(&dana, policy.id, &mut f.conn, &f.services).unwrap();
    assert!(PolicyRepo::get(&f.conn, policy.id).unwrap().is_none());

    let restored = restore_backup(&admin, None, &mut f.conn, &f.services).unwrap();
    assert_eq!(restored.timestamp, outcome.timestamp);
    assert_eq!(PolicyRepo::get(&f.conn, policy.id).unwrap(), Some(policy));

    let listed = list_backups(&admin, &f.services).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].path, outcome.path);
}

#[test]
fn test_restore_without_any_backup_is_not_found() {
    let mut f = fixture();
    let admin = account(&f.conn, "root", Role::Admin);

    let err = restore_backup(&admin, None, &mut f.conn, &f.services).unwrap_err();

    assert_eq!(err.kind(), ExErrorKind::NotFound);
    assert!(PolicyRepo::all(&f.conn).unwrap().is_empty());
}
