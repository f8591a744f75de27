//! Integration tests for the persisted session: login, restart, logout.
//!
//! Each test works in its own temp directory so runs never share state.

use homefeed::session::{CurrentUser, InfluencerProfile, Session};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

fn temp_session_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "homefeed-session-{}-{}",
        name,
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir.join("session.json")
}

#[test]
fn test_login_survives_restart() {
    let path = temp_session_path("restart");
    let mut user = CurrentUser::new("u1");
    user.username = Some("mina".into());
    user.follow = vec!["u2".into()];
    user.influencer = Some(InfluencerProfile {
        id: Some(3),
        banner_picture: Some("b.png".into()),
    });

    let mut session = Session::hydrate(&path);
    assert!(!session.is_logged_in());
    session.set_user(Some(user.clone())).unwrap();

    let restored = Session::hydrate(&path);
    assert_eq!(restored.user(), Some(&user));
    assert!(restored.user().unwrap().is_influencer());
}

#[test]
fn test_logout_persists() {
    let path = temp_session_path("logout");
    let mut session = Session::hydrate(&path);
    session.set_user(Some(CurrentUser::new("u1"))).unwrap();
    session.set_user(None).unwrap();

    assert!(!Session::hydrate(&path).is_logged_in());
}

#[test]
fn test_corrupt_file_reads_as_logged_out() {
    let path = temp_session_path("corrupt");
    std::fs::write(&path, b"{ not json").unwrap();

    let mut session = Session::hydrate(&path);
    assert!(!session.is_logged_in());

    // the next login overwrites the broken file
    session.set_user(Some(CurrentUser::new("u9"))).unwrap();
    assert_eq!(Session::hydrate(&path).user_id(), Some("u9"));
}

#[test]
fn test_revision_tracks_changes() {
    let path = temp_session_path("revision");
    let mut session = Session::hydrate(&path);
    let start = session.revision();

    session.set_user(Some(CurrentUser::new("u1"))).unwrap();
    session.set_user(None).unwrap();

    assert_eq!(session.revision(), start + 2);
}
