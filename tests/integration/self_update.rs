use crate::common::{BOOTSTRAPPER_BYTES, TestSite, version};
use bubbaverse_launcher::bootstrap::Outcome;
use bubbaverse_launcher::core::LauncherError;
use bubbaverse_launcher::test_utils::{RecordingSpawner, TEST_ENDPOINTS};
use std::ffi::OsString;

#[tokio::test]
async fn test_stale_launcher_hands_off_once_and_does_nothing_else() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(b"launcher from last month");
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    let args = vec![
        OsString::from("bubba-player://launchmode:play+gameinfo:T"),
        OsString::from("--verbose"),
    ];

    let outcome = launcher.run(&exe, Some("ignored here"), &args).await.unwrap();

    assert_eq!(outcome, Outcome::HandedOff);
    assert_eq!(outcome.exit_code(), 0);
    let spawned = launcher.spawner().spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(spawned[0].program, launcher.store().bootstrapper_path(&version("42")));
    assert_eq!(spawned[0].args, args);
    assert!(!launcher.store().is_installed(&version("42")));
    assert!(launcher.integration().opened().is_empty());
}

#[tokio::test]
async fn test_newer_running_binary_still_hands_off() {
    let site = TestSite::new().publish_on_primary("42");
    let mut newer = BOOTSTRAPPER_BYTES.to_vec();
    newer.extend_from_slice(b" + local patch");
    let exe = site.running_exe(&newer);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    assert_eq!(launcher.run(&exe, None, &[]).await.unwrap(), Outcome::HandedOff);
}

#[tokio::test]
async fn test_handed_off_bootstrapper_continues_in_process() {
    let site = TestSite::new().publish_on_primary("42");
    let stale = site.running_exe(b"stale");
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    launcher.run(&stale, None, &[]).await.unwrap();

    // second process: the stored bootstrapper itself
    let stored = launcher.store().bootstrapper_path(&version("42"));
    let outcome = launcher.run(&stored, None, &[]).await.unwrap();

    assert_eq!(outcome, Outcome::WebsiteOpened);
    assert_eq!(launcher.spawner().spawn_count(), 1);
}

#[tokio::test]
async fn test_corrupt_stored_bootstrapper_is_redownloaded_once() {
    let site = TestSite::new().publish_on_primary("42");
    let store = site.store();
    let v42 = version("42");
    store.ensure_layout(&v42).unwrap();
    std::fs::write(store.bootstrapper_path(&v42), b"truncated").unwrap();
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::failing(1));

    let outcome = launcher.run(&exe, None, &[]).await.unwrap();

    assert_eq!(outcome, Outcome::HandedOff);
    assert_eq!(launcher.spawner().spawn_count(), 2);
    assert_eq!(std::fs::read(store.bootstrapper_path(&v42)).unwrap(), BOOTSTRAPPER_BYTES);
    let bootstrapper_url =
        format!("{}/42-{}", TEST_ENDPOINTS[0], launcher.config().bootstrapper_filename);
    assert_eq!(
        launcher.transport().requests().iter().filter(|url| **url == bootstrapper_url).count(),
        1
    );
}

#[tokio::test]
async fn test_handoff_gives_up_after_one_retry() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(b"stale");
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::failing(usize::MAX));

    let err = launcher.run(&exe, None, &[]).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LauncherError>(),
        Some(LauncherError::HandoffFailed { .. })
    ));
    assert_eq!(launcher.spawner().spawn_count(), 2);
}
