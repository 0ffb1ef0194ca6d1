use crate::common::{BOOTSTRAPPER_BYTES, TestSite, version};
use bubbaverse_launcher::bootstrap::Outcome;
use bubbaverse_launcher::core::LauncherError;
use bubbaverse_launcher::test_utils::{RecordingSpawner, TEST_ENDPOINTS};

#[tokio::test]
async fn test_downloads_come_from_the_answering_endpoint() {
    let site = TestSite::new().publish(TEST_ENDPOINTS[1], "42");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    let outcome = launcher
        .run(&exe, Some("bubba-player://launchmode:play+gameinfo:T"), &[])
        .await
        .unwrap();

    assert_eq!(outcome, Outcome::Launched);
    let requests = launcher.transport().requests();
    assert_eq!(requests[0], format!("{}/version", TEST_ENDPOINTS[0]));
    assert_eq!(requests[1], format!("{}/version", TEST_ENDPOINTS[1]));
    assert!(requests[2..].iter().all(|url| url.starts_with(TEST_ENDPOINTS[1])));
    assert!(launcher.store().is_installed(&version("42")));
}

#[tokio::test]
async fn test_unusable_token_moves_to_next_endpoint() {
    let site = TestSite::new().publish(TEST_ENDPOINTS[2], "42");
    site.transport.set_text(format!("{}/version", TEST_ENDPOINTS[0]), "-.-");
    site.transport.set_text(format!("{}/version", TEST_ENDPOINTS[1]), "  \n");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    let outcome = launcher.run(&exe, None, &[]).await.unwrap();

    assert_eq!(outcome, Outcome::WebsiteOpened);
    let versions: Vec<_> = std::fs::read_dir(launcher.store().versions_dir())
        .unwrap()
        .map(|entry| entry.unwrap().file_name())
        .collect();
    assert_eq!(versions, ["42"]);
}

#[tokio::test]
async fn test_all_endpoints_down_is_connectivity_error() {
    let site = TestSite::new();
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let root = site.install_root();
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    let err = launcher.run(&exe, None, &[]).await.unwrap_err();

    assert!(matches!(
        err.downcast_ref::<LauncherError>(),
        Some(LauncherError::Connectivity { attempted: 3 })
    ));
    assert_eq!(launcher.transport().request_count(), TEST_ENDPOINTS.len());
    assert!(!root.exists());
}
