use crate::common::{BOOTSTRAPPER_BYTES, TestSite, version};
use bubbaverse_launcher::bootstrap::Outcome;
use bubbaverse_launcher::core::LauncherError;
use bubbaverse_launcher::installer::sentinel::render_sentinel;
use bubbaverse_launcher::test_utils::{RecordingSpawner, TEST_ENDPOINTS};
use std::ffi::OsString;

const PLAY: &str = "bubba-player://launchmode:play+gameinfo:ABC+placelauncherurl:http://x";

#[tokio::test]
async fn test_fresh_install_of_version_42() {
    let site = TestSite::new().publish_on_primary("42");
    let store = site.store();
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let old = store.versions_dir().join("41");
    std::fs::create_dir_all(old.join("Client2021")).unwrap();

    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    let outcome = launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    assert_eq!(outcome, Outcome::Launched);
    let v42 = version("42");
    assert!(store.version_dir(&v42).ends_with("Versions/42"));
    assert_eq!(std::fs::read(store.bootstrapper_path(&v42)).unwrap(), BOOTSTRAPPER_BYTES);
    assert!(store.client_executable_path(&v42).is_file());
    assert_eq!(
        std::fs::read_to_string(store.sentinel_path(&v42)).unwrap(),
        render_sentinel("www.boblox.org")
    );
    assert!(!old.exists());
    assert!(!store.downloads_dir().exists());

    let spawned = launcher.spawner().spawned();
    assert_eq!(spawned.len(), 1);
    assert_eq!(
        spawned[0].args,
        [
            "--play",
            "--authenticationUrl",
            "https://www.boblox.org/Login/Negotiate.ashx",
            "--authenticationTicket",
            "ABC",
            "--joinScriptUrl",
            "http://x",
        ]
        .map(OsString::from)
    );
    assert_eq!(
        launcher.integration().registered(),
        vec![("bubba-player".to_string(), store.bootstrapper_path(&v42))]
    );
}

#[tokio::test]
async fn test_version_directory_is_sanitized_but_urls_are_raw() {
    let site = TestSite::new().publish_on_primary("v1.2-beta");
    let store = site.store();
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);

    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    assert!(store.versions_dir().join("v12beta").is_dir());
    assert!(!store.versions_dir().join("v1.2-beta").exists());
    let requests = launcher.transport().requests();
    assert!(requests.iter().skip(1).all(|url| url.contains("/v1.2-beta-")));
    assert_eq!(requests.len(), 3);
}

#[tokio::test]
async fn test_installed_version_makes_no_downloads() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    let payload = launcher.store().payload_dir(&version("42"));
    let marker = payload.join("user-settings.ini");
    std::fs::write(&marker, b"volume=3").unwrap();
    launcher.transport().clear_requests();

    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    assert_eq!(launcher.transport().requests(), vec![format!("{}/version", TEST_ENDPOINTS[0])]);
    assert_eq!(std::fs::read(&marker).unwrap(), b"volume=3");
}

#[tokio::test]
async fn test_interrupted_install_is_redone_from_clean_directory() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    // simulate a crash halfway through extraction
    let store = launcher.store();
    let v42 = version("42");
    std::fs::remove_file(store.sentinel_path(&v42)).unwrap();
    std::fs::remove_file(store.client_executable_path(&v42)).unwrap();
    std::fs::write(store.payload_dir(&v42).join("partial.tmp"), b"half").unwrap();

    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    assert!(store.is_installed(&v42));
    assert!(store.client_executable_path(&v42).is_file());
    assert!(!store.payload_dir(&v42).join("partial.tmp").exists());
}

#[tokio::test]
async fn test_missing_client_forces_reinstall_on_next_run() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());
    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();

    let store = launcher.store();
    let v42 = version("42");
    std::fs::remove_file(store.client_executable_path(&v42)).unwrap();

    let err = launcher.run(&exe, Some(PLAY), &[]).await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LauncherError>(),
        Some(LauncherError::MissingExecutable { .. })
    ));
    assert!(!store.is_installed(&v42));

    launcher.run(&exe, Some(PLAY), &[]).await.unwrap();
    assert!(store.client_executable_path(&v42).is_file());
    assert_eq!(launcher.spawner().spawn_count(), 2);
}

#[tokio::test]
async fn test_no_activation_only_resolves_and_checks_bootstrapper() {
    let site = TestSite::new().publish_on_primary("42");
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    let outcome = launcher.run(&exe, None, &[]).await.unwrap();

    assert_eq!(outcome, Outcome::WebsiteOpened);
    assert_eq!(launcher.integration().opened(), vec!["https://www.boblox.org/games"]);
    assert!(launcher.integration().registered().is_empty());
    assert!(!launcher.store().is_installed(&version("42")));
    assert_eq!(launcher.spawner().spawn_count(), 0);
}

#[tokio::test]
async fn test_corrupt_archive_is_retried_next_run() {
    let site = TestSite::new().publish_on_primary("42");
    let archive_url = format!("{}/42-{}", TEST_ENDPOINTS[0], site.config.client_archive_suffix);
    let good_archive = bubbaverse_launcher::test_utils::client_archive(&site.config);
    site.transport.set_file(archive_url.clone(), b"PK\x03\x04 truncated".to_vec());
    let exe = site.running_exe(BOOTSTRAPPER_BYTES);
    let (launcher, _temp) = site.bootstrapper(RecordingSpawner::new());

    let err = launcher.run(&exe, Some(PLAY), &[]).await.unwrap_err();
    assert!(matches!(err.downcast_ref::<LauncherError>(), Some(LauncherError::Archive { .. })));
    assert!(!launcher.store().is_installed(&version("42")));
    assert_eq!(launcher.spawner().spawn_count(), 0);

    launcher.transport().set_file(archive_url, good_archive);
    assert_eq!(launcher.run(&exe, Some(PLAY), &[]).await.unwrap(), Outcome::Launched);
}
