//! Linux and other Unix-likes: freedesktop scheme handler, `xdg-open`, and
//! the client started through a Windows compatibility layer.

use super::{CommandSpec, OsIntegration};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

pub struct UnixIntegration {
    applications_dir: PathBuf,
    run_xdg: bool,
}

impl UnixIntegration {
    /// Uses `~/.local/share/applications` (the platform data dir).
    pub fn new() -> Result<Self> {
        let data_dir = dirs::data_dir().context("Could not determine the user data directory")?;
        Ok(Self {
            applications_dir: data_dir.join("applications"),
            run_xdg: true,
        })
    }

    /// Writes desktop entries to `dir` and never shells out to `xdg-*`.
    pub fn with_applications_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            applications_dir: dir.into(),
            run_xdg: false,
        }
    }

    pub fn desktop_entry_path(&self, scheme: &str) -> PathBuf {
        self.applications_dir.join(format!("{scheme}.desktop"))
    }
}

/// freedesktop entry that routes `scheme://` URIs to the bootstrapper.
pub fn desktop_entry(scheme: &str, bootstrapper: &Path) -> String {
    let exe = bootstrapper.display();
    format!(
        "[Desktop Entry]\n\
         Name=Bubbaverse Launcher\n\
         Exec={exe} %u\n\
         Icon={exe}\n\
         Type=Application\n\
         Terminal=true\n\
         Version={}\n\
         MimeType=x-scheme-handler/{scheme};",
        env!("CARGO_PKG_VERSION")
    )
}

/// Reads the compatibility layer binary from `config`, falling back to
/// `default`. `~` and environment variables are expanded and bare command
/// names are looked up on `PATH`.
pub fn compat_command(config: &Path, default: &str) -> PathBuf {
    let configured = std::fs::read_to_string(config)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    let command = match configured {
        Some(custom) => {
            info!("Using custom wine binary: {custom}");
            shellexpand::full(&custom).map(|s| s.into_owned()).unwrap_or(custom)
        }
        None => {
            info!("No custom wine binary specified, using default {default} command");
            info!("To use a custom wine binary, put its path in {}", config.display());
            default.to_string()
        }
    };

    let path = PathBuf::from(&command);
    if path.components().count() == 1 {
        which::which(&command).unwrap_or(path)
    } else {
        path
    }
}

impl OsIntegration for UnixIntegration {
    fn register_scheme(&self, scheme: &str, bootstrapper: &Path) -> Result<()> {
        crate::utils::fs::ensure_dir(&self.applications_dir)?;
        let entry_path = self.desktop_entry_path(scheme);
        std::fs::write(&entry_path, desktop_entry(scheme, bootstrapper))
            .with_context(|| format!("Failed to write {}", entry_path.display()))?;
        std::fs::set_permissions(&entry_path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to set permissions on {}", entry_path.display()))?;

        if self.run_xdg {
            let file_name = format!("{scheme}.desktop");
            let mime = format!("x-scheme-handler/{scheme}");
            match Command::new("xdg-mime").args(["default", &file_name, &mime]).status() {
                Ok(status) if status.success() => {}
                Ok(status) => warn!("xdg-mime exited with {status}"),
                Err(e) => warn!("Could not run xdg-mime: {e}"),
            }
        }
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        Command::new("xdg-open")
            .arg(url)
            .spawn()
            .with_context(|| format!("Failed to open {url} with xdg-open"))?;
        Ok(())
    }

    fn client_command(
        &self,
        executable: &Path,
        args: Vec<OsString>,
        compat_config: &Path,
        default_compat: &str,
    ) -> Result<CommandSpec> {
        let program = compat_command(compat_config, default_compat);
        let mut full_args = Vec::with_capacity(args.len() + 1);
        full_args.push(executable.as_os_str().to_owned());
        full_args.extend(args);
        // the compatibility layer owns the terminal session until the client exits
        Ok(CommandSpec::waited(program, full_args))
    }

    fn mark_executable(&self, path: &Path) -> Result<()> {
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to make {} executable", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_desktop_entry_content() {
        let entry = desktop_entry("bubba-player", Path::new("/opt/launcher"));
        assert!(entry.starts_with("[Desktop Entry]\n"));
        assert!(entry.contains("Exec=/opt/launcher %u\n"));
        assert!(entry.ends_with("MimeType=x-scheme-handler/bubba-player;"));
    }

    #[test]
    fn test_register_scheme_writes_executable_entry() {
        let temp = TempDir::new().unwrap();
        let integration = UnixIntegration::with_applications_dir(temp.path().join("apps"));
        integration.register_scheme("bubba-player", Path::new("/opt/launcher")).unwrap();

        let path = integration.desktop_entry_path("bubba-player");
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
        assert!(std::fs::read_to_string(&path).unwrap().contains("Exec=/opt/launcher %u"));
    }

    #[test]
    fn test_compat_command_default_when_file_missing() {
        let temp = TempDir::new().unwrap();
        let command = compat_command(&temp.path().join("winepath.txt"), "wine");
        assert_eq!(command.file_name().unwrap(), "wine");
    }

    #[test]
    fn test_compat_command_reads_trimmed_path() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("winepath.txt");
        std::fs::write(&config, "  /opt/wine-ge/bin/wine64 \n").unwrap();
        assert_eq!(compat_command(&config, "wine"), PathBuf::from("/opt/wine-ge/bin/wine64"));
    }

    #[test]
    fn test_compat_command_blank_file_uses_default() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("winepath.txt");
        std::fs::write(&config, "\n  \n").unwrap();
        assert_eq!(compat_command(&config, "wine").file_name().unwrap(), "wine");
    }

    #[test]
    fn test_client_command_prefixes_executable() {
        let temp = TempDir::new().unwrap();
        let config = temp.path().join("winepath.txt");
        std::fs::write(&config, "/opt/wine/bin/wine").unwrap();

        let integration = UnixIntegration::with_applications_dir(temp.path());
        let spec = integration
            .client_command(Path::new("/c/Client.exe"), vec!["--play".into()], &config, "wine")
            .unwrap();
        assert_eq!(spec.program, PathBuf::from("/opt/wine/bin/wine"));
        assert_eq!(spec.args, vec![OsString::from("/c/Client.exe"), OsString::from("--play")]);
        assert!(spec.wait);
    }

    #[test]
    fn test_mark_executable() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bin");
        std::fs::write(&path, b"x").unwrap();
        UnixIntegration::with_applications_dir(temp.path()).mark_executable(&path).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }
}
