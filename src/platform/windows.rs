//! Windows: per-user URL protocol registration and native client launch.

use super::{CommandSpec, OsIntegration};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::Command;
use winreg::RegKey;
use winreg::enums::HKEY_CURRENT_USER;

pub struct WindowsIntegration;

impl WindowsIntegration {
    pub fn new() -> Result<Self> {
        Ok(Self)
    }
}

impl OsIntegration for WindowsIntegration {
    /// Writes `HKCU\Software\Classes\<scheme>` so the shell hands
    /// `scheme://...` URIs to the bootstrapper as its first argument.
    fn register_scheme(&self, scheme: &str, bootstrapper: &Path) -> Result<()> {
        let exe = bootstrapper.display().to_string();
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key_path = format!("Software\\Classes\\{scheme}");

        let (protocol, _) = hkcu
            .create_subkey(&key_path)
            .with_context(|| format!("Failed to create registry key HKCU\\{key_path}"))?;
        protocol.set_value("", &"URL:BubbaVerse Protocol".to_string())?;
        protocol.set_value("URL Protocol", &String::new())?;

        let (command, _) = protocol
            .create_subkey("shell\\open\\command")
            .context("Failed to create shell\\open\\command key")?;
        command.set_value("", &format!("\"{exe}\" \"%1\""))?;

        let (icon, _) =
            protocol.create_subkey("DefaultIcon").context("Failed to create DefaultIcon key")?;
        icon.set_value("", &format!("\"{exe}\",0"))?;
        Ok(())
    }

    fn open_url(&self, url: &str) -> Result<()> {
        Command::new("cmd")
            .args(["/c", "start", "", url])
            .spawn()
            .with_context(|| format!("Failed to open {url}"))?;
        Ok(())
    }

    fn client_command(
        &self,
        executable: &Path,
        args: Vec<OsString>,
        _compat_config: &Path,
        _default_compat: &str,
    ) -> Result<CommandSpec> {
        Ok(CommandSpec::detached(executable, args))
    }

    fn mark_executable(&self, _path: &Path) -> Result<()> {
        Ok(())
    }
}
