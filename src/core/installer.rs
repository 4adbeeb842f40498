use crate::error::{InstallerError, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

pub trait InstallRunner {
    /// Runs the package installer unattended, blocking until it exits.
    fn run_silent_install(&self, installer: &Path, log_path: &Path) -> Result<()>;
}

/// Windows Installer (`msiexec`) in quiet mode.
pub struct MsiInstaller {
    program: PathBuf,
}

impl Default for MsiInstaller {
    fn default() -> Self {
        let program = which::which("msiexec.exe").unwrap_or_else(|_| PathBuf::from("msiexec.exe"));
        Self { program }
    }
}

impl MsiInstaller {
    #[cfg(test)]
    pub(crate) fn with_program<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// `/i <msi> /quiet /norestart /L*V <log>`
    fn silent_args(installer: &Path, log_path: &Path) -> Vec<OsString> {
        vec![
            "/i".into(),
            installer.as_os_str().to_owned(),
            "/quiet".into(),
            "/norestart".into(),
            "/L*V".into(),
            log_path.as_os_str().to_owned(),
        ]
    }
}

impl InstallRunner for MsiInstaller {
    fn run_silent_install(&self, installer: &Path, log_path: &Path) -> Result<()> {
        log::debug!(
            "Running {} for {}",
            self.program.display(),
            installer.display()
        );

        let mut command = Command::new(&self.program);
        command.args(Self::silent_args(installer, log_path));

        #[cfg(windows)]
        {
            use std::os::windows::process::CommandExt;
            command.creation_flags(CREATE_NO_WINDOW);
        }

        let status = command
            .status()
            .map_err(|source| InstallerError::InstallerNotStarted {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(InstallerError::Install {
                code: status.code(),
                log_path: log_path.to_path_buf(),
            });
        }

        Ok(())
    }
}
