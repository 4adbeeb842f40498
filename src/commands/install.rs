use crate::core::{
    config::Config,
    download::{Downloader, Transport},
    extract::extract_zip,
    installer::InstallRunner,
    registry::{find_installed_product, RegistryAccess},
};
use crate::error::{InstallerError, Result};
use crate::utils::fs;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// Matching uninstall entries were found before anything was downloaded.
    AlreadyInstalled(Vec<String>),
    Installed,
}

pub struct InstallWorkflow<'a, R, T, I> {
    config: &'a Config,
    registry: &'a R,
    downloader: &'a Downloader<T>,
    installer: &'a I,
    sleep: Box<dyn Fn(Duration) + 'a>,
}

impl<'a, R, T, I> InstallWorkflow<'a, R, T, I>
where
    R: RegistryAccess,
    T: Transport,
    I: InstallRunner,
{
    pub fn new(
        config: &'a Config,
        registry: &'a R,
        downloader: &'a Downloader<T>,
        installer: &'a I,
    ) -> Self {
        Self {
            config,
            registry,
            downloader,
            installer,
            sleep: Box::new(std::thread::sleep),
        }
    }

    pub fn with_sleep(mut self, sleep: impl Fn(Duration) + 'a) -> Self {
        self.sleep = Box::new(sleep);
        self
    }

    pub fn run(&self) -> Result<InstallOutcome> {
        let config = self.config;
        let product = &config.product_name;

        let existing = find_installed_product(self.registry, product, false)?;
        if !existing.is_empty() {
            println!("{product} already installed. Nothing to do.");
            for entry in &existing {
                log::debug!("Found installed entry: {entry}");
            }
            return Ok(InstallOutcome::AlreadyInstalled(existing));
        }

        println!("{product} install not detected, moving to install step");

        let archive_path = config.get_archive_path();
        self.downloader.download_file(
            &config.download_url,
            &archive_path,
            config.download_attempts,
            false,
        )?;

        if !archive_path.exists() {
            return Err(InstallerError::verification(format!(
                "download file not found at {}",
                archive_path.display()
            )));
        }

        extract_zip(&archive_path, &config.temp_dir)?;

        let installer_path = config.get_installer_path();
        if !installer_path.exists() {
            return Err(InstallerError::verification(format!(
                "could not find extracted installer at {}",
                installer_path.display()
            )));
        }

        // Give on-access scanners time to release the freshly written files.
        let settle = Duration::from_secs(config.settle_delay_secs);
        println!("Waiting {} seconds", settle.as_secs());
        (self.sleep)(settle);

        println!("Running install step");
        let log_path = config.get_log_path();
        self.installer.run_silent_install(&installer_path, &log_path)?;

        let installed = find_installed_product(self.registry, product, false).unwrap_or_else(|e| {
            log::warn!("Could not re-read uninstall entries: {e}");
            Vec::new()
        });
        if installed.is_empty() {
            return Err(InstallerError::verification(format!(
                "{product} failed to install successfully. Please see the logfile at {}",
                log_path.display()
            )));
        }

        println!("✅ {product} installed successfully.");

        fs::remove_dir_best_effort(&config.get_extract_dir());
        fs::remove_file_best_effort(&archive_path);

        Ok(InstallOutcome::Installed)
    }
}
