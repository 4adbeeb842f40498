//! Registry access for install detection and the Acrobat lockdown policy.
//!
//! All paths are relative to `HKEY_LOCAL_MACHINE`. The policy key names and
//! DWORD value names are read by Acrobat itself and must match exactly.

use crate::error::{InstallerError, Result};
use std::io;

pub const UNINSTALL_ROOTS: [&str; 2] = [
    r"SOFTWARE\Wow6432Node\Microsoft\Windows\CurrentVersion\Uninstall",
    r"SOFTWARE\Microsoft\Windows\CurrentVersion\Uninstall",
];

pub const FEATURE_LOCKDOWN_KEY: &str = r"SOFTWARE\Policies\Adobe\Adobe Acrobat\DC\FeatureLockDown";
pub const CIPM_KEY: &str = r"SOFTWARE\Policies\Adobe\Adobe Acrobat\DC\FeatureLockDown\cIPM";

pub const REDUCED_MODE_VALUE: &str = "bIsSCReducedModeEnforcedEx";
pub const VIEWING_MESSAGE_VALUE: &str = "bDontShowMsgWhenViewingDoc";

const DISPLAY_NAME: &str = "DisplayName";
const UNINSTALL_STRING: &str = "UninstallString";

/// Minimal view of the registry the installer needs.
pub trait RegistryAccess {
    type Key;

    /// Opens an existing key for querying values and enumerating subkeys.
    fn open_key(&self, path: &str) -> io::Result<Self::Key>;
    fn open_subkey(&self, parent: &Self::Key, name: &str) -> io::Result<Self::Key>;
    fn enumerate_subkey_names(&self, key: &Self::Key) -> io::Result<Vec<String>>;
    fn read_string_value(&self, key: &Self::Key, name: &str) -> io::Result<String>;
    /// Creates the key, or opens it if it already exists, with write access.
    fn create_key(&self, path: &str) -> io::Result<Self::Key>;
    /// Writes a REG_DWORD value.
    fn set_int_value(&self, key: &Self::Key, name: &str, value: u32) -> io::Result<()>;
}

/// Puts Acrobat into the reduced (read-only viewing) mode via policy keys.
///
/// Values already written stay in place if a later step fails.
pub fn set_read_only_policy<R: RegistryAccess>(registry: &R) -> Result<()> {
    let base = registry.create_key(FEATURE_LOCKDOWN_KEY).map_err(|e| {
        InstallerError::registry("failed to open or create FeatureLockDown key", e)
    })?;
    registry
        .set_int_value(&base, REDUCED_MODE_VALUE, 1)
        .map_err(|e| InstallerError::registry(format!("failed to set {REDUCED_MODE_VALUE}"), e))?;

    let cipm = registry
        .create_key(CIPM_KEY)
        .map_err(|e| InstallerError::registry("failed to open or create cIPM key", e))?;
    registry.set_int_value(&cipm, VIEWING_MESSAGE_VALUE, 0).map_err(|e| {
        InstallerError::registry(format!("failed to set {VIEWING_MESSAGE_VALUE}"), e)
    })?;

    log::info!("Read-only mode policy values written");
    Ok(())
}

/// Scans the uninstall roots for entries whose display name contains `name`.
///
/// Returns the matching display names, or their uninstall commands when
/// `want_command` is set. Subkeys that cannot be read are skipped.
pub fn find_installed_product<R: RegistryAccess>(
    registry: &R,
    name: &str,
    want_command: bool,
) -> Result<Vec<String>> {
    let mut found = Vec::new();

    for root_path in UNINSTALL_ROOTS {
        let root = registry
            .open_key(root_path)
            .map_err(|e| InstallerError::registry(format!("failed to open {root_path}"), e))?;
        let names = registry.enumerate_subkey_names(&root).map_err(|e| {
            InstallerError::registry(format!("failed to enumerate {root_path}"), e)
        })?;

        for subkey_name in names {
            let Ok(subkey) = registry.open_subkey(&root, &subkey_name) else {
                log::trace!("Skipping unreadable uninstall entry {subkey_name}");
                continue;
            };
            let Ok(display_name) = registry.read_string_value(&subkey, DISPLAY_NAME) else {
                continue;
            };
            if !display_name.contains(name) {
                continue;
            }

            log::debug!("Matched uninstall entry {subkey_name}: {display_name}");
            if want_command {
                match registry.read_string_value(&subkey, UNINSTALL_STRING) {
                    Ok(command) => found.push(command),
                    Err(_) => log::debug!("{subkey_name} has no {UNINSTALL_STRING}"),
                }
            } else {
                found.push(display_name);
            }
        }
    }

    Ok(found)
}

/// The machine registry.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRegistry;

#[cfg(windows)]
impl RegistryAccess for SystemRegistry {
    type Key = winreg::RegKey;

    fn open_key(&self, path: &str) -> io::Result<Self::Key> {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_ENUMERATE_SUB_KEYS, KEY_QUERY_VALUE};
        winreg::RegKey::predef(HKEY_LOCAL_MACHINE)
            .open_subkey_with_flags(path, KEY_QUERY_VALUE | KEY_ENUMERATE_SUB_KEYS)
    }

    fn open_subkey(&self, parent: &Self::Key, name: &str) -> io::Result<Self::Key> {
        parent.open_subkey_with_flags(name, winreg::enums::KEY_QUERY_VALUE)
    }

    fn enumerate_subkey_names(&self, key: &Self::Key) -> io::Result<Vec<String>> {
        key.enum_keys().collect()
    }

    fn read_string_value(&self, key: &Self::Key, name: &str) -> io::Result<String> {
        key.get_value::<String, _>(name)
    }

    fn create_key(&self, path: &str) -> io::Result<Self::Key> {
        use winreg::enums::{HKEY_LOCAL_MACHINE, KEY_SET_VALUE};
        let (key, _disposition) = winreg::RegKey::predef(HKEY_LOCAL_MACHINE)
            .create_subkey_with_flags(path, KEY_SET_VALUE)?;
        Ok(key)
    }

    fn set_int_value(&self, key: &Self::Key, name: &str, value: u32) -> io::Result<()> {
        key.set_value(name, &value)
    }
}

#[cfg(not(windows))]
impl RegistryAccess for SystemRegistry {
    type Key = ();

    fn open_key(&self, _path: &str) -> io::Result<Self::Key> {
        Err(unsupported())
    }

    fn open_subkey(&self, _parent: &Self::Key, _name: &str) -> io::Result<Self::Key> {
        Err(unsupported())
    }

    fn enumerate_subkey_names(&self, _key: &Self::Key) -> io::Result<Vec<String>> {
        Err(unsupported())
    }

    fn read_string_value(&self, _key: &Self::Key, _name: &str) -> io::Result<String> {
        Err(unsupported())
    }

    fn create_key(&self, _path: &str) -> io::Result<Self::Key> {
        Err(unsupported())
    }

    fn set_int_value(&self, _key: &Self::Key, _name: &str, _value: u32) -> io::Result<()> {
        Err(unsupported())
    }
}

#[cfg(not(windows))]
fn unsupported() -> io::Error {
    io::Error::new(
        io::ErrorKind::Unsupported,
        "the Windows registry is not available on this platform",
    )
}
