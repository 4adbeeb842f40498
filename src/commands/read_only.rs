use crate::core::registry::{set_read_only_policy, RegistryAccess};
use crate::error::Result;

pub fn configure_read_only_mode<R: RegistryAccess>(registry: &R) -> Result<()> {
    println!("Configuring Acrobat read-only mode");
    set_read_only_policy(registry)?;
    println!("Registry values set successfully to configure Acrobat in read-only mode.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::fixture::MemoryRegistry;
    use crate::core::registry::{
        CIPM_KEY, FEATURE_LOCKDOWN_KEY, REDUCED_MODE_VALUE, VIEWING_MESSAGE_VALUE,
    };
    use crate::error::InstallerError;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configure_is_idempotent() {
        let registry = MemoryRegistry::new();
        configure_read_only_mode(&registry).unwrap();
        configure_read_only_mode(&registry).unwrap();

        assert_eq!(registry.dword(FEATURE_LOCKDOWN_KEY, REDUCED_MODE_VALUE), Some(1));
        assert_eq!(registry.dword(CIPM_KEY, VIEWING_MESSAGE_VALUE), Some(0));
    }

    #[test]
    fn test_configure_reports_denied_key() {
        let registry = MemoryRegistry::new();
        registry.deny_create(FEATURE_LOCKDOWN_KEY);

        let err = configure_read_only_mode(&registry).unwrap_err();
        assert!(matches!(err, InstallerError::Registry { .. }));
        assert_eq!(registry.dword(CIPM_KEY, VIEWING_MESSAGE_VALUE), None);
    }
}
