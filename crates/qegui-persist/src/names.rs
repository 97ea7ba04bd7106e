//! Configuration names with special meaning.

use qegui_common::StoreError;

/// Root element name of the store file and of the application record.
pub const ROOT_NAME: &str = "QEGui";

/// Configuration saved and restored when the user gives no name.
pub const DEFAULT_NAME: &str = "Default";

/// Written periodically while the host runs; removed on clean exit.
pub const AUTOSAVE_NAME: &str = "AutoSave";

/// Written on clean exit.
pub const EXIT_SAVE_NAME: &str = "ExitSave";

pub fn is_reserved(name: &str) -> bool {
    name == AUTOSAVE_NAME || name == EXIT_SAVE_NAME
}

/// Check a name the user typed before saving under it.
pub fn validate_user_config_name(name: &str) -> Result<(), StoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(StoreError::EmptyName);
    }
    if is_reserved(trimmed) {
        return Err(StoreError::ReservedName(trimmed.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_are_rejected() {
        assert!(matches!(
            validate_user_config_name("AutoSave"),
            Err(StoreError::ReservedName(_))
        ));
        assert!(matches!(
            validate_user_config_name(" ExitSave "),
            Err(StoreError::ReservedName(_))
        ));
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(matches!(
            validate_user_config_name("   "),
            Err(StoreError::EmptyName)
        ));
    }

    #[test]
    fn default_and_user_names_are_accepted() {
        assert!(validate_user_config_name(DEFAULT_NAME).is_ok());
        assert!(validate_user_config_name("Night shift").is_ok());
    }
}
