use studystreak_domain::shared::DomainError;

/// Maps foreign errors into `DomainError` by their display text.
pub trait ResultExt<T> {
    fn to_repo_err(self) -> Result<T, DomainError>;
    fn to_infra_err(self) -> Result<T, DomainError>;
}

impl<T, E: std::fmt::Display> ResultExt<T> for Result<T, E> {
    fn to_repo_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Repository(e.to_string()))
    }

    fn to_infra_err(self) -> Result<T, DomainError> {
        self.map_err(|e| DomainError::Infrastructure(e.to_string()))
    }
}
