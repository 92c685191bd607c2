use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Constraint(#[from] rusqlite::Error),

    #[error("Malformed import: {0}")]
    Format(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("PDF error: {0}")]
    Pdf(String),

    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Settings error: {0}")]
    Settings(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        if !err.is_io_error() {
            return AppError::Format(err.to_string());
        }
        match err.into_kind() {
            csv::ErrorKind::Io(e) => AppError::Io(e),
            other => AppError::Format(format!("{other:?}")),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_io_error_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: AppError = csv::Error::from(io).into();
        assert!(matches!(err, AppError::Io(_)));
    }

    #[test]
    fn test_messages_name_the_cause() {
        let err = AppError::UnsupportedFormat(".txt".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: .txt");
        let err = AppError::NotFound("apartment B7".to_string());
        assert_eq!(err.to_string(), "Not found: apartment B7");
    }
}
