mod app_error;

pub use app_error::{AppError, FieldErrors, SERVER_ERROR_DETAIL};
