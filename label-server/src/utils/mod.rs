pub mod error;
pub mod logger;

pub use error::{AppError, AppResponse, ok};
pub use logger::{init_logger, init_logger_with_file};
