use ems_core::error::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExperimentError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_keep_their_message() {
        let error = ExperimentError::from(ConfigError::NoHospitals);
        assert_eq!(error.to_string(), ConfigError::NoHospitals.to_string());
    }

    #[test]
    fn io_errors_convert_with_question_mark() {
        fn read() -> Result<String, ExperimentError> {
            Ok(std::fs::read_to_string("/nonexistent/scenario.json")?)
        }
        assert!(matches!(read(), Err(ExperimentError::Io(_))));
    }
}
