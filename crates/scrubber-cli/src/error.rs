use anyhow::Error;
use scrubber_config::ConfigError;
use scrubber_core::CoreError;
use scrubber_io::IoError;
use std::process::ExitCode;
use thiserror::Error as ThisError;

pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INVALID_INPUT: u8 = 3;
pub const EXIT_UPLOAD_FAILED: u8 = 4;

#[derive(Debug, ThisError)]
pub enum CliError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{failed} of {total} uploads failed; local output was saved")]
    UploadFailed { failed: usize, total: usize },
}

pub fn invalid_input(message: impl Into<String>) -> Error {
    CliError::InvalidInput(message.into()).into()
}

pub fn report_error(err: &Error, verbose: bool) {
    if verbose {
        eprintln!("error: {:#}", err);
    } else {
        eprintln!("error: {}", err);
    }
}

pub fn exit_code_for(err: &Error) -> ExitCode {
    for cause in err.chain() {
        if let Some(cli_err) = cause.downcast_ref::<CliError>() {
            return ExitCode::from(match cli_err {
                CliError::InvalidInput(_) => EXIT_INVALID_INPUT,
                CliError::UploadFailed { .. } => EXIT_UPLOAD_FAILED,
            });
        }
        if let Some(config_err) = cause.downcast_ref::<ConfigError>() {
            return ExitCode::from(config_exit_code(config_err));
        }
        if let Some(io_err) = cause.downcast_ref::<IoError>() {
            return ExitCode::from(io_exit_code(io_err));
        }
        if let Some(_core_err) = cause.downcast_ref::<CoreError>() {
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    }
    ExitCode::from(EXIT_FAILURE)
}

fn config_exit_code(err: &ConfigError) -> u8 {
    match err {
        ConfigError::MissingHomeDir => EXIT_FAILURE,
        ConfigError::InvalidConfigPath(_)
        | ConfigError::MissingConfigFile(_)
        | ConfigError::InsecurePermissions(_)
        | ConfigError::InvalidMinPhoneDigits(_)
        | ConfigError::InvalidPhoneKeywords
        | ConfigError::InvalidField { .. }
        | ConfigError::InvalidCondition(_)
        | ConfigError::MissingUploadField { .. }
        | ConfigError::Read { .. }
        | ConfigError::Parse { .. } => EXIT_INVALID_INPUT,
    }
}

fn io_exit_code(err: &IoError) -> u8 {
    match err {
        IoError::Io(_) | IoError::Zip(_) => EXIT_FAILURE,
        IoError::Core(_) | IoError::Csv(_) => EXIT_INVALID_INPUT,
        IoError::InvalidTarget(_) | IoError::Unavailable(_) => EXIT_INVALID_INPUT,
        #[cfg(feature = "dav-upload")]
        IoError::Http(_) => EXIT_FAILURE,
        #[cfg(feature = "dav-upload")]
        IoError::Url(_) => EXIT_INVALID_INPUT,
    }
}
