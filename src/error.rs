// SPDX-License-Identifier: MPL-2.0
use crate::application::port::HostError;
use std::fmt;

#[derive(Debug, Clone)]
pub enum Error {
    Io(String),
    Config(String),
    Http(String),
    Host(HostError),
}

impl Error {
    /// Returns the i18n message key used when this error reaches the status line.
    pub fn i18n_key(&self) -> &'static str {
        match self {
            Error::Io(_) => "error-io",
            Error::Config(_) => "error-config",
            Error::Http(_) | Error::Host(_) => "error-network",
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O Error: {}", e),
            Error::Config(e) => write!(f, "Config Error: {}", e),
            Error::Http(e) => write!(f, "HTTP Error: {}", e),
            Error::Host(e) => write!(f, "Host Error: {}", e),
        }
    }
}

impl std::error::Error for Error {}

impl From<HostError> for Error {
    fn from(err: HostError) -> Self {
        Error::Host(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_io_error() {
        let err = Error::Io("disk failure".to_string());
        assert_eq!(format!("{}", err), "I/O Error: disk failure");
    }

    #[test]
    fn from_io_error_produces_io_variant() {
        let io_error = std::io::Error::other("boom");
        let err: Error = io_error.into();
        match err {
            Error::Io(message) => assert!(message.contains("boom")),
            _ => panic!("expected Io variant"),
        }
    }

    #[test]
    fn config_error_formats_properly() {
        let err = Error::Config("bad field".into());
        assert_eq!(format!("{}", err), "Config Error: bad field");
    }

    #[test]
    fn host_error_converts_and_keeps_details() {
        let err: Error = HostError::Status(404).into();
        assert!(matches!(err, Error::Host(HostError::Status(404))));
        assert_eq!(format!("{}", err), "Host Error: HTTP status 404");
    }

    #[test]
    fn i18n_keys_group_network_errors() {
        assert_eq!(Error::Http("x".into()).i18n_key(), "error-network");
        assert_eq!(
            Error::Host(HostError::Network("x".into())).i18n_key(),
            "error-network"
        );
    }

    #[tokio::test]
    async fn reqwest_error_converts_to_http_variant() {
        let err: Error = reqwest::get("not a url")
            .await
            .expect_err("invalid url is rejected")
            .into();
        assert!(matches!(err, Error::Http(_)));
        assert_eq!(err.i18n_key(), "error-network");
    }
}
