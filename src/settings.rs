//! Support for library configuration options

use std::error::Error;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use once_cell::sync::Lazy;
use url::Url;

/// The `User-Agent` sent with every request.
/// Feel free to override it when initing this library.
pub static USER_AGENT: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new(format!("taskboard/{}", env!("CARGO_PKG_VERSION")))));

pub const DEFAULT_URL: &str = "http://localhost:8000/";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub const URL_VAR: &str = "TASKBOARD_URL";
pub const ENDPOINT_EXTENSION_VAR: &str = "TASKBOARD_ENDPOINT_EXTENSION";
pub const TIMEOUT_VAR: &str = "TASKBOARD_TIMEOUT_MS";
pub const LIST_RETRIES_VAR: &str = "TASKBOARD_LIST_RETRIES";

/// How to reach the task service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// The URL endpoint names are resolved against. It should end with a `/`
    pub base_url: Url,
    /// Appended to every endpoint name, e.g. `.php` for a service that exposes `getData.php`
    pub endpoint_extension: String,
    /// After this delay, a request is considered failed
    pub request_timeout: Duration,
    /// How many more times a failed listing is attempted.
    /// Mutations are never retried.
    pub list_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_URL).unwrap(/* this is a valid constant URL */),
            endpoint_extension: String::new(),
            request_timeout: DEFAULT_TIMEOUT,
            list_retries: 0,
        }
    }
}

impl Settings {
    pub fn new<S: AsRef<str>>(base_url: S) -> Result<Self, Box<dyn Error>> {
        let base_url = Url::parse(base_url.as_ref())?;
        Ok(Self { base_url, ..Self::default() })
    }

    /// Read the settings from the environment, falling back to the defaults for unset variables
    pub fn from_env() -> Result<Self, Box<dyn Error>> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, Box<dyn Error>>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(url) = lookup(URL_VAR) {
            settings.base_url = Url::parse(&url)
                .map_err(|err| format!("Invalid {} {:?}: {}", URL_VAR, url, err))?;
        }
        if let Some(extension) = lookup(ENDPOINT_EXTENSION_VAR) {
            settings.endpoint_extension = extension;
        }
        if let Some(timeout) = lookup(TIMEOUT_VAR) {
            let millis: u64 = timeout.parse()
                .map_err(|err| format!("Invalid {} {:?}: {}", TIMEOUT_VAR, timeout, err))?;
            settings.request_timeout = Duration::from_millis(millis);
        }
        if let Some(retries) = lookup(LIST_RETRIES_VAR) {
            settings.list_retries = retries.parse()
                .map_err(|err| format!("Invalid {} {:?}: {}", LIST_RETRIES_VAR, retries, err))?;
        }

        log::debug!("Task service settings: {:?}", settings);
        Ok(settings)
    }

    /// The URL of an endpoint, e.g. `http://localhost:8000/getData.php`
    pub fn endpoint_url(&self, endpoint_name: &str) -> Result<Url, url::ParseError> {
        self.base_url.join(&format!("{}{}", endpoint_name, self.endpoint_extension))
    }
}

/// The current `User-Agent` value
pub fn user_agent() -> String {
    match USER_AGENT.lock() {
        Ok(agent) => agent.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}
