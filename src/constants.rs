//! Names shared between the configuration loader, the transport and the CLI.

/// Config file name, resolved against the user's home directory
pub const CONFIG_FILE_NAME: &str = ".oha";

pub const ENV_CLIENT_USERNAME: &str = "CLIENT_USERNAME";
pub const ENV_SERVER_URL: &str = "SERVER_URL";
pub const ENV_SERVER_PORT: &str = "SERVER_PORT";
pub const ENV_SERVER_API: &str = "SERVER_API";
pub const ENV_CLIENT_PASSWORD: &str = "CLIENT_PASSWORD";

/// Overrides the config file location
pub const ENV_CONFIG_PATH: &str = "OHA_CONFIG";
/// Opts in to accepting self-signed server certificates
pub const ENV_INSECURE: &str = "OHA_INSECURE";

pub const MIN_USERNAME_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 12;

pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const MANAGE_ROUTE: &str = "/manage";
pub const HEALTH_ROUTE: &str = "/health";
pub const STATUS_ROUTE: &str = "/status";
pub const FOUND_ROUTE: &str = "/found";
pub const SEARCH_ROUTE: &str = "/search";
pub const DOWNLOAD_ROUTE: &str = "/download";
pub const LISTS_ROUTE: &str = "/lists";
