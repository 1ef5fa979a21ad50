//! The settings pingctl understands.
//!
//! Registration functions build [`ConfigOption`]s for each command family. The
//! binary calls [`standard_registry`] once at startup.

use std::path::PathBuf;

use crate::error::ConfigResult;
use crate::options::{ConfigOption, OptionRegistry};
use crate::value::{OutputFormat, Service, TypedValue, ValueKind};

/// Logical keys of every registered option.
pub mod keys {
    pub const COLOR: &str = "pingctl.color";
    pub const OUTPUT_FORMAT: &str = "pingctl.outputFormat";

    pub const EXPORT_FORMAT: &str = "export.exportFormat";
    pub const EXPORT_SERVICES: &str = "export.services";
    pub const EXPORT_OUTPUT_DIRECTORY: &str = "export.outputDirectory";
    pub const EXPORT_OVERWRITE: &str = "export.overwrite";

    pub const PINGONE_WORKER_ENVIRONMENT_ID: &str = "export.pingone.worker.environmentID";
    pub const PINGONE_EXPORT_ENVIRONMENT_ID: &str = "export.pingone.export.environmentID";
    pub const PINGONE_WORKER_CLIENT_ID: &str = "export.pingone.worker.clientID";
    pub const PINGONE_WORKER_CLIENT_SECRET: &str = "export.pingone.worker.clientSecret";
    pub const PINGONE_REGION: &str = "export.pingone.region";

    pub const PINGFEDERATE_HTTPS_HOST: &str = "export.pingfederate.httpsHost";
    pub const PINGFEDERATE_ADMIN_API_PATH: &str = "export.pingfederate.adminAPIPath";
    pub const PINGFEDERATE_X_BYPASS_EXTERNAL_VALIDATION_HEADER: &str =
        "export.pingfederate.xBypassExternalValidationHeader";
    pub const PINGFEDERATE_CA_CERTIFICATE_PEM_FILES: &str =
        "export.pingfederate.caCertificatePemFiles";
    pub const PINGFEDERATE_INSECURE_TRUST_ALL_TLS: &str = "export.pingfederate.insecureTrustAllTLS";
    pub const PINGFEDERATE_USERNAME: &str = "export.pingfederate.basicAuth.username";
    pub const PINGFEDERATE_PASSWORD: &str = "export.pingfederate.basicAuth.password";
    pub const PINGFEDERATE_ACCESS_TOKEN: &str = "export.pingfederate.accessTokenAuth.accessToken";
    pub const PINGFEDERATE_CLIENT_ID: &str = "export.pingfederate.clientCredentialsAuth.clientID";
    pub const PINGFEDERATE_CLIENT_SECRET: &str =
        "export.pingfederate.clientCredentialsAuth.clientSecret";
    pub const PINGFEDERATE_TOKEN_URL: &str = "export.pingfederate.clientCredentialsAuth.tokenURL";
    pub const PINGFEDERATE_SCOPES: &str = "export.pingfederate.clientCredentialsAuth.scopes";
}

/// Defaults that depend on the invocation, computed once by the caller.
#[derive(Debug, Clone)]
pub struct StartupDefaults {
    /// Default for `export.outputDirectory`, normally `<cwd>/export`.
    pub export_directory: PathBuf,
}

impl StartupDefaults {
    pub fn new(export_directory: impl Into<PathBuf>) -> Self {
        Self {
            export_directory: export_directory.into(),
        }
    }

    /// Derive defaults from the current working directory.
    pub fn from_current_dir() -> std::io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?.join("export")))
    }
}

fn usage_with_env(text: &str, env_var: &str) -> String {
    format!("{text} Also configurable via environment variable {env_var}")
}

fn allowed<T: std::fmt::Display>(values: impl IntoIterator<Item = T>) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Options shared by every command.
pub fn root_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::new(keys::COLOR, "color", "PINGCTL_COLOR", ValueKind::Bool)
            .default_value(TypedValue::Bool(true))
            .usage(usage_with_env("Enable text colorization.", "PINGCTL_COLOR")),
        ConfigOption::new(
            keys::OUTPUT_FORMAT,
            "output-format",
            "PINGCTL_OUTPUT_FORMAT",
            ValueKind::OutputFormat,
        )
        .shorthand('O')
        .default_value(TypedValue::OutputFormat(Some(OutputFormat::Text)))
        .usage(usage_with_env(
            &format!(
                "Specify the console output format. Allowed: [{}].",
                allowed(OutputFormat::ALL.map(|f| f.as_str()))
            ),
            "PINGCTL_OUTPUT_FORMAT",
        )),
    ]
}

/// Options of the platform export command.
pub fn export_options(defaults: &StartupDefaults) -> Vec<ConfigOption> {
    let mut options = vec![
        ConfigOption::new(
            keys::EXPORT_FORMAT,
            "export-format",
            "PINGCTL_EXPORT_FORMAT",
            ValueKind::String,
        )
        .shorthand('e')
        .default_value(TypedValue::String("HCL".to_string()))
        .usage(usage_with_env(
            "Specifies export format. Allowed: [HCL].",
            "PINGCTL_EXPORT_FORMAT",
        )),
        ConfigOption::new(
            keys::EXPORT_SERVICES,
            "services",
            "PINGCTL_EXPORT_SERVICES",
            ValueKind::Services,
        )
        .shorthand('s')
        .default_value(TypedValue::Services(Service::ALL.to_vec()))
        .usage(usage_with_env(
            &format!(
                "Specifies service(s) to export. Accepts a comma-separated list. Allowed: [{}].",
                allowed(Service::ALL)
            ),
            "PINGCTL_EXPORT_SERVICES",
        )),
        ConfigOption::new(
            keys::EXPORT_OUTPUT_DIRECTORY,
            "output-directory",
            "PINGCTL_EXPORT_OUTPUT_DIRECTORY",
            ValueKind::String,
        )
        .shorthand('d')
        .default_value(TypedValue::String(
            defaults.export_directory.display().to_string(),
        ))
        .usage(usage_with_env(
            "Specifies output directory for export.",
            "PINGCTL_EXPORT_OUTPUT_DIRECTORY",
        )),
        ConfigOption::new(
            keys::EXPORT_OVERWRITE,
            "overwrite",
            "PINGCTL_EXPORT_OVERWRITE",
            ValueKind::Bool,
        )
        .shorthand('o')
        .usage(usage_with_env(
            "Overwrite existing generated exports in output directory.",
            "PINGCTL_EXPORT_OVERWRITE",
        )),
    ];

    options.extend(pingone_options());
    options.extend(pingfederate_options());
    options
}

fn pingone_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::new(
            keys::PINGONE_WORKER_ENVIRONMENT_ID,
            "pingone-worker-environment-id",
            "PINGCTL_PINGONE_WORKER_ENVIRONMENT_ID",
            ValueKind::Uuid,
        )
        .usage(usage_with_env(
            "The ID of the PingOne environment that contains the worker client used to authenticate.",
            "PINGCTL_PINGONE_WORKER_ENVIRONMENT_ID",
        )),
        ConfigOption::new(
            keys::PINGONE_EXPORT_ENVIRONMENT_ID,
            "pingone-export-environment-id",
            "PINGCTL_PINGONE_EXPORT_ENVIRONMENT_ID",
            ValueKind::Uuid,
        )
        .usage(usage_with_env(
            "The ID of the PingOne environment to export.",
            "PINGCTL_PINGONE_EXPORT_ENVIRONMENT_ID",
        )),
        ConfigOption::new(
            keys::PINGONE_WORKER_CLIENT_ID,
            "pingone-worker-client-id",
            "PINGCTL_PINGONE_WORKER_CLIENT_ID",
            ValueKind::Uuid,
        )
        .usage(usage_with_env(
            "The ID of the PingOne worker client used to authenticate.",
            "PINGCTL_PINGONE_WORKER_CLIENT_ID",
        )),
        ConfigOption::new(
            keys::PINGONE_WORKER_CLIENT_SECRET,
            "pingone-worker-client-secret",
            "PINGCTL_PINGONE_WORKER_CLIENT_SECRET",
            ValueKind::String,
        )
        .sensitive()
        .usage(usage_with_env(
            "The PingOne worker client secret used to authenticate.",
            "PINGCTL_PINGONE_WORKER_CLIENT_SECRET",
        )),
        ConfigOption::new(
            keys::PINGONE_REGION,
            "pingone-region",
            "PINGCTL_PINGONE_REGION",
            ValueKind::Region,
        )
        .usage(usage_with_env(
            "The region code of the PingOne service(s). Allowed: [AP, CA, EU, NA].",
            "PINGCTL_PINGONE_REGION",
        )),
    ]
}

fn pingfederate_options() -> Vec<ConfigOption> {
    vec![
        ConfigOption::new(
            keys::PINGFEDERATE_HTTPS_HOST,
            "pingfederate-https-host",
            "PINGCTL_PINGFEDERATE_HTTPS_HOST",
            ValueKind::String,
        )
        .usage(usage_with_env(
            "The PingFederate HTTPS host used to communicate with PingFederate's API.",
            "PINGCTL_PINGFEDERATE_HTTPS_HOST",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_ADMIN_API_PATH,
            "pingfederate-admin-api-path",
            "PINGCTL_PINGFEDERATE_ADMIN_API_PATH",
            ValueKind::String,
        )
        .default_value(TypedValue::String("/pf-admin-api/v1".to_string()))
        .usage(usage_with_env(
            "The PingFederate API URL path used to communicate with PingFederate's API.",
            "PINGCTL_PINGFEDERATE_ADMIN_API_PATH",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_X_BYPASS_EXTERNAL_VALIDATION_HEADER,
            "pingfederate-x-bypass-external-validation-header",
            "PINGCTL_PINGFEDERATE_X_BYPASS_EXTERNAL_VALIDATION_HEADER",
            ValueKind::Bool,
        )
        .usage(usage_with_env(
            "Bypass PingFederate's connection tests by sending the X-BypassExternalValidation header.",
            "PINGCTL_PINGFEDERATE_X_BYPASS_EXTERNAL_VALIDATION_HEADER",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_CA_CERTIFICATE_PEM_FILES,
            "pingfederate-ca-certificate-pem-files",
            "PINGCTL_PINGFEDERATE_CA_CERTIFICATE_PEM_FILES",
            ValueKind::StringList,
        )
        .usage(usage_with_env(
            "Paths to PEM-encoded certificates trusted as root CAs for PingFederate. Accepts a comma-separated list.",
            "PINGCTL_PINGFEDERATE_CA_CERTIFICATE_PEM_FILES",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_INSECURE_TRUST_ALL_TLS,
            "pingfederate-insecure-trust-all-tls",
            "PINGCTL_PINGFEDERATE_INSECURE_TRUST_ALL_TLS",
            ValueKind::Bool,
        )
        .usage(usage_with_env(
            "Trust any certificate when connecting to PingFederate. Insecure; testing only.",
            "PINGCTL_PINGFEDERATE_INSECURE_TRUST_ALL_TLS",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_USERNAME,
            "pingfederate-username",
            "PINGCTL_PINGFEDERATE_USERNAME",
            ValueKind::String,
        )
        .usage(usage_with_env(
            "The PingFederate username used to authenticate.",
            "PINGCTL_PINGFEDERATE_USERNAME",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_PASSWORD,
            "pingfederate-password",
            "PINGCTL_PINGFEDERATE_PASSWORD",
            ValueKind::String,
        )
        .sensitive()
        .usage(usage_with_env(
            "The PingFederate password used to authenticate.",
            "PINGCTL_PINGFEDERATE_PASSWORD",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_ACCESS_TOKEN,
            "pingfederate-access-token",
            "PINGCTL_PINGFEDERATE_ACCESS_TOKEN",
            ValueKind::String,
        )
        .sensitive()
        .usage(usage_with_env(
            "The PingFederate access token used to authenticate.",
            "PINGCTL_PINGFEDERATE_ACCESS_TOKEN",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_CLIENT_ID,
            "pingfederate-client-id",
            "PINGCTL_PINGFEDERATE_CLIENT_ID",
            ValueKind::String,
        )
        .usage(usage_with_env(
            "The PingFederate OAuth client ID used to authenticate.",
            "PINGCTL_PINGFEDERATE_CLIENT_ID",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_CLIENT_SECRET,
            "pingfederate-client-secret",
            "PINGCTL_PINGFEDERATE_CLIENT_SECRET",
            ValueKind::String,
        )
        .sensitive()
        .usage(usage_with_env(
            "The PingFederate OAuth client secret used to authenticate.",
            "PINGCTL_PINGFEDERATE_CLIENT_SECRET",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_TOKEN_URL,
            "pingfederate-token-url",
            "PINGCTL_PINGFEDERATE_TOKEN_URL",
            ValueKind::String,
        )
        .usage(usage_with_env(
            "The PingFederate OAuth token URL used to authenticate.",
            "PINGCTL_PINGFEDERATE_TOKEN_URL",
        )),
        ConfigOption::new(
            keys::PINGFEDERATE_SCOPES,
            "pingfederate-scopes",
            "PINGCTL_PINGFEDERATE_SCOPES",
            ValueKind::StringList,
        )
        .usage(usage_with_env(
            "The PingFederate OAuth scopes used to authenticate. Accepts a comma-separated list.",
            "PINGCTL_PINGFEDERATE_SCOPES",
        )),
    ]
}

/// A registry holding every pingctl option.
pub fn standard_registry(defaults: &StartupDefaults) -> ConfigResult<OptionRegistry> {
    let mut registry = OptionRegistry::new();
    registry.register_all(root_options())?;
    registry.register_all(export_options(defaults))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> OptionRegistry {
        standard_registry(&StartupDefaults::new("/work/export")).unwrap()
    }

    #[test]
    fn test_standard_registry_kinds_match_registration() {
        let registry = registry();
        for option in root_options()
            .into_iter()
            .chain(export_options(&StartupDefaults::new("/work/export")))
        {
            assert_eq!(registry.kind_of(option.key), Some(option.kind), "{}", option.key);
        }
    }

    #[test]
    fn test_env_vars_share_prefix() {
        for option in registry().options() {
            assert!(option.env_var.starts_with("PINGCTL_"), "{}", option.env_var);
        }
    }

    #[test]
    fn test_output_directory_default_comes_from_startup() {
        let registry = registry();
        let option = registry.get(keys::EXPORT_OUTPUT_DIRECTORY).unwrap();
        assert_eq!(option.default, TypedValue::String("/work/export".to_string()));
    }

    #[test]
    fn test_secrets_are_sensitive() {
        let registry = registry();
        assert!(registry.get(keys::PINGONE_WORKER_CLIENT_SECRET).unwrap().sensitive);
        assert!(registry.get(keys::PINGFEDERATE_PASSWORD).unwrap().sensitive);
        assert!(!registry.get(keys::PINGONE_REGION).unwrap().sensitive);
    }
}
