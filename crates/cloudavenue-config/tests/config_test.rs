#![allow(clippy::unwrap_used)]
// Layering of defaults, TOML file and environment, plus translation into
// the SDK client configuration.

use std::path::Path;
use std::time::Duration;

use figment::Jail;
use pretty_assertions::assert_eq;

use cloudavenue_config::{ConfigError, Settings};
use cloudavenue_core::{AuthCredentials, ExposeSecret, TlsVerification};

const FILE: &str = r#"
endpoint = "https://console2.cloudavenue.orange-business.com"
username = "alice"
password = "from-file"
org = "cav01ev01ocb0001234"
vdc = "vdc-prod"
vcd_version = "38.1"
timeout = 30

[s3]
s3_endpoint = "https://s3-region01.cloudavenue.orange-business.com"
username = "alice"
"#;

fn load(jail: &Jail) -> Result<Settings, figment::Error> {
    Settings::load_from(&jail.directory().join("config.toml")).map_err(|e| e.to_string().into())
}

#[test]
fn defaults_apply_without_a_file() {
    Jail::expect_with(|jail| {
        let settings = load(jail)?;
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.vcd_version, "37.2");
        assert_eq!(settings.job_timeout, 900);
        assert_eq!(settings.poll_interval, 2);
        Ok(())
    });
}

#[test]
fn file_values_are_read() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FILE)?;
        let settings = load(jail)?;
        assert_eq!(settings.org.as_deref(), Some("cav01ev01ocb0001234"));
        assert_eq!(settings.vdc.as_deref(), Some("vdc-prod"));
        assert_eq!(settings.vcd_version, "38.1");
        assert_eq!(settings.timeout, 30);
        assert_eq!(settings.poll_interval, 2);
        assert_eq!(
            settings.s3.s3_endpoint.as_deref(),
            Some("https://s3-region01.cloudavenue.orange-business.com")
        );
        Ok(())
    });
}

#[test]
fn environment_overrides_the_file() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FILE)?;
        jail.set_env("CLOUDAVENUE_VDC", "vdc-staging");
        jail.set_env("CLOUDAVENUE_DEBUG", "true");
        jail.set_env("CLOUDAVENUE_VCD_VERSION", "37.3");
        jail.set_env("S3_CAV_TOKEN", "s3-token");
        jail.set_env("S3_ORGANIZATION_NAME", "cav01ev01ocb0001234");

        let settings = load(jail)?;
        assert_eq!(settings.vdc.as_deref(), Some("vdc-staging"));
        assert!(settings.debug);
        assert_eq!(settings.vcd_version, "37.3");
        assert_eq!(settings.s3.cav_token.as_deref(), Some("s3-token"));
        assert_eq!(settings.s3.organization_name.as_deref(), Some("cav01ev01ocb0001234"));
        // Untouched keys keep their file value.
        assert_eq!(settings.s3.username.as_deref(), Some("alice"));
        Ok(())
    });
}

#[test]
fn zero_timeout_fails_validation() {
    Jail::expect_with(|jail| {
        jail.set_env("CLOUDAVENUE_JOB_TIMEOUT", "0");
        let err = Settings::load_from(&jail.directory().join("config.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "job_timeout"));
        Ok(())
    });
}

#[test]
fn client_config_carries_every_setting() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", FILE)?;
        jail.set_env("CLOUDAVENUE_PASSWORD", "from-env");
        jail.set_env("CLOUDAVENUE_CA_CERT", "/etc/ssl/private-ca.pem");

        let config = load(jail)?.to_client_config().unwrap();
        assert_eq!(config.organization, "cav01ev01ocb0001234");
        assert_eq!(config.vdc.as_deref(), Some("vdc-prod"));
        assert_eq!(config.api_version, "38.1");
        assert_eq!(
            config.endpoint.unwrap().as_str(),
            "https://console2.cloudavenue.orange-business.com/"
        );
        assert_eq!(
            config.tls,
            TlsVerification::CustomCa(Path::new("/etc/ssl/private-ca.pem").to_path_buf())
        );
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.job_timeout, Duration::from_secs(900));

        let AuthCredentials::Session { username, password } = config.auth else {
            panic!("expected session credentials");
        };
        assert_eq!(username, "alice");
        // The environment wins over the plaintext file value.
        assert_eq!(password.expose_secret(), "from-env");
        Ok(())
    });
}

#[test]
fn plaintext_password_is_the_last_resort() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            username = "no-keyring-user"
            password = "from-file"
            org = "cav01ev01ocb0009999"
            insecure = true
            "#,
        )?;
        let settings = load(jail)?;
        let password = settings
            .resolve_password("cav01ev01ocb0009999", "no-keyring-user")
            .unwrap();
        assert_eq!(password.expose_secret(), "from-file");

        let config = settings.to_client_config().unwrap();
        assert_eq!(config.endpoint, None);
        assert_eq!(config.tls, TlsVerification::DangerAcceptInvalid);
        Ok(())
    });
}

#[test]
fn no_password_anywhere_is_reported() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
            username = "nobody-here"
            org = "cav01ev01ocb0009998"
            "#,
        )?;
        let err = load(jail)?.to_client_config().unwrap_err();
        assert!(matches!(err, ConfigError::NoCredentials { .. }));
        assert!(err.to_string().contains("nobody-here@cav01ev01ocb0009998"));
        Ok(())
    });
}

#[test]
fn invalid_endpoint_is_a_validation_error() {
    Jail::expect_with(|jail| {
        jail.set_env("CLOUDAVENUE_ORG", "cav01ev01ocb0001234");
        jail.set_env("CLOUDAVENUE_USERNAME", "alice");
        jail.set_env("CLOUDAVENUE_PASSWORD", "pw");
        jail.set_env("CLOUDAVENUE_ENDPOINT", "not a url");
        let err = load(jail)?.to_client_config().unwrap_err();
        assert!(matches!(err, ConfigError::Validation { ref field, .. } if field == "endpoint"));
        Ok(())
    });
}

#[test]
fn saved_settings_load_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");
    let settings = Settings {
        org: Some("cav01ev01ocb0001234".into()),
        username: Some("alice".into()),
        ..Settings::default()
    };
    settings.save_to(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("org = \"cav01ev01ocb0001234\""));
    assert!(text.contains("[s3]"));
}
