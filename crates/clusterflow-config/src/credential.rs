//! Credential resolution from cloud profiles and providers
//!
//! A profile references a provider by name. Connection settings may live on
//! either; the profile value wins field by field.

use crate::Settings;
use crate::error::{ConfigError, Result};
use crate::store::{ConfigStore, DirConfigStore};
use serde_yaml::Value;
use std::path::PathBuf;
use tracing::debug;

/// How to authenticate against a provisioned node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Plain password
    Password(String),
    /// Path to a private key file
    KeyFile(PathBuf),
    /// Private key given inline in the config
    PrivateKey(String),
}

impl Auth {
    /// Password, key file and inline key are tried in that order.
    pub fn select(
        password: Option<String>,
        ssh_key_file: Option<String>,
        private_key: Option<String>,
    ) -> Option<Self> {
        password
            .map(Auth::Password)
            .or_else(|| ssh_key_file.map(|path| Auth::KeyFile(PathBuf::from(path))))
            .or_else(|| private_key.map(Auth::PrivateKey))
    }
}

/// Merged credential and driver for one profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub driver: String,
    pub ssh_username: Option<String>,
    pub auth: Auth,
}

/// A cloud profile record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub provider: Option<String>,
    /// Driver given with the legacy `provider: <name>:<driver>` syntax
    pub driver_hint: Option<String>,
    pub ssh_username: Option<String>,
    pub password: Option<String>,
    pub ssh_key_file: Option<String>,
    pub private_key: Option<String>,
}

impl Profile {
    pub fn from_record(name: impl Into<String>, record: &Value) -> Self {
        let (provider, driver_hint) = match scalar(record, "provider") {
            Some(value) => match value.split_once(':') {
                Some((provider, driver)) => (
                    Some(provider.to_string()),
                    Some(driver.to_string()).filter(|d| !d.is_empty()),
                ),
                None => (Some(value), None),
            },
            None => (None, None),
        };

        Self {
            name: name.into(),
            provider,
            driver_hint,
            ssh_username: scalar(record, "ssh_username"),
            password: scalar(record, "password"),
            ssh_key_file: scalar(record, "ssh_key_file"),
            private_key: scalar(record, "private_key"),
        }
    }
}

/// A cloud provider record
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Provider {
    pub name: String,
    pub driver: Option<String>,
    /// Older salt-cloud configs name the driver under `provider`
    pub provider: Option<String>,
    pub ssh_username: Option<String>,
    pub password: Option<String>,
    pub ssh_key_file: Option<String>,
    pub private_key: Option<String>,
}

impl Provider {
    pub fn from_record(name: impl Into<String>, record: &Value) -> Self {
        Self {
            name: name.into(),
            driver: scalar(record, "driver"),
            provider: scalar(record, "provider"),
            ssh_username: scalar(record, "ssh_username"),
            password: scalar(record, "password"),
            ssh_key_file: scalar(record, "ssh_key_file"),
            private_key: scalar(record, "private_key"),
        }
    }
}

/// Scalar field as text. Empty strings count as unset.
fn scalar(record: &Value, key: &str) -> Option<String> {
    let text = match record.get(key)? {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    Some(text).filter(|t| !t.is_empty())
}

/// Resolves credentials by reading profile and provider stores.
///
/// Nothing is cached: every call reads the stores again.
pub struct CredentialResolver {
    profiles: Box<dyn ConfigStore>,
    providers: Box<dyn ConfigStore>,
}

impl CredentialResolver {
    pub fn new(
        profiles: impl ConfigStore + 'static,
        providers: impl ConfigStore + 'static,
    ) -> Self {
        Self {
            profiles: Box::new(profiles),
            providers: Box::new(providers),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            DirConfigStore::new(&settings.profiles_dir),
            DirConfigStore::new(&settings.providers_dir),
        )
    }

    /// Look up a profile by name
    pub fn profile(&self, name: &str) -> Result<Profile> {
        let record = self
            .profiles
            .lookup(name)?
            .ok_or_else(|| ConfigError::ProfileNotFound {
                profile: name.to_string(),
                dir: self.profiles.location(),
            })?;
        Ok(Profile::from_record(name, &record))
    }

    /// Look up the provider a profile points at
    pub fn provider_for(&self, profile: &Profile) -> Result<Provider> {
        let provider_name = profile
            .provider
            .as_deref()
            .ok_or_else(|| ConfigError::ProviderUndeclared(profile.name.clone()))?;

        let record =
            self.providers
                .lookup(provider_name)?
                .ok_or_else(|| ConfigError::ProviderNotFound {
                    profile: profile.name.clone(),
                    provider: provider_name.to_string(),
                    dir: self.providers.location(),
                })?;
        Ok(Provider::from_record(provider_name, &record))
    }

    /// Resolve the merged credential for a profile
    pub fn resolve(&self, profile_name: &str) -> Result<Credential> {
        let profile = self.profile(profile_name)?;
        let provider = self.provider_for(&profile)?;
        merge(profile, provider)
    }
}

fn merge(profile: Profile, provider: Provider) -> Result<Credential> {
    let driver = provider
        .driver
        .or(provider.provider)
        .or(profile.driver_hint)
        .ok_or_else(|| ConfigError::DriverNotFound(profile.name.clone()))?;

    let auth = Auth::select(
        profile.password.or(provider.password),
        profile.ssh_key_file.or(provider.ssh_key_file),
        profile.private_key.or(provider.private_key),
    )
    .ok_or_else(|| ConfigError::AuthNotFound(profile.name.clone()))?;

    debug!(profile = %profile.name, provider = %provider.name, %driver, "Resolved credential");

    Ok(Credential {
        driver,
        ssh_username: profile.ssh_username.or(provider.ssh_username),
        auth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct Stores {
        profiles: TempDir,
        providers: TempDir,
    }

    impl Stores {
        fn new(profiles: &str, providers: &str) -> Self {
            let stores = Self {
                profiles: tempfile::tempdir().unwrap(),
                providers: tempfile::tempdir().unwrap(),
            };
            fs::write(stores.profiles.path().join("cluster.conf"), profiles).unwrap();
            fs::write(stores.providers.path().join("cloud.conf"), providers).unwrap();
            stores
        }

        fn resolver(&self) -> CredentialResolver {
            CredentialResolver::new(
                DirConfigStore::new(self.profiles.path()),
                DirConfigStore::new(self.providers.path()),
            )
        }
    }

    #[test]
    fn test_profile_wins_over_provider() {
        let stores = Stores::new(
            "linode-centos-7:\n  provider: my-linode\n  password: p1\n",
            "my-linode:\n  driver: linode\n  password: p2\n  ssh_key_file: /k\n",
        );

        let credential = stores.resolver().resolve("linode-centos-7").unwrap();
        assert_eq!(credential.auth, Auth::Password("p1".to_string()));
        assert_eq!(credential.driver, "linode");
    }

    #[test]
    fn test_fields_merge_independently() {
        let stores = Stores::new(
            "web:\n  provider: do\n  ssh_key_file: /root/.ssh/web\n",
            "do:\n  driver: digital_ocean\n  ssh_username: admin\n",
        );

        let credential = stores.resolver().resolve("web").unwrap();
        assert_eq!(credential.ssh_username.as_deref(), Some("admin"));
        assert_eq!(
            credential.auth,
            Auth::KeyFile(PathBuf::from("/root/.ssh/web"))
        );
    }

    #[test]
    fn test_driver_falls_back_to_provider_field() {
        let stores = Stores::new(
            "web:\n  provider: old\n  private_key: KEYDATA\n",
            "old:\n  provider: joyent\n",
        );

        let credential = stores.resolver().resolve("web").unwrap();
        assert_eq!(credential.driver, "joyent");
        assert_eq!(credential.auth, Auth::PrivateKey("KEYDATA".to_string()));
    }

    #[test]
    fn test_legacy_provider_syntax() {
        let stores = Stores::new(
            "web:\n  provider: my-ec2:ec2\n  password: 1234\n",
            "my-ec2:\n  id: AKIA\n",
        );

        let credential = stores.resolver().resolve("web").unwrap();
        assert_eq!(credential.driver, "ec2");
        assert_eq!(credential.auth, Auth::Password("1234".to_string()));
    }

    #[test]
    fn test_missing_profile() {
        let stores = Stores::new("other:\n  provider: x\n", "x:\n  driver: linode\n");

        let result = stores.resolver().resolve("web");
        assert!(matches!(result, Err(ConfigError::ProfileNotFound { .. })));
    }

    #[test]
    fn test_missing_provider() {
        let stores = Stores::new(
            "web:\n  provider: gone\n  password: p\n",
            "x:\n  driver: linode\n",
        );

        let result = stores.resolver().resolve("web");
        assert!(matches!(result, Err(ConfigError::ProviderNotFound { .. })));
    }

    #[test]
    fn test_missing_driver() {
        let stores = Stores::new("web:\n  provider: x\n  password: p\n", "x:\n  apikey: k\n");

        let result = stores.resolver().resolve("web");
        assert!(matches!(result, Err(ConfigError::DriverNotFound(_))));
    }

    #[test]
    fn test_missing_auth() {
        let stores = Stores::new("web:\n  provider: x\n", "x:\n  driver: linode\n");

        let result = stores.resolver().resolve("web");
        assert!(matches!(result, Err(ConfigError::AuthNotFound(_))));
    }

    #[test]
    fn test_reads_fresh_on_every_call() {
        let stores = Stores::new(
            "web:\n  provider: x\n  password: first\n",
            "x:\n  driver: linode\n",
        );
        let resolver = stores.resolver();
        assert_eq!(
            resolver.resolve("web").unwrap().auth,
            Auth::Password("first".to_string())
        );

        fs::write(
            stores.profiles.path().join("cluster.conf"),
            "web:\n  provider: x\n  password: second\n",
        )
        .unwrap();
        assert_eq!(
            resolver.resolve("web").unwrap().auth,
            Auth::Password("second".to_string())
        );
    }
}
