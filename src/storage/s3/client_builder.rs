use aws_config::BehaviorVersion;
use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::profile_file::{ProfileFileKind, ProfileFiles};
use aws_config::retry::RetryConfig;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::{Credentials, Region};

use crate::config::ClientConfig;
use crate::types::S3Credentials;

/// Region used when neither --aws-region nor the environment/profile
/// chain yields one.
const FALLBACK_REGION: &str = "eu-west-1";

impl ClientConfig {
    /// Build an S3 client from this configuration.
    ///
    /// Region resolution order: explicit `--aws-region`, then the SDK's
    /// default provider chain (AWS_REGION, profile), then `eu-west-1`.
    pub async fn create_client(&self) -> Client {
        let region_provider =
            RegionProviderChain::first_try(self.region.clone().map(Region::new))
                .or_default_provider()
                .or_else(Region::new(FALLBACK_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .retry_config(RetryConfig::standard().with_max_attempts(self.aws_max_attempts));

        let location = &self.client_config_location;
        if location.aws_config_file.is_some() || location.aws_shared_credentials_file.is_some() {
            let mut profile_files = ProfileFiles::builder().include_default_credentials_file(true);
            if let Some(ref config_file) = location.aws_config_file {
                profile_files = profile_files.with_file(ProfileFileKind::Config, config_file);
            }
            if let Some(ref credentials_file) = location.aws_shared_credentials_file {
                profile_files =
                    profile_files.with_file(ProfileFileKind::Credentials, credentials_file);
            }
            loader = loader.profile_files(profile_files.build());
        }

        match &self.credential {
            S3Credentials::Profile(profile) => {
                loader = loader.profile_name(profile);
            }
            S3Credentials::Credentials { access_keys } => {
                loader = loader.credentials_provider(Credentials::new(
                    access_keys.access_key.clone(),
                    access_keys.secret_access_key.clone(),
                    access_keys.session_token.clone(),
                    None,
                    "s3empty-static-credentials",
                ));
            }
            S3Credentials::FromEnvironment => {}
        }

        if let Some(ref endpoint_url) = self.endpoint_url {
            loader = loader.endpoint_url(endpoint_url);
        }

        let sdk_config = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if self.force_path_style {
            builder = builder.force_path_style(true);
        }

        Client::from_conf(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AccessKeys, ClientConfigLocation};

    fn init_dummy_tracing_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("dummy=trace")
            .try_init();
    }

    fn make_client_config(credential: S3Credentials) -> ClientConfig {
        ClientConfig {
            client_config_location: ClientConfigLocation {
                aws_config_file: None,
                aws_shared_credentials_file: None,
            },
            credential,
            region: Some("us-east-1".to_string()),
            endpoint_url: Some("https://localhost:9000".to_string()),
            force_path_style: true,
            aws_max_attempts: 2,
        }
    }

    #[tokio::test]
    async fn create_client_with_static_credentials() {
        init_dummy_tracing_subscriber();

        let config = make_client_config(S3Credentials::Credentials {
            access_keys: AccessKeys {
                access_key: "test_key".to_string(),
                secret_access_key: "test_secret".to_string(),
                session_token: None,
            },
        });

        let client = config.create_client().await;
        assert_eq!(
            client.config().region().map(|r| r.as_ref()),
            Some("us-east-1")
        );
    }

    #[tokio::test]
    async fn create_client_falls_back_to_default_region() {
        init_dummy_tracing_subscriber();

        let mut config = make_client_config(S3Credentials::FromEnvironment);
        config.region = None;

        // Without an explicit region the provider chain ends in eu-west-1;
        // the environment may supply one first, so just assert a region exists.
        let client = config.create_client().await;
        assert!(client.config().region().is_some());
    }

    #[tokio::test]
    async fn create_client_force_path_style() {
        init_dummy_tracing_subscriber();

        let config = make_client_config(S3Credentials::FromEnvironment);
        let _client = config.create_client().await;
    }
}
