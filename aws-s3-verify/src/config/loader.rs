/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::net::IpAddr;

use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_types::region::Region;

use crate::config::Builder;
use crate::{error, Config};

/// Region used when none can be resolved from the environment
const DEFAULT_REGION: &str = "us-east-1";

/// Load verification [`Config`] from the environment.
#[derive(Default, Debug)]
pub struct ConfigLoader {
    builder: Builder,
    profile: Option<String>,
    region: Option<String>,
    default_region: Option<String>,
    endpoint_url: Option<String>,
    force_path_style: bool,
    no_sign_request: bool,
}

impl ConfigLoader {
    /// Use the named profile from the shared config and credentials files.
    pub fn profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Send requests to this region.
    ///
    /// When neither a region nor an endpoint URL is set the bucket's region is
    /// discovered with `GetBucketLocation`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Region used when none is configured in the environment. Default is `us-east-1`.
    pub fn default_region(mut self, region: impl Into<String>) -> Self {
        self.default_region = Some(region.into());
        self
    }

    /// Send requests to a custom endpoint, it must start with `http://` or `https://`.
    ///
    /// Path-style addressing is implied when the host is `localhost` or an IP address.
    pub fn endpoint_url(mut self, endpoint_url: impl Into<String>) -> Self {
        self.endpoint_url = Some(endpoint_url.into());
        self
    }

    /// Use path-style addressing (`https://host/bucket/key`) instead of virtual-hosted style.
    pub fn force_path_style(mut self, force_path_style: bool) -> Self {
        self.force_path_style = force_path_style;
        self
    }

    /// Send anonymous requests, credentials are not loaded.
    pub fn no_sign_request(mut self, no_sign_request: bool) -> Self {
        self.no_sign_request = no_sign_request;
        self
    }

    /// Size of the buffer used to read local data.
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.builder = self.builder.read_buffer_size(size);
        self
    }

    /// Load the default configuration
    ///
    /// If fields have been overridden during builder construction, the override values will be
    /// used. Otherwise, the default values for each field will be provided.
    pub async fn load(self) -> Result<Config, error::Error> {
        let mut force_path_style = self.force_path_style;
        if let Some(endpoint_url) = self.endpoint_url.as_deref() {
            if implies_path_style(endpoint_url)? && !force_path_style {
                tracing::debug!("Detected IP address in endpoint URL. Implicitly opting in for path style.");
                force_path_style = true;
            }
        }

        let default_region = self
            .default_region
            .unwrap_or_else(|| DEFAULT_REGION.to_owned());
        let region = match self.region.clone() {
            Some(region) => RegionProviderChain::first_try(Region::new(region)),
            None => RegionProviderChain::default_provider(),
        }
        .or_else(Region::new(default_region));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(profile) = self.profile.as_deref() {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint_url) = self.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint_url);
        }
        if self.no_sign_request {
            loader = loader.no_credentials();
        }
        let shared_config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&shared_config)
            .force_path_style(force_path_style)
            .build();
        let client = aws_sdk_s3::Client::from_conf(s3_config);

        let resolve_bucket_region = self.region.is_none() && self.endpoint_url.is_none();
        let builder = self
            .builder
            .client(client)
            .resolve_bucket_region(resolve_bucket_region)
            .dual_stack(dual_stack_from_env());
        Ok(builder.build()?)
    }
}

/// Validate an endpoint URL and return whether it implies path-style addressing
fn implies_path_style(endpoint_url: &str) -> Result<bool, error::Error> {
    let rest = endpoint_url
        .strip_prefix("http://")
        .or_else(|| endpoint_url.strip_prefix("https://"))
        .ok_or_else(|| {
            error::invalid_input("the endpoint URL must start with http:// or https://")
        })?;

    let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
    let host_port = authority.rsplit('@').next().unwrap_or_default();
    let host = match host_port.strip_prefix('[') {
        // bracketed IPv6 literal
        Some(bracketed) => bracketed
            .split(']')
            .next()
            .ok_or_else(|| error::invalid_input("unable to parse the endpoint URL"))?,
        None => host_port.split(':').next().unwrap_or_default(),
    };
    if host.is_empty() {
        return Err(error::invalid_input("unable to parse the endpoint URL"));
    }

    Ok(host == "localhost" || host.parse::<IpAddr>().is_ok())
}

/// Dual-stack endpoints are used unless `AWS_USE_DUALSTACK_ENDPOINT` is `false`
fn dual_stack_from_env() -> bool {
    dual_stack_enabled(std::env::var("AWS_USE_DUALSTACK_ENDPOINT").ok().as_deref())
}

fn dual_stack_enabled(value: Option<&str>) -> bool {
    value != Some("false")
}

#[cfg(test)]
mod tests {
    use super::{dual_stack_enabled, implies_path_style};
    use crate::error::ErrorKind;

    #[test]
    fn test_endpoint_scheme_required() {
        let err = implies_path_style("localhost:9000").unwrap_err();
        assert_eq!(&ErrorKind::InputInvalid, err.kind());
        assert!(implies_path_style("ftp://example.com").is_err());
        assert!(implies_path_style("http://").is_err());
    }

    #[test]
    fn test_endpoint_implies_path_style() {
        assert!(implies_path_style("http://localhost:9000").unwrap());
        assert!(implies_path_style("http://127.0.0.1:9000/").unwrap());
        assert!(implies_path_style("https://[::1]:9000").unwrap());
        assert!(implies_path_style("http://192.168.1.10").unwrap());
        assert!(!implies_path_style("https://s3.example.com").unwrap());
        assert!(!implies_path_style("https://localhost.example.com:443/path").unwrap());
    }

    #[test]
    fn test_dual_stack_enabled() {
        assert!(dual_stack_enabled(None));
        assert!(dual_stack_enabled(Some("true")));
        assert!(!dual_stack_enabled(Some("false")));
    }
}
