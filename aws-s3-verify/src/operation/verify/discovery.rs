/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use aws_sdk_s3::config::Region;
use aws_sdk_s3::types::ObjectAttributes;

use super::event::EventSink;
use super::{ObjectDescriptor, VerifyEvent, VerifyInput};
use crate::error;

/// Largest part listing a single `GetObjectAttributes` request can return
const MAX_PARTS: i32 = 10_000;

/// Fetch the checksum attributes of the object described by `input`.
pub(super) async fn fetch_descriptor(
    handle: &crate::client::Handle,
    input: &VerifyInput,
    events: &mut EventSink,
) -> Result<ObjectDescriptor, error::Error> {
    let config = &handle.config;
    let client = if config.resolve_bucket_region() {
        let region = bucket_region(config.client(), input.bucket()).await?;
        tracing::debug!("bucket region: {region}");
        events.emit(&VerifyEvent::BucketRegionResolved { region: &region });
        regional_client(config.client(), region, config.dual_stack())
    } else {
        config.client().clone()
    };

    let output = client
        .get_object_attributes()
        .bucket(input.bucket())
        .key(input.key())
        .set_version_id(input.version_id().map(str::to_owned))
        .object_attributes(ObjectAttributes::Checksum)
        .object_attributes(ObjectAttributes::ObjectParts)
        .object_attributes(ObjectAttributes::ObjectSize)
        .max_parts(MAX_PARTS)
        .send()
        .await?;
    tracing::debug!("object attributes: {output:?}");

    ObjectDescriptor::try_from(output)
}

async fn bucket_region(client: &aws_sdk_s3::Client, bucket: &str) -> Result<String, error::Error> {
    let output = client.get_bucket_location().bucket(bucket).send().await?;
    Ok(normalize_bucket_location(
        output.location_constraint().map(|c| c.as_str()),
    ))
}

/// Map a `GetBucketLocation` constraint to a region name.
///
/// Buckets in `us-east-1` report no constraint and very old buckets in `eu-west-1`
/// report `EU`.
fn normalize_bucket_location(constraint: Option<&str>) -> String {
    match constraint {
        None | Some("") => "us-east-1",
        Some("EU") => "eu-west-1",
        Some(region) => region,
    }
    .to_owned()
}

fn regional_client(
    client: &aws_sdk_s3::Client,
    region: String,
    dual_stack: bool,
) -> aws_sdk_s3::Client {
    let config = client
        .config()
        .to_builder()
        .region(Region::new(region))
        .use_dual_stack(dual_stack)
        .build();
    aws_sdk_s3::Client::from_conf(config)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use aws_sdk_s3::operation::get_bucket_location::GetBucketLocationOutput;
    use aws_sdk_s3::operation::get_object_attributes::GetObjectAttributesOutput;
    use aws_sdk_s3::types::{BucketLocationConstraint, Checksum, ObjectAttributes};
    use aws_sdk_s3::Client;
    use aws_smithy_mocks_experimental::{mock, mock_client, RuleMode};
    use test_common::{mock_client_with_stubbed_http_client, s3_error_response};

    use super::{fetch_descriptor, normalize_bucket_location};
    use crate::client::Handle;
    use crate::error::ErrorKind;
    use crate::io::LocalSource;
    use crate::operation::verify::event::EventSink;
    use crate::operation::verify::{VerifyEvent, VerifyInput};
    use crate::types::ChecksumAlgorithm;

    fn test_handle(client: Client, resolve_bucket_region: bool) -> Arc<Handle> {
        let config = crate::Config::builder()
            .client(client)
            .resolve_bucket_region(resolve_bucket_region)
            .build()
            .unwrap();
        Arc::new(Handle { config })
    }

    fn test_input() -> VerifyInput {
        VerifyInput::builder()
            .bucket("test-bucket")
            .key("test-key")
            .source(LocalSource::Stdin)
            .build()
            .unwrap()
    }

    fn attributes_output() -> GetObjectAttributesOutput {
        GetObjectAttributesOutput::builder()
            .object_size(10)
            .checksum(Checksum::builder().checksum_crc32_c("Vsu0gA==").build())
            .build()
    }

    #[test]
    fn test_normalize_bucket_location() {
        assert_eq!("us-east-1", normalize_bucket_location(None));
        assert_eq!("us-east-1", normalize_bucket_location(Some("")));
        assert_eq!("eu-west-1", normalize_bucket_location(Some("EU")));
        assert_eq!("ap-south-2", normalize_bucket_location(Some("ap-south-2")));
    }

    #[tokio::test]
    async fn test_fetch_descriptor_requests_attributes() {
        let get_attributes = mock!(Client::get_object_attributes)
            .match_requests(|r| {
                let attributes = r.object_attributes();
                r.bucket() == Some("test-bucket")
                    && r.key() == Some("test-key")
                    && r.version_id().is_none()
                    && r.max_parts() == Some(10_000)
                    && attributes.contains(&ObjectAttributes::Checksum)
                    && attributes.contains(&ObjectAttributes::ObjectParts)
                    && attributes.contains(&ObjectAttributes::ObjectSize)
            })
            .then_output(attributes_output);
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_attributes]);
        let handle = test_handle(client, false);

        let descriptor = fetch_descriptor(&handle, &test_input(), &mut EventSink::default())
            .await
            .unwrap();
        assert_eq!(10, descriptor.object_size());
        assert_eq!(
            Some("Vsu0gA=="),
            descriptor.checksums().checksum(ChecksumAlgorithm::Crc32C)
        );
        assert_eq!(1, get_attributes.num_calls());
    }

    #[tokio::test]
    async fn test_fetch_descriptor_with_version() {
        let get_attributes = mock!(Client::get_object_attributes)
            .match_requests(|r| r.version_id() == Some("v2"))
            .then_output(attributes_output);
        let client = mock_client!(aws_sdk_s3, RuleMode::Sequential, &[&get_attributes]);
        let handle = test_handle(client, false);
        let input = VerifyInput::builder()
            .bucket("test-bucket")
            .key("test-key")
            .version_id("v2")
            .source(LocalSource::Stdin)
            .build()
            .unwrap();

        fetch_descriptor(&handle, &input, &mut EventSink::default())
            .await
            .unwrap();
        assert_eq!(1, get_attributes.num_calls());
    }

    #[tokio::test]
    async fn test_fetch_descriptor_resolves_bucket_region() {
        let get_location = mock!(Client::get_bucket_location)
            .match_requests(|r| r.bucket() == Some("test-bucket"))
            .then_output(|| {
                GetBucketLocationOutput::builder()
                    .location_constraint(BucketLocationConstraint::Eu)
                    .build()
            });
        let get_attributes =
            mock!(Client::get_object_attributes).then_output(attributes_output);
        let client = mock_client!(
            aws_sdk_s3,
            RuleMode::Sequential,
            &[&get_location, &get_attributes]
        );
        let handle = test_handle(client, true);

        let regions = Arc::new(std::sync::Mutex::new(Vec::new()));
        let mut events = EventSink::new({
            let regions = regions.clone();
            move |event| {
                if let VerifyEvent::BucketRegionResolved { region } = event {
                    regions.lock().unwrap().push(region.to_string());
                }
            }
        });

        fetch_descriptor(&handle, &test_input(), &mut events)
            .await
            .unwrap();
        assert_eq!(vec!["eu-west-1".to_string()], *regions.lock().unwrap());
        assert_eq!(1, get_location.num_calls());
        assert_eq!(1, get_attributes.num_calls());
    }

    async fn fetch_error(status: u16, code: &'static str) -> ErrorKind {
        let get_attributes = mock!(Client::get_object_attributes)
            .then_http_response(move || s3_error_response(status, code));
        let client = mock_client_with_stubbed_http_client!(aws_sdk_s3, &[&get_attributes]);
        let handle = test_handle(client, false);

        let err = fetch_descriptor(&handle, &test_input(), &mut EventSink::default())
            .await
            .unwrap_err();
        assert_eq!(1, get_attributes.num_calls());
        err.kind().clone()
    }

    #[tokio::test]
    async fn test_fetch_descriptor_not_found() {
        assert_eq!(ErrorKind::NotFound, fetch_error(404, "NoSuchKey").await);
        assert_eq!(ErrorKind::NotFound, fetch_error(404, "NoSuchBucket").await);
        assert_eq!(ErrorKind::NotFound, fetch_error(404, "NoSuchVersion").await);
    }

    #[tokio::test]
    async fn test_fetch_descriptor_access_denied() {
        assert_eq!(
            ErrorKind::DescriptorUnavailable,
            fetch_error(403, "AccessDenied").await
        );
    }
}
