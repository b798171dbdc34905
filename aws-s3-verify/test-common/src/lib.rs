/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use std::io::Write;
use std::str::FromStr;

use aws_sdk_s3::config::http::HttpResponse;
use aws_sdk_s3::config::SharedHttpClient;
use aws_smithy_checksums::ChecksumAlgorithm;
use aws_smithy_runtime_api::http::StatusCode;
use aws_smithy_types::body::SdkBody;
use tempfile::NamedTempFile;

#[doc(hidden)]
pub use aws_smithy_mocks_experimental;

fn raw_checksum(algorithm: &str, data: &[u8]) -> Vec<u8> {
    let algorithm = ChecksumAlgorithm::from_str(algorithm).unwrap();
    let mut hasher = algorithm.into_impl();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Base64 encoded checksum of `data`, as S3 would report it for a single part upload.
///
/// `algorithm` is one of `sha1`, `sha256`, `crc32`, `crc32c` (case insensitive).
pub fn checksum(algorithm: &str, data: &[u8]) -> String {
    aws_smithy_types::base64::encode(raw_checksum(algorithm, data))
}

/// Base64 encoded checksum of the raw checksums of `parts`, without a part count suffix
pub fn composite_checksum(algorithm: &str, parts: &[&[u8]]) -> String {
    let digests: Vec<u8> = parts
        .iter()
        .flat_map(|part| raw_checksum(algorithm, part))
        .collect();
    checksum(algorithm, &digests)
}

/// Split `data` into consecutive parts of `part_size` bytes, the last part may be shorter
pub fn split_parts(data: &[u8], part_size: usize) -> Vec<&[u8]> {
    data.chunks(part_size).collect()
}

/// Create a temporary file with the given content
pub fn create_test_file(data: &[u8]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(data).unwrap();
    file.flush().unwrap();
    file
}

/// HTTP client that answers every request with an empty `200 OK`.
///
/// Mock rules replace the response (or the output) before it reaches the caller.
pub fn stubbed_http_client() -> SharedHttpClient {
    aws_smithy_http_client::test_util::infallible_client_fn(|_req| {
        http_1x::Response::builder()
            .status(200)
            .body(SdkBody::empty())
            .unwrap()
    })
}

/// Create a mocked client that sends requests through [`stubbed_http_client`].
///
/// Required for rules built with `then_http_response`, which rewrite a real HTTP response.
#[macro_export]
macro_rules! mock_client_with_stubbed_http_client {
    ($aws_crate: ident, $rules: expr) => {
        $crate::mock_client_with_stubbed_http_client!(
            $aws_crate,
            $crate::aws_smithy_mocks_experimental::RuleMode::Sequential,
            $rules
        )
    };
    ($aws_crate: ident, $rule_mode: expr, $rules: expr) => {{
        $crate::aws_smithy_mocks_experimental::mock_client!(
            $aws_crate,
            $rule_mode,
            $rules,
            |conf| conf.http_client($crate::stubbed_http_client())
        )
    }};
}

/// An S3 REST XML error response with the given HTTP status and error code
pub fn s3_error_response(status: u16, code: &str) -> HttpResponse {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Error>
    <Code>{code}</Code>
    <Message>stubbed {code} error</Message>
    <RequestId>4442587FB7D0A2F9</RequestId>
</Error>"#
    );
    HttpResponse::new(StatusCode::try_from(status).unwrap(), SdkBody::from(body))
}
