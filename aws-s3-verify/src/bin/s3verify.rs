/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use aws_s3_verify::error::{Error, ErrorKind};
use aws_s3_verify::io::LocalSource;
use aws_s3_verify::operation::verify::VerifyOutput;
use aws_s3_verify::report::ConsoleReporter;
use clap::Parser;
use tracing_subscriber::EnvFilter;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Clone, clap::Parser)]
#[command(name = "s3verify", version)]
#[command(about = "Verifies that a local file is identical to an object in S3, without downloading the object.")]
#[command(after_help = "S3Uri must have the format s3://<bucketname>/<key>.")]
struct Args {
    /// Local file to verify, `-` reads from standard input
    #[arg(required = true, value_name = "LocalPath")]
    local_path: LocalPath,

    /// Object to verify against
    #[arg(required = true, value_name = "S3Uri")]
    s3_uri: S3Uri,

    /// Use a specific profile from the credential file
    #[arg(long)]
    profile: Option<String>,

    /// The bucket region, avoids one HTTP request
    #[arg(long)]
    region: Option<String>,

    /// Override the S3 endpoint URL (for use with S3 compatible APIs)
    #[arg(long)]
    endpoint_url: Option<String>,

    /// Verify a specific version of the object
    #[arg(long)]
    version_id: Option<String>,

    /// Do not sign requests
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    no_sign_request: bool,

    /// Use path style addressing
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    use_path_style: bool,

    /// Turn on debug logging
    #[arg(long, default_value_t = false, action = clap::ArgAction::SetTrue)]
    debug: bool,
}

#[derive(Clone, Debug)]
enum LocalPath {
    Stdin,
    Path(PathBuf),
}

impl FromStr for LocalPath {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Err("LocalPath must not be empty".into()),
            "-" => Ok(LocalPath::Stdin),
            path => Ok(LocalPath::Path(PathBuf::from(path))),
        }
    }
}

impl From<LocalPath> for LocalSource {
    fn from(value: LocalPath) -> Self {
        match value {
            LocalPath::Stdin => LocalSource::Stdin,
            LocalPath::Path(path) => LocalSource::Path(path),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
struct S3Uri {
    bucket: String,
    key: String,
}

impl FromStr for S3Uri {
    type Err = BoxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || "The S3Uri must have the format s3://<bucketname>/<key>";
        let rest = s.strip_prefix("s3://").ok_or_else(invalid)?;
        let (bucket, key) = rest.split_once('/').ok_or_else(invalid)?;
        if bucket.is_empty() || key.is_empty() {
            return Err(invalid().into());
        }
        Ok(S3Uri {
            bucket: bucket.to_owned(),
            key: key.to_owned(),
        })
    }
}

/// Map the verification result to the process exit status
fn exit_code(result: &Result<VerifyOutput, Error>) -> u8 {
    match result {
        Ok(output) if output.is_match() => 0,
        Ok(_) => 1,
        Err(err) => match err.kind() {
            ErrorKind::InputInvalid => 2,
            ErrorKind::ObjectSizeMismatch(_) => 3,
            ErrorKind::UnsupportedAlgorithm => 4,
            ErrorKind::MalformedDescriptor => 5,
            ErrorKind::NotFound | ErrorKind::DescriptorUnavailable => 6,
            ErrorKind::IOError => 7,
            _ => 2,
        },
    }
}

async fn do_verify(args: Args) -> Result<VerifyOutput, Error> {
    let mut loader = aws_s3_verify::from_env()
        .force_path_style(args.use_path_style)
        .no_sign_request(args.no_sign_request);
    if let Some(profile) = args.profile {
        loader = loader.profile(profile);
    }
    if let Some(region) = args.region {
        loader = loader.region(region);
    }
    if let Some(endpoint_url) = args.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    let config = loader.load().await?;
    let client = aws_s3_verify::Client::new(config);

    let mut progress = ConsoleReporter::stdio();
    client
        .verify()
        .bucket(args.s3_uri.bucket)
        .key(args.s3_uri.key)
        .set_version_id(args.version_id)
        .source(LocalSource::from(args.local_path))
        .on_event(move |event| {
            if let Err(err) = progress.event(event) {
                tracing::warn!("failed to write progress: {err}");
            }
        })
        .send()
        .await
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let filter = if args.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_thread_ids(true)
        .init();

    let result = do_verify(args).await;

    let mut reporter = ConsoleReporter::stdio();
    let written = match &result {
        Ok(output) => reporter.output(output),
        Err(err) => {
            tracing::debug!("verification failed: {err:?}");
            reporter.error(err)
        }
    };
    if let Err(err) = written {
        tracing::warn!("failed to write result: {err}");
    }

    ExitCode::from(exit_code(&result))
}
