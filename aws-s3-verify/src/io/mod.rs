/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

pub(crate) mod part_reader;
mod source;

// re-exports
pub(crate) use self::part_reader::PartReader;
pub use self::source::LocalSource;
pub use self::source::LocalStream;
