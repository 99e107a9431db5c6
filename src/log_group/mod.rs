// This file is part of the terraform-provider-awslogs project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use tf_provider::{AttributePath, Diagnostics};

use crate::connection::{LogGroup, LogsApi, Result};
use crate::generate::describe_log_groups_pages;
use crate::utils::{DisplayJoinable, UNIQUE_ID_SUFFIX_LENGTH};

mod data_source;
mod normalize;
mod read;
mod resource;
mod state;
mod validate;

pub use data_source::LogGroupDataSource;
pub use resource::LogGroupResource;

/// Retention periods accepted by PutRetentionPolicy, 0 standing for "never expire"
pub(crate) const RETENTION_DAYS: &[i64] = &[
    0, 1, 3, 5, 7, 14, 30, 60, 90, 120, 150, 180, 365, 400, 545, 731, 1096, 1827, 2192, 2557,
    2922, 3288, 3653,
];

pub(crate) const LOG_GROUP_CLASSES: &[&str] = &["STANDARD", "INFREQUENT_ACCESS"];
pub(crate) const DEFAULT_LOG_GROUP_CLASS: &str = "STANDARD";

const NAME_MAX_LENGTH: usize = 512;
const NAME_PREFIX_MAX_LENGTH: usize = NAME_MAX_LENGTH - UNIQUE_ID_SUFFIX_LENGTH;

/// Look a log group up by its exact name.
///
/// DescribeLogGroups only filters by prefix, so the name is used as the
/// prefix and the pages are scanned for an exact match.
pub(crate) async fn find_log_group_by_name(
    api: &dyn LogsApi,
    name: &str,
) -> Result<Option<LogGroup>> {
    let mut found = None;
    describe_log_groups_pages(api, Some(name), |groups, _| {
        found = groups.iter().find(|group| group.name == name).cloned();
        found.is_none()
    })
    .await?;
    Ok(found)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_' | '/' | '#')
}

/// Check a log group name (or name prefix) and report problems on `attr_path`
pub(crate) fn validate_name(
    diags: &mut Diagnostics,
    attr_path: AttributePath,
    name: &str,
    max_length: usize,
    allow_empty: bool,
) {
    if name.is_empty() && !allow_empty {
        diags.error_short("Log group name must not be empty", attr_path);
    } else if name.len() > max_length {
        diags.error(
            "Log group name is too long",
            format!("`{name}` is {} characters long, at most {max_length} are allowed.", name.len()),
            attr_path,
        );
    } else if name.chars().any(|c| !is_name_char(c)) {
        diags.error(
            "Invalid log group name",
            format!(
                "`{name}` contains invalid characters: {}. Only alphanumeric characters and {} are allowed.",
                name.chars().filter(|c| !is_name_char(*c)).map(|c| format!("`{c}`")).join_with(", "),
                ['.', '-', '_', '/', '#'].iter().map(|c| format!("`{c}`")).join_with(", "),
            ),
            attr_path,
        );
    }
}
