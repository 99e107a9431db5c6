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

use std::collections::BTreeMap;
use std::fmt::Debug;

use async_trait::async_trait;

use crate::error::LogsError;

#[cfg(test)]
pub mod memory;
pub mod sdk;

pub type Result<T, E = LogsError> = std::result::Result<T, E>;

/// One page of a listing operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LogGroup {
    pub name: String,
    /// ARN without the `:*` wildcard suffix
    pub arn: String,
    pub creation_time: Option<i64>,
    pub retention_in_days: Option<i32>,
    pub kms_key_id: Option<String>,
    pub class: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryDefinition {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CreateLogGroup {
    pub name: String,
    pub kms_key_id: Option<String>,
    pub class: Option<String>,
    pub tags: BTreeMap<String, String>,
}

/// Operations the provider needs from CloudWatch Logs
#[async_trait]
pub trait LogsApi: Debug + Send + Sync + 'static {
    /// List one page of log groups whose name starts with `prefix`
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroup>>;

    /// List one page of saved Logs Insights queries whose name starts with `prefix`
    async fn describe_query_definitions(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<QueryDefinition>>;

    async fn create_log_group(&self, input: &CreateLogGroup) -> Result<()>;

    async fn delete_log_group(&self, name: &str) -> Result<()>;

    async fn put_retention_policy(&self, name: &str, days: i32) -> Result<()>;

    async fn delete_retention_policy(&self, name: &str) -> Result<()>;

    async fn associate_kms_key(&self, name: &str, kms_key_id: &str) -> Result<()>;

    async fn disassociate_kms_key(&self, name: &str) -> Result<()>;

    async fn list_tags_log_group(&self, name: &str) -> Result<BTreeMap<String, String>>;

    async fn tag_log_group(&self, name: &str, tags: &BTreeMap<String, String>) -> Result<()>;

    async fn untag_log_group(&self, name: &str, keys: &[String]) -> Result<()>;
}

/// CloudWatch reports log group ARNs with a trailing `:*`
pub fn trim_arn_wildcard(arn: &str) -> &str {
    arn.strip_suffix(":*").unwrap_or(arn)
}
