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

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_cloudwatchlogs::types::LogGroupClass;
use aws_sdk_cloudwatchlogs::Client;
use tracing::{debug, instrument, warn};

use crate::error::{classify, LogsError};

use super::{trim_arn_wildcard, CreateLogGroup, LogGroup, LogsApi, Page, QueryDefinition, Result};

/// [`LogsApi`] backed by the AWS SDK client
#[derive(Debug, Clone)]
pub struct SdkLogs {
    client: Client,
}

impl SdkLogs {
    pub fn new(sdk_config: &aws_config::SdkConfig) -> Self {
        Self {
            client: Client::new(sdk_config),
        }
    }
}

fn from_sdk<E, R>(err: SdkError<E, R>) -> LogsError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let context = DisplayErrorContext(&err).to_string();
    let err = match err {
        SdkError::TimeoutError(_) => LogsError::Timeout,
        SdkError::DispatchFailure(_) => LogsError::Connection(context),
        err => classify(err.code(), err.message().unwrap_or(&context)),
    };
    warn!(error = %err, "CloudWatch Logs call failed");
    err
}

fn to_hash_map(tags: &BTreeMap<String, String>) -> HashMap<String, String> {
    tags.iter().map(|(k, v)| (k.clone(), v.clone())).collect()
}

#[async_trait]
impl LogsApi for SdkLogs {
    #[instrument(skip(self))]
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroup>> {
        let output = self
            .client
            .describe_log_groups()
            .set_log_group_name_prefix(prefix.map(str::to_owned))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(from_sdk)?;

        let items: Vec<_> = output
            .log_groups()
            .iter()
            .map(|group| LogGroup {
                name: group.log_group_name().unwrap_or_default().to_owned(),
                arn: trim_arn_wildcard(group.arn().unwrap_or_default()).to_owned(),
                creation_time: group.creation_time(),
                retention_in_days: group.retention_in_days(),
                kms_key_id: group.kms_key_id().map(str::to_owned),
                class: group.log_group_class().map(|c| c.as_str().to_owned()),
            })
            .collect();
        debug!(count = items.len(), "described log groups");

        Ok(Page {
            items,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    #[instrument(skip(self))]
    async fn describe_query_definitions(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<QueryDefinition>> {
        let output = self
            .client
            .describe_query_definitions()
            .set_query_definition_name_prefix(prefix.map(str::to_owned))
            .set_next_token(next_token)
            .send()
            .await
            .map_err(from_sdk)?;

        let items = output
            .query_definitions()
            .iter()
            .map(|query| QueryDefinition {
                id: query.query_definition_id().unwrap_or_default().to_owned(),
                name: query.name().unwrap_or_default().to_owned(),
            })
            .collect();

        Ok(Page {
            items,
            next_token: output.next_token().map(str::to_owned),
        })
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    async fn create_log_group(&self, input: &CreateLogGroup) -> Result<()> {
        let tags = if input.tags.is_empty() {
            None
        } else {
            Some(to_hash_map(&input.tags))
        };
        self.client
            .create_log_group()
            .log_group_name(&input.name)
            .set_kms_key_id(input.kms_key_id.clone())
            .set_log_group_class(input.class.as_deref().map(LogGroupClass::from))
            .set_tags(tags)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_log_group(&self, name: &str) -> Result<()> {
        self.client
            .delete_log_group()
            .log_group_name(name)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn put_retention_policy(&self, name: &str, days: i32) -> Result<()> {
        self.client
            .put_retention_policy()
            .log_group_name(name)
            .retention_in_days(days)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_retention_policy(&self, name: &str) -> Result<()> {
        self.client
            .delete_retention_policy()
            .log_group_name(name)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn associate_kms_key(&self, name: &str, kms_key_id: &str) -> Result<()> {
        self.client
            .associate_kms_key()
            .log_group_name(name)
            .kms_key_id(kms_key_id)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn disassociate_kms_key(&self, name: &str) -> Result<()> {
        self.client
            .disassociate_kms_key()
            .log_group_name(name)
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    #[allow(deprecated)]
    async fn list_tags_log_group(&self, name: &str) -> Result<BTreeMap<String, String>> {
        let output = self
            .client
            .list_tags_log_group()
            .log_group_name(name)
            .send()
            .await
            .map_err(from_sdk)?;

        Ok(output
            .tags()
            .into_iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect())
    }

    #[instrument(skip(self, tags))]
    #[allow(deprecated)]
    async fn tag_log_group(&self, name: &str, tags: &BTreeMap<String, String>) -> Result<()> {
        self.client
            .tag_log_group()
            .log_group_name(name)
            .set_tags(Some(to_hash_map(tags)))
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }

    #[instrument(skip(self))]
    #[allow(deprecated)]
    async fn untag_log_group(&self, name: &str, keys: &[String]) -> Result<()> {
        self.client
            .untag_log_group()
            .log_group_name(name)
            .set_tags(Some(keys.to_vec()))
            .send()
            .await
            .map_err(from_sdk)?;
        Ok(())
    }
}
