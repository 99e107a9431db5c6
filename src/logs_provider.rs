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

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use tf_provider::{map, AttributePath, Diagnostics, Provider, Schema, ValueEmpty};

use crate::{
    config::ProviderConfig,
    connection::{sdk::SdkLogs, LogsApi},
    log_group::{LogGroupDataSource, LogGroupResource},
    log_groups::LogGroupsDataSource,
    query_definitions::QueryDefinitionsDataSource,
    tags::{DefaultConfig, IgnoreConfig},
    utils::{WithSchema, WithValidate},
};

/// Everything resources and data sources need once the provider is configured
#[derive(Debug)]
pub struct ProviderMeta {
    pub api: Arc<dyn LogsApi>,
    pub region: String,
    pub default_tags: DefaultConfig,
    pub ignore_tags: IgnoreConfig,
}

/// Shared between the provider and every resource and data source it serves.
/// Filled by `configure`.
#[derive(Debug, Default, Clone)]
pub struct LogsHandle(Arc<RwLock<Option<Arc<ProviderMeta>>>>);

impl LogsHandle {
    #[cfg(test)]
    pub fn with_meta(meta: ProviderMeta) -> Self {
        Self(Arc::new(RwLock::new(Some(Arc::new(meta)))))
    }

    pub async fn set(&self, meta: ProviderMeta) {
        *self.0.write().await = Some(Arc::new(meta));
    }

    /// Configured provider, or an error diagnostic when `configure` has not run
    pub async fn get(&self, diags: &mut Diagnostics) -> Option<Arc<ProviderMeta>> {
        let meta = self.0.read().await.clone();
        if meta.is_none() {
            diags.root_error(
                "Provider is not configured",
                "The CloudWatch Logs client is only available once the provider has been configured.",
            );
        }
        meta
    }
}

#[derive(Debug, Default, Clone)]
pub struct LogsProvider {
    handle: LogsHandle,
}

#[async_trait]
impl Provider for LogsProvider {
    type Config<'a> = ProviderConfig<'a>;
    type MetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ProviderConfig::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::Config<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn configure<'a>(
        &self,
        diags: &mut Diagnostics,
        terraform_version: String,
        config: Self::Config<'a>,
    ) -> Option<()> {
        let settings = config.aws_settings();
        info!(terraform_version = %terraform_version, settings = ?settings, "configuring provider");

        let sdk_config = settings.build_sdk_config().await;
        let Some(region) = sdk_config.region().map(|r| r.to_string()) else {
            diags.error(
                "Missing AWS region",
                "Set `region` in the provider block, or AWS_REGION in the environment.",
                AttributePath::new("region"),
            );
            return None;
        };

        self.handle
            .set(ProviderMeta {
                api: Arc::new(SdkLogs::new(&sdk_config)),
                region,
                default_tags: config.default_tags(),
                ignore_tags: config.ignore_tags(),
            })
            .await;

        Some(())
    }

    fn get_resources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<std::collections::HashMap<String, Box<dyn tf_provider::resource::DynamicResource>>>
    {
        Some(map! {
            "aws_cloudwatch_log_group" => LogGroupResource::new(self.handle.clone()),
        })
    }

    fn get_data_sources(
        &self,
        _diags: &mut Diagnostics,
    ) -> Option<
        std::collections::HashMap<String, Box<dyn tf_provider::data_source::DynamicDataSource>>,
    > {
        Some(map! {
            "aws_cloudwatch_log_group"             => LogGroupDataSource::new(self.handle.clone()),
            "aws_cloudwatch_log_groups"            => LogGroupsDataSource::new(self.handle.clone()),
            "aws_cloudwatch_log_query_definitions" => QueryDefinitionsDataSource::new(self.handle.clone()),
        })
    }
}
