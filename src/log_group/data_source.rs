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

use async_trait::async_trait;

use tf_provider::{AttributePath, DataSource, Diagnostics, Schema, ValueEmpty};

use crate::logs_provider::LogsHandle;
use crate::utils::{WithSchema, WithValidate};

use super::read::fetch;
use super::state::DataSourceState;

#[derive(Debug, Default)]
pub struct LogGroupDataSource {
    pub(super) handle: LogsHandle,
}

impl LogGroupDataSource {
    pub fn new(handle: LogsHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for LogGroupDataSource {
    type State<'a> = DataSourceState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(DataSourceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, AttributePath::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let meta = self.handle.get(diags).await?;
        let name = config.name.as_str().to_owned();

        let Some((group, tags)) = fetch(diags, &meta, &name).await? else {
            diags.error(
                "Log group not found",
                format!("No CloudWatch Logs log group is named `{name}` in {}.", meta.region),
                AttributePath::new("name"),
            );
            return None;
        };

        let mut state = config.clone();
        state.apply(group, &tags);
        Some(state)
    }
}
