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

use std::borrow::Cow;
use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, AttributePath, DataSource, Diagnostics, Schema, ValueEmpty};

use crate::generate::describe_log_groups_pages;
use crate::logs_provider::LogsHandle;
use crate::utils::{non_empty, string_set, WithSchema, WithValidate};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogGroupsState<'a> {
    pub id: ValueString<'a>,
    pub log_group_name_prefix: ValueString<'a>,
    pub arns: Value<BTreeSet<ValueString<'a>>>,
    pub log_group_names: Value<BTreeSet<ValueString<'a>>>,
}

impl<'a> WithSchema for LogGroupsState<'a> {
    fn schema() -> Schema {
        let string_set = AttributeType::Set(Box::new(AttributeType::String));
        let attributes: HashMap<_, _> = map! {
            "id" => Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("AWS region the log groups were listed in"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
            "log_group_name_prefix" => Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("Only list the log groups whose name starts with this prefix"),
                constraint: AttributeConstraint::Optional,
                ..Default::default()
            },
            "arns" => Attribute {
                attr_type: string_set.clone(),
                description: Description::plain("ARNs of the matching log groups"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
            "log_group_names" => Attribute {
                attr_type: string_set,
                description: Description::plain("Names of the matching log groups"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        };

        Schema {
            version: 1,
            block: Block {
                attributes,
                description: Description::plain("List CloudWatch Logs log groups, optionally filtered by name prefix"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for LogGroupsState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Some(prefix) = self.log_group_name_prefix.as_deref_option() {
            if prefix.len() > 512 {
                diags.error(
                    "Log group name prefix is too long",
                    format!("`{prefix}` is {} characters long, at most 512 are allowed.", prefix.len()),
                    attr_path.attribute("log_group_name_prefix"),
                );
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct LogGroupsDataSource {
    handle: LogsHandle,
}

impl LogGroupsDataSource {
    pub fn new(handle: LogsHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for LogGroupsDataSource {
    type State<'a> = LogGroupsState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(LogGroupsState::schema())
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
        let prefix = non_empty(&config.log_group_name_prefix);

        let mut arns = Vec::new();
        let mut names = Vec::new();
        let listed = describe_log_groups_pages(meta.api.as_ref(), prefix, |groups, _| {
            for group in groups {
                arns.push(group.arn.clone());
                names.push(group.name.clone());
            }
            true
        })
        .await;

        if let Err(err) = listed {
            diags.root_error("Failed to describe CloudWatch Logs log groups", err.to_string());
            return None;
        }
        debug!(prefix, count = names.len(), "listed log groups");

        let mut state = config.clone();
        state.id = Value::Value(Cow::Owned(meta.region.clone()));
        state.arns = string_set(arns);
        state.log_group_names = string_set(names);
        Some(state)
    }
}
