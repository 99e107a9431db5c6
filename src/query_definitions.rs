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
use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueString};
use tf_provider::{map, DataSource, Diagnostics, Schema, ValueEmpty};

use crate::generate::describe_query_definitions_pages;
use crate::logs_provider::LogsHandle;
use crate::utils::{non_empty, string_list, WithSchema};

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDefinitionsState<'a> {
    pub id: ValueString<'a>,
    pub name_prefix: ValueString<'a>,
    pub ids: Value<Vec<ValueString<'a>>>,
    pub names: Value<Vec<ValueString<'a>>>,
}

impl<'a> WithSchema for QueryDefinitionsState<'a> {
    fn schema() -> Schema {
        let string_list = AttributeType::List(Box::new(AttributeType::String));
        let attributes: HashMap<_, _> = map! {
            "id" => Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("AWS region the query definitions were listed in"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
            "name_prefix" => Attribute {
                attr_type: AttributeType::String,
                description: Description::plain("Only list the query definitions whose name starts with this prefix"),
                constraint: AttributeConstraint::Optional,
                ..Default::default()
            },
            "ids" => Attribute {
                attr_type: string_list.clone(),
                description: Description::plain("Identifiers of the matching query definitions"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
            "names" => Attribute {
                attr_type: string_list,
                description: Description::plain("Names of the matching query definitions, in the same order as `ids`"),
                constraint: AttributeConstraint::Computed,
                ..Default::default()
            },
        };

        Schema {
            version: 1,
            block: Block {
                attributes,
                description: Description::plain("List CloudWatch Logs Insights query definitions"),
                ..Default::default()
            },
        }
    }
}

#[derive(Debug, Default)]
pub struct QueryDefinitionsDataSource {
    handle: LogsHandle,
}

impl QueryDefinitionsDataSource {
    pub fn new(handle: LogsHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl DataSource for QueryDefinitionsDataSource {
    type State<'a> = QueryDefinitionsState<'a>;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(QueryDefinitionsState::schema())
    }

    async fn validate<'a>(&self, _diags: &mut Diagnostics, _config: Self::State<'a>) -> Option<()> {
        Some(())
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        config: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<Self::State<'a>> {
        let meta = self.handle.get(diags).await?;

        let mut queries = Vec::new();
        let listed = describe_query_definitions_pages(
            meta.api.as_ref(),
            non_empty(&config.name_prefix),
            |page, _| {
                queries.extend_from_slice(page);
                true
            },
        )
        .await;

        if let Err(err) = listed {
            diags.root_error("Failed to describe CloudWatch Logs query definitions", err.to_string());
            return None;
        }

        let mut state = config.clone();
        state.id = Value::Value(Cow::Owned(meta.region.clone()));
        state.ids = string_list(queries.iter().map(|query| query.id.clone()));
        state.names = string_list(queries.into_iter().map(|query| query.name));
        Some(state)
    }
}
