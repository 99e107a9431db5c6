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

use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};
use tracing::debug;

use crate::connection::LogGroup;
use crate::generate::list_tags;
use crate::logs_provider::ProviderMeta;
use crate::tags::{DefaultConfig, KeyValueTags};

use super::state::{DataSourceState, ResourceState};
use super::{find_log_group_by_name, DEFAULT_LOG_GROUP_CLASS};

/// Fetch a log group and its tags. `Some(None)` when the log group does not exist.
pub(super) async fn fetch(
    diags: &mut Diagnostics,
    meta: &ProviderMeta,
    name: &str,
) -> Option<Option<(LogGroup, KeyValueTags)>> {
    let api = meta.api.as_ref();
    let (group, tags) = futures::join!(find_log_group_by_name(api, name), list_tags(api, name));

    let group = match group {
        Ok(Some(group)) => group,
        Ok(None) => {
            debug!(name, "log group not found");
            return Some(None);
        }
        Err(err) => {
            diags.error(
                "Failed to read log group",
                err.to_string(),
                AttributePath::new("name"),
            );
            return None;
        }
    };

    let tags = match tags {
        Ok(tags) => tags.ignore(&meta.ignore_tags),
        Err(err) if err.is_not_found() => return Some(None),
        Err(err) => {
            diags.error(
                "Failed to list log group tags",
                err.to_string(),
                AttributePath::new("tags"),
            );
            return None;
        }
    };

    Some(Some((group, tags)))
}

fn owned<'a>(s: String) -> Value<Cow<'a, str>> {
    Value::Value(Cow::Owned(s))
}

impl<'a> ResourceState<'a> {
    /// Refresh the state from CloudWatch Logs. `Some(false)` when the log group is gone.
    pub(super) async fn read_remote(
        &mut self,
        diags: &mut Diagnostics,
        meta: &ProviderMeta,
        name: &str,
    ) -> Option<bool> {
        let Some((group, tags_all)) = fetch(diags, meta, name).await? else {
            return Some(false);
        };
        self.apply(group, &tags_all, &meta.default_tags);
        Some(true)
    }

    fn apply(&mut self, group: LogGroup, tags_all: &KeyValueTags, default_tags: &DefaultConfig) {
        let configured = KeyValueTags::from_value(&self.tags);
        let tags = default_tags.resource_tags(tags_all, &configured);

        self.id = owned(group.name.clone());
        self.name = owned(group.name);
        self.arn = owned(group.arn);
        self.retention_in_days = Value::Value(group.retention_in_days.unwrap_or(0).into());
        self.kms_key_id = group.kms_key_id.map_or(Value::Null, owned);
        self.log_group_class =
            owned(group.class.unwrap_or_else(|| DEFAULT_LOG_GROUP_CLASS.to_owned()));
        self.tags = if tags.is_empty() && self.tags.is_null() {
            Value::Null
        } else {
            tags.to_value()
        };
        self.tags_all = tags_all.to_value();
    }
}

impl<'a> DataSourceState<'a> {
    pub(super) fn apply(&mut self, group: LogGroup, tags: &KeyValueTags) {
        self.id = owned(group.name.clone());
        self.name = owned(group.name);
        self.arn = owned(group.arn);
        self.creation_time = group.creation_time.map_or(Value::Null, Value::Value);
        self.retention_in_days = Value::Value(group.retention_in_days.unwrap_or(0).into());
        self.kms_key_id = group.kms_key_id.map_or(Value::Null, owned);
        self.log_group_class =
            owned(group.class.unwrap_or_else(|| DEFAULT_LOG_GROUP_CLASS.to_owned()));
        self.tags = tags.to_value();
    }
}
