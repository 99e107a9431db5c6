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
use tf_provider::value::Value;
use tf_provider::{AttributePath, Diagnostics};

use crate::tags::AWS_TAG_KEY_PREFIX;
use crate::utils::{DisplayJoinable, WithValidate};

use super::state::{DataSourceState, ResourceState};
use super::{
    validate_name, LOG_GROUP_CLASSES, NAME_MAX_LENGTH, NAME_PREFIX_MAX_LENGTH, RETENTION_DAYS,
};

#[async_trait]
impl<'a> WithValidate for ResourceState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(name) = &self.name {
            validate_name(
                diags,
                attr_path.clone().attribute("name"),
                name,
                NAME_MAX_LENGTH,
                false,
            );
        }
        if let Value::Value(prefix) = &self.name_prefix {
            validate_name(
                diags,
                attr_path.clone().attribute("name_prefix"),
                prefix,
                NAME_PREFIX_MAX_LENGTH,
                true,
            );
        }
        if !self.name.is_null() && !self.name_prefix.is_null() {
            diags.error(
                "Conflicting configuration arguments",
                "`name` and `name_prefix` cannot be set together.",
                attr_path.clone().attribute("name_prefix"),
            );
        }

        if let Value::Value(days) = self.retention_in_days {
            if !RETENTION_DAYS.contains(&days) {
                diags.error(
                    "Invalid retention period",
                    format!(
                        "`retention_in_days` is {days}, expected one of: {}",
                        RETENTION_DAYS.iter().join_with(", ")
                    ),
                    attr_path.clone().attribute("retention_in_days"),
                );
            }
        }

        if let Value::Value(class) = &self.log_group_class {
            if !LOG_GROUP_CLASSES.contains(&class.as_ref()) {
                diags.error(
                    "Invalid log group class",
                    format!(
                        "`log_group_class` is `{class}`, expected one of: {}",
                        LOG_GROUP_CLASSES.iter().join_with(", ")
                    ),
                    attr_path.clone().attribute("log_group_class"),
                );
            }
        }

        if let Value::Value(kms_key_id) = &self.kms_key_id {
            if kms_key_id.is_empty() {
                diags.error_short(
                    "`kms_key_id` must not be empty",
                    attr_path.clone().attribute("kms_key_id"),
                );
            }
        }

        for key in self.tags.iter().flatten().map(|(key, _)| key) {
            if key.starts_with(AWS_TAG_KEY_PREFIX) {
                diags.error(
                    "Reserved tag key",
                    format!("Tag keys starting with `{AWS_TAG_KEY_PREFIX}` are reserved for AWS use."),
                    attr_path.clone().attribute("tags").key(key.to_string()),
                );
            }
        }
    }
}

#[async_trait]
impl<'a> WithValidate for DataSourceState<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        if let Value::Value(name) = &self.name {
            validate_name(
                diags,
                attr_path.attribute("name"),
                name,
                NAME_MAX_LENGTH,
                false,
            );
        }
    }
}
