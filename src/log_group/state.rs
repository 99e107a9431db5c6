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

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueMap, ValueNumber, ValueString};
use tf_provider::{map, Schema};

use crate::utils::WithSchema;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceState<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub name_prefix: ValueString<'a>,
    pub retention_in_days: ValueNumber,
    pub kms_key_id: ValueString<'a>,
    pub log_group_class: ValueString<'a>,
    pub skip_destroy: Value<bool>,
    pub tags: ValueMap<'a, ValueString<'a>>,
    pub tags_all: ValueMap<'a, ValueString<'a>>,
    pub arn: ValueString<'a>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataSourceState<'a> {
    pub id: ValueString<'a>,
    pub name: ValueString<'a>,
    pub arn: ValueString<'a>,
    pub creation_time: ValueNumber,
    pub retention_in_days: ValueNumber,
    pub kms_key_id: ValueString<'a>,
    pub log_group_class: ValueString<'a>,
    pub tags: ValueMap<'a, ValueString<'a>>,
}

fn attribute(attr_type: AttributeType, constraint: AttributeConstraint, description: &str) -> Attribute {
    Attribute {
        attr_type,
        description: Description::plain(description),
        constraint,
        ..Default::default()
    }
}

fn string_map() -> AttributeType {
    AttributeType::Map(Box::new(AttributeType::String))
}

impl<'a> WithSchema for ResourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Optional, OptionalComputed};

        let attributes: HashMap<_, _> = map! {
            "id" => attribute(AttributeType::String, Computed, "Name of the log group"),
            "name" => attribute(AttributeType::String, OptionalComputed, "Name of the log group. Conflicts with `name_prefix`. Generated when neither is set. Changing it recreates the log group."),
            "name_prefix" => attribute(AttributeType::String, OptionalComputed, "Creates a unique name beginning with the specified prefix. Conflicts with `name`."),
            "retention_in_days" => attribute(AttributeType::Number, OptionalComputed, "Number of days log events are retained, 0 meaning forever."),
            "kms_key_id" => attribute(AttributeType::String, Optional, "ARN of the KMS key used to encrypt the log data."),
            "log_group_class" => attribute(AttributeType::String, OptionalComputed, "Log class of the log group: `STANDARD` or `INFREQUENT_ACCESS`. Changing it recreates the log group."),
            "skip_destroy" => attribute(AttributeType::Bool, Optional, "Keep the log group in AWS when it is destroyed, only removing it from the Terraform state."),
            "tags" => attribute(string_map(), Optional, "Tags of the log group"),
            "tags_all" => attribute(string_map(), Computed, "Tags of the log group, including the provider `default_tags`"),
            "arn" => attribute(AttributeType::String, Computed, "ARN of the log group"),
        };

        Schema {
            version: 1,
            block: Block {
                attributes,
                description: Description::plain("CloudWatch Logs log group"),
                ..Default::default()
            },
        }
    }
}

impl<'a> WithSchema for DataSourceState<'a> {
    fn schema() -> Schema {
        use AttributeConstraint::{Computed, Required};

        let attributes: HashMap<_, _> = map! {
            "id" => attribute(AttributeType::String, Computed, "Name of the log group"),
            "name" => attribute(AttributeType::String, Required, "Name of the log group"),
            "arn" => attribute(AttributeType::String, Computed, "ARN of the log group"),
            "creation_time" => attribute(AttributeType::Number, Computed, "Creation time of the log group, in milliseconds since the epoch"),
            "retention_in_days" => attribute(AttributeType::Number, Computed, "Number of days log events are retained, 0 meaning forever"),
            "kms_key_id" => attribute(AttributeType::String, Computed, "ARN of the KMS key used to encrypt the log data"),
            "log_group_class" => attribute(AttributeType::String, Computed, "Log class of the log group"),
            "tags" => attribute(string_map(), Computed, "Tags of the log group"),
        };

        Schema {
            version: 1,
            block: Block {
                attributes,
                description: Description::plain("Look up a CloudWatch Logs log group by name"),
                ..Default::default()
            },
        }
    }
}
