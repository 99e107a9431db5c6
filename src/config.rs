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

use std::collections::BTreeSet;

use async_trait::async_trait;
use aws_sdk_cloudwatchlogs::config::Credentials;
use serde::{Deserialize, Serialize};
use tf_provider::schema::{Attribute, AttributeConstraint, AttributeType, Block, Description};
use tf_provider::value::{Value, ValueMap, ValueString};
use tf_provider::{map, AttributePath, Diagnostics, Schema};
use tracing::{debug, info};

use crate::tags::{DefaultConfig, IgnoreConfig, KeyValueTags};
use crate::utils::{non_empty, WithSchema, WithValidate};

const DEFAULT_SESSION_NAME: &str = "terraform-provider-awslogs";

/// Provider block as written in the Terraform configuration
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig<'a> {
    pub region: ValueString<'a>,
    pub profile: ValueString<'a>,
    pub access_key: ValueString<'a>,
    pub secret_key: ValueString<'a>,
    pub token: ValueString<'a>,
    pub endpoint: ValueString<'a>,
    pub assume_role_arn: ValueString<'a>,
    pub external_id: ValueString<'a>,
    pub session_name: ValueString<'a>,
    pub default_tags: ValueMap<'a, ValueString<'a>>,
    pub ignore_tags_keys: Value<BTreeSet<ValueString<'a>>>,
    pub ignore_tags_key_prefixes: Value<BTreeSet<ValueString<'a>>>,
}

fn optional_string(description: &str, sensitive: bool) -> Attribute {
    Attribute {
        attr_type: AttributeType::String,
        description: Description::plain(description),
        constraint: AttributeConstraint::Optional,
        sensitive,
        ..Default::default()
    }
}

impl<'a> WithSchema for ProviderConfig<'a> {
    fn schema() -> Schema {
        Schema {
            version: 1,
            block: Block {
                attributes: map! {
                    "region" => optional_string("AWS region. Defaults to the region of the AWS environment (AWS_REGION, shared config).", false),
                    "profile" => optional_string("Shared configuration profile to use.", false),
                    "access_key" => optional_string("Static access key, used together with `secret_key`.", false),
                    "secret_key" => optional_string("Static secret key, used together with `access_key`.", true),
                    "token" => optional_string("Session token for the static credentials.", true),
                    "endpoint" => optional_string("CloudWatch Logs endpoint override, e.g. a LocalStack URL.", false),
                    "assume_role_arn" => optional_string("IAM role assumed through STS before calling CloudWatch Logs.", false),
                    "external_id" => optional_string("External ID used when assuming `assume_role_arn`.", false),
                    "session_name" => optional_string("STS session name used when assuming `assume_role_arn`.", false),
                    "default_tags" => Attribute {
                        attr_type: AttributeType::Map(Box::new(AttributeType::String)),
                        description: Description::plain("Tags applied to every resource managed by the provider."),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "ignore_tags_keys" => Attribute {
                        attr_type: AttributeType::Set(Box::new(AttributeType::String)),
                        description: Description::plain("Tag keys ignored when reading resources."),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                    "ignore_tags_key_prefixes" => Attribute {
                        attr_type: AttributeType::Set(Box::new(AttributeType::String)),
                        description: Description::plain("Tag key prefixes ignored when reading resources."),
                        constraint: AttributeConstraint::Optional,
                        ..Default::default()
                    },
                },
                description: Description::plain("Manage AWS CloudWatch Logs resources"),
                ..Default::default()
            },
        }
    }
}

#[async_trait]
impl<'a> WithValidate for ProviderConfig<'a> {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath) {
        for (name, value) in [
            ("region", &self.region),
            ("profile", &self.profile),
            ("access_key", &self.access_key),
            ("secret_key", &self.secret_key),
            ("endpoint", &self.endpoint),
            ("assume_role_arn", &self.assume_role_arn),
            ("session_name", &self.session_name),
        ] {
            if let Value::Value(s) = value {
                if s.is_empty() {
                    diags.error_short(
                        format!("`{name}` must not be empty"),
                        attr_path.clone().attribute(name),
                    );
                }
            }
        }

        match (&self.access_key, &self.secret_key) {
            (Value::Value(_), Value::Null) => diags.error(
                "Incomplete static credentials",
                "`secret_key` is required when `access_key` is set.",
                attr_path.clone().attribute("secret_key"),
            ),
            (Value::Null, Value::Value(_)) => diags.error(
                "Incomplete static credentials",
                "`access_key` is required when `secret_key` is set.",
                attr_path.clone().attribute("access_key"),
            ),
            _ => (),
        }

        if self.assume_role_arn.is_null() {
            for (name, value) in [
                ("external_id", &self.external_id),
                ("session_name", &self.session_name),
            ] {
                if !value.is_null() {
                    diags.warning(
                        format!("`{name}` is ignored"),
                        format!("`{name}` is only used together with `assume_role_arn`."),
                        attr_path.clone().attribute(name),
                    );
                }
            }
        }
    }
}

impl<'a> ProviderConfig<'a> {
    pub fn aws_settings(&self) -> AwsSettings {
        let owned = |value: &ValueString<'_>| non_empty(value).map(str::to_owned);
        AwsSettings {
            region: owned(&self.region),
            profile: owned(&self.profile),
            access_key: owned(&self.access_key),
            secret_key: owned(&self.secret_key),
            token: owned(&self.token),
            endpoint_url: owned(&self.endpoint),
            role_arn: owned(&self.assume_role_arn),
            external_id: owned(&self.external_id),
            session_name: owned(&self.session_name),
        }
    }

    pub fn default_tags(&self) -> DefaultConfig {
        DefaultConfig {
            tags: KeyValueTags::from_value(&self.default_tags),
        }
    }

    pub fn ignore_tags(&self) -> IgnoreConfig {
        let collect = |set: &Value<BTreeSet<ValueString<'_>>>| -> BTreeSet<String> {
            set.iter()
                .flatten()
                .filter_map(|s| Some(s.as_deref_option()?.to_owned()))
                .collect()
        };
        IgnoreConfig {
            keys: collect(&self.ignore_tags_keys),
            key_prefixes: collect(&self.ignore_tags_key_prefixes),
        }
    }
}

/// Connection settings extracted from the provider block
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub token: Option<String>,
    pub endpoint_url: Option<String>,
    pub role_arn: Option<String>,
    pub external_id: Option<String>,
    pub session_name: Option<String>,
}

impl std::fmt::Debug for AwsSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redacted = |value: &Option<String>| value.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AwsSettings")
            .field("region", &self.region)
            .field("profile", &self.profile)
            .field("access_key", &self.access_key)
            .field("secret_key", &redacted(&self.secret_key))
            .field("token", &redacted(&self.token))
            .field("endpoint_url", &self.endpoint_url)
            .field("role_arn", &self.role_arn)
            .field("external_id", &self.external_id)
            .field("session_name", &self.session_name)
            .finish()
    }
}

impl AwsSettings {
    fn loader(&self) -> aws_config::ConfigLoader {
        let mut loader = aws_config::from_env();

        if let Some(region) = &self.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &self.profile {
            loader = loader.profile_name(profile);
        }
        if let Some(endpoint) = &self.endpoint_url {
            debug!(endpoint = %endpoint, "using custom CloudWatch Logs endpoint");
            loader = loader.endpoint_url(endpoint);
        }
        if let (Some(access_key), Some(secret_key)) = (&self.access_key, &self.secret_key) {
            loader = loader.credentials_provider(Credentials::new(
                access_key,
                secret_key,
                self.token.clone(),
                None,
                "terraform-provider-awslogs",
            ));
        }

        loader
    }

    /// Resolve the AWS SDK configuration, assuming `role_arn` when set
    pub async fn build_sdk_config(&self) -> aws_config::SdkConfig {
        let Some(role_arn) = &self.role_arn else {
            return self.loader().load().await;
        };

        let session_name = self.session_name.as_deref().unwrap_or(DEFAULT_SESSION_NAME);
        info!(role_arn = %role_arn, session_name = %session_name, "assuming IAM role via STS");

        let base_config = self.loader().load().await;

        let mut provider_builder =
            aws_config::sts::AssumeRoleProvider::builder(role_arn).session_name(session_name);
        if let Some(region) = base_config.region() {
            provider_builder = provider_builder.region(region.clone());
        }
        if let Some(external_id) = &self.external_id {
            provider_builder = provider_builder.external_id(external_id);
        }
        let assume_role_provider = provider_builder.configure(&base_config).build().await;

        self.loader()
            .credentials_provider(assume_role_provider)
            .load()
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;

    use super::*;

    fn string(s: &str) -> ValueString<'_> {
        Value::Value(Cow::from(s))
    }

    #[tokio::test]
    async fn access_key_requires_secret_key() {
        let config = ProviderConfig {
            access_key: string("AKIA"),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        config.validate(&mut diags, AttributePath::default()).await;
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn empty_region_is_rejected() {
        let config = ProviderConfig {
            region: string(""),
            ..Default::default()
        };
        let mut diags = Diagnostics::default();
        config.validate(&mut diags, AttributePath::default()).await;
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn empty_config_is_valid() {
        let mut diags = Diagnostics::default();
        ProviderConfig::default()
            .validate(&mut diags, AttributePath::default())
            .await;
        assert!(diags.errors.is_empty());
        assert!(diags.warnings.is_empty());
    }

    #[test]
    fn settings_skip_empty_values() {
        let config = ProviderConfig {
            region: string("eu-west-3"),
            profile: string(""),
            endpoint: string("http://localhost:4566"),
            ..Default::default()
        };
        let settings = config.aws_settings();
        assert_eq!(settings.region.as_deref(), Some("eu-west-3"));
        assert_eq!(settings.profile, None);
        assert_eq!(settings.endpoint_url.as_deref(), Some("http://localhost:4566"));
    }

    #[test]
    fn debug_redacts_secrets() {
        let settings = AwsSettings {
            access_key: Some("AKIAEXAMPLE".into()),
            secret_key: Some("very-secret".into()),
            token: Some("session-token".into()),
            ..Default::default()
        };
        let debug = format!("{settings:?}");
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("very-secret"));
        assert!(!debug.contains("session-token"));
    }

    #[test]
    fn tag_settings() {
        let config = ProviderConfig {
            default_tags: Value::Value(
                [(Cow::from("team"), string("logs"))].into_iter().collect(),
            ),
            ignore_tags_keys: Value::Value([string("owner")].into_iter().collect()),
            ignore_tags_key_prefixes: Value::Value([string("kubernetes.io/")].into_iter().collect()),
            ..Default::default()
        };
        assert_eq!(config.default_tags().tags.get("team"), Some("logs"));
        let ignore = config.ignore_tags();
        assert!(ignore.keys.contains("owner"));
        assert!(ignore.key_prefixes.contains("kubernetes.io/"));
    }
}
