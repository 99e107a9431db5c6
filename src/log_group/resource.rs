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
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use tf_provider::value::{Value, ValueEmpty, ValueMap, ValueString};
use tf_provider::{schema::Schema, AttributePath, Diagnostics, Resource};

use crate::connection::CreateLogGroup;
use crate::error::LogsError;
use crate::generate::update_tags;
use crate::logs_provider::{LogsHandle, ProviderMeta};
use crate::tags::KeyValueTags;
use crate::utils::{non_empty, prefixed_unique_id, WithNormalize, WithSchema, WithValidate};

use super::state::ResourceState;

/// CloudWatch Logs is eventually consistent: a new log group may not be listed right away
const CREATE_READ_ATTEMPTS: u32 = 10;
const CREATE_READ_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Default)]
pub struct LogGroupResource {
    pub(super) handle: LogsHandle,
}

impl LogGroupResource {
    pub fn new(handle: LogsHandle) -> Self {
        Self { handle }
    }
}

fn report(diags: &mut Diagnostics, summary: &'static str, err: LogsError, attr_path: AttributePath) {
    diags.error(summary, err.to_string(), attr_path);
}

/// `tags_all` as it will be once applied: provider default tags overlaid by the resource tags
fn planned_tags_all<'a>(meta: &ProviderMeta, tags: &ValueMap<'a, ValueString<'a>>) -> ValueMap<'a, ValueString<'a>> {
    match tags {
        Value::Unknown => Value::Unknown,
        Value::Value(tags) if tags.values().any(|v| v.is_unknown()) => Value::Unknown,
        tags => meta
            .default_tags
            .merge_tags(&KeyValueTags::from_value(tags))
            .ignore(&meta.ignore_tags)
            .to_value(),
    }
}

impl<'a> ResourceState<'a> {
    /// Retention left out of the configuration is planned as 0 (never expire)
    fn plan_retention(&mut self, config: &ResourceState<'_>) {
        if config.retention_in_days.is_null() {
            self.retention_in_days = Value::Value(0);
        }
    }

    fn log_group_name(&self) -> &str {
        non_empty(&self.id).or_else(|| non_empty(&self.name)).unwrap_or_default()
    }
}

#[async_trait]
impl Resource for LogGroupResource {
    type State<'a> = ResourceState<'a>;
    type PrivateState<'a> = ValueEmpty;
    type ProviderMetaState<'a> = ValueEmpty;

    fn schema(&self, _diags: &mut Diagnostics) -> Option<Schema> {
        Some(ResourceState::schema())
    }

    async fn validate<'a>(&self, diags: &mut Diagnostics, config: Self::State<'a>) -> Option<()> {
        config.validate(diags, Default::default()).await;

        if diags.errors.is_empty() {
            Some(())
        } else {
            None
        }
    }

    async fn read<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let meta = self.handle.get(diags).await?;
        let name = state.log_group_name().to_owned();

        let mut state = state.clone();
        if state.read_remote(diags, &meta, &name).await? {
            Some((state, private_state))
        } else {
            // Gone from AWS: dropping the state makes Terraform plan its creation again
            warn!(name, "log group not found, removing it from state");
            None
        }
    }

    async fn plan_create<'a>(
        &self,
        diags: &mut Diagnostics,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let meta = self.handle.get(diags).await?;

        let mut state = proposed_state.clone();
        state.normalize(diags);
        state.plan_retention(&config_state);
        state.id = Value::Unknown;
        state.arn = Value::Unknown;
        if state.name.is_null() {
            state.name = Value::Unknown;
        }
        state.tags_all = planned_tags_all(&meta, &state.tags);

        Some((state, Default::default()))
    }

    async fn plan_update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        proposed_state: Self::State<'a>,
        config_state: Self::State<'a>,
        prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(
        Self::State<'a>,
        Self::PrivateState<'a>,
        Vec<tf_provider::AttributePath>,
    )> {
        let meta = self.handle.get(diags).await?;

        let mut state = proposed_state.clone();
        state.normalize(diags);
        state.plan_retention(&config_state);
        state.tags_all = planned_tags_all(&meta, &state.tags);

        let trigger_replace = [
            ("name", &prior_state.name, &state.name),
            ("name_prefix", &prior_state.name_prefix, &state.name_prefix),
            (
                "log_group_class",
                &prior_state.log_group_class,
                &state.log_group_class,
            ),
        ]
        .into_iter()
        .filter(|(_, prior, planned)| prior != planned)
        .map(|(name, _, _)| AttributePath::new(name))
        .collect();

        Some((state, prior_private_state, trigger_replace))
    }

    async fn plan_destroy<'a>(
        &self,
        _diags: &mut Diagnostics,
        _prior_state: Self::State<'a>,
        _prior_private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        Some(())
    }

    async fn create<'a>(
        &self,
        diags: &mut Diagnostics,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let meta = self.handle.get(diags).await?;

        let mut state = planned_state.clone();
        state.normalize(diags);

        let name = match (non_empty(&state.name), non_empty(&state.name_prefix)) {
            (Some(name), _) => name.to_owned(),
            (None, Some(prefix)) => prefixed_unique_id(prefix),
            (None, None) => prefixed_unique_id("terraform-"),
        };
        info!(name, "creating log group");

        let input = CreateLogGroup {
            name: name.clone(),
            kms_key_id: non_empty(&state.kms_key_id).map(str::to_owned),
            class: non_empty(&state.log_group_class).map(str::to_owned),
            tags: KeyValueTags::from_value(&state.tags_all)
                .ignore_aws()
                .map()
                .clone(),
        };
        if let Err(err) = meta.api.create_log_group(&input).await {
            report(diags, "Failed to create log group", err, AttributePath::new("name"));
            return None;
        }

        if let Value::Value(days @ 1..) = state.retention_in_days {
            if let Err(err) = meta.api.put_retention_policy(&name, days as i32).await {
                report(
                    diags,
                    "Failed to set log group retention policy",
                    err,
                    AttributePath::new("retention_in_days"),
                );
                return None;
            }
        }

        for attempt in 1..=CREATE_READ_ATTEMPTS {
            if state.read_remote(diags, &meta, &name).await? {
                return Some((state, private_state));
            }
            if attempt < CREATE_READ_ATTEMPTS {
                tokio::time::sleep(CREATE_READ_DELAY).await;
            }
        }

        diags.error(
            "Log group not found after creation",
            format!("`{name}` was created but could not be read back from CloudWatch Logs."),
            AttributePath::new("name"),
        );
        None
    }

    async fn update<'a>(
        &self,
        diags: &mut Diagnostics,
        prior_state: Self::State<'a>,
        planned_state: Self::State<'a>,
        _config_state: Self::State<'a>,
        private_state: Self::PrivateState<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let meta = self.handle.get(diags).await?;
        let api = meta.api.as_ref();

        let mut state = planned_state.clone();
        state.normalize(diags);
        let name = prior_state.log_group_name().to_owned();

        if state.retention_in_days != prior_state.retention_in_days {
            let result = match state.retention_in_days {
                Value::Value(days @ 1..) => api.put_retention_policy(&name, days as i32).await,
                _ => api.delete_retention_policy(&name).await,
            };
            if let Err(err) = result {
                report(
                    diags,
                    "Failed to update log group retention policy",
                    err,
                    AttributePath::new("retention_in_days"),
                );
            }
        }

        if state.kms_key_id != prior_state.kms_key_id {
            let result = match non_empty(&state.kms_key_id) {
                Some(kms_key_id) => api.associate_kms_key(&name, kms_key_id).await,
                None => api.disassociate_kms_key(&name).await,
            };
            if let Err(err) = result {
                report(
                    diags,
                    "Failed to update log group KMS key",
                    err,
                    AttributePath::new("kms_key_id"),
                );
            }
        }

        let old_tags = KeyValueTags::from_value(&prior_state.tags_all);
        let new_tags = KeyValueTags::from_value(&state.tags_all);
        if old_tags != new_tags {
            if let Err(err) = update_tags(api, &name, &old_tags, &new_tags).await {
                report(
                    diags,
                    "Failed to update log group tags",
                    err,
                    AttributePath::new("tags"),
                );
            }
        }

        if !diags.errors.is_empty() {
            return None;
        }

        if !state.read_remote(diags, &meta, &name).await? {
            diags.error(
                "Log group disappeared during update",
                format!("`{name}` could not be read back from CloudWatch Logs."),
                AttributePath::new("name"),
            );
            return None;
        }

        Some((state, private_state))
    }

    async fn destroy<'a>(
        &self,
        diags: &mut Diagnostics,
        state: Self::State<'a>,
        _provider_meta_state: Self::ProviderMetaState<'a>,
    ) -> Option<()> {
        let name = state.log_group_name();

        if state.skip_destroy == Value::Value(true) {
            info!(name, "retaining log group, only removing it from state");
            return Some(());
        }

        let meta = self.handle.get(diags).await?;
        info!(name, "deleting log group");
        match meta.api.delete_log_group(name).await {
            Ok(()) => (),
            Err(err) if err.is_not_found() => {
                warn!(name, "log group already deleted");
            }
            Err(err) => {
                report(diags, "Failed to delete log group", err, AttributePath::new("name"));
            }
        }
        Some(())
    }

    async fn import<'a>(
        &self,
        _diags: &mut Diagnostics,
        id: String,
    ) -> Option<(Self::State<'a>, Self::PrivateState<'a>)> {
        let state = Self::State {
            id: Value::Value(Cow::Owned(id.clone())),
            name: Value::Value(Cow::Owned(id)),
            ..Default::default()
        };
        Some((state, Default::default()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::connection::memory::MemoryLogs;
    use crate::tags::DefaultConfig;

    fn resource(api: &Arc<MemoryLogs>, default_tags: &[(&str, &str)]) -> LogGroupResource {
        LogGroupResource::new(LogsHandle::with_meta(ProviderMeta {
            api: api.clone(),
            region: "us-west-2".to_owned(),
            default_tags: DefaultConfig {
                tags: default_tags.iter().copied().collect(),
            },
            ignore_tags: Default::default(),
        }))
    }

    fn string<'a>(s: &str) -> ValueString<'a> {
        Value::Value(Cow::Owned(s.to_owned()))
    }

    fn tags<'a>(entries: &[(&str, &str)]) -> ValueMap<'a, ValueString<'a>> {
        entries.iter().copied().collect::<KeyValueTags>().to_value()
    }

    async fn apply_create<'a>(
        resource: &LogGroupResource,
        config: ResourceState<'a>,
    ) -> ResourceState<'a> {
        let mut diags = Diagnostics::default();
        let (planned, private) = resource
            .plan_create(&mut diags, config.clone(), config.clone(), ValueEmpty::default())
            .await
            .unwrap();
        let (state, _) = resource
            .create(&mut diags, planned, config, private, ValueEmpty::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        state
    }

    #[tokio::test]
    async fn plan_create_leaves_computed_attributes_unknown() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[("env", "prod")]);
        let config = ResourceState {
            name_prefix: string("/app/"),
            tags: tags(&[("app", "api")]),
            ..Default::default()
        };

        let mut diags = Diagnostics::default();
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, ValueEmpty::default())
            .await
            .unwrap();

        assert!(planned.id.is_unknown());
        assert!(planned.arn.is_unknown());
        assert!(planned.name.is_unknown());
        assert_eq!(planned.retention_in_days, Value::Value(0));
        assert_eq!(planned.log_group_class.as_str(), "STANDARD");
        assert_eq!(planned.tags_all, tags(&[("app", "api"), ("env", "prod")]));
    }

    #[tokio::test]
    async fn plan_create_with_unknown_tag_values() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let config = ResourceState {
            name: string("/app"),
            tags: Value::Value([(Cow::from("app"), Value::Unknown)].into_iter().collect()),
            ..Default::default()
        };

        let mut diags = Diagnostics::default();
        let (planned, _) = resource
            .plan_create(&mut diags, config.clone(), config, ValueEmpty::default())
            .await
            .unwrap();

        assert!(planned.tags_all.is_unknown());
        assert_eq!(planned.name.as_str(), "/app");
    }

    #[tokio::test]
    async fn create_with_prefix_and_retention() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[("env", "prod")]);
        let state = apply_create(
            &resource,
            ResourceState {
                name_prefix: string("/app/"),
                retention_in_days: Value::Value(7),
                tags: tags(&[("app", "api")]),
                ..Default::default()
            },
        )
        .await;

        let name = state.name.as_str().to_owned();
        assert!(name.starts_with("/app/"));
        assert_eq!(state.id.as_str(), name);
        assert_eq!(state.arn.as_str(), api.arn(&name));
        assert_eq!(state.retention_in_days, Value::Value(7));
        assert_eq!(state.tags, tags(&[("app", "api")]));
        assert_eq!(state.tags_all, tags(&[("app", "api"), ("env", "prod")]));
        assert_eq!(
            api.calls(),
            vec![
                format!("CreateLogGroup {name}"),
                format!("PutRetentionPolicy {name} 7"),
            ]
        );
    }

    #[tokio::test]
    async fn create_without_name_uses_terraform_prefix() {
        let api = Arc::new(MemoryLogs::default());
        let state = apply_create(&resource(&api, &[]), ResourceState::default()).await;

        assert!(state.name.as_str().starts_with("terraform-"));
        assert_eq!(state.tags, Value::Null);
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn create_existing_log_group_fails() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let config = ResourceState {
            name: string("/dup"),
            ..Default::default()
        };
        apply_create(&resource, config.clone()).await;

        let mut diags = Diagnostics::default();
        let created = resource
            .create(
                &mut diags,
                config.clone(),
                config,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await;
        assert!(created.is_none());
        assert_eq!(diags.errors.len(), 1);
    }

    #[tokio::test]
    async fn plan_update_replaces_on_name_or_class_change() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let prior = apply_create(
            &resource,
            ResourceState {
                name: string("/app"),
                ..Default::default()
            },
        )
        .await;

        let mut diags = Diagnostics::default();
        let proposed = ResourceState {
            retention_in_days: Value::Value(14),
            ..prior.clone()
        };
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                proposed.clone(),
                proposed,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert!(replace.is_empty());

        let proposed = ResourceState {
            name: string("/other"),
            log_group_class: string("INFREQUENT_ACCESS"),
            ..prior.clone()
        };
        let (_, _, replace) = resource
            .plan_update(
                &mut diags,
                prior,
                proposed.clone(),
                proposed,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert_eq!(replace.len(), 2);
    }

    #[tokio::test]
    async fn removing_retention_from_config_deletes_policy() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let prior = apply_create(
            &resource,
            ResourceState {
                name: string("/r"),
                retention_in_days: Value::Value(30),
                ..Default::default()
            },
        )
        .await;
        let config = ResourceState {
            retention_in_days: Value::Null,
            ..prior.clone()
        };

        let mut diags = Diagnostics::default();
        let (planned, private, replace) = resource
            .plan_update(
                &mut diags,
                prior.clone(),
                prior.clone(),
                config.clone(),
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert_eq!(planned.retention_in_days, Value::Value(0));
        assert!(replace.is_empty());

        let (state, _) = resource
            .update(
                &mut diags,
                prior,
                planned,
                config,
                private,
                ValueEmpty::default(),
            )
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
        assert_eq!(state.retention_in_days, Value::Value(0));
        assert_eq!(api.group("/r").unwrap().retention_in_days, None);
        assert_eq!(api.calls().last().unwrap(), "DeleteRetentionPolicy /r");
    }

    #[tokio::test]
    async fn update_applies_retention_kms_and_tags() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let prior = apply_create(
            &resource,
            ResourceState {
                name: string("/app"),
                retention_in_days: Value::Value(30),
                tags: tags(&[("key1", "value1"), ("key2", "value2")]),
                ..Default::default()
            },
        )
        .await;

        let planned = ResourceState {
            retention_in_days: Value::Value(0),
            kms_key_id: string("arn:aws:kms:us-west-2:123456789012:key/abcd"),
            tags: tags(&[("key1", "value1updated")]),
            tags_all: tags(&[("key1", "value1updated")]),
            ..prior.clone()
        };
        let mut diags = Diagnostics::default();
        let (state, _) = resource
            .update(
                &mut diags,
                prior,
                planned.clone(),
                planned,
                ValueEmpty::default(),
                ValueEmpty::default(),
            )
            .await
            .unwrap();

        assert!(diags.errors.is_empty());
        assert_eq!(state.retention_in_days, Value::Value(0));
        assert_eq!(
            state.kms_key_id.as_str(),
            "arn:aws:kms:us-west-2:123456789012:key/abcd"
        );
        assert_eq!(state.tags, tags(&[("key1", "value1updated")]));
        assert_eq!(
            api.calls()[2..],
            [
                "DeleteRetentionPolicy /app".to_owned(),
                "AssociateKmsKey /app".to_owned(),
                "UntagLogGroup /app key2".to_owned(),
                "TagLogGroup /app key1".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn read_of_deleted_log_group_drops_state() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let state = apply_create(
            &resource,
            ResourceState {
                name: string("/gone"),
                ..Default::default()
            },
        )
        .await;

        let mut diags = Diagnostics::default();
        let read = resource
            .read(&mut diags, state.clone(), ValueEmpty::default(), ValueEmpty::default())
            .await;
        assert_eq!(read.map(|(read, _)| read), Some(state.clone()));

        api.remove("/gone");
        let read = resource
            .read(&mut diags, state, ValueEmpty::default(), ValueEmpty::default())
            .await;
        assert!(read.is_none());
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn read_hides_aws_tags() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let state = apply_create(
            &resource,
            ResourceState {
                name: string("/stack"),
                ..Default::default()
            },
        )
        .await;
        api.set_tag("/stack", "aws:cloudformation:stack-name", "stack");

        let mut diags = Diagnostics::default();
        let (read, _) = resource
            .read(&mut diags, state, ValueEmpty::default(), ValueEmpty::default())
            .await
            .unwrap();
        assert_eq!(read.tags, Value::Null);
        assert_eq!(read.tags_all, tags(&[]));
    }

    #[tokio::test]
    async fn destroy_honors_skip_destroy() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        let mut state = apply_create(
            &resource,
            ResourceState {
                name: string("/kept"),
                skip_destroy: Value::Value(true),
                ..Default::default()
            },
        )
        .await;

        let mut diags = Diagnostics::default();
        resource
            .destroy(&mut diags, state.clone(), ValueEmpty::default())
            .await
            .unwrap();
        assert!(api.group("/kept").is_some());

        state.skip_destroy = Value::Value(false);
        resource
            .destroy(&mut diags, state.clone(), ValueEmpty::default())
            .await
            .unwrap();
        assert!(api.group("/kept").is_none());

        // Already gone
        resource
            .destroy(&mut diags, state, ValueEmpty::default())
            .await
            .unwrap();
        assert!(diags.errors.is_empty());
    }

    #[tokio::test]
    async fn import_then_read() {
        let api = Arc::new(MemoryLogs::default());
        let resource = resource(&api, &[]);
        apply_create(
            &resource,
            ResourceState {
                name: string("/imported"),
                retention_in_days: Value::Value(90),
                ..Default::default()
            },
        )
        .await;

        let mut diags = Diagnostics::default();
        let (state, private) = resource
            .import(&mut diags, "/imported".to_owned())
            .await
            .unwrap();
        let (state, _) = resource
            .read(&mut diags, state, private, ValueEmpty::default())
            .await
            .unwrap();
        assert_eq!(state.retention_in_days, Value::Value(90));
        assert_eq!(state.arn.as_str(), api.arn("/imported"));
    }
}
