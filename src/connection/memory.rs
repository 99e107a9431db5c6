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

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::LogsError;

use super::{CreateLogGroup, LogGroup, LogsApi, Page, QueryDefinition, Result};

#[derive(Debug, Clone, Default)]
struct StoredGroup {
    group: LogGroup,
    tags: BTreeMap<String, String>,
}

/// In-memory CloudWatch Logs, paginating like the service does
#[derive(Debug)]
pub struct MemoryLogs {
    region: String,
    page_size: usize,
    groups: Mutex<BTreeMap<String, StoredGroup>>,
    queries: Mutex<Vec<QueryDefinition>>,
    calls: Mutex<Vec<String>>,
}

impl Default for MemoryLogs {
    fn default() -> Self {
        Self::new("us-west-2", 50)
    }
}

impl MemoryLogs {
    pub fn new(region: &str, page_size: usize) -> Self {
        Self {
            region: region.to_owned(),
            page_size: page_size.max(1),
            groups: Default::default(),
            queries: Default::default(),
            calls: Default::default(),
        }
    }

    pub fn arn(&self, name: &str) -> String {
        format!("arn:aws:logs:{}:123456789012:log-group:{name}", self.region)
    }

    pub fn add_query(&self, id: &str, name: &str) {
        self.queries.lock().unwrap().push(QueryDefinition {
            id: id.to_owned(),
            name: name.to_owned(),
        });
    }

    pub fn group(&self, name: &str) -> Option<LogGroup> {
        self.groups
            .lock()
            .unwrap()
            .get(name)
            .map(|stored| stored.group.clone())
    }

    pub fn tags(&self, name: &str) -> Option<BTreeMap<String, String>> {
        self.groups
            .lock()
            .unwrap()
            .get(name)
            .map(|stored| stored.tags.clone())
    }

    /// Tag a group behind the provider's back, like AWS does with `aws:` tags
    pub fn set_tag(&self, name: &str, key: &str, value: &str) {
        if let Some(stored) = self.groups.lock().unwrap().get_mut(name) {
            stored.tags.insert(key.to_owned(), value.to_owned());
        }
    }

    pub fn remove(&self, name: &str) {
        self.groups.lock().unwrap().remove(name);
    }

    /// Names of the mutating calls received so far
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn with_group<T>(
        &self,
        name: &str,
        f: impl FnOnce(&mut StoredGroup) -> T,
    ) -> Result<T> {
        let mut groups = self.groups.lock().unwrap();
        let stored = groups
            .get_mut(name)
            .ok_or_else(|| LogsError::NotFound(format!("The specified log group does not exist: {name}")))?;
        Ok(f(stored))
    }

    fn paginate<T: Clone>(&self, items: Vec<T>, next_token: Option<String>) -> Result<Page<T>> {
        let start = match next_token {
            Some(token) => token.parse::<usize>().map_err(|_| LogsError::Service {
                code: "InvalidParameterException".to_owned(),
                message: format!("invalid next token: {token}"),
            })?,
            None => 0,
        };
        let end = (start + self.page_size).min(items.len());
        let next_token = (end < items.len()).then(|| end.to_string());
        Ok(Page {
            items: items.get(start..end).unwrap_or_default().to_vec(),
            next_token,
        })
    }
}

#[async_trait]
impl LogsApi for MemoryLogs {
    async fn describe_log_groups(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<LogGroup>> {
        let matching = self
            .groups
            .lock()
            .unwrap()
            .values()
            .filter(|stored| prefix.map_or(true, |p| stored.group.name.starts_with(p)))
            .map(|stored| stored.group.clone())
            .collect();
        self.paginate(matching, next_token)
    }

    async fn describe_query_definitions(
        &self,
        prefix: Option<&str>,
        next_token: Option<String>,
    ) -> Result<Page<QueryDefinition>> {
        let matching = self
            .queries
            .lock()
            .unwrap()
            .iter()
            .filter(|query| prefix.map_or(true, |p| query.name.starts_with(p)))
            .cloned()
            .collect();
        self.paginate(matching, next_token)
    }

    async fn create_log_group(&self, input: &CreateLogGroup) -> Result<()> {
        self.record(format!("CreateLogGroup {}", input.name));
        let mut groups = self.groups.lock().unwrap();
        if groups.contains_key(&input.name) {
            return Err(LogsError::Service {
                code: "ResourceAlreadyExistsException".to_owned(),
                message: format!("The specified log group already exists: {}", input.name),
            });
        }
        groups.insert(
            input.name.clone(),
            StoredGroup {
                group: LogGroup {
                    name: input.name.clone(),
                    arn: self.arn(&input.name),
                    creation_time: Some(1_700_000_000_000),
                    retention_in_days: None,
                    kms_key_id: input.kms_key_id.clone(),
                    class: Some(input.class.clone().unwrap_or_else(|| "STANDARD".to_owned())),
                },
                tags: input.tags.clone(),
            },
        );
        Ok(())
    }

    async fn delete_log_group(&self, name: &str) -> Result<()> {
        self.record(format!("DeleteLogGroup {name}"));
        self.groups
            .lock()
            .unwrap()
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| LogsError::NotFound(name.to_owned()))
    }

    async fn put_retention_policy(&self, name: &str, days: i32) -> Result<()> {
        self.record(format!("PutRetentionPolicy {name} {days}"));
        self.with_group(name, |stored| stored.group.retention_in_days = Some(days))
    }

    async fn delete_retention_policy(&self, name: &str) -> Result<()> {
        self.record(format!("DeleteRetentionPolicy {name}"));
        self.with_group(name, |stored| stored.group.retention_in_days = None)
    }

    async fn associate_kms_key(&self, name: &str, kms_key_id: &str) -> Result<()> {
        self.record(format!("AssociateKmsKey {name}"));
        self.with_group(name, |stored| {
            stored.group.kms_key_id = Some(kms_key_id.to_owned())
        })
    }

    async fn disassociate_kms_key(&self, name: &str) -> Result<()> {
        self.record(format!("DisassociateKmsKey {name}"));
        self.with_group(name, |stored| stored.group.kms_key_id = None)
    }

    async fn list_tags_log_group(&self, name: &str) -> Result<BTreeMap<String, String>> {
        self.with_group(name, |stored| stored.tags.clone())
    }

    async fn tag_log_group(&self, name: &str, tags: &BTreeMap<String, String>) -> Result<()> {
        self.record(format!(
            "TagLogGroup {name} {}",
            tags.keys().cloned().collect::<Vec<_>>().join(",")
        ));
        self.with_group(name, |stored| {
            stored
                .tags
                .extend(tags.iter().map(|(k, v)| (k.clone(), v.clone())))
        })
    }

    async fn untag_log_group(&self, name: &str, keys: &[String]) -> Result<()> {
        self.record(format!("UntagLogGroup {name} {}", keys.join(",")));
        self.with_group(name, |stored| {
            for key in keys {
                stored.tags.remove(key);
            }
        })
    }
}
