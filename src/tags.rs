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
use std::collections::{BTreeMap, BTreeSet};

use tf_provider::value::{Value, ValueMap, ValueString};

/// Tags reserved by AWS, never managed by the provider
pub const AWS_TAG_KEY_PREFIX: &str = "aws:";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyValueTags(BTreeMap<String, String>);

/// Tags set at the provider level and applied to every taggable resource
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DefaultConfig {
    pub tags: KeyValueTags,
}

/// Tags hidden from the state, whatever their value
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct IgnoreConfig {
    pub keys: BTreeSet<String>,
    pub key_prefixes: BTreeSet<String>,
}

impl KeyValueTags {
    /// Build tags from a Terraform map, skipping null and unknown values
    pub fn from_value(value: &ValueMap<'_, ValueString<'_>>) -> Self {
        value
            .iter()
            .flatten()
            .filter_map(|(k, v)| Some((k.to_string(), v.as_deref_option()?.to_owned())))
            .collect()
    }

    pub fn to_value<'a>(&self) -> ValueMap<'a, ValueString<'a>> {
        Value::Value(
            self.0
                .iter()
                .map(|(k, v)| (Cow::Owned(k.clone()), Value::Value(Cow::Owned(v.clone()))))
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }

    pub fn map(&self) -> &BTreeMap<String, String> {
        &self.0
    }

    pub fn ignore_aws(&self) -> Self {
        self.filter(|k, _| !k.starts_with(AWS_TAG_KEY_PREFIX))
    }

    pub fn ignore(&self, config: &IgnoreConfig) -> Self {
        self.filter(|k, _| {
            !config.keys.contains(k) && !config.key_prefixes.iter().any(|p| k.starts_with(p))
        })
    }

    /// Union of both sets of tags, values from `other` win
    pub fn merge(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged
            .0
            .extend(other.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        merged
    }

    /// Tags of `self` whose key is absent from `new`
    pub fn removed(&self, new: &Self) -> Self {
        self.filter(|k, _| !new.0.contains_key(k))
    }

    /// Tags of `new` that are absent from `self` or have another value
    pub fn updated(&self, new: &Self) -> Self {
        new.filter(|k, v| self.0.get(k) != Some(v))
    }

    fn filter(&self, mut keep: impl FnMut(&String, &String) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .filter(|(k, v)| keep(k, v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

#[cfg(test)]
impl KeyValueTags {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValueTags {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, String>> for KeyValueTags {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}

impl DefaultConfig {
    /// Default tags overridden by the resource tags
    pub fn merge_tags(&self, tags: &KeyValueTags) -> KeyValueTags {
        self.tags.merge(tags)
    }

    /// Drop the tags that only exist because of the default tags
    pub fn remove_default_config(&self, tags: &KeyValueTags) -> KeyValueTags {
        tags.filter(|k, v| self.tags.0.get(k) != Some(v))
    }

    /// Tags to expose as the resource `tags` after a read: the ones not
    /// coming from the default tags, and the ones explicitly configured
    pub fn resource_tags(&self, tags_all: &KeyValueTags, configured: &KeyValueTags) -> KeyValueTags {
        self.remove_default_config(tags_all)
            .merge(&tags_all.filter(|k, _| configured.0.contains_key(k)))
    }
}
