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

//! Pagination and tagging helpers for CloudWatch Logs.
//!
//! Each paginated operation and the tagging lifecycle get the same shape of
//! helper, so they are stamped out by the macros below.

use crate::connection::{LogGroup, LogsApi, QueryDefinition, Result};
use crate::tags::KeyValueTags;

/// Generate `<op>_pages(api, prefix, visit)` for paginated listing operations.
///
/// `visit` receives every page along with whether it is the last one, and
/// stops the iteration by returning `false`. A repeated token ends the walk.
macro_rules! list_pages {
    ($($pages:ident => $op:ident -> $item:ty;)+) => {$(
        pub async fn $pages<F>(api: &dyn LogsApi, prefix: Option<&str>, mut visit: F) -> Result<()>
        where
            F: FnMut(&[$item], bool) -> bool + Send,
        {
            let mut token: Option<String> = None;
            loop {
                let page = api.$op(prefix, token.clone()).await?;
                let next = page
                    .next_token
                    .filter(|next| !next.is_empty() && Some(next) != token.as_ref());
                let last_page = next.is_none();

                if !visit(&page.items, last_page) || last_page {
                    return Ok(());
                }
                token = next;
            }
        }
    )+};
}

/// Generate `list_tags` and `update_tags` for a service whose tagging
/// operations are keyed by an identifier element.
macro_rules! service_tags {
    (identifier: $id:ident, list: $list:ident, tag: $tag:ident, untag: $untag:ident $(,)?) => {
        /// Tags of the resource, `aws:` tags excluded
        pub async fn list_tags(api: &dyn LogsApi, $id: &str) -> Result<KeyValueTags> {
            Ok(KeyValueTags::from(api.$list($id).await?).ignore_aws())
        }

        /// Move the resource tags from `old` to `new`
        pub async fn update_tags(
            api: &dyn LogsApi,
            $id: &str,
            old: &KeyValueTags,
            new: &KeyValueTags,
        ) -> Result<()> {
            let old = old.ignore_aws();
            let new = new.ignore_aws();

            let removed = old.removed(&new);
            if !removed.is_empty() {
                tracing::debug!(identifier = $id, keys = ?removed.keys(), "removing tags");
                api.$untag($id, &removed.keys()).await?;
            }

            let updated = old.updated(&new);
            if !updated.is_empty() {
                tracing::debug!(identifier = $id, keys = ?updated.keys(), "updating tags");
                api.$tag($id, updated.map()).await?;
            }

            Ok(())
        }
    };
}

list_pages! {
    describe_log_groups_pages => describe_log_groups -> LogGroup;
    describe_query_definitions_pages => describe_query_definitions -> QueryDefinition;
}

service_tags! {
    identifier: log_group_name,
    list: list_tags_log_group,
    tag: tag_log_group,
    untag: untag_log_group,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::memory::MemoryLogs;
    use crate::connection::CreateLogGroup;

    async fn seed(api: &MemoryLogs, names: &[&str]) {
        for name in names {
            api.create_log_group(&CreateLogGroup {
                name: name.to_string(),
                ..Default::default()
            })
            .await
            .unwrap();
        }
    }

    #[tokio::test]
    async fn pages_are_all_visited() {
        let api = MemoryLogs::new("us-west-2", 2);
        seed(&api, &["/a/1", "/a/2", "/a/3", "/a/4", "/a/5"]).await;

        let mut pages = Vec::new();
        describe_log_groups_pages(&api, None, |groups, last| {
            pages.push((groups.len(), last));
            true
        })
        .await
        .unwrap();

        assert_eq!(pages, vec![(2, false), (2, false), (1, true)]);
    }

    #[tokio::test]
    async fn visitor_can_stop_early() {
        let api = MemoryLogs::new("us-west-2", 1);
        seed(&api, &["/a/1", "/a/2", "/a/3"]).await;

        let mut seen = 0;
        describe_log_groups_pages(&api, Some("/a/"), |_, _| {
            seen += 1;
            false
        })
        .await
        .unwrap();

        assert_eq!(seen, 1);
    }

    #[tokio::test]
    async fn prefix_is_passed_through() {
        let api = MemoryLogs::default();
        seed(&api, &["/a/1", "/b/1", "/a/2"]).await;

        let mut names = Vec::new();
        describe_log_groups_pages(&api, Some("/a/"), |groups, _| {
            names.extend(groups.iter().map(|g| g.name.clone()));
            true
        })
        .await
        .unwrap();

        assert_eq!(names, vec!["/a/1", "/a/2"]);
    }

    #[tokio::test]
    async fn query_definitions_are_paginated() {
        let api = MemoryLogs::new("us-west-2", 1);
        api.add_query("q1", "errors");
        api.add_query("q2", "errors-by-host");
        api.add_query("q3", "latency");

        let mut ids = Vec::new();
        describe_query_definitions_pages(&api, Some("errors"), |queries, _| {
            ids.extend(queries.iter().map(|q| q.id.clone()));
            true
        })
        .await
        .unwrap();

        assert_eq!(ids, vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn update_tags_untags_then_tags() {
        let api = MemoryLogs::default();
        seed(&api, &["/tags"]).await;
        api.set_tag("/tags", "key1", "value1");
        api.set_tag("/tags", "key2", "value2");
        api.set_tag("/tags", "aws:cloudformation:stack-name", "stack");

        let old = list_tags(&api, "/tags").await.unwrap();
        assert_eq!(old.len(), 2);

        let new: KeyValueTags = [("key1", "value1updated"), ("key3", "value3")]
            .into_iter()
            .collect();
        update_tags(&api, "/tags", &old, &new).await.unwrap();

        let remote = api.tags("/tags").unwrap();
        assert_eq!(remote.get("key1").map(String::as_str), Some("value1updated"));
        assert_eq!(remote.get("key3").map(String::as_str), Some("value3"));
        assert!(!remote.contains_key("key2"));
        assert!(remote.contains_key("aws:cloudformation:stack-name"));
        assert_eq!(
            api.calls()[1..],
            [
                "UntagLogGroup /tags key2".to_owned(),
                "TagLogGroup /tags key1,key3".to_owned(),
            ]
        );
    }

    #[tokio::test]
    async fn update_tags_without_changes_is_a_no_op() {
        let api = MemoryLogs::default();
        seed(&api, &["/same"]).await;
        let tags: KeyValueTags = [("key1", "value1")].into_iter().collect();

        update_tags(&api, "/same", &tags, &tags).await.unwrap();

        assert_eq!(api.calls(), vec!["CreateLogGroup /same".to_owned()]);
    }
}
