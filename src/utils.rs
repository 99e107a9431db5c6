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
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use tf_provider::value::{Value, ValueString};
use tf_provider::{AttributePath, Diagnostics, Schema};

pub(crate) trait WithSchema {
    fn schema() -> Schema;
}

#[async_trait]
pub(crate) trait WithValidate {
    async fn validate(&self, diags: &mut Diagnostics, attr_path: AttributePath);
}

pub(crate) trait WithNormalize {
    fn normalize(&mut self, diags: &mut Diagnostics);
}

/// Configured, non-empty string
pub(crate) fn non_empty<'a>(value: &'a ValueString<'_>) -> Option<&'a str> {
    value.as_deref_option().filter(|s| !s.is_empty())
}

pub(crate) fn string_set<'a, I, S>(items: I) -> Value<BTreeSet<ValueString<'a>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Value(
        items
            .into_iter()
            .map(|s| Value::Value(Cow::Owned(s.into())))
            .collect(),
    )
}

pub(crate) fn string_list<'a, I, S>(items: I) -> Value<Vec<ValueString<'a>>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Value::Value(
        items
            .into_iter()
            .map(|s| Value::Value(Cow::Owned(s.into())))
            .collect(),
    )
}

static UNIQUE_ID_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Prefix followed by a UTC timestamp and a monotonic counter,
/// e.g. `terraform-2024011512000000000001`
pub(crate) fn prefixed_unique_id(prefix: &str) -> String {
    let now = time::OffsetDateTime::now_utc();
    let counter = UNIQUE_ID_COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!(
        "{prefix}{:04}{:02}{:02}{:02}{:02}{:02}{:08}",
        now.year(),
        u8::from(now.month()),
        now.day(),
        now.hour(),
        now.minute(),
        now.second(),
        counter % 100_000_000,
    )
}

/// Length of the suffix added by [`prefixed_unique_id`]
pub(crate) const UNIQUE_ID_SUFFIX_LENGTH: usize = 22;

pub struct DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    iter: RefCell<T>,
    sep: &'a str,
}

pub trait DisplayJoinable {
    type Joiner<'a>;
    fn join_with(self, sep: &str) -> Self::Joiner<'_>;
}

impl<T, I> DisplayJoinable for T
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    type Joiner<'a> = DisplayJoiner<'a, T, I>;

    fn join_with(self, sep: &str) -> Self::Joiner<'_> {
        DisplayJoiner {
            iter: RefCell::new(self),
            sep,
        }
    }
}

impl<'a, T, I> std::fmt::Display for DisplayJoiner<'a, T, I>
where
    T: Iterator<Item = I>,
    I: std::fmt::Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut sep = "";
        let mut iter = self.iter.try_borrow_mut().or(Err(std::fmt::Error))?;
        for elt in iter.by_ref() {
            f.write_str(sep)?;
            f.write_fmt(format_args!("{elt}"))?;
            sep = self.sep;
        }
        Ok(())
    }
}
