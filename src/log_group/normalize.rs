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

use tf_provider::{value::Value, Diagnostics};

use crate::utils::WithNormalize;

use super::state::ResourceState;
use super::DEFAULT_LOG_GROUP_CLASS;

impl<'a> WithNormalize for ResourceState<'a> {
    fn normalize(&mut self, _diags: &mut Diagnostics) {
        if self.retention_in_days.is_null() {
            self.retention_in_days = Value::Value(0);
        }
        if self.log_group_class.is_null() {
            self.log_group_class = Value::Value(Cow::Borrowed(DEFAULT_LOG_GROUP_CLASS));
        }
    }
}
