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

use thiserror::Error;

/// Errors returned by CloudWatch Logs operations.
#[derive(Debug, Error)]
pub enum LogsError {
    /// The targeted log group (or other resource) does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The request was throttled by the service.
    #[error("CloudWatch Logs request throttled: {0}")]
    Throttled(String),

    /// The service rejected the request.
    #[error("CloudWatch Logs service error ({code}): {message}")]
    Service { code: String, message: String },

    /// A network or connection error occurred.
    #[error("CloudWatch Logs connection error: {0}")]
    Connection(String),

    /// The request timed out.
    #[error("CloudWatch Logs request timed out")]
    Timeout,
}

impl LogsError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LogsError::NotFound(_))
    }
}

/// Classify a service error from its error code, falling back to message
/// patterns when the code is missing.
pub fn classify(code: Option<&str>, message: &str) -> LogsError {
    match code {
        Some("ResourceNotFoundException") => return LogsError::NotFound(message.to_owned()),
        Some("ThrottlingException") => return LogsError::Throttled(message.to_owned()),
        Some(code) => {
            return LogsError::Service {
                code: code.to_owned(),
                message: message.to_owned(),
            }
        }
        None => (),
    }

    let lower = message.to_lowercase();
    if lower.contains("throttl") || lower.contains("rate exceed") {
        LogsError::Throttled(message.to_owned())
    } else if lower.contains("timeout") || lower.contains("timed out") {
        LogsError::Timeout
    } else if lower.contains("connect") || lower.contains("dns") || lower.contains("network") {
        LogsError::Connection(message.to_owned())
    } else {
        LogsError::Service {
            code: "Unknown".to_owned(),
            message: message.to_owned(),
        }
    }
}
