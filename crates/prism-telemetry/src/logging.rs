// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
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

//! Logger initialisation.

use env_logger::Env;

/// The filter used when `RUST_LOG` is not set.
pub const DEFAULT_FILTER: &str = "info";

/// Installs an `env_logger` logger, reading `RUST_LOG` and falling back to
/// `default_filter`.
///
/// Calling this more than once is harmless: later calls return the error
/// from `log` instead of panicking.
pub fn init_logging(default_filter: &str) -> Result<(), log::SetLoggerError> {
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter))
        .format_timestamp_millis()
        .try_init()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_does_not_panic() {
        let _ = init_logging(DEFAULT_FILTER);
        assert!(
            init_logging(DEFAULT_FILTER).is_err(),
            "a second logger cannot be installed"
        );
    }
}
