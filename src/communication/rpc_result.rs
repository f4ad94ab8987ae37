/********************************************************************************
 * Copyright (c) 2024 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

// [impl->dsn~communication-layer-impl-default~1]

use std::fmt::Display;

use crate::{UCode, UStatus};

/// The result of invoking an RPC method.
///
/// This is a closed sum type of either a successfully decoded response value or a
/// [`UStatus`] describing why the invocation did not produce one. It lets callers keep
/// working with typed values via [`Self::map`]/[`Self::flat_map`] and only inspect status
/// codes at the edge, instead of having every transport or service-level error propagate
/// as an async failure.
#[derive(Debug, Clone)]
pub enum RpcResult<T> {
    Success(T),
    Failure(UStatus),
}

impl<T> RpcResult<T> {
    /// Creates a new successful result.
    pub fn success(value: T) -> Self {
        RpcResult::Success(value)
    }

    /// Creates a new failed result carrying the given code and message.
    pub fn failure<M: Into<String>>(code: UCode, message: M) -> Self {
        RpcResult::Failure(UStatus::fail_with_code(code, message))
    }

    /// Checks if this is a [`RpcResult::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, RpcResult::Success(_))
    }

    /// Checks if this is a [`RpcResult::Failure`].
    pub fn is_failure(&self) -> bool {
        !self.is_success()
    }

    /// Gets the value of a successful result.
    ///
    /// # Panics
    ///
    /// if this result is a [`RpcResult::Failure`].
    pub fn success_value(self) -> T {
        match self {
            RpcResult::Success(value) => value,
            RpcResult::Failure(status) => {
                panic!("result does not contain a value, invocation failed with: {status}")
            }
        }
    }

    /// Gets the status of a failed result.
    ///
    /// # Panics
    ///
    /// if this result is a [`RpcResult::Success`].
    pub fn failure_value(self) -> UStatus {
        match self {
            RpcResult::Success(_) => panic!("result does not represent a failure"),
            RpcResult::Failure(status) => status,
        }
    }

    /// Gets the contained value, falling back to `default` if this is a failure.
    pub fn get_or_else(self, default: T) -> T {
        match self {
            RpcResult::Success(value) => value,
            RpcResult::Failure(_) => default,
        }
    }

    /// Transforms the value of a successful result using `f`.
    ///
    /// A failure is propagated unchanged. If `f` itself fails, the result becomes a
    /// [`RpcResult::Failure`] carrying [`UCode::UNKNOWN`] and `f`'s error message, mirroring
    /// "exceptions from `f` become a Failure" for a language without exceptions.
    pub fn map<U, F>(self, f: F) -> RpcResult<U>
    where
        F: FnOnce(T) -> Result<U, String>,
    {
        match self {
            RpcResult::Success(value) => match f(value) {
                Ok(mapped) => RpcResult::Success(mapped),
                Err(message) => RpcResult::Failure(UStatus::fail_with_code(UCode::UNKNOWN, message)),
            },
            RpcResult::Failure(status) => RpcResult::Failure(status),
        }
    }

    /// Chains another `RpcResult`-producing operation onto a successful result.
    ///
    /// A failure is propagated unchanged. (This is `flatMap` in languages that use that name.)
    pub fn flat_map<U, F>(self, f: F) -> RpcResult<U>
    where
        F: FnOnce(T) -> RpcResult<U>,
    {
        match self {
            RpcResult::Success(value) => f(value),
            RpcResult::Failure(status) => RpcResult::Failure(status),
        }
    }

    /// Keeps a successful result only if `predicate` holds for its value.
    ///
    /// Turns a successful result whose value fails the predicate into
    /// `Failure(FAILED_PRECONDITION, "filtered out")`. A failure is propagated unchanged.
    #[must_use]
    pub fn filter<F>(self, predicate: F) -> Self
    where
        F: FnOnce(&T) -> bool,
    {
        match self {
            RpcResult::Success(value) if predicate(&value) => RpcResult::Success(value),
            RpcResult::Success(_) => {
                RpcResult::Failure(UStatus::fail_with_code(UCode::FAILED_PRECONDITION, "filtered out"))
            }
            failure @ RpcResult::Failure(_) => failure,
        }
    }

    /// Flattens a result of a result into a single result.
    ///
    /// A failure at either level is propagated.
    pub fn flatten<U>(nested: RpcResult<RpcResult<U>>) -> RpcResult<U> {
        match nested {
            RpcResult::Success(inner) => inner,
            RpcResult::Failure(status) => RpcResult::Failure(status),
        }
    }
}

impl<T> Display for RpcResult<T>
where
    T: Display,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RpcResult::Success(value) => write!(f, "Success({value})"),
            RpcResult::Failure(status) => {
                write!(f, "Failure({:?}: {})", status.get_code(), status.get_message())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_default() -> i32 {
        5
    }

    fn fails_to_map(x: i32) -> Result<i32, String> {
        Err(format!("{x} went boom"))
    }

    fn fails_to_flat_map(x: i32) -> RpcResult<i32> {
        RpcResult::failure(UCode::UNKNOWN, format!("{x} went boom"))
    }

    #[test]
    fn test_is_success_on_success() {
        assert!(RpcResult::success(2).is_success());
    }

    #[test]
    fn test_is_success_on_failure() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        assert!(!result.is_success());
    }

    #[test]
    fn test_is_failure_on_success() {
        assert!(!RpcResult::success(2).is_failure());
    }

    #[test]
    fn test_is_failure_on_failure() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        assert!(result.is_failure());
    }

    #[test]
    fn test_get_or_else_on_success() {
        assert_eq!(2, RpcResult::success(2).get_or_else(get_default()));
    }

    #[test]
    fn test_get_or_else_on_failure() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        assert_eq!(get_default(), result.get_or_else(get_default()));
    }

    #[test]
    fn test_success_value_on_success() {
        assert_eq!(2, RpcResult::success(2).success_value());
    }

    #[test]
    #[should_panic(expected = "does not contain a value")]
    fn test_success_value_on_failure_panics() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        result.success_value();
    }

    #[test]
    fn test_failure_value_on_failure() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        assert_eq!(UCode::INVALID_ARGUMENT, result.failure_value().get_code());
    }

    #[test]
    #[should_panic(expected = "does not represent a failure")]
    fn test_failure_value_on_success_panics() {
        RpcResult::success(2).failure_value();
    }

    #[test]
    fn test_map_on_success() {
        let mapped = RpcResult::success(2).map(|v| Ok(v * 2));
        assert!(mapped.is_success());
        assert_eq!(4, mapped.success_value());
    }

    #[test]
    fn test_map_on_success_when_function_fails() {
        let mapped: RpcResult<i32> = RpcResult::success(2).map(fails_to_map);
        assert!(mapped.is_failure());
        let status = mapped.failure_value();
        assert_eq!(UCode::UNKNOWN, status.get_code());
        assert_eq!("2 went boom", status.get_message());
    }

    #[test]
    fn test_map_on_failure_propagates() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        let mapped = result.map(|v| Ok(v * 2));
        assert_eq!(UCode::INVALID_ARGUMENT, mapped.failure_value().get_code());
    }

    #[test]
    fn test_flat_map_on_success() {
        let mapped = RpcResult::success(2).flat_map(|v| RpcResult::success(v * 2));
        assert_eq!(4, mapped.success_value());
    }

    #[test]
    fn test_flat_map_on_success_when_function_fails() {
        let mapped = RpcResult::success(2).flat_map(fails_to_flat_map);
        assert_eq!(UCode::UNKNOWN, mapped.failure_value().get_code());
    }

    #[test]
    fn test_flat_map_on_failure_propagates() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        let mapped = result.flat_map(|v: i32| RpcResult::success(v * 2));
        assert_eq!(UCode::INVALID_ARGUMENT, mapped.failure_value().get_code());
    }

    #[test]
    fn test_filter_on_success_that_passes() {
        let filtered = RpcResult::success(2).filter(|v| *v < 5);
        assert_eq!(2, filtered.success_value());
    }

    #[test]
    fn test_filter_on_success_that_fails() {
        let filtered = RpcResult::success(2).filter(|v| *v > 5);
        assert_eq!(UCode::FAILED_PRECONDITION, filtered.failure_value().get_code());
    }

    #[test]
    fn test_filter_on_failure_propagates() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        let filtered = result.filter(|v| *v > 5);
        assert_eq!(UCode::INVALID_ARGUMENT, filtered.failure_value().get_code());
    }

    #[test]
    fn test_flatten_on_success() {
        let nested = RpcResult::success(RpcResult::success(2));
        assert_eq!(2, RpcResult::flatten(nested).success_value());
    }

    #[test]
    fn test_flatten_on_inner_failure() {
        let inner: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        let nested = RpcResult::success(inner);
        let flattened = RpcResult::flatten(nested);
        assert_eq!(UCode::INVALID_ARGUMENT, flattened.failure_value().get_code());
    }

    #[test]
    fn test_flatten_on_outer_failure() {
        let nested: RpcResult<RpcResult<i32>> = RpcResult::failure(UCode::UNAVAILABLE, "boom");
        let flattened = RpcResult::flatten(nested);
        assert_eq!(UCode::UNAVAILABLE, flattened.failure_value().get_code());
    }

    #[test]
    fn test_display_success() {
        assert_eq!("Success(2)", RpcResult::success(2).to_string());
    }

    #[test]
    fn test_display_failure() {
        let result: RpcResult<i32> = RpcResult::failure(UCode::INVALID_ARGUMENT, "boom");
        assert_eq!(
            format!("Failure({:?}: boom)", UCode::INVALID_ARGUMENT),
            result.to_string()
        );
    }
}
