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

use std::future::Future;

use protobuf::Message;

use super::{RpcResult, ServiceInvocationError, UPayload};

/// Maps the (still pending) result of an [`RpcClient::invoke_method`](super::RpcClient::invoke_method)
/// invocation into the declared response type.
///
/// A response payload that is present is unpacked into `T` (an empty-bytes payload decodes
/// to `T`'s default instance, following the protobuf convention). A response that carries no
/// payload at all fails with `INVALID_ARGUMENT` — this case is distinguishable from "payload
/// present but empty". Any failure of `response_future` itself is propagated unchanged.
///
/// # Errors
///
/// Returns an error if `response_future` fails, if the response did not contain a payload,
/// or if the payload could not be parsed into `T`.
pub async fn map_response<T, F>(response_future: F) -> Result<T, ServiceInvocationError>
where
    T: Message + Default,
    F: Future<Output = Result<Option<UPayload>, ServiceInvocationError>>,
{
    match response_future.await {
        Ok(Some(payload)) => payload.extract_protobuf::<T>().map_err(|e| {
            ServiceInvocationError::InvalidArgument(format!(
                "failed to parse response payload into expected type {}: {}",
                std::any::type_name::<T>(),
                e
            ))
        }),
        Ok(None) => Err(ServiceInvocationError::InvalidArgument(format!(
            "service operation did not return a payload, expected {}",
            std::any::type_name::<T>()
        ))),
        Err(e) => Err(e),
    }
}

/// Same as [`map_response`] but converts every error into a [`RpcResult::Failure`] instead
/// of propagating it as an asynchronous failure.
///
/// A timeout maps to `DEADLINE_EXCEEDED`, a typed [`ServiceInvocationError`] maps to its
/// carried code, and any other unpacking problem maps to `INVALID_ARGUMENT` — this falls
/// out of [`ServiceInvocationError`]'s existing conversion to [`crate::UStatus`].
pub async fn map_response_to_result<T, F>(response_future: F) -> RpcResult<T>
where
    T: Message + Default,
    F: Future<Output = Result<Option<UPayload>, ServiceInvocationError>>,
{
    match map_response::<T, F>(response_future).await {
        Ok(value) => RpcResult::success(value),
        Err(e) => RpcResult::Failure(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use protobuf::well_known_types::wrappers::StringValue;

    use crate::{UCode, UPayloadFormat};

    fn ok_payload(value: &str) -> Result<Option<UPayload>, ServiceInvocationError> {
        let message = StringValue {
            value: value.to_string(),
            ..Default::default()
        };
        UPayload::try_from_protobuf(message)
            .map(Some)
            .map_err(|e| ServiceInvocationError::InvalidArgument(e.to_string()))
    }

    #[tokio::test]
    async fn test_map_response_succeeds_for_present_payload() {
        let result = map_response::<StringValue, _>(async { ok_payload("Hello World") }).await;
        assert!(result.is_ok_and(|v| v.value == *"Hello World"));
    }

    #[tokio::test]
    async fn test_map_response_returns_default_for_empty_payload() {
        let empty = UPayload::new(bytes::Bytes::new(), UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF);
        let result = map_response::<StringValue, _>(async { Ok(Some(empty)) }).await;
        assert!(result.is_ok_and(|v| v.value.is_empty()));
    }

    #[tokio::test]
    async fn test_map_response_fails_for_absent_payload() {
        let result = map_response::<StringValue, _>(async { Ok(None) }).await;
        assert!(result.is_err_and(|e| matches!(e, ServiceInvocationError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_map_response_propagates_transport_failure() {
        let result = map_response::<StringValue, _>(async {
            Err(ServiceInvocationError::DeadlineExceeded)
        })
        .await;
        assert!(result.is_err_and(|e| matches!(e, ServiceInvocationError::DeadlineExceeded)));
    }

    #[tokio::test]
    async fn test_map_response_to_result_yields_success() {
        let result = map_response_to_result::<StringValue, _>(async { ok_payload("World") }).await;
        assert!(result.is_success());
        assert_eq!("World", result.success_value().value);
    }

    #[tokio::test]
    async fn test_map_response_to_result_maps_timeout_to_deadline_exceeded() {
        let result = map_response_to_result::<StringValue, _>(async {
            Err(ServiceInvocationError::DeadlineExceeded)
        })
        .await;
        assert_eq!(UCode::DEADLINE_EXCEEDED, result.failure_value().get_code());
    }

    #[tokio::test]
    async fn test_map_response_to_result_preserves_carried_code() {
        let result = map_response_to_result::<StringValue, _>(async {
            Err(ServiceInvocationError::Unimplemented(
                "not supported".to_string(),
            ))
        })
        .await;
        assert_eq!(UCode::UNIMPLEMENTED, result.failure_value().get_code());
    }

    #[tokio::test]
    async fn test_map_response_to_result_maps_unpack_failure_to_invalid_argument() {
        let result = map_response_to_result::<StringValue, _>(async { Ok(None) }).await;
        assert_eq!(UCode::INVALID_ARGUMENT, result.failure_value().get_code());
    }
}
