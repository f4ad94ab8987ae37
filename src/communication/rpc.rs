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

use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

use async_trait::async_trait;
use protobuf::Message;

use crate::communication::{rpc_mapper, CallOptions, UPayload};
use crate::{UAttributes, UCode, UStatus, UUri};

/// An error indicating a problem with invoking an RPC method or processing an RPC request.
#[derive(Debug)]
pub enum ServiceInvocationError {
    /// Indicates that the request or the given parameters are not valid.
    InvalidArgument(String),
    /// Indicates that the caller does not have permission to invoke the operation.
    PermissionDenied(String),
    /// Indicates that the caller is not authenticated.
    Unauthenticated(String),
    /// Indicates that the resource that the operation has been invoked on does not exist.
    NotFound(String),
    /// Indicates that an operation could not be invoked again because a prior invocation is still pending.
    AlreadyExists(String),
    /// Indicates that the resources necessary to invoke the operation are exhausted.
    ResourceExhausted(String),
    /// Indicates that the state required for invoking the operation is not given.
    FailedPrecondition(String),
    /// Indicates that the invocation has been aborted.
    Aborted(String),
    /// Indicates that the invocation did not complete in time.
    DeadlineExceeded,
    /// Indicates that the operation is not implemented.
    Unimplemented(String),
    /// Indicates an unspecific error that occurred on the service provider side while invoking the operation.
    Internal(String),
    /// Indicates that the service provider is currently not able to accept the request.
    Unavailable(String),
    /// Indicates that a generic error occurred while invoking the operation.
    Unknown(UStatus),
}

impl Display for ServiceInvocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceInvocationError::InvalidArgument(s) => {
                f.write_fmt(format_args!("invalid argument: {}", s))
            }
            ServiceInvocationError::PermissionDenied(s) => {
                f.write_fmt(format_args!("permission denied: {}", s))
            }
            ServiceInvocationError::Unauthenticated(s) => {
                f.write_fmt(format_args!("not authenticated: {}", s))
            }
            ServiceInvocationError::NotFound(s) => {
                f.write_fmt(format_args!("not found: {}", s))
            }
            ServiceInvocationError::AlreadyExists(s) => {
                f.write_fmt(format_args!("already exists: {}", s))
            }
            ServiceInvocationError::ResourceExhausted(s) => {
                f.write_fmt(format_args!("resource exhausted: {}", s))
            }
            ServiceInvocationError::FailedPrecondition(s) => {
                f.write_fmt(format_args!("failed precondition: {}", s))
            }
            ServiceInvocationError::Aborted(s) => f.write_fmt(format_args!("aborted: {}", s)),
            ServiceInvocationError::DeadlineExceeded => {
                f.write_str("invocation of service operation has timed out")
            }
            ServiceInvocationError::Unimplemented(s) => {
                f.write_fmt(format_args!("not implemented: {}", s))
            }
            ServiceInvocationError::Internal(s) => {
                f.write_fmt(format_args!("internal error: {}", s))
            }
            ServiceInvocationError::Unavailable(s) => {
                f.write_fmt(format_args!("unavailable: {}", s))
            }
            ServiceInvocationError::Unknown(s) => {
                f.write_fmt(format_args!("failed to invoke service operation: {}", s))
            }
        }
    }
}

impl Error for ServiceInvocationError {}

impl From<UStatus> for ServiceInvocationError {
    fn from(value: UStatus) -> Self {
        let message = value.get_message().to_owned();
        match value.code.enum_value() {
            Ok(UCode::INVALID_ARGUMENT) => ServiceInvocationError::InvalidArgument(message),
            Ok(UCode::PERMISSION_DENIED) => ServiceInvocationError::PermissionDenied(message),
            Ok(UCode::UNAUTHENTICATED) => ServiceInvocationError::Unauthenticated(message),
            Ok(UCode::NOT_FOUND) => ServiceInvocationError::NotFound(message),
            Ok(UCode::ALREADY_EXISTS) => ServiceInvocationError::AlreadyExists(message),
            Ok(UCode::RESOURCE_EXHAUSTED) => ServiceInvocationError::ResourceExhausted(message),
            Ok(UCode::FAILED_PRECONDITION) => ServiceInvocationError::FailedPrecondition(message),
            Ok(UCode::ABORTED) => ServiceInvocationError::Aborted(message),
            Ok(UCode::DEADLINE_EXCEEDED) => ServiceInvocationError::DeadlineExceeded,
            Ok(UCode::UNIMPLEMENTED) => ServiceInvocationError::Unimplemented(message),
            Ok(UCode::INTERNAL) => ServiceInvocationError::Internal(message),
            Ok(UCode::UNAVAILABLE) => ServiceInvocationError::Unavailable(message),
            _ => ServiceInvocationError::Unknown(value),
        }
    }
}

impl From<ServiceInvocationError> for UStatus {
    fn from(value: ServiceInvocationError) -> Self {
        match value {
            ServiceInvocationError::InvalidArgument(s) => {
                UStatus::fail_with_code(UCode::INVALID_ARGUMENT, s)
            }
            ServiceInvocationError::PermissionDenied(s) => {
                UStatus::fail_with_code(UCode::PERMISSION_DENIED, s)
            }
            ServiceInvocationError::Unauthenticated(s) => {
                UStatus::fail_with_code(UCode::UNAUTHENTICATED, s)
            }
            ServiceInvocationError::NotFound(s) => UStatus::fail_with_code(UCode::NOT_FOUND, s),
            ServiceInvocationError::AlreadyExists(s) => {
                UStatus::fail_with_code(UCode::ALREADY_EXISTS, s)
            }
            ServiceInvocationError::ResourceExhausted(s) => {
                UStatus::fail_with_code(UCode::RESOURCE_EXHAUSTED, s)
            }
            ServiceInvocationError::FailedPrecondition(s) => {
                UStatus::fail_with_code(UCode::FAILED_PRECONDITION, s)
            }
            ServiceInvocationError::Aborted(s) => UStatus::fail_with_code(UCode::ABORTED, s),
            ServiceInvocationError::DeadlineExceeded => UStatus::fail_with_code(
                UCode::DEADLINE_EXCEEDED,
                "invocation of service operation has timed out",
            ),
            ServiceInvocationError::Unimplemented(s) => {
                UStatus::fail_with_code(UCode::UNIMPLEMENTED, s)
            }
            ServiceInvocationError::Internal(s) => UStatus::fail_with_code(UCode::INTERNAL, s),
            ServiceInvocationError::Unavailable(s) => {
                UStatus::fail_with_code(UCode::UNAVAILABLE, s)
            }
            ServiceInvocationError::Unknown(s) => s,
        }
    }
}

/// A client for invoking RPC methods.
///
/// Please refer to the
/// [Communication Layer API Specifications](https://github.com/eclipse-uprotocol/up-spec/blob/main/up-l2/api.adoc).
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait RpcClient: Send + Sync {
    /// Invokes a method on a service.
    ///
    /// # Arguments
    ///
    /// * `method` - The (resolved) address of the method to invoke.
    /// * `call_options` - The options to use for the invocation.
    /// * `payload` - The request message's payload, if any.
    ///
    /// # Returns
    ///
    /// The response message's payload, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the invocation fails or the given parameters do not allow
    /// creating a valid RPC Request message.
    async fn invoke_method(
        &self,
        method: UUri,
        call_options: CallOptions,
        payload: Option<UPayload>,
    ) -> Result<Option<UPayload>, ServiceInvocationError>;
}

/// Extends [`RpcClient`] with a convenience function for invoking RPC methods using
/// (typed) protobuf messages as request and response payload.
///
/// This trait is implemented for all types implementing [`RpcClient`], so client code
/// can simply invoke [`Self::invoke_proto_method`] on any `RpcClient` (trait object) instance.
#[async_trait]
pub trait RpcClientExt {
    /// Invokes a method on a service, using (typed) protobuf messages for request and response payload.
    ///
    /// # Arguments
    ///
    /// * `method` - The (resolved) address of the method to invoke.
    /// * `call_options` - The options to use for the invocation.
    /// * `request` - The request message to serialize into the RPC Request message's payload.
    ///
    /// # Returns
    ///
    /// The deserialized response message. An empty-bytes response payload is decoded into `R`'s
    /// default value, following the protobuf convention for an unset message.
    ///
    /// # Errors
    ///
    /// Returns an error if the invocation fails, if the service did not return a response
    /// payload at all, or if the response payload cannot be deserialized into the target type.
    async fn invoke_proto_method<T, R>(
        &self,
        method: UUri,
        call_options: CallOptions,
        request: T,
    ) -> Result<R, ServiceInvocationError>
    where
        T: Message + 'static,
        R: Message + Default;
}

#[async_trait]
impl<U: RpcClient + ?Sized> RpcClientExt for U {
    async fn invoke_proto_method<T, R>(
        &self,
        method: UUri,
        call_options: CallOptions,
        request: T,
    ) -> Result<R, ServiceInvocationError>
    where
        T: Message + 'static,
        R: Message + Default,
    {
        let payload = UPayload::try_from_protobuf(request)
            .map_err(|e| ServiceInvocationError::InvalidArgument(e.to_string()))?;
        rpc_mapper::map_response(self.invoke_method(method, call_options, Some(payload))).await
    }
}

/// A handler for incoming RPC requests.
///
/// Implementations contain the actual business logic for processing a request and, optionally,
/// producing a response payload.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait RequestHandler: Send + Sync {
    /// Processes an incoming RPC request.
    ///
    /// # Arguments
    ///
    /// * `resource_id` - The (local) resource identifier that the request has been received on.
    /// * `message_attributes` - The attributes of the RPC Request message.
    /// * `request_payload` - The request message's payload, if any.
    ///
    /// # Returns
    ///
    /// The payload to include in the RPC Response message, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be processed successfully.
    async fn handle_request(
        &self,
        resource_id: u16,
        message_attributes: &UAttributes,
        request_payload: Option<UPayload>,
    ) -> Result<Option<UPayload>, ServiceInvocationError>;
}

/// A server for exposing RPC endpoints.
///
/// Please refer to the
/// [Communication Layer API Specifications](https://github.com/eclipse-uprotocol/up-spec/blob/main/up-l2/api.adoc).
#[async_trait]
pub trait RpcServer: Send + Sync {
    /// Registers an endpoint for RPC requests.
    ///
    /// Note that only a single endpoint can be registered for a given resource ID.
    /// However, the same request handler can be registered for multiple endpoints.
    ///
    /// # Arguments
    ///
    /// * `origin_filter` - A pattern defining origin addresses to accept requests from. If `None`, requests
    ///                     will be accepted from all sources.
    /// * `resource_id` - The (local) resource identifier to accept requests at.
    /// * `request_handler` - The handler to invoke for each incoming request.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be registered or if a listener has already been registered
    /// for the given resource ID.
    async fn register_endpoint(
        &self,
        origin_filter: Option<&UUri>,
        resource_id: u16,
        request_handler: Arc<dyn RequestHandler>,
    ) -> Result<(), crate::communication::RegistrationError>;

    /// Unregisters a previously [registered endpoint](Self::register_endpoint).
    ///
    /// # Arguments
    ///
    /// * `origin_filter` - The origin pattern that the endpoint had been registered for.
    /// * `resource_id` - The (local) resource identifier that the endpoint had been registered for.
    /// * `request_handler` - The handler to unregister.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be unregistered.
    async fn unregister_endpoint(
        &self,
        origin_filter: Option<&UUri>,
        resource_id: u16,
        request_handler: Arc<dyn RequestHandler>,
    ) -> Result<(), crate::communication::RegistrationError>;
}
