/********************************************************************************
 * Copyright (c) 2023 Contributors to the Eclipse Foundation
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

mod umessagebuilder;
mod umessagetype;

pub use umessagebuilder::*;

use crate::{UAttributesError, UCode, UMessageType, UPayloadFormat, UPriority, UUri, UUID};
use protobuf::{well_known_types::any::Any, Message};

pub use crate::up_core_api::umessage::*;

#[derive(Debug)]
pub enum UMessageError {
    AttributesValidationError(UAttributesError),
    DataSerializationError(protobuf::Error),
    PayloadError(String),
}

impl std::fmt::Display for UMessageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AttributesValidationError(e) => f.write_fmt(format_args!(
                "Builder state is not consistent with message type: {}",
                e
            )),
            Self::DataSerializationError(e) => {
                f.write_fmt(format_args!("Failed to serialize payload: {}", e))
            }
            Self::PayloadError(e) => f.write_fmt(format_args!("UMessage payload error: {}", e)),
        }
    }
}

impl std::error::Error for UMessageError {}

impl From<UAttributesError> for UMessageError {
    fn from(value: UAttributesError) -> Self {
        Self::AttributesValidationError(value)
    }
}

impl From<protobuf::Error> for UMessageError {
    fn from(value: protobuf::Error) -> Self {
        Self::DataSerializationError(value)
    }
}

impl From<&str> for UMessageError {
    fn from(value: &str) -> Self {
        Self::PayloadError(value.into())
    }
}

/// Deserializes a protobuf message from raw payload bytes, taking the declared payload
/// format into account.
///
/// Succeeds only if `format` is [`UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF`] or
/// [`UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF_WRAPPED_IN_ANY`].
pub(crate) fn deserialize_protobuf_bytes<T: Message + Default>(
    bytes: &bytes::Bytes,
    format: &UPayloadFormat,
) -> Result<T, UMessageError> {
    match format {
        UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF => {
            T::parse_from_bytes(bytes.as_ref()).map_err(UMessageError::DataSerializationError)
        }
        UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF_WRAPPED_IN_ANY => {
            Any::parse_from_bytes(bytes.as_ref())
                .map_err(UMessageError::DataSerializationError)
                .and_then(|any| {
                    T::parse_from_bytes(any.value.as_slice())
                        .map_err(UMessageError::DataSerializationError)
                })
        }
        _ => Err(UMessageError::from(
            "Unknown/invalid/unsupported payload format",
        )),
    }
}

impl UMessage {
    /// Checks if this is a Publish message.
    pub fn is_publish(&self) -> bool {
        self.attributes.is_publish()
    }

    /// Checks if this is an RPC Request message.
    pub fn is_request(&self) -> bool {
        self.attributes.is_request()
    }

    /// Checks if this is an RPC Response message.
    pub fn is_response(&self) -> bool {
        self.attributes.is_response()
    }

    /// Checks if this is a Notification message.
    pub fn is_notification(&self) -> bool {
        self.attributes.is_notification()
    }

    /// Gets the unique identifier of this message.
    ///
    /// # Panics
    ///
    /// if the message's attributes do not contain an id, which should never be the case for
    /// a message created by [`UMessageBuilder`].
    pub fn id_unchecked(&self) -> &UUID {
        self.attributes
            .id
            .as_ref()
            .expect("message attributes do not contain an id")
    }

    /// Gets the type of messaging pattern that this message implements.
    pub fn type_unchecked(&self) -> UMessageType {
        self.attributes.type_.enum_value_or_default()
    }

    /// Gets the QoS class this message has been sent with.
    pub fn priority_unchecked(&self) -> UPriority {
        self.attributes.priority.enum_value_or_default()
    }

    /// Gets the message's time-to-live in milliseconds.
    ///
    /// # Panics
    ///
    /// if the message's attributes do not contain a ttl.
    pub fn ttl_unchecked(&self) -> u32 {
        self.attributes
            .ttl
            .expect("message attributes do not contain a ttl") as u32
    }

    /// Gets the bearer token carried by this message, if any.
    pub fn token(&self) -> Option<&String> {
        self.attributes.token.as_ref()
    }

    /// Gets the identifier of the request that a RESPONSE message answers.
    ///
    /// # Panics
    ///
    /// if this message is not a RESPONSE message.
    pub fn request_id_unchecked(&self) -> &UUID {
        self.attributes
            .reqid
            .as_ref()
            .expect("message attributes do not contain a request id")
    }

    /// Gets the non-OK status carried by a RESPONSE message, if any.
    pub fn commstatus(&self) -> Option<UCode> {
        self.attributes.commstatus.and_then(|c| c.enum_value().ok())
    }

    /// Gets the declared serialization format of this message's payload.
    pub fn payload_format(&self) -> Option<UPayloadFormat> {
        self.attributes.payload_format.enum_value().ok()
    }

    /// Gets the URI that this message originates from.
    pub fn source(&self) -> Option<&UUri> {
        self.attributes.source.as_ref()
    }

    /// Gets the URI that this message is destined for, if any.
    pub fn sink(&self) -> Option<&UUri> {
        self.attributes.sink.as_ref()
    }

    /// Extracts the payload-contained protobuf message from a `UMessage`.
    ///
    /// This function is used to extract strongly-typed data from a `UMessage` object,
    /// taking into account `UAttributes::payload_format` (will only succeed if payload format is
    /// `UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF` or `UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF_WRAPPED_IN_ANY`)
    ///
    /// # Type Parameters
    ///
    /// * `T`: The target type of the data to be unpacked.
    ///
    /// # Returns
    ///
    /// * `Ok(T)`: The deserialized protobuf message contained in the payload.
    ///
    /// # Errors
    ///
    /// * Err(`UMessageError`) if the unpacking process fails, for example if the payload could
    /// not be deserialized into the target type `T`.
    pub fn extract_protobuf<T: Message + Default>(&self) -> Result<T, UMessageError> {
        let Some(payload) = self.payload.as_ref() else {
            return Err(UMessageError::from("Payload is empty"));
        };
        deserialize_protobuf_bytes(
            payload,
            &self.attributes.payload_format.enum_value_or_default(),
        )
    }
}
