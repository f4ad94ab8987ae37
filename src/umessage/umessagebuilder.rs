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

use bytes::Bytes;
use protobuf::Message;

use crate::uattributes::UAttributesError;
use crate::{
    NotificationValidator, PublishValidator, RequestValidator, ResponseValidator, UAttributes,
    UAttributesValidator, UCode, UMessage, UMessageType, UPayloadFormat, UPriority, UUri, UUID,
};

#[derive(Debug)]
pub enum UMessageBuilderError {
    DataSerializationError(protobuf::Error),
    AttributesValidationError(UAttributesError),
}

impl std::fmt::Display for UMessageBuilderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DataSerializationError(e) => {
                f.write_fmt(format_args!("Failed to serialize payload: {}", e))
            }
            Self::AttributesValidationError(e) => f.write_fmt(format_args!(
                "Builder state is not consistent with message type: {}",
                e
            )),
        }
    }
}

impl std::error::Error for UMessageBuilderError {}

impl From<UAttributesError> for UMessageBuilderError {
    fn from(value: UAttributesError) -> Self {
        Self::AttributesValidationError(value)
    }
}

impl From<protobuf::Error> for UMessageBuilderError {
    fn from(value: protobuf::Error) -> Self {
        Self::DataSerializationError(value)
    }
}

/// A builder for creating [`UMessage`]s.
///
/// Messages are being used by a uEntity to inform other entities about the occurrence of events
/// and/or to invoke service operations provided by other entities.
pub struct UMessageBuilder {
    validator: Box<dyn UAttributesValidator>,
    message_type: UMessageType,
    source: Option<UUri>,
    sink: Option<UUri>,
    priority: UPriority,
    ttl: Option<i32>,
    token: Option<String>,
    permission_level: Option<i32>,
    comm_status: Option<UCode>,
    request_id: Option<UUID>,
    message_id: Option<UUID>,
    payload: Option<Bytes>,
    payload_format: UPayloadFormat,
}

impl Default for UMessageBuilder {
    fn default() -> Self {
        UMessageBuilder {
            validator: Box::new(PublishValidator),
            comm_status: None,
            message_type: UMessageType::UMESSAGE_TYPE_UNSPECIFIED,
            payload: None,
            payload_format: UPayloadFormat::UPAYLOAD_FORMAT_UNSPECIFIED,
            permission_level: None,
            priority: UPriority::UPRIORITY_CS1,
            request_id: None,
            message_id: None,
            sink: None,
            source: None,
            token: None,
            ttl: None,
        }
    }
}

impl UMessageBuilder {
    /// Gets a builder for creating a *publish* message.
    ///
    /// A publish message is used to notify all interested consumers of an event that has occurred.
    /// Consumers usually indicate their interest by *subscribing* to a particular topic.
    ///
    /// # Arguments
    ///
    /// * `topic` - The topic to publish the message to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UMessageType, UPayloadFormat, UPriority, UUri};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let topic = UUri::try_from("up://my-vehicle/cabin/1/8001")?;
    /// let message = UMessageBuilder::publish(topic.clone())
    ///                    .build_with_payload("closed".into(), UPayloadFormat::UPAYLOAD_FORMAT_TEXT)?;
    /// assert_eq!(message.attributes.type_, UMessageType::UMESSAGE_TYPE_PUBLISH.into());
    /// assert_eq!(message.attributes.priority, UPriority::UPRIORITY_CS1.into());
    /// assert_eq!(message.attributes.source, Some(topic).into());
    /// # Ok(())
    /// # }
    /// ```
    pub fn publish(topic: UUri) -> UMessageBuilder {
        UMessageBuilder {
            validator: Box::new(PublishValidator),
            message_type: UMessageType::UMESSAGE_TYPE_PUBLISH,
            source: Some(topic),
            ..Default::default()
        }
    }

    /// Gets a builder for creating a *notification* message.
    ///
    /// A notification is used to inform a specific consumer about an event that has occurred.
    ///
    /// # Arguments
    ///
    /// * `origin` - The URI identifying the resource that the notification originates from.
    /// * `destination` - The URI identifying the destination to send the notification to.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UMessageType, UPayloadFormat, UPriority, UUri};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let origin = UUri::try_from("up://my-vehicle/cabin/1/8002")?;
    /// let destination = UUri::try_from("up://my-cloud/companion/1/0")?;
    /// let message = UMessageBuilder::notification(origin.clone(), destination.clone())
    ///                    .build_with_payload("unexpected movement".into(), UPayloadFormat::UPAYLOAD_FORMAT_TEXT)?;
    /// assert_eq!(message.attributes.type_, UMessageType::UMESSAGE_TYPE_NOTIFICATION.into());
    /// assert_eq!(message.attributes.priority, UPriority::UPRIORITY_CS1.into());
    /// assert_eq!(message.attributes.source, Some(origin).into());
    /// assert_eq!(message.attributes.sink, Some(destination).into());
    /// # Ok(())
    /// # }
    /// ```
    pub fn notification(origin: UUri, destination: UUri) -> UMessageBuilder {
        UMessageBuilder {
            validator: Box::new(NotificationValidator),
            message_type: UMessageType::UMESSAGE_TYPE_NOTIFICATION,
            source: Some(origin),
            sink: Some(destination),
            ..Default::default()
        }
    }

    /// Gets a builder for creating an RPC *request* message.
    ///
    /// A request message is used to invoke a service's method with some input data, expecting
    /// the service to reply with a response message which is correlated by means of the message ID.
    ///
    /// # Arguments
    ///
    /// * `method_to_invoke` - The URI identifying the method to invoke.
    /// * `reply_to_address` - The URI that the sender of the request expects the response message at.
    /// * `ttl` - The number of milliseconds after which the request should no longer be processed
    ///           by the target service. The value is capped at [`i32::MAX`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UMessageType, UPayloadFormat, UPriority, UUri};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let method_to_invoke = UUri::try_from("up://my-vehicle/cabin/1/7001")?;
    /// let reply_to_address = UUri::try_from("up://my-cloud/dashboard/1/0")?;
    /// let message = UMessageBuilder::request(method_to_invoke.clone(), reply_to_address.clone(), 5000)
    ///                     .build_with_payload("lock".into(), UPayloadFormat::UPAYLOAD_FORMAT_TEXT)?;
    /// assert_eq!(message.attributes.type_, UMessageType::UMESSAGE_TYPE_REQUEST.into());
    /// assert_eq!(message.attributes.priority, UPriority::UPRIORITY_CS1.into());
    /// assert_eq!(message.attributes.source, Some(reply_to_address).into());
    /// assert_eq!(message.attributes.sink, Some(method_to_invoke).into());
    /// assert_eq!(message.attributes.ttl, Some(5000));
    /// # Ok(())
    /// # }
    /// ```
    pub fn request(method_to_invoke: UUri, reply_to_address: UUri, ttl: u32) -> UMessageBuilder {
        UMessageBuilder {
            validator: Box::new(RequestValidator),
            message_type: UMessageType::UMESSAGE_TYPE_REQUEST,
            source: Some(reply_to_address),
            sink: Some(method_to_invoke),
            ttl: Some(i32::try_from(ttl).unwrap_or(i32::MAX)),
            ..Default::default()
        }
    }

    /// Gets a builder for creating an RPC *response* message.
    ///
    /// A response message is used to send the outcome of processing a request message
    /// to the original sender of the request message.
    ///
    /// # Arguments
    ///
    /// * `reply_to_address` - The URI that the sender of the request expects to receive the response message at.
    /// * `request_id` - The identifier of the request that this is the response to.
    /// * `invoked_method` - The URI identifying the method that has been invoked and which the created message is
    ///                      the outcome of.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UMessageType, UPayloadFormat, UPriority, UUri, UUID};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let invoked_method = UUri::try_from("up://my-vehicle/cabin/1/7001")?;
    /// let reply_to_address = UUri::try_from("up://my-cloud/dashboard/1/0")?;
    /// let request_id = UUID::build();
    /// let message = UMessageBuilder::response(reply_to_address.clone(), request_id.clone(), invoked_method.clone())
    ///                     .build()?;
    /// assert_eq!(message.attributes.type_, UMessageType::UMESSAGE_TYPE_RESPONSE.into());
    /// assert_eq!(message.attributes.priority, UPriority::UPRIORITY_CS1.into());
    /// assert_eq!(message.attributes.source, Some(invoked_method).into());
    /// assert_eq!(message.attributes.sink, Some(reply_to_address).into());
    /// assert_eq!(message.attributes.reqid, Some(request_id).into());
    /// # Ok(())
    /// # }
    /// ```
    pub fn response(
        reply_to_address: UUri,
        request_id: UUID,
        invoked_method: UUri,
    ) -> UMessageBuilder {
        UMessageBuilder {
            validator: Box::new(ResponseValidator),
            message_type: UMessageType::UMESSAGE_TYPE_RESPONSE,
            source: Some(invoked_method),
            sink: Some(reply_to_address),
            request_id: Some(request_id),
            ..Default::default()
        }
    }

    /// Gets a builder for creating an RPC *response* message in reply to a *request*.
    ///
    /// A response message is used to send the outcome of processing a request message
    /// to the original sender of the request message.
    ///
    /// # Arguments
    ///
    /// * `request_attributes` - The attributes from the request message. The response message builder will be initialized
    ///                          with the corresponding attribute values.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UMessageType, UPayloadFormat, UPriority, UUri};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let method_to_invoke = UUri::try_from("up://my-vehicle/cabin/1/7001")?;
    /// let reply_to_address = UUri::try_from("up://my-cloud/dashboard/1/0")?;
    /// let request_message = UMessageBuilder::request(method_to_invoke.clone(), reply_to_address.clone(), 5000)
    ///                     .build_with_payload("lock".into(), UPayloadFormat::UPAYLOAD_FORMAT_TEXT)?;
    ///
    /// let response_message = UMessageBuilder::response_for_request(request_message.attributes.get_or_default())
    ///                           .build()?;
    /// assert_eq!(response_message.attributes.type_, UMessageType::UMESSAGE_TYPE_RESPONSE.into());
    /// assert_eq!(response_message.attributes.priority, UPriority::UPRIORITY_CS1.into());
    /// assert_eq!(response_message.attributes.source, Some(method_to_invoke).into());
    /// assert_eq!(response_message.attributes.sink, Some(reply_to_address).into());
    /// # Ok(())
    /// # }
    /// ```
    pub fn response_for_request(request_attributes: &UAttributes) -> UMessageBuilder {
        UMessageBuilder {
            validator: Box::new(ResponseValidator),
            message_type: UMessageType::UMESSAGE_TYPE_RESPONSE,
            source: request_attributes.sink.clone().into_option(),
            sink: request_attributes.source.clone().into_option(),
            request_id: request_attributes.id.clone().into_option(),
            ..Default::default()
        }
    }

    /// Sets the message's priority.
    ///
    /// If not set explicitly, the default priority as defined in the
    /// [uProtocol specification](https://github.com/eclipse-uprotocol/up-spec/blob/main/basics/qos.adoc)
    /// is used.
    ///
    /// # Arguments
    ///
    /// * `priority` - The priority to be used for sending the message.
    ///
    /// # Returns
    ///
    /// The builder.
    pub fn with_priority(&mut self, priority: UPriority) -> &mut UMessageBuilder {
        self.priority = priority;
        self
    }

    /// Sets the message's time-to-live.
    ///
    /// # Arguments
    ///
    /// * `ttl` - The time-to-live in milliseconds. The value is capped at [`i32::MAX`].
    ///
    /// # Returns
    ///
    /// The builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use up_rust::{UMessageBuilder, UUID, UUri};
    ///
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let invoked_method = UUri::try_from("up://my-vehicle/cabin/1/7001")?;
    /// let reply_to_address = UUri::try_from("up://my-cloud/dashboard/1/0")?;
    /// let request_id = UUID::build();
    /// let message = UMessageBuilder::response(reply_to_address, request_id, invoked_method)
    ///                     .with_ttl(2000)
    ///                     .build()?;
    /// assert_eq!(message.attributes.ttl, Some(2000));
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_ttl(&mut self, ttl: u32) -> &mut UMessageBuilder {
        self.ttl = Some(i32::try_from(ttl).unwrap_or(i32::MAX));
        self
    }

    /// Sets the message's authorization token used for TAP.
    ///
    /// # Arguments
    ///
    /// * `token` - The token.
    ///
    /// # Returns
    ///
    /// The builder.
    pub fn with_token(&mut self, token: String) -> &mut UMessageBuilder {
        self.token = Some(token);
        self
    }

    /// Sets the message's permission level.
    ///
    /// # Arguments
    ///
    /// * `level` - The level.
    ///
    /// # Returns
    ///
    /// The builder.
    ///
    /// # Panics
    ///
    /// if the given level is 0 or greater than [`i32::MAX`].
    pub fn with_permission_level(&mut self, level: u32) -> &mut UMessageBuilder {
        assert!(level > 0, "permission level must be a positive integer");
        self.permission_level =
            Some(i32::try_from(level).expect("permission level must not exceed i32::MAX"));
        self
    }

    /// Sets the message's communication status.
    ///
    /// # Arguments
    ///
    /// * `comm_status` - The status.
    ///
    /// # Returns
    ///
    /// The builder.
    pub fn with_comm_status(&mut self, comm_status: UCode) -> &mut UMessageBuilder {
        self.comm_status = Some(comm_status);
        self
    }

    /// Sets the message's identifier explicitly.
    ///
    /// If not set, a fresh identifier is generated when the message is built.
    ///
    /// # Arguments
    ///
    /// * `message_id` - The identifier to use for the message.
    ///
    /// # Returns
    ///
    /// The builder.
    pub fn with_message_id(&mut self, message_id: UUID) -> &mut UMessageBuilder {
        self.message_id = Some(message_id);
        self
    }

    /// Creates the message based on the builder's state.
    ///
    /// # Returns
    ///
    /// A message ready to be sent using [`crate::UTransport::send`].
    ///
    /// # Errors
    ///
    /// If the properties set on the builder do not represent a consistent set of [`UAttributes`],
    /// a [`UMessageBuilderError::AttributesValidationError`] is returned.
    pub fn build(&self) -> Result<UMessage, UMessageBuilderError> {
        let id = self.message_id.clone().unwrap_or_else(UUID::build);
        let attributes = UAttributes {
            id: Some(id).into(),
            type_: self.message_type.into(),
            source: self.source.clone().into(),
            sink: self.sink.clone().into(),
            priority: self.priority.into(),
            ttl: self.ttl,
            token: self.token.clone(),
            permission_level: self.permission_level,
            commstatus: self.comm_status.map(Into::into),
            reqid: self.request_id.clone().into(),
            payload_format: self.payload_format.into(),
            ..Default::default()
        };
        self.validator
            .validate(&attributes)
            .map_err(UMessageBuilderError::from)
            .map(|_| UMessage {
                attributes: Some(attributes).into(),
                payload: self.payload.clone(),
                ..Default::default()
            })
    }

    /// Creates the message based on the builder's state and some payload.
    ///
    /// # Arguments
    ///
    /// * `payload` - The data to set as payload.
    /// * `format` - The payload format.
    ///
    /// # Returns
    ///
    /// A message ready to be sent using [`crate::UTransport::send`].
    ///
    /// # Errors
    ///
    /// If the properties set on the builder do not represent a consistent set of [`UAttributes`],
    /// a [`UMessageBuilderError::AttributesValidationError`] is returned.
    pub fn build_with_payload(
        &mut self,
        payload: Bytes,
        format: UPayloadFormat,
    ) -> Result<UMessage, UMessageBuilderError> {
        self.payload = Some(payload);
        self.payload_format = format;
        self.build()
    }

    /// Creates the message based on the builder's state and some payload.
    ///
    /// # Arguments
    ///
    /// * `payload` - The protobuf message to serialize and set as payload.
    ///
    /// # Returns
    ///
    /// A message ready to be sent using [`crate::UTransport::send`].
    ///
    /// # Errors
    ///
    /// If the given payload cannot be serialized into a byte array, a [`UMessageBuilderError::DataSerializationError`] is returned.
    /// If the properties set on the builder do not represent a consistent set of [`UAttributes`],
    /// a [`UMessageBuilderError::AttributesValidationError`] is returned.
    pub fn build_with_protobuf_payload<T: Message>(
        &mut self,
        payload: &T,
    ) -> Result<UMessage, UMessageBuilderError> {
        payload
            .write_to_bytes()
            .map_err(UMessageBuilderError::from)
            .and_then(|serialized_payload| {
                self.build_with_payload(
                    serialized_payload.into(),
                    UPayloadFormat::UPAYLOAD_FORMAT_PROTOBUF,
                )
            })
    }
}
