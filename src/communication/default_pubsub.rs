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

// [impl->req~up-language-comm-api-default-impl~1]

use std::{
    collections::{hash_map::Entry, HashMap},
    ops::Deref,
    sync::{Arc, RwLock},
};

use async_trait::async_trait;
use tracing::{debug, info};

use crate::{
    core::usubscription::{
        self, State, SubscriberInfo, SubscriptionRequest, USubscription, UnsubscribeRequest, Update,
    },
    LocalUriProvider, UListener, UMessage, UMessageBuilder, UStatus, UTransport, UUri,
};

use super::{
    apply_common_options, build_message, pubsub::SubscriptionChangeHandler, CallOptions,
    InMemoryRpcClient, Notifier, PubSubError, Publisher, RegistrationError, RpcClientUSubscription,
    SimpleNotifier, Subscriber, UPayload,
};

#[derive(Clone)]
struct ComparableSubscriptionChangeHandler {
    inner: Arc<dyn SubscriptionChangeHandler>,
}

impl ComparableSubscriptionChangeHandler {
    fn new(handler: Arc<dyn SubscriptionChangeHandler>) -> Self {
        ComparableSubscriptionChangeHandler {
            inner: handler.clone(),
        }
    }
}

impl Deref for ComparableSubscriptionChangeHandler {
    type Target = dyn SubscriptionChangeHandler;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl PartialEq for ComparableSubscriptionChangeHandler {
    /// Compares this handler to another handler.
    ///
    /// # Returns
    ///
    /// `true` if the pointer to the handler held by `self` is equal to the pointer held by `other`.
    /// This is consistent with the implementation of [`ComparableSubscriptionChangeHandler::hash`].
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for ComparableSubscriptionChangeHandler {}

#[derive(Default)]
struct SubscriptionChangeListener {
    subscription_change_handlers: RwLock<HashMap<UUri, ComparableSubscriptionChangeHandler>>,
}

impl SubscriptionChangeListener {
    /// Adds a handler for a given topic.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError::AlreadyExists`] if another handler has already been registered for
    /// the given topic. Returns a [`RegistrationError::Unknown`] if the internal state could not be accessed,
    fn add_handler(
        &self,
        topic: UUri,
        subscription_change_handler: Arc<dyn SubscriptionChangeHandler>,
    ) -> Result<(), RegistrationError> {
        let Ok(mut handlers) = self.subscription_change_handlers.write() else {
            return Err(RegistrationError::Unknown(UStatus::fail_with_code(
                crate::UCode::INTERNAL,
                "failed to acquire write lock for handler map",
            )));
        };
        let handler_to_add = ComparableSubscriptionChangeHandler::new(subscription_change_handler);
        match handlers.entry(topic) {
            Entry::Vacant(entry) => {
                entry.insert(handler_to_add);
                Ok(())
            }
            Entry::Occupied(entry) => {
                if entry.get() == &handler_to_add {
                    Ok(())
                } else {
                    Err(RegistrationError::AlreadyExists)
                }
            }
        }
    }

    /// Removes the handler for a given topic.
    ///
    /// This function also succeeds if no handler is registered for the topic.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError::Unknown`] if the internal state could not be accessed,
    fn remove_handler(&self, topic: &UUri) -> Result<(), RegistrationError> {
        self.subscription_change_handlers
            .write()
            .map_err(|_e| {
                RegistrationError::Unknown(UStatus::fail_with_code(
                    crate::UCode::INTERNAL,
                    "failed to acquire write lock for handler map",
                ))
            })
            .map(|mut handlers| {
                handlers.remove(topic);
            })
    }

    /// Removes all handlers for all topic.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError::Unknown`] if the internal state could not be accessed,
    fn clear(&self) -> Result<(), RegistrationError> {
        self.subscription_change_handlers
            .write()
            .map_err(|_e| {
                RegistrationError::Unknown(UStatus::fail_with_code(
                    crate::UCode::INTERNAL,
                    "failed to acquire write lock for handler map",
                ))
            })
            .map(|mut handlers| {
                handlers.clear();
            })
    }

    #[cfg(test)]
    fn has_handler(&self, topic: &UUri) -> bool {
        self.subscription_change_handlers
            .read()
            .map_or(false, |handlers| handlers.contains_key(topic))
    }
}

#[async_trait]
impl UListener for SubscriptionChangeListener {
    async fn on_receive(&self, msg: UMessage) {
        if !msg.is_notification() {
            return;
        }
        let Ok(subscription_update) = msg.extract_protobuf::<Update>() else {
            debug!("ignoring notification that does not contain subscription update");
            return;
        };
        let Some(topic) = subscription_update.topic.as_ref() else {
            return;
        };
        let Some(status) = subscription_update.status.as_ref() else {
            return;
        };

        let Ok(handlers) = self.subscription_change_handlers.read() else {
            return;
        };
        if let Some(handler) = handlers.get(topic) {
            handler.on_subscription_change(topic.to_owned(), status.to_owned());
        }
    }
}

/// A [`Publisher`] that uses the uProtocol Transport Layer API for publishing events to topics.
pub struct SimplePublisher {
    transport: Arc<dyn UTransport>,
    uri_provider: Arc<dyn LocalUriProvider>,
}

impl SimplePublisher {
    /// Creates a new client.
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport to use for sending messages.
    /// * `uri_provider` - The service to use for creating the event messages' _sink_ address.
    pub fn new(transport: Arc<dyn UTransport>, uri_provider: Arc<dyn LocalUriProvider>) -> Self {
        SimplePublisher {
            transport,
            uri_provider,
        }
    }
}

#[async_trait]
impl Publisher for SimplePublisher {
    async fn publish(
        &self,
        resource_id: u16,
        call_options: CallOptions,
        payload: Option<UPayload>,
    ) -> Result<(), PubSubError> {
        let mut builder = UMessageBuilder::publish(self.uri_provider.get_resource_uri(resource_id));
        apply_common_options(call_options, &mut builder);
        match build_message(&mut builder, payload) {
            Ok(publish_message) => self
                .transport
                .send(publish_message)
                .await
                .map_err(PubSubError::PublishError),
            Err(e) => Err(PubSubError::InvalidArgument(format!(
                "failed to create Publish message from parameters: {}",
                e
            ))),
        }
    }
}

/// A [`Subscriber`] which keeps all information about registered susbcription change handlers in memory.
///
/// The subscriber requires a (client) implementation of [`USubscription`] in order to inform the local
/// USubscription service about newly subscribed and unsubscribed topics. It also needs a [`Notifier`]
/// for receiving notifications about subscription status updates from the local USubscription service.
/// Finally, it needs a [`UTransport`] for receiving events that have been published to subscribed topics.
///
/// During [startup](`Self::for_clients`) the subscriber uses the Notifier to register a generic [`UListener`]
/// for receiving notifications from the USubscription service. The listener maintains an in-memory mapping
/// of subscribed topics to corresponding subscription change handlers.
///
/// When a client [`subscribes to a topic`](Self::subscribe), the local USubscription service is informed
/// about the new subscription and a (client provided) subscription change handler is registered with the
/// listener. When a subscription change notification arrives from the USubscription service, the corresponding
/// handler is being looked up and invoked.
pub struct InMemorySubscriber {
    transport: Arc<dyn UTransport>,
    uri_provider: Arc<dyn LocalUriProvider>,
    usubscription: Arc<dyn USubscription>,
    notifier: Arc<dyn Notifier>,
    subscription_change_listener: Arc<SubscriptionChangeListener>,
}

impl InMemorySubscriber {
    /// Creates a new Subscriber for a given transport.
    ///
    /// The subscriber keeps track of subscription change handlers in memory only.
    /// This function uses the given transport to create an [`RpcClientUSubscription`] and a [`SimpleNotifier`]
    /// and then delegate to [`Self::for_clients`] to create the Subscriber.
    ///
    /// # Errors
    ///
    /// Returns an error if the Notifier cannot register a listener for notifications from the USubscription service.
    pub async fn new(
        transport: Arc<dyn UTransport>,
        uri_provider: Arc<dyn LocalUriProvider>,
    ) -> Result<Self, RegistrationError> {
        let rpc_client = InMemoryRpcClient::new(transport.clone(), uri_provider.clone())
            .await
            .map(Arc::new)?;
        let usubscription_client = Arc::new(RpcClientUSubscription::new(rpc_client));
        let notifier = Arc::new(SimpleNotifier::new(transport.clone(), uri_provider.clone()));
        Self::for_clients(transport, uri_provider, usubscription_client, notifier).await
    }

    /// Creates a new Subscriber for given clients.
    ///
    /// # Arguments
    ///
    /// * `transport` - The transport to use for registering the event listeners for subscribed topics.
    /// * `uri-provider` - The service to use for creating topic addresses.
    /// * `usubscription` - The client to use for interacting with the (local) USubscription service.
    /// * `notifier` - The client to use for registering the listener for subscription updates from USubscription.
    ///
    /// # Errors
    ///
    /// Returns an error if the Notifier cannot register a listener for notifications from the USubscription service.
    pub async fn for_clients(
        transport: Arc<dyn UTransport>,
        uri_provider: Arc<dyn LocalUriProvider>,
        usubscription: Arc<dyn USubscription>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, RegistrationError> {
        // register a generic listener for subscription updates
        // whenever a uE later tries to subscribe to a topic, it can provide an optional callback for
        // handling subscription updates for the topic it tries to subscribe to
        let subscription_change_listener = Arc::new(SubscriptionChangeListener {
            subscription_change_handlers: RwLock::new(HashMap::new()),
        });
        notifier
            .start_listening(
                &usubscription::usubscription_uri(usubscription::RESOURCE_ID_SUBSCRIPTION_CHANGE),
                subscription_change_listener.clone(),
            )
            .await?;
        Ok(InMemorySubscriber {
            transport,
            uri_provider,
            usubscription,
            notifier,
            subscription_change_listener,
        })
    }

    /// Stops this client.
    ///
    /// Clears all internal state and unregisters the listener for subscription updates from the USubscription service.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener could not be unregistered. In this case the internal state remains intact.
    pub async fn stop(&self) -> Result<(), RegistrationError> {
        self.notifier
            .stop_listening(
                &usubscription::usubscription_uri(usubscription::RESOURCE_ID_SUBSCRIPTION_CHANGE),
                self.subscription_change_listener.clone(),
            )
            .await
            .and_then(|_ok| self.subscription_change_listener.clear())
    }

    fn subscriber_info(&self) -> SubscriberInfo {
        SubscriberInfo {
            uri: Some(self.uri_provider.get_source_uri()).into(),
            ..Default::default()
        }
    }

    async fn invoke_subscribe(
        &self,
        topic: &UUri,
        subscription_change_handler: Option<Arc<dyn SubscriptionChangeHandler>>,
    ) -> Result<State, RegistrationError> {
        let subscription_request = SubscriptionRequest {
            subscriber: Some(self.subscriber_info()).into(),
            topic: Some(topic.to_owned()).into(),
            ..Default::default()
        };
        match self.usubscription.subscribe(subscription_request).await {
            Ok(response) => match response.status.state.enum_value() {
                Ok(state) if state == State::SUBSCRIBED || state == State::SUBSCRIBE_PENDING => {
                    if let Some(handler) = subscription_change_handler.clone() {
                        self.subscription_change_listener
                            .add_handler(topic.to_owned(), handler)?;
                    }
                    Ok(state)
                }
                _ => {
                    debug!(topic = %topic, "failed to subscribe to topic: {}", response.status.message);
                    Err(RegistrationError::Unknown(UStatus::fail_with_code(
                        crate::UCode::FAILED_PRECONDITION,
                        response.status.message.to_owned(),
                    )))
                }
            },
            Err(e) => {
                info!(topic = %topic, "error invoking USubscription service: {}", e);
                Err(RegistrationError::Unknown(UStatus::fail_with_code(
                    crate::UCode::INTERNAL,
                    "failed to invoke USubscription service",
                )))
            }
        }
    }

    async fn invoke_unsubscribe(&self, topic: &UUri) -> Result<(), RegistrationError> {
        let request = UnsubscribeRequest {
            subscriber: Some(self.subscriber_info()).into(),
            topic: Some(topic.to_owned()).into(),
            ..Default::default()
        };
        self.usubscription
            .unsubscribe(request)
            .await
            .map(|_| {
                let _ = self.subscription_change_listener.remove_handler(topic);
            })
            .map_err(|e| {
                info!(topic = %topic, "error invoking USubscription service: {}", e);
                RegistrationError::Unknown(UStatus::fail_with_code(
                    crate::UCode::INTERNAL,
                    "failed to invoke USubscription service",
                ))
            })
    }

    #[cfg(test)]
    fn add_subscription_change_handler(
        &self,
        topic: &UUri,
        subscription_change_handler: Arc<dyn SubscriptionChangeHandler>,
    ) -> Result<(), RegistrationError> {
        self.subscription_change_listener
            .add_handler(topic.to_owned(), subscription_change_handler)
    }

    #[cfg(test)]
    fn has_subscription_change_handler(&self, topic: &UUri) -> bool {
        self.subscription_change_listener.has_handler(topic)
    }
}

#[async_trait]
impl Subscriber for InMemorySubscriber {
    async fn subscribe(
        &self,
        topic_filter: &UUri,
        handler: Arc<dyn UListener>,
        subscription_change_handler: Option<Arc<dyn SubscriptionChangeHandler>>,
    ) -> Result<(), RegistrationError> {
        self.invoke_subscribe(topic_filter, subscription_change_handler)
            .await?;
        self.transport
            .register_listener(topic_filter, None, handler.clone())
            .await
            // When this fails, we have ended up in a situation where we
            // have successfully (logically) subscribed to the topic via the USubscriptio service
            // but we have not been able to register the listener with the local transport.
            // This means that events might start getting forwarded to the local authority which
            // are not being consumed. Apart from this inefficiency, this does not pose a real
            // problem and since we return an err, the client might be inclined to try
            // again and (eventually) succeed in registering the listener as well.
            .map_err(RegistrationError::from)
    }

    async fn unsubscribe(
        &self,
        topic: &UUri,
        listener: Arc<dyn UListener>,
    ) -> Result<(), RegistrationError> {
        self.invoke_unsubscribe(topic).await?;
        self.transport
            .unregister_listener(topic, None, listener)
            .await
            // When this fails, we have ended up in a situation where we
            // have successfully (logically) unsubscribed from the topic via the USubscriptio service
            // but we have not been able to unregister the listener from the local transport.
            // This means that events originating from entities connected to a different transport
            // may no longer get forwarded to the local transport, resulting in the (still registered)
            // listener not being invoked for these events. We therefore return an error which should
            // trigger the client to try again and (eventually) succeed in unregistering the listener as well.
            .map_err(RegistrationError::from)
    }
}
