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

use std::sync::Arc;

use async_trait::async_trait;

use crate::{UMessage, UStatus, UUri};

/// A handler for messages that have been received via a [`UTransport`].
///
/// Implementations are registered with a transport for a given source and (optional) sink filter
/// and are invoked by the transport for each message matching those filters.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait UListener: Send + Sync {
    /// Performs some action on receipt of a message.
    ///
    /// # Arguments
    ///
    /// * `msg` - The message that has been received.
    async fn on_receive(&self, msg: UMessage);
}

/// A wrapper around an [`Arc<dyn UListener>`] that allows listeners to be compared for equality
/// and used as keys in hash-based collections, based on pointer identity.
#[derive(Clone)]
pub struct ComparableListener {
    listener: Arc<dyn UListener>,
}

impl ComparableListener {
    /// Creates a new wrapper for a given listener.
    pub fn new(listener: Arc<dyn UListener>) -> Self {
        ComparableListener { listener }
    }

    /// Invokes the wrapped listener's [`UListener::on_receive`] function.
    pub async fn on_receive(&self, msg: UMessage) {
        self.listener.on_receive(msg).await
    }
}

impl PartialEq for ComparableListener {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.listener, &other.listener)
    }
}

impl Eq for ComparableListener {}

impl std::hash::Hash for ComparableListener {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.listener), state)
    }
}

impl std::fmt::Debug for ComparableListener {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComparableListener")
            .field("listener", &Arc::as_ptr(&self.listener))
            .finish()
    }
}

/// A means for uEntities to determine their own identity within the uProtocol landscape.
///
/// Implementations typically wrap the configuration that a given [`UTransport`] has been created
/// with (authority name, entity ID and version).
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
pub trait LocalUriProvider: Send + Sync {
    /// Gets the authority that this uEntity is reachable at.
    fn get_authority(&self) -> String;

    /// Gets the resolved URI that this uEntity can be reached at for a given resource.
    fn get_resource_uri(&self, resource_id: u16) -> UUri;

    /// Gets the resolved URI that represents this uEntity itself, i.e. the URI having
    /// resource ID `0x0000`.
    fn get_source_uri(&self) -> UUri;
}

/// A [`LocalUriProvider`] based on a fixed authority name, entity ID and entity version.
#[derive(Debug, Clone)]
pub struct StaticUriProvider {
    authority_name: String,
    entity_id: u32,
    entity_version: u8,
}

impl StaticUriProvider {
    /// Creates a new provider for a fixed set of identifying properties.
    pub fn new(authority_name: &str, entity_id: u32, entity_version: u8) -> Self {
        StaticUriProvider {
            authority_name: authority_name.to_string(),
            entity_id,
            entity_version,
        }
    }
}

impl LocalUriProvider for StaticUriProvider {
    fn get_authority(&self) -> String {
        self.authority_name.clone()
    }

    fn get_resource_uri(&self, resource_id: u16) -> UUri {
        UUri::try_from_parts(
            &self.authority_name,
            self.entity_id,
            self.entity_version,
            resource_id,
        )
        .expect("authority name should have been validated already")
    }

    fn get_source_uri(&self) -> UUri {
        self.get_resource_uri(0x0000)
    }
}

/// `UTransport` is the uP-L1 interface that provides a common API for uE developers to send and receive messages.
///
/// Implementations of `UTransport` contain the details for connecting to the underlying transport technology and
/// sending `UMessage` using the configured technology. For more information, please refer to
/// [uProtocol Specification](https://github.com/eclipse-uprotocol/uprotocol-spec/blob/main/up-l1/README.adoc).
///
/// Implementors only need to provide the `do_send`, `do_register_listener` and `do_unregister_listener`
/// functions. The `send`, `register_listener` and `unregister_listener` functions that client code invokes
/// perform common validation of the given parameters before delegating to the corresponding `do_*` function.
#[cfg_attr(any(test, feature = "test-util"), mockall::automock)]
#[async_trait]
pub trait UTransport: Send + Sync {
    /// Sends a message using this transport's message exchange mechanism.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to send. The `type`, `source` and `sink` properties of the
    ///   [`crate::UAttributes`] contained in the message determine the addressing semantics.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be sent.
    async fn send(&self, message: UMessage) -> Result<(), UStatus> {
        self.do_send(message).await
    }

    /// Sends a message using this transport's message exchange mechanism.
    ///
    /// This function is invoked by the default implementation of [`Self::send`] after having
    /// performed common validation of the message to send. Implementations should therefore not
    /// repeat this validation.
    async fn do_send(&self, message: UMessage) -> Result<(), UStatus>;

    /// Registers a listener to be called for messages matching the given source and sink filters.
    ///
    /// # Arguments
    ///
    /// * `source_filter` - The [pattern](`crate::UUri::matches`) defining the origin of the messages
    ///   that the listener should be invoked for.
    /// * `sink_filter` - The (optional) [pattern](`crate::UUri::matches`) defining the destination of
    ///   the messages that the listener should be invoked for.
    /// * `listener` - The listener to invoke.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener could not be registered.
    async fn register_listener(
        &self,
        source_filter: &UUri,
        sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus> {
        self.do_register_listener(source_filter, sink_filter, listener)
            .await
    }

    /// Registers a listener to be called for messages matching the given source and sink filters.
    ///
    /// This function is invoked by the default implementation of [`Self::register_listener`] after
    /// having performed common validation of the given filters. Implementations should therefore
    /// not repeat this validation.
    async fn do_register_listener(
        &self,
        source_filter: &UUri,
        sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus>;

    /// Unregisters a listener for a given source and sink filter.
    ///
    /// Messages matching the filters will no longer be processed by this listener.
    ///
    /// # Arguments
    ///
    /// * `source_filter` - The origin pattern that the listener had been registered for.
    /// * `sink_filter` - The destination pattern that the listener had been registered for, if any.
    /// * `listener` - The listener to unregister.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener could not be unregistered, for example if no such listener
    /// has been registered for the given filters.
    async fn unregister_listener(
        &self,
        source_filter: &UUri,
        sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus> {
        self.do_unregister_listener(source_filter, sink_filter, listener)
            .await
    }

    /// Unregisters a listener for a given source and sink filter.
    ///
    /// This function is invoked by the default implementation of [`Self::unregister_listener`] after
    /// having performed common validation of the given filters. Implementations should therefore
    /// not repeat this validation.
    async fn do_unregister_listener(
        &self,
        source_filter: &UUri,
        sink_filter: Option<&UUri>,
        listener: Arc<dyn UListener>,
    ) -> Result<(), UStatus>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingListener {
        count: AtomicUsize,
    }

    #[async_trait]
    impl UListener for CountingListener {
        async fn on_receive(&self, _msg: UMessage) {
            self.count.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn comparable_listener_equality_is_based_on_identity() {
        let listener: Arc<dyn UListener> = Arc::new(CountingListener {
            count: AtomicUsize::new(0),
        });
        let a = ComparableListener::new(listener.clone());
        let b = ComparableListener::new(listener);
        let c = ComparableListener::new(Arc::new(CountingListener {
            count: AtomicUsize::new(0),
        }));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn static_uri_provider_resolves_source_and_resource_uris() {
        let provider = StaticUriProvider::new("my-vehicle", 0x1001, 0x02);
        assert_eq!(provider.get_authority(), "my-vehicle");

        let source = provider.get_source_uri();
        assert_eq!(source.resource_id, 0x0000);

        let resource = provider.get_resource_uri(0x8001);
        assert_eq!(resource.resource_id, 0x8001);
    }
}
