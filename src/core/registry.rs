use crate::core::error::BoxError;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The Alias for serde_json::Value, the default registry payload
pub type Payload = serde_json::Value;

type Callback<P> = Arc<dyn Fn(&P) -> Result<(), BoxError> + Send + Sync>;

/// Identifies one subscription so it can be removed again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubscriptionId(Uuid);

impl fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

struct Subscriber<P> {
    id: SubscriptionId,
    callback: Callback<P>,
}

impl<P> Clone for Subscriber<P> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            callback: Arc::clone(&self.callback),
        }
    }
}

/// A subscriber that returned an error during a publish.
#[derive(Debug)]
pub struct SubscriberFailure {
    pub subscription: SubscriptionId,
    pub error: BoxError,
}

/// What a publish did.
#[derive(Debug)]
pub enum Delivery {
    /// Nobody listens on the topic; nothing ran.
    NoSubscribers,
    /// Every subscriber ran once, in order. `failures` lists the ones that
    /// returned an error; the rest of the topic still ran.
    Delivered {
        invoked: usize,
        failures: Vec<SubscriberFailure>,
    },
}

impl Delivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Delivery::Delivered { .. })
    }

    pub fn invoked(&self) -> usize {
        match self {
            Delivery::NoSubscribers => 0,
            Delivery::Delivered { invoked, .. } => *invoked,
        }
    }

    /// Delivered with no subscriber failing.
    pub fn is_clean(&self) -> bool {
        matches!(self, Delivery::Delivered { failures, .. } if failures.is_empty())
    }
}

/// Topic-keyed publish/subscribe registry.
///
/// Each registry is its own world: subscribers of one instance never hear
/// publishes on another. Callbacks run synchronously on the publishing thread.
pub struct TopicRegistry<P = Payload> {
    topics: HashMap<String, Vec<Subscriber<P>>>,
}

impl<P> Clone for TopicRegistry<P> {
    fn clone(&self) -> Self {
        Self {
            topics: self.topics.clone(),
        }
    }
}

impl<P: 'static> Default for TopicRegistry<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: 'static> TopicRegistry<P> {
    pub fn new() -> Self {
        TopicRegistry {
            topics: HashMap::new(),
        }
    }

    /// Appends `callback` to `topic`, creating the topic on first use.
    pub fn subscribe<F>(&mut self, topic: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&P) + Send + Sync + 'static,
    {
        self.insert(
            topic,
            Arc::new(move |payload: &P| {
                callback(payload);
                Ok::<(), BoxError>(())
            }),
        )
    }

    /// Like [`subscribe`](TopicRegistry::subscribe) for callbacks that can fail.
    pub fn try_subscribe<F>(&mut self, topic: &str, callback: F) -> SubscriptionId
    where
        F: Fn(&P) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.insert(topic, Arc::new(callback))
    }

    fn insert(&mut self, topic: &str, callback: Callback<P>) -> SubscriptionId {
        let id = SubscriptionId(Uuid::new_v4());
        self.topics
            .entry(topic.to_string())
            .or_default()
            .push(Subscriber { id, callback });
        log::debug!("Subscribed {} to '{}'", id, topic);
        id
    }

    /// Removes one subscription. Returns whether it existed.
    ///
    /// A topic whose last subscriber leaves is removed as well.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let mut emptied = None;
        let mut found = false;
        for (topic, subscribers) in self.topics.iter_mut() {
            if let Some(pos) = subscribers.iter().position(|s| s.id == id) {
                subscribers.remove(pos);
                found = true;
                if subscribers.is_empty() {
                    emptied = Some(topic.clone());
                }
                break;
            }
        }
        if let Some(topic) = emptied {
            self.topics.remove(&topic);
        }
        found
    }

    /// Runs every subscriber of `topic`, in subscription order, with `payload`.
    ///
    /// Publishing to a topic nobody subscribed to is a no-op.
    pub fn publish(&self, topic: &str, payload: &P) -> Delivery {
        let subscribers = match self.topics.get(topic) {
            Some(subscribers) if !subscribers.is_empty() => subscribers,
            _ => {
                log::debug!("Publish to '{}' had no subscribers", topic);
                return Delivery::NoSubscribers;
            }
        };

        let mut failures = Vec::new();
        for subscriber in subscribers {
            if let Err(error) = (subscriber.callback)(payload) {
                log::warn!(
                    "Subscriber {} on '{}' failed: {}",
                    subscriber.id,
                    topic,
                    error
                );
                failures.push(SubscriberFailure {
                    subscription: subscriber.id,
                    error,
                });
            }
        }
        log::debug!("Published to '{}': {} subscriber(s)", topic, subscribers.len());

        Delivery::Delivered {
            invoked: subscribers.len(),
            failures,
        }
    }

    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.topics.get(topic).map_or(0, Vec::len)
    }

    /// Topics that currently have subscribers, sorted.
    pub fn topics(&self) -> Vec<&str> {
        let mut topics: Vec<&str> = self.topics.keys().map(String::as_str).collect();
        topics.sort_unstable();
        topics
    }

    /// Drops every subscription.
    pub fn clear(&mut self) {
        self.topics.clear();
    }
}
