//! XEP-0203: Delayed Delivery
//!
//! Carries the original send time of a stanza that was delivered late
//! (offline storage, MUC history). Timestamps follow XEP-0082 (RFC 3339,
//! UTC with seconds precision).

use std::any::Any;

use chrono::{DateTime, SecondsFormat, Utc};
use jid::Jid;
use minidom::Element;

use crate::error::CodecError;
use crate::extension::ExtensionElement;
use crate::key::{ns, QualifiedKey};
use crate::provider::{ExtensionProvider, ParseContext};

/// Local element name.
pub const ELEMENT_DELAY: &str = "delay";

/// XEP-0203 delayed delivery marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delay {
    /// Entity that delayed the stanza
    pub from: Option<Jid>,
    /// Original send time
    pub stamp: DateTime<Utc>,
}

impl Delay {
    /// Create a delay marker for the given timestamp.
    pub fn new(stamp: DateTime<Utc>) -> Self {
        Self { from: None, stamp }
    }

    /// Set the delaying entity.
    pub fn with_from(mut self, from: Jid) -> Self {
        self.from = Some(from);
        self
    }

    /// The key delays are dispatched under.
    pub fn qualified_key() -> QualifiedKey {
        QualifiedKey::new(ns::DELAY, ELEMENT_DELAY).expect("delay key constants are valid")
    }
}

impl ExtensionElement for Delay {
    fn key(&self) -> QualifiedKey {
        Self::qualified_key()
    }

    fn attributes(&self) -> Vec<(String, String)> {
        let mut attrs = Vec::with_capacity(2);
        if let Some(ref from) = self.from {
            attrs.push(("from".to_string(), from.to_string()));
        }
        attrs.push((
            "stamp".to_string(),
            self.stamp.to_rfc3339_opts(SecondsFormat::Secs, true),
        ));
        attrs
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Provider for delay elements.
pub struct DelayProvider;

impl ExtensionProvider for DelayProvider {
    fn key(&self) -> QualifiedKey {
        Delay::qualified_key()
    }

    fn parse(
        &self,
        element: &Element,
        _ctx: &ParseContext<'_>,
    ) -> Result<Box<dyn ExtensionElement>, CodecError> {
        let stamp = element
            .attr("stamp")
            .ok_or_else(|| CodecError::provider(self.key(), "missing 'stamp' attribute"))?;
        let stamp = DateTime::parse_from_rfc3339(stamp)
            .map_err(|e| CodecError::provider(self.key(), format!("bad 'stamp': {}", e)))?
            .with_timezone(&Utc);

        let from = match element.attr("from") {
            Some(from) => Some(from.parse::<Jid>().map_err(|e| {
                CodecError::provider(self.key(), format!("bad 'from': {}", e))
            })?),
            None => None,
        };

        Ok(Box::new(Delay { from, stamp }))
    }
}
