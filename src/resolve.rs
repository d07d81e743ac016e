//! Port-channel cross-reference resolution
//!
//! Runs after the bulk insert and works only from what is persisted:
//! 1. Index port-channel rows by the `name` of their stored record
//! 2. Scan Ethernet rows for a channel-group membership
//! 3. Point each member at its port-channel row in one batched update
//!
//! A membership naming a port-channel that was never loaded aborts the pass
//! before anything is written.

use std::collections::HashMap;
use crate::document::display_value;
use crate::row::Configuration;
use crate::storage::SqliteStore;
use crate::{Error, Result};

/// Record key holding an Ethernet interface's channel-group membership
pub const DEFAULT_CHANNEL_GROUP_KEY: &str = "Cisco-IOS-XE-ethernet:channel-group";

/// Field of the membership entry carrying the port-channel number
pub const CHANNEL_NUMBER_FIELD: &str = "number";

/// Resolves `port_channel_id` for Ethernet members of a port-channel
#[derive(Debug, Clone)]
pub struct CrossReferenceResolver {
    channel_group_key: String,
}

impl Default for CrossReferenceResolver {
    fn default() -> Self {
        Self::new(DEFAULT_CHANNEL_GROUP_KEY)
    }
}

impl CrossReferenceResolver {
    pub fn new(channel_group_key: impl Into<String>) -> Self {
        Self {
            channel_group_key: channel_group_key.into(),
        }
    }

    /// Resolve all memberships in the store
    pub fn resolve(&self, store: &mut SqliteStore) -> Result<ResolveStats> {
        let port_channels = store.find_port_channels()?;
        let ethernets = store.find_ethernets()?;

        let updates = self.collect_updates(&port_channels, &ethernets)?;

        let mut stats = ResolveStats {
            port_channels: port_channels.len(),
            ethernets: ethernets.len(),
            members: updates.len(),
            updated: 0,
        };

        if updates.is_empty() {
            tracing::info!("No ethernet interface configurations found");
            return Ok(stats);
        }

        stats.updated = store.update_port_channel_ids(&updates)?;
        tracing::info!(
            "Linked {} ethernet interfaces to {} port-channels",
            stats.updated,
            stats.port_channels
        );
        Ok(stats)
    }

    /// Build `(port_channel_id, ethernet_id)` pairs.
    ///
    /// Port-channels sharing a record name resolve to the last one listed.
    pub fn collect_updates(
        &self,
        port_channels: &[Configuration],
        ethernets: &[Configuration],
    ) -> Result<Vec<(i64, i64)>> {
        let mut channel_ids: HashMap<String, i64> = HashMap::new();
        for port_channel in port_channels {
            match port_channel.config_name() {
                Some(name) => {
                    channel_ids.insert(name, port_channel.id);
                }
                None => tracing::warn!("Port-channel row {} has no record name", port_channel.name),
            }
        }

        let mut updates = Vec::new();
        for ethernet in ethernets {
            let Some(number) = self.channel_group_number(ethernet)? else {
                continue;
            };

            let port_channel_id = channel_ids.get(&number).copied().ok_or_else(|| {
                Error::UnresolvedChannelGroup {
                    interface: ethernet.name.clone(),
                    number: number.clone(),
                }
            })?;

            tracing::debug!("{} -> Port-channel{} (id {})", ethernet.name, number, port_channel_id);
            updates.push((port_channel_id, ethernet.id));
        }

        Ok(updates)
    }

    /// Channel-group number declared by `ethernet`, in string form
    fn channel_group_number(&self, ethernet: &Configuration) -> Result<Option<String>> {
        let Some(membership) = ethernet.config.get(&self.channel_group_key) else {
            return Ok(None);
        };

        membership
            .get(CHANNEL_NUMBER_FIELD)
            .map(|number| Some(display_value(number)))
            .ok_or_else(|| Error::MissingField {
                interface: ethernet.name.clone(),
                field: format!("{}.{}", self.channel_group_key, CHANNEL_NUMBER_FIELD),
            })
    }
}

/// Statistics from a resolution pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ResolveStats {
    pub port_channels: usize,
    pub ethernets: usize,
    /// Ethernet rows declaring a channel-group membership
    pub members: usize,
    pub updated: usize,
}
