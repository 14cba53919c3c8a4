//! The probe/load capability consumed by the backfiller.

use async_trait::async_trait;
use tickfill_types::{ResourceAddress, TradeTick};
use tracing::{debug, warn};

use crate::{ArchiveClient, decompress_gzip, parse_trades, url::resource_url};

/// Access to the remote trade archive.
///
/// Neither operation fails: every failure mode (missing resource, network
/// error, malformed data) resolves to `false` or `None`. Missing days are a
/// normal condition, since the exchange does not publish every calendar day.
#[async_trait]
pub trait ArchiveSource: Send + Sync {
    /// Returns true if the resource exists.
    async fn probe(&self, address: &ResourceAddress) -> bool;

    /// Loads and normalizes one day archive, or `None` if unavailable.
    async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>>;
}

#[async_trait]
impl<S: ArchiveSource + ?Sized> ArchiveSource for &S {
    async fn probe(&self, address: &ResourceAddress) -> bool {
        (**self).probe(address).await
    }

    async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>> {
        (**self).load(address).await
    }
}

/// Archive source backed by the public HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: ArchiveClient,
}

impl HttpSource {
    /// Creates a source that issues requests through `client`.
    #[must_use]
    pub const fn new(client: ArchiveClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &ArchiveClient {
        &self.client
    }

    fn url(&self, address: &ResourceAddress) -> String {
        resource_url(&self.client.config().base_url, address)
    }
}

#[async_trait]
impl ArchiveSource for HttpSource {
    async fn probe(&self, address: &ResourceAddress) -> bool {
        let url = self.url(address);
        debug!(%url, "checking URL");
        self.client.exists(&url).await
    }

    async fn load(&self, address: &ResourceAddress) -> Option<Vec<TradeTick>> {
        let url = self.url(address);
        debug!(%url, "accessing URL");

        let compressed = match self.client.download(&url).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!(%url, "no archive published");
                return None;
            }
            Err(e) => {
                debug!(%url, error = %e, "download failed");
                return None;
            }
        };

        let decompressed =
            match tokio::task::spawn_blocking(move || decompress_gzip(&compressed)).await {
                Ok(Ok(data)) => data,
                Ok(Err(e)) => {
                    debug!(%url, error = %e, "decompression failed");
                    return None;
                }
                Err(e) => {
                    debug!(%url, error = %e, "decompression task failed");
                    return None;
                }
            };

        match parse_trades(&decompressed).await {
            Ok(day) => {
                if day.unrecognized_sides > 0 {
                    warn!(
                        %url,
                        count = day.unrecognized_sides,
                        "side values other than BUY/SELL were treated as sells"
                    );
                }
                Some(day.ticks)
            }
            Err(e) => {
                debug!(%url, error = %e, "malformed archive");
                None
            }
        }
    }
}
