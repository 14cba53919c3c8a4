//! Trade archive URL construction.

use tickfill_types::ResourceAddress;

/// Base URL of the public trade archive.
pub const BASE_URL: &str = "https://api.coin.z.com/data/trades";

/// Builds the URL for an archive resource under `base`.
///
/// URL formats:
/// - year: `{base}/{MARKET}/{YEAR}/`
/// - month: `{base}/{MARKET}/{YEAR}/{MONTH}/`
/// - day: `{base}/{MARKET}/{YEAR}/{MONTH}/{YEAR}{MONTH}{DAY}_{MARKET}.csv.gz`
///
/// Months and days are zero-padded to two digits.
///
/// # Example
///
/// ```
/// use tickfill_fetch::url::{BASE_URL, resource_url};
/// use tickfill_types::ResourceAddress;
///
/// let url = resource_url(BASE_URL, &ResourceAddress::day("BTC", 2021, 4, 5));
/// assert_eq!(url, "https://api.coin.z.com/data/trades/BTC/2021/04/20210405_BTC.csv.gz");
/// ```
#[must_use]
pub fn resource_url(base: &str, address: &ResourceAddress) -> String {
    format!("{}/{}", base.trim_end_matches('/'), address.path())
}
