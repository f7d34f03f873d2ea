use async_trait::async_trait;

use crate::error::StripError;
use crate::network::range::AddressRange;

/// Where authoritative CDN ranges come from.
///
/// Implementations may retry internally; callers treat an `Err` as final.
#[async_trait]
pub trait RangeSource: Send + Sync {
    async fn acquire(&self) -> Result<Vec<AddressRange>, StripError>;
}
