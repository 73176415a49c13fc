//! Player selection
//!
//! Maps an allow-listed extension to exactly one player by scanning the
//! registry in priority order.

use crate::registry::{PlayerDescriptor, PlayerRegistry};

/// First player in `registry` that handles `extension`
///
/// `extension` must already be lowercase with a leading dot. Returns `None`
/// when no registered player handles it.
pub fn select<'a>(registry: &'a PlayerRegistry, extension: &str) -> Option<&'a PlayerDescriptor> {
    registry.players().iter().find(|player| player.supports(extension))
}
