//! Calendar colours per user.
use std::collections::HashMap;

/// Colours handed out to users, taken from the end of the array first.
pub const PALETTE: [&str; 36] = [
    "#555555", "#cccccc", "#56a83c", "#a73111", "#10845a", "#003366", "#511000", "#0000ff",
    "#336699", "#918010", "#9999ff", "#99ccff", "#cc0000", "#6699cc", "#123456", "#906090",
    "#ff6600", "#ff8d8d", "#ff9900", "#82cccd", "#3b5998", "#0066cc", "#00dd00", "#00cbcd",
    "#9999cc", "#333366", "#006600", "#9c00ff", "#d900dc", "#dc8c00", "#4cc6ff", "#9c4cff",
    "#bf5b5b", "#bfb95b", "#9dbf5b", "#640005",
];

/// Colour for every user once the palette has run out, and for users without an assignment.
pub const FALLBACK_COLOR: &str = "#cccccc";

/// Colour assignment for one request. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorMap {
    /// User id to colour.
    colors: HashMap<i64, &'static str>,
}

impl ColorMap {
    /// Assign colours to users in the given order.
    ///
    /// The same ordered ids always produce the same assignment.
    #[must_use]
    pub fn assign(user_ids: impl IntoIterator<Item = i64>) -> Self {
        let mut remaining = PALETTE.to_vec();
        let colors = user_ids
            .into_iter()
            .map(|user_id| (user_id, remaining.pop().unwrap_or(FALLBACK_COLOR)))
            .collect();
        Self { colors }
    }

    /// Colour of a user.
    #[must_use]
    pub fn color_for(&self, user_id: i64) -> &'static str {
        self.colors.get(&user_id).copied().unwrap_or(FALLBACK_COLOR)
    }
}
