/// An item payload the UI may offer a delete affordance for (e.g. swipe-to-delete).
pub trait Deletable {
    /// Whether deletion is currently allowed for this item.
    fn can_delete(&self) -> bool {
        true
    }
}

/// An item payload that can receive input focus.
pub trait Focusable {
    /// Whether the item should be offered focus when its section becomes active.
    fn wants_focus(&self) -> bool {
        false
    }
}

/// Optional behaviors an item payload may expose to the UI shim.
///
/// The accessors replace runtime type-checked casts: a payload opts into a capability by
/// overriding the corresponding method to return `Some(self)`. Callers branch on the returned
/// trait object instead of downcasting.
pub trait ItemCapabilities {
    fn as_deletable(&self) -> Option<&dyn Deletable> {
        None
    }

    fn as_focusable(&self) -> Option<&dyn Focusable> {
        None
    }
}
