//! The capability shared by everything that renders as a HAL resource.

use serde_json::Value;

/// A value that serializes into a HAL representation.
///
/// [`Document`](crate::Document) and [`Embedded`](crate::Embedded)
/// implement it. Web layers check for this capability to decide whether a
/// handler's return value gets the `application/hal+json` treatment.
pub trait Resource {
    /// The JSON-compatible tree of the resource.
    fn to_mapping(&self) -> Value;

    /// Compact JSON text of [`to_mapping`](Resource::to_mapping), keys in
    /// insertion order.
    fn to_json(&self) -> String {
        self.to_mapping().to_string()
    }
}

impl<R: Resource + ?Sized> Resource for &R {
    fn to_mapping(&self) -> Value {
        (**self).to_mapping()
    }

    fn to_json(&self) -> String {
        (**self).to_json()
    }
}

impl<R: Resource + ?Sized> Resource for Box<R> {
    fn to_mapping(&self) -> Value {
        (**self).to_mapping()
    }

    fn to_json(&self) -> String {
        (**self).to_json()
    }
}
