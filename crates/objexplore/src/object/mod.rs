//! Object protocol for values entering the explorer
//!
//! Any Rust value becomes explorable by implementing [`Explorable`], a small
//! capability-check interface. Every probe has a default answering "this
//! capability is absent", so an implementation only overrides what its value
//! actually supports.

use derive_more::Display;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;

#[cfg(feature = "json")]
mod json;
mod value;

pub use value::{Namespace, NamespaceBuilder, Value};

/// Shared handle to an explored member value
///
/// Members are handed out as shared handles so the explorer can cache them
/// without copying or mutating the underlying object.
pub type ObjectRef = Rc<dyn Explorable>;

/// Getter/setter semantics attached to a member by its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Descriptor {
    /// Whether the member can also be assigned through the descriptor
    pub settable: bool,
}

/// The result of reading one member from an object
#[derive(Debug, Clone)]
pub struct Attribute {
    /// The member's current value
    pub value: ObjectRef,
    /// Present when the owner exposes the member through a descriptor
    pub descriptor: Option<Descriptor>,
}

impl Attribute {
    /// A plain stored attribute
    pub fn plain(value: ObjectRef) -> Self {
        Self {
            value,
            descriptor: None,
        }
    }

    /// An attribute computed by a descriptor
    pub fn property(value: ObjectRef, settable: bool) -> Self {
        Self {
            value,
            descriptor: Some(Descriptor { settable }),
        }
    }
}

/// Reading a member failed
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum AccessError {
    /// The name is not a member of the object
    #[display(fmt = "no member named `{}`", _0)]
    Missing(String),
    /// The member exists but reading it raised an error
    #[display(fmt = "{}", _0)]
    Raised(String),
}

impl std::error::Error for AccessError {}

/// Capability-check interface for explorable objects
///
/// # Read-only contract
///
/// Implementations must only *read* state. In particular, nothing in the
/// explorer ever invokes a callable value: previews of callables are built
/// from [`signature`](Explorable::signature) and
/// [`docstring`](Explorable::docstring) metadata alone. `get_member` may run
/// a getter (that is what a property is), but must not mutate the object.
pub trait Explorable: fmt::Debug {
    /// Name of the value's type, used as its type family
    fn type_name(&self) -> Cow<'_, str>;

    /// Every member name reachable through this object, own and inherited
    fn member_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// Read a member by name
    fn get_member(&self, name: &str) -> Result<Attribute, AccessError> {
        Err(AccessError::Missing(name.to_string()))
    }

    /// Whether the value can be called
    fn is_callable(&self) -> bool {
        false
    }

    /// Whether the value is a class object
    fn is_class(&self) -> bool {
        false
    }

    /// Whether the value is a module object
    fn is_module(&self) -> bool {
        false
    }

    /// Whether the value is a primitive scalar with nothing to explore
    fn is_scalar(&self) -> bool {
        false
    }

    /// Short human readable representation
    fn repr(&self) -> String {
        format!("<{} object>", self.type_name())
    }

    /// Complete representation for a full-screen view
    ///
    /// Defaults to [`repr`](Explorable::repr); containers override it to
    /// list every item.
    fn full_repr(&self) -> String {
        self.repr()
    }

    /// Documentation attached to the value
    fn docstring(&self) -> Option<String> {
        None
    }

    /// Call signature for callables
    fn signature(&self) -> Option<String> {
        None
    }

    /// Number of items for sized containers
    fn length(&self) -> Option<usize> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Opaque;

    impl Explorable for Opaque {
        fn type_name(&self) -> Cow<'_, str> {
            Cow::Borrowed("Opaque")
        }
    }

    #[test]
    fn test_default_capabilities_are_absent() {
        let obj = Opaque;
        assert!(obj.member_names().is_empty());
        assert!(!obj.is_callable());
        assert!(!obj.is_class());
        assert!(!obj.is_module());
        assert!(!obj.is_scalar());
        assert_eq!(obj.repr(), "<Opaque object>");
        assert_eq!(obj.docstring(), None);
        assert_eq!(obj.length(), None);
        assert_eq!(
            obj.get_member("x").unwrap_err(),
            AccessError::Missing("x".to_string())
        );
    }

    #[test]
    fn test_attribute_constructors() {
        let value: ObjectRef = Rc::new(Opaque);
        assert!(Attribute::plain(value.clone()).descriptor.is_none());
        assert_eq!(
            Attribute::property(value, true).descriptor,
            Some(Descriptor { settable: true })
        );
    }

    #[test]
    fn test_access_error_display() {
        assert_eq!(
            AccessError::Missing("x".into()).to_string(),
            "no member named `x`"
        );
        assert_eq!(AccessError::Raised("boom".into()).to_string(), "boom");
    }
}
