//! A small dynamic object model
//!
//! `Value` models the kinds of objects an explorer meets in a dynamic
//! runtime (modules, classes, instances, functions, containers and scalars)
//! so that object graphs can be assembled from plain Rust code.

use crate::object::{AccessError, Attribute, Explorable, ObjectRef};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Longest representation built for containers before eliding the rest
const CONTAINER_REPR_LIMIT: usize = 512;

/// How a namespace stores one member
#[derive(Debug, Clone)]
enum Slot {
    Plain(ObjectRef),
    Property { value: ObjectRef, settable: bool },
    /// Reading this member fails with the given message
    Broken(String),
}

/// Named members of a module, class or instance
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    name: String,
    doc: Option<String>,
    slots: BTreeMap<String, Slot>,
}

impl Namespace {
    /// The namespace's own name (class name for instances)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of members stored directly in the namespace
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no members are stored
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn lookup(&self, name: &str) -> Result<Attribute, AccessError> {
        match self.slots.get(name) {
            Some(Slot::Plain(value)) => Ok(Attribute::plain(value.clone())),
            Some(Slot::Property { value, settable }) => {
                Ok(Attribute::property(value.clone(), *settable))
            }
            Some(Slot::Broken(message)) => Err(AccessError::Raised(message.clone())),
            None => Err(AccessError::Missing(name.to_string())),
        }
    }
}

/// A dynamically typed value
#[derive(Debug, Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ObjectRef>),
    Map(BTreeMap<String, ObjectRef>),
    Module(Namespace),
    Class(Namespace),
    Instance(Namespace),
    Function {
        name: String,
        signature: String,
        doc: Option<String>,
    },
}

impl Value {
    /// Start building a module
    pub fn module(name: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder::new(NamespaceKind::Module, name)
    }

    /// Start building a class
    pub fn class(name: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder::new(NamespaceKind::Class, name)
    }

    /// Start building an instance of the named class
    pub fn instance(class_name: impl Into<String>) -> NamespaceBuilder {
        NamespaceBuilder::new(NamespaceKind::Instance, class_name)
    }

    /// A function with the given parameter list, e.g. `"(x, y)"`
    pub fn function(name: impl Into<String>, signature: impl Into<String>) -> Self {
        Value::Function {
            name: name.into(),
            signature: signature.into(),
            doc: None,
        }
    }

    /// A documented function
    pub fn function_with_doc(
        name: impl Into<String>,
        signature: impl Into<String>,
        doc: impl Into<String>,
    ) -> Self {
        Value::Function {
            name: name.into(),
            signature: signature.into(),
            doc: Some(doc.into()),
        }
    }

    /// A string value
    pub fn str(s: impl Into<String>) -> Self {
        Value::Str(s.into())
    }

    /// A list of values
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().map(Value::into_ref).collect())
    }

    /// A string-keyed mapping
    pub fn map<K: Into<String>>(entries: impl IntoIterator<Item = (K, Value)>) -> Self {
        Value::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into_ref()))
                .collect(),
        )
    }

    /// Wrap the value in a shared handle
    pub fn into_ref(self) -> ObjectRef {
        Rc::new(self)
    }

    fn namespace(&self) -> Option<&Namespace> {
        match self {
            Value::Module(ns) | Value::Class(ns) | Value::Instance(ns) => Some(ns),
            _ => None,
        }
    }

    /// Items joined up to `limit` bytes; nested values use their short repr
    fn container_repr(&self, limit: Option<usize>) -> String {
        match self {
            Value::List(items) => join_reprs(items.iter().map(|v| v.repr()), "[", "]", limit),
            Value::Map(entries) => join_reprs(
                entries.iter().map(|(k, v)| format!("{k:?}: {}", v.repr())),
                "{",
                "}",
                limit,
            ),
            _ => self.repr(),
        }
    }

    /// Synthesized dunder members for namespaces and functions
    fn dunder(&self, name: &str) -> Option<Value> {
        let (own_name, doc) = match self {
            Value::Module(ns) | Value::Class(ns) => (ns.name.as_str(), ns.doc.as_ref()),
            Value::Function { name, doc, .. } => (name.as_str(), doc.as_ref()),
            _ => return None,
        };
        match name {
            "__name__" => Some(Value::str(own_name)),
            "__doc__" => Some(doc.map(Value::str).unwrap_or(Value::None)),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

fn item_name(index: usize) -> String {
    format!("[{index}]")
}

fn key_name(key: &str) -> String {
    format!("[{key:?}]")
}

/// Index named by an item name such as `[3]`
fn parse_item_name(name: &str) -> Option<usize> {
    let digits = name.strip_prefix('[')?.strip_suffix(']')?;
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

/// Find the entry whose key name is `name`
///
/// Keys without escapes appear verbatim between the quotes and are looked
/// up directly; only keys whose names contain escapes fall back to a scan.
fn find_key<'m>(
    entries: &'m BTreeMap<String, ObjectRef>,
    name: &str,
) -> Option<&'m ObjectRef> {
    let quoted = name.strip_prefix('[')?.strip_suffix(']')?;
    let inner = quoted.strip_prefix('"')?.strip_suffix('"')?;
    if !inner.contains('\\') {
        return entries.get(inner).filter(|_| key_name(inner) == name);
    }
    entries
        .iter()
        .find(|(k, _)| key_name(k) == name)
        .map(|(_, v)| v)
}

fn join_reprs(
    items: impl Iterator<Item = String>,
    open: &str,
    close: &str,
    limit: Option<usize>,
) -> String {
    let mut out = String::from(open);
    for (i, item) in items.enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        if limit.is_some_and(|limit| out.len() + item.len() > limit) {
            out.push_str("...");
            break;
        }
        out.push_str(&item);
    }
    out.push_str(close);
    out
}

impl Explorable for Value {
    fn type_name(&self) -> Cow<'_, str> {
        match self {
            Value::None => Cow::Borrowed("NoneType"),
            Value::Bool(_) => Cow::Borrowed("bool"),
            Value::Int(_) => Cow::Borrowed("int"),
            Value::Float(_) => Cow::Borrowed("float"),
            Value::Str(_) => Cow::Borrowed("str"),
            Value::List(_) => Cow::Borrowed("list"),
            Value::Map(_) => Cow::Borrowed("dict"),
            Value::Module(_) => Cow::Borrowed("module"),
            Value::Class(_) => Cow::Borrowed("type"),
            Value::Instance(ns) => Cow::Borrowed(ns.name.as_str()),
            Value::Function { .. } => Cow::Borrowed("function"),
        }
    }

    fn member_names(&self) -> Vec<String> {
        match self {
            Value::List(items) => (0..items.len()).map(item_name).collect(),
            Value::Map(entries) => entries.keys().map(|k| key_name(k)).collect(),
            Value::Module(ns) | Value::Class(ns) => ns
                .slots
                .keys()
                .cloned()
                .chain(["__doc__".to_string(), "__name__".to_string()])
                .collect(),
            Value::Instance(ns) => ns.slots.keys().cloned().collect(),
            Value::Function { .. } => vec!["__doc__".to_string(), "__name__".to_string()],
            _ => Vec::new(),
        }
    }

    fn get_member(&self, name: &str) -> Result<Attribute, AccessError> {
        match self {
            Value::List(items) => parse_item_name(name)
                .and_then(|i| items.get(i))
                .map(|v| Attribute::plain(v.clone()))
                .ok_or_else(|| AccessError::Missing(name.to_string())),
            Value::Map(entries) => find_key(entries, name)
                .map(|v| Attribute::plain(v.clone()))
                .ok_or_else(|| AccessError::Missing(name.to_string())),
            _ => {
                if let Some(ns) = self.namespace() {
                    match ns.lookup(name) {
                        Err(AccessError::Missing(_)) => {}
                        found => return found,
                    }
                }
                self.dunder(name)
                    .map(|v| Attribute::plain(v.into_ref()))
                    .ok_or_else(|| AccessError::Missing(name.to_string()))
            }
        }
    }

    fn is_callable(&self) -> bool {
        matches!(self, Value::Function { .. })
    }

    fn is_class(&self) -> bool {
        matches!(self, Value::Class(_))
    }

    fn is_module(&self) -> bool {
        matches!(self, Value::Module(_))
    }

    fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::None | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::Str(_)
        )
    }

    fn repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format!("{n:?}"),
            Value::Str(s) => format!("{s:?}"),
            Value::List(_) | Value::Map(_) => self.container_repr(Some(CONTAINER_REPR_LIMIT)),
            Value::Module(ns) => format!("<module '{}'>", ns.name),
            Value::Class(ns) => format!("<class '{}'>", ns.name),
            Value::Instance(ns) => format!("<{} object>", ns.name),
            Value::Function {
                name, signature, ..
            } => format!("<function {name}{signature}>"),
        }
    }

    fn full_repr(&self) -> String {
        match self {
            Value::List(_) | Value::Map(_) => self.container_repr(None),
            _ => self.repr(),
        }
    }

    fn docstring(&self) -> Option<String> {
        match self {
            Value::Function { doc, .. } => doc.clone(),
            _ => self.namespace().and_then(|ns| ns.doc.clone()),
        }
    }

    fn signature(&self) -> Option<String> {
        match self {
            Value::Function {
                name, signature, ..
            } => Some(format!("{name}{signature}")),
            _ => None,
        }
    }

    fn length(&self) -> Option<usize> {
        match self {
            Value::Str(s) => Some(s.chars().count()),
            Value::List(items) => Some(items.len()),
            Value::Map(entries) => Some(entries.len()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NamespaceKind {
    Module,
    Class,
    Instance,
}

/// Builder for modules, classes and instances
#[derive(Debug, Clone)]
pub struct NamespaceBuilder {
    kind: NamespaceKind,
    ns: Namespace,
}

impl NamespaceBuilder {
    fn new(kind: NamespaceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            ns: Namespace {
                name: name.into(),
                ..Namespace::default()
            },
        }
    }

    /// Attach documentation
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.ns.doc = Some(doc.into());
        self
    }

    /// Add a stored attribute
    pub fn attr(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attr_ref(name, value.into().into_ref())
    }

    /// Add a stored attribute sharing an existing handle
    pub fn attr_ref(mut self, name: impl Into<String>, value: ObjectRef) -> Self {
        self.ns.slots.insert(name.into(), Slot::Plain(value));
        self
    }

    /// Add a descriptor-backed attribute whose getter yields `value`
    pub fn property(
        mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
        settable: bool,
    ) -> Self {
        self.ns.slots.insert(
            name.into(),
            Slot::Property {
                value: value.into().into_ref(),
                settable,
            },
        );
        self
    }

    /// Add an attribute whose access fails with `message`
    pub fn broken(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.ns
            .slots
            .insert(name.into(), Slot::Broken(message.into()));
        self
    }

    /// Finish building
    pub fn build(self) -> Value {
        match self.kind {
            NamespaceKind::Module => Value::Module(self.ns),
            NamespaceKind::Class => Value::Class(self.ns),
            NamespaceKind::Instance => Value::Instance(self.ns),
        }
    }

    /// Finish building and wrap the result in a shared handle
    pub fn into_ref(self) -> ObjectRef {
        self.build().into_ref()
    }
}

impl From<NamespaceBuilder> for Value {
    fn from(builder: NamespaceBuilder) -> Self {
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scalars() {
        assert!(Value::Int(3).is_scalar());
        assert!(Value::str("x").is_scalar());
        assert!(Value::None.is_scalar());
        assert!(Value::Int(3).member_names().is_empty());
        assert_eq!(Value::Bool(true).repr(), "True");
        assert_eq!(Value::Float(1.0).repr(), "1.0");
        assert_eq!(Value::str("hi").repr(), "\"hi\"");
        assert_eq!(Value::str("héllo").length(), Some(5));
    }

    #[test]
    fn test_list_items() {
        let list = Value::list([Value::Int(1), Value::Int(2)]);
        assert_eq!(list.member_names(), vec!["[0]", "[1]"]);
        assert_eq!(list.get_member("[1]").unwrap().value.repr(), "2");
        assert!(list.get_member("[2]").is_err());
        assert!(list.get_member("[01]").is_err());
        assert!(list.get_member("1").is_err());
        assert_eq!(list.repr(), "[1, 2]");
        assert_eq!(list.length(), Some(2));
    }

    #[test]
    fn test_map_items() {
        let map = Value::map([("b", Value::Int(2)), ("a", Value::Int(1))]);
        assert_eq!(map.member_names(), vec!["[\"a\"]", "[\"b\"]"]);
        assert_eq!(map.get_member("[\"b\"]").unwrap().value.repr(), "2");
        assert_eq!(map.repr(), "{\"a\": 1, \"b\": 2}");
        assert!(map.get_member("b").is_err());
    }

    #[test]
    fn test_map_keys_with_escapes() {
        let map = Value::map([
            ("say \"hi\"", Value::Int(1)),
            ("tab\there", Value::Int(2)),
            ("back\\slash", Value::Int(3)),
        ]);
        for name in map.member_names() {
            assert!(map.get_member(&name).is_ok(), "{name} should resolve");
        }
        assert_eq!(map.get_member(r#"["tab\there"]"#).unwrap().value.repr(), "2");
        // The raw key text is not a valid member name
        assert!(map.get_member("[\"tab\there\"]").is_err());
    }

    #[test]
    fn test_large_list_lookup_is_direct() {
        let list = Value::list((0..20_000).map(Value::Int));
        assert_eq!(list.get_member("[19999]").unwrap().value.repr(), "19999");
        assert!(list.get_member("[20000]").is_err());
    }

    #[test]
    fn test_module_members() {
        let module = Value::module("geometry")
            .doc("Shapes")
            .attr("PI", 2.5)
            .property("area", 2.0, false)
            .broken("bad", "boom")
            .build();

        let names = module.member_names();
        assert!(names.contains(&"PI".to_string()));
        assert!(names.contains(&"__name__".to_string()));
        assert!(module.is_module());
        assert_eq!(module.repr(), "<module 'geometry'>");
        assert_eq!(module.docstring().as_deref(), Some("Shapes"));

        assert!(module.get_member("area").unwrap().descriptor.is_some());
        assert!(module.get_member("PI").unwrap().descriptor.is_none());
        assert_eq!(
            module.get_member("bad").unwrap_err(),
            AccessError::Raised("boom".into())
        );
        assert_eq!(
            module.get_member("__name__").unwrap().value.repr(),
            "\"geometry\""
        );
        assert_eq!(module.get_member("__doc__").unwrap().value.repr(), "\"Shapes\"");
    }

    #[test]
    fn test_function_metadata() {
        let f = Value::function_with_doc("area", "(self)", "Compute the area.");
        assert!(f.is_callable());
        assert_eq!(f.signature().as_deref(), Some("area(self)"));
        assert_eq!(f.docstring().as_deref(), Some("Compute the area."));
        assert_eq!(f.type_name(), "function");
    }

    #[test]
    fn test_instance_type_name() {
        let circle = Value::instance("Circle").attr("radius", 2i64).build();
        assert_eq!(circle.type_name(), "Circle");
        assert_eq!(circle.repr(), "<Circle object>");
        assert_eq!(circle.member_names(), vec!["radius"]);
    }

    #[test]
    fn test_container_repr_is_bounded() {
        let list = Value::list((0..1000).map(Value::Int));
        let repr = list.repr();
        assert!(repr.len() < CONTAINER_REPR_LIMIT + 16);
        assert!(repr.ends_with("...]"));

        let full = list.full_repr();
        assert!(full.ends_with(", 998, 999]"));
        assert_eq!(Value::Int(7).full_repr(), "7");
    }
}
