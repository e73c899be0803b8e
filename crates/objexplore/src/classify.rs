//! Member classification
//!
//! Turns an object into an ordered list of [`MemberEntry`] values. Every
//! member is read exactly once; failures are recorded on the entry instead of
//! aborting the whole object.

use crate::error::NotDescendableReason;
use crate::object::{Attribute, Explorable, ObjectRef};
use crate::options::{ExplorerOptions, Precedence};
use derive_more::Display;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::cell::OnceCell;
use std::cmp::Ordering;

/// Representation and type family recorded for members whose access failed
pub const INACCESSIBLE: &str = "<inaccessible>";

/// The kind of a member, in default navigation order
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    /// Plain data
    #[display(fmt = "data")]
    Data,
    /// Descriptor-backed attribute
    #[display(fmt = "property")]
    Property,
    /// Callable member
    #[display(fmt = "method")]
    Method,
    /// Class object
    #[display(fmt = "class")]
    Class,
    /// Module object
    #[display(fmt = "module")]
    Module,
    /// Reserved `__name__` style member
    #[display(fmt = "dunder")]
    Dunder,
}

impl MemberKind {
    /// Every kind, in navigation order
    pub const ALL: [MemberKind; 6] = [
        MemberKind::Data,
        MemberKind::Property,
        MemberKind::Method,
        MemberKind::Class,
        MemberKind::Module,
        MemberKind::Dunder,
    ];

    /// Bit used for this kind in a [`KindSet`](crate::filter::KindSet)
    pub(crate) const fn bit(self) -> u8 {
        1 << self as u8
    }
}

/// Returns true for names following the `__name__` convention
pub fn is_dunder(name: &str) -> bool {
    name.len() > 4 && name.starts_with("__") && name.ends_with("__")
}

/// Returns true unless the name starts with an underscore
pub fn is_public(name: &str) -> bool {
    !name.starts_with('_')
}

/// Compare names treating runs of ASCII digits as numbers
///
/// `[2]` sorts before `[10]` and `item9` before `item10`. Names equal under
/// this order (`a01` and `a1`) fall back to plain string order, so the
/// result is total and consistent with `Eq`.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let (mut x, mut y) = (a.as_bytes(), b.as_bytes());
    while let (Some(&cx), Some(&cy)) = (x.first(), y.first()) {
        let ordering = if cx.is_ascii_digit() && cy.is_ascii_digit() {
            let (nx, rest_x) = split_digits(x);
            let (ny, rest_y) = split_digits(y);
            x = rest_x;
            y = rest_y;
            let nx = trim_zeros(nx);
            let ny = trim_zeros(ny);
            nx.len().cmp(&ny.len()).then_with(|| nx.cmp(ny))
        } else {
            x = &x[1..];
            y = &y[1..];
            cx.cmp(&cy)
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    x.len().cmp(&y.len()).then_with(|| a.cmp(b))
}

fn split_digits(s: &[u8]) -> (&[u8], &[u8]) {
    let end = s.iter().position(|c| !c.is_ascii_digit()).unwrap_or(s.len());
    s.split_at(end)
}

fn trim_zeros(digits: &[u8]) -> &[u8] {
    let start = digits.iter().position(|&c| c != b'0').unwrap_or(digits.len());
    &digits[start..]
}

/// A classified member of an object
#[derive(Debug, Clone)]
pub struct MemberEntry {
    /// Member name, unique within its owner
    pub name: String,
    /// Classification, fixed once computed
    pub kind: MemberKind,
    /// Best-effort type label used for display grouping
    pub type_family: String,
    /// Derived from the naming convention
    pub is_public: bool,
    value: Option<ObjectRef>,
    error: Option<String>,
    repr_width: usize,
    cached_repr: OnceCell<String>,
}

impl MemberEntry {
    fn accessible(name: String, kind: MemberKind, value: ObjectRef, repr_width: usize) -> Self {
        Self {
            is_public: is_public(&name),
            type_family: value.type_name().into_owned(),
            name,
            kind,
            value: Some(value),
            error: None,
            repr_width,
            cached_repr: OnceCell::new(),
        }
    }

    fn inaccessible(name: String, message: String) -> Self {
        Self {
            is_public: is_public(&name),
            name,
            kind: MemberKind::Data,
            type_family: INACCESSIBLE.to_string(),
            value: None,
            error: Some(message),
            repr_width: INACCESSIBLE.len(),
            cached_repr: OnceCell::from(INACCESSIBLE.to_string()),
        }
    }

    /// The member's value, `None` when reading it failed
    pub fn value(&self) -> Option<&ObjectRef> {
        self.value.as_ref()
    }

    /// Returns true if reading the member succeeded
    pub fn is_accessible(&self) -> bool {
        self.value.is_some()
    }

    /// The error raised while reading the member
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Short representation, computed on first use
    pub fn cached_repr(&self) -> &str {
        self.cached_repr.get_or_init(|| match &self.value {
            Some(value) => truncate(&value.repr(), self.repr_width),
            None => INACCESSIBLE.to_string(),
        })
    }

    /// Call signature, for callables only
    pub fn signature(&self) -> Option<String> {
        self.value
            .as_ref()
            .filter(|v| v.is_callable())
            .and_then(|v| v.signature())
    }

    /// Documentation attached to the member's value
    pub fn docstring(&self) -> Option<String> {
        self.value.as_ref().and_then(|v| v.docstring())
    }

    /// Number of items when the value is a sized container
    pub fn length(&self) -> Option<usize> {
        self.value.as_ref().and_then(|v| v.length())
    }

    /// Why this member cannot be descended into, judged without classifying
    /// its value. `None` means descent may proceed; the target can still turn
    /// out to have no members.
    pub fn descend_block(&self, allow_dunders: bool) -> Option<NotDescendableReason> {
        match self.kind {
            MemberKind::Method => return Some(NotDescendableReason::Method),
            MemberKind::Dunder if !allow_dunders => return Some(NotDescendableReason::Dunder),
            _ => {}
        }
        match &self.value {
            None => Some(NotDescendableReason::Inaccessible),
            Some(value) if value.is_scalar() => Some(NotDescendableReason::Scalar),
            Some(_) => None,
        }
    }
}

/// Shorten `text` to at most `width` characters, marking the cut with `…`
pub fn truncate(text: &str, width: usize) -> String {
    let text = text.trim_end();
    let first_line = text.lines().next().unwrap_or("");
    let shortened = first_line.len() < text.len();
    match first_line.char_indices().nth(width.saturating_sub(1)) {
        Some((cut, _)) if first_line.chars().count() > width => {
            format!("{}…", &first_line[..cut])
        }
        _ if shortened => format!("{first_line}…"),
        _ => first_line.to_string(),
    }
}

/// The member cap was hit while classifying an object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Overflow {
    /// Members the object reported
    pub total: usize,
    /// Members kept after truncation
    pub kept: usize,
}

/// Result of classifying one object
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Members grouped by kind, in [`natural_cmp`] name order within each
    /// group
    pub members: Vec<MemberEntry>,
    /// Set when the member list was truncated
    pub overflow: Option<Overflow>,
}

/// Enumerate and classify every member of `object`
///
/// Names are deduplicated and put in [`natural_cmp`] order before reading,
/// so truncation at `options.max_members` always keeps the same names for
/// the same object.
pub fn classify(object: &dyn Explorable, options: &ExplorerOptions) -> Classification {
    let mut names = object.member_names();
    names.sort_by(|a, b| natural_cmp(a, b));
    names.dedup();

    let total = names.len();
    let overflow = if total > options.max_members {
        names.truncate(options.max_members);
        warn!(
            "{} has {} members, keeping the first {}",
            object.type_name(),
            total,
            options.max_members
        );
        Some(Overflow {
            total,
            kept: options.max_members,
        })
    } else {
        None
    };

    let mut members: Vec<MemberEntry> = names
        .into_iter()
        .map(|name| match object.get_member(&name) {
            Ok(attr) => {
                let kind = classify_kind(&name, &attr, options.precedence);
                MemberEntry::accessible(name, kind, attr.value, options.repr_width)
            }
            Err(err) => {
                warn!("member `{}` is inaccessible: {}", name, err);
                MemberEntry::inaccessible(name, err.to_string())
            }
        })
        .collect();

    // Stable: names are already ascending within each kind group
    members.sort_by_key(|m| m.kind);

    debug!(
        "classified {} members of {}",
        members.len(),
        object.type_name()
    );

    Classification { members, overflow }
}

/// Decide a member's kind from its name and the attribute read for it
pub fn classify_kind(name: &str, attr: &Attribute, precedence: Precedence) -> MemberKind {
    if is_dunder(name) {
        return MemberKind::Dunder;
    }

    let method = attr.value.is_callable().then_some(MemberKind::Method);
    let property = attr.descriptor.is_some().then_some(MemberKind::Property);
    let by_protocol = match precedence {
        Precedence::CallableFirst => method.or(property),
        Precedence::DescriptorFirst => property.or(method),
    };

    by_protocol.unwrap_or(if attr.value.is_class() {
        MemberKind::Class
    } else if attr.value.is_module() {
        MemberKind::Module
    } else {
        MemberKind::Data
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Value;
    use pretty_assertions::assert_eq;

    fn sample() -> Value {
        Value::module("sample")
            .attr("b", 2i64)
            .attr("a", 1i64)
            .attr("_hidden", 3i64)
            .property("size", 10i64, false)
            .attr("run", Value::function("run", "()"))
            .attr("Thing", Value::class("Thing"))
            .attr("os", Value::module("os"))
            .broken("flaky", "getter raised")
            .build()
    }

    fn names(c: &Classification) -> Vec<&str> {
        c.members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_kind_group_order() {
        let c = classify(&sample(), &ExplorerOptions::default());
        assert_eq!(
            names(&c),
            vec![
                "_hidden", "a", "b", "flaky", "size", "run", "Thing", "os", "__doc__",
                "__name__"
            ]
        );
        let kinds: Vec<_> = c.members.iter().map(|m| m.kind).collect();
        assert_eq!(
            kinds,
            vec![
                MemberKind::Data,
                MemberKind::Data,
                MemberKind::Data,
                MemberKind::Data,
                MemberKind::Property,
                MemberKind::Method,
                MemberKind::Class,
                MemberKind::Module,
                MemberKind::Dunder,
                MemberKind::Dunder,
            ]
        );
    }

    #[test]
    fn test_inaccessible_member_is_recorded() {
        let c = classify(&sample(), &ExplorerOptions::default());
        let flaky = c.members.iter().find(|m| m.name == "flaky").unwrap();
        assert_eq!(flaky.kind, MemberKind::Data);
        assert!(!flaky.is_accessible());
        assert_eq!(flaky.cached_repr(), INACCESSIBLE);
        assert_eq!(flaky.error(), Some("getter raised"));
    }

    #[test]
    fn test_public_flag() {
        let c = classify(&sample(), &ExplorerOptions::default());
        let private: Vec<_> = c
            .members
            .iter()
            .filter(|m| !m.is_public)
            .map(|m| m.name.as_str())
            .collect();
        assert_eq!(private, vec!["_hidden", "__doc__", "__name__"]);
    }

    #[test]
    fn test_precedence_for_callable_property() {
        let attr = Attribute::property(Value::function("f", "()").into_ref(), false);
        assert_eq!(
            classify_kind("f", &attr, Precedence::CallableFirst),
            MemberKind::Method
        );
        assert_eq!(
            classify_kind("f", &attr, Precedence::DescriptorFirst),
            MemberKind::Property
        );
        assert_eq!(
            classify_kind("__call__", &attr, Precedence::DescriptorFirst),
            MemberKind::Dunder
        );
    }

    #[test]
    fn test_overflow_truncates_deterministically() {
        let list = Value::list((0..20).map(Value::Int));
        let options = ExplorerOptions::default().max_members(5);
        let first = classify(&list, &options);
        let second = classify(&list, &options);

        assert_eq!(first.overflow, Some(Overflow { total: 20, kept: 5 }));
        assert_eq!(names(&first), names(&second));
        assert_eq!(names(&first), vec!["[0]", "[1]", "[2]", "[3]", "[4]"]);
    }

    #[test]
    fn test_list_items_in_index_order() {
        let list = Value::list((0..12).map(Value::Int));
        let c = classify(&list, &ExplorerOptions::default());
        assert_eq!(names(&c)[8..], ["[8]", "[9]", "[10]", "[11]"]);
    }

    #[test]
    fn test_natural_cmp() {
        assert_eq!(natural_cmp("[2]", "[10]"), Ordering::Less);
        assert_eq!(natural_cmp("item10", "item9"), Ordering::Greater);
        assert_eq!(natural_cmp("a", "b"), Ordering::Less);
        assert_eq!(natural_cmp("B", "a"), Ordering::Less);
        assert_eq!(natural_cmp("x1", "x1y"), Ordering::Less);
        assert_eq!(natural_cmp("a1", "a01"), "a1".cmp("a01"));
        assert_eq!(natural_cmp("same", "same"), Ordering::Equal);
    }

    #[test]
    fn test_large_list_classifies_quickly() {
        let n = 20_000;
        let list = Value::list((0..n).map(Value::Int));
        let options = ExplorerOptions::default().max_members(n as usize);

        let started = std::time::Instant::now();
        let c = classify(&list, &options);
        assert_eq!(c.members.len(), n as usize);
        assert_eq!(c.members.last().map(|m| m.name.as_str()), Some("[19999]"));
        assert!(
            started.elapsed() < std::time::Duration::from_secs(10),
            "classifying {n} items took {:?}",
            started.elapsed()
        );
    }

    #[test]
    fn test_callables_are_previewed_from_metadata() {
        let module = Value::module("m")
            .attr("f", Value::function_with_doc("f", "(x)", "Doubles x."))
            .build();
        let c = classify(&module, &ExplorerOptions::default());
        let f = c.members.iter().find(|m| m.name == "f").unwrap();
        assert_eq!(f.signature().as_deref(), Some("f(x)"));
        assert_eq!(f.docstring().as_deref(), Some("Doubles x."));
        assert_eq!(f.cached_repr(), "<function f(x)>");
    }

    #[test]
    fn test_descend_block() {
        let c = classify(&sample(), &ExplorerOptions::default());
        let block = |name: &str, dunders| {
            c.members
                .iter()
                .find(|m| m.name == name)
                .unwrap()
                .descend_block(dunders)
        };
        assert_eq!(block("a", false), Some(NotDescendableReason::Scalar));
        assert_eq!(block("run", false), Some(NotDescendableReason::Method));
        assert_eq!(block("flaky", false), Some(NotDescendableReason::Inaccessible));
        assert_eq!(block("__doc__", false), Some(NotDescendableReason::Dunder));
        assert_eq!(block("__doc__", true), Some(NotDescendableReason::Scalar));
        assert_eq!(block("Thing", false), None);
        assert_eq!(block("os", false), None);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 5), "abcd…");
        assert_eq!(truncate("line one\nline two", 40), "line one…");
        assert_eq!(truncate("ééééé", 3), "éé…");
        assert_eq!(truncate("abc\n", 10), "abc");
        assert_eq!(truncate("abc  \n\n", 10), "abc");
        assert_eq!(truncate("abc\ndef\n", 10), "abc…");
    }

    #[test]
    fn test_dunder_detection() {
        assert!(is_dunder("__init__"));
        assert!(!is_dunder("____"));
        assert!(!is_dunder("__private"));
        assert!(!is_dunder("_x_"));
    }
}
