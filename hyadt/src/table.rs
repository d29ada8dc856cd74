//! Dispatch table builder.
//!
//! Role
//! - [`HandlerEntry`] is what a table stores per tag: a computed handler, a constant, or an
//!   identity [`Constructor`].
//! - [`Handlers`] is a handler object: an ordered set of keyed entries, optionally chained to a
//!   prototype so that own and inherited keys can be told apart.
//! - [`Definition`] is one argument of the builder (a tag name, a nested list, or a handler
//!   object), and [`DispatchTable::build`] merges a list of them into one immutable table.
//!
//! Merge policy
//! - Definitions are applied in order, nested lists expanded in place; on a tag collision the
//!   later definition wins.
//! - Private keys (`_name`, anything but `_` itself with a leading underscore) are dropped.
//!   Malformed input is never rejected: the builder is permissive and only logs what it skips.
use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    fmt,
    hash::BuildHasher,
    sync::Arc,
};

use log::debug;
use strum::EnumIs;

use crate::{
    constructor::Constructor,
    error::EvalResult,
    eval::DispatchCtx,
    value::{DEFAULT_TAG, Tag, Value},
};

/// Signature shared by every computed handler.
///
/// The context carries the tag that selected the handler and gives access to the evaluator for
/// nested dispatch.
pub type HandlerFn = dyn Fn(&DispatchCtx<'_>, Vec<Value>) -> EvalResult<Value> + Send + Sync;

/// One entry of a dispatch table.
#[derive(Clone, EnumIs)]
pub enum HandlerEntry {
    /// A function invoked with the dispatch context and the arguments.
    Computed(Arc<HandlerFn>),

    /// A constant: arguments are ignored and a clone of the value is returned.
    Constant(Value),

    /// An identity constructor: arguments become the fields of a new variant.
    Construct(Constructor),
}

impl HandlerEntry {
    /// Wrap a closure as a computed entry.
    pub fn computed<F>(handler: F) -> Self
    where
        F: Fn(&DispatchCtx<'_>, Vec<Value>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        HandlerEntry::Computed(Arc::new(handler))
    }

    #[inline]
    pub fn constant(value: impl Into<Value>) -> Self {
        HandlerEntry::Constant(value.into())
    }

    #[inline]
    pub fn constructor(tag: impl Into<Tag>) -> Self {
        HandlerEntry::Construct(Constructor::new(tag))
    }

    pub(crate) fn invoke(&self, ctx: &DispatchCtx<'_>, args: Vec<Value>) -> EvalResult<Value> {
        match self {
            HandlerEntry::Computed(handler) => handler(ctx, args),
            HandlerEntry::Constant(value) => Ok(value.clone()),
            HandlerEntry::Construct(constructor) => Ok(constructor.build(args)),
        }
    }
}

impl fmt::Debug for HandlerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HandlerEntry::Computed(_) => f.write_str("Computed(..)"),
            HandlerEntry::Constant(value) => f.debug_tuple("Constant").field(value).finish(),
            HandlerEntry::Construct(constructor) => {
                f.debug_tuple("Construct").field(constructor).finish()
            }
        }
    }
}

/// A handler object: keyed entries in insertion order, with an optional prototype.
///
/// Lookups and [`keys`](Self::keys) see own entries first, then inherited entries that are not
/// shadowed by an own key. [`own_keys`](Self::own_keys) only sees the entries set on this object.
#[derive(Debug, Clone, Default)]
pub struct Handlers {
    own: Vec<(Tag, HandlerEntry)>,
    prototype: Option<Arc<Handlers>>,
}

impl Handlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty object inheriting every entry of `prototype`.
    pub fn inherit(prototype: impl Into<Arc<Handlers>>) -> Self {
        Handlers {
            own: Vec::new(),
            prototype: Some(prototype.into()),
        }
    }

    /// Builder: set a computed handler for `tag`.
    pub fn on<F>(mut self, tag: impl Into<Tag>, handler: F) -> Self
    where
        F: Fn(&DispatchCtx<'_>, Vec<Value>) -> EvalResult<Value> + Send + Sync + 'static,
    {
        self.insert(tag, HandlerEntry::computed(handler));
        self
    }

    /// Builder: set a constant for `tag`.
    pub fn constant(mut self, tag: impl Into<Tag>, value: impl Into<Value>) -> Self {
        self.insert(tag, HandlerEntry::constant(value));
        self
    }

    /// Builder: set an arbitrary entry for `tag`.
    pub fn with(mut self, tag: impl Into<Tag>, entry: HandlerEntry) -> Self {
        self.insert(tag, entry);
        self
    }

    /// Set the own entry for `tag`, returning the entry it replaced.
    pub fn insert(&mut self, tag: impl Into<Tag>, entry: HandlerEntry) -> Option<HandlerEntry> {
        let tag = tag.into();
        match self.own.iter_mut().find(|(key, _)| *key == tag) {
            Some((_, slot)) => Some(std::mem::replace(slot, entry)),
            None => {
                self.own.push((tag, entry));
                None
            }
        }
    }

    /// Look `key` up on this object, then along the prototype chain.
    pub fn get(&self, key: &str) -> Option<&HandlerEntry> {
        self.get_own(key)
            .or_else(|| self.prototype.as_deref().and_then(|proto| proto.get(key)))
    }

    pub fn get_own(&self, key: &str) -> Option<&HandlerEntry> {
        self.own
            .iter()
            .find(|(tag, _)| tag.as_str() == key)
            .map(|(_, entry)| entry)
    }

    pub fn prototype(&self) -> Option<&Handlers> {
        self.prototype.as_deref()
    }

    /// Own entries, in insertion order.
    pub fn own_entries(&self) -> impl Iterator<Item = (&Tag, &HandlerEntry)> {
        self.own.iter().map(|(tag, entry)| (tag, entry))
    }

    pub fn own_keys(&self) -> impl Iterator<Item = &Tag> {
        self.own.iter().map(|(tag, _)| tag)
    }

    /// Every visible entry: own entries first, then unshadowed inherited ones.
    pub fn entries(&self) -> Vec<(&Tag, &HandlerEntry)> {
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        let mut entries = Vec::new();
        let mut current = Some(self);
        while let Some(object) = current {
            for (tag, entry) in &object.own {
                if seen.insert(tag.as_str()) {
                    entries.push((tag, entry));
                }
            }
            current = object.prototype.as_deref();
        }
        entries
    }

    /// Every visible key, in the order of [`entries`](Self::entries).
    pub fn keys(&self) -> Vec<Tag> {
        self.entries()
            .into_iter()
            .map(|(tag, _)| tag.clone())
            .collect()
    }

    /// Number of own entries.
    pub fn len(&self) -> usize {
        self.own.len()
    }

    pub fn is_empty(&self) -> bool {
        self.own.is_empty()
    }
}

/// One argument of the dispatch table builder.
#[derive(Debug, Clone, EnumIs)]
pub enum Definition {
    /// Install an identity constructor under this tag.
    Tag(Tag),

    /// Process each definition in order.
    Seq(Vec<Definition>),

    /// Install every visible entry of a handler object.
    Handlers(Handlers),
}

impl From<Tag> for Definition {
    fn from(value: Tag) -> Self {
        Definition::Tag(value)
    }
}

impl From<&str> for Definition {
    fn from(value: &str) -> Self {
        Definition::Tag(value.into())
    }
}

impl From<String> for Definition {
    fn from(value: String) -> Self {
        Definition::Tag(value.into())
    }
}

macro_rules! definition_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Definition {
                fn from(value: $ty) -> Self {
                    Definition::Tag(value.into())
                }
            }
        )*
    };
}

definition_from_number!(i32, i64, u32, u64, usize);

impl From<Handlers> for Definition {
    fn from(value: Handlers) -> Self {
        Definition::Handlers(value)
    }
}

impl<T: Into<Definition>> From<Vec<T>> for Definition {
    fn from(value: Vec<T>) -> Self {
        Definition::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Definition>, const N: usize> From<[T; N]> for Definition {
    fn from(value: [T; N]) -> Self {
        Definition::Seq(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Definition> + Clone> From<&[T]> for Definition {
    fn from(value: &[T]) -> Self {
        Definition::Seq(value.iter().cloned().map(Into::into).collect())
    }
}

/// The closed set of per-tag handlers of one algebraic data type.
///
/// Immutable once built; an [`Evaluator`](crate::eval::Evaluator) shares it behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct DispatchTable {
    entries: BTreeMap<Tag, HandlerEntry>,
}

impl DispatchTable {
    /// Merge `definitions` into a new table (see the module documentation for the policy).
    pub fn build<I>(definitions: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Definition>,
    {
        let mut table = DispatchTable::default();
        for definition in definitions {
            table.install(definition.into());
        }
        table
    }

    fn install(&mut self, definition: Definition) {
        match definition {
            Definition::Tag(tag) => {
                if tag.is_private() {
                    debug!("Ignoring constructor for private tag `{tag}`");
                } else {
                    self.entries
                        .insert(tag.clone(), HandlerEntry::Construct(Constructor::new(tag)));
                }
            }
            Definition::Seq(definitions) => {
                for definition in definitions {
                    self.install(definition);
                }
            }
            Definition::Handlers(handlers) => {
                for (tag, entry) in handlers.entries() {
                    if tag.is_private() {
                        debug!("Ignoring handler for private key `{tag}`");
                    } else {
                        self.entries.insert(tag.clone(), entry.clone());
                    }
                }
            }
        }
    }

    /// The entry registered for exactly `tag`.
    #[inline]
    pub fn get(&self, tag: &str) -> Option<&HandlerEntry> {
        self.entries.get(tag)
    }

    #[inline]
    pub fn get_key_value(&self, tag: &str) -> Option<(&Tag, &HandlerEntry)> {
        self.entries.get_key_value(tag)
    }

    #[inline]
    pub fn default_handler(&self) -> Option<&HandlerEntry> {
        self.entries.get(DEFAULT_TAG)
    }

    /// The entry for `tag`, falling back on the default handler.
    #[inline]
    pub fn resolve(&self, tag: &str) -> Option<&HandlerEntry> {
        self.get(tag).or_else(|| self.default_handler())
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// Registered tags, in lexicographic order.
    pub fn tags(&self) -> impl Iterator<Item = &Tag> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &HandlerEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Anything whose key names can seed a set of identity constructors.
pub trait KeySource {
    /// Every key name, inherited ones included.
    fn key_names(&self) -> Vec<Tag>;

    /// Key names defined directly on the object. Defaults to [`key_names`](Self::key_names) for
    /// sources without inheritance.
    fn own_key_names(&self) -> Vec<Tag> {
        self.key_names()
    }
}

impl KeySource for Handlers {
    fn key_names(&self) -> Vec<Tag> {
        self.keys()
    }

    fn own_key_names(&self) -> Vec<Tag> {
        self.own_keys().cloned().collect()
    }
}

impl KeySource for DispatchTable {
    fn key_names(&self) -> Vec<Tag> {
        self.tags().cloned().collect()
    }
}

impl<K: AsRef<str>, V, S: BuildHasher> KeySource for HashMap<K, V, S> {
    fn key_names(&self) -> Vec<Tag> {
        self.keys().map(|key| Tag::new(key)).collect()
    }
}

impl<K: AsRef<str>, V> KeySource for BTreeMap<K, V> {
    fn key_names(&self) -> Vec<Tag> {
        self.keys().map(|key| Tag::new(key)).collect()
    }
}
