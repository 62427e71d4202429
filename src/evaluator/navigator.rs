//! Path navigator
//!
//! Walks a parsed path segment by segment. Attribute, index and key segments
//! go through cached accessor descriptors; function segments go through the
//! registry after converting the current value to the function's input type.
//! Any failure ends the call immediately with the path, the failing segment
//! and the resolved prefix.

use std::borrow::Cow;
use std::sync::Arc;

use super::context::NavigationContext;
use super::factories::ContainerFactories;
use crate::access::{AccessFault, AccessorCache, AccessorDescriptor, ResolveFailure};
use crate::config::NavigatorConfig;
use crate::error::{Absence, Result};
use crate::model::{ConversionChain, Value};
use crate::parser::{PathCache, PathExpression, Segment};
use crate::registry::FunctionRegistry;

/// Resolves, reads and writes values addressed by path expressions.
///
/// `Send + Sync`: one navigator can serve many threads. The caches it holds
/// are internally synchronized; the registry and conversion chain are
/// read-only once the navigator is built.
///
/// # Examples
///
/// ```rust
/// use objpath::{Navigator, Value};
///
/// let root: Value = serde_json::json!({"tags": ["x", "y"]}).into();
/// let navigator = Navigator::new();
/// assert_eq!(navigator.get(&root, "tags[1]").unwrap(), Value::from("y"));
/// assert!(!navigator.exists(&root, "name").unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct Navigator {
    paths: Arc<PathCache>,
    accessors: Arc<AccessorCache>,
    functions: Arc<FunctionRegistry>,
    conversions: Arc<ConversionChain>,
    config: NavigatorConfig,
}

/// Builder for [`Navigator`]
#[derive(Debug, Default)]
pub struct NavigatorBuilder {
    config: NavigatorConfig,
    paths: Option<Arc<PathCache>>,
    accessors: Option<Arc<AccessorCache>>,
    functions: Option<Arc<FunctionRegistry>>,
    conversions: Option<Arc<ConversionChain>>,
}

impl NavigatorBuilder {
    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Share a parsed path cache instead of creating one from the config
    pub fn path_cache(mut self, paths: Arc<PathCache>) -> Self {
        self.paths = Some(paths);
        self
    }

    /// Share an accessor cache with other navigators
    pub fn accessor_cache(mut self, accessors: Arc<AccessorCache>) -> Self {
        self.accessors = Some(accessors);
        self
    }

    pub fn functions(mut self, functions: impl Into<Arc<FunctionRegistry>>) -> Self {
        self.functions = Some(functions.into());
        self
    }

    pub fn conversions(mut self, conversions: impl Into<Arc<ConversionChain>>) -> Self {
        self.conversions = Some(conversions.into());
        self
    }

    pub fn build(self) -> Navigator {
        let paths = self
            .paths
            .unwrap_or_else(|| Arc::new(PathCache::with_config(&self.config.path_cache)));
        Navigator {
            paths,
            accessors: self.accessors.unwrap_or_default(),
            functions: self.functions.unwrap_or_default(),
            conversions: self.conversions.unwrap_or_default(),
            config: self.config,
        }
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    /// Navigator with default config, an empty function registry and the
    /// built-in conversions
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> NavigatorBuilder {
        NavigatorBuilder::default()
    }

    pub fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    pub fn path_cache(&self) -> &Arc<PathCache> {
        &self.paths
    }

    pub fn accessor_cache(&self) -> &Arc<AccessorCache> {
        &self.accessors
    }

    pub fn functions(&self) -> &Arc<FunctionRegistry> {
        &self.functions
    }

    pub fn conversions(&self) -> &Arc<ConversionChain> {
        &self.conversions
    }

    /// Parse through the path cache
    pub fn parse(&self, path: &str) -> Result<Arc<PathExpression>> {
        self.paths.parse(path)
    }

    /// Read the value at `path`
    pub fn get(&self, root: &Value, path: &str) -> Result<Value> {
        self.get_cow(root, path).map(Cow::into_owned)
    }

    /// Read the value at `path`, borrowing from `root` when no function
    /// produced a new value along the way
    pub fn get_cow<'v>(&self, root: &'v Value, path: &str) -> Result<Cow<'v, Value>> {
        let expression = self.parse(path)?;
        self.evaluate(root, &expression)
    }

    pub fn get_parsed(&self, root: &Value, expression: &PathExpression) -> Result<Value> {
        self.evaluate(root, expression).map(Cow::into_owned)
    }

    /// Whether `path` leads to a value.
    ///
    /// Only "not found" becomes `false`; every other error propagates.
    pub fn exists(&self, root: &Value, path: &str) -> Result<bool> {
        match self.get_cow(root, path) {
            Ok(_) => Ok(true),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Write `value` at `path`.
    ///
    /// Intermediates must exist; the value is converted to the declared type
    /// of the final accessor. Sequences never grow.
    pub fn set(&self, root: &mut Value, path: &str, value: impl Into<Value>) -> Result<()> {
        let expression = self.parse(path)?;
        self.write(root, &expression, value.into(), None)
    }

    /// Write `value` at `path`, creating absent intermediates.
    ///
    /// An intermediate that is null, a missing mapping key, or the index one
    /// past the end of a growable sequence is filled with a fresh value from
    /// `factories`, picked by the declared type of its accessor. The final
    /// segment may also append to a sequence when its index equals the length.
    pub fn set_creating(
        &self,
        root: &mut Value,
        path: &str,
        value: impl Into<Value>,
        factories: &ContainerFactories,
    ) -> Result<()> {
        let expression = self.parse(path)?;
        self.write(root, &expression, value.into(), Some(factories))
    }

    fn evaluate<'v>(&self, root: &'v Value, expression: &PathExpression) -> Result<Cow<'v, Value>> {
        let mut context = NavigationContext::new(expression);
        let mut current = Cow::Borrowed(root);
        for segment in expression.segments() {
            log::trace!(
                "`{}` segment {}: {segment} on {}",
                context.path(),
                context.segment_index(),
                current.type_name()
            );
            current = match current {
                Cow::Borrowed(value) => self.read(&context, value, segment)?,
                Cow::Owned(value) => Cow::Owned(self.read(&context, &value, segment)?.into_owned()),
            };
            context.advance();
        }
        Ok(current)
    }

    fn read<'v>(&self, context: &NavigationContext<'_>, value: &'v Value, segment: &Segment) -> Result<Cow<'v, Value>> {
        if let Segment::Function { name, args } = segment {
            return self.call(context, value, name, args).map(Cow::Owned);
        }
        let fallback = self.fallback_function(segment);
        if value.is_null() {
            return match fallback {
                Some(name) => self.call(context, value, name, &[]).map(Cow::Owned),
                None => Err(context.not_found(Absence::ContainerAbsent)),
            };
        }

        let resolution = self
            .accessors
            .resolve(value, segment, self.config.case_insensitive_attributes);
        let descriptor = match (resolution, fallback) {
            (Ok(descriptor), _) => descriptor,
            (Err(ResolveFailure::Unsupported | ResolveFailure::Undeclared), Some(name)) => {
                return self.call(context, value, name, &[]).map(Cow::Owned);
            }
            (Err(failure), _) => return Err(context.unresolved(value.type_name(), failure)),
        };
        match (descriptor.read(value, segment), fallback) {
            (Ok(read), _) => Ok(read),
            // attribute-style access on a mapping without that key
            (Err(AccessFault::Missing), Some(name)) => {
                self.call(context, value, name, &[]).map(Cow::Owned)
            }
            (Err(fault), _) => Err(context.fault(descriptor.type_name(), fault)),
        }
    }

    /// Name of the function an attribute segment falls back to
    fn fallback_function<'s>(&self, segment: &'s Segment) -> Option<&'s str> {
        match segment {
            Segment::Attribute(name) if self.config.function_fallback && self.functions.contains(name) => {
                Some(&**name)
            }
            _ => None,
        }
    }

    fn call(&self, context: &NavigationContext<'_>, input: &Value, name: &str, args: &[Arc<str>]) -> Result<Value> {
        let function = self
            .functions
            .lookup(name)
            .map_err(|err| context.locate(err))?;
        let input = self
            .conversions
            .convert_cow(input, function.input_type())
            .map_err(|err| context.locate(err))?;
        log::trace!("calling `{name}` with {} arguments", args.len());
        function
            .invoke(&input, args)
            .map_err(|source| context.function_failed(name, source))
    }

    fn resolve(&self, context: &NavigationContext<'_>, value: &Value, segment: &Segment) -> Result<Arc<AccessorDescriptor>> {
        if segment.is_function() {
            return Err(context.read_only(value.type_name()));
        }
        if value.is_null() {
            return Err(context.not_found(Absence::ContainerAbsent));
        }
        self.accessors
            .resolve(value, segment, self.config.case_insensitive_attributes)
            .map_err(|failure| match failure {
                // a computed value is not a writable location
                ResolveFailure::Unsupported | ResolveFailure::Undeclared
                    if self.fallback_function(segment).is_some() =>
                {
                    context.read_only(value.type_name())
                }
                failure => context.unresolved(value.type_name(), failure),
            })
    }

    fn write(
        &self,
        root: &mut Value,
        expression: &PathExpression,
        value: Value,
        factories: Option<&ContainerFactories>,
    ) -> Result<()> {
        let mut context = NavigationContext::new(expression);
        let Some((last, intermediates)) = expression.segments().split_last() else {
            return Ok(());
        };

        let mut current = root;
        for segment in intermediates {
            log::trace!(
                "`{}` descending segment {}: {segment}",
                context.path(),
                context.segment_index()
            );
            current = self.descend(&context, current, segment, factories)?;
            context.advance();
        }

        let descriptor = self.resolve(&context, current, last)?;
        if !descriptor.is_writable() {
            return Err(context.read_only(descriptor.type_name()));
        }
        let value = self
            .conversions
            .convert_owned(value, descriptor.declared_type())
            .map_err(|err| context.locate(err))?;
        descriptor
            .write(current, last, value, factories.is_some())
            .map_err(|fault| context.fault(descriptor.type_name(), fault))
    }

    fn descend<'v>(
        &self,
        context: &NavigationContext<'_>,
        current: &'v mut Value,
        segment: &Segment,
        factories: Option<&ContainerFactories>,
    ) -> Result<&'v mut Value> {
        let descriptor = self.resolve(context, current, segment)?;

        if let Some(factories) = factories {
            let absent = match descriptor.read(current, segment) {
                Ok(existing) => existing.is_null(),
                Err(AccessFault::Missing) => true,
                Err(AccessFault::OutOfRange { index, len }) if index == len => true,
                Err(fault) => return Err(context.fault(descriptor.type_name(), fault)),
            };
            if absent {
                let required = descriptor.declared_type();
                let created = factories
                    .create(required)
                    .ok_or_else(|| context.no_factory(required))?;
                log::debug!(
                    "`{}` creating {required} for segment {}",
                    context.path(),
                    context.segment_index()
                );
                descriptor
                    .write(current, segment, created, true)
                    .map_err(|fault| context.fault(descriptor.type_name(), fault))?;
            }
        }

        descriptor
            .slot_mut(current, segment)
            .map_err(|fault| context.fault(descriptor.type_name(), fault))
    }
}
