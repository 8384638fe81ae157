//! The schema registry: resolves schema ids, curies and mixins to message
//! types.
//!
//! Registration is expected to finish (optionally ending with
//! [`MessageResolver::seal`]) before concurrent lookups begin. Lookups are
//! memoized in concurrent maps; each cache key is computed once.

use crate::config::RegistryConfig;
use crate::errors::{PbjError, Result};
use crate::message::{MessageClass, MessageType};
use crate::schema_id::{SchemaCurie, SchemaId};
use dashmap::DashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

static GLOBAL: LazyLock<MessageResolver> = LazyLock::new(MessageResolver::new);

/// Maps schema ids and curies to [`MessageClass`] handles.
#[derive(Debug, Default)]
pub struct MessageResolver {
    config: RegistryConfig,
    messages: RwLock<HashMap<String, MessageClass>>,
    resolved: DashMap<String, MessageClass>,
    mixins: DashMap<String, Vec<MessageClass>>,
    sealed: AtomicBool,
}

impl MessageResolver {
    /// Creates an empty resolver with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty resolver.
    #[must_use]
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// The process-wide resolver.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The resolver configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Ends the registration window; later registrations fail.
    pub fn seal(&self) {
        self.sealed.store(true, Ordering::Release);
        debug!(messages = self.len(), "message resolver sealed");
    }

    /// True once [`MessageResolver::seal`] was called.
    pub fn is_sealed(&self) -> bool {
        self.sealed.load(Ordering::Acquire)
    }

    /// Registers a type under a key: a full schema id (stored under its curie
    /// with major revision), a curie with major revision, or a bare curie.
    /// Registering an existing key overwrites it.
    ///
    /// # Errors
    ///
    /// Returns `RegistrySealed` after [`MessageResolver::seal`] and
    /// `InvalidCurie` for a malformed key.
    pub fn register(&self, key: &str, class: MessageClass) -> Result<()> {
        let key = normalize_key(key)?;
        if self.is_sealed() {
            return Err(PbjError::RegistrySealed(key));
        }
        self.messages.write().insert(key.clone(), class);
        self.invalidate();
        debug!(key = %key, class = class.name(), "message registered");
        Ok(())
    }

    /// Registers `T` under its schema's curie with major revision.
    ///
    /// # Errors
    ///
    /// Returns the schema definition error or `RegistrySealed`.
    pub fn register_schema<T: MessageType>(&self) -> Result<()> {
        let schema = T::schema()?;
        self.register(&schema.id().curie_with_major_rev(), T::class())
    }

    /// Registers many key/type pairs. Every key is validated before any is
    /// stored.
    ///
    /// # Errors
    ///
    /// See [`MessageResolver::register`].
    pub fn register_map<I, K>(&self, map: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, MessageClass)>,
        K: AsRef<str>,
    {
        let entries = map
            .into_iter()
            .map(|(k, class)| Ok((normalize_key(k.as_ref())?, class)))
            .collect::<Result<Vec<_>>>()?;
        if self.is_sealed() {
            let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str()).collect();
            return Err(PbjError::RegistrySealed(keys.join(", ")));
        }

        let count = entries.len();
        self.messages.write().extend(entries);
        self.invalidate();
        debug!(count, "message map registered");
        Ok(())
    }

    fn invalidate(&self) {
        self.resolved.clear();
        self.mixins.clear();
    }

    /// Resolves a schema id: first by curie with major revision, then (when
    /// version tolerant) by bare curie.
    ///
    /// # Errors
    ///
    /// Returns `NoMessageForSchemaId` when neither key is registered.
    pub fn resolve_by_schema_id(&self, id: &SchemaId) -> Result<MessageClass> {
        let curie_major = id.curie_with_major_rev();
        if let Some(class) = self.resolved.get(&curie_major) {
            return Ok(*class);
        }

        let messages = self.messages.read();
        if let Some(class) = messages.get(&curie_major) {
            trace!(key = %curie_major, "schema id resolved");
            self.resolved.insert(curie_major, *class);
            return Ok(*class);
        }

        if self.config.version_tolerant {
            let curie = id.curie().to_string();
            if let Some(class) = messages.get(&curie) {
                warn!(schema_id = %id, curie = %curie, "schema id resolved through its bare curie");
                self.resolved.insert(curie_major, *class);
                return Ok(*class);
            }
        }

        Err(PbjError::NoMessageForSchemaId(id.to_string()))
    }

    /// Resolves a curie (bare or with major revision) by exact key.
    ///
    /// # Errors
    ///
    /// Returns `NoMessageForCurie` when the key is not registered.
    pub fn resolve_by_curie(&self, curie: &str) -> Result<MessageClass> {
        if let Some(class) = self.resolved.get(curie) {
            return Ok(*class);
        }
        let class = self
            .messages
            .read()
            .get(curie)
            .copied()
            .ok_or_else(|| PbjError::NoMessageForCurie(curie.to_string()))?;
        self.resolved.insert(curie.to_string(), class);
        Ok(class)
    }

    /// Every registered type whose schema declares `mixin` (a curie or curie
    /// with major revision), optionally restricted to a package and category
    /// taken from the registration key. Results are de-duplicated and sorted
    /// by schema id.
    ///
    /// # Errors
    ///
    /// Returns `NoMessageForMixin` when nothing matches, or a schema
    /// definition error from a registered type.
    pub fn find_all_using_mixin(
        &self,
        mixin: &str,
        in_package: Option<&str>,
        in_category: Option<&str>,
    ) -> Result<Vec<MessageClass>> {
        let cache_key = format!(
            "{mixin}|{}|{}",
            in_package.unwrap_or_default(),
            in_category.unwrap_or_default()
        );
        let found = self
            .mixins
            .entry(cache_key)
            .or_try_insert_with(|| self.scan_mixin(mixin, in_package, in_category))?
            .clone();

        if found.is_empty() {
            return Err(PbjError::NoMessageForMixin(mixin.to_string()));
        }
        Ok(found)
    }

    /// The one registered type declaring `mixin`.
    ///
    /// # Errors
    ///
    /// Returns `NoMessageForMixin` when nothing matches and
    /// `MoreThanOneMessageForMixin` when several types match.
    pub fn find_one_using_mixin(
        &self,
        mixin: &str,
        in_package: Option<&str>,
        in_category: Option<&str>,
    ) -> Result<MessageClass> {
        let found = self.find_all_using_mixin(mixin, in_package, in_category)?;
        if let [only] = found.as_slice() {
            return Ok(*only);
        }
        let schemas = found
            .iter()
            .map(|class| class.schema().map(|s| s.id().to_string()))
            .collect::<Result<Vec<_>>>()?;
        Err(PbjError::MoreThanOneMessageForMixin {
            mixin: mixin.to_string(),
            schemas,
        })
    }

    fn scan_mixin(
        &self,
        mixin: &str,
        in_package: Option<&str>,
        in_category: Option<&str>,
    ) -> Result<Vec<MessageClass>> {
        let in_package = in_package.filter(|p| !p.is_empty());
        let in_category = in_category.filter(|c| !c.is_empty());

        let mut found: Vec<(SchemaId, MessageClass)> = Vec::new();
        for (key, class) in self.messages.read().iter() {
            if in_package.is_some() || in_category.is_some() {
                let Ok(curie) = SchemaCurie::parse(key) else {
                    continue;
                };
                if in_package.is_some_and(|p| p != curie.package())
                    || in_category.is_some_and(|c| c != curie.category())
                {
                    continue;
                }
            }

            let schema = class.schema()?;
            if schema.has_mixin(mixin) && !found.iter().any(|(id, _)| id == schema.id()) {
                found.push((schema.id().clone(), *class));
            }
        }
        found.sort_by(|a, b| a.0.cmp(&b.0));

        trace!(mixin, matches = found.len(), "mixin lookup cached");
        Ok(found.into_iter().map(|(_, class)| class).collect())
    }

    /// Number of registered keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }

    /// Registered keys, sorted.
    #[must_use]
    pub fn registered_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.messages.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Canonical registration key for a schema id, curie:vN or curie.
fn normalize_key(key: &str) -> Result<String> {
    if let Ok(id) = SchemaId::parse(key) {
        return Ok(id.curie_with_major_rev());
    }
    SchemaCurie::parse(key)?;
    Ok(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Field;
    use crate::schema::{Mixin, Schema};
    use crate::types::TypeName;

    struct Publishable;

    impl Mixin for Publishable {
        fn id(&self) -> SchemaId {
            SchemaId::parse("pbj:acme:blog:mixin:publishable:1-0-0").unwrap()
        }

        fn fields(&self) -> Result<Vec<Field>> {
            Ok(vec![Field::builder("published", TypeName::Boolean).build()?])
        }
    }

    struct Article;

    impl MessageType for Article {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins("Article", "pbj:acme:blog:node:article:1-0-0", &[&Publishable], vec![])
        }
    }

    struct Page;

    impl MessageType for Page {
        fn define_schema() -> Result<Schema> {
            Schema::create_with_mixins("Page", "pbj:acme:cms:node:page:1-0-0", &[&Publishable], vec![])
        }
    }

    struct Comment;

    impl MessageType for Comment {
        fn define_schema() -> Result<Schema> {
            Schema::create("Comment", "pbj:acme:blog:node:comment:1-0-0", vec![])
        }
    }

    fn resolver() -> MessageResolver {
        let resolver = MessageResolver::new();
        resolver.register_schema::<Article>().unwrap();
        resolver.register_schema::<Page>().unwrap();
        resolver.register_schema::<Comment>().unwrap();
        resolver
    }

    #[test]
    fn test_resolve_by_schema_id() {
        let resolver = resolver();
        let id = SchemaId::parse("pbj:acme:blog:node:article:1-4-2").unwrap();
        assert!(resolver.resolve_by_schema_id(&id).unwrap().is::<Article>());

        let missing = SchemaId::parse("pbj:acme:blog:node:missing:1-0-0").unwrap();
        assert!(matches!(
            resolver.resolve_by_schema_id(&missing),
            Err(PbjError::NoMessageForSchemaId(_))
        ));

        let next_major = SchemaId::parse("pbj:acme:blog:node:article:2-0-0").unwrap();
        assert!(resolver.resolve_by_schema_id(&next_major).is_err());
    }

    #[test]
    fn test_version_tolerant_fallback() {
        let resolver = MessageResolver::new();
        resolver.register("acme:blog:node:article", Article::class()).unwrap();
        let id = SchemaId::parse("pbj:acme:blog:node:article:3-0-0").unwrap();
        assert!(resolver.resolve_by_schema_id(&id).unwrap().is::<Article>());

        let strict = MessageResolver::with_config(RegistryConfig::new().with_version_tolerant(false));
        strict.register("acme:blog:node:article", Article::class()).unwrap();
        assert!(strict.resolve_by_schema_id(&id).is_err());
    }

    #[test]
    fn test_register_full_schema_id_uses_curie_major() {
        let resolver = MessageResolver::new();
        resolver.register("pbj:acme:blog:node:article:1-0-0", Article::class()).unwrap();
        assert_eq!(resolver.registered_ids(), vec!["acme:blog:node:article:v1"]);
        assert!(resolver.register("Not A Curie", Article::class()).is_err());
    }

    #[test]
    fn test_resolve_by_curie() {
        let resolver = resolver();
        assert!(resolver.resolve_by_curie("acme:blog:node:comment:v1").unwrap().is::<Comment>());
        assert!(matches!(
            resolver.resolve_by_curie("acme:blog:node:comment"),
            Err(PbjError::NoMessageForCurie(_))
        ));
    }

    #[test]
    fn test_find_all_using_mixin() {
        let resolver = resolver();
        let all = resolver.find_all_using_mixin("acme:blog:mixin:publishable:v1", None, None).unwrap();
        assert_eq!(all, vec![Article::class(), Page::class()]);

        let in_blog = resolver
            .find_all_using_mixin("acme:blog:mixin:publishable", Some("blog"), None)
            .unwrap();
        assert_eq!(in_blog, vec![Article::class()]);

        assert!(matches!(
            resolver.find_all_using_mixin("acme:blog:mixin:publishable", Some("shop"), None),
            Err(PbjError::NoMessageForMixin(_))
        ));
    }

    #[test]
    fn test_find_one_using_mixin() {
        let resolver = resolver();
        let one = resolver
            .find_one_using_mixin("acme:blog:mixin:publishable", Some("cms"), Some("node"))
            .unwrap();
        assert!(one.is::<Page>());

        let err = resolver
            .find_one_using_mixin("acme:blog:mixin:publishable", None, None)
            .unwrap_err();
        match err {
            PbjError::MoreThanOneMessageForMixin { schemas, .. } => assert_eq!(schemas.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_registration_invalidates_caches() {
        let resolver = MessageResolver::new();
        resolver.register_schema::<Article>().unwrap();
        assert_eq!(resolver.find_all_using_mixin("acme:blog:mixin:publishable", None, None).unwrap().len(), 1);

        resolver.register_schema::<Page>().unwrap();
        assert_eq!(resolver.find_all_using_mixin("acme:blog:mixin:publishable", None, None).unwrap().len(), 2);
    }

    #[test]
    fn test_sealed_rejects_registration() {
        let resolver = resolver();
        resolver.seal();
        assert!(resolver.is_sealed());
        assert!(matches!(
            resolver.register_schema::<Article>(),
            Err(PbjError::RegistrySealed(_))
        ));
        assert!(resolver.register_map([("acme:blog:node:x:v1", Comment::class())]).is_err());
        assert_eq!(resolver.len(), 3);
    }

    #[test]
    fn test_register_map() {
        let resolver = MessageResolver::new();
        resolver
            .register_map([
                ("acme:blog:node:article:v1", Article::class()),
                ("acme:cms:node:page:v1", Page::class()),
            ])
            .unwrap();
        assert_eq!(resolver.len(), 2);
        assert!(!resolver.is_empty());
        assert!(resolver.register_map([("bad", Page::class())]).is_err());
        assert_eq!(resolver.len(), 2);
    }
}
