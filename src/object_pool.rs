use std::fmt;
use std::sync::{Arc, Weak};

use hashbrown::HashMap;
use log::{debug, info, trace};
use serde::{Serialize, Serializer};

use crate::diagnostics::{Diagnostics, LogDiagnostics, Severity};
use crate::err::{DecodeError, Result};
use crate::fingerprint::hash_pool_to_version;
use crate::object_type::ObjectType;
use crate::objects::{VtObject, WorkingSet};
use crate::utils::ByteCursor;
use crate::{ObjectId, NULL_OBJECT_ID};

/// What to do when two objects in one pool carry the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DuplicatePolicy {
    /// The object decoded later replaces the earlier one.
    #[default]
    LastWins,
    /// Fail the decode with [`DecodeError::DuplicateObjectId`].
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSettings {
    duplicate_ids: DuplicatePolicy,
    compute_fingerprint: bool,
}

impl Default for PoolSettings {
    fn default() -> Self {
        PoolSettings {
            duplicate_ids: DuplicatePolicy::default(),
            compute_fingerprint: true,
        }
    }
}

impl PoolSettings {
    pub fn new() -> Self {
        PoolSettings::default()
    }

    pub fn duplicate_ids(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_ids = policy;
        self
    }

    /// Skip hashing the buffer when the caller has no use for the version string.
    pub fn compute_fingerprint(mut self, compute: bool) -> Self {
        self.compute_fingerprint = compute;
        self
    }

    pub fn get_duplicate_ids(&self) -> DuplicatePolicy {
        self.duplicate_ids
    }

    pub fn should_compute_fingerprint(&self) -> bool {
        self.compute_fingerprint
    }
}

/// Pool-wide state that objects reach through their [`PoolRef`].
pub(crate) struct PoolContext {
    diagnostics: Arc<dyn Diagnostics>,
}

/// A non-owning handle from an object back to the pool that decoded it.
///
/// It never keeps the pool alive. Once the pool is gone, diagnostics fall back to
/// [`LogDiagnostics`].
#[derive(Clone, Default)]
pub struct PoolRef(Weak<PoolContext>);

impl PoolRef {
    /// A handle that belongs to no pool.
    pub fn detached() -> Self {
        PoolRef(Weak::new())
    }

    pub fn is_attached(&self) -> bool {
        self.0.strong_count() > 0
    }

    pub(crate) fn emit(&self, severity: Severity, message: &str) {
        match self.0.upgrade() {
            Some(context) => context.diagnostics.emit(severity, message),
            None => LogDiagnostics.emit(severity, message),
        }
    }

    fn points_to(&self, context: &Arc<PoolContext>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Arc::as_ptr(context))
    }
}

impl fmt::Debug for PoolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PoolRef")
            .field(&if self.is_attached() { "attached" } else { "detached" })
            .finish()
    }
}

/// The registry of every object decoded from one raw pool buffer.
pub struct ObjectPool {
    objects: HashMap<ObjectId, VtObject>,
    version: Option<String>,
    settings: PoolSettings,
    context: Arc<PoolContext>,
}

impl Default for ObjectPool {
    fn default() -> Self {
        ObjectPool::new()
    }
}

impl ObjectPool {
    pub fn new() -> Self {
        ObjectPool::with_settings(PoolSettings::default())
    }

    pub fn with_settings(settings: PoolSettings) -> Self {
        ObjectPool {
            objects: HashMap::new(),
            version: None,
            settings,
            context: Arc::new(PoolContext {
                diagnostics: Arc::new(LogDiagnostics),
            }),
        }
    }

    /// Route decode and mutation failures of this pool and its objects to `diagnostics`.
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn Diagnostics>) -> Self {
        self.context = Arc::new(PoolContext { diagnostics });
        let pool = self.pool_ref();
        for object in self.objects.values_mut() {
            object.set_pool(pool.clone());
        }
        self
    }

    /// Convenience for `ObjectPool::new()` followed by [`ObjectPool::decode`].
    pub fn from_buffer(buffer: &[u8]) -> Result<Self> {
        let mut pool = ObjectPool::new();
        pool.decode(buffer)?;
        Ok(pool)
    }

    pub fn settings(&self) -> &PoolSettings {
        &self.settings
    }

    fn pool_ref(&self) -> PoolRef {
        PoolRef(Arc::downgrade(&self.context))
    }

    fn report(&self, message: fmt::Arguments<'_>) {
        self.context
            .diagnostics
            .emit(Severity::Error, &format!("[Object Pool] {message}"));
    }

    /// Decode `buffer` into this pool, replacing whatever it held before.
    ///
    /// Decoding stops at the first failure. Objects decoded before the failing one stay in the
    /// registry, but the pool has no fingerprint and should be treated as rejected.
    pub fn decode(&mut self, buffer: &[u8]) -> Result<()> {
        self.objects.clear();
        self.version = None;

        if let Err(err) = self.decode_objects(buffer) {
            self.report(format_args!("Failed to decode object pool: {err}"));
            return Err(err);
        }

        if self.settings.compute_fingerprint {
            self.version = Some(hash_pool_to_version(buffer));
        }

        info!(
            "Decoded object pool of {} bytes: {} objects, version {}",
            buffer.len(),
            self.objects.len(),
            self.version.as_deref().unwrap_or("<not computed>")
        );
        Ok(())
    }

    fn decode_objects(&mut self, buffer: &[u8]) -> Result<()> {
        if buffer.is_empty() {
            return Err(DecodeError::EmptyPool);
        }

        let mut cursor = ByteCursor::new(buffer);
        while !cursor.is_at_end() {
            let offset = cursor.position();
            // Header layout: id (2 bytes), then the type tag.
            let tag = cursor.peek_u8_at(2, "object type")?;
            let object_type = ObjectType::try_from(tag)
                .map_err(|tag| DecodeError::UnknownObjectType { tag, offset })?;

            trace!("Decoding {} object at offset {}", object_type, offset);
            let object = VtObject::decode(object_type, &mut cursor, self.pool_ref())?;
            self.insert(object, offset)?;
        }

        Ok(())
    }

    fn insert(&mut self, object: VtObject, offset: u64) -> Result<()> {
        let object_id = object.object_id();

        if self.settings.duplicate_ids == DuplicatePolicy::Reject
            && self.objects.contains_key(&object_id)
        {
            return Err(DecodeError::DuplicateObjectId { object_id, offset });
        }

        if let Some(previous) = self.objects.insert(object_id, object) {
            debug!(
                "Object {:#06x} at offset {} replaces an earlier {} object",
                object_id,
                offset,
                previous.object_type()
            );
        }
        Ok(())
    }

    /// Look up an object by id. A miss is reported to the diagnostics sink.
    pub fn get_object(&self, id: ObjectId) -> Option<&VtObject> {
        let object = self.objects.get(&id);
        if object.is_none() {
            self.report(format_args!("Failed to get object {id:#06x}: not in pool"));
        }
        object
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut VtObject> {
        if !self.objects.contains_key(&id) {
            self.report(format_args!("Failed to get object {id:#06x}: not in pool"));
            return None;
        }
        self.objects.get_mut(&id)
    }

    /// Follow a cross-reference held by `from` (a child, mask or macro id).
    ///
    /// Returns `None` without a diagnostic for [`NULL_OBJECT_ID`]. `from` must have been decoded
    /// by this pool.
    pub fn resolve(&self, from: &VtObject, id: ObjectId) -> Option<&VtObject> {
        if id == NULL_OBJECT_ID {
            return None;
        }
        if !from.pool().points_to(&self.context) {
            self.report(format_args!(
                "Failed to resolve {id:#06x}: object {:#06x} belongs to another pool",
                from.object_id()
            ));
            return None;
        }
        self.get_object(id)
    }

    /// The pool's working set, if it has one.
    pub fn working_set(&self) -> Option<&WorkingSet> {
        self.objects.values().find_map(VtObject::as_working_set)
    }

    /// The mask the working set currently shows.
    pub fn active_mask(&self) -> Option<&VtObject> {
        let working_set = self.working_set()?;
        self.objects.get(&working_set.active_mask())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.objects.contains_key(&id)
    }

    /// Objects in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &VtObject> + '_ {
        self.objects.values()
    }

    /// Version string of the last successfully decoded buffer.
    pub fn fingerprint(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Debug for ObjectPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("objects", &self.objects.len())
            .field("version", &self.version)
            .field("settings", &self.settings)
            .finish()
    }
}

impl Serialize for ObjectPool {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct PoolDump<'a> {
            version: Option<&'a str>,
            objects: Vec<&'a VtObject>,
        }

        let mut objects: Vec<&VtObject> = self.objects.values().collect();
        objects.sort_by_key(|object| object.object_id());

        PoolDump {
            version: self.fingerprint(),
            objects,
        }
        .serialize(serializer)
    }
}
