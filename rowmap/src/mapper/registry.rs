use crate::errors::RowMapResult;
use crate::mapper::{Entity, EntityDescriptor};
use dashmap::DashMap;
use std::any::TypeId;
use std::sync::{Arc, LazyLock};

static DESCRIPTORS: LazyLock<DashMap<TypeId, Arc<EntityDescriptor>>> = LazyLock::new(DashMap::new);

/// Returns the cached descriptor of `E`, computing it on first use.
///
/// The descriptor is computed outside the map lock. Two threads racing on the first use
/// may both compute it, but only the first stored value is kept and handed out.
/// A failed computation is not cached.
pub fn describe<E: Entity>() -> RowMapResult<Arc<EntityDescriptor>> {
    let key = TypeId::of::<E>();
    if let Some(descriptor) = DESCRIPTORS.get(&key) {
        return Ok(descriptor.value().clone());
    }

    let computed = Arc::new(E::describe()?);
    let stored = DESCRIPTORS.entry(key).or_insert(computed).value().clone();
    Ok(stored)
}

/// Whether a descriptor for `E` is already cached.
pub fn is_described<E: Entity>() -> bool {
    DESCRIPTORS.contains_key(&TypeId::of::<E>())
}
