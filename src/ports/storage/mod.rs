mod object_storage;

pub use object_storage::ObjectStorage;

#[cfg(test)]
pub use object_storage::MockObjectStorage;
