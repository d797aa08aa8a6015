//! The CRUD contract for persistable model variants.
//!
//! The core ships no storage engine. A variant that wants to be persisted
//! implements [`Crud`] against a backend of its choosing; all storage logic
//! lives in that implementation. The contract never validates on its own:
//! callers run [`Model::validate`] before [`Crud::save`].

use crate::errors::ModelError;
use crate::model::{Model, ModelVariant};

pub trait Crud: ModelVariant + Sized {
    /// Storage handle the variant reads from and writes to.
    type Backend;
    /// Identifier accepted by [`Crud::get`].
    type Id;
    /// Filter accepted by [`Crud::find`].
    type Query;
    /// Variant-specific failure. Structural model errors convert into it.
    type Error: From<ModelError>;

    /// Look up exactly one entity. Not-found behavior is variant-defined.
    fn get(backend: &Self::Backend, id: &Self::Id) -> Result<Model<Self>, Self::Error>;

    /// Look up zero or more entities. Ordering and filter semantics are
    /// variant-defined.
    fn find(backend: &Self::Backend, query: &Self::Query) -> Result<Vec<Model<Self>>, Self::Error>;

    /// Persist the current attribute state, inserting or updating as the
    /// variant decides. Returns the stored (possibly normalized) instance.
    fn save(model: Model<Self>, backend: &mut Self::Backend) -> Result<Model<Self>, Self::Error>;

    /// Remove the backing record. The returned instance is detached.
    fn delete(model: Model<Self>, backend: &mut Self::Backend)
    -> Result<Model<Self>, Self::Error>;
}

impl<V: Crud> Model<V> {
    /// Shorthand for [`Crud::save`].
    ///
    /// # Errors
    ///
    /// Propagates the variant's error.
    pub fn save(self, backend: &mut V::Backend) -> Result<Self, V::Error> {
        V::save(self, backend)
    }

    /// Shorthand for [`Crud::delete`].
    ///
    /// # Errors
    ///
    /// Propagates the variant's error.
    pub fn delete(self, backend: &mut V::Backend) -> Result<Self, V::Error> {
        V::delete(self, backend)
    }
}
