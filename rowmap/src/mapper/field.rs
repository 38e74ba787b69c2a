use std::fmt::{Debug, Formatter};
use std::marker::PhantomData;

/// A typed reference to one persistent field of entity `E` holding values of type `V`.
///
/// Tokens are generated by `#[derive(Entity)]` as associated constants, so callers never
/// spell a column name:
///
/// ```rust,ignore
/// let query = condition::<User>().equals(User::USER_NAME, "alice");
/// ```
///
/// The token only carries the logical field name. The column name is looked up in the
/// entity descriptor when the token is used.
pub struct Field<E, V> {
    name: &'static str,
    _marker: PhantomData<fn() -> (E, V)>,
}

impl<E, V> Field<E, V> {
    pub const fn new(name: &'static str) -> Self {
        Field {
            name,
            _marker: PhantomData,
        }
    }

    /// Logical (declared) name of the field.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<E, V> Clone for Field<E, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E, V> Copy for Field<E, V> {}

impl<E, V> Debug for Field<E, V> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Field({})", self.name)
    }
}

impl<E, V> PartialEq for Field<E, V> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl<E, V> Eq for Field<E, V> {}

/// Field value types that accept a LIKE pattern.
pub trait Textual: private::Sealed {}

impl Textual for String {}
impl Textual for Option<String> {}

mod private {
    pub trait Sealed {}
    impl Sealed for String {}
    impl Sealed for Option<String> {}
}
