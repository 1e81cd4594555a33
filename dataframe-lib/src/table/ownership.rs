//! Controlled and internally owned table state.

use std::cell::RefCell;
use std::rc::Rc;

/// State owned by the caller.
///
/// The table reads the current value through [`value`](Self::value) and
/// reports changes through [`on_change`](Self::on_change); it never keeps its
/// own copy.
pub trait Controlled<T> {
    fn value(&self) -> T;
    fn on_change(&self, value: T);
}

impl<T: Clone> Controlled<T> for Rc<RefCell<T>> {
    fn value(&self) -> T {
        self.borrow().clone()
    }

    fn on_change(&self, value: T) {
        *self.borrow_mut() = value;
    }
}

/// Who owns a piece of table state.
///
/// Decided once when the table is built.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// use dataframe_lib::table::Ownership;
///
/// let shared = Rc::new(RefCell::new(String::from("acme")));
/// let mut term = Ownership::controlled(shared.clone());
/// term.set("widget".to_string());
/// assert_eq!(*shared.borrow(), "widget");
///
/// let mut local = Ownership::Internal(String::new());
/// local.update(|t| t.push_str("x"));
/// assert_eq!(local.get(), "x");
/// ```
pub enum Ownership<T> {
    /// The caller owns the value.
    Controlled(Box<dyn Controlled<T>>),
    /// The table owns the value.
    Internal(T),
}

impl<T: Clone> Ownership<T> {
    pub fn controlled(source: impl Controlled<T> + 'static) -> Self {
        Ownership::Controlled(Box::new(source))
    }

    pub fn is_controlled(&self) -> bool {
        matches!(self, Ownership::Controlled(_))
    }

    /// Returns the current value.
    pub fn get(&self) -> T {
        match self {
            Ownership::Controlled(source) => source.value(),
            Ownership::Internal(value) => value.clone(),
        }
    }

    /// Replaces the value.
    pub fn set(&mut self, value: T) {
        match self {
            Ownership::Controlled(source) => source.on_change(value),
            Ownership::Internal(current) => *current = value,
        }
    }

    /// Modifies the value in place and returns the closure's result.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut T) -> R) -> R {
        match self {
            Ownership::Internal(current) => f(current),
            Ownership::Controlled(source) => {
                let mut value = source.value();
                let out = f(&mut value);
                source.on_change(value);
                out
            }
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Ownership<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Ownership::Controlled(_) => f.write_str("Controlled"),
            Ownership::Internal(value) => f.debug_tuple("Internal").field(value).finish(),
        }
    }
}
