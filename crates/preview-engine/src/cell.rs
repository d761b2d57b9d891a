//! Reactive value cells.
//!
//! A [`ReactiveCell`] holds the latest value of a changing quantity and
//! notifies listeners synchronously whenever a different value is sent.
//!
//! # Invariants
//!
//! 1. `send(v)` with `v == latest` is a no-op: no listener runs.
//! 2. A new listener is called once, synchronously, with the current value
//!    before `add_listener` returns.
//! 3. Listeners run in registration order, outside any internal borrow, so a
//!    listener may read or send to any cell (including this one). A nested
//!    send to the same cell supersedes the outer one: listeners the outer
//!    send has not reached yet only see the newer value.
//! 4. A panicking listener is a programmer error and propagates.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Listener<T> = Rc<dyn Fn(&T)>;

/// Handle returned by [`ReactiveCell::add_listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct CellInner<T> {
    latest: T,
    listeners: Vec<(ListenerId, Listener<T>)>,
    next_id: u64,
    /// Bumped on every accepted send.
    version: u64,
}

/// Shared holder of the latest value of `T`. Clones are handles to the same cell.
pub struct ReactiveCell<T> {
    inner: Rc<RefCell<CellInner<T>>>,
}

impl<T> Clone for ReactiveCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("ReactiveCell")
            .field("latest", &inner.latest)
            .field("listeners", &inner.listeners.len())
            .finish()
    }
}

impl<T: Clone + PartialEq + 'static> ReactiveCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(CellInner {
                latest: value,
                listeners: Vec::new(),
                next_id: 0,
                version: 0,
            })),
        }
    }

    /// A clone of the current value.
    pub fn latest(&self) -> T {
        self.inner.borrow().latest.clone()
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().latest)
    }

    /// Store `value` and notify listeners if it differs from the latest one.
    /// Returns whether the value changed.
    pub fn send(&self, value: T) -> bool {
        let (version, listeners) = {
            let mut inner = self.inner.borrow_mut();
            if inner.latest == value {
                return false;
            }
            inner.latest = value.clone();
            inner.version += 1;
            let listeners: Vec<Listener<T>> =
                inner.listeners.iter().map(|(_, l)| Rc::clone(l)).collect();
            (inner.version, listeners)
        };
        for listener in &listeners {
            // A nested send has already delivered a newer value to everyone.
            if self.inner.borrow().version != version {
                break;
            }
            listener(&value);
        }
        true
    }

    /// Register `listener` and immediately call it with the current value.
    pub fn add_listener(&self, listener: impl Fn(&T) + 'static) -> ListenerId {
        let listener: Listener<T> = Rc::new(listener);
        let (id, current) = {
            let mut inner = self.inner.borrow_mut();
            let id = ListenerId(inner.next_id);
            inner.next_id += 1;
            inner.listeners.push((id, Rc::clone(&listener)));
            (id, inner.latest.clone())
        };
        listener(&current);
        id
    }

    /// Unregister a listener. Returns `false` if it was already gone.
    pub fn remove_listener(&self, id: ListenerId) -> bool {
        let mut inner = self.inner.borrow_mut();
        let before = inner.listeners.len();
        inner.listeners.retain(|(lid, _)| *lid != id);
        inner.listeners.len() < before
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }

    /// A derived cell holding `f(latest)`, updated whenever this cell changes.
    pub fn map<U, F>(&self, f: F) -> ReactiveCell<U>
    where
        U: Clone + PartialEq + 'static,
        F: Fn(&T) -> U + 'static,
    {
        let out = ReactiveCell::new(self.with(&f));
        let target = out.clone();
        self.add_listener(move |v| {
            target.send(f(v));
        });
        out
    }
}

macro_rules! zip_cells {
    ($(#[$doc:meta])* $name:ident; $($cell:ident: $ty:ident),+) => {
        $(#[$doc])*
        pub fn $name<$($ty),+>($($cell: &ReactiveCell<$ty>),+) -> ReactiveCell<($($ty,)+)>
        where
            $($ty: Clone + PartialEq + 'static),+
        {
            let out = ReactiveCell::new(($($cell.latest(),)+));
            let snapshot = {
                $(let $cell = $cell.clone();)+
                Rc::new(move || ($($cell.latest(),)+))
            };
            $(
                {
                    let out = out.clone();
                    let snapshot = Rc::clone(&snapshot);
                    $cell.add_listener(move |_| {
                        out.send(snapshot());
                    });
                }
            )+
            out
        }
    };
}

zip_cells!(
    /// Combine two cells into one that changes whenever either input does.
    zip2; a: A, b: B
);
zip_cells!(
    /// Combine four cells into one that changes whenever any input does.
    zip4; a: A, b: B, c: C, d: D
);
