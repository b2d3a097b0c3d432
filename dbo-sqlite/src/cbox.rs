use std::{
    ops::{Deref, DerefMut},
    ptr,
};

/// Owner of a pointer allocated by the native library, released with `dealloc` on drop.
///
/// A null pointer is never passed to `dealloc`, so a guard can be created before the
/// native call that fills it and still clean up whatever that call allocated.
#[derive(Debug)]
pub(crate) struct CBox<T> {
    ptr: *mut T,
    dealloc: fn(*mut T),
}

impl<T> CBox<T> {
    pub(crate) fn new(ptr: *mut T, dealloc: fn(*mut T)) -> Self {
        Self { ptr, dealloc }
    }

    pub(crate) fn null(dealloc: fn(*mut T)) -> Self {
        Self::new(ptr::null_mut(), dealloc)
    }

    pub(crate) fn is_null(&self) -> bool {
        self.ptr.is_null()
    }
}

impl<T> Drop for CBox<T> {
    fn drop(&mut self) {
        if !self.is_null() {
            (self.dealloc)(self.ptr);
            self.ptr = ptr::null_mut();
        }
    }
}

impl<T> Deref for CBox<T> {
    type Target = *mut T;

    fn deref(&self) -> &Self::Target {
        &self.ptr
    }
}

impl<T> DerefMut for CBox<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.ptr
    }
}

// The handle can move to another thread with its owner, it is never shared.
unsafe impl<T> Send for CBox<T> {}
