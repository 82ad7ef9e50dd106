use std::cell::{BorrowError, BorrowMutError, Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::{Texture, TextureError};

/// Shared handle to a [`Texture`].
///
/// Cloning the handle shares the same texture (identity is preserved, see
/// [`TextureHandle::ptr_eq`]); [`TextureHandle::clone_texture`] produces an
/// independent copy of the pixels instead.
#[derive(Clone)]
pub struct TextureHandle(Rc<RefCell<Texture>>);

impl TextureHandle {
    pub fn new(texture: Texture) -> Self {
        Self(Rc::new(RefCell::new(texture)))
    }

    pub fn width(&self) -> u32 {
        self.0.borrow().width()
    }

    pub fn height(&self) -> u32 {
        self.0.borrow().height()
    }

    pub fn resize(&self, width: u32, height: u32) -> Result<(), TextureError> {
        self.0.borrow_mut().resize(width, height)
    }

    pub fn resize_fast(&self, width: u32, height: u32) -> Result<(), TextureError> {
        self.0.borrow_mut().resize_fast(width, height)
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Copy the current pixels into a new, unshared texture.
    pub fn clone_texture(&self) -> Texture {
        self.0.borrow().clone()
    }

    /// Copy the current pixels into a new handle with its own identity.
    pub fn duplicate(&self) -> TextureHandle {
        Self::new(self.clone_texture())
    }

    pub fn borrow(&self) -> Ref<'_, Texture> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, Texture> {
        self.0.borrow_mut()
    }

    pub fn try_borrow(&self) -> Result<Ref<'_, Texture>, BorrowError> {
        self.0.try_borrow()
    }

    pub fn try_borrow_mut(&self) -> Result<RefMut<'_, Texture>, BorrowMutError> {
        self.0.try_borrow_mut()
    }

    /// True if both handles name the same texture.
    pub fn ptr_eq(&self, other: &TextureHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl From<Texture> for TextureHandle {
    fn from(texture: Texture) -> Self {
        Self::new(texture)
    }
}

impl fmt::Debug for TextureHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(t) => write!(f, "TextureHandle({}x{})", t.width(), t.height()),
            Err(_) => f.write_str("TextureHandle(<in use>)"),
        }
    }
}
