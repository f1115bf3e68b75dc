//! Build-once slots for derived chunk artifacts.

/// A derived artifact that is either not built yet or built for good.
///
/// There is no way back from [`Lazy::Built`]: once a value is stored it is
/// never replaced or invalidated for the lifetime of the slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Lazy<T> {
    /// Nothing built yet.
    #[default]
    Unbuilt,
    /// The built value.
    Built(T),
}

impl<T> Lazy<T> {
    /// Returns `true` once a value has been stored.
    pub fn is_built(&self) -> bool {
        matches!(self, Self::Built(_))
    }

    /// The built value, if any.
    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Built(value) => Some(value),
            Self::Unbuilt => None,
        }
    }

    /// Mutable access to the built value, if any.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Built(value) => Some(value),
            Self::Unbuilt => None,
        }
    }

    /// Stores `value` if the slot is still empty.
    ///
    /// # Errors
    ///
    /// Hands `value` back unchanged if the slot was already built.
    pub fn build(&mut self, value: T) -> Result<(), T> {
        if self.is_built() {
            return Err(value);
        }
        *self = Self::Built(value);
        Ok(())
    }

    /// Runs `make` only while the slot is empty, storing a `Some` result.
    ///
    /// Returns `true` if this call built the slot.
    pub fn try_build_with(&mut self, make: impl FnOnce() -> Option<T>) -> bool {
        if self.is_built() {
            return false;
        }
        match make() {
            Some(value) => {
                *self = Self::Built(value);
                true
            }
            None => false,
        }
    }
}
