// SPDX-License-Identifier: MPL-2.0
//! Permission port.

use crate::error::{Error, Permission, Result};

/// Grants or refuses platform permissions.
pub trait PermissionGate: Send + Sync {
    /// Returns whether `permission` is (now) granted.
    fn request(&self, permission: Permission) -> bool;
}

/// Turns a refused request into [`Error::PermissionDenied`].
///
/// # Errors
///
/// See above.
pub fn require(gate: &dyn PermissionGate, permission: Permission) -> Result<()> {
    if gate.request(permission) {
        Ok(())
    } else {
        log::warn!("permission refused: {}", permission.as_str());
        Err(Error::PermissionDenied(permission))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    impl PermissionGate for Fixed {
        fn request(&self, _: Permission) -> bool {
            self.0
        }
    }

    #[test]
    fn refusal_becomes_error() {
        assert_eq!(require(&Fixed(true), Permission::Camera), Ok(()));
        assert_eq!(
            require(&Fixed(false), Permission::WriteImages),
            Err(Error::PermissionDenied(Permission::WriteImages))
        );
    }
}
