//   Copyright 2024 The Conclave Project
//   SPDX-License-Identifier: BSD-3-Clause

//! Conversion of not-found errors into `Ok(None)`.

/// Errors that can represent a not-found condition.
pub trait IsNotFoundError {
    fn is_not_found_error(&self) -> bool;
}

/// Adds `.optional()` to results whose error type can classify not-found.
pub trait Optional<T> {
    type Error;

    fn optional(self) -> Result<Option<T>, Self::Error>;
}

impl<T, E: IsNotFoundError> Optional<T> for Result<T, E> {
    type Error = E;

    fn optional(self) -> Result<Option<T>, Self::Error> {
        match self {
            Ok(t) => Ok(Some(t)),
            Err(e) if e.is_not_found_error() => Ok(None),
            Err(e) => Err(e),
        }
    }
}
