use crate::services::Service;
use core::fmt::{Display, Formatter};
use std::sync::Arc;

/// A failure reported by one coverage service.
#[derive(Debug, Clone)]
pub struct ServiceError {
    service: Service,
    error: Arc<ohno::AppError>,
}

impl ServiceError {
    #[must_use]
    pub const fn new(service: Service, error: Arc<ohno::AppError>) -> Self {
        Self { service, error }
    }

    #[must_use]
    pub const fn service(&self) -> Service {
        self.service
    }

    #[must_use]
    pub fn error(&self) -> &ohno::AppError {
        &self.error
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {:#}", self.service, self.error)
    }
}

/// Every attempted service failed or had no data, and at least one of them failed.
#[derive(Debug, Clone)]
pub struct AggregateError {
    errors: Vec<ServiceError>,
}

impl AggregateError {
    #[must_use]
    pub const fn new(errors: Vec<ServiceError>) -> Self {
        Self { errors }
    }

    #[must_use]
    pub fn errors(&self) -> &[ServiceError] {
        &self.errors
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }
}

impl Display for AggregateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} error(s) occurred while trying to fetch coverage", self.errors.len())
    }
}

impl core::error::Error for AggregateError {}
