pub mod auth;
pub mod commerce;
pub mod parties;
pub mod profesores;
pub mod rbac;
pub mod scheduling;
