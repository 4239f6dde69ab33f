pub mod auth;
pub mod school_access;
pub mod superadmin;
