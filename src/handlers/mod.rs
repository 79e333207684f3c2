pub mod decide;
pub mod health;
pub mod policies;
pub mod rules;
pub mod tenants;
