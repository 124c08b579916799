// Job application wizard: step table, field rules, list editors and the
// controller that ties them together. Handlers persist the controller's
// snapshot after every mutation through `service`.

pub mod controller;
pub mod handlers;
pub mod lists;
pub mod service;
pub mod steps;
pub mod submission;
pub mod validation;
pub mod view;
