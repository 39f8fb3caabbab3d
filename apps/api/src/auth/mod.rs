// Authentication module
// Bearer tokens for our API and OAuth clients for social login

pub mod jwt;
pub mod oauth;
