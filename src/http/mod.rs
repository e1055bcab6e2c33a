//! HTTP client module for calculator API testing

mod client;

pub use client::{HttpClient, HttpRequest, HttpResponse};
