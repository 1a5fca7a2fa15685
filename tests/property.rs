// tests/property.rs

#[path = "property/pattern.rs"]
mod pattern;
