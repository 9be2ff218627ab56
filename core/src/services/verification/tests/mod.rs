//! Tests for the verification service.
